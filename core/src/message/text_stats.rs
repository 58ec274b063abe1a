/*
 * text_stats.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Missiva, an SMS/MMS messaging core.
 *
 * Missiva is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Missiva is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Missiva.  If not, see <http://www.gnu.org/licenses/>.
 */

//! SMS segmentation statistics for draft text.

/// GSM 03.38 default alphabet. Index 0x1B (escape) is excluded from matching.
const GSM7_BASIC: &str = "@\u{a3}$\u{a5}\u{e8}\u{e9}\u{f9}\u{ec}\u{f2}\u{c7}\n\u{d8}\u{f8}\r\u{c5}\u{e5}\
\u{394}_\u{3a6}\u{393}\u{39b}\u{3a9}\u{3a0}\u{3a8}\u{3a3}\u{398}\u{39e}\u{c6}\u{e6}\u{df}\u{c9}\
\u{20}!\"#\u{a4}%&'()*+,-./0123456789:;<=>?\
\u{a1}ABCDEFGHIJKLMNOPQRSTUVWXYZ\u{c4}\u{d6}\u{d1}\u{dc}\u{a7}\
\u{bf}abcdefghijklmnopqrstuvwxyz\u{e4}\u{f6}\u{f1}\u{fc}\u{e0}";

/// Characters reachable through the escape table; each costs two septets.
const GSM7_EXTENSION: &str = "\u{c}^{}\\[~]|\u{20ac}";

const GSM7_SINGLE_SEPTETS: usize = 160;
const GSM7_MULTI_SEPTETS: usize = 153;
const UCS2_SINGLE_UNITS: usize = 70;
const UCS2_MULTI_UNITS: usize = 67;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsEncoding {
    Gsm7,
    Ucs2,
}

/// Result of sizing a text as SMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmsLength {
    pub message_count: usize,
    pub units_used: usize,
    pub units_remaining: usize,
    pub encoding: SmsEncoding,
}

fn gsm7_septets(text: &str) -> Option<usize> {
    text.chars().try_fold(0usize, |n, c| {
        if GSM7_BASIC.contains(c) {
            Some(n + 1)
        } else if GSM7_EXTENSION.contains(c) {
            Some(n + 2)
        } else {
            None
        }
    })
}

/// Segment count and remaining capacity, choosing GSM 7-bit when every character fits and
/// UCS-2 otherwise.
pub fn calculate_length(text: &str) -> SmsLength {
    let (units, single, multi, encoding) = match gsm7_septets(text) {
        Some(septets) => (septets, GSM7_SINGLE_SEPTETS, GSM7_MULTI_SEPTETS, SmsEncoding::Gsm7),
        None => (text.encode_utf16().count(), UCS2_SINGLE_UNITS, UCS2_MULTI_UNITS, SmsEncoding::Ucs2),
    };
    let (message_count, units_remaining) = if units > single {
        let count = units.div_ceil(multi);
        (count, count * multi - units)
    } else {
        (1, single - units)
    };
    SmsLength {
        message_count,
        units_used: units,
        units_remaining,
        encoding,
    }
}

/// Running statistics for the text of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageTextStats {
    message_count: usize,
    code_points_remaining: usize,
}

impl Default for MessageTextStats {
    fn default() -> Self {
        Self {
            message_count: 0,
            code_points_remaining: usize::MAX,
        }
    }
}

impl MessageTextStats {
    pub fn update(&mut self, text: &str) {
        let len = calculate_length(text);
        self.message_count = len.message_count;
        self.code_points_remaining = len.units_remaining;
    }

    pub fn num_messages_to_be_sent(&self) -> usize {
        self.message_count
    }

    pub fn code_points_remaining_in_current_message(&self) -> usize {
        self.code_points_remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gsm7_boundaries() {
        let s = "a".repeat(160);
        let l = calculate_length(&s);
        assert_eq!((l.message_count, l.units_remaining, l.encoding), (1, 0, SmsEncoding::Gsm7));
        let l = calculate_length(&"a".repeat(161));
        assert_eq!((l.message_count, l.units_remaining), (2, 145));
        assert_eq!(calculate_length("").message_count, 1);
    }

    #[test]
    fn extension_characters_cost_two() {
        let l = calculate_length("\u{20ac}{}");
        assert_eq!(l.units_used, 6);
        assert_eq!(l.encoding, SmsEncoding::Gsm7);
    }

    #[test]
    fn ucs2_when_outside_alphabet() {
        let l = calculate_length("\u{4f60}\u{597d}");
        assert_eq!((l.encoding, l.units_used, l.units_remaining), (SmsEncoding::Ucs2, 2, 68));
        let l = calculate_length(&"\u{4f60}".repeat(71));
        assert_eq!((l.message_count, l.units_remaining), (2, 63));
    }

    #[test]
    fn stats_start_unbounded() {
        let mut stats = MessageTextStats::default();
        assert_eq!(stats.num_messages_to_be_sent(), 0);
        assert_eq!(stats.code_points_remaining_in_current_message(), usize::MAX);
        stats.update("hello");
        assert_eq!(stats.num_messages_to_be_sent(), 1);
        assert_eq!(stats.code_points_remaining_in_current_message(), 155);
    }
}
