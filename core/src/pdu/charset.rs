/*
 * charset.rs
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

//! MIBenum character sets used by MMS encoded-string values and part charset parameters.

pub const US_ASCII: u32 = 3;
pub const ISO_8859_1: u32 = 4;
pub const UTF_8: u32 = 106;
pub const UCS_2: u32 = 1000;
pub const UTF_16: u32 = 1015;

const NAMES: &[(u32, &str)] = &[
    (US_ASCII, "us-ascii"),
    (ISO_8859_1, "iso-8859-1"),
    (UTF_8, "utf-8"),
    (UCS_2, "iso-10646-ucs-2"),
    (UTF_16, "utf-16"),
];

/// Canonical name for a MIBenum, if known.
pub fn name(mib: u32) -> Option<&'static str> {
    NAMES.iter().find(|(m, _)| *m == mib).map(|(_, n)| *n)
}

/// MIBenum for a charset name (case-insensitive). Accepts the common aliases.
pub fn from_name(name: &str) -> Option<u32> {
    let lower = name.trim().to_ascii_lowercase();
    match lower.as_str() {
        "utf8" => return Some(UTF_8),
        "ascii" => return Some(US_ASCII),
        "latin1" => return Some(ISO_8859_1),
        "ucs-2" | "ucs2" => return Some(UCS_2),
        _ => {}
    }
    NAMES.iter().find(|(_, n)| *n == lower).map(|(m, _)| *m)
}

/// Decode octets in the given charset. Unknown charsets decode as UTF-8, lossily.
pub fn decode(bytes: &[u8], mib: u32) -> String {
    match mib {
        ISO_8859_1 => bytes.iter().map(|b| char::from(*b)).collect(),
        UCS_2 | UTF_16 => {
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Encode text in the given charset. Characters outside ISO-8859-1 become `?` there.
pub fn encode(text: &str, mib: u32) -> Vec<u8> {
    match mib {
        ISO_8859_1 | US_ASCII => text
            .chars()
            .map(|c| {
                let limit = if mib == US_ASCII { 0x7F } else { 0xFF };
                if (c as u32) <= limit {
                    c as u8
                } else {
                    b'?'
                }
            })
            .collect(),
        UCS_2 | UTF_16 => text.encode_utf16().flat_map(|u| u.to_be_bytes()).collect(),
        _ => text.as_bytes().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ucs2_is_big_endian() {
        assert_eq!(encode("Hi", UCS_2), vec![0x00, b'H', 0x00, b'i']);
        assert_eq!(decode(&[0x00, b'H', 0x00, b'i'], UCS_2), "Hi");
    }

    #[test]
    fn latin1_maps_high_octets() {
        assert_eq!(decode(&[0x63, 0x61, 0x66, 0xE9], ISO_8859_1), "caf\u{e9}");
        assert_eq!(encode("caf\u{e9}\u{20ac}", ISO_8859_1), vec![0x63, 0x61, 0x66, 0xE9, b'?']);
    }

    #[test]
    fn unknown_charset_is_lossy_utf8() {
        assert_eq!(decode(&[b'o', b'k', 0xFF], 2026), "ok\u{fffd}");
    }

    #[test]
    fn names() {
        assert_eq!(from_name("UTF-8"), Some(UTF_8));
        assert_eq!(from_name("latin1"), Some(ISO_8859_1));
        assert_eq!(name(UTF_8), Some("utf-8"));
        assert_eq!(from_name("koi8-r"), None);
    }
}
