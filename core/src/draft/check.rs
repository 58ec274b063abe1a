/*
 * check.rs
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

//! Pre-send validation of a draft.
//!
//! [`pre_check`] runs on the owner thread against live state; [`check_for_send`] runs on a
//! worker against a snapshot.

use serde::Serialize;

use crate::message::{MessagePart, PartKind};
use crate::mms::SMIL_SLOP_BYTES;

/// Outcome of a pre-send check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckDraftResult {
    Passed,
    HasPendingAttachments,
    NoSelfPhoneNumberInGroupMms,
    MessageOverLimit,
    VideoAttachmentLimitExceeded,
    SimNotReady,
}

impl CheckDraftResult {
    pub fn code(self) -> i32 {
        match self {
            Self::Passed => 0,
            Self::HasPendingAttachments => 1,
            Self::NoSelfPhoneNumberInGroupMms => 2,
            Self::MessageOverLimit => 3,
            Self::VideoAttachmentLimitExceeded => 4,
            Self::SimNotReady => 5,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        [
            Self::Passed,
            Self::HasPendingAttachments,
            Self::NoSelfPhoneNumberInGroupMms,
            Self::MessageOverLimit,
            Self::VideoAttachmentLimitExceeded,
            Self::SimNotReady,
        ]
        .into_iter()
        .find(|r| r.code() == code)
    }
}

/// Subscription and conversation facts a check needs. Supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    /// SIM of the sending subscription is ready.
    pub sim_ready: bool,
    pub self_phone_number: Option<String>,
    pub recipient_count: usize,
    pub max_message_size: u64,
}

/// What the worker sees of the draft.
#[derive(Debug, Clone, Default)]
pub struct DraftSnapshot {
    pub text_bytes: u64,
    pub subject_bytes: u64,
    pub attachments: Vec<MessagePart>,
}

impl DraftSnapshot {
    pub fn estimated_size(&self) -> u64 {
        self.text_bytes
            + self.subject_bytes
            + self.attachments.iter().map(MessagePart::estimated_size).sum::<u64>()
            + SMIL_SLOP_BYTES
    }
}

/// Checks that must see live state: pending attachments, then SIM readiness.
pub fn pre_check(attachments: &[MessagePart], ctx: &CheckContext) -> CheckDraftResult {
    if attachments.iter().any(|a| a.pending) {
        CheckDraftResult::HasPendingAttachments
    } else if !ctx.sim_ready {
        CheckDraftResult::SimNotReady
    } else {
        CheckDraftResult::Passed
    }
}

/// Checks run off the owner thread, in order: video count, group sender number, size.
pub fn check_for_send(snapshot: &DraftSnapshot, check_size: bool, ctx: &CheckContext) -> CheckDraftResult {
    let videos = snapshot
        .attachments
        .iter()
        .filter(|a| a.kind() == PartKind::Video)
        .count();
    if videos > 1 {
        return CheckDraftResult::VideoAttachmentLimitExceeded;
    }
    let has_self_number = ctx.self_phone_number.as_deref().is_some_and(|n| !n.trim().is_empty());
    if ctx.recipient_count > 1 && !has_self_number {
        return CheckDraftResult::NoSelfPhoneNumberInGroupMms;
    }
    if check_size && snapshot.estimated_size() > ctx.max_message_size {
        return CheckDraftResult::MessageOverLimit;
    }
    CheckDraftResult::Passed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> CheckContext {
        CheckContext {
            sim_ready: true,
            self_phone_number: Some("+15550100".into()),
            recipient_count: 1,
            max_message_size: 10_000,
        }
    }

    fn video() -> MessagePart {
        MessagePart::media("video/mp4", "missiva://scratch/1/v.mp4").with_size(10)
    }

    #[test]
    fn result_codes() {
        for code in 0..6 {
            assert_eq!(CheckDraftResult::from_code(code).map(CheckDraftResult::code), Some(code));
        }
        assert_eq!(CheckDraftResult::from_code(6), None);
    }

    #[test]
    fn pending_beats_sim() {
        let c = CheckContext { sim_ready: false, ..ctx() };
        assert_eq!(pre_check(&[video().pending()], &c), CheckDraftResult::HasPendingAttachments);
        assert_eq!(pre_check(&[video()], &c), CheckDraftResult::SimNotReady);
        assert_eq!(pre_check(&[], &ctx()), CheckDraftResult::Passed);
    }

    #[test]
    fn worker_predicates_in_order() {
        let two_videos = DraftSnapshot {
            attachments: vec![video(), video()],
            ..DraftSnapshot::default()
        };
        let group = CheckContext {
            recipient_count: 3,
            self_phone_number: None,
            ..ctx()
        };
        assert_eq!(check_for_send(&two_videos, true, &group), CheckDraftResult::VideoAttachmentLimitExceeded);
        assert_eq!(
            check_for_send(&DraftSnapshot::default(), true, &group),
            CheckDraftResult::NoSelfPhoneNumberInGroupMms
        );
        let big = DraftSnapshot {
            text_bytes: 9_000,
            ..DraftSnapshot::default()
        };
        assert_eq!(check_for_send(&big, true, &ctx()), CheckDraftResult::MessageOverLimit);
        assert_eq!(check_for_send(&big, false, &ctx()), CheckDraftResult::Passed);
    }
}
