/*
 * status.rs
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

//! Send/retrieve status classification.
//!
//! Raw MMS response and retrieve statuses map onto a four-level retry tier; failed outgoing
//! messages additionally map onto a user-facing [`ErrorCategory`]. All mappings are pure.

use serde::{Deserialize, Serialize};

use crate::pdu::headers::*;

/// Raw status recorded when the platform rejects a message as too large to send.
pub const RAW_TELEPHONY_STATUS_MESSAGE_TOO_BIG: i32 = 10000;
pub const RAW_TELEPHONY_STATUS_UNDEFINED: i32 = -1;

/// What to do after a send or retrieve attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetryTier {
    Succeeded,
    AutoRetry,
    ManualRetry,
    NoRetry,
}

impl RetryTier {
    pub fn code(self) -> i32 {
        match self {
            Self::Succeeded => 0,
            Self::AutoRetry => 1,
            Self::ManualRetry => 2,
            Self::NoRetry => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Succeeded),
            1 => Some(Self::AutoRetry),
            2 => Some(Self::ManualRetry),
            3 => Some(Self::NoRetry),
            _ => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Succeeded => "SUCCEEDED",
            Self::AutoRetry => "AUTO_RETRY",
            Self::ManualRetry => "MANUAL_RETRY",
            Self::NoRetry => "NO_RETRY",
        }
    }
}

fn is_transient(raw: i32) -> bool {
    (0xC0..=0xDF).contains(&raw)
}

fn is_permanent(raw: i32) -> bool {
    (i32::from(RESPONSE_STATUS_ERROR_PERMANENT_FAILURE)..=i32::from(RESPONSE_STATUS_ERROR_PERMANENT_END)).contains(&raw)
}

/// Classify an X-Mms-Response-Status from a send-conf.
pub fn classify_send_status(raw: i32) -> RetryTier {
    if raw == i32::from(RESPONSE_STATUS_OK) {
        RetryTier::Succeeded
    } else if is_transient(raw) || raw == i32::from(RESPONSE_STATUS_ERROR_NETWORK_PROBLEM) {
        RetryTier::AutoRetry
    } else if is_permanent(raw) {
        RetryTier::NoRetry
    } else {
        RetryTier::ManualRetry
    }
}

/// Classify an X-Mms-Retrieve-Status from a retrieve-conf.
pub fn classify_retrieve_status(raw: i32) -> RetryTier {
    if raw == i32::from(RETRIEVE_STATUS_OK) {
        RetryTier::Succeeded
    } else if is_transient(raw) {
        RetryTier::AutoRetry
    } else if is_permanent(raw) {
        RetryTier::NoRetry
    } else {
        RetryTier::ManualRetry
    }
}

/// User-facing reason for a failed outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    OutgoingServiceDenied,
    OutgoingAddressUnresolved,
    OutgoingFormatCorrupt,
    OutgoingContentRejected,
    OutgoingUnsupported,
    OutgoingTooLarge,
    GenericSendFailed,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OutgoingServiceDenied => "outgoing-service-denied",
            Self::OutgoingAddressUnresolved => "outgoing-address-unresolved",
            Self::OutgoingFormatCorrupt => "outgoing-format-corrupt",
            Self::OutgoingContentRejected => "outgoing-content-rejected",
            Self::OutgoingUnsupported => "outgoing-unsupported",
            Self::OutgoingTooLarge => "outgoing-too-large",
            Self::GenericSendFailed => "generic-send-failed",
        }
    }
}

/// Map a raw status to an error category. Only the raw status decides; the message status is
/// accepted so callers can pass what they have on hand.
pub fn classify_error_message(_bugle_status: MessageStatus, raw: i32) -> ErrorCategory {
    if raw == RAW_TELEPHONY_STATUS_MESSAGE_TOO_BIG {
        return ErrorCategory::OutgoingTooLarge;
    }
    let Ok(code) = u8::try_from(raw) else {
        return ErrorCategory::GenericSendFailed;
    };
    match code {
        RESPONSE_STATUS_ERROR_SERVICE_DENIED | RESPONSE_STATUS_ERROR_PERMANENT_SERVICE_DENIED => {
            ErrorCategory::OutgoingServiceDenied
        }
        RESPONSE_STATUS_ERROR_SENDING_ADDRESS_UNRESOLVED
        | RESPONSE_STATUS_ERROR_TRANSIENT_SENDING_ADDRESS_UNRESOLVED
        | RESPONSE_STATUS_ERROR_PERMANENT_SENDING_ADDRESS_UNRESOLVED => ErrorCategory::OutgoingAddressUnresolved,
        RESPONSE_STATUS_ERROR_MESSAGE_FORMAT_CORRUPT | RESPONSE_STATUS_ERROR_PERMANENT_MESSAGE_FORMAT_CORRUPT => {
            ErrorCategory::OutgoingFormatCorrupt
        }
        RESPONSE_STATUS_ERROR_CONTENT_NOT_ACCEPTED | RESPONSE_STATUS_ERROR_PERMANENT_CONTENT_NOT_ACCEPTED => {
            ErrorCategory::OutgoingContentRejected
        }
        RESPONSE_STATUS_ERROR_UNSUPPORTED_MESSAGE => ErrorCategory::OutgoingUnsupported,
        _ => ErrorCategory::GenericSendFailed,
    }
}

/// Application message status. Outgoing values sort below [`MessageStatus::FIRST_INCOMING`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Unknown,
    OutgoingComplete,
    OutgoingDelivered,
    OutgoingDraft,
    OutgoingYetToSend,
    OutgoingSending,
    OutgoingResending,
    OutgoingAwaitingRetry,
    OutgoingFailed,
    OutgoingFailedEmergencyNumber,
    IncomingComplete,
    IncomingYetToManualDownload,
    IncomingRetryingManualDownload,
    IncomingManualDownloading,
    IncomingRetryingAutoDownload,
    IncomingAutoDownloading,
    IncomingDownloadFailed,
    IncomingExpiredOrNotAvailable,
}

impl MessageStatus {
    pub const FIRST_INCOMING: i32 = 100;

    const TABLE: &'static [(MessageStatus, i32)] = &[
        (Self::Unknown, 0),
        (Self::OutgoingComplete, 1),
        (Self::OutgoingDelivered, 2),
        (Self::OutgoingDraft, 3),
        (Self::OutgoingYetToSend, 4),
        (Self::OutgoingSending, 5),
        (Self::OutgoingResending, 6),
        (Self::OutgoingAwaitingRetry, 7),
        (Self::OutgoingFailed, 8),
        (Self::OutgoingFailedEmergencyNumber, 9),
        (Self::IncomingComplete, 100),
        (Self::IncomingYetToManualDownload, 101),
        (Self::IncomingRetryingManualDownload, 102),
        (Self::IncomingManualDownloading, 103),
        (Self::IncomingRetryingAutoDownload, 104),
        (Self::IncomingAutoDownloading, 105),
        (Self::IncomingDownloadFailed, 106),
        (Self::IncomingExpiredOrNotAvailable, 107),
    ];

    pub fn code(self) -> i32 {
        Self::TABLE
            .iter()
            .find(|(s, _)| *s == self)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::TABLE.iter().find(|(_, c)| *c == code).map(|(s, _)| *s)
    }

    pub fn is_incoming(self) -> bool {
        self.code() >= Self::FIRST_INCOMING
    }

    pub fn is_outgoing(self) -> bool {
        self != Self::Unknown && !self.is_incoming()
    }

    /// Status of an outgoing message after a send attempt classified as `tier`.
    pub fn after_send(tier: RetryTier) -> Self {
        match tier {
            RetryTier::Succeeded => Self::OutgoingComplete,
            RetryTier::AutoRetry => Self::OutgoingAwaitingRetry,
            RetryTier::ManualRetry | RetryTier::NoRetry => Self::OutgoingFailed,
        }
    }

    /// Status of an incoming message after a retrieve attempt classified as `tier`.
    pub fn after_retrieve(tier: RetryTier, auto_download: bool) -> Self {
        match tier {
            RetryTier::Succeeded => Self::IncomingComplete,
            RetryTier::AutoRetry if auto_download => Self::IncomingRetryingAutoDownload,
            RetryTier::AutoRetry => Self::IncomingRetryingManualDownload,
            RetryTier::ManualRetry => Self::IncomingDownloadFailed,
            RetryTier::NoRetry => Self::IncomingExpiredOrNotAvailable,
        }
    }
}

/// Telephony message box a synced MMS lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageBox {
    Inbox,
    Sent,
    Drafts,
    Outbox,
    Failed,
}

/// Initial status for an MMS imported from the telephony store.
pub fn bugle_status_for_mms(outgoing: bool, notification: bool, message_box: MessageBox) -> MessageStatus {
    if outgoing {
        match message_box {
            MessageBox::Outbox | MessageBox::Failed => MessageStatus::OutgoingFailed,
            _ => MessageStatus::OutgoingComplete,
        }
    } else if notification {
        MessageStatus::IncomingYetToManualDownload
    } else {
        MessageStatus::IncomingComplete
    }
}

/// Outcome of a send or download request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusPlusUri {
    /// `None` only for [`StatusPlusUri::PENDING`].
    pub tier: Option<RetryTier>,
    pub raw_status: i32,
    /// Locator of the record written for the message, when there is one.
    pub uri: Option<String>,
    pub result_code: i32,
}

impl StatusPlusUri {
    pub const UNKNOWN_RESULT_CODE: i32 = 0;

    /// The request was handed off and completes asynchronously.
    pub const PENDING: StatusPlusUri = StatusPlusUri {
        tier: None,
        raw_status: -1,
        uri: None,
        result_code: Self::UNKNOWN_RESULT_CODE,
    };

    pub fn new(tier: RetryTier, raw_status: i32, uri: Option<String>) -> Self {
        Self {
            tier: Some(tier),
            raw_status,
            uri,
            result_code: Self::UNKNOWN_RESULT_CODE,
        }
    }

    pub fn with_result_code(mut self, result_code: i32) -> Self {
        self.result_code = result_code;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.tier.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_status_table() {
        let cases: &[(i32, RetryTier)] = &[
            (0x80, RetryTier::Succeeded),
            (0x81, RetryTier::ManualRetry),
            (0x82, RetryTier::ManualRetry),
            (0x85, RetryTier::ManualRetry),
            (0x86, RetryTier::AutoRetry),
            (0x88, RetryTier::ManualRetry),
            (0xC0, RetryTier::AutoRetry),
            (0xC3, RetryTier::AutoRetry),
            (0xC4, RetryTier::AutoRetry),
            (0xDF, RetryTier::AutoRetry),
            (0xE0, RetryTier::NoRetry),
            (0xE1, RetryTier::NoRetry),
            (0xEB, RetryTier::NoRetry),
            (0xFF, RetryTier::NoRetry),
            (0x00, RetryTier::ManualRetry),
            (0xBF, RetryTier::ManualRetry),
            (-1, RetryTier::ManualRetry),
            (RAW_TELEPHONY_STATUS_MESSAGE_TOO_BIG, RetryTier::ManualRetry),
        ];
        for (raw, tier) in cases {
            assert_eq!(classify_send_status(*raw), *tier, "raw 0x{:X}", raw);
        }
    }

    #[test]
    fn retrieve_status_table() {
        let cases: &[(i32, RetryTier)] = &[
            (0x80, RetryTier::Succeeded),
            (0xC0, RetryTier::AutoRetry),
            (0xC2, RetryTier::AutoRetry),
            (0xE0, RetryTier::NoRetry),
            (0xE3, RetryTier::NoRetry),
            (0x86, RetryTier::ManualRetry),
            (0x81, RetryTier::ManualRetry),
            (0x100, RetryTier::ManualRetry),
        ];
        for (raw, tier) in cases {
            assert_eq!(classify_retrieve_status(*raw), *tier, "raw 0x{:X}", raw);
        }
    }

    #[test]
    fn error_category_table() {
        let s = MessageStatus::OutgoingFailed;
        let cases: &[(i32, ErrorCategory)] = &[
            (0x82, ErrorCategory::OutgoingServiceDenied),
            (0xE1, ErrorCategory::OutgoingServiceDenied),
            (0x84, ErrorCategory::OutgoingAddressUnresolved),
            (0xC1, ErrorCategory::OutgoingAddressUnresolved),
            (0xE3, ErrorCategory::OutgoingAddressUnresolved),
            (0x83, ErrorCategory::OutgoingFormatCorrupt),
            (0xE2, ErrorCategory::OutgoingFormatCorrupt),
            (0x87, ErrorCategory::OutgoingContentRejected),
            (0xE5, ErrorCategory::OutgoingContentRejected),
            (0x88, ErrorCategory::OutgoingUnsupported),
            (10000, ErrorCategory::OutgoingTooLarge),
            (0xE6, ErrorCategory::GenericSendFailed),
            (0xEB, ErrorCategory::GenericSendFailed),
            (0x85, ErrorCategory::GenericSendFailed),
            (-1, ErrorCategory::GenericSendFailed),
            (0x1234, ErrorCategory::GenericSendFailed),
        ];
        for (raw, cat) in cases {
            assert_eq!(classify_error_message(s, *raw), *cat, "raw 0x{:X}", raw);
        }
    }

    #[test]
    fn status_codes_round_trip_and_partition() {
        for (status, code) in MessageStatus::TABLE {
            assert_eq!(status.code(), *code);
            assert_eq!(MessageStatus::from_code(*code), Some(*status));
            assert_eq!(status.is_incoming(), *code >= 100);
        }
        assert!(!MessageStatus::Unknown.is_outgoing());
        assert_eq!(MessageStatus::from_code(50), None);
    }

    #[test]
    fn transitions() {
        assert_eq!(MessageStatus::after_send(RetryTier::AutoRetry), MessageStatus::OutgoingAwaitingRetry);
        assert_eq!(MessageStatus::after_send(RetryTier::NoRetry), MessageStatus::OutgoingFailed);
        assert_eq!(
            MessageStatus::after_retrieve(RetryTier::AutoRetry, false),
            MessageStatus::IncomingRetryingManualDownload
        );
        assert_eq!(
            MessageStatus::after_retrieve(RetryTier::NoRetry, true),
            MessageStatus::IncomingExpiredOrNotAvailable
        );
    }

    #[test]
    fn mms_import_status() {
        assert_eq!(bugle_status_for_mms(true, false, MessageBox::Outbox), MessageStatus::OutgoingFailed);
        assert_eq!(bugle_status_for_mms(true, false, MessageBox::Sent), MessageStatus::OutgoingComplete);
        assert_eq!(
            bugle_status_for_mms(false, true, MessageBox::Inbox),
            MessageStatus::IncomingYetToManualDownload
        );
        assert_eq!(bugle_status_for_mms(false, false, MessageBox::Inbox), MessageStatus::IncomingComplete);
    }

    #[test]
    fn pending_sentinel() {
        assert!(StatusPlusUri::PENDING.is_pending());
        assert_eq!(StatusPlusUri::PENDING.raw_status, -1);
        let done = StatusPlusUri::new(RetryTier::Succeeded, 0x80, Some("missiva://message/7".into()));
        assert!(!done.is_pending());
        assert_eq!(RetryTier::from_code(done.tier.unwrap().code()), done.tier);
        assert_eq!(RetryTier::ManualRetry.description(), "MANUAL_RETRY");
    }
}
