/*
 * mod.rs
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

//! MMS transactions: send-req assembly, send-conf handling, notification receipt and
//! retrieve-conf handling on top of the PDU codec, the store and the status classifier.

mod receive;
mod send;

use thiserror::Error;

use crate::pdu::{MessageType, PduError};
use crate::smil::SmilError;
use crate::status::{RetryTier, StatusPlusUri, RAW_TELEPHONY_STATUS_MESSAGE_TOO_BIG, RAW_TELEPHONY_STATUS_UNDEFINED};
use crate::store::StoreError;

pub use receive::{
    build_acknowledge, build_notify_resp, process_notification, process_retrieve_conf, NotificationOutcome,
    PendingDownload, ReceiveContext, RetrieveOutcome,
};
pub use send::{build_send_req, handle_send_conf, prepare_send, record_send_status, PreparedSend, SMIL_SLOP_BYTES};

/// Default expiry requested for outgoing messages: seven days.
pub const DEFAULT_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

/// Current time in seconds since epoch.
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

#[derive(Debug, Error)]
pub enum MmsError {
    #[error(transparent)]
    Pdu(#[from] PduError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Smil(#[from] SmilError),
    #[error("message has no recipients")]
    NoRecipients,
    #[error("message size {size} exceeds limit {limit}")]
    TooLarge { size: u64, limit: u64 },
    #[error("expected {expected:?}, got {actual:?}")]
    UnexpectedPdu { expected: MessageType, actual: MessageType },
}

impl MmsError {
    /// Outcome to record for a send that failed before reaching the relay.
    pub fn to_status(&self) -> StatusPlusUri {
        match self {
            Self::TooLarge { .. } => StatusPlusUri::new(RetryTier::NoRetry, RAW_TELEPHONY_STATUS_MESSAGE_TOO_BIG, None),
            Self::NoRecipients => StatusPlusUri::new(RetryTier::NoRetry, RAW_TELEPHONY_STATUS_UNDEFINED, None),
            _ => StatusPlusUri::new(RetryTier::ManualRetry, RAW_TELEPHONY_STATUS_UNDEFINED, None),
        }
    }
}
