/*
 * store.rs
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

//! Persistence boundary: message records, drafts and scratch media.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::message::{Message, MessagePart};
use crate::message_id::MessageId;
use crate::status::MessageStatus;
use crate::store::error::StoreError;

/// Storage form of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersistedDraft {
    pub conversation_id: String,
    pub self_id: Option<String>,
    pub text: String,
    pub subject: String,
    pub attachments: Vec<MessagePart>,
}

impl PersistedDraft {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.subject.is_empty() && self.attachments.is_empty()
    }
}

/// What dedup needs to know about a stored MMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub record_id: MessageId,
    pub transaction_id: String,
    /// Seconds since epoch; 0 when unknown.
    pub expiry: i64,
    pub message_type: u8,
}

impl NotificationRecord {
    /// Derive from a stored message; `None` if it carries no MMS transaction id or type.
    pub fn from_message(message: &Message) -> Option<Self> {
        let mms = message.mms.as_ref()?;
        Some(Self {
            record_id: message.id.clone()?,
            transaction_id: mms.transaction_id.clone()?,
            expiry: mms.expiry.unwrap_or(0),
            message_type: mms.message_type?,
        })
    }
}

/// Message and draft persistence. Implementations are shared across worker threads.
pub trait MessageStore: Send + Sync {
    /// Draft for a conversation, if one has been written.
    fn read_draft(&self, conversation_id: &str) -> Result<Option<PersistedDraft>, StoreError>;

    /// Replace the draft for `draft.conversation_id`. An empty draft removes it.
    fn write_draft(&self, draft: &PersistedDraft) -> Result<(), StoreError>;

    /// Insert a message and return its record id.
    fn insert_message(&self, message: &Message) -> Result<MessageId, StoreError>;

    fn update_status(&self, id: &MessageId, status: MessageStatus, raw_status: i32) -> Result<(), StoreError>;

    /// Stored MMS records whose transaction id equals `transaction_id`.
    fn query_by_transaction_id(&self, transaction_id: &str) -> Result<Vec<NotificationRecord>, StoreError>;

    fn get_message(&self, id: &MessageId) -> Result<Option<Message>, StoreError>;
}

/// Owner of attachment data referenced by [`MessagePart::content_uri`].
pub trait MediaScratch: Send + Sync {
    /// Store part data and return its locator.
    fn write_part(&self, content_type: &str, name: &str, data: &[u8]) -> Result<String, StoreError>;

    fn read_part(&self, locator: &str) -> Result<Bytes, StoreError>;
}
