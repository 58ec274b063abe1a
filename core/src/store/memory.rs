/*
 * memory.rs
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

//! In-memory store, for tests and for hosts that persist elsewhere.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use bytes::Bytes;

use crate::message::Message;
use crate::message_id::MessageId;
use crate::status::MessageStatus;
use crate::store::error::StoreError;
use crate::store::store::{MediaScratch, MessageStore, NotificationRecord, PersistedDraft};
use crate::uri;

#[derive(Default)]
pub struct MemoryStore {
    next_row: AtomicU64,
    drafts: Mutex<HashMap<String, PersistedDraft>>,
    messages: Mutex<Vec<Message>>,
    scratch: Mutex<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_row: AtomicU64::new(1),
            ..Self::default()
        }
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or(0)
    }

    fn poisoned() -> StoreError {
        StoreError::new("store lock poisoned")
    }
}

impl MessageStore for MemoryStore {
    fn read_draft(&self, conversation_id: &str) -> Result<Option<PersistedDraft>, StoreError> {
        let drafts = self.drafts.lock().map_err(|_| Self::poisoned())?;
        Ok(drafts.get(conversation_id).cloned())
    }

    fn write_draft(&self, draft: &PersistedDraft) -> Result<(), StoreError> {
        let mut drafts = self.drafts.lock().map_err(|_| Self::poisoned())?;
        if draft.is_empty() {
            drafts.remove(&draft.conversation_id);
        } else {
            drafts.insert(draft.conversation_id.clone(), draft.clone());
        }
        Ok(())
    }

    fn insert_message(&self, message: &Message) -> Result<MessageId, StoreError> {
        let row = self.next_row.fetch_add(1, Ordering::SeqCst).max(1);
        let id = MessageId::from_row(row);
        let mut stored = message.clone();
        stored.id = Some(id.clone());
        self.messages.lock().map_err(|_| Self::poisoned())?.push(stored);
        Ok(id)
    }

    fn update_status(&self, id: &MessageId, status: MessageStatus, raw_status: i32) -> Result<(), StoreError> {
        let mut messages = self.messages.lock().map_err(|_| Self::poisoned())?;
        let m = messages
            .iter_mut()
            .find(|m| m.id.as_ref() == Some(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        m.status = status;
        m.raw_status = raw_status;
        Ok(())
    }

    fn query_by_transaction_id(&self, transaction_id: &str) -> Result<Vec<NotificationRecord>, StoreError> {
        let messages = self.messages.lock().map_err(|_| Self::poisoned())?;
        Ok(messages
            .iter()
            .filter_map(NotificationRecord::from_message)
            .filter(|r| r.transaction_id == transaction_id)
            .collect())
    }

    fn get_message(&self, id: &MessageId) -> Result<Option<Message>, StoreError> {
        let messages = self.messages.lock().map_err(|_| Self::poisoned())?;
        Ok(messages.iter().find(|m| m.id.as_ref() == Some(id)).cloned())
    }
}

impl MediaScratch for MemoryStore {
    fn write_part(&self, _content_type: &str, name: &str, data: &[u8]) -> Result<String, StoreError> {
        let row = self.next_row.fetch_add(1, Ordering::SeqCst).max(1);
        let locator = uri::scratch_part_uri(&row.to_string(), name);
        self.scratch
            .lock()
            .map_err(|_| Self::poisoned())?
            .insert(locator.clone(), Bytes::copy_from_slice(data));
        Ok(locator)
    }

    fn read_part(&self, locator: &str) -> Result<Bytes, StoreError> {
        self.scratch
            .lock()
            .map_err(|_| Self::poisoned())?
            .get(locator)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(locator.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessagePart, MmsInfo};

    #[test]
    fn empty_draft_write_removes() {
        let store = MemoryStore::new();
        let draft = PersistedDraft {
            conversation_id: "c".into(),
            text: "hello".into(),
            ..PersistedDraft::default()
        };
        store.write_draft(&draft).unwrap();
        assert_eq!(store.read_draft("c").unwrap(), Some(draft));
        store
            .write_draft(&PersistedDraft {
                conversation_id: "c".into(),
                ..PersistedDraft::default()
            })
            .unwrap();
        assert_eq!(store.read_draft("c").unwrap(), None);
    }

    #[test]
    fn insert_query_update() {
        let store = MemoryStore::new();
        let mut m = Message::draft("c", None, "x", "s", &[]);
        m.mms = Some(MmsInfo {
            transaction_id: Some("T".into()),
            expiry: Some(100),
            message_type: Some(0x82),
            ..MmsInfo::default()
        });
        let id = store.insert_message(&m).unwrap();
        assert_eq!(id.row_id(), Some(1));
        let records = store.query_by_transaction_id("T").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record_id, id);
        assert!(store.query_by_transaction_id("U").unwrap().is_empty());

        store.update_status(&id, MessageStatus::IncomingComplete, 0x80).unwrap();
        assert_eq!(store.get_message(&id).unwrap().unwrap().status, MessageStatus::IncomingComplete);
        assert!(store
            .update_status(&MessageId::from_row(99), MessageStatus::Unknown, 0)
            .is_err());
    }

    #[test]
    fn scratch_round_trip() {
        let store = MemoryStore::new();
        let loc = store.write_part("image/png", "a.png", b"png").unwrap();
        assert!(loc.starts_with("missiva://scratch/"));
        assert_eq!(&store.read_part(&loc).unwrap()[..], b"png");
        assert!(store.read_part("missiva://scratch/0/none").is_err());
        let _ = MessagePart::media("image/png", loc);
    }
}
