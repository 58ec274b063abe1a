/*
 * file_store.rs
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

//! File-backed [`MessageStore`] and [`MediaScratch`].
//!
//! Layout under the root directory:
//! - `drafts/<conversation>.json`: one [`PersistedDraft`] per conversation
//! - `messages/<row>.json`: one [`Message`] per record
//! - `scratch/<row>/<name>`: attachment data
//! - `tmp/`: staging for atomic writes (write then rename)
//!
//! Keys are made filesystem-safe with the local filename codec.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use tracing::warn;

use crate::localstorage::filename_codec;
use crate::message::Message;
use crate::message_id::MessageId;
use crate::status::MessageStatus;
use crate::store::{MediaScratch, MessageStore, NotificationRecord, PersistedDraft, StoreError};
use crate::uri;

const DRAFTS: &str = "drafts";
const MESSAGES: &str = "messages";
const SCRATCH: &str = "scratch";
const TMP: &str = "tmp";
const JSON_EXT: &str = ".json";

pub struct FileStore {
    root: PathBuf,
    next_row: AtomicU64,
    tmp_seq: AtomicU64,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        for sub in [DRAFTS, MESSAGES, SCRATCH, TMP] {
            fs::create_dir_all(root.join(sub))?;
        }
        let next_row = Self::max_row(&root.join(MESSAGES))?.max(Self::max_row(&root.join(SCRATCH))?) + 1;
        Ok(Self {
            root,
            next_row: AtomicU64::new(next_row),
            tmp_seq: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Highest numeric file stem in `dir`, 0 if none.
    fn max_row(dir: &Path) -> Result<u64, StoreError> {
        let mut max = 0;
        for entry in fs::read_dir(dir)? {
            let name = entry?.file_name();
            let name = name.to_string_lossy();
            let stem = name.strip_suffix(JSON_EXT).unwrap_or(&name);
            if let Ok(row) = stem.parse::<u64>() {
                max = max.max(row);
            }
        }
        Ok(max)
    }

    fn allocate_row(&self) -> u64 {
        self.next_row.fetch_add(1, Ordering::SeqCst)
    }

    fn draft_path(&self, conversation_id: &str) -> PathBuf {
        self.root
            .join(DRAFTS)
            .join(format!("{}{}", filename_codec::encode(conversation_id), JSON_EXT))
    }

    fn message_path(&self, row: u64) -> PathBuf {
        self.root.join(MESSAGES).join(format!("{}{}", row, JSON_EXT))
    }

    fn message_path_for(&self, id: &MessageId) -> Result<PathBuf, StoreError> {
        let row = id.row_id().ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(self.message_path(row))
    }

    /// Write via tmp/ and rename so readers never see a partial file.
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), StoreError> {
        let name = path
            .file_name()
            .ok_or_else(|| StoreError::new(format!("bad path {}", path.display())))?;
        let tmp = self.root.join(TMP).join(format!(
            "{}.{}.{}",
            std::process::id(),
            self.tmp_seq.fetch_add(1, Ordering::SeqCst),
            name.to_string_lossy()
        ));
        fs::write(&tmp, data)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn read_message_file(path: &Path) -> Result<Option<Message>, StoreError> {
        match fs::read(path) {
            Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn all_messages(&self) -> Result<Vec<Message>, StoreError> {
        let mut out = Vec::new();
        for entry in fs::read_dir(self.root.join(MESSAGES))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_message_file(&path) {
                Ok(Some(m)) => out.push(m),
                Ok(None) => {}
                Err(e) => warn!("[store] skipping unreadable record {}: {}", path.display(), e),
            }
        }
        Ok(out)
    }
}

impl MessageStore for FileStore {
    fn read_draft(&self, conversation_id: &str) -> Result<Option<PersistedDraft>, StoreError> {
        match fs::read(self.draft_path(conversation_id)) {
            Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_draft(&self, draft: &PersistedDraft) -> Result<(), StoreError> {
        let path = self.draft_path(&draft.conversation_id);
        if draft.is_empty() {
            return match fs::remove_file(&path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        self.write_atomic(&path, &serde_json::to_vec_pretty(draft)?)
    }

    fn insert_message(&self, message: &Message) -> Result<MessageId, StoreError> {
        let row = self.allocate_row();
        let id = MessageId::from_row(row);
        let mut stored = message.clone();
        stored.id = Some(id.clone());
        self.write_atomic(&self.message_path(row), &serde_json::to_vec_pretty(&stored)?)?;
        Ok(id)
    }

    fn update_status(&self, id: &MessageId, status: MessageStatus, raw_status: i32) -> Result<(), StoreError> {
        let path = self.message_path_for(id)?;
        let mut message = Self::read_message_file(&path)?.ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        message.status = status;
        message.raw_status = raw_status;
        self.write_atomic(&path, &serde_json::to_vec_pretty(&message)?)
    }

    fn query_by_transaction_id(&self, transaction_id: &str) -> Result<Vec<NotificationRecord>, StoreError> {
        let mut records: Vec<NotificationRecord> = self
            .all_messages()?
            .iter()
            .filter_map(NotificationRecord::from_message)
            .filter(|r| r.transaction_id == transaction_id)
            .collect();
        records.sort_by_key(|r| r.record_id.row_id());
        Ok(records)
    }

    fn get_message(&self, id: &MessageId) -> Result<Option<Message>, StoreError> {
        Self::read_message_file(&self.message_path_for(id)?)
    }
}

impl MediaScratch for FileStore {
    fn write_part(&self, _content_type: &str, name: &str, data: &[u8]) -> Result<String, StoreError> {
        let row = self.allocate_row();
        let dir = self.root.join(SCRATCH).join(row.to_string());
        fs::create_dir_all(&dir)?;
        self.write_atomic(&dir.join(filename_codec::encode(name)), data)?;
        Ok(uri::scratch_part_uri(&row.to_string(), name))
    }

    fn read_part(&self, locator: &str) -> Result<Bytes, StoreError> {
        let (id, name) = uri::parse_scratch_part_uri(locator).ok_or_else(|| StoreError::NotFound(locator.to_string()))?;
        let path = self
            .root
            .join(SCRATCH)
            .join(filename_codec::encode(&id))
            .join(filename_codec::encode(&name));
        match fs::read(&path) {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(locator.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessagePart, MmsInfo};

    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("missiva-filestore-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn draft_persistence() {
        let root = temp_root("draft");
        let store = FileStore::new(&root).unwrap();
        let draft = PersistedDraft {
            conversation_id: "+1 555/0100".into(),
            self_id: Some("sim1".into()),
            text: "see you".into(),
            subject: String::new(),
            attachments: vec![MessagePart::media("image/png", "missiva://scratch/1/a.png").with_size(9)],
        };
        store.write_draft(&draft).unwrap();
        let reopened = FileStore::new(&root).unwrap();
        assert_eq!(reopened.read_draft("+1 555/0100").unwrap(), Some(draft.clone()));
        reopened
            .write_draft(&PersistedDraft {
                conversation_id: draft.conversation_id.clone(),
                ..PersistedDraft::default()
            })
            .unwrap();
        assert_eq!(reopened.read_draft("+1 555/0100").unwrap(), None);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn messages_and_rows_survive_reopen() {
        let root = temp_root("messages");
        let store = FileStore::new(&root).unwrap();
        let mut m = Message::draft("c", None, "hi", "", &[]);
        m.mms = Some(MmsInfo {
            transaction_id: Some("T".into()),
            expiry: Some(50),
            message_type: Some(0x82),
            ..MmsInfo::default()
        });
        let first = store.insert_message(&m).unwrap();
        store.update_status(&first, MessageStatus::IncomingComplete, 0x80).unwrap();

        let reopened = FileStore::new(&root).unwrap();
        let second = reopened.insert_message(&m).unwrap();
        assert!(second.row_id() > first.row_id());
        let got = reopened.get_message(&first).unwrap().unwrap();
        assert_eq!(got.status, MessageStatus::IncomingComplete);
        assert_eq!(got.id, Some(first.clone()));
        let records = reopened.query_by_transaction_id("T").unwrap();
        assert_eq!(records.iter().map(|r| r.record_id.clone()).collect::<Vec<_>>(), vec![first, second]);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn scratch_parts() {
        let root = temp_root("scratch");
        let store = FileStore::new(&root).unwrap();
        let loc = store.write_part("image/jpeg", "my photo.jpg", b"\xff\xd8").unwrap();
        assert_eq!(&store.read_part(&loc).unwrap()[..], b"\xff\xd8");
        assert!(matches!(store.read_part("missiva://scratch/999/x"), Err(StoreError::NotFound(_))));
        assert!(store.read_part("bogus").is_err());
        let _ = fs::remove_dir_all(&root);
    }
}
