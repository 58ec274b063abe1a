/*
 * dedup.rs
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

//! Duplicate detection for incoming MMS notifications.
//!
//! Carriers retransmit notification-ind PDUs. A new notification is a duplicate when a
//! stored notification-ind or retrieve-conf carries the same transaction id and has not
//! expired yet.

use tracing::{debug, error};

use crate::message_id::MessageId;
use crate::pdu::MessageType;
use crate::store::MessageStore;

/// Upper bound on ids returned by [`find_duplicates`].
pub const MAX_RETURN: usize = 32;

/// Record ids of live MMS records sharing `transaction_id`. `now` is seconds since epoch.
///
/// Returns an empty list when there is no transaction id or the store query fails.
pub fn find_duplicates(store: &dyn MessageStore, transaction_id: Option<&str>, now: i64) -> Vec<MessageId> {
    let tid = match transaction_id {
        Some(t) if !t.is_empty() => t,
        _ => return Vec::new(),
    };
    let records = match store.query_by_transaction_id(tid) {
        Ok(r) => r,
        Err(e) => {
            error!("[mms] dedup query for {} failed: {}", tid, e);
            return Vec::new();
        }
    };
    let notification = MessageType::NotificationInd.octet();
    let retrieve_conf = MessageType::RetrieveConf.octet();
    let ids: Vec<MessageId> = records
        .into_iter()
        .filter(|r| r.transaction_id == tid)
        .filter(|r| r.message_type == notification || r.message_type == retrieve_conf)
        .filter(|r| r.expiry > now)
        .map(|r| r.record_id)
        .take(MAX_RETURN)
        .collect();
    if !ids.is_empty() {
        debug!("[mms] {} duplicate(s) for transaction {}", ids.len(), tid);
    }
    ids
}
