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

//! Draft lifecycle: in-memory compose state with async load/save, a cancellable pre-send
//! check, listener fan-out and stale-binding protection.
//!
//! A [`DraftMessageData`] lives on one owner thread (it is `!Send`). Storage and checks run on
//! the tokio blocking pool and report back through a channel that the owner drains with
//! [`DraftMessageData::process_events`] or awaits with [`DraftMessageData::next_event`].

mod binding;
mod check;
mod data;
mod listener;

use thiserror::Error;

use crate::store::StoreError;

pub use binding::Binding;
pub use check::{check_for_send, pre_check, CheckContext, CheckDraftResult, DraftSnapshot};
pub use data::{CheckDraftCallback, DraftMessageData};
pub use listener::{
    DraftMessageDataListener, ALL_CHANGED, ATTACHMENTS_CHANGED, MESSAGE_SUBJECT_CHANGED, MESSAGE_TEXT_CHANGED,
    SELF_CHANGED, WIDGET_CHANGED,
};

/// Observable state of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    Empty,
    Loading,
    /// Mirrors what is in storage.
    Cached,
    Edited,
    Checking,
    Sending,
}

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("loading draft for {conversation_id} failed: {source}")]
    Load {
        conversation_id: String,
        #[source]
        source: StoreError,
    },
    #[error("saving draft for {conversation_id} failed: {source}")]
    Save {
        conversation_id: String,
        #[source]
        source: StoreError,
    },
    #[error("draft worker for {0} stopped before reporting")]
    WorkerLost(String),
}
