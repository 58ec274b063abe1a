/*
 * data.rs
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

//! [`DraftMessageData`]: the draft of one conversation.

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, warn};

use crate::draft::binding::{Binding, BindingState};
use crate::draft::check::{check_for_send, pre_check, CheckContext, CheckDraftResult, DraftSnapshot};
use crate::draft::listener::*;
use crate::draft::{DraftError, DraftState};
use crate::message::text_stats::MessageTextStats;
use crate::message::{Message, MessagePart};
use crate::store::{MessageStore, PersistedDraft, StoreError};

/// Called on the owner thread with the check result, unless the check was superseded.
pub type CheckDraftCallback = Box<dyn FnOnce(&DraftMessageData, CheckDraftResult)>;

/// Which background job an event belongs to.
#[derive(Debug, Clone, Copy)]
enum Job {
    Load(Binding),
    Save,
    Check(u64),
}

enum DraftEvent {
    Loaded {
        binding: Binding,
        result: Result<Option<PersistedDraft>, StoreError>,
    },
    Saved(Result<(), StoreError>),
    Checked {
        task_id: u64,
        result: CheckDraftResult,
    },
    /// The worker panicked before producing an event.
    Lost(Job),
}

struct CheckTask {
    id: u64,
    binding: Binding,
    cancelled: Arc<AtomicBool>,
    callback: CheckDraftCallback,
}

pub struct DraftMessageData {
    conversation_id: String,
    text: String,
    subject: String,
    self_id: Option<String>,
    attachments: Vec<MessagePart>,
    text_stats: MessageTextStats,
    sending: bool,
    /// Local copy equals what is in storage; a load may be skipped.
    cached: bool,
    listeners: Vec<Rc<dyn DraftMessageDataListener>>,
    bindings: BindingState,
    /// Binding of the load in flight, if any.
    loading: Option<Binding>,
    check: Option<CheckTask>,
    next_task_id: u64,
    last_error: Option<DraftError>,
    store: Arc<dyn MessageStore>,
    runtime: Handle,
    tx: UnboundedSender<DraftEvent>,
    rx: UnboundedReceiver<DraftEvent>,
}

impl DraftMessageData {
    pub fn new(conversation_id: impl Into<String>, store: Arc<dyn MessageStore>, runtime: Handle) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            conversation_id: conversation_id.into(),
            text: String::new(),
            subject: String::new(),
            self_id: None,
            attachments: Vec::new(),
            text_stats: MessageTextStats::default(),
            sending: false,
            cached: false,
            listeners: Vec::new(),
            bindings: BindingState::default(),
            loading: None,
            check: None,
            next_task_id: 0,
            last_error: None,
            store,
            runtime,
            tx,
            rx,
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn message_text(&self) -> &str {
        &self.text
    }

    pub fn message_subject(&self) -> &str {
        &self.subject
    }

    pub fn self_id(&self) -> Option<&str> {
        self.self_id.as_deref()
    }

    pub fn attachments(&self) -> &[MessagePart] {
        &self.attachments
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.subject.is_empty() && self.attachments.is_empty()
    }

    pub fn num_messages_to_be_sent(&self) -> usize {
        self.text_stats.num_messages_to_be_sent()
    }

    pub fn code_points_remaining_in_current_message(&self) -> usize {
        self.text_stats.code_points_remaining_in_current_message()
    }

    pub fn state(&self) -> DraftState {
        if self.sending {
            DraftState::Sending
        } else if self.is_checking_draft() {
            DraftState::Checking
        } else if self.loading.is_some() {
            DraftState::Loading
        } else if self.cached {
            DraftState::Cached
        } else if self.is_empty() {
            DraftState::Empty
        } else {
            DraftState::Edited
        }
    }

    /// Most recent background failure, cleared by reading it.
    pub fn take_error(&mut self) -> Option<DraftError> {
        self.last_error.take()
    }

    // Binding and listeners

    pub fn bind(&mut self) -> Binding {
        self.bindings.bind()
    }

    /// Drop the current binding and all listeners. Completions for the old binding are
    /// discarded when they arrive.
    pub fn unbind(&mut self) {
        self.bindings.unbind();
        self.loading = None;
        self.cancel_check();
        self.listeners.clear();
    }

    pub fn is_bound(&self, binding: Binding) -> bool {
        self.bindings.is_bound(binding)
    }

    /// Register a listener. Adding the same handle twice has no effect.
    pub fn add_listener(&mut self, listener: Rc<dyn DraftMessageDataListener>) {
        if !self.listeners.iter().any(|l| Rc::ptr_eq(l, &listener)) {
            self.listeners.push(listener);
        }
    }

    pub fn remove_listener(&mut self, listener: &Rc<dyn DraftMessageDataListener>) {
        self.listeners.retain(|l| !Rc::ptr_eq(l, listener));
    }

    fn dispatch_changed(&mut self, change_flags: u32) {
        if self.cached {
            return;
        }
        self.cancel_check();
        let listeners = self.listeners.clone();
        for l in &listeners {
            l.on_draft_changed(self, change_flags);
        }
    }

    /// The draft was changed by something other than this editor.
    pub fn external_draft_changed(&mut self) {
        self.dispatch_changed(WIDGET_CHANGED);
    }

    // Edits

    fn edited(&mut self) {
        self.cached = false;
        self.cancel_check();
    }

    fn set_text_internal(&mut self, text: &str, notify: bool) {
        self.text = text.to_string();
        self.text_stats.update(&self.text);
        if notify {
            self.dispatch_changed(MESSAGE_TEXT_CHANGED);
        }
    }

    fn set_subject_internal(&mut self, subject: &str, notify: bool) {
        self.subject = subject.to_string();
        if notify {
            self.dispatch_changed(MESSAGE_SUBJECT_CHANGED);
        }
    }

    /// Text edits come from the editor itself, so listeners are not told.
    pub fn set_message_text(&mut self, text: &str) {
        self.edited();
        self.set_text_internal(text, false);
    }

    pub fn set_message_subject(&mut self, subject: &str) {
        self.edited();
        self.set_subject_internal(subject, false);
    }

    pub fn set_self_id(&mut self, self_id: Option<&str>, notify: bool) {
        debug!("[draft] set self id {:?} for {}", self_id, self.conversation_id);
        self.edited();
        self.self_id = self_id.map(str::to_string);
        if notify {
            self.dispatch_changed(SELF_CHANGED);
        }
    }

    /// Append attachments, skipping any whose data locator is already attached.
    pub fn add_attachments(&mut self, parts: impl IntoIterator<Item = MessagePart>) {
        self.edited();
        for part in parts {
            let dup = part.content_uri.is_some()
                && self.attachments.iter().any(|a| a.content_uri == part.content_uri);
            if !dup {
                self.attachments.push(part);
            }
        }
        self.dispatch_changed(ATTACHMENTS_CHANGED);
    }

    /// Remove the attachment with this data locator. Returns whether one was removed.
    pub fn remove_attachment(&mut self, content_uri: &str) -> bool {
        let before = self.attachments.len();
        self.attachments.retain(|a| a.content_uri.as_deref() != Some(content_uri));
        if self.attachments.len() == before {
            return false;
        }
        self.edited();
        self.dispatch_changed(ATTACHMENTS_CHANGED);
        true
    }

    pub fn clear_attachments(&mut self) {
        self.edited();
        self.attachments.clear();
        self.dispatch_changed(ATTACHMENTS_CHANGED);
    }

    fn clear_local_draft_copy(&mut self) {
        self.cached = false;
        self.attachments.clear();
        self.set_text_internal("", false);
        self.set_subject_internal("", false);
    }

    fn to_persisted(&self) -> PersistedDraft {
        PersistedDraft {
            conversation_id: self.conversation_id.clone(),
            self_id: self.self_id.clone(),
            text: self.text.clone(),
            subject: self.subject.clone(),
            attachments: self.attachments.iter().filter(|a| !a.pending).cloned().collect(),
        }
    }

    // Background work

    fn spawn_job<F>(&self, job: Job, work: F)
    where
        F: FnOnce() -> DraftEvent + Send + 'static,
    {
        let tx = self.tx.clone();
        let worker = self.runtime.spawn_blocking(work);
        self.runtime.spawn(async move {
            let event = match worker.await {
                Ok(event) => event,
                Err(e) => {
                    error!("[draft] {:?} worker failed: {}", job, e);
                    DraftEvent::Lost(job)
                }
            };
            // Owner gone: nothing left to tell.
            let _ = tx.send(event);
        });
    }

    /// Start loading the stored draft, or writing `incoming` and then adopting it.
    ///
    /// Skipped (returns false) when a cached copy is held, a load is in flight, or `binding`
    /// is not current. Either way the cached flag is cleared.
    pub fn load_from_storage(&mut self, binding: Binding, incoming: Option<PersistedDraft>, clear_local: bool) -> bool {
        debug!(
            "[draft] {} for {}",
            if incoming.is_some() { "setting" } else { "loading" },
            self.conversation_id
        );
        if clear_local {
            self.clear_local_draft_copy();
        }
        let was_cached = self.cached;
        self.cached = false;
        if self.loading.is_some() || was_cached || !self.bindings.is_bound(binding) {
            return false;
        }
        self.loading = Some(binding);
        let store = Arc::clone(&self.store);
        let conversation_id = self.conversation_id.clone();
        self.spawn_job(Job::Load(binding), move || {
            let result = match incoming {
                Some(draft) => store.write_draft(&draft).map(|_| Some(draft)),
                None => store.read_draft(&conversation_id),
            };
            DraftEvent::Loaded { binding, result }
        });
        true
    }

    /// Adopt a draft read from storage unless the user has already diverged from it; in that
    /// case only listeners are told that the self identity arrived.
    pub fn update_from_message_data(&mut self, draft: &PersistedDraft, binding: Binding) {
        if !self.bindings.is_bound(binding) {
            warn!("[draft] update for {} with stale binding ignored", self.conversation_id);
            return;
        }
        self.cached = false;
        let unchanged = self.text == draft.text && self.subject == draft.subject && self.attachments.is_empty();
        if self.is_empty() || unchanged {
            self.set_text_internal(&draft.text, false);
            self.set_subject_internal(&draft.subject, false);
            self.attachments = draft.attachments.clone();
            self.dispatch_changed(ALL_CHANGED);
            self.cached = true;
        } else {
            self.dispatch_changed(SELF_CHANGED);
        }
    }

    /// Persist the draft on a worker. Pending attachments are dropped first; the local copy
    /// then mirrors storage. Returns false when `binding` is not current.
    pub fn save_to_storage(&mut self, binding: Binding) -> bool {
        let before = self.attachments.len();
        self.attachments.retain(|a| !a.pending);
        if self.attachments.len() != before {
            debug!("[draft] dropped {} pending attachment(s)", before - self.attachments.len());
            self.dispatch_changed(ATTACHMENTS_CHANGED);
        }
        let draft = self.to_persisted();
        self.cached = true;
        if !self.bindings.is_bound(binding) {
            debug!("[draft] save for {} skipped: not bound", self.conversation_id);
            return false;
        }
        let store = Arc::clone(&self.store);
        self.spawn_job(Job::Save, move || DraftEvent::Saved(store.write_draft(&draft)));
        true
    }

    /// Assemble the message to send, pending attachments included, and empty the draft in
    /// memory and in storage.
    pub fn prepare_message_for_sending(&mut self, binding: Binding) -> Message {
        self.sending = true;
        let message = Message::draft(
            &self.conversation_id,
            self.self_id.as_deref(),
            &self.text,
            &self.subject,
            &self.attachments,
        );
        self.clear_local_draft_copy();
        self.dispatch_changed(ALL_CHANGED);
        if self.bindings.is_bound(binding) {
            let store = Arc::clone(&self.store);
            let cleared = PersistedDraft {
                conversation_id: self.conversation_id.clone(),
                self_id: self.self_id.clone(),
                ..PersistedDraft::default()
            };
            self.spawn_job(Job::Save, move || DraftEvent::Saved(store.write_draft(&cleared)));
        } else {
            warn!("[draft] sending {} while not bound; stored draft kept", self.conversation_id);
        }
        self.sending = false;
        message
    }

    pub fn is_checking_draft(&self) -> bool {
        self.check
            .as_ref()
            .is_some_and(|t| !t.cancelled.load(Ordering::SeqCst))
    }

    fn cancel_check(&mut self) {
        if let Some(task) = self.check.take() {
            task.cancelled.store(true, Ordering::SeqCst);
            debug!("[draft] check {} cancelled", task.id);
        }
    }

    /// Validate the draft before sending. Attachments are snapshotted here; the callback runs
    /// from [`Self::process_events`] if the check is still current and `binding` still bound.
    pub fn check_draft_for_action(
        &mut self,
        check_size: bool,
        ctx: CheckContext,
        callback: CheckDraftCallback,
        binding: Binding,
    ) {
        self.cancel_check();
        let pre = pre_check(&self.attachments, &ctx);
        let snapshot = DraftSnapshot {
            text_bytes: self.text.len() as u64,
            subject_bytes: self.subject.len() as u64,
            attachments: self.attachments.clone(),
        };
        self.next_task_id += 1;
        let id = self.next_task_id;
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        self.check = Some(CheckTask {
            id,
            binding,
            cancelled,
            callback,
        });
        self.spawn_job(Job::Check(id), move || {
            let result = if pre != CheckDraftResult::Passed || flag.load(Ordering::SeqCst) {
                pre
            } else {
                check_for_send(&snapshot, check_size, &ctx)
            };
            DraftEvent::Checked { task_id: id, result }
        });
    }

    // Event handling

    /// Handle every completion that has arrived. Returns how many were handled.
    pub fn process_events(&mut self) -> usize {
        let mut n = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.handle_event(event);
            n += 1;
        }
        n
    }

    /// Wait for the next completion and handle it. Returns false if none can arrive.
    pub async fn next_event(&mut self) -> bool {
        match self.rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    fn handle_event(&mut self, event: DraftEvent) {
        match event {
            DraftEvent::Loaded { binding, result } => self.on_loaded(binding, result),
            DraftEvent::Saved(Ok(())) => debug!("[draft] saved {}", self.conversation_id),
            DraftEvent::Saved(Err(source)) => {
                error!("[draft] save for {} failed: {}", self.conversation_id, source);
                self.last_error = Some(DraftError::Save {
                    conversation_id: self.conversation_id.clone(),
                    source,
                });
            }
            DraftEvent::Checked { task_id, result } => self.on_checked(task_id, result),
            DraftEvent::Lost(job) => {
                match job {
                    Job::Load(b) if self.loading == Some(b) => self.loading = None,
                    Job::Check(id) if self.check.as_ref().is_some_and(|t| t.id == id) => self.check = None,
                    _ => {}
                }
                self.last_error = Some(DraftError::WorkerLost(self.conversation_id.clone()));
            }
        }
    }

    fn on_loaded(&mut self, binding: Binding, result: Result<Option<PersistedDraft>, StoreError>) {
        if self.loading == Some(binding) {
            self.loading = None;
        }
        if !self.bindings.is_bound(binding) {
            warn!("[draft] draft loaded but not bound: {}", self.conversation_id);
            return;
        }
        match result {
            Ok(loaded) => {
                let draft = loaded.unwrap_or_else(|| PersistedDraft {
                    conversation_id: self.conversation_id.clone(),
                    self_id: self.self_id.clone(),
                    ..PersistedDraft::default()
                });
                self.self_id = draft.self_id.clone();
                self.update_from_message_data(&draft, binding);
                debug!("[draft] loaded {} self={:?}", self.conversation_id, self.self_id);
            }
            Err(source) => {
                warn!("[draft] draft not loaded for {}: {}", self.conversation_id, source);
                self.cached = false;
                self.last_error = Some(DraftError::Load {
                    conversation_id: self.conversation_id.clone(),
                    source,
                });
            }
        }
    }

    fn on_checked(&mut self, task_id: u64, result: CheckDraftResult) {
        let task = match self.check.take() {
            Some(t) if t.id == task_id => t,
            other => {
                self.check = other;
                debug!("[draft] superseded check {} result dropped", task_id);
                return;
            }
        };
        if task.cancelled.load(Ordering::SeqCst) {
            warn!("[draft] message can't be sent: check cancelled");
            return;
        }
        if !self.bindings.is_bound(task.binding) {
            warn!("[draft] message can't be sent: draft not bound");
            return;
        }
        (task.callback)(self, result);
    }
}
