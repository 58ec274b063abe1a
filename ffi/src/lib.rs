/*
 * lib.rs
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

//! C FFI for the missiva core. Stores are identified by URI; drafts by an opaque handle.
//! Functions returning `char *` allocate; free with missiva_free_string.
//! All string parameters are UTF-8 NUL-terminated.
//!
//! Draft handles belong to the thread that created them: every missiva_draft_* call for a
//! handle must come from that thread, and listener and check callbacks run on it from
//! missiva_draft_process_events.

use libc::{c_char, c_int, c_void, size_t};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::fmt::Display;
use std::ptr;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use missiva_core::draft::{Binding, CheckContext, CheckDraftResult, DraftMessageData, DraftMessageDataListener, DraftState};
use missiva_core::localstorage::FileStore;
use missiva_core::message::MessagePart;
use missiva_core::pdu;
use missiva_core::status::{classify_error_message, classify_retrieve_status, classify_send_status, MessageStatus};
use missiva_core::uri::file_store_uri;

/// Draft change callback: (draft handle, change flags, user data).
type OnDraftChanged = extern "C" fn(u64, c_int, *mut c_void);
/// Draft check callback: (draft handle, result code, user data).
type OnDraftChecked = extern "C" fn(u64, c_int, *mut c_void);

/// Registry of stores keyed by URI. Hosts the tokio runtime that draft workers run on.
struct Registry {
    runtime: tokio::runtime::Runtime,
    stores: RwLock<HashMap<String, Arc<FileStore>>>,
    next_draft: AtomicU64,
}

fn registry() -> &'static Registry {
    static REGISTRY: once_cell::sync::OnceCell<Registry> = once_cell::sync::OnceCell::new();
    REGISTRY.get_or_init(|| {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(4)
            .build()
            .expect("failed to create tokio runtime");
        Registry {
            runtime,
            stores: RwLock::new(HashMap::new()),
            next_draft: AtomicU64::new(1),
        }
    })
}

struct DraftHolder {
    data: DraftMessageData,
    binding: Binding,
}

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = RefCell::new(None);
    static DRAFTS: RefCell<HashMap<u64, DraftHolder>> = RefCell::new(HashMap::new());
}

fn set_last_error(err: impl Display) {
    let msg = CString::new(err.to_string()).unwrap_or_default();
    LAST_ERROR.with(|e| *e.borrow_mut() = Some(msg));
}

fn clear_last_error() {
    LAST_ERROR.with(|e| *e.borrow_mut() = None);
}

unsafe fn ptr_to_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(str::to_string)
}

fn to_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c) => c.into_raw(),
        Err(e) => {
            set_last_error(e);
            ptr::null_mut()
        }
    }
}

/// Run `f` on the draft for `handle`. Fails (returns None) for unknown handles and for calls
/// made from inside a callback of the same thread's drafts.
fn with_draft<R>(handle: u64, f: impl FnOnce(&mut DraftHolder) -> R) -> Option<R> {
    DRAFTS.with(|drafts| {
        let Ok(mut drafts) = drafts.try_borrow_mut() else {
            set_last_error("draft call made from a draft callback");
            return None;
        };
        match drafts.get_mut(&handle) {
            Some(holder) => {
                clear_last_error();
                Some(f(holder))
            }
            None => {
                set_last_error(format!("no draft with handle {}", handle));
                None
            }
        }
    })
}

struct CListener {
    handle: u64,
    callback: OnDraftChanged,
    user_data: *mut c_void,
}

impl DraftMessageDataListener for CListener {
    fn on_draft_changed(&self, _data: &DraftMessageData, change_flags: u32) {
        (self.callback)(self.handle, change_flags as c_int, self.user_data);
    }
}

/// Version string (static, do not free).
#[no_mangle]
pub extern "C" fn missiva_version() -> *const c_char {
    b"0.1.0\0".as_ptr() as *const c_char
}

/// Last error message from a failed call on this thread. Valid until the next FFI call. Do not free.
#[no_mangle]
pub extern "C" fn missiva_last_error() -> *const c_char {
    LAST_ERROR.with(|e| e.borrow().as_ref().map(|s| s.as_ptr()).unwrap_or(ptr::null()))
}

/// Free a string returned by this library. No-op if ptr is NULL.
#[no_mangle]
pub unsafe extern "C" fn missiva_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        let _ = CString::from_raw(ptr);
    }
}

// ---------- Status ----------

/// Retry tier code (0 succeeded, 1 auto retry, 2 manual retry, 3 no retry) for a send-conf status.
#[no_mangle]
pub extern "C" fn missiva_classify_send_status(raw_status: c_int) -> c_int {
    classify_send_status(raw_status).code()
}

/// Retry tier code for a retrieve-conf status.
#[no_mangle]
pub extern "C" fn missiva_classify_retrieve_status(raw_status: c_int) -> c_int {
    classify_retrieve_status(raw_status).code()
}

/// User-facing error category name for a failed message. Caller frees.
#[no_mangle]
pub extern "C" fn missiva_error_category(message_status: c_int, raw_status: c_int) -> *mut c_char {
    let status = MessageStatus::from_code(message_status).unwrap_or(MessageStatus::Unknown);
    to_c_string(classify_error_message(status, raw_status).as_str().to_string())
}

// ---------- PDU ----------

/// Decode an MMS PDU and return it as JSON (caller frees), or NULL with last error set.
#[no_mangle]
pub unsafe extern "C" fn missiva_pdu_parse_json(data: *const u8, len: size_t) -> *mut c_char {
    if data.is_null() {
        set_last_error("data is null");
        return ptr::null_mut();
    }
    let bytes = std::slice::from_raw_parts(data, len);
    match pdu::decode(bytes) {
        Ok(pdu) => match serde_json::to_string(&pdu) {
            Ok(json) => {
                clear_last_error();
                to_c_string(json)
            }
            Err(e) => {
                set_last_error(e);
                ptr::null_mut()
            }
        },
        Err(e) => {
            set_last_error(e);
            ptr::null_mut()
        }
    }
}

// ---------- Store ----------

/// Open a file store rooted at root_path. Returns its URI (caller frees), or NULL on error.
#[no_mangle]
pub unsafe extern "C" fn missiva_store_file_new(root_path: *const c_char) -> *mut c_char {
    let Some(path) = ptr_to_str(root_path) else {
        set_last_error("root_path is null or not valid UTF-8");
        return ptr::null_mut();
    };
    match FileStore::new(&path) {
        Ok(store) => {
            let uri = file_store_uri(&path);
            if let Ok(mut guard) = registry().stores.write() {
                guard.insert(uri.clone(), Arc::new(store));
            }
            clear_last_error();
            to_c_string(uri)
        }
        Err(e) => {
            set_last_error(e);
            ptr::null_mut()
        }
    }
}

/// Forget a store. Drafts already created on it keep working.
#[no_mangle]
pub unsafe extern "C" fn missiva_store_free(store_uri: *const c_char) {
    if let Some(uri) = ptr_to_str(store_uri) {
        if let Ok(mut guard) = registry().stores.write() {
            guard.remove(&uri);
        }
    }
}

// ---------- Draft ----------

/// Create and bind a draft for conversation_id on the given store. Returns a handle, or 0 on error.
#[no_mangle]
pub unsafe extern "C" fn missiva_draft_new(store_uri: *const c_char, conversation_id: *const c_char) -> u64 {
    let (Some(uri), Some(conversation_id)) = (ptr_to_str(store_uri), ptr_to_str(conversation_id)) else {
        set_last_error("store_uri or conversation_id is null or not valid UTF-8");
        return 0;
    };
    let store = match registry().stores.read() {
        Ok(guard) => guard.get(&uri).cloned(),
        Err(_) => None,
    };
    let Some(store) = store else {
        set_last_error(format!("unknown store {}", uri));
        return 0;
    };
    let reg = registry();
    let mut data = DraftMessageData::new(conversation_id, store, reg.runtime.handle().clone());
    let binding = data.bind();
    let handle = reg.next_draft.fetch_add(1, Ordering::SeqCst);
    let inserted = DRAFTS.with(|d| match d.try_borrow_mut() {
        Ok(mut drafts) => {
            drafts.insert(handle, DraftHolder { data, binding });
            true
        }
        Err(_) => false,
    });
    if !inserted {
        set_last_error("draft call made from a draft callback");
        return 0;
    }
    clear_last_error();
    handle
}

/// Unbind and free a draft. Pending completions are discarded. Returns 0, or -1 with last
/// error set for an unknown handle or a call made from a draft callback (the draft is kept).
#[no_mangle]
pub extern "C" fn missiva_draft_free(handle: u64) -> c_int {
    let removed = DRAFTS.with(|d| match d.try_borrow_mut() {
        Ok(mut drafts) => drafts
            .remove(&handle)
            .ok_or_else(|| format!("no draft with handle {}", handle)),
        Err(_) => Err(format!("draft {} not freed: call made from a draft callback", handle)),
    });
    match removed {
        Ok(mut holder) => {
            holder.data.unbind();
            clear_last_error();
            0
        }
        Err(msg) => {
            set_last_error(msg);
            -1
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn missiva_draft_set_text(handle: u64, text: *const c_char) -> c_int {
    let text = ptr_to_str(text).unwrap_or_default();
    with_draft(handle, |h| h.data.set_message_text(&text)).map_or(-1, |_| 0)
}

#[no_mangle]
pub unsafe extern "C" fn missiva_draft_set_subject(handle: u64, subject: *const c_char) -> c_int {
    let subject = ptr_to_str(subject).unwrap_or_default();
    with_draft(handle, |h| h.data.set_message_subject(&subject)).map_or(-1, |_| 0)
}

/// Set the sending identity. self_id may be NULL to clear it.
#[no_mangle]
pub unsafe extern "C" fn missiva_draft_set_self_id(handle: u64, self_id: *const c_char, notify: c_int) -> c_int {
    let self_id = ptr_to_str(self_id);
    with_draft(handle, |h| h.data.set_self_id(self_id.as_deref(), notify != 0)).map_or(-1, |_| 0)
}

/// Attach media behind content_uri. size < 0 means unknown; pending != 0 marks data not yet persisted.
#[no_mangle]
pub unsafe extern "C" fn missiva_draft_add_attachment(
    handle: u64,
    content_type: *const c_char,
    content_uri: *const c_char,
    size: i64,
    pending: c_int,
) -> c_int {
    let (Some(content_type), Some(content_uri)) = (ptr_to_str(content_type), ptr_to_str(content_uri)) else {
        set_last_error("content_type or content_uri is null or not valid UTF-8");
        return -1;
    };
    let mut part = MessagePart::media(content_type, content_uri);
    if size >= 0 {
        part = part.with_size(size as u64);
    }
    if pending != 0 {
        part = part.pending();
    }
    with_draft(handle, |h| h.data.add_attachments([part])).map_or(-1, |_| 0)
}

/// Returns 1 if an attachment was removed, 0 if none matched, -1 on error.
#[no_mangle]
pub unsafe extern "C" fn missiva_draft_remove_attachment(handle: u64, content_uri: *const c_char) -> c_int {
    let Some(content_uri) = ptr_to_str(content_uri) else {
        set_last_error("content_uri is null or not valid UTF-8");
        return -1;
    };
    with_draft(handle, |h| h.data.remove_attachment(&content_uri) as c_int).unwrap_or(-1)
}

/// Register a change listener. Called from missiva_draft_process_events and from edit calls.
#[no_mangle]
pub extern "C" fn missiva_draft_add_listener(handle: u64, callback: OnDraftChanged, user_data: *mut c_void) -> c_int {
    let listener: Rc<dyn DraftMessageDataListener> = Rc::new(CListener {
        handle,
        callback,
        user_data,
    });
    with_draft(handle, |h| h.data.add_listener(listener)).map_or(-1, |_| 0)
}

/// Start loading the stored draft. Returns 1 if a load started, 0 if skipped, -1 on error.
#[no_mangle]
pub extern "C" fn missiva_draft_load(handle: u64, clear_local: c_int) -> c_int {
    with_draft(handle, |h| h.data.load_from_storage(h.binding, None, clear_local != 0) as c_int).unwrap_or(-1)
}

/// Start saving the draft. Returns 1 if a save started, 0 if skipped, -1 on error.
#[no_mangle]
pub extern "C" fn missiva_draft_save(handle: u64) -> c_int {
    with_draft(handle, |h| h.data.save_to_storage(h.binding) as c_int).unwrap_or(-1)
}

/// Start a pre-send check. The callback receives a result code (0 passed, 1 pending attachments,
/// 2 no self number for group MMS, 3 over size limit, 4 too many videos, 5 SIM not ready).
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn missiva_draft_check(
    handle: u64,
    check_size: c_int,
    sim_ready: c_int,
    self_phone_number: *const c_char,
    recipient_count: u32,
    max_message_size: u64,
    callback: OnDraftChecked,
    user_data: *mut c_void,
) -> c_int {
    let ctx = CheckContext {
        sim_ready: sim_ready != 0,
        self_phone_number: ptr_to_str(self_phone_number),
        recipient_count: recipient_count as usize,
        max_message_size,
    };
    let on_checked = Box::new(move |_: &DraftMessageData, result: CheckDraftResult| {
        callback(handle, result.code(), user_data);
    });
    with_draft(handle, |h| h.data.check_draft_for_action(check_size != 0, ctx, on_checked, h.binding)).map_or(-1, |_| 0)
}

/// Take the draft's content as a message (JSON, caller frees) and empty the draft.
#[no_mangle]
pub extern "C" fn missiva_draft_prepare_send_json(handle: u64) -> *mut c_char {
    let message = with_draft(handle, |h| h.data.prepare_message_for_sending(h.binding));
    match message.map(|m| serde_json::to_string(&m)) {
        Some(Ok(json)) => to_c_string(json),
        Some(Err(e)) => {
            set_last_error(e);
            ptr::null_mut()
        }
        None => ptr::null_mut(),
    }
}

/// Deliver completed background work for the draft. Returns the number of events handled,
/// or -1 on error. A failed load or save is reported through missiva_last_error.
#[no_mangle]
pub extern "C" fn missiva_draft_process_events(handle: u64) -> c_int {
    let outcome = with_draft(handle, |h| {
        let n = h.data.process_events();
        (n, h.data.take_error())
    });
    match outcome {
        Some((n, Some(err))) => {
            set_last_error(err);
            n as c_int
        }
        Some((n, None)) => n as c_int,
        None => -1,
    }
}

/// Draft state: 0 empty, 1 loading, 2 cached, 3 edited, 4 checking, 5 sending; -1 on error.
#[no_mangle]
pub extern "C" fn missiva_draft_state(handle: u64) -> c_int {
    with_draft(handle, |h| match h.data.state() {
        DraftState::Empty => 0,
        DraftState::Loading => 1,
        DraftState::Cached => 2,
        DraftState::Edited => 3,
        DraftState::Checking => 4,
        DraftState::Sending => 5,
    })
    .unwrap_or(-1)
}

/// SMS segment statistics for the draft text. Either out pointer may be NULL.
#[no_mangle]
pub unsafe extern "C" fn missiva_draft_text_stats(handle: u64, messages: *mut u32, remaining: *mut u32) -> c_int {
    let stats = with_draft(handle, |h| {
        (
            h.data.num_messages_to_be_sent(),
            h.data.code_points_remaining_in_current_message(),
        )
    });
    let Some((n, left)) = stats else {
        return -1;
    };
    if !messages.is_null() {
        *messages = u32::try_from(n).unwrap_or(u32::MAX);
    }
    if !remaining.is_null() {
        *remaining = u32::try_from(left).unwrap_or(u32::MAX);
    }
    0
}
