/*
 * draft_lifecycle.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * Draft lifecycle against the file store: save, reload in a fresh draft, check and
 * prepare for sending, with completions delivered on the owner thread.
 *
 * Run with:
 *   cargo test -p missiva_core --test draft_lifecycle
 */

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use missiva_core::draft::{
    CheckContext, CheckDraftResult, DraftMessageData, DraftMessageDataListener, DraftState, ALL_CHANGED,
};
use missiva_core::localstorage::FileStore;
use missiva_core::message::{MessagePart, Protocol};
use missiva_core::store::{MediaScratch, MessageStore};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

fn temp_root(tag: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("missiva-draft-it-{}-{}", tag, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn save_reload_check_send() {
    let rt = runtime();
    let root = temp_root("lifecycle");
    let store = Arc::new(FileStore::new(&root).unwrap());
    let photo = store.write_part("image/jpeg", "p.jpg", &[1, 2, 3]).unwrap();

    let mut first = DraftMessageData::new("conv-7", store.clone(), rt.handle().clone());
    let b1 = first.bind();
    first.set_self_id(Some("sim1"), false);
    first.set_message_text("dinner at 8?");
    first.add_attachments([MessagePart::media("image/jpeg", photo.clone()).with_size(3)]);
    assert!(first.save_to_storage(b1));
    assert!(rt.block_on(first.next_event()));
    assert!(first.take_error().is_none());
    first.unbind();

    let mut second = DraftMessageData::new("conv-7", store.clone(), rt.handle().clone());
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    let listener: Rc<dyn DraftMessageDataListener> =
        Rc::new(move |_: &DraftMessageData, flags: u32| sink.borrow_mut().push(flags));
    let b2 = second.bind();
    second.add_listener(listener);
    assert!(second.load_from_storage(b2, None, false));
    assert!(rt.block_on(second.next_event()));
    assert_eq!(*changes.borrow(), vec![ALL_CHANGED]);
    assert_eq!(second.state(), DraftState::Cached);
    assert_eq!(second.message_text(), "dinner at 8?");
    assert_eq!(second.self_id(), Some("sim1"));
    assert_eq!(second.attachments().len(), 1);

    let result = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&result);
    let ctx = CheckContext {
        sim_ready: true,
        self_phone_number: None,
        recipient_count: 2,
        max_message_size: 300 * 1024,
    };
    second.check_draft_for_action(
        true,
        ctx,
        Box::new(move |_: &DraftMessageData, r: CheckDraftResult| *sink.borrow_mut() = Some(r)),
        b2,
    );
    assert!(rt.block_on(second.next_event()));
    assert_eq!(*result.borrow(), Some(CheckDraftResult::NoSelfPhoneNumberInGroupMms));

    let message = second.prepare_message_for_sending(b2);
    assert_eq!(message.protocol, Protocol::Mms);
    assert_eq!(message.parts.len(), 2);
    assert_eq!(message.parts[1].content_uri.as_deref(), Some(photo.as_str()));
    assert_eq!(second.state(), DraftState::Empty);
    assert!(rt.block_on(second.next_event()));
    assert_eq!(store.read_draft("conv-7").unwrap(), None);

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn unbound_draft_ignores_completion() {
    let rt = runtime();
    let root = temp_root("unbound");
    let store = Arc::new(FileStore::new(&root).unwrap());
    let mut d = DraftMessageData::new("conv-8", store, rt.handle().clone());
    let b = d.bind();
    d.set_message_text("x");
    let called = Rc::new(RefCell::new(false));
    let sink = Rc::clone(&called);
    d.check_draft_for_action(
        false,
        CheckContext {
            sim_ready: true,
            recipient_count: 1,
            ..CheckContext::default()
        },
        Box::new(move |_: &DraftMessageData, _: CheckDraftResult| *sink.borrow_mut() = true),
        b,
    );
    d.unbind();
    assert!(rt.block_on(d.next_event()));
    assert!(!*called.borrow());
    assert!(!d.save_to_storage(b));
    let _ = std::fs::remove_dir_all(&root);
}
