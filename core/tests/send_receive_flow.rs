/*
 * send_receive_flow.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * End-to-end MMS flows over the in-memory store: a draft becomes send-req bytes that
 * decode back to the same content, and a notification followed by its retrieve-conf
 * becomes a stored message, with the retransmitted notification dropped as a duplicate.
 *
 * Run with:
 *   cargo test -p missiva_core --test send_receive_flow
 */

use bytes::Bytes;

use missiva_core::config::SubscriptionSettings;
use missiva_core::message::{Message, MessagePart, PartKind};
use missiva_core::mms::{self, NotificationOutcome, ReceiveContext};
use missiva_core::pdu::{
    self, content_types, headers, EncodedString, GenericPdu, MessageClass, NotificationInd, PduBody, PduPart,
    RetrieveConf, TimeValue,
};
use missiva_core::status::{MessageStatus, RetryTier};
use missiva_core::store::{MediaScratch, MemoryStore, MessageStore};

#[test]
fn draft_to_send_req_bytes_and_back() {
    let store = MemoryStore::new();
    let photo = store.write_part("image/jpeg", "beach.jpg", &[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
    let clip = store.write_part("audio/amr", "hello.amr", b"#!AMR\n").unwrap();
    let attachments = vec![
        MessagePart::media("image/jpeg", photo).with_size(4),
        MessagePart::media("audio/amr", clip).with_size(6).with_duration(3000),
    ];
    let mut message = Message::draft("conv", Some("sim1"), "wish you were here", "Holiday", &attachments);
    message.recipients = vec!["+15550100".into(), "friend@example.com".into()];

    let prepared = mms::prepare_send(&message, &store, &SubscriptionSettings::default(), 1_700_000_000).unwrap();
    let GenericPdu::SendReq(req) = pdu::decode(&prepared.pdu).unwrap() else {
        panic!("expected a send-req");
    };
    assert_eq!(req.transaction_id, prepared.transaction_id);
    assert_eq!(req.subject.as_ref().map(|s| s.text.as_str()), Some("Holiday"));
    assert_eq!(
        req.to.iter().map(|a| a.text.as_str()).collect::<Vec<_>>(),
        vec!["+15550100/TYPE=PLMN", "friend@example.com"]
    );
    assert_eq!(req.body.content_type, content_types::MULTIPART_RELATED);
    let smil = req.body.smil_part().expect("smil part");
    let smil = std::str::from_utf8(&smil.data).unwrap();
    assert!(smil.contains(r#"<audio src="hello.amr" dur="3000ms"/>"#));
    let texts: Vec<String> = req
        .body
        .parts
        .iter()
        .filter(|p| p.content_type == content_types::TEXT_PLAIN)
        .map(|p| p.text_content())
        .collect();
    assert_eq!(texts, vec!["wish you were here".to_string()]);
    let photo_part = req.body.part_by_content_id("beach").expect("photo part");
    assert_eq!(&photo_part.data[..], &[0xFF, 0xD8, 0xFF, 0xE0]);
}

fn notification(tid: &str) -> Bytes {
    pdu::encode(&GenericPdu::NotificationInd(NotificationInd {
        transaction_id: tid.to_string(),
        mms_version: headers::MMS_VERSION_1_2,
        from: Some(EncodedString::new("+15550199/TYPE=PLMN")),
        subject: None,
        message_class: MessageClass::Personal,
        message_size: 2048,
        expiry: TimeValue::Absolute(1_700_086_400),
        content_location: "http://mmsc.example/m/1".to_string(),
        priority: None,
        delivery_report: Some(false),
    }))
    .unwrap()
}

fn retrieve_conf(tid: &str) -> Bytes {
    let mut body = PduBody::new();
    let mut image = PduPart::new("image/png", Bytes::from_static(b"\x89PNG"));
    image.set_content_location_and_id("pic.png");
    body.add_part(image);
    body.add_part(PduPart::text("look at this"));
    body.set_smil(PduPart::new(content_types::APP_SMIL, Bytes::from_static(b"<smil/>")));
    pdu::encode(&GenericPdu::RetrieveConf(RetrieveConf {
        transaction_id: Some(tid.to_string()),
        mms_version: headers::MMS_VERSION_1_2,
        message_id: Some("msg-1".to_string()),
        date: 1_700_000_100,
        from: Some(EncodedString::new("+15550199/TYPE=PLMN")),
        to: vec![EncodedString::new("+15550100/TYPE=PLMN")],
        cc: Vec::new(),
        subject: Some(EncodedString::new("Look")),
        message_class: Some(MessageClass::Personal),
        priority: None,
        delivery_report: None,
        read_report: None,
        retrieve_status: Some(headers::RETRIEVE_STATUS_OK),
        retrieve_text: None,
        body,
    }))
    .unwrap()
}

#[test]
fn notification_dedup_then_retrieve() {
    let store = MemoryStore::new();
    let settings = SubscriptionSettings::default();
    let ctx = ReceiveContext {
        conversation_id: "conv".into(),
        now: 1_700_000_200,
        ..ReceiveContext::default()
    };

    let NotificationOutcome::Recorded(pending) =
        mms::process_notification(&store, &settings, &notification("TX-1"), &ctx).unwrap()
    else {
        panic!("first notification should be recorded");
    };
    assert_eq!(pending.expiry, 1_700_086_400);
    let dup = mms::process_notification(&store, &settings, &notification("TX-1"), &ctx).unwrap();
    assert!(matches!(dup, NotificationOutcome::Duplicate(ref ids) if ids.len() == 1));

    let out = mms::process_retrieve_conf(&store, &store, &settings, &retrieve_conf("TX-1"), &pending, &ctx);
    assert_eq!(out.status.tier, Some(RetryTier::Succeeded));
    let message = out.message.expect("stored message");
    assert_eq!(message.status, MessageStatus::IncomingComplete);
    assert_eq!(message.sent_timestamp, 1_700_000_100);
    assert_eq!(message.message_text(), "look at this");
    let image = message.attachments().next().expect("image part");
    assert_eq!(image.kind(), PartKind::Image);
    assert_eq!(&store.read_part(image.content_uri.as_deref().unwrap()).unwrap()[..], b"\x89PNG");
    assert_eq!(store.get_message(&pending.record_id).unwrap().unwrap().status, MessageStatus::IncomingComplete);

    // After expiry the same transaction id is accepted again.
    let later = ReceiveContext {
        now: 1_700_086_400,
        ..ctx.clone()
    };
    assert!(matches!(
        mms::process_notification(&store, &settings, &notification("TX-1"), &later).unwrap(),
        NotificationOutcome::Recorded(_)
    ));

    let ack = mms::build_acknowledge("TX-1", true).unwrap();
    assert_eq!(pdu::decode(&ack).unwrap().transaction_id(), Some("TX-1"));
}
