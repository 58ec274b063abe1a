/*
 * receive.rs
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

//! Incoming MMS: notification-ind receipt with dedup, retrieve-conf handling, and the
//! notify-resp / acknowledge PDUs sent back to the relay.

use bytes::Bytes;
use tracing::{debug, error, info, warn};

use crate::config::{allow_mms_auto_retrieve, SubscriptionSettings};
use crate::dedup;
use crate::message::address::parse_potential_rfc822_email_address;
use crate::message::{Message, MessagePart, MmsInfo, Protocol};
use crate::message_id::MessageId;
use crate::mms::MmsError;
use crate::pdu::{
    self, headers, AcknowledgeInd, GenericPdu, MessageType, NotificationInd, NotifyRespInd, RetrieveConf,
};
use crate::status::{classify_retrieve_status, MessageStatus, RetryTier, StatusPlusUri, RAW_TELEPHONY_STATUS_UNDEFINED};
use crate::store::{MediaScratch, MessageStore};

/// Device state a receive runs against.
#[derive(Debug, Clone, Default)]
pub struct ReceiveContext {
    pub conversation_id: String,
    pub self_id: Option<String>,
    pub roaming: bool,
    pub data_roaming_enabled: bool,
    /// Seconds since epoch.
    pub now: i64,
}

impl ReceiveContext {
    /// Context for `conversation_id` at the current time, not roaming.
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            now: super::now_secs(),
            ..Self::default()
        }
    }
}

/// A recorded notification whose content has not been retrieved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDownload {
    pub record_id: MessageId,
    pub transaction_id: String,
    pub content_location: String,
    /// Seconds since epoch.
    pub expiry: i64,
    pub auto_download: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Already known; nothing recorded.
    Duplicate(Vec<MessageId>),
    Recorded(PendingDownload),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrieveOutcome {
    pub status: StatusPlusUri,
    /// The stored message when retrieval succeeded.
    pub message: Option<Message>,
}

fn sender(from: Option<&pdu::EncodedString>) -> Option<String> {
    from.map(|f| parse_potential_rfc822_email_address(f.address()))
        .filter(|s| !s.is_empty())
}

fn notification_message(
    ind: &NotificationInd,
    settings: &SubscriptionSettings,
    ctx: &ReceiveContext,
    auto_download: bool,
) -> Message {
    let mut mms = MmsInfo {
        subject: settings.cleanse_mms_subject(ind.subject.as_ref().map(|s| s.text.as_str())),
        transaction_id: Some(ind.transaction_id.clone()),
        content_location: Some(ind.content_location.clone()),
        expiry: Some(ind.expiry.resolve(ctx.now)),
        ..MmsInfo::default()
    };
    mms.set_message_type(MessageType::NotificationInd);
    mms.set_priority(ind.priority);
    mms.set_message_class(&ind.message_class);
    let mut message = Message {
        id: None,
        conversation_id: ctx.conversation_id.clone(),
        self_id: ctx.self_id.clone(),
        participant_id: sender(ind.from.as_ref()),
        recipients: Vec::new(),
        received_timestamp: ctx.now,
        sent_timestamp: ctx.now,
        protocol: Protocol::MmsPushNotification,
        status: if auto_download {
            MessageStatus::IncomingAutoDownloading
        } else {
            MessageStatus::IncomingYetToManualDownload
        },
        raw_status: 0,
        size: ind.message_size,
        mms: Some(mms),
        parts: Vec::new(),
    };
    message.ensure_part();
    message
}

/// Decode a notification-ind, drop it if it duplicates a live record, otherwise record it.
pub fn process_notification(
    store: &dyn MessageStore,
    settings: &SubscriptionSettings,
    data: &[u8],
    ctx: &ReceiveContext,
) -> Result<NotificationOutcome, MmsError> {
    let ind = match pdu::decode(data)? {
        GenericPdu::NotificationInd(ind) => ind,
        other => {
            return Err(MmsError::UnexpectedPdu {
                expected: MessageType::NotificationInd,
                actual: other.message_type(),
            })
        }
    };
    let dups = dedup::find_duplicates(store, Some(&ind.transaction_id), ctx.now);
    if !dups.is_empty() {
        info!("[mms] dropping duplicate notification {}", ind.transaction_id);
        return Ok(NotificationOutcome::Duplicate(dups));
    }
    let auto_download = allow_mms_auto_retrieve(settings, ctx.roaming, ctx.data_roaming_enabled);
    let message = notification_message(&ind, settings, ctx, auto_download);
    let record_id = store.insert_message(&message)?;
    debug!("[mms] notification {} recorded as {}", ind.transaction_id, record_id);
    Ok(NotificationOutcome::Recorded(PendingDownload {
        record_id,
        transaction_id: ind.transaction_id,
        content_location: ind.content_location,
        expiry: message.mms.as_ref().and_then(|m| m.expiry).unwrap_or(0),
        auto_download,
    }))
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((i, _)) => text[..i].to_string(),
        None => text.to_string(),
    }
}

fn received_message(
    conf: &RetrieveConf,
    scratch: &dyn MediaScratch,
    settings: &SubscriptionSettings,
    pending: &PendingDownload,
    ctx: &ReceiveContext,
) -> Result<Message, MmsError> {
    let mut parts = Vec::with_capacity(conf.body.parts.len());
    for (index, part) in conf.body.parts.iter().enumerate() {
        if part.is_smil() {
            continue;
        }
        let content_type = part.content_type.to_ascii_lowercase();
        if content_type == pdu::content_types::TEXT_PLAIN {
            parts.push(MessagePart::text(truncate_chars(&part.text_content(), settings.mms_text_limit)));
            continue;
        }
        let name = part
            .content_location
            .clone()
            .or_else(|| part.filename.clone())
            .or_else(|| part.name.clone())
            .unwrap_or_else(|| format!("part_{}", index));
        let locator = scratch.write_part(&content_type, &name, &part.data)?;
        parts.push(MessagePart::media(content_type, locator).with_size(part.data.len() as u64));
    }
    let mut mms = MmsInfo {
        subject: settings.cleanse_mms_subject(conf.subject.as_ref().map(|s| s.text.as_str())),
        // Notification values so dedup still works after the notification record is gone.
        transaction_id: Some(pending.transaction_id.clone()),
        content_location: Some(pending.content_location.clone()),
        expiry: Some(pending.expiry),
        ..MmsInfo::default()
    };
    mms.set_message_type(MessageType::RetrieveConf);
    mms.set_priority(conf.priority);
    if let Some(class) = &conf.message_class {
        mms.set_message_class(class);
    }
    let mut message = Message {
        id: None,
        conversation_id: ctx.conversation_id.clone(),
        self_id: ctx.self_id.clone(),
        participant_id: sender(conf.from.as_ref()),
        recipients: conf.to.iter().chain(conf.cc.iter()).map(|a| a.address().to_string()).collect(),
        received_timestamp: ctx.now,
        sent_timestamp: conf.date,
        protocol: Protocol::Mms,
        status: MessageStatus::IncomingComplete,
        raw_status: i32::from(headers::RETRIEVE_STATUS_OK),
        size: conf.body.data_size() as u64,
        mms: Some(mms),
        parts,
    };
    message.ensure_part();
    Ok(message)
}

fn update_notification(store: &dyn MessageStore, pending: &PendingDownload, tier: RetryTier, raw: i32) {
    let status = MessageStatus::after_retrieve(tier, pending.auto_download);
    if let Err(e) = store.update_status(&pending.record_id, status, raw) {
        error!("[mms] failed to update notification {}: {}", pending.record_id, e);
    }
}

/// Handle the retrieve-conf downloaded for `pending`. Parse failures are a manual retry.
/// On success the message is stored and the notification record marked complete.
pub fn process_retrieve_conf(
    store: &dyn MessageStore,
    scratch: &dyn MediaScratch,
    settings: &SubscriptionSettings,
    data: &[u8],
    pending: &PendingDownload,
    ctx: &ReceiveContext,
) -> RetrieveOutcome {
    let failed = |tier: RetryTier, raw: i32| {
        update_notification(store, pending, tier, raw);
        RetrieveOutcome {
            status: StatusPlusUri::new(tier, raw, None),
            message: None,
        }
    };
    let conf = match pdu::decode(data) {
        Ok(GenericPdu::RetrieveConf(conf)) => conf,
        Ok(other) => {
            warn!("[mms] expected retrieve-conf, got {:?}", other.message_type());
            return failed(RetryTier::ManualRetry, RAW_TELEPHONY_STATUS_UNDEFINED);
        }
        Err(e) => {
            warn!("[mms] retrieve-conf for {} unparseable: {}", pending.transaction_id, e);
            return failed(RetryTier::ManualRetry, RAW_TELEPHONY_STATUS_UNDEFINED);
        }
    };
    let raw = i32::from(conf.retrieve_status.unwrap_or(headers::RETRIEVE_STATUS_OK));
    let tier = classify_retrieve_status(raw);
    if tier != RetryTier::Succeeded {
        warn!("[mms] retrieve {} status 0x{:02x} ({})", pending.transaction_id, raw, tier.description());
        return failed(tier, raw);
    }
    let message = match received_message(&conf, scratch, settings, pending, ctx) {
        Ok(m) => m,
        Err(e) => {
            error!("[mms] failed to store parts of {}: {}", pending.transaction_id, e);
            return failed(RetryTier::ManualRetry, RAW_TELEPHONY_STATUS_UNDEFINED);
        }
    };
    let id = match store.insert_message(&message) {
        Ok(id) => id,
        Err(e) => {
            error!("[mms] failed to insert {}: {}", pending.transaction_id, e);
            return failed(RetryTier::ManualRetry, RAW_TELEPHONY_STATUS_UNDEFINED);
        }
    };
    update_notification(store, pending, RetryTier::Succeeded, raw);
    let mut stored = message;
    stored.id = Some(id.clone());
    RetrieveOutcome {
        status: StatusPlusUri::new(RetryTier::Succeeded, raw, Some(id.to_string())),
        message: Some(stored),
    }
}

/// Notify-resp telling the relay what happened to a notification (`status` is one of the
/// `headers::STATUS_*` values).
pub fn build_notify_resp(transaction_id: &str, status: u8, report_allowed: bool) -> Result<Bytes, MmsError> {
    Ok(pdu::encode(&GenericPdu::NotifyRespInd(NotifyRespInd {
        transaction_id: transaction_id.to_string(),
        mms_version: headers::MMS_VERSION_1_2,
        status,
        report_allowed: Some(report_allowed),
    }))?)
}

/// Acknowledge-ind sent after a successful retrieve.
pub fn build_acknowledge(transaction_id: &str, report_allowed: bool) -> Result<Bytes, MmsError> {
    Ok(pdu::encode(&GenericPdu::AcknowledgeInd(AcknowledgeInd {
        transaction_id: transaction_id.to_string(),
        mms_version: headers::MMS_VERSION_1_2,
        report_allowed: Some(report_allowed),
    }))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdu::{EncodedString, MessageClass, PduBody, PduPart, TimeValue};
    use crate::store::MemoryStore;

    fn notification_bytes(tid: &str) -> Bytes {
        pdu::encode(&GenericPdu::NotificationInd(NotificationInd {
            transaction_id: tid.to_string(),
            mms_version: headers::MMS_VERSION_1_2,
            from: Some(EncodedString::new("+15550001/TYPE=PLMN")),
            subject: Some(EncodedString::new("NoSubject")),
            message_class: MessageClass::Personal,
            message_size: 4096,
            expiry: TimeValue::Relative(3600),
            content_location: "http://mmsc/abc".to_string(),
            priority: None,
            delivery_report: None,
        }))
        .unwrap()
    }

    fn ctx(now: i64) -> ReceiveContext {
        ReceiveContext {
            conversation_id: "conv".to_string(),
            now,
            ..ReceiveContext::default()
        }
    }

    #[test]
    fn notification_recorded_then_deduplicated() {
        let store = MemoryStore::new();
        let settings = SubscriptionSettings::default();
        let data = notification_bytes("T1");
        let NotificationOutcome::Recorded(p) = process_notification(&store, &settings, &data, &ctx(1000)).unwrap()
        else {
            panic!("expected a new record");
        };
        assert_eq!(p.expiry, 4600);
        assert!(p.auto_download);
        let stored = store.get_message(&p.record_id).unwrap().unwrap();
        assert_eq!(stored.protocol, Protocol::MmsPushNotification);
        assert_eq!(stored.participant_id.as_deref(), Some("+15550001"));
        assert_eq!(stored.subject(), None);

        let again = process_notification(&store, &settings, &data, &ctx(2000)).unwrap();
        assert_eq!(again, NotificationOutcome::Duplicate(vec![p.record_id]));
        assert_eq!(store.message_count(), 1);
    }

    #[test]
    fn manual_download_when_auto_retrieve_off() {
        let store = MemoryStore::new();
        let settings = SubscriptionSettings {
            auto_retrieve: false,
            ..SubscriptionSettings::default()
        };
        let NotificationOutcome::Recorded(p) =
            process_notification(&store, &settings, &notification_bytes("T2"), &ctx(0)).unwrap()
        else {
            panic!("expected a new record");
        };
        let stored = store.get_message(&p.record_id).unwrap().unwrap();
        assert_eq!(stored.status, MessageStatus::IncomingYetToManualDownload);
    }

    fn pending(store: &MemoryStore) -> PendingDownload {
        let NotificationOutcome::Recorded(p) =
            process_notification(store, &SubscriptionSettings::default(), &notification_bytes("T3"), &ctx(0)).unwrap()
        else {
            panic!("expected a new record");
        };
        p
    }

    fn retrieve_conf(status: Option<u8>, body: PduBody) -> Bytes {
        pdu::encode(&GenericPdu::RetrieveConf(RetrieveConf {
            transaction_id: Some("T3".to_string()),
            mms_version: headers::MMS_VERSION_1_2,
            message_id: Some("MID".to_string()),
            date: 500,
            from: Some(EncodedString::new("Ann <ann@example.com>")),
            to: vec![EncodedString::new("+15550002/TYPE=PLMN")],
            cc: Vec::new(),
            subject: Some(EncodedString::new("Pics")),
            message_class: None,
            priority: None,
            delivery_report: None,
            read_report: None,
            retrieve_status: status,
            retrieve_text: None,
            body,
        }))
        .unwrap()
    }

    #[test]
    fn retrieve_conf_becomes_message() {
        let store = MemoryStore::new();
        let p = pending(&store);
        let mut body = PduBody::new();
        let mut img = PduPart::new("image/jpeg", Bytes::from_static(b"jpegdata"));
        img.set_content_location_and_id("a.jpg");
        body.add_part(PduPart::text(&"x".repeat(2500)));
        body.add_part(img);
        body.set_smil(PduPart::new("application/smil", Bytes::from_static(b"<smil/>")));

        let out = process_retrieve_conf(
            &store,
            &store,
            &SubscriptionSettings::default(),
            &retrieve_conf(None, body),
            &p,
            &ctx(10),
        );
        assert_eq!(out.status.tier, Some(RetryTier::Succeeded));
        let m = out.message.unwrap();
        assert_eq!(m.parts.len(), 2);
        assert_eq!(m.parts[0].text.as_deref().map(str::len), Some(2000));
        assert_eq!(m.parts[1].size, Some(8));
        assert_eq!(m.participant_id.as_deref(), Some("ann@example.com"));
        assert_eq!(m.subject(), Some("Pics"));
        assert_eq!(m.mms.as_ref().unwrap().message_type, Some(0x84));
        assert_eq!(
            store.get_message(&p.record_id).unwrap().unwrap().status,
            MessageStatus::IncomingComplete
        );
        // The retrieved record keeps the notification's transaction id and expiry.
        assert_eq!(dedup::find_duplicates(&store, Some("T3"), 0).len(), 2);
    }

    #[test]
    fn empty_retrieve_conf_gets_a_part() {
        let store = MemoryStore::new();
        let p = pending(&store);
        let out = process_retrieve_conf(
            &store,
            &store,
            &SubscriptionSettings::default(),
            &retrieve_conf(Some(0x80), PduBody::new()),
            &p,
            &ctx(10),
        );
        let m = out.message.unwrap();
        assert_eq!(m.parts.len(), 1);
        assert_eq!(m.parts[0].text.as_deref(), Some(""));
    }

    #[test]
    fn failed_retrieve_statuses() {
        let store = MemoryStore::new();
        let p = pending(&store);
        let settings = SubscriptionSettings::default();
        let transient = process_retrieve_conf(&store, &store, &settings, &retrieve_conf(Some(0xC0), PduBody::new()), &p, &ctx(1));
        assert_eq!(transient.status.tier, Some(RetryTier::AutoRetry));
        assert!(transient.message.is_none());
        assert_eq!(
            store.get_message(&p.record_id).unwrap().unwrap().status,
            MessageStatus::IncomingRetryingAutoDownload
        );

        let garbage = process_retrieve_conf(&store, &store, &settings, &[0x8C, 0x84, 0x98], &p, &ctx(1));
        assert_eq!(garbage.status.tier, Some(RetryTier::ManualRetry));
        assert_eq!(
            store.get_message(&p.record_id).unwrap().unwrap().status,
            MessageStatus::IncomingDownloadFailed
        );
    }

    #[test]
    fn response_pdus_decode() {
        let resp = build_notify_resp("T9", headers::STATUS_DEFERRED, true).unwrap();
        let Ok(GenericPdu::NotifyRespInd(n)) = pdu::decode(&resp) else {
            panic!("notify-resp did not decode");
        };
        assert_eq!(n.status, headers::STATUS_DEFERRED);
        let ack = build_acknowledge("T9", false).unwrap();
        assert_eq!(pdu::decode(&ack).unwrap().message_type(), MessageType::AcknowledgeInd);
    }
}
