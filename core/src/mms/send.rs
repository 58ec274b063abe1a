/*
 * send.rs
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

//! Outgoing MMS: build the send-req for a [`Message`] and classify the relay's send-conf.

use bytes::Bytes;
use tracing::{debug, error, warn};

use crate::config::SubscriptionSettings;
use crate::message::{Message, PartKind};
use crate::message_id::MessageId;
use crate::mms::{MmsError, DEFAULT_EXPIRY_SECS};
use crate::pdu::{
    self, content_types, EncodedString, GenericPdu, MessageType, PduBody, PduPart, Priority, SendReq, TimeValue,
};
use crate::smil::{self, SmilPart};
use crate::status::{classify_send_status, MessageStatus, RetryTier, StatusPlusUri, RAW_TELEPHONY_STATUS_UNDEFINED};
use crate::store::{MediaScratch, MessageStore};
use crate::uri;

/// Allowance for the SMIL part and PDU headers when checking the size limit.
pub const SMIL_SLOP_BYTES: u64 = 1024;

/// An encoded send-req ready for the transport.
#[derive(Debug, Clone)]
pub struct PreparedSend {
    pub transaction_id: String,
    pub pdu: Bytes,
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type.to_ascii_lowercase().as_str() {
        "text/plain" => "txt",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "video/3gpp" => "3gp",
        "video/mp4" => "mp4",
        "audio/amr" => "amr",
        "audio/mpeg" => "mp3",
        "text/x-vcard" => "vcf",
        _ => "dat",
    }
}

/// Filename for a part: the name in its scratch locator when there is one, otherwise
/// `<kind>_<index>.<ext>`.
fn part_filename(index: usize, kind: PartKind, content_type: &str, content_uri: Option<&str>) -> String {
    if let Some((_, name)) = content_uri.and_then(uri::parse_scratch_part_uri) {
        if !name.is_empty() {
            return name;
        }
    }
    let prefix = match kind {
        PartKind::Text => "text",
        PartKind::Image => "image",
        PartKind::Video => "video",
        PartKind::Audio => "audio",
        PartKind::Other => "part",
    };
    format!("{}_{}.{}", prefix, index, extension_for(content_type))
}

/// Build a send-req for an outgoing message. Attachment data is read from `scratch`.
pub fn build_send_req(
    message: &Message,
    scratch: &dyn MediaScratch,
    settings: &SubscriptionSettings,
    now: i64,
) -> Result<SendReq, MmsError> {
    if message.recipients.is_empty() {
        return Err(MmsError::NoRecipients);
    }
    let mut body = PduBody::new();
    let mut layout: Vec<(PartKind, String, Option<u32>)> = Vec::with_capacity(message.parts.len());
    for (index, part) in message.parts.iter().enumerate() {
        let kind = part.kind();
        let filename = part_filename(index, kind, &part.content_type, part.content_uri.as_deref());
        let mut pdu_part = if part.is_text() {
            match part.text.as_deref() {
                Some(t) if !t.is_empty() => PduPart::text(t),
                _ => continue,
            }
        } else {
            let locator = match part.content_uri.as_deref() {
                Some(l) => l,
                None => {
                    warn!("[mms] attachment {} has no data locator; skipped", index);
                    continue;
                }
            };
            PduPart::new(part.content_type.clone(), scratch.read_part(locator)?)
        };
        pdu_part.set_content_location_and_id(&filename);
        pdu_part.name = Some(filename.clone());
        layout.push((kind, filename, part.duration_ms));
        body.add_part(pdu_part);
    }
    let smil_parts: Vec<SmilPart<'_>> = layout
        .iter()
        .map(|(kind, src, duration_ms)| SmilPart {
            kind: *kind,
            src: src.as_str(),
            duration_ms: *duration_ms,
        })
        .collect();
    let smil_doc = smil::build(&smil_parts)?;
    body.set_smil(PduPart::new(content_types::APP_SMIL, Bytes::from(smil_doc.into_bytes())));

    let size = body.data_size() as u64;
    if size + SMIL_SLOP_BYTES > settings.max_message_size {
        return Err(MmsError::TooLarge {
            size: size + SMIL_SLOP_BYTES,
            limit: settings.max_message_size,
        });
    }

    let mut req = SendReq::new(pdu::new_transaction_id(), body);
    req.date = Some(now);
    req.to = message
        .recipients
        .iter()
        .map(|r| EncodedString::new(pdu::to_wire_address(r)))
        .collect();
    req.subject = message.subject().filter(|s| !s.is_empty()).map(EncodedString::new);
    req.expiry = Some(TimeValue::Relative(DEFAULT_EXPIRY_SECS));
    req.priority = Some(Priority::Normal);
    req.delivery_report = Some(settings.delivery_reports);
    req.read_report = Some(settings.read_reports);
    req.message_size = Some(size);
    Ok(req)
}

/// Build and encode the send-req for `message`.
pub fn prepare_send(
    message: &Message,
    scratch: &dyn MediaScratch,
    settings: &SubscriptionSettings,
    now: i64,
) -> Result<PreparedSend, MmsError> {
    let req = build_send_req(message, scratch, settings, now)?;
    let transaction_id = req.transaction_id.clone();
    let pdu = pdu::encode(&GenericPdu::SendReq(req))?;
    debug!("[mms] send-req {} encoded, {} bytes", transaction_id, pdu.len());
    Ok(PreparedSend { transaction_id, pdu })
}

/// Classify a send-conf. Undecodable or unexpected responses are a manual retry.
pub fn handle_send_conf(data: &[u8]) -> StatusPlusUri {
    match pdu::decode(data) {
        Ok(GenericPdu::SendConf(conf)) => {
            let raw = i32::from(conf.response_status);
            let tier = classify_send_status(raw);
            if tier != RetryTier::Succeeded {
                warn!(
                    "[mms] send-conf {} status 0x{:02x} ({})",
                    conf.transaction_id,
                    conf.response_status,
                    tier.description()
                );
            }
            StatusPlusUri::new(tier, raw, conf.message_id)
        }
        Ok(other) => {
            let e = MmsError::UnexpectedPdu {
                expected: MessageType::SendConf,
                actual: other.message_type(),
            };
            warn!("[mms] {}", e);
            StatusPlusUri::new(RetryTier::ManualRetry, RAW_TELEPHONY_STATUS_UNDEFINED, None)
        }
        Err(e) => {
            warn!("[mms] send-conf decode failed: {}", e);
            StatusPlusUri::new(RetryTier::ManualRetry, RAW_TELEPHONY_STATUS_UNDEFINED, None)
        }
    }
}

/// Persist the outcome of a send attempt. Store failures are logged.
pub fn record_send_status(store: &dyn MessageStore, id: &MessageId, status: &StatusPlusUri) -> Option<MessageStatus> {
    let tier = status.tier?;
    let new_status = MessageStatus::after_send(tier);
    if let Err(e) = store.update_status(id, new_status, status.raw_status) {
        error!("[mms] failed to record send status for {}: {}", id, e);
    }
    Some(new_status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessagePart;
    use crate::pdu::{SendConf, headers};
    use crate::store::MemoryStore;

    fn outgoing(store: &MemoryStore, attach: bool) -> Message {
        let mut attachments = Vec::new();
        if attach {
            let loc = store.write_part("image/png", "cat.png", &[0u8; 100]).unwrap();
            attachments.push(MessagePart::media("image/png", loc).with_size(100));
        }
        let mut m = Message::draft("c", None, "hello", "", &attachments);
        m.recipients = vec!["+15551234".to_string()];
        m
    }

    #[test]
    fn send_req_has_smil_first_then_parts() {
        let store = MemoryStore::new();
        let m = outgoing(&store, true);
        let req = build_send_req(&m, &store, &SubscriptionSettings::default(), 1000).unwrap();
        assert_eq!(req.body.content_type, content_types::MULTIPART_RELATED);
        assert_eq!(req.body.parts.len(), 3);
        assert!(req.body.parts[0].is_smil());
        assert_eq!(req.body.parts[1].content_location.as_deref(), Some("text_0.txt"));
        assert_eq!(req.body.parts[2].content_location.as_deref(), Some("cat.png"));
        assert_eq!(req.body.parts[2].content_id.as_deref(), Some("cat"));
        let smil = std::str::from_utf8(&req.body.parts[0].data).unwrap();
        assert!(smil.contains(r#"<img src="cat.png" region="Image"/>"#));
        assert_eq!(req.to[0].text, "+15551234/TYPE=PLMN");
        assert_eq!(req.expiry, Some(TimeValue::Relative(DEFAULT_EXPIRY_SECS)));
        assert_eq!(req.transaction_id.len(), 12);
    }

    #[test]
    fn subject_with_leading_newline_decodes() {
        let store = MemoryStore::new();
        let mut m = Message::draft("c", None, "hello", "\nHello", &[]);
        m.recipients = vec!["+15551234".to_string()];
        let prepared = prepare_send(&m, &store, &SubscriptionSettings::default(), 0).unwrap();
        let GenericPdu::SendReq(req) = pdu::decode(&prepared.pdu).unwrap() else {
            panic!("expected a send-req");
        };
        assert_eq!(req.subject.map(|s| s.text), Some("\nHello".to_string()));
    }

    #[test]
    fn size_limit_includes_slop() {
        let store = MemoryStore::new();
        let m = outgoing(&store, true);
        let settings = SubscriptionSettings {
            max_message_size: 1100,
            ..SubscriptionSettings::default()
        };
        let err = build_send_req(&m, &store, &settings, 0).unwrap_err();
        assert!(matches!(err, MmsError::TooLarge { .. }));
        assert_eq!(err.to_status().raw_status, crate::status::RAW_TELEPHONY_STATUS_MESSAGE_TOO_BIG);
    }

    #[test]
    fn no_recipients_is_rejected() {
        let store = MemoryStore::new();
        let mut m = outgoing(&store, false);
        m.recipients.clear();
        assert!(matches!(
            build_send_req(&m, &store, &SubscriptionSettings::default(), 0),
            Err(MmsError::NoRecipients)
        ));
    }

    #[test]
    fn send_conf_classification() {
        let conf = |status: u8| {
            pdu::encode(&GenericPdu::SendConf(SendConf {
                transaction_id: "T".into(),
                mms_version: headers::MMS_VERSION_1_2,
                response_status: status,
                response_text: None,
                message_id: Some("M1".into()),
            }))
            .unwrap()
        };
        let ok = handle_send_conf(&conf(0x80));
        assert_eq!(ok.tier, Some(RetryTier::Succeeded));
        assert_eq!(ok.uri.as_deref(), Some("M1"));
        assert_eq!(handle_send_conf(&conf(0xC1)).tier, Some(RetryTier::AutoRetry));
        assert_eq!(handle_send_conf(&conf(0xE2)).tier, Some(RetryTier::NoRetry));
        assert_eq!(handle_send_conf(&[0x01, 0x02]).tier, Some(RetryTier::ManualRetry));
    }

    #[test]
    fn send_status_is_recorded() {
        let store = MemoryStore::new();
        let m = outgoing(&store, false);
        let id = store.insert_message(&m).unwrap();
        let s = StatusPlusUri::new(RetryTier::AutoRetry, 0xC0, None);
        assert_eq!(record_send_status(&store, &id, &s), Some(MessageStatus::OutgoingAwaitingRetry));
        assert_eq!(store.get_message(&id).unwrap().unwrap().raw_status, 0xC0);
        assert_eq!(record_send_status(&store, &id, &StatusPlusUri::PENDING), None);
    }
}
