/*
 * composer.rs
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

//! PDU encoder. Header order follows OMA-MMS-ENC: message type, transaction id and version
//! first, Content-Type last with the multipart body after it.

use bytes::{BufMut, Bytes, BytesMut};

use super::body::{Disposition, PduBody, PduPart};
use super::content_types;
use super::error::PduError;
use super::headers::*;
use super::types::*;
use super::wsp;

/// Encode any PDU to wire bytes.
pub fn encode(pdu: &GenericPdu) -> Result<Bytes, PduError> {
    let mut out = BytesMut::with_capacity(256);
    out.put_u8(MESSAGE_TYPE);
    out.put_u8(pdu.message_type().octet());
    match pdu {
        GenericPdu::SendReq(p) => compose_send_req(&mut out, p)?,
        GenericPdu::SendConf(p) => {
            put_transaction_and_version(&mut out, &p.transaction_id, p.mms_version);
            out.put_u8(RESPONSE_STATUS);
            out.put_u8(p.response_status);
            if let Some(text) = &p.response_text {
                put_encoded_header(&mut out, RESPONSE_TEXT, text);
            }
            if let Some(id) = &p.message_id {
                put_text_header(&mut out, MESSAGE_ID, id);
            }
        }
        GenericPdu::NotificationInd(p) => {
            put_transaction_and_version(&mut out, &p.transaction_id, p.mms_version);
            if let Some(from) = &p.from {
                put_from(&mut out, Some(from));
            }
            if let Some(subject) = &p.subject {
                put_encoded_header(&mut out, SUBJECT, subject);
            }
            put_message_class(&mut out, &p.message_class);
            if let Some(priority) = p.priority {
                out.put_u8(PRIORITY);
                out.put_u8(priority.octet());
            }
            out.put_u8(MESSAGE_SIZE);
            wsp::put_long_integer(&mut out, p.message_size);
            put_time_value(&mut out, EXPIRY, p.expiry);
            if let Some(dr) = p.delivery_report {
                put_yes_no(&mut out, DELIVERY_REPORT, dr);
            }
            put_text_header(&mut out, CONTENT_LOCATION, &p.content_location);
        }
        GenericPdu::NotifyRespInd(p) => {
            put_transaction_and_version(&mut out, &p.transaction_id, p.mms_version);
            out.put_u8(STATUS);
            out.put_u8(p.status);
            if let Some(allowed) = p.report_allowed {
                put_yes_no(&mut out, REPORT_ALLOWED, allowed);
            }
        }
        GenericPdu::RetrieveConf(p) => compose_retrieve_conf(&mut out, p)?,
        GenericPdu::AcknowledgeInd(p) => {
            put_transaction_and_version(&mut out, &p.transaction_id, p.mms_version);
            if let Some(allowed) = p.report_allowed {
                put_yes_no(&mut out, REPORT_ALLOWED, allowed);
            }
        }
    }
    Ok(out.freeze())
}

fn compose_send_req(out: &mut BytesMut, p: &SendReq) -> Result<(), PduError> {
    if p.to.is_empty() && p.cc.is_empty() && p.bcc.is_empty() {
        return Err(PduError::MissingHeader("To"));
    }
    if p.transaction_id.is_empty() {
        return Err(PduError::MissingHeader("X-Mms-Transaction-Id"));
    }
    put_transaction_and_version(out, &p.transaction_id, p.mms_version);
    if let Some(date) = p.date {
        out.put_u8(DATE);
        wsp::put_long_integer(out, date.max(0) as u64);
    }
    put_from(out, p.from.as_ref());
    put_addresses(out, TO, &p.to);
    put_addresses(out, CC, &p.cc);
    put_addresses(out, BCC, &p.bcc);
    if let Some(subject) = &p.subject {
        put_encoded_header(out, SUBJECT, subject);
    }
    if let Some(class) = &p.message_class {
        put_message_class(out, class);
    }
    if let Some(expiry) = p.expiry {
        put_time_value(out, EXPIRY, expiry);
    }
    if let Some(when) = p.delivery_time {
        put_time_value(out, DELIVERY_TIME, when);
    }
    if let Some(priority) = p.priority {
        out.put_u8(PRIORITY);
        out.put_u8(priority.octet());
    }
    if let Some(dr) = p.delivery_report {
        put_yes_no(out, DELIVERY_REPORT, dr);
    }
    if let Some(rr) = p.read_report {
        put_yes_no(out, READ_REPORT, rr);
    }
    if let Some(size) = p.message_size {
        out.put_u8(MESSAGE_SIZE);
        wsp::put_long_integer(out, size);
    }
    put_body(out, &p.body)
}

fn compose_retrieve_conf(out: &mut BytesMut, p: &RetrieveConf) -> Result<(), PduError> {
    if let Some(tid) = &p.transaction_id {
        put_text_header(out, TRANSACTION_ID, tid);
    }
    out.put_u8(MMS_VERSION);
    wsp::put_short_integer(out, p.mms_version);
    if let Some(id) = &p.message_id {
        put_text_header(out, MESSAGE_ID, id);
    }
    out.put_u8(DATE);
    wsp::put_long_integer(out, p.date.max(0) as u64);
    if let Some(from) = &p.from {
        put_from(out, Some(from));
    }
    put_addresses(out, TO, &p.to);
    put_addresses(out, CC, &p.cc);
    if let Some(subject) = &p.subject {
        put_encoded_header(out, SUBJECT, subject);
    }
    if let Some(class) = &p.message_class {
        put_message_class(out, class);
    }
    if let Some(priority) = p.priority {
        out.put_u8(PRIORITY);
        out.put_u8(priority.octet());
    }
    if let Some(dr) = p.delivery_report {
        put_yes_no(out, DELIVERY_REPORT, dr);
    }
    if let Some(rr) = p.read_report {
        put_yes_no(out, READ_REPORT, rr);
    }
    if let Some(status) = p.retrieve_status {
        out.put_u8(RETRIEVE_STATUS);
        out.put_u8(status);
    }
    if let Some(text) = &p.retrieve_text {
        put_encoded_header(out, RETRIEVE_TEXT, text);
    }
    put_body(out, &p.body)
}

fn put_transaction_and_version(out: &mut BytesMut, transaction_id: &str, version: u8) {
    put_text_header(out, TRANSACTION_ID, transaction_id);
    out.put_u8(MMS_VERSION);
    wsp::put_short_integer(out, version);
}

fn put_text_header(out: &mut BytesMut, field: u8, value: &str) {
    out.put_u8(field);
    wsp::put_text_string(out, value.as_bytes());
}

fn put_encoded_header(out: &mut BytesMut, field: u8, value: &EncodedString) {
    out.put_u8(field);
    let (charset, bytes) = value.to_wire();
    wsp::put_encoded_string(out, charset, &bytes);
}

fn put_addresses(out: &mut BytesMut, field: u8, addresses: &[EncodedString]) {
    for a in addresses {
        put_encoded_header(out, field, a);
    }
}

fn put_from(out: &mut BytesMut, from: Option<&EncodedString>) {
    let mut inner = BytesMut::new();
    match from {
        Some(addr) => {
            inner.put_u8(FROM_ADDRESS_PRESENT);
            let (charset, bytes) = addr.to_wire();
            wsp::put_encoded_string(&mut inner, charset, &bytes);
        }
        None => inner.put_u8(FROM_INSERT_ADDRESS),
    }
    out.put_u8(FROM);
    wsp::put_length_prefixed(out, &inner);
}

fn put_message_class(out: &mut BytesMut, class: &MessageClass) {
    out.put_u8(MESSAGE_CLASS);
    match (class.octet(), class) {
        (Some(b), _) => out.put_u8(b),
        (None, MessageClass::Token(t)) => wsp::put_text_string(out, t.as_bytes()),
        (None, _) => out.put_u8(CLASS_PERSONAL),
    }
}

fn put_time_value(out: &mut BytesMut, field: u8, value: TimeValue) {
    let mut inner = BytesMut::new();
    match value {
        TimeValue::Absolute(t) => {
            inner.put_u8(TIME_ABSOLUTE);
            wsp::put_long_integer(&mut inner, t.max(0) as u64);
        }
        TimeValue::Relative(d) => {
            inner.put_u8(TIME_RELATIVE);
            wsp::put_long_integer(&mut inner, d.max(0) as u64);
        }
    }
    out.put_u8(field);
    wsp::put_length_prefixed(out, &inner);
}

fn put_yes_no(out: &mut BytesMut, field: u8, yes: bool) {
    out.put_u8(field);
    out.put_u8(if yes { VALUE_YES } else { VALUE_NO });
}

/// Constrained media: a well-known short-integer when the type is in the table, else text.
fn put_media(out: &mut BytesMut, media: &str) {
    match content_types::index_of(media) {
        Some(i) => wsp::put_short_integer(out, i),
        None => wsp::put_text_string(out, media.as_bytes()),
    }
}

fn put_body(out: &mut BytesMut, body: &PduBody) -> Result<(), PduError> {
    let related = body.start.is_some()
        && body.content_type.eq_ignore_ascii_case(content_types::MULTIPART_RELATED);
    let mut ct = BytesMut::new();
    if related {
        put_media(&mut ct, content_types::MULTIPART_RELATED);
        if let Some(start) = &body.start {
            let smil_type = body
                .part_by_content_id(start)
                .map(|p| p.content_type.as_str())
                .unwrap_or(content_types::APP_SMIL);
            ct.put_u8(P_CT_MR_TYPE);
            wsp::put_text_string(&mut ct, smil_type.as_bytes());
            ct.put_u8(P_DEP_START);
            wsp::put_text_string(&mut ct, format!("<{}>", start).as_bytes());
        }
        out.put_u8(CONTENT_TYPE);
        wsp::put_length_prefixed(out, &ct);
    } else {
        let media = if body.content_type.is_empty() {
            content_types::MULTIPART_MIXED
        } else {
            body.content_type.as_str()
        };
        out.put_u8(CONTENT_TYPE);
        put_media(out, media);
    }

    wsp::put_uintvar(out, u32::try_from(body.parts.len()).map_err(|_| PduError::invalid("body", "too many parts"))?);
    for part in &body.parts {
        put_part(out, part)?;
    }
    Ok(())
}

fn put_part(out: &mut BytesMut, part: &PduPart) -> Result<(), PduError> {
    if part.content_type.is_empty() {
        return Err(PduError::MissingHeader("part Content-Type"));
    }
    let mut ct = BytesMut::new();
    put_media(&mut ct, &part.content_type);
    if let Some(charset) = part.charset {
        ct.put_u8(P_CHARSET);
        wsp::put_integer_value(&mut ct, u64::from(charset));
    }
    if let Some(name) = part.name.as_ref().or(part.filename.as_ref()) {
        ct.put_u8(P_DEP_NAME);
        wsp::put_text_string(&mut ct, name.as_bytes());
    }

    let mut header = BytesMut::new();
    wsp::put_length_prefixed(&mut header, &ct);
    if let Some(id) = &part.content_id {
        header.put_u8(PART_CONTENT_ID);
        wsp::put_quoted_string(&mut header, format!("<{}>", id).as_bytes());
    }
    if let Some(location) = &part.content_location {
        header.put_u8(PART_CONTENT_LOCATION);
        wsp::put_text_string(&mut header, location.as_bytes());
    }
    if let Some(disposition) = part.disposition {
        let token = match disposition {
            Disposition::FormData => DISPOSITION_FORM_DATA,
            Disposition::Attachment => DISPOSITION_ATTACHMENT,
            Disposition::Inline => DISPOSITION_INLINE,
        };
        let mut inner = BytesMut::new();
        inner.put_u8(token);
        if let Some(filename) = &part.filename {
            inner.put_u8(P_DEP_FILENAME);
            wsp::put_text_string(&mut inner, filename.as_bytes());
        }
        header.put_u8(PART_CONTENT_DISPOSITION);
        wsp::put_length_prefixed(&mut header, &inner);
    }

    let header_len = u32::try_from(header.len()).map_err(|_| PduError::invalid("part", "headers too large"))?;
    let data_len = u32::try_from(part.data.len()).map_err(|_| PduError::invalid("part", "data too large"))?;
    wsp::put_uintvar(out, header_len);
    wsp::put_uintvar(out, data_len);
    out.put_slice(&header);
    out.put_slice(&part.data);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_req_needs_a_recipient() {
        let req = SendReq::new("T1", PduBody::new());
        assert_eq!(encode(&GenericPdu::SendReq(req)), Err(PduError::MissingHeader("To")));
    }

    #[test]
    fn notify_resp_wire_layout() {
        let pdu = GenericPdu::NotifyRespInd(NotifyRespInd {
            transaction_id: "abc".into(),
            mms_version: MMS_VERSION_1_2,
            status: STATUS_RETRIEVED,
            report_allowed: Some(true),
        });
        let bytes = encode(&pdu).unwrap();
        assert_eq!(
            &bytes[..],
            &[0x8C, 0x83, 0x98, b'a', b'b', b'c', 0x00, 0x8D, 0x92, 0x95, 0x81, 0x91, 0x80]
        );
    }

    #[test]
    fn send_req_header_prefix() {
        let mut req = SendReq::new("T1", PduBody::new());
        req.to.push(EncodedString::new("+1555/TYPE=PLMN"));
        req.body.add_part(PduPart::text("x"));
        let bytes = encode(&GenericPdu::SendReq(req)).unwrap();
        assert_eq!(&bytes[..2], &[MESSAGE_TYPE, 0x80]);
        assert_eq!(&bytes[2..6], &[TRANSACTION_ID, b'T', b'1', 0]);
        // From is an insert-address token.
        let from = bytes.iter().position(|b| *b == FROM).unwrap();
        assert_eq!(&bytes[from..from + 3], &[FROM, 0x01, FROM_INSERT_ADDRESS]);
    }
}
