/*
 * parser.rs
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

//! PDU decoder.
//!
//! Headers are accumulated into a [`HeaderSet`] and then converted into a typed PDU once the
//! mandatory fields for the message type have been checked. The body of a send-req or
//! retrieve-conf follows the Content-Type header, which is always the last header.

use bytes::{Buf, Bytes};
use tracing::debug;

use super::body::{Disposition, PduBody, PduPart};
use super::charset;
use super::content_types;
use super::error::PduError;
use super::headers::*;
use super::transfer_encoding;
use super::types::*;
use super::wsp::{self, peek, read_u8, WspResult};

/// Upper bound on the initial allocation for a part list; the count is untrusted input.
const MAX_PREALLOCATED_PARTS: usize = 16;

/// Single-strategy parser. See [`super::decode`] for the two-strategy entry point.
pub struct PduParser<'a> {
    data: &'a [u8],
    parse_content_disposition: bool,
}

#[derive(Debug, Default)]
pub(crate) struct ContentType {
    pub media: String,
    pub type_param: Option<String>,
    pub start: Option<String>,
    pub charset: Option<u32>,
    pub name: Option<String>,
    pub filename: Option<String>,
}

#[derive(Debug, Default)]
struct HeaderSet {
    message_type: Option<MessageType>,
    transaction_id: Option<String>,
    mms_version: Option<u8>,
    date: Option<i64>,
    from: Option<Option<EncodedString>>,
    to: Vec<EncodedString>,
    cc: Vec<EncodedString>,
    bcc: Vec<EncodedString>,
    subject: Option<EncodedString>,
    message_class: Option<MessageClass>,
    expiry: Option<TimeValue>,
    delivery_time: Option<TimeValue>,
    priority: Option<Priority>,
    delivery_report: Option<bool>,
    read_report: Option<bool>,
    report_allowed: Option<bool>,
    message_size: Option<u64>,
    content_location: Option<String>,
    message_id: Option<String>,
    response_status: Option<u8>,
    response_text: Option<EncodedString>,
    retrieve_status: Option<u8>,
    retrieve_text: Option<EncodedString>,
    status: Option<u8>,
    content_type: Option<ContentType>,
}

impl<'a> PduParser<'a> {
    /// `parse_content_disposition` selects whether part Content-Disposition values are decoded
    /// (value-length form) or skipped as opaque values.
    pub fn new(data: &'a [u8], parse_content_disposition: bool) -> Self {
        Self {
            data,
            parse_content_disposition,
        }
    }

    pub fn parse(&self) -> Result<GenericPdu, PduError> {
        let mut buf = self.data;
        let headers = parse_headers(&mut buf)?;
        let message_type = headers
            .message_type
            .ok_or(PduError::MissingHeader("X-Mms-Message-Type"))?;
        let body = match message_type {
            MessageType::SendReq | MessageType::RetrieveConf => {
                let ct = headers
                    .content_type
                    .as_ref()
                    .ok_or(PduError::MissingHeader("Content-Type"))?;
                Some(self.parse_body(&mut buf, ct)?)
            }
            _ => None,
        };
        headers.into_pdu(message_type, body)
    }

    fn parse_body(&self, buf: &mut &[u8], root: &ContentType) -> WspResult<PduBody> {
        let mut body = PduBody {
            content_type: root.media.clone(),
            start: root.start.clone(),
            parts: Vec::new(),
        };
        if !buf.has_remaining() {
            return Ok(body);
        }
        let count = wsp::read_uintvar(buf)? as usize;
        body.parts.reserve(count.min(MAX_PREALLOCATED_PARTS));
        for _ in 0..count {
            body.parts.push(self.parse_part(buf)?);
        }
        Ok(body)
    }

    fn parse_part(&self, buf: &mut &[u8]) -> WspResult<PduPart> {
        let header_len = wsp::read_uintvar(buf)? as usize;
        let data_len = wsp::read_uintvar(buf)? as usize;
        let mut header = wsp::read_bytes(buf, header_len, "part headers")?;
        let ct = parse_content_type(&mut header)?;
        let mut part = PduPart {
            content_type: ct.media,
            charset: ct.charset,
            name: ct.name,
            filename: ct.filename,
            ..PduPart::default()
        };
        let mut encoding = None;
        while header.has_remaining() {
            let field = read_u8(&mut header, "part header")?;
            match field {
                PART_CONTENT_LOCATION => part.content_location = Some(wsp::read_text(&mut header)?),
                PART_CONTENT_ID => {
                    let id = wsp::read_quoted_string(&mut header)?;
                    part.content_id = Some(strip_angle_brackets(&String::from_utf8_lossy(id)));
                }
                PART_CONTENT_DISPOSITION | PART_DEP_CONTENT_DISPOSITION => {
                    if self.parse_content_disposition {
                        parse_disposition(&mut header, &mut part)?;
                    } else {
                        wsp::skip_value(&mut header)?;
                    }
                }
                PART_CONTENT_TRANSFER_ENCODING => encoding = Some(wsp::read_text(&mut header)?),
                f if f >= 0x80 => wsp::skip_value(&mut header)?,
                f if f >= 0x20 => {
                    let name = format!("{}{}", f as char, wsp::read_text(&mut header)?);
                    let value = wsp::read_text(&mut header)?;
                    if name.eq_ignore_ascii_case("Content-Transfer-Encoding") {
                        encoding = Some(value);
                    } else if name.eq_ignore_ascii_case("Content-ID") {
                        part.content_id = Some(strip_angle_brackets(&value));
                    } else if name.eq_ignore_ascii_case("Content-Location") {
                        part.content_location = Some(value);
                    } else {
                        debug!("[pdu] ignoring part header {}", name);
                    }
                }
                f => {
                    return Err(PduError::invalid("part header", format!("0x{:02X}", f)));
                }
            }
        }
        let data = Bytes::copy_from_slice(wsp::read_bytes(buf, data_len, "part data")?);
        part.data = match encoding {
            Some(enc) => transfer_encoding::decode(&enc, data),
            None => data,
        };
        Ok(part)
    }
}

fn parse_headers(buf: &mut &[u8]) -> WspResult<HeaderSet> {
    let mut h = HeaderSet::default();
    while buf.has_remaining() {
        let field = read_u8(buf, "header field")?;
        match field {
            MESSAGE_TYPE => {
                let b = read_u8(buf, "X-Mms-Message-Type")?;
                h.message_type = Some(MessageType::from_octet(b).ok_or(PduError::UnknownMessageType(b))?);
            }
            TRANSACTION_ID => h.transaction_id = Some(wsp::read_text(buf)?),
            MMS_VERSION => h.mms_version = Some(wsp::read_short_integer(buf)?),
            DATE => h.date = Some(to_i64(wsp::read_long_integer(buf)?, "Date")?),
            FROM => h.from = Some(parse_from(buf)?),
            TO => h.to.push(read_encoded(buf)?),
            CC => h.cc.push(read_encoded(buf)?),
            BCC => h.bcc.push(read_encoded(buf)?),
            SUBJECT => h.subject = Some(read_encoded(buf)?),
            MESSAGE_CLASS => h.message_class = Some(parse_message_class(buf)?),
            EXPIRY => h.expiry = Some(parse_time_value(buf)?),
            DELIVERY_TIME => h.delivery_time = Some(parse_time_value(buf)?),
            PRIORITY => {
                let b = read_u8(buf, "X-Mms-Priority")?;
                h.priority = Some(
                    Priority::from_octet(b).ok_or_else(|| PduError::invalid("X-Mms-Priority", format!("0x{:02X}", b)))?,
                );
            }
            DELIVERY_REPORT => h.delivery_report = Some(parse_yes_no(buf, "X-Mms-Delivery-Report")?),
            READ_REPORT => h.read_report = Some(parse_yes_no(buf, "X-Mms-Read-Report")?),
            REPORT_ALLOWED => h.report_allowed = Some(parse_yes_no(buf, "X-Mms-Report-Allowed")?),
            MESSAGE_SIZE => h.message_size = Some(wsp::read_integer_value(buf)?),
            CONTENT_LOCATION => h.content_location = Some(wsp::read_text(buf)?),
            MESSAGE_ID => h.message_id = Some(wsp::read_text(buf)?),
            RESPONSE_STATUS => h.response_status = Some(read_u8(buf, "X-Mms-Response-Status")?),
            RESPONSE_TEXT => h.response_text = Some(read_encoded(buf)?),
            RETRIEVE_STATUS => h.retrieve_status = Some(read_u8(buf, "X-Mms-Retrieve-Status")?),
            RETRIEVE_TEXT => h.retrieve_text = Some(read_encoded(buf)?),
            STATUS => h.status = Some(read_u8(buf, "X-Mms-Status")?),
            CONTENT_TYPE => {
                h.content_type = Some(parse_content_type(buf)?);
                break;
            }
            f if f >= 0x80 => {
                debug!("[pdu] skipping unknown header 0x{:02X}", f);
                wsp::skip_value(buf)?;
            }
            f if f >= 0x20 => {
                // Application header: token-text name (first octet already read) then text value.
                wsp::read_text_string(buf)?;
                wsp::read_text_string(buf)?;
            }
            f => return Err(PduError::invalid("header field", format!("0x{:02X}", f))),
        }
    }
    Ok(h)
}

fn to_i64(v: u64, field: &'static str) -> WspResult<i64> {
    i64::try_from(v).map_err(|_| PduError::invalid(field, v.to_string()))
}

fn read_encoded(buf: &mut &[u8]) -> WspResult<EncodedString> {
    let (charset, bytes) = wsp::read_encoded_string(buf)?;
    Ok(EncodedString::from_wire(charset, bytes))
}

fn parse_from(buf: &mut &[u8]) -> WspResult<Option<EncodedString>> {
    let len = wsp::read_value_length(buf)?;
    let mut inner = wsp::read_bytes(buf, len, "From")?;
    match read_u8(&mut inner, "From token")? {
        FROM_ADDRESS_PRESENT => read_encoded(&mut inner).map(Some),
        FROM_INSERT_ADDRESS => Ok(None),
        b => Err(PduError::invalid("From", format!("token 0x{:02X}", b))),
    }
}

fn parse_message_class(buf: &mut &[u8]) -> WspResult<MessageClass> {
    match peek(buf) {
        Some(b) if b >= 0x80 => {
            buf.advance(1);
            MessageClass::from_octet(b)
                .ok_or_else(|| PduError::invalid("X-Mms-Message-Class", format!("0x{:02X}", b)))
        }
        _ => wsp::read_text(buf).map(MessageClass::Token),
    }
}

fn parse_time_value(buf: &mut &[u8]) -> WspResult<TimeValue> {
    let len = wsp::read_value_length(buf)?;
    let mut inner = wsp::read_bytes(buf, len, "time value")?;
    let token = read_u8(&mut inner, "time value token")?;
    let value = to_i64(wsp::read_integer_value(&mut inner)?, "time value")?;
    match token {
        TIME_ABSOLUTE => Ok(TimeValue::Absolute(value)),
        TIME_RELATIVE => Ok(TimeValue::Relative(value)),
        b => Err(PduError::invalid("time value", format!("token 0x{:02X}", b))),
    }
}

fn parse_yes_no(buf: &mut &[u8], field: &'static str) -> WspResult<bool> {
    match read_u8(buf, field)? {
        VALUE_YES => Ok(true),
        VALUE_NO => Ok(false),
        b => Err(PduError::invalid(field, format!("0x{:02X}", b))),
    }
}

fn well_known_type(index: u64) -> WspResult<String> {
    u8::try_from(index)
        .ok()
        .and_then(content_types::by_index)
        .map(str::to_string)
        .ok_or_else(|| PduError::invalid("content type", format!("well-known 0x{:02X}", index)))
}

/// Content-type-value: constrained media (short-integer or text) or the general form
/// (value-length, media type, parameters).
pub(crate) fn parse_content_type(buf: &mut &[u8]) -> WspResult<ContentType> {
    match peek(buf) {
        None => Err(PduError::Truncated("content type")),
        Some(b) if b <= wsp::LENGTH_QUOTE => {
            let len = wsp::read_value_length(buf)?;
            let mut inner = wsp::read_bytes(buf, len, "content type")?;
            let mut ct = ContentType {
                media: parse_media(&mut inner)?,
                ..ContentType::default()
            };
            parse_params(&mut inner, &mut ct)?;
            Ok(ct)
        }
        Some(_) => Ok(ContentType {
            media: parse_media(buf)?,
            ..ContentType::default()
        }),
    }
}

fn parse_media(buf: &mut &[u8]) -> WspResult<String> {
    match peek(buf) {
        Some(b) if b >= 0x80 || b < 0x20 => well_known_type(wsp::read_integer_value(buf)?),
        _ => wsp::read_text(buf),
    }
}

fn parse_params(buf: &mut &[u8], ct: &mut ContentType) -> WspResult<()> {
    while let Some(b) = peek(buf) {
        let param = if b >= 0x80 {
            buf.advance(1);
            b
        } else if b < 0x20 {
            match wsp::read_integer_value(buf)? {
                v if v < 0x80 => v as u8 | 0x80,
                _ => {
                    wsp::skip_value(buf)?;
                    continue;
                }
            }
        } else {
            // Untyped parameter: token-text name then integer or text value.
            wsp::read_text_string(buf)?;
            match peek(buf) {
                Some(v) if v >= 0x80 || v < 0x20 => {
                    wsp::read_integer_value(buf)?;
                }
                _ => {
                    wsp::read_text_string(buf)?;
                }
            }
            continue;
        };
        match param {
            P_TYPE | P_CT_MR_TYPE => ct.type_param = Some(parse_media(buf)?),
            P_START | P_DEP_START => ct.start = Some(strip_angle_brackets(&wsp::read_text(buf)?)),
            P_CHARSET => ct.charset = parse_charset(buf)?,
            P_NAME | P_DEP_NAME => ct.name = Some(wsp::read_text(buf)?),
            P_FILENAME | P_DEP_FILENAME => ct.filename = Some(wsp::read_text(buf)?),
            _ => wsp::skip_value(buf)?,
        }
    }
    Ok(())
}

/// Well-known-charset (integer, 0 meaning any) or a charset name.
fn parse_charset(buf: &mut &[u8]) -> WspResult<Option<u32>> {
    match peek(buf) {
        Some(b) if b >= 0x80 || b < 0x20 => {
            let v = wsp::read_integer_value(buf)?;
            Ok(u32::try_from(v).ok().filter(|v| *v != 0))
        }
        _ => Ok(charset::from_name(&wsp::read_text(buf)?)),
    }
}

fn parse_disposition(buf: &mut &[u8], part: &mut PduPart) -> WspResult<()> {
    let len = wsp::read_value_length(buf)?;
    let mut inner = wsp::read_bytes(buf, len, "Content-Disposition")?;
    match peek(&inner) {
        None => return Ok(()),
        Some(b) if b >= 0x80 => {
            inner.advance(1);
            part.disposition = match b {
                DISPOSITION_FORM_DATA => Some(Disposition::FormData),
                DISPOSITION_ATTACHMENT => Some(Disposition::Attachment),
                DISPOSITION_INLINE => Some(Disposition::Inline),
                _ => None,
            };
        }
        Some(_) => {
            let token = wsp::read_text(&mut inner)?;
            part.disposition = match token.to_ascii_lowercase().as_str() {
                "form-data" => Some(Disposition::FormData),
                "attachment" => Some(Disposition::Attachment),
                "inline" => Some(Disposition::Inline),
                _ => None,
            };
        }
    }
    // Only a leading filename parameter is honoured; the remainder is dropped with the slice.
    if let Some(p) = peek(&inner) {
        if p == P_FILENAME || p == P_DEP_FILENAME {
            inner.advance(1);
            part.filename = Some(wsp::read_text(&mut inner)?);
        }
    }
    Ok(())
}

pub(crate) fn strip_angle_brackets(s: &str) -> String {
    s.strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .unwrap_or(s)
        .to_string()
}

impl HeaderSet {
    fn require<T>(value: Option<T>, name: &'static str) -> WspResult<T> {
        value.ok_or(PduError::MissingHeader(name))
    }

    fn into_pdu(self, message_type: MessageType, body: Option<PduBody>) -> WspResult<GenericPdu> {
        let mms_version = self.mms_version.unwrap_or(MMS_VERSION_1_2);
        Ok(match message_type {
            MessageType::SendReq => {
                let from = Self::require(self.from, "From")?;
                GenericPdu::SendReq(SendReq {
                    transaction_id: Self::require(self.transaction_id, "X-Mms-Transaction-Id")?,
                    mms_version,
                    date: self.date,
                    from,
                    to: self.to,
                    cc: self.cc,
                    bcc: self.bcc,
                    subject: self.subject,
                    message_class: self.message_class,
                    expiry: self.expiry,
                    delivery_time: self.delivery_time,
                    priority: self.priority,
                    delivery_report: self.delivery_report,
                    read_report: self.read_report,
                    message_size: self.message_size,
                    body: Self::require(body, "Content-Type")?,
                })
            }
            MessageType::SendConf => GenericPdu::SendConf(SendConf {
                transaction_id: Self::require(self.transaction_id, "X-Mms-Transaction-Id")?,
                mms_version,
                response_status: Self::require(self.response_status, "X-Mms-Response-Status")?,
                response_text: self.response_text,
                message_id: self.message_id,
            }),
            MessageType::NotificationInd => GenericPdu::NotificationInd(NotificationInd {
                transaction_id: Self::require(self.transaction_id, "X-Mms-Transaction-Id")?,
                mms_version,
                from: self.from.flatten(),
                subject: self.subject,
                message_class: Self::require(self.message_class, "X-Mms-Message-Class")?,
                message_size: Self::require(self.message_size, "X-Mms-Message-Size")?,
                expiry: Self::require(self.expiry, "X-Mms-Expiry")?,
                content_location: Self::require(self.content_location, "X-Mms-Content-Location")?,
                priority: self.priority,
                delivery_report: self.delivery_report,
            }),
            MessageType::NotifyRespInd => GenericPdu::NotifyRespInd(NotifyRespInd {
                transaction_id: Self::require(self.transaction_id, "X-Mms-Transaction-Id")?,
                mms_version,
                status: Self::require(self.status, "X-Mms-Status")?,
                report_allowed: self.report_allowed,
            }),
            MessageType::RetrieveConf => GenericPdu::RetrieveConf(RetrieveConf {
                transaction_id: self.transaction_id,
                mms_version,
                message_id: self.message_id,
                date: Self::require(self.date, "Date")?,
                from: self.from.flatten(),
                to: self.to,
                cc: self.cc,
                subject: self.subject,
                message_class: self.message_class,
                priority: self.priority,
                delivery_report: self.delivery_report,
                read_report: self.read_report,
                retrieve_status: self.retrieve_status,
                retrieve_text: self.retrieve_text,
                body: Self::require(body, "Content-Type")?,
            }),
            MessageType::AcknowledgeInd => GenericPdu::AcknowledgeInd(AcknowledgeInd {
                transaction_id: Self::require(self.transaction_id, "X-Mms-Transaction-Id")?,
                mms_version,
                report_allowed: self.report_allowed,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// notification-ind as a relay would send it.
    fn notification_bytes() -> Vec<u8> {
        let mut v = vec![MESSAGE_TYPE, 0x82, TRANSACTION_ID];
        v.extend_from_slice(b"T123\0");
        v.extend_from_slice(&[MMS_VERSION, 0x92, FROM, 0x0E, FROM_ADDRESS_PRESENT]);
        v.extend_from_slice(b"+15551234567\0");
        v.extend_from_slice(&[MESSAGE_CLASS, CLASS_PERSONAL, MESSAGE_SIZE, 0x02, 0x30, 0x39]);
        v.extend_from_slice(&[EXPIRY, 0x04, TIME_RELATIVE, 0x02, 0x02, 0x58]);
        v.push(CONTENT_LOCATION);
        v.extend_from_slice(b"http://mmsc/abc\0");
        v
    }

    #[test]
    fn parses_notification_ind() {
        let data = notification_bytes();
        let pdu = PduParser::new(&data, true).parse().unwrap();
        let GenericPdu::NotificationInd(n) = pdu else {
            panic!("wrong type: {:?}", pdu);
        };
        assert_eq!(n.transaction_id, "T123");
        assert_eq!(n.from.unwrap().text, "+15551234567");
        assert_eq!(n.message_size, 12345);
        assert_eq!(n.expiry, TimeValue::Relative(600));
        assert_eq!(n.content_location, "http://mmsc/abc");
        assert_eq!(n.message_class, MessageClass::Personal);
    }

    #[test]
    fn missing_mandatory_header() {
        let mut data = notification_bytes();
        let cut = data.iter().position(|b| *b == CONTENT_LOCATION).unwrap();
        data.truncate(cut);
        let err = PduParser::new(&data, true).parse().unwrap_err();
        assert_eq!(err, PduError::MissingHeader("X-Mms-Content-Location"));
    }

    #[test]
    fn unknown_message_type() {
        let data = [MESSAGE_TYPE, 0x9F, TRANSACTION_ID, b'x', 0];
        assert_eq!(PduParser::new(&data, true).parse(), Err(PduError::UnknownMessageType(0x9F)));
    }

    #[test]
    fn truncated_inputs_never_panic() {
        let data = notification_bytes();
        for len in 0..data.len() {
            let _ = PduParser::new(&data[..len], true).parse();
            let _ = PduParser::new(&data[..len], false).parse();
        }
    }

    #[test]
    fn unknown_and_application_headers_are_skipped() {
        let mut data = vec![MESSAGE_TYPE, 0x85, TRANSACTION_ID, b'A', 0];
        data.extend_from_slice(&[0xB0, 0x03, 1, 2, 3]);
        data.extend_from_slice(b"X-Custom\0value\0");
        data.extend_from_slice(&[REPORT_ALLOWED, VALUE_NO]);
        let pdu = PduParser::new(&data, true).parse().unwrap();
        assert_eq!(
            pdu,
            GenericPdu::AcknowledgeInd(AcknowledgeInd {
                transaction_id: "A".into(),
                mms_version: MMS_VERSION_1_2,
                report_allowed: Some(false),
            })
        );
    }

    fn retrieve_conf_with_disposition(disposition: &[u8]) -> Vec<u8> {
        let mut data = vec![MESSAGE_TYPE, 0x84, MMS_VERSION, 0x92, DATE, 0x04, 0x65, 0x00, 0x00, 0x00];
        data.extend_from_slice(&[CONTENT_TYPE, 0x80 | 0x23]);
        let mut header = vec![0x80 | 0x03];
        header.push(PART_CONTENT_ID);
        header.extend_from_slice(b"\"<t1>\0");
        header.extend_from_slice(disposition);
        data.push(1);
        data.push(header.len() as u8);
        data.push(2);
        data.extend_from_slice(&header);
        data.extend_from_slice(b"hi");
        data
    }

    #[test]
    fn disposition_with_length_parses_both_ways() {
        let data = retrieve_conf_with_disposition(&[PART_CONTENT_DISPOSITION, 0x01, DISPOSITION_INLINE]);
        let Ok(GenericPdu::RetrieveConf(with)) = PduParser::new(&data, true).parse() else {
            panic!("strategy with disposition failed");
        };
        assert_eq!(with.body.parts[0].disposition, Some(Disposition::Inline));
        assert_eq!(with.body.parts[0].content_id.as_deref(), Some("t1"));
        let Ok(GenericPdu::RetrieveConf(without)) = PduParser::new(&data, false).parse() else {
            panic!("strategy without disposition failed");
        };
        assert_eq!(without.body.parts[0].disposition, None);
        assert_eq!(&without.body.parts[0].data[..], b"hi");
    }

    #[test]
    fn disposition_without_length_needs_second_strategy() {
        let data = retrieve_conf_with_disposition(&[PART_CONTENT_DISPOSITION, DISPOSITION_ATTACHMENT]);
        assert!(PduParser::new(&data, true).parse().is_err());
        let Ok(GenericPdu::RetrieveConf(rc)) = PduParser::new(&data, false).parse() else {
            panic!("lenient strategy failed");
        };
        assert_eq!(rc.date, 0x6500_0000);
        assert_eq!(rc.body.parts[0].text_content(), "hi");
    }

    #[test]
    fn part_count_larger_than_data_fails_cleanly() {
        let mut data = vec![MESSAGE_TYPE, 0x84, DATE, 0x01, 0x01, CONTENT_TYPE, 0x80 | 0x23];
        data.extend_from_slice(&[0x8F, 0xFF, 0xFF, 0x7F]);
        assert!(matches!(PduParser::new(&data, true).parse(), Err(PduError::Truncated(_))));
    }
}
