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

//! MMS PDU codec (WAP-230 WSP encoding, OMA-MMS-ENC encapsulation).
//!
//! [`encode`] turns a typed [`GenericPdu`] into wire bytes; [`decode`] parses wire bytes,
//! first with part Content-Disposition decoding enabled and then, if that fails, with it
//! disabled. Some carriers send dispositions that do not follow the value-length form.

mod body;
pub mod charset;
mod composer;
pub mod content_types;
mod error;
pub mod headers;
mod parser;
mod transfer_encoding;
mod types;
pub mod wsp;

use rand::Rng;
use tracing::debug;

pub use body::{Disposition, PduBody, PduPart};
pub use composer::encode;
pub use error::PduError;
pub use parser::PduParser;
pub use types::{
    AcknowledgeInd, EncodedString, GenericPdu, MessageClass, MessageType, NotificationInd,
    NotifyRespInd, Priority, RetrieveConf, SendConf, SendReq, TimeValue,
};

const TRANSACTION_ID_LEN: usize = 12;
const TRANSACTION_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Decode a PDU, trying the strict strategy first and the lenient one second.
pub fn decode(data: &[u8]) -> Result<GenericPdu, PduError> {
    match PduParser::new(data, true).parse() {
        Ok(pdu) => Ok(pdu),
        Err(first) => {
            debug!("[pdu] parse with content-disposition failed: {}; retrying without", first);
            PduParser::new(data, false).parse().map_err(|second| {
                debug!("[pdu] parse without content-disposition failed: {}", second);
                PduError::Unparseable(second.to_string())
            })
        }
    }
}

/// Random alphanumeric transaction id for an outgoing send-req.
pub fn new_transaction_id() -> String {
    let mut rng = rand::thread_rng();
    (0..TRANSACTION_ID_LEN)
        .map(|_| TRANSACTION_ID_ALPHABET[rng.gen_range(0..TRANSACTION_ID_ALPHABET.len())] as char)
        .collect()
}

/// Append the PLMN address type to a bare phone number. Email addresses and values that
/// already carry a type are returned unchanged.
pub fn to_wire_address(address: &str) -> String {
    if address.contains('@') || address.contains("/TYPE=") {
        address.to_string()
    } else {
        format!("{}{}", address, headers::PLMN_SUFFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn sample_send_req() -> SendReq {
        let mut body = PduBody::new();
        let mut image = PduPart::new("image/jpeg", Bytes::from_static(&[0xFF, 0xD8, 0xFF, 0xE0]));
        image.set_content_location_and_id("cat.jpg");
        body.add_part(image);
        let mut text = PduPart::text("caf\u{e9}");
        text.set_content_location_and_id("text_0.txt");
        body.add_part(text);
        let mut smil = PduPart::new(content_types::APP_SMIL, Bytes::from_static(b"<smil/>"));
        smil.set_content_location_and_id("smil.xml");
        body.set_smil(smil);

        let mut req = SendReq::new(new_transaction_id(), body);
        req.date = Some(1_790_000_000);
        req.to.push(EncodedString::new(to_wire_address("+15551234567")));
        req.to.push(EncodedString::new(to_wire_address("a@example.org")));
        req.subject = Some(EncodedString::new("Vacances \u{e0} Nice"));
        req.expiry = Some(TimeValue::Relative(7 * 24 * 3600));
        req.priority = Some(Priority::Normal);
        req.delivery_report = Some(false);
        req.read_report = Some(true);
        req
    }

    #[test]
    fn send_req_survives_encode_decode() {
        let req = sample_send_req();
        let bytes = encode(&GenericPdu::SendReq(req.clone())).unwrap();
        let GenericPdu::SendReq(back) = decode(&bytes).unwrap() else {
            panic!("decoded to another type");
        };
        assert_eq!(back.transaction_id, req.transaction_id);
        assert_eq!(back.from, None);
        assert_eq!(back.to[0].text, "+15551234567/TYPE=PLMN");
        assert_eq!(back.to[0].address(), "+15551234567");
        assert_eq!(back.to[1].text, "a@example.org");
        assert_eq!(back.subject.unwrap().text, "Vacances \u{e0} Nice");
        assert_eq!(back.expiry, Some(TimeValue::Relative(604_800)));
        assert_eq!(back.read_report, Some(true));
        assert_eq!(back.body.content_type, content_types::MULTIPART_RELATED);
        assert_eq!(back.body.start.as_deref(), Some("smil"));
        assert_eq!(back.body.parts.len(), 3);
        assert!(back.body.smil_part().is_some());
        assert_eq!(back.body.parts[1].content_id.as_deref(), Some("cat"));
        assert_eq!(back.body.parts[1].content_location.as_deref(), Some("cat.jpg"));
        assert_eq!(&back.body.parts[1].data[..], &[0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(back.body.parts[2].text_content(), "caf\u{e9}");
    }

    #[test]
    fn awkward_subjects_decode_back() {
        let cases = [
            (EncodedString::new(""), ""),
            (EncodedString::new("\nHello"), "\nHello"),
            (EncodedString::new("\u{5}abc"), "\u{5}abc"),
            (EncodedString::new("\tindented"), "\tindented"),
            (
                EncodedString {
                    charset: charset::UCS_2,
                    text: "Hi".to_string(),
                },
                "Hi",
            ),
            (
                EncodedString {
                    charset: charset::UTF_16,
                    text: "\u{4f60}\u{597d}".to_string(),
                },
                "\u{4f60}\u{597d}",
            ),
        ];
        for (subject, expected) in cases {
            let mut req = sample_send_req();
            req.subject = Some(subject.clone());
            let bytes = encode(&GenericPdu::SendReq(req)).unwrap();
            let GenericPdu::SendReq(back) = decode(&bytes).unwrap() else {
                panic!("decoded to another type");
            };
            assert_eq!(back.subject.unwrap().text, expected, "{:?}", subject);
            assert_eq!(back.to.len(), 2);
        }
    }

    #[test]
    fn garbage_is_a_parse_failure() {
        assert!(matches!(decode(&[]), Err(PduError::Unparseable(_))));
        assert!(matches!(decode(&[0x8C]), Err(PduError::Unparseable(_))));
        assert!(matches!(decode(&[0x01, 0x02, 0x03]), Err(PduError::Unparseable(_))));
    }

    #[test]
    fn transaction_ids_are_distinct() {
        let a = new_transaction_id();
        let b = new_transaction_id();
        assert_eq!(a.len(), TRANSACTION_ID_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn wire_address() {
        assert_eq!(to_wire_address("5551234"), "5551234/TYPE=PLMN");
        assert_eq!(to_wire_address("x@y.z"), "x@y.z");
        assert_eq!(to_wire_address("5551234/TYPE=PLMN"), "5551234/TYPE=PLMN");
    }
}
