/*
 * types.rs
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

//! Typed MMS PDUs.

use serde::Serialize;

use super::body::PduBody;
use super::charset;
use super::headers;

/// The six PDU types this codec understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    SendReq,
    SendConf,
    NotificationInd,
    NotifyRespInd,
    RetrieveConf,
    AcknowledgeInd,
}

impl MessageType {
    pub fn from_octet(b: u8) -> Option<Self> {
        Some(match b {
            0x80 => Self::SendReq,
            0x81 => Self::SendConf,
            0x82 => Self::NotificationInd,
            0x83 => Self::NotifyRespInd,
            0x84 => Self::RetrieveConf,
            0x85 => Self::AcknowledgeInd,
            _ => return None,
        })
    }

    pub fn octet(self) -> u8 {
        match self {
            Self::SendReq => 0x80,
            Self::SendConf => 0x81,
            Self::NotificationInd => 0x82,
            Self::NotifyRespInd => 0x83,
            Self::RetrieveConf => 0x84,
            Self::AcknowledgeInd => 0x85,
        }
    }
}

/// A string value that travels with its MIBenum charset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedString {
    pub charset: u32,
    pub text: String,
}

impl EncodedString {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            charset: charset::UTF_8,
            text: text.into(),
        }
    }

    pub(crate) fn from_wire(charset: Option<u32>, bytes: &[u8]) -> Self {
        let charset = charset.unwrap_or(charset::UTF_8);
        Self {
            charset,
            text: charset::decode(bytes, charset),
        }
    }

    /// Charset and octets to put on the wire. UCS-2 and UTF-16 go out as UTF-8.
    pub(crate) fn to_wire(&self) -> (u32, Vec<u8>) {
        match self.charset {
            charset::UCS_2 | charset::UTF_16 => (charset::UTF_8, self.text.as_bytes().to_vec()),
            mib => (mib, charset::encode(&self.text, mib)),
        }
    }

    /// Address with any `/TYPE=...` suffix removed.
    pub fn address(&self) -> &str {
        match self.text.find("/TYPE=") {
            Some(i) => &self.text[..i],
            None => &self.text,
        }
    }
}

impl From<&str> for EncodedString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Expiry and delivery time: an absolute date (seconds since epoch) or a delta in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeValue {
    Absolute(i64),
    Relative(i64),
}

impl TimeValue {
    /// Resolve to seconds since epoch given the PDU's reception time.
    pub fn resolve(self, now: i64) -> i64 {
        match self {
            Self::Absolute(t) => t,
            Self::Relative(d) => now.saturating_add(d),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
}

impl Priority {
    pub fn from_octet(b: u8) -> Option<Self> {
        match b {
            headers::PRIORITY_LOW => Some(Self::Low),
            headers::PRIORITY_NORMAL => Some(Self::Normal),
            headers::PRIORITY_HIGH => Some(Self::High),
            _ => None,
        }
    }

    pub fn octet(self) -> u8 {
        match self {
            Self::Low => headers::PRIORITY_LOW,
            Self::Normal => headers::PRIORITY_NORMAL,
            Self::High => headers::PRIORITY_HIGH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageClass {
    Personal,
    Advertisement,
    Informational,
    Auto,
    Token(String),
}

impl MessageClass {
    pub fn from_octet(b: u8) -> Option<Self> {
        match b {
            headers::CLASS_PERSONAL => Some(Self::Personal),
            headers::CLASS_ADVERTISEMENT => Some(Self::Advertisement),
            headers::CLASS_INFORMATIONAL => Some(Self::Informational),
            headers::CLASS_AUTO => Some(Self::Auto),
            _ => None,
        }
    }

    pub fn octet(&self) -> Option<u8> {
        match self {
            Self::Personal => Some(headers::CLASS_PERSONAL),
            Self::Advertisement => Some(headers::CLASS_ADVERTISEMENT),
            Self::Informational => Some(headers::CLASS_INFORMATIONAL),
            Self::Auto => Some(headers::CLASS_AUTO),
            Self::Token(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendReq {
    pub transaction_id: String,
    pub mms_version: u8,
    pub date: Option<i64>,
    /// `None` asks the relay to insert the sender address.
    pub from: Option<EncodedString>,
    pub to: Vec<EncodedString>,
    pub cc: Vec<EncodedString>,
    pub bcc: Vec<EncodedString>,
    pub subject: Option<EncodedString>,
    pub message_class: Option<MessageClass>,
    pub expiry: Option<TimeValue>,
    pub delivery_time: Option<TimeValue>,
    pub priority: Option<Priority>,
    pub delivery_report: Option<bool>,
    pub read_report: Option<bool>,
    pub message_size: Option<u64>,
    pub body: PduBody,
}

impl SendReq {
    pub fn new(transaction_id: impl Into<String>, body: PduBody) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            mms_version: headers::MMS_VERSION_1_2,
            date: None,
            from: None,
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: None,
            message_class: Some(MessageClass::Personal),
            expiry: None,
            delivery_time: None,
            priority: None,
            delivery_report: None,
            read_report: None,
            message_size: None,
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendConf {
    pub transaction_id: String,
    pub mms_version: u8,
    pub response_status: u8,
    pub response_text: Option<EncodedString>,
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationInd {
    pub transaction_id: String,
    pub mms_version: u8,
    pub from: Option<EncodedString>,
    pub subject: Option<EncodedString>,
    pub message_class: MessageClass,
    pub message_size: u64,
    pub expiry: TimeValue,
    pub content_location: String,
    pub priority: Option<Priority>,
    pub delivery_report: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotifyRespInd {
    pub transaction_id: String,
    pub mms_version: u8,
    pub status: u8,
    pub report_allowed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrieveConf {
    pub transaction_id: Option<String>,
    pub mms_version: u8,
    pub message_id: Option<String>,
    pub date: i64,
    pub from: Option<EncodedString>,
    pub to: Vec<EncodedString>,
    pub cc: Vec<EncodedString>,
    pub subject: Option<EncodedString>,
    pub message_class: Option<MessageClass>,
    pub priority: Option<Priority>,
    pub delivery_report: Option<bool>,
    pub read_report: Option<bool>,
    pub retrieve_status: Option<u8>,
    pub retrieve_text: Option<EncodedString>,
    pub body: PduBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcknowledgeInd {
    pub transaction_id: String,
    pub mms_version: u8,
    pub report_allowed: Option<bool>,
}

/// Any decoded or to-be-encoded PDU.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GenericPdu {
    SendReq(SendReq),
    SendConf(SendConf),
    NotificationInd(NotificationInd),
    NotifyRespInd(NotifyRespInd),
    RetrieveConf(RetrieveConf),
    AcknowledgeInd(AcknowledgeInd),
}

impl GenericPdu {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::SendReq(_) => MessageType::SendReq,
            Self::SendConf(_) => MessageType::SendConf,
            Self::NotificationInd(_) => MessageType::NotificationInd,
            Self::NotifyRespInd(_) => MessageType::NotifyRespInd,
            Self::RetrieveConf(_) => MessageType::RetrieveConf,
            Self::AcknowledgeInd(_) => MessageType::AcknowledgeInd,
        }
    }

    pub fn transaction_id(&self) -> Option<&str> {
        match self {
            Self::SendReq(p) => Some(&p.transaction_id),
            Self::SendConf(p) => Some(&p.transaction_id),
            Self::NotificationInd(p) => Some(&p.transaction_id),
            Self::NotifyRespInd(p) => Some(&p.transaction_id),
            Self::RetrieveConf(p) => p.transaction_id.as_deref(),
            Self::AcknowledgeInd(p) => Some(&p.transaction_id),
        }
    }
}
