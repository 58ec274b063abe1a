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

//! Message records: what a draft becomes when sent, and what a received PDU becomes.

pub mod address;
pub mod text_stats;

use serde::{Deserialize, Serialize};

use crate::message_id::MessageId;
use crate::pdu::{MessageClass, MessageType, Priority};
use crate::status::MessageStatus;

/// Maximum characters kept from a received text part.
pub const MMS_TEXT_LIMIT_DEFAULT: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    Text,
    Image,
    Video,
    Audio,
    Other,
}

impl PartKind {
    pub fn from_content_type(content_type: &str) -> Self {
        let ct = content_type.trim().to_ascii_lowercase();
        let ct = ct.split(';').next().unwrap_or("").trim();
        if ct == "text/plain" || ct == "text/html" {
            Self::Text
        } else if ct.starts_with("image/") {
            Self::Image
        } else if ct.starts_with("video/") {
            Self::Video
        } else if ct.starts_with("audio/") || ct == "application/ogg" {
            Self::Audio
        } else {
            Self::Other
        }
    }

    pub fn is_visual(self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

/// One part of a message: inline text or media behind a scratch locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePart {
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Locator of the media data, owned by a [`crate::store::MediaScratch`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Attachment whose data has not been persisted yet.
    #[serde(default)]
    pub pending: bool,
}

impl MessagePart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text/plain".to_string(),
            text: Some(text.into()),
            content_uri: None,
            width: None,
            height: None,
            duration_ms: None,
            size: None,
            pending: false,
        }
    }

    pub fn empty() -> Self {
        Self::text("")
    }

    pub fn media(content_type: impl Into<String>, content_uri: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            text: None,
            content_uri: Some(content_uri.into()),
            width: None,
            height: None,
            duration_ms: None,
            size: None,
            pending: false,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn pending(mut self) -> Self {
        self.pending = true;
        self
    }

    pub fn kind(&self) -> PartKind {
        PartKind::from_content_type(&self.content_type)
    }

    pub fn is_text(&self) -> bool {
        self.kind() == PartKind::Text && self.content_uri.is_none()
    }

    pub fn is_attachment(&self) -> bool {
        !self.is_text()
    }

    /// Bytes this part contributes to an MMS: text length, or the attachment size if known.
    pub fn estimated_size(&self) -> u64 {
        match (&self.text, self.size) {
            (_, Some(size)) => size,
            (Some(text), None) => text.len() as u64,
            (None, None) => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Protocol {
    Sms,
    Mms,
    /// An MMS known only through its notification; content not yet downloaded.
    MmsPushNotification,
}

/// MMS-specific fields of a message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MmsInfo {
    pub subject: Option<String>,
    pub transaction_id: Option<String>,
    pub content_location: Option<String>,
    /// Seconds since epoch after which the relay discards the message.
    pub expiry: Option<i64>,
    pub message_type: Option<u8>,
    pub priority: Option<u8>,
    pub message_class: Option<String>,
}

impl MmsInfo {
    pub fn set_message_type(&mut self, t: MessageType) {
        self.message_type = Some(t.octet());
    }

    pub fn set_priority(&mut self, p: Option<Priority>) {
        self.priority = p.map(Priority::octet);
    }

    pub fn set_message_class(&mut self, class: &MessageClass) {
        self.message_class = Some(match class {
            MessageClass::Personal => "personal".to_string(),
            MessageClass::Advertisement => "advertisement".to_string(),
            MessageClass::Informational => "informational".to_string(),
            MessageClass::Auto => "auto".to_string(),
            MessageClass::Token(t) => t.clone(),
        });
    }
}

/// A message record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Record id assigned by the store on insert.
    pub id: Option<MessageId>,
    pub conversation_id: String,
    pub self_id: Option<String>,
    /// Sender participant for incoming messages.
    pub participant_id: Option<String>,
    /// Recipients for outgoing messages.
    #[serde(default)]
    pub recipients: Vec<String>,
    pub received_timestamp: i64,
    pub sent_timestamp: i64,
    pub protocol: Protocol,
    pub status: MessageStatus,
    pub raw_status: i32,
    pub size: u64,
    pub mms: Option<MmsInfo>,
    pub parts: Vec<MessagePart>,
}

impl Message {
    /// A draft ready to send. The text part, when there is text, comes first. MMS is chosen
    /// when there are attachments or a subject.
    pub fn draft(
        conversation_id: &str,
        self_id: Option<&str>,
        text: &str,
        subject: &str,
        attachments: &[MessagePart],
    ) -> Self {
        let is_mms = !attachments.is_empty() || !subject.is_empty();
        let mut parts = Vec::with_capacity(attachments.len() + 1);
        if !text.is_empty() {
            parts.push(MessagePart::text(text));
        }
        parts.extend(attachments.iter().cloned());
        let mut message = Self {
            id: None,
            conversation_id: conversation_id.to_string(),
            self_id: self_id.map(str::to_string),
            participant_id: self_id.map(str::to_string),
            recipients: Vec::new(),
            received_timestamp: 0,
            sent_timestamp: 0,
            protocol: if is_mms { Protocol::Mms } else { Protocol::Sms },
            status: MessageStatus::OutgoingDraft,
            raw_status: 0,
            size: 0,
            mms: is_mms.then(|| MmsInfo {
                subject: (!subject.is_empty()).then(|| subject.to_string()),
                ..MmsInfo::default()
            }),
            parts,
        };
        message.ensure_part();
        message.size = message.parts.iter().map(MessagePart::estimated_size).sum();
        message
    }

    /// Add an empty text part if the message has none.
    pub fn ensure_part(&mut self) {
        if self.parts.is_empty() {
            self.parts.push(MessagePart::empty());
        }
    }

    pub fn direction(&self) -> Direction {
        if self.status.is_incoming() {
            Direction::Incoming
        } else {
            Direction::Outgoing
        }
    }

    pub fn subject(&self) -> Option<&str> {
        self.mms.as_ref().and_then(|m| m.subject.as_deref())
    }

    /// All text parts joined with newlines.
    pub fn message_text(&self) -> String {
        self.parts
            .iter()
            .filter(|p| p.is_text())
            .filter_map(|p| p.text.as_deref())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn attachments(&self) -> impl Iterator<Item = &MessagePart> {
        self.parts.iter().filter(|p| p.is_attachment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_from_mime() {
        assert_eq!(PartKind::from_content_type("text/plain; charset=utf-8"), PartKind::Text);
        assert_eq!(PartKind::from_content_type("IMAGE/PNG"), PartKind::Image);
        assert_eq!(PartKind::from_content_type("video/3gpp"), PartKind::Video);
        assert_eq!(PartKind::from_content_type("application/ogg"), PartKind::Audio);
        assert_eq!(PartKind::from_content_type("text/x-vCard"), PartKind::Other);
        assert!(PartKind::Video.is_visual());
    }

    #[test]
    fn draft_orders_text_first_and_picks_protocol() {
        let image = MessagePart::media("image/jpeg", "missiva://scratch/1").with_size(2048);
        let m = Message::draft("c1", Some("self"), "hi", "", &[image]);
        assert_eq!(m.protocol, Protocol::Mms);
        assert!(m.parts[0].is_text());
        assert_eq!(m.parts[1].kind(), PartKind::Image);
        assert_eq!(m.size, 2050);
        assert_eq!(m.direction(), Direction::Outgoing);

        let sms = Message::draft("c1", None, "hi", "", &[]);
        assert_eq!(sms.protocol, Protocol::Sms);
        assert!(sms.mms.is_none());
    }

    #[test]
    fn empty_draft_gets_a_part() {
        let m = Message::draft("c1", None, "", "subject only", &[]);
        assert_eq!(m.parts.len(), 1);
        assert_eq!(m.parts[0].text.as_deref(), Some(""));
        assert_eq!(m.subject(), Some("subject only"));
        assert_eq!(m.message_text(), "");
    }
}
