/*
 * body.rs
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

//! Multipart body model: ordered parts plus the root content type.

use bytes::Bytes;
use serde::{Serialize, Serializer};

use super::charset;
use super::content_types;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Disposition {
    FormData,
    Attachment,
    Inline,
}

/// One body part.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PduPart {
    pub content_type: String,
    pub charset: Option<u32>,
    pub name: Option<String>,
    pub filename: Option<String>,
    pub content_location: Option<String>,
    /// Content-ID without the surrounding angle brackets.
    pub content_id: Option<String>,
    pub disposition: Option<Disposition>,
    #[serde(rename = "size", serialize_with = "serialize_len")]
    pub data: Bytes,
}

fn serialize_len<S: Serializer>(data: &Bytes, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(data.len() as u64)
}

impl PduPart {
    pub fn new(content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.into(),
            data: data.into(),
            ..Self::default()
        }
    }

    /// A `text/plain` part encoded as UTF-8.
    pub fn text(text: &str) -> Self {
        Self {
            charset: Some(charset::UTF_8),
            ..Self::new(content_types::TEXT_PLAIN, Bytes::copy_from_slice(text.as_bytes()))
        }
    }

    /// Tag the part with a content-location equal to `filename` and a content-id equal to the
    /// filename without its extension (or the whole filename if it has none).
    pub fn set_content_location_and_id(&mut self, filename: &str) {
        let id = match filename.rfind('.') {
            Some(dot) if dot > 0 => &filename[..dot],
            _ => filename,
        };
        self.content_location = Some(filename.to_string());
        self.content_id = Some(id.to_string());
    }

    /// Decoded text content, honouring the charset parameter.
    pub fn text_content(&self) -> String {
        charset::decode(&self.data, self.charset.unwrap_or(charset::UTF_8))
    }

    pub fn is_smil(&self) -> bool {
        self.content_type.eq_ignore_ascii_case(content_types::APP_SMIL)
    }
}

/// Body of a send-req or retrieve-conf.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PduBody {
    /// Root content type; multipart related or mixed.
    pub content_type: String,
    /// Content-ID (without brackets) of the start part, for multipart related.
    pub start: Option<String>,
    pub parts: Vec<PduPart>,
}

impl PduBody {
    pub fn new() -> Self {
        Self {
            content_type: content_types::MULTIPART_MIXED.to_string(),
            start: None,
            parts: Vec::new(),
        }
    }

    /// Put a SMIL part first and mark it as the start of a multipart related body.
    pub fn set_smil(&mut self, mut smil: PduPart) {
        let id = smil.content_id.clone().unwrap_or_else(|| "smil".to_string());
        if smil.content_location.is_none() {
            smil.content_location = Some("smil.xml".to_string());
        }
        smil.content_id = Some(id.clone());
        self.parts.insert(0, smil);
        self.start = Some(id);
        self.content_type = content_types::MULTIPART_RELATED.to_string();
    }

    pub fn add_part(&mut self, part: PduPart) {
        self.parts.push(part);
    }

    pub fn part_by_content_id(&self, id: &str) -> Option<&PduPart> {
        self.parts.iter().find(|p| p.content_id.as_deref() == Some(id))
    }

    /// The SMIL part: the declared start part when present, otherwise the first SMIL part.
    pub fn smil_part(&self) -> Option<&PduPart> {
        self.start
            .as_deref()
            .and_then(|s| self.part_by_content_id(s))
            .filter(|p| p.is_smil())
            .or_else(|| self.parts.iter().find(|p| p.is_smil()))
    }

    pub fn data_size(&self) -> usize {
        self.parts.iter().map(|p| p.data.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_id_from_filename() {
        let mut part = PduPart::new("image/jpeg", Bytes::from_static(b"\xFF\xD8"));
        part.set_content_location_and_id("photo.2026.jpg");
        assert_eq!(part.content_location.as_deref(), Some("photo.2026.jpg"));
        assert_eq!(part.content_id.as_deref(), Some("photo.2026"));

        part.set_content_location_and_id("noext");
        assert_eq!(part.content_id.as_deref(), Some("noext"));

        part.set_content_location_and_id(".hidden");
        assert_eq!(part.content_id.as_deref(), Some(".hidden"));
    }

    #[test]
    fn smil_becomes_start() {
        let mut body = PduBody::new();
        body.add_part(PduPart::text("hello"));
        body.set_smil(PduPart::new(content_types::APP_SMIL, Bytes::from_static(b"<smil/>")));
        assert_eq!(body.content_type, content_types::MULTIPART_RELATED);
        assert_eq!(body.start.as_deref(), Some("smil"));
        assert!(body.parts[0].is_smil());
        assert!(body.smil_part().is_some());
        assert_eq!(body.parts[1].text_content(), "hello");
    }
}
