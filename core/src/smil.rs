/*
 * smil.rs
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

//! SMIL presentation for outgoing multipart messages.
//!
//! One of five layouts is chosen from the kinds of parts present, then each part becomes a
//! `<par>` in input order. Written with the quick-xml writer so `src` values are escaped.

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::writer::Writer;
use thiserror::Error;

use crate::message::PartKind;

/// Display time for parts with no intrinsic duration.
pub const DEFAULT_DURATION_MS: u32 = 5000;

#[derive(Debug, Error)]
#[error("SMIL write failed: {0}")]
pub struct SmilError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    TextOnly,
    VisualAttachmentsOnly,
    VisualAttachmentsWithText,
    NonVisualAttachmentsOnly,
    /// Same layout as [`Template::TextOnly`].
    NonVisualAttachmentsWithText,
}

/// One entry of the presentation: its kind, its `src` (the part's content-location) and its
/// duration where the media has one.
#[derive(Debug, Clone, Copy)]
pub struct SmilPart<'a> {
    pub kind: PartKind,
    pub src: &'a str,
    pub duration_ms: Option<u32>,
}

pub fn select_template<I: IntoIterator<Item = PartKind>>(kinds: I) -> Template {
    let (mut text, mut visual, mut non_visual) = (false, false, false);
    for kind in kinds {
        match kind {
            PartKind::Text => text = true,
            PartKind::Image | PartKind::Video => visual = true,
            PartKind::Audio | PartKind::Other => non_visual = true,
        }
    }
    match (visual, non_visual, text) {
        (true, _, true) => Template::VisualAttachmentsWithText,
        (true, _, false) => Template::VisualAttachmentsOnly,
        (false, true, true) => Template::NonVisualAttachmentsWithText,
        (false, true, false) => Template::NonVisualAttachmentsOnly,
        (false, false, _) => Template::TextOnly,
    }
}

type XmlWriter = Writer<Vec<u8>>;

fn write(w: &mut XmlWriter, event: Event<'_>) -> Result<(), SmilError> {
    w.write_event(event).map_err(|e| SmilError(e.to_string()))
}

fn region(w: &mut XmlWriter, attrs: &[(&str, &str)]) -> Result<(), SmilError> {
    let el = BytesStart::new("region").with_attributes(attrs.iter().copied());
    write(w, Event::Empty(el))
}

fn write_layout(w: &mut XmlWriter, template: Template) -> Result<(), SmilError> {
    write(w, Event::Start(BytesStart::new("layout")))?;
    write(w, Event::Empty(BytesStart::new("root-layout")))?;
    match template {
        Template::TextOnly | Template::NonVisualAttachmentsWithText => {
            region(w, &[("id", "Text"), ("top", "0"), ("left", "0"), ("height", "100%"), ("width", "100%")])?;
        }
        Template::VisualAttachmentsOnly => {
            region(
                w,
                &[("id", "Image"), ("fit", "meet"), ("top", "0"), ("left", "0"), ("height", "100%"), ("width", "100%")],
            )?;
        }
        Template::VisualAttachmentsWithText => {
            region(
                w,
                &[("id", "Image"), ("fit", "meet"), ("top", "0"), ("left", "0"), ("height", "80%"), ("width", "100%")],
            )?;
            region(w, &[("id", "Text"), ("top", "80%"), ("left", "0"), ("height", "20%"), ("width", "100%")])?;
        }
        Template::NonVisualAttachmentsOnly => {}
    }
    write(w, Event::End(BytesEnd::new("layout")))
}

fn write_par(w: &mut XmlWriter, part: &SmilPart<'_>) -> Result<(), SmilError> {
    let timed = matches!(part.kind, PartKind::Video | PartKind::Audio);
    let dur = format!(
        "{}ms",
        if timed {
            part.duration_ms.unwrap_or(DEFAULT_DURATION_MS)
        } else {
            DEFAULT_DURATION_MS
        }
    );
    write(w, Event::Start(BytesStart::new("par").with_attributes([("dur", dur.as_str())])))?;
    let el = match part.kind {
        PartKind::Image => BytesStart::new("img").with_attributes([("src", part.src), ("region", "Image")]),
        PartKind::Video => BytesStart::new("video")
            .with_attributes([("src", part.src), ("dur", dur.as_str()), ("region", "Image")]),
        PartKind::Audio => BytesStart::new("audio").with_attributes([("src", part.src), ("dur", dur.as_str())]),
        PartKind::Text => BytesStart::new("text").with_attributes([("src", part.src), ("region", "Text")]),
        PartKind::Other => BytesStart::new("ref").with_attributes([("src", part.src)]),
    };
    write(w, Event::Empty(el))?;
    write(w, Event::End(BytesEnd::new("par")))
}

/// Build the SMIL document for `parts`.
pub fn build(parts: &[SmilPart<'_>]) -> Result<String, SmilError> {
    let template = select_template(parts.iter().map(|p| p.kind));
    let mut w = Writer::new(Vec::with_capacity(256 + parts.len() * 64));
    write(&mut w, Event::Start(BytesStart::new("smil")))?;
    write(&mut w, Event::Start(BytesStart::new("head")))?;
    write_layout(&mut w, template)?;
    write(&mut w, Event::End(BytesEnd::new("head")))?;
    write(&mut w, Event::Start(BytesStart::new("body")))?;
    for part in parts {
        write_par(&mut w, part)?;
    }
    write(&mut w, Event::End(BytesEnd::new("body")))?;
    write(&mut w, Event::End(BytesEnd::new("smil")))?;
    String::from_utf8(w.into_inner()).map_err(|e| SmilError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(kind: PartKind, src: &str) -> SmilPart<'_> {
        SmilPart {
            kind,
            src,
            duration_ms: None,
        }
    }

    #[test]
    fn template_selection() {
        use PartKind::*;
        let cases: &[(&[PartKind], Template)] = &[
            (&[Text], Template::TextOnly),
            (&[], Template::TextOnly),
            (&[Image], Template::VisualAttachmentsOnly),
            (&[Video, Audio], Template::VisualAttachmentsOnly),
            (&[Text, Image], Template::VisualAttachmentsWithText),
            (&[Audio, Text, Video], Template::VisualAttachmentsWithText),
            (&[Audio], Template::NonVisualAttachmentsOnly),
            (&[Other], Template::NonVisualAttachmentsOnly),
            (&[Audio, Text], Template::NonVisualAttachmentsWithText),
        ];
        for (kinds, expected) in cases {
            assert_eq!(select_template(kinds.iter().copied()), *expected, "{:?}", kinds);
        }
    }

    #[test]
    fn image_with_text_document() {
        let smil = build(&[part(PartKind::Image, "cat.jpg"), part(PartKind::Text, "text_0.txt")]).unwrap();
        assert_eq!(
            smil,
            "<smil><head><layout><root-layout/>\
             <region id=\"Image\" fit=\"meet\" top=\"0\" left=\"0\" height=\"80%\" width=\"100%\"/>\
             <region id=\"Text\" top=\"80%\" left=\"0\" height=\"20%\" width=\"100%\"/>\
             </layout></head><body>\
             <par dur=\"5000ms\"><img src=\"cat.jpg\" region=\"Image\"/></par>\
             <par dur=\"5000ms\"><text src=\"text_0.txt\" region=\"Text\"/></par>\
             </body></smil>"
        );
    }

    #[test]
    fn media_durations_and_escaping() {
        let parts = [
            SmilPart {
                kind: PartKind::Video,
                src: "clip.mp4",
                duration_ms: Some(12_345),
            },
            SmilPart {
                kind: PartKind::Audio,
                src: "a&b.ogg",
                duration_ms: None,
            },
            SmilPart {
                kind: PartKind::Image,
                src: "x.png",
                duration_ms: Some(99),
            },
        ];
        let smil = build(&parts).unwrap();
        assert!(smil.contains("<par dur=\"12345ms\"><video src=\"clip.mp4\" dur=\"12345ms\" region=\"Image\"/></par>"));
        assert!(smil.contains("<par dur=\"5000ms\"><audio src=\"a&amp;b.ogg\" dur=\"5000ms\"/></par>"));
        assert!(smil.contains("<par dur=\"5000ms\"><img src=\"x.png\" region=\"Image\"/></par>"));
    }

    #[test]
    fn non_visual_only_has_no_regions() {
        let smil = build(&[part(PartKind::Other, "card.vcf")]).unwrap();
        assert!(smil.starts_with("<smil><head><layout><root-layout/></layout></head><body>"));
        assert!(smil.contains("<ref src=\"card.vcf\"/>"));
    }
}
