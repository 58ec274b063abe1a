/*
 * uri.rs
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

//! Locator schemes for message records and scratch media.
//!
//! Messages: `missiva://message/<row>`. Scratch media parts:
//! `missiva://scratch/<id>/<name>` with the name percent-encoded as a path segment.
//! File-backed stores: `missiva-file:///absolute/path` (three slashes).

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

const MESSAGE_PREFIX: &str = "missiva://message/";
const SCRATCH_PREFIX: &str = "missiva://scratch/";

/// Path segment safe set: encode / ? # [ ] @ % and space.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b'/')
    .add(b'?')
    .add(b'#')
    .add(b'[')
    .add(b']')
    .add(b'@')
    .add(b'%')
    .add(b' ');

fn path_with_leading_slash(path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", path)
    }
}

pub fn message_uri(row_id: u64) -> String {
    format!("{}{}", MESSAGE_PREFIX, row_id)
}

/// Row id from a message locator, or `None` if the locator has no numeric last segment.
pub fn parse_row_id(uri: &str) -> Option<u64> {
    let last = uri.trim_end_matches('/').rsplit('/').next()?;
    last.parse().ok()
}

pub fn scratch_part_uri(id: &str, name: &str) -> String {
    format!("{}{}/{}", SCRATCH_PREFIX, encode_segment(id), encode_segment(name))
}

/// Split a scratch locator into (id, name).
pub fn parse_scratch_part_uri(uri: &str) -> Option<(String, String)> {
    let rest = uri.strip_prefix(SCRATCH_PREFIX)?;
    let (id, name) = rest.split_once('/')?;
    if id.is_empty() {
        return None;
    }
    Some((decode_segment(id), decode_segment(name)))
}

pub fn file_store_uri(path: &str) -> String {
    format!("missiva-file://{}", path_with_leading_slash(path))
}

pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

pub fn decode_segment(encoded: &str) -> String {
    percent_encoding::percent_decode_str(encoded).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_id_from_locator() {
        assert_eq!(parse_row_id(&message_uri(42)), Some(42));
        assert_eq!(parse_row_id("content://mms/17"), Some(17));
        assert_eq!(parse_row_id("missiva://message/abc"), None);
        assert_eq!(parse_row_id(""), None);
    }

    #[test]
    fn scratch_names_are_encoded() {
        let u = scratch_part_uri("7", "my photo/1.jpg");
        assert_eq!(u, "missiva://scratch/7/my%20photo%2F1.jpg");
        assert_eq!(parse_scratch_part_uri(&u), Some(("7".to_string(), "my photo/1.jpg".to_string())));
        assert_eq!(parse_scratch_part_uri("missiva://message/7"), None);
    }

    #[test]
    fn file_store_three_slashes() {
        assert_eq!(file_store_uri("/var/lib/missiva/"), "missiva-file:///var/lib/missiva");
    }
}
