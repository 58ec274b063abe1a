/*
 * filename_codec.rs
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

//! Encode/decode record keys (conversation ids, part names) for safe filesystem storage.
//! Uses =XX hex for non-ASCII, path separators, and Windows-forbidden chars.

const SAFE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789._-";

fn needs_encode(c: u8) -> bool {
    !SAFE_CHARS.contains(&c)
}

fn hex_digit_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

/// Encode a key as a single filename. The empty key and `.`/`..` are escaped so the result
/// always names a plain file.
pub fn encode(key: &str) -> String {
    if key.is_empty() {
        return "=".to_string();
    }
    if key == "." || key == ".." {
        return key.bytes().map(|b| format!("={:02X}", b)).collect();
    }
    if !key.bytes().any(needs_encode) {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len() * 3);
    for b in key.bytes() {
        if needs_encode(b) {
            out.push_str(&format!("={:02X}", b));
        } else {
            out.push(b as char);
        }
    }
    out
}

/// Decode a filename produced by [`encode`].
pub fn decode(encoded: &str) -> String {
    if encoded == "=" {
        return String::new();
    }
    if !encoded.contains('=') {
        return encoded.to_string();
    }
    let bytes = encoded.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'=' && i + 2 < bytes.len() {
            if let (Some(high), Some(low)) = (hex_digit_value(bytes[i + 1]), hex_digit_value(bytes[i + 2])) {
                result.push(high << 4 | low);
                i += 3;
                continue;
            }
        }
        result.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&result).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for key in ["conv-1", "+1 (555) 010", "a/b\\c", "ünï", "", ".", "..", "x=41"] {
            let enc = encode(key);
            assert!(!enc.contains('/'));
            assert_eq!(decode(&enc), key, "key {:?}", key);
        }
        assert_eq!(encode("conv-1"), "conv-1");
        assert_eq!(encode("a b"), "a=20b");
    }

    #[test]
    fn trailing_escape_decodes() {
        assert_eq!(decode("ab=2F"), "ab/");
        assert_eq!(decode("ab=2"), "ab=2");
    }
}
