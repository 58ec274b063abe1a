/*
 * transfer_encoding.rs
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

//! Content-Transfer-Encoding for part data. Some relays deliver parts base64 or
//! quoted-printable encoded even though MMS is a binary transport.

use base64::Engine;
use bytes::Bytes;
use tracing::warn;

const HEX_DECODE: [i8; 256] = {
    let mut t = [-1i8; 256];
    let mut i = 0u8;
    while i < 10 {
        t[(b'0' + i) as usize] = i as i8;
        i += 1;
    }
    let mut i = 0u8;
    while i < 6 {
        t[(b'A' + i) as usize] = (10 + i) as i8;
        t[(b'a' + i) as usize] = (10 + i) as i8;
        i += 1;
    }
    t
};

/// Decode `data` according to the named transfer encoding. Identity encodings and unknown
/// names return the data unchanged; undecodable base64 is kept raw.
pub fn decode(encoding: &str, data: Bytes) -> Bytes {
    if encoding.eq_ignore_ascii_case("base64") {
        let compact: Vec<u8> = data.iter().copied().filter(|b| !b.is_ascii_whitespace()).collect();
        match base64::engine::general_purpose::STANDARD.decode(&compact) {
            Ok(decoded) => Bytes::from(decoded),
            Err(e) => {
                warn!("[pdu] base64 part data did not decode ({}), keeping raw", e);
                data
            }
        }
    } else if encoding.eq_ignore_ascii_case("quoted-printable") {
        Bytes::from(decode_quoted_printable(&data))
    } else {
        data
    }
}

/// Quoted-printable: `=XX` escapes and soft line breaks (`=CRLF`, `=LF`). A stray `=` is kept.
pub fn decode_quoted_printable(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len());
    let mut i = 0;
    while i < src.len() {
        let b = src[i];
        if b != b'=' {
            out.push(b);
            i += 1;
            continue;
        }
        match (src.get(i + 1), src.get(i + 2)) {
            (Some(&h1), Some(&h2)) if HEX_DECODE[h1 as usize] >= 0 && HEX_DECODE[h2 as usize] >= 0 => {
                out.push(((HEX_DECODE[h1 as usize] as u8) << 4) | HEX_DECODE[h2 as usize] as u8);
                i += 3;
            }
            (Some(b'\r'), Some(b'\n')) => i += 3,
            (Some(b'\n'), _) => i += 2,
            _ => {
                out.push(b);
                i += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_with_line_breaks() {
        let data = Bytes::from_static(b"aGVs\r\nbG8=");
        assert_eq!(&decode("BASE64", data)[..], b"hello");
    }

    #[test]
    fn bad_base64_is_kept() {
        let data = Bytes::from_static(b"!!!");
        assert_eq!(&decode("base64", data)[..], b"!!!");
    }

    #[test]
    fn quoted_printable_escapes_and_soft_breaks() {
        assert_eq!(decode_quoted_printable(b"caf=C3=A9 =\r\nok=\nyes ="), "caf\u{e9} okyes =".as_bytes());
    }

    #[test]
    fn binary_passthrough() {
        let data = Bytes::from_static(&[0xFF, 0x00]);
        assert_eq!(&decode("binary", data)[..], &[0xFF, 0x00]);
    }
}
