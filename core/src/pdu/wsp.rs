/*
 * wsp.rs
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

//! WSP primitive encoding (WAP-230 section 8.4.2).
//!
//! Readers take `&mut &[u8]` and advance it; every read checks bounds first so truncated input
//! yields [`PduError::Truncated`] rather than a panic. Writers append to any [`BufMut`].

use bytes::{Buf, BufMut, BytesMut};

use super::error::PduError;

/// Quote octet preceding a text-string whose first character is >= 0x80.
pub const QUOTE: u8 = 0x7F;
/// Quote octet preceding a quoted-string.
pub const QUOTED_STRING_START: u8 = 0x22;
/// Value-length prefix meaning "a uintvar length follows".
pub const LENGTH_QUOTE: u8 = 0x1F;
/// Largest length encodable as a short-length.
pub const SHORT_LENGTH_MAX: u8 = 0x1E;

const UINTVAR_MAX_OCTETS: usize = 5;
const LONG_INTEGER_MAX_OCTETS: usize = 8;

pub type WspResult<T> = Result<T, PduError>;

pub fn peek(buf: &&[u8]) -> Option<u8> {
    buf.first().copied()
}

pub fn read_u8(buf: &mut &[u8], what: &'static str) -> WspResult<u8> {
    if !buf.has_remaining() {
        return Err(PduError::Truncated(what));
    }
    Ok(buf.get_u8())
}

pub fn read_bytes<'a>(buf: &mut &'a [u8], len: usize, what: &'static str) -> WspResult<&'a [u8]> {
    if buf.len() < len {
        return Err(PduError::Truncated(what));
    }
    let (head, tail) = buf.split_at(len);
    *buf = tail;
    Ok(head)
}

pub fn skip(buf: &mut &[u8], len: usize, what: &'static str) -> WspResult<()> {
    read_bytes(buf, len, what).map(|_| ())
}

/// Variable-length unsigned integer: 7 bits per octet, high bit set on all but the last.
pub fn read_uintvar(buf: &mut &[u8]) -> WspResult<u32> {
    let mut value: u64 = 0;
    for _ in 0..UINTVAR_MAX_OCTETS {
        let b = read_u8(buf, "uintvar")?;
        value = (value << 7) | u64::from(b & 0x7F);
        if b & 0x80 == 0 {
            return u32::try_from(value).map_err(|_| PduError::invalid("uintvar", "exceeds 32 bits"));
        }
    }
    Err(PduError::invalid("uintvar", "runaway continuation bits"))
}

/// Short-integer: one octet with the high bit set, value in the low 7 bits.
pub fn read_short_integer(buf: &mut &[u8]) -> WspResult<u8> {
    let b = read_u8(buf, "short-integer")?;
    if b & 0x80 == 0 {
        return Err(PduError::invalid("short-integer", format!("0x{:02X} lacks high bit", b)));
    }
    Ok(b & 0x7F)
}

/// Long-integer: short-length octet count followed by big-endian octets.
pub fn read_long_integer(buf: &mut &[u8]) -> WspResult<u64> {
    let len = read_u8(buf, "long-integer length")? as usize;
    if len == 0 || len > LONG_INTEGER_MAX_OCTETS {
        return Err(PduError::invalid("long-integer", format!("length {}", len)));
    }
    let octets = read_bytes(buf, len, "long-integer")?;
    Ok(octets.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
}

/// Integer-value: short-integer or long-integer.
pub fn read_integer_value(buf: &mut &[u8]) -> WspResult<u64> {
    match peek(buf) {
        None => Err(PduError::Truncated("integer-value")),
        Some(b) if b & 0x80 != 0 => read_short_integer(buf).map(u64::from),
        Some(_) => read_long_integer(buf),
    }
}

/// Value-length: short-length (0..=30) or length-quote followed by a uintvar.
pub fn read_value_length(buf: &mut &[u8]) -> WspResult<usize> {
    let b = read_u8(buf, "value-length")?;
    let len = if b <= SHORT_LENGTH_MAX {
        b as usize
    } else if b == LENGTH_QUOTE {
        read_uintvar(buf)? as usize
    } else {
        return Err(PduError::invalid("value-length", format!("0x{:02X}", b)));
    };
    if len > buf.remaining() {
        return Err(PduError::Truncated("value-length body"));
    }
    Ok(len)
}

fn read_until_nul<'a>(buf: &mut &'a [u8], what: &'static str) -> WspResult<&'a [u8]> {
    let end = buf.iter().position(|b| *b == 0).ok_or(PduError::Truncated(what))?;
    let s = &buf[..end];
    buf.advance(end + 1);
    Ok(s)
}

/// Text-string: optional 0x7F quote, octets, NUL terminator. Returns the raw octets.
pub fn read_text_string<'a>(buf: &mut &'a [u8]) -> WspResult<&'a [u8]> {
    if peek(buf) == Some(QUOTE) {
        buf.advance(1);
    }
    read_until_nul(buf, "text-string")
}

/// Quoted-string: optional 0x22 quote, octets, NUL terminator.
pub fn read_quoted_string<'a>(buf: &mut &'a [u8]) -> WspResult<&'a [u8]> {
    if peek(buf) == Some(QUOTED_STRING_START) {
        buf.advance(1);
    }
    read_until_nul(buf, "quoted-string")
}

/// Text-string decoded leniently as UTF-8.
pub fn read_text(buf: &mut &[u8]) -> WspResult<String> {
    read_text_string(buf).map(|s| String::from_utf8_lossy(s).into_owned())
}

/// Encoded-string-value: either a text-string, or value-length + charset + text-string.
/// Returns (MIBenum charset if present, raw octets).
pub fn read_encoded_string<'a>(buf: &mut &'a [u8]) -> WspResult<(Option<u32>, &'a [u8])> {
    match peek(buf) {
        None => Err(PduError::Truncated("encoded-string-value")),
        Some(b) if b <= LENGTH_QUOTE => {
            let len = read_value_length(buf)?;
            let mut inner = read_bytes(buf, len, "encoded-string-value")?;
            let charset = read_integer_value(&mut inner)?;
            let charset = u32::try_from(charset)
                .map_err(|_| PduError::invalid("charset", charset.to_string()))?;
            let text = read_text_string(&mut inner)?;
            Ok((Some(charset), text))
        }
        Some(_) => read_text_string(buf).map(|s| (None, s)),
    }
}

/// Skip one WSP value of unknown meaning. Handles value-length, text and short-integer forms.
pub fn skip_value(buf: &mut &[u8]) -> WspResult<()> {
    match peek(buf) {
        None => Err(PduError::Truncated("value")),
        Some(b) if b <= LENGTH_QUOTE => {
            let len = read_value_length(buf)?;
            skip(buf, len, "value")
        }
        Some(b) if b < 0x80 => read_text_string(buf).map(|_| ()),
        Some(_) => {
            buf.advance(1);
            Ok(())
        }
    }
}

pub fn put_uintvar<B: BufMut>(out: &mut B, value: u32) {
    let mut octets = [0u8; UINTVAR_MAX_OCTETS];
    let mut i = UINTVAR_MAX_OCTETS;
    let mut v = value;
    loop {
        i -= 1;
        octets[i] = (v & 0x7F) as u8;
        v >>= 7;
        if v == 0 {
            break;
        }
    }
    for (n, b) in octets[i..].iter().enumerate() {
        let last = i + n == UINTVAR_MAX_OCTETS - 1;
        out.put_u8(if last { *b } else { *b | 0x80 });
    }
}

pub fn put_short_integer<B: BufMut>(out: &mut B, value: u8) {
    out.put_u8(value | 0x80);
}

pub fn put_long_integer<B: BufMut>(out: &mut B, value: u64) {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count().min(7);
    out.put_u8((8 - skip) as u8);
    out.put_slice(&bytes[skip..]);
}

pub fn put_integer_value<B: BufMut>(out: &mut B, value: u64) {
    if value < 0x80 {
        put_short_integer(out, value as u8);
    } else {
        put_long_integer(out, value);
    }
}

pub fn put_value_length<B: BufMut>(out: &mut B, len: usize) {
    if len <= SHORT_LENGTH_MAX as usize {
        out.put_u8(len as u8);
    } else {
        out.put_u8(LENGTH_QUOTE);
        put_uintvar(out, len as u32);
    }
}

/// Append `body` prefixed with its value-length.
pub fn put_length_prefixed<B: BufMut>(out: &mut B, body: &[u8]) {
    put_value_length(out, body.len());
    out.put_slice(body);
}

pub fn put_text_string<B: BufMut>(out: &mut B, text: &[u8]) {
    if text.first().is_some_and(|b| *b & 0x80 != 0 || *b == QUOTE) {
        out.put_u8(QUOTE);
    }
    out.put_slice(text);
    out.put_u8(0);
}

pub fn put_quoted_string<B: BufMut>(out: &mut B, text: &[u8]) {
    out.put_u8(QUOTED_STRING_START);
    out.put_slice(text);
    out.put_u8(0);
}

/// Encoded-string-value. Non-empty ASCII text that does not open with a control octet is
/// written as a bare text-string; anything else carries its MIBenum charset. The charset must
/// be ASCII-compatible: NUL-terminated text cannot carry 16-bit units.
pub fn put_encoded_string<B: BufMut>(out: &mut B, charset: u32, text: &[u8]) {
    let bare = text.first().is_some_and(|b| *b >= 0x20) && text.is_ascii();
    if bare {
        put_text_string(out, text);
        return;
    }
    let mut inner = BytesMut::with_capacity(text.len() + 4);
    put_integer_value(&mut inner, u64::from(charset));
    put_text_string(&mut inner, text);
    put_length_prefixed(out, &inner);
}
