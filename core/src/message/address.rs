/*
 * address.rs
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

//! Address helpers for MMS senders and recipients.
//!
//! MMS relays report senders either as phone numbers (with a `/TYPE=PLMN` suffix) or as
//! RFC 5322 mailboxes such as `"Jo" <jo@example.org>`. These helpers reduce both to the bare
//! address the rest of the core keys participants by.

/// A mailbox split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub display_name: Option<String>,
    pub local_part: String,
    pub domain: String,
}

impl Mailbox {
    pub fn address(&self) -> String {
        format!("{}@{}", self.local_part, self.domain)
    }
}

/// Parse a comma-separated list of mailboxes. `"Display Name" <local@domain>`, `Name <a@b>` and
/// bare `local@domain` are accepted. Returns `None` if any entry is malformed.
pub fn parse_mailbox_list(value: &str) -> Option<Vec<Mailbox>> {
    let bytes = value.trim().as_bytes();
    let len = bytes.len();
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < len {
        skip_ws(bytes, &mut pos);
        if pos >= len {
            break;
        }
        out.push(parse_one(bytes, &mut pos)?);
        skip_ws(bytes, &mut pos);
        if pos < len && bytes[pos] == b',' {
            pos += 1;
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn skip_ws(bytes: &[u8], pos: &mut usize) {
    while *pos < bytes.len() && bytes[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
}

fn split_addr_spec(spec: &str) -> Option<(String, String)> {
    let spec = spec.trim();
    let at = spec.rfind('@')?;
    if at == 0 || at + 1 >= spec.len() {
        return None;
    }
    Some((spec[..at].trim().to_string(), spec[at + 1..].trim().to_string()))
}

fn parse_one(bytes: &[u8], pos: &mut usize) -> Option<Mailbox> {
    let len = bytes.len();
    let mut display_name = None;
    if bytes[*pos] == b'"' {
        *pos += 1;
        let start = *pos;
        while *pos < len {
            if bytes[*pos] == b'\\' && *pos + 1 < len {
                *pos += 2;
                continue;
            }
            if bytes[*pos] == b'"' {
                display_name = Some(String::from_utf8_lossy(&bytes[start..*pos]).into_owned());
                *pos += 1;
                break;
            }
            *pos += 1;
        }
        skip_ws(bytes, pos);
    }
    // Unquoted phrase before an angle-addr.
    let phrase_start = *pos;
    while *pos < len && bytes[*pos] != b'<' && bytes[*pos] != b',' {
        *pos += 1;
    }
    let (local_part, domain) = if *pos < len && bytes[*pos] == b'<' {
        if display_name.is_none() {
            let phrase = String::from_utf8_lossy(&bytes[phrase_start..*pos]).trim().to_string();
            if !phrase.is_empty() {
                display_name = Some(phrase);
            }
        }
        *pos += 1;
        let start = *pos;
        while *pos < len && bytes[*pos] != b'>' {
            *pos += 1;
        }
        if *pos >= len {
            return None;
        }
        let inner = std::str::from_utf8(&bytes[start..*pos]).ok()?;
        *pos += 1;
        split_addr_spec(inner)?
    } else {
        split_addr_spec(std::str::from_utf8(&bytes[phrase_start..*pos]).ok()?)?
    };
    if local_part.is_empty() || domain.is_empty() {
        return None;
    }
    Some(Mailbox {
        display_name,
        local_part,
        domain,
    })
}

/// Reduce a sender that may be an RFC 822 mailbox to its bare address. Values without both
/// `@` and `<`, or that do not parse, are returned unchanged.
pub fn parse_potential_rfc822_email_address(address: &str) -> String {
    if !address.contains('@') || !address.contains('<') {
        return address.to_string();
    }
    parse_mailbox_list(address)
        .and_then(|list| list.into_iter().next())
        .map(|m| m.address())
        .unwrap_or_else(|| address.to_string())
}

pub fn is_email_address(address: &str) -> bool {
    split_addr_spec(address).is_some()
}

/// Keep digits, a leading `+`, and the dial-pad symbols; drop formatting characters.
pub fn normalize_phone_number(number: &str) -> String {
    let mut out = String::with_capacity(number.len());
    for c in number.trim().chars() {
        match c {
            '0'..='9' | '*' | '#' => out.push(c),
            '+' if out.is_empty() => out.push(c),
            _ => {}
        }
    }
    out
}

/// Canonical form for comparing and storing an address.
pub fn canonical(address: &str) -> String {
    let bare = match address.find("/TYPE=") {
        Some(i) => &address[..i],
        None => address,
    };
    let bare = parse_potential_rfc822_email_address(bare.trim());
    if is_email_address(&bare) {
        bare.to_ascii_lowercase()
    } else {
        normalize_phone_number(&bare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc822_sender_reduced() {
        assert_eq!(parse_potential_rfc822_email_address("\"Jo Bloggs\" <jo@example.org>"), "jo@example.org");
        assert_eq!(parse_potential_rfc822_email_address("Jo <jo@example.org>"), "jo@example.org");
        assert_eq!(parse_potential_rfc822_email_address("jo@example.org"), "jo@example.org");
        assert_eq!(parse_potential_rfc822_email_address("+15551234567"), "+15551234567");
        assert_eq!(parse_potential_rfc822_email_address("broken <jo@"), "broken <jo@");
    }

    #[test]
    fn mailbox_list() {
        let list = parse_mailbox_list("a@b.c, \"Q\" <q@r.s>").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].display_name.as_deref(), Some("Q"));
        assert_eq!(list[1].address(), "q@r.s");
        assert!(parse_mailbox_list("not-an-address").is_none());
    }

    #[test]
    fn canonical_forms() {
        assert_eq!(canonical("+1 (555) 123-4567/TYPE=PLMN"), "+15551234567");
        assert_eq!(canonical("Jo <JO@Example.org>"), "jo@example.org");
        assert_eq!(normalize_phone_number("*86#"), "*86#");
    }
}
