/*
 * config.rs
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

//! Per-subscription messaging settings: load/save in ~/.missiva/settings.xml.
//! All XML read/write uses the quick_xml parser/writer; no regex or hand parsing.
//!
//! Layout: `<settings><subscription id="N">` with one child element per setting. Unknown
//! elements are ignored; missing ones keep their defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::message::MMS_TEXT_LIMIT_DEFAULT;

/// Subscription id used when the device has a single SIM or none is known.
pub const DEFAULT_SUBSCRIPTION: i32 = -1;

/// Carrier default maximum MMS size in bytes.
pub const MAX_MESSAGE_SIZE_DEFAULT: u64 = 300 * 1024;

/// Settings for one subscription (SIM).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionSettings {
    pub auto_retrieve: bool,
    pub auto_retrieve_when_roaming: bool,
    pub delivery_reports: bool,
    pub read_reports: bool,
    pub group_mms: bool,
    pub mms_text_limit: usize,
    pub max_message_size: u64,
    /// Subjects the carrier inserts when the sender gave none; dropped on receive.
    pub no_subject_strings: Vec<String>,
}

impl Default for SubscriptionSettings {
    fn default() -> Self {
        Self {
            auto_retrieve: true,
            auto_retrieve_when_roaming: false,
            delivery_reports: false,
            read_reports: false,
            group_mms: true,
            mms_text_limit: MMS_TEXT_LIMIT_DEFAULT,
            max_message_size: MAX_MESSAGE_SIZE_DEFAULT,
            no_subject_strings: vec!["no subject".to_string(), "nosubject".to_string()],
        }
    }
}

impl SubscriptionSettings {
    /// Subject to store for a received MMS; `None` for blank or carrier placeholder subjects.
    pub fn cleanse_mms_subject(&self, subject: Option<&str>) -> Option<String> {
        let s = subject?.trim();
        if s.is_empty() {
            return None;
        }
        if self.no_subject_strings.iter().any(|n| n.eq_ignore_ascii_case(s)) {
            return None;
        }
        Some(s.to_string())
    }
}

/// Settings keyed by subscription id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub subscriptions: BTreeMap<i32, SubscriptionSettings>,
}

impl Settings {
    /// Settings for `sub_id`, falling back to the default subscription and then to defaults.
    pub fn for_subscription(&self, sub_id: i32) -> SubscriptionSettings {
        self.subscriptions
            .get(&sub_id)
            .or_else(|| self.subscriptions.get(&DEFAULT_SUBSCRIPTION))
            .cloned()
            .unwrap_or_default()
    }
}

/// Whether a notification should be downloaded without user action.
pub fn allow_mms_auto_retrieve(settings: &SubscriptionSettings, roaming: bool, data_roaming_enabled: bool) -> bool {
    if !settings.auto_retrieve {
        return false;
    }
    if roaming {
        return settings.auto_retrieve_when_roaming && data_roaming_enabled;
    }
    true
}

/// Default config directory: ~/.missiva.
pub fn default_config_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from).map(|h| h.join(".missiva"))
}

pub fn default_settings_path() -> Option<PathBuf> {
    default_config_dir().map(|d| d.join("settings.xml"))
}

/// Load settings. A missing file yields empty settings (every subscription at defaults).
pub fn load_settings(path: &Path) -> Result<Settings, String> {
    let content = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(e.to_string()),
    };
    parse_settings(&content)
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn apply(sub: &mut SubscriptionSettings, element: &[u8], text: &str) {
    match element {
        b"auto-retrieve" => sub.auto_retrieve = parse_bool(text).unwrap_or(sub.auto_retrieve),
        b"auto-retrieve-roaming" => {
            sub.auto_retrieve_when_roaming = parse_bool(text).unwrap_or(sub.auto_retrieve_when_roaming)
        }
        b"delivery-reports" => sub.delivery_reports = parse_bool(text).unwrap_or(sub.delivery_reports),
        b"read-reports" => sub.read_reports = parse_bool(text).unwrap_or(sub.read_reports),
        b"group-mms" => sub.group_mms = parse_bool(text).unwrap_or(sub.group_mms),
        b"mms-text-limit" => sub.mms_text_limit = text.parse().unwrap_or(sub.mms_text_limit),
        b"max-message-size" => sub.max_message_size = text.parse().unwrap_or(sub.max_message_size),
        b"no-subject" => sub.no_subject_strings.push(text.to_string()),
        _ => {}
    }
}

/// Parse settings XML.
pub fn parse_settings(content: &str) -> Result<Settings, String> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut out = Settings::default();
    let mut current: Option<(i32, SubscriptionSettings)> = None;
    let mut element_name = Vec::<u8>::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Err(e) => return Err(format!("XML parse error: {}", e)),
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let name = e.name();
                if name.as_ref() == b"subscription" {
                    let mut id = DEFAULT_SUBSCRIPTION;
                    for attr in e.attributes() {
                        let attr = attr.map_err(|e| e.to_string())?;
                        if attr.key.as_ref() == b"id" {
                            let v = attr.unescape_value().map_err(|e| e.to_string())?;
                            id = v.trim().parse().map_err(|_| format!("bad subscription id: {}", v))?;
                        }
                    }
                    let mut sub = SubscriptionSettings::default();
                    // Listed placeholders replace the defaults.
                    sub.no_subject_strings.clear();
                    current = Some((id, sub));
                } else if current.is_some() {
                    element_name.clear();
                    element_name.extend_from_slice(name.as_ref());
                }
            }
            Ok(Event::Text(e)) => {
                if element_name.is_empty() {
                    continue;
                }
                if let Some((_, sub)) = current.as_mut() {
                    let text = e.unescape().map_err(|e| e.to_string())?;
                    apply(sub, &element_name, text.trim());
                }
                element_name.clear();
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"subscription" {
                    if let Some((id, sub)) = current.take() {
                        out.subscriptions.insert(id, sub);
                    }
                }
                element_name.clear();
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

fn write_element(writer: &mut Writer<&mut Vec<u8>>, name: &str, value: &str) -> Result<(), String> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(|e| e.to_string())?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(|e| e.to_string())?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| e.to_string())?;
    Ok(())
}

/// Build settings XML into a byte vector (UTF-8).
pub fn settings_to_xml(settings: &Settings) -> Result<Vec<u8>, String> {
    let mut out = Vec::new();
    let mut writer = Writer::new_with_indent(&mut out, b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| e.to_string())?;
    writer
        .write_event(Event::Start(BytesStart::new("settings")))
        .map_err(|e| e.to_string())?;
    for (id, sub) in &settings.subscriptions {
        let id = id.to_string();
        let mut start = BytesStart::new("subscription");
        start.push_attribute(("id", id.as_str()));
        writer.write_event(Event::Start(start)).map_err(|e| e.to_string())?;
        write_element(&mut writer, "auto-retrieve", &sub.auto_retrieve.to_string())?;
        write_element(&mut writer, "auto-retrieve-roaming", &sub.auto_retrieve_when_roaming.to_string())?;
        write_element(&mut writer, "delivery-reports", &sub.delivery_reports.to_string())?;
        write_element(&mut writer, "read-reports", &sub.read_reports.to_string())?;
        write_element(&mut writer, "group-mms", &sub.group_mms.to_string())?;
        write_element(&mut writer, "mms-text-limit", &sub.mms_text_limit.to_string())?;
        write_element(&mut writer, "max-message-size", &sub.max_message_size.to_string())?;
        for s in &sub.no_subject_strings {
            write_element(&mut writer, "no-subject", s)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("subscription")))
            .map_err(|e| e.to_string())?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("settings")))
        .map_err(|e| e.to_string())?;
    Ok(out)
}

/// Write settings, creating the parent directory if needed.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    let xml = settings_to_xml(settings)?;
    fs::write(path, xml).map_err(|e| e.to_string())
}
