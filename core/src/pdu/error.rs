/*
 * error.rs
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

//! PDU codec errors.

use thiserror::Error;

/// Errors from encoding or decoding an MMS PDU.
///
/// A decode error is never fatal to the caller: receive paths map it to the
/// manual-retry tier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PduError {
    /// Input ended before a complete value could be read.
    #[error("PDU truncated while reading {0}")]
    Truncated(&'static str),
    /// A value was present but not valid for its field.
    #[error("invalid {field} value: {detail}")]
    InvalidValue { field: &'static str, detail: String },
    /// The message type octet is not one this codec knows.
    #[error("unknown message type 0x{0:02X}")]
    UnknownMessageType(u8),
    /// A header required for the message type is absent.
    #[error("missing mandatory header {0}")]
    MissingHeader(&'static str),
    /// Both parse strategies (with and without content-disposition) failed.
    #[error("PDU could not be parsed with any strategy: {0}")]
    Unparseable(String),
}

impl PduError {
    pub fn invalid(field: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            detail: detail.into(),
        }
    }
}
