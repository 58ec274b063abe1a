/*
 * lib.rs
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

//! Missiva core: an SMS/MMS messaging engine.
//!
//! - [`pdu`]: MMS PDU encode/decode (WAP WSP binary encoding)
//! - [`smil`]: SMIL presentation for multipart messages
//! - [`status`]: send/retrieve status classification and message statuses
//! - [`dedup`]: duplicate notification detection
//! - [`draft`]: draft lifecycle with async load/save and pre-send checks
//! - [`mms`]: send and receive transactions
//! - [`store`] and [`localstorage`]: persistence
//!
//! Logging goes through `tracing`; installing a subscriber is up to the host.

pub mod config;
pub mod dedup;
pub mod draft;
pub mod localstorage;
pub mod message;
pub mod message_id;
pub mod mms;
pub mod pdu;
pub mod smil;
pub mod status;
pub mod store;
pub mod uri;
