/*
 * mod.rs
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

//! Storage abstraction: the [`MessageStore`] and [`MediaScratch`] traits and an in-memory
//! implementation.

mod error;
mod memory;
#[allow(clippy::module_inception)]
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{MediaScratch, MessageStore, NotificationRecord, PersistedDraft};
