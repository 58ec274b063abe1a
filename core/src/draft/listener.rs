/*
 * listener.rs
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

//! Change notification for draft observers.

use super::DraftMessageData;

pub const ATTACHMENTS_CHANGED: u32 = 0x0001;
pub const MESSAGE_TEXT_CHANGED: u32 = 0x0002;
pub const MESSAGE_SUBJECT_CHANGED: u32 = 0x0004;
/// Self participant (sending identity) loaded or changed.
pub const SELF_CHANGED: u32 = 0x0008;
pub const ALL_CHANGED: u32 = 0x00FF;
/// Draft changed outside the editor. Not part of [`ALL_CHANGED`].
pub const WIDGET_CHANGED: u32 = 0x0100;

/// Observer of a [`DraftMessageData`]. Called on the owner thread only.
pub trait DraftMessageDataListener {
    fn on_draft_changed(&self, data: &DraftMessageData, change_flags: u32);
}

impl<F> DraftMessageDataListener for F
where
    F: Fn(&DraftMessageData, u32),
{
    fn on_draft_changed(&self, data: &DraftMessageData, change_flags: u32) {
        self(data, change_flags)
    }
}
