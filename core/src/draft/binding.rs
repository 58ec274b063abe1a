/*
 * binding.rs
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

//! Binding tokens: a generation counter that lets the owner tell current async completions
//! from stale ones.

/// Token handed to whoever binds a draft; passed back with every async request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding(u64);

impl Binding {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub(crate) struct BindingState {
    current: Option<u64>,
    last: u64,
}

impl BindingState {
    /// Start a new generation; any previous binding becomes stale.
    pub(crate) fn bind(&mut self) -> Binding {
        self.last += 1;
        self.current = Some(self.last);
        Binding(self.last)
    }

    pub(crate) fn unbind(&mut self) {
        self.current = None;
    }

    pub(crate) fn is_bound(&self, binding: Binding) -> bool {
        self.current == Some(binding.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebinding_makes_old_token_stale() {
        let mut s = BindingState::default();
        let a = s.bind();
        assert!(s.is_bound(a));
        let b = s.bind();
        assert!(!s.is_bound(a));
        assert!(s.is_bound(b));
        s.unbind();
        assert!(!s.is_bound(b));
        assert!(b.generation() > a.generation());
    }
}
