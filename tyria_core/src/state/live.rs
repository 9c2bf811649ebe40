// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live feed credentials and the active continent.

use alloc::string::String;

use super::Transition;

/// Continent shown when the map first opens.
pub const DEFAULT_CONTINENT: u32 = 1;

/// Live-markers slice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveMarkersState {
    /// Token presented to the live feed; empty when signed out.
    pub auth_token: String,
    /// Continent the map currently shows.
    pub active_continent_id: u32,
}

impl Default for LiveMarkersState {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            active_continent_id: DEFAULT_CONTINENT,
        }
    }
}

impl LiveMarkersState {
    pub(crate) fn reduce(mut self, transition: &Transition) -> Self {
        match transition {
            Transition::SetAuthToken(token) => self.auth_token = token.clone(),
            Transition::ClearAuthToken => self.auth_token.clear(),
            Transition::SetActiveContinent(id) => self.active_continent_id = *id,
            _ => {}
        }
        self
    }
}
