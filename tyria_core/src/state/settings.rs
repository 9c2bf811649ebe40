// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! User-chosen channel settings.

use alloc::string::String;

use super::Transition;
use crate::channel::ChannelMode;

/// Settings slice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsState {
    /// Channel the user picked.
    pub selected_channel: ChannelMode,
    /// Guild channel id.
    pub guild_channel: String,
    /// Custom channel id.
    pub custom_channel: String,
    /// Whether live positions are shown at all.
    pub live_map_enabled: bool,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            selected_channel: ChannelMode::Global,
            guild_channel: String::new(),
            custom_channel: String::new(),
            live_map_enabled: true,
        }
    }
}

impl SettingsState {
    pub(crate) fn reduce(mut self, transition: &Transition) -> Self {
        match transition {
            Transition::SelectChannel(mode) => self.selected_channel = *mode,
            Transition::SetGuildChannel(id) => self.guild_channel = id.clone(),
            Transition::SetCustomChannel(id) => self.custom_channel = id.clone(),
            Transition::SetLiveMapEnabled(enabled) => self.live_map_enabled = *enabled,
            _ => {}
        }
        self
    }
}
