// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subscription topic routing.
//!
//! Every live channel maps to one wildcard topic below a fixed namespace:
//!
//! ```text
//! {namespace}/global/{continent}/{region}/#            home continent
//! {namespace}/global/{continent}/{match}/{team}/#      any other continent
//! {namespace}/guild/{guild_channel}/#
//! {namespace}/custom/{custom_channel}/#
//! {namespace}/solo/{account_name}/#
//! ```
//!
//! [`ChannelRouter::compute_topic`] returns `None` when the inputs do not yet
//! identify a channel. That is an ordinary transient state: no subscription is
//! attempted and the live overlay stays empty.

use alloc::format;
use alloc::string::String;
use core::fmt;

use serde::Deserialize;

use crate::config::LiveConfig;

/// Which live channel the user picked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum ChannelMode {
    /// Everyone on the continent, split by region or by match team.
    #[default]
    Global,
    /// Members of one guild channel.
    Guild,
    /// A shared custom channel.
    Custom,
    /// Only the user's own characters.
    Solo,
    /// A selection this client does not understand.
    #[serde(other)]
    Unknown,
}

/// Coarse server grouping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    /// European worlds.
    Eu,
    /// North American worlds.
    Us,
}

impl Region {
    /// First world id that belongs to the European region.
    pub const EU_WORLD_START: u32 = 2000;

    /// Returns the region a world belongs to.
    #[must_use]
    pub const fn from_world(world: u32) -> Self {
        if world >= Self::EU_WORLD_START {
            Self::Eu
        } else {
            Self::Us
        }
    }

    /// Returns the topic segment for this region.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eu => "eu",
            Self::Us => "us",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Faction color within a competitive match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TeamColor {
    /// Red team.
    Red,
    /// Green team.
    Green,
    /// Blue team.
    Blue,
}

impl TeamColor {
    /// Returns the topic segment for this color.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for TeamColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's match and team, once resolved.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TeamInfo {
    /// Match id, e.g. `"2-3"`.
    pub match_id: String,
    /// The user's team in that match.
    pub team: TeamColor,
}

/// Everything a topic can depend on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelInputs<'a> {
    /// Selected channel.
    pub mode: ChannelMode,
    /// Active continent.
    pub continent_id: u32,
    /// Region of the user's world.
    pub region: Region,
    /// Resolved match and team, if known.
    pub team: Option<&'a TeamInfo>,
    /// Guild channel id.
    pub guild_channel: &'a str,
    /// Custom channel id.
    pub custom_channel: &'a str,
    /// Account name, e.g. `"Foo.1234"`.
    pub account_name: &'a str,
}

/// Computes subscription topics from channel inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelRouter {
    namespace: String,
    home_continent: u32,
}

impl ChannelRouter {
    /// Creates a router for topics under `namespace`.
    #[must_use]
    pub fn new(namespace: impl Into<String>, home_continent: u32) -> Self {
        Self {
            namespace: namespace.into(),
            home_continent,
        }
    }

    /// Creates a router from the live configuration.
    #[must_use]
    pub fn from_config(config: &LiveConfig) -> Self {
        Self::new(config.namespace.clone(), config.home_continent)
    }

    /// Returns the topic namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the topic for `inputs`, or `None` if no channel is identified.
    ///
    /// Only the global channel on a non-home continent needs team info. A
    /// channel id or account name that is empty, or contains `+`, `#` or `/`,
    /// never produces a topic.
    ///
    /// ```
    /// use tyria_core::channel::{ChannelInputs, ChannelMode, ChannelRouter, Region};
    ///
    /// let router = ChannelRouter::new("maps.gw2.io", 1);
    /// let inputs = ChannelInputs {
    ///     mode: ChannelMode::Solo,
    ///     continent_id: 1,
    ///     region: Region::Eu,
    ///     team: None,
    ///     guild_channel: "",
    ///     custom_channel: "",
    ///     account_name: "Foo.1234",
    /// };
    /// assert_eq!(
    ///     router.compute_topic(&inputs).as_deref(),
    ///     Some("maps.gw2.io/solo/Foo.1234/#")
    /// );
    /// ```
    #[must_use]
    pub fn compute_topic(&self, inputs: &ChannelInputs<'_>) -> Option<String> {
        let ns = &self.namespace;
        match inputs.mode {
            ChannelMode::Global if inputs.continent_id == self.home_continent => Some(format!(
                "{ns}/global/{}/{}/#",
                inputs.continent_id, inputs.region
            )),
            ChannelMode::Global => {
                let team = inputs.team?;
                Some(format!(
                    "{ns}/global/{}/{}/{}/#",
                    inputs.continent_id, team.match_id, team.team
                ))
            }
            ChannelMode::Guild => segment(inputs.guild_channel).map(|id| format!("{ns}/guild/{id}/#")),
            ChannelMode::Custom => {
                segment(inputs.custom_channel).map(|id| format!("{ns}/custom/{id}/#"))
            }
            ChannelMode::Solo => {
                segment(inputs.account_name).map(|name| format!("{ns}/solo/{name}/#"))
            }
            ChannelMode::Unknown => None,
        }
    }
}

/// A user-supplied id is one topic level: non-empty, no wildcards, no `/`.
fn segment(value: &str) -> Option<&str> {
    (!value.is_empty() && !value.contains(['+', '#', '/'])).then_some(value)
}
