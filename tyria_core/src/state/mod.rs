// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Application state slices and their transitions.
//!
//! [`AppState`] is a plain struct of slices. It changes only through
//! [`Transition`] values applied with [`AppState::reduce`], which hands each
//! slice the transition and rebuilds the state from the results. Values the
//! channel router needs (region, team, topic) are derived on demand and never
//! stored.

mod live;
mod settings;
mod user;

use alloc::string::String;

pub use live::{DEFAULT_CONTINENT, LiveMarkersState};
pub use settings::SettingsState;
pub use user::{AccountInfo, AllWorlds, Guild, MatchOverview, UNKNOWN_GUILD_TAG, UserState};

use crate::channel::{ChannelInputs, ChannelMode, ChannelRouter, Region, TeamInfo};

/// A named state change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Stores the live feed token.
    SetAuthToken(String),
    /// Forgets the live feed token.
    ClearAuthToken,
    /// Switches the displayed continent.
    SetActiveContinent(u32),
    /// Stores freshly loaded account details.
    SetUserData(AccountInfo),
    /// Records an account loading error.
    SetUserDataError(String),
    /// Stores one guild's details.
    AddUserGuild(Guild),
    /// Stores a placeholder for a guild whose details failed to load.
    AddUserGuildError {
        /// Guild id.
        id: String,
    },
    /// Stores the account's current match.
    AddMatchOverview(MatchOverview),
    /// Picks a live channel.
    SelectChannel(ChannelMode),
    /// Sets the guild channel id.
    SetGuildChannel(String),
    /// Sets the custom channel id.
    SetCustomChannel(String),
    /// Turns live positions on or off.
    SetLiveMapEnabled(bool),
}

/// All state slices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    /// Live feed slice.
    pub live_markers: LiveMarkersState,
    /// Account slice.
    pub user: UserState,
    /// Settings slice.
    pub settings: SettingsState,
}

impl AppState {
    /// Returns the state after `transition`.
    #[must_use]
    pub fn reduce(self, transition: &Transition) -> Self {
        Self {
            live_markers: self.live_markers.reduce(transition),
            user: self.user.reduce(transition),
            settings: self.settings.reduce(transition),
        }
    }

    /// Applies `transition` in place.
    pub fn apply(&mut self, transition: &Transition) {
        *self = core::mem::take(self).reduce(transition);
    }

    // -- Selectors --

    /// Region of the account's world.
    #[must_use]
    pub fn region(&self) -> Region {
        self.user.region()
    }

    /// The account's match and team, once loaded.
    #[must_use]
    pub fn wvw_team(&self) -> Option<TeamInfo> {
        self.user.wvw_team()
    }

    /// The topic to subscribe to, or `None` when the live map is off or the
    /// channel is not resolved yet.
    #[must_use]
    pub fn topic(&self, router: &ChannelRouter) -> Option<String> {
        if !self.settings.live_map_enabled {
            return None;
        }
        let team = self.wvw_team();
        router.compute_topic(&ChannelInputs {
            mode: self.settings.selected_channel,
            continent_id: self.live_markers.active_continent_id,
            region: self.region(),
            team: team.as_ref(),
            guild_channel: &self.settings.guild_channel,
            custom_channel: &self.settings.custom_channel,
            account_name: &self.user.account.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::channel::TeamColor;

    fn signed_in(world: u32) -> AppState {
        let mut state = AppState::default();
        state.apply(&Transition::SetUserData(AccountInfo {
            name: "Foo.1234".into(),
            world,
            ..AccountInfo::default()
        }));
        state
    }

    fn overview() -> MatchOverview {
        MatchOverview {
            id: "2-3".into(),
            all_worlds: AllWorlds {
                red: vec![2101, 2013],
                green: vec![2202],
                blue: vec![2301],
            },
        }
    }

    fn router() -> ChannelRouter {
        ChannelRouter::new("maps.gw2.io", 1)
    }

    #[test]
    fn transitions_touch_only_their_slice() {
        let before = signed_in(1001);
        let after = before.clone().reduce(&Transition::SetAuthToken("secret".into()));
        assert_eq!(after.live_markers.auth_token, "secret");
        assert_eq!(after.user, before.user);
        assert_eq!(after.settings, before.settings);

        let cleared = after.reduce(&Transition::ClearAuthToken);
        assert!(cleared.live_markers.auth_token.is_empty());
    }

    #[test]
    fn guild_error_adds_placeholder() {
        let mut state = AppState::default();
        state.apply(&Transition::AddUserGuildError { id: "ABCD".into() });
        let guild = &state.user.guild_details["ABCD"];
        assert_eq!(guild.name, "ABCD");
        assert_eq!(guild.tag, UNKNOWN_GUILD_TAG);

        state.apply(&Transition::AddUserGuild(Guild {
            id: "ABCD".into(),
            name: "Tyrian Cartographers".into(),
            tag: "[MAP]".into(),
        }));
        assert_eq!(state.user.guild_details["ABCD"].tag, "[MAP]");
    }

    #[test]
    fn team_from_match_membership() {
        let mut state = signed_in(2202);
        assert_eq!(state.wvw_team(), None);

        state.apply(&Transition::AddMatchOverview(overview()));
        assert_eq!(state.wvw_team().map(|t| t.team), Some(TeamColor::Green));

        state.apply(&Transition::SetUserData(AccountInfo {
            world: 2013,
            ..state.user.account.clone()
        }));
        assert_eq!(state.wvw_team().map(|t| t.team), Some(TeamColor::Red));

        state.apply(&Transition::SetUserData(AccountInfo {
            world: 9999,
            ..state.user.account.clone()
        }));
        assert_eq!(
            state.wvw_team().map(|t| t.team),
            Some(TeamColor::Blue),
            "unlisted worlds default to blue"
        );
    }

    #[test]
    fn topic_follows_state() {
        let mut state = signed_in(2202);
        assert_eq!(state.topic(&router()).as_deref(), Some("maps.gw2.io/global/1/eu/#"));

        state.apply(&Transition::SetActiveContinent(2));
        assert_eq!(state.topic(&router()), None, "team not loaded yet");

        state.apply(&Transition::AddMatchOverview(overview()));
        assert_eq!(
            state.topic(&router()).as_deref(),
            Some("maps.gw2.io/global/2/2-3/green/#")
        );

        state.apply(&Transition::SelectChannel(ChannelMode::Solo));
        assert_eq!(state.topic(&router()).as_deref(), Some("maps.gw2.io/solo/Foo.1234/#"));

        state.apply(&Transition::SetLiveMapEnabled(false));
        assert_eq!(state.topic(&router()), None);
    }

    #[test]
    fn account_info_deserializes_leniently() {
        let account: AccountInfo =
            serde_json::from_str(r#"{"name":"Foo.1234","world":1008,"age":42}"#).unwrap();
        assert_eq!(account.world, 1008);
        assert_eq!(AppState::default().reduce(&Transition::SetUserData(account)).region(), Region::Us);
    }
}
