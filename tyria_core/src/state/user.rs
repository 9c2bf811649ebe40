// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The signed-in account, its guilds and its current match.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use serde::Deserialize;

use super::Transition;
use crate::channel::{Region, TeamColor, TeamInfo};

/// Tag given to guilds whose details could not be fetched.
pub const UNKNOWN_GUILD_TAG: &str = "[Unknown]";

/// Account details as returned by the account API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccountInfo {
    /// Account id.
    pub id: String,
    /// Account name, e.g. `"Foo.1234"`.
    pub name: String,
    /// Home world id.
    pub world: u32,
    /// Ids of the guilds the account is in.
    pub guilds: Vec<String>,
    /// Whether the account owns a commander tag.
    pub commander: bool,
}

/// A guild.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Guild {
    /// Guild id.
    pub id: String,
    /// Guild name.
    pub name: String,
    /// Guild tag, e.g. `"[TAG]"`.
    pub tag: String,
}

/// Worlds on each side of a match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AllWorlds {
    /// Red team worlds.
    pub red: Vec<u32>,
    /// Green team worlds.
    pub green: Vec<u32>,
    /// Blue team worlds.
    pub blue: Vec<u32>,
}

/// Summary of a competitive match.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MatchOverview {
    /// Match id, e.g. `"2-3"`.
    pub id: String,
    /// Worlds on each side.
    pub all_worlds: AllWorlds,
}

/// User slice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserState {
    /// Account details.
    pub account: AccountInfo,
    /// Details of the account's guilds, by id.
    pub guild_details: BTreeMap<String, Guild>,
    /// The match the account's world is in, once loaded.
    pub match_details: Option<MatchOverview>,
    /// Last account loading error.
    pub error: String,
}

impl UserState {
    pub(crate) fn reduce(mut self, transition: &Transition) -> Self {
        match transition {
            Transition::SetUserData(account) => self.account = account.clone(),
            Transition::SetUserDataError(error) => self.error = error.clone(),
            Transition::AddUserGuild(guild) => {
                self.guild_details.insert(guild.id.clone(), guild.clone());
            }
            Transition::AddUserGuildError { id } => {
                self.guild_details.insert(
                    id.clone(),
                    Guild {
                        id: id.clone(),
                        name: id.clone(),
                        tag: String::from(UNKNOWN_GUILD_TAG),
                    },
                );
            }
            Transition::AddMatchOverview(overview) => self.match_details = Some(overview.clone()),
            _ => {}
        }
        self
    }

    /// Region of the account's world.
    #[must_use]
    pub fn region(&self) -> Region {
        Region::from_world(self.account.world)
    }

    /// The account's match and team, once the match is loaded.
    ///
    /// A world listed on neither the red nor the green side is blue.
    #[must_use]
    pub fn wvw_team(&self) -> Option<TeamInfo> {
        let overview = self.match_details.as_ref()?;
        let world = self.account.world;
        let team = if overview.all_worlds.red.contains(&world) {
            TeamColor::Red
        } else if overview.all_worlds.green.contains(&world) {
            TeamColor::Green
        } else {
            TeamColor::Blue
        };
        Some(TeamInfo {
            match_id: overview.id.clone(),
            team,
        })
    }
}
