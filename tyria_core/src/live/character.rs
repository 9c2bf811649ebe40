// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Remote characters and their decoded attributes.

use alloc::string::String;
use core::fmt;

use kurbo::Point;
use serde::Deserialize;

use super::message::Vector3;
use crate::time::Timestamp;

/// Identifies one remote character.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharacterKey {
    /// Owning account, e.g. `"Foo.1234"`.
    pub account_name: String,
    /// Character on that account.
    pub character_name: String,
}

impl CharacterKey {
    /// Creates a key.
    #[must_use]
    pub fn new(account_name: impl Into<String>, character_name: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            character_name: character_name.into(),
        }
    }
}

impl fmt::Debug for CharacterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.account_name, self.character_name)
    }
}

impl fmt::Display for CharacterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Active mount. Codes follow the wire numbering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "u32")]
pub enum Mount {
    /// Not mounted, or an unknown code.
    #[default]
    None,
    /// Jackal.
    Jackal,
    /// Griffon.
    Griffon,
    /// Springer.
    Springer,
    /// Skimmer.
    Skimmer,
    /// Raptor.
    Raptor,
    /// Roller beetle.
    RollerBeetle,
    /// Warclaw.
    Warclaw,
    /// Skyscale.
    Skyscale,
    /// Skiff.
    Skiff,
    /// Siege turtle.
    SiegeTurtle,
}

impl From<u32> for Mount {
    fn from(code: u32) -> Self {
        match code {
            1 => Self::Jackal,
            2 => Self::Griffon,
            3 => Self::Springer,
            4 => Self::Skimmer,
            5 => Self::Raptor,
            6 => Self::RollerBeetle,
            7 => Self::Warclaw,
            8 => Self::Skyscale,
            9 => Self::Skiff,
            10 => Self::SiegeTurtle,
            _ => Self::None,
        }
    }
}

/// Character profession. Codes follow the wire numbering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "u32")]
pub enum Profession {
    /// Not reported, or an unknown code.
    #[default]
    Unknown,
    /// Guardian.
    Guardian,
    /// Warrior.
    Warrior,
    /// Engineer.
    Engineer,
    /// Ranger.
    Ranger,
    /// Thief.
    Thief,
    /// Elementalist.
    Elementalist,
    /// Mesmer.
    Mesmer,
    /// Necromancer.
    Necromancer,
    /// Revenant.
    Revenant,
}

impl From<u32> for Profession {
    fn from(code: u32) -> Self {
        match code {
            1 => Self::Guardian,
            2 => Self::Warrior,
            3 => Self::Engineer,
            4 => Self::Ranger,
            5 => Self::Thief,
            6 => Self::Elementalist,
            7 => Self::Mesmer,
            8 => Self::Necromancer,
            9 => Self::Revenant,
            _ => Self::Unknown,
        }
    }
}

/// Everything known about one live character.
///
/// Movement and state messages each overwrite only their own fields, so the
/// entry is the merge of the latest message of each kind.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveCharacterEntry {
    /// Continent the character is on.
    pub continent_id: u32,
    /// Map the character is on.
    pub map_id: u32,
    /// World coordinate; `None` until the first movement message.
    pub position: Option<Point>,
    /// Facing vector.
    pub forward: Vector3,
    /// Active mount.
    pub mount: Mount,
    /// Profession.
    pub profession: Profession,
    /// Elite specialisation code.
    pub specialisation: u32,
    /// Whether the character shows a commander tag.
    pub is_commander: bool,
    /// Map instance.
    pub shard_id: u32,
    /// Game server address.
    pub server_connection_info: String,
    /// Game client build.
    pub build_id: u32,
    /// When the last message for this character arrived.
    pub last_message: Timestamp,
    pub(crate) needs_redraw: bool,
}

impl LiveCharacterEntry {
    pub(crate) fn new(now: Timestamp) -> Self {
        Self {
            continent_id: 0,
            map_id: 0,
            position: None,
            forward: Vector3::default(),
            mount: Mount::None,
            profession: Profession::Unknown,
            specialisation: 0,
            is_commander: false,
            shard_id: 0,
            server_connection_info: String::new(),
            build_id: 0,
            last_message: now,
            needs_redraw: false,
        }
    }

    /// Returns whether the marker must be recomputed at the next redraw.
    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Marks the entry as seen at `now`. The timestamp never moves backwards.
    pub(crate) fn touch(&mut self, now: Timestamp) {
        self.last_message = self.last_message.max(now);
    }
}
