// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inbound presence message schema.
//!
//! Messages are JSON objects discriminated by a `Type` field, with
//! `PascalCase` field names:
//!
//! ```json
//! { "Type": "UpsertCharacterMovement", "AccountName": "Foo.1234",
//!   "CharacterName": "Bob", "ContinentId": 1, "MapId": 15,
//!   "MapPosition": { "X": 512.0, "Y": 256.0 },
//!   "CharacterForward": { "X": 0.0, "Y": 0.0, "Z": 1.0 } }
//! ```

use alloc::string::String;

use kurbo::Point;
use serde::Deserialize;

use super::character::{CharacterKey, Mount, Profession};

/// Discriminant of a [`LiveMessage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Position and facing changed.
    Movement,
    /// Mount, profession or commander tag changed.
    State,
    /// The character left.
    Delete,
    /// Heartbeat.
    KeepAlive,
}

/// A 2D world coordinate on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Vector2 {
    /// Horizontal world coordinate.
    pub x: f64,
    /// Vertical world coordinate, growing south.
    pub y: f64,
}

impl From<Vector2> for Point {
    fn from(v: Vector2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// A 3D facing vector. `Y` is up; `X`/`Z` span the ground plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Vector3 {
    /// East component.
    pub x: f64,
    /// Up component.
    pub y: f64,
    /// North component.
    pub z: f64,
}

/// Identifies the character a message is about.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CharacterRef {
    /// Owning account.
    pub account_name: String,
    /// Character on that account.
    pub character_name: String,
}

/// Body of an `UpsertCharacterMovement` message.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MovementUpdate {
    /// Owning account.
    pub account_name: String,
    /// Character on that account.
    pub character_name: String,
    /// Continent the character is on.
    pub continent_id: u32,
    /// Map the character is on.
    pub map_id: u32,
    /// World coordinate.
    pub map_position: Vector2,
    /// Facing vector.
    pub character_forward: Vector3,
}

/// Body of an `UpdateCharacterState` message.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StateUpdate {
    /// Owning account.
    pub account_name: String,
    /// Character on that account.
    pub character_name: String,
    /// Continent the character is on, if reported.
    #[serde(default)]
    pub continent_id: Option<u32>,
    /// Map the character is on, if reported.
    #[serde(default)]
    pub map_id: Option<u32>,
    /// Map instance.
    #[serde(default)]
    pub shard_id: u32,
    /// Game server address.
    #[serde(default)]
    pub server_connection_info: String,
    /// Game client build.
    #[serde(default)]
    pub build_id: u32,
    /// Whether the character shows a commander tag.
    #[serde(default)]
    pub is_commander: bool,
    /// Active mount.
    #[serde(default)]
    pub mount: Mount,
    /// Profession.
    #[serde(default)]
    pub profession: Profession,
    /// Elite specialisation code.
    #[serde(default)]
    pub specialisation: u32,
}

/// An inbound presence message.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "Type")]
pub enum LiveMessage {
    /// Create or move a character.
    UpsertCharacterMovement(MovementUpdate),
    /// Create or update a character's mount, profession and tag.
    UpdateCharacterState(StateUpdate),
    /// Remove a character immediately.
    DeleteCharacterData(CharacterRef),
    /// Keep a character fresh without changing it.
    UpdateCharacterKeepAlive(CharacterRef),
}

impl LiveMessage {
    /// Decodes a JSON payload.
    pub fn from_slice(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }

    /// Returns the message discriminant.
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::UpsertCharacterMovement(_) => MessageKind::Movement,
            Self::UpdateCharacterState(_) => MessageKind::State,
            Self::DeleteCharacterData(_) => MessageKind::Delete,
            Self::UpdateCharacterKeepAlive(_) => MessageKind::KeepAlive,
        }
    }

    /// Returns the key of the character this message is about.
    #[must_use]
    pub fn key(&self) -> CharacterKey {
        let (account, character) = match self {
            Self::UpsertCharacterMovement(m) => (&m.account_name, &m.character_name),
            Self::UpdateCharacterState(s) => (&s.account_name, &s.character_name),
            Self::DeleteCharacterData(r) | Self::UpdateCharacterKeepAlive(r) => {
                (&r.account_name, &r.character_name)
            }
        };
        CharacterKey::new(account.clone(), character.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_movement() {
        let msg = LiveMessage::from_slice(
            br#"{"Type":"UpsertCharacterMovement","AccountName":"A.1234","CharacterName":"Bob",
                "ContinentId":1,"MapId":15,"MapPosition":{"X":512.5,"Y":256},
                "CharacterForward":{"X":0,"Y":0.1,"Z":1}}"#,
        )
        .unwrap();
        assert_eq!(msg.kind(), MessageKind::Movement);
        assert_eq!(msg.key(), CharacterKey::new("A.1234", "Bob"));
        let LiveMessage::UpsertCharacterMovement(m) = msg else {
            panic!("wrong variant");
        };
        assert_eq!(Point::from(m.map_position), Point::new(512.5, 256.0));
        assert_eq!(m.character_forward.z, 1.0);
    }

    #[test]
    fn decodes_state_with_numeric_enums() {
        let msg = LiveMessage::from_slice(
            br#"{"Type":"UpdateCharacterState","AccountName":"A.1234","CharacterName":"Bob",
                "ContinentId":1,"MapId":15,"ShardId":3,"ServerConnectionInfo":"1.2.3.4:6112",
                "BuildId":160000,"IsCommander":true,"Mount":8,"Profession":7,"Specialisation":59}"#,
        )
        .unwrap();
        let LiveMessage::UpdateCharacterState(s) = msg else {
            panic!("wrong variant");
        };
        assert_eq!(s.mount, Mount::Skyscale);
        assert_eq!(s.profession, Profession::Mesmer);
        assert!(s.is_commander);
        assert_eq!(s.continent_id, Some(1));
    }

    #[test]
    fn out_of_range_codes_degrade() {
        let msg = LiveMessage::from_slice(
            br#"{"Type":"UpdateCharacterState","AccountName":"A","CharacterName":"B",
                "Mount":42,"Profession":99}"#,
        )
        .unwrap();
        let LiveMessage::UpdateCharacterState(s) = msg else {
            panic!("wrong variant");
        };
        assert_eq!(s.mount, Mount::None);
        assert_eq!(s.profession, Profession::Unknown);
    }

    #[test]
    fn rejects_unknown_type_and_missing_fields() {
        assert!(LiveMessage::from_slice(br#"{"Type":"Teleport","AccountName":"A"}"#).is_err());
        assert!(LiveMessage::from_slice(br#"{"Type":"DeleteCharacterData"}"#).is_err());
        assert!(LiveMessage::from_slice(b"not json").is_err());
    }
}
