// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live positions of remote characters.
//!
//! Presence messages ([`LiveMessage`]) update a table of
//! [`LiveCharacterEntry`] values in a [`LiveMarkerStore`]. The store ages
//! entries out after a freshness window and produces [`MarkerChanges`] for
//! the single pinned live overlay.

mod character;
mod marker;
mod message;
mod store;

pub use character::{CharacterKey, LiveCharacterEntry, Mount, Profession};
pub use marker::{LiveMarker, MarkerChanges, MarkerIcon, rotation};
pub use message::{
    CharacterRef, LiveMessage, MessageKind, MovementUpdate, StateUpdate, Vector2, Vector3,
};
pub use store::{LIVE_LAYER_ID, LiveMarkerStore};
