// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The live character table and its overlay.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;
use core::mem;
use core::time::Duration;

use super::character::{CharacterKey, LiveCharacterEntry};
use super::marker::{LiveMarker, MarkerChanges, MarkerIcon, rotation};
use super::message::{LiveMessage, MessageKind};
use crate::backend::Viewport;
use crate::config::LiveConfig;
use crate::geo::Projection;
use crate::layer::{LayerOptions, LayerRegistry, LayerState};
use crate::time::Timestamp;
use crate::trace::{MessageEvent, RedrawEvent, Tracer};

/// Registry id of the live overlay.
pub const LIVE_LAYER_ID: &str = "LIVE_MAP";

/// One entry per remote character, aged out by a freshness window.
///
/// Messages mutate the table and flag entries; [`redraw`](Self::redraw)
/// turns the flags into [`MarkerChanges`] for a
/// [`MarkerPresenter`](crate::backend::MarkerPresenter). Only characters on
/// the active continent with a known position get a marker.
pub struct LiveMarkerStore {
    characters: BTreeMap<CharacterKey, LiveCharacterEntry>,
    /// Keys that currently have a marker on the overlay.
    drawn: BTreeSet<CharacterKey>,
    /// Keys whose marker must go at the next redraw.
    pending_removals: Vec<CharacterKey>,
    active_continent: u32,
    freshness_window: Duration,
    projection: Projection,
    tracer: Tracer,
}

impl fmt::Debug for LiveMarkerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveMarkerStore")
            .field("characters", &self.characters.len())
            .field("drawn", &self.drawn.len())
            .field("active_continent", &self.active_continent)
            .field("freshness_window", &self.freshness_window)
            .finish_non_exhaustive()
    }
}

impl LiveMarkerStore {
    /// Creates an empty store for the home continent.
    #[must_use]
    pub fn new(config: &LiveConfig) -> Self {
        Self {
            characters: BTreeMap::new(),
            drawn: BTreeSet::new(),
            pending_removals: Vec::new(),
            active_continent: config.home_continent,
            freshness_window: config.freshness_window(),
            projection: Projection::new(config.marker_zoom),
            tracer: Tracer::none(),
        }
    }

    /// Routes diagnostics to `tracer`.
    pub fn set_tracer(&mut self, tracer: Tracer) {
        self.tracer = tracer;
    }

    /// Registers the live overlay in `registry` as a pinned layer.
    pub fn register_overlay<V: Viewport>(
        &self,
        registry: &mut LayerRegistry<V>,
        renderable: V::Renderable,
    ) {
        registry.register_layer(
            LIVE_LAYER_ID,
            LayerOptions::new(renderable, LayerState::Pinned)
                .with_friendly_name("Live Map")
                .with_icon("/assets/player_marker.png"),
        );
    }

    // -- Inbound --

    /// Applies one message received at `now`.
    ///
    /// Unknown keys are created by every kind except delete, which is a no-op
    /// for them.
    pub fn on_message(&mut self, message: LiveMessage, now: Timestamp) {
        let kind = message.kind();
        let key = message.key();

        if let LiveMessage::DeleteCharacterData(_) = message {
            if self.characters.remove(&key).is_some() {
                self.pending_removals.push(key.clone());
            }
            self.tracer.message(&MessageEvent {
                kind,
                key: &key,
                created: false,
            });
            return;
        }

        let created = !self.characters.contains_key(&key);
        let entry = self
            .characters
            .entry(key.clone())
            .or_insert_with(|| LiveCharacterEntry::new(now));
        entry.touch(now);

        match message {
            LiveMessage::UpsertCharacterMovement(m) => {
                entry.continent_id = m.continent_id;
                entry.map_id = m.map_id;
                entry.position = Some(m.map_position.into());
                entry.forward = m.character_forward;
                entry.needs_redraw = true;
            }
            LiveMessage::UpdateCharacterState(s) => {
                if let Some(continent_id) = s.continent_id {
                    entry.continent_id = continent_id;
                }
                if let Some(map_id) = s.map_id {
                    entry.map_id = map_id;
                }
                entry.shard_id = s.shard_id;
                entry.server_connection_info = s.server_connection_info;
                entry.build_id = s.build_id;
                entry.is_commander = s.is_commander;
                entry.mount = s.mount;
                entry.profession = s.profession;
                entry.specialisation = s.specialisation;
                entry.needs_redraw = true;
            }
            LiveMessage::UpdateCharacterKeepAlive(_) | LiveMessage::DeleteCharacterData(_) => {}
        }

        self.tracer.message(&MessageEvent {
            kind,
            key: &key,
            created,
        });
    }

    /// Decodes and applies a raw payload received on `topic`.
    ///
    /// Malformed payloads are reported to the tracer and leave the table
    /// untouched.
    pub fn on_payload(
        &mut self,
        topic: &str,
        payload: &[u8],
        now: Timestamp,
    ) -> Result<MessageKind, serde_json::Error> {
        match LiveMessage::from_slice(payload) {
            Ok(message) => {
                let kind = message.kind();
                self.on_message(message, now);
                Ok(kind)
            }
            Err(err) => {
                self.tracer.malformed_message(topic, &err.to_string());
                Err(err)
            }
        }
    }

    // -- Maintenance --

    /// Removes every entry whose last message is at least one freshness
    /// window older than `now`. Returns how many were removed.
    pub fn sweep(&mut self, now: Timestamp) -> usize {
        let window = self.freshness_window;
        let before = self.characters.len();
        let removals = &mut self.pending_removals;
        self.characters.retain(|key, entry| {
            let fresh = now.saturating_duration_since(entry.last_message) < window;
            if !fresh {
                removals.push(key.clone());
            }
            fresh
        });
        let evicted = before - self.characters.len();
        if evicted > 0 {
            self.tracer.evicted(evicted);
        }
        evicted
    }

    /// Drops every entry, e.g. after switching channels. Their markers go at
    /// the next redraw.
    pub fn clear(&mut self) {
        let characters = mem::take(&mut self.characters);
        self.pending_removals.extend(characters.into_keys());
    }

    /// Switches the continent markers are drawn for and flags every entry.
    pub fn set_active_continent(&mut self, continent_id: u32) {
        if self.active_continent == continent_id {
            return;
        }
        self.active_continent = continent_id;
        for entry in self.characters.values_mut() {
            entry.needs_redraw = true;
        }
    }

    /// Recomputes the markers of every flagged entry and clears the flags.
    pub fn redraw(&mut self) -> MarkerChanges {
        let mut changes = MarkerChanges::default();
        for key in self.pending_removals.drain(..) {
            if self.drawn.remove(&key) {
                changes.removed.push(key);
            }
        }

        for (key, entry) in &mut self.characters {
            if !entry.needs_redraw {
                continue;
            }
            entry.needs_redraw = false;
            match entry.position {
                Some(position) if entry.continent_id == self.active_continent => {
                    changes.upserted.push(LiveMarker {
                        key: key.clone(),
                        lat_lng: self.projection.unproject(position),
                        rotation: rotation(entry.forward),
                        icon: MarkerIcon::for_entry(entry),
                    });
                    self.drawn.insert(key.clone());
                }
                _ => {
                    if self.drawn.remove(key) {
                        changes.removed.push(key.clone());
                    }
                }
            }
        }

        if !changes.is_empty() {
            self.tracer.redraw(&RedrawEvent {
                upserted: changes.upserted.len(),
                removed: changes.removed.len(),
            });
        }
        changes
    }

    // -- Queries --

    /// Returns whether a redraw would produce changes.
    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        !self.pending_removals.is_empty() || self.characters.values().any(|e| e.needs_redraw)
    }

    /// Returns the entry for `key`.
    #[must_use]
    pub fn get(&self, key: &CharacterKey) -> Option<&LiveCharacterEntry> {
        self.characters.get(key)
    }

    /// Iterates live characters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&CharacterKey, &LiveCharacterEntry)> {
        self.characters.iter()
    }

    /// Returns the number of live characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Returns whether no character is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Returns the continent markers are drawn for.
    #[must_use]
    pub fn active_continent(&self) -> u32 {
        self.active_continent
    }

    /// Returns the number of markers currently on the overlay.
    #[must_use]
    pub fn drawn_len(&self) -> usize {
        self.drawn.len()
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;

    use super::*;
    use crate::geo::LatLng;
    use crate::layer::testing::TestViewport;
    use crate::live::{Mount, Profession};

    fn store() -> LiveMarkerStore {
        LiveMarkerStore::new(&LiveConfig::default())
    }

    fn movement(account: &str, character: &str, continent: u32, x: f64, y: f64) -> String {
        format!(
            r#"{{"Type":"UpsertCharacterMovement","AccountName":"{account}","CharacterName":"{character}",
                "ContinentId":{continent},"MapId":15,"MapPosition":{{"X":{x},"Y":{y}}},
                "CharacterForward":{{"X":1,"Y":0,"Z":0}}}}"#
        )
    }

    fn state(account: &str, character: &str) -> String {
        format!(
            r#"{{"Type":"UpdateCharacterState","AccountName":"{account}","CharacterName":"{character}",
                "ContinentId":1,"MapId":15,"IsCommander":false,"Mount":2,"Profession":4,"Specialisation":55}}"#
        )
    }

    fn simple(kind: &str, account: &str, character: &str) -> String {
        format!(r#"{{"Type":"{kind}","AccountName":"{account}","CharacterName":"{character}"}}"#)
    }

    fn apply(store: &mut LiveMarkerStore, payload: &str, secs: u64) {
        store
            .on_payload("maps.gw2.io/global/1/eu/A", payload.as_bytes(), Timestamp::from_secs(secs))
            .unwrap();
    }

    #[test]
    fn state_merges_into_movement() {
        let mut s = store();
        apply(&mut s, &movement("A", "Bob", 1, 512.0, 256.0), 0);
        apply(&mut s, &state("A", "Bob"), 1);

        let entry = s.get(&CharacterKey::new("A", "Bob")).unwrap();
        assert_eq!(entry.position, Some(kurbo::Point::new(512.0, 256.0)));
        assert_eq!(entry.forward.x, 1.0);
        assert_eq!(entry.mount, Mount::Griffon);
        assert_eq!(entry.profession, Profession::Ranger);
        assert_eq!(entry.last_message, Timestamp::from_secs(1));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn delete_removes_fresh_entry_and_marker() {
        let mut s = store();
        apply(&mut s, &movement("A", "Bob", 1, 128.0, 128.0), 0);
        assert_eq!(s.redraw().upserted.len(), 1);

        apply(&mut s, &simple("DeleteCharacterData", "A", "Bob"), 1);
        assert!(s.is_empty());
        let changes = s.redraw();
        assert_eq!(changes.removed, [CharacterKey::new("A", "Bob")]);
        assert_eq!(s.drawn_len(), 0);
    }

    #[test]
    fn delete_of_unknown_key_is_noop() {
        let mut s = store();
        apply(&mut s, &simple("DeleteCharacterData", "A", "Ghost"), 0);
        assert!(s.is_empty());
        assert!(s.redraw().is_empty());
    }

    #[test]
    fn keepalive_extends_freshness() {
        let mut s = store();
        apply(&mut s, &movement("A", "Bob", 1, 0.0, 0.0), 0);
        apply(&mut s, &simple("UpdateCharacterKeepAlive", "A", "Bob"), 10);

        assert_eq!(s.sweep(Timestamp::from_secs(35)), 0, "age 25 is still fresh");
        assert_eq!(s.len(), 1);
        assert_eq!(s.sweep(Timestamp::from_secs(45)), 1, "age 35 is stale");
        assert!(s.is_empty());
    }

    #[test]
    fn sweep_evicts_at_window_boundary() {
        let mut s = store();
        apply(&mut s, &movement("A", "Bob", 1, 0.0, 0.0), 0);
        s.redraw();
        assert_eq!(s.sweep(Timestamp::from_secs(29)), 0);
        assert_eq!(s.sweep(Timestamp::from_secs(30)), 1);
        assert_eq!(s.redraw().removed.len(), 1);
    }

    #[test]
    fn keepalive_does_not_flag_redraw() {
        let mut s = store();
        apply(&mut s, &movement("A", "Bob", 1, 0.0, 0.0), 0);
        s.redraw();
        apply(&mut s, &simple("UpdateCharacterKeepAlive", "A", "Bob"), 3);
        assert!(!s.needs_redraw());
    }

    #[test]
    fn unknown_key_keepalive_creates_entry_without_marker() {
        let mut s = store();
        apply(&mut s, &simple("UpdateCharacterKeepAlive", "B", "Eve"), 0);
        apply(&mut s, &state("B", "Eve"), 0);
        assert_eq!(s.len(), 1);
        assert!(s.redraw().upserted.is_empty(), "no position yet");
    }

    #[test]
    fn only_active_continent_is_drawn() {
        let mut s = store();
        apply(&mut s, &movement("A", "Bob", 1, 128.0, 256.0), 0);
        apply(&mut s, &movement("C", "Zed", 2, 0.0, 0.0), 0);

        let changes = s.redraw();
        assert_eq!(changes.upserted.len(), 1);
        let marker = &changes.upserted[0];
        assert_eq!(marker.key, CharacterKey::new("A", "Bob"));
        assert_eq!(marker.lat_lng, LatLng::new(-2.0, 1.0));
        assert_eq!(marker.rotation, 90.0);

        s.set_active_continent(2);
        let changes = s.redraw();
        assert_eq!(changes.removed, [CharacterKey::new("A", "Bob")]);
        assert_eq!(changes.upserted[0].key, CharacterKey::new("C", "Zed"));
    }

    #[test]
    fn clear_removes_every_marker() {
        let mut s = store();
        apply(&mut s, &movement("A", "Bob", 1, 0.0, 0.0), 0);
        apply(&mut s, &movement("A", "Ann", 1, 0.0, 0.0), 0);
        s.redraw();
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.redraw().removed.len(), 2);
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let mut s = store();
        assert!(s.on_payload("t", b"{}", Timestamp::ZERO).is_err());
        assert!(s.is_empty());
    }

    #[test]
    fn overlay_is_pinned() {
        let s = store();
        let mut registry = LayerRegistry::with_viewport(TestViewport::new(1, 0, 7));
        s.register_overlay(&mut registry, 99);
        assert_eq!(registry.state(LIVE_LAYER_ID), Some(LayerState::Pinned));
        assert_eq!(registry.layer(LIVE_LAYER_ID).unwrap().friendly_name(), "Live Map");
        registry.evaluate_visibility(0);
        assert!(registry.is_shown(LIVE_LAYER_ID));
    }
}
