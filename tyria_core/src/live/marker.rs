// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Computed live markers and the changes handed to a presenter.

use alloc::vec::Vec;

use kurbo::Vec2;

use super::character::{CharacterKey, LiveCharacterEntry, Mount, Profession};
use super::message::Vector3;
use crate::geo::LatLng;

/// Which icon a live marker uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerIcon {
    /// Commander tag.
    Commander,
    /// The active mount.
    Mount(Mount),
    /// The character's profession.
    Profession(Profession),
}

impl MarkerIcon {
    /// Picks the icon for an entry: a commander tag wins over a mount, and a
    /// mount wins over the profession.
    #[must_use]
    pub fn for_entry(entry: &LiveCharacterEntry) -> Self {
        if entry.is_commander {
            Self::Commander
        } else if entry.mount != Mount::None {
            Self::Mount(entry.mount)
        } else {
            Self::Profession(entry.profession)
        }
    }
}

/// One marker on the live overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveMarker {
    /// Character the marker belongs to.
    pub key: CharacterKey,
    /// View-space position.
    pub lat_lng: LatLng,
    /// Heading in degrees clockwise from north.
    pub rotation: f64,
    /// Icon to draw.
    pub icon: MarkerIcon,
}

/// Result of a redraw.
///
/// Presenters apply `removed` before `upserted`; a key may appear in both
/// when a character was deleted and re-created between redraws.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkerChanges {
    /// Markers to create or move.
    pub upserted: Vec<LiveMarker>,
    /// Markers to take off the overlay.
    pub removed: Vec<CharacterKey>,
}

impl MarkerChanges {
    /// Returns whether there is nothing to apply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upserted.is_empty() && self.removed.is_empty()
    }
}

/// Heading of `forward` on the ground plane, in degrees clockwise from north
/// within `(-180, 180]`.
#[must_use]
pub fn rotation(forward: Vector3) -> f64 {
    Vec2::new(forward.z, forward.x).atan2().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timestamp;

    fn heading(x: f64, z: f64) -> f64 {
        rotation(Vector3 { x, y: 0.0, z })
    }

    #[test]
    fn rotation_is_clockwise_from_north() {
        assert_eq!(heading(0.0, 1.0), 0.0);
        assert_eq!(heading(1.0, 0.0), 90.0);
        assert_eq!(heading(0.0, -1.0), 180.0);
        assert_eq!(heading(-1.0, 0.0), -90.0);
    }

    #[test]
    fn icon_precedence() {
        let mut entry = LiveCharacterEntry::new(Timestamp::ZERO);
        entry.profession = Profession::Ranger;
        assert_eq!(
            MarkerIcon::for_entry(&entry),
            MarkerIcon::Profession(Profession::Ranger)
        );

        entry.mount = Mount::Griffon;
        assert_eq!(MarkerIcon::for_entry(&entry), MarkerIcon::Mount(Mount::Griffon));

        entry.is_commander = true;
        assert_eq!(MarkerIcon::for_entry(&entry), MarkerIcon::Commander);
    }
}
