// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named map overlays and their zoom-driven visibility.
//!
//! A [`LayerRegistry`] holds one [`LayerEntry`] per overlay. Entries carry an
//! opaque renderable owned by the host [`Viewport`](crate::backend::Viewport),
//! optional zoom bounds, exact-zoom opacity bands and a [`LayerState`].
//! [`LayerRegistry::evaluate_visibility`] moves non-sticky entries between
//! `Enabled` and `Hidden` and then shows, hides or fades every renderable.

mod entry;
mod evaluate;
mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use entry::{LayerEntry, LayerOptions, LayerState};
pub use registry::LayerRegistry;
