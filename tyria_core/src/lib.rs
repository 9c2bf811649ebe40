// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer visibility engine and live position model for a tile-map companion
//! client.
//!
//! `tyria_core` owns the parts of the map client with real state: which
//! overlays are drawn at which zoom, and which remote characters are live. It
//! is `no_std` compatible (with `alloc`) and never touches a map widget or a
//! network socket directly; hosts plug in through the traits in [`backend`].
//!
//! # Architecture
//!
//! ```text
//!   StateStore (AppState) ──► ChannelRouter::compute_topic() ──► topic
//!                                                                  │
//!                 ┌────────────────────────────────────────────────┘
//!                 ▼
//!   inbound payloads ──► LiveMarkerStore ──► MarkerChanges ──► MarkerPresenter
//!                                                                  │
//!                 ┌────────────────────────────────────────────────┘
//!                 ▼
//!   viewport zoom ──► ViewportController ──► LayerRegistry::evaluate_visibility()
//! ```
//!
//! **[`layer`]**: Named overlays with `Enabled`/`Disabled`/`Hidden`/`Pinned`
//! states, zoom bounds and exact-zoom opacity bands.
//!
//! **[`view`]**: Viewport event handling, `"lat,lng,zoom"` deep-link
//! fragments and chat-link navigation.
//!
//! **[`channel`]**: Pure mapping from channel inputs to a subscription topic.
//!
//! **[`live`]**: Presence message schema and the live character table with
//! freshness-window eviction.
//!
//! **[`state`]**: Application state slices mutated only through named
//! transitions.
//!
//! **[`backend`]**: The host contract: [`Viewport`](backend::Viewport),
//! [`History`](backend::History), [`MarkerPresenter`](backend::MarkerPresenter)
//! and [`MarkerLookup`](backend::MarkerLookup).
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! **[`config`]**, **[`geo`]**, **[`time`]**: Tunables, the flat map
//! projection and the pipeline clock.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod channel;
pub mod config;
pub mod geo;
pub mod layer;
pub mod live;
pub mod state;
pub mod time;
pub mod trace;
pub mod view;
