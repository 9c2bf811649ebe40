// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser host for tyria.
//!
//! This crate implements the `tyria_core` host contract on top of the DOM:
//!
//! - [`DomViewport`]: overlays are `HtmlElement`s appended to a map container
//! - [`DomMarkerPresenter`]: one positioned `<div>` per live character
//! - [`BrowserHistory`]: keeps the address fragment in sync with the view

#![no_std]

extern crate alloc;

mod dom;
mod location;
mod markers;

pub use dom::DomViewport;
pub use location::{BrowserHistory, chat_link_from_path, chat_link_segment};
pub use markers::DomMarkerPresenter;
pub use tyria_core::backend::{History, MarkerPresenter, Viewport};
