// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport events, deep-link fragments and chat-link navigation.
//!
//! The [`ViewportController`] sits between the host's map events and the
//! [`LayerRegistry`]. Every completed zoom re-evaluates layer visibility, and
//! every completed zoom or pan rewrites the address fragment as
//! `"lat,lng,zoom"` by replacing the current history entry.
//!
//! On load, the incoming [`Location`] decides the first view: a chat-link
//! target wins over a fragment, and a fragment that fails to parse falls back
//! to the default view.

use alloc::string::{String, ToString};
use core::fmt;

use kurbo::Point;

use crate::backend::{History, MarkerLookup, Viewport};
use crate::geo::{LatLng, Projection};
use crate::layer::LayerRegistry;
use crate::trace::Tracer;

/// Zoom level a chat-link target is shown at.
pub const CHAT_LINK_ZOOM: i32 = 7;

// ---------------------------------------------------------------------------
// Fragment
// ---------------------------------------------------------------------------

/// A view center and zoom, as encoded in the address fragment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewFragment {
    /// View center.
    pub center: LatLng,
    /// Zoom level.
    pub zoom: i32,
}

/// Why a fragment could not be parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentError {
    /// The fragment did not have exactly three comma-separated fields.
    FieldCount(usize),
    /// A field was not a finite number.
    InvalidNumber,
}

impl fmt::Display for FragmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount(n) => write!(f, "expected 3 fragment fields, found {n}"),
            Self::InvalidNumber => f.write_str("fragment field is not a finite number"),
        }
    }
}

impl core::error::Error for FragmentError {}

impl ViewFragment {
    /// Creates a fragment.
    #[must_use]
    pub const fn new(center: LatLng, zoom: i32) -> Self {
        Self { center, zoom }
    }

    /// Parses `"lat,lng,zoom"`. A leading `#` is ignored.
    ///
    /// A fractional zoom is truncated towards zero.
    pub fn parse(fragment: &str) -> Result<Self, FragmentError> {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut fields = fragment.split(',').map(str::trim);
        let (Some(lat), Some(lng), Some(zoom), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(FragmentError::FieldCount(fragment.split(',').count()));
        };
        Ok(Self {
            center: LatLng::new(parse_coord(lat)?, parse_coord(lng)?),
            zoom: parse_zoom(zoom)?,
        })
    }
}

impl fmt::Display for ViewFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.center.lat, self.center.lng, self.zoom)
    }
}

fn parse_coord(field: &str) -> Result<f64, FragmentError> {
    field
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(FragmentError::InvalidNumber)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "zoom is range-checked before the cast"
)]
fn parse_zoom(field: &str) -> Result<i32, FragmentError> {
    if let Ok(zoom) = field.parse::<i32>() {
        return Ok(zoom);
    }
    let zoom = parse_coord(field)?.trunc();
    if zoom < f64::from(i32::MIN) || zoom > f64::from(i32::MAX) {
        return Err(FragmentError::InvalidNumber);
    }
    Ok(zoom as i32)
}

// ---------------------------------------------------------------------------
// Chat links
// ---------------------------------------------------------------------------

/// Why a chat link could not be opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatLinkError {
    /// Nothing was left after cleanup.
    Empty,
    /// No marker is known for the cleaned code.
    NotFound(String),
}

impl fmt::Display for ChatLinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty chat link"),
            Self::NotFound(code) => write!(f, "failed to find marker for chat link {code}"),
        }
    }
}

impl core::error::Error for ChatLinkError {}

/// Strips one leading `[`, then one trailing `]`, then one trailing `=`.
///
/// ```
/// use tyria_core::view::clean_chat_link;
///
/// assert_eq!(clean_chat_link("[ABC12=]"), "ABC12");
/// assert_eq!(clean_chat_link("ABC12"), "ABC12");
/// ```
#[must_use]
pub fn clean_chat_link(raw: &str) -> &str {
    let code = raw.strip_prefix('[').unwrap_or(raw);
    let code = code.strip_suffix(']').unwrap_or(code);
    code.strip_suffix('=').unwrap_or(code)
}

// ---------------------------------------------------------------------------
// Initial view
// ---------------------------------------------------------------------------

/// The address the map was opened with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location<'a> {
    /// Address fragment without the leading `#`, if any.
    pub fragment: Option<&'a str>,
    /// Chat-link path parameter, if any.
    pub chat_link: Option<&'a str>,
}

/// Where the first view comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum InitialView {
    /// Navigate to the marker behind this cleaned chat link.
    ChatLink(String),
    /// Restore the view encoded in the fragment.
    Fragment(ViewFragment),
    /// Nothing usable was supplied.
    Default(ViewFragment),
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Bridges viewport events to the registry and to the address fragment.
pub struct ViewportController<H: History> {
    history: H,
    default_view: ViewFragment,
    last_fragment: Option<String>,
    tracer: Tracer,
}

impl<H: History> fmt::Debug for ViewportController<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportController")
            .field("default_view", &self.default_view)
            .field("last_fragment", &self.last_fragment)
            .finish_non_exhaustive()
    }
}

impl<H: History> ViewportController<H> {
    /// Creates a controller writing to `history`, falling back to
    /// `default_view` when the address carries nothing usable.
    #[must_use]
    pub fn new(history: H, default_view: ViewFragment) -> Self {
        Self {
            history,
            default_view,
            last_fragment: None,
            tracer: Tracer::none(),
        }
    }

    /// Routes diagnostics to `tracer`.
    pub fn set_tracer(&mut self, tracer: Tracer) {
        self.tracer = tracer;
    }

    /// Returns the history handle.
    #[must_use]
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Returns the view used when the address carries nothing usable.
    #[must_use]
    pub fn default_view(&self) -> ViewFragment {
        self.default_view
    }

    /// Decides the first view for `location`.
    ///
    /// A chat link takes precedence and suppresses the fragment entirely.
    /// A malformed fragment is ignored.
    #[must_use]
    pub fn initial_view(&self, location: &Location<'_>) -> InitialView {
        if let Some(raw) = location.chat_link.filter(|raw| !raw.is_empty()) {
            return InitialView::ChatLink(clean_chat_link(raw).to_string());
        }
        match location.fragment.map(ViewFragment::parse) {
            Some(Ok(view)) => InitialView::Fragment(view),
            _ => InitialView::Default(self.default_view),
        }
    }

    /// Applies the first view for `location` to the registry's viewport.
    ///
    /// An unknown chat link leaves the view untouched and returns the error
    /// so the host can warn the user.
    pub fn apply_initial_view<V: Viewport, L: MarkerLookup>(
        &mut self,
        location: &Location<'_>,
        registry: &mut LayerRegistry<V>,
        lookup: &L,
    ) -> Result<(), ChatLinkError> {
        match self.initial_view(location) {
            InitialView::ChatLink(code) => self.open_chat_link(&code, registry, lookup).map(drop),
            InitialView::Fragment(view) | InitialView::Default(view) => {
                if let Some(viewport) = registry.viewport_mut() {
                    viewport.set_view(view.center, view.zoom);
                }
                Ok(())
            }
        }
    }

    /// Handles a completed zoom: re-evaluates every layer at the new zoom and
    /// records the view in the address.
    pub fn on_zoom_end<V: Viewport>(&mut self, registry: &mut LayerRegistry<V>) {
        let Some(zoom) = registry.viewport().map(Viewport::zoom) else {
            return;
        };
        registry.evaluate_visibility(zoom);
        self.on_move_end(registry);
    }

    /// Handles a completed pan: records the view in the address.
    pub fn on_move_end<V: Viewport>(&mut self, registry: &LayerRegistry<V>) {
        let Some(viewport) = registry.viewport() else {
            return;
        };
        let fragment = ViewFragment::new(viewport.center(), viewport.zoom()).to_string();
        if self.last_fragment.as_deref() == Some(fragment.as_str()) {
            return;
        }
        self.history.replace_fragment(&fragment);
        self.last_fragment = Some(fragment);
    }

    /// Centers the view on a world coordinate at `zoom`.
    ///
    /// The coordinate is unprojected at the viewport's maximum zoom.
    pub fn pan_to<V: Viewport>(&mut self, registry: &mut LayerRegistry<V>, world: Point, zoom: i32) {
        let Some(viewport) = registry.viewport_mut() else {
            return;
        };
        let center = Projection::new(viewport.max_zoom()).unproject(world);
        viewport.set_view(center, zoom);
    }

    /// Cleans `raw`, resolves it through `lookup` and pans to the marker at
    /// [`CHAT_LINK_ZOOM`]. Returns the marker's world coordinate.
    ///
    /// Nothing moves when the link is unknown.
    pub fn open_chat_link<V: Viewport, L: MarkerLookup>(
        &mut self,
        raw: &str,
        registry: &mut LayerRegistry<V>,
        lookup: &L,
    ) -> Result<Point, ChatLinkError> {
        let code = clean_chat_link(raw);
        if code.is_empty() {
            return Err(ChatLinkError::Empty);
        }
        let Some(world) = lookup.marker_by_chat_link(code) else {
            self.tracer.unknown_chat_link(code);
            return Err(ChatLinkError::NotFound(code.to_string()));
        };
        self.pan_to(registry, world, CHAT_LINK_ZOOM);
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::layer::testing::{Call, TestViewport};
    use crate::layer::{LayerOptions, LayerState};

    #[derive(Debug, Default)]
    struct Recorded(Vec<String>);

    impl History for Recorded {
        fn replace_fragment(&mut self, fragment: &str) {
            self.0.push(fragment.to_string());
        }
    }

    struct Markers;

    impl MarkerLookup for Markers {
        fn marker_by_chat_link(&self, code: &str) -> Option<Point> {
            (code == "BDQEAAA").then(|| Point::new(256.0, 512.0))
        }
    }

    const HOME: ViewFragment = ViewFragment::new(LatLng::new(-128.0, 128.0), 3);

    fn controller() -> ViewportController<Recorded> {
        ViewportController::new(Recorded::default(), HOME)
    }

    #[test]
    fn chat_link_cleanup_order() {
        assert_eq!(clean_chat_link("[ABC12=]"), "ABC12");
        assert_eq!(clean_chat_link("[ABC12]"), "ABC12");
        assert_eq!(clean_chat_link("ABC12="), "ABC12");
        // Only one of each is stripped, and `=` only after `]`.
        assert_eq!(clean_chat_link("[[A]]"), "[A]");
        assert_eq!(clean_chat_link("A=]"), "A");
        assert_eq!(clean_chat_link("A]="), "A]");
    }

    #[test]
    fn fragment_parses_and_formats() {
        let view = ViewFragment::parse("-93.5,152.25,4").unwrap();
        assert_eq!(view, ViewFragment::new(LatLng::new(-93.5, 152.25), 4));
        assert_eq!(view.to_string(), "-93.5,152.25,4");
        assert_eq!(ViewFragment::parse("#-4,2,7").unwrap().to_string(), "-4,2,7");
        assert_eq!(ViewFragment::parse("1,2,5.9").unwrap().zoom, 5);
    }

    #[test]
    fn malformed_fragments_are_rejected() {
        assert_eq!(ViewFragment::parse("1,2"), Err(FragmentError::FieldCount(2)));
        assert_eq!(ViewFragment::parse("1,2,3,4"), Err(FragmentError::FieldCount(4)));
        assert_eq!(ViewFragment::parse("a,2,3"), Err(FragmentError::InvalidNumber));
        assert_eq!(ViewFragment::parse("1,NaN,3"), Err(FragmentError::InvalidNumber));
        assert_eq!(ViewFragment::parse("1,2,"), Err(FragmentError::InvalidNumber));
    }

    #[test]
    fn initial_view_precedence() {
        let c = controller();
        let both = Location {
            fragment: Some("1,2,3"),
            chat_link: Some("[BDQEAAA=]"),
        };
        assert_eq!(c.initial_view(&both), InitialView::ChatLink("BDQEAAA".into()));

        let fragment = Location {
            fragment: Some("1,2,3"),
            chat_link: None,
        };
        assert_eq!(
            c.initial_view(&fragment),
            InitialView::Fragment(ViewFragment::new(LatLng::new(1.0, 2.0), 3))
        );

        let broken = Location {
            fragment: Some("nope"),
            chat_link: None,
        };
        assert_eq!(c.initial_view(&broken), InitialView::Default(HOME));
        assert_eq!(c.initial_view(&Location::default()), InitialView::Default(HOME));
    }

    #[test]
    fn zoom_end_evaluates_and_replaces_fragment() {
        let mut c = controller();
        let mut registry = LayerRegistry::with_viewport(TestViewport::new(3, 0, 7));
        registry.register_layer(
            "waypoints",
            LayerOptions::new(1, LayerState::Enabled).with_min_zoom(5),
        );
        assert!(!registry.is_shown("waypoints"));

        registry.viewport_mut().unwrap().zoom = 5;
        c.on_zoom_end(&mut registry);
        assert!(registry.is_shown("waypoints"));
        assert_eq!(c.history().0, ["0,0,5"]);

        // Same view again: nothing new is written.
        c.on_move_end(&registry);
        assert_eq!(c.history().0.len(), 1, "unchanged fragment must not be rewritten");
    }

    #[test]
    fn chat_link_pans_at_max_zoom() {
        let mut c = controller();
        let mut registry = LayerRegistry::with_viewport(TestViewport::new(2, 0, 7));

        let world = c.open_chat_link("[BDQEAAA=]", &mut registry, &Markers).unwrap();
        assert_eq!(world, Point::new(256.0, 512.0));
        let calls = &registry.viewport().unwrap().calls;
        assert_eq!(calls.last(), Some(&Call::View(LatLng::new(-4.0, 2.0), CHAT_LINK_ZOOM)));
    }

    #[test]
    fn unknown_chat_link_does_not_navigate() {
        let mut c = controller();
        let mut registry = LayerRegistry::with_viewport(TestViewport::new(2, 0, 7));
        let location = Location {
            fragment: Some("1,2,3"),
            chat_link: Some("[XYZ=]"),
        };

        let err = c
            .apply_initial_view(&location, &mut registry, &Markers)
            .unwrap_err();
        assert_eq!(err, ChatLinkError::NotFound("XYZ".into()));
        assert!(
            !registry
                .viewport()
                .unwrap()
                .calls
                .iter()
                .any(|call| matches!(call, Call::View(..))),
            "fragment is not used as a fallback when a chat link is present"
        );
        assert_eq!(
            c.open_chat_link("[]", &mut registry, &Markers),
            Err(ChatLinkError::Empty)
        );
    }

    #[test]
    fn fragment_initial_view_sets_view() {
        let mut c = controller();
        let mut registry = LayerRegistry::with_viewport(TestViewport::new(2, 0, 7));
        let location = Location {
            fragment: Some("-10,20,6"),
            chat_link: None,
        };
        c.apply_initial_view(&location, &mut registry, &Markers).unwrap();
        assert_eq!(
            registry.viewport().unwrap().calls.last(),
            Some(&Call::View(LatLng::new(-10.0, 20.0), 6))
        );
    }
}
