// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The live position event loop.
//!
//! A [`LiveSession`] owns one map's worth of state: the [`AppState`], the
//! [`LayerRegistry`] with its viewport, the [`ViewportController`], the
//! [`LiveMarkerStore`] and the presenter of the live overlay. Everything is
//! mutated from one task, in arrival order.
//!
//! The synchronous entry points ([`handle_event`](LiveSession::handle_event),
//! [`handle_publish`](LiveSession::handle_publish),
//! [`sweep`](LiveSession::sweep), [`flush_markers`](LiveSession::flush_markers))
//! can be driven by any loop. [`run`](LiveSession::run) is the tokio driver:
//!
//! ```text
//!   cancellation ─┐
//!   host events  ─┼──► select! ──► handle_* ──► flush_markers() ──► MarkerPresenter
//!   subscription ─┤
//!   sweep timer  ─┘
//! ```
//!
//! Whenever a transition changes the computed topic, the old subscription is
//! torn down before the new one is made, so no message is delivered twice.

use std::fmt;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tyria_core::backend::{History, MarkerPresenter, Viewport};
use tyria_core::channel::ChannelRouter;
use tyria_core::config::LiveConfig;
use tyria_core::layer::{LayerRegistry, LayerState};
use tyria_core::live::{LiveMarkerStore, MessageKind};
use tyria_core::state::{AppState, Transition};
use tyria_core::time::Timestamp;
use tyria_core::trace::Tracer;
use tyria_core::view::{ViewFragment, ViewportController};

use crate::transport::{Publish, Subscription, Transport};

/// A completed viewport interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportEvent {
    /// A zoom finished.
    ZoomEnd,
    /// A pan finished.
    MoveEnd,
}

/// Input from the host.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// A state transition.
    Transition(Transition),
    /// The viewport finished moving on its own.
    Viewport(ViewportEvent),
    /// Move the viewport, then handle the resulting zoom/move end.
    SetView(ViewFragment),
    /// An explicit layer toggle.
    SetLayerState {
        /// Layer id.
        id: String,
        /// New state.
        state: LayerState,
    },
}

/// One map's live pipeline.
pub struct LiveSession<V, H, P, T>
where
    V: Viewport,
    H: History,
    P: MarkerPresenter,
    T: Transport,
{
    config: LiveConfig,
    router: ChannelRouter,
    state: AppState,
    registry: LayerRegistry<V>,
    controller: ViewportController<H>,
    markers: LiveMarkerStore,
    presenter: P,
    transport: T,
    subscription: Option<Subscription>,
    topic: Option<String>,
    token: CancellationToken,
    started: Instant,
    tracer: Tracer,
}

impl<V, H, P, T> fmt::Debug for LiveSession<V, H, P, T>
where
    V: Viewport,
    H: History,
    P: MarkerPresenter,
    T: Transport,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveSession")
            .field("topic", &self.topic)
            .field("registry", &self.registry)
            .field("markers", &self.markers)
            .field("cancelled", &self.token.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl<V, H, P, T> LiveSession<V, H, P, T>
where
    V: Viewport,
    H: History,
    P: MarkerPresenter,
    T: Transport,
{
    /// Creates a session and registers `overlay` as the pinned live layer.
    ///
    /// Nothing is subscribed until the first
    /// [`refresh_subscription`](Self::refresh_subscription) or [`run`](Self::run).
    pub fn new(
        config: LiveConfig,
        mut registry: LayerRegistry<V>,
        controller: ViewportController<H>,
        presenter: P,
        transport: T,
        overlay: V::Renderable,
    ) -> Self {
        let state = AppState::default();
        let mut markers = LiveMarkerStore::new(&config);
        markers.set_active_continent(state.live_markers.active_continent_id);
        markers.register_overlay(&mut registry, overlay);
        Self {
            router: ChannelRouter::from_config(&config),
            config,
            state,
            registry,
            controller,
            markers,
            presenter,
            transport,
            subscription: None,
            topic: None,
            token: CancellationToken::new(),
            started: Instant::now(),
            tracer: Tracer::none(),
        }
    }

    /// Routes diagnostics from every component to `tracer`.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Tracer) -> Self {
        self.registry.set_tracer(tracer.clone());
        self.controller.set_tracer(tracer.clone());
        self.markers.set_tracer(tracer.clone());
        self.tracer = tracer;
        self
    }

    // -- Accessors --

    /// Returns the application state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Returns the layer registry.
    #[must_use]
    pub fn registry(&self) -> &LayerRegistry<V> {
        &self.registry
    }

    /// Returns the layer registry mutably, e.g. to register host overlays.
    pub fn registry_mut(&mut self) -> &mut LayerRegistry<V> {
        &mut self.registry
    }

    /// Returns the viewport controller.
    #[must_use]
    pub fn controller(&self) -> &ViewportController<H> {
        &self.controller
    }

    /// Returns the live character table.
    #[must_use]
    pub fn markers(&self) -> &LiveMarkerStore {
        &self.markers
    }

    /// Returns the live overlay presenter.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the topic currently subscribed to.
    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Returns the token that stops [`run`](Self::run). Every subscription's
    /// token is a child of it.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Time since the session started, on the pipeline clock.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        let elapsed = self.started.elapsed().as_millis();
        Timestamp(u64::try_from(elapsed).unwrap_or(u64::MAX))
    }

    // -- Synchronous entry points --

    /// Handles one host event.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Transition(transition) => {
                self.state.apply(&transition);
                self.markers
                    .set_active_continent(self.state.live_markers.active_continent_id);
                self.refresh_subscription();
            }
            SessionEvent::Viewport(ViewportEvent::ZoomEnd) => {
                self.controller.on_zoom_end(&mut self.registry);
            }
            SessionEvent::Viewport(ViewportEvent::MoveEnd) => {
                self.controller.on_move_end(&self.registry);
            }
            SessionEvent::SetView(view) => {
                let Some(viewport) = self.registry.viewport_mut() else {
                    return;
                };
                let zoom_before = viewport.zoom();
                viewport.set_view(view.center, view.zoom);
                if viewport.zoom() == zoom_before {
                    self.controller.on_move_end(&self.registry);
                } else {
                    self.controller.on_zoom_end(&mut self.registry);
                }
            }
            SessionEvent::SetLayerState { id, state } => {
                self.registry.set_layer_state(&id, state);
            }
        }
    }

    /// Resubscribes if the state now computes a different topic.
    ///
    /// The old subscription is torn down first. With
    /// `clear_on_topic_change`, the character table is emptied and the overlay
    /// cleared before the new subscription is made.
    ///
    /// A topic the transport refuses leaves the session unsubscribed until a
    /// later transition tries again.
    pub fn refresh_subscription(&mut self) {
        let topic = self.state.topic(&self.router);
        if topic == self.topic {
            return;
        }

        if let Some(subscription) = self.subscription.take() {
            self.transport.unsubscribe(subscription);
        }
        if self.config.clear_on_topic_change {
            self.markers.clear();
            self.flush_markers();
        }
        self.tracer
            .topic_changed(self.topic.as_deref(), topic.as_deref());
        info!(old = ?self.topic, new = ?topic, "live topic changed");

        self.topic = None;
        let Some(topic) = topic else {
            return;
        };
        match self.transport.subscribe(&topic, &self.token) {
            Ok(subscription) => {
                self.subscription = Some(subscription);
                self.topic = Some(topic);
            }
            Err(err) => {
                warn!(topic = %topic, %err, "subscribe failed, live layer stays empty");
                self.tracer.subscribe_failed(&topic, &err.to_string());
            }
        }
    }

    /// Applies one received message. Malformed payloads are dropped.
    pub fn handle_publish(&mut self, publish: &Publish) -> Option<MessageKind> {
        let now = self.now();
        match self.markers.on_payload(&publish.topic, &publish.payload, now) {
            Ok(kind) => Some(kind),
            Err(err) => {
                debug!(topic = %publish.topic, %err, "dropped payload");
                None
            }
        }
    }

    /// Applies every message already queued on the subscription. Returns how
    /// many were taken.
    pub fn drain_subscription(&mut self) -> usize {
        let mut taken = 0;
        while let Some(publish) = self.subscription.as_mut().and_then(Subscription::try_recv) {
            self.handle_publish(&publish);
            taken += 1;
        }
        taken
    }

    /// Evicts stale characters. Returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let now = self.now();
        self.markers.sweep(now)
    }

    /// Redraws flagged markers and hands the changes to the presenter.
    /// Returns whether anything was applied.
    pub fn flush_markers(&mut self) -> bool {
        if !self.markers.needs_redraw() {
            return false;
        }
        let changes = self.markers.redraw();
        if changes.is_empty() {
            return false;
        }
        self.presenter.apply(&changes);
        true
    }

    /// Drops the subscription and cancels the session token.
    pub fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.transport.unsubscribe(subscription);
        }
        self.topic = None;
        self.token.cancel();
    }

    // -- Async driver --

    /// Runs until the session token is cancelled or `events` closes, then
    /// shuts down.
    pub async fn run(&mut self, mut events: mpsc::Receiver<SessionEvent>) {
        self.drive(&mut events).await;
        self.shutdown();
        info!("live session stopped");
    }

    async fn drive(&mut self, events: &mut mpsc::Receiver<SessionEvent>) {
        self.refresh_subscription();
        let mut sweep = time::interval(self.config.sweep_interval());
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let token = self.token.clone();

        loop {
            tokio::select! {
                biased;
                () = token.cancelled() => return,
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => return,
                },
                publish = next_publish(self.subscription.as_mut()) => match publish {
                    Some(publish) => {
                        self.handle_publish(&publish);
                    }
                    None => {
                        warn!(topic = ?self.topic, "subscription ended");
                        self.subscription = None;
                        self.topic = None;
                    }
                },
                _ = sweep.tick() => {
                    self.sweep();
                }
            }
            self.flush_markers();
        }
    }
}

async fn next_publish(subscription: Option<&mut Subscription>) -> Option<Publish> {
    match subscription {
        Some(subscription) => subscription.recv().await,
        None => std::future::pending().await,
    }
}
