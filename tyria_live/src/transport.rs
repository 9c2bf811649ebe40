// Copyright 2026 the Tyria Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Publish/subscribe transport seam and an in-memory broker.
//!
//! A [`Transport`] hands out one [`Subscription`] per topic filter. Every
//! subscription owns a bounded queue of [`Publish`] messages and a
//! [`CancellationToken`] that is a child of the caller's token, so cancelling
//! the session token tears down every subscription at once.
//!
//! [`LocalBroker`] is the in-process implementation used by tests and the
//! replay demo. Publishing never blocks: when a subscriber's queue is full the
//! message is dropped for that subscriber and a warning is logged.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::topic;

/// Errors returned by a [`Transport`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The filter uses wildcards incorrectly.
    #[error("invalid topic filter {0:?}")]
    InvalidFilter(String),
    /// The transport is shut down.
    #[error("transport closed")]
    Closed,
}

/// One message received on a topic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Publish {
    /// Concrete topic the message was published on.
    pub topic: String,
    /// Raw payload.
    pub payload: Vec<u8>,
}

/// Identifies a subscription within its transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// A live subscription to one topic filter.
///
/// Dropping the subscription cancels it.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    filter: String,
    receiver: mpsc::Receiver<Publish>,
    token: CancellationToken,
}

impl Subscription {
    /// Creates a subscription from its parts. Transports call this.
    pub fn new(
        id: SubscriptionId,
        filter: String,
        receiver: mpsc::Receiver<Publish>,
        token: CancellationToken,
    ) -> Self {
        Self {
            id,
            filter,
            receiver,
            token,
        }
    }

    /// Returns the subscription id.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns the topic filter.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Returns the subscription's cancellation token.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Waits for the next message. Returns `None` once cancelled or once the
    /// transport dropped its end.
    pub async fn recv(&mut self) -> Option<Publish> {
        tokio::select! {
            biased;
            () = self.token.cancelled() => None,
            publish = self.receiver.recv() => publish,
        }
    }

    /// Returns a queued message without waiting.
    pub fn try_recv(&mut self) -> Option<Publish> {
        if self.token.is_cancelled() {
            return None;
        }
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// A publish/subscribe transport.
pub trait Transport {
    /// Subscribes to `filter`. The subscription's token is a child of
    /// `parent`.
    fn subscribe(
        &mut self,
        filter: &str,
        parent: &CancellationToken,
    ) -> Result<Subscription, TransportError>;

    /// Tears a subscription down. Nothing is delivered to it afterwards.
    fn unsubscribe(&mut self, subscription: Subscription);
}

// ---------------------------------------------------------------------------
// LocalBroker
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Subscriber {
    id: SubscriptionId,
    filter: String,
    sender: mpsc::Sender<Publish>,
    token: CancellationToken,
}

#[derive(Debug, Default)]
struct BrokerInner {
    next_id: u64,
    subscribers: Vec<Subscriber>,
    closed: bool,
}

/// In-memory broker with wildcard filter matching.
///
/// Clones share the same subscriber table, so one clone can be handed to a
/// producer while another serves as a session's [`Transport`].
#[derive(Clone, Debug)]
pub struct LocalBroker {
    inner: Arc<Mutex<BrokerInner>>,
    capacity: usize,
}

impl LocalBroker {
    /// Creates a broker whose subscriptions buffer up to `capacity` messages.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::default(),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BrokerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delivers a message to every matching subscriber. Returns how many
    /// subscribers received it.
    pub fn publish(&self, topic: &str, payload: impl Into<Vec<u8>>) -> usize {
        let publish = Publish {
            topic: topic.to_owned(),
            payload: payload.into(),
        };
        let mut inner = self.lock();
        inner
            .subscribers
            .retain(|s| !s.token.is_cancelled() && !s.sender.is_closed());

        let mut delivered = 0;
        for subscriber in &inner.subscribers {
            if !topic::matches(&subscriber.filter, topic) {
                continue;
            }
            match subscriber.sender.try_send(publish.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(topic, filter = %subscriber.filter, "subscriber queue full, dropping publish");
                }
                Err(TrySendError::Closed(_)) => {}
            }
        }
        delivered
    }

    /// Returns the number of active subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock()
            .subscribers
            .iter()
            .filter(|s| !s.token.is_cancelled())
            .count()
    }

    /// Cancels every subscription and refuses new ones.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.closed = true;
        for subscriber in inner.subscribers.drain(..) {
            subscriber.token.cancel();
        }
    }
}

impl Transport for LocalBroker {
    fn subscribe(
        &mut self,
        filter: &str,
        parent: &CancellationToken,
    ) -> Result<Subscription, TransportError> {
        topic::validate_filter(filter)?;
        let mut inner = self.lock();
        if inner.closed {
            return Err(TransportError::Closed);
        }
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;

        let (sender, receiver) = mpsc::channel(self.capacity);
        let token = parent.child_token();
        inner.subscribers.push(Subscriber {
            id,
            filter: filter.to_owned(),
            sender,
            token: token.clone(),
        });
        debug!(filter, id = id.0, "subscribed");
        Ok(Subscription::new(id, filter.to_owned(), receiver, token))
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        let id = subscription.id();
        self.lock().subscribers.retain(|s| s.id != id);
        debug!(filter = subscription.filter(), id = id.0, "unsubscribed");
        drop(subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_to_matching_filters_only() {
        let mut broker = LocalBroker::new(4);
        let root = CancellationToken::new();
        let mut eu = broker.subscribe("maps.gw2.io/global/1/eu/#", &root).unwrap();
        let mut us = broker.subscribe("maps.gw2.io/global/1/us/#", &root).unwrap();

        assert_eq!(broker.publish("maps.gw2.io/global/1/eu/A.1234", "{}"), 1);
        assert_eq!(eu.try_recv().unwrap().topic, "maps.gw2.io/global/1/eu/A.1234");
        assert!(us.try_recv().is_none());
    }

    #[test]
    fn full_queue_drops_without_blocking() {
        let mut broker = LocalBroker::new(1);
        let root = CancellationToken::new();
        let mut sub = broker.subscribe("a/#", &root).unwrap();

        assert_eq!(broker.publish("a/1", "first"), 1);
        assert_eq!(broker.publish("a/2", "second"), 0, "queue is full");
        assert_eq!(sub.try_recv().unwrap().payload, b"first");
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn parent_cancellation_fans_out() {
        let mut broker = LocalBroker::new(4);
        let root = CancellationToken::new();
        let mut a = broker.subscribe("a/#", &root).unwrap();
        let b = broker.subscribe("b/#", &root).unwrap();
        assert_eq!(broker.subscriber_count(), 2);

        root.cancel();
        assert!(b.token().is_cancelled());
        assert_eq!(broker.subscriber_count(), 0);
        assert_eq!(broker.publish("a/1", "x"), 0);
        assert!(a.try_recv().is_none());
    }

    #[test]
    fn unsubscribe_and_drop_stop_delivery() {
        let mut broker = LocalBroker::new(4);
        let root = CancellationToken::new();
        let a = broker.subscribe("a/#", &root).unwrap();
        let b = broker.subscribe("a/#", &root).unwrap();

        broker.unsubscribe(a);
        drop(b);
        assert_eq!(broker.publish("a/1", "x"), 0);
        assert!(!root.is_cancelled(), "children never cancel their parent");
    }

    #[test]
    fn rejects_bad_filters_and_closed_broker() {
        let mut broker = LocalBroker::new(4);
        let root = CancellationToken::new();
        assert_eq!(
            broker.subscribe("a/#/b", &root).unwrap_err(),
            TransportError::InvalidFilter("a/#/b".into())
        );
        broker.close();
        assert_eq!(
            broker.subscribe("a/#", &root).unwrap_err(),
            TransportError::Closed
        );
    }

    #[tokio::test]
    async fn recv_ends_on_cancel() {
        let mut broker = LocalBroker::new(4);
        let root = CancellationToken::new();
        let mut sub = broker.subscribe("a/#", &root).unwrap();
        broker.publish("a/1", "x");
        assert!(sub.recv().await.is_some());
        root.cancel();
        assert!(sub.recv().await.is_none());
    }
}
