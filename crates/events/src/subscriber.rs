//! Delivery sinks for hub subscribers.

use std::sync::mpsc::{Receiver, RecvError, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use thiserror::Error;

/// A sink could not accept a payload; the subscriber is gone for good.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("subscriber connection is closed")]
pub struct DeliveryError;

/// One live connection as seen by the hub.
///
/// `deliver` must not block on the network: transports hand the payload to a
/// per-connection queue and write it from their own task. An `Err` is taken as
/// permanent and the hub drops the subscriber.
pub trait Subscriber<M>: Send + Sync {
    fn deliver(&self, payload: &M) -> Result<(), DeliveryError>;
}

impl<M> Subscriber<M> for Sender<M>
where
    M: Clone + Send,
{
    fn deliver(&self, payload: &M) -> Result<(), DeliveryError> {
        self.send(payload.clone()).map_err(|_| DeliveryError)
    }
}

/// Latest-value sink: an undelivered payload is replaced by the next one, so a
/// slow reader holds at most one pending snapshot.
impl<M> Subscriber<M> for tokio::sync::watch::Sender<M>
where
    M: Clone + Send + Sync,
{
    fn deliver(&self, payload: &M) -> Result<(), DeliveryError> {
        self.send(payload.clone()).map_err(|_| DeliveryError)
    }
}

/// Receiving half of a channel-backed subscription.
///
/// Designed for single-threaded consumption by in-process listeners and tests.
/// Dropping it closes the channel; the hub prunes the subscriber on the next
/// broadcast.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently queued.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}
