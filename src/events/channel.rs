//! Event channel implementation using crossbeam-channel.
//!
//! Provides a thread-safe way to send events from the scan thread
//! to any UI layer.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::time::Duration;

use super::Event;

/// Sends events from the core library.
///
/// Cheap to clone; every clone feeds the same receiver.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event.
    ///
    /// If the receiver is dropped, the event is silently discarded,
    /// so progress reporting stays optional.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receives events from the core library.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event is received
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Wait up to `timeout` for the next event.
    ///
    /// Returns `None` on timeout or once every sender is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Event> {
        self.inner.recv_timeout(timeout).ok()
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Drain every event that is already queued
    pub fn try_iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.try_iter()
    }

    /// Returns a blocking iterator that ends when every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Factory for connected sender/receiver pairs.
pub struct EventChannel;

impl EventChannel {
    /// Create a new unbounded event channel.
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }

    /// Create a bounded event channel.
    ///
    /// The scan thread blocks when the channel is full, so only use this
    /// with a consumer that keeps draining.
    pub fn bounded(capacity: usize) -> (EventSender, EventReceiver) {
        let (sender, receiver) = bounded(capacity);
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A no-op event sender for when you don't need progress reporting.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}
