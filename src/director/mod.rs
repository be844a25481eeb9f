//! # Clock Director
//!
//! Key-addressed publish/subscribe multiplexer for playback telemetry. The engine
//! broadcasts `(key, value)` pairs per channel; every live subscription on that
//! channel receives them in registration order. Subscriptions hold their owner
//! weakly and are retired on the first dispatch that finds the owner gone.
//!
//! One instance is shared process-wide (`ClockDirector::shared`), but components
//! take it as an explicit `Arc<ClockDirector>` so tests can run on private instances.

pub mod channel;
pub mod subscription;

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::debug;

use crate::key::TrackKey;
use crate::telemetry::{TelemetryEvent, TelemetryRecorder, TelemetrySnapshot};

pub use channel::{
    Channel, ChannelKind, DurationChannel, Needle, NeedleChannel, PlayingStatusChannel, Seconds,
    Telemetry,
};
pub use subscription::{Delivery, OwnerGone, Subscriber, SubscriptionId};

use subscription::Subscription;

static SHARED: Lazy<Arc<ClockDirector>> = Lazy::new(|| Arc::new(ClockDirector::new()));

/// Live subscriptions of one channel, in registration order.
pub struct ChannelRegistry<V> {
    subscriptions: Mutex<Vec<Arc<Subscription<V>>>>,
}

impl<V> ChannelRegistry<V> {
    fn new() -> Self {
        Self {
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Immutable copy of the live set. Dispatch iterates this so callbacks may
    /// attach or detach without invalidating the iteration.
    fn snapshot(&self) -> Vec<Arc<Subscription<V>>> {
        self.subscriptions.lock().clone()
    }

    fn insert(&self, subscription: Subscription<V>) {
        self.subscriptions.lock().push(Arc::new(subscription));
    }

    fn remove(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.lock();
        match subscriptions.iter().position(|s| s.id == id) {
            Some(index) => {
                let removed = subscriptions.remove(index);
                removed.deactivate();
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.subscriptions.lock().len()
    }
}

pub struct ClockDirector {
    duration: ChannelRegistry<Seconds>,
    needle: ChannelRegistry<Needle>,
    playing_status: ChannelRegistry<bool>,
    telemetry: Mutex<TelemetryRecorder>,
}

impl Default for ClockDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockDirector {
    /// Independent director with empty channels.
    pub fn new() -> Self {
        Self {
            duration: ChannelRegistry::new(),
            needle: ChannelRegistry::new(),
            playing_status: ChannelRegistry::new(),
            telemetry: Mutex::new(TelemetryRecorder::new()),
        }
    }

    /// The process-wide director. Created empty on first use, lives until exit.
    pub fn shared() -> Arc<ClockDirector> {
        Arc::clone(&SHARED)
    }

    pub fn attach<C: Channel>(
        &self,
        _channel: C,
        subscriber: Subscriber<C::Value>,
    ) -> SubscriptionId {
        let subscription = Subscription::new(subscriber);
        let id = subscription.id;
        C::registry(self).insert(subscription);

        debug!(channel = ?C::KIND, %id, "attached");
        self.record(TelemetryEvent::Attached { channel: C::KIND });
        id
    }

    /// Removes the subscription. Unknown or already removed handles are a no-op,
    /// since teardown can race an owner-gone retirement. Returns whether anything was removed.
    pub fn detach<C: Channel>(&self, _channel: C, id: SubscriptionId) -> bool {
        let removed = C::registry(self).remove(id);
        if removed {
            debug!(channel = ?C::KIND, %id, "detached");
            self.record(TelemetryEvent::Detached { channel: C::KIND });
        } else {
            debug!(channel = ?C::KIND, %id, "detach of unknown handle ignored");
            self.record(TelemetryEvent::RedundantDetach { channel: C::KIND });
        }
        removed
    }

    /// Delivers `value` for `key` to every live subscription on the channel.
    ///
    /// A subscriber reporting `OwnerGone` is removed on the spot and dispatch moves
    /// on to the next one. Returns the number of successful deliveries.
    pub fn broadcast<C: Channel>(&self, _channel: C, key: &TrackKey, value: C::Value) -> usize {
        let registry = C::registry(self);
        let mut delivered = 0;

        for subscription in registry.snapshot() {
            // Detached after the snapshot was taken.
            if !subscription.is_active() {
                continue;
            }
            match subscription.subscriber.deliver(key, value) {
                Ok(()) => delivered += 1,
                Err(OwnerGone) => {
                    if registry.remove(subscription.id) {
                        debug!(channel = ?C::KIND, id = %subscription.id, "owner gone, subscription retired");
                        self.record(TelemetryEvent::OwnerGone { channel: C::KIND });
                    }
                }
            }
        }

        self.record(TelemetryEvent::Broadcast {
            channel: C::KIND,
            delivered: u32::try_from(delivered).unwrap_or(u32::MAX),
        });
        delivered
    }

    /// Single entry point for producers reporting through `Telemetry` values.
    pub fn publish(&self, key: &TrackKey, telemetry: Telemetry) -> usize {
        match telemetry {
            Telemetry::Duration(seconds) => self.broadcast(DurationChannel, key, seconds),
            Telemetry::Needle(needle) => self.broadcast(NeedleChannel, key, needle),
            Telemetry::PlayingStatus(playing) => {
                self.broadcast(PlayingStatusChannel, key, playing)
            }
        }
    }

    pub fn subscriber_count<C: Channel>(&self, _channel: C) -> usize {
        C::registry(self).len()
    }

    pub fn record(&self, event: TelemetryEvent) {
        self.telemetry.lock().record(event);
    }

    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        self.telemetry.lock().snapshot()
    }
}
