use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use thiserror::Error;

use crate::key::TrackKey;

/// Handles are unique for the whole process, across every director instance.
static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

/// Opaque token returned by `attach`, used to `detach` later. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn next() -> Self {
        SubscriptionId(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Returned by a callback whose owning consumer no longer exists.
/// The director detaches the subscription; it is never reported upstream.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("subscription owner has been dropped")]
pub struct OwnerGone;

pub type Delivery = Result<(), OwnerGone>;

type Callback<V> = dyn Fn(&TrackKey, V) -> Delivery + Send + Sync;

/// Callback registered on a channel.
pub struct Subscriber<V> {
    callback: Arc<Callback<V>>,
}

impl<V> Clone for Subscriber<V> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<V: 'static> Subscriber<V> {
    /// Wraps a raw callback. The callback decides for itself when its owner is gone.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&TrackKey, V) -> Delivery + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Binds `handler` to `owner` through a weak reference.
    ///
    /// Before every delivery the reference is upgraded; if the owner has been
    /// dropped the handler is not run and `OwnerGone` is returned instead.
    pub fn weak<O, F>(owner: &Arc<O>, handler: F) -> Self
    where
        O: Send + Sync + 'static,
        F: Fn(&O, &TrackKey, V) + Send + Sync + 'static,
    {
        let owner: Weak<O> = Arc::downgrade(owner);
        Self::new(move |key, value| {
            let owner = owner.upgrade().ok_or(OwnerGone)?;
            handler(&owner, key, value);
            Ok(())
        })
    }

    pub(crate) fn deliver(&self, key: &TrackKey, value: V) -> Delivery {
        (self.callback)(key, value)
    }
}

impl<V> fmt::Debug for Subscriber<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber").finish_non_exhaustive()
    }
}

/// One registration on one channel. Immutable once created apart from the
/// active flag, which only ever goes from true to false.
#[derive(Debug)]
pub(crate) struct Subscription<V> {
    pub id: SubscriptionId,
    pub subscriber: Subscriber<V>,
    active: AtomicBool,
}

impl<V> Subscription<V> {
    pub fn new(subscriber: Subscriber<V>) -> Self {
        Self {
            id: SubscriptionId::next(),
            subscriber,
            active: AtomicBool::new(true),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }
}
