use serde::{Deserialize, Serialize};

use crate::director::channel::ChannelKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    Attached {
        channel: ChannelKind,
    },

    Detached {
        channel: ChannelKind,
    },

    /// Detach of a handle that was unknown or already gone.
    RedundantDetach {
        channel: ChannelKind,
    },

    Broadcast {
        channel: ChannelKind,
        delivered: u32,
    },

    /// Subscription retired during dispatch because its owner was dropped.
    OwnerGone {
        channel: ChannelKind,
    },

    Misfire {
        channel: ChannelKind,
    },

    TrackSwitched,

    EngineFailed,

    /// Engine event for a track that is no longer active.
    StaleEngineEvent,
}
