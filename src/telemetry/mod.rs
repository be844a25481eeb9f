//! # Routing Telemetry
//!
//! Records what the director and presenters did with each delivery so the
//! routing can be observed and verified. Nothing in the dispatch path reads it back.
//!
//! # PRIVACY INVARIANT
//! Events carry channels and counts only. Track keys and locators are never recorded.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::TelemetryEvent;
pub use metrics::TelemetrySnapshot;
pub use recorder::TelemetryRecorder;
