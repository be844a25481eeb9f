pub mod config;
pub mod director;
pub mod error;
pub mod key;
pub mod presenter;
pub mod sim;
pub mod telemetry;

pub use config::PlayerConfig;
pub use director::ClockDirector;
pub use error::{Error, Result};
pub use key::TrackKey;
pub use presenter::PlaybackPresenter;
