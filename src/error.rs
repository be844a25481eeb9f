use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A track locator could not be parsed.
    #[error("Invalid locator: {0}")]
    InvalidLocator(#[from] url::ParseError),

    /// Playback speed multiples must be finite and positive.
    #[error("Invalid speed multiple: {0}")]
    InvalidSpeed(f64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
