use thiserror::Error;

/// Errors surfaced to callers of the core library.
///
/// Parsing never produces one of these: malformed markdown degrades to
/// default values instead.
#[derive(Debug, Error)]
pub enum TravelError {
    /// The backend call failed or returned no text.
    #[error("Failed to fetch travel information: {message}")]
    Fetch { message: String },

    /// Missing or unusable configuration, detected before any request.
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl TravelError {
    pub fn fetch<S: Into<String>>(message: S) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Flatten an `anyhow` chain into a fetch failure, keeping every cause.
    pub fn from_fetch_chain(err: &anyhow::Error) -> Self {
        Self::fetch(format!("{err:#}"))
    }
}

pub type TravelResult<T> = Result<T, TravelError>;
