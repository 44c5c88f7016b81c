//! Error types for overclock and parallel calculations

use thiserror::Error;

/// Convenient result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Conflicting or nonsensical calculator parameters.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// The machine cannot supply a single unit of the recipe's power draw.
    #[error(
        "not enough machine power: recipe needs {required} EU/t, machine supplies {available} EU/t"
    )]
    InsufficientPower { required: u64, available: u64 },

    #[error("voltage tier {tier} is out of range (expected 0-15)")]
    TierOutOfRange { tier: i64 },

    #[error("no voltage tier covers {voltage} EU/t")]
    VoltageOutOfRange { voltage: u64 },

    #[error("unknown voltage tier name: {name}")]
    UnknownTier { name: String },
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
