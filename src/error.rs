//! Error types for puzzle construction and search configuration.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("a puzzle needs at least one unique connector")]
    NoConnectors,

    #[error("{count} unique connectors is too many for {slots} boundaries")]
    TooManyConnectors { count: usize, slots: usize },

    #[error("connector {value} on boundary {slot} is outside 1..={max} in magnitude")]
    ConnectorOutOfRange { slot: usize, value: i8, max: usize },

    #[error("invalid search configuration: {0}")]
    InvalidSearch(String),
}
