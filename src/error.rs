// model = "claude-opus-4-5"
// created = "2026-10-16"
// modified = "2026-10-16"
// driver = "Isaac Clayton"

//! Error types for the splay list.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("lower sentinel must be strictly less than upper sentinel")]
    InvalidBounds,

    #[error("key must lie strictly between the sentinel bounds")]
    KeyOutOfBounds,

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
