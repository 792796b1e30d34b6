//! Error types for ClubHub.

use thiserror::Error;

use crate::registry::{ClubId, StudentId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Club not found: {0}")]
    ClubNotFound(String),

    #[error("Student ID not found: {0}")]
    StudentNotFound(StudentId),

    #[error("Maximum number of clubs reached ({0})")]
    CapacityExceeded(usize),

    #[error("Club ID {0} is already taken by a loaded club")]
    ClubIdInUse(ClubId),

    #[error("Malformed file: {0}")]
    MalformedFile(String),

    #[error("Name cannot be saved: {0:?} (names must be non-empty and contain no whitespace)")]
    InvalidName(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
