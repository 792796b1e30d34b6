//! ClubHub library root.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod persist;
pub mod registry;

pub use cli::Commands;
pub use config::{load_settings, OrphanPolicy, Settings};
pub use error::{Error, Result};
pub use persist::{load_system_state, save_system_state, LoadReport};
pub use registry::{Club, ClubId, Registry, Student, StudentId};
