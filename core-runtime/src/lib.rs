//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the exhibit admin core:
//! - Logging and tracing infrastructure
//! - Configuration and `settings.json` loading
//! - Event bus system
//!
//! The other core crates depend on this one for their logging conventions
//! and for the events they publish to the host UI.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
