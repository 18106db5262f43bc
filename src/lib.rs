//! Workspace umbrella crate.
//!
//! Exposes feature flags that map to the individual workspace crates so a
//! host application can depend on `exhibit-admin-workspace` alone. With the
//! default `memory-bridge` feature the admin service is re-exported together
//! with its in-process client bootstrap.

#[cfg(feature = "memory-bridge")]
pub use core_service::{bootstrap_memory, AdminService, CoreDependencies, CoreError};
