//! # In-Memory Exhibit Client
//!
//! Process-local implementation of every capability in `bridge-traits`.
//!
//! A [`MemoryBackend`] stands for everything that survives the app: the
//! local disk (station list, cached snapshots, media files) and the devices
//! on the exhibit network. A [`MemoryClient`] is one run of the app on top of
//! it; [`MemoryClient::restart`] drops the in-memory state and loads it again
//! from the backend.
//!
//! Devices record every command they receive, so tests can count what a sync
//! or an exit actually sent:
//!
//! ```ignore
//! let backend = Arc::new(MemoryBackend::new());
//! backend.add_device("192.168.0.10");
//! let client = MemoryClient::new(backend.clone());
//! // ... edit and sync ...
//! assert_eq!(backend.delete_media_commands("192.168.0.10"), 1);
//! ```

mod backend;
mod client;
mod connection;
mod model;
mod station;

pub use backend::{Device, MemoryBackend, DELETE_MEDIA_COMMAND};
pub use client::MemoryClient;
pub use connection::{REGISTER_ADMIN_COMMAND, UNREGISTER_COMMAND};
pub use station::SYNC_APP_NAME;
