//! Storage implementations for coursebook.
//!
//! Implements the `coursebook-core` storage traits: the static document
//! store reached over HTTP (with the absent-is-not-an-error contract),
//! in-memory fixtures for tests, the file-backed session store used to
//! hand quiz results between CLI invocations, and configuration loading.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod session;

pub use config::{load_config, load_config_from, CoursebookConfig};
pub use http::HttpStore;
pub use memory::{MemorySessionStore, MemoryStore};
pub use session::FileSessionStore;
