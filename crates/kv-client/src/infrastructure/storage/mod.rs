//! Storage infrastructure: configuration file loading.
//!
//! The `config` sub-module handles:
//!
//! - Locating the TOML configuration file in the platform-appropriate
//!   directory when no explicit path is given.
//! - Parsing it into [`config::ClientConfig`].
//! - Providing sensible defaults when the file does not exist yet.

pub mod config;
