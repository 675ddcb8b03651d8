//! kv-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does kv-client do? (for beginners)
//!
//! `kv-core` is a pure engine: it reads characters from a [`kv_core::CharSource`]
//! and writes them to a [`kv_core::CharSink`], and nothing else.  This crate is
//! the thin shell that turns it into a runnable program:
//!
//! 1. Loads a TOML configuration file (suite timeout, host test name, which
//!    console to talk over).
//! 2. Opens the console: standard input/output, or a pair of files.
//! 3. Performs the handshake with the host test runner.
//! 4. Runs a list of test cases, reporting each one and the final verdict.

/// Application layer: the suite runner and the built-in test cases.
pub mod application;

/// Infrastructure layer: console backends and configuration storage.
pub mod infrastructure;
