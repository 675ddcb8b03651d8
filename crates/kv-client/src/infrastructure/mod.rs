//! Infrastructure layer for the client application.
//!
//! Contains everything that touches the operating system: the character
//! consoles the engine talks over and the configuration file.
//!
//! **Dependency rule**: this layer may depend on `application` and `kv_core`,
//! but MUST NOT be imported by the `application` layer outside of tests.
//!
//! # Sub-modules
//!
//! - **`console`** – [`kv_core::CharSource`] / [`kv_core::CharSink`]
//!   implementations over standard I/O and files, selected at runtime from
//!   the configuration.  A `MockConsole` is also provided for tests.
//!
//! - **`storage`** – Reads the TOML configuration file from an explicit path
//!   or the platform-appropriate config directory.

pub mod console;
pub mod storage;
