//! Application layer use cases for the client.
//!
//! - **`run_suite`** – Drives a list of [`run_suite::TestCase`]s through a
//!   session: announces the case count, wraps every case in start/finish
//!   notifications, then reports the summary and the suite verdict.
//!
//! - **`greeting`** – A test case that exchanges one `device_greetings`
//!   message with the host.  It is the suite the binary runs by default.

pub mod greeting;
pub mod run_suite;
