//! Protocol-level behavior built on top of the codec.
//!
//! # Why a separate layer? (for beginners)
//!
//! The `protocol` module only knows how characters become messages.  It has
//! no idea that `__sync` must be answered, or that `__exit` must be the last
//! thing a suite sends.  Those ordering rules live here, in one state machine,
//! so that the codec stays a plain translator and the rules can be unit-tested
//! against in-memory streams without any serial port or terminal.

/// Handshake and test-lifecycle reporting.
///
/// See [`session::Session`] for the main type.
pub mod session;
