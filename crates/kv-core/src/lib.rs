//! # kv-core
//!
//! Device-side engine for the key-value (KV) test-harness protocol: the
//! character tokenizer, the `{{key;value}}` message codec, and the handshake /
//! test-lifecycle session built on top of them.
//!
//! This crate has zero dependencies on serial ports, pseudo-terminals, or
//! files.  It talks to the outside world only through the [`CharSource`] and
//! [`CharSink`] capabilities that the embedding application hands in.
//!
//! # Architecture overview (for beginners)
//!
//! A device under test (DUT) and a host-side test runner share one character
//! stream, usually a serial line.  Log output and protocol traffic are mixed on
//! that stream, so protocol messages are framed in double braces:
//!
//! ```text
//! booting...
//! {{__sync;0dad4a9d-59a3-4aec-810d-d5fb09d852c1}}
//! {{__version;1.3.0}}
//! {{__timeout;20}}
//! ```
//!
//! - **`io`** – The two character-stream traits the engine depends on.
//!
//! - **`protocol`** – How characters become messages and back.  The
//!   tokenizer groups characters into tokens, the parser recognizes the
//!   five-token message grammar while skipping noise, and the writer renders
//!   outgoing messages.
//!
//! - **`domain`** – The [`Session`] state machine that performs the sync
//!   handshake and reports test-case and suite results to the host.

pub mod domain;
pub mod io;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `kv_core::Session` instead of `kv_core::domain::session::Session`.
pub use domain::session::{Session, SessionError, SessionState, SuiteOutcome};
pub use io::{CharSink, CharSource};
pub use protocol::codec::{encode_message, KvMessage, KvWriter, Payload};
pub use protocol::field::FieldBuffer;
pub use protocol::keys::ReservedKey;
pub use protocol::parser::{decode_message, KvPair, KvParser, ParseStep};
pub use protocol::tokenizer::{Token, Tokenizer};
