//! Message parser for the decode direction.
//!
//! Message grammar:
//! ```text
//! <message> ::= <open> <string> <semicolon> <string> <close>
//! ```
//! Everything else in the stream (log lines, stray punctuation) is skipped
//! token by token.  A partial match is abandoned where it breaks and scanning
//! resumes right there; a `{{` that broke the match opens the next attempt.

use tracing::{debug, trace};

use crate::io::CharSource;
use crate::protocol::field::FieldBuffer;
use crate::protocol::tokenizer::{Token, Tokenizer};

/// Default key and value capacity used by [`KvParser::next_message`].
pub const DEFAULT_FIELD_CAPACITY: usize = 256;

/// Result of one parsing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStep {
    /// A complete message was stored in the key and value buffers.
    Message,
    /// A token outside any message was discarded.
    Skipped(Token),
    /// A message started but `found` broke the grammar.
    Malformed { found: Token },
    /// The source is exhausted.
    EndOfStream,
}

/// An owned, decoded `{{key;value}}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KvPair {
    pub key: String,
    pub value: String,
}

impl KvPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Recognizes `{{key;value}}` messages in a character stream.
pub struct KvParser<S> {
    tokenizer: Tokenizer<S>,
    /// A token that broke a match and must be looked at again.
    pending: Option<Token>,
    key_capacity: usize,
    value_capacity: usize,
}

impl<S: CharSource> KvParser<S> {
    pub fn new(source: S) -> Self {
        Self::with_field_capacities(source, DEFAULT_FIELD_CAPACITY, DEFAULT_FIELD_CAPACITY)
    }

    /// Creates a parser whose [`next_message`](Self::next_message) truncates
    /// keys and values to the given capacities (terminator slot included).
    pub fn with_field_capacities(source: S, key_capacity: usize, value_capacity: usize) -> Self {
        Self {
            tokenizer: Tokenizer::new(source),
            pending: None,
            key_capacity,
            value_capacity,
        }
    }

    pub fn into_inner(self) -> S {
        self.tokenizer.into_inner()
    }

    /// Blocks until the next message and returns it as owned strings, or
    /// `None` once the stream has ended.
    pub fn next_message(&mut self) -> Option<KvPair> {
        let mut key = FieldBuffer::new(self.key_capacity);
        let mut value = FieldBuffer::new(self.value_capacity);
        self.parse_kv(&mut key, &mut value).then(|| KvPair {
            key: key.into_string(),
            value: value.into_string(),
        })
    }

    /// Blocks until a full message has been stored in `key` and `value`
    /// (returns `true`) or the stream ends (returns `false`).
    ///
    /// Every token that is not part of a complete message is discarded.
    pub fn parse_kv(&mut self, key: &mut FieldBuffer, value: &mut FieldBuffer) -> bool {
        loop {
            match self.step(key, value) {
                ParseStep::Message => {
                    debug!(key = key.as_str(), value = value.as_str(), "received message");
                    return true;
                }
                ParseStep::EndOfStream => return false,
                ParseStep::Skipped(_) | ParseStep::Malformed { .. } => {}
            }
        }
    }

    /// Consumes tokens until something worth reporting happens.
    ///
    /// Unlike [`parse_kv`](Self::parse_kv), this lets the caller tell noise
    /// apart from a message that started and then broke.
    pub fn step(&mut self, key: &mut FieldBuffer, value: &mut FieldBuffer) -> ParseStep {
        let token = match self.pending.take() {
            Some(token) => token,
            None => self.tokenizer.next_token(None),
        };

        match token {
            Token::EndOfStream => ParseStep::EndOfStream,
            Token::Open => match self.match_body(key, value) {
                Ok(()) => ParseStep::Message,
                Err(found) => {
                    debug!(?found, "abandoning partial message");
                    key.clear();
                    value.clear();
                    if matches!(found, Token::Open | Token::EndOfStream) {
                        self.pending = Some(found);
                    }
                    ParseStep::Malformed { found }
                }
            },
            other => {
                trace!(token = ?other, "skipping token outside message");
                ParseStep::Skipped(other)
            }
        }
    }

    /// Matches `<string> <semicolon> <string> <close>` after an `<open>`.
    fn match_body(&mut self, key: &mut FieldBuffer, value: &mut FieldBuffer) -> Result<(), Token> {
        key.clear();
        value.clear();
        expect(self.tokenizer.next_token(Some(key)), is_string)?;
        expect(self.tokenizer.next_token(None), |t| t == Token::Semicolon)?;
        expect(self.tokenizer.next_token(Some(value)), is_string)?;
        expect(self.tokenizer.next_token(None), |t| t == Token::Close)
    }
}

fn expect(token: Token, accept: impl Fn(Token) -> bool) -> Result<(), Token> {
    if accept(token) {
        Ok(())
    } else {
        Err(token)
    }
}

fn is_string(token: Token) -> bool {
    matches!(token, Token::String { .. })
}

/// Decodes the first message found in `text`.
///
/// # Examples
///
/// ```rust
/// use kv_core::decode_message;
///
/// let pair = decode_message("boot log\r\n{{__sync;0}}\r\n").unwrap();
/// assert_eq!(pair.key, "__sync");
/// assert_eq!(pair.value, "0");
/// ```
pub fn decode_message(text: &str) -> Option<KvPair> {
    KvParser::new(text.as_bytes()).next_message()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
