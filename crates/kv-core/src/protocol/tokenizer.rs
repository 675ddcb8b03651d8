//! Character-level tokenizer for the KV protocol.
//!
//! Grammar, in order of precedence:
//! ```text
//! whitespace ::= [ \t\n\v\f\r]          (skipped before every token)
//! string     ::= [a-zA-Z0-9 \t\n\v\f\r_\-!@#$%^&*()=+:<>,./?\\"']+
//! semicolon  ::= ";"
//! open       ::= "{{"
//! close      ::= "}}" <any one character, discarded>
//! eof        ::= end of the character source
//! raw        ::= any other single character
//! ```
//!
//! An unpaired `{` or `}` comes back as [`Token::Raw`]; the character after it
//! stays in the lookahead and starts the next token.

use crate::io::CharSource;
use crate::protocol::field::FieldBuffer;

/// Punctuation allowed inside a string token.  `;`, `{` and `}` are framing.
const STRING_PUNCTUATION: &[u8] = b"_-!@#$%^&*()=+:<>,./?\\\"'";

/// One token recognized in the character stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// The source is exhausted.  Returned again on every later call.
    EndOfStream,
    /// `{{`
    Open,
    /// `}}`
    Close,
    /// `;`
    Semicolon,
    /// A string run.  `len` counts every character of the run, including any
    /// that did not fit in the destination buffer.
    String { len: usize },
    /// Any character that is not part of the grammar above.
    Raw(u8),
}

/// What the tokenizer knows about the next character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookahead {
    /// Nothing buffered; the next peek reads from the source.
    Empty,
    Char(u8),
    /// The source reported end-of-stream; it is never read again.
    Exhausted,
}

/// Turns a [`CharSource`] into a stream of [`Token`]s.
///
/// The tokenizer holds one character of lookahead between calls, so a single
/// instance must be used per stream.
pub struct Tokenizer<S> {
    source: S,
    lookahead: Lookahead,
}

impl<S: CharSource> Tokenizer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            lookahead: Lookahead::Empty,
        }
    }

    /// Consumes the tokenizer, dropping any buffered lookahead character.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Reads the next token.
    ///
    /// When the token is a string, its characters are copied into `out`
    /// (cleared first) up to the buffer's capacity.  With `out == None` the
    /// run is consumed and discarded.
    pub fn next_token(&mut self, out: Option<&mut FieldBuffer>) -> Token {
        while self.peek().is_some_and(is_space) {
            self.bump();
        }

        let Some(c) = self.peek() else {
            return Token::EndOfStream;
        };

        if is_string_char(c) {
            return self.read_string(out);
        }

        self.bump();
        match c {
            b';' => Token::Semicolon,
            b'{' if self.peek() == Some(b'{') => {
                self.bump();
                Token::Open
            }
            b'}' if self.peek() == Some(b'}') => {
                self.bump();
                // The host terminates every message with a line feed.
                self.discard_one();
                Token::Close
            }
            other => Token::Raw(other),
        }
    }

    fn read_string(&mut self, mut out: Option<&mut FieldBuffer>) -> Token {
        if let Some(buf) = out.as_deref_mut() {
            buf.clear();
        }

        let mut len = 0;
        while let Some(c) = self.peek().filter(|&c| is_string_char(c)) {
            if let Some(buf) = out.as_deref_mut() {
                buf.push(c);
            }
            len += 1;
            self.bump();
        }
        Token::String { len }
    }

    fn peek(&mut self) -> Option<u8> {
        if self.lookahead == Lookahead::Empty {
            self.lookahead = match self.source.read_char() {
                Some(c) => Lookahead::Char(c),
                None => Lookahead::Exhausted,
            };
        }
        match self.lookahead {
            Lookahead::Char(c) => Some(c),
            _ => None,
        }
    }

    fn bump(&mut self) {
        if let Lookahead::Char(_) = self.lookahead {
            self.lookahead = Lookahead::Empty;
        }
    }

    /// Reads and drops one character straight from the source.
    fn discard_one(&mut self) {
        debug_assert_eq!(self.lookahead, Lookahead::Empty);
        if self.source.read_char().is_none() {
            self.lookahead = Lookahead::Exhausted;
        }
    }
}

/// C `isspace` in the "C" locale.
fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Characters that may appear in a key or value.
pub fn is_string_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || is_space(c) || STRING_PUNCTUATION.contains(&c)
}
