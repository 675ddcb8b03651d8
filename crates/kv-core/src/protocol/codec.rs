//! Text codec for outgoing KV protocol messages.
//!
//! Wire format:
//! ```text
//! {{<key>;<field2>[;<field3>[;<field4>]]}}\r\n
//! ```
//! Integers are rendered in base 10 with a leading `-` for negatives.
//! Decoding lives in [`crate::protocol::parser`].

use std::fmt;

use tracing::{debug, warn};

use crate::io::CharSink;
use crate::protocol::keys::FRAMING_CHARS;

/// The payload fields that follow a key, one variant per supported arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// `{{key;text}}`
    Text(&'a str),
    /// `{{key;int}}`
    Int(i64),
    /// `{{key;text;int}}`
    TextInt(&'a str, i64),
    /// `{{key;text;int;int}}`
    TextIntInt(&'a str, i64, i64),
    /// `{{key;int;int}}`
    IntInt(i64, i64),
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(value: &'a str) -> Self {
        Payload::Text(value)
    }
}

impl From<i64> for Payload<'_> {
    fn from(value: i64) -> Self {
        Payload::Int(value)
    }
}

impl<'a> From<(&'a str, i64)> for Payload<'a> {
    fn from((text, n): (&'a str, i64)) -> Self {
        Payload::TextInt(text, n)
    }
}

impl<'a> From<(&'a str, i64, i64)> for Payload<'a> {
    fn from((text, a, b): (&'a str, i64, i64)) -> Self {
        Payload::TextIntInt(text, a, b)
    }
}

impl From<(i64, i64)> for Payload<'_> {
    fn from((a, b): (i64, i64)) -> Self {
        Payload::IntInt(a, b)
    }
}

impl fmt::Display for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(text) => f.write_str(text),
            Payload::Int(n) => write!(f, "{n}"),
            Payload::TextInt(text, n) => write!(f, "{text};{n}"),
            Payload::TextIntInt(text, a, b) => write!(f, "{text};{a};{b}"),
            Payload::IntInt(a, b) => write!(f, "{a};{b}"),
        }
    }
}

/// An outgoing message: a key plus one to three payload fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KvMessage<'a> {
    pub key: &'a str,
    pub payload: Payload<'a>,
}

impl<'a> KvMessage<'a> {
    pub fn new(key: &'a str, payload: impl Into<Payload<'a>>) -> Self {
        Self {
            key,
            payload: payload.into(),
        }
    }

    /// `true` when the key can be framed: it must not contain `{`, `}` or `;`.
    pub fn has_valid_key(&self) -> bool {
        !self.key.contains(FRAMING_CHARS)
    }
}

impl fmt::Display for KvMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{};{}}}}}\r\n", self.key, self.payload)
    }
}

/// Renders `msg` in wire form, including the trailing `\r\n`.
///
/// # Examples
///
/// ```rust
/// use kv_core::{encode_message, KvMessage};
///
/// let msg = KvMessage::new("hello", ("hey", 99_i64));
/// assert_eq!(encode_message(&msg), "{{hello;hey;99}}\r\n");
/// ```
pub fn encode_message(msg: &KvMessage<'_>) -> String {
    msg.to_string()
}

// ── Writer ────────────────────────────────────────────────────────────────────

/// Serializes messages onto a [`CharSink`].
///
/// Every `send_*` method takes its key as `impl Into<Option<&str>>`: passing
/// `None` suppresses the whole send without output or error.  [`send_str`]
/// applies the same guard to its value.
///
/// [`send_str`]: KvWriter::send_str
pub struct KvWriter<W> {
    sink: W,
}

impl<W: CharSink> KvWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Writes `msg` in wire form.
    ///
    /// A key containing framing characters cannot be decoded by the host, so
    /// such a message is dropped with a warning.
    pub fn send(&mut self, msg: &KvMessage<'_>) {
        if !msg.has_valid_key() {
            warn!(key = msg.key, "dropping message whose key contains framing characters");
            return;
        }
        debug!(key = msg.key, payload = %msg.payload, "sending message");
        self.sink.write_str(&encode_message(msg));
    }

    /// `{{key;value}}`; suppressed when either `key` or `value` is `None`.
    pub fn send_str<'a>(
        &mut self,
        key: impl Into<Option<&'a str>>,
        value: impl Into<Option<&'a str>>,
    ) {
        if let (Some(key), Some(value)) = (key.into(), value.into()) {
            self.send(&KvMessage::new(key, Payload::Text(value)));
        }
    }

    /// `{{key;value}}` with an integer value.
    pub fn send_int<'a>(&mut self, key: impl Into<Option<&'a str>>, value: i64) {
        self.send_payload(key.into(), Payload::Int(value));
    }

    /// `{{key;value;result}}`
    pub fn send_str_int<'a>(&mut self, key: impl Into<Option<&'a str>>, value: &str, result: i64) {
        self.send_payload(key.into(), Payload::TextInt(value, result));
    }

    /// `{{key;value;passes;failures}}`
    pub fn send_str_int_int<'a>(
        &mut self,
        key: impl Into<Option<&'a str>>,
        value: &str,
        passes: i64,
        failures: i64,
    ) {
        self.send_payload(key.into(), Payload::TextIntInt(value, passes, failures));
    }

    /// `{{key;passes;failures}}`
    pub fn send_int_int<'a>(&mut self, key: impl Into<Option<&'a str>>, passes: i64, failures: i64) {
        self.send_payload(key.into(), Payload::IntInt(passes, failures));
    }

    /// Writes `text` verbatim, outside any message framing.
    pub fn write_raw(&mut self, text: &str) {
        self.sink.write_str(text);
    }

    fn send_payload(&mut self, key: Option<&str>, payload: Payload<'_>) {
        if let Some(key) = key {
            self.send(&KvMessage { key, payload });
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MockCharSink;

    fn written(f: impl FnOnce(&mut KvWriter<Vec<u8>>)) -> String {
        let mut writer = KvWriter::new(Vec::new());
        f(&mut writer);
        String::from_utf8(writer.into_inner()).expect("ascii output")
    }

    #[test]
    fn test_send_string_value() {
        assert_eq!(written(|w| w.send_str("hello", "99")), "{{hello;99}}\r\n");
    }

    #[test]
    fn test_send_int_value() {
        assert_eq!(written(|w| w.send_int("hello", 99)), "{{hello;99}}\r\n");
    }

    #[test]
    fn test_send_pass_fail_counts() {
        assert_eq!(written(|w| w.send_int_int("hello", 99, 19)), "{{hello;99;19}}\r\n");
    }

    #[test]
    fn test_send_string_value_and_result() {
        assert_eq!(written(|w| w.send_str_int("hello", "hey", 99)), "{{hello;hey;99}}\r\n");
    }

    #[test]
    fn test_send_string_value_and_pass_fail_counts() {
        assert_eq!(
            written(|w| w.send_str_int_int("hello", "hey", 1, 99)),
            "{{hello;hey;1;99}}\r\n"
        );
    }

    #[test]
    fn test_negative_and_zero_integers() {
        assert_eq!(written(|w| w.send_int("n", -42)), "{{n;-42}}\r\n");
        assert_eq!(written(|w| w.send_int_int("n", 0, -7)), "{{n;0;-7}}\r\n");
    }

    #[test]
    fn test_absent_key_suppresses_every_arity() {
        // Arrange – any write at all fails the test
        let mut sink = MockCharSink::new();
        sink.expect_write_char().never();
        sink.expect_write_str().never();
        let mut writer = KvWriter::new(sink);

        // Act
        writer.send_str(None, "v");
        writer.send_int(None, 1);
        writer.send_str_int(None, "v", 1);
        writer.send_str_int_int(None, "v", 1, 2);
        writer.send_int_int(None, 1, 2);
    }

    #[test]
    fn test_absent_string_value_suppresses_send() {
        let mut sink = MockCharSink::new();
        sink.expect_write_str().never();
        sink.expect_write_char().never();
        let mut writer = KvWriter::new(sink);

        writer.send_str("key", None);
    }

    #[test]
    fn test_key_with_framing_characters_is_dropped() {
        assert_eq!(written(|w| w.send_str("a;b", "v")), "");
        assert_eq!(written(|w| w.send_int("{{", 1)), "");
    }

    #[test]
    fn test_write_raw_passes_text_through() {
        assert_eq!(written(|w| w.write_raw("plain\r\n")), "plain\r\n");
    }

    #[test]
    fn test_payload_conversions_pick_the_matching_arity() {
        assert_eq!(Payload::from("x"), Payload::Text("x"));
        assert_eq!(Payload::from(3_i64), Payload::Int(3));
        assert_eq!(Payload::from(("x", 3_i64)), Payload::TextInt("x", 3));
        assert_eq!(Payload::from(("x", 3_i64, 4_i64)), Payload::TextIntInt("x", 3, 4));
        assert_eq!(Payload::from((3_i64, 4_i64)), Payload::IntInt(3, 4));
    }

    #[test]
    fn test_encode_message_matches_writer_output() {
        let msg = KvMessage::new("__testcase_finish", ("case 1", 3_i64, 0_i64));
        let via_writer = written(|w| w.send(&msg));
        assert_eq!(encode_message(&msg), via_writer);
        assert_eq!(via_writer, "{{__testcase_finish;case 1;3;0}}\r\n");
    }
}
