//! Character-stream capabilities consumed by the engine.
//!
//! The engine never owns a transport.  The embedding application implements
//! [`CharSource`] and [`CharSink`] over whatever carries the bytes (a UART, a
//! pseudo-terminal, a pair of files) and passes them in.
//!
//! Implementations for in-memory types are provided so that tests and tools
//! can drive the engine without any I/O:
//!
//! - `&[u8]` and `VecDeque<u8>` are sources that report end-of-stream once
//!   drained.
//! - `Vec<u8>` is a sink that records every character written.

use std::collections::VecDeque;

/// A blocking source of characters.
#[cfg_attr(test, mockall::automock)]
pub trait CharSource {
    /// Reads the next character, blocking until one is available.
    ///
    /// Returns `None` once the stream is exhausted.  After that, callers must
    /// not expect further characters.
    fn read_char(&mut self) -> Option<u8>;
}

/// A best-effort sink of characters.
///
/// Write failures are the implementation's concern (log them); they are never
/// reported back to the engine.
#[cfg_attr(test, mockall::automock)]
pub trait CharSink {
    /// Writes a single character.
    fn write_char(&mut self, c: u8);

    /// Writes every byte of `s`.
    fn write_str(&mut self, s: &str) {
        for b in s.bytes() {
            self.write_char(b);
        }
    }
}

impl<T: CharSource + ?Sized> CharSource for &mut T {
    fn read_char(&mut self) -> Option<u8> {
        (**self).read_char()
    }
}

impl<T: CharSource + ?Sized> CharSource for Box<T> {
    fn read_char(&mut self) -> Option<u8> {
        (**self).read_char()
    }
}

impl<T: CharSink + ?Sized> CharSink for &mut T {
    fn write_char(&mut self, c: u8) {
        (**self).write_char(c);
    }

    fn write_str(&mut self, s: &str) {
        (**self).write_str(s);
    }
}

impl<T: CharSink + ?Sized> CharSink for Box<T> {
    fn write_char(&mut self, c: u8) {
        (**self).write_char(c);
    }

    fn write_str(&mut self, s: &str) {
        (**self).write_str(s);
    }
}

impl CharSource for &[u8] {
    fn read_char(&mut self) -> Option<u8> {
        let (&first, rest) = self.split_first()?;
        *self = rest;
        Some(first)
    }
}

impl CharSource for VecDeque<u8> {
    fn read_char(&mut self) -> Option<u8> {
        self.pop_front()
    }
}

impl CharSink for Vec<u8> {
    fn write_char(&mut self, c: u8) {
        self.push(c);
    }

    fn write_str(&mut self, s: &str) {
        self.extend_from_slice(s.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_source_drains_then_reports_end_of_stream() {
        // Arrange
        let mut source: &[u8] = b"ab";

        // Act / Assert
        assert_eq!(source.read_char(), Some(b'a'));
        assert_eq!(source.read_char(), Some(b'b'));
        assert_eq!(source.read_char(), None);
        assert_eq!(source.read_char(), None);
    }

    #[test]
    fn test_vec_sink_records_chars_and_strings_in_order() {
        let mut sink = Vec::new();

        sink.write_char(b'{');
        sink.write_str("{k;v}}");

        assert_eq!(sink, b"{{k;v}}");
    }

    #[test]
    fn test_default_write_str_forwards_each_byte() {
        // Arrange – a sink that only implements write_char
        struct CharOnly(Vec<u8>);
        impl CharSink for CharOnly {
            fn write_char(&mut self, c: u8) {
                self.0.push(c);
            }
        }
        let mut sink = CharOnly(Vec::new());

        // Act
        sink.write_str("ok\r\n");

        // Assert
        assert_eq!(sink.0, b"ok\r\n");
    }

    #[test]
    fn test_boxed_source_delegates_to_inner() {
        let mut mock = MockCharSource::new();
        mock.expect_read_char().times(1).return_const(Some(b'x'));
        let mut boxed: Box<dyn CharSource> = Box::new(mock);

        assert_eq!(boxed.read_char(), Some(b'x'));
    }
}
