//! Bounded destination buffer for string tokens.

use std::fmt;

/// A fixed-capacity text buffer that a string token is copied into.
///
/// A buffer of capacity `N` keeps at most `N - 1` characters; the final slot
/// is reserved for the terminator that fixed-size device buffers carry, so the
/// stored text plus terminator never exceeds `N`.  Characters beyond that are
/// dropped silently.  A capacity of `0` stores nothing at all.
///
/// # Examples
///
/// ```rust
/// use kv_core::FieldBuffer;
///
/// let mut key = FieldBuffer::new(4);
/// for c in b"__sync" {
///     key.push(*c);
/// }
/// assert_eq!(key.as_str(), "__s");
/// assert!(key.is_truncated());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBuffer {
    text: String,
    capacity: usize,
    truncated: bool,
}

impl FieldBuffer {
    /// Creates an empty buffer of `capacity` slots, terminator included.
    pub fn new(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity.saturating_sub(1)),
            capacity,
            truncated: false,
        }
    }

    /// Total number of slots, terminator included.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends one ASCII character, returning `false` if it did not fit.
    ///
    /// Non-ASCII bytes are refused and do not mark the buffer truncated; the
    /// tokenizer never produces them inside a string run.
    pub fn push(&mut self, c: u8) -> bool {
        if !c.is_ascii() {
            return false;
        }
        if self.text.len() + 1 < self.capacity {
            self.text.push(char::from(c));
            true
        } else {
            self.truncated = true;
            false
        }
    }

    /// Empties the buffer and clears the truncation flag.
    pub fn clear(&mut self) {
        self.text.clear();
        self.truncated = false;
    }

    /// Returns `true` if characters were dropped since the last [`clear`](Self::clear).
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl PartialEq<&str> for FieldBuffer {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl fmt::Display for FieldBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(buf: &mut FieldBuffer, text: &str) {
        for c in text.bytes() {
            buf.push(c);
        }
    }

    #[test]
    fn test_buffer_keeps_capacity_minus_one_characters() {
        // Arrange
        let mut buf = FieldBuffer::new(5);

        // Act
        fill(&mut buf, "abcdefgh");

        // Assert – four characters plus the terminator slot
        assert_eq!(buf, "abcd");
        assert!(buf.is_truncated());
    }

    #[test]
    fn test_buffer_that_fits_is_not_truncated() {
        let mut buf = FieldBuffer::new(5);
        fill(&mut buf, "abcd");
        assert_eq!(buf, "abcd");
        assert!(!buf.is_truncated());
    }

    #[test]
    fn test_zero_and_one_capacity_store_nothing() {
        for capacity in [0, 1] {
            let mut buf = FieldBuffer::new(capacity);
            assert!(!buf.push(b'x'));
            assert!(buf.is_empty());
        }
    }

    #[test]
    fn test_non_ascii_byte_is_refused() {
        // Arrange
        let mut buf = FieldBuffer::new(8);

        // Act
        let stored = buf.push(0xC3);
        buf.push(b'a');

        // Assert – length stays a character count
        assert!(!stored);
        assert_eq!(buf, "a");
        assert_eq!(buf.len(), 1);
        assert!(!buf.is_truncated());
    }

    #[test]
    fn test_clear_resets_text_and_truncation() {
        let mut buf = FieldBuffer::new(2);
        fill(&mut buf, "xyz");

        buf.clear();

        assert!(buf.is_empty());
        assert!(!buf.is_truncated());
        assert_eq!(buf.capacity(), 2);
    }
}
