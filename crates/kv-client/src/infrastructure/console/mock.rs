//! In-memory console for tests.
//!
//! # Why a mock console?
//!
//! The real consoles read from stdin or from files, which a unit test cannot
//! script or inspect comfortably.  `MockConsole` keeps the host's input and the
//! device's output in shared in-memory buffers: the test scripts what the host
//! "sends" up front, hands [`MockConsole::console`] to the code under test, and
//! afterwards reads back everything the device wrote.
//!
//! # Usage in tests
//!
//! ```
//! use kv_client::infrastructure::console::mock::MockConsole;
//!
//! let mock = MockConsole::new("{{__sync;1}}\n");
//! let mut session = mock.console().into_session();
//! session.setup(5, "demo").unwrap();
//!
//! assert!(mock.output_text().contains("{{__sync;1}}\r\n"));
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use kv_core::{CharSink, CharSource};

use super::Console;

/// Shared host-input and device-output buffers.
#[derive(Debug, Clone, Default)]
pub struct MockConsole {
    input: Arc<Mutex<VecDeque<u8>>>,
    output: Arc<Mutex<Vec<u8>>>,
}

impl MockConsole {
    /// Creates a console whose host side will send `host_script`.
    pub fn new(host_script: &str) -> Self {
        let mock = Self::default();
        mock.push_input(host_script);
        mock
    }

    /// Appends more host input; it is read after anything already queued.
    pub fn push_input(&self, text: &str) {
        lock(&self.input).extend(text.bytes());
    }

    /// A source/sink pair backed by this mock's buffers.
    pub fn console(&self) -> Console {
        Console::new(
            MockSource(Arc::clone(&self.input)),
            MockSink(Arc::clone(&self.output)),
        )
    }

    /// Everything the device wrote so far, lossily decoded.
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&lock(&self.output)).into_owned()
    }

    pub fn clear_output(&self) {
        lock(&self.output).clear();
    }
}

struct MockSource(Arc<Mutex<VecDeque<u8>>>);

impl CharSource for MockSource {
    fn read_char(&mut self) -> Option<u8> {
        lock(&self.0).pop_front()
    }
}

struct MockSink(Arc<Mutex<Vec<u8>>>);

impl CharSink for MockSink {
    fn write_char(&mut self, c: u8) {
        lock(&self.0).push(c);
    }

    fn write_str(&mut self, s: &str) {
        lock(&self.0).extend_from_slice(s.as_bytes());
    }
}

/// A test that panicked while holding the lock leaves the data usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_reads_script_and_records_output() {
        // Arrange
        let mock = MockConsole::new("hi");
        let mut console = mock.console();

        // Act
        let chars = [console.source.read_char(), console.source.read_char()];
        console.sink.write_str("ok");

        // Assert
        assert_eq!(chars, [Some(b'h'), Some(b'i')]);
        assert_eq!(console.source.read_char(), None);
        assert_eq!(mock.output_text(), "ok");
    }

    #[test]
    fn test_pushed_input_is_queued_after_script() {
        let mock = MockConsole::new("a");
        mock.push_input("b");
        let mut console = mock.console();

        assert_eq!(console.source.read_char(), Some(b'a'));
        assert_eq!(console.source.read_char(), Some(b'b'));
    }
}
