//! Character consoles the engine can talk over.
//!
//! The backend is chosen at runtime from [`ConsoleConfig`]:
//!
//! | backend | reads from            | writes to              |
//! |---------|-----------------------|------------------------|
//! | `stdio` | standard input        | standard output        |
//! | `file`  | `console.input_path`  | `console.output_path`  |
//!
//! Both backends are built from the same two adapters, [`ReadSource`] and
//! [`WriteSink`], which wrap any `std::io` reader or writer.  I/O errors never
//! reach the engine: a failed read is logged and reported as end-of-stream, a
//! failed write is logged and dropped.

pub mod file;
pub mod mock;
pub mod stdio;

use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;

use kv_core::{CharSink, CharSource, Session};
use thiserror::Error;
use tracing::{debug, error};

use crate::application::run_suite::RunSuiteUseCase;
use crate::infrastructure::storage::config::{ConsoleBackend, ConsoleConfig};

pub type BoxedSource = Box<dyn CharSource>;
pub type BoxedSink = Box<dyn CharSink>;

/// A session over whichever console the configuration selected.
pub type ConsoleSession = Session<BoxedSource, BoxedSink>;

/// A suite runnable on a [`ConsoleSession`].
pub type ConsoleSuite = RunSuiteUseCase<BoxedSource, BoxedSink>;

/// Error type for opening a console.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The `file` backend was selected without the named path.
    #[error("console backend \"file\" requires `{0}`")]
    MissingPath(&'static str),

    /// A console file could not be opened.
    #[error("failed to open console file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An opened source/sink pair.
pub struct Console {
    pub source: BoxedSource,
    pub sink: BoxedSink,
}

impl Console {
    pub fn new(source: impl CharSource + 'static, sink: impl CharSink + 'static) -> Self {
        Self {
            source: Box::new(source),
            sink: Box::new(sink),
        }
    }

    /// Starts an idle session over this console.
    pub fn into_session(self) -> ConsoleSession {
        Session::new(self.source, self.sink)
    }
}

/// Opens the console described by `config`.
///
/// # Errors
///
/// Returns [`ConsoleError::MissingPath`] when the `file` backend lacks a path,
/// and [`ConsoleError::Open`] when a file cannot be opened.
pub fn open_console(config: &ConsoleConfig) -> Result<Console, ConsoleError> {
    match config.backend {
        ConsoleBackend::Stdio => Ok(stdio::stdio_console()),
        ConsoleBackend::File => {
            let input = config
                .input_path
                .as_deref()
                .ok_or(ConsoleError::MissingPath("console.input_path"))?;
            let output = config
                .output_path
                .as_deref()
                .ok_or(ConsoleError::MissingPath("console.output_path"))?;
            file::file_console(input, output)
        }
    }
}

// ── std::io adapters ──────────────────────────────────────────────────────────

/// Reads one byte at a time from any [`Read`] implementation.
///
/// Wrap unbuffered readers (files) in a `BufReader` first.
pub struct ReadSource<R> {
    reader: R,
    label: &'static str,
}

impl<R: Read> ReadSource<R> {
    /// `label` names the stream in log output.
    pub fn new(reader: R, label: &'static str) -> Self {
        Self { reader, label }
    }
}

impl<R: Read> CharSource for ReadSource<R> {
    fn read_char(&mut self) -> Option<u8> {
        let mut byte = [0_u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => {
                    debug!(console = self.label, "input reached end of stream");
                    return None;
                }
                Ok(_) => return Some(byte[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    error!(console = self.label, error = %e, "read failed, treating as end of stream");
                    return None;
                }
            }
        }
    }
}

/// Writes to any [`Write`] implementation, flushing after every call so the
/// host sees each message as soon as it is complete.
pub struct WriteSink<W> {
    writer: W,
    label: &'static str,
}

impl<W: Write> WriteSink<W> {
    /// `label` names the stream in log output.
    pub fn new(writer: W, label: &'static str) -> Self {
        Self { writer, label }
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let result = self
            .writer
            .write_all(bytes)
            .and_then(|()| self.writer.flush());
        if let Err(e) = result {
            error!(console = self.label, error = %e, "write failed, output dropped");
        }
    }
}

impl<W: Write> CharSink for WriteSink<W> {
    fn write_char(&mut self, c: u8) {
        self.write_bytes(&[c]);
    }

    fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// A reader that fails on every call.
    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::Other, "line dropped"))
        }
    }

    /// A writer that fails on every call.
    struct Full;

    impl Write for Full {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::Other, "no space"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_read_source_yields_bytes_then_end_of_stream() {
        let mut source = ReadSource::new(&b"ok"[..], "test");

        assert_eq!(source.read_char(), Some(b'o'));
        assert_eq!(source.read_char(), Some(b'k'));
        assert_eq!(source.read_char(), None);
    }

    #[test]
    fn test_read_error_is_reported_as_end_of_stream() {
        let mut source = ReadSource::new(Broken, "test");
        assert_eq!(source.read_char(), None);
    }

    #[test]
    fn test_write_sink_forwards_text() {
        let mut sink = WriteSink::new(Vec::new(), "test");

        sink.write_str("{{k;v}}\r\n");
        sink.write_char(b'!');

        assert_eq!(sink.writer, b"{{k;v}}\r\n!");
    }

    #[test]
    fn test_write_error_is_swallowed() {
        // Act – must not panic
        let mut sink = WriteSink::new(Full, "test");
        sink.write_str("{{k;v}}\r\n");
    }

    #[test]
    fn test_file_backend_without_input_path_is_rejected() {
        // Arrange
        let config = ConsoleConfig {
            backend: ConsoleBackend::File,
            input_path: None,
            output_path: Some(PathBuf::from("out.txt")),
        };

        // Act
        let result = open_console(&config);

        // Assert
        assert!(matches!(
            result,
            Err(ConsoleError::MissingPath("console.input_path"))
        ));
    }

    #[test]
    fn test_file_backend_without_output_path_is_rejected() {
        let config = ConsoleConfig {
            backend: ConsoleBackend::File,
            input_path: Some(PathBuf::from("in.txt")),
            output_path: None,
        };

        assert!(matches!(
            open_console(&config),
            Err(ConsoleError::MissingPath("console.output_path"))
        ));
    }
}
