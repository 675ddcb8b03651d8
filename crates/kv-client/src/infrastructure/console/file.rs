//! File-backed console: host input is read from one file, device output is
//! written to another.
//!
//! Useful for replaying a recorded host session, or for driving the client
//! through a pair of named pipes.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use super::{Console, ConsoleError, ReadSource, WriteSink};

/// Opens `input` for reading and creates (or truncates) `output` for writing.
///
/// # Errors
///
/// Returns [`ConsoleError::Open`] naming whichever file could not be opened.
pub fn file_console(input: &Path, output: &Path) -> Result<Console, ConsoleError> {
    let reader = File::open(input).map_err(|source| ConsoleError::Open {
        path: input.to_path_buf(),
        source,
    })?;
    let writer = File::create(output).map_err(|source| ConsoleError::Open {
        path: output.to_path_buf(),
        source,
    })?;

    info!(input = %input.display(), output = %output.display(), "file console opened");
    Ok(Console::new(
        ReadSource::new(BufReader::new(reader), "input file"),
        WriteSink::new(writer, "output file"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kv_core::{CharSink, CharSource};

    #[test]
    fn test_file_console_reads_input_and_writes_output() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        std::fs::write(&input, "ab").expect("write input");

        // Act
        let mut console = file_console(&input, &output).expect("open");
        let first = console.source.read_char();
        console.sink.write_str("{{k;v}}\r\n");
        drop(console);

        // Assert
        assert_eq!(first, Some(b'a'));
        assert_eq!(std::fs::read_to_string(&output).expect("read output"), "{{k;v}}\r\n");
    }

    #[test]
    fn test_missing_input_file_is_an_open_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.txt");

        let result = file_console(&missing, &dir.path().join("out.txt"));

        match result {
            Err(ConsoleError::Open { path, .. }) => assert_eq!(path, missing),
            _ => panic!("expected an open error for the input file"),
        }
    }
}
