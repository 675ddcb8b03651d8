//! Standard input / standard output console.
//!
//! Use it when the host runner owns the process's stdio, for example when it
//! spawns the client on the far end of a pseudo-terminal.  Logging goes to
//! stderr, so nothing but protocol traffic and acknowledgments reach stdout.

use std::io;

use super::{Console, ReadSource, WriteSink};

/// Opens a console over this process's stdin and stdout.
///
/// `Stdin` is already buffered internally, so reading it one byte at a time
/// does not cost a system call per byte.
pub fn stdio_console() -> Console {
    Console::new(
        ReadSource::new(io::stdin(), "stdin"),
        WriteSink::new(io::stdout(), "stdout"),
    )
}
