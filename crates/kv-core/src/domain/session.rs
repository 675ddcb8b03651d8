//! Handshake and test-lifecycle state machine.
//!
//! # Lifecycle
//!
//! ```text
//!  Idle ──setup()──▶ AwaitingSync ──{{__sync;id}}──▶ Synchronized
//!                                                        │ __version, __timeout,
//!                                                        ▼ __host_test_name
//!  Completed ◀──suite_result()── Running ◀───────────────┘
//!                                  │ ▲
//!                                  └─┘ testcase_start / testcase_finish
//! ```
//!
//! The host sends `{{__sync;<uuid>}}` and waits for the device to echo it.
//! Until that message arrives the device answers every message it parses with
//! the [`SYNC_ACK`] pattern, which older host runners look for.  After the
//! echo the device announces its client version, the suite timeout, and the
//! name of the host-side test script, strictly in that order: the host loads
//! the script only once it has seen all three.
//!
//! # Blocking
//!
//! [`Session::setup`] is the only call that waits on the host.  There is no
//! internal timeout; a watchdog or a board reset is the recovery path when
//! no host ever connects.

use std::fmt::Write as _;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::io::{CharSink, CharSource};
use crate::protocol::codec::KvWriter;
use crate::protocol::field::FieldBuffer;
use crate::protocol::keys::{
    ReservedKey, ReservedValue, CLIENT_VERSION, HANDSHAKE_KEY_LENGTH, SYNC_ACK, SYNC_ID_LENGTH,
};
use crate::protocol::parser::{KvPair, KvParser};

/// Errors returned by [`Session::setup`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The character source ended before the host sent `__sync`.
    #[error("character stream ended before the host sent __sync")]
    EndOfStream,

    /// `setup` was called on a session that already left `Idle`.
    #[error("handshake already performed (session is {0:?})")]
    AlreadyStarted(SessionState),
}

/// Where a session is in the suite lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    AwaitingSync,
    Synchronized,
    Running,
    Completed,
}

/// Verdict reported by [`Session::suite_result`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuiteOutcome {
    Success,
    Failure,
}

impl SuiteOutcome {
    fn reserved_value(self) -> ReservedValue {
        match self {
            SuiteOutcome::Success => ReservedValue::Success,
            SuiteOutcome::Failure => ReservedValue::Failure,
        }
    }
}

impl From<bool> for SuiteOutcome {
    fn from(passed: bool) -> Self {
        if passed {
            SuiteOutcome::Success
        } else {
            SuiteOutcome::Failure
        }
    }
}

/// Nonzero means success, zero means failure.
impl From<i32> for SuiteOutcome {
    fn from(result: i32) -> Self {
        SuiteOutcome::from(result != 0)
    }
}

/// One test suite's conversation with the host.
pub struct Session<S, W> {
    parser: KvParser<S>,
    writer: KvWriter<W>,
    state: SessionState,
    timeout_secs: u32,
    host_test_name: String,
    sync_id: String,
}

impl<S: CharSource, W: CharSink> Session<S, W> {
    /// Creates an idle session over the given character stream.
    pub fn new(source: S, sink: W) -> Self {
        Self {
            parser: KvParser::new(source),
            writer: KvWriter::new(sink),
            state: SessionState::Idle,
            timeout_secs: 0,
            host_test_name: String::new(),
            sync_id: String::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn timeout_secs(&self) -> u32 {
        self.timeout_secs
    }

    pub fn host_test_name(&self) -> &str {
        &self.host_test_name
    }

    /// The identifier the host sent in `__sync`; empty before the handshake.
    pub fn synchronization_id(&self) -> &str {
        &self.sync_id
    }

    pub fn protocol_version(&self) -> &'static str {
        CLIENT_VERSION
    }

    /// Performs the handshake and announces `timeout_secs` and
    /// `host_test_name` to the host.
    ///
    /// Blocks until the host sends `__sync`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EndOfStream`] if the source is exhausted first,
    /// and [`SessionError::AlreadyStarted`] when called outside `Idle`.
    pub fn setup(&mut self, timeout_secs: u32, host_test_name: &str) -> Result<(), SessionError> {
        self.setup_with_sync_capacity(timeout_secs, host_test_name, SYNC_ID_LENGTH)
            .map(|_| ())
    }

    /// Same as [`setup`](Self::setup), but keeps the sync identifier in a
    /// buffer of `capacity` slots (terminator included) and returns it.
    ///
    /// # Errors
    ///
    /// See [`setup`](Self::setup).
    pub fn setup_with_sync_capacity(
        &mut self,
        timeout_secs: u32,
        host_test_name: &str,
        capacity: usize,
    ) -> Result<&str, SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyStarted(self.state));
        }

        self.timeout_secs = timeout_secs;
        self.host_test_name = host_test_name.to_string();
        self.transition(SessionState::AwaitingSync);

        let mut key = FieldBuffer::new(HANDSHAKE_KEY_LENGTH);
        let mut sync_id = FieldBuffer::new(capacity);
        loop {
            if !self.parser.parse_kv(&mut key, &mut sync_id) {
                warn!("character stream ended while awaiting sync");
                self.transition(SessionState::Idle);
                return Err(SessionError::EndOfStream);
            }
            self.writer.write_raw(SYNC_ACK);
            if key == ReservedKey::Sync.as_str() {
                break;
            }
            debug!(key = key.as_str(), "ignoring message while awaiting sync");
        }

        self.writer.send_str(ReservedKey::Sync.as_str(), sync_id.as_str());
        self.sync_id = sync_id.into_string();
        self.transition(SessionState::Synchronized);

        self.writer.send_str(ReservedKey::Version.as_str(), CLIENT_VERSION);
        self.writer
            .send_int(ReservedKey::Timeout.as_str(), i64::from(timeout_secs));
        self.writer
            .send_str(ReservedKey::HostTestName.as_str(), host_test_name);
        self.transition(SessionState::Running);

        info!(
            sync_id = %self.sync_id,
            timeout_secs,
            host_test_name,
            "handshake complete"
        );
        Ok(&self.sync_id)
    }

    /// Tells the host how many test cases the suite will run.
    pub fn testcase_count(&mut self, count: usize) {
        self.expect_running("testcase_count");
        self.writer
            .send_int(ReservedKey::TestcaseCount.as_str(), saturating_i64(count));
    }

    /// Legacy single-notification form used by older host runners.
    pub fn testcase_name(&mut self, name: &str) {
        self.expect_running("testcase_name");
        self.writer.send_str(ReservedKey::TestcaseName.as_str(), name);
    }

    /// `{{__testcase_start;<name>}}`
    pub fn testcase_start(&mut self, name: &str) {
        self.expect_running("testcase_start");
        self.writer.send_str(ReservedKey::TestcaseStart.as_str(), name);
    }

    /// `{{__testcase_finish;<name>;<passes>;<failures>}}`
    pub fn testcase_finish(&mut self, name: &str, passes: usize, failures: usize) {
        self.expect_running("testcase_finish");
        self.writer.send_str_int_int(
            ReservedKey::TestcaseFinish.as_str(),
            name,
            saturating_i64(passes),
            saturating_i64(failures),
        );
    }

    /// `{{__testcase_summary;<passes>;<failures>}}` for the whole suite.
    pub fn testcase_summary(&mut self, passes: usize, failures: usize) {
        self.expect_running("testcase_summary");
        self.writer.send_int_int(
            ReservedKey::TestcaseSummary.as_str(),
            saturating_i64(passes),
            saturating_i64(failures),
        );
    }

    /// Streams a code coverage dump for `path` to the host.
    ///
    /// The payload goes out as upper-case hex pairs inside an open
    /// `{{__coverage_start;<path>;` ... `}}` frame.
    pub fn report_coverage(&mut self, path: &str, payload: &[u8]) {
        self.writer
            .write_raw(&format!("{{{{{};{path};", ReservedKey::CoverageStart));
        let mut hex = String::with_capacity(payload.len() * 2);
        for b in payload {
            // Writing into a String cannot fail.
            let _ = write!(hex, "{b:02X}");
        }
        self.writer.write_raw(&hex);
        self.writer.write_raw("}}\n");
        debug!(path, bytes = payload.len(), "coverage dump sent");
    }

    /// Reports the suite verdict and ends the session.
    ///
    /// Sends `{{end;success}}` or `{{end;failure}}`, then `{{__exit;0}}`.  A
    /// host that never sees `__exit` treats the suite as timed out.
    pub fn suite_result(&mut self, result: impl Into<SuiteOutcome>) {
        let outcome = result.into();
        self.expect_running("suite_result");
        self.writer
            .send_str(ReservedKey::End.as_str(), outcome.reserved_value().as_str());
        self.writer.send_int(ReservedKey::Exit.as_str(), 0);
        self.transition(SessionState::Completed);
        info!(?outcome, "suite complete");
    }

    // ── Application passthrough ──────────────────────────────────────────────

    /// Writer for application-defined messages.
    pub fn writer(&mut self) -> &mut KvWriter<W> {
        &mut self.writer
    }

    /// Blocks until the host sends the next message; see [`KvParser::parse_kv`].
    pub fn parse_kv(&mut self, key: &mut FieldBuffer, value: &mut FieldBuffer) -> bool {
        self.parser.parse_kv(key, value)
    }

    /// Blocks until the host sends the next message; `None` once the stream ends.
    pub fn next_message(&mut self) -> Option<KvPair> {
        self.parser.next_message()
    }

    /// Releases the character source and sink.
    pub fn into_parts(self) -> (S, W) {
        (self.parser.into_inner(), self.writer.into_inner())
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "session state change");
        self.state = next;
    }

    fn expect_running(&self, operation: &str) {
        if self.state != SessionState::Running {
            warn!(operation, state = ?self.state, "lifecycle call outside a running suite");
        }
    }
}

fn saturating_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
