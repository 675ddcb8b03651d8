//! Reserved protocol keys, values, and constants.
//!
//! Encoder, parser, and session all refer to this table instead of
//! scattering string literals.

use std::fmt;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Version string reported to the host in the `__version` message.
pub const CLIENT_VERSION: &str = "1.3.0";

/// Capacity of the buffer that receives the sync identifier during the
/// handshake (including the terminator slot).
pub const SYNC_ID_LENGTH: usize = 48;

/// Capacity of the buffer that receives message keys during the handshake.
///
/// Seven usable characters are enough for `__sync`; longer keys are
/// truncated and therefore never mistaken for it.
pub const HANDSHAKE_KEY_LENGTH: usize = 8;

/// Acknowledgment written after every message received while awaiting sync.
///
/// Older host runners look for this pattern before they start the handshake.
pub const SYNC_ACK: &str = "mbedmbedmbedmbedmbedmbedmbedmbed\r\n";

/// Characters that open and close a message and separate its fields.
pub const FRAMING_CHARS: [char; 3] = ['{', '}', ';'];

// ── Reserved keys ─────────────────────────────────────────────────────────────

/// Message keys with a fixed meaning for the host runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedKey {
    /// Handshake request from the host, echoed back by the device.
    Sync,
    /// Suite timeout in seconds.
    Timeout,
    /// Name of the host-side test script to load.
    HostTestName,
    /// Device protocol client version.
    Version,
    /// Final message of a suite; carries `0`.
    Exit,
    /// Suite verdict; carries [`ReservedValue::Success`] or [`ReservedValue::Failure`].
    End,
    /// Legacy test case name notification.
    TestcaseName,
    /// Number of test cases in the suite.
    TestcaseCount,
    /// A test case started.
    TestcaseStart,
    /// A test case finished, with pass and failure counters.
    TestcaseFinish,
    /// Totals for the whole suite.
    TestcaseSummary,
    /// Start of a code coverage payload dump.
    CoverageStart,
}

impl ReservedKey {
    /// Every reserved key, in declaration order.
    pub const ALL: [ReservedKey; 12] = [
        ReservedKey::Sync,
        ReservedKey::Timeout,
        ReservedKey::HostTestName,
        ReservedKey::Version,
        ReservedKey::Exit,
        ReservedKey::End,
        ReservedKey::TestcaseName,
        ReservedKey::TestcaseCount,
        ReservedKey::TestcaseStart,
        ReservedKey::TestcaseFinish,
        ReservedKey::TestcaseSummary,
        ReservedKey::CoverageStart,
    ];

    /// The wire spelling of this key.
    pub const fn as_str(self) -> &'static str {
        match self {
            ReservedKey::Sync => "__sync",
            ReservedKey::Timeout => "__timeout",
            ReservedKey::HostTestName => "__host_test_name",
            ReservedKey::Version => "__version",
            ReservedKey::Exit => "__exit",
            ReservedKey::End => "end",
            ReservedKey::TestcaseName => "__testcase_name",
            ReservedKey::TestcaseCount => "__testcase_count",
            ReservedKey::TestcaseStart => "__testcase_start",
            ReservedKey::TestcaseFinish => "__testcase_finish",
            ReservedKey::TestcaseSummary => "__testcase_summary",
            ReservedKey::CoverageStart => "__coverage_start",
        }
    }
}

impl TryFrom<&str> for ReservedKey {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ReservedKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or(())
    }
}

impl fmt::Display for ReservedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Reserved values ───────────────────────────────────────────────────────────

/// Values with a fixed meaning, carried by the `end` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedValue {
    Success,
    Failure,
}

impl ReservedValue {
    /// The wire spelling of this value.
    pub const fn as_str(self) -> &'static str {
        match self {
            ReservedValue::Success => "success",
            ReservedValue::Failure => "failure",
        }
    }
}

impl TryFrom<&str> for ReservedValue {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "success" => Ok(ReservedValue::Success),
            "failure" => Ok(ReservedValue::Failure),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ReservedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_reserved_key_parses_back_from_its_wire_spelling() {
        for key in ReservedKey::ALL {
            assert_eq!(ReservedKey::try_from(key.as_str()), Ok(key));
        }
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert_eq!(ReservedKey::try_from("__syncx"), Err(()));
        assert_eq!(ReservedKey::try_from("device_greetings"), Err(()));
    }

    #[test]
    fn test_reserved_keys_never_contain_framing_chars() {
        for key in ReservedKey::ALL {
            assert!(!key.as_str().contains(FRAMING_CHARS), "{key} contains framing");
        }
    }

    #[test]
    fn test_sync_key_fits_the_handshake_key_buffer() {
        assert!(ReservedKey::Sync.as_str().len() < HANDSHAKE_KEY_LENGTH);
    }

    #[test]
    fn test_reserved_values_round_trip() {
        assert_eq!(ReservedValue::try_from("success"), Ok(ReservedValue::Success));
        assert_eq!(ReservedValue::try_from("failure"), Ok(ReservedValue::Failure));
        assert_eq!(ReservedValue::Failure.to_string(), "failure");
    }
}
