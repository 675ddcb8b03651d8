//! GreetingExchange: the smallest useful conversation with a host test.
//!
//! The device sends `{{device_greetings;Hello from the device!}}` and waits
//! for the host script to answer with a `device_greetings` message of its own.

use kv_core::{CharSink, CharSource, Session};
use tracing::{info, warn};

use super::run_suite::{CaseReport, TestCase};

/// Key used in both directions of the exchange.
pub const GREETING_KEY: &str = "device_greetings";

/// Value sent by the device.
pub const DEVICE_GREETING: &str = "Hello from the device!";

/// Sends a greeting and passes once the host greets back.
#[derive(Debug, Clone, Default)]
pub struct GreetingExchange {
    /// The value the host answered with, once the case has run.
    pub host_reply: Option<String>,
}

impl GreetingExchange {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: CharSource, W: CharSink> TestCase<S, W> for GreetingExchange {
    fn name(&self) -> &str {
        "greeting exchange"
    }

    fn run(&mut self, session: &mut Session<S, W>) -> CaseReport {
        session.writer().send_str(GREETING_KEY, DEVICE_GREETING);

        let Some(reply) = session.next_message() else {
            warn!("host closed the stream before greeting back");
            return CaseReport::failed();
        };

        let passed = reply.key == GREETING_KEY;
        if passed {
            info!(greeting = %reply.value, "host greeted back");
        } else {
            warn!(key = %reply.key, "unexpected reply to greeting");
        }
        self.host_reply = Some(reply.value);
        CaseReport::from(passed)
    }
}
