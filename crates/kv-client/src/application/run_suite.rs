//! RunSuiteUseCase: runs test cases and reports their results to the host.
//!
//! The session must already be synchronized (see [`Session::setup`]); this use
//! case only produces the lifecycle messages that follow the handshake:
//!
//! ```text
//! {{__testcase_count;N}}
//! {{__testcase_start;<name>}}            ┐
//! {{__testcase_finish;<name>;<p>;<f>}}   ┘ once per case
//! {{__testcase_summary;<p>;<f>}}
//! {{end;success|failure}}
//! {{__exit;0}}
//! ```

use kv_core::{CharSink, CharSource, Session};
use tracing::{info, warn};

/// Pass and failure counters produced by one test case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseReport {
    pub passes: usize,
    pub failures: usize,
}

impl CaseReport {
    pub fn passed() -> Self {
        Self {
            passes: 1,
            failures: 0,
        }
    }

    pub fn failed() -> Self {
        Self {
            passes: 0,
            failures: 1,
        }
    }
}

impl From<bool> for CaseReport {
    fn from(passed: bool) -> Self {
        if passed {
            Self::passed()
        } else {
            Self::failed()
        }
    }
}

/// Totals for a whole suite run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub cases: usize,
    pub passes: usize,
    pub failures: usize,
}

impl SuiteReport {
    /// A suite succeeds when no case reported a failure.
    pub fn is_success(&self) -> bool {
        self.failures == 0
    }

    fn add(&mut self, case: CaseReport) {
        self.cases += 1;
        self.passes += case.passes;
        self.failures += case.failures;
    }
}

/// One named unit of work in a suite.
///
/// A case may exchange its own messages with the host through the session it
/// is handed; the runner sends the start/finish notifications around it.
pub trait TestCase<S, W> {
    fn name(&self) -> &str;

    fn run(&mut self, session: &mut Session<S, W>) -> CaseReport;
}

/// The Run Suite use case.
pub struct RunSuiteUseCase<S, W> {
    cases: Vec<Box<dyn TestCase<S, W>>>,
}

impl<S: CharSource, W: CharSink> Default for RunSuiteUseCase<S, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CharSource, W: CharSink> RunSuiteUseCase<S, W> {
    pub fn new() -> Self {
        Self { cases: Vec::new() }
    }

    /// Appends a case; cases run in the order they were added.
    pub fn add_case(&mut self, case: Box<dyn TestCase<S, W>>) -> &mut Self {
        self.cases.push(case);
        self
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Runs every case and ends the session with the suite verdict.
    pub fn run(&mut self, session: &mut Session<S, W>) -> SuiteReport {
        let mut report = SuiteReport::default();
        session.testcase_count(self.cases.len());

        for case in &mut self.cases {
            let name = case.name().to_string();
            session.testcase_start(&name);
            let result = case.run(session);
            session.testcase_finish(&name, result.passes, result.failures);

            if result.failures == 0 {
                info!(case = %name, passes = result.passes, "test case passed");
            } else {
                warn!(case = %name, failures = result.failures, "test case failed");
            }
            report.add(result);
        }

        session.testcase_summary(report.passes, report.failures);
        session.suite_result(report.is_success());
        report
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
