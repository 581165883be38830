//! Run-level aggregation

use std::time::Duration;

use serde::Serialize;

use crate::types::{Assertion, AssertionKind, AssertionSummary, FileResult};

/// Totals over a set of executed test files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Files executed
    pub total: usize,
    /// Files that passed
    pub passed: usize,
    /// Files that failed
    pub failed: usize,
    /// Sum of per-file durations
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub total_duration: Duration,
}

impl RunSummary {
    /// Whether every file passed
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Fold file results into run totals
pub fn summarize(results: &[FileResult]) -> RunSummary {
    let total = results.len();
    let passed = results.iter().filter(|r| r.success()).count();

    RunSummary {
        total,
        passed,
        failed: total - passed,
        total_duration: results.iter().map(FileResult::duration).sum(),
    }
}

/// Count passed and failed entries of kind `assert`, ignoring everything else
pub fn assertion_summary(assertions: &[Assertion]) -> AssertionSummary {
    assertions
        .iter()
        .filter(|a| a.kind() == AssertionKind::Assert)
        .fold(AssertionSummary::default(), |mut acc, a| {
            if a.passed() {
                acc.passed += 1;
            } else {
                acc.failed += 1;
            }
            acc
        })
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}
