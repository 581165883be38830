//! Interpreter output parsing
//!
//! Turns the stdout/stderr of one interpreter run into an ordered list of
//! [`Assertion`]s. Strategies are tried in a fixed order:
//!
//! 1. Structured mode: a JSON document in stdout. When it yields any
//!    entries they are the whole result; stderr is not consulted.
//! 2. Text mode: stdout line by line, indicator lines before log lines.
//! 3. Stderr errors, appended after the text-mode entries.
//! 4. A single synthetic verdict when nothing else matched.

mod indicators;
mod structured;
mod text;

pub use indicators::{Indicators, FAIL_INDICATORS, PASS_INDICATORS};

use tracing::debug;

use crate::types::Assertion;

/// Parser for interpreter output
#[derive(Debug, Clone, Default)]
pub struct OutputParser {
    indicators: Indicators,
}

impl OutputParser {
    /// Create a parser with the default indicator tokens
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom indicator tokens
    pub fn with_indicators(indicators: Indicators) -> Self {
        Self { indicators }
    }

    pub fn indicators(&self) -> &Indicators {
        &self.indicators
    }

    /// Parse one run's output. Never fails; unrecognized input yields fewer
    /// (possibly zero) assertions.
    pub fn parse(&self, output: &str, errors: &str) -> Vec<Assertion> {
        if let Some(assertions) = structured::parse_structured(output) {
            if !assertions.is_empty() {
                debug!(count = assertions.len(), "using structured output");
                return assertions;
            }
        }

        let mut assertions = text::parse_text(output, &self.indicators);
        if !errors.is_empty() {
            assertions.extend(text::parse_errors(errors));
        }

        if assertions.is_empty() {
            assertions.extend(text::parse_generic(output, &self.indicators));
        }

        debug!(count = assertions.len(), "parsed text output");
        assertions
    }
}
