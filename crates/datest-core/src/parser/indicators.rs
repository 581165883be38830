//! Pass/fail indicator tokens

/// Substrings that mark a line as passing
pub const PASS_INDICATORS: &[&str] = &["✅", "passed", "success", "ok", "PASS"];

/// Substrings that mark a line as failing
pub const FAIL_INDICATORS: &[&str] = &["❌", "failed", "failure", "error", "FAIL", "AssertionError"];

/// Indicator token sets used to infer status from unstructured output.
///
/// Matching is case-sensitive plain substring search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicators {
    /// Pass tokens
    pub pass: Vec<String>,
    /// Fail tokens
    pub fail: Vec<String>,
}

impl Indicators {
    /// Create indicator sets from custom token lists
    pub fn new<P, F>(pass: P, fail: F) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            pass: pass.into_iter().map(Into::into).collect(),
            fail: fail.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `text` contains any pass token
    pub fn has_pass(&self, text: &str) -> bool {
        self.pass.iter().any(|token| text.contains(token.as_str()))
    }

    /// Whether `text` contains any fail token
    pub fn has_fail(&self, text: &str) -> bool {
        self.fail.iter().any(|token| text.contains(token.as_str()))
    }
}

impl Default for Indicators {
    fn default() -> Self {
        Self::new(PASS_INDICATORS.iter().copied(), FAIL_INDICATORS.iter().copied())
    }
}
