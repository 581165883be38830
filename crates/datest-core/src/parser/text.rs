//! Plain-text interpreter output

use regex::Regex;
use std::sync::LazyLock;

use super::Indicators;
use crate::types::Assertion;

/// Assertion echo: optional `Line N:`, `assert`/`assertion`, expression, result word
static ASSERT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Line\s+(\d+):\s*)?(assert(?:ion)?)\s+(.+?)\s*(?:failed|passed|==|!=)")
        .expect("Invalid regex")
});

/// Explicit line number anywhere in a line
static LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Line\s+(\d+)").expect("Invalid regex"));

/// Error report: optional `Line N:`, `Error` or `Exception`, message
static ERROR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Line\s+(\d+):\s*)?(Error|Exception):\s*(.+)").expect("Invalid regex")
});

/// Parse stdout line by line into `assert` and `log` entries.
///
/// Line numbers default to the 1-based position in `output`, blank lines
/// included.
pub(crate) fn parse_text(output: &str, indicators: &Indicators) -> Vec<Assertion> {
    let mut assertions = Vec::new();

    for (index, raw) in output.split('\n').enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let position = u32::try_from(index + 1).unwrap_or(u32::MAX);

        if let Some(assertion) = parse_assertion_line(line, position, indicators) {
            assertions.push(assertion);
        } else if let Some(log) = parse_log_line(line, position) {
            assertions.push(log);
        }
    }

    assertions
}

/// A line with any indicator token becomes an `assert` entry. Any fail
/// token makes it fail, even next to a pass token.
fn parse_assertion_line(line: &str, position: u32, indicators: &Indicators) -> Option<Assertion> {
    let has_pass = indicators.has_pass(line);
    let has_fail = indicators.has_fail(line);
    if !has_pass && !has_fail {
        return None;
    }
    let passed = has_pass && !has_fail;

    let line_number = LINE_REGEX
        .captures(line)
        .and_then(|caps| parse_number(caps.get(1)?.as_str()))
        .unwrap_or(position);

    if let Some(caps) = ASSERT_REGEX.captures(line) {
        let line_number = caps
            .get(1)
            .and_then(|m| parse_number(m.as_str()))
            .unwrap_or(line_number);
        let expression = caps.get(3).map(|m| m.as_str().trim()).unwrap_or_default();
        return Some(Assertion::assert(line_number, expression, passed));
    }

    Some(Assertion::assert(line_number, line, passed))
}

/// `log(...)` or `log ...` lines become `log` entries
fn parse_log_line(line: &str, position: u32) -> Option<Assertion> {
    if !line.contains("log(") && !line.contains("log ") {
        return None;
    }

    let message = line
        .find("log(")
        .map(|i| i + "log(".len())
        .and_then(|start| {
            let end = line.rfind(')')?;
            (end > start).then(|| strip_quote(line[start..end].trim()))
        })
        .unwrap_or(line);

    Some(Assertion::log(position, message))
}

/// Remove one quote character of either style from each end
fn strip_quote(s: &str) -> &str {
    let is_quote = |c: char| c == '"' || c == '\'';
    let s = s.strip_prefix(is_quote).unwrap_or(s);
    s.strip_suffix(is_quote).unwrap_or(s)
}

/// Parse stderr into `error` entries
pub(crate) fn parse_errors(errors: &str) -> Vec<Assertion> {
    errors
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            if let Some(caps) = ERROR_REGEX.captures(line) {
                let line_number = caps
                    .get(1)
                    .and_then(|m| parse_number(m.as_str()))
                    .unwrap_or(0);
                let error_type = &caps[2];
                let message = caps[3].trim();
                Some(Assertion::error(line_number, format!("{error_type}: {message}")))
            } else if line.contains("Error") || line.contains("Exception") {
                Some(Assertion::error(0, line))
            } else {
                None
            }
        })
        .collect()
}

/// Single whole-output verdict, pass tokens checked first
pub(crate) fn parse_generic(output: &str, indicators: &Indicators) -> Option<Assertion> {
    if indicators.has_pass(output) {
        Some(Assertion::result(true))
    } else if indicators.has_fail(output) {
        Some(Assertion::result(false))
    } else {
        None
    }
}

fn parse_number(digits: &str) -> Option<u32> {
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssertionKind;

    fn text(output: &str) -> Vec<Assertion> {
        parse_text(output, &Indicators::default())
    }

    #[test]
    fn test_position_counts_blank_lines() {
        let assertions = text("\n\n✅ third line");
        assert_eq!(assertions.len(), 1);
        assert_eq!(assertions[0].line_number(), 3);
        assert_eq!(assertions[0].message(), "✅ third line");
    }

    #[test]
    fn test_explicit_line_prefix() {
        let assertions = text("Line 42: result ok");
        assert_eq!(assertions[0].line_number(), 42);
    }

    #[test]
    fn test_assert_pattern_extracts_expression() {
        let assertions = text("Line 10: assert x == 5 passed\nLine 20: assertion y != 10 failed");

        assert_eq!(assertions.len(), 2);
        assert_eq!(assertions[0].line_number(), 10);
        assert_eq!(assertions[0].message(), "x");
        assert!(assertions[0].passed());
        assert_eq!(assertions[1].line_number(), 20);
        assert_eq!(assertions[1].message(), "y");
        assert!(!assertions[1].passed());
    }

    #[test]
    fn test_assert_pattern_without_comparison() {
        let assertions = text("assert is_ready() passed");
        assert_eq!(assertions[0].message(), "is_ready()");
        assert_eq!(assertions[0].line_number(), 1);
    }

    #[test]
    fn test_fail_token_wins() {
        let assertions = text("✅ passed but ❌ failed");
        assert_eq!(assertions.len(), 1);
        assert!(!assertions[0].passed());
    }

    #[test]
    fn test_indicator_line_is_not_a_log() {
        let assertions = text("log(\"all ok\")");
        assert_eq!(assertions[0].kind(), AssertionKind::Assert);
    }

    #[test]
    fn test_log_call_message() {
        let assertions = text("log(\"Starting tests\")\nlog('Case 1')\nlog f-string");

        assert_eq!(assertions.len(), 3);
        assert!(assertions.iter().all(|a| a.kind() == AssertionKind::Log));
        assert!(assertions.iter().all(Assertion::passed));
        assert_eq!(assertions[0].message(), "Starting tests");
        assert_eq!(assertions[1].message(), "Case 1");
        assert_eq!(assertions[2].message(), "log f-string");
    }

    #[test]
    fn test_log_strips_one_quote_only() {
        let assertions = text("log(\"\"quoted\"\")");
        assert_eq!(assertions[0].message(), "\"quoted\"");
    }

    #[test]
    fn test_log_without_closing_paren() {
        let assertions = text("log(\"unterminated");
        assert_eq!(assertions[0].message(), "log(\"unterminated");
    }

    #[test]
    fn test_unrecognized_lines_skipped() {
        assert!(text("just some output\n42\n").is_empty());
    }

    #[test]
    fn test_error_lines() {
        let errors = parse_errors("Line 7: Error: Undefined variable 'x'\nException: Division by zero\nRuntimeError raised\n\nplain");

        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].line_number(), 7);
        assert_eq!(errors[0].message(), "Error: Undefined variable 'x'");
        assert_eq!(errors[1].line_number(), 0);
        assert_eq!(errors[1].message(), "Exception: Division by zero");
        assert_eq!(errors[2].message(), "RuntimeError raised");
        assert!(errors.iter().all(|a| a.kind() == AssertionKind::Error && !a.passed()));
    }

    #[test]
    fn test_generic_prefers_pass() {
        let indicators = Indicators::default();
        assert!(parse_generic("PASS and FAIL", &indicators).unwrap().passed());
        assert!(!parse_generic("FAIL", &indicators).unwrap().passed());
        assert!(parse_generic("nothing", &indicators).is_none());
    }
}
