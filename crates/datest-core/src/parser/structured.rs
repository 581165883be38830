//! Structured (JSON) interpreter output

use serde::Deserialize;
use tracing::debug;

use crate::types::Assertion;

/// JSON document an interpreter emits in structured mode
#[derive(Debug, Deserialize)]
struct StructuredReport {
    #[serde(default)]
    tests: Option<Vec<StructuredEntry>>,
    #[serde(default)]
    logs: Option<Vec<StructuredEntry>>,
}

#[derive(Debug, Deserialize)]
struct StructuredEntry {
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    passed: Option<bool>,
    #[serde(default)]
    source: Option<String>,
}

impl StructuredEntry {
    fn into_assert(self) -> Assertion {
        let assertion = Assertion::assert(
            self.line.unwrap_or(0),
            self.message.unwrap_or_default(),
            self.passed.unwrap_or(false),
        );
        attach_source(assertion, self.source)
    }

    fn into_log(self) -> Assertion {
        let assertion = Assertion::log(self.line.unwrap_or(0), self.message.unwrap_or_default());
        attach_source(assertion, self.source)
    }
}

fn attach_source(assertion: Assertion, source: Option<String>) -> Assertion {
    match source {
        Some(source) if !source.is_empty() => assertion.with_source(source),
        _ => assertion,
    }
}

/// Decode the first JSON document starting at the first `{` in `output`.
///
/// Only that one document is read; text after it is ignored. Returns `None`
/// when there is no `{` or the document does not decode into the expected
/// shape. Test entries come before log entries in the result.
pub(crate) fn parse_structured(output: &str) -> Option<Vec<Assertion>> {
    let start = output.find('{')?;

    let mut stream =
        serde_json::Deserializer::from_str(&output[start..]).into_iter::<StructuredReport>();
    let report = match stream.next()? {
        Ok(report) => report,
        Err(e) => {
            debug!(error = %e, "could not parse structured output");
            return None;
        }
    };

    let tests = report.tests.unwrap_or_default();
    let logs = report.logs.unwrap_or_default();
    debug!(tests = tests.len(), logs = logs.len(), "decoded structured output");

    let mut assertions = Vec::with_capacity(tests.len() + logs.len());
    assertions.extend(tests.into_iter().map(StructuredEntry::into_assert));
    assertions.extend(logs.into_iter().map(StructuredEntry::into_log));
    Some(assertions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssertionKind;

    #[test]
    fn test_tests_then_logs() {
        let output = r#"{"logs":[{"line":5,"message":"start"}],"tests":[{"line":10,"message":"x==5","passed":true}]}"#;
        let assertions = parse_structured(output).unwrap();

        assert_eq!(assertions.len(), 2);
        assert_eq!(assertions[0].kind(), AssertionKind::Assert);
        assert_eq!(assertions[0].line_number(), 10);
        assert_eq!(assertions[1].kind(), AssertionKind::Log);
        assert_eq!(assertions[1].line_number(), 5);
    }

    #[test]
    fn test_missing_fields_default() {
        let assertions = parse_structured(r#"{"tests":[{}],"logs":[{"passed":false}]}"#).unwrap();

        assert_eq!(assertions[0].line_number(), 0);
        assert_eq!(assertions[0].message(), "");
        assert!(!assertions[0].passed());
        assert!(assertions[0].source_line().is_none());
        assert!(assertions[1].passed());
    }

    #[test]
    fn test_source_is_kept() {
        let output = r#"{"tests":[{"line":3,"message":"x","passed":true,"source":"assert x"}]}"#;
        let assertions = parse_structured(output).unwrap();
        assert_eq!(assertions[0].source_line(), Some("assert x"));
    }

    #[test]
    fn test_text_around_document() {
        let output = "booting\n{\"tests\":[{\"line\":1,\"passed\":true}]}\ntrailing ok\n";
        let assertions = parse_structured(output).unwrap();
        assert_eq!(assertions.len(), 1);
    }

    #[test]
    fn test_rejects_malformed_or_missing() {
        assert!(parse_structured("no json here").is_none());
        assert!(parse_structured("{not json").is_none());
        assert!(parse_structured(r#"{"tests": 5}"#).is_none());
        assert!(parse_structured(r#"{"tests":[{"line":"ten"}]}"#).is_none());
    }

    #[test]
    fn test_object_without_entries_is_empty() {
        assert_eq!(parse_structured(r#"{"status":"done"}"#).unwrap().len(), 0);
    }
}
