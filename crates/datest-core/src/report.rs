//! Machine-readable test reports
//!
//! Generates JSON and JUnit XML reports from executed file results.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::summary::{summarize, RunSummary};
use crate::types::{Assertion, AssertionKind, AssertionSummary, FileResult};

/// JSON report document
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport<'a> {
    /// Generation time, RFC 3339
    pub generated_at: String,
    /// Run totals
    pub summary: RunSummary,
    /// Whether every file passed
    pub success: bool,
    /// Per-file results
    pub files: Vec<JsonFileReport<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonFileReport<'a> {
    pub name: String,
    pub path: String,
    pub success: bool,
    pub exit_code: i32,
    pub duration_ms: u64,
    pub assertion_summary: AssertionSummary,
    pub assertions: &'a [Assertion],
    #[serde(skip_serializing_if = "str::is_empty")]
    pub errors: &'a str,
}

impl<'a> From<&'a FileResult> for JsonFileReport<'a> {
    fn from(result: &'a FileResult) -> Self {
        Self {
            name: result.test_name(),
            path: result.file().display().to_string(),
            success: result.success(),
            exit_code: result.exit_code(),
            duration_ms: result.duration().as_millis() as u64,
            assertion_summary: result.assertion_summary(),
            assertions: result.assertions(),
            errors: result.errors(),
        }
    }
}

/// Report generator for machine-readable formats
pub struct ReportGenerator;

impl ReportGenerator {
    /// Generate a pretty-printed JSON report
    pub fn generate_json(results: &[FileResult]) -> Result<String> {
        let summary = summarize(results);
        let report = JsonReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            success: summary.success(),
            summary,
            files: results.iter().map(JsonFileReport::from).collect(),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Generate a JUnit XML report
    pub fn generate_junit(results: &[FileResult]) -> String {
        JUnitReport::from(results).to_xml()
    }

    /// Write report content to `path`, creating parent directories
    pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        info!(path = %path.display(), "wrote report");
        Ok(())
    }
}

/// JUnit XML report structure
#[derive(Debug, Clone)]
pub struct JUnitReport {
    pub name: String,
    pub tests: usize,
    pub failures: usize,
    pub errors: usize,
    pub time: f64,
    pub testsuites: Vec<JUnitTestSuite>,
}

#[derive(Debug, Clone)]
pub struct JUnitTestSuite {
    pub name: String,
    pub file: String,
    pub tests: usize,
    pub failures: usize,
    pub errors: usize,
    pub time: f64,
    pub testcases: Vec<JUnitTestCase>,
}

#[derive(Debug, Clone)]
pub struct JUnitTestCase {
    pub name: String,
    pub classname: String,
    pub time: f64,
    pub outcome: JUnitOutcome,
}

/// Outcome of one JUnit testcase
#[derive(Debug, Clone, PartialEq)]
pub enum JUnitOutcome {
    Passed,
    Failure { message: String, content: String },
    Error { message: String },
}

impl From<&[FileResult]> for JUnitReport {
    fn from(results: &[FileResult]) -> Self {
        let testsuites: Vec<JUnitTestSuite> = results.iter().map(JUnitTestSuite::from).collect();

        Self {
            name: "datest".to_string(),
            tests: testsuites.iter().map(|s| s.tests).sum(),
            failures: testsuites.iter().map(|s| s.failures).sum(),
            errors: testsuites.iter().map(|s| s.errors).sum(),
            time: summarize(results).total_duration.as_secs_f64(),
            testsuites,
        }
    }
}

impl From<&FileResult> for JUnitTestSuite {
    fn from(result: &FileResult) -> Self {
        let name = result.test_name();
        let mut testcases: Vec<JUnitTestCase> = result
            .assertions()
            .iter()
            .filter_map(|a| JUnitTestCase::from_assertion(a, &name))
            .collect();

        let has_asserts = result
            .assertions()
            .iter()
            .any(|a| a.kind() == AssertionKind::Assert);
        let has_failed_assert = result.assertions().iter().any(Assertion::is_failed_assert);
        if !has_asserts || (!result.success() && !has_failed_assert) {
            testcases.push(JUnitTestCase::file_verdict(result, &name));
        }

        let failures = testcases
            .iter()
            .filter(|t| matches!(t.outcome, JUnitOutcome::Failure { .. }))
            .count();
        let errors = testcases
            .iter()
            .filter(|t| matches!(t.outcome, JUnitOutcome::Error { .. }))
            .count();

        Self {
            file: result.file().display().to_string(),
            tests: testcases.len(),
            failures,
            errors,
            time: result.duration().as_secs_f64(),
            testcases,
            name,
        }
    }
}

impl JUnitTestCase {
    fn from_assertion(assertion: &Assertion, classname: &str) -> Option<Self> {
        let outcome = match assertion.kind() {
            AssertionKind::Assert if assertion.passed() => JUnitOutcome::Passed,
            AssertionKind::Assert => JUnitOutcome::Failure {
                message: assertion.message().to_string(),
                content: assertion
                    .source_line()
                    .unwrap_or(assertion.message())
                    .to_string(),
            },
            AssertionKind::Error => JUnitOutcome::Error {
                message: assertion.message().to_string(),
            },
            AssertionKind::Log | AssertionKind::Result => return None,
        };

        Some(Self {
            name: format!("line {}: {}", assertion.line_number(), assertion.message()),
            classname: classname.to_string(),
            time: 0.0,
            outcome,
        })
    }

    fn file_verdict(result: &FileResult, classname: &str) -> Self {
        let outcome = if result.success() {
            JUnitOutcome::Passed
        } else {
            let message = result
                .errors()
                .lines()
                .find(|l| !l.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("exit code {}", result.exit_code()));
            JUnitOutcome::Failure {
                message,
                content: result.errors().to_string(),
            }
        };

        Self {
            name: classname.to_string(),
            classname: classname.to_string(),
            time: result.duration().as_secs_f64(),
            outcome,
        }
    }
}

impl JUnitReport {
    /// Generate XML string
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<testsuites name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"{}\" time=\"{:.3}\">\n",
            escape_xml(&self.name),
            self.tests,
            self.failures,
            self.errors,
            self.time
        ));

        for suite in &self.testsuites {
            xml.push_str(&format!(
                "  <testsuite name=\"{}\" file=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"{}\" time=\"{:.3}\">\n",
                escape_xml(&suite.name),
                escape_xml(&suite.file),
                suite.tests,
                suite.failures,
                suite.errors,
                suite.time
            ));

            for testcase in &suite.testcases {
                let open = format!(
                    "    <testcase name=\"{}\" classname=\"{}\" time=\"{:.3}\"",
                    escape_xml(&testcase.name),
                    escape_xml(&testcase.classname),
                    testcase.time
                );
                match &testcase.outcome {
                    JUnitOutcome::Passed => {
                        xml.push_str(&open);
                        xml.push_str("/>\n");
                    }
                    JUnitOutcome::Failure { message, content } => {
                        xml.push_str(&open);
                        xml.push_str(">\n");
                        xml.push_str(&format!(
                            "      <failure message=\"{}\" type=\"AssertionError\">{}</failure>\n",
                            escape_xml(message),
                            escape_xml(content)
                        ));
                        xml.push_str("    </testcase>\n");
                    }
                    JUnitOutcome::Error { message } => {
                        xml.push_str(&open);
                        xml.push_str(">\n");
                        xml.push_str(&format!(
                            "      <error message=\"{}\" type=\"Error\"/>\n",
                            escape_xml(message)
                        ));
                        xml.push_str("    </testcase>\n");
                    }
                }
            }

            xml.push_str("  </testsuite>\n");
        }

        xml.push_str("</testsuites>\n");

        xml
    }
}

/// Escape XML markup and drop characters XML 1.0 cannot carry
fn escape_xml(s: &str) -> String {
    s.chars()
        .filter(|&c| is_xml_char(c))
        .collect::<String>()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn is_xml_char(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => true,
        '\u{FFFE}' | '\u{FFFF}' => false,
        c => c >= '\u{20}',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProcessOutput;
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample_results() -> Vec<FileResult> {
        vec![
            FileResult::completed(
                "tests/test_math.na",
                Duration::from_millis(250),
                ProcessOutput {
                    stdout: "✅ a\n❌ b".to_string(),
                    stderr: "Error: x < y".to_string(),
                    exit_code: 1,
                },
                vec![
                    Assertion::assert(1, "a", true),
                    Assertion::assert(2, "b", false),
                    Assertion::log(3, "note"),
                    Assertion::error(0, "Error: x < y"),
                ],
            ),
            FileResult::completed(
                "tests/test_quiet.na",
                Duration::from_millis(50),
                ProcessOutput::default(),
                Vec::new(),
            ),
            FileResult::terminal(
                "tests/test_slow.na",
                Duration::from_secs(1),
                "Execution timed out after 1s",
                124,
            ),
        ]
    }

    #[test]
    fn test_generate_json() {
        let json = ReportGenerator::generate_json(&sample_results()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["generated_at"].is_string());
        assert_eq!(value["summary"]["total"], 3);
        assert_eq!(value["summary"]["passed"], 1);
        assert_eq!(value["summary"]["failed"], 2);
        assert_eq!(value["summary"]["duration_ms"], 1300);
        assert_eq!(value["success"], false);

        let first = &value["files"][0];
        assert_eq!(first["name"], "test_math");
        assert_eq!(first["exit_code"], 1);
        assert_eq!(first["duration_ms"], 250);
        assert_eq!(first["assertion_summary"]["passed"], 1);
        assert_eq!(first["assertion_summary"]["failed"], 1);
        assert_eq!(first["assertions"].as_array().unwrap().len(), 4);
        assert_eq!(first["assertions"][1]["kind"], "assert");
        assert!(value["files"][1].get("errors").is_none());
    }

    #[test]
    fn test_generate_junit() {
        let xml = ReportGenerator::generate_junit(&sample_results());

        assert!(xml.starts_with("<?xml"));
        assert_eq!(xml.matches("<testsuite ").count(), 3);
        assert!(xml.contains("<testsuite name=\"test_math\" file=\"tests/test_math.na\" tests=\"3\" failures=\"1\" errors=\"1\""));
        assert!(xml.contains("<failure message=\"b\""));
        assert!(xml.contains("<error message=\"Error: x &lt; y\""));
        assert!(!xml.contains("note"));
        assert!(xml.contains("<testcase name=\"test_quiet\" classname=\"test_quiet\" time=\"0.050\"/>"));
        assert!(xml.contains("<failure message=\"Execution timed out after 1s\""));
        assert!(xml.contains("<testsuites name=\"datest\" tests=\"5\" failures=\"2\" errors=\"1\""));
    }

    #[test]
    fn test_junit_nonzero_exit_without_failed_assert() {
        let results = vec![FileResult::completed(
            "test_exit.na",
            Duration::ZERO,
            ProcessOutput {
                exit_code: 2,
                ..Default::default()
            },
            vec![Assertion::assert(1, "fine", true)],
        )];
        let report = JUnitReport::from(results.as_slice());

        assert_eq!(report.testsuites[0].tests, 2);
        assert_eq!(report.failures, 1);
        assert!(report.to_xml().contains("<failure message=\"exit code 2\""));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml("<a href=\"x\">&'"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&apos;"
        );
    }

    #[test]
    fn test_escape_xml_drops_control_chars() {
        assert_eq!(escape_xml("a\u{0}b\u{1b}c\td\r\n"), "abc\td\r\n");
        assert_eq!(escape_xml("x\u{FFFF}y"), "xy");
    }

    #[test]
    fn test_junit_strips_ansi_escape_bytes() {
        let colored = "\u{1b}[31mError: boom\u{1b}[0m";
        let results = vec![FileResult::completed(
            "test_color.na",
            Duration::ZERO,
            ProcessOutput {
                stderr: colored.to_string(),
                exit_code: 1,
                ..Default::default()
            },
            vec![Assertion::error(0, colored)],
        )];
        let xml = ReportGenerator::generate_junit(&results);

        assert!(!xml.contains('\u{1b}'));
        assert!(xml.contains("<error message=\"[31mError: boom[0m\""));
    }

    #[test]
    fn test_write_to_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("reports").join("datest.xml");

        ReportGenerator::write_to_file("<testsuites/>", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<testsuites/>");
    }
}
