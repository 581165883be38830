//! Pretty terminal report

use console::style;

use datest_core::summary::summarize;
use datest_core::FileResult;

/// Renders file results for the terminal
#[derive(Debug, Clone, Copy)]
pub struct PrettyReporter {
    /// Show the detail block for passing files too
    pub verbose: bool,
    /// Show per-file durations
    pub timings: bool,
}

impl PrettyReporter {
    pub fn new(verbose: bool, timings: bool) -> Self {
        Self { verbose, timings }
    }

    /// Header printed before execution starts
    pub fn header(&self, count: usize) -> String {
        format!(
            "\n{}\n",
            style(format!("🧪 Running {} test file(s)", count)).bold()
        )
    }

    /// Full report: one line per file, detail blocks, summary and verdict
    pub fn render(&self, results: &[FileResult]) -> String {
        if results.is_empty() {
            return format!("{}\n", style("No test results to report").yellow());
        }

        let mut out = String::new();
        for result in results {
            out.push_str(&self.render_file(result));
        }
        out.push_str(&self.render_summary(results));
        out
    }

    /// Status line plus, when verbose or failed, the detail block
    pub fn render_file(&self, result: &FileResult) -> String {
        let (icon, status) = if result.success() {
            ("✅", style("PASSED").green())
        } else {
            ("❌", style("FAILED").red())
        };

        let name = result
            .file()
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| result.file().display().to_string());

        let mut out = format!("{} {} {} {}", icon, style(name).bold(), style("...").dim(), status);
        if self.timings && !result.duration().is_zero() {
            out.push_str(&format!(
                " {}",
                style(format!("({:.2}s)", result.duration().as_secs_f64())).dim()
            ));
        }
        out.push('\n');

        if self.verbose || !result.success() {
            out.push_str(&self.render_details(result));
        }
        out
    }

    fn render_details(&self, result: &FileResult) -> String {
        let mut out = String::new();

        for line in result.output().lines().filter(|l| !l.trim().is_empty()) {
            out.push_str(&format!("    {}\n", style(line).dim()));
        }

        for line in result.errors().lines().filter(|l| !l.trim().is_empty()) {
            out.push_str(&format!("    {}\n", style(format!("Error: {}", line)).red()));
        }

        for assertion in result.assertions().iter().filter(|a| a.is_failed_assert()) {
            out.push_str(&format!("    {}\n", style(assertion).red()));
        }

        out
    }

    /// Summary table and final verdict line
    pub fn render_summary(&self, results: &[FileResult]) -> String {
        let summary = summarize(results);
        let mut out = String::from("\n");

        out.push_str(&format!(
            "  {}{}\n",
            style(format!("{:<14}", "Total files")).bold(),
            summary.total
        ));
        if summary.passed > 0 {
            out.push_str(&format!(
                "  {}\n",
                style(format!("{:<14}{}", "✅ Passed", summary.passed)).green()
            ));
        }
        if summary.failed > 0 {
            out.push_str(&format!(
                "  {}\n",
                style(format!("{:<14}{}", "❌ Failed", summary.failed)).red()
            ));
        }
        out.push_str(&format!(
            "  {:<14}{:.2}s\n",
            "⏱️  Duration",
            summary.total_duration.as_secs_f64()
        ));

        out.push('\n');
        if summary.success() {
            out.push_str(&format!("{}\n", style("🎉 All tests passed!").green().bold()));
        } else {
            out.push_str(&format!(
                "{}\n",
                style(format!("💥 {} test file(s) failed", summary.failed))
                    .red()
                    .bold()
            ));
        }
        out
    }
}
