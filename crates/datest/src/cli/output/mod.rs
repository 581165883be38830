//! Output formatting utilities

pub mod report;

use std::path::PathBuf;

use console::{style, Style};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("❌ Error:").red().bold(), message);
}

/// Print a warning message to stderr
pub fn warning(message: &str) {
    eprintln!("{} {}", style("⚠️  Warning:").yellow().bold(), style(message).yellow());
}

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Style for paths
pub fn path_style() -> Style {
    Style::new().cyan()
}

/// Print a list of discovered test files
pub fn discovered_files(files: &[PathBuf]) {
    println!();
    println!(
        "{}",
        header(&format!("🔍 Discovered {} test file(s):", files.len()))
    );
    for file in files {
        println!("  • {}", style(file.display()).dim());
    }
    println!();
}

/// Turn colors off on both streams when `color` is false. Otherwise leave
/// the terminal detection made by `console` in place.
pub fn apply_color_setting(color: bool) {
    if !color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
}
