use std::io::Write;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

fn styled_line(style: Style, label: &str, message: &str) {
    let _ = writeln!(std::io::stderr(), "{:>12} {message}", style.apply_to(label));
}

/// Print a Cargo-style status line: `  Publishing sample-abcdef1-plasma-src.tar.gz`
///
/// The `label` is right-aligned to 12 columns in bold green.
pub fn status(label: &str, message: &str) {
    styled_line(Style::new().green().bold(), label, message);
}

/// Like [`status`] but bold cyan, for informational lines.
pub fn status_info(label: &str, message: &str) {
    styled_line(Style::new().cyan().bold(), label, message);
}

/// Bold yellow label, for non-fatal problems.
pub fn status_warn(label: &str, message: &str) {
    styled_line(Style::new().yellow().bold(), label, message);
}

/// Create an animated spinner for an operation of unknown duration.
///
/// Finish it with [`ProgressBar::finish_and_clear`].
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .expect("valid template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
