//! Terminal implementation of `ProgressReporter`.
//!
//! Wraps an `OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"` (suppressed when `ctx.quiet`)
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ⚠ {message}"` (suppressed when `ctx.quiet`)
/// - `uploaded()` prints `"  ✓ Uploaded {artifact}"` and advances the bar
///
/// When a progress bar is attached, lines are printed above it so the bar
/// stays at the bottom of the terminal.
pub struct TerminalReporter {
    ctx: OutputContext,
    bar: Option<ProgressBar>,
}

impl TerminalReporter {
    /// Create a reporter without a progress bar.
    #[must_use]
    pub fn new(ctx: OutputContext) -> Self {
        Self { ctx, bar: None }
    }

    /// Create a reporter that also tracks `total` artifacts on a bar.
    ///
    /// The bar is only drawn when the context allows progress output.
    #[must_use]
    pub fn with_bar(ctx: OutputContext, total: u64) -> Self {
        let bar = ctx
            .show_progress()
            .then(|| crate::output::progress::bar(total, "Uploading artifacts"));
        Self { ctx, bar }
    }

    /// Remove the bar, if any, leaving printed lines in place.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    fn line(&self, line: String) {
        if self.ctx.quiet {
            return;
        }
        match &self.bar {
            Some(bar) => bar.println(line),
            None => println!("{line}"),
        }
    }
}

impl ProgressReporter for TerminalReporter {
    fn step(&self, message: &str) {
        self.line(format!("  {} {message}", "→".style(self.ctx.styles.step)));
    }

    fn success(&self, message: &str) {
        self.line(format!("  {} {message}", "✓".style(self.ctx.styles.success)));
    }

    fn warn(&self, message: &str) {
        self.line(format!("  {} {message}", "⚠".style(self.ctx.styles.warning)));
    }

    fn uploaded(&self, artifact: &str, _bytes: u64) {
        self.line(format!(
            "  {} Uploaded {artifact}",
            "✓".style(self.ctx.styles.success)
        ));
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }
}
