//! Spinners shown while a turn is running.
//!
//! Spinners draw to stderr, so JSON written to stdout stays parseable.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "[{elapsed_precise}] {spinner:.green} {msg}";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Create a spinner for indeterminate operations
///
/// # Example
/// ```
/// use codecanvas::cli::output::progress::create_spinner;
///
/// let spinner = create_spinner();
/// spinner.set_message("Thinking...");
/// spinner.finish_with_message("Done");
/// ```
pub fn create_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_CHARS);
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Create a spinner with a custom message
pub fn create_spinner_with_message(message: impl Into<String>) -> ProgressBar {
    let spinner = create_spinner();
    spinner.set_message(message.into());
    spinner
}

/// Spinner that never draws, used in JSON mode.
pub fn hidden_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_draw_target(ProgressDrawTarget::hidden());
    spinner
}

/// Spinner for a command: visible on a terminal, hidden for JSON output.
pub fn spinner_for(json_mode: bool, message: impl Into<String>) -> ProgressBar {
    if json_mode {
        let spinner = hidden_spinner();
        spinner.set_message(message.into());
        spinner
    } else {
        create_spinner_with_message(message)
    }
}

/// Extension trait for ProgressBar to add common utility methods
pub trait ProgressBarExt {
    /// Finish with a success message (green checkmark)
    fn finish_success(&self, message: impl Into<String>);

    /// Finish with a warning message (yellow !)
    fn finish_warning(&self, message: impl Into<String>);
}

impl ProgressBarExt for ProgressBar {
    fn finish_success(&self, message: impl Into<String>) {
        self.finish_with_message(format!("✓ {}", message.into()));
    }

    fn finish_warning(&self, message: impl Into<String>) {
        self.finish_with_message(format!("! {}", message.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_spinner_with_message() {
        let spinner = create_spinner_with_message("Classifying");
        assert_eq!(spinner.message(), "Classifying");
        spinner.finish();
    }

    #[test]
    fn test_json_mode_spinner_is_hidden() {
        let spinner = spinner_for(true, "Thinking");
        assert!(spinner.is_hidden());
        spinner.finish_success("done");
        assert_eq!(spinner.message(), "✓ done");
    }

    #[test]
    fn test_finish_warning_prefixes_message() {
        let spinner = hidden_spinner();
        spinner.finish_warning("degraded");
        assert_eq!(spinner.message(), "! degraded");
    }
}
