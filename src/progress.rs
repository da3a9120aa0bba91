//! Spinner shown while the AWS calls are in flight

use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use std::time::Duration;

/// Spinner on stderr, or nothing when disabled
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    /// Start a spinner if `enabled` and stderr is a terminal
    pub fn start(enabled: bool, message: &str) -> Self {
        if !enabled || !std::io::stderr().is_terminal() {
            return Self { bar: None };
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed_precise}]")
        {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(pb) }
    }

    /// Replace the spinner message
    pub fn set_message(&self, message: &str) {
        if let Some(pb) = &self.bar {
            pb.set_message(message.to_string());
        }
    }

    /// Remove the spinner from the terminal
    pub fn finish(self) {
        if let Some(pb) = self.bar {
            pb.finish_and_clear();
        }
    }

    pub fn is_active(&self) -> bool {
        self.bar.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_spinner() {
        let spinner = Spinner::start(false, "Fetching costs");
        assert!(!spinner.is_active());
        spinner.set_message("still nothing");
        spinner.finish();
    }
}
