// file: src/pipeline/progress.rs
// description: progress spinner and run statistics for a generation run
// reference: uses indicatif for progress display and tracks run metrics

use crate::agent::GenerationObserver;
use crate::error::Result;
use crate::utils::logging::format_success;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub iterations: usize,
    pub tool_calls: usize,
    pub tool_failures: usize,
    pub research_bytes: u64,
    pub duration: Duration,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool_success_rate(&self) -> f64 {
        if self.tool_calls == 0 {
            return 0.0;
        }
        ((self.tool_calls - self.tool_failures) as f64 / self.tool_calls as f64) * 100.0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} iteration(s), {} tool call(s) ({} failed), {} bytes researched in {:.2}s",
            self.iterations,
            self.tool_calls,
            self.tool_failures,
            self.research_bytes,
            self.duration.as_secs_f64()
        )
    }
}

pub struct ProgressTracker {
    spinner: ProgressBar,
    iterations: AtomicUsize,
    tool_calls: AtomicUsize,
    tool_failures: AtomicUsize,
    research_bytes: AtomicU64,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(colored: bool) -> Self {
        Self::with_bar(create_spinner(colored))
    }

    /// Counts without drawing anything.
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(spinner: ProgressBar) -> Self {
        Self {
            spinner,
            iterations: AtomicUsize::new(0),
            tool_calls: AtomicUsize::new(0),
            tool_failures: AtomicUsize::new(0),
            research_bytes: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn set_message(&self, message: String) {
        self.spinner.set_message(message);
    }

    pub fn finish(&self) {
        self.spinner
            .finish_with_message(format_success("Generation complete"));
    }

    pub fn abandon(&self) {
        self.spinner.finish_and_clear();
    }

    pub fn get_stats(&self) -> RunStats {
        RunStats {
            iterations: self.iterations.load(Ordering::SeqCst),
            tool_calls: self.tool_calls.load(Ordering::SeqCst),
            tool_failures: self.tool_failures.load(Ordering::SeqCst),
            research_bytes: self.research_bytes.load(Ordering::SeqCst),
            duration: self.start_time.elapsed(),
        }
    }
}

impl GenerationObserver for ProgressTracker {
    fn on_iteration(&self, iteration: usize) {
        self.iterations.store(iteration, Ordering::SeqCst);
        self.set_message(format!("Thinking (step {})", iteration));
    }

    fn on_tool_call(&self, name: &str) {
        self.tool_calls.fetch_add(1, Ordering::SeqCst);
        self.set_message(format!("Running {}", name));
    }

    fn on_tool_result(&self, _name: &str, output: &Result<String>) {
        match output {
            Ok(text) => {
                self.research_bytes
                    .fetch_add(text.len() as u64, Ordering::SeqCst);
            }
            Err(_) => {
                self.tool_failures.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

fn create_spinner(colored: bool) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let template = if colored {
        "{spinner:.green} [{elapsed_precise}] {msg}"
    } else {
        "{spinner} [{elapsed_precise}] {msg}"
    };

    if let Ok(style) = ProgressStyle::default_spinner().template(template) {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgentError;

    #[test]
    fn test_run_stats_calculations() {
        let stats = RunStats {
            iterations: 3,
            tool_calls: 4,
            tool_failures: 1,
            research_bytes: 2048,
            duration: Duration::from_millis(1500),
        };

        assert_eq!(stats.tool_success_rate(), 75.0);
        assert_eq!(
            stats.summary(),
            "3 iteration(s), 4 tool call(s) (1 failed), 2048 bytes researched in 1.50s"
        );
    }

    #[test]
    fn test_run_stats_no_tool_calls() {
        assert_eq!(RunStats::new().tool_success_rate(), 0.0);
    }

    #[test]
    fn test_tracker_counts_observed_events() {
        let tracker = ProgressTracker::hidden();

        tracker.on_iteration(1);
        tracker.on_tool_call("WebResearcher");
        tracker.on_tool_result("WebResearcher", &Ok("A\n\nB".to_string()));
        tracker.on_iteration(2);
        tracker.on_tool_call("WebResearcher");
        tracker.on_tool_result(
            "WebResearcher",
            &Err(AgentError::ProviderRequest {
                message: "timeout".to_string(),
                retryable: true,
            }),
        );
        tracker.on_iteration(3);

        let stats = tracker.get_stats();
        assert_eq!(stats.iterations, 3);
        assert_eq!(stats.tool_calls, 2);
        assert_eq!(stats.tool_failures, 1);
        assert_eq!(stats.research_bytes, 4);
    }
}
