//! Progress reporting while engines are dispatched

use colored::Colorize;
use council_application::{EngineOutcome, ProgressNotifier};
use council_domain::util::truncate_str;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Reports dispatch progress with a progress bar
pub struct ProgressReporter {
    multi: MultiProgress,
    dispatch_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            dispatch_bar: Mutex::new(None),
        }
    }

    fn dispatch_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn bar(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.dispatch_bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Longest failure reason shown next to a progress bar
const MAX_REASON_BYTES: usize = 60;

/// One-line description of how an engine settled
fn outcome_label(engine_id: &str, outcome: &EngineOutcome) -> String {
    match outcome {
        EngineOutcome::Succeeded { confidence } => {
            format!("{} {} ({:.3})", "v".green(), engine_id, confidence)
        }
        EngineOutcome::Failed { reason } => format!(
            "{} {} ({})",
            "x".red(),
            engine_id,
            truncate_str(reason, MAX_REASON_BYTES)
        ),
        EngineOutcome::TimedOut { timeout_ms } => {
            format!("{} {} (timed out after {}ms)", "x".yellow(), engine_id, timeout_ms)
        }
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_dispatch_start(&self, total_engines: usize) {
        let pb = self.multi.add(ProgressBar::new(total_engines as u64));
        pb.set_style(Self::dispatch_style());
        pb.set_prefix("Consulting engines");
        pb.set_message("Starting...");

        *self.bar() = Some(pb);
    }

    fn on_engine_complete(&self, engine_id: &str, outcome: &EngineOutcome) {
        if let Some(pb) = self.bar().as_ref() {
            pb.set_message(outcome_label(engine_id, outcome));
            pb.inc(1);
        }
    }

    fn on_dispatch_complete(&self) {
        if let Some(pb) = self.bar().take() {
            pb.finish_with_message(format!("{}", "Dispatch complete!".green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_dispatch_start(&self, total_engines: usize) {
        eprintln!(
            "{} {} ({} engines)",
            "->".cyan(),
            "Consulting engines".bold(),
            total_engines
        );
    }

    fn on_engine_complete(&self, engine_id: &str, outcome: &EngineOutcome) {
        eprintln!("  {}", outcome_label(engine_id, outcome));
    }

    fn on_dispatch_complete(&self) {
        eprintln!();
    }
}
