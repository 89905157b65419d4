/*!
 * Progress reporting for bulk translation jobs.
 *
 * The command line draws an indicatif bar; tests use `RecordingProgress` to
 * check what was reported.
 */

use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;

/// Receives progress of a bulk job
pub trait ProgressReporter: Send + Sync {
    /// Job starts with `total` steps
    fn start(&self, total: usize);

    /// Step `done` of `total` has finished
    fn advance(&self, done: usize, total: usize, label: &str);

    /// Job ended
    fn finish(&self, message: &str);
}

/// Reporter that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&self, _total: usize) {}
    fn advance(&self, _done: usize, _total: usize, _label: &str) {}
    fn finish(&self, _message: &str) {}
}

/// Terminal progress bar
#[derive(Debug)]
pub struct IndicatifProgress {
    bar: ProgressBar,
    unit: String,
}

impl IndicatifProgress {
    /// Hidden bar until `start` is called; `unit` labels the counter
    pub fn new(unit: &str) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            unit: unit.to_string(),
        }
    }
}

impl ProgressReporter for IndicatifProgress {
    fn start(&self, total: usize) {
        let template = format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}",
            self.unit
        );
        let style = ProgressStyle::default_bar()
            .template(&template)
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());

        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.set_style(style.progress_chars("█▓▒░"));
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message("Translating");
    }

    fn advance(&self, done: usize, _total: usize, label: &str) {
        self.bar.set_position(done as u64);
        self.bar.set_message(label.to_string());
    }

    fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// One reported event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started(usize),
    Advanced { done: usize, total: usize, label: String },
    Finished(String),
}

/// Reporter that keeps every event, for tests
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().clone()
    }

    /// `(done, total)` of every advance, in order
    pub fn advances(&self) -> Vec<(usize, usize)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Advanced { done, total, .. } => Some((*done, *total)),
                _ => None,
            })
            .collect()
    }
}

impl ProgressReporter for RecordingProgress {
    fn start(&self, total: usize) {
        self.events.lock().push(ProgressEvent::Started(total));
    }

    fn advance(&self, done: usize, total: usize, label: &str) {
        self.events.lock().push(ProgressEvent::Advanced {
            done,
            total,
            label: label.to_string(),
        });
    }

    fn finish(&self, message: &str) {
        self.events.lock().push(ProgressEvent::Finished(message.to_string()));
    }
}
