/*!
 * Progress reporting.
 *
 * The pipeline only talks to a [`ProgressSink`]: a percentage and a status
 * line. Each front end provides an adapter; the core never references a
 * rendering framework.
 *
 * - `TerminalProgress`: indicatif progress bar for the CLI
 * - `LogProgress`: status lines through the `log` facade
 * - `NoopProgress`: discards everything
 * - `RecordingProgress`: keeps every event, for tests and embedding UIs
 */

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use parking_lot::Mutex;

use crate::errors::ProgressError;

/// Capability interface for progress updates.
///
/// Both operations are fire-and-forget for the caller: a returned error is
/// logged and never interrupts processing.
pub trait ProgressSink: Send + Sync {
    /// Set the overall completion percentage (0-100)
    fn set_percent(&self, percent: u8) -> Result<(), ProgressError>;

    /// Replace the human-readable status line
    fn set_status(&self, status: &str) -> Result<(), ProgressError>;
}

/// Send a percentage update, swallowing sink failures
pub fn emit_percent(sink: &dyn ProgressSink, percent: u8) {
    if let Err(e) = sink.set_percent(percent.min(100)) {
        debug!("Ignoring progress sink failure: {}", e);
    }
}

/// Send a status update, swallowing sink failures
pub fn emit_status(sink: &dyn ProgressSink, status: &str) {
    if let Err(e) = sink.set_status(status) {
        debug!("Ignoring progress sink failure: {}", e);
    }
}

/// Percentage range reserved for one phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressBand {
    pub low: u8,
    pub high: u8,
}

impl ProgressBand {
    pub fn new(low: u8, high: u8) -> Self {
        let high = high.min(100);
        Self { low: low.min(high), high }
    }

    /// Linear position of `index` out of `total` inside the band.
    ///
    /// Non-decreasing in `index`; stays below `high` for `index < total`.
    pub fn percent_at(&self, index: usize, total: usize) -> u8 {
        if total == 0 {
            return self.low;
        }
        let span = self.high.saturating_sub(self.low) as usize;
        let offset = index.min(total) * span / total;
        self.low + offset as u8
    }
}

impl Default for ProgressBand {
    fn default() -> Self {
        Self::new(30, 80)
    }
}

/// Terminal progress bar adapter
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}% {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));
        Self { bar }
    }

    /// Wrap an existing bar, e.g. one added to a `MultiProgress`
    pub fn with_bar(bar: ProgressBar) -> Self {
        bar.set_length(100);
        Self { bar }
    }

    /// Leave the bar on screen with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Remove the bar from the screen
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalProgress {
    fn set_percent(&self, percent: u8) -> Result<(), ProgressError> {
        self.bar.set_position(percent as u64);
        Ok(())
    }

    fn set_status(&self, status: &str) -> Result<(), ProgressError> {
        self.bar.set_message(status.to_string());
        Ok(())
    }
}

/// Writes status lines to the log; percentages at debug level
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn set_percent(&self, percent: u8) -> Result<(), ProgressError> {
        debug!("Progress: {}%", percent);
        Ok(())
    }

    fn set_status(&self, status: &str) -> Result<(), ProgressError> {
        info!("{}", status);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn set_percent(&self, _percent: u8) -> Result<(), ProgressError> {
        Ok(())
    }

    fn set_status(&self, _status: &str) -> Result<(), ProgressError> {
        Ok(())
    }
}

/// One recorded progress update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Percent(u8),
    Status(String),
}

/// Records every update in order.
///
/// A failing recorder still records the update, then reports an error, which
/// lets callers check that sink failures do not interrupt a run.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
    failing: bool,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder whose every call returns an error
    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().clone()
    }

    pub fn percents(&self) -> Vec<u8> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Percent(p) => Some(*p),
                ProgressEvent::Status(_) => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Status(s) => Some(s.clone()),
                ProgressEvent::Percent(_) => None,
            })
            .collect()
    }

    fn record(&self, event: ProgressEvent) -> Result<(), ProgressError> {
        self.events.lock().push(event);
        if self.failing {
            Err(ProgressError("recorder configured to fail".to_string()))
        } else {
            Ok(())
        }
    }
}

impl ProgressSink for RecordingProgress {
    fn set_percent(&self, percent: u8) -> Result<(), ProgressError> {
        self.record(ProgressEvent::Percent(percent))
    }

    fn set_status(&self, status: &str) -> Result<(), ProgressError> {
        self.record(ProgressEvent::Status(status.to_string()))
    }
}
