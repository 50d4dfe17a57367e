//! User-visible notices
//!
//! Short messages about merges that did not happen or are about to happen.
//! The console notifier is used by the CLI; the recording notifier lets
//! embedders and tests observe what would have been shown.

use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::time::Duration;
use tracing::info;

pub const ALREADY_MERGING: &str = "Cannot create new merge while merging.";
pub const NO_BRANCHES: &str = "No branches to merge have been found.";
pub const UPDATING_MERGE: &str = "Updating merge...";

/// How long the automatic-merge notice stays visible
pub const UPDATING_MERGE_DURATION: Duration = Duration::from_millis(1000);

/// Notification surface
pub trait Notifier: Send + Sync {
    /// Post a transient message, optionally dismissed after `duration`.
    fn notice(&self, message: &str, duration: Option<Duration>);
}

/// A posted notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub duration: Option<Duration>,
}

/// Prints notices to stderr
pub struct ConsoleNotifier {
    color: bool,
}

impl ConsoleNotifier {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Notifier for ConsoleNotifier {
    fn notice(&self, message: &str, duration: Option<Duration>) {
        info!(text = message, duration_ms = duration.map(|d| d.as_millis() as u64), "Notice");
        if self.color {
            eprintln!("{} {}", "notice:".yellow().bold(), message);
        } else {
            eprintln!("notice: {}", message);
        }
    }
}

/// Keeps every notice in memory
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices.lock().iter().map(|n| n.message.clone()).collect()
    }

    pub fn clear(&self) {
        self.notices.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notice(&self, message: &str, duration: Option<Duration>) {
        self.notices.lock().push(Notice {
            message: message.to_string(),
            duration,
        });
    }
}
