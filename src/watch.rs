//! Watch Mode Daemon
//!
//! Long-lived process that monitors the workspace for filesystem changes and
//! feeds them, debounced and batched, to the automatic merge policy.

use crate::auto::{AutoMergeDecision, AutoMerger, ChangeEvent};
use crate::error::MergeError;
use crate::store::path::canonicalize_lenient;
use crate::store::EntryKind;
use notify::event::RemoveKind;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Watch mode configuration
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Workspace root directory
    pub workspace_root: PathBuf,
    /// Debounce window in milliseconds
    pub debounce_ms: u64,
    /// Batch window in milliseconds
    pub batch_window_ms: u64,
    /// Maximum events per batch
    pub max_batch_size: usize,
    /// Ignore patterns: `**/<name>/**`, `**/*<suffix>` or `**/<name>`
    pub ignore_patterns: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from("."),
            debounce_ms: 100,
            batch_window_ms: 50,
            max_batch_size: 100,
            ignore_patterns: vec![
                "**/.git/**".to_string(),
                "**/.branchfold/**".to_string(),
                "**/.obsidian/**".to_string(),
                "**/.DS_Store".to_string(),
                "**/*.swp".to_string(),
                "**/*.tmp".to_string(),
                "**/*~".to_string(),
            ],
        }
    }
}

/// Event batcher for grouping and debouncing events
struct EventBatcher {
    config: WatchConfig,
    pending_events: HashMap<PathBuf, ChangeEvent>,
    last_event_time: HashMap<PathBuf, Instant>,
}

impl EventBatcher {
    fn new(config: WatchConfig) -> Self {
        Self {
            config,
            pending_events: HashMap::new(),
            last_event_time: HashMap::new(),
        }
    }

    /// Add an event to the batcher
    ///
    /// Returns true if the batch is full and should be processed immediately
    fn add_event(&mut self, event: ChangeEvent) -> bool {
        let path = event.path().to_path_buf();

        if self.should_ignore(&path) {
            return false;
        }

        let now = Instant::now();
        let debounce_window = Duration::from_millis(self.config.debounce_ms);

        if let Some(last_time) = self.last_event_time.get(&path) {
            if now.duration_since(*last_time) < debounce_window {
                // Latest event wins
                self.pending_events.insert(path, event);
                return false;
            }
        }

        self.pending_events.insert(path.clone(), event);
        self.last_event_time.insert(path, now);

        self.pending_events.len() >= self.config.max_batch_size
    }

    fn is_empty(&self) -> bool {
        self.pending_events.is_empty()
    }

    /// Get and clear pending events, ordered by path
    fn take_batch(&mut self) -> Vec<ChangeEvent> {
        let mut events: Vec<_> = self.pending_events.drain().collect();
        events.sort_by(|a, b| a.0.cmp(&b.0));
        self.last_event_time.clear();
        events.into_iter().map(|(_, event)| event).collect()
    }

    fn clear(&mut self) {
        self.pending_events.clear();
        self.last_event_time.clear();
    }

    fn should_ignore(&self, path: &Path) -> bool {
        self.config
            .ignore_patterns
            .iter()
            .any(|pattern| matches_pattern(path, pattern))
    }
}

/// Match a path against one ignore pattern
fn matches_pattern(path: &Path, pattern: &str) -> bool {
    let pattern = pattern.replace('\\', "/");
    let pattern = pattern.trim_start_matches("**/");

    if let Some(dir) = pattern.strip_suffix("/**") {
        return path
            .components()
            .any(|c| c.as_os_str().to_string_lossy() == dir);
    }

    let file_name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return false,
    };
    match pattern.strip_prefix('*') {
        Some(suffix) => file_name.ends_with(suffix),
        None => file_name == pattern,
    }
}

/// Convert notify Event to ChangeEvent
fn convert_event(event: Event) -> Option<ChangeEvent> {
    match event.kind {
        EventKind::Create(_) => event.paths.first().map(|p| ChangeEvent::Created(p.clone())),
        EventKind::Modify(notify::event::ModifyKind::Name(_)) => {
            // Renames arrive as Modify(Name); some backends report only one side
            if event.paths.len() >= 2 {
                Some(ChangeEvent::Renamed {
                    from: event.paths[0].clone(),
                    to: event.paths[1].clone(),
                })
            } else {
                event.paths.first().map(|p| ChangeEvent::Modified(p.clone()))
            }
        }
        EventKind::Modify(_) => event.paths.first().map(|p| ChangeEvent::Modified(p.clone())),
        EventKind::Remove(kind) => {
            let kind = match kind {
                RemoveKind::File => Some(EntryKind::File),
                RemoveKind::Folder => Some(EntryKind::Folder),
                _ => None,
            };
            event.paths.first().map(|p| ChangeEvent::Removed {
                path: p.clone(),
                kind,
            })
        }
        _ => None,
    }
}

/// Canonical form of an event, comparable with tree store paths
fn canonicalize_event(event: ChangeEvent) -> ChangeEvent {
    match event {
        ChangeEvent::Created(p) => ChangeEvent::Created(canonicalize_lenient(&p)),
        ChangeEvent::Modified(p) => ChangeEvent::Modified(canonicalize_lenient(&p)),
        ChangeEvent::Removed { path, kind } => ChangeEvent::Removed {
            path: canonicalize_lenient(&path),
            kind,
        },
        ChangeEvent::Renamed { from, to } => ChangeEvent::Renamed {
            from: canonicalize_lenient(&from),
            to: canonicalize_lenient(&to),
        },
    }
}

/// Watch mode daemon
pub struct WatchDaemon {
    auto: AutoMerger,
    config: WatchConfig,
    running: Arc<RwLock<bool>>,
}

impl WatchDaemon {
    pub fn new(auto: AutoMerger, config: WatchConfig) -> Self {
        Self {
            auto,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Shared flag; setting it to false ends the event loop
    pub fn running(&self) -> Arc<RwLock<bool>> {
        Arc::clone(&self.running)
    }

    pub fn stop(&self) {
        *self.running.write() = false;
    }

    /// Start watching and process events until stopped
    pub fn start(&self) -> Result<(), MergeError> {
        *self.running.write() = true;

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            if let Err(e) = tx.send(res) {
                error!("Error sending watch event: {}", e);
            }
        })
        .map_err(|e| MergeError::WatchError(format!("Failed to create watcher: {}", e)))?;

        watcher
            .watch(&self.config.workspace_root, RecursiveMode::Recursive)
            .map_err(|e| MergeError::WatchError(format!("Failed to watch directory: {}", e)))?;

        info!(workspace = %self.config.workspace_root.display(), "Watching workspace");

        let mut batcher = EventBatcher::new(self.config.clone());
        let batch_window = Duration::from_millis(self.config.batch_window_ms);
        let mut last_batch_time = Instant::now();

        loop {
            if !*self.running.read() {
                break;
            }

            let timeout = batch_window
                .saturating_sub(last_batch_time.elapsed())
                .max(Duration::from_millis(1));
            let mut flush = false;
            match rx.recv_timeout(timeout) {
                Ok(Ok(event)) => {
                    if let Some(change) = convert_event(event) {
                        flush = batcher.add_event(canonicalize_event(change));
                    }
                }
                Ok(Err(e)) => {
                    warn!("Watch error: {}", e);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    error!("Watcher channel disconnected");
                    break;
                }
            }

            if flush || (!batcher.is_empty() && last_batch_time.elapsed() >= batch_window) {
                let decisions = self.process_events(batcher.take_batch());
                last_batch_time = Instant::now();

                let merged = decisions
                    .iter()
                    .any(|d| matches!(d, AutoMergeDecision::Triggered { .. }));
                if merged {
                    // Events raised while the merge ran, including its own writes
                    let dropped = rx.try_iter().count();
                    batcher.clear();
                    if dropped > 0 {
                        warn!(dropped, "Dropped events raised during merge");
                    }
                }
            } else if batcher.is_empty() {
                last_batch_time = Instant::now();
            }
        }

        info!("Watch stopped");
        Ok(())
    }

    /// Apply the policy to a batch; failures are logged and the daemon keeps going
    pub fn process_events(&self, events: Vec<ChangeEvent>) -> Vec<AutoMergeDecision> {
        if events.is_empty() {
            return Vec::new();
        }
        debug!(event_count = events.len(), "Processing change batch");

        match self.auto.on_batch(&events) {
            Ok(decisions) => decisions,
            Err(e) => {
                error!(error = %e, "Automatic merge failed");
                Vec::new()
            }
        }
    }
}
