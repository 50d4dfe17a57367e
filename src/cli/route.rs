//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::auto::AutoMerger;
use crate::cli::command_name;
use crate::cli::parse::{Commands, ConfigCommands};
use crate::cli::presentation::{format_branches, format_merge_outcome, format_settings};
use crate::config::{shared, BranchfoldConfig, ConfigLoader, SettingKey, SettingsStore};
use crate::error::{MergeError, StorageError};
use crate::merge::Merger;
use crate::notice::ConsoleNotifier;
use crate::store::path::canonicalize_path;
use crate::store::{EntryKind, FsTreeStore, TreeStore};
use crate::tree::builder::sort_branches;
use crate::tree::TreeBuilder;
use crate::watch::{WatchConfig, WatchDaemon};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Runtime context for CLI execution: workspace, config and the merge services.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config_path: Option<PathBuf>,
    config: BranchfoldConfig,
    store: Arc<FsTreeStore>,
    merger: Arc<Merger>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, MergeError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        config.ensure_valid()?;

        let store = Arc::new(FsTreeStore::new(&workspace_root)?);
        let workspace_root = store.root().to_path_buf();
        let notifier = Arc::new(ConsoleNotifier::new(std::io::stderr().is_terminal()));
        let merger = Arc::new(Merger::new(
            store.clone(),
            notifier,
            shared(config.merge.clone()),
        ));

        Ok(Self {
            workspace_root,
            config_path,
            config,
            store,
            merger,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &BranchfoldConfig {
        &self.config
    }

    pub fn merger(&self) -> &Arc<Merger> {
        &self.merger
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, MergeError> {
        let started = Instant::now();
        let name = command_name(command);
        info!(command = %name, "Command started");
        let result = self.execute_inner(command);
        info!(
            command = %name,
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis(),
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, MergeError> {
        match command {
            Commands::Merge { folder, format } => {
                let folder = self.resolve_folder(folder.as_deref())?;
                let outcome = self.merger.merge(&folder)?;
                format_merge_outcome(&outcome, &folder, format)
            }
            Commands::Watch {
                debounce_ms,
                batch_window_ms,
            } => self.handle_watch(*debounce_ms, *batch_window_ms),
            Commands::Branches { folder, format } => {
                let folder = self.resolve_folder(folder.as_deref())?;
                let merge_name = self.merger.current_settings().merge_name;
                let builder = TreeBuilder::new(self.store.as_ref(), merge_name);
                let mut branches = builder.fetch_branches(&folder)?;
                sort_branches(&mut branches);
                format_branches(&folder, &branches, format)
            }
            Commands::Config { command } => self.handle_config_command(command),
        }
    }

    fn handle_watch(&self, debounce_ms: u64, batch_window_ms: u64) -> Result<String, MergeError> {
        let mode = self.merger.current_settings().auto_merge;
        if !mode.is_enabled() {
            warn!("Automatic merge is disabled; watch will ignore changes");
            eprintln!(
                "Automatic merge is off (auto-merge = no). Enable it with `branchfold config set auto-merge yes`."
            );
        }

        let config = WatchConfig {
            workspace_root: self.workspace_root.clone(),
            debounce_ms,
            batch_window_ms,
            ..WatchConfig::default()
        };
        let daemon = WatchDaemon::new(AutoMerger::new(Arc::clone(&self.merger)), config);
        eprintln!("Watching {} (auto-merge = {})", self.workspace_root.display(), mode);
        daemon.start()?;
        Ok("Watch stopped.".to_string())
    }

    fn handle_config_command(&self, command: &ConfigCommands) -> Result<String, MergeError> {
        let settings_store = SettingsStore::for_workspace(&self.workspace_root);
        match command {
            ConfigCommands::Show { format } => format_settings(
                &self.merger.current_settings(),
                settings_store.path(),
                format,
            ),
            ConfigCommands::Set { key, value } => {
                let key: SettingKey = key.parse()?;
                let mut settings = self.merger.current_settings();
                settings.apply(key, value)?;
                settings_store.save(&settings)?;
                *self.merger.settings().write() = settings;
                if self.config_path.is_some() {
                    warn!("Settings saved to the workspace; --config file left unchanged");
                }
                Ok(format!("Set {} = {}", key.as_str(), value))
            }
        }
    }

    /// Resolve an optional folder argument against the workspace root
    fn resolve_folder(&self, folder: Option<&Path>) -> Result<PathBuf, MergeError> {
        let folder = match folder {
            None => return Ok(self.workspace_root.clone()),
            Some(f) if f.is_absolute() => f.to_path_buf(),
            Some(f) => self.workspace_root.join(f),
        };
        let folder = canonicalize_path(&folder).map_err(|_| StorageError::NotFound(folder))?;
        if !self.store.contains(&folder) {
            return Err(StorageError::InvalidPath(format!(
                "{} is outside the workspace {}",
                folder.display(),
                self.workspace_root.display()
            ))
            .into());
        }
        match self.store.kind(&folder)? {
            Some(EntryKind::Folder) => Ok(folder),
            Some(EntryKind::File) => Err(StorageError::NotAFolder(folder).into()),
            None => Err(StorageError::NotFound(folder).into()),
        }
    }
}
