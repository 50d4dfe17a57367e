//! Integration tests for the configuration layers and settings persistence

use branchfold::config::{
    global_config_path, AutoMergeMode, ConfigLoader, MergeSettings, SettingKey, SettingsStore,
};
use std::fs;
use tempfile::TempDir;

use crate::integration::{with_xdg_env, write_file};

#[test]
fn test_global_file_under_xdg_config_home() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let path = global_config_path().unwrap();
        assert_eq!(
            path,
            temp_dir.path().join("config").join("branchfold").join("config.toml")
        );
    });
}

#[test]
fn test_layer_precedence() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let workspace = temp_dir.path().join("ws");
        fs::create_dir_all(&workspace).unwrap();

        write_file(
            temp_dir.path().join("config/branchfold/config.toml"),
            "[merge]\nmerge_name = \"Global\"\nauto_merge = \"yes\"\n\n[logging]\nlevel = \"debug\"\n",
        );
        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.merge.merge_name, "Global");
        assert_eq!(config.merge.auto_merge, AutoMergeMode::Yes);
        assert_eq!(config.logging.level, "debug");

        write_file(
            workspace.join(".branchfold/config.toml"),
            "[merge]\nmerge_name = \"Workspace\"\n",
        );
        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.merge.merge_name, "Workspace");
        assert_eq!(config.merge.auto_merge, AutoMergeMode::Yes);

        let mut settings = config.merge.clone();
        settings.apply(SettingKey::AutoMerge, "silently").unwrap();
        SettingsStore::for_workspace(&workspace).save(&settings).unwrap();

        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.merge.merge_name, "Workspace");
        assert_eq!(config.merge.auto_merge, AutoMergeMode::Silently);
        assert_eq!(config.logging.level, "debug");
    });
}

#[test]
fn test_invalid_persisted_settings_fail_validation() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let workspace = temp_dir.path().join("ws");
        write_file(
            workspace.join(".branchfold/settings.toml"),
            "[merge]\nmerge_name = \"a/b\"\n",
        );

        let config = ConfigLoader::load(&workspace).unwrap();
        assert!(config.ensure_valid().is_err());
        assert!(SettingsStore::for_workspace(&workspace).load().is_err());
    });
}

#[test]
fn test_unknown_auto_merge_value_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("branchfold.toml");
    write_file(&config_file, "[merge]\nauto_merge = \"always\"\n");

    assert!(ConfigLoader::load_from_file(&config_file).is_err());
}

#[test]
fn test_defaults_without_files() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let workspace = temp_dir.path().join("ws");
        fs::create_dir_all(&workspace).unwrap();

        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.merge, MergeSettings::default());
        assert!(config.validate().is_ok());
    });
}
