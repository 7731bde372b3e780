use std::collections::HashMap;
use std::time::Duration;

use folio_config::{ConfigGuardRailError, ConfigLoadError, ConfigLoader};
use folio_core::pagination::PaginationConfig;
use folio_core::providers::GoogleBooksConfig;

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn write_config(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("folio.toml");
    std::fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn defaults_apply_without_file_or_env() {
    let load = ConfigLoader::new()
        .load_from(&env(&[]))
        .expect("defaults load");
    let config = load.config;

    assert_eq!(config.database.url, "sqlite://folio.db");
    assert_eq!(config.pagination.page_size, 30);
    assert_eq!(config.pagination.load_more_count, 8);
    assert_eq!(config.pagination.prefetch_distance, 5);
    assert_eq!(config.pagination.load_timeout, Duration::from_secs(10));
    assert_eq!(config.search.max_results, 20);
    assert!(config.metadata.config_path.is_none());
    // only the missing API key is flagged
    assert_eq!(load.warnings.len(), 1);
}

#[test]
fn file_overrides_defaults_and_env_overrides_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(
        &dir,
        r#"
[database]
url = "sqlite://from-file.db"
max_connections = 3

[pagination]
page_size = 40
load_more_count = 10
load_timeout = "3s"

[search]
api_key = "file-key"

[preferences]
namespace = "shelf"
"#,
    );

    let load = ConfigLoader::new()
        .with_config_path(&path)
        .load_from(&env(&[
            ("DATABASE_URL", "sqlite://from-env.db"),
            ("FOLIO_LOAD_MORE_COUNT", "12"),
            ("GOOGLE_BOOKS_TIMEOUT", "2s"),
        ]))
        .expect("load");
    let config = load.config;

    assert_eq!(config.database.url, "sqlite://from-env.db");
    assert_eq!(config.database.max_connections, 3);
    assert_eq!(config.pagination.page_size, 40);
    assert_eq!(config.pagination.load_more_count, 12);
    assert_eq!(config.pagination.load_timeout, Duration::from_secs(3));
    assert_eq!(config.search.api_key.as_deref(), Some("file-key"));
    assert_eq!(config.search.timeout, Duration::from_secs(2));
    assert_eq!(config.preferences.namespace, "shelf");
    assert_eq!(config.metadata.config_path.as_deref(), Some(path.as_path()));
    assert!(load.warnings.is_empty());
}

#[test]
fn config_path_can_come_from_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(&dir, "[pagination]\nprefetch_distance = 3\n");
    let path_text = path.display().to_string();

    let load = ConfigLoader::new()
        .load_from(&env(&[("FOLIO_CONFIG_PATH", path_text.as_str())]))
        .expect("load");
    assert_eq!(load.config.pagination.prefetch_distance, 3);
}

#[test]
fn unparsable_env_values_are_ignored() {
    let load = ConfigLoader::new()
        .load_from(&env(&[("FOLIO_PAGE_SIZE", "lots"), ("FOLIO_LOAD_TIMEOUT", "")]))
        .expect("load");
    assert_eq!(load.config.pagination.page_size, 30);
    assert_eq!(load.config.pagination.load_timeout, Duration::from_secs(10));
}

#[test]
fn guard_rails_reject_inconsistent_paging() {
    let err = ConfigLoader::new()
        .load_from(&env(&[("FOLIO_PAGE_SIZE", "6"), ("FOLIO_LOAD_MORE_COUNT", "8")]))
        .expect_err("load-more larger than the page");
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::LoadMoreExceedsPage { .. })
    ));
}

#[test]
fn bad_file_duration_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(&dir, "[search]\ntimeout = \"whenever\"\n");
    let err = ConfigLoader::new()
        .with_config_path(path)
        .load_from(&env(&[]))
        .expect_err("bad duration");
    assert!(matches!(
        err,
        ConfigLoadError::InvalidDuration {
            field: "search.timeout",
            ..
        }
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ConfigLoader::new()
        .with_config_path(dir.path().join("absent.toml"))
        .load_from(&env(&[]))
        .expect_err("missing file");
    assert!(matches!(err, ConfigLoadError::FileIo { .. }));
}

#[test]
fn settings_convert_into_runtime_configs() {
    let load = ConfigLoader::new()
        .load_from(&env(&[
            ("FOLIO_PAGE_SIZE", "20"),
            ("GOOGLE_BOOKS_API_KEY", "abc"),
            ("GOOGLE_BOOKS_MAX_RESULTS", "5"),
        ]))
        .expect("load");

    let paging = PaginationConfig::from(&load.config.pagination);
    assert_eq!(paging.page_size, 20);
    assert_eq!(paging.load_more_count, 8);

    let search = GoogleBooksConfig::from(&load.config.search);
    assert_eq!(search.api_key.as_deref(), Some("abc"));
    assert_eq!(search.max_results, 5);
}
