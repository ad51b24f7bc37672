use super::*;
use tempfile::{tempdir, TempDir};
use std::fs::File;
use std::io::Write;

/// Helper function to create a test configuration file
fn create_test_config_file(dir: &TempDir, content: &str) -> PathBuf {
    let config_path = dir.path().join("config.toml");
    let mut file = File::create(&config_path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    config_path
}

#[test]
fn test_base_config_defaults() {
    let config = base_config(None);

    assert_eq!(config.database_url, "ecoleta.db");
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 3333);
    assert_eq!(config.uploads_dir, PathBuf::from("uploads"));
    assert_eq!(config.public_url, None);
    assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
    assert_eq!(config.log_dir, None);
}

#[test]
fn test_base_config_with_path() {
    let temp_dir = tempdir().unwrap();
    let config = base_config(Some(temp_dir.path().to_path_buf()));

    let expected_db_path = temp_dir.path().join("ecoleta.db").to_string_lossy().to_string();
    assert_eq!(config.database_url, expected_db_path);
    assert_eq!(config.uploads_dir, temp_dir.path().join("uploads"));
}

#[test]
fn test_apply_update_with_partial_values() {
    let update = ConfigUpdate {
        port: Some(8080),
        public_url: Some("https://ecoleta.example.org".to_string()),
        ..Default::default()
    };

    let updated = base_config(None).apply_update(update);

    assert_eq!(updated.port, 8080);
    assert_eq!(updated.public_url(), "https://ecoleta.example.org");
    assert_eq!(updated.database_url, "ecoleta.db"); // Unchanged
    assert_eq!(updated.host, "127.0.0.1"); // Unchanged
}

#[test]
fn test_apply_update_with_no_values() {
    let base = base_config(None);
    assert_eq!(base.clone().apply_update(ConfigUpdate::default()), base);
}

#[test]
fn test_public_url_derived_from_listen_address() {
    let mut config = base_config(None);
    config.host = "0.0.0.0".to_string();
    config.port = 4000;
    assert_eq!(config.public_url(), "http://0.0.0.0:4000");

    config.public_url = Some("http://192.168.0.10:4000/".to_string());
    assert_eq!(config.public_url(), "http://192.168.0.10:4000");
}

#[test]
fn test_listen_addr() {
    let mut config = base_config(None);
    assert_eq!(config.listen_addr(), "127.0.0.1:3333");

    config.host = "localhost".to_string();
    config.port = 80;
    assert_eq!(config.listen_addr(), "localhost:80");
}

#[test]
fn test_config_from_args_with_values() {
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        port: Some(9000),
        debug: true,
        ..Default::default()
    };

    let update = config_from_args(&args);

    assert_eq!(update.database_url, Some("args.db".to_string()));
    assert_eq!(update.port, Some(9000));
    assert_eq!(update.host, None);
    assert_eq!(update.server_url, None);
}

#[test]
fn test_config_from_file_with_no_path() {
    let update = config_from_file(None).unwrap();
    assert_eq!(update, ConfigUpdate::default());
}

#[test]
fn test_config_from_file_with_valid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = create_test_config_file(
        &temp_dir,
        r#"
            database_url = "file.db"
            port = 4444
            uploads_dir = "/srv/ecoleta/uploads"
            max_upload_bytes = 1048576
            server_url = "http://ecoleta.local:4444"
        "#,
    );

    let result = config_from_file(Some(config_path));

    assert!(result.is_ok(), "Failed to parse config file: {}", result.err().unwrap());
    let update = result.unwrap();
    assert_eq!(update.database_url, Some("file.db".to_string()));
    assert_eq!(update.port, Some(4444));
    assert_eq!(update.uploads_dir, Some(PathBuf::from("/srv/ecoleta/uploads")));
    assert_eq!(update.max_upload_bytes, Some(1048576));
    assert_eq!(update.server_url, Some("http://ecoleta.local:4444".to_string()));
    assert_eq!(update.host, None);
}

#[test]
fn test_config_from_file_with_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = create_test_config_file(&temp_dir, r#"port = "not a number""#);

    assert!(config_from_file(Some(config_path)).is_err());
}

#[test]
fn test_config_from_file_with_nonexistent_file() {
    let temp_dir = tempdir().unwrap();
    let nonexistent_path = temp_dir.path().join("nonexistent_config.toml");

    let update = config_from_file(Some(nonexistent_path)).unwrap();
    assert_eq!(update, ConfigUpdate::default());
}

#[test]
fn test_precedence_args_over_file_over_base() {
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        ..Default::default()
    };
    let from_file = ConfigUpdate {
        database_url: Some("file.db".to_string()),
        port: Some(5000),
        ..Default::default()
    };

    let config = base_config(None)
        .apply_update(from_file)
        .apply_update(config_from_args(&args));

    assert_eq!(config.database_url, "args.db");
    assert_eq!(config.port, 5000); // From file
    assert_eq!(config.host, "127.0.0.1"); // From base
}
