use kidneyscan_web::config::{AppConfig, LogFormat};
use serial_test::serial;
use std::env;
use std::fs;

const BIN: &str = "kidneyscan-web";

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        for var in [
            "KIDNEYSCAN_SERVER__PORT",
            "KIDNEYSCAN_CHAT__REPLY_DELAY_MS",
            "KIDNEYSCAN_LOG__FORMAT",
            "CONFIG_FILE",
            "HOST",
            "PORT",
            "STATIC_DIR",
            "REPLY_DELAY_MS",
            "LOG_FORMAT",
        ] {
            env::remove_var(var);
        }
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args([BIN]).expect("defaults should load");

    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.static_dir, "static");
    assert_eq!(config.chat.reply_delay_ms, 1000);
    assert_eq!(config.chat.session_timeout_secs, 1800);
    assert_eq!(config.log.format, LogFormat::Compact);
    assert_eq!(config.bind_address(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("KIDNEYSCAN_SERVER__PORT", "9090");
        env::set_var("KIDNEYSCAN_CHAT__REPLY_DELAY_MS", "250");
        env::set_var("KIDNEYSCAN_LOG__FORMAT", "json");
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.chat.reply_delay_ms, 250);
    assert_eq!(config.log.format, LogFormat::Json);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("KIDNEYSCAN_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args([BIN, "--port", "4000", "--reply-delay-ms", "10"])
        .expect("Failed to load config");
    assert_eq!(config.server.port, 4000);
    assert_eq!(config.chat.reply_delay_ms, 10);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("kidneyscan.yaml");
    fs::write(
        &file_path,
        r#"
server:
  port: 7070
chat:
  reply_delay_ms: 50
"#,
    )
    .expect("Failed to write temp config");

    let path = file_path.to_str().expect("utf-8 path");
    let config = AppConfig::load_from_args([BIN, "--config", path])
        .expect("Failed to load config from file");
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.chat.reply_delay_ms, 50);
    // Untouched keys keep their defaults.
    assert_eq!(config.chat.cleanup_interval_secs, 60);
}

#[test]
#[serial]
fn test_missing_explicit_file_fails() {
    clear_env_vars();

    let result = AppConfig::load_from_args([BIN, "--config", "/nonexistent/kidneyscan.yaml"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_zero_cleanup_interval_is_rejected() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("bad.yaml");
    fs::write(&file_path, "chat:\n  cleanup_interval_secs: 0\n").expect("write config");

    let path = file_path.to_str().expect("utf-8 path");
    let err = AppConfig::load_from_args([BIN, "--config", path]).unwrap_err();
    assert!(err.to_string().contains("cleanup_interval_secs"));
}

#[test]
#[serial]
fn test_unknown_flag_is_an_error() {
    clear_env_vars();

    assert!(AppConfig::load_from_args([BIN, "--no-such-flag"]).is_err());
}
