//! Layered configuration loading tests using temporary directories.

use std::fs;

use bookings::config::ConfigLoader;
use tempfile::tempdir;

#[test]
fn missing_env_files_fall_back_to_defaults() {
    let dir = tempdir().expect("temp dir");

    let config = ConfigLoader::with_base_dir(dir.path().to_path_buf())
        .load()
        .expect("loads with defaults");

    assert_eq!(config.profile, "dev");
    assert_eq!(config.api_bind_addr, "127.0.0.1:8080");
    assert_eq!(config.booking_lock_timeout_ms, 5_000);
}

#[test]
fn profile_env_file_overrides_the_base_file() {
    let dir = tempdir().expect("temp dir");
    fs::write(
        dir.path().join(".env"),
        "BOOKINGS_PROFILE=staging\nBOOKINGS_LOG_LEVEL=debug\nBOOKINGS_DB_MAX_CONNECTIONS=4\n",
    )
    .expect("write .env");
    fs::write(
        dir.path().join(".env.staging"),
        "BOOKINGS_LOG_LEVEL=warn\nBOOKINGS_BOOKING_LOCK_TIMEOUT_MS=250\n",
    )
    .expect("write .env.staging");

    let config = ConfigLoader::with_base_dir(dir.path().to_path_buf())
        .load()
        .expect("layered load succeeds");

    assert_eq!(config.profile, "staging");
    assert_eq!(config.log_level, "warn");
    assert_eq!(config.db_max_connections, 4);
    assert_eq!(config.booking_lock_timeout_ms, 250);
}

#[test]
fn out_of_bounds_lock_timeout_fails_validation() {
    let dir = tempdir().expect("temp dir");
    fs::write(
        dir.path().join(".env"),
        "BOOKINGS_BOOKING_LOCK_TIMEOUT_MS=99\n",
    )
    .expect("write .env");

    let result = ConfigLoader::with_base_dir(dir.path().to_path_buf()).load();
    assert!(result.is_err());
}
