//! Configuration file loading.

use outreach::{OutreachConfig, ScheduleType};
use std::io::Write;

#[test]
fn test_load_from_explicit_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[model]
model = "llama-3.1-8b"
base_url = "http://127.0.0.1:9000/v1"

[leads]
spreadsheet_id = "sheet-123"
snapshot_dir = "snapshots"

[email]
schedule_enabled = true
schedule_time = "18:30"
"#
    )
    .unwrap();

    let config = OutreachConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.leads().spreadsheet_id(), "sheet-123");
    assert_eq!(
        config.server_config().unwrap().chat_url(),
        "http://127.0.0.1:9000/v1/chat/completions"
    );
    assert_eq!(
        config.schedule().unwrap(),
        ScheduleType::Cron {
            expression: "0 30 18 * * * *".to_string()
        }
    );
}

#[test]
fn test_missing_explicit_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = OutreachConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
    assert!(err.kind().is_configuration());
}

#[test]
fn test_invalid_file_is_configuration_error() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[report]\nwords_per_line = 0").unwrap();
    let err = OutreachConfig::load(Some(file.path())).unwrap_err();
    assert!(err.kind().is_configuration());
}
