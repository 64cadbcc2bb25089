use autofmt::{init_tracing, stm_info};
use autofmt_config::{LogFormat, LoggingConfig, Rotation};

// The global subscriber can only be installed once per process, so this
// binary holds a single test.
#[test]
fn init_writes_call_site_lines_to_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoggingConfig {
        level: "info".into(),
        file: Some("logs/app.log".into()),
        format: LogFormat::Plain,
        rotation: Rotation::Never,
        ..LoggingConfig::default()
    };

    let guard = init_tracing(&config, dir.path()).unwrap();
    assert!(guard.is_some());

    stm_info!("written", 1, 2.5_f32);
    tracing::debug!("filtered out");
    drop(guard);

    let content = std::fs::read_to_string(dir.path().join("logs/app.log")).unwrap();
    let line = content
        .lines()
        .find(|l| l.contains("written"))
        .unwrap_or_else(|| panic!("no log line in {content:?}"));
    assert!(line.contains(" INFO ["), "{line}");
    assert!(line.contains("tracing_init.rs:"), "{line}");
    assert!(line.ends_with(": written 1 2.5"), "{line}");
    assert!(!content.contains("filtered out"));

    // second install is refused
    assert!(init_tracing(&LoggingConfig::default(), dir.path()).is_err());
}
