//! Tests for loading configuration from disk.

use std::io::Write;

use chatkit::component::Component;
use chatkit::config::ChatkitConfig;
use chatkit::ConfigError;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
prefix = "acme"

[carousel]
next_btn_text = "Next"
previous_btn_text = "Previous"

[header]
title_text = "Workspace"
slot = "aside"
"#
    )
    .unwrap();

    let config = ChatkitConfig::from_path(file.path()).unwrap();
    assert_eq!(config.prefix, "acme");

    let carousel = config.carousel();
    assert_eq!(carousel.base().tag(), "acme-carousel");
    assert_eq!(carousel.previous_btn_text(), Some("Previous"));
    assert_eq!(carousel.event_on_change(), "acme-carousel-onchange");

    let header = config.header();
    assert_eq!(header.slot(), "aside");
    assert_eq!(header.base().tag(), "acme-workspace-shell-header");
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    let err = ChatkitConfig::from_path(&path).unwrap_err();
    match &err {
        ConfigError::Io { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("expected I/O error, got {other:?}"),
    }
    assert!(err.to_string().contains("missing.toml"));
}

#[test]
fn test_written_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chatkit.toml");

    let mut config = ChatkitConfig::default();
    config.shell.header_open = true;
    config.header.sub_title_text = Some("Draft".into());
    std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

    let loaded = ChatkitConfig::from_path(&path).unwrap();
    assert_eq!(loaded, config);
    assert!(loaded.shell().header_open());
    assert_eq!(loaded.header().sub_title_text(), Some("Draft"));
}
