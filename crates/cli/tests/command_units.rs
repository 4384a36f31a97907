use std::fs;

use classify::commands::{
    apply_scan_flags, list_classifiers_command, scan_report, show_config_command,
};
use chrono::DateTime;
use classify::report::{Descriptor, ScanReport};
use classify_core::config::{AppConfig, OutputFormat};
use classify_core::Scope;
use tempfile::tempdir;

fn settings(config: &AppConfig) -> classify_core::config::RunSettings {
    config.resolve(0).expect("valid config")
}

#[test]
fn apply_scan_flags_only_overrides_given_values() {
    let mut config = AppConfig::default();
    apply_scan_flags(&mut config, None, Some("json".into()), Some(3));
    assert_eq!(config.scope, "squashed");
    assert_eq!(config.output, "json");
    assert_eq!(config.file_classification.parallelism, 3);

    let resolved = settings(&config);
    assert_eq!(resolved.output, OutputFormat::Json);
    assert_eq!(resolved.cataloger.parallelism, 3);
}

#[test]
fn scan_report_describes_source_and_matches() {
    let dir = tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("usr/local/go")).expect("mkdir");
    fs::write(dir.path().join("usr/local/go/VERSION"), b"go1.15").expect("write");
    fs::write(dir.path().join("README"), b"nothing").expect("write");

    let config = AppConfig::default();
    let report = scan_report(dir.path().to_str().expect("utf8"), &config, &settings(&config), true)
        .expect("scan");

    assert_eq!(report.source.scope, Scope::Squashed);
    let canonical = dir.path().canonicalize().expect("canon");
    assert_eq!(report.source.path, canonical.display().to_string());
    assert_eq!(report.descriptor.name, "classify");
    assert_eq!(report.classification_count(), 1);
    let entry = &report.classifications[0];
    assert_eq!(entry.location.real_path(), "/usr/local/go/VERSION");
    assert_eq!(entry.classifications[0].class, "go-binary-hint");
    assert_eq!(entry.sha256.as_deref().map(str::len), Some(64));
}

#[test]
fn table_rendering_aligns_columns_and_shows_extra_metadata() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("java"), b"\x00openjdk\x00java\x0021\x0021.0.1+12\x00")
        .expect("write");
    fs::write(dir.path().join("busybox"), b"BusyBox v1.36.1").expect("write");

    let config = AppConfig::default();
    let report = scan_report(dir.path().to_str().expect("utf8"), &config, &settings(&config), false)
        .expect("scan");
    let table = report.render_table();
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), 3, "{table}");
    assert!(lines[0].starts_with("PATH"));
    assert!(lines[1].starts_with("/busybox"));
    assert!(lines[2].contains("java-binary-openjdk"));
    assert!(lines[2].contains("21.0.1+12"));
    assert!(lines[2].ends_with("release=21"));
    // Columns line up under the header.
    let class_col = lines[0].find("CLASS").expect("class header");
    assert_eq!(&lines[1][class_col..class_col + "busybox-binary".len()], "busybox-binary");
}

#[test]
fn empty_report_renders_a_message() {
    let dir = tempdir().expect("tempdir");
    let config = AppConfig::default();
    let report: ScanReport =
        scan_report(dir.path().to_str().expect("utf8"), &config, &settings(&config), false)
            .expect("scan");
    assert!(report.classifications.is_empty());
    assert!(report.render_table().starts_with("No classifications found"));
    let json: serde_json::Value =
        serde_json::from_str(&report.to_json().expect("json")).expect("parse");
    assert_eq!(json["classifications"], serde_json::json!([]));
}

#[test]
fn scan_report_fails_on_invalid_user_classifier() {
    let dir = tempdir().expect("tempdir");
    let yaml = r#"
file-classification:
  classifiers:
    - class: bad
      file-patterns: ['(']
      evidence-patterns: ['x']
"#;
    let config: AppConfig = serde_yaml::from_str(yaml).expect("yaml");
    let err = scan_report(dir.path().to_str().expect("utf8"), &config, &settings(&config), false)
        .unwrap_err();
    assert!(format!("{err:#}").contains("invalid file pattern"), "got {err:#}");
}

#[test]
fn listing_and_config_commands_succeed_on_defaults() {
    let config = AppConfig::default();
    list_classifiers_command(&config, false).expect("text listing");
    list_classifiers_command(&config, true).expect("json listing");
    show_config_command(&config).expect("config");
}

#[test]
fn config_command_rejects_invalid_values() {
    let mut config = AppConfig::default();
    config.output = "xml".into();
    let err = show_config_command(&config).unwrap_err();
    assert!(format!("{err:#}").contains("bad output value"));
}

#[test]
fn reports_are_byte_equal_once_the_descriptor_is_pinned() {
    let dir = tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("bin")).expect("mkdir");
    fs::write(dir.path().join("bin/busybox"), b"BusyBox v1.36.1").expect("write");
    let config = AppConfig::default();
    let root = dir.path().to_str().expect("utf8");
    let pinned = Descriptor::at(DateTime::from_timestamp(1_700_000_000, 0).expect("timestamp"));

    let first = scan_report(root, &config, &settings(&config), true)
        .expect("first scan")
        .with_descriptor(pinned.clone());
    let second = scan_report(root, &config, &settings(&config), true)
        .expect("second scan")
        .with_descriptor(pinned);
    assert_eq!(first.descriptor.generated_at, "2023-11-14T22:13:20+00:00");
    assert_eq!(first.to_json().expect("json"), second.to_json().expect("json"));
}

#[test]
fn descriptor_honors_source_date_epoch() {
    let fixed = Descriptor::stamped(Some(" 1700000000 "));
    assert_eq!(fixed.generated_at, "2023-11-14T22:13:20+00:00");
    assert_eq!(fixed, Descriptor::stamped(Some("1700000000")));

    let fallback = Descriptor::stamped(Some("yesterday"));
    assert!(DateTime::parse_from_rfc3339(&fallback.generated_at).is_ok());
    assert_ne!(fallback.generated_at, fixed.generated_at);
}
