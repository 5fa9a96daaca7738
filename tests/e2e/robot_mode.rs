//! Robot-mode end-to-end tests.

use serde_json::Value;

use crate::common::cli::CliRunner;
use crate::common::fixtures::png_bytes;
use crate::common::init_test_logging;

fn parse_json(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| panic!("Failed to parse JSON:\n{text}"))
}

#[test]
fn robot_quick_start_outputs_json() {
    init_test_logging();
    let cli = CliRunner::new();
    let result = cli.run(&["--robot"]);
    result.assert_success();

    let json = parse_json(result.stdout.trim());
    assert_eq!(json.get("tool").and_then(|v| v.as_str()), Some("devkeep"));
    assert!(json.get("browse").is_some());
    assert_eq!(
        json.get("devices").and_then(|v| v.as_array()).map(Vec::len),
        Some(4)
    );
}

#[test]
fn robot_list_outputs_all_four_devices() {
    init_test_logging();
    let cli = CliRunner::new();
    let result = cli.run_robot(&["list"]);
    result.assert_success();

    let json = parse_json(result.stdout.trim());
    let rows = json.as_array().expect("Expected JSON array for overview");
    assert_eq!(rows.len(), 4);
    for row in rows {
        assert_eq!(row.get("has_image").and_then(Value::as_bool), Some(false));
        assert!(row.get("text_chars").and_then(Value::as_u64).unwrap() > 0);
    }
}

#[test]
fn robot_set_text_then_show_roundtrip() {
    init_test_logging();
    let cli = CliRunner::new();
    cli.run_robot(&["set-text", "cameras", "  X  "]).assert_success();

    let result = cli.run_robot(&["show", "cameras"]);
    result.assert_success();

    let json = parse_json(result.stdout.trim());
    assert_eq!(json.get("label").and_then(Value::as_str), Some("Камеры"));
    assert_eq!(json.get("text_content").and_then(Value::as_str), Some("X"));
}

#[test]
fn robot_show_accepts_cyrillic_label() {
    init_test_logging();
    let cli = CliRunner::new();
    let result = cli.run_robot(&["show", "Датчик движения"]);
    result.assert_success();

    let json = parse_json(result.stdout.trim());
    assert_eq!(
        json.get("device").and_then(Value::as_str),
        Some("motion-sensor")
    );
}

#[test]
fn robot_show_can_embed_image_as_base64() {
    init_test_logging();
    let cli = CliRunner::new();
    let image = cli.scratch_path("cam.png");
    let bytes = png_bytes(24, 24);
    std::fs::write(&image, &bytes).unwrap();

    cli.run_robot(&["import-image", "cameras", image.to_str().unwrap()])
        .assert_success();

    let result = cli.run_robot(&["show", "cameras", "--include-image"]);
    result.assert_success();

    let json = parse_json(result.stdout.trim());
    let encoded = json
        .get("image_base64")
        .and_then(Value::as_str)
        .expect("blob should be embedded");

    use base64::Engine as _;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .unwrap();
    assert_eq!(decoded, bytes);
}

#[test]
fn robot_error_is_json_with_suggestion() {
    init_test_logging();
    let cli = CliRunner::new();

    // No image stored yet, so viewing must fail
    let result = cli.run_robot(&["view", "thermometer"]);
    result.assert_failure();

    let json = parse_json(result.stderr.trim());
    assert_eq!(json.get("error").and_then(Value::as_bool), Some(true));
    assert!(json.get("message").is_some());
    assert_eq!(json.get("recoverable").and_then(Value::as_bool), Some(true));
    assert!(json.get("suggestion").and_then(Value::as_str).is_some());
}

#[test]
fn robot_export_reports_backup_path() {
    init_test_logging();
    let cli = CliRunner::new();
    cli.run_robot(&["set-text", "cameras", "state"]).assert_success();

    let dest = cli.scratch_path("backups");
    let result = cli.run_robot(&["export", dest.to_str().unwrap()]);
    result.assert_success();

    let json = parse_json(result.stdout.trim());
    let backup = json.get("backup").and_then(Value::as_str).unwrap();
    assert!(backup.contains("_backup_"));
    assert!(std::path::Path::new(backup).exists());
}

#[test]
fn robot_clear_all_with_yes_resets_defaults() {
    init_test_logging();
    let cli = CliRunner::new();
    cli.run_robot(&["set-text", "motion-sensor", "dirty"]).assert_success();

    let result = cli.run_robot(&["clear-all", "--yes"]);
    result.assert_success();
    let json = parse_json(result.stdout.trim());
    assert_eq!(json.get("cleared").and_then(Value::as_bool), Some(true));

    let show = cli.run_robot(&["show", "motion-sensor"]);
    show.assert_success();
    let record = parse_json(show.stdout.trim());
    let text = record.get("text_content").and_then(Value::as_str).unwrap();
    assert!(text.starts_with("Характеристики датчика"));
}

#[test]
fn robot_version_outputs_json() {
    init_test_logging();
    let cli = CliRunner::new();
    let result = cli.run(&["version", "--format=json"]);
    result.assert_success();

    let json = parse_json(result.stdout.trim());
    assert!(json.get("version").is_some());
}
