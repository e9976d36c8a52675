use std::path::PathBuf;

use strokeplot::projection::StripField;
use strokeplot::{Error, StrokeplotConfig};

fn scratch(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("strokeplot-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_yaml_with_single_strip() {
    let path = scratch(
        "rower.yaml",
        r#"
calibration:
  velocity_divisor: 20000
strips:
  - field: Power
    origin: [400, 0]
    width: 600
    max_value: 400
"#,
    );
    let cfg = StrokeplotConfig::load(&path).unwrap();
    assert_eq!(cfg.calibration.velocity_divisor, 20000.0);
    assert_eq!(cfg.strips.len(), 1);
    assert_eq!(cfg.strips[0].field, StripField::Power);
    assert_eq!(cfg.strips[0].max_value, 400.0);
    // unspecified fields fall back to defaults
    assert_eq!(cfg.strips[0].height, 200.0);
    assert_eq!(cfg.surface_size(), [1000.0, 200.0]);
}

#[test]
fn json_and_yaml_agree() {
    let cfg = StrokeplotConfig::default();
    let json = serde_json::to_string(&cfg).unwrap();
    let yaml = serde_yaml::to_string(&cfg).unwrap();
    let a = StrokeplotConfig::load(&scratch("a.json", &json)).unwrap();
    let b = StrokeplotConfig::load(&scratch("b.yml", &yaml)).unwrap();
    assert_eq!(a, cfg);
    assert_eq!(b, cfg);
}

#[test]
fn rejects_unknown_extension_and_missing_file() {
    let path = scratch("rower.toml", "");
    assert!(matches!(
        StrokeplotConfig::load(&path),
        Err(Error::UnsupportedFormat(_))
    ));
    let missing = path.with_file_name("does-not-exist.yaml");
    assert!(matches!(
        StrokeplotConfig::load(&missing),
        Err(Error::Io { .. })
    ));
}
