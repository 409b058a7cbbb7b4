use std::io::Write;

use gochara_config::{ConfigError, GocharaConfig, LogFormat};
use gochara_core::Body;

#[test]
fn loads_full_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[ephemeris]
table_path = "tables/2024.json"

[cadence]
fast_minutes = 30
medium_minutes = 120
slow_minutes = 360

[orbs]
default = 1.5
SUN = 5.0

[scan]
lunar_phase_step_minutes = 15
eclipse_skip_days = 150.0
refine_max_iterations = 30
include_optional_bodies = true

[logging]
level = "debug"
format = "json"
"#
    )
    .unwrap();

    let cfg = GocharaConfig::load(file.path()).unwrap();
    let settings = cfg.scan_settings().unwrap();
    assert_eq!(settings.cadence.fast_minutes, 30);
    assert_eq!(settings.orbs.orb(Body::Sun), 5.0);
    assert_eq!(settings.orbs.default_deg, 1.5);
    assert_eq!(settings.refine.max_iterations, 30);
    assert_eq!(settings.phases.lunar_phase_step_minutes, 15);
    assert_eq!(settings.phases.eclipse_skip_days, 150.0);
    assert!(cfg.scan.include_optional_bodies);
    assert_eq!(cfg.logging.format, LogFormat::Json);
    assert_eq!(
        cfg.ephemeris_config(None).unwrap().table_path,
        std::path::PathBuf::from("tables/2024.json")
    );
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gochara.toml");
    let err = GocharaConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("gochara.toml"));
}
