use std::io::Write;

use gochara_core::{Body, EclipseFlags, EphemerisProvider, UnavailableReason};
use gochara_ephem::{EphemError, EphemerisConfig, TableEphemeris};

const TABLE: &str = r#"{
  "bodies": {
    "SUN": [
      { "start_jd": 2460000.0, "span_days": 40.0, "coefficients": [20.0, 20.0] }
    ],
    "Moon": [
      { "start_jd": 2460000.0, "span_days": 2.0, "coefficients": [13.0, 13.0] }
    ]
  },
  "solar_eclipses": [ { "jd_ut": 2460020.5, "kind": "hybrid" } ],
  "lunar_eclipses": [ { "jd_ut": 2460035.25, "kind": "penumbral" } ]
}"#;

fn write_table(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_from_disk() {
    let file = write_table(TABLE);
    let table = TableEphemeris::load(&EphemerisConfig::new(file.path())).unwrap();

    let sun = table.longitude_and_speed(2460010.0, Body::Sun).unwrap();
    assert!((sun.longitude_deg - 10.0).abs() < 1e-9);
    assert!((sun.speed_deg_per_day.unwrap() - 1.0).abs() < 1e-9);

    let moon = table.longitude_and_speed(2460001.5, Body::Moon).unwrap();
    assert!((moon.longitude_deg - 19.5).abs() < 1e-9);
    assert!((moon.speed_deg_per_day.unwrap() - 13.0).abs() < 1e-9);

    let solar = table.next_solar_eclipse(2460000.0).unwrap();
    assert!(solar.flags.contains(EclipseFlags::TOTAL));
    assert!(solar.flags.contains(EclipseFlags::ANNULAR));
    let lunar = table.next_lunar_eclipse(2460000.0).unwrap();
    assert!(lunar.flags.contains(EclipseFlags::PENUMBRAL));
}

#[test]
fn moon_outside_its_segment_is_out_of_range() {
    let table = TableEphemeris::from_json(TABLE).unwrap();
    let err = table.longitude_and_speed(2460003.0, Body::Moon).unwrap_err();
    assert_eq!(err.reason, UnavailableReason::OutOfRange);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let res = TableEphemeris::load(&EphemerisConfig::new(dir.path().join("nope.json")));
    assert!(matches!(res, Err(EphemError::Io { .. })));
}

#[test]
fn malformed_json_is_parse_error() {
    let file = write_table("{ not json");
    let res = TableEphemeris::load(&EphemerisConfig::new(file.path()));
    assert!(matches!(res, Err(EphemError::Parse(_))));
}

#[test]
fn zero_span_rejected() {
    let res = TableEphemeris::from_json(
        r#"{"bodies": {"MARS": [{"start_jd": 0.0, "span_days": 0.0, "coefficients": [1.0]}]}}"#,
    );
    assert!(matches!(res, Err(EphemError::InvalidTable(_))));
}

#[test]
fn global_init_once() {
    let file = write_table(TABLE);
    let config = EphemerisConfig::new(file.path());
    assert!(matches!(
        gochara_ephem::provider(),
        Err(EphemError::NotInitialized)
    ));
    gochara_ephem::init(&config).unwrap();
    assert!(gochara_ephem::is_initialized());
    assert!(matches!(
        gochara_ephem::init(&config),
        Err(EphemError::AlreadyInitialized)
    ));
    let p = gochara_ephem::provider().unwrap();
    assert!(p.longitude_and_speed(2460010.0, Body::Sun).is_ok());
}
