use super::*;

#[test]
fn canonical_yaw_known_points() {
    assert_eq!(canonical_yaw(0), 0);
    assert_eq!(canonical_yaw(15), 15);
    assert_eq!(canonical_yaw(180), 180);
    assert_eq!(canonical_yaw(195), -165);
    assert_eq!(canonical_yaw(345), -15);
}

#[test]
fn canonical_yaw_stays_in_half_open_range() {
    for yaw in (0..360).step_by(15) {
        let c = canonical_yaw(yaw);
        assert!(c > -180 && c <= 180, "yaw {yaw} mapped to {c}");
        assert_eq!((c + 360) % 360, yaw);
    }
}

#[test]
fn default_params_match_tool_defaults() {
    let p = ViewParams::default();
    assert_eq!((p.width, p.height), (1280, 720));
    assert_eq!(p.quality.get(), 2);
    assert_eq!(p.h_fov, 130.0);
    assert_eq!(p.v_fov, 120.0);
    p.validate().unwrap();
}

#[test]
fn validate_rejects_bad_params() {
    let base = ViewParams::default();
    assert!(ViewParams { width: 0, ..base }.validate().is_err());
    assert!(ViewParams { height: 0, ..base }.validate().is_err());
    assert!(ViewParams { h_fov: 0.0, ..base }.validate().is_err());
    assert!(ViewParams { v_fov: 400.0, ..base }.validate().is_err());
    assert!(
        ViewParams {
            h_fov: f64::NAN,
            ..base
        }
        .validate()
        .is_err()
    );
}

#[test]
fn deserialized_params_reject_out_of_range_quality() {
    let json = r#"{"h_fov":130.0,"v_fov":120.0,"width":1280,"height":720,"quality":11}"#;
    let err = serde_json::from_str::<ViewParams>(json).unwrap_err();
    assert!(err.to_string().contains("quality must be within 1..=10"), "{err}");

    let ok = json.replace(":11}", ":3}");
    let p: ViewParams = serde_json::from_str(&ok).unwrap();
    assert_eq!(p.quality, Quality::new(3).unwrap());
}
