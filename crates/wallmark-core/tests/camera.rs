use approx::assert_relative_eq;
use wallmark_core::camera::{Camera, CameraConfig, Range};

#[test]
fn pitch_and_zoom_stay_clamped() {
    let mut cam = Camera::default();
    for pitch in [-1e6, -81.0, -80.0, 0.0, 79.9, 500.0, 1e9] {
        cam.set_rotation(pitch, 12345.0);
        let s = cam.state();
        assert!((-80.0..=80.0).contains(&s.pitch), "pitch {}", s.pitch);
        assert_eq!(12345.0, s.yaw);
    }
    for zoom in [-5.0, 0.0, 1.0, 4.5, 10.0, 1e9] {
        cam.set_zoom(zoom);
        assert!((1.0..=10.0).contains(&cam.state().zoom));
    }
}

#[test]
fn non_finite_input_is_ignored() {
    let mut cam = Camera::default();
    cam.set_rotation(10.0, 20.0);
    cam.set_rotation(f32::NAN, 0.0);
    cam.set_zoom(f32::INFINITY);
    cam.set_pan(f32::NAN, 1.0);
    let s = cam.state();
    assert_eq!((10.0, 20.0, 7.0, 0.0, 0.0), (s.pitch, s.yaw, s.zoom, s.pan_x, s.pan_y));
}

#[test]
fn reset_restores_defaults() {
    let mut cam = Camera::default();
    cam.set_rotation(45.0, 90.0);
    cam.set_zoom(2.0);
    cam.set_pan(1.0, -1.0);
    cam.reset();
    let s = cam.state();
    assert_eq!((0.0, 0.0, 7.0, 0.0, 0.0), (s.pitch, s.yaw, s.zoom, s.pan_x, s.pan_y));
}

#[test]
fn eye_orbits_target_at_base_plus_zoom() {
    let mut cam = Camera::default();
    let eye = cam.eye();
    assert_relative_eq!(eye.z, 12.0, epsilon = 1e-5);
    assert_relative_eq!(eye.x, 0.0, epsilon = 1e-5);

    cam.set_rotation(0.0, 90.0);
    cam.set_pan(0.5, 0.25);
    let eye = cam.eye();
    assert_relative_eq!(eye.x, 12.5, epsilon = 1e-4);
    assert_relative_eq!(eye.y, 0.25, epsilon = 1e-5);
    assert_relative_eq!(eye.z, 0.0, epsilon = 1e-4);
}

#[test]
fn config_validation() {
    assert!(CameraConfig::default().validate().is_ok());
    let bad = CameraConfig {
        pitch_range: Range::new(-95.0, 40.0),
        ..CameraConfig::default()
    };
    assert!(bad.validate().is_err());
    let inverted = CameraConfig {
        zoom_range: Range::new(10.0, 1.0),
        ..CameraConfig::default()
    };
    assert!(inverted.validate().is_err());
}

#[test]
fn narrower_pitch_variant_is_respected() {
    let mut cam = Camera::new(CameraConfig {
        pitch_range: Range::new(-40.0, 40.0),
        ..CameraConfig::default()
    });
    cam.set_rotation(-60.0, 0.0);
    assert_eq!(-40.0, cam.state().pitch);
}
