use glam::Vec3;
use hoverfield_rendering::CameraPresentation;
use hoverfield_rendering_macroquad::HeldKeys;

fn camera(yaw: f32) -> CameraPresentation {
    CameraPresentation::new(Vec3::ZERO, 100.0, 40.0, yaw)
}

#[test]
fn idle_keyboard_produces_no_motion() {
    let input = HeldKeys::default().frame_input(&camera(0.3));

    assert_eq!(input.probe_motion, Vec3::ZERO);
    assert_eq!(input.orbit, 0.0);
    assert!(!input.respawn_all);
}

#[test]
fn forward_points_from_eye_towards_target() {
    let camera = camera(0.0);
    let keys = HeldKeys {
        forward: true,
        ..HeldKeys::default()
    };

    let input = keys.frame_input(&camera);
    let towards_target = (camera.target - camera.eye()) * Vec3::new(1.0, 0.0, 1.0);

    assert!(input.probe_motion.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    assert!(input.probe_motion.dot(towards_target.normalize()) > 0.99);
}

#[test]
fn opposing_keys_cancel_out() {
    let keys = HeldKeys {
        left: true,
        right: true,
        up: true,
        down: true,
        orbit_left: true,
        orbit_right: true,
        ..HeldKeys::default()
    };

    let input = keys.frame_input(&camera(1.2));

    assert_eq!(input.probe_motion, Vec3::ZERO);
    assert_eq!(input.orbit, 0.0);
}

#[test]
fn vertical_and_orbit_keys_map_to_axes() {
    let keys = HeldKeys {
        up: true,
        orbit_left: true,
        respawn_all: true,
        ..HeldKeys::default()
    };

    let input = keys.frame_input(&camera(2.0));

    assert!(input.probe_motion.abs_diff_eq(Vec3::Y, 1e-6));
    assert_eq!(input.orbit, -1.0);
    assert!(input.respawn_all);
}
