use approx::{assert_abs_diff_eq, assert_relative_eq};
use nalgebra::Point3;

use solar_perspective::catalog::solar_system;
use solar_perspective::error::SimError;
use solar_perspective::preview::PreviewSelector;
use solar_perspective::rig::CameraRig;

/// Earth's catalog period is 60 simulated seconds, so half an orbit takes
/// 30 ticks of dt=1: the orbit angle lands on π and the body sits at -D on
/// the x axis, still in the Sun's local frame.
#[test]
fn earth_reaches_opposition_after_half_a_period() {
    let mut scene = solar_system();
    let distance = scene.find("Earth").unwrap().orbit_distance;

    for _ in 0..30 {
        scene.update(1.0);
    }

    let earth = scene.find("Earth").unwrap();
    assert_relative_eq!(
        earth.orbit_angle,
        std::f64::consts::PI,
        max_relative = 1e-9
    );
    assert_relative_eq!(earth.position.x, -distance, max_relative = 1e-9);
    assert_abs_diff_eq!(earth.position.z, 0.0, epsilon = distance * 1e-9);
}

/// The Sun orbits nothing: whatever dt gets thrown at the scene, its
/// position must not drift.
#[test]
fn the_sun_stays_put() {
    let mut scene = solar_system();
    for dt in [1.0, 0.016, 3600.0, 1e7] {
        scene.update(dt);
    }
    assert_eq!(scene.root().position, Point3::origin());
}

/// Every body's orbit angle stays wrapped to [0, 2π) no matter how
/// violent the timestep.
#[test]
fn all_orbit_angles_stay_wrapped() {
    let mut scene = solar_system();
    for dt in [1.0, 59.0, 1e5, 7.77, 1e9] {
        scene.update(dt);
        scene.traverse(&mut |body, _| {
            assert!(
                (0.0..std::f64::consts::TAU).contains(&body.orbit_angle),
                "{} has angle {} after dt {}",
                body.name,
                body.orbit_angle,
                dt
            );
        });
    }
}

/// A whole user-camera session: reset before an origin exists is refused,
/// a NaN origin is refused without touching state, and a proper
/// set_origin/reset pair restores position and the default snapshot.
#[test]
fn camera_reset_cycle() {
    let mut rig = CameraRig::perspective(50.0, 16.0 / 9.0, 1.0, 1e9);

    assert_eq!(rig.reset().unwrap_err(), SimError::OriginUndefined);
    assert!(matches!(
        rig.set_origin(f32::NAN, 0.0, 0.0).unwrap_err(),
        SimError::InvalidArgument(_)
    ));
    assert_eq!(rig.reset().unwrap_err(), SimError::OriginUndefined);

    rig.set_origin(-6000.0, 5000.0, 0.0).unwrap();
    rig.set_default_roll(-45.0, 0.0);
    rig.roll(13.0, 37.0);
    rig.reset().unwrap();

    assert_eq!(rig.position(), Point3::new(-6000.0, 5000.0, 0.0));
    assert_eq!((rig.pitch(), rig.yaw()), (-45.0, 0.0));
}

/// Switching the preview from Mars to Earth drops the Mars clone
/// entirely; afterwards only Earth's spin feeds the preview.
#[test]
fn preview_reselection_tracks_exactly_one_body() {
    let mut scene = solar_system();
    let mut preview = PreviewSelector::new(1.0, 1e9);

    preview.select(&scene, "Mars").unwrap();
    preview.select(&scene, "Earth").unwrap();
    assert_eq!(preview.selected(), Some("Earth"));

    for _ in 0..10 {
        scene.update(1.0);
    }
    preview.sync(&scene);

    let clone = preview.body().unwrap();
    let earth = scene.find("Earth").unwrap();
    let mars = scene.find("Mars").unwrap();
    assert_eq!(clone.orientation, earth.orientation);
    assert_ne!(clone.orientation, mars.orientation);

    // The clone is isolated: poking it cannot reach the live scene.
    assert_ne!(earth.position, clone.position);
}
