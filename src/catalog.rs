//! The fixed body catalog: one star, eight planets, a handful of moons.
//! Distances and radii are real-world meters shrunk by a display factor;
//! orbital periods are plain seconds, with Earth completing one revolution
//! per simulated minute.

use nalgebra::Point3;

use crate::model::{Body, BodyKind, Decor, DecorKind, SceneGraph};

const METER: f64 = 7.187005893344844e-7 / 0.5;
const KM: f64 = 1000.0 * METER;
const AU: f64 = 149_597_870_700.0 * METER;

const SUN_RADIUS: f64 = 6.957e8 * METER;
const EARTH_RADIUS: f64 = 6378.0 * KM;
const MERCURY_RADIUS: f64 = EARTH_RADIUS * 0.3;
const VENUS_RADIUS: f64 = EARTH_RADIUS;
const MARS_RADIUS: f64 = EARTH_RADIUS * 0.5;
const JUPITER_RADIUS: f64 = EARTH_RADIUS * 11.0;
const SATURN_RADIUS: f64 = EARTH_RADIUS * 9.0;
const URANUS_RADIUS: f64 = EARTH_RADIUS * 4.0;
const NEPTUNE_RADIUS: f64 = EARTH_RADIUS * 4.0;

const MERCURY_DISTANCE: f64 = AU * 0.4;
const VENUS_DISTANCE: f64 = AU * 0.72;
const EARTH_DISTANCE: f64 = AU;
const MARS_DISTANCE: f64 = AU * 1.4;
const JUPITER_DISTANCE: f64 = AU * 5.0;
const SATURN_DISTANCE: f64 = AU * 9.5;
const URANUS_DISTANCE: f64 = AU * 19.0;
const NEPTUNE_DISTANCE: f64 = AU * 30.0;

// Earth completes one revolution in 60 seconds; everything else scales off
// that in rough proportion to the real planetary years.
const EARTH_PERIOD: f64 = 60.0;
const MERCURY_PERIOD: f64 = EARTH_PERIOD * 0.2;
const VENUS_PERIOD: f64 = EARTH_PERIOD * 0.6;
const MARS_PERIOD: f64 = EARTH_PERIOD * 1.88;
const JUPITER_PERIOD: f64 = EARTH_PERIOD * 11.86;
const SATURN_PERIOD: f64 = EARTH_PERIOD * 29.46;
const URANUS_PERIOD: f64 = EARTH_PERIOD * 84.02;
const NEPTUNE_PERIOD: f64 = EARTH_PERIOD * 164.79;

// Self-rotation, radians per tick.
const SUN_ROTATION_SPEED: f64 = 1e-4;
const EARTH_ROTATION_SPEED: f64 = SUN_ROTATION_SPEED * 27.0;
const MERCURY_ROTATION_SPEED: f64 = EARTH_ROTATION_SPEED * 0.017;
const VENUS_ROTATION_SPEED: f64 = EARTH_ROTATION_SPEED * 0.004;
const MARS_ROTATION_SPEED: f64 = EARTH_ROTATION_SPEED * 9.75;
const JUPITER_ROTATION_SPEED: f64 = EARTH_ROTATION_SPEED * 2.42;
const SATURN_ROTATION_SPEED: f64 = EARTH_ROTATION_SPEED * 2.275;
const URANUS_ROTATION_SPEED: f64 = EARTH_ROTATION_SPEED * 1.39;
const NEPTUNE_ROTATION_SPEED: f64 = EARTH_ROTATION_SPEED * 1.5;

fn rgb(hex: u32) -> Point3<f32> {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Point3::new(r, g, b)
}

fn planet(
    name: &str,
    color: u32,
    radius: f64,
    distance: f64,
    period: f64,
    rotation_speed: f64,
) -> Body {
    let mut body = Body::new(name, BodyKind::Planet, Some(rgb(color)), radius, distance);
    body.set_period(period);
    body.set_rotation_speed(rotation_speed);
    body
}

fn moon(name: &str, color: Option<u32>, radius: f64, distance: f64, period: f64) -> Body {
    let mut body = Body::new(name, BodyKind::Moon, color.map(rgb), radius, distance);
    body.set_period(period);
    body.set_rotation_speed(0.0);
    body
}

fn sun() -> Body {
    let mut sun = Body::new(
        "Sun",
        BodyKind::Star {
            light_color: Point3::new(1.0, 1.0, 1.0),
            light_intensity: 20.0,
            texture: None,
        },
        Some(rgb(0xffff00)),
        SUN_RADIUS,
        0.0,
    );
    sun.set_period(0.0);
    sun.set_rotation_speed(SUN_ROTATION_SPEED);
    sun
}

fn earth() -> Body {
    let mut earth = planet(
        "Earth",
        0x6495ed,
        EARTH_RADIUS,
        EARTH_DISTANCE,
        EARTH_PERIOD,
        EARTH_ROTATION_SPEED,
    );
    earth.add_child(moon(
        "Luna",
        Some(0xa9a9a9),
        EARTH_RADIUS * 0.25,
        384_400.0 * KM,
        2.0,
    ));
    earth
}

fn mars() -> Body {
    let mut mars = planet(
        "Mars",
        0x6495ed,
        MARS_RADIUS,
        MARS_DISTANCE,
        MARS_PERIOD,
        MARS_ROTATION_SPEED,
    );
    mars.add_child(moon("Phobos", None, 110.0 * METER, 38_440.0 * METER, 2.0));
    mars.add_child(moon("Deimos", None, 60.0 * METER, 38_440.0 * METER, 2.0));
    mars
}

fn saturn() -> Body {
    let mut saturn = planet(
        "Saturn",
        0x6495ed,
        SATURN_RADIUS,
        SATURN_DISTANCE,
        SATURN_PERIOD,
        SATURN_ROTATION_SPEED,
    );
    saturn.add_decor(Decor {
        kind: DecorKind::Rings,
        extent: SATURN_RADIUS * 2.2,
        visible: true,
    });
    saturn
}

/// Build the whole system: the Sun at the root, planets as its children in
/// orbit order, moons under their planets.
pub fn solar_system() -> SceneGraph {
    let mut sun = sun();
    sun.add_child(planet(
        "Mercury",
        0x8a7f80,
        MERCURY_RADIUS,
        MERCURY_DISTANCE,
        MERCURY_PERIOD,
        MERCURY_ROTATION_SPEED,
    ));
    sun.add_child(planet(
        "Venus",
        0xffc87c,
        VENUS_RADIUS,
        VENUS_DISTANCE,
        VENUS_PERIOD,
        VENUS_ROTATION_SPEED,
    ));
    sun.add_child(earth());
    sun.add_child(mars());
    sun.add_child(planet(
        "Jupiter",
        0x6495ed,
        JUPITER_RADIUS,
        JUPITER_DISTANCE,
        JUPITER_PERIOD,
        JUPITER_ROTATION_SPEED,
    ));
    sun.add_child(saturn());
    sun.add_child(planet(
        "Uranus",
        0x6495ed,
        URANUS_RADIUS,
        URANUS_DISTANCE,
        URANUS_PERIOD,
        URANUS_ROTATION_SPEED,
    ));
    sun.add_child(planet(
        "Neptune",
        0x6495ed,
        NEPTUNE_RADIUS,
        NEPTUNE_DISTANCE,
        NEPTUNE_PERIOD,
        NEPTUNE_ROTATION_SPEED,
    ));
    SceneGraph::new(sun)
}
