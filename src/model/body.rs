use std::f64::consts::TAU;

use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::error::SimError;

// Color used when the catalog doesn't specify one. Deliberately garish so
// an uncolored body is easy to spot.
const FALLBACK_COLOR: (f32, f32, f32) = (1.0, 111.0 / 255.0, 1.0);

const DEFAULT_ROTATION_SPEED: f64 = 1e-4;

/// What sort of catalog entity a body is. Kind-specific rendering data lives
/// here; the kinematic update is shared by all kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyKind {
    Star {
        light_color: Point3<f32>,
        light_intensity: f32,
        texture: Option<String>,
    },
    Planet,
    Moon,
}

impl BodyKind {
    pub fn label(&self) -> &'static str {
        match self {
            BodyKind::Star { .. } => "Star",
            BodyKind::Planet => "Planet",
            BodyKind::Moon => "Moon",
        }
    }
}

/// Purely decorative scene attachments (debug axes, planetary rings). Kept
/// out of `children` so that deep clones exclude them by type, not by
/// name-matching heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorKind {
    Axes,
    Rings,
}

#[derive(Debug, Clone)]
pub struct Decor {
    pub kind: DecorKind,
    /// Extent in world units: axis length for `Axes`, outer radius for `Rings`.
    pub extent: f64,
    pub visible: bool,
}

/// One celestial object: identity, kinematic state, and owned children
/// (moons under a planet, the planetary system under the star). Children
/// update in insertion order, which is also their render order.
#[derive(Debug)]
pub struct Body {
    pub name: String,
    pub kind: BodyKind,
    pub color: Point3<f32>,
    pub radius: f64,
    pub orbit_distance: f64,
    /// Radians of self-rotation applied per update call.
    pub rotation_speed: f64,
    /// Seconds for one full orbit. 0 means the body never orbits.
    pub orbital_period: f64,
    /// Current orbit phase, always in [0, 2π).
    pub orbit_angle: f64,
    /// Translation within the parent's local frame.
    pub position: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub children: Vec<Body>,
    pub decor: Vec<Decor>,
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl Body {
    pub fn new(
        name: impl Into<String>,
        kind: BodyKind,
        color: Option<Point3<f32>>,
        radius: f64,
        orbit_distance: f64,
    ) -> Self {
        // Malformed catalog data degrades to a stationary point rather than
        // poisoning downstream math.
        let radius = sanitize(radius).max(0.0);
        let orbit_distance = sanitize(orbit_distance).max(0.0);
        let color = color.unwrap_or_else(|| {
            let (r, g, b) = FALLBACK_COLOR;
            Point3::new(r, g, b)
        });

        Body {
            name: name.into(),
            kind,
            color,
            radius,
            orbit_distance,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            orbital_period: TAU,
            orbit_angle: 0.0,
            position: Point3::new(orbit_distance, 0.0, 0.0),
            orientation: UnitQuaternion::identity(),
            children: Vec::new(),
            decor: vec![Decor {
                kind: DecorKind::Axes,
                extent: radius * 1.2,
                visible: true,
            }],
        }
    }

    pub fn add_child(&mut self, child: Body) {
        self.children.push(child);
    }

    pub fn add_decor(&mut self, decor: Decor) {
        self.decor.push(decor);
    }

    pub fn set_rotation_speed(&mut self, speed: f64) {
        self.rotation_speed = sanitize(speed);
    }

    /// Period is taken in seconds and stored as-is; any unit conversion is
    /// the catalog's job.
    pub fn set_period(&mut self, period_seconds: f64) {
        self.orbital_period = sanitize(period_seconds);
    }

    pub fn set_distance(&mut self, distance: f64) {
        self.orbit_distance = sanitize(distance).max(0.0);
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = sanitize(radius).max(0.0);
    }

    /// Advance self-rotation and, for orbiting bodies, the orbit phase and
    /// position, then update every child in insertion order.
    pub fn update(&mut self, dt: f64) {
        // Incremental spin about the local vertical axis; rotation
        // accumulates tick over tick.
        self.orientation *=
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.rotation_speed);

        // Orbital motion needs both a nonzero track and a nonzero period;
        // a body at distance > 0 with period 0 just sits on its axis.
        if self.orbit_distance > 0.0 && self.orbital_period > 0.0 {
            self.orbit_angle -= TAU / self.orbital_period * dt;
            self.orbit_angle = self.orbit_angle.rem_euclid(TAU);
            self.position.x = self.orbit_distance * self.orbit_angle.cos();
            self.position.z = self.orbit_distance * self.orbit_angle.sin();
        }

        for child in &mut self.children {
            child.update(dt);
        }
    }

    /// Toggle the debug-axes decor. No-op if this body never had one.
    pub fn show_axes(&mut self, visible: bool) {
        for decor in &mut self.decor {
            if decor.kind == DecorKind::Axes {
                decor.visible = visible;
            }
        }
    }

    pub fn axes_visible(&self) -> bool {
        self.decor
            .iter()
            .any(|d| d.kind == DecorKind::Axes && d.visible)
    }

    /// Copy another body's state onto this one. Fails if the kinds don't
    /// match: a star's light parameters have nowhere to go on a moon.
    pub fn copy_from(&mut self, source: &Body, deep: bool) -> Result<(), SimError> {
        if std::mem::discriminant(&self.kind) != std::mem::discriminant(&source.kind) {
            return Err(SimError::InvalidSourceType {
                expected: self.kind.label(),
                found: source.kind.label(),
            });
        }

        self.name = source.name.clone();
        self.kind = source.kind.clone();
        self.color = source.color;
        self.radius = source.radius;
        self.orbit_distance = source.orbit_distance;
        self.rotation_speed = source.rotation_speed;
        self.orbital_period = source.orbital_period;
        self.orbit_angle = source.orbit_angle;
        self.position = source.position;
        self.orientation = source.orientation;

        if deep {
            self.children = source.children.iter().map(|c| c.clone_body(true)).collect();
        }
        Ok(())
    }

    /// Produce an independent copy. Deep clones recurse through real
    /// children only; decor is rebuilt fresh, and any texture reference is
    /// an opaque path, so the copy re-resolves resources rather than
    /// sharing them with the source.
    pub fn clone_body(&self, deep: bool) -> Body {
        let mut cloned = Body::new(
            self.name.clone(),
            self.kind.clone(),
            Some(self.color),
            self.radius,
            self.orbit_distance,
        );
        // Same kinds by construction, so this cannot fail.
        cloned
            .copy_from(self, deep)
            .expect("clone of identical kind");
        cloned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn test_planet(distance: f64, period: f64) -> Body {
        let mut body = Body::new("Test", BodyKind::Planet, None, 1.0, distance);
        body.set_period(period);
        body.set_rotation_speed(0.01);
        body
    }

    #[test]
    fn orbit_is_periodic() {
        let mut body = test_planet(10.0, 60.0);
        let initial = body.orbit_angle;
        for _ in 0..60 {
            body.update(1.0);
        }
        assert_abs_diff_eq!(body.orbit_angle, initial, epsilon = 1e-9);
        assert_relative_eq!(body.position.x, 10.0, max_relative = 1e-9);
        assert_abs_diff_eq!(body.position.z, 0.0, epsilon = 1e-8);
    }

    #[test]
    fn stationary_body_never_moves() {
        let mut body = test_planet(0.0, 60.0);
        let initial = body.position;
        body.update(1.0);
        body.update(1e6);
        assert_eq!(body.position, initial);
    }

    #[test]
    fn zero_period_gates_orbit() {
        let mut body = test_planet(10.0, 0.0);
        body.update(5.0);
        assert_eq!(body.position, Point3::new(10.0, 0.0, 0.0));
        assert_eq!(body.orbit_angle, 0.0);
    }

    #[test]
    fn orbit_angle_stays_wrapped() {
        let mut body = test_planet(10.0, 60.0);
        for dt in [1.0, 17.3, 1e4, 59.99, 1e8] {
            body.update(dt);
            assert!(
                (0.0..TAU).contains(&body.orbit_angle),
                "angle {} out of range after dt {}",
                body.orbit_angle,
                dt
            );
        }
    }

    #[test]
    fn rotation_accumulates_per_tick() {
        let mut body = test_planet(0.0, 0.0);
        body.set_rotation_speed(0.25);
        body.update(1.0);
        body.update(1.0);
        let (_, spin, _) = body.orientation.euler_angles();
        assert_relative_eq!(spin, 0.5, max_relative = 1e-9);
    }

    #[test]
    fn setters_normalize_non_finite_input() {
        let mut body = test_planet(10.0, 60.0);
        body.set_period(f64::NAN);
        body.set_rotation_speed(f64::INFINITY);
        body.set_distance(f64::NAN);
        body.set_radius(f64::NEG_INFINITY);
        assert_eq!(body.orbital_period, 0.0);
        assert_eq!(body.rotation_speed, 0.0);
        assert_eq!(body.orbit_distance, 0.0);
        assert_eq!(body.radius, 0.0);
    }

    #[test]
    fn constructor_tolerates_nan_catalog_data() {
        let body = Body::new("Broken", BodyKind::Moon, None, f64::NAN, f64::NAN);
        assert_eq!(body.radius, 0.0);
        assert_eq!(body.orbit_distance, 0.0);
        assert_eq!(body.position, Point3::origin());
    }

    #[test]
    fn deep_clone_is_structurally_independent() {
        let mut parent = test_planet(10.0, 60.0);
        parent.add_child(test_planet(2.0, 5.0));

        let mut cloned = parent.clone_body(true);
        assert_eq!(cloned.children.len(), 1);

        cloned.update(1.0);
        cloned.children[0].set_period(99.0);
        assert_eq!(parent.orientation, UnitQuaternion::identity());
        assert_eq!(parent.orbit_angle, 0.0);
        assert_eq!(parent.children[0].orbital_period, 5.0);

        parent.update(3.0);
        let (_, clone_spin, _) = cloned.orientation.euler_angles();
        assert_relative_eq!(clone_spin, 0.01, max_relative = 1e-9);
    }

    #[test]
    fn clone_excludes_extra_decor() {
        let mut saturn = test_planet(10.0, 60.0);
        saturn.add_decor(Decor {
            kind: DecorKind::Rings,
            extent: 2.5,
            visible: true,
        });
        let cloned = saturn.clone_body(true);
        assert!(cloned.decor.iter().all(|d| d.kind != DecorKind::Rings));
    }

    #[test]
    fn copy_across_kinds_is_rejected() {
        let mut star = Body::new(
            "Sun",
            BodyKind::Star {
                light_color: Point3::new(1.0, 1.0, 1.0),
                light_intensity: 20.0,
                texture: None,
            },
            None,
            5.0,
            0.0,
        );
        let planet = test_planet(10.0, 60.0);
        let err = star.copy_from(&planet, true).unwrap_err();
        assert_eq!(
            err,
            SimError::InvalidSourceType {
                expected: "Star",
                found: "Planet"
            }
        );
        // The failed copy must not have clobbered anything.
        assert_eq!(star.name, "Sun");
        assert_eq!(star.radius, 5.0);
    }

    #[test]
    fn show_axes_toggles_and_tolerates_absence() {
        let mut body = test_planet(1.0, 1.0);
        assert!(body.axes_visible());
        body.show_axes(false);
        assert!(!body.axes_visible());

        body.decor.clear();
        body.show_axes(true); // no-op, must not panic
        assert!(!body.axes_visible());
    }
}
