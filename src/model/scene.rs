use nalgebra::{Isometry3, Point3, Translation3};

use super::body::Body;

/// The hierarchical container of bodies. The root is the star; everything
/// else hangs off it. Bodies are created once at construction time and
/// never removed during a session.
#[derive(Debug)]
pub struct SceneGraph {
    root: Body,
}

fn local_isometry(body: &Body) -> Isometry3<f64> {
    Isometry3::from_parts(Translation3::from(body.position.coords), body.orientation)
}

impl SceneGraph {
    pub fn new(root: Body) -> Self {
        SceneGraph { root }
    }

    pub fn root(&self) -> &Body {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Body {
        &mut self.root
    }

    /// One simulation tick: every body advances its spin and orbit.
    pub fn update(&mut self, dt: f64) {
        self.root.update(dt);
    }

    /// Depth-first lookup by name, first match wins. Catalog names are
    /// unique, so "first match" is not load-bearing in practice.
    pub fn find(&self, name: &str) -> Option<&Body> {
        fn walk<'a>(body: &'a Body, name: &str) -> Option<&'a Body> {
            if body.name == name {
                return Some(body);
            }
            body.children.iter().find_map(|c| walk(c, name))
        }
        walk(&self.root, name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Body> {
        fn walk<'a>(body: &'a mut Body, name: &str) -> Option<&'a mut Body> {
            if body.name == name {
                return Some(body);
            }
            body.children.iter_mut().find_map(|c| walk(c, name))
        }
        walk(&mut self.root, name)
    }

    /// Visit every body with its composed world transform (parent
    /// translations and spins applied), in update order.
    pub fn traverse(&self, f: &mut dyn FnMut(&Body, &Isometry3<f64>)) {
        fn walk(body: &Body, parent: &Isometry3<f64>, f: &mut dyn FnMut(&Body, &Isometry3<f64>)) {
            let world = parent * local_isometry(body);
            f(body, &world);
            for child in &body.children {
                walk(child, &world, f);
            }
        }
        walk(&self.root, &Isometry3::identity(), f);
    }

    /// World-frame position of a named body, or None on a lookup miss.
    pub fn world_position(&self, name: &str) -> Option<Point3<f64>> {
        let mut found = None;
        self.traverse(&mut |body, world| {
            if found.is_none() && body.name == name {
                found = Some(Point3::from(world.translation.vector));
            }
        });
        found
    }

    /// Names of every body, in traversal order. Drives the focus table and
    /// the preview-selection cycling.
    pub fn body_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.traverse(&mut |body, _| names.push(body.name.clone()));
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::body::BodyKind;
    use approx::assert_relative_eq;

    fn two_level_scene() -> SceneGraph {
        let mut sun = Body::new("Sun", BodyKind::Planet, None, 5.0, 0.0);
        sun.set_rotation_speed(0.0);
        let mut earth = Body::new("Earth", BodyKind::Planet, None, 1.0, 10.0);
        earth.set_rotation_speed(0.0);
        earth.set_period(60.0);
        let mut moon = Body::new("Luna", BodyKind::Moon, None, 0.25, 2.0);
        moon.set_rotation_speed(0.0);
        moon.set_period(2.0);
        earth.add_child(moon);
        sun.add_child(earth);
        SceneGraph::new(sun)
    }

    #[test]
    fn find_reaches_nested_bodies() {
        let scene = two_level_scene();
        assert!(scene.find("Luna").is_some());
        assert!(scene.find("Earth").is_some());
        assert!(scene.find("Pluto").is_none());
    }

    #[test]
    fn update_recurses_in_insertion_order() {
        let mut scene = two_level_scene();
        scene.update(1.0);
        // Earth: 2π/60 along its track; Luna: 2π/2 around Earth.
        let earth = scene.find("Earth").unwrap();
        let luna = &earth.children[0];
        assert_relative_eq!(
            earth.orbit_angle,
            std::f64::consts::TAU - std::f64::consts::TAU / 60.0,
            max_relative = 1e-9
        );
        assert_relative_eq!(luna.orbit_angle, std::f64::consts::PI, max_relative = 1e-9);
    }

    #[test]
    fn world_position_composes_parent_frames() {
        let mut scene = two_level_scene();
        scene.update(1.0); // Luna swings to angle π: local (-2, 0, 0)
        let earth_pos = scene.world_position("Earth").unwrap();
        let luna_pos = scene.world_position("Luna").unwrap();
        assert_relative_eq!(
            (luna_pos - earth_pos).norm(),
            2.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn traversal_order_is_parent_first() {
        let scene = two_level_scene();
        assert_eq!(scene.body_names(), vec!["Sun", "Earth", "Luna"]);
    }
}
