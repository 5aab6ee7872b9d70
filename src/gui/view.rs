use std::collections::HashMap;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use log::warn;
use nalgebra::{Isometry3, Point2, Point3, Translation3, UnitQuaternion};

use super::camera::UserCamera;
use super::state::SimulationState;
use crate::catalog;
use crate::model::{Body, DecorKind, SceneGraph};
use crate::preview::PreviewSelector;

const FOV_Y: f32 = 50.0;
const Z_NEAR: f32 = 1.0;
const Z_FAR: f32 = 1_000_000_000.0;

const ORIGIN: (f32, f32, f32) = (-6000.0, 5000.0, 0.0);
const DEFAULT_PITCH: f32 = -45.0;

const STAR_COUNT: usize = 1500;
const STAR_SPREAD: f32 = 100_000.0;

pub struct View {
    scene: SceneGraph,
    state: SimulationState,
    // One kiss3d node per body, keyed by catalog name. The node hierarchy
    // mirrors the body hierarchy, so setting local transforms is enough.
    nodes: HashMap<String, SceneNode>,
    camera: UserCamera,
    preview: PreviewSelector,
    stars: Vec<Point3<f32>>,
}

impl View {
    pub fn new(window: &mut Window, timestep: f64, paused: bool) -> Self {
        let scene = catalog::solar_system();

        let aspect = window.width() as f32 / window.height() as f32;
        let mut camera = UserCamera::new(FOV_Y, aspect, Z_NEAR, Z_FAR);
        let rig = camera.rig_mut();
        let (x, y, z) = ORIGIN;
        rig.set_origin(x, y, z).expect("origin is finite");
        rig.set_default_roll(DEFAULT_PITCH, 0.0);
        rig.reset().expect("origin was just set");

        let mut nodes = HashMap::new();
        let mut root = window.add_group();
        build_nodes(scene.root(), &mut root, &mut nodes);

        let mut preview = PreviewSelector::new(Z_NEAR, Z_FAR);
        preview
            .select(&scene, scene.root().name.as_str())
            .expect("root is always present");

        let state = SimulationState::new(scene.body_names(), timestep, paused);

        let mut view = View {
            scene,
            state,
            nodes,
            camera,
            preview,
            stars: starfield(STAR_COUNT, STAR_SPREAD),
        };
        view.sync_scene_nodes();
        view
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// One simulation tick: bodies first, then the preview's post-update
    /// sync, then camera focus tracking. The camera's own update runs when
    /// kiss3d renders.
    pub fn advance(&mut self, dt: f64) {
        self.scene.update(dt);
        self.state.elapsed += dt;

        self.preview.sync(&self.scene);

        if let Some(name) = self.state.focus.focused() {
            if let Some(target) = self.scene.world_position(name) {
                self.camera.rig_mut().look_at(nalgebra::convert(target));
            }
        }
    }

    /// Camera tick for the preview render pass (the pass itself belongs to
    /// the renderer).
    pub fn preview_update(&mut self) {
        self.preview.update();
    }

    pub fn select_preview_next(&mut self) {
        self.state.select_next();
        self.reselect_preview();
    }

    pub fn select_preview_prev(&mut self) {
        self.state.select_prev();
        self.reselect_preview();
    }

    fn reselect_preview(&mut self) {
        let name = self.state.selected_name().to_string();
        if let Err(e) = self.preview.select(&self.scene, &name) {
            // Recoverable: the old selection stays up.
            warn!("preview selection failed: {}", e);
        }
    }

    pub fn toggle_focus(&mut self) {
        let name = self.state.selected_name().to_string();
        self.state.focus.toggle_focus(&name);
    }

    pub fn toggle_look_at(&mut self) {
        let name = self.state.selected_name().to_string();
        self.state.focus.toggle_look_at(&name);
        // Aim once at toggle time; unlike focus, lookAt doesn't track.
        if self.state.focus.look_at() == Some(name.as_str()) {
            if let Some(target) = self.scene.world_position(&name) {
                self.camera.rig_mut().look_at(nalgebra::convert(target));
            }
        }
    }

    pub fn toggle_axes(&mut self) {
        let name = self.state.selected_name().to_string();
        if let Some(body) = self.scene.find_mut(&name) {
            let visible = body.axes_visible();
            body.show_axes(!visible);
        }
    }

    pub fn show_all_axes(&mut self, visible: bool) {
        fn walk(body: &mut Body, visible: bool) {
            body.show_axes(visible);
            for child in &mut body.children {
                walk(child, visible);
            }
        }
        walk(self.scene.root_mut(), visible);
    }

    fn sync_scene_nodes(&mut self) {
        let nodes = &mut self.nodes;
        self.scene.traverse(&mut |body, _world| {
            if let Some(node) = nodes.get_mut(&body.name) {
                let position: Point3<f32> = nalgebra::convert(body.position);
                let rotation: UnitQuaternion<f32> = nalgebra::convert(body.orientation);
                node.set_local_translation(Translation3::from(position));
                node.set_local_rotation(rotation);
            }
        });
    }

    pub fn prerender(&mut self, window: &mut Window, fps: f64) {
        self.sync_scene_nodes();
        self.draw_stars(window);
        self.draw_axes(window);
        self.draw_hud(window, fps);
    }

    fn draw_stars(&self, window: &mut Window) {
        let color = Point3::new(0.53, 0.53, 0.53);
        for star in &self.stars {
            window.draw_point(star, &color);
        }
    }

    fn draw_axes(&self, window: &mut Window) {
        let axes = [
            (Point3::new(1.0f32, 0.0, 0.0), Point3::new(1.0f32, 0.0, 0.0)),
            (Point3::new(0.0f32, 1.0, 0.0), Point3::new(0.0f32, 1.0, 0.0)),
            (Point3::new(0.0f32, 0.0, 1.0), Point3::new(0.0f32, 0.0, 1.0)),
        ];

        self.scene.traverse(&mut |body, world| {
            for decor in &body.decor {
                if decor.kind != DecorKind::Axes || !decor.visible {
                    continue;
                }
                let world: Isometry3<f32> = nalgebra::convert(*world);
                let center = world * Point3::origin();
                for (dir, color) in &axes {
                    let tip = world * Point3::from(dir.coords * decor.extent as f32);
                    window.draw_line(&center, &tip, color);
                }
            }
        });
    }

    fn draw_hud(&self, window: &mut Window, fps: f64) {
        let font = kiss3d::text::Font::default();
        let color = Point3::new(1.0, 1.0, 1.0);

        window.draw_text(
            &self.selection_text(),
            &Point2::origin(),
            60.0,
            &font,
            &color,
        );
        window.draw_text(
            &self.time_text(fps),
            // Same empirical x2 scaling the font metrics seem to need.
            &Point2::new(window.width() as f32 * 2.0 - 700.0, 0.0),
            60.0,
            &font,
            &color,
        );
    }

    fn selection_text(&self) -> String {
        let name = self.state.selected_name();
        let body = match self.scene.find(name) {
            Some(b) => b,
            None => return format!("Preview: {} (missing)", name),
        };
        format!(
            "Preview: {}
    Distance: {:.1}
    Radius: {:.1}
    Rotation speed: {:.2e}
    Orbit angle: {:.3}
    Period: {:.1} s
    Position: ({:.0}, {:.0}, {:.0})
Focus: {}
LookAt: {}",
            body.name,
            body.orbit_distance,
            body.radius,
            body.rotation_speed,
            body.orbit_angle,
            body.orbital_period,
            body.position.x,
            body.position.y,
            body.position.z,
            self.state.focus.focused().unwrap_or("-"),
            self.state.focus.look_at().unwrap_or("-"),
        )
    }

    fn time_text(&self, fps: f64) -> String {
        format!(
            "Time: {:.1} s{}
Timestep: {:.4} s/frame
FPS: {:.0}",
            self.state.elapsed,
            if self.state.paused { " (paused)" } else { "" },
            self.state.timestep,
            fps,
        )
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, None, None)
    }
}

fn build_nodes(body: &Body, parent: &mut SceneNode, nodes: &mut HashMap<String, SceneNode>) {
    let mut group = parent.add_group();

    if body.radius > 0.0 {
        let mut sphere = group.add_sphere(body.radius as f32);
        sphere.set_color(body.color.x, body.color.y, body.color.z);
    }

    for decor in &body.decor {
        if decor.kind == DecorKind::Rings {
            // A squashed cylinder reads as a ring disc at solar-system scale.
            let mut ring = group.add_cylinder(decor.extent as f32, (decor.extent * 0.01) as f32);
            ring.set_color(0.7, 0.62, 0.42);
        }
    }

    for child in &body.children {
        build_nodes(child, &mut group, nodes);
    }

    nodes.insert(body.name.clone(), group);
}

// Deterministic xorshift starfield; no need to drag in a real RNG for
// background dressing.
fn starfield(count: usize, spread: f32) -> Vec<Point3<f32>> {
    let mut state: u32 = 0x9e37_79b9;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state as f32 / u32::MAX as f32 - 0.5) * spread
    };
    (0..count)
        .map(|_| Point3::new(next(), next(), next()))
        .collect()
}
