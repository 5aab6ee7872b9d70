//! The preview subsystem: an isolated deep clone of one selected body,
//! rendered always-centered through its own orthographic rig. The clone is
//! replaced wholesale on every selection change, and a post-update pass
//! keeps its spin in step with the live body.

use log::debug;
use nalgebra::Point3;

use crate::error::SimError;
use crate::model::{Body, SceneGraph};
use crate::rig::CameraRig;

const PADDING_FACTOR: f32 = 1.5;
// Rig standoff, in body radii, along the (-x, +y) diagonal.
const STANDOFF_RADII: f32 = 10.0;

pub struct PreviewSelector {
    rig: CameraRig,
    selection: Option<Body>,
}

impl PreviewSelector {
    pub fn new(znear: f32, zfar: f32) -> Self {
        let mut rig = CameraRig::orthographic(-2.0, 2.0, -2.0, 2.0, znear, zfar);
        // The preview viewpoint is never user-driven.
        rig.lock(true);
        PreviewSelector {
            rig,
            selection: None,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selection.as_ref().map(|b| b.name.as_str())
    }

    pub fn body(&self) -> Option<&Body> {
        self.selection.as_ref()
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Swap the preview to a different body. On a lookup miss the previous
    /// selection stays in place and the caller just logs it.
    pub fn select(&mut self, scene: &SceneGraph, name: &str) -> Result<(), SimError> {
        let source = scene
            .find(name)
            .ok_or_else(|| SimError::ObjectNotFound(name.to_string()))?;

        let mut clone = source.clone_body(true);
        // The preview stays centered; the clone never inherits the live
        // body's orbital position.
        clone.position = Point3::origin();

        self.aim_at(&clone);
        debug!("preview selection -> {}", clone.name);
        self.selection = Some(clone);
        Ok(())
    }

    /// Park the rig at a fixed diagonal standoff and size the zoom so the
    /// body's silhouette fits the viewport with some padding.
    fn aim_at(&mut self, body: &Body) {
        let radius = body.radius as f32;
        let standoff = radius * STANDOFF_RADII;
        self.rig.set_position(-standoff, standoff, 0.0);
        self.rig.look_at(Point3::origin());

        let (width, height) = self.rig.viewport_dimensions(standoff);
        let diameter = 2.0 * radius;
        if diameter > 0.0 {
            self.rig
                .set_zoom(width.min(height) / (diameter * PADDING_FACTOR));
        }
    }

    /// Post-update pass, run after the scene tick: copy the live body's
    /// orientation onto the clone. Position is deliberately not copied.
    pub fn sync(&mut self, scene: &SceneGraph) {
        if let Some(clone) = &mut self.selection {
            if let Some(source) = scene.find(&clone.name) {
                clone.orientation = source.orientation;
            }
        }
    }

    /// Per-tick camera refresh for the preview render pass.
    pub fn update(&mut self) {
        self.rig.update();
    }
}
