//! The camera rig: a movable viewpoint with free-fly movement, pitch/yaw
//! orientation, zoom, and an origin-reset cycle. Input sources talk to it
//! through a small command surface (push/release movement, drag-look,
//! scroll impulses); the rig itself never sees window events.

use std::time::{Duration, Instant};

use nalgebra::{Isometry3, Matrix4, Orthographic3, Perspective3, Point3, Vector3};

use crate::error::SimError;

pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 0.05;
pub const DEFAULT_MOVEMENT_SPEED: f32 = 2.0;
pub const DEFAULT_MOVEMENT_STEP: f32 = 2.0;
pub const SCROLL_ZOOM_FACTOR: f32 = 8.0;

// A scroll impulse self-clears after this long, regardless of frame rate.
const SCROLL_DECAY: Duration = Duration::from_millis(100);

/// Which projection formula the rig uses. Only `viewport_dimensions` and
/// the projection matrix dispatch on this; everything else is shared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionKind {
    Perspective { fov_y: f32, aspect: f32 },
    Orthographic { left: f32, right: f32, bottom: f32, top: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAxis {
    Forward,
    Right,
    Up,
}

#[derive(Debug, Clone, Copy)]
pub struct Movement {
    pub forward: f32,
    pub right: f32,
    pub up: f32,
    pub speed: f32,
}

impl Movement {
    fn any(&self) -> bool {
        self.forward != 0.0 || self.right != 0.0 || self.up != 0.0
    }
}

#[derive(Debug, Clone, Copy)]
struct RigDefaults {
    zoom: f32,
    pitch: f32,
    yaw: f32,
    speed: f32,
}

/// Snapshot returned by `update()`; consumers that used to listen for an
/// "update" event read this instead.
#[derive(Debug, Clone, Copy)]
pub struct RigUpdate {
    pub position: Point3<f32>,
    pub pitch: f32,
    pub yaw: f32,
}

/// Before/after record of a translation step.
#[derive(Debug, Clone, Copy)]
pub struct Moved {
    pub from: Point3<f32>,
    pub to: Point3<f32>,
}

pub struct CameraRig {
    projection_kind: ProjectionKind,
    znear: f32,
    zfar: f32,
    projection: Matrix4<f32>,
    projection_dirty: bool,

    position: Point3<f32>,
    // Orientation, in degrees (matching the mouse-sensitivity units).
    pitch: f32,
    yaw: f32,
    zoom: f32,

    movement: Movement,
    sensitivity: f32,

    origin: Option<Point3<f32>>,
    origin_dirty: bool,
    scroll_deadline: Option<Instant>,

    locked: bool,
    moving: bool,
    looking: bool,

    defaults: RigDefaults,
}

/// Spherical-to-Cartesian look direction for a pitch/yaw pair in degrees.
fn look_direction(pitch: f32, yaw: f32) -> Vector3<f32> {
    let pitch = pitch.to_radians();
    let yaw = yaw.to_radians();
    Vector3::new(
        pitch.cos() * yaw.cos(),
        pitch.sin(),
        pitch.cos() * yaw.sin(),
    )
}

impl CameraRig {
    pub fn perspective(fov_y: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        Self::new(ProjectionKind::Perspective { fov_y, aspect }, znear, zfar)
    }

    pub fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        znear: f32,
        zfar: f32,
    ) -> Self {
        Self::new(
            ProjectionKind::Orthographic {
                left,
                right,
                bottom,
                top,
            },
            znear,
            zfar,
        )
    }

    fn new(projection_kind: ProjectionKind, znear: f32, zfar: f32) -> Self {
        let mut rig = CameraRig {
            projection_kind,
            znear,
            zfar,
            projection: Matrix4::identity(),
            projection_dirty: true,
            position: Point3::origin(),
            pitch: 0.0,
            yaw: 0.0,
            zoom: 1.0,
            movement: Movement {
                forward: 0.0,
                right: 0.0,
                up: 0.0,
                speed: DEFAULT_MOVEMENT_SPEED,
            },
            sensitivity: DEFAULT_MOUSE_SENSITIVITY,
            origin: None,
            origin_dirty: false,
            scroll_deadline: None,
            locked: false,
            moving: false,
            looking: false,
            defaults: RigDefaults {
                zoom: 1.0,
                pitch: 0.0,
                yaw: 0.0,
                speed: DEFAULT_MOVEMENT_SPEED,
            },
        };
        rig.refresh_projection();
        rig
    }

    // ---- accessors ----

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn movement(&self) -> Movement {
        self.movement
    }

    pub fn projection_kind(&self) -> ProjectionKind {
        self.projection_kind
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_looking(&self) -> bool {
        self.looking
    }

    pub fn lock(&mut self, value: bool) {
        self.locked = value;
    }

    // ---- configuration ----

    /// Where `reset()` snaps back to. All three coordinates are required
    /// and must be finite; there is no safe default for a reset target.
    pub fn set_origin(&mut self, x: f32, y: f32, z: f32) -> Result<(), SimError> {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(SimError::InvalidArgument(
                "set_origin: coordinate is missing or not finite",
            ));
        }
        self.origin = Some(Point3::new(x, y, z));
        self.origin_dirty = true;
        Ok(())
    }

    pub fn set_default_roll(&mut self, pitch: f32, yaw: f32) {
        self.defaults.pitch = pitch;
        self.defaults.yaw = yaw;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if let ProjectionKind::Perspective { aspect: a, .. } = &mut self.projection_kind {
            *a = aspect;
            self.projection_dirty = true;
        }
    }

    /// Restore the origin position and the stored default snapshot of
    /// zoom, orientation and speed.
    pub fn reset(&mut self) -> Result<(), SimError> {
        let origin = self.origin.ok_or(SimError::OriginUndefined)?;
        self.position = origin;
        self.origin_dirty = false;
        self.movement.speed = self.defaults.speed;
        self.zoom = self.defaults.zoom;
        // The default look direction applies even while locked.
        self.pitch = self.defaults.pitch;
        self.yaw = self.defaults.yaw;
        self.projection_dirty = true;
        Ok(())
    }

    // ---- orientation and translation ----

    /// Re-aim from a pitch/yaw pair. Suppressed entirely while locked.
    pub fn roll(&mut self, pitch: f32, yaw: f32) {
        if self.locked {
            return;
        }
        self.pitch = pitch;
        self.yaw = yaw;
    }

    /// Aim at a world-space point, deriving the equivalent pitch/yaw.
    pub fn look_at(&mut self, target: Point3<f32>) {
        let dir = target - self.position;
        if dir.norm_squared() == 0.0 {
            return;
        }
        let dir = dir.normalize();
        self.pitch = dir.y.asin().to_degrees();
        self.yaw = dir.z.atan2(dir.x).to_degrees();
    }

    /// Translate along the current world-space basis. Zero components
    /// contribute nothing; the summed direction is scaled by `speed`.
    pub fn move_by(&mut self, forward: f32, right: f32, up: f32, speed: f32) -> Moved {
        let from = self.position;

        let fwd = look_direction(self.pitch, self.yaw);
        let world_up = Vector3::y();
        // Degenerate when looking straight up or down; any horizontal
        // direction serves as "right" there.
        let rgt = fwd
            .cross(&world_up)
            .try_normalize(1e-6)
            .unwrap_or_else(Vector3::z);

        let mut delta = Vector3::zeros();
        if forward != 0.0 {
            delta += fwd * forward;
        }
        if right != 0.0 {
            delta += rgt * right;
        }
        if up != 0.0 {
            delta += world_up * up;
        }
        self.position += delta * speed;

        Moved {
            from,
            to: self.position,
        }
    }

    pub fn set_zoom(&mut self, factor: f32) {
        self.zoom = if factor.is_finite() {
            factor.max(1e-3)
        } else {
            1.0
        };
        self.projection_dirty = true;
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Point3::new(x, y, z);
    }

    pub fn set_rotation(&mut self, pitch: f32, yaw: f32) {
        self.pitch = pitch;
        self.yaw = yaw;
    }

    /// Visible width/height of the frustum. Perspective rigs need to know
    /// at what distance; orthographic extents are fixed, so the argument
    /// is ignored.
    pub fn viewport_dimensions(&self, distance: f32) -> (f32, f32) {
        match self.projection_kind {
            ProjectionKind::Perspective { fov_y, aspect } => {
                let height = 2.0 * distance * (fov_y.to_radians() / 2.0).tan();
                (height * aspect, height)
            }
            ProjectionKind::Orthographic {
                left,
                right,
                bottom,
                top,
            } => (right - left, top - bottom),
        }
    }

    // ---- input command surface ----

    pub fn push_move(&mut self, axis: MoveAxis, dir: f32) {
        let value = dir * DEFAULT_MOVEMENT_STEP;
        match axis {
            MoveAxis::Forward => self.movement.forward = value,
            MoveAxis::Right => self.movement.right = value,
            MoveAxis::Up => self.movement.up = value,
        }
        self.moving = true;
    }

    pub fn release_move(&mut self, axis: MoveAxis) {
        match axis {
            MoveAxis::Forward => self.movement.forward = 0.0,
            MoveAxis::Right => self.movement.right = 0.0,
            MoveAxis::Up => self.movement.up = 0.0,
        }
        self.moving = self.movement.any();
    }

    pub fn adjust_speed(&mut self, delta: f32) {
        self.movement.speed = (self.movement.speed + delta).max(0.0);
    }

    pub fn reset_speed(&mut self) {
        self.movement.speed = self.defaults.speed;
    }

    pub fn begin_look(&mut self) {
        self.looking = true;
    }

    pub fn end_look(&mut self) {
        self.looking = false;
    }

    /// Mouse-drag delta in pixels; only effective mid-drag.
    pub fn drag_look(&mut self, dx: f32, dy: f32) {
        if !self.looking {
            return;
        }
        let yaw = self.yaw + dx * self.sensitivity;
        let pitch = self.pitch - dy * self.sensitivity;
        self.roll(pitch, yaw);
    }

    /// One scroll-wheel notch: a forward impulse normalized against the
    /// current speed, auto-cleared ~100ms later.
    pub fn scroll_impulse(&mut self, dir: f32) {
        let normalized = DEFAULT_MOVEMENT_SPEED
            / (self.movement.speed.powi(2) + DEFAULT_MOVEMENT_SPEED.powi(2)).sqrt();
        self.movement.forward = dir * DEFAULT_MOVEMENT_STEP * normalized * SCROLL_ZOOM_FACTOR;
        self.moving = true;
        self.scroll_deadline = Some(Instant::now() + SCROLL_DECAY);
    }

    fn expire_scroll(&mut self) {
        if let Some(deadline) = self.scroll_deadline {
            if Instant::now() >= deadline {
                self.movement.forward = 0.0;
                self.scroll_deadline = None;
                self.moving = self.movement.any();
            }
        }
    }

    // ---- per-tick update ----

    /// One camera tick. Exactly one of snap-to-origin / movement happens,
    /// then the cached projection is refreshed if anything invalidated it.
    pub fn update(&mut self) -> RigUpdate {
        self.expire_scroll();

        if self.origin_dirty {
            if let Some(origin) = self.origin {
                self.position = origin;
            }
            self.origin_dirty = false;
        } else if !self.locked && self.moving {
            let m = self.movement;
            self.move_by(m.forward, m.right, m.up, m.speed);
        }

        if self.projection_dirty {
            self.refresh_projection();
        }

        RigUpdate {
            position: self.position,
            pitch: self.pitch,
            yaw: self.yaw,
        }
    }

    fn refresh_projection(&mut self) {
        self.projection = match self.projection_kind {
            ProjectionKind::Perspective { fov_y, aspect } => {
                // Zoom narrows the effective field of view.
                let fov = 2.0 * ((fov_y.to_radians() / 2.0).tan() / self.zoom).atan();
                Perspective3::new(aspect, fov, self.znear, self.zfar).into_inner()
            }
            ProjectionKind::Orthographic {
                left,
                right,
                bottom,
                top,
            } => Orthographic3::new(
                left / self.zoom,
                right / self.zoom,
                bottom / self.zoom,
                top / self.zoom,
                self.znear,
                self.zfar,
            )
            .into_inner(),
        };
        self.projection_dirty = false;
    }

    // ---- matrices for the renderer ----

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view_isometry(&self) -> Isometry3<f32> {
        let target = self.position + look_direction(self.pitch, self.yaw);
        Isometry3::look_at_rh(&self.position, &target, &Vector3::y())
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_isometry().to_homogeneous()
    }

    pub fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn rig() -> CameraRig {
        CameraRig::perspective(50.0, 16.0 / 9.0, 1.0, 1e9)
    }

    #[test]
    fn reset_without_origin_fails() {
        let mut rig = rig();
        assert_eq!(rig.reset().unwrap_err(), SimError::OriginUndefined);
    }

    #[test]
    fn reset_restores_origin_and_defaults() {
        let mut rig = rig();
        rig.set_origin(-6000.0, 5000.0, 0.0).unwrap();
        rig.set_default_roll(-45.0, 0.0);
        rig.set_zoom(4.0);
        rig.adjust_speed(10.0);
        rig.roll(30.0, 90.0);
        rig.set_position(1.0, 2.0, 3.0);

        rig.reset().unwrap();
        assert_eq!(rig.position(), Point3::new(-6000.0, 5000.0, 0.0));
        assert_eq!(rig.pitch(), -45.0);
        assert_eq!(rig.yaw(), 0.0);
        assert_eq!(rig.zoom(), 1.0);
        assert_eq!(rig.movement().speed, DEFAULT_MOVEMENT_SPEED);
    }

    #[test]
    fn set_origin_rejects_non_finite_and_leaves_state_alone() {
        let mut rig = rig();
        let err = rig.set_origin(f32::NAN, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
        // Still no origin: reset must keep failing.
        assert_eq!(rig.reset().unwrap_err(), SimError::OriginUndefined);
    }

    #[test]
    fn origin_snap_happens_on_next_update() {
        let mut rig = rig();
        rig.set_origin(1.0, 2.0, 3.0).unwrap();
        assert_eq!(rig.position(), Point3::origin());
        rig.update();
        assert_eq!(rig.position(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn origin_snap_preempts_movement_for_one_tick() {
        let mut rig = rig();
        rig.push_move(MoveAxis::Forward, 1.0);
        rig.set_origin(5.0, 0.0, 0.0).unwrap();
        rig.update();
        // Snap only; the pending movement must not have fired this tick.
        assert_eq!(rig.position(), Point3::new(5.0, 0.0, 0.0));
        rig.update();
        assert!(rig.position().x > 5.0);
    }

    #[test]
    fn roll_is_suppressed_while_locked() {
        let mut rig = rig();
        rig.lock(true);
        rig.roll(10.0, 20.0);
        assert_eq!((rig.pitch(), rig.yaw()), (0.0, 0.0));
        rig.lock(false);
        rig.roll(10.0, 20.0);
        assert_eq!((rig.pitch(), rig.yaw()), (10.0, 20.0));
    }

    #[test]
    fn locked_rig_does_not_translate() {
        let mut rig = rig();
        rig.push_move(MoveAxis::Forward, 1.0);
        rig.lock(true);
        rig.update();
        assert_eq!(rig.position(), Point3::origin());
    }

    #[test]
    fn move_by_uses_the_look_basis() {
        let mut rig = rig();
        // Default orientation looks down +x.
        let moved = rig.move_by(1.0, 0.0, 0.0, 2.0);
        assert_eq!(moved.from, Point3::origin());
        assert_relative_eq!(rig.position().x, 2.0, max_relative = 1e-6);
        assert_abs_diff_eq!(rig.position().y, 0.0, epsilon = 1e-6);

        // Strafing right from a +x heading goes toward +z (fwd × up).
        rig.move_by(0.0, 1.0, 0.0, 2.0);
        assert_relative_eq!(rig.position().z, 2.0, max_relative = 1e-6);

        rig.move_by(0.0, 0.0, 1.0, 3.0);
        assert_relative_eq!(rig.position().y, 3.0, max_relative = 1e-6);
    }

    #[test]
    fn look_at_derives_pitch_and_yaw() {
        let mut rig = rig();
        rig.look_at(Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(rig.pitch(), 90.0, max_relative = 1e-4);

        rig.set_position(0.0, 0.0, 0.0);
        rig.look_at(Point3::new(0.0, 0.0, 5.0));
        assert_relative_eq!(rig.yaw(), 90.0, max_relative = 1e-4);
    }

    #[test]
    fn drag_look_requires_active_drag() {
        let mut rig = rig();
        rig.drag_look(100.0, 0.0);
        assert_eq!(rig.yaw(), 0.0);
        rig.begin_look();
        rig.drag_look(100.0, 0.0);
        assert_relative_eq!(rig.yaw(), 100.0 * DEFAULT_MOUSE_SENSITIVITY);
        rig.end_look();
        rig.drag_look(100.0, 0.0);
        assert_relative_eq!(rig.yaw(), 100.0 * DEFAULT_MOUSE_SENSITIVITY);
    }

    #[test]
    fn release_clears_only_its_axis() {
        let mut rig = rig();
        rig.push_move(MoveAxis::Forward, 1.0);
        rig.push_move(MoveAxis::Up, -1.0);
        rig.release_move(MoveAxis::Forward);
        assert!(rig.is_moving());
        rig.release_move(MoveAxis::Up);
        assert!(!rig.is_moving());
    }

    #[test]
    fn scroll_impulse_decays_on_its_own() {
        let mut rig = rig();
        rig.scroll_impulse(1.0);
        assert!(rig.is_moving());
        assert!(rig.movement().forward > 0.0);

        std::thread::sleep(Duration::from_millis(120));
        rig.update();
        assert!(!rig.is_moving());
        assert_eq!(rig.movement().forward, 0.0);
    }

    #[test]
    fn viewport_dimensions_by_projection_kind() {
        let rig = CameraRig::perspective(90.0, 2.0, 0.1, 100.0);
        let (w, h) = rig.viewport_dimensions(10.0);
        assert_relative_eq!(h, 20.0, max_relative = 1e-5);
        assert_relative_eq!(w, 40.0, max_relative = 1e-5);

        let ortho = CameraRig::orthographic(-2.0, 2.0, -1.0, 1.0, 0.1, 100.0);
        assert_eq!(ortho.viewport_dimensions(123.0), (4.0, 2.0));
    }
}
