use kiss3d::camera::Camera;
use kiss3d::event::{Action, Key, MouseButton, WindowEvent};
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use log::warn;
use nalgebra::{Isometry3, Matrix4, Point3, Vector2};

use crate::rig::{CameraRig, MoveAxis, DEFAULT_MOVEMENT_SPEED};

const KEY_MOVE_FORWARD: Key = Key::W;
const KEY_MOVE_BACK: Key = Key::S;
const KEY_MOVE_LEFT: Key = Key::A;
const KEY_MOVE_RIGHT: Key = Key::D;
const KEY_MOVE_UP: Key = Key::Space;
const KEY_MOVE_DOWN: Key = Key::LControl;
const KEY_SPEED_UP: Key = Key::Equals;
const KEY_SPEED_DOWN: Key = Key::Minus;
const KEY_SPEED_RESET: Key = Key::Key0;
const KEY_CAMERA_RESET: Key = Key::R;

// The user-driven viewpoint: a free-fly CameraRig plus the window-event
// plumbing that feeds its command surface. kiss3d hands us raw events; the
// rig only ever sees commands, and commands take effect at the next
// update, never mid-tick.
pub struct UserCamera {
    rig: CameraRig,
    last_cursor: Vector2<f32>,
}

impl UserCamera {
    pub fn new(fov_y: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        UserCamera {
            rig: CameraRig::perspective(fov_y, aspect, znear, zfar),
            last_cursor: Vector2::zeros(),
        }
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }
}

impl Camera for UserCamera {
    fn handle_event(&mut self, canvas: &Canvas, event: &WindowEvent) {
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                let curr = Vector2::new(x as f32, y as f32);
                if canvas.get_mouse_button(MouseButton::Button1) == Action::Press {
                    let dpos = curr - self.last_cursor;
                    self.rig.drag_look(dpos.x, dpos.y);
                }
                self.last_cursor = curr;
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Press, _) => {
                self.rig.begin_look();
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Release, _) => {
                self.rig.end_look();
            }
            WindowEvent::Scroll(_, off, _) => {
                if off != 0.0 {
                    self.rig.scroll_impulse(off.signum() as f32);
                }
            }
            WindowEvent::FramebufferSize(w, h) => {
                self.rig.set_aspect(w as f32 / h as f32);
            }
            WindowEvent::Key(key, Action::Press, _) => match key {
                KEY_MOVE_FORWARD => self.rig.push_move(MoveAxis::Forward, 1.0),
                KEY_MOVE_BACK => self.rig.push_move(MoveAxis::Forward, -1.0),
                KEY_MOVE_LEFT => self.rig.push_move(MoveAxis::Right, -1.0),
                KEY_MOVE_RIGHT => self.rig.push_move(MoveAxis::Right, 1.0),
                KEY_MOVE_UP => self.rig.push_move(MoveAxis::Up, 1.0),
                KEY_MOVE_DOWN => self.rig.push_move(MoveAxis::Up, -1.0),
                KEY_SPEED_UP => self.rig.adjust_speed(DEFAULT_MOVEMENT_SPEED),
                KEY_SPEED_DOWN => self.rig.adjust_speed(-DEFAULT_MOVEMENT_SPEED),
                KEY_SPEED_RESET => self.rig.reset_speed(),
                KEY_CAMERA_RESET => {
                    if let Err(e) = self.rig.reset() {
                        warn!("camera reset rejected: {}", e);
                    }
                }
                _ => {}
            },
            WindowEvent::Key(key, Action::Release, _) => match key {
                KEY_MOVE_FORWARD | KEY_MOVE_BACK => self.rig.release_move(MoveAxis::Forward),
                KEY_MOVE_LEFT | KEY_MOVE_RIGHT => self.rig.release_move(MoveAxis::Right),
                KEY_MOVE_UP | KEY_MOVE_DOWN => self.rig.release_move(MoveAxis::Up),
                _ => {}
            },
            _ => {}
        }
    }

    fn eye(&self) -> Point3<f32> {
        self.rig.position()
    }

    fn view_transform(&self) -> Isometry3<f32> {
        self.rig.view_isometry()
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.rig.projection_matrix() * self.rig.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation().try_inverse().unwrap()
    }

    fn clip_planes(&self) -> (f32, f32) {
        self.rig.clip_planes()
    }

    fn update(&mut self, _canvas: &Canvas) {
        self.rig.update();
    }

    fn upload(
        &self,
        _pass: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.rig.projection_matrix());
        view.upload(&self.rig.view_matrix());
    }
}
