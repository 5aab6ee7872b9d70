use std::time::Instant;

use kiss3d::event::{Action, Event, Key, WindowEvent};

use super::view::View;

// Key config, all in one place. Camera movement keys live with the camera.
const KEY_PREV_SELECTION: Key = Key::Q;
const KEY_NEXT_SELECTION: Key = Key::E;
const KEY_FASTER: Key = Key::Period;
const KEY_SLOWER: Key = Key::Comma;
const KEY_TOGGLE_PAUSE: Key = Key::P;
const KEY_TOGGLE_FOCUS: Key = Key::F;
const KEY_TOGGLE_LOOK_AT: Key = Key::L;
const KEY_TOGGLE_AXES: Key = Key::X;

pub struct Controller {
    frame_rate: FrameRate,
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            frame_rate: FrameRate::new(),
        }
    }

    pub fn process_event(&mut self, event: Event, view: &mut View) {
        match event.value {
            WindowEvent::Key(KEY_NEXT_SELECTION, Action::Press, _) => {
                view.select_preview_next();
            }
            WindowEvent::Key(KEY_PREV_SELECTION, Action::Press, _) => {
                view.select_preview_prev();
            }
            WindowEvent::Key(KEY_FASTER, Action::Press, _) => {
                view.state_mut().timestep *= 2.0;
            }
            WindowEvent::Key(KEY_SLOWER, Action::Press, _) => {
                view.state_mut().timestep /= 2.0;
            }
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                let state = view.state_mut();
                state.paused = !state.paused;
            }
            WindowEvent::Key(KEY_TOGGLE_FOCUS, Action::Press, _) => {
                view.toggle_focus();
            }
            WindowEvent::Key(KEY_TOGGLE_LOOK_AT, Action::Press, _) => {
                view.toggle_look_at();
            }
            WindowEvent::Key(KEY_TOGGLE_AXES, Action::Press, _) => {
                view.toggle_axes();
            }
            _ => {}
        }
    }

    pub fn fps(&self) -> f64 {
        self.frame_rate.fps()
    }

    pub fn count_frame(&mut self) {
        self.frame_rate.count_frame();
    }
}

// Rolling frames-per-second estimate over one-second windows.
struct FrameRate {
    window_start: Instant,
    frames: u32,
    fps: f64,
}

impl FrameRate {
    fn new() -> Self {
        FrameRate {
            window_start: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn count_frame(&mut self) {
        self.frames += 1;
        let elapsed = self.window_start.elapsed();
        if elapsed.as_secs_f64() >= 1.0 {
            self.fps = self.frames as f64 / elapsed.as_secs_f64();
            self.window_start = Instant::now();
            self.frames = 0;
        }
    }

    fn fps(&self) -> f64 {
        self.fps
    }
}
