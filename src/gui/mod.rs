use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use self::controller::Controller;
use self::view::View;

mod camera;
mod controller;
pub mod state;
mod view;

pub struct Simulation {
    view: View,
    controller: Controller,
}

impl Simulation {
    pub fn new(window: &mut Window, timestep: f64, paused: bool, show_axes: bool) -> Self {
        let mut view = View::new(window, timestep, paused);
        view.show_all_axes(show_axes);
        Self {
            view,
            controller: Controller::new(),
        }
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            self.controller.process_event(event, &mut self.view);
        }
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    // Fixed per-frame order: input, scene tick, preview camera tick, then
    // the draw-pass extras. kiss3d updates the primary camera during the
    // render that follows.
    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());
        if !self.view.state().paused {
            let dt = self.view.state().timestep;
            self.view.advance(dt);
        }
        self.view.preview_update();
        self.view.prerender(window, self.controller.fps());
        self.controller.count_frame();
    }
}
