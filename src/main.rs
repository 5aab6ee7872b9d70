use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;

use solar_perspective::gui::Simulation;

/// Interactive solar-system visualizer.
///
/// WASD/Space/Ctrl fly the camera, drag to look, scroll to zoom, R resets.
/// Q/E cycle the previewed body; F/L/X toggle focus, look-at and axes.
#[derive(Parser)]
struct Args {
    /// Simulated seconds advanced per rendered frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    timestep: f64,

    /// Start with the simulation paused
    #[arg(long)]
    paused: bool,

    /// Hide the per-body debug axes at startup
    #[arg(long)]
    no_axes: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut window = Window::new("Solar Perspective");
    window.set_light(Light::StickToCamera);

    let simulation = Simulation::new(&mut window, args.timestep, args.paused, !args.no_axes);
    window.render_loop(simulation);
}
