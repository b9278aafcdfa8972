use std::path::PathBuf;

use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use simple_logger::SimpleLogger;

use orrery_sandbox::file::read_scene;
use orrery_sandbox::gui::Simulation;

#[derive(Debug, Parser)]
#[clap(about = "Animated solar system of orbiting and spinning bodies")]
struct Args {
    /// Scene file to load
    #[clap(default_value = "scenes/solar-system.txt")]
    scene: PathBuf,
    /// Turn the other way round (bodies turn clockwise by default)
    #[clap(long)]
    counter_clockwise: bool,
    /// Simulated seconds per real second
    #[clap(long, default_value_t = 1.0)]
    time_scale: f32,
    /// Start with the star outlines hidden
    #[clap(long)]
    no_outlines: bool,
    #[clap(long, default_value_t = 1280)]
    width: u32,
    #[clap(long, default_value_t = 960)]
    height: u32,
}

fn main() {
    if SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .is_err()
    {
        println!("Failed to init logger");
    }

    let args = Args::parse();

    let orrery = match read_scene(&args.scene, !args.counter_clockwise) {
        Ok(orrery) => orrery,
        Err(e) => {
            log::error!("Couldn't load {}: {}", args.scene.display(), e);
            std::process::exit(1);
        }
    };

    let mut window = Window::new_with_size("Solar System", args.width, args.height);
    window.set_light(Light::StickToCamera);
    window.set_background_color(0.02, 0.02, 0.05);

    let simulation = Simulation::new(orrery, &mut window, args.time_scale, !args.no_outlines);
    window.render_loop(simulation);
}
