use clap::Parser;
use kiss3d::window::Window;
use simple_logger::SimpleLogger;

use orrery_sandbox::gui::Sandbox;

#[derive(Debug, Parser)]
#[clap(about = "Drag a trochoid around a grid with a custom affine basis")]
struct Args {
    #[clap(long, default_value_t = 1280)]
    width: u32,
    #[clap(long, default_value_t = 1200)]
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

    let mut window = Window::new_with_size("Affine Sandbox", args.width, args.height);
    window.set_background_color(1.0, 1.0, 1.0);

    let sandbox = Sandbox::new(&mut window);
    window.render_loop(sandbox);
}
