use std::path::PathBuf;

use clap::Parser;
use simple_logger::SimpleLogger;

use orrery_sandbox::file::read_scene;

#[derive(Debug, Parser)]
#[clap(about = "Print what a scene file says about a body")]
struct Args {
    name: String,
    #[clap(long, default_value = "scenes/solar-system.txt")]
    scene: PathBuf,
}

fn main() -> orrery_sandbox::Result<()> {
    if SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .init()
        .is_err()
    {
        println!("Failed to init logger");
    }

    let args = Args::parse();

    let orrery = read_scene(&args.scene, true)?;
    let id = orrery
        .find_body(&args.name)
        .ok_or_else(|| orrery_sandbox::Error::UnknownBody(args.name.clone()))?;
    let body = orrery.get_body(id);
    let motion = &body.motion;

    println!("Characteristics of {}", body.info.name);
    match body.parent_id() {
        Some(parent) => println!("- Orbits: {}", orrery.get_body(parent).info.name),
        None => println!("- Orbits: nothing"),
    }
    println!("- Generation: {}", orrery.generation(id));
    println!(
        "- Update slot: {}",
        orrery.update_order().iter().position(|&x| x == id).unwrap_or(0)
    );
    println!("- Orbit radius: {}", motion.orbit_radius);
    println!("- Orbit speed: {} deg/s", motion.orbit_speed.to_degrees());
    println!("- Orbit axis: {:?}", motion.orbit_axis.as_ref());
    println!("- Spin speed: {} deg/s", motion.spin_speed.to_degrees());
    println!("- Spin axis: {:?}", motion.spin_axis.as_ref());
    println!("- Scale: {}", body.info.scale);
    println!("- Emits light: {}", body.info.emits_light);
    if let Some(outline) = body.info.outline {
        println!("- Outline: {:?}", outline);
    }
    Ok(())
}
