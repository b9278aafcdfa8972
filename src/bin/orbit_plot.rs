use std::path::PathBuf;

use clap::Parser;
use plotters::prelude::*;
use simple_logger::SimpleLogger;

use orrery_sandbox::file::read_scene;
use orrery_sandbox::model::orrery::Orrery;

#[derive(Debug, Parser)]
#[clap(about = "Plot the paths of every body, seen from above")]
struct Args {
    #[clap(default_value = "scenes/solar-system.txt")]
    scene: PathBuf,
    #[clap(long, default_value = "plots/orbits.png")]
    output: PathBuf,
    /// Simulated seconds to trace
    #[clap(long, default_value_t = 30.0)]
    duration: f32,
    #[clap(long, default_value_t = 1500)]
    steps: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .is_err()
    {
        println!("Failed to init logger");
    }

    let args = Args::parse();
    let mut orrery = read_scene(&args.scene, true)?;
    let paths = trace_paths(&mut orrery, args.duration, args.steps)?;

    if let Some(dir) = args.output.parent() {
        std::fs::create_dir_all(dir)?;
    }
    draw_plot(&args.output, &orrery, &paths)?;
    log::info!("Wrote {}", args.output.display());
    Ok(())
}

/// Samples every body's (x, z) position over time.
fn trace_paths(
    orrery: &mut Orrery,
    duration: f32,
    steps: usize,
) -> orrery_sandbox::Result<Vec<Vec<(f32, f32)>>> {
    let mut paths = vec![Vec::with_capacity(steps + 1); orrery.num_bodies()];
    for i in 0..=steps {
        orrery.update(duration * i as f32 / steps.max(1) as f32)?;
        for body in orrery.bodies() {
            let p = body.position();
            paths[body.id.0].push((p.x, p.z));
        }
    }
    Ok(paths)
}

fn draw_plot(
    name: &PathBuf,
    orrery: &Orrery,
    paths: &[Vec<(f32, f32)>],
) -> Result<(), Box<dyn std::error::Error>> {
    // Square extent around everything
    let extent = paths
        .iter()
        .flatten()
        .fold(1.0f32, |acc, &(x, z)| acc.max(x.abs()).max(z.abs()))
        * 1.1;

    let root = BitMapBackend::new(name, (800, 800)).into_drawing_area();
    root.fill(&BLACK)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(-extent..extent, -extent..extent)?;

    chart
        .configure_mesh()
        .axis_style(&WHITE)
        .label_style(("sans-serif", 12).into_font().color(&WHITE))
        .light_line_style(&BLACK)
        .draw()?;

    for (body, path) in orrery.bodies().zip(paths.iter()) {
        let c = body.info.color;
        let color = RGBColor(
            (c.x * 255.0) as u8,
            (c.y * 255.0) as u8,
            (c.z * 255.0) as u8,
        );
        chart.draw_series(LineSeries::new(path.iter().copied(), &color))?;
    }

    Ok(())
}
