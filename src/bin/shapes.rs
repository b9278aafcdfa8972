use std::cell::RefCell;
use std::rc::Rc;

use clap::Parser;
use kiss3d::light::Light;
use kiss3d::resource::Mesh;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Point3, Translation3, UnitQuaternion, Vector3};
use simple_logger::SimpleLogger;

use orrery_sandbox::model::meshes::{bird_figure, cone_vertices, cube_vertices, surface_vertices};

#[derive(Debug, Parser)]
#[clap(about = "A gallery of generated meshes")]
struct Args {
    /// Samples along each side of the surface
    #[clap(long, default_value_t = 100, value_parser = clap::value_parser!(u16).range(2..=MAX_RESOLUTION))]
    resolution: u16,
    /// Slices around the cone
    #[clap(long, default_value_t = 25, value_parser = clap::value_parser!(u16).range(3..=MAX_SLICES))]
    slices: u16,
}

// Mesh faces index with u16, so no soup may pass 65536 vertices
const MAX_RESOLUTION: i64 = 105;
const MAX_SLICES: i64 = 1000;

// Triangle soups only; every three vertices make a face
fn add_soup(window: &mut Window, vertices: Vec<Point3<f32>>) -> SceneNode {
    let faces = (0..vertices.len() as u16 / 3)
        .map(|i| Point3::new(3 * i, 3 * i + 1, 3 * i + 2))
        .collect();
    let mesh = Mesh::new(vertices, faces, None, None, false);
    window.add_mesh(Rc::new(RefCell::new(mesh)), Vector3::new(1.0, 1.0, 1.0))
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

    let mut window = Window::new("Shapes");
    window.set_light(Light::StickToCamera);

    let surface = surface_vertices(|x, z| x.sin() * z.abs().sqrt(), 3.0, args.resolution as usize);
    log::info!("Surface has {} vertices", surface.len());
    let mut node = add_soup(&mut window, surface);
    node.set_color(0.3, 0.6, 0.9);
    node.enable_backface_culling(false);
    node.set_local_translation(Translation3::new(-8.0, 0.0, 0.0));

    let mut node = add_soup(&mut window, cone_vertices(1.5, 3.5, args.slices as usize));
    node.set_color(0.9, 0.5, 0.2);
    node.enable_backface_culling(false);

    let mut node = add_soup(&mut window, cube_vertices(2.0));
    node.set_color(0.4, 0.8, 0.4);
    node.set_local_translation(Translation3::new(5.0, 1.0, 0.0));

    let bird = bird_figure();
    let bird_points: Vec<_> = bird
        .vertices
        .iter()
        .map(|p| Point3::new(p.x, p.y, 0.0))
        .collect();
    let bird_faces: Vec<Point3<f32>> = bird
        .triangles
        .iter()
        .flat_map(|tri| tri.iter().map(|&i| bird_points[i]).collect::<Vec<_>>())
        .collect();
    let mut bird_node = add_soup(&mut window, bird_faces);
    bird_node.set_color(0.8, 0.2, 0.6);
    bird_node.enable_backface_culling(false);
    bird_node.set_local_scale(6.0, 6.0, 6.0);
    bird_node.set_local_translation(Translation3::new(0.0, 5.0, 0.0));
    // Outline the bird slightly in front of its faces
    let to_world = |p: Point3<f32>| p * 6.0 + Vector3::new(0.0, 5.0, 0.01);
    let bird_edges: Vec<_> = bird
        .edges
        .iter()
        .map(|&[a, b]| (to_world(bird_points[a]), to_world(bird_points[b])))
        .collect();

    let spin = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.01);
    while window.render() {
        node.prepend_to_local_rotation(&spin);
        for (a, b) in bird_edges.iter() {
            window.draw_line(a, b, &Point3::new(0.0, 0.0, 0.0));
        }
    }
}
