use kiss3d::camera::Camera;
use kiss3d::renderer::{LineRenderer, Renderer};
use nalgebra::{Matrix4, Point3, Unit, Vector3};

use self::outline_renderer::OutlineRenderer;
use self::utils::{circle_iter, draw_path};
use crate::math::geometry::perpendicular_vector;
use crate::render::{draw_outlined, Outline};

mod flat_renderer;
mod outline_renderer;
mod utils;

pub use flat_renderer::FlatRenderer;

pub struct CompoundRenderer {
    outline_renderer: OutlineRenderer,
    line_renderer: LineRenderer,
}

impl CompoundRenderer {
    pub fn new() -> Self {
        CompoundRenderer {
            outline_renderer: OutlineRenderer::new(),
            line_renderer: LineRenderer::new(),
        }
    }

    /// Runs the outline protocol for a body. The body itself is a scene node,
    /// so only the silhouette ends up in this renderer.
    pub fn draw_body_outline(&mut self, radius: f32, model: &Matrix4<f32>, outline: Option<&Outline>) {
        draw_outlined(&mut self.outline_renderer, &radius, model, outline);
    }

    /// The circle a body sweeps around its parent.
    pub fn draw_orbit(
        &mut self,
        center: Point3<f32>,
        axis: &Unit<Vector3<f32>>,
        radius: f32,
        color: Point3<f32>,
    ) {
        let x_vec = perpendicular_vector(axis).into_inner();
        let y_vec = axis.cross(&x_vec);
        draw_path(
            &mut self.line_renderer,
            circle_iter(center, x_vec, y_vec, radius, 180),
            &color,
        );
    }

    pub fn draw_axes(&mut self, length: f32) {
        let axes = [
            (Vector3::x(), Point3::new(1.0, 0.0, 0.0)),
            (Vector3::y(), Point3::new(0.0, 1.0, 0.0)),
            (Vector3::z(), Point3::new(0.0, 0.0, 1.0)),
        ];
        for (v, color) in axes.iter() {
            self.line_renderer
                .draw_line(Point3::origin(), Point3::from(v * length), *color);
        }
    }
}

impl Renderer for CompoundRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        self.outline_renderer.render(pass, camera);
        self.line_renderer.render(pass, camera);
    }
}
