use kiss3d::camera::Camera;
use kiss3d::renderer::{LineRenderer, Renderer};
use nalgebra::{Matrix4, Point3, Vector3};

use super::utils::{circle_iter, draw_path};
use crate::render::{Shading, StencilFunc, StencilTarget};

struct RingData {
    center: Point3<f32>,
    radius: f32,
    color: Point3<f32>,
}

// kiss3d gives us no stencil buffer, so this target only acts on the flat
// silhouette pass: it turns it into a camera-facing ring as wide as the
// enlarged body. The lit pass is the body's own scene node, which kiss3d
// draws by itself.
pub struct OutlineRenderer {
    line_renderer: LineRenderer,
    rings: Vec<RingData>,
}

impl OutlineRenderer {
    pub fn new() -> Self {
        OutlineRenderer {
            line_renderer: LineRenderer::new(),
            rings: vec![],
        }
    }

    fn load_ring_into_renderer(
        line_renderer: &mut LineRenderer,
        camera: &dyn Camera,
        ring: &RingData,
    ) {
        // Transform the screen x and y vectors into world space
        let camera_transform = camera.view_transform().inverse();
        let x_vec = camera_transform.transform_vector(&Vector3::x()).normalize();
        let y_vec = camera_transform.transform_vector(&Vector3::y()).normalize();

        draw_path(
            line_renderer,
            circle_iter(ring.center, x_vec, y_vec, ring.radius, 100),
            &ring.color,
        );
    }
}

impl StencilTarget for OutlineRenderer {
    /// Radius of the unscaled body mesh
    type Mesh = f32;

    fn stencil_func(&mut self, _func: StencilFunc, _reference: u8) {}

    fn stencil_mask(&mut self, _mask: u8) {}

    fn clear_stencil(&mut self) {}

    fn draw(&mut self, radius: &f32, model: &Matrix4<f32>, shading: Shading) {
        let color = match shading {
            Shading::Flat(color) => color,
            Shading::Lit => return,
        };

        let center = Point3::from(model.column(3).xyz());
        let scale = model.column(0).xyz().norm();
        self.rings.push(RingData {
            center,
            radius: radius * scale,
            color,
        });
    }
}

impl Renderer for OutlineRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        for ring in self.rings.iter() {
            OutlineRenderer::load_ring_into_renderer(&mut self.line_renderer, camera, ring);
        }
        self.line_renderer.render(pass, camera);
        self.rings.clear();
    }
}
