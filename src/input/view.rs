use nalgebra::{Matrix4, Point2, Vector2, Vector3};

use crate::math::transform2d::{linear_determinant, transform_point2, DEGENERATE_DETERMINANT};

const MIN_PIXELS_PER_UNIT: f32 = 10.0;
const MAX_PIXELS_PER_UNIT: f32 = 200.0;

/// Maps grid coordinates to window pixels: scale by `pixels_per_unit`, then
/// shift by `origin`. Pixels are measured from the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub origin: Vector2<f32>,
    pub pixels_per_unit: f32,
    pub width: u32,
    pub height: u32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        ViewTransform {
            origin: Vector2::new(150.0, 150.0),
            pixels_per_unit: 50.0,
            width: 1280,
            height: 1200,
        }
    }
}

impl ViewTransform {
    /// Grid space (optionally preceded by a custom basis) to pixel space.
    pub fn forward(&self, basis: Option<&Matrix4<f32>>) -> Matrix4<f32> {
        let move_origin = Matrix4::new_translation(&Vector3::new(self.origin.x, self.origin.y, 0.0));
        let scale_to_pixels = Matrix4::new_nonuniform_scaling(&Vector3::new(
            self.pixels_per_unit,
            self.pixels_per_unit,
            1.0,
        ));
        let view = move_origin * scale_to_pixels;
        match basis {
            Some(basis) => view * basis,
            None => view,
        }
    }

    /// Orthographic projection from bottom-left pixels to clip space.
    pub fn projection(&self) -> Matrix4<f32> {
        Matrix4::new_orthographic(0.0, self.width as f32, 0.0, self.height as f32, -1.0, 1.0)
    }

    /// Flips a window-system cursor position (origin top-left) into our
    /// bottom-left pixel convention.
    pub fn flip_y(&self, screen: &Point2<f32>) -> Point2<f32> {
        Point2::new(screen.x, self.height as f32 - screen.y)
    }

    /// Converts a cursor position to world coordinates. Returns `None` when the
    /// forward transform can't be inverted (for example, a degenerate basis).
    pub fn screen_to_world(
        &self,
        screen: &Point2<f32>,
        basis: Option<&Matrix4<f32>>,
    ) -> Option<Point2<f32>> {
        // The view part never collapses, so only the basis is tested, unscaled
        if let Some(basis) = basis {
            if linear_determinant(basis).abs() < DEGENERATE_DETERMINANT {
                return None;
            }
        }
        let inverse = self.forward(basis).try_inverse()?;
        let world = transform_point2(&inverse, &self.flip_y(screen));
        if world.coords.iter().all(|c| c.is_finite()) {
            Some(world)
        } else {
            None
        }
    }

    /// The inverse of `screen_to_world`, landing in window-system coordinates.
    pub fn world_to_screen(&self, world: &Point2<f32>, basis: Option<&Matrix4<f32>>) -> Point2<f32> {
        let pixel = transform_point2(&self.forward(basis), world);
        self.flip_y(&pixel)
    }

    /// Pick tolerance in world units; shrinks as you zoom in.
    pub fn pick_radius(&self, radius_pixels: f32) -> f32 {
        radius_pixels / self.pixels_per_unit
    }

    pub fn pan_by(&mut self, screen_delta: &Vector2<f32>) {
        // Screen y grows downwards, ours grows upwards
        self.origin += Vector2::new(screen_delta.x, -screen_delta.y);
    }

    pub fn zoom_by(&mut self, factor: f32) {
        self.pixels_per_unit =
            nalgebra::clamp(self.pixels_per_unit * factor, MIN_PIXELS_PER_UNIT, MAX_PIXELS_PER_UNIT);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}
