use nalgebra::Point2;

use super::view::ViewTransform;
use crate::model::sandbox::SandboxScene;

/// How close, in pixels, the cursor has to be to grab a point.
pub const PICK_RADIUS_PIXELS: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    pub index: usize,
    pub distance: f32,
    /// The cursor, in the picked point's own space
    pub pointer_world: Point2<f32>,
}

/// Finds the draggable point closest to the cursor, if any is strictly within
/// the pick radius.
///
/// Each point is compared in its own space, so the cursor is mapped through
/// the custom basis only for points that live in it. If that mapping can't be
/// inverted this frame, those points are skipped. Ties go to the earlier
/// point.
pub fn pick_point(
    scene: &SandboxScene,
    view: &ViewTransform,
    screen: &Point2<f32>,
    radius_pixels: f32,
) -> Option<Pick> {
    let radius = view.pick_radius(radius_pixels);
    let basis = scene.basis.matrix();
    let in_grid = view.screen_to_world(screen, None);
    let in_basis = view.screen_to_world(screen, Some(&basis));

    let mut best: Option<Pick> = None;
    for (index, point) in scene.points().iter().enumerate() {
        let pointer_world = match (point.uses_affine_basis(), in_grid, in_basis) {
            (false, Some(p), _) | (true, _, Some(p)) => p,
            _ => continue,
        };

        let distance = (scene.point(point.target) - pointer_world).norm();
        if distance >= radius {
            continue;
        }
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(Pick {
                index,
                distance,
                pointer_world,
            });
        }
    }
    best
}
