use nalgebra::{Matrix4, Point2, Point3, Vector2};

use super::meshes::{ColoredVertex, TrochoidParams};
use crate::math::transform2d::{
    build_affine_basis, compose_transform, linear_determinant, rotate_point_around_pivot,
    transform_point2, DEGENERATE_DETERMINANT,
};

/// A user-defined coordinate frame: an origin and the endpoints of the two
/// unit axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineBasis2 {
    pub origin: Point2<f32>,
    pub x_end: Point2<f32>,
    pub y_end: Point2<f32>,
}

impl AffineBasis2 {
    pub fn standard() -> Self {
        AffineBasis2 {
            origin: Point2::origin(),
            x_end: Point2::new(1.0, 0.0),
            y_end: Point2::new(0.0, 1.0),
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        build_affine_basis(&self.origin, &self.x_end, &self.y_end)
    }

    pub fn determinant(&self) -> f32 {
        linear_determinant(&self.matrix())
    }

    /// True when the two axes are (nearly) collinear, and the basis can't be
    /// inverted.
    pub fn is_degenerate(&self) -> bool {
        self.determinant().abs() < DEGENERATE_DETERMINANT
    }
}

/// Placement of the trochoid figure.
///
/// The figure is stored by its `base_position`, i.e. where it sits before the
/// rotation about `pivot`. The `visible_position` is where the figure's origin
/// actually shows up, and is kept in sync with the base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureTransform {
    pub base_position: Point2<f32>,
    visible_position: Point2<f32>,
    pub pivot: Point2<f32>,
    pub angle_degrees: f32,
    pub scale: Vector2<f32>,
    pub mirrored: bool,
}

impl FigureTransform {
    pub fn new(base_position: Point2<f32>, pivot: Point2<f32>) -> Self {
        FigureTransform {
            base_position,
            visible_position: base_position,
            pivot,
            angle_degrees: 0.0,
            scale: Vector2::new(1.0, 1.0),
            mirrored: false,
        }
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        compose_transform(
            &self.base_position,
            &self.pivot,
            self.angle_degrees,
            &self.scale,
            self.mirrored,
            self.mirrored,
        )
    }

    pub fn visible_position(&self) -> Point2<f32> {
        self.visible_position
    }

    /// Recomputes the visible position after the base, pivot or angle changed.
    pub fn sync_visible(&mut self) {
        self.visible_position =
            rotate_point_around_pivot(&self.base_position, &self.pivot, self.angle_degrees);
    }

    /// Moves the figure so that its origin shows up at `position`, by undoing
    /// the rotation to find the matching base position.
    pub fn set_visible_position(&mut self, position: Point2<f32>) {
        self.visible_position = position;
        self.base_position = rotate_point_around_pivot(&position, &self.pivot, -self.angle_degrees);
    }
}

/// Which value a draggable point reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointTarget {
    FigurePosition,
    RotatePivot,
    BasisOrigin,
    BasisX,
    BasisY,
}

impl PointTarget {
    pub const ALL: [PointTarget; 5] = [
        PointTarget::FigurePosition,
        PointTarget::RotatePivot,
        PointTarget::BasisOrigin,
        PointTarget::BasisX,
        PointTarget::BasisY,
    ];

    /// Figure-related points live inside the custom basis; the basis handles
    /// themselves live in plain grid space.
    pub fn uses_affine_basis(self) -> bool {
        matches!(self, PointTarget::FigurePosition | PointTarget::RotatePivot)
    }

    pub fn label(self) -> &'static str {
        match self {
            PointTarget::FigurePosition => "Figure",
            PointTarget::RotatePivot => "Pivot",
            PointTarget::BasisOrigin => "O",
            PointTarget::BasisX => "X",
            PointTarget::BasisY => "Y",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraggablePoint {
    pub target: PointTarget,
    pub color: Point3<f32>,
}

impl DraggablePoint {
    pub fn uses_affine_basis(&self) -> bool {
        self.target.uses_affine_basis()
    }
}

#[derive(Debug, Clone)]
pub struct SandboxScene {
    pub figure: FigureTransform,
    pub basis: AffineBasis2,
    pub trochoid: TrochoidParams,
    pub grid_size: usize,
    points: Vec<DraggablePoint>,
}

impl Default for SandboxScene {
    fn default() -> Self {
        let points = vec![
            DraggablePoint {
                target: PointTarget::FigurePosition,
                color: Point3::new(0.9, 0.2, 1.0),
            },
            DraggablePoint {
                target: PointTarget::RotatePivot,
                color: Point3::new(0.1, 0.1, 0.1),
            },
            DraggablePoint {
                target: PointTarget::BasisOrigin,
                color: Point3::new(0.2, 0.2, 1.0),
            },
            DraggablePoint {
                target: PointTarget::BasisX,
                color: Point3::new(1.0, 0.0, 0.0),
            },
            DraggablePoint {
                target: PointTarget::BasisY,
                color: Point3::new(0.0, 0.7, 0.0),
            },
        ];

        SandboxScene {
            figure: FigureTransform::new(Point2::new(5.0, 5.0), Point2::new(1.0, 1.0)),
            basis: AffineBasis2::standard(),
            trochoid: TrochoidParams::default(),
            grid_size: 20,
            points,
        }
    }
}

impl SandboxScene {
    pub fn points(&self) -> &[DraggablePoint] {
        &self.points
    }

    /// Current value of a point, in its own space (basis space for figure
    /// points, grid space for basis handles).
    pub fn point(&self, target: PointTarget) -> Point2<f32> {
        match target {
            PointTarget::FigurePosition => self.figure.visible_position(),
            PointTarget::RotatePivot => self.figure.pivot,
            PointTarget::BasisOrigin => self.basis.origin,
            PointTarget::BasisX => self.basis.x_end,
            PointTarget::BasisY => self.basis.y_end,
        }
    }

    /// Writes a point, then re-derives whatever depends on it.
    pub fn set_point(&mut self, target: PointTarget, value: Point2<f32>) {
        match target {
            PointTarget::FigurePosition => self.figure.set_visible_position(value),
            PointTarget::RotatePivot => {
                self.figure.pivot = value;
                self.figure.sync_visible();
            }
            PointTarget::BasisOrigin => self.basis.origin = value,
            PointTarget::BasisX => self.basis.x_end = value,
            PointTarget::BasisY => self.basis.y_end = value,
        }
    }

    /// Where a point shows up on the grid, after the basis is applied.
    pub fn point_in_grid_space(&self, point: &DraggablePoint) -> Point2<f32> {
        let value = self.point(point.target);
        if point.uses_affine_basis() {
            transform_point2(&self.basis.matrix(), &value)
        } else {
            value
        }
    }

    pub fn point_vertex(&self, index: usize) -> ColoredVertex {
        let point = &self.points[index];
        ColoredVertex {
            position: self.point_in_grid_space(point),
            color: point.color,
        }
    }

    pub fn point_vertices(&self) -> Vec<ColoredVertex> {
        (0..self.points.len()).map(|i| self.point_vertex(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_figure_position_hook_rederives_base() {
        let mut scene = SandboxScene::default();
        scene.figure.angle_degrees = 90.0;
        scene.figure.sync_visible();

        // Base (5, 5) rotated a quarter turn about (1, 1)
        assert_relative_eq!(
            scene.point(PointTarget::FigurePosition),
            Point2::new(-3.0, 5.0),
            epsilon = 1e-5
        );

        scene.set_point(PointTarget::FigurePosition, Point2::new(1.0, 3.0));
        assert_relative_eq!(scene.figure.base_position, Point2::new(3.0, 1.0), epsilon = 1e-5);
        assert_relative_eq!(
            scene.point(PointTarget::FigurePosition),
            Point2::new(1.0, 3.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_moving_pivot_moves_visible_figure() {
        let mut scene = SandboxScene::default();
        scene.figure.angle_degrees = 180.0;
        scene.set_point(PointTarget::RotatePivot, Point2::new(0.0, 0.0));
        assert_relative_eq!(
            scene.point(PointTarget::FigurePosition),
            Point2::new(-5.0, -5.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_basis_points() {
        let mut scene = SandboxScene::default();
        scene.set_point(PointTarget::BasisX, Point2::new(2.0, 0.0));
        scene.set_point(PointTarget::BasisOrigin, Point2::new(1.0, 1.0));
        assert_eq!(scene.basis.x_end, Point2::new(2.0, 0.0));
        assert!(!scene.basis.is_degenerate());

        // Figure points are drawn through the basis, handles are not
        let figure = scene.points()[0];
        assert!(figure.uses_affine_basis());
        let shown = scene.point_in_grid_space(&figure);
        let expected = transform_point2(&scene.basis.matrix(), &Point2::new(5.0, 5.0));
        assert_relative_eq!(shown, expected);

        let handle = scene.points()[3];
        assert_eq!(scene.point_in_grid_space(&handle), Point2::new(2.0, 0.0));
    }

    #[test]
    fn test_degenerate_basis() {
        let basis = AffineBasis2 {
            origin: Point2::new(1.0, 1.0),
            x_end: Point2::new(2.0, 2.0),
            y_end: Point2::new(3.0, 3.0),
        };
        assert!(basis.is_degenerate());
        assert!(!AffineBasis2::standard().is_degenerate());
    }
}
