use nalgebra::{Matrix4, Point2, Rotation2, Vector2, Vector3};

/// Rotates `point` around `pivot` by `angle_degrees` (counter-clockwise),
/// without building a matrix.
pub fn rotate_point_around_pivot(
    point: &Point2<f32>,
    pivot: &Point2<f32>,
    angle_degrees: f32,
) -> Point2<f32> {
    let rotation = Rotation2::new(angle_degrees.to_radians());
    pivot + rotation * (point - pivot)
}

/// Rotation by `angle_degrees` about `pivot`, as a single homogeneous matrix.
///
/// Equivalent to translate(pivot) * rotate(angle) * translate(-pivot), but
/// written out in closed form.
pub fn rotate_around_point(angle_degrees: f32, pivot: &Point2<f32>) -> Matrix4<f32> {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    let (px, py) = (pivot.x, pivot.y);

    let mut m = Matrix4::identity();
    m[(0, 0)] = cos;
    m[(1, 0)] = sin;
    m[(0, 1)] = -sin;
    m[(1, 1)] = cos;

    m[(0, 3)] = -px * (cos - 1.0) + py * sin;
    m[(1, 3)] = -px * sin - py * (cos - 1.0);
    m
}

/// Reflects across `pivot`, independently along each axis.
pub fn mirror_around_point(pivot: &Point2<f32>, mirror_x: bool, mirror_y: bool) -> Matrix4<f32> {
    let sx = if mirror_x { -1.0 } else { 1.0 };
    let sy = if mirror_y { -1.0 } else { 1.0 };
    scale_around_point(&Vector2::new(sx, sy), pivot)
}

pub fn scale_around_point(scale: &Vector2<f32>, pivot: &Point2<f32>) -> Matrix4<f32> {
    let to_pivot = Matrix4::new_translation(&Vector3::new(pivot.x, pivot.y, 0.0));
    let from_pivot = Matrix4::new_translation(&Vector3::new(-pivot.x, -pivot.y, 0.0));
    to_pivot * Matrix4::new_nonuniform_scaling(&Vector3::new(scale.x, scale.y, 1.0)) * from_pivot
}

/// The full figure transform used by the sandbox.
///
/// Rotation and mirroring pivot on `pivot`, but scaling pivots on `position`,
/// and the final translation places the figure at `position`. Keep the operand
/// order: the two pivots do not commute.
pub fn compose_transform(
    position: &Point2<f32>,
    pivot: &Point2<f32>,
    angle_degrees: f32,
    scale: &Vector2<f32>,
    mirror_x: bool,
    mirror_y: bool,
) -> Matrix4<f32> {
    rotate_around_point(angle_degrees, pivot)
        * mirror_around_point(pivot, mirror_x, mirror_y)
        * scale_around_point(scale, position)
        * Matrix4::new_translation(&Vector3::new(position.x, position.y, 0.0))
}

/// Change-of-basis matrix whose first two columns are `x_end - origin` and
/// `y_end - origin`, translated by `origin`. No orthonormalization happens
/// here; collinear axes give a singular matrix.
pub fn build_affine_basis(
    origin: &Point2<f32>,
    x_end: &Point2<f32>,
    y_end: &Point2<f32>,
) -> Matrix4<f32> {
    let i = x_end - origin;
    let j = y_end - origin;

    let mut m = Matrix4::identity();
    m[(0, 0)] = i.x;
    m[(1, 0)] = i.y;
    m[(0, 1)] = j.x;
    m[(1, 1)] = j.y;
    m[(0, 3)] = origin.x;
    m[(1, 3)] = origin.y;
    m
}

/// Below this, the 2D linear part of a matrix counts as singular.
pub const DEGENERATE_DETERMINANT: f32 = 1e-6;

/// Determinant of the upper-left 2x2 block, i.e. how the matrix scales areas
/// in the xy plane.
pub fn linear_determinant(m: &Matrix4<f32>) -> f32 {
    m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]
}

/// Applies a 2D homogeneous matrix (z = 0) to a point.
pub fn transform_point2(m: &Matrix4<f32>, p: &Point2<f32>) -> Point2<f32> {
    let p = m.transform_point(&nalgebra::Point3::new(p.x, p.y, 0.0));
    Point2::new(p.x, p.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_fixes_pivot() {
        let pivots = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(-3.5, 7.25),
        ];
        for pivot in pivots.iter() {
            for angle in [0.0, 33.0, 90.0, -270.0, 725.0].iter() {
                let m = rotate_around_point(*angle, pivot);
                assert_relative_eq!(transform_point2(&m, pivot), *pivot, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_closed_form_matches_composition() {
        let pivot = Point2::new(2.0, -1.0);
        let angle: f32 = 40.0;
        let composed = Matrix4::new_translation(&Vector3::new(2.0, -1.0, 0.0))
            * Matrix4::from_axis_angle(&Vector3::z_axis(), angle.to_radians())
            * Matrix4::new_translation(&Vector3::new(-2.0, 1.0, 0.0));
        assert_relative_eq!(rotate_around_point(angle, &pivot), composed, epsilon = 1e-5);
    }

    #[test]
    fn test_compose_identity_is_translation() {
        let position = Point2::new(5.0, -2.0);
        let m = compose_transform(
            &position,
            &Point2::new(1.0, 1.0),
            0.0,
            &Vector2::new(1.0, 1.0),
            false,
            false,
        );
        assert_relative_eq!(
            m,
            Matrix4::new_translation(&Vector3::new(5.0, -2.0, 0.0)),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_compose_order_matters() {
        let position = Point2::new(3.0, 0.0);
        let pivot = Point2::new(0.0, 0.0);
        let scale = Vector2::new(2.0, 1.0);
        let m = compose_transform(&position, &pivot, 90.0, &scale, false, false);

        // The local origin lands on `position`, unaffected by the scale, and
        // then rotates a quarter turn about the pivot.
        let p = transform_point2(&m, &Point2::origin());
        assert_relative_eq!(p, Point2::new(0.0, 3.0), epsilon = 1e-5);

        // A local unit step along x is doubled by the scale.
        let q = transform_point2(&m, &Point2::new(1.0, 0.0));
        assert_relative_eq!(q, Point2::new(0.0, 5.0), epsilon = 1e-5);
    }

    #[test]
    fn test_vector_and_matrix_rotation_agree() {
        let points = [
            Point2::new(1.0, 0.0),
            Point2::new(5.0, 5.0),
            Point2::new(-2.5, 3.0),
            Point2::new(0.0, -4.0),
        ];
        let pivots = [Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)];
        let angles = [0.0, 90.0, 180.0, 360.0, -45.0, -720.5];

        let mut samples = 0;
        for point in points.iter() {
            for pivot in pivots.iter() {
                for angle in angles.iter() {
                    let by_vector = rotate_point_around_pivot(point, pivot, *angle);
                    let by_matrix = transform_point2(&rotate_around_point(*angle, pivot), point);
                    assert_relative_eq!(by_vector, by_matrix, epsilon = 1e-5);
                    samples += 1;
                }
            }
        }
        assert!(samples >= 20);
    }

    #[test]
    fn test_mirror() {
        let m = mirror_around_point(&Point2::new(1.0, 2.0), true, false);
        assert_relative_eq!(
            transform_point2(&m, &Point2::new(3.0, 5.0)),
            Point2::new(-1.0, 5.0)
        );
        let m = mirror_around_point(&Point2::new(1.0, 2.0), true, true);
        assert_relative_eq!(
            transform_point2(&m, &Point2::new(3.0, 5.0)),
            Point2::new(-1.0, -1.0)
        );
    }

    #[test]
    fn test_affine_basis() {
        let m = build_affine_basis(
            &Point2::new(1.0, 2.0),
            &Point2::new(5.5, 3.0),
            &Point2::new(1.5, 3.5),
        );
        assert_relative_eq!(transform_point2(&m, &Point2::origin()), Point2::new(1.0, 2.0));
        assert_relative_eq!(
            transform_point2(&m, &Point2::new(1.0, 0.0)),
            Point2::new(5.5, 3.0)
        );
        assert_relative_eq!(
            transform_point2(&m, &Point2::new(1.0, 1.0)),
            Point2::new(6.0, 4.5)
        );
    }
}
