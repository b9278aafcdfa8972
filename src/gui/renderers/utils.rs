use kiss3d::renderer::LineRenderer;

use nalgebra::{Point3, Vector3};

pub fn path_iter_parametric<F, S>(
    f: F,
    t_start: S,
    t_end: S,
    num_segments: usize,
) -> impl Iterator<Item = Point3<f32>>
where
    F: Fn(S) -> Point3<f32>,
    S: nalgebra::RealField + simba::scalar::SupersetOf<usize> + Copy,
{
    assert!(
        num_segments >= 1,
        "Must have at least one segment, num_segments was {}",
        num_segments
    );
    let convert = nalgebra::convert::<usize, S>;
    (0..=num_segments)
        .map(move |i| convert(i) / convert(num_segments))
        // u ranges from 0 to 1 (inclusive)
        .map(move |u| t_start + u * (t_end - t_start))
        .map(f)
}

/// Points around a circle spanned by two orthonormal vectors. The first point
/// is repeated at the end, so the path closes.
pub fn circle_iter(
    center: Point3<f32>,
    x_vec: Vector3<f32>,
    y_vec: Vector3<f32>,
    radius: f32,
    num_segments: usize,
) -> impl Iterator<Item = Point3<f32>> {
    let f = move |theta: f32| center + radius * (x_vec * theta.cos() + y_vec * theta.sin());
    path_iter_parametric(f, 0.0, std::f32::consts::TAU, num_segments)
}

pub fn draw_path<I: Iterator<Item = Point3<f32>>>(
    line_renderer: &mut LineRenderer,
    points: I,
    color: &Point3<f32>,
) {
    use itertools::Itertools;
    for (a, b) in points.tuple_windows() {
        line_renderer.draw_line(a, b, *color);
    }
}
