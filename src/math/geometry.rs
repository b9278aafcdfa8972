use nalgebra::{Unit, Vector3};

// Auxiliary direction for building perpendiculars. It's arbitrary, but fixed,
// since it sets the reference phase of every orbit.
fn auxiliary() -> Vector3<f32> {
    Vector3::new(-1.156, -2.86, 1.6)
}

const PARALLEL_TOLERANCE: f32 = 1e-3;

/// Returns a unit vector perpendicular to `axis`.
///
/// The choice is deterministic: cross the axis with a fixed auxiliary vector,
/// and if the two are (nearly) parallel, cross with world-up instead.
pub fn perpendicular_vector(axis: &Unit<Vector3<f32>>) -> Unit<Vector3<f32>> {
    let mut perpendicular = axis.cross(&auxiliary());
    if perpendicular.norm() < PARALLEL_TOLERANCE {
        perpendicular = axis.cross(&Vector3::y());
    }
    Unit::new_normalize(perpendicular)
}
