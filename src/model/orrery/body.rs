use std::path::PathBuf;

use nalgebra::{Isometry3, Matrix4, Point3, Translation3, Unit, UnitQuaternion, Vector3};

use crate::math::geometry::perpendicular_vector;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

// All the display info about a body; none of this affects the motion
#[derive(Debug, Clone)]
pub struct BodyInfo {
    pub name: String,
    pub color: Point3<f32>,
    pub scale: f32,
    pub outline: Option<Point3<f32>>,
    pub emits_light: bool,
    pub model: Option<PathBuf>,
}

/// Kinematic description of a body: a circular orbit around its parent, plus
/// a spin around its own axis. Speeds are in radians per second.
#[derive(Debug, Clone)]
pub struct Motion {
    pub orbit_radius: f32,
    pub orbit_speed: f32,
    pub orbit_axis: Unit<Vector3<f32>>,
    pub spin_speed: f32,
    pub spin_axis: Unit<Vector3<f32>>,
}

/// Where a body is this frame, and how it's oriented and scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub isometry: Isometry3<f32>,
    pub scale: f32,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyID,
    pub info: BodyInfo,
    pub motion: Motion,
    pub(super) parent: Option<BodyID>,
    pub(super) pose: BodyPose,
    pub(super) last_frame: Option<u64>,
}

impl BodyInfo {
    pub fn new(name: &str, color: Point3<f32>, scale: f32) -> Self {
        BodyInfo {
            name: name.to_owned(),
            color,
            scale,
            outline: None,
            emits_light: false,
            model: None,
        }
    }
}

impl Motion {
    /// A body that sits still at its parent's position.
    pub fn fixed() -> Self {
        Motion {
            orbit_radius: 0.0,
            orbit_speed: 0.0,
            orbit_axis: Vector3::y_axis(),
            spin_speed: 0.0,
            spin_axis: Vector3::y_axis(),
        }
    }

    pub fn circular(orbit_radius: f32, orbit_speed: f32, spin_speed: f32) -> Self {
        Motion {
            orbit_radius,
            orbit_speed,
            spin_speed,
            ..Motion::fixed()
        }
    }

    /// Composes the pose at `signed_time` for a body whose parent currently
    /// sits at `center`.
    ///
    /// The order is: move to the center, turn by the orbital angle, step out
    /// along the orbit radius, then spin in place and scale. The position of
    /// the body is fixed before the spin, so spinning never moves it.
    pub fn pose(&self, center: &Point3<f32>, signed_time: f32, scale: f32) -> BodyPose {
        let orbit_rotation =
            UnitQuaternion::from_axis_angle(&self.orbit_axis, self.orbit_speed * signed_time);
        let offset = perpendicular_vector(&self.orbit_axis).into_inner() * self.orbit_radius;

        let on_orbit = Isometry3::from_parts(Translation3::from(center.coords), orbit_rotation)
            * Translation3::from(offset);

        let spin = UnitQuaternion::from_axis_angle(&self.spin_axis, self.spin_speed * signed_time);
        BodyPose {
            isometry: on_orbit * spin,
            scale,
        }
    }
}

impl BodyPose {
    pub fn identity() -> Self {
        BodyPose {
            isometry: Isometry3::identity(),
            scale: 1.0,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.isometry * Point3::origin()
    }

    /// The model matrix to hand to a shader.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.isometry.to_homogeneous() * Matrix4::new_scaling(self.scale)
    }
}

impl Body {
    pub fn parent_id(&self) -> Option<BodyID> {
        self.parent
    }

    pub fn pose(&self) -> BodyPose {
        self.pose
    }

    pub fn position(&self) -> Point3<f32> {
        self.pose.position()
    }
}
