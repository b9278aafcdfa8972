pub mod geometry;
pub mod transform2d;
