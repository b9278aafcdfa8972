pub mod meshes;
pub mod orrery;
pub mod sandbox;
