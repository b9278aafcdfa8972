pub mod error;
pub mod file;
pub mod gui;
pub mod input;
pub mod math;
pub mod model;
pub mod render;

pub use error::{Error, Result};
