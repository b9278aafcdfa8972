//! Mouse handling for the 2D sandbox: mapping the cursor into the grid,
//! grabbing points, and dragging the view around.

pub mod interaction;
pub mod picking;
pub mod view;
