//! Renderer-independent parts of drawing: CPU-side vertex buffers that know
//! what needs re-uploading, and the stencil outline protocol.

pub mod buffer;
pub mod outline;

pub use buffer::{Dirty, Primitive, RenderData};
pub use outline::{draw_outlined, CommandList, GlCommand, Outline, Shading, StencilFunc, StencilTarget};
