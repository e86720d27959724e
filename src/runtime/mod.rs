//! Render scheduling.

pub mod render_loop;
mod wake;

pub use render_loop::{LoopOptions, LoopState, Presenter, RenderLoop, View, DEFAULT_REFRESH_RATE};
pub use wake::RenderHandle;
