//! Floor-plan Render Library
//!
//! Renderer abstraction for the floor-plan editor. [`SceneRecorder`] records
//! screen-space draw commands that a platform backend replays.

mod renderer;
pub mod scene;

pub use renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError};
pub use scene::{DrawCommand, SceneRecorder};
