//! Floor-plan replay shell.
//!
//! Loads a blueprint and a recorded session from JSON, drives the editor
//! through it and reports the final state.

pub mod error;
pub mod replay;

pub use error::{AppError, AppResult};
pub use replay::{ReplayReport, Script, Step, Viewport, replay, replay_files};
