//! Floor-plan Core Library
//!
//! Platform-agnostic data structures and logic for the warehouse floor-plan
//! editor: element model, camera math, hit-testing, selection handles and
//! the touch gesture state machine.

pub mod camera;
pub mod config;
pub mod constants;
pub mod editor;
pub mod element;
pub mod error;
pub mod gesture;
pub mod hit;
pub mod plan;
pub mod selection;
pub mod snap;

pub use camera::{Camera, CameraPatch};
pub use config::EditorConfig;
pub use editor::{Editor, Tool};
pub use element::{DimField, Element, ElementColor, ElementId, ElementKind, ElementPatch, ElementType, new_element_id};
pub use error::{EditorError, EditorResult};
pub use gesture::{Effect, GestureController, GestureState, TouchEvent, TouchPoint};
pub use plan::FloorPlan;
pub use selection::{Corner, Edge, Handle, HandleKind};
pub use snap::{GRID_SIZE, snap_to_grid};
