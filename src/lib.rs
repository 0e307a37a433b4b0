//! zonemark - region and direction annotation editor
//!
//! A headless state machine for drawing a fixed number of annotation groups on
//! a 2D surface. Each group pairs a closed polygon with a direction arrow and is
//! committed in two steps: region first, then direction. Rendering is delegated
//! to a [`ViewBinding`].

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod message;
pub mod model;
pub mod state;
pub mod store;
pub mod view;

pub use config::{EditorConfig, LogLevel};
pub use editor::AnnotationEditor;
pub use error::EditorError;
pub use message::{DragTarget, InputEvent, PointerTarget};
pub use model::{AnnotationGroup, GroupId, HandleId, ShapeCategory};
pub use store::AnnotationStore;
pub use view::{EditorEvent, LogView, RecordingView, ViewBinding, ViewCommand};
