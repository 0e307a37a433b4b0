//! Data models for the zonemark editor.

mod annotation;

pub use annotation::{AnnotationGroup, GroupId, HandleId, ShapeCategory};
