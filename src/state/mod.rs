//! Editor state: the transient edit and the rendered scene.

mod scene;
mod working_edit;

pub use scene::{GroupNode, Handle, Scene};
pub use working_edit::{
    DragOrigin, EditAction, EditPhase, HandleGrip, PolygonClick, StagedGeometry, WorkingEdit,
};
