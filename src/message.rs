//! Inbound input events.
//!
//! Hosts either call the editor's operations directly or forward raw events as
//! [`InputEvent`] values through `AnnotationEditor::dispatch`.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::model::{AnnotationGroup, GroupId, HandleId};

/// What lies under the pointer on pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerTarget {
    /// The surface accepts new drawings at this position
    pub drawable: bool,
    /// Committed group hit by the pointer, if any
    pub group: Option<GroupId>,
}

impl PointerTarget {
    /// Empty drawable surface.
    pub fn surface() -> Self {
        Self {
            drawable: true,
            group: None,
        }
    }

    /// A rendered group.
    pub fn group(id: GroupId) -> Self {
        Self {
            drawable: false,
            group: Some(id),
        }
    }
}

/// Node a drag starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum DragTarget {
    /// The root of a group
    Group(GroupId),
    /// A vertex handle
    Handle(HandleId),
}

fn default_drawable() -> bool {
    true
}

/// Every input the editor accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum InputEvent {
    PointerDown {
        x: f32,
        y: f32,
        #[serde(default = "default_drawable")]
        drawable: bool,
        #[serde(default)]
        group: Option<GroupId>,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp {
        x: f32,
        y: f32,
    },
    /// Pointer entered (`Some`) or left (`None`) a group
    Hover {
        #[serde(default)]
        group: Option<GroupId>,
    },
    Select {
        #[serde(default)]
        group: Option<GroupId>,
    },
    DragStart {
        target: DragTarget,
    },
    /// Net offset since the matching drag-start
    DragMove {
        dx: f32,
        dy: f32,
    },
    DragEnd,
    Confirm,
    Reject,
    DeleteSelected,
    Resize {
        width: f32,
        height: f32,
    },
    SetValue {
        value: Vec<AnnotationGroup>,
    },
    Configure {
        config: EditorConfig,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_down_defaults() {
        let event: InputEvent = serde_json::from_str(r#"{"event":"pointerDown","x":3,"y":4}"#).expect("parse");
        assert_eq!(
            event,
            InputEvent::PointerDown {
                x: 3.0,
                y: 4.0,
                drawable: true,
                group: None
            }
        );
    }

    #[test]
    fn test_drag_target_tagging() {
        let event: InputEvent =
            serde_json::from_str(r#"{"event":"dragStart","target":{"kind":"handle","id":2}}"#).expect("parse");
        assert_eq!(
            event,
            InputEvent::DragStart {
                target: DragTarget::Handle(2)
            }
        );
    }

    #[test]
    fn test_unit_events() {
        let events: Vec<InputEvent> =
            serde_json::from_str(r#"[{"event":"confirm"},{"event":"reject"},{"event":"deleteSelected"},{"event":"dragEnd"}]"#)
                .expect("parse");
        assert_eq!(
            events,
            vec![
                InputEvent::Confirm,
                InputEvent::Reject,
                InputEvent::DeleteSelected,
                InputEvent::DragEnd
            ]
        );
    }
}
