//! Boundary between the editor and whatever renders it.
//!
//! The editor never draws. It tells a [`ViewBinding`] what to create, update
//! or destroy, and reports notifications the host may forward to its users.

use serde_json::{Map, Value};

use crate::model::{AnnotationGroup, GroupId, HandleId, ShapeCategory};

/// Rendering command issued by the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCommand {
    /// Create an empty visual group with the effective shape style
    CreateGroup { group: GroupId, style: Map<String, Value> },
    /// Destroy a group together with its shapes and handles
    DestroyGroup { group: GroupId },
    /// Create or update the polygon of a group
    SetPolygon { group: GroupId, points: Vec<f32>, closed: bool },
    /// Create or update the arrow of a group
    SetArrow { group: GroupId, points: Vec<f32> },
    /// Destroy the arrow of a group
    DestroyArrow { group: GroupId },
    /// Create a handle bound to a vertex
    CreateHandle {
        handle: HandleId,
        group: GroupId,
        category: ShapeCategory,
        index: usize,
        x: f32,
        y: f32,
    },
    /// Move a handle to an absolute position
    MoveHandle { handle: HandleId, x: f32, y: f32 },
    /// Destroy a handle
    DestroyHandle { handle: HandleId },
    /// Set the visual offset of a whole group
    SetGroupOffset { group: GroupId, dx: f32, dy: f32 },
    /// Allow or forbid dragging the group root
    SetDraggable { group: GroupId, draggable: bool },
    /// Allow or forbid dragging the handles of one half of a group
    SetHandlesDraggable {
        group: GroupId,
        category: ShapeCategory,
        draggable: bool,
    },
    /// Show the confirm/reject affordance next to a group
    ShowConfirm { group: GroupId, points: Option<Vec<f32>> },
    HideConfirm,
    ShowHover { group: GroupId },
    HideHover,
    /// Move the pointer-tracking tooltip
    ShowTooltip { x: f32, y: f32 },
    HideTooltip,
}

/// Notification emitted at most once per transition.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// A new group is about to be drawn
    BeforeDraw,
    /// A pending edit awaits confirmation
    Confirm { points: Vec<f32> },
    /// A polygon was confirmed; the arrow comes next
    ResolveDrewPoly,
    /// An arrow was confirmed; the group is complete
    ResolveDrewArrow,
    /// A group was deleted
    Delete {
        kind: Option<String>,
        value: Vec<AnnotationGroup>,
    },
    /// The committed value changed
    Change { value: Vec<AnnotationGroup> },
}

/// Receiver for the editor's rendering commands and notifications.
pub trait ViewBinding {
    /// Apply one rendering command.
    fn apply(&mut self, command: ViewCommand);

    /// Receive a notification. Default: ignore.
    fn notify(&mut self, _event: EditorEvent) {}
}

/// A view that records everything it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    pub commands: Vec<ViewCommand>,
    pub events: Vec<EditorEvent>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the recorded commands.
    pub fn take_commands(&mut self) -> Vec<ViewCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Drain the recorded notifications.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Value carried by the most recent `Change` notification.
    pub fn last_value(&self) -> Option<&[AnnotationGroup]> {
        self.events.iter().rev().find_map(|e| match e {
            EditorEvent::Change { value } => Some(value.as_slice()),
            _ => None,
        })
    }
}

impl ViewBinding for RecordingView {
    fn apply(&mut self, command: ViewCommand) {
        self.commands.push(command);
    }

    fn notify(&mut self, event: EditorEvent) {
        self.events.push(event);
    }
}

/// A view that only logs, for headless hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogView;

impl ViewBinding for LogView {
    fn apply(&mut self, command: ViewCommand) {
        log::trace!("view: {:?}", command);
    }

    fn notify(&mut self, event: EditorEvent) {
        log::debug!("event: {:?}", event);
    }
}
