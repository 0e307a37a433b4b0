//! The transient, uncommitted edit.
//!
//! A `WorkingEdit` is a value: every transition consumes the old edit and
//! returns a new one, so the editor always replaces it wholesale. The editor is
//! idle exactly when it holds no edit.

use crate::constants::{MIN_ARROW_LENGTH, POLYGON_CLOSE_THRESHOLD};
use crate::geometry::{distance, point_at};
use crate::model::{GroupId, HandleId, ShapeCategory};

/// Coarse state of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditPhase {
    /// No edit in progress
    #[default]
    Idle,
    /// Vertices are being placed
    Drawing,
    /// A candidate edit awaits confirm or reject
    Pending,
}

/// Why the editor is drawing or pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditAction {
    #[default]
    None,
    /// A new shape is being drawn
    Draw,
    /// A whole group was dragged
    Drag,
    /// A handle was dragged to reshape one half of a group
    Rectify,
}

/// An unconfirmed shape produced by a draw: the polygon once it closes, or the
/// arrow once it has two points.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedGeometry {
    pub category: ShapeCategory,
    pub points: Vec<f32>,
}

/// Drag origin recorded when a handle drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleGrip {
    pub handle: HandleId,
    pub category: ShapeCategory,
    /// Vertex index the handle is bound to
    pub index: usize,
    /// Handle position when the drag started
    pub start: (f32, f32),
}

/// Drag in flight on the edited group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOrigin {
    /// The whole group is being dragged; the offset lives on the scene node
    Group,
    /// A single handle is being dragged
    Handle(HandleGrip),
}

/// Outcome of a pointer-down while a polygon is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonClick {
    /// Add the click as the next vertex
    Append,
    /// Vertex budget reached and the click is close to the first vertex
    Close,
    /// Vertex budget reached and the click is too far away to close
    Ignore,
}

/// The in-progress geometry and bookkeeping for the current edit.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingEdit {
    pub phase: EditPhase,
    pub action: EditAction,
    pub category: ShapeCategory,
    /// Scene group being edited
    pub group: GroupId,
    /// Accumulated or snapshotted points for `category`
    pub points: Vec<f32>,
    /// Vertices placed in the current draw pass
    pub step: usize,
    /// Unconfirmed shape, if this edit belongs to an unfinished group
    pub staged: Option<StagedGeometry>,
    /// Drag currently in flight
    pub drag: Option<DragOrigin>,
    /// Once resolved, the group goes back to waiting for its arrow
    pub resumes_arrow: bool,
}

impl WorkingEdit {
    /// Start a draw pass with its first vertex.
    pub fn begin(group: GroupId, category: ShapeCategory, x: f32, y: f32) -> Self {
        Self {
            phase: EditPhase::Drawing,
            action: EditAction::Draw,
            category,
            group,
            points: vec![x, y],
            step: 1,
            staged: None,
            drag: None,
            resumes_arrow: false,
        }
    }

    /// The region of `group` is committed; wait for the arrow's first click.
    pub fn awaiting_arrow(group: GroupId) -> Self {
        Self {
            phase: EditPhase::Drawing,
            action: EditAction::None,
            category: ShapeCategory::Arrow,
            group,
            points: Vec::new(),
            step: 0,
            staged: None,
            drag: None,
            resumes_arrow: false,
        }
    }

    /// Edit of an already committed group.
    pub fn committed(group: GroupId, category: ShapeCategory, action: EditAction, points: Vec<f32>) -> Self {
        Self {
            phase: EditPhase::Pending,
            action,
            category,
            group,
            points,
            step: 0,
            staged: None,
            drag: None,
            resumes_arrow: false,
        }
    }

    /// Edit the region of a group whose arrow is still to be drawn.
    pub fn resuming_arrow(mut self) -> Self {
        self.resumes_arrow = true;
        self
    }

    /// Whether the region is committed and the arrow's first click is awaited.
    pub fn is_awaiting_arrow(&self) -> bool {
        self.phase == EditPhase::Drawing && self.action == EditAction::None && self.category == ShapeCategory::Arrow
    }

    /// Append a vertex.
    pub fn with_vertex(mut self, x: f32, y: f32) -> Self {
        self.points.push(x);
        self.points.push(y);
        self.step += 1;
        self
    }

    /// Freeze the current points as the candidate shape and await confirmation.
    pub fn staged(mut self) -> Self {
        self.phase = EditPhase::Pending;
        self.staged = Some(StagedGeometry {
            category: self.category,
            points: self.points.clone(),
        });
        self
    }

    /// Start dragging the whole group.
    pub fn dragging_group(mut self) -> Self {
        self.phase = EditPhase::Pending;
        self.action = EditAction::Drag;
        self.drag = Some(DragOrigin::Group);
        self
    }

    /// Record a handle drag origin and the points it reshapes.
    pub fn gripped(mut self, grip: HandleGrip, points: Vec<f32>) -> Self {
        self.phase = EditPhase::Pending;
        self.action = EditAction::Rectify;
        self.category = grip.category;
        self.points = points;
        self.drag = Some(DragOrigin::Handle(grip));
        self
    }

    /// The active handle drag, if any.
    pub fn grip(&self) -> Option<HandleGrip> {
        match self.drag {
            Some(DragOrigin::Handle(grip)) => Some(grip),
            _ => None,
        }
    }

    /// Whether a drag is in flight.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Move the gripped vertex to its start position plus `(dx, dy)`.
    pub fn with_grip_offset(mut self, dx: f32, dy: f32) -> Self {
        if let Some(grip) = self.grip() {
            let i = grip.index * 2;
            if i + 1 < self.points.len() {
                self.points[i] = grip.start.0 + dx;
                self.points[i + 1] = grip.start.1 + dy;
            }
        }
        self
    }

    /// Finish a drag: replace the candidate points and drop the grip.
    ///
    /// If the group is unfinished and the drag reshaped its staged half, the
    /// staged candidate follows.
    pub fn released(mut self, category: ShapeCategory, points: Vec<f32>) -> Self {
        self.phase = EditPhase::Pending;
        self.drag = None;
        self.restage(category, &points);
        self.category = category;
        self.points = points;
        self
    }

    /// Refresh the staged candidate if it is the `category` half.
    pub fn restage(&mut self, category: ShapeCategory, points: &[f32]) {
        if let Some(staged) = self.staged.as_mut() {
            if staged.category == category {
                staged.points = points.to_vec();
            }
        }
    }

    /// Whether this edit touches a group whose staged half is not yet committed.
    pub fn is_unfinished(&self) -> bool {
        self.staged.is_some()
    }

    /// First placed vertex.
    pub fn first_point(&self) -> Option<(f32, f32)> {
        point_at(&self.points, 0)
    }

    /// Decide what a click at `(x, y)` does to a polygon with `sides` vertices.
    pub fn classify_polygon_click(&self, x: f32, y: f32, sides: usize) -> PolygonClick {
        if self.points.len() < sides * 2 {
            return PolygonClick::Append;
        }
        match self.first_point() {
            Some((fx, fy)) if distance(fx, fy, x, y) <= POLYGON_CLOSE_THRESHOLD => PolygonClick::Close,
            _ => PolygonClick::Ignore,
        }
    }

    /// Whether an arrow ending at `(x, y)` would be too short.
    pub fn is_degenerate_arrow_end(&self, x: f32, y: f32) -> bool {
        match self.first_point() {
            Some((sx, sy)) => distance(sx, sy, x, y) < MIN_ARROW_LENGTH,
            None => true,
        }
    }
}
