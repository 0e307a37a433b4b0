//! Dragging whole groups and resizing shapes through their handles.

use super::AnnotationEditor;
use crate::error::EditorError;
use crate::geometry::{point_at, translate};
use crate::message::DragTarget;
use crate::model::{GroupId, ShapeCategory};
use crate::state::{DragOrigin, EditAction, EditPhase, HandleGrip, WorkingEdit};
use crate::view::{ViewBinding, ViewCommand};

impl<V: ViewBinding> AnnotationEditor<V> {
    /// A drag started on a group root or a handle of the selected group.
    pub fn drag_start(&mut self, target: DragTarget) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        let (group, grip) = match target {
            DragTarget::Group(group) => (group, None),
            DragTarget::Handle(handle) => {
                let (Some(bound), Some(start)) = (self.scene.handle(handle), self.scene.handle_position(handle))
                else {
                    log::trace!("drag_start on unknown handle {}", handle);
                    return Ok(());
                };
                let grip = HandleGrip {
                    handle,
                    category: bound.category,
                    index: bound.index,
                    start,
                };
                (bound.group, Some(grip))
            }
        };
        if self.selected != Some(group) || !self.scene.contains(group) {
            log::trace!("drag_start ignored: group {} is not selected", group);
            return Ok(());
        }

        let Some(base) = self.drag_base(group) else {
            return Ok(());
        };

        let edit = match grip {
            None => {
                log::debug!("Group {} drag started", group);
                base.dragging_group()
            }
            Some(grip) => {
                let points = self.scene.shape(group, grip.category).to_vec();
                log::debug!(
                    "Handle {} ({} vertex {}) drag started at ({}, {})",
                    grip.handle,
                    grip.category.name(),
                    grip.index,
                    grip.start.0,
                    grip.start.1
                );
                base.gripped(grip, points)
            }
        };

        self.emit(ViewCommand::HideHover);
        self.emit(ViewCommand::HideTooltip);
        self.emit(ViewCommand::HideConfirm);
        self.edit = Some(edit);
        Ok(())
    }

    /// The dragged node moved; `(dx, dy)` is the net offset since drag start.
    pub fn drag_move(&mut self, dx: f32, dy: f32) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        let Some(edit) = self.edit.take() else {
            return Ok(());
        };
        let group = edit.group;

        match edit.drag {
            Some(DragOrigin::Group) => {
                if let Some(node) = self.scene.group_mut(group) {
                    node.offset = (dx, dy);
                }
                self.emit(ViewCommand::SetGroupOffset { group, dx, dy });
                self.edit = Some(edit);
            }
            Some(DragOrigin::Handle(grip)) => {
                let edit = edit.with_grip_offset(dx, dy);
                self.scene.set_shape(group, grip.category, edit.points.clone());
                self.render_shape(group, grip.category);
                if let Some((x, y)) = point_at(&edit.points, grip.index) {
                    self.emit(ViewCommand::MoveHandle {
                        handle: grip.handle,
                        x,
                        y,
                    });
                }
                self.edit = Some(edit);
            }
            None => {
                log::trace!("drag_move without an active drag");
                self.edit = Some(edit);
            }
        }
        Ok(())
    }

    /// The drag ended; the edit now awaits confirmation.
    pub fn drag_end(&mut self) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        let Some(edit) = self.edit.take() else {
            return Ok(());
        };
        let group = edit.group;

        match edit.drag {
            Some(DragOrigin::Group) if edit.action == EditAction::Drag => {
                let (polygon, arrow) = self.normalize_group_offset(group);
                let mut edit = edit.released(ShapeCategory::Polygon, polygon.clone());
                edit.restage(ShapeCategory::Arrow, &arrow);
                log::debug!("Group {} drag ended", group);
                self.request_confirmation(group, polygon);
                self.edit = Some(edit);
            }
            Some(DragOrigin::Handle(grip)) if edit.action == EditAction::Rectify => {
                let points = edit.points.clone();
                let edit = edit.released(grip.category, points.clone());
                log::debug!("Handle {} drag ended", grip.handle);
                self.request_confirmation(group, points);
                self.edit = Some(edit);
            }
            _ => {
                log::trace!("drag_end without a matching drag");
                self.edit = Some(edit);
            }
        }
        Ok(())
    }

    /// Edit to start a drag from: the pending edit on `group`, or a fresh edit
    /// of its committed geometry, including a region still waiting for its
    /// arrow. `None` when another edit blocks the drag.
    fn drag_base(&mut self, group: GroupId) -> Option<WorkingEdit> {
        match self.edit.take() {
            Some(edit) if edit.group == group && edit.phase == EditPhase::Pending && !edit.is_dragging() => Some(edit),
            Some(edit) if edit.group == group && edit.is_awaiting_arrow() => {
                let points = self.scene.shape(group, ShapeCategory::Polygon).to_vec();
                Some(WorkingEdit::committed(group, ShapeCategory::Polygon, EditAction::None, points).resuming_arrow())
            }
            Some(edit) => {
                log::trace!(
                    "drag refused: edit on group {} is {:?}/{:?}",
                    edit.group,
                    edit.phase,
                    edit.action
                );
                self.edit = Some(edit);
                None
            }
            None => {
                let points = self.scene.shape(group, ShapeCategory::Polygon).to_vec();
                Some(WorkingEdit::committed(
                    group,
                    ShapeCategory::Polygon,
                    EditAction::None,
                    points,
                ))
            }
        }
    }

    /// Fold the drag offset into the absolute coordinates of every shape and
    /// handle, then zero the offset. Returns the new polygon and arrow.
    fn normalize_group_offset(&mut self, group: GroupId) -> (Vec<f32>, Vec<f32>) {
        let Some(node) = self.scene.group_mut(group) else {
            return (Vec::new(), Vec::new());
        };
        let (dx, dy) = node.offset;
        node.offset = (0.0, 0.0);
        node.polygon = translate(&node.polygon, dx, dy);
        node.arrow = translate(&node.arrow, dx, dy);
        let polygon = node.polygon.clone();
        let arrow = node.arrow.clone();

        self.emit(ViewCommand::SetGroupOffset {
            group,
            dx: 0.0,
            dy: 0.0,
        });
        self.render_shape(group, ShapeCategory::Polygon);
        self.render_handles(group, ShapeCategory::Polygon);
        if !arrow.is_empty() {
            self.render_shape(group, ShapeCategory::Arrow);
            self.render_handles(group, ShapeCategory::Arrow);
        }
        (polygon, arrow)
    }
}
