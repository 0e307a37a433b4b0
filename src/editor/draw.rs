//! Pointer handling: drawing polygons and arrows, selection and hover.

use super::AnnotationEditor;
use crate::error::EditorError;
use crate::message::PointerTarget;
use crate::model::{GroupId, ShapeCategory};
use crate::state::{EditAction, EditPhase, PolygonClick, WorkingEdit};
use crate::view::{EditorEvent, ViewBinding, ViewCommand};

impl<V: ViewBinding> AnnotationEditor<V> {
    /// Pointer pressed at `(x, y)`. Coordinates are snapped to whole pixels.
    pub fn pointer_down(&mut self, x: f32, y: f32, target: PointerTarget) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        let (x, y) = (x.round(), y.round());

        let Some(edit) = self.edit.take() else {
            self.pointer_down_idle(x, y, target);
            return Ok(());
        };

        match (edit.phase, edit.action, edit.category) {
            (EditPhase::Drawing, EditAction::None, ShapeCategory::Arrow) => self.begin_arrow(edit, x, y, target),
            (EditPhase::Drawing, EditAction::Draw, ShapeCategory::Polygon) => self.polygon_click(edit, x, y),
            (EditPhase::Drawing, EditAction::Draw, ShapeCategory::Arrow) => self.complete_arrow(edit, x, y),
            _ => {
                log::trace!(
                    "pointer_down ignored: phase={:?}, action={:?}",
                    edit.phase,
                    edit.action
                );
                self.edit = Some(edit);
            }
        }
        Ok(())
    }

    /// Pointer moved. While drawing, the view previews the next segment.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        let preview = match &self.edit {
            Some(edit) if edit.phase == EditPhase::Drawing && edit.action == EditAction::Draw => {
                let mut points = edit.points.clone();
                points.push(x);
                points.push(y);
                Some((edit.group, edit.category, points))
            }
            _ => None,
        };

        match preview {
            Some((group, ShapeCategory::Polygon, points)) => {
                self.emit(ViewCommand::SetPolygon {
                    group,
                    points,
                    closed: false,
                });
            }
            Some((group, ShapeCategory::Arrow, points)) => {
                self.emit(ViewCommand::SetArrow { group, points });
            }
            None => {}
        }

        if self.can_start_drawing() || preview_active(self.edit.as_ref()) {
            self.emit(ViewCommand::ShowTooltip { x, y });
        }
        Ok(())
    }

    /// Pointer released. Completes a click-drag-release arrow.
    pub fn pointer_up(&mut self, x: f32, y: f32) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        let (x, y) = (x.round(), y.round());
        match self.edit.take() {
            Some(edit)
                if edit.phase == EditPhase::Drawing
                    && edit.action == EditAction::Draw
                    && edit.category == ShapeCategory::Arrow
                    && edit.step == 1
                    && !edit.is_degenerate_arrow_end(x, y) =>
            {
                self.complete_arrow(edit, x, y);
            }
            other => self.edit = other,
        }
        Ok(())
    }

    /// Pointer entered (`Some`) or left (`None`) a rendered group.
    pub fn hover(&mut self, group: Option<GroupId>) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        match group {
            Some(group) if self.edit.is_none() && self.scene.contains(group) => {
                self.emit(ViewCommand::ShowHover { group });
            }
            Some(_) => {}
            None => self.emit(ViewCommand::HideHover),
        }
        Ok(())
    }

    /// Select a committed group, or clear the selection. Ignored while an edit
    /// is in progress.
    pub fn select(&mut self, group: Option<GroupId>) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        if self.edit.is_some() {
            log::trace!("select ignored: edit in progress");
            return Ok(());
        }
        self.select_group(group);
        Ok(())
    }

    pub(super) fn select_group(&mut self, group: Option<GroupId>) {
        let group = group.filter(|&g| self.scene.contains(g));
        if self.selected == group {
            return;
        }
        if let Some(previous) = self.selected.take() {
            if self.scene.contains(previous) {
                self.set_group_draggable(previous, false);
            }
        }
        if let Some(group) = group {
            self.set_group_draggable(group, true);
            log::debug!("Selected group {}", group);
        }
        self.selected = group;
    }

    /// Whether a pointer-down on empty surface would start a new group.
    fn can_start_drawing(&self) -> bool {
        self.edit.is_none()
            && self.config.drawable
            && self.store.count() < self.config.groups
            && !self.type_taken()
    }

    /// Whether the configured type is already committed. Untyped groups may
    /// repeat.
    fn type_taken(&self) -> bool {
        self.config.kind.as_deref().is_some_and(|kind| self.store.contains(kind))
    }

    fn pointer_down_idle(&mut self, x: f32, y: f32, target: PointerTarget) {
        if let Some(group) = target.group.filter(|&g| self.scene.contains(g)) {
            self.select_group(Some(group));
            return;
        }
        if !target.drawable || !self.config.drawable {
            log::trace!("pointer_down on non-drawable target at ({}, {})", x, y);
            return;
        }
        self.select_group(None);

        if self.store.count() >= self.config.groups {
            log::debug!("Group limit of {} reached, not drawing", self.config.groups);
            return;
        }
        if self.type_taken() {
            log::debug!("A group of type {:?} already exists, not drawing", self.config.kind);
            return;
        }
        let kind = self.config.kind.clone();

        self.notify(EditorEvent::BeforeDraw);
        let group = self.scene.insert_group(kind);
        let style = self.config.effective_style();
        self.emit(ViewCommand::HideHover);
        self.emit(ViewCommand::CreateGroup { group, style });

        let edit = WorkingEdit::begin(group, ShapeCategory::Polygon, x, y);
        self.scene.set_shape(group, ShapeCategory::Polygon, edit.points.clone());
        self.render_shape(group, ShapeCategory::Polygon);
        self.spawn_handle(group, ShapeCategory::Polygon, 0);
        log::debug!("Polygon started for group {} at ({}, {})", group, x, y);
        self.edit = Some(edit);
    }

    fn polygon_click(&mut self, edit: WorkingEdit, x: f32, y: f32) {
        let group = edit.group;
        match edit.classify_polygon_click(x, y, self.config.sides) {
            PolygonClick::Append => {
                let edit = edit.with_vertex(x, y);
                let index = edit.step - 1;
                self.scene.set_shape(group, ShapeCategory::Polygon, edit.points.clone());
                self.render_shape(group, ShapeCategory::Polygon);
                self.spawn_handle(group, ShapeCategory::Polygon, index);
                log::debug!("Polygon vertex {} at ({}, {})", edit.step, x, y);
                self.edit = Some(edit);
            }
            PolygonClick::Close => {
                // The closing click only signals closure; the placed vertices are kept.
                let edit = edit.staged();
                if let Some(node) = self.scene.group_mut(group) {
                    node.closed = true;
                }
                self.scene.set_shape(group, ShapeCategory::Polygon, edit.points.clone());
                self.render_shape(group, ShapeCategory::Polygon);
                self.emit(ViewCommand::HideTooltip);
                self.selected = Some(group);
                self.emit(ViewCommand::SetDraggable {
                    group,
                    draggable: true,
                });
                self.emit(ViewCommand::SetHandlesDraggable {
                    group,
                    category: ShapeCategory::Polygon,
                    draggable: true,
                });
                log::debug!("Polygon closed for group {} with {} vertices", group, edit.step);
                self.request_confirmation(group, edit.points.clone());
                self.edit = Some(edit);
            }
            PolygonClick::Ignore => {
                log::debug!("Closing click at ({}, {}) too far from first vertex", x, y);
                self.edit = Some(edit);
            }
        }
    }

    fn begin_arrow(&mut self, edit: WorkingEdit, x: f32, y: f32, target: PointerTarget) {
        let group = edit.group;
        if !target.drawable || !self.config.drawable {
            log::trace!("Arrow not started: ({}, {}) is not drawable", x, y);
            self.edit = Some(edit);
            return;
        }
        if !self.scene.contains(group) {
            log::warn!("Arrow requested for missing group {}", group);
            return;
        }
        let edit = WorkingEdit::begin(group, ShapeCategory::Arrow, x, y);
        self.scene.set_shape(group, ShapeCategory::Arrow, edit.points.clone());
        self.render_shape(group, ShapeCategory::Arrow);
        self.spawn_handle(group, ShapeCategory::Arrow, 0);
        log::debug!("Arrow started for group {} at ({}, {})", group, x, y);
        self.edit = Some(edit);
    }

    /// Second arrow point, from either a click or a release.
    fn complete_arrow(&mut self, edit: WorkingEdit, x: f32, y: f32) {
        let group = edit.group;
        if edit.is_degenerate_arrow_end(x, y) {
            log::debug!("Arrow for group {} too short, discarded", group);
            self.discard_arrow(group);
            self.edit = Some(WorkingEdit::awaiting_arrow(group));
            return;
        }

        let edit = edit.with_vertex(x, y).staged();
        self.scene.set_shape(group, ShapeCategory::Arrow, edit.points.clone());
        self.render_shape(group, ShapeCategory::Arrow);
        self.spawn_handle(group, ShapeCategory::Arrow, 1);
        self.emit(ViewCommand::HideTooltip);
        self.emit(ViewCommand::SetHandlesDraggable {
            group,
            category: ShapeCategory::Arrow,
            draggable: true,
        });
        log::debug!("Arrow completed for group {}", group);
        self.request_confirmation(group, edit.points.clone());
        self.edit = Some(edit);
    }

    /// Remove the arrow shape and its handles, keeping the polygon.
    pub(super) fn discard_arrow(&mut self, group: GroupId) {
        for handle in self.scene.remove_handles(group, ShapeCategory::Arrow) {
            self.emit(ViewCommand::DestroyHandle { handle });
        }
        self.scene.set_shape(group, ShapeCategory::Arrow, Vec::new());
        self.emit(ViewCommand::DestroyArrow { group });
    }
}

fn preview_active(edit: Option<&WorkingEdit>) -> bool {
    edit.is_some_and(|e| e.phase == EditPhase::Drawing)
}
