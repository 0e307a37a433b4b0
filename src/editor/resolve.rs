//! Commit and rollback of pending edits, deletion, and whole-value replacement.

use super::AnnotationEditor;
use crate::constants::ARROW_POINTS;
use crate::error::EditorError;
use crate::geometry::{fraction_to_absolute, rescale_groups};
use crate::model::{AnnotationGroup, GroupId, ShapeCategory};
use crate::state::{EditAction, EditPhase, StagedGeometry, WorkingEdit};
use crate::view::{EditorEvent, ViewBinding, ViewCommand};

impl<V: ViewBinding> AnnotationEditor<V> {
    /// Accept the pending edit.
    pub fn confirm(&mut self) -> Result<(), EditorError> {
        self.resolve_changes(true)
    }

    /// Discard the pending edit.
    pub fn reject(&mut self) -> Result<(), EditorError> {
        self.resolve_changes(false)
    }

    /// Commit (`accept`) or roll back the current edit.
    pub fn resolve_changes(&mut self, accept: bool) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        let Some(edit) = self.edit.take() else {
            log::trace!("resolve_changes({}) with no edit", accept);
            return Ok(());
        };
        if edit.is_dragging() {
            log::trace!("resolve_changes({}) ignored: drag in flight", accept);
            self.edit = Some(edit);
            return Ok(());
        }

        if accept {
            if edit.phase != EditPhase::Pending {
                log::trace!("confirm ignored: nothing pending ({:?}/{:?})", edit.phase, edit.action);
                self.edit = Some(edit);
                return Ok(());
            }
            match edit.staged.clone() {
                Some(StagedGeometry {
                    category: ShapeCategory::Polygon,
                    points,
                }) => self.confirm_polygon(edit.group, points),
                Some(StagedGeometry {
                    category: ShapeCategory::Arrow,
                    points,
                }) => self.confirm_arrow(edit.group, points),
                None => self.confirm_committed(edit),
            }
        } else {
            if edit.action == EditAction::None {
                log::trace!("reject ignored: nothing pending");
                self.edit = Some(edit);
                return Ok(());
            }
            let unfinished = match &edit.staged {
                Some(staged) => Some(staged.category),
                None if edit.action == EditAction::Draw => Some(edit.category),
                None => None,
            };
            match unfinished {
                Some(ShapeCategory::Polygon) => self.reject_polygon(edit.group),
                Some(ShapeCategory::Arrow) => self.reject_arrow(edit.group),
                None => self.reject_committed(edit),
            }
        }
        Ok(())
    }

    /// Remove the selected group from the scene and the store.
    pub fn delete_selected(&mut self) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        let Some(group) = self.selected else {
            log::trace!("delete_selected with no selection");
            return Ok(());
        };
        if let Some(edit) = self.edit.as_ref().filter(|e| e.group != group) {
            log::warn!(
                "Cannot delete group {} while group {} is being edited",
                group,
                edit.group
            );
            return Ok(());
        }

        let (entry, kind) = self.entry_of(group);
        self.emit(ViewCommand::DestroyGroup { group });
        self.scene.remove_group(group);
        self.selected = None;
        self.edit = None;
        self.emit(ViewCommand::HideConfirm);
        self.emit(ViewCommand::HideHover);
        self.emit(ViewCommand::HideTooltip);

        let value = match entry {
            Some(entry) => {
                let complete = self.store.get(entry).is_some_and(AnnotationGroup::is_complete);
                let value = self.store.upsert_geometry(Some(entry), kind.as_deref(), None, Vec::new()).to_vec();
                self.scene.entry_removed(entry);
                if complete {
                    self.store.unmark_completed();
                }
                value
            }
            None => self.store.groups().to_vec(),
        };
        log::info!("Deleted group {} (type={:?})", group, kind);
        self.notify(EditorEvent::Delete { kind, value });
        self.notify_change();
        Ok(())
    }

    /// The drawing surface changed size. Committed geometry is rescaled so it
    /// keeps its proportional position.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        if width <= 0.0 || height <= 0.0 {
            log::debug!("Ignoring resize to {}x{}", width, height);
            return Ok(());
        }
        let Some((old_width, old_height)) = self.surface.replace((width, height)) else {
            log::debug!("Surface size set to {}x{}", width, height);
            return Ok(());
        };
        if old_width == width && old_height == height {
            return Ok(());
        }

        let scale_x = width / old_width;
        let scale_y = height / old_height;
        log::debug!(
            "Surface resized {}x{} -> {}x{} (scale {:.3}, {:.3})",
            old_width,
            old_height,
            width,
            height,
            scale_x,
            scale_y
        );
        let rescaled = rescale_groups(self.store.groups(), scale_x, scale_y);
        self.replace_all(&rescaled)?;
        Ok(())
    }

    /// Replace the committed value with an externally supplied list.
    ///
    /// With `decimals` set, coordinates are fractions of the surface and are
    /// converted to pixels first. Returns whether anything changed.
    pub fn set_value(&mut self, groups: &[AnnotationGroup]) -> Result<bool, EditorError> {
        self.ensure_mounted()?;
        self.validate_value(groups)?;
        if self.config.decimals {
            let (width, height) = self.surface.ok_or(EditorError::UnknownSurface)?;
            let absolute = fraction_to_absolute(groups, width, height);
            self.replace_all(&absolute)
        } else {
            self.replace_all(groups)
        }
    }

    /// Replace the committed value and rebuild the scene from it.
    ///
    /// Any edit in progress is abandoned when the value changes. If an entry
    /// has a region but no direction, drawing resumes at its arrow.
    pub fn replace_all(&mut self, groups: &[AnnotationGroup]) -> Result<bool, EditorError> {
        self.ensure_mounted()?;
        if !self.store.replace_all(groups) {
            return Ok(false);
        }
        self.reset_session();
        self.render_store();
        self.resume_unfinished();
        log::info!(
            "Value replaced: {} groups, {} complete",
            self.store.len(),
            self.store.count()
        );
        self.notify_change();
        Ok(true)
    }

    fn validate_value(&self, groups: &[AnnotationGroup]) -> Result<(), EditorError> {
        if groups.len() > self.config.groups {
            return Err(EditorError::malformed_group(
                self.config.groups,
                format!("at most {} groups allowed, got {}", self.config.groups, groups.len()),
            ));
        }
        let expected = self.config.sides * 2;
        for (index, group) in groups.iter().enumerate() {
            if group.points.len() % 2 != 0 || group.direction.len() % 2 != 0 {
                return Err(EditorError::malformed_group(index, "odd number of coordinates"));
            }
            if group.points.len() != expected {
                return Err(EditorError::malformed_group(
                    index,
                    format!(
                        "polygon has {} vertices, expected {}",
                        group.points.len() / 2,
                        self.config.sides
                    ),
                ));
            }
            if !group.direction.is_empty() && group.direction.len() != ARROW_POINTS * 2 {
                return Err(EditorError::malformed_group(
                    index,
                    format!(
                        "direction has {} points, expected {}",
                        group.direction.len() / 2,
                        ARROW_POINTS
                    ),
                ));
            }
            if group.kind.is_some() && groups[..index].iter().any(|other| other.kind == group.kind) {
                return Err(EditorError::malformed_group(
                    index,
                    format!("duplicate type {:?}", group.kind),
                ));
            }
        }
        Ok(())
    }

    fn confirm_polygon(&mut self, group: GroupId, points: Vec<f32>) {
        let (entry, kind) = self.entry_of(group);
        let len = self
            .store
            .upsert_geometry(entry, kind.as_deref(), Some(ShapeCategory::Polygon), points)
            .len();
        if let Some(node) = self.scene.group_mut(group) {
            node.entry = entry.or(Some(len - 1));
        }
        self.emit(ViewCommand::HideConfirm);
        log::info!("Polygon committed for group {} (type={:?})", group, kind);
        self.edit = Some(WorkingEdit::awaiting_arrow(group));
        self.selected = Some(group);
        self.notify(EditorEvent::ResolveDrewPoly);
    }

    fn confirm_arrow(&mut self, group: GroupId, direction: Vec<f32>) {
        let (entry, kind) = self.entry_of(group);
        // A drag of the unfinished group may also have moved its polygon.
        let polygon = self.scene.shape(group, ShapeCategory::Polygon).to_vec();
        let len = self
            .store
            .upsert_geometry(entry, kind.as_deref(), Some(ShapeCategory::Polygon), polygon)
            .len();
        let entry = entry.or(Some(len - 1));
        self.store
            .upsert_geometry(entry, kind.as_deref(), Some(ShapeCategory::Arrow), direction);
        self.store.mark_completed();
        if let Some(node) = self.scene.group_mut(group) {
            node.entry = entry;
        }

        self.set_group_draggable(group, false);
        self.selected = None;
        self.edit = None;
        self.emit(ViewCommand::HideConfirm);
        log::info!(
            "Group {} complete (type={:?}), {}/{} groups",
            group,
            kind,
            self.store.count(),
            self.config.groups
        );
        self.notify(EditorEvent::ResolveDrewArrow);
        self.notify_change();
    }

    fn confirm_committed(&mut self, edit: WorkingEdit) {
        let group = edit.group;
        let (entry, kind) = self.entry_of(group);
        for category in [ShapeCategory::Polygon, ShapeCategory::Arrow] {
            let points = self.scene.shape(group, category).to_vec();
            if points.is_empty() {
                continue;
            }
            self.store
                .upsert_geometry(entry, kind.as_deref(), Some(category), points);
        }
        self.edit = edit.resumes_arrow.then(|| WorkingEdit::awaiting_arrow(group));
        self.emit(ViewCommand::HideConfirm);
        log::info!("{:?} of group {} committed", edit.action, group);
        self.notify_change();
    }

    /// Drop an uncommitted polygon together with its group.
    fn reject_polygon(&mut self, group: GroupId) {
        self.emit(ViewCommand::DestroyGroup { group });
        self.scene.remove_group(group);
        self.edit = None;
        self.selected = None;
        self.emit(ViewCommand::HideConfirm);
        self.emit(ViewCommand::HideTooltip);
        log::debug!("Polygon of group {} rejected", group);
    }

    /// Drop an uncommitted arrow; the committed polygon is restored and the
    /// arrow may be drawn again.
    fn reject_arrow(&mut self, group: GroupId) {
        self.discard_arrow(group);
        self.restore_group(group);
        self.edit = Some(WorkingEdit::awaiting_arrow(group));
        self.emit(ViewCommand::HideConfirm);
        self.emit(ViewCommand::HideTooltip);
        log::debug!("Arrow of group {} rejected", group);
    }

    fn reject_committed(&mut self, edit: WorkingEdit) {
        let group = edit.group;
        self.restore_group(group);
        self.edit = edit.resumes_arrow.then(|| WorkingEdit::awaiting_arrow(group));
        self.emit(ViewCommand::HideConfirm);
        log::debug!("Edit of group {} rejected, geometry restored", group);
    }

    /// Put every committed half of `group` back at its stored coordinates.
    fn restore_group(&mut self, group: GroupId) {
        let Some(stored) = self
            .entry_of(group)
            .0
            .and_then(|entry| self.store.get(entry))
            .cloned()
        else {
            return;
        };
        for category in [ShapeCategory::Polygon, ShapeCategory::Arrow] {
            let points = stored.geometry(category);
            if points.is_empty() {
                continue;
            }
            self.scene.set_shape(group, category, points.to_vec());
            self.render_shape(group, category);
            self.render_handles(group, category);
        }
    }
}
