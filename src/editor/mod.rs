//! The annotation editor: a finite-state controller turning pointer and drag
//! events into provisional geometry, and confirm/reject requests into commits
//! or rollbacks against the [`AnnotationStore`].
//!
//! Every operation runs to completion, including the commands it sends to the
//! view, before returning. Gestures the editor cannot use (a closure click too
//! far from the first vertex, a too-short arrow, a drag on an unselected group,
//! a confirm with nothing pending) are ignored and return `Ok`.

mod drag;
mod draw;
mod resolve;


use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::geometry::point_at;
use crate::message::{InputEvent, PointerTarget};
use crate::model::{AnnotationGroup, GroupId, ShapeCategory};
use crate::state::{EditAction, EditPhase, Scene, WorkingEdit};
use crate::store::AnnotationStore;
use crate::view::{EditorEvent, ViewBinding, ViewCommand};

/// Interactive editor for a fixed number of region + direction groups.
pub struct AnnotationEditor<V: ViewBinding> {
    config: EditorConfig,
    view: Option<V>,
    store: AnnotationStore,
    scene: Scene,
    /// Present exactly when the editor is not idle
    edit: Option<WorkingEdit>,
    /// Group whose root and handles may be dragged
    selected: Option<GroupId>,
    /// Last known surface size
    surface: Option<(f32, f32)>,
}

impl<V: ViewBinding> AnnotationEditor<V> {
    /// Create an unmounted editor. Operations fail with `NotMounted` until a
    /// view is bound with [`mount`](Self::mount).
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        config.validate()?;
        Ok(Self {
            config,
            view: None,
            store: AnnotationStore::new(),
            scene: Scene::new(),
            edit: None,
            selected: None,
            surface: None,
        })
    }

    /// Bind a view and render the committed value into it.
    ///
    /// Returns the previously bound view, if any. Any pending edit is dropped.
    pub fn mount(&mut self, view: V) -> Option<V> {
        let previous = self.view.replace(view);
        self.scene.clear();
        self.edit = None;
        self.selected = None;
        self.render_store();
        self.resume_unfinished();
        log::info!("Editor mounted ({} groups)", self.store.len());
        previous
    }

    /// Unbind the view. Afterwards every operation fails with `NotMounted`.
    pub fn unmount(&mut self) -> Option<V> {
        self.scene.clear();
        self.edit = None;
        self.selected = None;
        let view = self.view.take();
        if view.is_some() {
            log::info!("Editor unmounted");
        }
        view
    }

    pub fn is_mounted(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut V> {
        self.view.as_mut()
    }

    /// Apply a new configuration. Committed geometry is left alone.
    pub fn configure(&mut self, config: EditorConfig) -> Result<(), EditorError> {
        config.validate()?;
        log::debug!(
            "Configured: type={:?}, sides={}, groups={}, drawable={}",
            config.kind,
            config.sides,
            config.groups,
            config.drawable
        );
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Whether every group slot is filled and no edit is pending.
    pub fn is_done(&self) -> Result<bool, EditorError> {
        self.ensure_mounted()?;
        Ok(self.edit.is_none() && self.store.count() >= self.config.groups)
    }

    /// The committed value, in absolute surface coordinates.
    pub fn value(&self) -> Result<&[AnnotationGroup], EditorError> {
        self.ensure_mounted()?;
        Ok(self.store.groups())
    }

    /// Number of fully committed groups.
    pub fn count(&self) -> usize {
        self.store.count()
    }

    pub fn phase(&self) -> EditPhase {
        self.edit.as_ref().map_or(EditPhase::Idle, |e| e.phase)
    }

    pub fn action(&self) -> EditAction {
        self.edit.as_ref().map_or(EditAction::None, |e| e.action)
    }

    /// Category of the shape being produced or manipulated.
    pub fn category(&self) -> Option<ShapeCategory> {
        self.edit.as_ref().map(|e| e.category)
    }

    pub fn working_edit(&self) -> Option<&WorkingEdit> {
        self.edit.as_ref()
    }

    pub fn selected(&self) -> Option<GroupId> {
        self.selected
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Route a raw input event to the matching operation.
    pub fn dispatch(&mut self, event: InputEvent) -> Result<(), EditorError> {
        log::trace!("dispatch: {:?}", event);
        match event {
            InputEvent::PointerDown {
                x,
                y,
                drawable,
                group,
            } => self.pointer_down(x, y, PointerTarget { drawable, group }),
            InputEvent::PointerMove { x, y } => self.pointer_move(x, y),
            InputEvent::PointerUp { x, y } => self.pointer_up(x, y),
            InputEvent::Hover { group } => self.hover(group),
            InputEvent::Select { group } => self.select(group),
            InputEvent::DragStart { target } => self.drag_start(target),
            InputEvent::DragMove { dx, dy } => self.drag_move(dx, dy),
            InputEvent::DragEnd => self.drag_end(),
            InputEvent::Confirm => self.confirm(),
            InputEvent::Reject => self.reject(),
            InputEvent::DeleteSelected => self.delete_selected(),
            InputEvent::Resize { width, height } => self.resize(width, height),
            InputEvent::SetValue { value } => self.set_value(&value).map(|_| ()),
            InputEvent::Configure { config } => self.configure(config),
        }
    }

    // ------------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------------

    fn ensure_mounted(&self) -> Result<(), EditorError> {
        if self.view.is_some() {
            Ok(())
        } else {
            Err(EditorError::NotMounted)
        }
    }

    fn emit(&mut self, command: ViewCommand) {
        if let Some(view) = self.view.as_mut() {
            view.apply(command);
        }
    }

    fn notify(&mut self, event: EditorEvent) {
        if let Some(view) = self.view.as_mut() {
            view.notify(event);
        }
    }

    fn notify_change(&mut self) {
        let value = self.store.groups().to_vec();
        self.notify(EditorEvent::Change { value });
    }

    /// Push the scene's geometry for one half of a group to the view.
    fn render_shape(&mut self, group: GroupId, category: ShapeCategory) {
        let Some(node) = self.scene.group(group) else {
            return;
        };
        let points = node.shape(category).to_vec();
        let command = match category {
            ShapeCategory::Polygon => ViewCommand::SetPolygon {
                group,
                points,
                closed: node.closed,
            },
            ShapeCategory::Arrow => ViewCommand::SetArrow { group, points },
        };
        self.emit(command);
    }

    /// Move every handle of one half of a group onto its vertex.
    fn render_handles(&mut self, group: GroupId, category: ShapeCategory) {
        let shape = self.scene.shape(group, category).to_vec();
        for (handle, index) in self.scene.handles_of(group, category) {
            if let Some((x, y)) = point_at(&shape, index) {
                self.emit(ViewCommand::MoveHandle { handle, x, y });
            }
        }
    }

    /// Bind a handle to a vertex and create it in the view.
    fn spawn_handle(&mut self, group: GroupId, category: ShapeCategory, index: usize) {
        let Some((x, y)) = point_at(self.scene.shape(group, category), index) else {
            return;
        };
        let handle = self.scene.add_handle(group, category, index);
        self.emit(ViewCommand::CreateHandle {
            handle,
            group,
            category,
            index,
            x,
            y,
        });
    }

    fn set_group_draggable(&mut self, group: GroupId, draggable: bool) {
        self.emit(ViewCommand::SetDraggable { group, draggable });
        for category in [ShapeCategory::Polygon, ShapeCategory::Arrow] {
            self.emit(ViewCommand::SetHandlesDraggable {
                group,
                category,
                draggable,
            });
        }
    }

    fn request_confirmation(&mut self, group: GroupId, points: Vec<f32>) {
        self.emit(ViewCommand::ShowConfirm {
            group,
            points: Some(points.clone()),
        });
        self.notify(EditorEvent::Confirm { points });
    }

    /// Create scene groups and view nodes for every committed group.
    fn render_store(&mut self) {
        let groups = self.store.groups().to_vec();
        let style = self.config.effective_style();
        for (index, entry) in groups.into_iter().enumerate() {
            let group = self.scene.insert_group(entry.kind.clone());
            if let Some(node) = self.scene.group_mut(group) {
                node.closed = true;
                node.entry = Some(index);
            }
            self.emit(ViewCommand::CreateGroup {
                group,
                style: style.clone(),
            });
            for category in [ShapeCategory::Polygon, ShapeCategory::Arrow] {
                let points = entry.geometry(category).to_vec();
                if points.is_empty() {
                    continue;
                }
                let vertices = points.len() / 2;
                self.scene.set_shape(group, category, points);
                self.render_shape(group, category);
                for index in 0..vertices {
                    self.spawn_handle(group, category, index);
                }
            }
            self.set_group_draggable(group, false);
        }
    }

    /// If a committed group still lacks its direction, continue with its arrow.
    fn resume_unfinished(&mut self) {
        let Some(entry) = self.store.first_unfinished() else {
            return;
        };
        if let Some(group) = self.scene.find_by_entry(entry) {
            log::debug!("Resuming arrow for group {} (entry {})", group, entry);
            self.edit = Some(WorkingEdit::awaiting_arrow(group));
            self.selected = Some(group);
            self.set_group_draggable(group, true);
        }
    }

    /// Store position and type tag of a rendered group.
    fn entry_of(&self, group: GroupId) -> (Option<usize>, Option<String>) {
        self.scene
            .group(group)
            .map_or((None, None), |node| (node.entry, node.kind.clone()))
    }

    /// Drop every rendered group and the session state.
    fn reset_session(&mut self) {
        for group in self.scene.group_ids() {
            self.emit(ViewCommand::DestroyGroup { group });
        }
        self.scene.clear();
        self.edit = None;
        self.selected = None;
        self.emit(ViewCommand::HideConfirm);
        self.emit(ViewCommand::HideHover);
        self.emit(ViewCommand::HideTooltip);
    }
}
