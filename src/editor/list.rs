//! Routes input across all polygon editors of the active item.
//!
//! The list owns one [`Polygon2d`] per committed polygon label of the current
//! item plus an optional draft being drawn. It decides which editor receives
//! each event, manages selection and highlight, dispatches the actions the
//! editors emit, and rebuilds itself from the store after every dispatch.

use std::collections::BTreeMap;

use super::error::EditError;
use super::input::{KeyState, Pick};
use super::polygon::{EditOutcome, Polygon2d};
use super::render::RenderSnapshot;
use crate::config::EditorConfig;
use crate::geometry::Vector2D;
use crate::keybindings::{EditorKey, KeyBindings};
use crate::model::{ItemIndex, LabelId, LabelType};
use crate::store::action::{change_select, delete_label};
use crate::store::{Action, Dispatcher, SelectUpdate};

/// Editors of the current item and the event routing between them.
#[derive(Debug)]
pub struct Label2dList<S: Dispatcher> {
    store: S,
    config: EditorConfig,
    keybindings: KeyBindings,
    keys: KeyState,
    /// Committed polygon labels, in ascending draw order
    labels: Vec<Polygon2d>,
    /// Polygon being drawn; its list index is `labels.len()`
    draft: Option<Polygon2d>,
    selected: Option<LabelId>,
    highlighted: Option<Pick>,
    item: ItemIndex,
}

impl<S: Dispatcher> Label2dList<S> {
    pub fn new(store: S, config: EditorConfig, keybindings: KeyBindings) -> Self {
        let mut list = Self {
            store,
            config,
            keybindings,
            keys: KeyState::new(),
            labels: Vec::new(),
            draft: None,
            selected: None,
            highlighted: None,
            item: 0,
        };
        list.sync();
        list
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the store. Call [`Self::sync`] after changing it.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Committed polygon editors, in ascending draw order.
    pub fn labels(&self) -> &[Polygon2d] {
        &self.labels
    }

    pub fn draft(&self) -> Option<&Polygon2d> {
        self.draft.as_ref()
    }

    pub fn item(&self) -> ItemIndex {
        self.item
    }

    pub fn selected_label(&self) -> Option<&Polygon2d> {
        let id = self.selected?;
        self.labels.iter().find(|label| label.label_id() == Some(id))
    }

    pub fn highlighted_label(&self) -> Option<&Polygon2d> {
        let pick = self.highlighted?;
        self.labels.get(pick.label)
    }

    /// Render snapshots of every editor, the draft last.
    pub fn snapshots(&self) -> Vec<RenderSnapshot> {
        let mut snapshots: Vec<_> = self
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| label.render_snapshot(i))
            .collect();
        if let Some(draft) = &self.draft {
            snapshots.push(draft.render_snapshot(self.labels.len()));
        }
        snapshots
    }

    // ========================================================================
    // Store synchronisation
    // ========================================================================

    /// Dispatch an action and rebuild the editors from the result.
    pub fn dispatch(&mut self, action: Action) -> Result<(), EditError> {
        self.store.dispatch(action)?;
        self.sync();
        Ok(())
    }

    /// Rebuild the editors from the current document version.
    pub fn sync(&mut self) {
        let state = self.store.state();
        let item = state.select.item;
        if item != self.item {
            log::debug!("📂 Label list switched to item {}", item);
            self.item = item;
            self.draft = None;
            self.highlighted = None;
        }
        self.selected = state
            .select
            .labels
            .get(&item)
            .and_then(|ids| ids.first().copied());

        let mut labels = Vec::new();
        if let Some(item_state) = state.item(item) {
            for label in item_state.labels.values() {
                if label.label_type != LabelType::Polygon2d {
                    continue;
                }
                let polygon = label.shapes.first().and_then(|shape_id| {
                    item_state
                        .shape(*shape_id)
                        .and_then(|shape| shape.shape.as_polygon().map(|p| (*shape_id, p)))
                });
                let Some((shape_id, polygon)) = polygon else {
                    log::warn!("⚠️ Label {} has no polygon shape", label.id);
                    continue;
                };
                let mut editor = Polygon2d::from_shape(label, shape_id, polygon, self.config);
                editor.set_selected(self.selected == Some(label.id));
                labels.push(editor);
            }
        }
        labels.sort_by_key(|editor| (editor.order(), editor.label_id()));
        self.labels = labels;

        if let Some(pick) = self.highlighted {
            match self.labels.get_mut(pick.label) {
                Some(editor) => editor.set_highlighted(Some(pick.handle)),
                None => self.highlighted = None,
            }
        }
        log::trace!("Synced {} polygon labels on item {}", self.labels.len(), item);
    }

    fn select(&mut self, label_id: Option<LabelId>) -> Result<(), EditError> {
        if self.selected == label_id {
            return Ok(());
        }
        let mut labels = BTreeMap::new();
        labels.insert(self.item, label_id.into_iter().collect());
        self.dispatch(change_select(SelectUpdate {
            labels: Some(labels),
            ..Default::default()
        }))
    }

    // ========================================================================
    // Hit testing
    // ========================================================================

    /// Resolve the handle under `coord` without a control-color readback.
    ///
    /// The draft is tested first, then the selected label, then the others
    /// from the top of the draw order down.
    pub fn pick_at(&self, coord: Vector2D) -> Option<Pick> {
        if let Some(draft) = &self.draft {
            return draft
                .hit_test(coord)
                .map(|handle| Pick::new(self.labels.len(), handle));
        }
        let selected = self
            .labels
            .iter()
            .position(|label| label.is_selected());
        let others = (0..self.labels.len()).rev().filter(|i| Some(*i) != selected);
        selected
            .into_iter()
            .chain(others)
            .find_map(|i| self.labels[i].hit_test(coord).map(|handle| Pick::new(i, handle)))
    }

    // ========================================================================
    // Pointer events
    // ========================================================================

    pub fn pointer_down(&mut self, coord: Vector2D) -> Result<(), EditError> {
        let pick = self.pick_at(coord);
        self.pointer_down_with(coord, pick)
    }

    pub fn pointer_move(&mut self, coord: Vector2D) -> Result<(), EditError> {
        let pick = self.pick_at(coord);
        self.pointer_move_with(coord, pick)
    }

    pub fn pointer_up(&mut self, coord: Vector2D) -> Result<(), EditError> {
        let pick = self.pick_at(coord);
        self.pointer_up_with(coord, pick)
    }

    /// Handle a press with the handle under the pointer already resolved.
    pub fn pointer_down_with(
        &mut self,
        coord: Vector2D,
        pick: Option<Pick>,
    ) -> Result<(), EditError> {
        if let Some(draft) = self.draft.as_mut() {
            draft.pointer_down(coord, None, &self.keys)?;
            return Ok(());
        }

        let pick = pick.filter(|pick| pick.label < self.labels.len());
        match pick {
            Some(pick) => {
                let label_id = self.labels[pick.label].label_id();
                self.select(label_id)?;
                let index = self.index_of(label_id).unwrap_or(pick.label);
                if let Some(editor) = self.labels.get_mut(index) {
                    editor.pointer_down(coord, Some(pick.handle), &self.keys)?;
                }
            }
            None => {
                self.select(None)?;
                let mut draft = self.new_draft();
                draft.pointer_down(coord, None, &self.keys)?;
                self.draft = Some(draft);
            }
        }
        Ok(())
    }

    /// Handle pointer motion with the handle under the pointer already resolved.
    pub fn pointer_move_with(
        &mut self,
        coord: Vector2D,
        pick: Option<Pick>,
    ) -> Result<(), EditError> {
        self.set_highlight(pick);
        if let Some(draft) = self.draft.as_mut() {
            return draft.pointer_move(coord);
        }
        match self.selected_index() {
            Some(index) => self.labels[index].pointer_move(coord),
            None => Ok(()),
        }
    }

    /// Handle a release with the handle under the pointer already resolved.
    pub fn pointer_up_with(
        &mut self,
        coord: Vector2D,
        pick: Option<Pick>,
    ) -> Result<(), EditError> {
        let outcome = if let Some(draft) = self.draft.as_mut() {
            let on_first_handle = pick == Some(Pick::new(self.labels.len(), 1));
            draft.pointer_up(coord, on_first_handle)?
        } else if let Some(index) = self.selected_index() {
            self.labels[index].pointer_up(coord, false)?
        } else {
            EditOutcome::Unchanged
        };
        self.apply_outcome(outcome)
    }

    // ========================================================================
    // Key events
    // ========================================================================

    pub fn key_down(&mut self, key: &str) -> Result<(), EditError> {
        let Some(key) = self.keybindings.editor_key(key) else {
            return Ok(());
        };
        self.keys.press(key);
        match key {
            EditorKey::DeleteVertex => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.delete_last_vertex()?;
                }
            }
            EditorKey::DeleteLabel => {
                if let (None, Some(label_id)) = (&self.draft, self.selected) {
                    log::info!("🗑️ Deleting label {}", label_id);
                    self.dispatch(delete_label(self.item, label_id))?;
                }
            }
            EditorKey::CancelDrawing => {
                if let Some(mut draft) = self.draft.take() {
                    if draft.cancel() == EditOutcome::Discarded {
                        log::debug!("✖️ Cancelled drawing");
                    }
                }
            }
            EditorKey::Curve => {}
        }
        Ok(())
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(key) = self.keybindings.editor_key(key) {
            self.keys.release(key);
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn new_draft(&self) -> Polygon2d {
        let state = self.store.state();
        Polygon2d::draft(
            self.item,
            vec![state.select.category],
            state.select.attributes.clone(),
            state.status.max_order + 1,
            state.status.next_label_id,
            self.config,
        )
    }

    fn apply_outcome(&mut self, outcome: EditOutcome) -> Result<(), EditError> {
        match outcome {
            EditOutcome::Commit(action) => {
                let is_new = matches!(action, Action::AddLabel { .. });
                let new_id = self.store.state().status.next_label_id;
                self.dispatch(action)?;
                if is_new {
                    self.draft = None;
                    self.select(Some(new_id))?;
                }
            }
            EditOutcome::Discarded => self.draft = None,
            EditOutcome::RolledBack | EditOutcome::Unchanged => {}
        }
        Ok(())
    }

    fn set_highlight(&mut self, pick: Option<Pick>) {
        for editor in self.labels.iter_mut() {
            editor.set_highlighted(None);
        }
        if let Some(draft) = self.draft.as_mut() {
            draft.set_highlighted(None);
        }
        self.highlighted = None;
        let Some(pick) = pick else {
            return;
        };
        if let Some(editor) = self.labels.get_mut(pick.label) {
            editor.set_highlighted(Some(pick.handle));
            self.highlighted = Some(pick);
        } else if pick.label == self.labels.len() {
            if let Some(draft) = self.draft.as_mut() {
                draft.set_highlighted(Some(pick.handle));
            }
        }
    }

    fn index_of(&self, label_id: Option<LabelId>) -> Option<usize> {
        label_id.and_then(|id| {
            self.labels
                .iter()
                .position(|label| label.label_id() == Some(id))
        })
    }

    fn selected_index(&self) -> Option<usize> {
        self.index_of(self.selected)
    }
}
