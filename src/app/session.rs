use eframe::egui;
use std::collections::HashSet;

use super::store::ZoneStore;
use super::{ResizeHandle, Tool};

/// Snap-to-grid configuration, global to the editing session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapConfig {
    pub enabled: bool,
    pub size: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            size: 5.0,
        }
    }
}

impl SnapConfig {
    pub fn set_size(&mut self, size: f32) {
        self.size = size.max(1.0);
    }
}

/// Ephemeral drag state, alive only between pointer-down and pointer-up.
#[derive(Clone, Debug)]
pub enum DragSession {
    Creating {
        id: u64,
        start: egui::Pos2,
    },
    Moving {
        start: egui::Pos2,
        /// Per-zone position at drag start so each member translates from its
        /// own origin and relative spacing is preserved.
        origins: Vec<(u64, egui::Pos2)>,
        reorder_target: Option<u64>,
    },
    Resizing {
        id: u64,
        handle: ResizeHandle,
        orig: egui::Rect,
    },
}

/// All mutable editor state for one room. Selecting a different room replaces
/// the session wholesale; nothing in here outlives the room it was created
/// for.
pub struct EditorSession {
    pub room: String,
    pub store: ZoneStore,
    pub selected: HashSet<u64>,
    pub tool: Tool,
    pub drag: Option<DragSession>,
    pub snap: SnapConfig,
    /// Memo key (`room|WxH`) of the last applied rebase, so repeated layout
    /// passes over the same image never double-scale.
    pub rebase_key: String,
}

impl EditorSession {
    pub fn new(room: &str) -> Self {
        Self {
            room: room.to_string(),
            store: ZoneStore::new(),
            selected: HashSet::new(),
            tool: Tool::Select,
            drag: None,
            snap: SnapConfig::default(),
            rebase_key: String::new(),
        }
    }

    /// The single selected zone, defined only when exactly one is selected.
    pub fn primary_selected(&self) -> Option<u64> {
        if self.selected.len() == 1 {
            self.selected.iter().copied().next()
        } else {
            None
        }
    }

    /// Selected ids in paint order.
    pub fn selected_in_order(&self) -> Vec<u64> {
        self.store
            .order()
            .iter()
            .copied()
            .filter(|id| self.selected.contains(id))
            .collect()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn set_selection_single(&mut self, id: u64) {
        self.selected.clear();
        self.selected.insert(id);
    }

    pub fn toggle_selection(&mut self, id: u64) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Drops selection entries whose zone no longer exists.
    pub fn prune_selection(&mut self) {
        let store = &self.store;
        self.selected.retain(|id| store.get(*id).is_some());
    }

    pub fn reorder_target(&self) -> Option<u64> {
        match &self.drag {
            Some(DragSession::Moving { reorder_target, .. }) => *reorder_target,
            _ => None,
        }
    }
}
