use std::collections::HashMap;

use crate::model::{Zone, ZoneRecord};

/// Ordered arena of zones. Geometry lives in the map keyed by id; paint order
/// is the separate `order` vector (later entries draw on top), so mutating a
/// zone's geometry never invalidates iteration over the order.
#[derive(Default)]
pub struct ZoneStore {
    zones: HashMap<u64, Zone>,
    order: Vec<u64>,
    next_id: u64,
}

impl ZoneStore {
    pub fn new() -> Self {
        Self {
            zones: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Advisory default name for the next zone: `area-{count+1}` at call
    /// time. Renames do not affect later allocations.
    pub fn next_selector(&self) -> String {
        format!("area-{}", self.order.len() + 1)
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add(&mut self, selector: String, top: f32, left: f32, width: f32, height: f32) -> u64 {
        let id = self.allocate_id();
        self.zones.insert(
            id,
            Zone {
                id,
                selector,
                top,
                left,
                width,
                height,
            },
        );
        self.order.push(id);
        id
    }

    pub fn remove(&mut self, id: u64) {
        self.zones.remove(&id);
        self.order.retain(|z| *z != id);
    }

    pub fn get(&self, id: u64) -> Option<&Zone> {
        self.zones.get(&id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Zone> {
        self.zones.get_mut(&id)
    }

    pub fn order(&self) -> &[u64] {
        &self.order
    }

    /// Zones in paint order.
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.order.iter().filter_map(|id| self.zones.get(id))
    }

    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.order.iter().position(|z| *z == id)
    }

    pub fn move_up(&mut self, id: u64) {
        if let Some(idx) = self.index_of(id) {
            if idx > 0 {
                self.order.swap(idx - 1, idx);
            }
        }
    }

    pub fn move_down(&mut self, id: u64) {
        if let Some(idx) = self.index_of(id) {
            if idx + 1 < self.order.len() {
                self.order.swap(idx, idx + 1);
            }
        }
    }

    /// Clones a zone with a small offset so the copy is visibly distinct,
    /// inserting it immediately after the source.
    pub fn duplicate(&mut self, id: u64) -> Option<u64> {
        let idx = self.index_of(id)?;
        let src = self.zones.get(&id)?.clone();
        let new_id = self.allocate_id();
        let selector = if src.selector.is_empty() {
            self.next_selector()
        } else {
            format!("{}-copy", src.selector)
        };
        self.zones.insert(
            new_id,
            Zone {
                id: new_id,
                selector,
                top: src.top + 10.0,
                left: src.left + 10.0,
                width: src.width,
                height: src.height,
            },
        );
        self.order.insert(idx + 1, new_id);
        Some(new_id)
    }

    /// Extracts `ids` as a block (preserving their relative order) and
    /// reinserts it immediately before `target`. Used by drag-reordering;
    /// a vanished target appends the block at the end.
    pub fn reorder_before(&mut self, ids: &[u64], target: u64) {
        if ids.contains(&target) {
            return;
        }
        let block: Vec<u64> = self.order.iter().copied().filter(|z| ids.contains(z)).collect();
        if block.is_empty() {
            return;
        }
        self.order.retain(|z| !ids.contains(z));
        let at = self.index_of(target).unwrap_or(self.order.len());
        self.order.splice(at..at, block);
    }

    /// Single-row reorder for the sidebar list: moves `id` to the position
    /// currently held by `target`.
    pub fn reorder_row(&mut self, id: u64, target: u64) {
        if id == target {
            return;
        }
        let (Some(from), Some(to)) = (self.index_of(id), self.index_of(target)) else {
            return;
        };
        let moved = self.order.remove(from);
        self.order.insert(to, moved);
    }

    pub fn clear(&mut self) {
        self.zones.clear();
        self.order.clear();
    }

    pub fn records(&self) -> Vec<ZoneRecord> {
        self.zones().map(ZoneRecord::from_zone).collect()
    }

    /// Replaces the whole store from wire records, regenerating ids. Width
    /// and height are floored at one unit so degenerate saved data stays
    /// grabbable in the editor.
    pub fn load_records(&mut self, records: Vec<ZoneRecord>) {
        self.clear();
        for (i, r) in records.into_iter().enumerate() {
            let selector = if r.selector.is_empty() {
                format!("area-{}", i + 1)
            } else {
                r.selector
            };
            self.add(
                selector,
                r.top,
                r.left,
                r.width.max(1.0),
                r.height.max(1.0),
            );
        }
    }

    /// Rescales every zone in place. Used by the rebase adapter.
    pub fn scale_all(&mut self, sx: f32, sy: f32) {
        for zone in self.zones.values_mut() {
            zone.left *= sx;
            zone.top *= sy;
            zone.width *= sx;
            zone.height *= sy;
        }
    }
}
