use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::{MapCoordinates, SavedMap};

/// Boundary to wherever maps actually live. The editor only ever talks to
/// this trait, so swapping file storage for a service is a construction-time
/// decision.
pub trait MapGateway {
    /// The map the room currently uses: the active one, or the most recently
    /// saved if none is marked active. `Ok(None)` means the room has no maps.
    fn load_active_map(&self, room: &str) -> Result<Option<SavedMap>, String>;
    /// All of the room's maps, newest first.
    fn list_maps(&self, room: &str) -> Result<Vec<SavedMap>, String>;
    /// Persists a new map and makes it the room's active one.
    fn save_map(&self, room: &str, name: &str, coords: MapCoordinates) -> Result<u64, String>;
    fn apply_map(&self, room: &str, id: u64) -> Result<(), String>;
    fn delete_map(&self, room: &str, id: u64) -> Result<(), String>;
}

#[derive(Serialize, Deserialize, Default)]
struct RoomDocument {
    next_id: u64,
    maps: Vec<SavedMap>,
}

/// One pretty-printed JSON document per room under the maps directory.
pub struct FileMapGateway {
    dir: PathBuf,
}

impl FileMapGateway {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn room_path(&self, room: &str) -> PathBuf {
        self.dir.join(format!("room-{room}.json"))
    }

    fn read_document(&self, path: &Path) -> Result<RoomDocument, String> {
        if !path.exists() {
            return Ok(RoomDocument {
                next_id: 1,
                maps: Vec::new(),
            });
        }
        let text = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
        serde_json::from_str(&text).map_err(|e| format!("parse {}: {e}", path.display()))
    }

    fn write_document(&self, path: &Path, doc: &RoomDocument) -> Result<(), String> {
        fs::create_dir_all(&self.dir).map_err(|e| format!("create {}: {e}", self.dir.display()))?;
        let text = serde_json::to_string_pretty(doc).map_err(|e| e.to_string())?;
        fs::write(path, text).map_err(|e| format!("write {}: {e}", path.display()))
    }
}

impl MapGateway for FileMapGateway {
    fn load_active_map(&self, room: &str) -> Result<Option<SavedMap>, String> {
        let doc = self.read_document(&self.room_path(room))?;
        let active = doc.maps.iter().find(|m| m.is_active).cloned();
        Ok(active.or_else(|| doc.maps.iter().max_by_key(|m| m.id).cloned()))
    }

    fn list_maps(&self, room: &str) -> Result<Vec<SavedMap>, String> {
        let mut maps = self.read_document(&self.room_path(room))?.maps;
        maps.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(maps)
    }

    fn save_map(&self, room: &str, name: &str, coords: MapCoordinates) -> Result<u64, String> {
        let path = self.room_path(room);
        let mut doc = self.read_document(&path)?;
        let id = doc.next_id.max(1);
        doc.next_id = id + 1;
        for map in &mut doc.maps {
            map.is_active = false;
        }
        doc.maps.push(SavedMap {
            id,
            name: name.to_string(),
            is_active: true,
            coordinates: coords,
        });
        self.write_document(&path, &doc)?;
        Ok(id)
    }

    fn apply_map(&self, room: &str, id: u64) -> Result<(), String> {
        let path = self.room_path(room);
        let mut doc = self.read_document(&path)?;
        if !doc.maps.iter().any(|m| m.id == id) {
            return Err(format!("map {id} not found for room {room}"));
        }
        for map in &mut doc.maps {
            map.is_active = map.id == id;
        }
        self.write_document(&path, &doc)
    }

    fn delete_map(&self, room: &str, id: u64) -> Result<(), String> {
        let path = self.room_path(room);
        let mut doc = self.read_document(&path)?;
        let before = doc.maps.len();
        doc.maps.retain(|m| m.id != id);
        if doc.maps.len() == before {
            return Err(format!("map {id} not found for room {room}"));
        }
        self.write_document(&path, &doc)
    }
}

/// Monotonic token source for in-flight map loads. Switching rooms while a
/// load is pending issues a newer token; a completion carrying an older one
/// is dropped so a slow response never clobbers the current room.
#[derive(Default)]
pub struct LoadSequencer {
    latest: u64,
}

impl LoadSequencer {
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn accept(&self, token: u64) -> bool {
        token == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ZoneRecord;

    fn record(selector: &str) -> ZoneRecord {
        ZoneRecord {
            selector: selector.to_string(),
            top: 1.0,
            left: 2.0,
            width: 3.0,
            height: 4.0,
        }
    }

    fn gateway() -> (tempfile::TempDir, FileMapGateway) {
        let dir = tempfile::tempdir().unwrap();
        let gw = FileMapGateway::new(dir.path().join("maps"));
        (dir, gw)
    }

    #[test]
    fn save_then_load_round_trips_records() {
        let (_dir, gw) = gateway();
        let coords = MapCoordinates::Zones(vec![record("door"), record("counter")]);
        let id = gw.save_map("1", "first", coords.clone()).unwrap();
        let active = gw.load_active_map("1").unwrap().unwrap();
        assert_eq!(active.id, id);
        assert_eq!(active.name, "first");
        assert!(active.is_active);
        assert_eq!(active.coordinates, coords);
    }

    #[test]
    fn save_makes_newest_map_active() {
        let (_dir, gw) = gateway();
        let a = gw
            .save_map("1", "a", MapCoordinates::Zones(vec![record("x")]))
            .unwrap();
        let b = gw
            .save_map("1", "b", MapCoordinates::Zones(vec![record("y")]))
            .unwrap();
        assert!(b > a);
        let maps = gw.list_maps("1").unwrap();
        assert_eq!(maps[0].id, b);
        assert!(maps[0].is_active);
        assert!(!maps[1].is_active);
    }

    #[test]
    fn apply_switches_the_active_map() {
        let (_dir, gw) = gateway();
        let a = gw
            .save_map("1", "a", MapCoordinates::Zones(vec![record("x")]))
            .unwrap();
        gw.save_map("1", "b", MapCoordinates::Zones(vec![record("y")]))
            .unwrap();
        gw.apply_map("1", a).unwrap();
        assert_eq!(gw.load_active_map("1").unwrap().unwrap().id, a);
    }

    #[test]
    fn active_falls_back_to_most_recent() {
        let (_dir, gw) = gateway();
        let a = gw
            .save_map("1", "a", MapCoordinates::Zones(vec![record("x")]))
            .unwrap();
        let b = gw
            .save_map("1", "b", MapCoordinates::Zones(vec![record("y")]))
            .unwrap();
        gw.delete_map("1", b).unwrap();
        // Nothing is flagged active anymore; newest surviving map wins.
        assert_eq!(gw.load_active_map("1").unwrap().unwrap().id, a);
    }

    #[test]
    fn rooms_do_not_share_maps() {
        let (_dir, gw) = gateway();
        gw.save_map("1", "a", MapCoordinates::Zones(vec![record("x")]))
            .unwrap();
        assert!(gw.load_active_map("2").unwrap().is_none());
        assert!(gw.list_maps("2").unwrap().is_empty());
    }

    #[test]
    fn delete_and_apply_report_missing_ids() {
        let (_dir, gw) = gateway();
        assert!(gw.delete_map("1", 7).is_err());
        assert!(gw.apply_map("1", 7).is_err());
    }

    #[test]
    fn stale_load_token_is_rejected() {
        let mut seq = LoadSequencer::default();
        let first = seq.begin();
        let second = seq.begin();
        assert!(!seq.accept(first));
        assert!(seq.accept(second));
    }
}
