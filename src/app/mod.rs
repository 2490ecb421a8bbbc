use eframe::egui;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::model::{MapCoordinates, SavedMap, ZoneRecord};

mod command;
mod gateway;
mod interaction;
mod rebase;
mod render;
mod rooms;
mod session;
mod settings;
mod store;
mod transform;
mod update;

use gateway::{FileMapGateway, LoadSequencer, MapGateway};
use rooms::{RenderContext, RoomInfo};
use session::EditorSession;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tool {
    Select,
    Create,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ResizeHandle {
    NW,
    N,
    NE,
    W,
    E,
    SW,
    S,
    SE,
}

impl ResizeHandle {
    fn north(self) -> bool {
        matches!(self, Self::NW | Self::N | Self::NE)
    }

    fn south(self) -> bool {
        matches!(self, Self::SW | Self::S | Self::SE)
    }

    fn west(self) -> bool {
        matches!(self, Self::NW | Self::W | Self::SW)
    }

    fn east(self) -> bool {
        matches!(self, Self::NE | Self::E | Self::SE)
    }
}

struct Background {
    texture: egui::TextureHandle,
    natural: egui::Vec2,
}

pub struct ZoneMapApp {
    session: EditorSession,
    gateway: Box<dyn MapGateway>,
    loads: LoadSequencer,
    rooms: Vec<RoomInfo>,
    room_filter: String,
    matcher: SkimMatcherV2,
    current_room: Option<RoomInfo>,
    background: Option<Background>,
    saved_maps: Vec<SavedMap>,
    map_name: String,
    status: Option<String>,
    maps_dir: String,
    images_dir: String,
    rooms_path: String,
    move_step: f32,
    move_step_fast: f32,
    settings_path: String,
}

impl ZoneMapApp {
    fn config_path() -> Option<String> {
        if let Some(home) = std::env::var_os("HOME") {
            let path = std::path::PathBuf::from(home).join(".config").join("zonemap.toml");
            if path.exists() {
                return Some(path.display().to_string());
            }
        }
        if std::path::Path::new("settings.toml").exists() {
            return Some("settings.toml".to_string());
        }
        None
    }

    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings_path = Self::config_path().unwrap_or_else(|| "settings.toml".to_string());
        let settings = settings::load_settings(&settings_path)
            .or_else(|| settings::load_settings("settings.json"))
            .unwrap_or_default();

        let (rooms, status) = match rooms::load_catalog(std::path::Path::new(&settings.rooms_path))
        {
            Ok(rooms) => (rooms, None),
            Err(e) => (Vec::new(), Some(e)),
        };

        let mut session = EditorSession::new("0");
        session.snap.enabled = settings.snap_to_grid;
        session.snap.set_size(settings.grid_size);

        Self {
            session,
            gateway: Box::new(FileMapGateway::new(settings.maps_dir.clone().into())),
            loads: LoadSequencer::default(),
            rooms,
            room_filter: String::new(),
            matcher: SkimMatcherV2::default(),
            current_room: None,
            background: None,
            saved_maps: Vec::new(),
            map_name: String::new(),
            status,
            maps_dir: settings.maps_dir,
            images_dir: settings.images_dir,
            rooms_path: settings.rooms_path,
            move_step: settings.move_step,
            move_step_fast: settings.move_step_fast,
            settings_path,
        }
    }

    fn persist_settings(&mut self) {
        let settings = settings::AppSettings {
            maps_dir: self.maps_dir.clone(),
            images_dir: self.images_dir.clone(),
            rooms_path: self.rooms_path.clone(),
            snap_to_grid: self.session.snap.enabled,
            grid_size: self.session.snap.size,
            move_step: self.move_step,
            move_step_fast: self.move_step_fast,
        };
        if let Err(e) = settings::save_settings(&self.settings_path, &settings) {
            self.status = Some(format!("Failed to save settings: {e}"));
        }
    }

    /// Switches the editor to `room`: fresh session, background resolution,
    /// token-guarded map load, saved-map list refresh.
    fn select_room(&mut self, ctx: &egui::Context, room: RoomInfo) {
        let snap = self.session.snap;
        self.session = EditorSession::new(&room.number);
        self.session.snap = snap;
        self.background = None;
        self.load_background(ctx, &room);
        self.current_room = Some(room.clone());

        let token = self.loads.begin();
        let result = self.gateway.load_active_map(&room.number);
        self.finish_load(token, result);
        self.refresh_saved_maps(&room.number);
    }

    /// Applies a completed map load unless a newer request superseded it.
    fn finish_load(&mut self, token: u64, result: Result<Option<SavedMap>, String>) {
        if !self.loads.accept(token) {
            return;
        }
        match result {
            Ok(Some(map)) => {
                self.map_name = map.name.clone();
                self.session.store.load_records(map.coordinates.into_records());
                self.session.clear_selection();
                self.rebase_if_needed();
                self.status = Some(format!("Loaded map \"{}\"", self.map_name));
            }
            Ok(None) => {
                self.map_name = String::new();
                self.status = Some("No saved maps for this room".to_string());
            }
            Err(e) => self.status = Some(format!("Load failed: {e}")),
        }
    }

    fn refresh_saved_maps(&mut self, room: &str) {
        match self.gateway.list_maps(room) {
            Ok(maps) => self.saved_maps = maps,
            Err(e) => self.status = Some(format!("List failed: {e}")),
        }
    }

    /// Resolves and decodes the room's background, webp first then png.
    fn load_background(&mut self, ctx: &egui::Context, room: &RoomInfo) {
        let base = std::path::Path::new(&self.images_dir)
            .join(format!("background-room{}", room.number));
        let candidates = [base.with_extension("webp"), base.with_extension("png")];
        let Some(path) = candidates.iter().find(|p| p.exists()) else {
            self.status = Some(format!("No background image for room {}", room.number));
            return;
        };
        match image::open(path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (w, h) = rgba.dimensions();
                let color = egui::ColorImage::from_rgba_unmultiplied(
                    [w as usize, h as usize],
                    rgba.as_raw(),
                );
                let texture = ctx.load_texture(
                    format!("background-room{}", room.number),
                    color,
                    egui::TextureOptions::LINEAR,
                );
                self.background = Some(Background {
                    texture,
                    natural: egui::vec2(w as f32, h as f32),
                });
            }
            Err(e) => {
                self.status = Some(format!("Background decode failed: {e}"));
            }
        }
    }

    /// Runs the baseline rebase once geometry and image are both known.
    fn rebase_if_needed(&mut self) {
        let (Some(room), Some(bg)) = (&self.current_room, &self.background) else {
            return;
        };
        if rebase::maybe_rebase(&mut self.session, room.render_context, bg.natural.x, bg.natural.y)
        {
            self.status = Some("Rescaled zones to background resolution".to_string());
        }
    }

    fn save_current_map(&mut self) {
        let Some(room) = self.current_room.clone() else {
            self.status = Some("Select a room first".to_string());
            return;
        };
        let name = if self.map_name.trim().is_empty() {
            format!("map-{}", self.saved_maps.len() + 1)
        } else {
            self.map_name.trim().to_string()
        };
        let coords = MapCoordinates::Zones(self.session.store.records());
        match self.gateway.save_map(&room.number, &name, coords) {
            Ok(id) => {
                self.map_name = name.clone();
                self.status = Some(format!("Saved map \"{name}\" (#{id})"));
                self.refresh_saved_maps(&room.number);
            }
            Err(e) => self.status = Some(format!("Save failed: {e}")),
        }
    }

    fn apply_saved_map(&mut self, id: u64) {
        let Some(room) = self.current_room.clone() else {
            return;
        };
        if let Err(e) = self.gateway.apply_map(&room.number, id) {
            self.status = Some(format!("Apply failed: {e}"));
            return;
        }
        let token = self.loads.begin();
        let result = self.gateway.load_active_map(&room.number);
        self.finish_load(token, result);
        self.refresh_saved_maps(&room.number);
    }

    fn delete_saved_map(&mut self, id: u64) {
        let Some(room) = self.current_room.clone() else {
            return;
        };
        match self.gateway.delete_map(&room.number, id) {
            Ok(()) => {
                self.status = Some("Deleted map".to_string());
                self.refresh_saved_maps(&room.number);
            }
            Err(e) => self.status = Some(format!("Delete failed: {e}")),
        }
    }

    /// Reads a map from a user-picked JSON file into the store. A parse
    /// failure leaves the current zones untouched.
    fn import_map_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        else {
            return;
        };
        let parsed: Result<MapCoordinates, String> = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()));
        match parsed {
            Ok(coords) => {
                self.session.store.load_records(coords.into_records());
                self.session.clear_selection();
                self.rebase_if_needed();
                self.status = Some(format!("Imported {}", path.display()));
            }
            Err(e) => self.status = Some(format!("Import failed: {e}")),
        }
    }

    fn export_map_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("map.json")
            .save_file()
        else {
            return;
        };
        let records: Vec<ZoneRecord> = self.session.store.records();
        let result = serde_json::to_string_pretty(&records)
            .map_err(|e| e.to_string())
            .and_then(|s| std::fs::write(&path, s).map_err(|e| e.to_string()));
        match result {
            Ok(()) => self.status = Some(format!("Exported {}", path.display())),
            Err(e) => self.status = Some(format!("Export failed: {e}")),
        }
    }

    /// Canvas aspect for the current room: page rooms honor an explicit
    /// target aspect, otherwise the background's own aspect; 10:7 while
    /// nothing is decoded.
    fn frame_aspect(&self) -> f32 {
        let image_aspect = self
            .background
            .as_ref()
            .filter(|bg| bg.natural.y > 0.0)
            .map(|bg| bg.natural.x / bg.natural.y);
        match &self.current_room {
            Some(room) if room.render_context == RenderContext::Page => room
                .target_aspect
                .or(image_aspect)
                .unwrap_or(1280.0 / 896.0),
            _ => image_aspect.unwrap_or(1280.0 / 896.0),
        }
    }
}
