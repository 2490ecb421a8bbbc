use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub(super) struct AppSettings {
    pub maps_dir: String,
    pub images_dir: String,
    pub rooms_path: String,
    pub snap_to_grid: bool,
    pub grid_size: f32,
    pub move_step: f32,
    pub move_step_fast: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            maps_dir: "maps".to_string(),
            images_dir: "images".to_string(),
            rooms_path: "rooms.toml".to_string(),
            snap_to_grid: false,
            grid_size: 5.0,
            move_step: 1.0,
            move_step_fast: 10.0,
        }
    }
}

pub(super) fn load_settings(path: &str) -> Option<AppSettings> {
    let s = std::fs::read_to_string(path).ok()?;
    if path.ends_with(".toml") {
        toml::from_str::<AppSettings>(&s)
            .ok()
            .or_else(|| serde_json::from_str::<AppSettings>(&s).ok())
    } else {
        serde_json::from_str::<AppSettings>(&s)
            .ok()
            .or_else(|| toml::from_str::<AppSettings>(&s).ok())
    }
}

pub(super) fn save_settings(path: &str, settings: &AppSettings) -> Result<(), String> {
    if path.ends_with(".toml") {
        let toml = toml::to_string_pretty(settings).map_err(|e| e.to_string())?;
        std::fs::write(path, toml).map_err(|e| e.to_string())
    } else {
        let json = serde_json::to_string_pretty(settings).map_err(|e| e.to_string())?;
        std::fs::write(path, json).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let path = path.to_string_lossy().to_string();
        let mut settings = AppSettings::default();
        settings.grid_size = 10.0;
        settings.snap_to_grid = true;
        save_settings(&path, &settings).unwrap();
        let back = load_settings(&path).unwrap();
        assert_eq!(back.grid_size, 10.0);
        assert!(back.snap_to_grid);
    }

    #[test]
    fn missing_file_yields_none() {
        assert!(load_settings("definitely-not-here.toml").is_none());
    }
}
