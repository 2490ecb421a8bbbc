use eframe::egui;
use serde::{Deserialize, Serialize};

/// A named rectangular hot zone in image space. Geometry is authored and
/// persisted in the background image's intrinsic pixel coordinates, so it
/// stays meaningful at any on-screen scale.
#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
    pub id: u64,
    pub selector: String,
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl Zone {
    pub fn rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(
            egui::pos2(self.left, self.top),
            egui::vec2(self.width.max(0.0), self.height.max(0.0)),
        )
    }

    pub fn contains(&self, p: egui::Pos2) -> bool {
        self.rect().contains(p)
    }
}

/// Wire form of a zone. Ids are never persisted; they are regenerated on load.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ZoneRecord {
    pub selector: String,
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl ZoneRecord {
    pub fn from_zone(zone: &Zone) -> Self {
        Self {
            selector: zone.selector.clone(),
            top: zone.top,
            left: zone.left,
            width: zone.width,
            height: zone.height,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Polygon {
    #[serde(default)]
    pub points: Vec<[f32; 2]>,
}

/// Coordinates payload of a saved map. Current maps store zone records
/// directly; maps authored by the old polygon editor store point lists and
/// are collapsed to bounding boxes on load.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MapCoordinates {
    Zones(Vec<ZoneRecord>),
    Polygons { polygons: Vec<Polygon> },
}

impl MapCoordinates {
    pub fn into_records(self) -> Vec<ZoneRecord> {
        match self {
            MapCoordinates::Zones(records) => records,
            MapCoordinates::Polygons { polygons } => polygons
                .iter()
                .enumerate()
                .filter_map(|(i, poly)| polygon_bounds(poly).map(|b| (i, b)))
                .map(|(i, (x1, y1, x2, y2))| ZoneRecord {
                    selector: format!("area-{}", i + 1),
                    top: y1,
                    left: x1,
                    width: x2 - x1,
                    height: y2 - y1,
                })
                .collect(),
        }
    }
}

fn polygon_bounds(poly: &Polygon) -> Option<(f32, f32, f32, f32)> {
    let mut it = poly.points.iter();
    let first = it.next()?;
    let (mut x1, mut y1, mut x2, mut y2) = (first[0], first[1], first[0], first[1]);
    for p in it {
        x1 = x1.min(p[0]);
        y1 = y1.min(p[1]);
        x2 = x2.max(p[0]);
        y2 = y2.max(p[1]);
    }
    Some((x1, y1, x2, y2))
}

/// A persisted, named collection of zones for one room.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SavedMap {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    pub coordinates: MapCoordinates,
}
