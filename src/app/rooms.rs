use std::fs;
use std::path::Path;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::{Deserialize, Serialize};

/// How a room's background is presented, which decides whether saved zones go
/// through the baseline rebase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderContext {
    Page,
    Modal,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoomInfo {
    pub number: String,
    pub name: String,
    pub render_context: RenderContext,
    #[serde(default)]
    pub target_aspect: Option<f32>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    rooms: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    number: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    render_context: Option<RenderContext>,
    #[serde(default)]
    target_aspect: Option<f32>,
}

/// Canonical room key from free-form input: "main" is room 0, digit strings
/// pass through, single letters uppercase. Anything else is not a room.
pub fn normalize_room(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if s.eq_ignore_ascii_case("main") {
        return Some("0".to_string());
    }
    if s.chars().all(|c| c.is_ascii_digit()) {
        return Some(s.to_string());
    }
    if s.len() == 1 && s.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(s.to_ascii_uppercase());
    }
    None
}

fn fallback_name(number: &str) -> String {
    if number.chars().all(|c| c.is_ascii_alphabetic()) {
        "Landing".to_string()
    } else if number == "0" {
        "Main Room".to_string()
    } else {
        format!("Room {number}")
    }
}

fn fallback_context(number: &str) -> RenderContext {
    if number == "A" || number == "0" {
        RenderContext::Page
    } else {
        RenderContext::Modal
    }
}

/// Letter rooms first (alphabetical), then numeric rooms ascending.
fn sort_rooms(rooms: &mut [RoomInfo]) {
    rooms.sort_by(|a, b| {
        let an = a.number.parse::<u64>().ok();
        let bn = b.number.parse::<u64>().ok();
        match (an, bn) {
            (None, None) => a.number.cmp(&b.number),
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(x), Some(y)) => x.cmp(&y),
        }
    });
}

/// Loads the room catalog from a TOML file, normalizing keys and filling the
/// gaps the file leaves. Unreadable or unparsable catalogs are reported, not
/// fatal; the caller keeps an empty list.
pub fn load_catalog(path: &Path) -> Result<Vec<RoomInfo>, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
    let file: CatalogFile =
        toml::from_str(&text).map_err(|e| format!("parse {}: {e}", path.display()))?;
    let mut rooms: Vec<RoomInfo> = file
        .rooms
        .into_iter()
        .filter_map(|entry| {
            let number = normalize_room(&entry.number)?;
            Some(RoomInfo {
                name: entry
                    .name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| fallback_name(&number)),
                render_context: entry
                    .render_context
                    .unwrap_or_else(|| fallback_context(&number)),
                target_aspect: entry.target_aspect,
                number,
            })
        })
        .collect();
    sort_rooms(&mut rooms);
    Ok(rooms)
}

/// Picker filter: empty query keeps everything, otherwise fuzzy-match the
/// query against "number name", best scores first.
pub fn filter_rooms<'a>(
    matcher: &SkimMatcherV2,
    rooms: &'a [RoomInfo],
    query: &str,
) -> Vec<&'a RoomInfo> {
    let query = query.trim();
    if query.is_empty() {
        return rooms.iter().collect();
    }
    let mut scored: Vec<(i64, &RoomInfo)> = rooms
        .iter()
        .filter_map(|room| {
            let haystack = format!("{} {}", room.number, room.name);
            matcher.fuzzy_match(&haystack, query).map(|s| (s, room))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, r)| r).collect()
}
