use eframe::egui;

use super::ResizeHandle;
use super::session::SnapConfig;
use super::store::ZoneStore;

/// Smallest dimension a zone may reach through any interactive operation.
pub const MIN_SIZE: f32 = 1.0;

/// Handle anchor points for a zone's rect: four corners plus four edge
/// midpoints, tagged with their compass identity.
pub fn handle_points(rect: egui::Rect) -> [(ResizeHandle, egui::Pos2); 8] {
    let (x1, y1) = (rect.min.x, rect.min.y);
    let (x2, y2) = (rect.max.x, rect.max.y);
    let cx = (x1 + x2) * 0.5;
    let cy = (y1 + y2) * 0.5;
    [
        (ResizeHandle::NW, egui::pos2(x1, y1)),
        (ResizeHandle::N, egui::pos2(cx, y1)),
        (ResizeHandle::NE, egui::pos2(x2, y1)),
        (ResizeHandle::E, egui::pos2(x2, cy)),
        (ResizeHandle::SE, egui::pos2(x2, y2)),
        (ResizeHandle::S, egui::pos2(cx, y2)),
        (ResizeHandle::SW, egui::pos2(x1, y2)),
        (ResizeHandle::W, egui::pos2(x1, cy)),
    ]
}

/// Resolves a pointer-down against a zone's resize handles. `radius` is the
/// hit tolerance in image units (screen pixels divided by the surface scale,
/// so handles stay grabbable at any zoom).
pub fn hit_handle(rect: egui::Rect, pos: egui::Pos2, radius: f32) -> Option<ResizeHandle> {
    handle_points(rect)
        .into_iter()
        .find(|(_, p)| (pos - *p).abs().max_elem() <= radius)
        .map(|(h, _)| h)
}

/// Topmost zone under the pointer, honoring paint order (later draws on top).
pub fn topmost_zone_at(store: &ZoneStore, pos: egui::Pos2) -> Option<u64> {
    store
        .order()
        .iter()
        .rev()
        .copied()
        .find(|id| store.get(*id).is_some_and(|z| z.contains(pos)))
}

/// Topmost zone under the pointer that is not part of the moving selection;
/// the live reorder target during a move drag.
pub fn reorder_target_at(store: &ZoneStore, pos: egui::Pos2, exclude: &[u64]) -> Option<u64> {
    store
        .order()
        .iter()
        .rev()
        .copied()
        .filter(|id| !exclude.contains(id))
        .find(|id| store.get(*id).is_some_and(|z| z.contains(pos)))
}

/// Geometry of an in-progress create drag: per-axis min/abs normalization,
/// with shift collapsing the smaller axis to a line.
pub fn create_rect(start: egui::Pos2, current: egui::Pos2, shift: bool) -> egui::Rect {
    let left = start.x.min(current.x);
    let top = start.y.min(current.y);
    let mut w = (current.x - start.x).abs();
    let mut h = (current.y - start.y).abs();
    if shift {
        if w > h {
            h = MIN_SIZE;
        } else {
            w = MIN_SIZE;
        }
    }
    egui::Rect::from_min_size(egui::pos2(left, top), egui::vec2(w, h))
}

/// Geometry of an in-progress resize: only the active handle's edges follow
/// the pointer, refused past the opposite edge so neither dimension drops
/// below `MIN_SIZE`.
pub fn resize_rect(
    orig: egui::Rect,
    handle: ResizeHandle,
    pos: egui::Pos2,
    shift: bool,
) -> egui::Rect {
    let (mut x1, mut y1) = (orig.min.x, orig.min.y);
    let (mut x2, mut y2) = (orig.max.x, orig.max.y);
    if handle.north() {
        y1 = pos.y.min(orig.max.y - MIN_SIZE);
    }
    if handle.south() {
        y2 = pos.y.max(orig.min.y + MIN_SIZE);
    }
    if handle.west() {
        x1 = pos.x.min(orig.max.x - MIN_SIZE);
    }
    if handle.east() {
        x2 = pos.x.max(orig.min.x + MIN_SIZE);
    }
    let mut w = x2 - x1;
    let mut h = y2 - y1;
    if shift {
        if w > h {
            h = MIN_SIZE;
        } else {
            w = MIN_SIZE;
        }
    }
    egui::Rect::from_min_size(egui::pos2(x1, y1), egui::vec2(w, h))
}

/// Translation for a move drag: dominant-axis lock under shift, then clamped
/// so no zone's top/left goes negative (clamping happens per zone).
pub fn move_delta(start: egui::Pos2, current: egui::Pos2, shift: bool) -> egui::Vec2 {
    let mut d = current - start;
    if shift {
        if d.x.abs() > d.y.abs() {
            d.y = 0.0;
        } else {
            d.x = 0.0;
        }
    }
    d
}

fn quantize(v: f32, step: f32) -> f32 {
    (v / step).round() * step
}

/// Final quantization pass for create/resize geometry: all four edges land on
/// grid lines and each dimension is floored at one grid unit.
pub fn snap_rect(rect: egui::Rect, snap: &SnapConfig) -> egui::Rect {
    if !snap.enabled {
        return rect;
    }
    let step = snap.size.max(1.0);
    let left = quantize(rect.min.x, step);
    let top = quantize(rect.min.y, step);
    let w = (quantize(rect.max.x, step) - left).max(step);
    let h = (quantize(rect.max.y, step) - top).max(step);
    egui::Rect::from_min_size(egui::pos2(left, top), egui::vec2(w, h))
}

/// Position-only quantization, for moves and keyboard nudges.
pub fn snap_pos(pos: egui::Pos2, snap: &SnapConfig) -> egui::Pos2 {
    if !snap.enabled {
        return pos;
    }
    let step = snap.size.max(1.0);
    egui::pos2(quantize(pos.x, step), quantize(pos.y, step))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(left: f32, top: f32, w: f32, h: f32) -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(left, top), egui::vec2(w, h))
    }

    #[test]
    fn create_normalizes_backward_drag() {
        let r = create_rect(egui::pos2(50.0, 60.0), egui::pos2(10.0, 20.0), false);
        assert_eq!(r.min, egui::pos2(10.0, 20.0));
        assert_eq!(r.size(), egui::vec2(40.0, 40.0));
    }

    #[test]
    fn create_shift_collapses_smaller_axis() {
        let r = create_rect(egui::pos2(0.0, 0.0), egui::pos2(40.0, 8.0), true);
        assert_eq!(r.size(), egui::vec2(40.0, MIN_SIZE));
        let r = create_rect(egui::pos2(0.0, 0.0), egui::pos2(8.0, 40.0), true);
        assert_eq!(r.size(), egui::vec2(MIN_SIZE, 40.0));
    }

    #[test]
    fn resize_nw_past_opposite_corner_pins_at_min_size() {
        let r = resize_rect(
            rect(10.0, 10.0, 50.0, 50.0),
            ResizeHandle::NW,
            egui::pos2(200.0, 200.0),
            false,
        );
        assert_eq!(r.size(), egui::vec2(MIN_SIZE, MIN_SIZE));
        assert!(r.width() >= 0.0 && r.height() >= 0.0);
    }

    #[test]
    fn resize_moves_only_active_edges() {
        let r = resize_rect(
            rect(10.0, 10.0, 50.0, 50.0),
            ResizeHandle::E,
            egui::pos2(100.0, 999.0),
            false,
        );
        assert_eq!(r.min, egui::pos2(10.0, 10.0));
        assert_eq!(r.max, egui::pos2(100.0, 60.0));
    }

    #[test]
    fn resize_se_grows_from_fixed_origin() {
        let r = resize_rect(
            rect(10.0, 10.0, 50.0, 50.0),
            ResizeHandle::SE,
            egui::pos2(90.0, 80.0),
            false,
        );
        assert_eq!(r.min, egui::pos2(10.0, 10.0));
        assert_eq!(r.size(), egui::vec2(80.0, 70.0));
    }

    #[test]
    fn move_shift_locks_to_dominant_axis() {
        let d = move_delta(egui::pos2(0.0, 0.0), egui::pos2(30.0, 10.0), true);
        assert_eq!(d, egui::vec2(30.0, 0.0));
        let d = move_delta(egui::pos2(0.0, 0.0), egui::pos2(10.0, 30.0), true);
        assert_eq!(d, egui::vec2(0.0, 30.0));
    }

    #[test]
    fn snap_quantizes_edges_and_floors_dimensions() {
        let snap = SnapConfig {
            enabled: true,
            size: 10.0,
        };
        let r = snap_rect(rect(3.0, 4.0, 44.0, 48.0), &snap);
        assert_eq!(r.min, egui::pos2(0.0, 0.0));
        assert_eq!(r.size(), egui::vec2(50.0, 50.0));

        let tiny = snap_rect(rect(12.0, 12.0, 2.0, 2.0), &snap);
        assert_eq!(tiny.size(), egui::vec2(10.0, 10.0));
    }

    #[test]
    fn snap_disabled_is_identity() {
        let snap = SnapConfig::default();
        let r = rect(3.0, 4.0, 44.0, 48.0);
        assert_eq!(snap_rect(r, &snap), r);
        assert_eq!(snap_pos(egui::pos2(3.0, 4.0), &snap), egui::pos2(3.0, 4.0));
    }

    #[test]
    fn handle_hit_respects_radius() {
        let r = rect(0.0, 0.0, 100.0, 100.0);
        assert_eq!(
            hit_handle(r, egui::pos2(2.0, 2.0), 5.0),
            Some(ResizeHandle::NW)
        );
        assert_eq!(
            hit_handle(r, egui::pos2(50.0, 101.0), 5.0),
            Some(ResizeHandle::S)
        );
        assert_eq!(hit_handle(r, egui::pos2(50.0, 50.0), 5.0), None);
    }

    #[test]
    fn topmost_hit_prefers_later_paint_order() {
        let mut store = ZoneStore::new();
        let below = store.add("area-1".into(), 0.0, 0.0, 100.0, 100.0);
        let above = store.add("area-2".into(), 0.0, 0.0, 100.0, 100.0);
        assert_eq!(topmost_zone_at(&store, egui::pos2(50.0, 50.0)), Some(above));
        assert_eq!(
            reorder_target_at(&store, egui::pos2(50.0, 50.0), &[above]),
            Some(below)
        );
        assert_eq!(
            reorder_target_at(&store, egui::pos2(50.0, 50.0), &[above, below]),
            None
        );
    }
}
