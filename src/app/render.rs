use eframe::egui;

use super::interaction::handle_points;
use super::session::EditorSession;
use super::transform::SurfaceTransform;
use super::Tool;

const ZONE_STROKE: egui::Color32 = egui::Color32::from_rgb(40, 90, 200);
const ZONE_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(40, 90, 200, 28);
const SELECTED_STROKE: egui::Color32 = egui::Color32::from_rgb(200, 140, 40);
const SELECTED_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(200, 140, 40, 36);
const TARGET_STROKE: egui::Color32 = egui::Color32::from_rgb(40, 140, 60);
const GRID_LINE: egui::Color32 = egui::Color32::from_rgba_premultiplied(255, 255, 255, 24);

pub(super) fn tool_button(ui: &mut egui::Ui, label: &str, tool: Tool, selected: &mut Tool) {
    let active = *selected == tool;
    if ui.selectable_label(active, label).clicked() {
        *selected = tool;
    }
}

/// Grid lines at the snap pitch across the whole image extent, drawn only
/// while snapping is on.
pub(super) fn draw_grid(
    painter: &egui::Painter,
    session: &EditorSession,
    transform: &SurfaceTransform,
) {
    if !session.snap.enabled {
        return;
    }
    let step = session.snap.size.max(1.0);
    let extent = transform.image_extent();
    let stroke = egui::Stroke::new(1.0, GRID_LINE);
    let mut x = extent.min.x;
    while x <= extent.max.x {
        painter.line_segment(
            [
                transform.to_screen(egui::pos2(x, extent.min.y)),
                transform.to_screen(egui::pos2(x, extent.max.y)),
            ],
            stroke,
        );
        x += step;
    }
    let mut y = extent.min.y;
    while y <= extent.max.y {
        painter.line_segment(
            [
                transform.to_screen(egui::pos2(extent.min.x, y)),
                transform.to_screen(egui::pos2(extent.max.x, y)),
            ],
            stroke,
        );
        y += step;
    }
}

/// Every zone in paint order, with selection and live reorder-target states.
pub(super) fn draw_zones(
    painter: &egui::Painter,
    session: &EditorSession,
    transform: &SurfaceTransform,
) {
    let target = session.reorder_target();
    for zone in session.store.zones() {
        let rect = transform.rect_to_screen(zone.rect());
        let selected = session.selected.contains(&zone.id);
        let (fill, stroke) = if selected {
            (SELECTED_FILL, egui::Stroke::new(2.0, SELECTED_STROKE))
        } else if target == Some(zone.id) {
            (ZONE_FILL, egui::Stroke::new(2.0, TARGET_STROKE))
        } else {
            (ZONE_FILL, egui::Stroke::new(1.5, ZONE_STROKE))
        };
        painter.rect_filled(rect, 0.0, fill);
        painter.rect_stroke(rect, 0.0, stroke, egui::StrokeKind::Middle);
        if rect.width() > 24.0 && rect.height() > 12.0 {
            painter.text(
                rect.left_top() + egui::vec2(4.0, 2.0),
                egui::Align2::LEFT_TOP,
                &zone.selector,
                egui::FontId::proportional(11.0),
                stroke.color,
            );
        }
    }
}

/// Compass handles for the single selected zone.
pub(super) fn draw_handles(
    painter: &egui::Painter,
    session: &EditorSession,
    transform: &SurfaceTransform,
) {
    let Some(id) = session.primary_selected() else {
        return;
    };
    let Some(zone) = session.store.get(id) else {
        return;
    };
    for (_, p) in handle_points(zone.rect()) {
        let r = egui::Rect::from_center_size(transform.to_screen(p), egui::vec2(7.0, 7.0));
        painter.rect_filled(r, 1.0, egui::Color32::WHITE);
        painter.rect_stroke(
            r,
            1.0,
            egui::Stroke::new(1.0, SELECTED_STROKE),
            egui::StrokeKind::Middle,
        );
    }
}
