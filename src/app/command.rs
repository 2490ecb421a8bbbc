use eframe::egui;

use super::interaction::{
    self, MIN_SIZE, create_rect, move_delta, reorder_target_at, resize_rect, snap_pos, snap_rect,
    topmost_zone_at,
};
use super::session::{DragSession, EditorSession};
use super::Tool;

/// One gesture or UI action, decided in one place. The input adaptation layer
/// translates raw pointer/keyboard events into these; `apply` is the only
/// code that mutates the session in response.
#[derive(Clone, Debug)]
pub enum Command {
    SetTool(Tool),
    PointerDown {
        pos: egui::Pos2,
        modifiers: egui::Modifiers,
        /// Handle hit tolerance in image units.
        handle_radius: f32,
    },
    PointerMove {
        pos: egui::Pos2,
        modifiers: egui::Modifiers,
    },
    PointerUp,
    Nudge {
        delta: egui::Vec2,
    },
    SelectZone {
        id: u64,
        additive: bool,
    },
    ClearSelection,
    DeleteSelected,
    Remove(u64),
    MoveUp(u64),
    MoveDown(u64),
    Duplicate(u64),
    ReorderRow {
        id: u64,
        target: u64,
    },
    Rename {
        id: u64,
        selector: String,
    },
    ClearAll,
    SetSnap {
        enabled: bool,
        size: f32,
    },
}

pub fn apply(session: &mut EditorSession, cmd: Command) {
    match cmd {
        Command::SetTool(tool) => {
            session.tool = tool;
            session.drag = None;
        }
        Command::PointerDown {
            pos,
            modifiers,
            handle_radius,
        } => pointer_down(session, pos, modifiers, handle_radius),
        Command::PointerMove { pos, modifiers } => pointer_move(session, pos, modifiers),
        Command::PointerUp => pointer_up(session),
        Command::Nudge { delta } => nudge(session, delta),
        Command::SelectZone { id, additive } => {
            if session.store.get(id).is_none() {
                return;
            }
            if additive {
                session.toggle_selection(id);
            } else {
                session.set_selection_single(id);
            }
        }
        Command::ClearSelection => session.clear_selection(),
        Command::DeleteSelected => {
            for id in session.selected_in_order() {
                session.store.remove(id);
            }
            session.clear_selection();
        }
        Command::Remove(id) => {
            session.store.remove(id);
            session.prune_selection();
        }
        Command::MoveUp(id) => session.store.move_up(id),
        Command::MoveDown(id) => session.store.move_down(id),
        Command::Duplicate(id) => {
            if let Some(new_id) = session.store.duplicate(id) {
                session.set_selection_single(new_id);
            }
        }
        Command::ReorderRow { id, target } => session.store.reorder_row(id, target),
        Command::Rename { id, selector } => {
            let trimmed = selector.trim();
            if trimmed.is_empty() {
                return;
            }
            if let Some(zone) = session.store.get_mut(id) {
                zone.selector = trimmed.to_string();
            }
        }
        Command::ClearAll => {
            session.store.clear();
            session.clear_selection();
            session.drag = None;
        }
        Command::SetSnap { enabled, size } => {
            session.snap.enabled = enabled;
            session.snap.set_size(size);
        }
    }
}

fn pointer_down(
    session: &mut EditorSession,
    pos: egui::Pos2,
    modifiers: egui::Modifiers,
    handle_radius: f32,
) {
    // Handles of the single selected zone win over body hits.
    if let Some(id) = session.primary_selected() {
        if let Some(zone) = session.store.get(id) {
            if let Some(handle) = interaction::hit_handle(zone.rect(), pos, handle_radius) {
                session.drag = Some(DragSession::Resizing {
                    id,
                    handle,
                    orig: zone.rect(),
                });
                return;
            }
        }
    }

    if let Some(id) = topmost_zone_at(&session.store, pos) {
        if modifiers.command || modifiers.ctrl {
            session.toggle_selection(id);
            return;
        }
        if !session.selected.contains(&id) {
            session.set_selection_single(id);
        }
        let origins = session
            .selected_in_order()
            .into_iter()
            .filter_map(|zid| {
                session
                    .store
                    .get(zid)
                    .map(|z| (zid, egui::pos2(z.left, z.top)))
            })
            .collect();
        session.drag = Some(DragSession::Moving {
            start: pos,
            origins,
            reorder_target: None,
        });
        return;
    }

    if session.tool == Tool::Create {
        let selector = session.store.next_selector();
        let id = session.store.add(selector, pos.y, pos.x, 0.0, 0.0);
        session.set_selection_single(id);
        session.drag = Some(DragSession::Creating { id, start: pos });
        return;
    }

    session.clear_selection();
}

fn pointer_move(session: &mut EditorSession, pos: egui::Pos2, modifiers: egui::Modifiers) {
    let snap = session.snap;
    match session.drag.take() {
        Some(DragSession::Creating { id, start }) => {
            let rect = snap_rect(create_rect(start, pos, modifiers.shift), &snap);
            if let Some(zone) = session.store.get_mut(id) {
                zone.left = rect.min.x;
                zone.top = rect.min.y;
                zone.width = rect.width();
                zone.height = rect.height();
            }
            session.drag = Some(DragSession::Creating { id, start });
        }
        Some(DragSession::Moving {
            start,
            origins,
            reorder_target: _,
        }) => {
            let delta = move_delta(start, pos, modifiers.shift);
            for (id, origin) in &origins {
                let target = snap_pos(*origin + delta, &snap);
                if let Some(zone) = session.store.get_mut(*id) {
                    zone.left = target.x.max(0.0);
                    zone.top = target.y.max(0.0);
                }
            }
            let moving: Vec<u64> = origins.iter().map(|(id, _)| *id).collect();
            let reorder_target = reorder_target_at(&session.store, pos, &moving);
            session.drag = Some(DragSession::Moving {
                start,
                origins,
                reorder_target,
            });
        }
        Some(DragSession::Resizing { id, handle, orig }) => {
            let rect = snap_rect(resize_rect(orig, handle, pos, modifiers.shift), &snap);
            if let Some(zone) = session.store.get_mut(id) {
                zone.left = rect.min.x;
                zone.top = rect.min.y;
                zone.width = rect.width().max(MIN_SIZE);
                zone.height = rect.height().max(MIN_SIZE);
            }
            session.drag = Some(DragSession::Resizing { id, handle, orig });
        }
        None => {}
    }
}

fn pointer_up(session: &mut EditorSession) {
    match session.drag {
        // A zero-drag click with the create tool still leaves a usable zone.
        Some(DragSession::Creating { id, .. }) => {
            if let Some(zone) = session.store.get_mut(id) {
                zone.width = zone.width.max(MIN_SIZE);
                zone.height = zone.height.max(MIN_SIZE);
            }
        }
        Some(DragSession::Moving {
            reorder_target: Some(target),
            ..
        }) => {
            let block = session.selected_in_order();
            session.store.reorder_before(&block, target);
        }
        _ => {}
    }
    session.drag = None;
}

fn nudge(session: &mut EditorSession, delta: egui::Vec2) {
    let snap = session.snap;
    for id in session.selected_in_order() {
        if let Some(zone) = session.store.get_mut(id) {
            let target = snap_pos(
                egui::pos2(zone.left + delta.x, zone.top + delta.y),
                &snap,
            );
            zone.left = target.x.max(0.0);
            zone.top = target.y.max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ResizeHandle;

    fn mods(shift: bool, command: bool) -> egui::Modifiers {
        egui::Modifiers {
            shift,
            command,
            ..Default::default()
        }
    }

    fn down(session: &mut EditorSession, x: f32, y: f32) {
        apply(
            session,
            Command::PointerDown {
                pos: egui::pos2(x, y),
                modifiers: Default::default(),
                handle_radius: 6.0,
            },
        );
    }

    fn drag_to(session: &mut EditorSession, x: f32, y: f32) {
        apply(
            session,
            Command::PointerMove {
                pos: egui::pos2(x, y),
                modifiers: Default::default(),
            },
        );
    }

    fn up(session: &mut EditorSession) {
        apply(session, Command::PointerUp);
    }

    fn zone_tuple(session: &EditorSession, id: u64) -> (f32, f32, f32, f32) {
        let z = session.store.get(id).unwrap();
        (z.top, z.left, z.width, z.height)
    }

    #[test]
    fn create_tool_draws_selected_zone() {
        let mut session = EditorSession::new("1");
        session.tool = Tool::Create;
        down(&mut session, 10.0, 20.0);
        drag_to(&mut session, 60.0, 80.0);
        up(&mut session);
        let id = session.primary_selected().unwrap();
        assert_eq!(zone_tuple(&session, id), (20.0, 10.0, 50.0, 60.0));
        assert!(session.drag.is_none());
        assert_eq!(session.store.get(id).unwrap().selector, "area-1");
    }

    #[test]
    fn create_with_snap_commits_grid_aligned_rect() {
        let mut session = EditorSession::new("1");
        session.tool = Tool::Create;
        apply(
            &mut session,
            Command::SetSnap {
                enabled: true,
                size: 10.0,
            },
        );
        down(&mut session, 3.0, 4.0);
        drag_to(&mut session, 47.0, 52.0);
        up(&mut session);
        let id = session.primary_selected().unwrap();
        assert_eq!(zone_tuple(&session, id), (0.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn zero_drag_create_click_leaves_unit_zone() {
        let mut session = EditorSession::new("1");
        session.tool = Tool::Create;
        down(&mut session, 30.0, 40.0);
        up(&mut session);
        let id = session.primary_selected().unwrap();
        assert_eq!(zone_tuple(&session, id), (40.0, 30.0, MIN_SIZE, MIN_SIZE));
    }

    #[test]
    fn geometry_is_non_negative_after_any_pointer_up() {
        let mut session = EditorSession::new("1");
        session.tool = Tool::Create;
        down(&mut session, 50.0, 50.0);
        drag_to(&mut session, 5.0, 5.0);
        up(&mut session);
        for zone in session.store.zones() {
            assert!(zone.width >= 0.0 && zone.height >= 0.0);
        }
    }

    #[test]
    fn resize_nw_beyond_se_clamps_to_unit_minimum() {
        let mut session = EditorSession::new("1");
        let id = session.store.add("area-1".into(), 10.0, 10.0, 50.0, 50.0);
        session.set_selection_single(id);
        // Grab the nw handle and overshoot far past the opposite corner.
        down(&mut session, 10.0, 10.0);
        assert!(matches!(
            session.drag,
            Some(DragSession::Resizing {
                handle: ResizeHandle::NW,
                ..
            })
        ));
        drag_to(&mut session, 500.0, 500.0);
        up(&mut session);
        let (_, _, w, h) = zone_tuple(&session, id);
        assert_eq!((w, h), (MIN_SIZE, MIN_SIZE));
    }

    #[test]
    fn multi_select_move_preserves_relative_offsets() {
        let mut session = EditorSession::new("1");
        let a = session.store.add("area-1".into(), 0.0, 0.0, 10.0, 10.0);
        let b = session.store.add("area-2".into(), 20.0, 0.0, 10.0, 10.0);
        session.selected.extend([a, b]);
        down(&mut session, 5.0, 5.0);
        drag_to(&mut session, 10.0, 10.0);
        up(&mut session);
        assert_eq!(zone_tuple(&session, a), (5.0, 5.0, 10.0, 10.0));
        assert_eq!(zone_tuple(&session, b), (25.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn move_with_shift_locks_to_dominant_axis() {
        let mut session = EditorSession::new("1");
        let a = session.store.add("area-1".into(), 50.0, 50.0, 10.0, 10.0);
        session.set_selection_single(a);
        down(&mut session, 55.0, 55.0);
        apply(
            &mut session,
            Command::PointerMove {
                pos: egui::pos2(85.0, 62.0),
                modifiers: mods(true, false),
            },
        );
        up(&mut session);
        assert_eq!(zone_tuple(&session, a), (50.0, 80.0, 10.0, 10.0));
    }

    #[test]
    fn move_clamps_top_left_non_negative() {
        let mut session = EditorSession::new("1");
        let a = session.store.add("area-1".into(), 5.0, 5.0, 10.0, 10.0);
        session.set_selection_single(a);
        down(&mut session, 10.0, 10.0);
        drag_to(&mut session, -100.0, -100.0);
        up(&mut session);
        assert_eq!(zone_tuple(&session, a), (0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn ctrl_click_toggles_membership_without_dragging() {
        let mut session = EditorSession::new("1");
        let a = session.store.add("area-1".into(), 0.0, 0.0, 10.0, 10.0);
        let b = session.store.add("area-2".into(), 0.0, 20.0, 10.0, 10.0);
        session.set_selection_single(a);
        apply(
            &mut session,
            Command::PointerDown {
                pos: egui::pos2(25.0, 5.0),
                modifiers: mods(false, true),
                handle_radius: 6.0,
            },
        );
        assert!(session.selected.contains(&a) && session.selected.contains(&b));
        assert!(session.drag.is_none());
    }

    #[test]
    fn empty_canvas_click_clears_selection_in_select_tool() {
        let mut session = EditorSession::new("1");
        let a = session.store.add("area-1".into(), 0.0, 0.0, 10.0, 10.0);
        session.set_selection_single(a);
        down(&mut session, 500.0, 500.0);
        assert!(session.selected.is_empty());
        assert!(session.drag.is_none());
    }

    #[test]
    fn drop_on_sibling_reorders_block_before_it() {
        // Store ordered [A, B, C]; dragging A onto C yields [B, A, C].
        let mut session = EditorSession::new("1");
        let a = session.store.add("area-1".into(), 0.0, 0.0, 10.0, 10.0);
        let b = session.store.add("area-2".into(), 0.0, 200.0, 10.0, 10.0);
        let c = session.store.add("area-3".into(), 0.0, 400.0, 10.0, 10.0);
        down(&mut session, 5.0, 5.0);
        drag_to(&mut session, 405.0, 5.0);
        assert_eq!(session.reorder_target(), Some(c));
        up(&mut session);
        assert_eq!(session.store.order(), &[b, a, c]);
    }

    #[test]
    fn nudge_moves_selection_and_clamps_at_origin() {
        let mut session = EditorSession::new("1");
        let a = session.store.add("area-1".into(), 0.0, 3.0, 10.0, 10.0);
        session.set_selection_single(a);
        apply(
            &mut session,
            Command::Nudge {
                delta: egui::vec2(-10.0, 5.0),
            },
        );
        assert_eq!(zone_tuple(&session, a), (5.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn delete_selected_removes_zones_and_clears_selection() {
        let mut session = EditorSession::new("1");
        let a = session.store.add("area-1".into(), 0.0, 0.0, 10.0, 10.0);
        let b = session.store.add("area-2".into(), 0.0, 20.0, 10.0, 10.0);
        session.selected.extend([a, b]);
        apply(&mut session, Command::DeleteSelected);
        assert!(session.store.is_empty());
        assert!(session.selected.is_empty());
    }

    #[test]
    fn rename_ignores_blank_selectors() {
        let mut session = EditorSession::new("1");
        let a = session.store.add("area-1".into(), 0.0, 0.0, 10.0, 10.0);
        apply(
            &mut session,
            Command::Rename {
                id: a,
                selector: "  ".into(),
            },
        );
        assert_eq!(session.store.get(a).unwrap().selector, "area-1");
        apply(
            &mut session,
            Command::Rename {
                id: a,
                selector: " door ".into(),
            },
        );
        assert_eq!(session.store.get(a).unwrap().selector, "door");
    }
}
