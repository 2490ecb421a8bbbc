use eframe::egui;

use super::command::{self, Command};
use super::render::{draw_grid, draw_handles, draw_zones, tool_button};
use super::rooms;
use super::transform::SurfaceTransform;
use super::{Tool, ZoneMapApp};

impl eframe::App for ZoneMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let wants_keyboard = ctx.wants_keyboard_input();
        ctx.input_mut(|i| {
            if wants_keyboard {
                return;
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Escape) {
                command::apply(&mut self.session, Command::SetTool(Tool::Select));
                command::apply(&mut self.session, Command::ClearSelection);
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::V) {
                command::apply(&mut self.session, Command::SetTool(Tool::Select));
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::R) {
                command::apply(&mut self.session, Command::SetTool(Tool::Create));
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Delete)
                || i.consume_key(egui::Modifiers::NONE, egui::Key::Backspace)
            {
                command::apply(&mut self.session, Command::DeleteSelected);
            }
            let step = if i.modifiers.shift {
                self.move_step_fast
            } else {
                self.move_step
            };
            let arrows = [
                (egui::Key::ArrowLeft, egui::vec2(-step, 0.0)),
                (egui::Key::ArrowRight, egui::vec2(step, 0.0)),
                (egui::Key::ArrowUp, egui::vec2(0.0, -step)),
                (egui::Key::ArrowDown, egui::vec2(0.0, step)),
            ];
            for (key, delta) in arrows {
                if i.consume_key(egui::Modifiers::NONE, key)
                    || i.consume_key(egui::Modifiers::SHIFT, key)
                {
                    command::apply(&mut self.session, Command::Nudge { delta });
                }
            }
        });

        self.top_bar(ctx);
        self.side_panel(ctx);
        self.status_bar(ctx);
        self.canvas(ctx);
    }
}

impl ZoneMapApp {
    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                tool_button(ui, "Select (V)", Tool::Select, &mut self.session.tool);
                tool_button(ui, "Create (R)", Tool::Create, &mut self.session.tool);
                ui.separator();

                let mut snap = self.session.snap.enabled;
                let mut grid = self.session.snap.size;
                let snap_changed = ui.checkbox(&mut snap, "Snap").changed();
                let grid_changed = ui
                    .add_enabled(
                        snap,
                        egui::DragValue::new(&mut grid).range(1.0..=100.0).speed(1.0),
                    )
                    .changed();
                if snap_changed || grid_changed {
                    command::apply(
                        &mut self.session,
                        Command::SetSnap {
                            enabled: snap,
                            size: grid,
                        },
                    );
                    self.persist_settings();
                }
                ui.separator();

                ui.label("Map:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.map_name)
                        .hint_text("name")
                        .desired_width(140.0),
                );
                if ui.button("Save").clicked() {
                    self.save_current_map();
                }
                ui.separator();
                if ui.button("Import...").clicked() {
                    self.import_map_dialog();
                }
                if ui.button("Export...").clicked() {
                    self.export_map_dialog();
                }
            });
        });
    }

    fn side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("side_panel")
            .default_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.room_picker(ctx, ui);
                    ui.separator();
                    self.zone_list(ui);
                    ui.separator();
                    self.saved_map_list(ui);
                });
            });
    }

    fn room_picker(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.heading("Rooms");
        ui.add(
            egui::TextEdit::singleline(&mut self.room_filter)
                .hint_text("filter")
                .desired_width(f32::INFINITY),
        );
        let filtered: Vec<rooms::RoomInfo> =
            rooms::filter_rooms(&self.matcher, &self.rooms, &self.room_filter)
                .into_iter()
                .cloned()
                .collect();
        for room in filtered {
            let active = self
                .current_room
                .as_ref()
                .is_some_and(|r| r.number == room.number);
            let label = format!("{} — {}", room.number, room.name);
            if ui.selectable_label(active, label).clicked() && !active {
                self.select_room(ctx, room);
            }
        }
        if self.rooms.is_empty() {
            ui.small("No room catalog loaded");
        }
    }

    fn zone_list(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Areas");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if !self.session.store.is_empty() && ui.small_button("Clear all").clicked() {
                    command::apply(&mut self.session, Command::ClearAll);
                }
            });
        });
        let rows: Vec<(u64, String)> = self
            .session
            .store
            .zones()
            .map(|z| (z.id, z.selector.clone()))
            .collect();
        let mut commands: Vec<Command> = Vec::new();
        for (id, selector) in rows {
            let selected = self.session.selected.contains(&id);
            let frame = ui
                .dnd_drag_source(egui::Id::new(("zone_row", id)), id, |ui| {
                    ui.horizontal(|ui| {
                        if ui.selectable_label(selected, "·").clicked() {
                            commands.push(Command::SelectZone {
                                id,
                                additive: ui.input(|i| i.modifiers.command || i.modifiers.ctrl),
                            });
                        }
                        let mut name = selector;
                        if ui
                            .add(egui::TextEdit::singleline(&mut name).desired_width(110.0))
                            .changed()
                        {
                            commands.push(Command::Rename { id, selector: name });
                        }
                        if ui.small_button("↑").clicked() {
                            commands.push(Command::MoveUp(id));
                        }
                        if ui.small_button("↓").clicked() {
                            commands.push(Command::MoveDown(id));
                        }
                        if ui.small_button("⎘").clicked() {
                            commands.push(Command::Duplicate(id));
                        }
                        if ui.small_button("✖").clicked() {
                            commands.push(Command::Remove(id));
                        }
                    });
                })
                .response;
            if let Some(dragged) = frame.dnd_release_payload::<u64>() {
                if *dragged != id {
                    commands.push(Command::ReorderRow {
                        id: *dragged,
                        target: id,
                    });
                }
            }
        }
        for cmd in commands {
            command::apply(&mut self.session, cmd);
        }
        if self.session.store.is_empty() {
            ui.small("No areas yet — use the Create tool");
        }
    }

    fn saved_map_list(&mut self, ui: &mut egui::Ui) {
        ui.heading("Saved maps");
        let maps: Vec<(u64, String, bool)> = self
            .saved_maps
            .iter()
            .map(|m| (m.id, m.name.clone(), m.is_active))
            .collect();
        for (id, name, is_active) in maps {
            ui.horizontal(|ui| {
                let label = if is_active {
                    format!("{name} (active)")
                } else {
                    name
                };
                ui.label(label);
                if !is_active && ui.small_button("Apply").clicked() {
                    self.apply_saved_map(id);
                }
                if ui.small_button("Delete").clicked() {
                    self.delete_saved_map(id);
                }
            });
        }
        if self.saved_maps.is_empty() {
            ui.small("None saved for this room");
        }
    }

    fn status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = &self.status {
                    ui.label(status.clone());
                } else {
                    ui.label("Ready");
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!(
                        "{} areas, {} selected",
                        self.session.store.len(),
                        self.session.selected.len()
                    ));
                });
            });
        });
    }

    fn canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            let aspect = self.frame_aspect();
            // Fit the room's frame aspect into the panel, letterboxed.
            let size = if avail.x / avail.y > aspect {
                egui::vec2(avail.y * aspect, avail.y)
            } else {
                egui::vec2(avail.x, avail.x / aspect)
            };
            let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
            let painter = ui.painter().with_clip_rect(rect);
            painter.rect_filled(rect, 0.0, egui::Color32::from_gray(24));

            let transform =
                SurfaceTransform::new(rect, self.background.as_ref().map(|bg| bg.natural));

            if let Some(bg) = &self.background {
                painter.image(
                    bg.texture.id(),
                    transform.image_screen_rect(),
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }

            let modifiers = ctx.input(|i| i.modifiers);
            let pointer = ctx
                .input(|i| i.pointer.interact_pos())
                .map(|p| transform.to_image(p));

            if response.drag_started() || response.clicked() {
                if let Some(pos) = pointer {
                    command::apply(
                        &mut self.session,
                        Command::PointerDown {
                            pos,
                            modifiers,
                            handle_radius: 6.0 / transform.scale(),
                        },
                    );
                }
            }
            if response.dragged() {
                if let Some(pos) = pointer {
                    command::apply(&mut self.session, Command::PointerMove { pos, modifiers });
                }
            }
            if response.drag_stopped() || response.clicked() {
                command::apply(&mut self.session, Command::PointerUp);
            }
            // Losing the pointer (window blur, capture loss) ends the drag.
            if self.session.drag.is_some() && ctx.input(|i| !i.pointer.any_down()) {
                command::apply(&mut self.session, Command::PointerUp);
            }

            draw_grid(&painter, &self.session, &transform);
            draw_zones(&painter, &self.session, &transform);
            draw_handles(&painter, &self.session, &transform);

            if response.hovered() && self.session.tool == Tool::Create {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }
        });
    }
}
