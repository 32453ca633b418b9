/*
 * UI Module
 *
 * The egui control panel for the arena viewer and the debug text overlay.
 * Buttons do not touch the arena directly; they return `UiAction`s that the
 * app applies after the frame. Slider and checkbox edits write straight
 * into `SimulationParams`, and change detection is left to the params
 * snapshot.
 */

use nannou_egui::egui;

use crate::app::Model;
use crate::arena::Arena;
use crate::debug::DebugInfo;
use crate::entity::{EntityId, Kind, KindTag};
use crate::params::SimulationParams;

/// A button press to be applied to the model after the UI frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Spawn(KindTag),
    Reset,
    SaveLayout,
    LoadLayout,
    DeleteSelected,
    SetShield(bool),
    ResetCamera,
}

#[derive(Debug, Default)]
pub struct UiResponse {
    pub actions: Vec<UiAction>,
    pub bounds_changed: bool,
}

pub fn update_ui(model: &mut Model) -> UiResponse {
    let mut actions = Vec::new();

    model.params.take_snapshot();

    let ctx = model.egui.begin_frame();
    let params = &mut model.params;
    let arena = &model.arena;
    let selected = model.selected;
    let layout_path = &mut model.layout_path;
    let status = model.status.as_deref();
    let zoom = model.camera.zoom;
    let debug_info = &model.debug_info;

    egui::Window::new("Arena Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.horizontal(|ui| {
                let label = if params.pause_simulation { "Start" } else { "Pause" };
                if ui.button(label).clicked() {
                    params.pause_simulation = !params.pause_simulation;
                }
                if ui.button("Reset Arena").clicked() {
                    actions.push(UiAction::Reset);
                }
            });
            ui.label(format!("Tick: {}", arena.ticks()));

            ui.collapsing("Add Entities", |ui| {
                ui.horizontal_wrapped(|ui| {
                    for tag in KindTag::ALL {
                        if ui.button(tag.name()).clicked() {
                            actions.push(UiAction::Spawn(tag));
                        }
                    }
                });
            });

            ui.collapsing("Food", |ui| {
                ui.checkbox(&mut params.food_spawning, "Spawn Food Periodically");
                ui.add(egui::Slider::new(&mut params.max_food, SimulationParams::get_max_food_range()).text("Max Food"));
                ui.add(egui::Slider::new(&mut params.food_spawn_interval, SimulationParams::get_spawn_interval_range()).text("Spawn Interval (ticks)"));
            });

            ui.collapsing("Arena", |ui| {
                ui.add(egui::Slider::new(&mut params.arena_width, SimulationParams::get_arena_width_range()).text("Width"));
                ui.add(egui::Slider::new(&mut params.arena_height, SimulationParams::get_arena_height_range()).text("Height"));
            });

            ui.collapsing("Selection", |ui| {
                selection_panel(ui, arena, selected, &mut actions);
            });

            ui.collapsing("Players", |ui| {
                players_panel(ui, arena);
            });

            ui.collapsing("Layout", |ui| {
                ui.text_edit_singleline(layout_path);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        actions.push(UiAction::SaveLayout);
                    }
                    if ui.button("Load").clicked() {
                        actions.push(UiAction::LoadLayout);
                    }
                });
            });

            ui.collapsing("Camera Controls", |ui| {
                ui.label("Zoom: mouse wheel");
                ui.label("Pan: drag empty space");
                ui.label("Move: drag an entity");
                ui.label("Player: arrow keys");
                ui.label(format!("Zoom Level: {:.2}x", zoom));
                if ui.button("Reset Camera").clicked() {
                    actions.push(UiAction::ResetCamera);
                }
            });

            ui.collapsing("Performance", |ui| {
                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0));
                ui.label(format!("Entities: {}", debug_info.total()));
            });

            ui.checkbox(&mut params.show_debug, "Show Debug Info");

            if let Some(status) = status {
                ui.separator();
                ui.label(status);
            }
        });

    let (bounds_changed, _) = model.params.detect_changes();

    UiResponse {
        actions,
        bounds_changed,
    }
}

fn selection_panel(ui: &mut egui::Ui, arena: &Arena, selected: Option<EntityId>, actions: &mut Vec<UiAction>) {
    let Some(entity) = selected.and_then(|id| arena.get(id)) else {
        ui.label("Click an entity to select it");
        return;
    };

    ui.label(format!("{} {}", entity.tag(), entity.id()));
    ui.label(format!("Position: ({:.1}, {:.1})", entity.x, entity.y));
    ui.label(format!("Radius: {:.1}", entity.radius()));
    if let Some(motion) = entity.motion() {
        ui.label(format!("Heading: {:.2} rad", motion.angle));
        ui.label(format!("Speed: {:.2}", motion.speed));
    }
    if let Some(vitality) = entity.vitality() {
        ui.label(format!("Vitality: {:.1}", vitality.value()));
    }
    if let Kind::PlayerRobot { score, shield, .. } = entity.kind {
        ui.label(format!("Score: {score}"));
        let mut active = shield;
        if ui.checkbox(&mut active, "Shield").changed() {
            actions.push(UiAction::SetShield(active));
        }
    }
    if ui.button("Delete").clicked() {
        actions.push(UiAction::DeleteSelected);
    }
}

fn players_panel(ui: &mut egui::Ui, arena: &Arena) {
    let mut any = false;
    for entity in arena.entities() {
        if let Kind::PlayerRobot { score, health, shield, .. } = entity.kind {
            any = true;
            let shield = if shield { " [shield]" } else { "" };
            ui.label(format!("{}  score {}  health {:.0}{}", entity.id(), score, health.value(), shield));
        }
    }
    if !any {
        ui.label("No player robots");
    }
}

// Draw debug information on the screen
pub fn draw_debug_info(
    draw: &nannou::Draw,
    debug_info: &DebugInfo,
    window_rect: nannou::geom::Rect,
    camera_zoom: f32,
    arena_size: (f64, f64),
) {
    let mut debug_texts = vec![
        format!("FPS: {:.1}", debug_info.fps),
        format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0),
        format!("Tick: {}", debug_info.tick),
        format!("Removed/spawned last tick: {}/{}", debug_info.last_removed, debug_info.last_spawned),
        format!("Zoom: {:.2}x", camera_zoom),
        format!("Arena: {:.0}x{:.0}", arena_size.0, arena_size.1),
    ];
    debug_texts.extend(
        debug_info
            .population
            .iter()
            .map(|(tag, count)| format!("{tag}: {count}")),
    );

    let margin = 20.0;
    let line_height = 20.0;
    let panel_width = 260.0;
    let panel_height = line_height * debug_texts.len() as f32 + margin;
    let panel_x = window_rect.right() - panel_width / 2.0;
    let panel_y = window_rect.top() - panel_height / 2.0;

    draw.rect()
        .x_y(panel_x, panel_y)
        .w_h(panel_width, panel_height)
        .color(nannou::color::rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.right() - panel_width + margin;
    let text_y = window_rect.top() - margin;
    let text_w = panel_width - 2.0 * margin;

    for (i, text) in debug_texts.iter().enumerate() {
        let y = text_y - (i as f32 * line_height);
        draw.text(text)
            .x_y(text_x + text_w / 2.0, y)
            .w(text_w)
            .left_justify()
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
