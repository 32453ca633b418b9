/*
 * Input Module
 *
 * Mouse and keyboard handling for the arena viewer.
 *
 * - Left click on an entity selects it; dragging moves it
 * - Left drag on empty space pans the camera, mouse wheel zooms
 * - Arrow keys step the controlled player robot
 * - Delete removes the selection, Space pauses or resumes
 */

use nannou::prelude::*;
use nannou::winit::event::{MouseButton, MouseScrollDelta, TouchPhase};
use tracing::debug;

use crate::app::Model;
use crate::physics::Direction;

fn direction_for(key: Key) -> Option<Direction> {
    match key {
        Key::Up => Some(Direction::Up),
        Key::Down => Some(Direction::Down),
        Key::Left => Some(Direction::Left),
        Key::Right => Some(Direction::Right),
        _ => None,
    }
}

pub fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    model.mouse_position = pos;

    if model.dragging_entity {
        if let Some(id) = model.selected {
            let (x, y) = model
                .camera
                .screen_to_arena(pos, model.arena_size(), app.window_rect());
            if model.arena.relocate(id, x, y).is_err() {
                model.dragging_entity = false;
            }
        }
    } else if model.camera.is_dragging {
        model.camera.drag(pos);
    }
}

pub fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left || model.egui.ctx().is_pointer_over_area() {
        return;
    }

    let (x, y) = model
        .camera
        .screen_to_arena(model.mouse_position, model.arena_size(), app.window_rect());

    match model.arena.entity_at(x, y) {
        Some(id) => {
            debug!(id = %id, "entity selected");
            model.selected = Some(id);
            model.dragging_entity = true;
        }
        None => {
            model.selected = None;
            model.camera.start_drag(model.mouse_position);
        }
    }
}

pub fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.dragging_entity = false;
        model.camera.end_drag();
    }
}

pub fn mouse_wheel(app: &App, model: &mut Model, delta: MouseScrollDelta, _phase: TouchPhase) {
    let window_rect = app.window_rect();
    match delta {
        MouseScrollDelta::LineDelta(x, y) => {
            model.camera.zoom(vec2(x, y), model.mouse_position, window_rect);
        }
        MouseScrollDelta::PixelDelta(pos) => {
            model.camera.zoom(vec2(pos.x as f32, pos.y as f32) * 0.01, model.mouse_position, window_rect);
        }
    }
}

pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    // Typing into the layout path field must not drive the arena
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }

    if let Some(direction) = direction_for(key) {
        if let Some(player) = model.controlled_player() {
            if let Err(err) = model.arena.move_player(player, direction) {
                model.status = Some(err.to_string());
            }
        }
        return;
    }

    match key {
        Key::Space => model.params.pause_simulation = !model.params.pause_simulation,
        Key::Delete | Key::Back => {
            if let Some(id) = model.selected.take() {
                model.arena.remove(id);
                model.dragging_entity = false;
            }
        }
        _ => {}
    }
}

// Pass window events through to egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
