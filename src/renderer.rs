/*
 * Renderer Module
 *
 * Draws the arena: its walls, every entity as a coloured circle, robot
 * headings, whisker and beam sensors, vitality bars, the player shield and
 * the current selection. The egui panel is drawn last, over everything.
 */

use nannou::prelude::*;
use tracing::warn;

use crate::app::Model;
use crate::camera::Camera;
use crate::entity::{Entity, Kind};
use crate::params::SimulationParams;
use crate::ui;

const BAR_WIDTH: f32 = 30.0;
const BAR_HEIGHT: f32 = 4.0;

fn body_color(kind: &Kind) -> Rgba {
    match kind {
        Kind::Obstacle => rgba(0.45, 0.45, 0.5, 1.0),
        Kind::Food => rgba(0.3, 0.85, 0.3, 1.0),
        Kind::WhiskerRobot { .. } => rgba(0.3, 0.55, 0.95, 1.0),
        Kind::BeamSensorRobot { .. } => rgba(0.95, 0.6, 0.2, 1.0),
        Kind::PredatorRobot { .. } => rgba(0.9, 0.2, 0.2, 1.0),
        Kind::PlayerRobot { .. } => rgba(0.7, 0.35, 0.9, 1.0),
    }
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window_rect = app.window_rect();
    let camera = &model.camera;
    let arena_size = model.arena_size();

    // Arena walls
    let top_left = camera.arena_to_screen(0.0, 0.0, arena_size, window_rect);
    let bottom_right = camera.arena_to_screen(arena_size.0, arena_size.1, arena_size, window_rect);
    let arena_rect = Rect::from_corners(top_left, bottom_right);
    draw.rect()
        .xy(arena_rect.xy())
        .wh(arena_rect.wh())
        .color(rgba(0.08, 0.08, 0.1, 1.0))
        .stroke_weight(2.0)
        .stroke(rgba(0.6, 0.6, 0.6, 1.0));

    for entity in model.arena.entities() {
        draw_entity(&draw, entity, camera, arena_size, window_rect, &model.params);
    }

    if let Some(selected) = model.selected.and_then(|id| model.arena.get(id)) {
        let center = camera.arena_to_screen(selected.x, selected.y, arena_size, window_rect);
        draw.ellipse()
            .xy(center)
            .radius(camera.scale(selected.radius()) + 4.0)
            .no_fill()
            .stroke(YELLOW)
            .stroke_weight(2.0);
    }

    if model.params.show_debug {
        ui::draw_debug_info(&draw, &model.debug_info, window_rect, camera.zoom, arena_size);
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        warn!(?err, "failed to draw arena");
    }
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        warn!(?err, "failed to draw controls");
    }
}

fn draw_entity(
    draw: &Draw,
    entity: &Entity,
    camera: &Camera,
    arena_size: (f64, f64),
    window_rect: Rect,
    params: &SimulationParams,
) {
    let center = camera.arena_to_screen(entity.x, entity.y, arena_size, window_rect);
    let radius = camera.scale(entity.radius());

    // Sensors go underneath the body
    match &entity.kind {
        Kind::WhiskerRobot { motion, whisker_length, .. } => {
            for offset in [params.whisker_angle, -params.whisker_angle] {
                let angle = motion.angle + offset;
                let tip = camera.arena_to_screen(
                    entity.x + whisker_length * angle.cos(),
                    entity.y + whisker_length * angle.sin(),
                    arena_size,
                    window_rect,
                );
                draw.line()
                    .start(center)
                    .end(tip)
                    .weight(1.0)
                    .color(rgba(0.6, 0.8, 1.0, 0.8));
            }
        }
        Kind::BeamSensorRobot { motion, sensor_range, .. } => {
            let tip = camera.arena_to_screen(
                entity.x + sensor_range * motion.angle.cos(),
                entity.y + sensor_range * motion.angle.sin(),
                arena_size,
                window_rect,
            );
            draw.line()
                .start(center)
                .end(tip)
                .weight(1.5)
                .color(rgba(1.0, 0.85, 0.3, 0.6));
        }
        _ => {}
    }

    draw.ellipse().xy(center).radius(radius).color(body_color(&entity.kind));

    if let Some(motion) = entity.motion() {
        let nose = camera.arena_to_screen(
            entity.x + entity.radius() * motion.angle.cos(),
            entity.y + entity.radius() * motion.angle.sin(),
            arena_size,
            window_rect,
        );
        draw.line().start(center).end(nose).weight(2.0).color(WHITE);
    }

    if let Kind::PlayerRobot { shield: true, .. } = entity.kind {
        draw.ellipse()
            .xy(center)
            .radius(radius + 3.0)
            .no_fill()
            .stroke(rgba(0.4, 0.9, 1.0, 0.9))
            .stroke_weight(2.0);
    }

    if let Some(vitality) = entity.vitality() {
        let fraction = (vitality.value() / crate::entity::Vitality::MAX) as f32;
        let bar_y = center.y + radius + 6.0;
        let bar_width = BAR_WIDTH * camera.zoom;
        draw.rect()
            .x_y(center.x, bar_y)
            .w_h(bar_width, BAR_HEIGHT)
            .color(rgba(0.2, 0.2, 0.2, 0.9));
        draw.rect()
            .x_y(center.x - bar_width * (1.0 - fraction) / 2.0, bar_y)
            .w_h(bar_width * fraction, BAR_HEIGHT)
            .color(rgba(1.0 - fraction, fraction, 0.2, 1.0));
    }
}
