/*
 * Camera Module
 *
 * Zoom and pan for the arena view. Arena space has its origin at the
 * top-left corner with y growing downwards; nannou screen space is centred
 * with y growing upwards. The camera works in a centred, y-up "world" space
 * in between, so zooming and panning behave like any nannou scene.
 */

use nannou::prelude::*;

pub struct Camera {
    pub position: Vec2,
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub is_dragging: bool,
    pub last_cursor_pos: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.2,
            max_zoom: 5.0,
            is_dragging: false,
            last_cursor_pos: Vec2::ZERO,
        }
    }

    pub fn reset(&mut self) {
        self.position = Vec2::ZERO;
        self.zoom = 1.0;
        self.is_dragging = false;
    }

    // Convert a point from world space to screen space
    pub fn world_to_screen(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        (point - self.position) * self.zoom + window_rect.xy()
    }

    // Convert a point from screen space to world space
    pub fn screen_to_world(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        (point - window_rect.xy()) / self.zoom + self.position
    }

    /// Screen position of an arena coordinate.
    pub fn arena_to_screen(&self, x: f64, y: f64, arena_size: (f64, f64), window_rect: Rect) -> Vec2 {
        let (width, height) = arena_size;
        let world = vec2((x - width / 2.0) as f32, (height / 2.0 - y) as f32);
        self.world_to_screen(world, window_rect)
    }

    /// Arena coordinate under a screen position.
    pub fn screen_to_arena(&self, point: Vec2, arena_size: (f64, f64), window_rect: Rect) -> (f64, f64) {
        let (width, height) = arena_size;
        let world = self.screen_to_world(point, window_rect);
        (world.x as f64 + width / 2.0, height / 2.0 - world.y as f64)
    }

    /// Length in arena units scaled to screen pixels.
    pub fn scale(&self, length: f64) -> f32 {
        length as f32 * self.zoom
    }

    // Zoom around the cursor so the point under it stays put
    pub fn zoom(&mut self, scroll_delta: Vec2, cursor_position: Vec2, window_rect: Rect) {
        let zoom_factor = 1.0 + scroll_delta.y * 0.1;
        let cursor_world_before = self.screen_to_world(cursor_position, window_rect);
        self.zoom = (self.zoom * zoom_factor).clamp(self.min_zoom, self.max_zoom);
        let cursor_world_after = self.screen_to_world(cursor_position, window_rect);
        self.position += cursor_world_before - cursor_world_after;
    }

    pub fn start_drag(&mut self, position: Vec2) {
        self.last_cursor_pos = position;
        self.is_dragging = true;
    }

    pub fn drag(&mut self, position: Vec2) {
        if self.is_dragging {
            let delta = position - self.last_cursor_pos;
            if delta.length_squared() > 0.0 {
                self.position -= delta / self.zoom;
                self.last_cursor_pos = position;
            }
        }
    }

    pub fn end_drag(&mut self) {
        self.is_dragging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Rect {
        Rect::from_w_h(1000.0, 800.0)
    }

    #[test]
    fn arena_corners_map_to_screen_corners_at_unit_zoom() {
        let camera = Camera::new();
        let top_left = camera.arena_to_screen(0.0, 0.0, (800.0, 600.0), window());
        assert_eq!(top_left, vec2(-400.0, 300.0));
        let bottom_right = camera.arena_to_screen(800.0, 600.0, (800.0, 600.0), window());
        assert_eq!(bottom_right, vec2(400.0, -300.0));
    }

    #[test]
    fn screen_to_arena_inverts_arena_to_screen() {
        let mut camera = Camera::new();
        camera.zoom = 2.0;
        camera.position = vec2(30.0, -10.0);
        let screen = camera.arena_to_screen(120.0, 450.0, (800.0, 600.0), window());
        let (x, y) = camera.screen_to_arena(screen, (800.0, 600.0), window());
        assert!((x - 120.0).abs() < 1e-3);
        assert!((y - 450.0).abs() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::new();
        for _ in 0..100 {
            camera.zoom(vec2(0.0, 5.0), Vec2::ZERO, window());
        }
        assert_eq!(camera.zoom, camera.max_zoom);
    }
}
