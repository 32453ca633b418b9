/*
 * Robot Arena - Module Definitions
 *
 * A bounded 2D arena populated by obstacles, food and several kinds of
 * autonomous robots. The simulation core (arena, behavior, sensing,
 * physics, spawn, layout) is plain Rust with no graphics dependency; the
 * nannou viewer modules (app, camera, renderer, ui, input) sit on top.
 */

// Re-export key components for easier access
pub use arena::{Arena, EntityView, TickReport};
pub use behavior::{rule_for, BehaviorRule, TickEffects, WorldView};
pub use camera::Camera;
pub use debug::DebugInfo;
pub use entity::{Blueprint, Entity, EntityId, Kind, KindTag, Motion, Vitality};
pub use error::{ArenaError, Result};
pub use layout::{
    default_arena, load_layout, load_layout_file, populate_default, save_layout, save_layout_file,
    starting_arena, LoadReport, DEFAULT_LAYOUT_PATH,
};
pub use params::SimulationParams;
pub use physics::Direction;
pub use spawn::{place_non_overlapping, spawn_food, FoodSpawner};

// Simulation core
pub mod arena;
pub mod behavior;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod params;
pub mod physics;
pub mod sensing;
pub mod spawn;

// Viewer
pub mod app;
pub mod camera;
pub mod debug;
pub mod input;
pub mod renderer;
pub mod ui;

// Constants
pub const ARENA_WIDTH: f64 = 800.0;
pub const ARENA_HEIGHT: f64 = 600.0;
