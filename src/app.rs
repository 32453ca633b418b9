/*
 * Application Module
 *
 * The nannou model for the arena viewer. Owns the arena, the parameters,
 * the seeded random source and the food spawner, and advances the
 * simulation by one tick per frame unless paused.
 *
 * nannou builds the model through a plain function pointer, so the binary
 * hands over its prepared launch state with `configure` before starting
 * the app.
 */

use std::f64::consts::TAU;
use std::sync::OnceLock;

use nannou::prelude::*;
use nannou_egui::Egui;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::arena::Arena;
use crate::camera::Camera;
use crate::debug::DebugInfo;
use crate::entity::{Blueprint, EntityId, Kind, KindTag};
use crate::input;
use crate::layout;
use crate::params::SimulationParams;
use crate::renderer;
use crate::spawn::{self, FoodSpawner};
use crate::ui::{self, UiAction};

/// Everything the viewer needs to start, prepared before the window opens.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub params: SimulationParams,
    pub arena: Arena,
    pub rng: ChaCha8Rng,
}

pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

static LAUNCH: OnceLock<LaunchConfig> = OnceLock::new();

/// Hand the launch state to the viewer. Only the first call has an effect.
pub fn configure(config: LaunchConfig) {
    if LAUNCH.set(config).is_err() {
        warn!("viewer already configured; ignoring new launch state");
    }
}

// Main model for the application
pub struct Model {
    pub arena: Arena,
    pub params: SimulationParams,
    pub egui: Egui,
    pub rng: ChaCha8Rng,
    pub spawner: FoodSpawner,
    pub debug_info: DebugInfo,
    pub camera: Camera,
    pub mouse_position: Vec2,
    pub selected: Option<EntityId>,
    pub dragging_entity: bool,
    pub layout_path: String,
    pub status: Option<String>,
}

impl Model {
    /// The player robot that arrow keys drive: the selected one if it is a
    /// player, otherwise the first player in the arena.
    pub fn controlled_player(&self) -> Option<EntityId> {
        let is_player = |id: &EntityId| {
            self.arena
                .get(*id)
                .map_or(false, |e| e.tag() == KindTag::PlayerRobot)
        };
        self.selected.filter(is_player).or_else(|| {
            self.arena
                .entities()
                .iter()
                .find(|e| e.tag() == KindTag::PlayerRobot)
                .map(|e| e.id())
        })
    }

    pub fn arena_size(&self) -> (f64, f64) {
        (self.arena.width(), self.arena.height())
    }

    fn spawn(&mut self, tag: KindTag) {
        let heading = self.rng.gen_range(0.0..TAU);
        let mut blueprint = Blueprint::unplaced(Kind::with_defaults(tag, heading));
        if tag == KindTag::Food {
            blueprint.radius = self.params.food_radius;
        }
        match spawn::place_non_overlapping(
            &mut self.arena,
            blueprint,
            &mut self.rng,
            self.params.placement_attempts,
        ) {
            Ok(id) => self.selected = Some(id),
            Err(err) => self.status = Some(format!("Could not place {tag}: {err}")),
        }
    }

    fn reset(&mut self) {
        self.arena.reset();
        self.spawner.reset();
        self.selected = None;
        self.status = layout::populate_default(&mut self.arena, &self.params, &mut self.rng)
            .err()
            .map(|err| format!("Reset failed: {err}"));
    }

    fn save_layout(&mut self) {
        self.status = Some(match layout::save_layout_file(&self.arena, &self.layout_path) {
            Ok(()) => format!("Saved {} entities to {}", self.arena.len(), self.layout_path),
            Err(err) => format!("Save failed: {err}"),
        });
    }

    fn load_layout(&mut self) {
        self.status = Some(match layout::load_layout_file(&self.layout_path, &self.params) {
            Ok((arena, report)) => {
                self.arena = arena;
                self.spawner.reset();
                self.selected = None;
                format!(
                    "Loaded {} entities ({} malformed, {} unknown lines skipped)",
                    report.loaded, report.malformed, report.unknown
                )
            }
            Err(err) => format!("Load failed: {err}"),
        });
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Spawn(tag) => self.spawn(tag),
            UiAction::Reset => self.reset(),
            UiAction::SaveLayout => self.save_layout(),
            UiAction::LoadLayout => self.load_layout(),
            UiAction::DeleteSelected => {
                if let Some(id) = self.selected.take() {
                    self.arena.remove(id);
                }
            }
            UiAction::SetShield(active) => {
                if let Some(id) = self.selected {
                    if let Err(err) = self.arena.set_shield(id, active) {
                        self.status = Some(err.to_string());
                    }
                }
            }
            UiAction::ResetCamera => self.camera.reset(),
        }
    }
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let LaunchConfig { params, arena, rng } = match LAUNCH.get() {
        Some(config) => config.clone(),
        None => {
            let params = SimulationParams::default();
            let mut rng = seeded_rng(params.seed);
            let arena = layout::default_arena(&params, &mut rng)
                .expect("default arena fits the default bounds");
            LaunchConfig { params, arena, rng }
        }
    };

    let window_id = app
        .new_window()
        .title("Robot Arena")
        .size(1200, 800)
        .view(renderer::view)
        .mouse_moved(input::mouse_moved)
        .mouse_pressed(input::mouse_pressed)
        .mouse_released(input::mouse_released)
        .mouse_wheel(input::mouse_wheel)
        .key_pressed(input::key_pressed)
        .raw_event(input::raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    info!(entities = arena.len(), seed = ?params.seed, "viewer started");

    let mut debug_info = DebugInfo::default();
    debug_info.record(&arena, None);

    Model {
        arena,
        params,
        egui,
        rng,
        spawner: FoodSpawner::new(),
        debug_info,
        camera: Camera::new(),
        mouse_position: Vec2::ZERO,
        selected: None,
        dragging_entity: false,
        layout_path: layout::DEFAULT_LAYOUT_PATH.to_string(),
        status: None,
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    let response = ui::update_ui(model);

    if response.bounds_changed {
        if let Err(err) = model
            .arena
            .resize(model.params.arena_width, model.params.arena_height)
        {
            model.status = Some(err.to_string());
        }
    }
    for action in response.actions {
        model.apply(action);
    }

    let report = if model.params.pause_simulation {
        None
    } else {
        let report = model.arena.tick(&model.params);
        model
            .spawner
            .on_tick(&mut model.arena, &model.params, &mut model.rng);
        Some(report)
    };

    if let Some(id) = model.selected {
        if !model.arena.contains(id) {
            model.selected = None;
            model.dragging_entity = false;
        }
    }

    model.debug_info.record(&model.arena, report.as_ref());
}
