/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that contains every
 * tunable constant of the arena: its bounds, the resource economy of each
 * robot kind, sensor geometry and the food spawning policy. Some of these
 * values can be modified through the UI, so the struct also provides
 * change detection and slider ranges for the viewer.
 */

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6, FRAC_PI_8};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};
use crate::{ARENA_HEIGHT, ARENA_WIDTH};

// Parameters for the simulation that can be adjusted via UI or a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub arena_width: f64,
    pub arena_height: f64,
    /// Time step applied to every movement, normalised to one per tick.
    pub dt: f64,
    pub seed: Option<u64>,

    // Food spawning
    pub max_food: usize,
    pub food_spawn_interval: u32, // ticks between spawn attempts
    pub food_radius: f64,
    pub food_spawning: bool,
    pub placement_attempts: u32,

    // Whisker (prey) robots
    pub whisker_energy_decay: f64,
    pub whisker_food_energy: f64,
    pub whisker_turn: f64,
    pub whisker_angle: f64, // offset of each whisker from the heading
    pub whisker_sample_step: f64,
    pub whisker_margin: f64,

    // Beam sensor robots
    pub beam_energy_decay: f64,
    pub beam_food_energy: f64,
    pub beam_half_angle: f64,
    pub beam_turn: f64,
    pub beam_turn_cost: f64,

    // Predators
    pub predator_health_decay: f64,
    pub predator_health_gain: f64,
    pub predator_growth: f64,
    pub predator_slowdown: f64,
    pub predator_min_speed: f64,

    // Player robot
    pub player_food_health: f64,
    pub player_food_score: u32,
    pub player_collision_damage: f64,

    // Viewer
    pub show_debug: bool,
    pub pause_simulation: bool,

    // Internal state for tracking changes
    #[serde(skip)]
    pub(crate) previous_values: Option<ParamSnapshot>,
}

// A snapshot of parameter values used for change detection
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParamSnapshot {
    arena_width: f64,
    arena_height: f64,
    max_food: usize,
    food_spawn_interval: u32,
    food_spawning: bool,
    show_debug: bool,
    pause_simulation: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            dt: 1.0,
            seed: None,
            max_food: 10,
            food_spawn_interval: 300, // five seconds at 60 ticks per second
            food_radius: 10.0,
            food_spawning: false,
            placement_attempts: 10_000,
            whisker_energy_decay: 0.05,
            whisker_food_energy: 20.0,
            whisker_turn: FRAC_PI_2,
            whisker_angle: FRAC_PI_8,
            whisker_sample_step: 5.0,
            whisker_margin: 5.0,
            beam_energy_decay: 0.05,
            beam_food_energy: 10.0,
            beam_half_angle: FRAC_PI_6,
            beam_turn: FRAC_PI_4,
            beam_turn_cost: 0.5,
            predator_health_decay: 0.05,
            predator_health_gain: 30.0,
            predator_growth: 5.0,
            predator_slowdown: 0.8,
            predator_min_speed: 0.2,
            player_food_health: 10.0,
            player_food_score: 5,
            player_collision_damage: 10.0,
            show_debug: false,
            pause_simulation: false,
            previous_values: None,
        }
    }
}

impl SimulationParams {
    /// Load parameters from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.arena_width) || !positive(self.arena_height) {
            return Err(ArenaError::InvalidParams("arena dimensions must be positive"));
        }
        if !positive(self.dt) {
            return Err(ArenaError::InvalidParams("dt must be positive"));
        }
        if !positive(self.food_radius) {
            return Err(ArenaError::InvalidParams("food radius must be positive"));
        }
        if !positive(self.whisker_sample_step) {
            return Err(ArenaError::InvalidParams("whisker sample step must be positive"));
        }
        if self.placement_attempts == 0 {
            return Err(ArenaError::InvalidParams("placement attempts must be at least one"));
        }
        if !(0.0..=1.0).contains(&self.predator_slowdown) {
            return Err(ArenaError::InvalidParams("predator slowdown must lie in [0, 1]"));
        }
        Ok(())
    }

    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&mut self) {
        self.previous_values = Some(self.snapshot());
    }

    fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            arena_width: self.arena_width,
            arena_height: self.arena_height,
            max_food: self.max_food,
            food_spawn_interval: self.food_spawn_interval,
            food_spawning: self.food_spawning,
            show_debug: self.show_debug,
            pause_simulation: self.pause_simulation,
        }
    }

    // Check if any parameters have changed since the last snapshot
    // Returns a tuple of (bounds_changed, any_ui_changed)
    pub fn detect_changes(&self) -> (bool, bool) {
        let Some(prev) = &self.previous_values else {
            return (false, false);
        };

        let bounds_changed =
            self.arena_width != prev.arena_width || self.arena_height != prev.arena_height;
        let ui_changed = bounds_changed || self.snapshot() != *prev;

        (bounds_changed, ui_changed)
    }

    // Get parameter ranges for UI sliders
    pub fn get_max_food_range() -> std::ops::RangeInclusive<usize> {
        0..=100
    }

    pub fn get_spawn_interval_range() -> std::ops::RangeInclusive<u32> {
        10..=1800
    }

    pub fn get_arena_width_range() -> std::ops::RangeInclusive<f64> {
        200.0..=2000.0
    }

    pub fn get_arena_height_range() -> std::ops::RangeInclusive<f64> {
        200.0..=1500.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SimulationParams::default().validate().unwrap();
    }

    #[test]
    fn rejects_empty_arena() {
        let params = SimulationParams {
            arena_width: 0.0,
            ..SimulationParams::default()
        };
        assert!(matches!(params.validate(), Err(ArenaError::InvalidParams(_))));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let params: SimulationParams =
            serde_json::from_str(r#"{ "max_food": 3, "seed": 7 }"#).unwrap();
        assert_eq!(params.max_food, 3);
        assert_eq!(params.seed, Some(7));
        assert_eq!(params.arena_width, ARENA_WIDTH);
        assert_eq!(params.whisker_food_energy, 20.0);
    }

    #[test]
    fn detects_bounds_change_after_snapshot() {
        let mut params = SimulationParams::default();
        assert_eq!(params.detect_changes(), (false, false));

        params.take_snapshot();
        params.show_debug = true;
        assert_eq!(params.detect_changes(), (false, true));

        params.take_snapshot();
        params.arena_width = 1000.0;
        assert_eq!(params.detect_changes(), (true, true));
    }
}
