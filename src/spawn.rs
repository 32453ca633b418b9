/*
 * Spawn Module
 *
 * Non-overlapping placement by rejection sampling, and the periodic food
 * spawner driven by the caller's tick cadence.
 *
 * The random source is always passed in, so seeded callers get
 * reproducible placements. Sampling is capped: a saturated arena yields
 * `ArenaError::PlacementFailed` instead of retrying forever.
 */

use rand::Rng;
use tracing::{debug, warn};

use crate::arena::Arena;
use crate::entity::{check_radius, Blueprint, Entity, EntityId, Kind, KindTag};
use crate::error::{ArenaError, Result};
use crate::geometry;
use crate::params::SimulationParams;

// Uniform sample in [radius, extent - radius]; degenerate axes pin to the centre
fn sample_axis<R: Rng + ?Sized>(rng: &mut R, radius: f64, extent: f64) -> f64 {
    let (low, high) = (radius, extent - radius);
    if low < high {
        rng.gen_range(low..=high)
    } else {
        extent / 2.0
    }
}

fn is_free(existing: &[Entity], x: f64, y: f64, radius: f64) -> bool {
    !existing
        .iter()
        .any(|other| geometry::circles_overlap(x, y, radius, other.x, other.y, other.radius()))
}

/// Place `blueprint` at a random position that overlaps nothing, then add it.
///
/// The blueprint's own position is ignored. At most `max_attempts` positions
/// are tried.
pub fn place_non_overlapping<R: Rng + ?Sized>(
    arena: &mut Arena,
    mut blueprint: Blueprint,
    rng: &mut R,
    max_attempts: u32,
) -> Result<EntityId> {
    check_radius(blueprint.radius)?;
    let radius = blueprint.radius;
    let (width, height) = (arena.width(), arena.height());

    for _ in 0..max_attempts {
        let x = sample_axis(rng, radius, width);
        let y = sample_axis(rng, radius, height);
        if is_free(arena.entities(), x, y, radius) {
            blueprint.x = x;
            blueprint.y = y;
            return arena.add(blueprint);
        }
    }

    warn!(
        kind = %blueprint.kind.tag(),
        radius,
        attempts = max_attempts,
        "arena too crowded to place entity"
    );
    Err(ArenaError::PlacementFailed {
        attempts: max_attempts,
    })
}

/// Add one food item if the arena holds fewer than `params.max_food`.
///
/// Returns `Ok(None)` when the ceiling is already reached.
pub fn spawn_food<R: Rng + ?Sized>(
    arena: &mut Arena,
    params: &SimulationParams,
    rng: &mut R,
) -> Result<Option<EntityId>> {
    if arena.count_of(KindTag::Food) >= params.max_food {
        return Ok(None);
    }
    let food = Blueprint::new(Kind::Food, 0.0, 0.0, params.food_radius);
    place_non_overlapping(arena, food, rng, params.placement_attempts).map(Some)
}

/// Periodic food trigger. Call `on_tick` once per simulation tick.
#[derive(Debug, Clone, Default)]
pub struct FoodSpawner {
    elapsed: u32,
}

impl FoodSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the spawner by one tick and spawn food when the interval
    /// elapses. Does nothing while spawning is disabled.
    pub fn on_tick<R: Rng + ?Sized>(
        &mut self,
        arena: &mut Arena,
        params: &SimulationParams,
        rng: &mut R,
    ) -> Option<EntityId> {
        if !params.food_spawning {
            return None;
        }

        self.elapsed += 1;
        if self.elapsed < params.food_spawn_interval.max(1) {
            return None;
        }
        self.elapsed = 0;

        match spawn_food(arena, params, rng) {
            Ok(Some(id)) => {
                debug!(id = %id, "food spawned");
                Some(id)
            }
            Ok(None) => None,
            Err(err) => {
                warn!(%err, "food spawn skipped");
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}
