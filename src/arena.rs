/*
 * Arena Module
 *
 * The Arena owns the bounded rectangle and the authoritative entity
 * collection, and runs one simulation tick at a time.
 *
 * A tick works on a frozen snapshot:
 * - every entity alive at the start of the tick runs its rule exactly once
 * - every rule sees the same snapshot, never a partially updated arena
 * - removal and spawn requests are buffered and applied once all rules ran
 *
 * External callers (viewer, layout loader, food spawner) only mutate the
 * arena between ticks.
 */

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::behavior::{rule_for, BehaviorRule, TickEffects, WorldView};
use crate::entity::{Blueprint, Entity, EntityId, Kind, KindTag};
use crate::error::{ArenaError, Result};
use crate::params::SimulationParams;
use crate::physics::{self, Direction};

/// Flat description of an alive entity, in collection order, for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: KindTag,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub angle: Option<f64>,
    pub speed: Option<f64>,
    pub vitality: Option<f64>,
    pub score: Option<u32>,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        let score = match entity.kind {
            Kind::PlayerRobot { score, .. } => Some(score),
            _ => None,
        };
        Self {
            id: entity.id(),
            kind: entity.tag(),
            x: entity.x,
            y: entity.y,
            radius: entity.radius(),
            angle: entity.motion().map(|m| m.angle),
            speed: entity.motion().map(|m| m.speed),
            vitality: entity.vitality().map(|v| v.value()),
            score,
        }
    }
}

/// What one tick changed in the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub removed: Vec<EntityId>,
    pub spawned: Vec<EntityId>,
}

#[derive(Debug, Clone)]
pub struct Arena {
    width: f64,
    height: f64,
    entities: Vec<Entity>,
    next_id: u64,
    ticks: u64,
}

fn check_bounds(width: f64, height: f64) -> Result<()> {
    if width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0 {
        Ok(())
    } else {
        Err(ArenaError::InvalidParams("arena dimensions must be positive"))
    }
}

impl Arena {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        check_bounds(width, height)?;
        Ok(Self {
            width,
            height,
            entities: Vec::new(),
            next_id: 1,
            ticks: 0,
        })
    }

    pub fn from_params(params: &SimulationParams) -> Result<Self> {
        Self::new(params.arena_width, params.arena_height)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Alive entities in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn count_of(&self, tag: KindTag) -> usize {
        self.entities.iter().filter(|e| e.tag() == tag).count()
    }

    pub fn views(&self) -> Vec<EntityView> {
        self.entities.iter().map(EntityView::from).collect()
    }

    /// Insert a new entity under a fresh id, clamped inside the arena.
    /// Fails only on invalid geometry.
    pub fn add(&mut self, blueprint: Blueprint) -> Result<EntityId> {
        let id = EntityId(self.next_id);
        let mut entity = Entity::from_blueprint(id, blueprint)?;
        physics::clamp_inside(&mut entity, self.width, self.height);
        self.next_id += 1;
        debug!(id = %id, kind = %entity.tag(), x = entity.x, y = entity.y, "entity added");
        self.entities.push(entity);
        Ok(id)
    }

    /// Remove an entity. Removing an id that is already gone is a no-op.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.entities.len();
        self.entities.retain(|e| e.id() != id);
        let removed = self.entities.len() != before;
        if removed {
            debug!(id = %id, "entity removed");
        }
        removed
    }

    /// Change the bounds and pull every entity back inside them.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        check_bounds(width, height)?;
        self.width = width;
        self.height = height;
        for entity in &mut self.entities {
            physics::clamp_inside(entity, width, height);
        }
        info!(width, height, "arena resized");
        Ok(())
    }

    /// Drop every entity. Ids keep increasing so none is ever reused.
    pub fn reset(&mut self) {
        info!(dropped = self.entities.len(), "arena reset");
        self.entities.clear();
        self.ticks = 0;
    }

    /// Run every alive entity's rule once against a frozen snapshot, then
    /// apply the buffered removals and spawns.
    pub fn tick(&mut self, params: &SimulationParams) -> TickReport {
        self.tick_with(params, rule_for)
    }

    /// Same as [`Arena::tick`] with a caller-supplied rule table.
    pub fn tick_with<F>(&mut self, params: &SimulationParams, rules: F) -> TickReport
    where
        F: Fn(KindTag) -> BehaviorRule,
    {
        let snapshot = std::mem::take(&mut self.entities);
        let world = WorldView {
            entities: &snapshot,
            width: self.width,
            height: self.height,
            params,
        };

        let mut effects = TickEffects::default();
        let updated: Vec<Entity> = snapshot
            .iter()
            .map(|entity| {
                let mut next = entity.clone();
                rules(entity.tag())(&mut next, &world, &mut effects);
                next
            })
            .collect();

        let (removals, spawns) = effects.into_parts();
        let doomed: HashSet<EntityId> = removals.into_iter().collect();

        let mut removed = Vec::new();
        self.entities = updated
            .into_iter()
            .filter(|entity| {
                let gone = doomed.contains(&entity.id());
                if gone {
                    removed.push(entity.id());
                }
                !gone
            })
            .collect();

        let mut spawned = Vec::new();
        for blueprint in spawns {
            match self.add(blueprint) {
                Ok(id) => spawned.push(id),
                Err(err) => warn!(%err, "dropping spawn request"),
            }
        }

        self.ticks += 1;
        if !removed.is_empty() || !spawned.is_empty() {
            debug!(tick = self.ticks, removed = removed.len(), spawned = spawned.len(), "tick applied");
        }

        TickReport {
            tick: self.ticks,
            removed,
            spawned,
        }
    }

    fn get_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(ArenaError::UnknownEntity(id))
    }

    /// Apply one discrete move command to a player robot.
    pub fn move_player(&mut self, id: EntityId, direction: Direction) -> Result<()> {
        let (width, height) = (self.width, self.height);
        let entity = self.get_mut(id)?;
        if physics::nudge(entity, direction, width, height) {
            Ok(())
        } else {
            Err(ArenaError::NotAPlayer(id))
        }
    }

    pub fn set_shield(&mut self, id: EntityId, active: bool) -> Result<()> {
        match &mut self.get_mut(id)?.kind {
            Kind::PlayerRobot { shield, .. } => {
                *shield = active;
                Ok(())
            }
            _ => Err(ArenaError::NotAPlayer(id)),
        }
    }

    /// Entity whose circle contains the point, preferring the closest centre.
    pub fn entity_at(&self, x: f64, y: f64) -> Option<EntityId> {
        self.entities
            .iter()
            .map(|e| (e, crate::geometry::distance(e.x, e.y, x, y)))
            .filter(|(e, d)| *d < e.radius())
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(e, _)| e.id())
    }

    /// Move an entity directly, keeping its circle inside the arena.
    pub fn relocate(&mut self, id: EntityId, x: f64, y: f64) -> Result<()> {
        let (width, height) = (self.width, self.height);
        let entity = self.get_mut(id)?;
        entity.x = x;
        entity.y = y;
        physics::clamp_inside(entity, width, height);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Vitality;
    use std::f64::consts::PI;

    fn arena() -> Arena {
        Arena::new(800.0, 600.0).unwrap()
    }

    #[test]
    fn ids_are_fresh_and_never_reused() {
        let mut arena = arena();
        let a = arena.add(Blueprint::new(Kind::Food, 10.0, 10.0, 5.0)).unwrap();
        arena.remove(a);
        let b = arena.add(Blueprint::new(Kind::Food, 10.0, 10.0, 5.0)).unwrap();
        arena.reset();
        let c = arena.add(Blueprint::new(Kind::Food, 10.0, 10.0, 5.0)).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn add_rejects_invalid_radius() {
        let mut arena = arena();
        let err = arena.add(Blueprint::new(Kind::Obstacle, 10.0, 10.0, -1.0));
        assert!(matches!(err, Err(ArenaError::InvalidRadius(_))));
        assert!(arena.is_empty());
    }

    #[test]
    fn add_clamps_every_kind_inside_the_bounds() {
        let mut arena = arena();
        let obstacle = arena.add(Blueprint::new(Kind::Obstacle, -50.0, 900.0, 10.0)).unwrap();
        let player = arena.add(Blueprint::new(Kind::player_robot(5.0), 1000.0, -30.0, 20.0)).unwrap();
        let food = arena.add(Blueprint::new(Kind::Food, 5000.0, 300.0, 10.0)).unwrap();

        let position = |arena: &Arena, id| {
            let e = arena.get(id).unwrap();
            (e.x, e.y)
        };
        assert_eq!(position(&arena, obstacle), (10.0, 590.0));
        assert_eq!(position(&arena, player), (780.0, 20.0));
        assert_eq!(position(&arena, food), (790.0, 300.0));

        arena.tick(&SimulationParams::default());
        for e in arena.entities() {
            assert!(e.x >= e.radius() && e.x <= arena.width() - e.radius());
            assert!(e.y >= e.radius() && e.y <= arena.height() - e.radius());
        }
    }

    #[test]
    fn rejects_degenerate_bounds() {
        assert!(Arena::new(0.0, 600.0).is_err());
        assert!(Arena::new(800.0, f64::NAN).is_err());
    }

    #[test]
    fn resize_pulls_entities_inside() {
        let mut arena = arena();
        let id = arena.add(Blueprint::new(Kind::Obstacle, 700.0, 500.0, 30.0)).unwrap();
        arena.resize(400.0, 300.0).unwrap();

        let obstacle = arena.get(id).unwrap();
        assert_eq!((obstacle.x, obstacle.y), (370.0, 270.0));
        assert!(arena.resize(-1.0, 300.0).is_err());
        assert_eq!(arena.width(), 400.0);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut arena = arena();
        let keep = arena.add(Blueprint::new(Kind::Obstacle, 100.0, 100.0, 10.0)).unwrap();
        let gone = arena.add(Blueprint::new(Kind::Food, 200.0, 200.0, 10.0)).unwrap();

        assert!(arena.remove(gone));
        let once = arena.views();
        assert!(!arena.remove(gone));
        assert_eq!(arena.views(), once);
        assert!(arena.contains(keep));
    }

    #[test]
    fn prey_eaten_by_two_predators_is_removed_once() {
        let mut arena = arena();
        let prey = arena
            .add(Blueprint::new(Kind::whisker_robot(0.0, 0.0, 10.0), 400.0, 300.0, 20.0))
            .unwrap();
        let left = arena
            .add(Blueprint::new(Kind::predator_robot(0.0, 0.0), 370.0, 300.0, 20.0))
            .unwrap();
        let right = arena
            .add(Blueprint::new(Kind::predator_robot(PI, 0.0), 430.0, 300.0, 20.0))
            .unwrap();

        let report = arena.tick(&SimulationParams::default());
        assert_eq!(report.removed, vec![prey]);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(left).unwrap().radius(), 25.0);
        assert_eq!(arena.get(right).unwrap().radius(), 25.0);
    }

    #[test]
    fn every_entity_sees_the_start_of_tick_snapshot() {
        // The food is eaten by the player, but the whisker robot scanning
        // later in the same tick still sees and eats it too
        let mut arena = arena();
        let player = arena
            .add(Blueprint::new(Kind::player_robot(5.0), 300.0, 300.0, 20.0))
            .unwrap();
        let food = arena.add(Blueprint::new(Kind::Food, 320.0, 300.0, 10.0)).unwrap();
        let robot = arena
            .add(Blueprint::new(Kind::whisker_robot(PI / 2.0, 0.0, 10.0), 340.0, 300.0, 20.0))
            .unwrap();
        {
            let entity = arena.get_mut(robot).unwrap();
            *entity.vitality_mut().unwrap() = Vitality::new(50.0);
        }

        arena.tick(&SimulationParams::default());
        assert!(!arena.contains(food));
        assert!(matches!(arena.get(player).unwrap().kind, Kind::PlayerRobot { score: 5, .. }));
        let energy = arena.get(robot).unwrap().vitality().unwrap().value();
        assert!((energy - 69.95).abs() < 1e-9);
    }

    #[test]
    fn spawn_requests_land_after_every_rule_ran() {
        fn budding(me: &mut Entity, world: &WorldView<'_>, effects: &mut TickEffects) {
            // Nobody may observe the bud during the tick it was requested in
            assert_eq!(world.entities.len(), 1);
            effects.spawn(Blueprint::new(Kind::Food, me.x + 50.0, me.y, 10.0));
            effects.spawn(Blueprint::new(Kind::Food, me.x, me.y, 0.0));
        }
        fn table(tag: KindTag) -> BehaviorRule {
            match tag {
                KindTag::Obstacle => budding,
                other => rule_for(other),
            }
        }

        let mut arena = arena();
        arena.add(Blueprint::new(Kind::Obstacle, 100.0, 100.0, 10.0)).unwrap();

        let report = arena.tick_with(&SimulationParams::default(), table);
        assert_eq!(report.spawned.len(), 1);
        assert_eq!(arena.count_of(KindTag::Food), 1);
        assert_eq!(arena.get(report.spawned[0]).unwrap().x, 150.0);
    }

    #[test]
    fn spawn_requests_outside_the_walls_are_clamped() {
        fn scatter(me: &mut Entity, _world: &WorldView<'_>, effects: &mut TickEffects) {
            effects.spawn(Blueprint::new(Kind::Food, me.x - 500.0, me.y - 500.0, 10.0));
        }
        fn table(tag: KindTag) -> BehaviorRule {
            match tag {
                KindTag::Obstacle => scatter,
                other => rule_for(other),
            }
        }

        let mut arena = arena();
        arena.add(Blueprint::new(Kind::Obstacle, 100.0, 100.0, 10.0)).unwrap();

        let report = arena.tick_with(&SimulationParams::default(), table);
        let food = arena.get(report.spawned[0]).unwrap();
        assert_eq!((food.x, food.y), (10.0, 10.0));
    }

    #[test]
    fn player_commands_and_shield() {
        let mut arena = arena();
        let player = arena
            .add(Blueprint::new(Kind::player_robot(5.0), 400.0, 22.0, 20.0))
            .unwrap();
        let rock = arena.add(Blueprint::new(Kind::Obstacle, 100.0, 100.0, 10.0)).unwrap();

        arena.move_player(player, Direction::Up).unwrap();
        assert_eq!(arena.get(player).unwrap().y, 20.0);
        arena.move_player(player, Direction::Right).unwrap();
        assert_eq!(arena.get(player).unwrap().x, 405.0);

        assert!(matches!(arena.move_player(rock, Direction::Up), Err(ArenaError::NotAPlayer(_))));
        assert!(matches!(
            arena.move_player(EntityId(999), Direction::Up),
            Err(ArenaError::UnknownEntity(_))
        ));

        arena.set_shield(player, true).unwrap();
        assert!(matches!(arena.get(player).unwrap().kind, Kind::PlayerRobot { shield: true, .. }));
    }

    #[test]
    fn selection_prefers_closest_centre() {
        let mut arena = arena();
        let big = arena.add(Blueprint::new(Kind::Obstacle, 100.0, 100.0, 50.0)).unwrap();
        let small = arena.add(Blueprint::new(Kind::Food, 130.0, 100.0, 10.0)).unwrap();

        assert_eq!(arena.entity_at(128.0, 100.0), Some(small));
        assert_eq!(arena.entity_at(90.0, 100.0), Some(big));
        assert_eq!(arena.entity_at(700.0, 500.0), None);
    }

    #[test]
    fn relocate_clamps_into_bounds() {
        let mut arena = arena();
        let id = arena.add(Blueprint::new(Kind::Obstacle, 100.0, 100.0, 30.0)).unwrap();
        arena.relocate(id, -50.0, 900.0).unwrap();
        let e = arena.get(id).unwrap();
        assert_eq!((e.x, e.y), (30.0, 570.0));
    }

    #[test]
    fn views_expose_kind_specific_fields() {
        let mut arena = arena();
        arena.add(Blueprint::new(Kind::Food, 10.0, 10.0, 5.0)).unwrap();
        arena
            .add(Blueprint::new(Kind::beam_sensor_robot(1.0, 1.5, 100.0, 80.0), 200.0, 200.0, 20.0))
            .unwrap();

        let views = arena.views();
        assert_eq!(views[0].kind, KindTag::Food);
        assert_eq!(views[0].angle, None);
        assert_eq!(views[1].angle, Some(1.0));
        assert_eq!(views[1].vitality, Some(80.0));
    }
}
