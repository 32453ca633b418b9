/*
 * Behavior Module
 *
 * One update rule per entity kind, dispatched through `rule_for`. Each rule
 * receives a private copy of its entity to mutate, a read-only view of the
 * world as it was at the start of the tick, and an effects buffer for
 * removal and spawn requests. Rules never touch the entity collection.
 *
 * Every sensor-driven rule runs its concerns in the same order:
 * 1. terminal check (energy/health already exhausted)
 * 2. resource decay, then a second terminal check
 * 3. sense
 * 4. react (steer, consume); avoidance beats food seeking
 * 5. move
 * 6. reflect at the arena bounds
 */

use tracing::trace;

use crate::entity::{Blueprint, Entity, EntityId, Kind, KindTag};
use crate::geometry;
use crate::params::SimulationParams;
use crate::physics;
use crate::sensing::{self, WhiskerRay};

/// Read-only world state shared by every rule during one tick.
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    pub entities: &'a [Entity],
    pub width: f64,
    pub height: f64,
    pub params: &'a SimulationParams,
}

/// Removal and spawn requests collected during a tick and applied afterwards.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TickEffects {
    removals: Vec<EntityId>,
    spawns: Vec<Blueprint>,
}

impl TickEffects {
    pub fn remove(&mut self, id: EntityId) {
        self.removals.push(id);
    }

    pub fn spawn(&mut self, blueprint: Blueprint) {
        self.spawns.push(blueprint);
    }

    pub fn removals(&self) -> &[EntityId] {
        &self.removals
    }

    pub(crate) fn into_parts(self) -> (Vec<EntityId>, Vec<Blueprint>) {
        (self.removals, self.spawns)
    }
}

pub type BehaviorRule = fn(&mut Entity, &WorldView<'_>, &mut TickEffects);

/// Rule table: kind → update function.
pub fn rule_for(tag: KindTag) -> BehaviorRule {
    match tag {
        KindTag::Obstacle | KindTag::Food => inert,
        KindTag::WhiskerRobot => whisker_robot,
        KindTag::BeamSensorRobot => beam_sensor_robot,
        KindTag::PredatorRobot => predator_robot,
        KindTag::PlayerRobot => player_robot,
    }
}

fn is_food(entity: &Entity) -> bool {
    entity.tag() == KindTag::Food
}

// What the sensor robots steer away from
fn is_obstruction(entity: &Entity) -> bool {
    let tag = entity.tag();
    tag == KindTag::Obstacle || tag.is_robot()
}

// Terminal check: request self-removal once the resource is gone
fn retire_if_depleted(me: &Entity, effects: &mut TickEffects) -> bool {
    if me.is_depleted() {
        trace!(id = %me.id(), kind = %me.tag(), "resource exhausted");
        effects.remove(me.id());
        true
    } else {
        false
    }
}

fn drain(me: &mut Entity, amount: f64) {
    if let Some(v) = me.vitality_mut() {
        v.drain(amount);
    }
}

fn restore(me: &mut Entity, amount: f64) {
    if let Some(v) = me.vitality_mut() {
        v.restore(amount);
    }
}

fn turn(me: &mut Entity, delta: f64) {
    if let Some(motion) = me.motion_mut() {
        motion.angle += delta;
    }
}

fn steer_towards(me: &mut Entity, target: &Entity) {
    let heading = geometry::bearing(me.x, me.y, target.x, target.y);
    if let Some(motion) = me.motion_mut() {
        motion.angle = heading;
    }
}

fn move_and_reflect(me: &mut Entity, world: &WorldView<'_>) {
    physics::advance(me, world.params.dt);
    physics::reflect_at_bounds(me, world.width, world.height);
}

fn inert(_me: &mut Entity, _world: &WorldView<'_>, _effects: &mut TickEffects) {}

fn whisker_robot(me: &mut Entity, world: &WorldView<'_>, effects: &mut TickEffects) {
    let params = world.params;
    let whisker_length = match me.kind {
        Kind::WhiskerRobot { whisker_length, .. } => whisker_length,
        _ => return,
    };

    if retire_if_depleted(me, effects) {
        return;
    }
    drain(me, params.whisker_energy_decay);
    if retire_if_depleted(me, effects) {
        return;
    }

    let food = sensing::nearest_of_kind(me, world.entities, is_food);
    let touching = [-params.whisker_angle, params.whisker_angle]
        .into_iter()
        .any(|angle_offset| {
            let ray = WhiskerRay {
                angle_offset,
                length: whisker_length,
                sample_step: params.whisker_sample_step,
                margin: params.whisker_margin,
            };
            sensing::whisker_touching(me, world.entities, &ray, world.width, world.height, |e| {
                !is_food(e)
            })
        });

    if touching {
        trace!(id = %me.id(), "whisker contact");
        turn(me, params.whisker_turn);
    } else if let Some(food) = food {
        steer_towards(me, food);
    }

    if let Some(food) = food {
        if me.overlaps(food) {
            trace!(id = %me.id(), food = %food.id(), "eating");
            effects.remove(food.id());
            restore(me, params.whisker_food_energy);
        }
    }

    move_and_reflect(me, world);
}

fn beam_sensor_robot(me: &mut Entity, world: &WorldView<'_>, effects: &mut TickEffects) {
    let params = world.params;
    let sensor_range = match me.kind {
        Kind::BeamSensorRobot { sensor_range, .. } => sensor_range,
        _ => return,
    };

    if retire_if_depleted(me, effects) {
        return;
    }
    drain(me, params.beam_energy_decay);
    if retire_if_depleted(me, effects) {
        return;
    }

    let half_angle = params.beam_half_angle;
    let obstruction =
        sensing::detect_in_cone(me, world.entities, sensor_range, half_angle, is_obstruction);
    let wall = sensing::beam_hits_wall(me, sensor_range, world.width, world.height);

    if obstruction.is_some() || wall {
        trace!(id = %me.id(), wall, "beam blocked, turning");
        turn(me, params.beam_turn);
        drain(me, params.beam_turn_cost);
    } else if let Some(food) =
        sensing::detect_in_cone(me, world.entities, sensor_range, half_angle, is_food)
    {
        steer_towards(me, food);
        if me.overlaps(food) {
            trace!(id = %me.id(), food = %food.id(), "absorbing");
            effects.remove(food.id());
            restore(me, params.beam_food_energy);
        }
    }

    if retire_if_depleted(me, effects) {
        return;
    }
    move_and_reflect(me, world);
}

fn predator_robot(me: &mut Entity, world: &WorldView<'_>, effects: &mut TickEffects) {
    let params = world.params;

    if retire_if_depleted(me, effects) {
        return;
    }
    drain(me, params.predator_health_decay);
    if retire_if_depleted(me, effects) {
        return;
    }

    let prey = sensing::nearest_of_kind(me, world.entities, |e| e.tag() == KindTag::WhiskerRobot);
    if let Some(prey) = prey {
        steer_towards(me, prey);
        if me.overlaps(prey) {
            trace!(id = %me.id(), prey = %prey.id(), "caught prey");
            effects.remove(prey.id());
            me.grow(params.predator_growth);
            restore(me, params.predator_health_gain);
            if let Some(motion) = me.motion_mut() {
                motion.speed = (motion.speed * params.predator_slowdown).max(params.predator_min_speed);
            }
        }
    }

    for other in world.entities {
        if other.id() != me.id() && other.tag() == KindTag::PredatorRobot && me.overlaps(other) {
            physics::separate_from(me, other);
        }
    }

    move_and_reflect(me, world);
}

fn player_robot(me: &mut Entity, world: &WorldView<'_>, effects: &mut TickEffects) {
    let params = world.params;

    if retire_if_depleted(me, effects) {
        return;
    }

    for other in world.entities {
        if other.id() == me.id() || !me.overlaps(other) {
            continue;
        }
        if is_food(other) {
            effects.remove(other.id());
            restore(me, params.player_food_health);
            if let Kind::PlayerRobot { score, .. } = &mut me.kind {
                *score += params.player_food_score;
            }
        } else if !matches!(me.kind, Kind::PlayerRobot { shield: true, .. }) {
            drain(me, params.player_collision_damage);
        }
    }

    retire_if_depleted(me, effects);
}
