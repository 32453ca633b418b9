/*
 * Physics Module
 *
 * Movement and boundary handling for arena entities:
 * - Straight-line motion along the current heading
 * - Reflect-then-clamp at the arena walls
 * - Pushing apart overlapping predators along their separating axis
 * - Discrete player steps clamped to the arena
 */

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Kind};

/// Discrete move command for a player robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

// Move an entity along its heading; static kinds and players are left alone
pub fn advance(entity: &mut Entity, dt: f64) {
    let Some(motion) = entity.motion().copied() else {
        return;
    };
    entity.x += motion.speed * motion.angle.cos() * dt;
    entity.y += motion.speed * motion.angle.sin() * dt;
}

/// Reflect the heading off any wall the circle has crossed, then clamp the
/// circle so it is tangent to the wall instead of past it.
///
/// Only moving kinds are touched. The test is made against the position the
/// entity already has; nothing is predicted.
pub fn reflect_at_bounds(entity: &mut Entity, width: f64, height: f64) {
    let radius = entity.radius();
    let (x, y) = (entity.x, entity.y);
    let Some(motion) = entity.motion_mut() else {
        return;
    };

    if x - radius < 0.0 || x + radius > width {
        motion.angle = PI - motion.angle;
    }
    if y - radius < 0.0 || y + radius > height {
        motion.angle = -motion.angle;
    }

    clamp_inside(entity, width, height);
}

/// Keep the circle inside the arena. If the arena is narrower than the
/// circle, the centre is pinned to the middle of that axis.
pub fn clamp_inside(entity: &mut Entity, width: f64, height: f64) {
    entity.x = clamp_axis(entity.x, entity.radius(), width);
    entity.y = clamp_axis(entity.y, entity.radius(), height);
}

fn clamp_axis(value: f64, radius: f64, extent: f64) -> f64 {
    if 2.0 * radius >= extent {
        extent / 2.0
    } else {
        value.clamp(radius, extent - radius)
    }
}

/// Push `entity` out of `other` by half the penetration depth.
///
/// Both parties run this against the same snapshot, so together they end up
/// just touching. Coincident centres separate along the x axis.
pub fn separate_from(entity: &mut Entity, other: &Entity) {
    let penetration = entity.radius() + other.radius() - entity.distance_to(other);
    if penetration <= 0.0 {
        return;
    }

    let dx = entity.x - other.x;
    let dy = entity.y - other.y;
    let length = (dx * dx + dy * dy).sqrt();
    let (nx, ny) = if length > 0.0 {
        (dx / length, dy / length)
    } else if entity.id() < other.id() {
        (-1.0, 0.0)
    } else {
        (1.0, 0.0)
    };

    entity.x += nx * penetration / 2.0;
    entity.y += ny * penetration / 2.0;
}

/// Apply one discrete step to a player robot. Returns false for other kinds.
pub fn nudge(entity: &mut Entity, direction: Direction, width: f64, height: f64) -> bool {
    let step = match &entity.kind {
        Kind::PlayerRobot { step, .. } => *step,
        _ => return false,
    };

    match direction {
        Direction::Up => entity.y -= step,
        Direction::Down => entity.y += step,
        Direction::Left => entity.x -= step,
        Direction::Right => entity.x += step,
    }
    clamp_inside(entity, width, height);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Blueprint, EntityId};
    use std::f64::consts::FRAC_PI_4;

    fn robot(id: u64, x: f64, y: f64, angle: f64, speed: f64) -> Entity {
        Entity::from_blueprint(
            EntityId(id),
            Blueprint::new(Kind::predator_robot(angle, speed), x, y, 20.0),
        )
        .unwrap()
    }

    #[test]
    fn advance_follows_heading() {
        let mut e = robot(1, 100.0, 100.0, 0.0, 2.0);
        advance(&mut e, 1.0);
        assert!((e.x - 102.0).abs() < 1e-12);
        assert!((e.y - 100.0).abs() < 1e-12);
    }

    #[test]
    fn static_kinds_do_not_move() {
        let mut food =
            Entity::from_blueprint(EntityId(1), Blueprint::new(Kind::Food, 5.0, 5.0, 3.0)).unwrap();
        advance(&mut food, 1.0);
        reflect_at_bounds(&mut food, 1.0, 1.0);
        assert_eq!((food.x, food.y), (5.0, 5.0));
    }

    #[test]
    fn left_wall_reflects_and_clamps() {
        let mut e = robot(1, 15.0, 300.0, PI, 2.0);
        reflect_at_bounds(&mut e, 800.0, 600.0);
        assert!((e.motion().unwrap().angle - 0.0).abs() < 1e-12);
        assert_eq!(e.x, 20.0);
    }

    #[test]
    fn corner_reflects_both_axes() {
        let mut e = robot(1, 795.0, 595.0, FRAC_PI_4, 2.0);
        reflect_at_bounds(&mut e, 800.0, 600.0);
        let angle = e.motion().unwrap().angle;
        assert!((angle - -(PI - FRAC_PI_4)).abs() < 1e-12);
        assert_eq!((e.x, e.y), (780.0, 580.0));
    }

    #[test]
    fn overlapping_pair_ends_up_touching() {
        let a = robot(1, 100.0, 100.0, 0.0, 1.0);
        let b = robot(2, 130.0, 100.0, 0.0, 1.0);
        let (mut a2, mut b2) = (a.clone(), b.clone());
        separate_from(&mut a2, &b);
        separate_from(&mut b2, &a);
        assert!((a2.x - 95.0).abs() < 1e-12);
        assert!((b2.x - 135.0).abs() < 1e-12);
        assert!((a2.distance_to(&b2) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn coincident_centres_still_separate() {
        let a = robot(1, 100.0, 100.0, 0.0, 1.0);
        let b = robot(2, 100.0, 100.0, 0.0, 1.0);
        let (mut a2, mut b2) = (a.clone(), b.clone());
        separate_from(&mut a2, &b);
        separate_from(&mut b2, &a);
        assert!((a2.distance_to(&b2) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn player_steps_are_clamped() {
        let mut player = Entity::from_blueprint(
            EntityId(1),
            Blueprint::new(Kind::player_robot(5.0), 22.0, 300.0, 20.0),
        )
        .unwrap();
        assert!(nudge(&mut player, Direction::Left, 800.0, 600.0));
        assert_eq!(player.x, 20.0);
        assert!(nudge(&mut player, Direction::Down, 800.0, 600.0));
        assert_eq!(player.y, 305.0);

        let mut predator = robot(2, 100.0, 100.0, 0.0, 1.0);
        assert!(!nudge(&mut predator, Direction::Up, 800.0, 600.0));
        assert_eq!(predator.y, 100.0);
    }
}
