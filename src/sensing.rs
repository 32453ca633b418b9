/*
 * Sensing Module
 *
 * Geometric sensing primitives used by the behavior rules. All of them read
 * a frozen slice of entities and never mutate anything:
 * - nearest entity matching a predicate (linear scan)
 * - first entity inside a range + half-angle cone ahead
 * - whisker contact via points sampled along a short ray
 * - beam crossing one of the four arena walls
 *
 * Ties for "nearest" go to the entity met first in scan order. Reordering
 * the slice can therefore change which of two exactly equidistant targets
 * is picked.
 */

use crate::entity::Entity;
use crate::geometry::{self, Point};

/// Closest entity other than `me` that satisfies `predicate`.
pub fn nearest_of_kind<'a, P>(me: &Entity, others: &'a [Entity], predicate: P) -> Option<&'a Entity>
where
    P: Fn(&Entity) -> bool,
{
    let mut nearest: Option<(&Entity, f64)> = None;

    for other in others {
        if other.id() == me.id() || !predicate(other) {
            continue;
        }
        let d = me.distance_to(other);
        match nearest {
            Some((_, best)) if d >= best => {}
            _ => nearest = Some((other, d)),
        }
    }

    nearest.map(|(entity, _)| entity)
}

/// First entity (scan order) other than `me` within `range` whose bearing
/// differs from `me`'s heading by less than `half_angle`.
///
/// Entities without a heading see nothing.
pub fn detect_in_cone<'a, P>(
    me: &Entity,
    others: &'a [Entity],
    range: f64,
    half_angle: f64,
    predicate: P,
) -> Option<&'a Entity>
where
    P: Fn(&Entity) -> bool,
{
    let heading = me.motion()?.angle;

    others.iter().find(|other| {
        if other.id() == me.id() || !predicate(other) {
            return false;
        }
        if me.distance_to(other) > range {
            return false;
        }
        let to_other = geometry::bearing(me.x, me.y, other.x, other.y);
        geometry::angle_difference(to_other, heading) < half_angle
    })
}

/// Geometry of one whisker relative to its owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhiskerRay {
    pub angle_offset: f64,
    pub length: f64,
    pub sample_step: f64,
    pub margin: f64,
}

impl WhiskerRay {
    // Sample points from one step out to the tip; the tip is always included
    fn sample_points(&self, origin: Point, heading: f64) -> impl Iterator<Item = Point> {
        let direction = heading + self.angle_offset;
        let (sin, cos) = direction.sin_cos();
        let step = self.sample_step;
        let length = self.length;
        let count = if step > 0.0 && length > 0.0 {
            (length / step).ceil() as usize
        } else {
            0
        };

        (1..=count).map(move |i| {
            let d = (i as f64 * step).min(length);
            Point::new(origin.x + d * cos, origin.y + d * sin)
        })
    }
}

/// Whether the whisker touches an obstruction or comes within `margin` of a wall.
///
/// A sampled point touches another entity when it lies within that entity's
/// radius plus the margin. Only entities accepted by `obstructs` count.
pub fn whisker_touching<P>(
    me: &Entity,
    others: &[Entity],
    ray: &WhiskerRay,
    width: f64,
    height: f64,
    obstructs: P,
) -> bool
where
    P: Fn(&Entity) -> bool,
{
    let Some(motion) = me.motion() else {
        return false;
    };
    let margin = ray.margin;

    ray.sample_points(Point::new(me.x, me.y), motion.angle).any(|p| {
        let near_wall = p.x < margin || p.y < margin || p.x > width - margin || p.y > height - margin;
        near_wall
            || others.iter().any(|other| {
                other.id() != me.id()
                    && obstructs(other)
                    && geometry::distance(p.x, p.y, other.x, other.y) < other.radius() + margin
            })
    })
}

/// Whether a beam of length `range` along `me`'s heading crosses an arena wall.
pub fn beam_hits_wall(me: &Entity, range: f64, width: f64, height: f64) -> bool {
    let Some(motion) = me.motion() else {
        return false;
    };

    let start = Point::new(me.x, me.y);
    let end = Point::new(me.x + range * motion.angle.cos(), me.y + range * motion.angle.sin());

    let top_left = Point::new(0.0, 0.0);
    let top_right = Point::new(width, 0.0);
    let bottom_left = Point::new(0.0, height);
    let bottom_right = Point::new(width, height);

    let walls = [
        (top_left, top_right),
        (top_left, bottom_left),
        (top_right, bottom_right),
        (bottom_left, bottom_right),
    ];

    walls
        .iter()
        .any(|&(a, b)| geometry::segments_intersect(start, end, a, b))
}
