/*
 * Entity Module
 *
 * This module defines the single concrete representation for everything
 * placed in the arena: a circle with a stable id plus a closed kind tag
 * carrying only the state that kind needs.
 *
 * Kinds:
 * - Obstacle and Food are static and never move
 * - WhiskerRobot is the prey, seeking food with two short whiskers
 * - BeamSensorRobot scans a cone ahead and steers away from what it sees
 * - PredatorRobot hunts whisker robots
 * - PlayerRobot is driven by discrete move commands from outside
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};
use crate::geometry;

/// Stable identifier handed out by the arena. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Energy or health, always kept inside `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64")]
pub struct Vitality(f64);

impl Vitality {
    pub const MAX: f64 = 100.0;

    /// NaN counts as empty.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, Self::MAX))
        }
    }

    pub fn full() -> Self {
        Self(Self::MAX)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn drain(&mut self, amount: f64) {
        *self = Self::new(self.0 - amount);
    }

    pub fn restore(&mut self, amount: f64) {
        *self = Self::new(self.0 + amount);
    }

    pub fn is_depleted(self) -> bool {
        self.0 <= 0.0
    }
}

impl From<f64> for Vitality {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

/// Heading in radians and distance covered per unit of time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub angle: f64,
    pub speed: f64,
}

impl Motion {
    pub const fn new(angle: f64, speed: f64) -> Self {
        Self { angle, speed }
    }
}

/// Kind-specific state of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Kind {
    Obstacle,
    Food,
    WhiskerRobot {
        motion: Motion,
        energy: Vitality,
        whisker_length: f64,
    },
    BeamSensorRobot {
        motion: Motion,
        energy: Vitality,
        sensor_range: f64,
    },
    PredatorRobot {
        motion: Motion,
        health: Vitality,
    },
    PlayerRobot {
        step: f64,
        health: Vitality,
        score: u32,
        shield: bool,
    },
}

/// Payload-free discriminant of [`Kind`], used for dispatch and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KindTag {
    Obstacle,
    Food,
    WhiskerRobot,
    BeamSensorRobot,
    PredatorRobot,
    PlayerRobot,
}

impl KindTag {
    pub const ALL: [KindTag; 6] = [
        KindTag::Obstacle,
        KindTag::Food,
        KindTag::WhiskerRobot,
        KindTag::BeamSensorRobot,
        KindTag::PredatorRobot,
        KindTag::PlayerRobot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            KindTag::Obstacle => "Obstacle",
            KindTag::Food => "Food",
            KindTag::WhiskerRobot => "WhiskerRobot",
            KindTag::BeamSensorRobot => "BeamSensorRobot",
            KindTag::PredatorRobot => "PredatorRobot",
            KindTag::PlayerRobot => "PlayerRobot",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name() == name)
    }

    pub fn is_robot(self) -> bool {
        !matches!(self, KindTag::Obstacle | KindTag::Food)
    }

    // Radius used by the toolbar and by default setups
    pub fn default_radius(self) -> f64 {
        match self {
            KindTag::Obstacle => 30.0,
            KindTag::Food => 10.0,
            _ => 20.0,
        }
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Kind {
    pub fn whisker_robot(angle: f64, speed: f64, whisker_length: f64) -> Self {
        Kind::WhiskerRobot {
            motion: Motion::new(angle, speed),
            energy: Vitality::full(),
            whisker_length,
        }
    }

    pub fn beam_sensor_robot(angle: f64, speed: f64, sensor_range: f64, energy: f64) -> Self {
        Kind::BeamSensorRobot {
            motion: Motion::new(angle, speed),
            energy: Vitality::new(energy),
            sensor_range,
        }
    }

    pub fn predator_robot(angle: f64, speed: f64) -> Self {
        Kind::PredatorRobot {
            motion: Motion::new(angle, speed),
            health: Vitality::full(),
        }
    }

    pub fn player_robot(step: f64) -> Self {
        Kind::PlayerRobot {
            step,
            health: Vitality::full(),
            score: 0,
            shield: false,
        }
    }

    /// Kind with the stock behaviour parameters, heading `angle` where it applies.
    pub fn with_defaults(tag: KindTag, angle: f64) -> Self {
        match tag {
            KindTag::Obstacle => Kind::Obstacle,
            KindTag::Food => Kind::Food,
            KindTag::WhiskerRobot => Kind::whisker_robot(angle, 2.0, 50.0),
            KindTag::BeamSensorRobot => Kind::beam_sensor_robot(angle, 1.5, 100.0, Vitality::MAX),
            KindTag::PredatorRobot => Kind::predator_robot(angle, 1.2),
            KindTag::PlayerRobot => Kind::player_robot(5.0),
        }
    }

    pub fn tag(&self) -> KindTag {
        match self {
            Kind::Obstacle => KindTag::Obstacle,
            Kind::Food => KindTag::Food,
            Kind::WhiskerRobot { .. } => KindTag::WhiskerRobot,
            Kind::BeamSensorRobot { .. } => KindTag::BeamSensorRobot,
            Kind::PredatorRobot { .. } => KindTag::PredatorRobot,
            Kind::PlayerRobot { .. } => KindTag::PlayerRobot,
        }
    }
}

/// Everything needed to create an entity except its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub kind: Kind,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Blueprint {
    pub fn new(kind: Kind, x: f64, y: f64, radius: f64) -> Self {
        Self { kind, x, y, radius }
    }

    // Blueprint at the origin with the kind's default radius, to be positioned by placement
    pub fn unplaced(kind: Kind) -> Self {
        let radius = kind.tag().default_radius();
        Self::new(kind, 0.0, 0.0, radius)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    id: EntityId,
    pub x: f64,
    pub y: f64,
    radius: f64,
    pub kind: Kind,
}

impl Entity {
    pub(crate) fn from_blueprint(id: EntityId, blueprint: Blueprint) -> Result<Self> {
        check_radius(blueprint.radius)?;
        Ok(Self {
            id,
            x: blueprint.x,
            y: blueprint.y,
            radius: blueprint.radius,
            kind: blueprint.kind,
        })
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    // Only ever widens, so the radius stays positive
    pub fn grow(&mut self, amount: f64) {
        if amount > 0.0 {
            self.radius += amount;
        }
    }

    pub fn distance_to(&self, other: &Entity) -> f64 {
        geometry::distance(self.x, self.y, other.x, other.y)
    }

    /// The collision predicate used for consumption, placement and avoidance.
    pub fn overlaps(&self, other: &Entity) -> bool {
        geometry::circles_overlap(self.x, self.y, self.radius, other.x, other.y, other.radius)
    }

    pub fn motion(&self) -> Option<&Motion> {
        match &self.kind {
            Kind::WhiskerRobot { motion, .. }
            | Kind::BeamSensorRobot { motion, .. }
            | Kind::PredatorRobot { motion, .. } => Some(motion),
            _ => None,
        }
    }

    pub fn motion_mut(&mut self) -> Option<&mut Motion> {
        match &mut self.kind {
            Kind::WhiskerRobot { motion, .. }
            | Kind::BeamSensorRobot { motion, .. }
            | Kind::PredatorRobot { motion, .. } => Some(motion),
            _ => None,
        }
    }

    /// Energy for sensor robots, health for predators and players.
    pub fn vitality(&self) -> Option<Vitality> {
        match &self.kind {
            Kind::WhiskerRobot { energy, .. } | Kind::BeamSensorRobot { energy, .. } => Some(*energy),
            Kind::PredatorRobot { health, .. } | Kind::PlayerRobot { health, .. } => Some(*health),
            _ => None,
        }
    }

    pub fn vitality_mut(&mut self) -> Option<&mut Vitality> {
        match &mut self.kind {
            Kind::WhiskerRobot { energy, .. } | Kind::BeamSensorRobot { energy, .. } => Some(energy),
            Kind::PredatorRobot { health, .. } | Kind::PlayerRobot { health, .. } => Some(health),
            _ => None,
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.vitality().is_some_and(Vitality::is_depleted)
    }
}

pub(crate) fn check_radius(radius: f64) -> Result<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(ArenaError::InvalidRadius(radius))
    }
}
