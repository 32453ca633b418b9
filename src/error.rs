/*
 * Error Module
 *
 * Errors surfaced by the arena, placement, parameter loading and
 * layout persistence.
 */

use thiserror::Error;

use crate::entity::EntityId;

/// Errors that can occur while building or driving an arena.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// Entities must have a strictly positive, finite radius.
    #[error("invalid radius {0}: radius must be finite and greater than zero")]
    InvalidRadius(f64),
    /// A parameter value is outside its allowed range.
    #[error("invalid parameters: {0}")]
    InvalidParams(&'static str),
    /// Rejection sampling gave up before finding a free position.
    #[error("no free position found after {attempts} attempts")]
    PlacementFailed { attempts: u32 },
    /// No alive entity carries this id.
    #[error("no alive entity with id {0}")]
    UnknownEntity(EntityId),
    /// The entity exists but is not player controlled.
    #[error("entity {0} is not a player robot")]
    NotAPlayer(EntityId),
    /// Reading or writing a layout or parameter file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// A parameter file could not be parsed.
    #[error("malformed parameter file: {0}")]
    Params(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
