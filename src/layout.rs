/*
 * Layout Module
 *
 * Plain-text arena layouts, one entity per line:
 *
 *     Kind,x,y,radius
 *
 * Only kind, position and size are stored. Loading rebuilds every entity
 * with its kind's stock behaviour parameters. Malformed lines and unknown
 * kinds are skipped, never fatal.
 *
 * Also provides the default starting arena, picked up from
 * `arena_layout.txt` when that file exists.
 */

use std::f64::consts::{FRAC_PI_3, FRAC_PI_4};
use std::path::Path;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::arena::Arena;
use crate::entity::{Blueprint, Kind, KindTag};
use crate::error::Result;
use crate::params::SimulationParams;
use crate::spawn::place_non_overlapping;

/// Layout file used when none is named explicitly.
pub const DEFAULT_LAYOUT_PATH: &str = "arena_layout.txt";

/// Heading given to every robot rebuilt from a layout file.
pub const LOADED_HEADING: f64 = FRAC_PI_4;

/// Outcome of a layout load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub malformed: usize,
    pub unknown: usize,
}

#[derive(Debug, PartialEq)]
enum ParsedLine {
    Entity(Blueprint),
    Unknown,
    Malformed,
}

fn parse_line(line: &str) -> ParsedLine {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    let [tag, x, y, radius] = parts.as_slice() else {
        return ParsedLine::Malformed;
    };

    let (Ok(x), Ok(y), Ok(radius)) = (x.parse::<f64>(), y.parse::<f64>(), radius.parse::<f64>())
    else {
        return ParsedLine::Malformed;
    };
    if !(x.is_finite() && y.is_finite() && radius.is_finite() && radius > 0.0) {
        return ParsedLine::Malformed;
    }

    match KindTag::from_name(tag) {
        Some(tag) => ParsedLine::Entity(Blueprint::new(
            Kind::with_defaults(tag, LOADED_HEADING),
            x,
            y,
            radius,
        )),
        None => ParsedLine::Unknown,
    }
}

/// Serialise every alive entity as `Kind,x,y,radius`, one per line.
pub fn save_layout(arena: &Arena) -> String {
    let mut out = String::new();
    for entity in arena.entities() {
        out.push_str(&format!(
            "{},{},{},{}\n",
            entity.tag(),
            entity.x,
            entity.y,
            entity.radius()
        ));
    }
    out
}

/// Build a fresh arena from layout text.
pub fn load_layout(text: &str, params: &SimulationParams) -> Result<(Arena, LoadReport)> {
    let mut arena = Arena::from_params(params)?;
    let mut report = LoadReport::default();

    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            ParsedLine::Entity(blueprint) => {
                arena.add(blueprint)?;
                report.loaded += 1;
            }
            ParsedLine::Unknown => {
                debug!(line = number + 1, "ignoring unknown kind");
                report.unknown += 1;
            }
            ParsedLine::Malformed => {
                warn!(line = number + 1, content = line, "skipping malformed layout line");
                report.malformed += 1;
            }
        }
    }

    info!(
        loaded = report.loaded,
        malformed = report.malformed,
        unknown = report.unknown,
        "layout loaded"
    );
    Ok((arena, report))
}

pub fn save_layout_file(arena: &Arena, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, save_layout(arena))?;
    info!(path = %path.display(), entities = arena.len(), "layout saved");
    Ok(())
}

pub fn load_layout_file(
    path: impl AsRef<Path>,
    params: &SimulationParams,
) -> Result<(Arena, LoadReport)> {
    let text = std::fs::read_to_string(path)?;
    load_layout(&text, params)
}

/// The starting arena: two prey robots and one obstacle, placed without overlap.
pub fn default_arena<R: Rng + ?Sized>(params: &SimulationParams, rng: &mut R) -> Result<Arena> {
    let mut arena = Arena::from_params(params)?;
    populate_default(&mut arena, params, rng)?;
    Ok(arena)
}

/// Arena to open with: `explicit` if given, else `fallback` when that file
/// exists, else the default population.
pub fn starting_arena<R: Rng + ?Sized>(
    explicit: Option<&Path>,
    fallback: &Path,
    params: &SimulationParams,
    rng: &mut R,
) -> Result<Arena> {
    let path = match explicit {
        Some(path) => path,
        None if fallback.is_file() => fallback,
        None => return default_arena(params, rng),
    };
    let (arena, report) = load_layout_file(path, params)?;
    info!(path = %path.display(), loaded = report.loaded, "starting from layout");
    Ok(arena)
}

/// Add the starting population to an existing arena.
pub fn populate_default<R: Rng + ?Sized>(
    arena: &mut Arena,
    params: &SimulationParams,
    rng: &mut R,
) -> Result<()> {
    let starters = [
        Blueprint::unplaced(Kind::whisker_robot(FRAC_PI_4, 2.0, 50.0)),
        Blueprint::unplaced(Kind::whisker_robot(FRAC_PI_3, 1.8, 50.0)),
        Blueprint::unplaced(Kind::Obstacle),
    ];
    for blueprint in starters {
        place_non_overlapping(arena, blueprint, rng, params.placement_attempts)?;
    }
    Ok(())
}
