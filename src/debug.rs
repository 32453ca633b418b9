/*
 * Debug Information Module
 *
 * Counters shown in the viewer's debug overlay and control panel:
 * frame timing, tick number, population per kind and what the last tick
 * removed or spawned.
 */

use std::time::Duration;

use crate::arena::{Arena, TickReport};
use crate::entity::KindTag;

#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub tick: u64,
    pub population: Vec<(KindTag, usize)>,
    pub last_removed: usize,
    pub last_spawned: usize,
}

impl DebugInfo {
    /// Refresh the population counters, and the per-tick counters when a tick ran.
    pub fn record(&mut self, arena: &Arena, report: Option<&TickReport>) {
        self.tick = arena.ticks();
        self.population = KindTag::ALL
            .iter()
            .map(|&tag| (tag, arena.count_of(tag)))
            .collect();
        if let Some(report) = report {
            self.last_removed = report.removed.len();
            self.last_spawned = report.spawned.len();
        }
    }

    pub fn total(&self) -> usize {
        self.population.iter().map(|(_, n)| n).sum()
    }
}
