//! Game state: everything one running session owns

use std::sync::Arc;

use super::animation::{CatalogError, ClipCatalog};
use super::combo::ComboTracker;
use super::environment::LevelSequence;
use super::input::InputSnapshot;
use super::skater::Skater;
use crate::Millis;
use crate::settings::SkaterTuning;

/// Complete session state (deterministic given the same inputs and frame times)
#[derive(Debug, Clone)]
pub struct GameState {
    /// The player
    pub skater: Skater,
    /// Level segments, one active
    pub levels: LevelSequence,
    /// Running trick combo
    pub combo: ComboTracker,
    /// Directions currently held, rebuilt from key events
    pub held: InputSnapshot,
    /// Session clock (ms)
    pub clock_ms: f64,
    /// Frames simulated so far
    pub frame: u64,
}

impl GameState {
    /// Spawn a skater into the first level segment
    pub fn new(
        catalog: Arc<ClipCatalog>,
        levels: LevelSequence,
        tuning: SkaterTuning,
    ) -> Result<Self, CatalogError> {
        log::info!(
            "New session: segment '{}' of {}",
            levels.current().name,
            levels.len()
        );
        Ok(Self {
            skater: Skater::new(catalog, tuning)?,
            levels,
            combo: ComboTracker::new(),
            held: InputSnapshot::default(),
            clock_ms: 0.0,
            frame: 0,
        })
    }

    /// Frame timestamp used for every timing comparison in the current frame
    pub fn now(&self) -> Millis {
        self.clock_ms as Millis
    }
}
