//! Per-frame simulation step
//!
//! One call per rendered frame: the clock is read once, key events are
//! handled in arrival order, then physics and animation advance.

use serde::{Deserialize, Serialize};

use super::input::KeyEvent;
use super::state::GameState;

/// Input gathered during one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Key transitions in the order they happened
    pub events: Vec<KeyEvent>,
}

impl TickInput {
    pub fn keys(events: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

/// Advance the game by one frame of `dt` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.clock_ms += f64::from(dt);
    state.frame += 1;
    let now = state.now();

    for event in &input.events {
        state.held.apply(event);
        state.skater.handle(event, &state.held, now, &mut state.combo);
    }

    state.skater.update(dt, now, &mut state.levels, &mut state.combo);
}
