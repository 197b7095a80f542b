//! Trick combo tracking
//!
//! The skater reports tricks as their animations start and reports the end of
//! a combo when it lands, bails or wipes out. What happens with those reports
//! (the on-screen combo string, scoring) is up to the listener.

use serde::{Deserialize, Serialize};

/// Receives combo notifications from the skater.
///
/// Implementations must not call back into the skater.
pub trait ComboListener {
    /// A display-worthy trick animation just started
    fn on_trick_performed(&mut self, name: &str);

    /// The running combo is over
    fn on_combo_ended(&mut self);
}

/// Separator between tricks in the combo string
pub const COMBO_SEPARATOR: &str = " + ";

/// Builds the running combo string shown on screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboTracker {
    tricks: Vec<String>,
    /// Longest finished combo so far
    best: Vec<String>,
    /// Last finished combo
    last: Vec<String>,
}

impl ComboTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// "kickflip + 5-0 + heelflip"
    pub fn text(&self) -> String {
        self.tricks.join(COMBO_SEPARATOR)
    }

    pub fn is_active(&self) -> bool {
        !self.tricks.is_empty()
    }

    pub fn trick_count(&self) -> usize {
        self.tricks.len()
    }

    pub fn best(&self) -> String {
        self.best.join(COMBO_SEPARATOR)
    }

    pub fn last(&self) -> String {
        self.last.join(COMBO_SEPARATOR)
    }
}

impl ComboListener for ComboTracker {
    fn on_trick_performed(&mut self, name: &str) {
        self.tricks.push(name.to_string());
        log::debug!("Combo: {}", self.text());
    }

    fn on_combo_ended(&mut self) {
        if self.tricks.is_empty() {
            return;
        }
        let finished = std::mem::take(&mut self.tricks);
        log::info!("Combo landed: {} ({} tricks)", finished.join(COMBO_SEPARATOR), finished.len());
        if finished.len() > self.best.len() {
            self.best = finished.clone();
        }
        self.last = finished;
    }
}
