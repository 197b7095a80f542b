//! Gnar Skata - a side-scrolling skateboarding game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (skater physics, collisions, trick timing, animation)
//! - `settings`: Data-driven tuning and asset paths
//! - `demo`: Built-in catalog, level and input script for headless runs

pub mod demo;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError, SkaterTuning};

/// Game configuration constants
///
/// Time is measured in milliseconds and distance in pixels throughout the sim,
/// so velocities are px/ms and accelerations px/ms².
pub mod consts {
    /// Screen / level segment size
    pub const SCREEN_WIDTH: f32 = 960.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Target frame time for the headless loop (60 Hz)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;

    /// Downward acceleration while airborne
    pub const GRAVITY: f32 = 0.0025;
    /// Horizontal velocity change per grounded left/right press
    pub const PUSH_DELTA: f32 = 0.1;
    /// Upward velocity applied by an ollie
    pub const OLLIE_IMPULSE: f32 = 1.0;
    /// Horizontal speed clamp applied on respawn after leaving the level
    pub const RESPAWN_MAX_SPEED: f32 = 10.0;

    /// How long after a trick key a direction still selects the trick
    pub const FLIP_LOOK_AHEAD_MS: u64 = 120;
    /// How long before a trick key a direction still selects the trick
    pub const FLIP_LOOK_BACK_MS: u64 = 60;
    /// How long a grind request waits for a ledge to show up
    pub const GRIND_LOOK_AHEAD_MS: u64 = 120;

    /// Depth of the probe below the skater used to find ledges
    pub const LEDGE_PROBE_DEPTH: f32 = 4.0;
}

/// Timestamp in milliseconds from the frame clock
pub type Millis = u64;
