//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame timestamps are read once per frame and passed in
//! - Timing windows are deadline comparisons, never timers
//! - Stable iteration order (surfaces in stored order, clips by name)
//! - No rendering or platform dependencies

pub mod animation;
pub mod combo;
pub mod environment;
pub mod geometry;
pub mod input;
pub mod skater;
pub mod state;
pub mod tick;

pub use animation::{AnimationClip, CatalogError, ClipCatalog, Frame, SpriteAnimator};
pub use combo::{ComboListener, ComboTracker};
pub use environment::{
    Environment, LevelError, LevelManifest, LevelSegment, LevelSequence, SegmentDirection,
    SegmentEntry, Surface, SurfaceId, SurfaceKind, SurfaceRecord,
};
pub use geometry::{Corner, Rect};
pub use input::{Direction, InputSnapshot, InputTimingBuffer, Key, KeyEvent, TimingWindows};
pub use skater::{GroundingState, Skater, TrickRequest, clips};
pub use state::GameState;
pub use tick::{TickInput, tick};
