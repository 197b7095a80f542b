//! Key events and trick timing
//!
//! Players rarely hit a trick key and a direction on the exact same frame.
//! The [`InputTimingBuffer`] remembers the last direction pressed (look-back)
//! and can park a trick request until a direction arrives (look-ahead). Both
//! windows are plain deadline comparisons against frame timestamps; nothing is
//! scheduled and stale requests are dropped the next time they are checked.

use serde::{Deserialize, Serialize};

use crate::Millis;

/// A directional input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Keys the skater responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Ollie
    Jump,
    /// Flip trick trigger
    Flip,
    /// Grind trigger
    Grind,
    /// Anything else; ignored by the skater
    Other,
}

impl Key {
    /// The direction this key stands for, if it is a directional key
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

/// A single key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    /// `true` for key-down, `false` for key-up
    pub pressed: bool,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self { key, pressed: true }
    }

    pub fn up(key: Key) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

/// Which directions are physically held right now
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputSnapshot {
    /// Snapshot with a single direction held
    pub fn holding(direction: Direction) -> Self {
        let mut snapshot = Self::default();
        snapshot.set(direction, true);
        snapshot
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    /// Track a key event (non-directional keys are ignored)
    pub fn apply(&mut self, event: &KeyEvent) {
        if let Some(direction) = event.key.direction() {
            self.set(direction, event.pressed);
        }
    }

    /// Held left or right. With both down, `latest` breaks the tie, then left.
    pub fn held_horizontal(&self, latest: Option<Direction>) -> Option<Direction> {
        match latest {
            Some(d @ (Direction::Left | Direction::Right)) if self.is_held(d) => Some(d),
            _ => [Direction::Left, Direction::Right]
                .into_iter()
                .find(|&d| self.is_held(d)),
        }
    }
}

/// Look-ahead and look-back windows for one kind of trick request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingWindows {
    pub look_ahead_ms: Millis,
    pub look_back_ms: Millis,
}

/// A parked request waiting for a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LatentAction<A> {
    action: A,
    deadline: Millis,
}

/// Last-direction memory plus at most one pending latent action.
///
/// Instead of calling back into the owner, resolution hands the action and
/// the direction that satisfied it back to the caller.
#[derive(Debug, Clone)]
pub struct InputTimingBuffer<A> {
    last_direction: Option<(Direction, Millis)>,
    pending: Option<LatentAction<A>>,
}

impl<A> Default for InputTimingBuffer<A> {
    fn default() -> Self {
        Self {
            last_direction: None,
            pending: None,
        }
    }
}

impl<A: Copy> InputTimingBuffer<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent direction and when it was pressed
    pub fn last_direction(&self) -> Option<(Direction, Millis)> {
        self.last_direction
    }

    /// Remember `direction` as the latest press.
    ///
    /// A pending action whose deadline has not passed is consumed and returned
    /// with this direction; an expired one is dropped.
    pub fn record_direction(
        &mut self,
        direction: Direction,
        now: Millis,
    ) -> Option<(A, Direction)> {
        self.last_direction = Some((direction, now));

        let pending = self.pending.take()?;
        if now <= pending.deadline {
            log::trace!("latent action satisfied by {:?} at {}", direction, now);
            Some((pending.action, direction))
        } else {
            log::trace!("latent action expired at {} (deadline {})", now, pending.deadline);
            None
        }
    }

    /// Whether `direction` was the last press and happened less than
    /// `look_back_ms` before `now`
    pub fn is_direction_recent(
        &self,
        direction: Direction,
        now: Millis,
        look_back_ms: Millis,
    ) -> bool {
        match self.last_direction {
            Some((last, at)) => last == direction && now.saturating_sub(at) < look_back_ms,
            None => false,
        }
    }

    /// Ask for `action` to run with the player's chosen horizontal direction.
    ///
    /// Resolves immediately when left/right is held, or was pressed within the
    /// look-back window. Otherwise the action is parked until
    /// `now + look_ahead_ms`, replacing any action already waiting.
    pub fn request_latent_action(
        &mut self,
        action: A,
        held: &InputSnapshot,
        now: Millis,
        windows: TimingWindows,
    ) -> Option<(A, Direction)> {
        self.pending = None;

        let latest = self.last_direction.map(|(d, _)| d);
        if let Some(direction) = held.held_horizontal(latest) {
            return Some((action, direction));
        }

        let recent = [Direction::Left, Direction::Right]
            .into_iter()
            .find(|&d| self.is_direction_recent(d, now, windows.look_back_ms));
        if let Some(direction) = recent {
            log::trace!("latent action satisfied by earlier {:?}", direction);
            return Some((action, direction));
        }

        self.pending = Some(LatentAction {
            action,
            deadline: now + windows.look_ahead_ms,
        });
        None
    }

    /// Whether an action is waiting (expired ones still count until checked)
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any waiting action
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOWS: TimingWindows = TimingWindows {
        look_ahead_ms: 120,
        look_back_ms: 60,
    };

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Flip;

    #[test]
    fn test_held_direction_resolves_immediately() {
        let mut buffer = InputTimingBuffer::new();
        let held = InputSnapshot::holding(Direction::Right);
        assert_eq!(
            buffer.request_latent_action(Flip, &held, 1000, WINDOWS),
            Some((Flip, Direction::Right))
        );
        assert!(!buffer.has_pending());
    }

    #[test]
    fn test_look_back() {
        let mut buffer = InputTimingBuffer::new();
        assert_eq!(buffer.record_direction(Direction::Right, 1000), None);

        let none = InputSnapshot::default();
        assert_eq!(
            buffer.request_latent_action(Flip, &none, 1000 + 59, WINDOWS),
            Some((Flip, Direction::Right))
        );

        // Exactly at the window edge is too late
        assert_eq!(buffer.request_latent_action(Flip, &none, 1000 + 60, WINDOWS), None);
        assert!(buffer.has_pending());
    }

    #[test]
    fn test_look_ahead_fires_once() {
        let mut buffer = InputTimingBuffer::new();
        let none = InputSnapshot::default();
        assert_eq!(buffer.request_latent_action(Flip, &none, 500, WINDOWS), None);

        assert_eq!(buffer.record_direction(Direction::Left, 620), Some((Flip, Direction::Left)));
        assert_eq!(buffer.record_direction(Direction::Left, 630), None);
    }

    #[test]
    fn test_look_ahead_expires_silently() {
        let mut buffer = InputTimingBuffer::new();
        let none = InputSnapshot::default();
        buffer.request_latent_action(Flip, &none, 500, WINDOWS);
        assert_eq!(buffer.record_direction(Direction::Left, 621), None);
        assert!(!buffer.has_pending());
    }

    #[test]
    fn test_new_request_replaces_pending() {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Trick {
            Flip,
            Grind,
        }

        let mut buffer = InputTimingBuffer::new();
        let none = InputSnapshot::default();
        buffer.request_latent_action(Trick::Flip, &none, 0, WINDOWS);
        buffer.request_latent_action(Trick::Grind, &none, 10, WINDOWS);
        assert_eq!(
            buffer.record_direction(Direction::Up, 20),
            Some((Trick::Grind, Direction::Up))
        );
    }

    #[test]
    fn test_both_held_prefers_latest_press() {
        let mut buffer = InputTimingBuffer::new();
        let mut held = InputSnapshot::holding(Direction::Left);
        held.set(Direction::Right, true);

        buffer.record_direction(Direction::Left, 0);
        buffer.record_direction(Direction::Right, 10);
        assert_eq!(
            buffer.request_latent_action(Flip, &held, 20, WINDOWS),
            Some((Flip, Direction::Right))
        );

        // Last press was vertical: left wins
        buffer.record_direction(Direction::Up, 30);
        assert_eq!(held.held_horizontal(Some(Direction::Up)), Some(Direction::Left));
        assert_eq!(
            buffer.request_latent_action(Flip, &held, 40, WINDOWS),
            Some((Flip, Direction::Left))
        );
    }

    #[test]
    fn test_snapshot_tracks_events() {
        let mut held = InputSnapshot::default();
        held.apply(&KeyEvent::down(Key::Left));
        held.apply(&KeyEvent::down(Key::Flip));
        assert_eq!(held.held_horizontal(None), Some(Direction::Left));
        held.apply(&KeyEvent::up(Key::Left));
        assert_eq!(held.held_horizontal(None), None);
        assert_eq!(held, InputSnapshot::default());
    }
}
