//! The skater: movement, collision response and the trick state machine
//!
//! Each frame the game loop feeds key-down events through [`Skater::handle`]
//! and then calls [`Skater::update`] once. Physics runs in screen space with
//! times in milliseconds. Surfaces are never owned here: the skater holds
//! [`SurfaceId`] handles and re-resolves them through the [`Environment`].

use std::sync::Arc;

use glam::Vec2;

use super::animation::{CatalogError, ClipCatalog, SpriteAnimator};
use super::combo::ComboListener;
use super::environment::{Environment, SegmentDirection, Surface, SurfaceId, SurfaceKind};
use super::geometry::Rect;
use super::input::{Direction, InputSnapshot, InputTimingBuffer, Key, KeyEvent};
use crate::Millis;
use crate::settings::SkaterTuning;

/// Clip names the skater plays
pub mod clips {
    pub const RIDING: &str = "riding";
    pub const FALLING: &str = "falling";
    pub const FLOAT: &str = "float";
    pub const OLLIE: &str = "ollie";
    pub const KICKFLIP: &str = "kickflip";
    pub const HEELFLIP: &str = "heelflip";
    pub const NOSEGRIND: &str = "nosegrind";
    pub const FIVE_O: &str = "5-0";
    pub const DED: &str = "ded";

    /// Every clip the controller can request directly
    pub const REQUIRED: [&str; 8] = [
        RIDING, FALLING, FLOAT, OLLIE, KICKFLIP, HEELFLIP, NOSEGRIND, FIVE_O,
    ];

    /// Starting one of these ends the running combo
    pub const COMBO_ENDING: [&str; 3] = [RIDING, FALLING, DED];
}

/// What is holding the skater up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundingState {
    Airborne,
    /// Riding on pavement
    Grounded(SurfaceId),
    /// Sliding along a ledge
    Grinding(SurfaceId),
}

impl GroundingState {
    /// Surface underneath, if any
    pub fn surface(&self) -> Option<SurfaceId> {
        match *self {
            GroundingState::Airborne => None,
            GroundingState::Grounded(id) | GroundingState::Grinding(id) => Some(id),
        }
    }
}

/// A trick waiting for the player to pick a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrickRequest {
    Flip,
    Grind,
}

impl TrickRequest {
    /// Clip to play for the chosen direction
    pub fn resolve(self, direction: Direction) -> Option<&'static str> {
        match (self, direction) {
            (TrickRequest::Flip, Direction::Left) => Some(clips::KICKFLIP),
            (TrickRequest::Flip, Direction::Right) => Some(clips::HEELFLIP),
            (TrickRequest::Flip, _) => None,
            (TrickRequest::Grind, direction) => Some(grind_clip(Some(direction))),
        }
    }
}

/// Grind chosen by the latest direction: right for a nosegrind, 5-0 otherwise
fn grind_clip(direction: Option<Direction>) -> &'static str {
    match direction {
        Some(Direction::Right) => clips::NOSEGRIND,
        _ => clips::FIVE_O,
    }
}

/// Level edge the skater left through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Left,
    Right,
    Bottom,
}

impl Edge {
    fn segment_direction(self) -> Option<SegmentDirection> {
        match self {
            Edge::Right => Some(SegmentDirection::Next),
            Edge::Left => Some(SegmentDirection::Previous),
            Edge::Bottom => None,
        }
    }
}

/// The player character
#[derive(Debug, Clone)]
pub struct Skater {
    tuning: SkaterTuning,
    /// Bounding box; its top-left corner is the skater's position
    rect: Rect,
    /// px/ms
    velocity: Vec2,
    grounding: GroundingState,
    animator: SpriteAnimator,
    timing: InputTimingBuffer<TrickRequest>,
    /// Ledge found under the skater on the last update
    ledge: Option<Surface>,
    /// A grind was asked for with no ledge around; honour it until this time
    grind_deadline: Option<Millis>,
}

impl Skater {
    /// Spawn a falling skater at the origin.
    ///
    /// Fails if the catalog lacks a clip the controller plays.
    pub fn new(catalog: Arc<ClipCatalog>, tuning: SkaterTuning) -> Result<Self, CatalogError> {
        catalog.require(clips::REQUIRED)?;
        let size = Vec2::new(catalog.width as f32, catalog.height as f32);
        Ok(Self {
            tuning,
            rect: Rect::from_size(size),
            velocity: Vec2::ZERO,
            grounding: GroundingState::Airborne,
            animator: SpriteAnimator::new(catalog),
            timing: InputTimingBuffer::new(),
            ledge: None,
            grind_deadline: None,
        })
    }

    pub fn bounds_rect(&self) -> Rect {
        self.rect
    }

    pub fn position(&self) -> Vec2 {
        self.rect.top_left()
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.rect.set_top_left(pos);
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn grounding(&self) -> GroundingState {
        self.grounding
    }

    pub fn is_airborne(&self) -> bool {
        self.grounding == GroundingState::Airborne
    }

    pub fn tuning(&self) -> &SkaterTuning {
        &self.tuning
    }

    /// Name of the clip currently playing
    pub fn clip_name(&self) -> &str {
        self.animator.clip_name()
    }

    /// Sheet rectangle to draw this frame
    pub fn current_frame(&self) -> Rect {
        self.animator.current_frame()
    }

    pub fn animator(&self) -> &SpriteAnimator {
        &self.animator
    }

    /// Mark the current frame as drawn
    pub fn clear_dirty(&mut self) {
        self.animator.clear_dirty();
    }

    /// Advance physics and animation by `dt` milliseconds
    pub fn update(
        &mut self,
        dt: f32,
        now: Millis,
        env: &mut dyn Environment,
        combo: &mut dyn ComboListener,
    ) {
        if self.is_airborne() {
            self.velocity.y += self.tuning.gravity * dt;
        }
        self.rect.translate(self.velocity * dt);

        if let Some(edge) = self.exited_edge(&env.bounds()) {
            self.respawn(combo);
            if let Some(direction) = edge.segment_direction() {
                env.advance_to_adjacent_segment(direction);
            }
            return;
        }

        match env.surface_at(&self.rect) {
            Some(surface) => match surface.kind {
                SurfaceKind::Hazard => self.animate(clips::FALLING, combo),
                // Ledges only matter through the grind request
                SurfaceKind::Ledge => {}
                SurfaceKind::Pavement => {
                    if !matches!(self.grounding, GroundingState::Grinding(_)) {
                        self.land(&surface);
                        self.animate(clips::RIDING, combo);
                    }
                }
            },
            None => self.check_roll_off(dt, env, combo),
        }

        self.track_ledge(now, env, combo);
        self.animator.advance(dt);
    }

    /// React to one key event. Only key-down events do anything.
    pub fn handle(
        &mut self,
        event: &KeyEvent,
        held: &InputSnapshot,
        now: Millis,
        combo: &mut dyn ComboListener,
    ) {
        if !event.pressed {
            return;
        }

        if let Some(direction) = event.key.direction() {
            if let Some((request, chosen)) = self.timing.record_direction(direction, now) {
                self.perform(request, chosen, combo);
            }
            if matches!(self.grounding, GroundingState::Grounded(_)) {
                match direction {
                    Direction::Left => self.velocity.x -= self.tuning.push_delta,
                    Direction::Right => self.velocity.x += self.tuning.push_delta,
                    Direction::Up | Direction::Down => {}
                }
            }
            return;
        }

        match event.key {
            Key::Jump if !self.is_airborne() => self.ollie(combo),
            Key::Flip => self.request_flip(held, now, combo),
            Key::Grind => self.request_grind(held, now, combo),
            _ => {}
        }
    }

    fn exited_edge(&self, bounds: &Rect) -> Option<Edge> {
        if self.rect.x > bounds.right() {
            Some(Edge::Right)
        } else if self.rect.x < bounds.left() - self.rect.w {
            Some(Edge::Left)
        } else if self.rect.y > bounds.bottom() {
            Some(Edge::Bottom)
        } else {
            None
        }
    }

    /// Put the skater back at the origin after leaving the level
    fn respawn(&mut self, combo: &mut dyn ComboListener) {
        log::debug!("Skater left the level at {:?}, respawning", self.rect.top_left());
        self.rect.set_top_left(Vec2::ZERO);
        let limit = self.tuning.respawn_max_speed;
        self.velocity.x = self.velocity.x.clamp(-limit, limit);
        self.velocity.y = 0.0;
        self.depart();
        self.ledge = None;
        self.grind_deadline = None;
        self.animate(clips::FLOAT, combo);
    }

    /// Stop falling and sit on top of `surface`. Ground is assumed flat.
    fn land(&mut self, surface: &Surface) {
        if self.grounding != GroundingState::Grounded(surface.id) {
            log::debug!("Landed on {:?} at {:?}", surface.id, surface.rect.top_left());
        }
        self.grounding = GroundingState::Grounded(surface.id);
        self.velocity.y = 0.0;
        self.rect.y = surface.rect.top() - self.rect.h;
        // A flip still waiting for its direction is lost on landing
        self.timing.cancel_pending();
    }

    fn land_on_ledge(&mut self, ledge: &Surface) {
        log::debug!("Grinding {:?}", ledge.id);
        self.grounding = GroundingState::Grinding(ledge.id);
        self.velocity.y = 0.0;
        self.rect.y = ledge.rect.top() - self.rect.h;
    }

    fn depart(&mut self) {
        if !self.is_airborne() {
            log::debug!("Airborne from {:?}", self.grounding);
        }
        // A grind still waiting for its direction ends with the grind
        if matches!(self.grounding, GroundingState::Grinding(_)) {
            self.timing.cancel_pending();
        }
        self.grounding = GroundingState::Airborne;
    }

    /// Nothing overlaps us; see whether the surface we stood on is still under the wheels
    fn check_roll_off(&mut self, dt: f32, env: &dyn Environment, combo: &mut dyn ComboListener) {
        let Some(id) = self.grounding.surface() else {
            return;
        };
        let probe = self.tuning.gravity * dt;
        let supported = env
            .surface(id)
            .is_some_and(|s| s.rect.clips_vertical_segment(self.rect.midbottom(), probe));
        if !supported {
            let was_grinding = matches!(self.grounding, GroundingState::Grinding(_));
            self.depart();
            if was_grinding {
                self.animate(clips::FLOAT, combo);
            }
        }
    }

    /// Notice ledges coming into reach and start an armed grind on them
    fn track_ledge(&mut self, now: Millis, env: &dyn Environment, combo: &mut dyn ComboListener) {
        let probe = self.rect.grow_down(self.tuning.ledge_probe_depth);
        let ledge = env.ledge_at(&probe);

        if self.grind_deadline.is_some_and(|deadline| now > deadline) {
            self.grind_deadline = None;
        }

        let armed = self.grind_deadline.is_some();
        match ledge {
            Some(found) if self.ledge.is_none() && self.is_airborne() && armed => {
                self.grind_deadline = None;
                self.land_on_ledge(&found);
                let direction = self.timing.last_direction().map(|(d, _)| d);
                self.animate(grind_clip(direction), combo);
            }
            _ => {}
        }
        self.ledge = ledge;
    }

    fn ollie(&mut self, combo: &mut dyn ComboListener) {
        self.velocity.y = -self.tuning.ollie_impulse;
        self.depart();
        self.animate(clips::OLLIE, combo);
    }

    fn request_flip(&mut self, held: &InputSnapshot, now: Millis, combo: &mut dyn ComboListener) {
        if self.is_airborne() {
            let clip = self.animator.clip_name();
            if clip != clips::OLLIE && clip != clips::FLOAT {
                log::trace!("Flip ignored during {}", clip);
                return;
            }
        } else {
            self.ollie(combo);
        }

        let windows = self.tuning.flip_windows;
        if let Some((request, direction)) =
            self.timing.request_latent_action(TrickRequest::Flip, held, now, windows)
        {
            self.perform(request, direction, combo);
        }
    }

    fn request_grind(&mut self, held: &InputSnapshot, now: Millis, combo: &mut dyn ComboListener) {
        let Some(ledge) = self.ledge else {
            self.grind_deadline = Some(now + self.tuning.grind_look_ahead_ms);
            return;
        };

        self.grind_deadline = None;
        self.land_on_ledge(&ledge);
        let windows = self.tuning.grind_windows();
        if let Some((request, direction)) =
            self.timing.request_latent_action(TrickRequest::Grind, held, now, windows)
        {
            self.perform(request, direction, combo);
        }
    }

    fn perform(
        &mut self,
        request: TrickRequest,
        direction: Direction,
        combo: &mut dyn ComboListener,
    ) {
        if let Some(clip) = request.resolve(direction) {
            self.animate(clip, combo);
        }
    }

    /// Play `name` and tell the combo listener about it if the clip changed
    fn animate(&mut self, name: &str, combo: &mut dyn ComboListener) {
        if !self.animator.play(name) {
            return;
        }
        if self.animator.catalog().clip(name).display {
            combo.on_trick_performed(name);
        } else if clips::COMBO_ENDING.contains(&name) {
            combo.on_combo_ended();
        }
    }
}
