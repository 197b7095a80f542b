//! Sprite-sheet animation
//!
//! A character's animations are packed into a single sheet image. The catalog
//! JSON describes each named clip as a list of timed source rectangles; the
//! [`SpriteAnimator`] picks which rectangle is visible at any moment.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Rect;

/// Errors raised while loading or validating a clip catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog start clip '{0}' is not defined")]
    MissingStart(String),

    #[error("clip '{0}' is required but not defined")]
    MissingClip(String),

    #[error("clip '{0}' has no frames")]
    EmptyClip(String),

    #[error("clip '{clip}' frame {frame} has invalid duration {duration}")]
    InvalidDuration { clip: String, frame: usize, duration: f32 },

    #[error("clip '{clip}' continues into undefined clip '{next}'")]
    UnknownNext { clip: String, next: String },

    #[error("looping clip '{0}' has zero total duration")]
    ZeroLengthLoop(String),
}

/// One frame of a clip: where it lives on the sheet and how long it shows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(flatten)]
    pub rect: Rect,
    /// Display time in milliseconds
    #[serde(rename = "t")]
    pub duration_ms: f32,
}

/// A named sequence of frames
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Filled in from the catalog key
    #[serde(skip)]
    pub name: String,
    pub frames: Vec<Frame>,
    #[serde(default)]
    pub looping: bool,
    /// Clip to continue with once a one-shot clip finishes (catalog start if unset)
    #[serde(default)]
    pub next: Option<String>,
    /// Whether starting this clip counts as a trick for the combo display
    #[serde(default)]
    pub display: bool,
}

impl AnimationClip {
    /// Sum of all frame durations
    pub fn total_duration(&self) -> f32 {
        self.frames.iter().map(|f| f.duration_ms).sum()
    }
}

/// Every clip a character can play, immutable once loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipCatalog {
    /// Sheet image the frames are cut from
    #[serde(default)]
    pub filename: String,
    /// Size of the visible sprite
    pub width: u32,
    pub height: u32,
    /// Clip played at spawn and after one-shot clips without `next`
    pub start: String,
    #[serde(rename = "animations")]
    clips: BTreeMap<String, AnimationClip>,
}

impl ClipCatalog {
    /// Build a catalog from clips, validating it
    pub fn new(
        width: u32,
        height: u32,
        start: impl Into<String>,
        clips: impl IntoIterator<Item = AnimationClip>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            filename: String::new(),
            width,
            height,
            start: start.into(),
            clips: clips.into_iter().map(|c| (c.name.clone(), c)).collect(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a catalog from JSON text
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let mut catalog: ClipCatalog = serde_json::from_str(json)?;
        for (name, clip) in catalog.clips.iter_mut() {
            clip.name = name.clone();
        }
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog file from disk
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        log::info!(
            "Loaded {} clips from {} (start '{}')",
            catalog.clips.len(),
            path.display(),
            catalog.start
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if !self.clips.contains_key(&self.start) {
            return Err(CatalogError::MissingStart(self.start.clone()));
        }
        for (name, clip) in &self.clips {
            if clip.frames.is_empty() {
                return Err(CatalogError::EmptyClip(name.clone()));
            }
            for (i, frame) in clip.frames.iter().enumerate() {
                if !frame.duration_ms.is_finite() || frame.duration_ms < 0.0 {
                    return Err(CatalogError::InvalidDuration {
                        clip: name.clone(),
                        frame: i,
                        duration: frame.duration_ms,
                    });
                }
            }
            if let Some(next) = clip.next.as_ref().filter(|n| !self.clips.contains_key(*n)) {
                return Err(CatalogError::UnknownNext {
                    clip: name.clone(),
                    next: next.clone(),
                });
            }
            if clip.looping && clip.total_duration() <= 0.0 {
                return Err(CatalogError::ZeroLengthLoop(name.clone()));
            }
        }
        Ok(())
    }

    /// Fail unless every named clip exists
    pub fn require<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), CatalogError> {
        match names.into_iter().find(|n| !self.contains(n)) {
            Some(missing) => Err(CatalogError::MissingClip(missing.to_string())),
            None => Ok(()),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    /// Look up a clip that must exist.
    ///
    /// # Panics
    /// If `name` is not in the catalog. Catalogs are validated on load and the
    /// controller checks its clip names up front, so this is a broken invariant.
    pub fn clip(&self, name: &str) -> &AnimationClip {
        self.clips
            .get(name)
            .unwrap_or_else(|| panic!("animation clip '{name}' is not in the catalog"))
    }

    /// Clip that follows `name` once it finishes
    pub fn next_of(&self, name: &str) -> &str {
        self.clip(name).next.as_deref().unwrap_or(&self.start)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Plays one clip at a time from a shared catalog
#[derive(Debug, Clone)]
pub struct SpriteAnimator {
    catalog: Arc<ClipCatalog>,
    clip: String,
    frame: usize,
    /// Time spent on the current frame (ms)
    elapsed: f32,
    /// Visible frame changed since the last redraw
    dirty: bool,
}

impl SpriteAnimator {
    /// Start on the catalog's start clip
    pub fn new(catalog: Arc<ClipCatalog>) -> Self {
        let clip = catalog.start.clone();
        Self {
            catalog,
            clip,
            frame: 0,
            elapsed: 0.0,
            dirty: true,
        }
    }

    pub fn catalog(&self) -> &ClipCatalog {
        &self.catalog
    }

    /// Name of the clip currently playing
    pub fn clip_name(&self) -> &str {
        &self.clip
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Switch to `name` from its first frame.
    ///
    /// Replaying the clip that is already running does nothing, so a trick
    /// triggered twice keeps its place. Returns whether the clip changed.
    pub fn play(&mut self, name: &str) -> bool {
        if self.clip == name {
            return false;
        }
        // Lookup panics on unknown clips before any state changes
        self.catalog.clip(name);
        log::trace!("animation {} -> {}", self.clip, name);
        self.clip = name.to_string();
        self.frame = 0;
        self.elapsed = 0.0;
        self.dirty = true;
        true
    }

    /// Advance playback by `dt` milliseconds
    pub fn advance(&mut self, dt: f32) {
        let catalog = Arc::clone(&self.catalog);
        let before = self.frame;
        let mut switched = false;

        self.elapsed += dt;
        loop {
            let clip = catalog.clip(&self.clip);
            let duration = clip.frames[self.frame].duration_ms;
            if self.elapsed <= duration {
                break;
            }
            self.elapsed -= duration;
            self.frame += 1;

            if self.frame >= clip.frames.len() {
                if clip.looping {
                    self.frame = 0;
                } else {
                    // One-shot finished: hand over to the follow-up clip
                    self.clip = catalog.next_of(&clip.name).to_string();
                    self.frame = 0;
                    self.elapsed = 0.0;
                    switched = true;
                    break;
                }
            }
        }

        if switched || self.frame != before {
            self.dirty = true;
        }
    }

    /// Source rectangle on the sheet for the visible frame
    pub fn current_frame(&self) -> Rect {
        self.catalog.clip(&self.clip).frames[self.frame].rect
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledge a redraw
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    pub(crate) fn frames(durations: &[f32]) -> Vec<Frame> {
        durations
            .iter()
            .enumerate()
            .map(|(i, &d)| Frame {
                rect: Rect::new(i as f32 * 32.0, 0.0, 32.0, 48.0),
                duration_ms: d,
            })
            .collect()
    }

    pub(crate) fn clip(
        name: &str,
        durations: &[f32],
        looping: bool,
        next: Option<&str>,
    ) -> AnimationClip {
        AnimationClip {
            name: name.to_string(),
            frames: frames(durations),
            looping,
            next: next.map(str::to_string),
            display: false,
        }
    }

    fn catalog() -> Arc<ClipCatalog> {
        Arc::new(
            ClipCatalog::new(
                32,
                48,
                "idle",
                [
                    clip("idle", &[100.0, 100.0], true, None),
                    clip("ride", &[50.0, 50.0, 50.0], true, None),
                    clip("pop", &[30.0, 30.0], false, Some("ride")),
                    clip("flash", &[40.0], false, None),
                ],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "filename": "assets/Skata.png",
            "width": 64,
            "height": 64,
            "start": "riding",
            "animations": {
                "riding": { "looping": true,
                            "frames": [ {"x": 0, "y": 0, "w": 64, "h": 64, "t": 100} ] },
                "kickflip": { "display": true, "next": "riding",
                              "frames": [ {"x": 64, "y": 0, "w": 64, "h": 64, "t": 50} ] }
            }
        }"#;
        let catalog = ClipCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.clip("kickflip").name, "kickflip");
        assert!(catalog.clip("kickflip").display);
        assert_eq!(catalog.next_of("kickflip"), "riding");
        assert_eq!(catalog.clip("riding").frames[0].rect, Rect::new(0.0, 0.0, 64.0, 64.0));
    }

    #[test]
    fn test_catalog_validation() {
        let err = ClipCatalog::new(1, 1, "missing", [clip("a", &[1.0], true, None)]).unwrap_err();
        assert!(matches!(err, CatalogError::MissingStart(_)));

        let err = ClipCatalog::new(1, 1, "a", [clip("a", &[], true, None)]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyClip(_)));

        let err = ClipCatalog::new(1, 1, "a", [clip("a", &[-1.0], false, None)]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDuration { frame: 0, .. }));

        let err = ClipCatalog::new(1, 1, "a", [clip("a", &[1.0], false, Some("b"))]).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownNext { .. }));

        let err = ClipCatalog::new(1, 1, "a", [clip("a", &[0.0, 0.0], true, None)]).unwrap_err();
        assert!(matches!(err, CatalogError::ZeroLengthLoop(_)));

        let ok = ClipCatalog::new(1, 1, "a", [clip("a", &[1.0], true, None)]).unwrap();
        assert!(matches!(ok.require(["a", "b"]), Err(CatalogError::MissingClip(n)) if n == "b"));
    }

    #[test]
    fn test_play_is_idempotent() {
        let mut anim = SpriteAnimator::new(catalog());
        assert!(anim.play("ride"));
        anim.advance(70.0);
        assert_eq!(anim.frame_index(), 1);
        let elapsed = anim.elapsed();

        anim.clear_dirty();
        assert!(!anim.play("ride"));
        assert_eq!(anim.frame_index(), 1);
        assert_eq!(anim.elapsed(), elapsed);
        assert!(!anim.is_dirty());
    }

    #[test]
    fn test_one_shot_hands_over_to_next() {
        let mut anim = SpriteAnimator::new(catalog());
        anim.play("pop");
        anim.advance(31.0);
        assert_eq!(anim.clip_name(), "pop");
        assert_eq!(anim.frame_index(), 1);
        anim.advance(30.0);
        assert_eq!(anim.clip_name(), "ride");
        assert_eq!(anim.frame_index(), 0);
        assert_eq!(anim.elapsed(), 0.0);
    }

    #[test]
    fn test_single_frame_one_shot_falls_back_to_start() {
        let mut anim = SpriteAnimator::new(catalog());
        anim.play("flash");
        anim.advance(40.0);
        assert_eq!(anim.clip_name(), "flash");
        anim.advance(0.5);
        assert_eq!(anim.clip_name(), "idle");
        assert_eq!(anim.frame_index(), 0);
    }

    #[test]
    fn test_current_frame_and_dirty() {
        let mut anim = SpriteAnimator::new(catalog());
        assert!(anim.is_dirty());
        anim.clear_dirty();
        anim.advance(50.0);
        assert!(!anim.is_dirty());
        assert_eq!(anim.current_frame().x, 0.0);
        anim.advance(60.0);
        assert!(anim.is_dirty());
        assert_eq!(anim.current_frame().x, 32.0);
    }

    #[test]
    #[should_panic(expected = "not in the catalog")]
    fn test_play_unknown_clip_panics() {
        let mut anim = SpriteAnimator::new(catalog());
        anim.play("nope");
    }

    proptest! {
        #[test]
        fn prop_looping_clip_never_changes(
            durations in proptest::collection::vec(1.0f32..200.0, 1..6),
            steps in proptest::collection::vec(0.0f32..150.0, 1..50),
        ) {
            let cat = Arc::new(
                ClipCatalog::new(1, 1, "loop", [clip("loop", &durations, true, None)]).unwrap(),
            );
            let mut anim = SpriteAnimator::new(cat);
            for dt in steps {
                anim.advance(dt);
                prop_assert_eq!(anim.clip_name(), "loop");
                prop_assert!(anim.frame_index() < durations.len());
            }
        }

        #[test]
        fn prop_one_shot_ends_on_next(
            durations in proptest::collection::vec(0.0f32..100.0, 1..6),
            step in 1.0f32..20.0,
        ) {
            let cat = Arc::new(
                ClipCatalog::new(
                    1,
                    1,
                    "rest",
                    [
                        clip("rest", &[1000.0], true, None),
                        clip("trick", &durations, false, Some("rest")),
                    ],
                )
                .unwrap(),
            );
            let mut anim = SpriteAnimator::new(cat);
            anim.play("trick");
            let total: f32 = durations.iter().sum();
            let mut fed = 0.0;
            while anim.clip_name() == "trick" {
                anim.advance(step);
                fed += step;
                prop_assert!(fed <= total + step + 0.01);
            }
            prop_assert!(fed >= total - 0.01);
            prop_assert_eq!(anim.clip_name(), "rest");
            prop_assert_eq!(anim.frame_index(), 0);
        }
    }
}
