//! Level geometry and the queries the skater makes against it
//!
//! A level is a sequence of screen-sized segments. Each segment is a list of
//! tagged rectangles: pavement to ride, ledges to grind and hazards to avoid.
//! The skater only sees the [`Environment`] trait; [`LevelSequence`] is the
//! concrete implementation backed by geometry files.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::{Corner, Rect};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Errors raised while loading or saving level data
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse level data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("level manifest has no segments")]
    NoSegments,

    #[error("start segment {start} is out of range ({count} segments)")]
    StartOutOfRange { start: usize, count: usize },
}

/// Classification of a piece of level geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// Rideable ground
    Pavement,
    /// Grindable edge
    Ledge,
    /// Touching it wipes the skater out
    Hazard,
}

/// Weak handle to a surface in the active segment.
///
/// Only valid until the segment's geometry changes; resolve it with
/// [`Environment::surface`] each time it is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub usize);

/// Snapshot of a surface returned by queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub id: SurfaceId,
    pub kind: SurfaceKind,
    pub rect: Rect,
}

/// Which neighbouring segment to move to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentDirection {
    Next,
    Previous,
}

/// What the skater can ask of the world it rides through
pub trait Environment {
    /// Extents of the active segment
    fn bounds(&self) -> Rect;

    /// First surface of any kind overlapping `rect`
    fn surface_at(&self, rect: &Rect) -> Option<Surface>;

    /// First ledge overlapping `rect`
    fn ledge_at(&self, rect: &Rect) -> Option<Surface>;

    /// Resolve a handle from an earlier query
    fn surface(&self, id: SurfaceId) -> Option<Surface>;

    /// Swap to a neighbouring segment. Returns the new segment index, or
    /// `None` if there is no segment that way.
    fn advance_to_adjacent_segment(&mut self, direction: SegmentDirection) -> Option<usize>;
}

/// One entry of a geometry file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRecord {
    #[serde(rename = "surfaceType")]
    pub kind: SurfaceKind,
    pub rect: Rect,
}

/// A single screen of level geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSegment {
    pub name: String,
    pub size: Vec2,
    surfaces: Vec<SurfaceRecord>,
}

impl LevelSegment {
    pub fn new(name: impl Into<String>, size: Vec2) -> Self {
        Self {
            name: name.into(),
            size,
            surfaces: Vec::new(),
        }
    }

    /// Segment sized to the screen
    pub fn screen(name: impl Into<String>) -> Self {
        Self::new(name, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT))
    }

    /// Parse a geometry file body (a JSON list of surface records)
    pub fn from_geometry_json(
        name: impl Into<String>,
        size: Vec2,
        json: &str,
    ) -> Result<Self, LevelError> {
        let surfaces: Vec<SurfaceRecord> = serde_json::from_str(json)?;
        Ok(Self {
            name: name.into(),
            size,
            surfaces,
        })
    }

    pub fn to_geometry_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(&self.surfaces)?)
    }

    pub fn load_geometry(
        name: impl Into<String>,
        size: Vec2,
        path: &Path,
    ) -> Result<Self, LevelError> {
        let json = read(path)?;
        Self::from_geometry_json(name, size, &json)
    }

    pub fn save_geometry(&self, path: &Path) -> Result<(), LevelError> {
        let json = self.to_geometry_json()?;
        std::fs::write(path, json).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Saved {} surfaces to {}", self.surfaces.len(), path.display());
        Ok(())
    }

    pub fn surfaces(&self) -> impl Iterator<Item = Surface> + '_ {
        self.surfaces.iter().enumerate().map(|(i, s)| Surface {
            id: SurfaceId(i),
            kind: s.kind,
            rect: s.rect,
        })
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    pub fn surface_at(&self, rect: &Rect) -> Option<Surface> {
        self.surfaces().find(|s| s.rect.intersects(rect))
    }

    pub fn ledge_at(&self, rect: &Rect) -> Option<Surface> {
        self.surfaces()
            .find(|s| s.kind == SurfaceKind::Ledge && s.rect.intersects(rect))
    }

    pub fn surface(&self, id: SurfaceId) -> Option<Surface> {
        self.surfaces.get(id.0).map(|s| Surface {
            id,
            kind: s.kind,
            rect: s.rect,
        })
    }

    /// Topmost (last added) surface under a point, as an editor picks it
    pub fn surface_at_point(&self, point: Vec2) -> Option<Surface> {
        let (i, _) = self
            .surfaces
            .iter()
            .enumerate()
            .rev()
            .find(|(_, s)| s.rect.contains_point(point))?;
        self.surface(SurfaceId(i))
    }

    pub fn add_surface(&mut self, kind: SurfaceKind, rect: Rect) -> SurfaceId {
        self.surfaces.push(SurfaceRecord { kind, rect });
        SurfaceId(self.surfaces.len() - 1)
    }

    /// Remove the surface under `point`. Ids of later surfaces shift down.
    pub fn remove_surface_at(&mut self, point: Vec2) -> Option<SurfaceRecord> {
        let id = self.surface_at_point(point)?.id;
        Some(self.surfaces.remove(id.0))
    }

    /// Shift the surface under `point` by `delta`
    pub fn move_surface_at(&mut self, point: Vec2, delta: Vec2) -> Option<SurfaceId> {
        let id = self.surface_at_point(point)?.id;
        self.surfaces[id.0].rect.translate(delta);
        Some(id)
    }

    /// Drag one corner of a surface to `to`, keeping the opposite corner fixed
    pub fn resize_surface(&mut self, id: SurfaceId, corner: Corner, to: Vec2) -> bool {
        match self.surfaces.get_mut(id.0) {
            Some(record) => {
                record.rect = record.rect.with_corner_at(corner, to);
                true
            }
            None => false,
        }
    }

    /// Replace a surface's rectangle outright
    pub fn set_surface_rect(&mut self, id: SurfaceId, rect: Rect) -> bool {
        match self.surfaces.get_mut(id.0) {
            Some(record) => {
                record.rect = rect;
                true
            }
            None => false,
        }
    }

    /// Change the kind of the surface under `point`
    pub fn retype_surface_at(&mut self, point: Vec2, kind: SurfaceKind) -> bool {
        match self.surface_at_point(point) {
            Some(s) => {
                self.surfaces[s.id.0].kind = kind;
                true
            }
            None => false,
        }
    }
}

/// Entry in a level manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentEntry {
    pub name: String,
    /// Geometry file, relative to the manifest
    pub geo: PathBuf,
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    SCREEN_WIDTH
}

fn default_height() -> f32 {
    SCREEN_HEIGHT
}

/// Level manifest file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelManifest {
    pub segments: Vec<SegmentEntry>,
    #[serde(default)]
    pub start: usize,
}

/// Ordered segments with one active at a time
#[derive(Debug, Clone)]
pub struct LevelSequence {
    segments: Vec<LevelSegment>,
    current: usize,
}

impl LevelSequence {
    pub fn new(segments: Vec<LevelSegment>, start: usize) -> Result<Self, LevelError> {
        if segments.is_empty() {
            return Err(LevelError::NoSegments);
        }
        if start >= segments.len() {
            return Err(LevelError::StartOutOfRange {
                start,
                count: segments.len(),
            });
        }
        Ok(Self {
            segments,
            current: start,
        })
    }

    /// Single-segment level
    pub fn single(segment: LevelSegment) -> Self {
        Self {
            segments: vec![segment],
            current: 0,
        }
    }

    /// Load a manifest and every geometry file it lists
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let manifest: LevelManifest = serde_json::from_str(&read(path)?)?;
        let base = path.parent().unwrap_or(Path::new("."));

        let segments = manifest
            .segments
            .iter()
            .map(|entry| {
                LevelSegment::load_geometry(
                    entry.name.clone(),
                    Vec2::new(entry.width, entry.height),
                    &base.join(&entry.geo),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::info!("Loaded level {} ({} segments)", path.display(), segments.len());
        Self::new(segments, manifest.start)
    }

    /// Append a segment after the last one
    pub fn with_segment(mut self, segment: LevelSegment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &LevelSegment {
        &self.segments[self.current]
    }

    pub fn current_mut(&mut self) -> &mut LevelSegment {
        &mut self.segments[self.current]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Environment for LevelSequence {
    fn bounds(&self) -> Rect {
        self.current().bounds()
    }

    fn surface_at(&self, rect: &Rect) -> Option<Surface> {
        self.current().surface_at(rect)
    }

    fn ledge_at(&self, rect: &Rect) -> Option<Surface> {
        self.current().ledge_at(rect)
    }

    fn surface(&self, id: SurfaceId) -> Option<Surface> {
        self.current().surface(id)
    }

    fn advance_to_adjacent_segment(&mut self, direction: SegmentDirection) -> Option<usize> {
        let target = match direction {
            SegmentDirection::Next => Some(self.current + 1).filter(|&i| i < self.segments.len()),
            SegmentDirection::Previous => self.current.checked_sub(1),
        }?;
        log::info!(
            "Segment {} ({}) -> {} ({})",
            self.current,
            self.current().name,
            target,
            self.segments[target].name
        );
        self.current = target;
        Some(target)
    }
}

fn read(path: &Path) -> Result<String, LevelError> {
    std::fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })
}
