//! Built-in content for running without asset files
//!
//! A small character catalog laid out as one row of 64x64 frames per clip,
//! a two-segment level and a scripted input sequence for headless runs.

use glam::Vec2;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::geometry::Rect;
use crate::sim::input::{Key, KeyEvent};
use crate::sim::skater::clips;
use crate::sim::{AnimationClip, ClipCatalog, Frame, LevelSegment, LevelSequence, SurfaceKind};

/// Sprite size on the demo sheet
pub const SPRITE_SIZE: u32 = 64;

fn row(row: u32, durations: &[f32]) -> Vec<Frame> {
    let size = SPRITE_SIZE as f32;
    durations
        .iter()
        .enumerate()
        .map(|(i, &duration_ms)| Frame {
            rect: Rect::new(i as f32 * size, row as f32 * size, size, size),
            duration_ms,
        })
        .collect()
}

fn clip(
    name: &str,
    frames: Vec<Frame>,
    looping: bool,
    next: Option<&str>,
    display: bool,
) -> AnimationClip {
    AnimationClip {
        name: name.to_string(),
        frames,
        looping,
        next: next.map(str::to_string),
        display,
    }
}

/// Character catalog with every clip the skater plays
pub fn catalog() -> ClipCatalog {
    let clips = [
        clip(clips::FLOAT, row(0, &[150.0, 150.0]), true, None, false),
        clip(clips::RIDING, row(1, &[120.0, 120.0, 120.0, 120.0]), true, None, false),
        clip(clips::OLLIE, row(2, &[60.0, 60.0, 60.0]), false, Some(clips::FLOAT), false),
        clip(clips::KICKFLIP, row(3, &[40.0; 6]), false, Some(clips::FLOAT), true),
        clip(clips::HEELFLIP, row(4, &[40.0; 6]), false, Some(clips::FLOAT), true),
        clip(clips::NOSEGRIND, row(5, &[90.0, 90.0]), true, None, true),
        clip(clips::FIVE_O, row(6, &[90.0, 90.0]), true, None, true),
        clip(clips::FALLING, row(7, &[80.0, 80.0, 80.0]), false, Some(clips::DED), false),
        clip(clips::DED, row(8, &[1000.0]), false, None, false),
    ];
    match ClipCatalog::new(SPRITE_SIZE, SPRITE_SIZE, clips::FLOAT, clips) {
        Ok(catalog) => catalog,
        Err(e) => unreachable!("demo catalog is invalid: {e}"),
    }
}

/// Street with a ledge and a hazard, then a park with a long ledge
pub fn level() -> LevelSequence {
    let size = Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT);

    let mut street = LevelSegment::new("street", size);
    street.add_surface(SurfaceKind::Pavement, Rect::new(0.0, 600.0, 960.0, 120.0));
    street.add_surface(SurfaceKind::Ledge, Rect::new(380.0, 560.0, 160.0, 40.0));
    street.add_surface(SurfaceKind::Hazard, Rect::new(780.0, 590.0, 40.0, 10.0));

    let mut park = LevelSegment::new("park", size);
    park.add_surface(SurfaceKind::Pavement, Rect::new(0.0, 640.0, 960.0, 80.0));
    park.add_surface(SurfaceKind::Ledge, Rect::new(200.0, 590.0, 500.0, 50.0));

    LevelSequence::single(street).with_segment(park)
}

/// Scripted session: (frame number, key event)
pub fn script() -> Vec<(u64, KeyEvent)> {
    vec![
        // Land, then push off to the right
        (50, KeyEvent::down(Key::Right)),
        (52, KeyEvent::up(Key::Right)),
        (60, KeyEvent::down(Key::Right)),
        (62, KeyEvent::up(Key::Right)),
        // Ollie with a late left: kickflip through the look-ahead window
        (90, KeyEvent::down(Key::Flip)),
        (93, KeyEvent::down(Key::Left)),
        (95, KeyEvent::up(Key::Left)),
        // Arm a grind on the way down toward the ledge
        (120, KeyEvent::down(Key::Grind)),
        (121, KeyEvent::down(Key::Right)),
        (123, KeyEvent::up(Key::Right)),
        // Pop out of whatever we are on
        (170, KeyEvent::down(Key::Jump)),
        (172, KeyEvent::down(Key::Flip)),
        (173, KeyEvent::down(Key::Right)),
        (175, KeyEvent::up(Key::Right)),
    ]
}
