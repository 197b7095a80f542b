//! Gnar Skata entry point
//!
//! Runs a headless session: loads settings, the character catalog and the
//! level (falling back to built-in demo content), then plays a scripted
//! sequence of key presses at 60 Hz and logs what the skater does.
//!
//! Usage: `gnar-skata [settings.json]`

use std::path::Path;
use std::sync::Arc;

use gnar_skata::consts::FRAME_MS;
use gnar_skata::demo;
use gnar_skata::sim::{ClipCatalog, GameState, LevelSequence, TickInput, tick};
use gnar_skata::Settings;

/// Frames to simulate (10 seconds)
const SESSION_FRAMES: u64 = 600;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Gnar Skata (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(Path::new(&path))?,
        None => Settings::default(),
    };

    let catalog = match &settings.catalog {
        Some(path) => ClipCatalog::load(path)?,
        None => demo::catalog(),
    };
    let levels = match &settings.level {
        Some(path) => LevelSequence::load(path)?,
        None => demo::level(),
    };

    let mut state = GameState::new(Arc::new(catalog), levels, settings.tuning.clone())?;
    let script = demo::script();
    let mut last_clip = state.skater.clip_name().to_string();

    for frame in 0..SESSION_FRAMES {
        let input = TickInput::keys(
            script
                .iter()
                .filter(|(f, _)| *f == frame)
                .map(|(_, event)| *event),
        );
        tick(&mut state, &input, FRAME_MS);

        if state.skater.clip_name() != last_clip {
            last_clip = state.skater.clip_name().to_string();
            log::info!(
                "[{:>4}] {:<9} pos=({:.0}, {:.0}) {:?}",
                frame,
                last_clip,
                state.skater.position().x,
                state.skater.position().y,
                state.skater.grounding()
            );
        }
        if state.skater.animator().is_dirty() {
            log::trace!("redraw frame {:?}", state.skater.current_frame());
            state.skater.clear_dirty();
        }
    }

    log::info!(
        "Session over after {} frames in segment '{}'. Best combo: '{}'",
        state.frame,
        state.levels.current().name,
        state.combo.best()
    );
    Ok(())
}
