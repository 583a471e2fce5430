//! Reflex - a reaction-time spot tapping game
//!
//! Core modules:
//! - `sim`: Deterministic game engine (spots, scoring, levels, lives, timers)
//! - `audio`: Sound cue playback seam
//! - `highscores`: Preference store seam and high score tracking
//! - `persistence`: File-backed preference storage
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance
//! - `ui`: Presentation layer seam and HUD text

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use audio::{AudioManager, CuePlayer, SoundCue};
pub use highscores::{HighScore, MemoryStore, PreferenceStore};
pub use settings::{ResumeBehavior, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Spot edge length in pixels
    pub const SPOT_DIAMETER: f32 = 200.0;
    /// Final scale a spot shrinks to over its animation
    pub const SPOT_END_SCALE: f32 = 0.25;

    /// Spots scheduled on every reset
    pub const INITIAL_SPOTS: u32 = 5;
    /// Stagger between the initial spawns (ms)
    pub const SPOT_DELAY_MS: u64 = 500;
    /// Animation duration at level 1 (ms)
    pub const INITIAL_ANIMATION_DURATION_MS: u64 = 6000;
    /// Duration multiplier applied on every level-up
    pub const DURATION_DECAY: f64 = 0.9;

    /// Lives at the start of a game
    pub const LIVES: u32 = 3;
    /// Lives cap (level-ups never grant more)
    pub const MAX_LIVES: u32 = 5;
    /// Successful taps per level
    pub const NEW_LEVEL: u32 = 10;

    /// Points per hit, multiplied by level
    pub const HIT_POINTS: u32 = 5;
    /// Points lost per background tap, multiplied by level
    pub const MISS_PENALTY: u32 = 15;

    /// Preference key the high score is stored under
    pub const HIGH_SCORE_KEY: &str = "HIGH_SCORE";
}

/// Linear interpolation between two points, `t` clamped to [0, 1]
#[inline]
pub fn lerp_point(from: Vec2, to: Vec2, t: f32) -> Vec2 {
    from.lerp(to, t.clamp(0.0, 1.0))
}

/// Whether `point` lies inside the circle at `center` with `radius`
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}
