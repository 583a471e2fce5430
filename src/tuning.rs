//! Data-driven game balance
//!
//! Every balancing knob lives here so it can be tuned (or loaded from JSON)
//! without touching engine code. `Default` reproduces the shipped values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Upper bound on spots scheduled by one reset
pub const MAX_INITIAL_SPOTS: u32 = 100;
/// Upper bound on the spawn stagger (ms)
pub const MAX_SPOT_DELAY_MS: u64 = 60_000;

/// Balancing parameters for one game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Spot edge length in pixels
    pub spot_diameter: f32,
    /// Scale a spot shrinks to by the end of its animation
    pub spot_end_scale: f32,
    /// Spots scheduled on reset
    pub initial_spots: u32,
    /// Delay between initial spawns (ms)
    pub spot_delay_ms: u64,
    /// Per-spot animation time at level 1 (ms)
    pub initial_animation_duration_ms: u64,
    /// Multiplier applied to the animation time on level-up
    pub duration_decay: f64,
    /// Starting lives
    pub lives: u32,
    /// Lives cap
    pub max_lives: u32,
    /// Hits needed per level
    pub taps_per_level: u32,
    /// Points per hit (times level)
    pub hit_points: u32,
    /// Points lost per background tap (times level)
    pub miss_penalty: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spot_diameter: SPOT_DIAMETER,
            spot_end_scale: SPOT_END_SCALE,
            initial_spots: INITIAL_SPOTS,
            spot_delay_ms: SPOT_DELAY_MS,
            initial_animation_duration_ms: INITIAL_ANIMATION_DURATION_MS,
            duration_decay: DURATION_DECAY,
            lives: LIVES,
            max_lives: MAX_LIVES,
            taps_per_level: NEW_LEVEL,
            hit_points: HIT_POINTS,
            miss_penalty: MISS_PENALTY,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => Some(tuning.sanitized()),
            Err(e) => {
                log::warn!("Invalid tuning JSON: {}", e);
                None
            }
        }
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json).unwrap_or_default(),
            Err(e) => {
                log::debug!("No tuning at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp values that would stall or break the game loop
    pub fn sanitized(mut self) -> Self {
        self.taps_per_level = self.taps_per_level.max(1);
        self.max_lives = self.max_lives.max(1);
        self.lives = self.lives.clamp(1, self.max_lives);
        self.initial_animation_duration_ms = self.initial_animation_duration_ms.max(1);
        self.duration_decay = self.duration_decay.clamp(0.0, 1.0);
        self.spot_diameter = self.spot_diameter.max(1.0);
        self.initial_spots = self.initial_spots.min(MAX_INITIAL_SPOTS);
        self.spot_delay_ms = self.spot_delay_ms.min(MAX_SPOT_DELAY_MS);
        self
    }

    /// Animation time after one level-up, truncated to whole milliseconds
    pub fn decayed_duration(&self, duration_ms: u64) -> u64 {
        ((duration_ms as f64 * self.duration_decay) as u64).max(1)
    }
}
