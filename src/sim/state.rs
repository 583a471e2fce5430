//! Game state and core simulation types

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;
use crate::{lerp_point, point_in_circle};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Engine built, no game started yet
    NotStarted,
    /// Active gameplay
    Playing,
    /// Lives ran out
    GameOver,
}

/// Unique spot identifier (never reused within an engine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpotId(pub u32);

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spot lifecycle. Leaves `Animating` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpotState {
    Animating,
    Tapped,
    Missed,
}

/// Cosmetic variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpotKind {
    Green,
    Red,
}

/// A tappable target moving from `origin` to `destination` while shrinking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spot {
    pub id: SpotId,
    pub kind: SpotKind,
    /// Top-left corner at spawn
    pub origin: Vec2,
    /// Top-left corner when the animation ends
    pub destination: Vec2,
    /// Edge length at scale 1.0
    pub diameter: f32,
    /// Scale reached at the end of the animation
    pub end_scale: f32,
    /// Animation length (ms)
    pub duration_ms: u64,
    /// Timeline time the animation started (ms)
    pub spawned_at_ms: u64,
    pub state: SpotState,
}

impl Spot {
    /// Animation progress at `now_ms`, in [0, 1]
    pub fn progress(&self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.spawned_at_ms);
        (elapsed as f64 / self.duration_ms.max(1) as f64).min(1.0) as f32
    }

    /// Interpolated top-left corner
    pub fn position_at(&self, now_ms: u64) -> Vec2 {
        lerp_point(self.origin, self.destination, self.progress(now_ms))
    }

    /// Interpolated scale (1.0 down to `end_scale`)
    pub fn scale_at(&self, now_ms: u64) -> f32 {
        1.0 + (self.end_scale - 1.0) * self.progress(now_ms)
    }

    /// Centre of the spot; scaling happens around it
    pub fn center_at(&self, now_ms: u64) -> Vec2 {
        self.position_at(now_ms) + Vec2::splat(self.diameter / 2.0)
    }

    /// Hit test against the visible (scaled) disc
    pub fn contains(&self, point: Vec2, now_ms: u64) -> bool {
        let radius = self.diameter * self.scale_at(now_ms) / 2.0;
        point_in_circle(point, self.center_at(now_ms), radius)
    }

    pub fn is_animating(&self) -> bool {
        self.state == SpotState::Animating
    }
}

/// Score/level/lives for one game (serializable snapshot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u32,
    /// Starts at 1
    pub level: u32,
    /// Successful taps this game
    pub spots_touched: u32,
    pub lives: u32,
    /// Per-spot animation time for new spawns (ms)
    pub animation_duration_ms: u64,
    pub phase: GamePhase,
}

impl GameState {
    /// State of an engine that has not started a game
    pub fn not_started(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::NotStarted,
            ..Self::fresh(tuning)
        }
    }

    /// State right after a reset
    pub fn fresh(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            level: 1,
            spots_touched: 0,
            lives: tuning.lives,
            animation_duration_ms: tuning.initial_animation_duration_ms,
            phase: GamePhase::Playing,
        }
    }

    /// Points awarded for a hit at the current level
    pub fn hit_value(&self, tuning: &Tuning) -> u32 {
        tuning.hit_points.saturating_mul(self.level)
    }

    /// Points removed by a background tap at the current level
    pub fn miss_penalty(&self, tuning: &Tuning) -> u32 {
        tuning.miss_penalty.saturating_mul(self.level)
    }

    /// Apply a successful tap. Returns true when it levelled up.
    ///
    /// The score for the tap uses the level before any level-up it causes.
    pub fn record_hit(&mut self, tuning: &Tuning) -> bool {
        self.spots_touched += 1;
        self.score = self.score.saturating_add(self.hit_value(tuning));

        if self.spots_touched % tuning.taps_per_level != 0 {
            return false;
        }
        self.level += 1;
        self.animation_duration_ms = tuning.decayed_duration(self.animation_duration_ms);
        if self.lives < tuning.max_lives {
            self.lives += 1;
        }
        true
    }

    /// Apply a background tap penalty, floored at zero
    pub fn record_background_tap(&mut self, tuning: &Tuning) {
        self.score = self.score.saturating_sub(self.miss_penalty(tuning));
    }

    /// Lose a life. Returns true when this ended the game.
    pub fn record_miss(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 && self.phase == GamePhase::Playing {
            self.phase = GamePhase::GameOver;
            return true;
        }
        false
    }
}
