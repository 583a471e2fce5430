//! Demo bot
//!
//! Plays the game the way an attentive player would: taps the oldest spot once
//! it has been visible for the reaction time, and occasionally fumbles onto
//! empty space. Seeded, so demo runs are reproducible.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::engine::GameEngine;
use super::state::GamePhase;

/// A point no spot can ever cover (spots live at non-negative coordinates)
const FUMBLE_POINT: Vec2 = Vec2::new(-1.0, -1.0);

/// Autoplay controller
#[derive(Debug, Clone)]
pub struct Autoplay {
    /// How long a spot must be on screen before the bot reacts (ms)
    pub reaction_ms: u64,
    /// Chance a tap lands on the spot (0.0 - 1.0)
    pub accuracy: f64,
    last_tap_ms: Option<u64>,
    rng: Pcg32,
}

impl Autoplay {
    pub fn new(seed: u64, reaction_ms: u64, accuracy: f64) -> Self {
        Self {
            reaction_ms,
            accuracy: accuracy.clamp(0.0, 1.0),
            last_tap_ms: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Where to tap this frame, if anywhere
    pub fn choose_tap(&mut self, engine: &GameEngine) -> Option<Vec2> {
        if engine.is_paused() || engine.phase() != GamePhase::Playing {
            return None;
        }
        let now = engine.now_ms();
        // One tap per reaction window
        if let Some(last) = self.last_tap_ms {
            if now.saturating_sub(last) < self.reaction_ms {
                return None;
            }
        }

        let target = engine
            .spots()
            .iter()
            .filter(|s| now.saturating_sub(s.spawned_at_ms) >= self.reaction_ms)
            .min_by_key(|s| s.spawned_at_ms)?;

        self.last_tap_ms = Some(now);
        if self.rng.random_bool(self.accuracy) {
            Some(target.center_at(now))
        } else {
            Some(FUMBLE_POINT)
        }
    }
}
