//! Presentation layer seam
//!
//! The engine pushes scoreboard, lives, spot and game-over updates through a
//! `Presenter`; the host turns them into pixels (or log lines).

use crate::sim::Spot;

/// Receiver of everything the engine wants shown
pub trait Presenter {
    /// Score, level and best score changed
    fn render_scoreboard(&mut self, score: u32, level: u32, high_score: u32);

    /// Number of life indicators to show
    fn render_lives(&mut self, lives: u32);

    /// Game ended. The host answers with `GameEngine::acknowledge_game_over`.
    fn show_game_over(&mut self, final_score: u32);

    /// A spot entered the playfield
    fn spot_spawned(&mut self, _spot: &Spot) {}

    /// A spot left the playfield (tapped, missed or swept)
    fn spot_removed(&mut self, _spot: &Spot) {}
}

/// Presenter that draws nothing
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render_scoreboard(&mut self, _score: u32, _level: u32, _high_score: u32) {}
    fn render_lives(&mut self, _lives: u32) {}
    fn show_game_over(&mut self, _final_score: u32) {}
}

/// HUD labels as displayed to the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudText {
    pub high_score: String,
    pub score: String,
    pub level: String,
}

impl HudText {
    pub fn new(score: u32, level: u32, high_score: u32) -> Self {
        Self {
            high_score: format!("High Score: {}", high_score),
            score: format!("Score: {}", score),
            level: format!("Level: {}", level),
        }
    }
}

/// Game over dialog text
pub fn game_over_message(final_score: u32) -> String {
    format!("Game Over - Score: {}", final_score)
}

/// Presenter that writes HUD changes to the log (headless hosts)
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_hud: Option<HudText>,
}

impl Presenter for LogPresenter {
    fn render_scoreboard(&mut self, score: u32, level: u32, high_score: u32) {
        let hud = HudText::new(score, level, high_score);
        if self.last_hud.as_ref() != Some(&hud) {
            log::info!("{} | {} | {}", hud.high_score, hud.score, hud.level);
            self.last_hud = Some(hud);
        }
    }

    fn render_lives(&mut self, lives: u32) {
        log::info!("Lives: {}", "*".repeat(lives as usize));
    }

    fn show_game_over(&mut self, final_score: u32) {
        log::info!("{}", game_over_message(final_score));
    }

    fn spot_spawned(&mut self, spot: &Spot) {
        log::trace!("Spot {} at ({:.0}, {:.0})", spot.id, spot.origin.x, spot.origin.y);
    }
}
