//! Reflex headless host
//!
//! Runs a demo session with the autoplay bot standing in for the player:
//! `reflex [seconds] [seed]`. Preferences persist to `reflex_prefs.json`, so
//! the high score carries over between runs.

use reflex::audio::LogCuePlayer;
use reflex::persistence::JsonFileStore;
use reflex::sim::{Autoplay, GameEngine, GamePhase, Ports};
use reflex::ui::LogPresenter;
use reflex::{Settings, Tuning};

const SETTINGS_PATH: &str = "reflex_settings.json";
const TUNING_PATH: &str = "reflex_tuning.json";
const PREFS_PATH: &str = "reflex_prefs.json";

/// Frame length for the simulated host (60 Hz)
const FRAME_MS: u64 = 16;
/// Simulated playfield (portrait phone)
const VIEW_WIDTH: f32 = 1080.0;
const VIEW_HEIGHT: f32 = 1920.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Reflex (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seconds: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120);

    let mut settings = Settings::load(SETTINGS_PATH);
    if let Some(seed) = args.next().and_then(|s| s.parse().ok()) {
        settings.seed = Some(seed);
    }
    let bot_seed = settings.seed.unwrap_or(0);
    let tuning = Tuning::load(TUNING_PATH);

    let ports = Ports {
        audio: Box::new(LogCuePlayer),
        store: Box::new(JsonFileStore::open(PREFS_PATH)),
        presenter: Box::new(LogPresenter::default()),
    };
    let mut engine = GameEngine::new(tuning, &settings, ports);
    engine.set_viewport(VIEW_WIDTH, VIEW_HEIGHT);
    // A mobile host calls resume when it first comes to the foreground
    engine.resume();

    let mut bot = Autoplay::new(bot_seed, 350, 0.9);
    let mut games = 1;
    let frames = seconds * 1000 / FRAME_MS;
    for _ in 0..frames {
        engine.tick(FRAME_MS);
        if let Some(tap) = bot.choose_tap(&engine) {
            engine.on_tap(tap);
        }
        if engine.phase() == GamePhase::GameOver && engine.acknowledge_game_over() {
            games += 1;
        }
    }
    engine.pause();

    let state = engine.state();
    log::info!(
        "Finished after {}s and {} game(s): score {}, level {}, high score {}",
        seconds,
        games,
        state.score,
        state.level,
        engine.high_score()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive GameEngine directly; there is no headless demo
}
