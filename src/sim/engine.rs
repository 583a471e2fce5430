//! Spot lifecycle and scoring state machine
//!
//! `GameEngine` is the single writer of game state. Taps, animation ends,
//! spawn timers and host lifecycle calls all land here on one thread; every
//! spot-resolving path first checks that the spot is still in the active
//! collection, so a callback that raced a tap, pause or reset does nothing.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::events::{EngineEvent, EventQueue, EventSender};
use super::state::{GamePhase, GameState, Spot, SpotId, SpotKind, SpotState};
use super::timeline::{Fired, TaskHandle, TimedTask, Timeline};
use crate::audio::{AudioManager, CuePlayer, SoundCue};
use crate::highscores::{HighScore, PreferenceStore};
use crate::settings::{ResumeBehavior, Settings};
use crate::tuning::Tuning;
use crate::ui::Presenter;

/// Host-provided collaborators
pub struct Ports {
    pub audio: Box<dyn CuePlayer>,
    pub store: Box<dyn PreferenceStore>,
    pub presenter: Box<dyn Presenter>,
}

/// What a playfield tap turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Landed on this spot
    Hit(SpotId),
    /// Landed on empty space (penalised)
    Miss,
    /// Not playing, or paused
    Ignored,
}

/// The game engine
pub struct GameEngine {
    tuning: Tuning,
    resume_behavior: ResumeBehavior,
    state: GameState,
    /// Spots still animating, oldest first
    spots: Vec<Spot>,
    /// In-flight animation per active spot
    animations: BTreeMap<SpotId, TaskHandle>,
    timeline: Timeline,
    rng: Pcg32,
    next_spot_id: u32,
    viewport: Vec2,
    paused: bool,
    /// Game-over prompt shown and not yet acknowledged
    prompt_pending: bool,
    /// Spots active or pending when a pause swept a game in progress
    interrupted_spots: Option<u32>,
    audio: AudioManager,
    high_score: HighScore,
    presenter: Box<dyn Presenter>,
    events: EventQueue,
}

impl GameEngine {
    /// Build an engine; no game runs until `start` or `resume`
    pub fn new(tuning: Tuning, settings: &Settings, ports: Ports) -> Self {
        let tuning = tuning.sanitized();
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Engine created with seed {}", seed);

        let mut audio = AudioManager::new(ports.audio);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        Self {
            state: GameState::not_started(&tuning),
            tuning,
            resume_behavior: settings.resume_behavior,
            spots: Vec::new(),
            animations: BTreeMap::new(),
            timeline: Timeline::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_spot_id: 1,
            viewport: Vec2::ZERO,
            paused: false,
            prompt_pending: false,
            interrupted_spots: None,
            audio,
            high_score: HighScore::load(ports.store),
            presenter: ports.presenter,
            events: EventQueue::new(),
        }
    }

    // === Accessors ===

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Active spots, oldest first
    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    pub fn spot(&self, id: SpotId) -> Option<&Spot> {
        self.spots.iter().find(|s| s.id == id)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_prompt_pending(&self) -> bool {
        self.prompt_pending
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn audio_available(&self) -> bool {
        self.audio.is_available()
    }

    /// Current timeline time (ms)
    pub fn now_ms(&self) -> u64 {
        self.timeline.now_ms()
    }

    /// Number of spawn timers waiting to fire
    pub fn pending_spawns(&self) -> usize {
        self.timeline.count_where(|t| matches!(t, TimedTask::SpawnSpot))
    }

    /// Delays (from now) of the pending spawn timers, soonest first
    pub fn pending_spawn_delays(&self) -> Vec<u64> {
        self.timeline.delays_where(|t| matches!(t, TimedTask::SpawnSpot))
    }

    /// Number of in-flight animations
    pub fn active_animations(&self) -> usize {
        self.animations.len()
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    // === Lifecycle ===

    /// Playfield size changed
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(0.0), height.max(0.0));
        log::debug!("Viewport {}x{}", self.viewport.x, self.viewport.y);
    }

    /// Open audio and begin a new game
    pub fn start(&mut self) {
        self.audio.acquire();
        self.reset();
    }

    /// Discard the current game and schedule the opening spawns
    pub fn reset(&mut self) {
        self.sweep();
        self.state = GameState::fresh(&self.tuning);
        self.prompt_pending = false;
        self.interrupted_spots = None;

        self.presenter.render_lives(self.state.lives);
        self.render_scoreboard();
        self.schedule_spawns(self.tuning.initial_spots);
        log::info!("New game: {} spots incoming", self.tuning.initial_spots);
    }

    /// Host went to the background. Score, level and lives are kept.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.audio.release();
        if self.state.phase == GamePhase::Playing {
            let count = (self.spots.len() + self.pending_spawns()) as u32;
            self.interrupted_spots = Some(count);
            log::info!("Paused ({} spots interrupted)", count);
        }
        self.sweep();
    }

    /// Host came back to the foreground
    pub fn resume(&mut self) {
        self.paused = false;
        self.audio.acquire();
        if self.prompt_pending {
            log::debug!("Resumed with game-over prompt up");
            return;
        }

        match (self.resume_behavior, self.state.phase) {
            (ResumeBehavior::Continue, GamePhase::Playing) => {
                // Nothing was interrupted: not paused, or reset while paused
                let Some(count) = self.interrupted_spots.take() else {
                    return;
                };
                let count = count.max(1);
                self.schedule_spawns(count);
                self.presenter.render_lives(self.state.lives);
                self.render_scoreboard();
                log::info!("Resumed game: respawning {} spots", count);
            }
            _ => self.reset(),
        }
    }

    /// The game-over prompt's reset action
    pub fn acknowledge_game_over(&mut self) -> bool {
        if !self.prompt_pending {
            return false;
        }
        self.prompt_pending = false;
        self.render_scoreboard();
        self.reset();
        true
    }

    // === Time ===

    /// Advance the timeline, firing spawns and animation ends in due order
    pub fn tick(&mut self, dt_ms: u64) {
        if self.paused {
            return;
        }
        let until = self.timeline.now_ms().saturating_add(dt_ms);
        while let Some(fired) = self.timeline.pop_due(until) {
            self.dispatch(fired);
        }
        self.timeline.finish(until);
    }

    fn dispatch(&mut self, fired: Fired) {
        match fired.task {
            TimedTask::SpawnSpot => {
                if self.state.phase == GamePhase::Playing {
                    self.spawn_spot();
                }
            }
            TimedTask::AnimationEnd { spot } => {
                // Only forget the animation if it is the one that fired
                if self.animations.get(&spot) == Some(&fired.handle) {
                    self.animations.remove(&spot);
                }
                self.on_animation_finished(spot);
            }
        }
    }

    /// Queue `count` spawns, `spot_delay_ms` apart
    fn schedule_spawns(&mut self, count: u32) {
        let delay = self.tuning.spot_delay_ms;
        for i in 1..=u64::from(count) {
            self.timeline
                .schedule(i.saturating_mul(delay), TimedTask::SpawnSpot);
        }
    }

    // === Spots ===

    /// Add a spot with a random path and start its animation
    pub fn spawn_spot(&mut self) -> SpotId {
        let id = SpotId(self.next_spot_id);
        self.next_spot_id += 1;

        let origin = Vec2::new(self.random_coord(self.viewport.x), self.random_coord(self.viewport.y));
        let destination =
            Vec2::new(self.random_coord(self.viewport.x), self.random_coord(self.viewport.y));
        let kind = if self.rng.random_bool(0.5) {
            SpotKind::Green
        } else {
            SpotKind::Red
        };

        let spot = Spot {
            id,
            kind,
            origin,
            destination,
            diameter: self.tuning.spot_diameter,
            end_scale: self.tuning.spot_end_scale,
            duration_ms: self.state.animation_duration_ms,
            spawned_at_ms: self.timeline.now_ms(),
            state: SpotState::Animating,
        };

        let handle = self
            .timeline
            .schedule(spot.duration_ms, TimedTask::AnimationEnd { spot: id });
        self.animations.insert(id, handle);
        self.presenter.spot_spawned(&spot);
        log::debug!(
            "Spawned spot {} ({:?}) for {}ms",
            id,
            kind,
            spot.duration_ms
        );
        self.spots.push(spot);
        id
    }

    /// Uniform in [0, extent - diameter); pinned to 0 when the playfield is too small
    fn random_coord(&mut self, extent: f32) -> f32 {
        let span = (extent - self.tuning.spot_diameter).floor();
        if span < 1.0 {
            return 0.0;
        }
        self.rng.random_range(0..span as u32) as f32
    }

    /// Take an animating spot out of the active collection
    fn take_spot(&mut self, id: SpotId, outcome: SpotState) -> Option<Spot> {
        let idx = self.spots.iter().position(|s| s.id == id && s.is_animating())?;
        let mut spot = self.spots.remove(idx);
        spot.state = outcome;
        if let Some(handle) = self.animations.remove(&id) {
            self.timeline.cancel(handle);
        }
        self.presenter.spot_removed(&spot);
        Some(spot)
    }

    /// Cancel every animation and pending spawn, clearing the playfield
    fn sweep(&mut self) {
        self.timeline.clear();
        self.animations.clear();
        for spot in self.spots.drain(..) {
            self.presenter.spot_removed(&spot);
        }
    }

    // === Input ===

    /// Miss path. No-op unless the spot is still animating and active.
    pub fn on_animation_finished(&mut self, id: SpotId) -> bool {
        if self.paused {
            return false;
        }
        if self.take_spot(id, SpotState::Missed).is_none() {
            log::trace!("Late animation end for {}", id);
            return false;
        }
        if self.state.phase == GamePhase::GameOver {
            return true;
        }

        self.audio.play(SoundCue::Disappear);
        if self.state.record_miss() {
            self.game_over();
        } else {
            log::debug!("Missed {}, {} lives left", id, self.state.lives);
            self.presenter.render_lives(self.state.lives);
            self.spawn_spot();
        }
        true
    }

    /// Hit path. No-op unless the spot is still animating and active.
    pub fn on_spot_tapped(&mut self, id: SpotId) -> bool {
        if self.take_spot(id, SpotState::Tapped).is_none() {
            return false;
        }
        self.audio.play(SoundCue::Hit);

        let level_up = self.state.record_hit(&self.tuning);
        log::debug!("Hit {} (score {})", id, self.state.score);
        if level_up {
            log::info!(
                "Level {}: spots now last {}ms",
                self.state.level,
                self.state.animation_duration_ms
            );
            self.presenter.render_lives(self.state.lives);
        }
        self.render_scoreboard();

        if self.state.phase != GamePhase::GameOver {
            self.spawn_spot();
        }
        true
    }

    /// Resolve a playfield tap against the topmost spot under it
    pub fn on_tap(&mut self, point: Vec2) -> TapOutcome {
        if self.paused || self.state.phase != GamePhase::Playing {
            return TapOutcome::Ignored;
        }
        let now = self.timeline.now_ms();
        let hit = self
            .spots
            .iter()
            .rev()
            .find(|s| s.contains(point, now))
            .map(|s| s.id);

        match hit {
            Some(id) if self.on_spot_tapped(id) => TapOutcome::Hit(id),
            _ => {
                self.on_background_tap();
                TapOutcome::Miss
            }
        }
    }

    /// Tap on empty space: penalty, no effect on lives
    fn on_background_tap(&mut self) {
        self.audio.play(SoundCue::Miss);
        self.state.record_background_tap(&self.tuning);
        log::debug!("Background tap (score {})", self.state.score);
        self.render_scoreboard();
    }

    fn game_over(&mut self) {
        let score = self.state.score;
        self.high_score.submit(score);
        self.sweep();
        self.prompt_pending = true;
        self.presenter.render_lives(0);
        self.render_scoreboard();
        self.presenter.show_game_over(score);
        log::info!("Game over at level {} with score {}", self.state.level, score);
    }

    fn render_scoreboard(&mut self) {
        self.presenter
            .render_scoreboard(self.state.score, self.state.level, self.high_score.best());
    }

    // === Event queue ===

    /// Producer handle for callbacks arriving from other threads
    pub fn sender(&self) -> EventSender {
        self.events.sender()
    }

    /// Apply one event
    pub fn handle(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Tap(point) => {
                self.on_tap(point);
            }
            EngineEvent::SpotTapped(id) => {
                self.on_spot_tapped(id);
            }
            EngineEvent::AnimationFinished(id) => {
                self.on_animation_finished(id);
            }
            EngineEvent::Pause => self.pause(),
            EngineEvent::Resume => self.resume(),
            EngineEvent::AcknowledgeGameOver => {
                self.acknowledge_game_over();
            }
            EngineEvent::Resize { width, height } => self.set_viewport(width, height),
            EngineEvent::Tick(dt_ms) => self.tick(dt_ms),
        }
    }

    /// Apply every queued event in arrival order. Returns how many ran.
    pub fn pump(&mut self) -> usize {
        let events = self.events.drain();
        let count = events.len();
        for event in events {
            self.handle(event);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::HIGH_SCORE_KEY;
    use crate::highscores::MemoryStore;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Record {
        cues: Vec<SoundCue>,
        scoreboards: Vec<(u32, u32, u32)>,
        lives: Vec<u32>,
        game_overs: Vec<u32>,
        spawned: Vec<SpotId>,
        removed: Vec<SpotId>,
    }

    type Shared = Rc<RefCell<Record>>;

    struct TestAudio(Shared);

    impl CuePlayer for TestAudio {
        fn play(&mut self, cue: SoundCue, _volume: f32) {
            self.0.borrow_mut().cues.push(cue);
        }
    }

    struct TestPresenter(Shared);

    impl Presenter for TestPresenter {
        fn render_scoreboard(&mut self, score: u32, level: u32, high_score: u32) {
            self.0.borrow_mut().scoreboards.push((score, level, high_score));
        }
        fn render_lives(&mut self, lives: u32) {
            self.0.borrow_mut().lives.push(lives);
        }
        fn show_game_over(&mut self, final_score: u32) {
            self.0.borrow_mut().game_overs.push(final_score);
        }
        fn spot_spawned(&mut self, spot: &Spot) {
            self.0.borrow_mut().spawned.push(spot.id);
        }
        fn spot_removed(&mut self, spot: &Spot) {
            self.0.borrow_mut().removed.push(spot.id);
        }
    }

    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl PreferenceStore for SharedStore {
        fn get_int(&self, key: &str, default: u32) -> u32 {
            self.0.borrow().get_int(key, default)
        }
        fn set_int(&mut self, key: &str, value: u32) {
            self.0.borrow_mut().set_int(key, value);
        }
    }

    fn engine_with(settings: Settings, store: SharedStore) -> (GameEngine, Shared) {
        let record = Shared::default();
        let ports = Ports {
            audio: Box::new(TestAudio(record.clone())),
            store: Box::new(store),
            presenter: Box::new(TestPresenter(record.clone())),
        };
        let mut engine = GameEngine::new(Tuning::default(), &settings, ports);
        // Playfield exactly one spot wide: every spot sits at (0, 0)
        engine.set_viewport(200.0, 200.0);
        (engine, record)
    }

    fn started(settings: Settings) -> (GameEngine, Shared) {
        let (mut engine, record) = engine_with(settings, SharedStore::default());
        engine.start();
        (engine, record)
    }

    fn seeded() -> Settings {
        Settings {
            seed: Some(42),
            ..Default::default()
        }
    }

    const CENTER: Vec2 = Vec2::new(100.0, 100.0);

    #[test]
    fn test_new_engine_not_started() {
        let (engine, record) = engine_with(seeded(), SharedStore::default());
        assert_eq!(engine.phase(), GamePhase::NotStarted);
        assert_eq!(engine.pending_spawns(), 0);
        assert!(record.borrow().scoreboards.is_empty());
    }

    #[test]
    fn test_reset_schedules_staggered_spawns() {
        let (engine, record) = started(seeded());
        let state = engine.state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!((state.score, state.level, state.lives), (0, 1, 3));
        assert_eq!(state.animation_duration_ms, 6000);
        assert_eq!(engine.pending_spawn_delays(), vec![500, 1000, 1500, 2000, 2500]);
        assert_eq!(record.borrow().lives, vec![3]);
        assert_eq!(record.borrow().scoreboards, vec![(0, 1, 0)]);
    }

    #[test]
    fn test_spawns_fire_on_schedule() {
        let (mut engine, _) = started(seeded());
        engine.tick(499);
        assert!(engine.spots().is_empty());
        engine.tick(1);
        assert_eq!(engine.spots().len(), 1);
        assert_eq!(engine.spots()[0].spawned_at_ms, 500);
        engine.tick(2000);
        assert_eq!(engine.spots().len(), 5);
        assert_eq!(engine.active_animations(), 5);
        assert_eq!(engine.pending_spawns(), 0);
        assert!(engine.spots().iter().all(|s| s.duration_ms == 6000));
    }

    #[test]
    fn test_spawn_within_bounds() {
        let (mut engine, _) = started(seeded());
        engine.set_viewport(1080.0, 1920.0);
        for _ in 0..200 {
            engine.spawn_spot();
        }
        for spot in engine.spots() {
            for p in [spot.origin, spot.destination] {
                assert!(p.x >= 0.0 && p.x < 880.0);
                assert!(p.y >= 0.0 && p.y < 1720.0);
            }
        }
        assert!(engine.spots().iter().any(|s| s.kind == SpotKind::Green));
        assert!(engine.spots().iter().any(|s| s.kind == SpotKind::Red));
    }

    #[test]
    fn test_tap_scores_and_replaces() {
        let (mut engine, record) = started(seeded());
        engine.tick(2500);

        let outcome = engine.on_tap(CENTER);
        // Topmost spot is the most recent one
        assert_eq!(outcome, TapOutcome::Hit(SpotId(5)));
        assert_eq!(engine.state().score, 5);
        assert_eq!(engine.state().spots_touched, 1);
        assert_eq!(engine.spots().len(), 5);
        assert!(engine.spot(SpotId(5)).is_none());
        assert_eq!(record.borrow().cues, vec![SoundCue::Hit]);
        assert_eq!(engine.active_animations(), 5);
    }

    #[test]
    fn test_ten_taps_level_up() {
        let (mut engine, record) = started(seeded());
        engine.tick(2500);
        for _ in 0..9 {
            assert!(matches!(engine.on_tap(CENTER), TapOutcome::Hit(_)));
        }
        assert_eq!(engine.state().score, 45);
        assert_eq!(engine.state().level, 1);

        engine.on_tap(CENTER);
        let state = engine.state();
        assert_eq!(state.score, 50);
        assert_eq!(state.level, 2);
        assert_eq!(state.lives, 4);
        assert_eq!(state.animation_duration_ms, 5400);
        assert_eq!(record.borrow().lives.last(), Some(&4));
        // The replacement for the tenth tap already uses the shorter time
        assert_eq!(engine.spots().last().map(|s| s.duration_ms), Some(5400));

        engine.on_tap(CENTER);
        assert_eq!(engine.state().score, 60);
    }

    #[test]
    fn test_lives_capped() {
        let (mut engine, _) = started(seeded());
        engine.tick(2500);
        for _ in 0..60 {
            engine.on_tap(CENTER);
            assert!(engine.state().lives <= 5);
        }
        assert_eq!(engine.state().level, 7);
        assert_eq!(engine.state().lives, 5);
        assert_eq!(engine.state().animation_duration_ms, 3187);
    }

    #[test]
    fn test_background_tap_penalty() {
        let (mut engine, record) = started(seeded());
        engine.tick(2500);
        engine.on_tap(CENTER);
        engine.on_tap(CENTER);
        assert_eq!(engine.state().score, 10);

        let outcome = engine.on_tap(Vec2::new(190.0, 10.0));
        assert_eq!(outcome, TapOutcome::Miss);
        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.state().lives, 3);
        assert_eq!(engine.spots().len(), 5);
        assert_eq!(record.borrow().cues.last(), Some(&SoundCue::Miss));
    }

    #[test]
    fn test_miss_costs_life_and_respawns() {
        let (mut engine, record) = started(seeded());
        engine.tick(6499);
        assert_eq!(engine.state().lives, 3);
        engine.tick(1);
        assert_eq!(engine.state().lives, 2);
        assert!(engine.spot(SpotId(1)).is_none());
        assert_eq!(engine.spots().len(), 5);
        assert_eq!(engine.spots().last().map(|s| s.id), Some(SpotId(6)));
        assert_eq!(record.borrow().cues, vec![SoundCue::Disappear]);
        assert_eq!(record.borrow().lives.last(), Some(&2));
    }

    #[test]
    fn test_game_over_persists_high_score() {
        let store = SharedStore::default();
        let (mut engine, record) = engine_with(seeded(), store.clone());
        engine.start();
        engine.tick(2500);
        engine.on_tap(CENTER);
        engine.on_tap(CENTER);

        engine.tick(10_000);
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(engine.state().lives, 0);
        assert!(engine.spots().is_empty());
        assert_eq!(engine.active_animations(), 0);
        assert_eq!(engine.pending_spawns(), 0);
        assert!(engine.is_prompt_pending());
        assert_eq!(engine.high_score(), 10);
        assert_eq!(store.0.borrow().get_int(HIGH_SCORE_KEY, 0), 10);
        assert_eq!(record.borrow().game_overs, vec![10]);

        // Nothing left to fire, taps ignored
        engine.tick(60_000);
        assert_eq!(record.borrow().game_overs.len(), 1);
        assert_eq!(engine.on_tap(CENTER), TapOutcome::Ignored);
        assert_eq!(engine.state().score, 10);
    }

    #[test]
    fn test_game_over_keeps_higher_stored_score() {
        let store = SharedStore::default();
        store.0.borrow_mut().set_int(HIGH_SCORE_KEY, 100);
        let (mut engine, _) = engine_with(seeded(), store.clone());
        engine.start();
        engine.tick(2500);
        engine.on_tap(CENTER);
        engine.tick(10_000);
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(engine.high_score(), 100);
        assert_eq!(store.0.borrow().get_int(HIGH_SCORE_KEY, 0), 100);
    }

    #[test]
    fn test_acknowledge_resets() {
        let (mut engine, _) = started(seeded());
        assert!(!engine.acknowledge_game_over());
        engine.tick(10_000);
        assert_eq!(engine.phase(), GamePhase::GameOver);

        assert!(engine.acknowledge_game_over());
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert_eq!(engine.state().lives, 3);
        assert_eq!(engine.pending_spawn_delays(), vec![500, 1000, 1500, 2000, 2500]);
        assert!(!engine.acknowledge_game_over());
    }

    #[test]
    fn test_resolved_spot_events_are_noops() {
        let (mut engine, _) = started(seeded());
        engine.tick(2500);
        assert!(engine.on_spot_tapped(SpotId(3)));
        assert!(!engine.on_spot_tapped(SpotId(3)));
        assert!(!engine.on_animation_finished(SpotId(3)));
        assert_eq!(engine.state().score, 5);
        assert_eq!(engine.state().lives, 3);

        engine.tick(4000);
        // Spot 1 missed at 6500
        assert_eq!(engine.state().lives, 2);
        assert!(!engine.on_spot_tapped(SpotId(1)));
        assert!(!engine.on_animation_finished(SpotId(1)));
        assert_eq!(engine.state().spots_touched, 1);
        assert_eq!(engine.state().lives, 2);
    }

    #[test]
    fn test_external_animation_end_cancels_internal_timer() {
        let (mut engine, _) = started(seeded());
        engine.tick(2500);
        assert!(engine.on_animation_finished(SpotId(2)));
        assert_eq!(engine.state().lives, 2);
        // Spot 2's own timer (due at 7000) must not cost a second life
        engine.tick(4000);
        assert_eq!(engine.state().lives, 1);
    }

    #[test]
    fn test_pause_sweeps_and_keeps_state() {
        let (mut engine, record) = started(seeded());
        engine.tick(1000);
        engine.on_tap(CENTER);
        assert_eq!(engine.spots().len(), 2);

        engine.pause();
        assert!(engine.is_paused());
        assert!(!engine.audio_available());
        assert!(engine.spots().is_empty());
        assert_eq!(engine.pending_spawns(), 0);
        assert_eq!(engine.active_animations(), 0);
        assert_eq!(engine.state().score, 5);

        // Time and taps do nothing while paused
        engine.tick(60_000);
        assert_eq!(engine.on_tap(CENTER), TapOutcome::Ignored);
        assert_eq!(engine.state().lives, 3);
        let cues = record.borrow().cues.len();
        assert_eq!(cues, 1);
    }

    #[test]
    fn test_resume_restarts_by_default() {
        let (mut engine, _) = started(seeded());
        engine.tick(2500);
        engine.on_tap(CENTER);
        engine.pause();
        engine.resume();
        assert!(engine.audio_available());
        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.state().spots_touched, 0);
        assert_eq!(engine.pending_spawn_delays(), vec![500, 1000, 1500, 2000, 2500]);
    }

    #[test]
    fn test_resume_continue_keeps_game() {
        let settings = Settings {
            resume_behavior: ResumeBehavior::Continue,
            ..seeded()
        };
        let (mut engine, _) = started(settings);
        engine.tick(1000);
        for _ in 0..10 {
            engine.on_tap(CENTER);
        }
        assert_eq!(engine.state().level, 2);

        engine.pause();
        engine.resume();
        assert_eq!(engine.state().level, 2);
        assert_eq!(engine.state().score, 50);
        assert_eq!(engine.state().lives, 4);
        // Two live spots plus three pending spawns were interrupted
        assert_eq!(engine.pending_spawn_delays(), vec![500, 1000, 1500, 2000, 2500]);
        engine.tick(2500);
        assert!(engine.spots().iter().all(|s| s.duration_ms == 5400));
    }

    #[test]
    fn test_continue_acknowledged_while_paused_schedules_five() {
        let settings = Settings {
            resume_behavior: ResumeBehavior::Continue,
            ..seeded()
        };
        let (mut engine, _) = started(settings);
        engine.tick(10_000);
        assert_eq!(engine.phase(), GamePhase::GameOver);

        engine.pause();
        assert!(engine.acknowledge_game_over());
        engine.resume();
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert_eq!(engine.pending_spawn_delays(), vec![500, 1000, 1500, 2000, 2500]);
    }

    #[test]
    fn test_continue_resume_without_pause_adds_nothing() {
        let settings = Settings {
            resume_behavior: ResumeBehavior::Continue,
            ..seeded()
        };
        let (mut engine, _) = started(settings);
        engine.tick(1000);
        engine.resume();
        assert_eq!(engine.pending_spawns(), 3);
        assert_eq!(engine.spots().len(), 2);
    }

    #[test]
    fn test_resume_with_prompt_does_not_reset() {
        let (mut engine, _) = started(seeded());
        engine.tick(10_000);
        engine.pause();
        engine.resume();
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert!(engine.is_prompt_pending());
        assert_eq!(engine.pending_spawns(), 0);
    }

    #[test]
    fn test_audio_released_cues_skipped() {
        let (mut engine, record) = engine_with(seeded(), SharedStore::default());
        // reset without start: audio never acquired
        engine.reset();
        engine.tick(2500);
        engine.on_tap(CENTER);
        assert_eq!(engine.state().score, 5);
        assert!(record.borrow().cues.is_empty());
    }

    #[test]
    fn test_event_queue_pump() {
        let (mut engine, _) = started(seeded());
        let tx = engine.sender();
        tx.send(EngineEvent::Tick(2500));
        tx.send(EngineEvent::Tap(CENTER));
        tx.send(EngineEvent::SpotTapped(SpotId(1)));
        assert_eq!(engine.pump(), 3);
        assert_eq!(engine.state().spots_touched, 2);
        assert_eq!(engine.pump(), 0);
    }

    #[test]
    fn test_same_seed_same_spots() {
        let run = || {
            let (mut engine, _) = started(seeded());
            engine.set_viewport(720.0, 1280.0);
            engine.tick(2500);
            engine
                .spots()
                .iter()
                .map(|s| (s.origin, s.destination, s.kind))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_tiny_viewport_pins_spawns() {
        let (mut engine, _) = started(seeded());
        engine.set_viewport(50.0, 50.0);
        let id = engine.spawn_spot();
        let spot = engine.spot(id).unwrap();
        assert_eq!(spot.origin, Vec2::ZERO);
        assert_eq!(spot.destination, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_hit_adds_five_times_level(taps in 0usize..40) {
            let (mut engine, _) = started(seeded());
            engine.tick(2500);
            for _ in 0..taps {
                let before = engine.state().clone();
                engine.on_tap(CENTER);
                let after = engine.state();
                prop_assert_eq!(after.score, before.score + 5 * before.level);
                prop_assert_eq!(after.spots_touched, before.spots_touched + 1);
                prop_assert!(after.lives <= 5);
            }
        }

        #[test]
        fn prop_background_tap_floors(hits in 0usize..25, slips in 1usize..6) {
            let (mut engine, _) = started(seeded());
            engine.tick(2500);
            for _ in 0..hits {
                engine.on_tap(CENTER);
            }
            for _ in 0..slips {
                let before = engine.state().clone();
                prop_assert_eq!(engine.on_tap(Vec2::new(195.0, 5.0)), TapOutcome::Miss);
                let expected = before.score.saturating_sub(15 * before.level);
                prop_assert_eq!(engine.state().score, expected);
                prop_assert_eq!(engine.state().lives, before.lives);
            }
        }
    }
}
