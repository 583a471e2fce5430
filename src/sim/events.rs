//! Input events funnelled to the engine
//!
//! Hosts whose callbacks arrive on other threads (platform animators, audio
//! or lifecycle callbacks) post `EngineEvent`s through an `EventSender`. The
//! engine drains them on its own thread, so game state has a single writer.

use std::sync::mpsc::{self, Receiver, Sender};

use glam::Vec2;

use super::state::SpotId;

/// Something the outside world tells the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// Tap at a playfield position; the engine hit-tests it
    Tap(Vec2),
    /// The presentation layer already resolved a tap to this spot
    SpotTapped(SpotId),
    /// An external animator finished this spot's animation
    AnimationFinished(SpotId),
    /// Host went to the background
    Pause,
    /// Host came back to the foreground
    Resume,
    /// Player dismissed the game-over prompt
    AcknowledgeGameOver,
    /// Playfield size changed
    Resize { width: f32, height: f32 },
    /// Advance time by this many milliseconds
    Tick(u64),
}

/// Cloneable producer side of the queue
#[derive(Debug, Clone)]
pub struct EventSender(Sender<EngineEvent>);

impl EventSender {
    /// Post an event. Returns false once the engine is gone.
    pub fn send(&self, event: EngineEvent) -> bool {
        self.0.send(event).is_ok()
    }
}

/// Consumer side, owned by the engine
#[derive(Debug)]
pub struct EventQueue {
    tx: Sender<EngineEvent>,
    rx: Receiver<EngineEvent>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> EventSender {
        EventSender(self.tx.clone())
    }

    /// Take everything posted so far, in arrival order
    pub fn drain(&self) -> Vec<EngineEvent> {
        self.rx.try_iter().collect()
    }
}
