//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `GameEngine::tick`
//! - Seeded RNG only
//! - Stable iteration order (spots oldest first, timers by due time)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod engine;
pub mod events;
pub mod state;
pub mod timeline;

pub use autoplay::Autoplay;
pub use engine::{GameEngine, Ports, TapOutcome};
pub use events::{EngineEvent, EventQueue, EventSender};
pub use state::{GamePhase, GameState, Spot, SpotId, SpotKind, SpotState};
pub use timeline::{Fired, TaskHandle, TimedTask, Timeline};
