//! Sound cue playback
//!
//! The engine only decides *which* cue plays; decoding and mixing belong to a
//! platform `CuePlayer`. The `AudioManager` owns the player and tracks whether
//! it is currently acquired, so cues issued while released are dropped.

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Spot tapped
    Hit,
    /// Tap on empty space
    Miss,
    /// Spot finished its animation untouched
    Disappear,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Hit => "hit",
            SoundCue::Miss => "miss",
            SoundCue::Disappear => "disappear",
        }
    }
}

/// Platform audio backend
pub trait CuePlayer {
    /// Open the underlying audio resource. Returns false when unavailable.
    fn acquire(&mut self) -> bool {
        true
    }

    /// Close the underlying audio resource
    fn release(&mut self) {}

    /// Play a cue at `volume` (0.0 - 1.0)
    fn play(&mut self, cue: SoundCue, volume: f32);
}

/// Backend that only logs cues (headless hosts)
#[derive(Debug, Default)]
pub struct LogCuePlayer;

impl CuePlayer for LogCuePlayer {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        log::debug!("Cue {} at volume {:.2}", cue.as_str(), volume);
    }
}

/// Backend that plays nothing
#[derive(Debug, Default)]
pub struct SilentCuePlayer;

impl CuePlayer for SilentCuePlayer {
    fn play(&mut self, _cue: SoundCue, _volume: f32) {}
}

/// Audio manager for the game
pub struct AudioManager {
    player: Box<dyn CuePlayer>,
    acquired: bool,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(SilentCuePlayer))
    }
}

impl AudioManager {
    /// Wrap a backend. The resource starts released.
    pub fn new(player: Box<dyn CuePlayer>) -> Self {
        Self {
            player,
            acquired: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Open the audio resource if it is not already open
    pub fn acquire(&mut self) {
        if self.acquired {
            return;
        }
        self.acquired = self.player.acquire();
        if !self.acquired {
            log::warn!("Audio backend unavailable - cues disabled");
        }
    }

    /// Close the audio resource; cues are skipped until `acquire`
    pub fn release(&mut self) {
        if self.acquired {
            self.player.release();
            self.acquired = false;
        }
    }

    /// Whether cues currently reach the backend
    pub fn is_available(&self) -> bool {
        self.acquired
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a cue; silently skipped while released or muted
    pub fn play(&mut self, cue: SoundCue) {
        if !self.acquired {
            log::trace!("Skipping cue {} (audio released)", cue.as_str());
            return;
        }
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.player.play(cue, vol);
    }
}
