//! Sound cues
//!
//! The simulations announce cues fire-and-forget through [`AudioCues`]; they
//! never wait on or inspect the outcome. Device playback is the host's job:
//! [`AudioManager`] applies volume and mute, then forwards to an
//! [`AudioBackend`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::settings::AudioSettings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Snake eats normal food
    SnakeEat,
    /// Snake eats any special food
    SnakeSpecialFood,
    /// Snake died or the AI won the match
    GameOver,
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits top/bottom wall
    WallBounce,
    /// Ball left the court
    Goal,
    /// Player won the match
    Victory,
}

impl SoundEffect {
    /// Sample asset the host is expected to bind to this cue
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::SnakeEat | SoundEffect::PaddleHit | SoundEffect::WallBounce => {
                "ball-tap.wav"
            }
            SoundEffect::SnakeSpecialFood => "bonus-earned.wav",
            SoundEffect::GameOver => "player-losing.wav",
            SoundEffect::Goal => "winning-a-coin.wav",
            SoundEffect::Victory => "level-completed.wav",
        }
    }

    /// Per-cue mix level; frequent cues sit lower
    pub fn base_gain(&self) -> f32 {
        match self {
            SoundEffect::WallBounce => 0.5,
            SoundEffect::PaddleHit | SoundEffect::SnakeEat => 0.8,
            _ => 1.0,
        }
    }
}

pub trait AudioCues {
    fn play(&mut self, effect: SoundEffect);
}

impl<T: AudioCues> AudioCues for Rc<RefCell<T>> {
    fn play(&mut self, effect: SoundEffect) {
        self.borrow_mut().play(effect)
    }
}

/// Discards every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioCues for SilentAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Device-facing sink. Implementations must not block and must swallow their
/// own failures.
pub trait AudioBackend {
    fn emit(&mut self, effect: SoundEffect, volume: f32);
}

/// Backend that only logs, for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn emit(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("cue {:?} ({}) at {:.2}", effect, effect.asset_name(), volume);
    }
}

/// Audio manager for the arcade
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self::from_settings(&AudioSettings::default(), backend)
    }

    pub fn from_settings(settings: &AudioSettings, backend: B) -> Self {
        Self {
            backend,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: AudioBackend> AudioCues for AudioManager<B> {
    fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume() * effect.base_gain();
        if vol <= 0.0 {
            return;
        }
        self.backend.emit(effect, vol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Capture(Vec<(SoundEffect, f32)>);

    impl AudioBackend for Capture {
        fn emit(&mut self, effect: SoundEffect, volume: f32) {
            self.0.push((effect, volume));
        }
    }

    #[test]
    fn test_volume_scales_cues() {
        let mut audio = AudioManager::new(Capture::default());
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(1.0);
        audio.play(SoundEffect::Goal);
        audio.play(SoundEffect::WallBounce);
        let played = &audio.backend().0;
        assert_eq!(played.len(), 2);
        assert!((played[0].1 - 0.5).abs() < 1e-6);
        assert!((played[1].1 - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_muted_drops_cues() {
        let mut audio = AudioManager::new(Capture::default());
        audio.set_muted(true);
        audio.play(SoundEffect::Victory);
        assert!(audio.backend().0.is_empty());
        assert_eq!(audio.effective_volume(), 0.0);
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut audio = AudioManager::new(Capture::default());
        audio.set_master_volume(3.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_sfx_volume(1.0);
        assert_eq!(audio.effective_volume(), 1.0);
    }

    #[test]
    fn test_settings_seed_manager() {
        let settings = AudioSettings {
            master_volume: 0.8,
            sfx_volume: 0.5,
            muted: false,
            ..Default::default()
        };
        let audio = AudioManager::from_settings(&settings, Capture::default());
        assert!((audio.effective_volume() - 0.4).abs() < 1e-6);
    }
}
