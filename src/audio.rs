//! Audio cues
//!
//! The simulation never talks to a sound device. It emits fire-and-forget
//! [`AudioCue`]s as events; the host forwards them to an [`AudioBackend`]
//! through [`AudioManager`], which applies volumes and mute.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Entity caught in the matching bin
    Correct,
    /// Entity caught in the wrong bin
    Wrong,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Correct => "correct",
            SoundEffect::Wrong => "wrong",
        }
    }
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicTrack {
    Menu,
    Gameplay,
    GameOver,
}

impl MusicTrack {
    pub fn as_str(&self) -> &'static str {
        match self {
            MusicTrack::Menu => "menu-music",
            MusicTrack::Gameplay => "gameplay-music",
            MusicTrack::GameOver => "gameover-music",
        }
    }

    /// Relative loudness the track is mixed at (game over is a loud one-shot)
    pub fn gain(&self) -> f32 {
        match self {
            MusicTrack::Menu | MusicTrack::Gameplay => 0.25,
            MusicTrack::GameOver => 1.0,
        }
    }

    /// Whether the track loops until replaced
    pub fn looping(&self) -> bool {
        !matches!(self, MusicTrack::GameOver)
    }
}

/// A cue emitted by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    Sfx(SoundEffect),
    Music(MusicTrack),
}

impl AudioCue {
    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Sfx(effect) => effect.as_str(),
            AudioCue::Music(track) => track.as_str(),
        }
    }
}

/// Output device seam
pub trait AudioBackend {
    fn play_sound(&mut self, effect: SoundEffect, volume: f32);
    fn play_music(&mut self, track: MusicTrack, volume: f32, looping: bool);
}

/// Backend that only logs (headless runs)
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play_sound(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {} @ {:.2}", effect.as_str(), volume);
    }

    fn play_music(&mut self, track: MusicTrack, volume: f32, looping: bool) {
        log::debug!("music {} @ {:.2} (looping: {})", track.as_str(), volume, looping);
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend = LogBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    current_track: Option<MusicTrack>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(LogBackend)
    }
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
            current_track: None,
        }
    }

    /// Pick up volumes and mute from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_music_volume(settings.music_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Track most recently started
    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current_track
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn effective(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Forward a cue to the backend
    pub fn dispatch(&mut self, cue: AudioCue) {
        match cue {
            AudioCue::Sfx(effect) => {
                let vol = self.effective(self.sfx_volume);
                if vol > 0.0 {
                    self.backend.play_sound(effect, vol);
                }
            }
            AudioCue::Music(track) => {
                // Music keeps its slot even when muted so unmuting is consistent
                self.current_track = Some(track);
                let vol = self.effective(self.music_volume) * track.gain();
                self.backend.play_music(track, vol, track.looping());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        sounds: Vec<(SoundEffect, f32)>,
        music: Vec<(MusicTrack, f32, bool)>,
    }

    impl AudioBackend for Recorder {
        fn play_sound(&mut self, effect: SoundEffect, volume: f32) {
            self.sounds.push((effect, volume));
        }

        fn play_music(&mut self, track: MusicTrack, volume: f32, looping: bool) {
            self.music.push((track, volume, looping));
        }
    }

    #[test]
    fn test_dispatch_applies_volume() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(0.5);
        audio.dispatch(AudioCue::Sfx(SoundEffect::Correct));
        assert_eq!(audio.backend().sounds, vec![(SoundEffect::Correct, 0.25)]);
    }

    #[test]
    fn test_muted_drops_sfx_but_tracks_music() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_muted(true);
        audio.dispatch(AudioCue::Sfx(SoundEffect::Wrong));
        audio.dispatch(AudioCue::Music(MusicTrack::GameOver));
        assert!(audio.backend().sounds.is_empty());
        assert_eq!(audio.current_track(), Some(MusicTrack::GameOver));
        assert_eq!(audio.backend().music, vec![(MusicTrack::GameOver, 0.0, false)]);
    }

    #[test]
    fn test_settings_mute_silences_sfx() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.apply_settings(&Settings {
            muted: true,
            ..Default::default()
        });
        audio.dispatch(AudioCue::Sfx(SoundEffect::Correct));
        assert!(audio.backend().sounds.is_empty());
    }

    #[test]
    fn test_cue_names() {
        assert_eq!(AudioCue::Sfx(SoundEffect::Correct).name(), "correct");
        assert_eq!(AudioCue::Music(MusicTrack::Menu).name(), "menu-music");
    }
}
