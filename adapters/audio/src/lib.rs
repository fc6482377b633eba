#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Audio collaborator contract keyed by effect name.

use asteroids_core::SoundEffect;
use log::trace;

/// Fire-and-forget sink for sound effect requests.
///
/// Implementations never block the simulation and never report failures.
pub trait AudioSink {
    /// Starts playing the effect, restarting it if it is already playing.
    fn play(&mut self, effect: SoundEffect);

    /// Stops the effect if it is playing.
    fn stop(&mut self, effect: SoundEffect);
}

/// Sink that discards every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}

    fn stop(&mut self, _effect: SoundEffect) {}
}

/// Sink that traces requests through the `log` facade.
///
/// Used by backends compiled without an audio device.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingAudio;

impl AudioSink for LoggingAudio {
    fn play(&mut self, effect: SoundEffect) {
        trace!("play {}", effect.name());
    }

    fn stop(&mut self, effect: SoundEffect) {
        trace!("stop {}", effect.name());
    }
}

/// Audio request captured by [`RecordingAudio`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioRequest {
    /// The effect was started.
    Play(SoundEffect),
    /// The effect was stopped.
    Stop(SoundEffect),
}

/// Sink that records every request for later inspection.
#[derive(Clone, Debug, Default)]
pub struct RecordingAudio {
    requests: Vec<AudioRequest>,
}

impl RecordingAudio {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> &[AudioRequest] {
        &self.requests
    }

    /// Number of times the effect was started.
    #[must_use]
    pub fn plays(&self, effect: SoundEffect) -> usize {
        self.requests
            .iter()
            .filter(|request| **request == AudioRequest::Play(effect))
            .count()
    }

    /// Removes and returns the recorded requests.
    pub fn take(&mut self) -> Vec<AudioRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.requests.push(AudioRequest::Play(effect));
    }

    fn stop(&mut self, effect: SoundEffect) {
        self.requests.push(AudioRequest::Stop(effect));
    }
}

impl<T: AudioSink + ?Sized> AudioSink for Box<T> {
    fn play(&mut self, effect: SoundEffect) {
        (**self).play(effect);
    }

    fn stop(&mut self, effect: SoundEffect) {
        (**self).stop(effect);
    }
}
