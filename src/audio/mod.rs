//! Audio output abstraction used for spatial sound effects and music.

#[cfg(feature = "kira")]
mod kira_backend;

#[cfg(feature = "kira")]
pub use kira_backend::KiraAudio;

use crate::core::AudioError;
use std::path::{Path, PathBuf};

/// Handle for a sound loaded into an [`AudioOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub usize);

/// A device that can load a sound file, route it to its output and play or
/// stop it. Volume is linear amplitude in `0.0..=1.0`.
pub trait AudioOutput {
    /// Loads `path` and connects it to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded.
    fn create_source(&mut self, path: &Path) -> Result<SourceId, AudioError>;

    /// Starts (or restarts) playback of `source`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown sources or backend failures.
    fn play(&mut self, source: SourceId, volume: f32) -> Result<(), AudioError>;

    /// # Errors
    ///
    /// Returns an error for unknown sources or backend failures.
    fn stop(&mut self, source: SourceId) -> Result<(), AudioError>;
}

/// One playback request seen by [`NullAudio`].
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    pub source: SourceId,
    pub path: PathBuf,
    pub volume: f32,
}

/// Output that never makes a sound. It remembers every source it was asked
/// to create and every playback request, which is enough for headless runs.
#[derive(Debug, Default)]
pub struct NullAudio {
    sources: Vec<PathBuf>,
    history: Vec<Playback>,
    stopped: Vec<SourceId>,
}

impl NullAudio {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn history(&self) -> &[Playback] {
        &self.history
    }

    #[must_use]
    pub fn stopped(&self) -> &[SourceId] {
        &self.stopped
    }

    fn path_of(&self, source: SourceId) -> Result<&PathBuf, AudioError> {
        self.sources
            .get(source.0)
            .ok_or(AudioError::UnknownSource(source))
    }
}

impl AudioOutput for NullAudio {
    fn create_source(&mut self, path: &Path) -> Result<SourceId, AudioError> {
        self.sources.push(path.to_path_buf());
        let id = SourceId(self.sources.len() - 1);
        log::debug!("Created silent source {:?} for {}", id, path.display());
        Ok(id)
    }

    fn play(&mut self, source: SourceId, volume: f32) -> Result<(), AudioError> {
        let path = self.path_of(source)?.clone();
        log::trace!("Silent playback of {} at volume {volume:.3}", path.display());
        self.history.push(Playback {
            source,
            path,
            volume,
        });
        Ok(())
    }

    fn stop(&mut self, source: SourceId) -> Result<(), AudioError> {
        self.path_of(source)?;
        self.stopped.push(source);
        Ok(())
    }
}

/// Creates a fresh source for `file` and plays it at full volume.
///
/// # Errors
///
/// Returns an error if the source cannot be created or played.
pub fn play_full_volume(audio: &mut dyn AudioOutput, file: &Path) -> Result<SourceId, AudioError> {
    let source = audio.create_source(file)?;
    audio.play(source, 1.0)?;
    log::debug!("Playing {} at full volume", file.display());
    Ok(source)
}

/// Linear falloff: full volume at the listener, silent at `max_distance` and
/// beyond.
#[must_use]
pub fn distance_attenuation(distance: f32, max_distance: f32) -> f32 {
    1.0 - (distance / max_distance).min(1.0)
}
