use super::{AudioOutput, SourceId};
use crate::core::AudioError;
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    tween::Tween,
    Volume,
};
use std::path::Path;

struct LoadedSound {
    data: StaticSoundData,
    handle: Option<StaticSoundHandle>,
}

/// [`AudioOutput`] that plays through the default system device.
pub struct KiraAudio {
    manager: AudioManager,
    sounds: Vec<LoadedSound>,
}

impl KiraAudio {
    /// # Errors
    ///
    /// Returns an error if the audio device cannot be opened.
    pub fn new() -> Result<Self, AudioError> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| AudioError::Backend(format!("failed to create audio manager: {e:?}")))?;
        log::info!("Audio output initialised");
        Ok(Self {
            manager,
            sounds: Vec::new(),
        })
    }

    fn sound_mut(&mut self, source: SourceId) -> Result<&mut LoadedSound, AudioError> {
        self.sounds
            .get_mut(source.0)
            .ok_or(AudioError::UnknownSource(source))
    }
}

impl AudioOutput for KiraAudio {
    fn create_source(&mut self, path: &Path) -> Result<SourceId, AudioError> {
        let data = StaticSoundData::from_file(path).map_err(|e| AudioError::Load {
            path: path.to_path_buf(),
            reason: format!("{e:?}"),
        })?;
        self.sounds.push(LoadedSound { data, handle: None });
        log::debug!("Loaded sound {}", path.display());
        Ok(SourceId(self.sounds.len() - 1))
    }

    fn play(&mut self, source: SourceId, volume: f32) -> Result<(), AudioError> {
        let settings = StaticSoundSettings::new().volume(Volume::Amplitude(f64::from(volume)));
        let data = self.sound_mut(source)?.data.clone().with_settings(settings);
        let handle = self
            .manager
            .play(data)
            .map_err(|e| AudioError::Backend(format!("failed to play sound: {e:?}")))?;
        self.sound_mut(source)?.handle = Some(handle);
        Ok(())
    }

    fn stop(&mut self, source: SourceId) -> Result<(), AudioError> {
        if let Some(mut handle) = self.sound_mut(source)?.handle.take() {
            let _ = handle.stop(Tween::default());
        }
        Ok(())
    }
}
