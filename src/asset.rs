//! Model and audio asset references.
//!
//! Models are read as raw text and never parsed.

use crate::audio::{AudioOutput, SourceId};
use crate::core::{AssetError, AudioError};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Model,
    Audio,
}

impl FromStr for AssetKind {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "model" => Ok(Self::Model),
            "audio" => Ok(Self::Audio),
            other => {
                log::error!("Asset type `{other}` does not exist");
                Err(AssetError::UnknownKind(other.to_string()))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Asset {
    pub kind: AssetKind,
    pub path: PathBuf,
    /// Raw text of a loaded model. `None` for audio assets and for model
    /// paths without an `.obj` extension.
    pub contents: Option<String>,
}

impl Asset {
    /// Loads an asset of the named kind (`"model"` or `"audio"`).
    ///
    /// # Errors
    ///
    /// Returns an error for unknown kinds or unreadable model files.
    pub fn load(kind: &str, path: impl AsRef<Path>) -> Result<Self, AssetError> {
        match kind.parse()? {
            AssetKind::Model => Self::model(path),
            AssetKind::Audio => Ok(Self::audio(path)),
        }
    }

    /// Reads an `.obj` file's text. Any other extension yields an empty asset.
    ///
    /// # Errors
    ///
    /// Returns an error if an `.obj` file cannot be read.
    pub fn model(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let is_obj = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));

        let contents = if is_obj {
            let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            log::debug!("Loaded model {} ({} bytes)", path.display(), text.len());
            Some(text)
        } else {
            log::debug!("Skipping non-.obj model {}", path.display());
            None
        };

        Ok(Self {
            kind: AssetKind::Model,
            path: path.to_path_buf(),
            contents,
        })
    }

    #[must_use]
    pub fn audio(path: impl AsRef<Path>) -> Self {
        Self {
            kind: AssetKind::Audio,
            path: path.as_ref().to_path_buf(),
            contents: None,
        }
    }

    /// Creates a playable source for an audio asset.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot load the file.
    pub fn create_source(&self, audio: &mut dyn AudioOutput) -> Result<SourceId, AudioError> {
        audio.create_source(&self.path)
    }
}
