use crate::audio::SourceId;
use crate::game::ObjectId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset type `{0}` does not exist")]
    UnknownKind(String),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("unknown audio source {0:?}")]
    UnknownSource(SourceId),
    #[error("failed to load {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },
    #[error("audio backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error("no object with id {0:?}")]
    UnknownObject(ObjectId),
    #[error("failed to present frame: {0}")]
    Present(#[from] softbuffer::SoftBufferError),
    #[error("failed to write frame: {0}")]
    Image(#[from] image::ImageError),
}
