//! Run-level errors. Per-file problems that only cost one photo are `SkipReason`s instead.

use crate::exif::gps::GpsError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Nothing in the input directory could be opened as an image.
    #[error("no image files found in {}", .dir.display())]
    NoFilesFound { dir: PathBuf },

    /// Images were found but none of them carries GPS metadata.
    #[error("none of the {images} image(s) in {} carries GPS metadata", .dir.display())]
    NoGeotagsFound { dir: PathBuf, images: usize },

    /// A converted coordinate lies outside [-90, 90] x [-180, 180].
    #[error("{file}: coordinates out of range (latitude {latitude}, longitude {longitude})")]
    OutOfRange {
        file: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("{file}: malformed GPS metadata: {source}")]
    MalformedGps {
        file: String,
        #[source]
        source: GpsError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to serialize document: {0}")]
    Serialize(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
