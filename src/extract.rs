//! Turning one file's metadata into a `PhotoRecord`.

use crate::{
    error::{Error, Result},
    exif::{gps::GpsError, MetadataField},
    reader::{MetadataReader, ReadError, TagMap},
    record::{PhotoRecord, SkipReason, MISSING_MODEL, MISSING_TIMESTAMP, TIMESTAMP_FORMAT},
};
use chrono::NaiveDateTime;
use std::path::Path;
use tracing::{debug, warn};

/// What extracting one file produced. The outer `Result` carries run-level errors, the inner
/// one separates records from skipped files.
pub type Extraction = Result<std::result::Result<PhotoRecord, SkipReason>>;

pub struct MetadataExtractor<R> {
    reader: R,
    time_field: MetadataField,
}

impl<R: MetadataReader> MetadataExtractor<R> {
    /// `time_field` is the field the capture time is read from (`DateTime` or
    /// `DateTimeOriginal`).
    pub fn new(reader: R, time_field: MetadataField) -> Self {
        MetadataExtractor { reader, time_field }
    }

    /// The fields requested from the reader for every file.
    pub fn fields(&self) -> [MetadataField; 3] {
        [MetadataField::GpsInfo, self.time_field, MetadataField::Model]
    }

    pub fn extract(&self, path: &Path) -> Extraction {
        let file_name = display_name(path);
        debug!(file = %file_name, "reading metadata");

        let tags = match self.reader.read_tags(path, &self.fields()) {
            Ok(tags) => tags,
            Err(ReadError::Metadata(e)) => {
                warn!(file = %file_name, "unreadable metadata, skipping: {}", e);
                return Ok(Err(SkipReason::NoGeotag));
            }
            Err(e) => {
                warn!(file = %file_name, "skipping: {}", e);
                return Ok(Err(SkipReason::UnreadableFile));
            }
        };

        record_from_tags(&file_name, &tags, self.time_field)
    }
}

/// Build a record from tags already read from a file.
pub fn record_from_tags(file_name: &str, tags: &TagMap, time_field: MetadataField) -> Extraction {
    let gps = match tags.gps() {
        Some(gps) => gps,
        None => {
            warn!(file = %file_name, "no GPS metadata, skipping");
            return Ok(Err(SkipReason::NoGeotag));
        }
    };

    let position = match gps.position() {
        Ok(position) => position,
        Err(source @ GpsError::ZeroDenominator(_)) => {
            return Err(Error::MalformedGps {
                file: file_name.to_string(),
                source,
            })
        }
        Err(e) => {
            warn!(file = %file_name, "incomplete GPS metadata ({}), skipping", e);
            return Ok(Err(SkipReason::NoGeotag));
        }
    };
    if position.latitude.abs() > 90. || position.longitude.abs() > 180. {
        return Err(Error::OutOfRange {
            file: file_name.to_string(),
            latitude: position.latitude,
            longitude: position.longitude,
        });
    }

    let timestamp = capture_time(file_name, tags, time_field);
    let model = match tags.text(MetadataField::Model) {
        Some(model) => model.to_string(),
        None => {
            warn!(file = %file_name, "no device model, using {:?}", MISSING_MODEL);
            MISSING_MODEL.to_string()
        }
    };

    Ok(Ok(PhotoRecord {
        file_name: file_name.to_string(),
        longitude: position.longitude,
        latitude: position.latitude,
        precision: position.precision,
        timestamp,
        model,
    }))
}

/// Capture time in canonical `YYYY:MM:DD HH:MM:SS` form, or the sentinel when the field is
/// missing or not a valid time.
fn capture_time(file_name: &str, tags: &TagMap, field: MetadataField) -> String {
    let raw = match tags.text(field) {
        Some(raw) => raw,
        None => {
            warn!(file = %file_name, "no {} tag, using {}", field, MISSING_TIMESTAMP);
            return MISSING_TIMESTAMP.to_string();
        }
    };

    match NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        Ok(time) => time.format(TIMESTAMP_FORMAT).to_string(),
        Err(e) => {
            warn!(file = %file_name, value = raw, "invalid {} ({}), using {}", field, e, MISSING_TIMESTAMP);
            MISSING_TIMESTAMP.to_string()
        }
    }
}

/// The file name stored in a record: the directory entry name, without the input directory.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
