//! Photo records, skip reasons and chronological ordering.

use serde::Serialize;
use std::fmt;

/// Capture time used when a photo has none. Sorts before any real timestamp.
pub const MISSING_TIMESTAMP: &str = "1900:01:01 00:00:01";

/// Device model used when a photo has none.
pub const MISSING_MODEL: &str = "N/A";

/// `strftime` layout of an Exif capture time. Every field is fixed-width and zero-padded, so
/// string order is chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// One geotagged photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoRecord {
    pub file_name: String,
    pub longitude: f64,
    pub latitude: f64,
    /// Decimal places the coordinates were rounded to.
    pub precision: u32,
    pub timestamp: String,
    pub model: String,
}

impl PhotoRecord {
    /// `"lon, lat"` as fixed-point decimals at the record's precision.
    pub fn coordinates(&self) -> String {
        let p = self.precision as usize;
        format!("{:.*}, {:.*}", p, self.longitude, p, self.latitude)
    }
}

/// Why a file did not produce a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnreadableFile,
    NoGeotag,
}

impl SkipReason {
    /// Whether the file was at least recognized as an image.
    pub fn is_image(self) -> bool {
        matches!(self, SkipReason::NoGeotag)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkipReason::UnreadableFile => f.write_str("not a readable image"),
            SkipReason::NoGeotag => f.write_str("no GPS metadata"),
        }
    }
}

/// A skipped file and the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub file_name: String,
    pub reason: SkipReason,
}

/// Stable sort by capture time. Photos taken at the same second keep their input order.
pub fn sort_chronologically(mut records: Vec<PhotoRecord>) -> Vec<PhotoRecord> {
    records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    records
}
