//! Running the extractor over a set of files.

use crate::{
    error::{Error, Result},
    extract::{display_name, MetadataExtractor},
    reader::MetadataReader,
    record::{PhotoRecord, Skipped},
};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Records and skipped files from one pass over the input, in enumeration order.
#[derive(Debug, Default)]
pub struct Collection {
    pub records: Vec<PhotoRecord>,
    pub skipped: Vec<Skipped>,
    /// Whether at least one file was recognized as an image, geotagged or not.
    pub any_file_seen: bool,
}

impl Collection {
    /// Number of files recognized as images.
    pub fn images(&self) -> usize {
        self.records.len() + self.skipped.iter().filter(|s| s.reason.is_image()).count()
    }

    /// The records, or the run-level error for an input with no images or no geotags.
    pub fn into_records(self, dir: &Path) -> Result<Vec<PhotoRecord>> {
        if !self.any_file_seen {
            return Err(Error::NoFilesFound {
                dir: dir.to_path_buf(),
            });
        }
        if self.records.is_empty() {
            return Err(Error::NoGeotagsFound {
                dir: dir.to_path_buf(),
                images: self.images(),
            });
        }
        Ok(self.records)
    }
}

pub struct RecordCollector<R> {
    extractor: MetadataExtractor<R>,
}

impl<R: MetadataReader> RecordCollector<R> {
    pub fn new(extractor: MetadataExtractor<R>) -> Self {
        RecordCollector { extractor }
    }

    /// Extract every path in order. Stops at the first run-level error.
    pub fn collect<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Collection> {
        let mut collection = Collection::default();
        for path in paths {
            let path = path.as_ref();
            match self.extractor.extract(path)? {
                Ok(record) => {
                    collection.any_file_seen = true;
                    collection.records.push(record);
                }
                Err(reason) => {
                    collection.any_file_seen |= reason.is_image();
                    collection.skipped.push(Skipped {
                        file_name: display_name(path),
                        reason,
                    });
                }
            }
        }

        debug!(
            records = collection.records.len(),
            skipped = collection.skipped.len(),
            "collected"
        );
        Ok(collection)
    }
}

/// The regular files directly inside `dir`, sorted by name.
pub fn candidate_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::io(dir, e.into()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
