//! The whole run: enumerate, extract, sort, build, serialize, write.

use crate::{
    collect::{candidate_files, RecordCollector},
    config::Config,
    error::{Error, Result},
    extract::MetadataExtractor,
    kml::{DocumentBuilder, DocumentSerializer, KmlWriter},
    reader::{ExifReader, MetadataReader},
    record::sort_chronologically,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub markers: usize,
    pub skipped: usize,
}

/// Map the photos in `dir` with the Exif reader and KML writer.
pub fn run(config: &Config, dir: &Path) -> Result<RunSummary> {
    run_with(config, dir, ExifReader, &KmlWriter)
}

/// Map the photos in `dir`. Nothing is written unless every step succeeds.
pub fn run_with<R, S>(config: &Config, dir: &Path, reader: R, serializer: &S) -> Result<RunSummary>
where
    R: MetadataReader,
    S: DocumentSerializer,
{
    config.validate()?;
    let builder = DocumentBuilder::new(&config.trip_label, &config.icon)?;

    let files = candidate_files(dir)?;
    let collector = RecordCollector::new(MetadataExtractor::new(reader, config.time_field.into()));
    let collection = collector.collect(&files)?;
    let skipped = collection.skipped.len();
    let records = sort_chronologically(collection.into_records(dir)?);

    let document = builder.build(&records);
    let bytes = serializer.serialize(&document)?;

    let output = config.output_path();
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(&output, bytes).map_err(|e| Error::io(&output, e))?;

    info!(
        markers = records.len(),
        skipped,
        output = %output.display(),
        "wrote trip document"
    );
    Ok(RunSummary {
        output,
        markers: records.len(),
        skipped,
    })
}
