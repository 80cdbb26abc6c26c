//! Reading the metadata fields a photo record is built from.
//!
//! `MetadataReader` is the seam between record extraction and the file format. `ExifReader`
//! handles JPEG files (via `JPEGFile`) and bare TIFF files.

use crate::{
    exif::{
        gps::{Rational, RawGpsTag},
        ExifData, IFDDataContents, IFDTag, MetadataField, TIFFHeader, IFD,
    },
    parse, JPEGFile,
};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("cannot read file: {0}")]
    Io(#[from] io::Error),

    #[error("not a JPEG or TIFF image")]
    NotAnImage,

    /// The container was recognized but its metadata could not be parsed.
    #[error("corrupt metadata: {0}")]
    Metadata(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Text(String),
    Gps(RawGpsTag),
}

/// The requested fields that were present in a file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagMap {
    values: HashMap<MetadataField, TagValue>,
}

impl TagMap {
    pub fn insert(&mut self, field: MetadataField, value: TagValue) {
        self.values.insert(field, value);
    }

    pub fn get(&self, field: MetadataField) -> Option<&TagValue> {
        self.values.get(&field)
    }

    /// Text value of `field`, trimmed of the padding cameras leave behind. Empty values count as
    /// absent.
    pub fn text(&self, field: MetadataField) -> Option<&str> {
        match self.get(field) {
            Some(TagValue::Text(s)) => Some(s.trim()).filter(|s| !s.is_empty()),
            _ => None,
        }
    }

    pub fn gps(&self) -> Option<&RawGpsTag> {
        match self.get(MetadataField::GpsInfo) {
            Some(TagValue::Gps(gps)) => Some(gps),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub trait MetadataReader {
    /// Read `fields` from the file at `path`. Fields the file doesn't carry are left out of the
    /// returned map.
    fn read_tags(&self, path: &Path, fields: &[MetadataField]) -> Result<TagMap, ReadError>;
}

/// Reads Exif metadata from JPEG and TIFF files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifReader;

impl MetadataReader for ExifReader {
    fn read_tags(&self, path: &Path, fields: &[MetadataField]) -> Result<TagMap, ReadError> {
        let data = fs::read(path)?;
        read_tags_from_bytes(&data, fields)
    }
}

/// Read `fields` from an in-memory JPEG or TIFF file.
pub fn read_tags_from_bytes(data: &[u8], fields: &[MetadataField]) -> Result<TagMap, ReadError> {
    let exif = if JPEGFile::is_jpeg(data) {
        match JPEGFile::parse(data) {
            Ok((_, jpeg)) => jpeg.exif,
            Err(e) => return Err(ReadError::Metadata(parse::pretty_error_message(data, e))),
        }
    } else if TIFFHeader::is_tiff(data) {
        match ExifData::from_tiff(data) {
            Ok((_, exif)) => Some(exif),
            Err(e) => return Err(ReadError::Metadata(parse::pretty_error_message(data, e))),
        }
    } else {
        return Err(ReadError::NotAnImage);
    };

    let mut tags = TagMap::default();
    let exif = match exif {
        Some(exif) => exif,
        None => return Ok(tags),
    };

    for &field in fields {
        let value = match field {
            MetadataField::GpsInfo => exif.gps().and_then(raw_gps_tag).map(TagValue::Gps),
            other => exif
                .find(other.tag())
                .and_then(|e| e.as_str())
                .map(|s| TagValue::Text(s.to_string())),
        };
        match value {
            Some(value) => tags.insert(field, value),
            None => trace!(%field, "field not present"),
        }
    }

    Ok(tags)
}

/// Collect the position entries of a GPS IFD. An IFD without both coordinates (some cameras
/// write an empty GPS block before they get a fix) yields nothing.
fn raw_gps_tag(gps: &IFD) -> Option<RawGpsTag> {
    let text = |tagtype| {
        gps.find(tagtype)
            .and_then(|e| e.as_str())
            .unwrap_or_default()
            .to_string()
    };
    let rationals = |tagtype| {
        gps.find(tagtype).map(|e| {
            e.content
                .iter()
                .filter_map(|c| match c {
                    IFDDataContents::UnsignedRational(n, d) => Some(Rational::new(*n, *d)),
                    _ => None,
                })
                .collect::<Vec<_>>()
        })
    };

    Some(RawGpsTag {
        latitude_ref: text(IFDTag::GPSLatitudeRef),
        latitude: rationals(IFDTag::GPSLatitude)?,
        longitude_ref: text(IFDTag::GPSLongitudeRef),
        longitude: rationals(IFDTag::GPSLongitude)?,
    })
}
