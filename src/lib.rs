#![forbid(unsafe_code)]

pub mod collect;
pub mod config;
pub mod error;
pub mod exif;
pub mod extract;
pub mod jfif;
pub mod kml;
pub mod parse;
pub mod pipeline;
pub mod reader;
pub mod record;
pub mod version;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{run, RunSummary};
pub use record::{PhotoRecord, SkipReason};

use jfif::{JFIFMarkerCode, ParseableSegment};

#[derive(Debug)]
pub struct JPEGFile {
    pub exif: Option<exif::ExifData>,
}

impl JPEGFile {
    /// Walk the segments of a JPEG file up to the start of the compressed scan, keeping the first
    /// Exif segment found on the way.
    pub fn parse(i: parse::Input) -> parse::Result<Self> {
        use nom::{combinator::verify, error::context};

        let (mut current_input, _) = context(
            "Start of image",
            verify(JFIFMarkerCode::parse, |&x| x == JFIFMarkerCode::SOI),
        )(i)?;

        let mut exif = None;
        while !current_input.is_empty() {
            let (_, magic) = context("Segment magic", JFIFMarkerCode::parse)(current_input)?;
            if magic == JFIFMarkerCode::SOS || magic == JFIFMarkerCode::EOI {
                break;
            }

            if exif.is_none() && exif::ExifData::can_parse_segment(current_input) {
                let (i, seg) = context("Exif segment", exif::ExifData::parse)(current_input)?;
                current_input = i;
                exif = Some(seg);
            } else {
                let (i, _seg) = context("Unknown JFIF segment", jfif::UnknownJFIFSegment::parse)(current_input)?;
                current_input = i;
            }
        }

        let file = JPEGFile { exif };
        Ok((current_input, file))
    }

    /// Returns `true` if the input starts with the JPEG start-of-image marker.
    pub fn is_jpeg(i: parse::Input) -> bool {
        i.starts_with(&JFIFMarkerCode::SOI.as_bytes())
    }
}

#[cfg(test)]
mod test {
    use super::JPEGFile;
    use crate::exif::IFDTag;

    #[rustfmt::skip]
    const TIFF: &[u8] = &[
        b'I', b'I', 0x2a, 0x00, 0x08, 0x00, 0x00, 0x00,
        0x01, 0x00,
        0x10, 0x01, 0x02, 0x00, 0x04, 0x00, 0x00, 0x00, b'X', b'1', 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
    ];

    fn segment(marker: u8, data: &[u8]) -> Vec<u8> {
        let mut seg = vec![0xff, marker];
        seg.extend_from_slice(&((data.len() + 2) as u16).to_be_bytes());
        seg.extend_from_slice(data);
        seg
    }

    #[test]
    fn test_parse_finds_exif_after_other_segments() {
        let mut data = vec![0xff, 0xd8];
        data.extend(segment(0xe0, b"JFIF\x00\x01\x02\x00\x00\x01\x00\x01\x00\x00"));
        data.extend(segment(0xfe, b"a comment"));
        data.extend(segment(0xe1, &[&b"Exif\x00\x00"[..], TIFF].concat()));
        data.extend(segment(0xda, b"\x00"));
        data.extend_from_slice(b"scan data that is never parsed\xff\xd9");

        assert!(JPEGFile::is_jpeg(&data));
        let (_, jpeg) = JPEGFile::parse(&data).unwrap();
        let exif = jpeg.exif.expect("exif segment");
        assert_eq!(exif.find(IFDTag::Model).and_then(|e| e.as_str()), Some("X1"));
    }

    #[test]
    fn test_parse_without_exif() {
        let mut data = vec![0xff, 0xd8];
        data.extend(segment(0xe1, b"http://ns.adobe.com/xap/1.0/\x00<x/>"));
        data.extend_from_slice(b"\xff\xd9");
        let (_, jpeg) = JPEGFile::parse(&data).unwrap();
        assert!(jpeg.exif.is_none());
    }

    #[test]
    fn test_parse_rejects_non_jpeg() {
        assert!(!JPEGFile::is_jpeg(b"\x89PNG\r\n\x1a\n"));
        assert!(JPEGFile::parse(b"\x89PNG\r\n\x1a\n").is_err());
    }
}
