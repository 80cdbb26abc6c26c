//! Traits and functions for walking the segments of a JPEG (JFIF) file.

mod marker_codes;

pub use marker_codes::JFIFMarkerCode;
use crate::parse;
use nom::error::context;

pub trait ParseableSegment {
    /// Parse the data bytes of the JFIF segment, returning a new instance of the
    /// `ParseableSegment` implementor. `magic` contains the marker bytes for the segment.
    fn parse_data_bytes(i: parse::Input, magic: JFIFMarkerCode) -> parse::Result<Self>
    where
        Self: Sized;

    /// Parse the JFIF segment starting from the segment marker.
    fn parse(i: parse::Input) -> parse::Result<Self>
    where
        Self: Sized,
    {
        use nom::{bytes::complete::take, combinator::verify, number::complete::be_u16};

        let (i, magic) = context("Segment magic", JFIFMarkerCode::parse)(i)?;

        let (i, data) = if magic.is_standalone() {
            (i, &i[0..0])
        } else {
            // The stored size includes the two size bytes themselves, so it must be >= 2 and the
            // data section is two bytes shorter.
            let mut parser = context("Data section size", verify(be_u16, |&x| x >= 2));
            let (i, data_size) = parser(i)?;
            context("Data section", take((data_size - 2) as usize))(i)?
        };

        let (_, result) = context("Data section parser", |x| Self::parse_data_bytes(x, magic))(data)?;
        Ok((i, result))
    }
}

/// A segment we walk over without interpreting its data section.
#[derive(Debug)]
pub struct UnknownJFIFSegment {
    pub magic: JFIFMarkerCode,
}

impl ParseableSegment for UnknownJFIFSegment {
    fn parse_data_bytes(i: parse::Input, magic: JFIFMarkerCode) -> parse::Result<Self> {
        Ok((i, UnknownJFIFSegment { magic }))
    }
}

#[cfg(test)]
mod test {
    use super::{JFIFMarkerCode, ParseableSegment, UnknownJFIFSegment};

    #[test]
    fn test_skip_segment_with_length() {
        // APP0 segment with three data bytes, followed by the next marker
        let data = b"\xff\xe0\x00\x05abc\xff\xd9";
        let (rest, seg) = UnknownJFIFSegment::parse(data).unwrap();
        assert_eq!(seg.magic, JFIFMarkerCode::APPm(0));
        assert_eq!(rest, b"\xff\xd9");
    }

    #[test]
    fn test_standalone_marker_has_no_length() {
        let data = b"\xff\xd8\xff\xe1";
        let (rest, seg) = UnknownJFIFSegment::parse(data).unwrap();
        assert_eq!(seg.magic, JFIFMarkerCode::SOI);
        assert_eq!(rest, b"\xff\xe1");
    }

    #[test]
    fn test_truncated_segment_is_an_error() {
        let data = b"\xff\xe1\x00\x10abc";
        assert!(UnknownJFIFSegment::parse(data).is_err());
    }
}
