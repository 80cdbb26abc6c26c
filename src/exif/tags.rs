//! Provides the IFDTag enum, which specifies the IFD tags the Exif parser decodes, and the
//! `MetadataField` lookup from symbolic field names to those tags.

use crate::{exif::TIFFByteAlignment, parse};
use derive_try_from_primitive::TryFromPrimitive;
use nom::error::context;
use std::fmt;

#[derive(Debug, Clone, Copy, TryFromPrimitive, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum IFDTag {
    // Catch-all tag for entry types we don't decode
    Unknown = 0xffff,

    // GPS IFD tags, see https://www.exiftool.org/TagNames/GPS.html
    GPSLatitudeRef = 0x0001,
    GPSLatitude = 0x0002,
    GPSLongitudeRef = 0x0003,
    GPSLongitude = 0x0004,

    // IFD0 / Exif IFD tags, see https://www.exiftool.org/TagNames/EXIF.html
    Model = 0x0110,
    DateTime = 0x0132,
    ExifOffset = 0x8769,
    GPSInfo = 0x8825,
    DateTimeOriginal = 0x9003,
}

impl IFDTag {
    /// Parse an IFD tag. If the tag type is unknown, replace it with `IFDTag::Unknown`.
    pub fn parse_unknown(i: parse::Input, alignment: TIFFByteAlignment) -> parse::Result<Self> {
        let (i, tag) = context("IFDTag", |x| alignment.parse_u16(x))(i)?;
        Ok((i, Self::try_from(tag).unwrap_or(IFDTag::Unknown)))
    }

    /// Returns `true` if the entry's value is an offset to a nested IFD.
    pub fn is_subifd_pointer(self) -> bool {
        matches!(self, IFDTag::ExifOffset | IFDTag::GPSInfo)
    }
}

/// The metadata fields a photo record can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataField {
    GpsInfo,
    DateTime,
    DateTimeOriginal,
    Model,
}

impl MetadataField {
    /// Numeric IFD tag the field is stored under.
    pub const fn tag(self) -> IFDTag {
        match self {
            MetadataField::GpsInfo => IFDTag::GPSInfo,
            MetadataField::DateTime => IFDTag::DateTime,
            MetadataField::DateTimeOriginal => IFDTag::DateTimeOriginal,
            MetadataField::Model => IFDTag::Model,
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.tag())
    }
}

#[cfg(test)]
mod test {
    use super::{IFDTag, MetadataField};
    use crate::exif::TIFFByteAlignment;

    #[test]
    fn test_field_lookup_matches_exif_tag_codes() {
        assert_eq!(MetadataField::GpsInfo.tag() as u16, 34853);
        assert_eq!(MetadataField::DateTime.tag() as u16, 306);
        assert_eq!(MetadataField::Model.tag() as u16, 272);
        assert_eq!(MetadataField::DateTimeOriginal.tag() as u16, 36867);
        assert_eq!(MetadataField::GpsInfo.to_string(), "GPSInfo");
    }

    #[test]
    fn test_convert_to_from_u16() {
        assert_eq!(IFDTag::try_from(0x0002), Ok(IFDTag::GPSLatitude));
        assert_eq!(IFDTag::GPSLatitude as u16, 0x0002);
        assert_eq!(IFDTag::try_from(0x8825), Ok(IFDTag::GPSInfo));
        assert!(IFDTag::try_from(0x011a).is_err());
    }

    /// Both byte orders must decode every code to the same tag, with codes outside the table
    /// mapped to `Unknown`.
    #[test]
    fn test_parse_unknown_agrees_across_byte_orders() {
        let le_alignment = TIFFByteAlignment::LittleEndian;
        let be_alignment = TIFFByteAlignment::BigEndian;
        for i in 0..=u16::MAX {
            let (_, le) = IFDTag::parse_unknown(&i.to_le_bytes(), le_alignment).unwrap();
            let (_, be) = IFDTag::parse_unknown(&i.to_be_bytes(), be_alignment).unwrap();
            assert_eq!(le, be);
            match IFDTag::try_from(i) {
                Ok(tag) => assert_eq!(le, tag),
                Err(_) => assert_eq!(le, IFDTag::Unknown),
            }
        }
        assert!(IFDTag::parse_unknown(&[0x01], le_alignment).is_err());
    }
}
