//! Parsing for the Exif data structure.

pub mod gps;
pub mod tags;

pub use tags::{IFDTag, MetadataField};

use crate::{
    impl_parse_for_enum,
    jfif::{JFIFMarkerCode, ParseableSegment},
    parse,
};
use derive_try_from_primitive::TryFromPrimitive;
use nom::{bytes::complete::{tag, take}, error::context, sequence::tuple};

/// Nested IFDs (Exif, GPS) are followed at most this deep.
const MAX_IFD_DEPTH: usize = 4;

/// The Exif data structure containing all of the metadata specified in
/// an Exif section.
#[derive(Debug)]
pub struct ExifData {
    pub ifd: IFD,
}

impl ExifData {
    const MARKER: JFIFMarkerCode = JFIFMarkerCode::APPm(0x01);
    const HEADER: &'static [u8] = b"Exif\x00\x00";

    /// Parse a bare TIFF structure (header followed by IFDs), as found after the Exif header of
    /// an APP1 segment or at the start of a TIFF file.
    pub fn from_tiff(i: parse::Input) -> parse::Result<Self> {
        let tiff = i;
        let (_, tiff_header) = context("TIFF header", TIFFHeader::parse)(tiff)?;

        let (ifd_input, _) =
            context("Initial offset", take(tiff_header.initial_offset as usize))(tiff)?;
        let (_, ifd) = context("IFD0", |x| IFD::parse(x, tiff, tiff_header.alignment, 0))(ifd_input)?;

        Ok((&tiff[tiff.len()..], ExifData { ifd }))
    }

    /// Returns `true` if the input starts with an APP1 segment carrying Exif data:
    ///
    /// ```text
    /// APP1 header + 2 size bytes + "Exif\x00\x00"
    /// ```
    pub fn can_parse_segment(i: parse::Input) -> bool {
        use nom::number::complete::be_u16;

        let marker = Self::MARKER.as_bytes();
        let mut parser = tuple((
            tag(&marker[..]),
            be_u16,
            Self::parse_data_bytes_header,
        ));
        parser(i).is_ok()
    }

    /// Look up a tag in IFD0 or, failing that, in the Exif sub-IFD.
    pub fn find(&self, tagtype: IFDTag) -> Option<&IFDEntry> {
        self.ifd.find(tagtype).or_else(|| {
            self.ifd
                .subifd(IFDTag::ExifOffset)
                .and_then(|exif| exif.find(tagtype))
        })
    }

    /// The GPS sub-IFD, if the image has one.
    pub fn gps(&self) -> Option<&IFD> {
        self.ifd.subifd(IFDTag::GPSInfo)
    }

    /// Verify that the data section contains the correct header bytes.
    fn parse_data_bytes_header(i: parse::Input) -> parse::Result<&[u8]> {
        context("Exif data section header", tag(Self::HEADER))(i)
    }
}

impl ParseableSegment for ExifData {
    fn parse_data_bytes(i: parse::Input, _magic: JFIFMarkerCode) -> parse::Result<Self> {
        let (i, _) = Self::parse_data_bytes_header(i)?;
        Self::from_tiff(i)
    }
}

/// TIFF header used within the Exif data structure to specify its layout.
#[derive(Debug)]
pub struct TIFFHeader {
    pub alignment: TIFFByteAlignment,
    pub initial_offset: u32,
}

impl TIFFHeader {
    pub fn parse(i: parse::Input) -> parse::Result<Self> {
        use nom::combinator::verify;

        let (i, alignment) = context("Byte alignment", TIFFByteAlignment::parse)(i)?;
        let (i, _) = context(
            "Alignment check",
            verify(|x| alignment.parse_u16(x), |&x| x == 0x002a),
        )(i)?;
        let (i, initial_offset) = context("Initial offset", |x| alignment.parse_u32(x))(i)?;

        Ok((
            i,
            TIFFHeader {
                alignment,
                initial_offset,
            },
        ))
    }

    /// Returns `true` if the input starts with a TIFF header in either byte order.
    pub fn is_tiff(i: parse::Input) -> bool {
        i.starts_with(b"II\x2a\x00") || i.starts_with(b"MM\x00\x2a")
    }
}

/// Two-byte tag representing the byte alignment for the TIFF data.
#[derive(Debug, Clone, Copy, TryFromPrimitive, PartialEq, Eq)]
#[repr(u16)]
pub enum TIFFByteAlignment {
    LittleEndian = 0x4949, // "II" = Intel-type byte alignment
    BigEndian = 0x4d4d,    // "MM" = Motorola-type byte alignment
}

macro_rules! TIFFByteAlignment_parse_numeric {
    ($fn_name: ident, $type: ident, $le_number_parser: ident, $be_number_parser: ident) => {
        impl TIFFByteAlignment {
            pub fn $fn_name<'a>(&self, i: parse::Input<'a>) -> parse::Result<'a, $type> {
                use nom::number::complete::{$be_number_parser, $le_number_parser};
                match self {
                    TIFFByteAlignment::LittleEndian => $le_number_parser(i),
                    TIFFByteAlignment::BigEndian => $be_number_parser(i),
                }
            }
        }
    };
}

impl_parse_for_enum!(TIFFByteAlignment, be_u16);
TIFFByteAlignment_parse_numeric!(parse_u16, u16, le_u16, be_u16);
TIFFByteAlignment_parse_numeric!(parse_u32, u32, le_u32, be_u32);
TIFFByteAlignment_parse_numeric!(parse_i32, i32, le_i32, be_i32);

/// Encapsulates an IFD (Image File Directory) in the image metadata.
#[derive(Debug)]
pub struct IFD {
    pub entries: Vec<IFDEntry>,
    pub subifds: Vec<(IFDTag, IFD)>,
}

impl IFD {
    pub fn parse<'a>(
        i: parse::Input<'a>,
        original_input: parse::Input<'a>,
        alignment: TIFFByteAlignment,
        depth: usize,
    ) -> parse::Result<'a, Self> {
        let (i, num_entries) = context("Number of IFD entries", |x| alignment.parse_u16(x))(i)?;
        let mut entries = Vec::new();
        let mut current_input = i;

        for _ in 0..num_entries {
            let (next_i, entry) = context("IFD entry", |i| {
                IFDEntry::parse(i, original_input, alignment)
            })(current_input)?;
            current_input = next_i;
            if entry.tagtype != IFDTag::Unknown {
                entries.push(entry);
            }
        }

        // Follow pointers to the Exif and GPS sub-IFDs.
        let mut subifds = Vec::new();
        if depth < MAX_IFD_DEPTH {
            for e in entries.iter().filter(|e| e.tagtype.is_subifd_pointer()) {
                if let Some(IFDDataContents::UnsignedLong(offset)) = e.content.first() {
                    let (at, _) = context("Sub-IFD offset", take(*offset as usize))(original_input)?;
                    let (_, subifd) = context("Sub-IFD", |x| {
                        IFD::parse(x, original_input, alignment, depth + 1)
                    })(at)?;
                    subifds.push((e.tagtype, subifd));
                }
            }
        }

        Ok((current_input, IFD { entries, subifds }))
    }

    pub fn find(&self, tagtype: IFDTag) -> Option<&IFDEntry> {
        self.entries.iter().find(|e| e.tagtype == tagtype)
    }

    pub fn subifd(&self, pointer: IFDTag) -> Option<&IFD> {
        self.subifds
            .iter()
            .find(|(tagtype, _)| *tagtype == pointer)
            .map(|(_, ifd)| ifd)
    }
}

/// Represents a single IFD (Image File Directory) entry. Entries with an unknown tag are parsed
/// past without decoding their contents.
#[derive(Debug, Clone)]
pub struct IFDEntry {
    pub tagtype: IFDTag,
    pub content: Vec<IFDDataContents>,
}

impl IFDEntry {
    pub fn parse<'a>(
        i: parse::Input<'a>,
        original_input: parse::Input<'a>,
        alignment: TIFFByteAlignment,
    ) -> parse::Result<'a, Self> {
        let (i, (tagtype, format_bytes, count_bytes, value_bytes)) = tuple((
            context("IFD tag", |x| IFDTag::parse_unknown(x, alignment)),
            take(2usize),
            take(4usize),
            take(4usize),
        ))(i)?;

        if tagtype == IFDTag::Unknown {
            return Ok((i, IFDEntry { tagtype, content: Vec::new() }));
        }

        let (_, data_format) = context("Data format", |x| IFDDataFormat::parse(x, alignment))(format_bytes)?;
        let (_, n_components) = context("Number of components", |x| alignment.parse_u32(x))(count_bytes)?;

        // If the total data size is <= 4 bytes, then the data is stored within the value field.
        // Otherwise the value field holds an offset from the start of the TIFF header.
        let content_size = data_format
            .bytes_per_component()
            .saturating_mul(n_components as usize);
        let data = if content_size <= 4 {
            &value_bytes[..content_size]
        } else {
            let (_, offset) = context("IFD entry offset", |x| alignment.parse_u32(x))(value_bytes)?;
            let (at, _) = context("IFD entry offset", take(offset as usize))(original_input)?;
            let (_, data) = context("IFD entry contents", take(content_size))(at)?;
            data
        };

        let (_, content) = context("IFD entry contents", |x| {
            IFDDataContents::parse(x, data_format, n_components, alignment)
        })(data)?;

        Ok((
            i,
            IFDEntry { tagtype, content },
        ))
    }

    /// The entry's value as text, for ASCII entries.
    pub fn as_str(&self) -> Option<&str> {
        match self.content.first() {
            Some(IFDDataContents::AsciiString(s)) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, TryFromPrimitive)]
#[repr(u16)]
pub enum IFDDataFormat {
    UnsignedByte = 1,
    AsciiString = 2,
    UnsignedShort = 3,
    UnsignedLong = 4,
    UnsignedRational = 5,
    SignedByte = 6,
    Undefined = 7,
    SignedShort = 8,
    SignedLong = 9,
    SignedRational = 10,
    SingleFloat = 11,
    DoubleFloat = 12,
}

impl IFDDataFormat {
    pub fn parse(i: parse::Input, alignment: TIFFByteAlignment) -> parse::Result<Self> {
        use nom::{combinator::map_res, error::ErrorKind};

        let parser = map_res(
            |x| alignment.parse_u16(x),
            |x| Self::try_from(x).map_err(|_| ErrorKind::Alt),
        );
        context("IFD Data Format", parser)(i)
    }

    pub fn bytes_per_component(&self) -> usize {
        match self {
            IFDDataFormat::UnsignedByte
            | IFDDataFormat::AsciiString
            | IFDDataFormat::SignedByte
            | IFDDataFormat::Undefined => 1,
            IFDDataFormat::UnsignedShort | IFDDataFormat::SignedShort => 2,
            IFDDataFormat::UnsignedLong | IFDDataFormat::SignedLong | IFDDataFormat::SingleFloat => 4,
            IFDDataFormat::UnsignedRational
            | IFDDataFormat::SignedRational
            | IFDDataFormat::DoubleFloat => 8,
        }
    }
}

/// Decoded entry values. Formats the photo metadata never uses for the tags we read are kept as
/// raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum IFDDataContents {
    AsciiString(String),
    UnsignedShort(u16),
    UnsignedLong(u32),
    UnsignedRational(u32, u32),
    SignedRational(i32, i32),
    Raw(Vec<u8>),
}

impl IFDDataContents {
    pub fn parse(
        i: parse::Input,
        format: IFDDataFormat,
        n_components: u32,
        alignment: TIFFByteAlignment,
    ) -> parse::Result<Vec<Self>> {
        use nom::bytes::complete::take_while;

        match format {
            IFDDataFormat::AsciiString => {
                // n_components counts characters, including the terminating NUL
                let (i, s) = take_while(|x| x != 0)(i)?;
                let s = String::from_utf8_lossy(s);
                Ok((i, vec![IFDDataContents::AsciiString(s.to_string())]))
            }
            IFDDataFormat::UnsignedShort
            | IFDDataFormat::UnsignedLong
            | IFDDataFormat::UnsignedRational
            | IFDDataFormat::SignedRational => {
                // For numeric formats n_components is the number of values; GPS coordinates
                // carry three rationals.
                let mut contents = Vec::new();
                let mut i = i;
                for _ in 0..n_components {
                    let (next_i, res) = Self::parse_one(i, format, alignment)?;
                    i = next_i;
                    contents.push(res);
                }
                Ok((i, contents))
            }
            _ => {
                let (i, raw) = take(i.len())(i)?;
                Ok((i, vec![IFDDataContents::Raw(raw.to_vec())]))
            }
        }
    }

    /// Parse a single value of a numeric data format.
    fn parse_one(
        i: parse::Input,
        format: IFDDataFormat,
        alignment: TIFFByteAlignment,
    ) -> parse::Result<Self> {
        match format {
            IFDDataFormat::UnsignedShort => {
                let (i, x) = alignment.parse_u16(i)?;
                Ok((i, IFDDataContents::UnsignedShort(x)))
            }
            IFDDataFormat::SignedRational => {
                let (i, (num, denom)) =
                    tuple((|x| alignment.parse_i32(x), |x| alignment.parse_i32(x)))(i)?;
                Ok((i, IFDDataContents::SignedRational(num, denom)))
            }
            IFDDataFormat::UnsignedRational => {
                let (i, (num, denom)) =
                    tuple((|x| alignment.parse_u32(x), |x| alignment.parse_u32(x)))(i)?;
                Ok((i, IFDDataContents::UnsignedRational(num, denom)))
            }
            _ => {
                let (i, x) = alignment.parse_u32(i)?;
                Ok((i, IFDDataContents::UnsignedLong(x)))
            }
        }
    }
}
