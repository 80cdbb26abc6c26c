//! Defines the `JFIFMarkerCode` type. Only the markers that change how a segment is walked get
//! their own variant; everything else is carried as `Other`.

use crate::impl_parse_for_enum;

/// Marker codes for JFIF segments. See ISO/IEC 10918-1: 1993(E), p. 36 for the full table.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum JFIFMarkerCode {
    TEM,      // 0xFF01: no length field
    RSTm(u8), // 0xFFD0 - 0xFFD7: no length field
    SOI,      // 0xFFD8: Start of image
    EOI,      // 0xFFD9: End of image
    SOS,      // 0xFFDA: Start of scan, entropy-coded data follows
    APPm(u8), // 0xFFE0 - 0xFFEF: Application segments (APP1 carries Exif)
    COM,      // 0xFFFE: Comment

    // Any other marker: SOFn, DHT, DQT, DRI, JPGn, reserved codes, ...
    Other(u8),
}

// Define JFIFMarkerCode::parse(i: parse::Input) -> parse::Result by parsing the marker code from a
// 16-bit integer.
impl_parse_for_enum!(JFIFMarkerCode, be_u16);

impl JFIFMarkerCode {
    pub fn as_bytes(self) -> [u8; 2] {
        u16::from(self).to_be_bytes()
    }

    /// Returns `true` for the standalone markers that are not followed by a length field.
    pub fn is_standalone(self) -> bool {
        matches!(
            self,
            JFIFMarkerCode::TEM | JFIFMarkerCode::RSTm(_) | JFIFMarkerCode::SOI | JFIFMarkerCode::EOI
        )
    }
}

impl TryFrom<u16> for JFIFMarkerCode {
    type Error = &'static str;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        let [prefix, low] = code.to_be_bytes();
        if prefix != 0xFF || low == 0x00 || low == 0xFF {
            return Err("Invalid marker code (code must be 0xFF01..=0xFFFE)");
        }

        let result = match low {
            0x01 => JFIFMarkerCode::TEM,
            0xD0..=0xD7 => JFIFMarkerCode::RSTm(low & 0x0F),
            0xD8 => JFIFMarkerCode::SOI,
            0xD9 => JFIFMarkerCode::EOI,
            0xDA => JFIFMarkerCode::SOS,
            0xE0..=0xEF => JFIFMarkerCode::APPm(low & 0x0F),
            0xFE => JFIFMarkerCode::COM,
            _ => JFIFMarkerCode::Other(low),
        };

        Ok(result)
    }
}

impl From<JFIFMarkerCode> for u16 {
    fn from(marker: JFIFMarkerCode) -> Self {
        match marker {
            JFIFMarkerCode::TEM => 0xFF01,
            JFIFMarkerCode::RSTm(m) => 0xFFD0 | (m as u16),
            JFIFMarkerCode::SOI => 0xFFD8,
            JFIFMarkerCode::EOI => 0xFFD9,
            JFIFMarkerCode::SOS => 0xFFDA,
            JFIFMarkerCode::APPm(m) => 0xFFE0 | (m as u16),
            JFIFMarkerCode::COM => 0xFFFE,
            JFIFMarkerCode::Other(low) => 0xFF00 | (low as u16),
        }
    }
}
