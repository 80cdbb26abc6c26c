//! Various utilities for dealing with GPS information: degrees/minutes/seconds to decimal
//! conversion and the precision a coordinate can honestly be rounded to.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GpsError {
    #[error("zero denominator in {0} component")]
    ZeroDenominator(DmsComponent),
    #[error("invalid hemisphere reference {0:?}")]
    BadHemisphere(String),
    #[error("expected 3 rational components, found {0}")]
    ComponentCount(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmsComponent {
    Degrees,
    Minutes,
    Seconds,
}

impl fmt::Display for DmsComponent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DmsComponent::Degrees => "degrees",
            DmsComponent::Minutes => "minutes",
            DmsComponent::Seconds => "seconds",
        };
        f.write_str(name)
    }
}

/// An unsigned Exif rational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Rational { numerator, denominator }
    }
}

/// Degrees, minutes and seconds of one coordinate axis, in that order.
pub type Dms = [Rational; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    pub fn sign(self) -> f64 {
        match self {
            Hemisphere::North | Hemisphere::East => 1.,
            Hemisphere::South | Hemisphere::West => -1.,
        }
    }

    /// Parse a `GPSLatitudeRef` value (`N` or `S`).
    pub fn latitude(reference: &str) -> Result<Self, GpsError> {
        match reference.trim() {
            "N" => Ok(Hemisphere::North),
            "S" => Ok(Hemisphere::South),
            other => Err(GpsError::BadHemisphere(other.to_string())),
        }
    }

    /// Parse a `GPSLongitudeRef` value (`E` or `W`).
    pub fn longitude(reference: &str) -> Result<Self, GpsError> {
        match reference.trim() {
            "E" => Ok(Hemisphere::East),
            "W" => Ok(Hemisphere::West),
            other => Err(GpsError::BadHemisphere(other.to_string())),
        }
    }
}

/// The GPS IFD contents needed to place a photo, as stored in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGpsTag {
    pub latitude_ref: String,
    pub latitude: Vec<Rational>,
    pub longitude_ref: String,
    pub longitude: Vec<Rational>,
}

/// A converted coordinate pair rounded to `precision` decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub precision: u32,
}

impl RawGpsTag {
    /// Convert both axes to signed decimal degrees. Both are rounded to the precision of the
    /// latitude triplet.
    pub fn position(&self) -> Result<Position, GpsError> {
        let latitude = as_dms(&self.latitude)?;
        let longitude = as_dms(&self.longitude)?;
        let lat_hemisphere = Hemisphere::latitude(&self.latitude_ref)?;
        let lon_hemisphere = Hemisphere::longitude(&self.longitude_ref)?;

        let precision = precision(&latitude[1], &latitude[2]);
        Ok(Position {
            latitude: round(dms_to_decimal(&latitude, lat_hemisphere)?, precision),
            longitude: round(dms_to_decimal(&longitude, lon_hemisphere)?, precision),
            precision,
        })
    }
}

fn as_dms(components: &[Rational]) -> Result<Dms, GpsError> {
    match components {
        [d, m, s] => Ok([*d, *m, *s]),
        other => Err(GpsError::ComponentCount(other.len())),
    }
}

/// Convert a degrees/minutes/seconds triplet to signed decimal degrees. Each component is divided
/// by `60^i`, so any denominators the camera chose are honored.
pub fn dms_to_decimal(dms: &Dms, hemisphere: Hemisphere) -> Result<f64, GpsError> {
    const COMPONENTS: [DmsComponent; 3] =
        [DmsComponent::Degrees, DmsComponent::Minutes, DmsComponent::Seconds];

    let mut value = 0.;
    let mut scale = 1.;
    for (r, component) in dms.iter().zip(COMPONENTS) {
        if r.denominator == 0 {
            return Err(GpsError::ZeroDenominator(component));
        }
        value += (r.numerator as f64) / (r.denominator as f64) / scale;
        scale *= 60.;
    }

    Ok(hemisphere.sign() * value)
}

/// Number of decimal places justified by the subdivision of the minutes and seconds components:
/// `floor(log10(max(minutes_den * 60, seconds_den * 3600)))`, never negative.
pub fn precision(minutes: &Rational, seconds: &Rational) -> u32 {
    let resolution = (minutes.denominator as f64 * 60.).max(seconds.denominator as f64 * 3600.);
    if resolution <= 1. {
        return 0;
    }
    resolution.log10().floor() as u32
}

/// Round to `digits` decimal places.
pub fn round(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}
