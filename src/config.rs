//! Run configuration: trip label, marker icon, capture-time field and output location.
//!
//! Values come from an optional TOML file; command-line flags override them.
//!
//! ```toml
//! trip_label = "Alps 2021"
//! time_field = "date-time-original"
//!
//! [icon]
//! href = "https://maps.google.com/mapfiles/kml/shapes/camera.png"
//! anchor = [0.5, 0.0]
//! color = "ff1e90ff"
//! ```

use crate::{
    error::{Error, Result},
    exif::MetadataField,
    kml::argb_to_kml,
};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TRIP_LABEL: &str = "Good Trip 2020";
pub const DEFAULT_ICON_HREF: &str = "https://maps.google.com/mapfiles/kml/shapes/camera.png";
pub const DEFAULT_ICON_ANCHOR: (f64, f64) = (0.5, 0.);

/// Which Exif field the capture time is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    /// File modification time as recorded by the camera (IFD0 `DateTime`)
    #[default]
    DateTime,
    /// Moment the shutter fired (Exif `DateTimeOriginal`)
    DateTimeOriginal,
}

impl From<TimeField> for MetadataField {
    fn from(field: TimeField) -> Self {
        match field {
            TimeField::DateTime => MetadataField::DateTime,
            TimeField::DateTimeOriginal => MetadataField::DateTimeOriginal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconConfig {
    pub href: String,
    pub anchor: (f64, f64),
    /// `AARRGGBB` hex.
    pub color: Option<String>,
}

impl Default for IconConfig {
    fn default() -> Self {
        IconConfig {
            href: DEFAULT_ICON_HREF.to_string(),
            anchor: DEFAULT_ICON_ANCHOR,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Document name, `Trip` value of every marker and stem of the output file name.
    pub trip_label: String,
    pub icon: IconConfig,
    pub time_field: TimeField,
    /// Directory the `.kml` file is written to.
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            trip_label: DEFAULT_TRIP_LABEL.to_string(),
            icon: IconConfig::default(),
            time_field: TimeField::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let label = self.trip_label.trim();
        if label.is_empty() {
            return Err(Error::Config("trip label is empty".to_string()));
        }
        if label.contains(['/', '\\']) || label == "." || label == ".." {
            return Err(Error::Config(format!(
                "trip label {:?} cannot be used as a file name",
                self.trip_label
            )));
        }

        let (x, y) = self.icon.anchor;
        if !(0. ..=1.).contains(&x) || !(0. ..=1.).contains(&y) {
            return Err(Error::Config(format!(
                "icon anchor ({}, {}) must be fractions between 0 and 1",
                x, y
            )));
        }

        if let Some(color) = &self.icon.color {
            argb_to_kml(color)?;
        }
        Ok(())
    }

    /// `<output_dir>/<trip_label>.kml`
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.kml", self.trip_label.trim()))
    }
}
