//! WebAssembly bindings for the `photokml` crate.

use crate::{
    exif::MetadataField,
    extract::record_from_tags,
    reader::{read_tags_from_bytes, ReadError},
};
use wasm_bindgen::prelude::*;

const FIELDS: [MetadataField; 3] = [
    MetadataField::GpsInfo,
    MetadataField::DateTime,
    MetadataField::Model,
];

/// Read the metadata of an in-memory JPEG or TIFF file and return its photo record.
#[wasm_bindgen]
pub fn extract_photo_record(file_name: &str, i: &[u8]) -> Result<JsValue, JsValue> {
    let tags = match read_tags_from_bytes(i, &FIELDS) {
        Ok(tags) => tags,
        Err(ReadError::Metadata(e)) => {
            let msg = format!("Unable to parse image: Error: {}", e);
            return Err(JsValue::from_str(&msg));
        }
        Err(e) => return Err(JsValue::from_str(&e.to_string())),
    };

    match record_from_tags(file_name, &tags, MetadataField::DateTime) {
        Ok(Ok(record)) => JsValue::from_serde(&record)
            .map_err(|_| JsValue::from_str("Unable to convert result to JSON!")),
        Ok(Err(reason)) => Err(JsValue::from_str(&format!("{}: {}", file_name, reason))),
        Err(e) => Err(JsValue::from_str(&e.to_string())),
    }
}
