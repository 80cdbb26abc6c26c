//! Builds small JPEG and TIFF files carrying the Exif fields the mapper reads.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

const ASCII: u16 = 2;
const LONG: u16 = 4;
const RATIONAL: u16 = 5;

pub type Dms = [(u32, u32); 3];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByteOrder {
    /// `II`
    #[default]
    Intel,
    /// `MM`
    Motorola,
}

impl ByteOrder {
    fn u16(self, x: u16) -> [u8; 2] {
        match self {
            ByteOrder::Intel => x.to_le_bytes(),
            ByteOrder::Motorola => x.to_be_bytes(),
        }
    }

    fn u32(self, x: u32) -> [u8; 4] {
        match self {
            ByteOrder::Intel => x.to_le_bytes(),
            ByteOrder::Motorola => x.to_be_bytes(),
        }
    }

    fn header(self) -> &'static [u8] {
        match self {
            ByteOrder::Intel => b"II\x2a\x00",
            ByteOrder::Motorola => b"MM\x00\x2a",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Photo {
    pub model: Option<String>,
    pub date_time: Option<String>,
    pub gps: Option<Gps>,
    pub byte_order: ByteOrder,
}

#[derive(Debug, Clone)]
pub struct Gps {
    pub latitude_ref: &'static str,
    pub latitude: Dms,
    pub longitude_ref: &'static str,
    pub longitude: Dms,
}

impl Photo {
    pub fn geotagged(date_time: &str, latitude: Dms, longitude: Dms) -> Self {
        Photo {
            model: Some("Pixel 4".to_string()),
            date_time: Some(date_time.to_string()),
            gps: Some(Gps {
                latitude_ref: "N",
                latitude,
                longitude_ref: "W",
                longitude,
            }),
            byte_order: ByteOrder::Intel,
        }
    }

    /// TIFF stream in the photo's byte order: IFD0 followed by the GPS IFD.
    pub fn tiff(&self) -> Vec<u8> {
        let order = self.byte_order;
        let mut ifd0 = Vec::new();
        if let Some(model) = &self.model {
            ifd0.push(ascii(0x0110, model));
        }
        if let Some(date_time) = &self.date_time {
            ifd0.push(ascii(0x0132, date_time));
        }

        let gps = self.gps.as_ref().map(|gps| {
            vec![
                ascii(0x0001, gps.latitude_ref),
                rationals(order, 0x0002, &gps.latitude),
                ascii(0x0003, gps.longitude_ref),
                rationals(order, 0x0004, &gps.longitude),
            ]
        });

        const IFD0_START: usize = 8;
        let mut out = order.header().to_vec();
        out.extend_from_slice(&order.u32(IFD0_START as u32));

        match gps {
            Some(gps) => {
                // The pointer's value doesn't change the size of IFD0.
                ifd0.push(Entry::new(0x8825, LONG, 1, order.u32(0).to_vec()));
                let gps_start = IFD0_START + ifd(order, &ifd0, IFD0_START).len();
                if let Some(pointer) = ifd0.last_mut() {
                    pointer.value = order.u32(gps_start as u32).to_vec();
                }
                out.extend(ifd(order, &ifd0, IFD0_START));
                out.extend(ifd(order, &gps, gps_start));
            }
            None => out.extend(ifd(order, &ifd0, IFD0_START)),
        }
        out
    }

    /// JPEG with a JFIF APP0 segment, the Exif APP1 segment and an empty scan.
    pub fn jpeg(&self) -> Vec<u8> {
        let mut app1 = b"Exif\x00\x00".to_vec();
        app1.extend(self.tiff());

        let mut out = vec![0xff, 0xd8];
        out.extend(segment(0xe0, b"JFIF\x00\x01\x02\x00\x00\x01\x00\x01\x00\x00"));
        out.extend(segment(0xe1, &app1));
        out.extend(segment(0xda, b"\x00"));
        out.extend_from_slice(b"\x12\x34\xff\xd9");
        out
    }
}

/// JPEG without any Exif segment.
pub fn plain_jpeg() -> Vec<u8> {
    let mut out = vec![0xff, 0xd8];
    out.extend(segment(0xe0, b"JFIF\x00\x01\x02\x00\x00\x01\x00\x01\x00\x00"));
    out.extend_from_slice(b"\xff\xd9");
    out
}

pub fn write(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).expect("write fixture");
    path
}

struct Entry {
    tag: u16,
    format: u16,
    count: u32,
    value: Vec<u8>,
}

impl Entry {
    fn new(tag: u16, format: u16, count: u32, value: Vec<u8>) -> Self {
        Entry { tag, format, count, value }
    }
}

fn ascii(tag: u16, s: &str) -> Entry {
    let mut value = s.as_bytes().to_vec();
    value.push(0);
    Entry::new(tag, ASCII, value.len() as u32, value)
}

fn rationals(order: ByteOrder, tag: u16, values: &Dms) -> Entry {
    let mut value = Vec::new();
    for &(num, den) in values {
        value.extend_from_slice(&order.u32(num));
        value.extend_from_slice(&order.u32(den));
    }
    Entry::new(tag, RATIONAL, values.len() as u32, value)
}

/// Serialize an IFD located at `start`, with out-of-line values placed right after it.
fn ifd(order: ByteOrder, entries: &[Entry], start: usize) -> Vec<u8> {
    let mut data_offset = start + 2 + 12 * entries.len() + 4;
    let mut table = order.u16(entries.len() as u16).to_vec();
    let mut data = Vec::new();

    for e in entries {
        table.extend_from_slice(&order.u16(e.tag));
        table.extend_from_slice(&order.u16(e.format));
        table.extend_from_slice(&order.u32(e.count));
        if e.value.len() <= 4 {
            let mut inline = e.value.clone();
            inline.resize(4, 0);
            table.extend(inline);
        } else {
            table.extend_from_slice(&order.u32(data_offset as u32));
            data.extend_from_slice(&e.value);
            data_offset += e.value.len();
        }
    }
    table.extend_from_slice(&order.u32(0));
    table.extend(data);
    table
}

fn segment(marker: u8, data: &[u8]) -> Vec<u8> {
    let mut seg = vec![0xff, marker];
    seg.extend_from_slice(&((data.len() + 2) as u16).to_be_bytes());
    seg.extend_from_slice(data);
    seg
}
