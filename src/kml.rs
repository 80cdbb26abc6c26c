//! Assembling the trip document and writing it out as KML.

use crate::{
    config::IconConfig,
    error::{Error, Result},
    record::PhotoRecord,
};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
const STYLE_ID: &str = "photo";
const DESCRIPTION: &str = "Photo location";

/// The trip document: one shared marker style and one placemark per photo.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub name: String,
    pub style: IconStyle,
    pub placemarks: Vec<Placemark>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconStyle {
    pub id: String,
    pub href: String,
    /// Icon anchor as fractions of its width and height.
    pub hot_spot: (f64, f64),
    /// KML `aabbggrr` color.
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placemark {
    pub name: String,
    pub style_url: String,
    pub description: String,
    pub coordinates: String,
    pub extended_data: Vec<(String, String)>,
}

pub struct DocumentBuilder {
    trip_label: String,
    style: IconStyle,
}

impl DocumentBuilder {
    pub fn new(trip_label: &str, icon: &IconConfig) -> Result<Self> {
        let color = icon.color.as_deref().map(argb_to_kml).transpose()?;
        Ok(DocumentBuilder {
            trip_label: trip_label.to_string(),
            style: IconStyle {
                id: STYLE_ID.to_string(),
                href: icon.href.clone(),
                hot_spot: icon.anchor,
                color,
            },
        })
    }

    /// One placemark per record, in the order given.
    pub fn build(&self, records: &[PhotoRecord]) -> Document {
        let placemarks = records
            .iter()
            .map(|r| Placemark {
                name: r.timestamp.clone(),
                style_url: format!("#{}", self.style.id),
                description: DESCRIPTION.to_string(),
                coordinates: r.coordinates(),
                extended_data: vec![
                    ("Trip".to_string(), self.trip_label.clone()),
                    ("Time".to_string(), r.timestamp.clone()),
                    ("Model".to_string(), r.model.clone()),
                    ("Name".to_string(), r.file_name.clone()),
                ],
            })
            .collect();

        Document {
            name: self.trip_label.clone(),
            style: self.style.clone(),
            placemarks,
        }
    }
}

/// Convert an `AARRGGBB` color to KML's `aabbggrr` order.
pub fn argb_to_kml(argb: &str) -> Result<String> {
    if argb.len() != 8 || !argb.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::Config(format!(
            "icon color {:?} is not an AARRGGBB hex value",
            argb
        )));
    }
    let (a, r, g, b) = (&argb[0..2], &argb[2..4], &argb[4..6], &argb[6..8]);
    Ok(format!("{}{}{}{}", a, b, g, r).to_ascii_lowercase())
}

pub trait DocumentSerializer {
    fn serialize(&self, document: &Document) -> Result<Vec<u8>>;
}

/// Pretty-printed UTF-8 KML.
#[derive(Debug, Clone, Copy, Default)]
pub struct KmlWriter;

impl DocumentSerializer for KmlWriter {
    fn serialize(&self, document: &Document) -> Result<Vec<u8>> {
        let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);

        emit(&mut w, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut kml = BytesStart::new("kml");
        kml.push_attribute(("xmlns", KML_NAMESPACE));
        emit(&mut w, Event::Start(kml))?;
        start(&mut w, "Document")?;
        text_element(&mut w, "name", &document.name)?;
        write_style(&mut w, &document.style)?;
        for placemark in &document.placemarks {
            write_placemark(&mut w, placemark)?;
        }
        end(&mut w, "Document")?;
        end(&mut w, "kml")?;

        let mut out = w.into_inner();
        out.push(b'\n');
        Ok(out)
    }
}

fn write_style(w: &mut Writer<Vec<u8>>, style: &IconStyle) -> Result<()> {
    let mut tag = BytesStart::new("Style");
    tag.push_attribute(("id", style.id.as_str()));
    emit(w, Event::Start(tag))?;
    start(w, "IconStyle")?;
    if let Some(color) = &style.color {
        text_element(w, "color", color)?;
    }
    let (x, y) = (style.hot_spot.0.to_string(), style.hot_spot.1.to_string());
    let mut hot_spot = BytesStart::new("hotSpot");
    hot_spot.push_attribute(("x", x.as_str()));
    hot_spot.push_attribute(("y", y.as_str()));
    hot_spot.push_attribute(("xunits", "fraction"));
    hot_spot.push_attribute(("yunits", "fraction"));
    emit(w, Event::Empty(hot_spot))?;
    start(w, "Icon")?;
    text_element(w, "href", &style.href)?;
    end(w, "Icon")?;
    end(w, "IconStyle")?;
    end(w, "Style")
}

fn write_placemark(w: &mut Writer<Vec<u8>>, placemark: &Placemark) -> Result<()> {
    start(w, "Placemark")?;
    text_element(w, "name", &placemark.name)?;
    text_element(w, "styleUrl", &placemark.style_url)?;
    text_element(w, "description", &placemark.description)?;
    start(w, "Point")?;
    text_element(w, "coordinates", &placemark.coordinates)?;
    end(w, "Point")?;
    start(w, "ExtendedData")?;
    for (name, value) in &placemark.extended_data {
        let mut data = BytesStart::new("Data");
        data.push_attribute(("name", name.as_str()));
        emit(w, Event::Start(data))?;
        text_element(w, "value", value)?;
        end(w, "Data")?;
    }
    end(w, "ExtendedData")?;
    end(w, "Placemark")
}

fn emit(w: &mut Writer<Vec<u8>>, event: Event) -> Result<()> {
    w.write_event(event)
        .map_err(|e| Error::Serialize(e.to_string()))
}

fn start(w: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    emit(w, Event::Start(BytesStart::new(name)))
}

fn end(w: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    emit(w, Event::End(BytesEnd::new(name)))
}

fn text_element(w: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    start(w, name)?;
    emit(w, Event::Text(BytesText::new(text)))?;
    end(w, name)
}

#[cfg(test)]
mod test {
    use super::*;

    fn icon() -> IconConfig {
        IconConfig {
            href: "https://example.com/camera.png".to_string(),
            anchor: (0.5, 0.),
            color: Some("FF1E90FF".to_string()),
        }
    }

    fn record(file_name: &str, timestamp: &str, longitude: f64, latitude: f64) -> PhotoRecord {
        PhotoRecord {
            file_name: file_name.to_string(),
            longitude,
            latitude,
            precision: 3,
            timestamp: timestamp.to_string(),
            model: "Pixel 4a".to_string(),
        }
    }

    #[test]
    fn test_argb_to_kml() {
        assert_eq!(argb_to_kml("FF1E90FF").unwrap(), "ffff901e");
        assert_eq!(argb_to_kml("80ff0000").unwrap(), "800000ff");
        assert!(argb_to_kml("ff0000").is_err());
        assert!(argb_to_kml("gg000000").is_err());
    }

    #[test]
    fn test_build_one_placemark_per_record() {
        let builder = DocumentBuilder::new("Good Trip 2020", &icon()).unwrap();
        let doc = builder.build(&[
            record("a.jpg", "2020:05:01 10:00:00", -122.258, 37.5),
            record("b.jpg", "2020:05:02 09:00:00", 2.295, 48.858),
        ]);

        assert_eq!(doc.name, "Good Trip 2020");
        assert_eq!(doc.style.color.as_deref(), Some("ffff901e"));
        assert_eq!(doc.style.hot_spot, (0.5, 0.));
        assert_eq!(doc.placemarks.len(), 2);

        let first = &doc.placemarks[0];
        assert_eq!(first.name, "2020:05:01 10:00:00");
        assert_eq!(first.style_url, "#photo");
        assert_eq!(first.description, "Photo location");
        assert_eq!(first.coordinates, "-122.258, 37.500");
        let keys: Vec<_> = first.extended_data.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["Trip", "Time", "Model", "Name"]);
        assert_eq!(first.extended_data[0].1, "Good Trip 2020");
        assert_eq!(first.extended_data[3].1, "a.jpg");
    }

    #[test]
    fn test_bad_color_is_a_config_error() {
        let mut icon = icon();
        icon.color = Some("red".to_string());
        assert!(matches!(DocumentBuilder::new("t", &icon), Err(Error::Config(_))));
    }

    #[test]
    fn test_serialize_kml() {
        let mut icon = icon();
        icon.color = None;
        let builder = DocumentBuilder::new("Fish & Chips", &icon).unwrap();
        let doc = builder.build(&[record("a.jpg", "2020:05:01 10:00:00", -122.258, 37.5)]);
        let xml = String::from_utf8(KmlWriter.serialize(&doc).unwrap()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"), "{}", xml);
        assert!(xml.contains("<kml xmlns=\"http://www.opengis.net/kml/2.2\">"));
        assert!(xml.contains("<name>Fish &amp; Chips</name>"));
        assert!(xml.contains("<Style id=\"photo\">"));
        assert!(!xml.contains("<color>"));
        assert!(xml.contains(
            "<hotSpot x=\"0.5\" y=\"0\" xunits=\"fraction\" yunits=\"fraction\"/>"
        ));
        assert!(xml.contains("<href>https://example.com/camera.png</href>"));
        assert!(xml.contains("<coordinates>-122.258, 37.500</coordinates>"));
        assert!(xml.contains("<Data name=\"Model\">"));
        assert!(xml.contains("<value>Pixel 4a</value>"));
        assert_eq!(xml.matches("<Placemark>").count(), 1);
        // pretty-printed
        assert!(xml.contains("\n  <Document>"));
    }
}
