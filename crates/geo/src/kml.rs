// KMZ/KML mission plan extraction

use std::io::{Read, Seek};
use std::path::Path;

use crate::error::GeoError;
use crate::projection::LatLon;

/// Placemarks whose name contains this marker describe the take-off path,
/// not a capture waypoint.
const FLIGHT_PATH_MARKER: &str = "Flight Path";

/// A numbered capture waypoint from the mission plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub name: u32,
    pub position: LatLon,
}

/// Read waypoints from a `.kmz` archive or a bare `.kml` document.
pub fn read_mission(path: &Path) -> Result<Vec<Waypoint>, GeoError> {
    let is_kmz = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("kmz"))
        .unwrap_or(false);

    let kml = if is_kmz {
        let file = std::fs::File::open(path)
            .map_err(|e| GeoError::Io(format!("{}: {e}", path.display())))?;
        extract_kml(file).map_err(|e| match e {
            GeoError::MissingKml(_) => GeoError::MissingKml(path.display().to_string()),
            other => other,
        })?
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| GeoError::Io(format!("{}: {e}", path.display())))?
    };

    let waypoints = parse_waypoints(&kml)?;
    log::info!("{}: {} waypoints", path.display(), waypoints.len());
    Ok(waypoints)
}

/// Pull the first `.kml` entry out of a KMZ (zip) archive.
pub fn extract_kml<R: Read + Seek>(reader: R) -> Result<String, GeoError> {
    let mut archive = zip::ZipArchive::new(reader).map_err(|e| GeoError::Io(e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| GeoError::Io(e.to_string()))?;
        if !entry.name().to_ascii_lowercase().ends_with(".kml") {
            continue;
        }
        log::debug!("using KML entry '{}'", entry.name());
        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .map_err(|e| GeoError::Io(e.to_string()))?;
        return Ok(content);
    }

    Err(GeoError::MissingKml("<archive>".into()))
}

/// Parse every capture waypoint from a KML document, in document order.
///
/// Each `Placemark` contributes its first `name` and the first tuple of its
/// first `coordinates` element. Element matching ignores namespace prefixes.
pub fn parse_waypoints(kml: &str) -> Result<Vec<Waypoint>, GeoError> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    #[derive(Clone, Copy, PartialEq)]
    enum Field {
        None,
        Name,
        Coordinates,
    }

    let mut waypoints = Vec::new();
    let mut reader = Reader::from_str(kml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut in_placemark = false;
    let mut field = Field::None;
    let mut name: Option<String> = None;
    let mut coordinates: Option<String> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"Placemark" => {
                    in_placemark = true;
                    name = None;
                    coordinates = None;
                }
                b"name" if in_placemark && name.is_none() => {
                    field = Field::Name;
                    text.clear();
                }
                b"coordinates" if in_placemark && coordinates.is_none() => {
                    field = Field::Coordinates;
                    text.clear();
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) if field != Field::None => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::CData(e)) if field != Field::None => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"name" if field == Field::Name => {
                    name = Some(text.trim().to_string());
                    field = Field::None;
                }
                b"coordinates" if field == Field::Coordinates => {
                    coordinates = Some(text.trim().to_string());
                    field = Field::None;
                }
                b"Placemark" => {
                    in_placemark = false;
                    if let (Some(n), Some(c)) = (name.take(), coordinates.take()) {
                        if let Some(wp) = waypoint_from(&n, &c)? {
                            waypoints.push(wp);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(GeoError::Kml(format!(
                    "at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(waypoints)
}

fn waypoint_from(name: &str, coordinates: &str) -> Result<Option<Waypoint>, GeoError> {
    if name.contains(FLIGHT_PATH_MARKER) {
        log::debug!("skipping placemark '{name}'");
        return Ok(None);
    }

    let number: u32 = name
        .parse()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| GeoError::WaypointName(name.to_string()))?;

    let bad = || GeoError::WaypointCoordinates {
        name: name.to_string(),
        value: coordinates.to_string(),
    };
    let first = coordinates.split_whitespace().next().ok_or_else(bad)?;
    let mut parts = first.split(',');
    let lon: f64 = parts.next().and_then(|v| v.trim().parse().ok()).ok_or_else(bad)?;
    let lat: f64 = parts.next().and_then(|v| v.trim().parse().ok()).ok_or_else(bad)?;

    let position = LatLon::new(lat, lon).validate()?;
    Ok(Some(Waypoint { name: number, position }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Field 7</name>
    <Placemark>
      <name>Flight Path</name>
      <LineString>
        <coordinates>-1.50,52.40,0 -1.49,52.41,0</coordinates>
      </LineString>
    </Placemark>
    <Placemark>
      <name>1</name>
      <Point><coordinates>-1.5000,52.4000,60</coordinates></Point>
    </Placemark>
    <Placemark>
      <name><![CDATA[2]]></name>
      <Point><coordinates>
        -1.4990,52.4000,60
      </coordinates></Point>
    </Placemark>
  </Document>
</kml>"#;

    #[test]
    fn parses_numbered_placemarks() {
        let wps = parse_waypoints(MISSION).unwrap();
        assert_eq!(wps.len(), 2);
        assert_eq!(wps[0].name, 1);
        assert_eq!(wps[0].position, LatLon::new(52.4, -1.5));
        assert_eq!(wps[1].name, 2);
        assert_eq!(wps[1].position, LatLon::new(52.4, -1.499));
    }

    #[test]
    fn document_name_is_not_a_waypoint() {
        let wps = parse_waypoints(MISSION).unwrap();
        assert!(wps.iter().all(|w| w.name != 0));
    }

    #[test]
    fn prefixed_elements_match() {
        let kml = r#"<k:kml xmlns:k="http://www.opengis.net/kml/2.2"><k:Placemark>
            <k:name>7</k:name><k:Point><k:coordinates>0.1,51.5</k:coordinates></k:Point>
            </k:Placemark></k:kml>"#;
        let wps = parse_waypoints(kml).unwrap();
        assert_eq!(wps, vec![Waypoint { name: 7, position: LatLon::new(51.5, 0.1) }]);
    }

    #[test]
    fn non_numeric_name_is_rejected() {
        let kml = r#"<kml><Placemark><name>Home</name>
            <Point><coordinates>0.1,51.5</coordinates></Point></Placemark></kml>"#;
        let err = parse_waypoints(kml).unwrap_err();
        assert!(err.to_string().contains("'Home'"));
    }

    #[test]
    fn bad_coordinates_are_rejected() {
        let kml = r#"<kml><Placemark><name>3</name>
            <Point><coordinates>east,north</coordinates></Point></Placemark></kml>"#;
        assert!(matches!(
            parse_waypoints(kml),
            Err(GeoError::WaypointCoordinates { .. })
        ));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let kml = "<kml><Placemark><name>1</name></Document></kml>";
        assert!(matches!(parse_waypoints(kml), Err(GeoError::Kml(_))));
    }
}
