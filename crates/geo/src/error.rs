use std::fmt;

#[derive(Debug)]
pub enum GeoError {
    /// CRS identifier is not one of the supported grids.
    UnsupportedCrs(String),
    /// Latitude/longitude outside the valid range (or not finite).
    InvalidCoordinate { latitude: f64, longitude: f64 },
    /// Mission archive holds no `.kml` document.
    MissingKml(String),
    /// Mission document is not well-formed XML.
    Kml(String),
    /// Placemark name is not a positive integer.
    WaypointName(String),
    /// Placemark coordinates cannot be parsed as `lon,lat[,alt]`.
    WaypointCoordinates { name: String, value: String },
    /// WKT text is not a 2D point.
    Wkt(String),
    /// IO error (file read, archive access).
    Io(String),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedCrs(code) => {
                write!(f, "unsupported CRS '{code}' (expected EPSG:27700, EPSG:326NN or EPSG:327NN)")
            }
            Self::InvalidCoordinate { latitude, longitude } => {
                write!(f, "invalid coordinate: latitude {latitude}, longitude {longitude}")
            }
            Self::MissingKml(path) => write!(f, "{path}: archive contains no .kml document"),
            Self::Kml(msg) => write!(f, "KML parse error: {msg}"),
            Self::WaypointName(name) => {
                write!(f, "waypoint name '{name}' is not a positive integer")
            }
            Self::WaypointCoordinates { name, value } => {
                write!(f, "waypoint '{name}': cannot parse coordinates '{value}'")
            }
            Self::Wkt(text) => write!(f, "not a WKT point: '{text}'"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for GeoError {}
