//! `flightcheck-geo`: geodesy and mission-file collaborators.
//!
//! Projects WGS84 coordinates onto a survey grid, pulls waypoints out of
//! KMZ/KML mission plans, and formats points as WKT.
//! No interactive IO.

pub mod error;
pub mod kml;
pub mod projection;
pub mod wkt;

pub use error::GeoError;
pub use kml::{read_mission, Waypoint};
pub use projection::{Crs, LatLon, Projected};
