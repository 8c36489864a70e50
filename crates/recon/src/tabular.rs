//! The point table: one CSV row per point.
//!
//! `Name,Latitude,Longitude,Easting,Northing,Geometry[,Distance Difference (m)]`

use std::path::Path;

use flightcheck_geo::{wkt, Crs, LatLon, Waypoint};

use crate::accuracy::AccuracyReport;
use crate::error::SurveyError;
use crate::model::{Point, PointName, PointSet, SetKind};

pub const NAME: &str = "Name";
pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";
pub const EASTING: &str = "Easting";
pub const NORTHING: &str = "Northing";
pub const GEOMETRY: &str = "Geometry";
pub const DISTANCE: &str = "Distance Difference (m)";

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

pub fn load_point_set(path: &Path, kind: SetKind, crs: Crs) -> Result<PointSet, SurveyError> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| SurveyError::Io(format!("{}: {e}", path.display())))?;
    let set = parse_point_set(&path.display().to_string(), kind, &data, crs)?;
    log::info!("loaded {} {kind} points from {}", set.len(), path.display());
    Ok(set)
}

/// Parse a point table.
///
/// Grid coordinates come from `Easting`/`Northing` when both columns exist,
/// otherwise from a WKT `Geometry` column, otherwise by projecting
/// `Latitude`/`Longitude` onto `crs`.
pub fn parse_point_set(
    source: &str,
    kind: SetKind,
    csv_data: &str,
    crs: Crs,
) -> Result<PointSet, SurveyError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| SurveyError::Io(format!("{source}: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let find = |name: &str| headers.iter().position(|h| h == name);
    let missing = |column: &str| SurveyError::MissingColumn {
        source: source.into(),
        column: column.into(),
    };

    let name_idx = find(NAME).ok_or_else(|| missing(NAME))?;
    let geographic_idx = find(LATITUDE).zip(find(LONGITUDE));
    let grid_idx = find(EASTING).zip(find(NORTHING));
    let geometry_idx = find(GEOMETRY);

    if grid_idx.is_none() && geometry_idx.is_none() && geographic_idx.is_none() {
        return Err(missing(EASTING));
    }

    let mut points = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| SurveyError::Io(format!("{source}: {e}")))?;
        let field = |i: usize| record.get(i).unwrap_or("");

        let raw_name = field(name_idx);
        let name = parse_name(raw_name).ok_or_else(|| SurveyError::InvalidName {
            source: source.into(),
            value: raw_name.into(),
        })?;

        let number = |i: usize, column: &str| -> Result<f64, SurveyError> {
            let value = field(i);
            value.parse::<f64>().map_err(|_| SurveyError::CoordinateParse {
                source: source.into(),
                name: raw_name.into(),
                column: column.into(),
                value: value.into(),
            })
        };

        // Latitude/Longitude may be left blank on grid-only rows
        let geographic = match geographic_idx {
            Some((lat, lon)) if !(field(lat).is_empty() && field(lon).is_empty()) => {
                Some(LatLon::new(number(lat, LATITUDE)?, number(lon, LONGITUDE)?))
            }
            _ => None,
        };

        let (easting, northing) = if let Some((e, n)) = grid_idx {
            (number(e, EASTING)?, number(n, NORTHING)?)
        } else if let Some(g) = geometry_idx {
            wkt::parse_point(field(g))?
        } else if let Some(position) = geographic {
            let projected = crs.project(position)?;
            (projected.easting, projected.northing)
        } else {
            return Err(missing(EASTING));
        };

        let mut point = Point::new(name, easting, northing);
        if let Some(position) = geographic {
            point = point.with_geographic(position);
        }
        points.push(point);
    }

    PointSet::new(kind, points)
}

/// Point names are positive integers. Tables written by spreadsheet tools
/// often carry them as `4.0`, so integral floats are accepted too.
fn parse_name(raw: &str) -> Option<PointName> {
    let name = match raw.parse::<PointName>() {
        Ok(n) => n,
        Err(_) => {
            let f = raw.parse::<f64>().ok()?;
            if f.fract() != 0.0 || f < 1.0 || f > f64::from(PointName::MAX) {
                return None;
            }
            f as PointName
        }
    };
    (name > 0).then_some(name)
}

// ---------------------------------------------------------------------------
// Build from a mission
// ---------------------------------------------------------------------------

/// Planned points from mission waypoints, sorted by name.
pub fn from_waypoints(waypoints: &[Waypoint], crs: Crs) -> Result<PointSet, SurveyError> {
    let points = waypoints
        .iter()
        .map(|w| {
            let projected = crs.project(w.position)?;
            Ok(Point::new(w.name, projected.easting, projected.northing)
                .with_geographic(w.position))
        })
        .collect::<Result<Vec<_>, SurveyError>>()?;

    let mut set = PointSet::new(SetKind::Planned, points)?;
    set.sort_by_name();
    Ok(set)
}

// ---------------------------------------------------------------------------
// Write
// ---------------------------------------------------------------------------

/// Render the table. With `accuracy`, each row gains the distance of the
/// same position in the report.
pub fn render(set: &PointSet, accuracy: Option<&AccuracyReport>) -> Result<String, SurveyError> {
    if let Some(report) = accuracy {
        if report.len() != set.len() {
            return Err(SurveyError::ReportLength { rows: set.len(), distances: report.len() });
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    let csv_err = |e: csv::Error| SurveyError::Io(e.to_string());

    let mut header = vec![NAME, LATITUDE, LONGITUDE, EASTING, NORTHING, GEOMETRY];
    if accuracy.is_some() {
        header.push(DISTANCE);
    }
    writer.write_record(&header).map_err(csv_err)?;

    for (i, p) in set.iter().enumerate() {
        let (lat, lon) = match p.geographic {
            Some(g) => (g.latitude.to_string(), g.longitude.to_string()),
            None => (String::new(), String::new()),
        };
        let mut row = vec![
            p.name.to_string(),
            lat,
            lon,
            p.easting.to_string(),
            p.northing.to_string(),
            wkt::point(p.easting, p.northing),
        ];
        if let Some(report) = accuracy {
            row.push(report.points[i].distance_m.to_string());
        }
        writer.write_record(&row).map_err(csv_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SurveyError::Io(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SurveyError::Io(e.to_string()))
}

pub fn write_point_set(
    path: &Path,
    set: &PointSet,
    accuracy: Option<&AccuracyReport>,
) -> Result<(), SurveyError> {
    let text = render(set, accuracy)?;
    std::fs::write(path, text).map_err(|e| SurveyError::Io(format!("{}: {e}", path.display())))?;
    log::debug!("wrote {} {} points to {}", set.len(), set.kind(), path.display());
    Ok(())
}
