use std::fmt;

use flightcheck_geo::GeoError;

use crate::model::{PointName, SetKind};
use crate::operator::Cancelled;

#[derive(Debug)]
pub enum SurveyError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad CRS, empty file name, etc.).
    ConfigValidation(String),
    /// Two points in one set share a name.
    DuplicateName { kind: SetKind, name: PointName },
    /// A point name in the data is not a positive integer.
    InvalidName { source: String, value: String },
    /// Missing required column in tabular input.
    MissingColumn { source: String, column: String },
    /// Coordinate value cannot be parsed.
    CoordinateParse { source: String, name: String, column: String, value: String },
    /// Accuracy requested on sets of different length. Orchestration bug.
    LengthMismatch { planned: usize, captured: usize },
    /// Accuracy requested on a set not in name order.
    Unsorted(SetKind),
    /// An accuracy report does not have one distance per table row.
    ReportLength { rows: usize, distances: usize },
    /// Operator aborted the session.
    Cancelled,
    /// Reprojection / mission / WKT failure.
    Geo(GeoError),
    /// IO error (file read/write, image removal).
    Io(String),
}

impl fmt::Display for SurveyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::DuplicateName { kind, name } => {
                write!(f, "{kind} points: name {name} appears more than once")
            }
            Self::InvalidName { source, value } => {
                write!(f, "{source}: point name '{value}' is not a positive integer")
            }
            Self::MissingColumn { source, column } => {
                write!(f, "{source}: missing column '{column}'")
            }
            Self::CoordinateParse { source, name, column, value } => {
                write!(f, "{source}, point {name}: cannot parse {column} '{value}'")
            }
            Self::LengthMismatch { planned, captured } => write!(
                f,
                "accuracy assessment needs equal point counts (planned {planned}, captured {captured})"
            ),
            Self::Unsorted(kind) => write!(f, "{kind} points are not sorted by name"),
            Self::ReportLength { rows, distances } => {
                write!(f, "accuracy report has {distances} distances for {rows} rows")
            }
            Self::Cancelled => write!(f, "cancelled by operator"),
            Self::Geo(e) => write!(f, "{e}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for SurveyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Geo(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GeoError> for SurveyError {
    fn from(e: GeoError) -> Self {
        Self::Geo(e)
    }
}

impl From<Cancelled> for SurveyError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}
