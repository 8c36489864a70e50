use std::cmp::Ordering;

use serde::Serialize;

use crate::model::PointSet;

/// How the captured count compares with the planned count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Same number of points; ready for accuracy assessment.
    Equal,
    /// More captures than waypoints (likely a duplicate capture).
    Excess,
    /// Fewer captures than waypoints (flight cut short, or duplicates
    /// masking missing captures).
    Deficit,
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Excess => write!(f, "excess"),
            Self::Deficit => write!(f, "deficit"),
        }
    }
}

/// Classify by length only. Pure.
pub fn check(planned: &PointSet, captured: &PointSet) -> Alignment {
    match captured.len().cmp(&planned.len()) {
        Ordering::Equal => Alignment::Equal,
        Ordering::Greater => Alignment::Excess,
        Ordering::Less => Alignment::Deficit,
    }
}
