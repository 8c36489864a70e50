use std::collections::HashSet;

use flightcheck_geo::LatLon;
use serde::Serialize;

use crate::error::SurveyError;

/// Waypoint / capture sequence number. Always >= 1.
pub type PointName = u32;

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A named position on the projected grid.
///
/// Equality and distance only look at `(easting, northing)`; the name and
/// the optional geographic origin are carried along for output.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    pub name: PointName,
    pub easting: f64,
    pub northing: f64,
    pub geographic: Option<LatLon>,
}

impl Point {
    pub fn new(name: PointName, easting: f64, northing: f64) -> Self {
        Self { name, easting, northing, geographic: None }
    }

    pub fn with_geographic(mut self, position: LatLon) -> Self {
        self.geographic = Some(position);
        self
    }

    /// Euclidean distance on the grid, in grid units (metres).
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.easting - other.easting).hypot(self.northing - other.northing)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.easting == other.easting && self.northing == other.northing
    }
}

// ---------------------------------------------------------------------------
// PointSet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetKind {
    /// Waypoints from the mission plan.
    Planned,
    /// Positions read from the captured images.
    Captured,
}

impl std::fmt::Display for SetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planned => write!(f, "planned"),
            Self::Captured => write!(f, "captured"),
        }
    }
}

/// Ordered points with unique names.
///
/// Built once from its source; afterwards points can only be removed.
#[derive(Debug, Clone)]
pub struct PointSet {
    kind: SetKind,
    points: Vec<Point>,
}

impl PointSet {
    pub fn new(kind: SetKind, points: Vec<Point>) -> Result<Self, SurveyError> {
        let mut seen = HashSet::with_capacity(points.len());
        for p in &points {
            if p.name == 0 {
                return Err(SurveyError::InvalidName {
                    source: format!("{kind} points"),
                    value: "0".into(),
                });
            }
            if !seen.insert(p.name) {
                return Err(SurveyError::DuplicateName { kind, name: p.name });
            }
        }
        Ok(Self { kind, points })
    }

    pub fn kind(&self) -> SetKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn names(&self) -> Vec<PointName> {
        self.points.iter().map(|p| p.name).collect()
    }

    pub fn contains(&self, name: PointName) -> bool {
        self.points.iter().any(|p| p.name == name)
    }

    pub fn get(&self, name: PointName) -> Option<&Point> {
        self.points.iter().find(|p| p.name == name)
    }

    /// Remove the point called `name`, preserving the order of the rest.
    pub fn remove(&mut self, name: PointName) -> Option<Point> {
        let idx = self.points.iter().position(|p| p.name == name)?;
        Some(self.points.remove(idx))
    }

    /// Remove every listed name that is present. Returns the names actually
    /// removed, in set order.
    pub fn remove_names(&mut self, names: &[PointName]) -> Vec<PointName> {
        self.remove_where(|n| names.contains(&n))
    }

    /// Remove every point whose name lies in `[start, end]`. The interval is
    /// arithmetic: names missing from the set are simply not matched.
    pub fn remove_range(&mut self, start: PointName, end: PointName) -> Vec<PointName> {
        self.remove_where(|n| (start..=end).contains(&n))
    }

    fn remove_where(&mut self, pred: impl Fn(PointName) -> bool) -> Vec<PointName> {
        let mut removed = Vec::new();
        self.points.retain(|p| {
            if pred(p.name) {
                removed.push(p.name);
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn sort_by_name(&mut self) {
        self.points.sort_by_key(|p| p.name);
    }

    pub fn is_sorted_by_name(&self) -> bool {
        self.points.windows(2).all(|w| w[0].name < w[1].name)
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(kind: SetKind, names: &[PointName]) -> PointSet {
        let points = names
            .iter()
            .map(|&n| Point::new(n, f64::from(n) * 10.0, 200.0))
            .collect();
        PointSet::new(kind, points).unwrap()
    }

    #[test]
    fn equality_ignores_name() {
        assert_eq!(Point::new(1, 100.0, 200.0), Point::new(9, 100.0, 200.0));
        assert_ne!(Point::new(1, 100.0, 200.0), Point::new(1, 100.0, 201.0));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(1, 0.0, 0.0);
        let b = Point::new(2, 3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = PointSet::new(
            SetKind::Captured,
            vec![Point::new(3, 0.0, 0.0), Point::new(3, 1.0, 1.0)],
        )
        .unwrap_err();
        assert!(matches!(err, SurveyError::DuplicateName { kind: SetKind::Captured, name: 3 }));
    }

    #[test]
    fn rejects_name_zero() {
        assert!(PointSet::new(SetKind::Planned, vec![Point::new(0, 0.0, 0.0)]).is_err());
    }

    #[test]
    fn remove_by_name() {
        let mut s = set(SetKind::Captured, &[1, 2, 3, 4]);
        let removed = s.remove(3).unwrap();
        assert_eq!(removed.name, 3);
        assert_eq!(s.names(), vec![1, 2, 4]);
        assert!(s.remove(3).is_none());
    }

    #[test]
    fn remove_range_ignores_gaps() {
        let mut s = set(SetKind::Planned, &[1, 2, 5, 6, 9]);
        let removed = s.remove_range(2, 8);
        assert_eq!(removed, vec![2, 5, 6]);
        assert_eq!(s.names(), vec![1, 9]);
    }

    #[test]
    fn remove_names_reports_hits_only() {
        let mut s = set(SetKind::Planned, &[1, 2, 3]);
        assert_eq!(s.remove_names(&[3, 7, 1]), vec![1, 3]);
        assert_eq!(s.names(), vec![2]);
    }

    #[test]
    fn sorting() {
        let mut s = set(SetKind::Captured, &[3, 1, 2]);
        assert!(!s.is_sorted_by_name());
        s.sort_by_name();
        assert!(s.is_sorted_by_name());
        assert_eq!(s.names(), vec![1, 2, 3]);
    }
}
