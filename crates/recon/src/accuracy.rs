use serde::Serialize;

use crate::error::SurveyError;
use crate::model::{PointName, PointSet};

/// Distance between the i-th planned and i-th captured point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointAccuracy {
    /// Captured point the distance is reported against.
    pub name: PointName,
    /// Planned waypoint it was paired with.
    pub planned_name: PointName,
    pub distance_m: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccuracyReport {
    /// One entry per captured point, in captured order.
    pub points: Vec<PointAccuracy>,
}

impl AccuracyReport {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn distances(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.distance_m)
    }
}

/// Pair the sets by position and measure each pair.
///
/// Both sets must already be sorted by name; an unsorted set is an error
/// rather than being paired in whatever order it holds. Pairing is by index,
/// not by name: after truncation the surviving names need not agree between
/// the two sets.
pub fn assess(planned: &PointSet, captured: &PointSet) -> Result<AccuracyReport, SurveyError> {
    if planned.len() != captured.len() {
        return Err(SurveyError::LengthMismatch {
            planned: planned.len(),
            captured: captured.len(),
        });
    }
    for set in [planned, captured] {
        if !set.is_sorted_by_name() {
            return Err(SurveyError::Unsorted(set.kind()));
        }
    }

    let points = planned
        .iter()
        .zip(captured.iter())
        .map(|(p, c)| PointAccuracy {
            name: c.name,
            planned_name: p.name,
            distance_m: p.distance_to(c),
        })
        .collect();

    Ok(AccuracyReport { points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Point, SetKind};

    fn set(kind: SetKind, pts: &[(u32, f64, f64)]) -> PointSet {
        PointSet::new(kind, pts.iter().map(|&(n, e, no)| Point::new(n, e, no)).collect()).unwrap()
    }

    #[test]
    fn pairs_by_position() {
        let planned = set(SetKind::Planned, &[(1, 100.0, 200.0), (2, 110.0, 200.0), (3, 120.0, 200.0)]);
        let captured = set(SetKind::Captured, &[(1, 100.0, 200.0), (2, 110.0, 201.0), (3, 120.0, 200.0)]);

        let report = assess(&planned, &captured).unwrap();
        assert_eq!(report.distances().collect::<Vec<_>>(), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn names_need_not_match() {
        // plan truncated at 2, captures skipped 3
        let planned = set(SetKind::Planned, &[(1, 0.0, 0.0), (3, 10.0, 0.0)]);
        let captured = set(SetKind::Captured, &[(1, 0.0, 0.0), (2, 13.0, 4.0)]);

        let report = assess(&planned, &captured).unwrap();
        assert_eq!(report.points[1].name, 2);
        assert_eq!(report.points[1].planned_name, 3);
        assert_eq!(report.points[1].distance_m, 5.0);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let planned = set(SetKind::Planned, &[(1, 0.0, 0.0)]);
        let captured = set(SetKind::Captured, &[(1, 0.0, 0.0), (2, 0.0, 0.0)]);
        assert!(matches!(
            assess(&planned, &captured),
            Err(SurveyError::LengthMismatch { planned: 1, captured: 2 })
        ));
    }

    #[test]
    fn unsorted_set_is_an_error() {
        let planned = set(SetKind::Planned, &[(1, 0.0, 0.0), (2, 10.0, 0.0)]);
        let mut captured = set(SetKind::Captured, &[(2, 10.0, 0.0), (1, 0.0, 0.0)]);
        assert!(matches!(
            assess(&planned, &captured),
            Err(SurveyError::Unsorted(SetKind::Captured))
        ));

        captured.sort_by_name();
        assert_eq!(assess(&planned, &captured).unwrap().distances().sum::<f64>(), 0.0);
    }

    #[test]
    fn empty_sets_give_empty_report() {
        let planned = set(SetKind::Planned, &[]);
        let captured = set(SetKind::Captured, &[]);
        assert!(assess(&planned, &captured).unwrap().is_empty());
    }
}
