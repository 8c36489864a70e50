use proptest::prelude::*;

use flightcheck_recon::accuracy::assess;
use flightcheck_recon::align::{check, Alignment};
use flightcheck_recon::artifacts::NoArtifacts;
use flightcheck_recon::truncate::truncate;
use flightcheck_recon::{Point, PointName, PointSet, ScriptedOperator, SetKind};

fn point_set(kind: SetKind, coords: &[(f64, f64)]) -> PointSet {
    let points = coords
        .iter()
        .enumerate()
        .map(|(i, &(e, n))| Point::new(i as PointName + 1, e, n))
        .collect();
    PointSet::new(kind, points).unwrap()
}

fn coord() -> impl Strategy<Value = (f64, f64)> {
    (0.0..700_000.0f64, 0.0..1_300_000.0f64)
}

proptest! {
    #[test]
    fn distance_matches_formula(pairs in prop::collection::vec((coord(), coord()), 0..60)) {
        let planned: Vec<_> = pairs.iter().map(|p| p.0).collect();
        let captured: Vec<_> = pairs.iter().map(|p| p.1).collect();
        let planned = point_set(SetKind::Planned, &planned);
        let captured = point_set(SetKind::Captured, &captured);

        let report = assess(&planned, &captured).unwrap();
        prop_assert_eq!(report.len(), pairs.len());
        for (i, ((e1, n1), (e2, n2))) in pairs.iter().enumerate() {
            let expected = ((e1 - e2).powi(2) + (n1 - n2).powi(2)).sqrt();
            prop_assert!((report.points[i].distance_m - expected).abs() <= 1e-6 * expected.max(1.0));
            prop_assert!(report.points[i].distance_m >= 0.0);
        }
    }

    #[test]
    fn classification_depends_on_length_only(p in 0usize..40, c in 0usize..40) {
        let planned = point_set(SetKind::Planned, &vec![(0.0, 0.0); p]);
        let captured = point_set(SetKind::Captured, &vec![(1.0, 1.0); c]);
        let first = check(&planned, &captured);
        prop_assert_eq!(first, check(&planned, &captured));
        let expected = match c.cmp(&p) {
            std::cmp::Ordering::Equal => Alignment::Equal,
            std::cmp::Ordering::Greater => Alignment::Excess,
            std::cmp::Ordering::Less => Alignment::Deficit,
        };
        prop_assert_eq!(first, expected);
    }

    #[test]
    fn range_truncation_partitions_the_plan(
        names in prop::collection::btree_set(1u32..200, 1..50),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let names: Vec<u32> = names.into_iter().collect();
        let (mut start, mut end) = (names[a.index(names.len())], names[b.index(names.len())]);
        if end < start {
            std::mem::swap(&mut start, &mut end);
        }

        // shuffle by reversing so truncation has to restore order
        let points = names.iter().rev().map(|&n| Point::new(n, f64::from(n), 0.0)).collect();
        let mut planned = PointSet::new(SetKind::Planned, points).unwrap();

        let answers = ["range".to_string(), start.to_string(), end.to_string()];
        let mut op = ScriptedOperator::new(answers);
        truncate(&mut op, &mut planned, &mut NoArtifacts).unwrap();

        let kept: Vec<u32> = names.iter().copied().filter(|n| *n < start || *n > end).collect();
        prop_assert_eq!(planned.names(), kept);
        prop_assert!(planned.is_sorted_by_name());
    }
}
