//! The reconciliation state machine.
//!
//! ```text
//! Classify ─ Equal ───▶ ComputeAccuracy ─▶ Aligned
//!    │ ▲ ─── Excess ──▶ ResolveDuplicate ─▶ Classify
//!    │ └──── Deficit ─▶ ResolveDuplicate* ─▶ TruncatePlan ─▶ Classify
//! ```
//!
//! In the deficit path the duplicate resolver repeats until the operator
//! reports no further duplicates, then the plan is truncated. A classify
//! result identical to the previous one with no corrective action in between
//! aborts the run.

use flightcheck_geo::Crs;

use crate::accuracy;
use crate::align::{self, Alignment};
use crate::artifacts::ArtifactSink;
use crate::duplicate::{self, DuplicateOutcome};
use crate::error::SurveyError;
use crate::images::CaptureStore;
use crate::model::PointSet;
use crate::operator::Operator;
use crate::record::{AbortReason, Outcome, ReconciliationRecord};
use crate::truncate;

/// The collaborators one run talks to.
pub struct Session<'a> {
    pub operator: &'a mut dyn Operator,
    pub store: &'a mut dyn CaptureStore,
    pub artifacts: &'a mut dyn ArtifactSink,
    pub crs: Option<Crs>,
}

impl<'a> Session<'a> {
    pub fn new(
        operator: &'a mut dyn Operator,
        store: &'a mut dyn CaptureStore,
        artifacts: &'a mut dyn ArtifactSink,
    ) -> Self {
        Self { operator, store, artifacts, crs: None }
    }

    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = Some(crs);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Classify,
    ResolveDuplicate(Alignment),
    TruncatePlan,
    ComputeAccuracy,
}

/// Reconcile `planned` against `captured` and assess accuracy.
///
/// Both sets are sorted by name first and are left in their final state.
/// An aborted or cancelled run is still `Ok`: the outcome is in the record.
/// Mutations performed before an abort are kept.
pub fn run(
    label: &str,
    session: &mut Session<'_>,
    planned: &mut PointSet,
    captured: &mut PointSet,
) -> Result<ReconciliationRecord, SurveyError> {
    planned.sort_by_name();
    captured.sort_by_name();

    let mut record = ReconciliationRecord::start(
        label,
        session.crs.map(|c| c.to_string()),
        planned.len(),
        captured.len(),
    );
    log::info!(
        "reconciling '{label}': {} planned, {} captured",
        planned.len(),
        captured.len()
    );

    match drive(session, planned, captured, &mut record) {
        Ok(()) => {}
        Err(SurveyError::Cancelled) => abort(session, &mut record, AbortReason::Cancelled),
        Err(e) => return Err(e),
    }
    Ok(record)
}

fn drive(
    session: &mut Session<'_>,
    planned: &mut PointSet,
    captured: &mut PointSet,
    record: &mut ReconciliationRecord,
) -> Result<(), SurveyError> {
    let mut step = Step::Classify;
    let mut previous: Option<Alignment> = None;
    let mut acted = false;

    loop {
        log::debug!("step {step:?}");
        step = match step {
            Step::Classify => {
                let alignment = align::check(planned, captured);
                log::info!(
                    "alignment {alignment}: {} planned, {} captured",
                    planned.len(),
                    captured.len()
                );

                if previous == Some(alignment) && !acted {
                    let reason = match alignment {
                        Alignment::Excess => AbortReason::UnresolvedExcess,
                        _ => AbortReason::InsufficientCaptures,
                    };
                    abort(session, record, reason);
                    return Ok(());
                }
                previous = Some(alignment);
                acted = false;

                match alignment {
                    Alignment::Equal => Step::ComputeAccuracy,
                    Alignment::Excess => Step::ResolveDuplicate(Alignment::Excess),
                    Alignment::Deficit if captured.is_empty() => {
                        abort(session, record, AbortReason::InsufficientCaptures);
                        return Ok(());
                    }
                    Alignment::Deficit => Step::ResolveDuplicate(Alignment::Deficit),
                }
            }

            Step::ResolveDuplicate(context) => {
                let outcome = duplicate::resolve(
                    &mut *session.operator,
                    &mut *session.store,
                    captured,
                    &mut *session.artifacts,
                    context,
                )?;
                if let DuplicateOutcome::Removed(name) = outcome {
                    record.push_duplicate(name);
                    acted = true;
                }

                match (context, outcome) {
                    (Alignment::Deficit, DuplicateOutcome::Removed(_)) if captured.is_empty() => {
                        abort(session, record, AbortReason::InsufficientCaptures);
                        return Ok(());
                    }
                    (Alignment::Deficit, DuplicateOutcome::Removed(_)) => {
                        Step::ResolveDuplicate(Alignment::Deficit)
                    }
                    (Alignment::Deficit, DuplicateOutcome::NoAction) => Step::TruncatePlan,
                    _ => Step::Classify,
                }
            }

            Step::TruncatePlan => {
                let truncation =
                    truncate::truncate(&mut *session.operator, planned, &mut *session.artifacts)?;
                record.push_truncation(truncation);
                acted = true;
                Step::Classify
            }

            Step::ComputeAccuracy => {
                let report = accuracy::assess(planned, captured)?;
                session.artifacts.accuracy_ready(captured, &report)?;
                log::info!("accuracy assessed for {} points", report.len());
                record.finish(Outcome::Aligned, Some(report));
                return Ok(());
            }
        };
    }
}

fn abort(session: &mut Session<'_>, record: &mut ReconciliationRecord, reason: AbortReason) {
    log::warn!("reconciliation aborted: {reason}");
    session.operator.tell(&format!("Accuracy assessment aborted: {reason}."));
    record.finish(Outcome::Aborted { reason }, None);
}
