use serde::Serialize;

use crate::accuracy::AccuracyReport;
use crate::model::PointName;
use crate::truncate::Truncation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// Fewer captures than waypoints and nothing left to remove.
    InsufficientCaptures,
    /// More captures than waypoints but no duplicate identified.
    UnresolvedExcess,
    /// The operator ended the session.
    Cancelled,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientCaptures => {
                write!(f, "insufficient captures, no corrective action available")
            }
            Self::UnresolvedExcess => write!(f, "excess captures, no duplicate identified"),
            Self::Cancelled => write!(f, "cancelled by operator"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Aligned,
    Aborted { reason: AbortReason },
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub config_name: String,
    pub crs: Option<String>,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct InitialCounts {
    pub planned: usize,
    pub captured: usize,
}

/// Everything a reconciliation run did, for the end-of-run report.
///
/// Only the orchestrator appends to it; once `run` returns it is read-only.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationRecord {
    meta: RunMeta,
    initial: InitialCounts,
    duplicates_removed: Vec<PointName>,
    truncations: Vec<Truncation>,
    outcome: Option<Outcome>,
    accuracy: Option<AccuracyReport>,
}

impl ReconciliationRecord {
    pub(crate) fn start(label: &str, crs: Option<String>, planned: usize, captured: usize) -> Self {
        Self {
            meta: RunMeta {
                config_name: label.to_string(),
                crs,
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339(),
            },
            initial: InitialCounts { planned, captured },
            duplicates_removed: Vec::new(),
            truncations: Vec::new(),
            outcome: None,
            accuracy: None,
        }
    }

    pub(crate) fn push_duplicate(&mut self, name: PointName) {
        self.duplicates_removed.push(name);
    }

    pub(crate) fn push_truncation(&mut self, truncation: Truncation) {
        self.truncations.push(truncation);
    }

    pub(crate) fn finish(&mut self, outcome: Outcome, accuracy: Option<AccuracyReport>) {
        self.outcome = Some(outcome);
        self.accuracy = accuracy;
    }

    pub fn meta(&self) -> &RunMeta {
        &self.meta
    }

    pub fn initial(&self) -> InitialCounts {
        self.initial
    }

    pub fn duplicates_removed(&self) -> &[PointName] {
        &self.duplicates_removed
    }

    pub fn truncations(&self) -> &[Truncation] {
        &self.truncations
    }

    /// `None` only while the run is still in progress.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn accuracy(&self) -> Option<&AccuracyReport> {
        self.accuracy.as_ref()
    }

    pub fn is_aligned(&self) -> bool {
        self.outcome == Some(Outcome::Aligned)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
