//! `flightcheck-recon`: planned-vs-captured flight reconciliation.
//!
//! Engine crate: aligns the planned waypoints with the captured image
//! positions, walks the operator through duplicate removal and plan
//! truncation, then computes per-point positional accuracy.
//! All interaction goes through the [`Operator`] trait; no terminal IO here.

pub mod accuracy;
pub mod align;
pub mod artifacts;
pub mod config;
pub mod duplicate;
pub mod error;
pub mod images;
pub mod model;
pub mod operator;
pub mod orchestrator;
pub mod record;
pub mod tabular;
pub mod truncate;

pub use accuracy::{AccuracyReport, PointAccuracy};
pub use align::Alignment;
pub use artifacts::{ArtifactSink, CsvArtifacts};
pub use config::FlightConfig;
pub use error::SurveyError;
pub use images::{CaptureStore, ImageDirectory};
pub use model::{Point, PointName, PointSet, SetKind};
pub use operator::{Cancelled, Operator, ScriptedOperator};
pub use orchestrator::{run, Session};
pub use record::{AbortReason, Outcome, ReconciliationRecord};
pub use truncate::Truncation;
