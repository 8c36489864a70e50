//! End-of-run summary for `flightcheck assess`.

use flightcheck_recon::{Outcome, ReconciliationRecord};

pub fn render(record: &ReconciliationRecord) -> String {
    let mut lines = Vec::new();
    let initial = record.initial();

    lines.push(format!(
        "Flight '{}': {} planned waypoints, {} captured images.",
        record.meta().config_name,
        initial.planned,
        initial.captured
    ));
    if initial.captured < initial.planned {
        lines.push("-Not enough images to match the flight plan.".to_string());
    }

    let duplicates = record.duplicates_removed();
    if !duplicates.is_empty() {
        let names: Vec<String> = duplicates.iter().map(|n| n.to_string()).collect();
        lines.push(format!("-Duplicate image(s) {} deleted.", names.join(", ")));
    }

    for truncation in record.truncations() {
        lines.push(format!(
            "-Flight plan amended by deleting points {truncation} to match the captured images."
        ));
    }

    match record.outcome() {
        Some(Outcome::Aligned) => {
            let assessed = record.accuracy().map(|a| a.len()).unwrap_or(0);
            lines.push(format!("-Accuracy assessment successful: {assessed} points assessed."));
        }
        Some(Outcome::Aborted { reason }) => {
            lines.push(format!("-Accuracy assessment aborted: {reason}."));
        }
        None => lines.push("-Accuracy assessment incomplete.".to_string()),
    }

    lines.join("\n")
}
