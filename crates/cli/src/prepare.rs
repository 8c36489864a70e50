//! Pre- and post-flight preparation: `plan`, `project`, `rename`.

use std::path::PathBuf;

use flightcheck_geo::Crs;
use flightcheck_recon::images::timed_rename;
use flightcheck_recon::tabular;
use flightcheck_recon::SetKind;

use crate::CliError;

/// Mission file → planned point table.
pub fn cmd_plan(mission: PathBuf, output: Option<PathBuf>, crs: Crs) -> Result<(), CliError> {
    let waypoints = flightcheck_geo::read_mission(&mission).map_err(CliError::from_geo)?;
    if waypoints.is_empty() {
        return Err(CliError::parse(format!("{}: no waypoints found", mission.display()))
            .with_hint("waypoints are Placemarks with a numeric <name> and <coordinates>"));
    }

    let planned = tabular::from_waypoints(&waypoints, crs)?;
    let out = output.unwrap_or_else(|| mission.with_extension("csv"));
    tabular::write_point_set(&out, &planned, None)?;

    eprintln!("{} waypoints ({crs}) written to {}", planned.len(), out.display());
    Ok(())
}

/// Add grid coordinates to a `Name,Latitude,Longitude` table.
pub fn cmd_project(input: PathBuf, output: Option<PathBuf>, crs: Crs) -> Result<(), CliError> {
    let data = std::fs::read_to_string(&input)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", input.display())))?;
    let captured =
        tabular::parse_point_set(&input.display().to_string(), SetKind::Captured, &data, crs)?;

    let out = output.unwrap_or_else(|| input.clone());
    tabular::write_point_set(&out, &captured, None)?;

    eprintln!("{} points ({crs}) written to {}", captured.len(), out.display());
    Ok(())
}

pub fn cmd_rename(dir: PathBuf, batch: Option<String>) -> Result<(), CliError> {
    if !dir.is_dir() {
        return Err(CliError::usage(format!("{} is not a directory", dir.display())));
    }

    let renamed = timed_rename(&dir, batch.as_deref())?;
    for (old, new) in &renamed {
        tracing::debug!("{old} -> {new}");
    }

    match batch {
        Some(prefix) => eprintln!(
            "{} images renamed in order of capture time, with the batch number {prefix}",
            renamed.len()
        ),
        None => eprintln!("{} images renamed in order of capture time", renamed.len()),
    }
    Ok(())
}
