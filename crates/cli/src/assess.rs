//! `flightcheck assess` / `flightcheck validate`: config-driven reconciliation.

use std::path::{Path, PathBuf};

use flightcheck_recon::artifacts::backup;
use flightcheck_recon::tabular::{self, load_point_set};
use flightcheck_recon::{CsvArtifacts, FlightConfig, ImageDirectory, Outcome, Session, SetKind};

use crate::console::ConsoleOperator;
use crate::exit_codes::exit_code_for_abort;
use crate::{summary, CliError};

pub fn cmd_assess(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = FlightConfig::load(&config_path)?;
    let crs = config.crs()?;

    // Resolve file paths relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let paths = config.paths(base_dir);

    if let Some(mission) = &paths.mission {
        let waypoints = flightcheck_geo::read_mission(mission).map_err(CliError::from_geo)?;
        let planned = tabular::from_waypoints(&waypoints, crs)?;
        tabular::write_point_set(&paths.planned, &planned, None)?;
        tracing::info!(
            "extracted {} waypoints from {} into {}",
            planned.len(),
            mission.display(),
            paths.planned.display()
        );
    }

    if let Some(dir) = &paths.backup_dir {
        backup(&[paths.planned.as_path(), paths.captured.as_path()], dir)?;
    }

    let mut planned = load_point_set(&paths.planned, SetKind::Planned, crs)?;
    let mut captured = load_point_set(&paths.captured, SetKind::Captured, crs)?;

    let mut operator = ConsoleOperator::stdio();
    let mut store = ImageDirectory::new(&paths.images, &config.captured.extension);
    let mut artifacts = CsvArtifacts::new(&paths.planned, &paths.captured);
    let mut session = Session::new(&mut operator, &mut store, &mut artifacts).with_crs(crs);

    let record = flightcheck_recon::run(&config.name, &mut session, &mut planned, &mut captured)?;

    let json_str = record
        .to_json()
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

    if let Some(path) = output_file.as_ref().or(paths.json.as_ref()) {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    eprintln!("\n{}", summary::render(&record));

    match record.outcome() {
        Some(Outcome::Aborted { reason }) => Err(CliError {
            code: exit_code_for_abort(reason),
            message: String::new(),
            hint: None,
        }),
        _ => Ok(()),
    }
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = FlightConfig::load(&config_path)?;
    let crs = config.crs()?;
    eprintln!(
        "{}: valid ('{}', {crs}, planned {}, captured {})",
        config_path.display(),
        config.name,
        config.planned.file,
        config.captured.file
    );
    Ok(())
}
