use std::path::{Path, PathBuf};

use flightcheck_geo::Crs;
use serde::Deserialize;

use crate::error::SurveyError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlightConfig {
    pub name: String,
    #[serde(default = "default_crs")]
    pub crs: String,
    pub planned: PlannedConfig,
    pub captured: CapturedConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_crs() -> String {
    "EPSG:27700".into()
}

// ---------------------------------------------------------------------------
// Sides
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannedConfig {
    pub file: String,
    /// KMZ/KML mission; when set, the planned table is rebuilt from it.
    #[serde(default)]
    pub mission: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapturedConfig {
    pub file: String,
    #[serde(default = "default_images")]
    pub images: String,
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_images() -> String {
    ".".into()
}

fn default_extension() -> String {
    "jpg".into()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub backup_dir: Option<String>,
    #[serde(default)]
    pub json: Option<String>,
}

/// Config paths resolved against the config file's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightPaths {
    pub planned: PathBuf,
    pub mission: Option<PathBuf>,
    pub captured: PathBuf,
    pub images: PathBuf,
    pub backup_dir: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl FlightConfig {
    pub fn from_toml(input: &str) -> Result<Self, SurveyError> {
        let config: FlightConfig =
            toml::from_str(input).map_err(|e| SurveyError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, SurveyError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SurveyError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), SurveyError> {
        if self.name.trim().is_empty() {
            return Err(SurveyError::ConfigValidation("name must not be empty".into()));
        }

        self.crs()?;

        let files = [
            ("planned.file", Some(&self.planned.file)),
            ("planned.mission", self.planned.mission.as_ref()),
            ("captured.file", Some(&self.captured.file)),
            ("captured.images", Some(&self.captured.images)),
            ("output.backup_dir", self.output.backup_dir.as_ref()),
            ("output.json", self.output.json.as_ref()),
        ];
        for (key, value) in files {
            if value.is_some_and(|v| v.trim().is_empty()) {
                return Err(SurveyError::ConfigValidation(format!("{key} must not be empty")));
            }
        }

        let ext = &self.captured.extension;
        if ext.is_empty() || ext.contains(['.', '/', '\\']) {
            return Err(SurveyError::ConfigValidation(format!(
                "captured.extension must be a bare extension like \"jpg\", got \"{ext}\""
            )));
        }

        Ok(())
    }

    pub fn crs(&self) -> Result<Crs, SurveyError> {
        self.crs
            .parse()
            .map_err(|e| SurveyError::ConfigValidation(format!("crs: {e}")))
    }

    pub fn paths(&self, base: &Path) -> FlightPaths {
        let at = |p: &str| base.join(p);
        FlightPaths {
            planned: at(&self.planned.file),
            mission: self.planned.mission.as_deref().map(at),
            captured: at(&self.captured.file),
            images: at(&self.captured.images),
            backup_dir: self.output.backup_dir.as_deref().map(at),
            json: self.output.json.as_deref().map(at),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
