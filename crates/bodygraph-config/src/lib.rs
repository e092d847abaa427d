use bodygraph::aspects::AspectSettings;
use bodygraph::centers::DefinitionMode;
use bodygraph::ephemeris::{DESIGN_OFFSET_DAYS, MAX_DESIGN_OFFSET_DAYS};
use bodygraph::gates::WheelAlignment;
use bodygraph::jobs::JobConfig;
use bodygraph::BlueprintSettings;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the config search when set.
pub const CONFIG_ENV: &str = "BODYGRAPH_CONFIG";

const CONFIG_PATHS: [&str; 2] = ["configs/bodygraph.toml", "../../configs/bodygraph.toml"];

/// Everything the binary needs, resolved from `bodygraph.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub blueprint: BlueprintSettings,
    pub jobs: JobConfig,
    /// File the settings were read from, `None` when defaults were used.
    pub source: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blueprint: BlueprintSettings::default(),
            jobs: JobConfig::default(),
            source: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ChartToml {
    #[serde(default)]
    wheel_alignment: Option<WheelAlignment>,
    #[serde(default)]
    definition_mode: Option<DefinitionMode>,
    #[serde(default = "default_design_offset_days")]
    design_offset_days: f64,
    #[serde(default = "default_true")]
    include_nodes: bool,
}

impl Default for ChartToml {
    fn default() -> Self {
        Self {
            wheel_alignment: None,
            definition_mode: None,
            design_offset_days: default_design_offset_days(),
            include_nodes: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct AspectsToml {
    #[serde(default = "default_orb_scale")]
    orb_scale: f64,
    #[serde(default = "default_true")]
    include_minor: bool,
}

impl Default for AspectsToml {
    fn default() -> Self {
        Self {
            orb_scale: default_orb_scale(),
            include_minor: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct JobsToml {
    #[serde(default)]
    agent_count: Option<usize>,
    #[serde(default)]
    min_content_length: Option<usize>,
}

fn default_design_offset_days() -> f64 {
    DESIGN_OFFSET_DAYS
}

fn default_orb_scale() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    chart: ChartToml,
    #[serde(default)]
    aspects: AspectsToml,
    #[serde(default)]
    jobs: JobsToml,
}

/// Locate `bodygraph.toml`: `$BODYGRAPH_CONFIG` first, then the usual relative paths.
pub fn find_config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(p));
    }
    CONFIG_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Parse settings from TOML text. Missing sections and keys take defaults.
pub fn parse_settings(text: &str) -> anyhow::Result<Settings> {
    let root: RootConfigToml = toml::from_str(text)
        .map_err(|e| anyhow::anyhow!("Failed to parse bodygraph.toml: {e}"))?;

    let RootConfigToml { chart, aspects, jobs } = root;
    let offset = chart.design_offset_days;
    if !(offset.is_finite() && offset > 0.0 && offset <= MAX_DESIGN_OFFSET_DAYS) {
        anyhow::bail!(
            "chart.design_offset_days must be in (0, {}], got {}",
            MAX_DESIGN_OFFSET_DAYS,
            offset
        );
    }
    if !(aspects.orb_scale.is_finite() && aspects.orb_scale >= 0.0) {
        anyhow::bail!("aspects.orb_scale must be zero or positive, got {}", aspects.orb_scale);
    }

    let defaults = BlueprintSettings::default();
    let job_defaults = JobConfig::default();
    Ok(Settings {
        blueprint: BlueprintSettings {
            wheel_alignment: chart.wheel_alignment.unwrap_or(defaults.wheel_alignment),
            definition_mode: chart.definition_mode.unwrap_or(defaults.definition_mode),
            include_nodes: chart.include_nodes,
            design_offset_days: chart.design_offset_days,
            aspects: AspectSettings {
                orb_scale: aspects.orb_scale,
                include_minor: aspects.include_minor,
            },
        },
        jobs: JobConfig {
            agent_count: jobs.agent_count.unwrap_or(job_defaults.agent_count),
            min_content_length: jobs
                .min_content_length
                .unwrap_or(job_defaults.min_content_length),
        },
        source: None,
    })
}

/// Read and parse one file.
pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Could not read {}: {e}", path.display()))?;
    let mut settings = parse_settings(&text)?;
    settings.source = Some(path.to_path_buf());
    Ok(settings)
}

/// Load settings from the discovered config file, or defaults when there is none.
///
/// A file that exists but does not parse is an error; a missing file is not,
/// unless it was named explicitly through `$BODYGRAPH_CONFIG`.
pub fn load_settings() -> anyhow::Result<Settings> {
    match find_config_path() {
        Some(path) => {
            log::info!("Loading settings from {}", path.display());
            load_settings_from(&path)
        }
        None => {
            log::debug!("No bodygraph.toml found in {:?}; using defaults", CONFIG_PATHS);
            Ok(Settings::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_text_gives_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings.blueprint, BlueprintSettings::default());
        assert_eq!(settings.jobs, JobConfig::default());
    }

    #[test]
    fn test_all_sections() {
        let text = r#"
            [chart]
            wheel_alignment = "mandala"
            definition_mode = "connected"
            design_offset_days = 88.0
            include_nodes = false

            [aspects]
            orb_scale = 0.5
            include_minor = false

            [jobs]
            agent_count = 5
            min_content_length = 50
        "#;
        let settings = parse_settings(text).unwrap();
        assert_eq!(settings.blueprint.wheel_alignment, WheelAlignment::Mandala);
        assert_eq!(settings.blueprint.definition_mode, DefinitionMode::Connected);
        assert_eq!(settings.blueprint.design_offset_days, 88.0);
        assert!(!settings.blueprint.include_nodes);
        assert_eq!(settings.blueprint.aspects.orb_scale, 0.5);
        assert!(!settings.blueprint.aspects.include_minor);
        assert_eq!(settings.jobs, JobConfig { agent_count: 5, min_content_length: 50 });
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse_settings("[chart]\nwheel_alignment = \"sideways\"").is_err());
        assert!(parse_settings("[chart]\ndesign_offset_days = -1.0").is_err());
        assert!(parse_settings("[chart]\ndesign_offset_days = 1e12").is_err());
        assert!(parse_settings("[chart]\ndesign_offset_days = 366.5").is_err());
        assert!(parse_settings("[chart]\ndesign_offset_days = 366.0").is_ok());
        assert!(parse_settings("[aspects]\norb_scale = -2.0").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[jobs]\nagent_count = 3").unwrap();

        let settings = load_settings_from(file.path()).unwrap();
        assert_eq!(settings.jobs.agent_count, 3);
        assert_eq!(settings.source.as_deref(), Some(file.path()));
        assert!(load_settings_from(Path::new("/nonexistent/bodygraph.toml")).is_err());
    }
}
