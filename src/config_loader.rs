use crate::config::{Config, OverlayStrategy, PathSelectionStrategy};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    config.validate()?;

    info!(
        "Overlay strategy: {}, path selection strategy: {}",
        config.overlay.strategy, config.paths.strategy
    );

    Ok(config)
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_path: Option<String>,
    pub results_path: Option<String>,
    pub seed: Option<u64>,
    pub overlay_strategy: Option<OverlayStrategy>,
    pub path_strategy: Option<PathSelectionStrategy>,
}

/// Apply CLI overrides to a loaded configuration
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    if let Some(data_path) = &overrides.data_path {
        info!("Overriding data path: {}", data_path);
        config.general.data_path = data_path.clone();
    }

    if let Some(results_path) = &overrides.results_path {
        info!("Overriding results path: {}", results_path);
        config.general.results_path = results_path.clone();
    }

    if let Some(seed) = overrides.seed {
        info!("Overriding seed: {}", seed);
        config.general.seed = Some(seed);
    }

    if let Some(strategy) = overrides.overlay_strategy {
        info!("Overriding overlay strategy: {}", strategy);
        config.overlay.strategy = strategy;
    }

    if let Some(strategy) = overrides.path_strategy {
        info!("Overriding path selection strategy: {}", strategy);
        config.paths.strategy = strategy;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const YAML: &str = r#"
general:
  data_path: "data"
  seed: 7
overlay:
  strategy: "Random"
  initial_neighbor_count: 3
paths:
  strategy: "Latency-aware"
  latency_threshold: 90000
"#;

    #[test]
    fn test_load_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", YAML).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.general.seed, Some(7));
        assert_eq!(config.overlay.strategy, OverlayStrategy::Random);
        assert_eq!(config.overlay.latency_aware_neighbor_count, 0);
        assert_eq!(config.paths.strategy, PathSelectionStrategy::LatencyAware);
        assert_eq!(config.paths.latency_threshold, 90_000);
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", YAML.replace("initial_neighbor_count: 3", "initial_neighbor_count: 0")).unwrap();
        assert!(load_config(temp_file.path()).is_err());

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", YAML.replace("\"Random\"", "\"Ring\"")).unwrap();
        assert!(load_config(temp_file.path()).is_err());

        assert!(load_config(Path::new("/nonexistent/config.yaml")).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", YAML).unwrap();
        let mut config = load_config(temp_file.path()).unwrap();

        let overrides = CliOverrides {
            data_path: Some("other".to_string()),
            results_path: None,
            seed: Some(99),
            overlay_strategy: Some(OverlayStrategy::LatencyAware),
            path_strategy: Some(PathSelectionStrategy::Random),
        };
        apply_overrides(&mut config, &overrides).unwrap();

        assert_eq!(config.general.data_path, "other");
        assert_eq!(config.general.results_path, "results");
        assert_eq!(config.general.seed, Some(99));
        assert_eq!(config.overlay.strategy, OverlayStrategy::LatencyAware);
        assert_eq!(config.paths.strategy, PathSelectionStrategy::Random);
    }
}
