use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default latency threshold separating fast from slow paths
pub const DEFAULT_LATENCY_THRESHOLD: u64 = 150_000;

/// Default multiplier in the `factor * log2(N)` degree cap
pub const DEFAULT_DEGREE_CAP_FACTOR: f64 = 2.0;

/// Default bandwidth capacity assigned to every mix
pub const DEFAULT_BANDWIDTH_CAPACITY: u32 = 420;

/// Strategy used to pick neighbors while constructing the overlay
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum OverlayStrategy {
    /// Uniformly random neighbor selection
    Random,
    /// Nearest neighbors first, random fill for the remaining slots
    #[serde(alias = "Latency-aware")]
    LatencyAware,
}

/// Strategy used to assign probabilities to forwarding paths
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PathSelectionStrategy {
    /// Every surviving path is equally likely
    Random,
    /// Only paths below the latency threshold are used, equally likely
    #[serde(alias = "Latency-aware")]
    LatencyAware,
}

// Same spellings as the serde names and aliases above
impl FromStr for OverlayStrategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Random" => Ok(Self::Random),
            "LatencyAware" | "Latency-aware" => Ok(Self::LatencyAware),
            _ => Err(ValidationError::InvalidOverlay(format!(
                "unknown overlay strategy '{}'",
                s
            ))),
        }
    }
}

impl FromStr for PathSelectionStrategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Random" => Ok(Self::Random),
            "LatencyAware" | "Latency-aware" => Ok(Self::LatencyAware),
            _ => Err(ValidationError::InvalidPaths(format!(
                "unknown path selection strategy '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for OverlayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "Random"),
            Self::LatencyAware => write!(f, "Latency-aware"),
        }
    }
}

impl fmt::Display for PathSelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "Random"),
            Self::LatencyAware => write!(f, "Latency-aware"),
        }
    }
}

/// Top-level configuration mirroring the YAML file
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub general: GeneralConfig,
    pub overlay: OverlayConfig,
    pub paths: PathsConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.general.data_path.trim().is_empty() {
            return Err(ValidationError::InvalidGeneral(
                "data_path cannot be empty".to_string(),
            ));
        }
        if self.general.results_path.trim().is_empty() {
            return Err(ValidationError::InvalidGeneral(
                "results_path cannot be empty".to_string(),
            ));
        }
        if self.general.bandwidth_capacity == 0 {
            return Err(ValidationError::InvalidGeneral(
                "bandwidth_capacity must be positive".to_string(),
            ));
        }

        let overlay = &self.overlay;
        if overlay.initial_neighbor_count == 0 {
            return Err(ValidationError::InvalidOverlay(
                "initial_neighbor_count must be at least 1".to_string(),
            ));
        }
        if overlay.latency_aware_neighbor_count > overlay.initial_neighbor_count {
            return Err(ValidationError::InvalidOverlay(format!(
                "latency_aware_neighbor_count ({}) cannot exceed initial_neighbor_count ({})",
                overlay.latency_aware_neighbor_count, overlay.initial_neighbor_count
            )));
        }
        if !overlay.degree_cap_factor.is_finite() || overlay.degree_cap_factor <= 0.0 {
            return Err(ValidationError::InvalidOverlay(format!(
                "degree_cap_factor must be a positive number, got {}",
                overlay.degree_cap_factor
            )));
        }

        if self.paths.latency_threshold == 0 {
            return Err(ValidationError::InvalidPaths(
                "latency_threshold must be positive".to_string(),
            ));
        }

        self.dataset.file_regex()?;
        self.dataset.exclude_regex()?;

        Ok(())
    }
}

/// Locations, seed and per-mix defaults
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeneralConfig {
    /// Root directory searched recursively for datasets
    pub data_path: String,
    #[serde(default = "default_results_path")]
    pub results_path: String,
    /// Seed for the run's random generator; drawn at startup when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_bandwidth_capacity")]
    pub bandwidth_capacity: u32,
    #[serde(default = "default_true")]
    pub write_summary: bool,
}

/// Overlay construction parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OverlayConfig {
    pub strategy: OverlayStrategy,
    pub initial_neighbor_count: usize,
    #[serde(default)]
    pub latency_aware_neighbor_count: usize,
    #[serde(default = "default_degree_cap_factor")]
    pub degree_cap_factor: f64,
}

/// Path enumeration parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathsConfig {
    pub strategy: PathSelectionStrategy,
    #[serde(default = "default_latency_threshold")]
    pub latency_threshold: u64,
}

/// Dataset discovery patterns
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatasetConfig {
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
    #[serde(default = "default_exclude_pattern")]
    pub exclude_pattern: Option<String>,
}

impl DatasetConfig {
    /// Compiled regex matched against dataset file names
    pub fn file_regex(&self) -> Result<Regex, ValidationError> {
        Regex::new(&self.file_pattern).map_err(|e| {
            ValidationError::InvalidDataset(format!(
                "invalid file_pattern '{}': {}",
                self.file_pattern, e
            ))
        })
    }

    /// Compiled regex for paths that must be skipped, if any
    pub fn exclude_regex(&self) -> Result<Option<Regex>, ValidationError> {
        match &self.exclude_pattern {
            Some(pattern) => Regex::new(pattern).map(Some).map_err(|e| {
                ValidationError::InvalidDataset(format!(
                    "invalid exclude_pattern '{}': {}",
                    pattern, e
                ))
            }),
            None => Ok(None),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            file_pattern: default_file_pattern(),
            exclude_pattern: default_exclude_pattern(),
        }
    }
}

fn default_results_path() -> String {
    "results".to_string()
}

fn default_bandwidth_capacity() -> u32 {
    DEFAULT_BANDWIDTH_CAPACITY
}

fn default_true() -> bool {
    true
}

fn default_degree_cap_factor() -> f64 {
    DEFAULT_DEGREE_CAP_FACTOR
}

fn default_latency_threshold() -> u64 {
    DEFAULT_LATENCY_THRESHOLD
}

fn default_file_pattern() -> String {
    r"edges\.dat$".to_string()
}

fn default_exclude_pattern() -> Option<String> {
    Some("qqcap".to_string())
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid overlay configuration: {0}")]
    InvalidOverlay(String),
    #[error("Invalid paths configuration: {0}")]
    InvalidPaths(String),
    #[error("Invalid dataset configuration: {0}")]
    InvalidDataset(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
general:
  data_path: "data"
overlay:
  strategy: "Latency-aware"
  initial_neighbor_count: 4
  latency_aware_neighbor_count: 2
paths:
  strategy: "Random"
"#;

    #[test]
    fn test_config_parsing_with_defaults() {
        let config: Config = serde_yaml::from_str(BASE).unwrap();
        assert!(config.validate().is_ok());

        assert_eq!(config.overlay.strategy, OverlayStrategy::LatencyAware);
        assert_eq!(config.paths.strategy, PathSelectionStrategy::Random);
        assert_eq!(config.general.results_path, "results");
        assert_eq!(config.general.bandwidth_capacity, 420);
        assert_eq!(config.general.seed, None);
        assert!(config.general.write_summary);
        assert_eq!(config.overlay.degree_cap_factor, 2.0);
        assert_eq!(config.paths.latency_threshold, 150_000);
        assert_eq!(config.dataset.exclude_pattern.as_deref(), Some("qqcap"));
    }

    #[test]
    fn test_both_strategy_spellings() {
        let yaml = BASE.replace("\"Latency-aware\"", "\"LatencyAware\"");
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.overlay.strategy, OverlayStrategy::LatencyAware);
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let yaml = BASE.replace("\"Random\"", "\"Shortest\"");
        let result: Result<Config, _> = serde_yaml::from_str(&yaml);
        assert!(result.is_err());

        assert!("Shortest".parse::<OverlayStrategy>().is_err());
        assert!("".parse::<PathSelectionStrategy>().is_err());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("Random".parse::<OverlayStrategy>().unwrap(), OverlayStrategy::Random);
        assert_eq!(
            "Latency-aware".parse::<PathSelectionStrategy>().unwrap(),
            PathSelectionStrategy::LatencyAware
        );
        assert_eq!(OverlayStrategy::LatencyAware.to_string(), "Latency-aware");
    }

    #[test]
    fn test_cli_and_yaml_accept_same_names() {
        #[derive(Deserialize)]
        struct Holder {
            overlay: OverlayStrategy,
            paths: PathSelectionStrategy,
        }

        for name in ["Random", "LatencyAware", "Latency-aware", "random", "latency-aware", "latency_aware"] {
            let yaml = format!("overlay: \"{n}\"\npaths: \"{n}\"\n", n = name);
            let from_yaml = serde_yaml::from_str::<Holder>(&yaml).ok();
            let overlay = name.parse::<OverlayStrategy>().ok();
            let paths = name.parse::<PathSelectionStrategy>().ok();

            assert_eq!(from_yaml.as_ref().map(|h| h.overlay), overlay, "overlay name {}", name);
            assert_eq!(from_yaml.as_ref().map(|h| h.paths), paths, "path name {}", name);
        }
        assert!("random".parse::<OverlayStrategy>().is_err());
    }

    #[test]
    fn test_validation_errors() {
        let mut config: Config = serde_yaml::from_str(BASE).unwrap();
        config.overlay.latency_aware_neighbor_count = 5;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidOverlay(_))));

        let mut config: Config = serde_yaml::from_str(BASE).unwrap();
        config.overlay.initial_neighbor_count = 0;
        config.overlay.latency_aware_neighbor_count = 0;
        assert!(config.validate().is_err());

        let mut config: Config = serde_yaml::from_str(BASE).unwrap();
        config.overlay.degree_cap_factor = f64::NAN;
        assert!(config.validate().is_err());

        let mut config: Config = serde_yaml::from_str(BASE).unwrap();
        config.paths.latency_threshold = 0;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidPaths(_))));

        let mut config: Config = serde_yaml::from_str(BASE).unwrap();
        config.general.data_path = "  ".to_string();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidGeneral(_))));

        let mut config: Config = serde_yaml::from_str(BASE).unwrap();
        config.dataset.file_pattern = "edges(".to_string();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidDataset(_))));
    }
}
