//! `linkrank.toml` configuration.
//!
//! Every field has a default, so an empty or missing file is valid.
//!
//! ```toml
//! [data]
//! dir = "database"
//!
//! [rank]
//! damping = 0.85
//! tolerance = 1e-6
//! max_iterations = 500
//! timeout_secs = 60
//!
//! [titles]
//! exclude_separator = true
//! separator = "_"
//!
//! [sample]
//! count = 5
//! seed = 42
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::queries::TitleFilter;
use crate::rank::{DEFAULT_MAX_ITERATIONS, RankConfig};

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "linkrank.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkrankConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub rank: RankSection,
    #[serde(default)]
    pub titles: TitleConfig,
    #[serde(default)]
    pub sample: SampleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding `pages_<dataset>.txt` and `links_<dataset>.txt`.
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankSection {
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for RankSection {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            timeout_secs: None,
        }
    }
}

impl RankSection {
    /// Engine config; the deadline, if any, starts counting now.
    #[must_use]
    pub fn to_rank_config(&self) -> RankConfig {
        RankConfig {
            damping: self.damping,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            deadline: self
                .timeout_secs
                .and_then(|secs| Instant::now().checked_add(Duration::from_secs(secs))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleConfig {
    #[serde(default = "default_true")]
    pub exclude_separator: bool,
    #[serde(default = "default_separator")]
    pub separator: char,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            exclude_separator: default_true(),
            separator: default_separator(),
        }
    }
}

impl TitleConfig {
    #[must_use]
    pub fn to_filter(&self) -> TitleFilter {
        TitleFilter {
            excluded_separator: self.exclude_separator.then_some(self.separator),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Number of random shortest-path queries per sample run.
    #[serde(default = "default_sample_count")]
    pub count: usize,
    /// Fixed seed for reproducible runs; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: default_sample_count(),
            seed: None,
        }
    }
}

/// Load configuration.
///
/// With an explicit `path` the file must exist. Without one,
/// [`DEFAULT_CONFIG_FILE`] in `cwd` is used if present, otherwise defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for
/// [`LinkrankConfig`].
pub fn load_config(path: Option<&Path>, cwd: &Path) -> Result<LinkrankConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let candidate = cwd.join(DEFAULT_CONFIG_FILE);
            if !candidate.is_file() {
                debug!("no config file, using defaults");
                return Ok(LinkrankConfig::default());
            }
            candidate
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config: LinkrankConfig =
        toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("database")
}

const fn default_damping() -> f64 {
    0.85
}

const fn default_tolerance() -> f64 {
    1e-6
}

const fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

const fn default_true() -> bool {
    true
}

const fn default_separator() -> char {
    '_'
}

const fn default_sample_count() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_default_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config(None, dir.path()).expect("load");
        assert_eq!(config.data.dir, PathBuf::from("database"));
        assert!((config.rank.damping - 0.85).abs() < f64::EPSILON);
        assert_eq!(config.rank.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.sample.count, 5);
        assert_eq!(config.titles.to_filter(), TitleFilter::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[rank]\ndamping = 0.5\n\n[titles]\nexclude_separator = false\n",
        )
        .expect("write");

        let config = load_config(None, dir.path()).expect("load");
        assert!((config.rank.damping - 0.5).abs() < f64::EPSILON);
        assert!((config.rank.tolerance - 1e-6).abs() < f64::EPSILON);
        assert_eq!(config.titles.to_filter(), TitleFilter::keep_all());
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("elsewhere.toml");
        assert!(load_config(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn bad_toml_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[rank\ndamping = ").expect("write");
        let err = load_config(Some(&path), dir.path()).unwrap_err();
        assert!(err.to_string().contains("parse config"));
    }

    #[test]
    fn custom_separator_and_sample_seed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[titles]\nseparator = \"-\"\n[sample]\ncount = 3\nseed = 7\n")
            .expect("write");
        let config = load_config(Some(&path), dir.path()).expect("load");
        assert_eq!(config.titles.to_filter().excluded_separator, Some('-'));
        assert_eq!(config.sample.seed, Some(7));
        assert_eq!(config.sample.count, 3);
    }

    #[test]
    fn timeout_becomes_deadline() {
        let section = RankSection {
            timeout_secs: Some(30),
            ..RankSection::default()
        };
        assert!(section.to_rank_config().deadline.is_some());
        assert!(RankSection::default().to_rank_config().deadline.is_none());
    }
}
