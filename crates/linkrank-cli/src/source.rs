//! Data source selection shared by every command.
//!
//! A source is either a named dataset (`<dir>/pages_<name>.txt` and
//! `<dir>/links_<name>.txt`) or an explicit pair of files.

use std::path::{Path, PathBuf};

use anyhow::bail;
use clap::Args;
use linkrank_core::Graph;
use linkrank_core::config::LinkrankConfig;
use linkrank_core::ingest::load_graph;
use tracing::debug;

/// Flags selecting the page and link files.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Dataset name; reads `pages_<NAME>.txt` and `links_<NAME>.txt`.
    #[arg(long, short = 'd', conflicts_with_all = ["pages", "links"])]
    pub dataset: Option<String>,

    /// Directory holding dataset files (overrides `[data] dir`).
    #[arg(long, requires = "dataset")]
    pub data_dir: Option<PathBuf>,

    /// Explicit pages file.
    #[arg(long, requires = "links")]
    pub pages: Option<PathBuf>,

    /// Explicit links file.
    #[arg(long, requires = "pages")]
    pub links: Option<PathBuf>,
}

impl SourceArgs {
    /// Resolve to a `(pages, links)` path pair.
    ///
    /// Relative data directories are taken relative to `cwd`.
    pub fn resolve(
        &self,
        config: &LinkrankConfig,
        cwd: &Path,
    ) -> anyhow::Result<(PathBuf, PathBuf)> {
        match (&self.dataset, &self.pages, &self.links) {
            (Some(name), _, _) => {
                let dir = self.data_dir.as_ref().unwrap_or(&config.data.dir);
                let dir = cwd.join(dir);
                Ok((
                    dir.join(format!("pages_{name}.txt")),
                    dir.join(format!("links_{name}.txt")),
                ))
            }
            (None, Some(pages), Some(links)) => Ok((cwd.join(pages), cwd.join(links))),
            _ => bail!("no data source: pass --dataset NAME or --pages FILE --links FILE"),
        }
    }

    /// Resolve and load the graph.
    pub fn load(&self, config: &LinkrankConfig, cwd: &Path) -> anyhow::Result<Graph> {
        let (pages, links) = self.resolve(config, cwd)?;
        debug!(pages = %pages.display(), links = %links.display(), "loading graph");
        load_graph(&pages, &links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_uses_config_dir_by_default() {
        let args = SourceArgs {
            dataset: Some("small".to_string()),
            ..SourceArgs::default()
        };
        let (pages, links) = args
            .resolve(&LinkrankConfig::default(), Path::new("/work"))
            .expect("resolve");
        assert_eq!(pages, PathBuf::from("/work/database/pages_small.txt"));
        assert_eq!(links, PathBuf::from("/work/database/links_small.txt"));
    }

    #[test]
    fn data_dir_flag_overrides_config() {
        let args = SourceArgs {
            dataset: Some("big".to_string()),
            data_dir: Some(PathBuf::from("/data")),
            ..SourceArgs::default()
        };
        let (pages, _) = args
            .resolve(&LinkrankConfig::default(), Path::new("/work"))
            .expect("resolve");
        assert_eq!(pages, PathBuf::from("/data/pages_big.txt"));
    }

    #[test]
    fn explicit_files_are_used_as_given() {
        let args = SourceArgs {
            pages: Some(PathBuf::from("p.txt")),
            links: Some(PathBuf::from("/abs/l.txt")),
            ..SourceArgs::default()
        };
        let (pages, links) = args
            .resolve(&LinkrankConfig::default(), Path::new("/work"))
            .expect("resolve");
        assert_eq!(pages, PathBuf::from("/work/p.txt"));
        assert_eq!(links, PathBuf::from("/abs/l.txt"));
    }

    #[test]
    fn missing_source_is_an_error() {
        let err = SourceArgs::default()
            .resolve(&LinkrankConfig::default(), Path::new("/work"))
            .unwrap_err();
        assert!(err.to_string().contains("no data source"));
    }
}
