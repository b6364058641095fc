//! YAML -> JSON locale bundles.
//!
//! `locales/<lang>/<namespace>.yaml` is mirrored to
//! `public/locales/<lang>/<namespace>.json`, either once ([`pipeline::run_once`])
//! or continuously ([`watch::LocaleWatcher`]). A broken source file never stops
//! the run: it is reported and the rest of the tree is still written.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod convert;
pub mod pipeline;
pub mod tree;
pub mod watch;

pub use convert::{is_yaml, sources_for_target, write_json_file_from_yaml};
pub use pipeline::{prune_orphans, run_once, write_results, BuildReport, FileFailure};
pub use tree::{collect, ResultNode, Results};
pub use watch::{classify, LocaleEvent, LocaleWatcher};

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("source directory not found: {0}")]
    MissingSource(PathBuf),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("cannot encode {path} as JSON: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{path} maps to the same JSON file as {owner}; skipped")]
    SharedTarget { path: PathBuf, owner: PathBuf },

    #[error("{path} is outside the source tree {root}")]
    OutsideSource { path: PathBuf, root: PathBuf },

    #[error(transparent)]
    Watch(#[from] notify::Error),
}

impl LocaleError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Source and output roots of one pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalePaths {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Remove output entries that no longer have a source counterpart.
    pub prune: bool,
}

impl LocalePaths {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            prune: true,
        }
    }

    pub fn with_prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    /// Output directory mirroring `source_dir`.
    pub fn mirror_dir(&self, source_dir: &Path) -> Result<PathBuf, LocaleError> {
        let rel = source_dir
            .strip_prefix(&self.source)
            .map_err(|_| LocaleError::OutsideSource {
                path: source_dir.to_path_buf(),
                root: self.source.clone(),
            })?;
        Ok(self.output.join(rel))
    }

    /// JSON file mirroring the YAML file `source_file`.
    pub fn output_file(&self, source_file: &Path) -> Result<PathBuf, LocaleError> {
        Ok(self.mirror_dir(source_file)?.with_extension("json"))
    }
}
