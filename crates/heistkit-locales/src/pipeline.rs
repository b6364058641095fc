use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{error, info};
use walkdir::WalkDir;

use crate::convert::{by_precedence, write_json_file_from_yaml};
use crate::tree::{collect, source_files, ResultNode, Results};
use crate::{LocaleError, LocalePaths};

/// A file the run could not handle. The run itself carried on.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: LocaleError,
}

/// Outcome of one build pass.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
    pub pruned: Vec<PathBuf>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, path: &Path, err: LocaleError) {
        error!(event = "locale_failed", path = %path.display(), error = %err);
        self.failures.push(FileFailure {
            path: path.to_path_buf(),
            error: err,
        });
    }

    pub(crate) fn merge(&mut self, other: BuildReport) {
        self.written.extend(other.written);
        self.failures.extend(other.failures);
        self.pruned.extend(other.pruned);
    }
}

/// Full conversion of the source tree, followed by the prune pass when enabled.
///
/// Only an unusable source root is an error; everything else lands in the report.
pub fn run_once(paths: &LocalePaths) -> Result<BuildReport, LocaleError> {
    let results = collect(&paths.source)?;
    let sources = source_files(&results).len();
    let mut report = write_results(&results, &paths.output);
    if paths.prune {
        report.merge(prune_orphans(paths));
    }
    info!(
        event = "locales_built",
        source = %paths.source.display(),
        output = %paths.output.display(),
        sources,
        written = report.written.len(),
        failed = report.failures.len(),
        pruned = report.pruned.len()
    );
    Ok(report)
}

/// Materialise `results` under `output_dir`: one directory per `Dir`, one JSON
/// file per YAML leaf.
pub fn write_results(results: &Results, output_dir: &Path) -> BuildReport {
    let mut report = BuildReport::default();
    write_level(results, output_dir, &mut report);
    report
}

fn write_level(results: &Results, dir: &Path, report: &mut BuildReport) {
    if let Err(e) = fs::create_dir_all(dir) {
        report.fail(dir, LocaleError::io(dir, e));
        return;
    }
    let mut targets: BTreeMap<PathBuf, Vec<&Path>> = BTreeMap::new();
    for (name, node) in results {
        match node {
            ResultNode::Dir(children) => write_level(children, &dir.join(name), report),
            ResultNode::File(source) => targets
                .entry(dir.join(Path::new(name).with_extension("json")))
                .or_default()
                .push(source.as_path()),
        }
    }

    for (target, mut sources) in targets {
        sources.sort_by(|a, b| by_precedence(a, b));
        let mut sources = sources.into_iter();
        let Some(owner) = sources.next() else {
            continue;
        };
        match write_json_file_from_yaml(owner, &target) {
            Ok(()) => report.written.push(target),
            Err(e) => report.fail(owner, e),
        }
        for shadowed in sources {
            let err = LocaleError::SharedTarget {
                path: shadowed.to_path_buf(),
                owner: owner.to_path_buf(),
            };
            report.fail(shadowed, err);
        }
    }
}

/// Remove output entries whose source is gone.
///
/// A `.json` file is an orphan when neither `<stem>.yaml` nor `<stem>.yml`
/// exists at the mirrored source location. A directory is removed only when it
/// is empty and its source directory is gone. Nothing else is touched.
pub fn prune_orphans(paths: &LocalePaths) -> BuildReport {
    let mut report = BuildReport::default();
    if !paths.output.is_dir() {
        return report;
    }

    let walker = WalkDir::new(&paths.output).min_depth(1).contents_first(true);
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let path = e.path().unwrap_or(&paths.output).to_path_buf();
                report.fail(&path, LocaleError::io(&path, io::Error::other(e)));
                continue;
            }
        };
        let path = entry.path();
        let Ok(rel) = path.strip_prefix(&paths.output) else {
            continue;
        };
        let source = paths.source.join(rel);

        let removed = if entry.file_type().is_dir() {
            if source.is_dir() || !is_empty_dir(path) {
                continue;
            }
            fs::remove_dir(path)
        } else {
            let is_json = path.extension().map(|e| e == "json").unwrap_or(false);
            if !is_json || has_yaml_source(&source) {
                continue;
            }
            fs::remove_file(path)
        };

        match removed {
            Ok(()) => {
                info!(event = "locale_pruned", path = %path.display());
                report.pruned.push(path.to_path_buf());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => report.fail(path, LocaleError::io(path, e)),
        }
    }
    report
}

fn has_yaml_source(mirrored: &Path) -> bool {
    ["yaml", "yml"]
        .iter()
        .any(|ext| mirrored.with_extension(ext).is_file())
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut it| it.next().is_none())
        .unwrap_or(false)
}
