use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::convert::is_yaml;
use crate::LocaleError;

/// In-memory image of the source tree, keyed by file or directory name.
pub type Results = BTreeMap<String, ResultNode>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultNode {
    Dir(Results),
    /// Path of a YAML source, rooted like the walked directory.
    File(PathBuf),
}

/// Walk `source_root` and keep every directory and every YAML file.
///
/// Entries that cannot be read below the root are logged and skipped; a root
/// that is missing or not a directory fails the whole walk.
pub fn collect(source_root: &Path) -> Result<Results, LocaleError> {
    if !source_root.is_dir() {
        return Err(LocaleError::MissingSource(source_root.to_path_buf()));
    }

    let mut out = Results::new();
    let walker = WalkDir::new(source_root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(event = "locale_walk_skipped", error = %e);
                continue;
            }
        };
        let Ok(rel) = entry.path().strip_prefix(source_root) else {
            continue;
        };
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        if entry.file_type().is_dir() {
            insert(&mut out, &parts, ResultNode::Dir(Results::new()));
        } else if is_yaml(entry.path()) {
            insert(&mut out, &parts, ResultNode::File(entry.into_path()));
        }
    }

    Ok(out)
}

fn insert(tree: &mut Results, parts: &[String], leaf: ResultNode) {
    match parts {
        [] => {}
        [name] => {
            tree.entry(name.clone()).or_insert(leaf);
        }
        [head, rest @ ..] => {
            let node = tree
                .entry(head.clone())
                .or_insert_with(|| ResultNode::Dir(Results::new()));
            if let ResultNode::Dir(children) = node {
                insert(children, rest, leaf);
            }
        }
    }
}

/// All YAML sources of the tree, in walk order.
pub fn source_files(results: &Results) -> Vec<&Path> {
    let mut out = Vec::new();
    for node in results.values() {
        match node {
            ResultNode::Dir(children) => out.extend(source_files(children)),
            ResultNode::File(path) => out.push(path.as_path()),
        }
    }
    out
}
