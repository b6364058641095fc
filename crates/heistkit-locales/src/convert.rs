use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::LocaleError;

/// `.yaml` / `.yml`, case-insensitive.
pub fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

/// Order among YAML files sharing a stem: `.yaml`, then `.yml`, then other
/// casings by name. The first one owns the JSON file.
pub(crate) fn by_precedence(a: &Path, b: &Path) -> Ordering {
    fn rank(p: &Path) -> u8 {
        match p.extension().and_then(|e| e.to_str()) {
            Some("yaml") => 0,
            Some("yml") => 1,
            _ => 2,
        }
    }
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.file_name().cmp(&b.file_name()))
}

/// YAML files next to `path` that convert to the same JSON file, owner first.
///
/// `path` is part of the result when it exists. An unreadable directory
/// yields nothing.
pub fn sources_for_target(path: &Path) -> Vec<PathBuf> {
    let (Some(dir), Some(stem)) = (path.parent(), path.file_stem()) else {
        return Vec::new();
    };
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut out: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.file_stem() == Some(stem) && is_yaml(p) && p.is_file())
        .collect();
    out.sort_by(|a, b| by_precedence(a, b));
    out
}

/// Parse YAML text and serialise it as compact JSON.
///
/// Map keys come out sorted, so the same input always yields the same bytes.
pub fn yaml_to_json(text: &str, path: &Path) -> Result<String, LocaleError> {
    let value: serde_json::Value =
        serde_yaml::from_str(text).map_err(|source| LocaleError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::to_string(&value).map_err(|source| LocaleError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert one YAML file into `target`, creating parent directories.
pub fn write_json_file_from_yaml(source: &Path, target: &Path) -> Result<(), LocaleError> {
    let text = fs::read_to_string(source).map_err(|e| LocaleError::io(source, e))?;
    let json = yaml_to_json(&text, source)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| LocaleError::io(parent, e))?;
    }
    fs::write(target, json).map_err(|e| LocaleError::io(target, e))?;
    debug!(event = "locale_written", source = %source.display(), target = %target.display());
    Ok(())
}
