use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use notify::event::{AccessKind, AccessMode, CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info, warn};

use crate::convert::{is_yaml, sources_for_target, write_json_file_from_yaml};
use crate::pipeline::{prune_orphans, run_once, write_results, BuildReport};
use crate::tree::collect;
use crate::{LocaleError, LocalePaths};

/// Source-tree change, already reduced to what the pipeline reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleEvent {
    Add(PathBuf),
    Change(PathBuf),
    Unlink(PathBuf),
    AddDir(PathBuf),
    UnlinkDir(PathBuf),
}

/// Map a raw watcher event onto locale events.
///
/// Renames become an unlink of the old path plus an add of the new one. File
/// events on non-YAML paths are dropped.
pub fn classify(event: &Event) -> Vec<LocaleEvent> {
    let mut out = Vec::new();
    match &event.kind {
        EventKind::Create(CreateKind::Folder) => {
            out.extend(event.paths.iter().cloned().map(LocaleEvent::AddDir));
        }
        EventKind::Create(CreateKind::File) => {
            out.extend(event.paths.iter().cloned().map(LocaleEvent::Add));
        }
        EventKind::Create(_) => out.extend(event.paths.iter().map(|p| appeared(p))),
        EventKind::Remove(RemoveKind::Folder) => {
            out.extend(event.paths.iter().cloned().map(LocaleEvent::UnlinkDir));
        }
        EventKind::Remove(RemoveKind::File) => {
            out.extend(event.paths.iter().cloned().map(LocaleEvent::Unlink));
        }
        EventKind::Remove(_) => out.extend(event.paths.iter().map(|p| vanished(p))),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            out.extend(event.paths.iter().map(|p| vanished(p)));
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            out.extend(event.paths.iter().map(|p| appeared(p)));
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            if let [from, to] = event.paths.as_slice() {
                out.push(vanished(from));
                out.push(appeared(to));
            }
        }
        EventKind::Modify(ModifyKind::Name(_)) => {
            out.extend(event.paths.iter().map(|p| {
                if p.exists() {
                    appeared(p)
                } else {
                    vanished(p)
                }
            }));
        }
        EventKind::Modify(ModifyKind::Metadata(_)) => {}
        EventKind::Modify(_) | EventKind::Access(AccessKind::Close(AccessMode::Write)) => {
            out.extend(
                event
                    .paths
                    .iter()
                    .filter(|p| p.is_file())
                    .cloned()
                    .map(LocaleEvent::Change),
            );
        }
        _ => {}
    }
    out.retain(|e| match e {
        LocaleEvent::Add(p) | LocaleEvent::Change(p) | LocaleEvent::Unlink(p) => is_yaml(p),
        LocaleEvent::AddDir(_) | LocaleEvent::UnlinkDir(_) => true,
    });
    out
}

fn appeared(path: &Path) -> LocaleEvent {
    if path.is_dir() {
        LocaleEvent::AddDir(path.to_path_buf())
    } else {
        LocaleEvent::Add(path.to_path_buf())
    }
}

// The path is gone, so the kind can only be guessed from its name.
fn vanished(path: &Path) -> LocaleEvent {
    if is_yaml(path) {
        LocaleEvent::Unlink(path.to_path_buf())
    } else {
        LocaleEvent::UnlinkDir(path.to_path_buf())
    }
}

/// Bring the output tree in line with one source change.
pub fn apply_event(paths: &LocalePaths, event: &LocaleEvent) -> Result<BuildReport, LocaleError> {
    let mut report = BuildReport::default();
    match event {
        LocaleEvent::Add(src) | LocaleEvent::Change(src) => {
            let target = paths.output_file(src)?;
            if let Some(owner) = sources_for_target(src).into_iter().next() {
                if &owner != src {
                    return Err(LocaleError::SharedTarget {
                        path: src.clone(),
                        owner,
                    });
                }
            }
            write_json_file_from_yaml(src, &target)?;
            report.written.push(target);
        }
        LocaleEvent::Unlink(src) => {
            let target = paths.output_file(src)?;
            // A sibling with the same stem takes the JSON file over.
            if let Some(survivor) = sources_for_target(src).into_iter().next() {
                write_json_file_from_yaml(&survivor, &target)?;
                report.written.push(target);
                return Ok(report);
            }
            if remove_ignoring_missing(fs::remove_file(&target), &target)? {
                report.pruned.push(target);
            }
            // Some backends never report the parent directory going away.
            let parent_gone = src.parent().map(|p| !p.exists()).unwrap_or(false);
            if parent_gone && paths.prune {
                report.merge(prune_orphans(paths));
            }
        }
        LocaleEvent::AddDir(src) => {
            let target = paths.mirror_dir(src)?;
            fs::create_dir_all(&target).map_err(|e| LocaleError::io(&target, e))?;
            // Files may have landed before the new directory was being watched.
            let results = collect(src)?;
            report.merge(write_results(&results, &target));
        }
        LocaleEvent::UnlinkDir(src) => {
            let target = paths.mirror_dir(src)?;
            if target.is_dir()
                && remove_ignoring_missing(fs::remove_dir_all(&target), &target)?
            {
                report.pruned.push(target);
            }
        }
    }
    Ok(report)
}

fn remove_ignoring_missing(res: io::Result<()>, path: &Path) -> Result<bool, LocaleError> {
    match res {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(LocaleError::io(path, e)),
    }
}

/// Running watch session. Dropping it stops the watcher and joins its thread.
pub struct LocaleWatcher {
    watcher: Option<RecommendedWatcher>,
    worker: Option<JoinHandle<()>>,
}

impl LocaleWatcher {
    /// Start following the source tree, build it once, then apply queued and
    /// new changes until stopped.
    pub fn spawn(paths: LocalePaths) -> Result<(Self, BuildReport), LocaleError> {
        // Watchers report canonical paths (e.g. /private/var on macOS).
        let source = paths
            .source
            .canonicalize()
            .map_err(|_| LocaleError::MissingSource(paths.source.clone()))?;
        let paths = LocalePaths { source, ..paths };

        // Registered before the initial build: changes made while it runs are
        // queued and applied by the worker afterwards.
        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(&paths.source, RecursiveMode::Recursive)?;

        let initial = run_once(&paths)?;
        info!(event = "watch_started", source = %paths.source.display());

        let worker = thread::Builder::new()
            .name("heistkit-locales-watch".into())
            .spawn(move || {
                for res in rx {
                    match res {
                        Ok(raw) => handle(&paths, &raw),
                        Err(e) => error!(event = "watch_error", error = %e),
                    }
                }
                debug!(event = "watch_stopped");
            })
            .map_err(|e| LocaleError::io(Path::new("heistkit-locales-watch"), e))?;

        Ok((
            Self {
                watcher: Some(watcher),
                worker: Some(worker),
            },
            initial,
        ))
    }

    /// Block the calling thread for as long as the watcher runs.
    pub fn wait(mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!(event = "watch_panicked");
            }
        }
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the watcher drops its sender, which ends the worker loop.
        drop(self.watcher.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!(event = "watch_panicked");
            }
        }
    }
}

impl Drop for LocaleWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn handle(paths: &LocalePaths, raw: &Event) {
    for ev in classify(raw) {
        debug!(event = "watch_event", change = ?ev);
        match apply_event(paths, &ev) {
            Ok(report) => {
                for f in &report.failures {
                    error!(event = "locale_failed", path = %f.path.display(), error = %f.error);
                }
            }
            Err(e) => warn!(event = "watch_handler_failed", change = ?ev, error = %e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: EventKind, paths: &[&Path]) -> Event {
        let mut ev = Event::new(kind);
        for p in paths {
            ev = ev.add_path(p.to_path_buf());
        }
        ev
    }

    #[test]
    fn rename_becomes_unlink_and_add() {
        let ev = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &[Path::new("/l/en/a.yaml"), Path::new("/l/en/b.yaml")],
        );
        assert_eq!(
            classify(&ev),
            vec![
                LocaleEvent::Unlink(PathBuf::from("/l/en/a.yaml")),
                LocaleEvent::Add(PathBuf::from("/l/en/b.yaml")),
            ]
        );
    }

    #[test]
    fn non_yaml_files_are_ignored() {
        let ev = event(
            EventKind::Create(CreateKind::File),
            &[Path::new("/l/en/notes.txt")],
        );
        assert!(classify(&ev).is_empty());

        let ev = event(
            EventKind::Remove(RemoveKind::Folder),
            &[Path::new("/l/de")],
        );
        assert_eq!(classify(&ev), vec![LocaleEvent::UnlinkDir("/l/de".into())]);
    }

    #[test]
    fn ambiguous_removal_guesses_from_name() {
        let ev = event(
            EventKind::Remove(RemoveKind::Any),
            &[Path::new("/l/en/common.yml"), Path::new("/l/it")],
        );
        assert_eq!(
            classify(&ev),
            vec![
                LocaleEvent::Unlink("/l/en/common.yml".into()),
                LocaleEvent::UnlinkDir("/l/it".into()),
            ]
        );
    }

    #[test]
    fn unlink_dir_removes_mirror() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = LocalePaths::new(tmp.path().join("locales"), tmp.path().join("out"));
        fs::create_dir_all(paths.output.join("pt/nested")).unwrap();
        fs::write(paths.output.join("pt/nested/a.json"), "{}").unwrap();

        let report = apply_event(
            &paths,
            &LocaleEvent::UnlinkDir(paths.source.join("pt")),
        )
        .unwrap();
        assert!(!paths.output.join("pt").exists());
        assert_eq!(report.pruned, vec![paths.output.join("pt")]);
    }

    #[test]
    fn unlink_of_missing_output_is_fine() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = LocalePaths::new(tmp.path().join("locales"), tmp.path().join("out"));
        fs::create_dir_all(&paths.source).unwrap();
        let report = apply_event(
            &paths,
            &LocaleEvent::Unlink(paths.source.join("common.yaml")),
        )
        .unwrap();
        assert!(report.pruned.is_empty());
    }

    fn shared_stem() -> (tempfile::TempDir, LocalePaths) {
        let tmp = tempfile::tempdir().unwrap();
        let paths = LocalePaths::new(tmp.path().join("locales"), tmp.path().join("out"));
        fs::create_dir_all(paths.source.join("en")).unwrap();
        fs::write(paths.source.join("en/common.yaml"), "a: yaml").unwrap();
        fs::write(paths.source.join("en/common.yml"), "a: yml").unwrap();
        run_once(&paths).unwrap();
        (tmp, paths)
    }

    #[test]
    fn unlink_hands_output_to_surviving_sibling() {
        let (_tmp, paths) = shared_stem();
        let target = paths.output.join("en/common.json");
        fs::remove_file(paths.source.join("en/common.yaml")).unwrap();

        let report = apply_event(
            &paths,
            &LocaleEvent::Unlink(paths.source.join("en/common.yaml")),
        )
        .unwrap();

        assert_eq!(report.written, vec![target.clone()]);
        assert!(report.pruned.is_empty());
        assert_eq!(fs::read_to_string(&target).unwrap(), r#"{"a":"yml"}"#);
    }

    #[test]
    fn change_to_shadowed_sibling_is_refused() {
        let (_tmp, paths) = shared_stem();
        fs::write(paths.source.join("en/common.yml"), "a: edited").unwrap();

        let err = apply_event(
            &paths,
            &LocaleEvent::Change(paths.source.join("en/common.yml")),
        )
        .unwrap_err();

        assert!(matches!(err, LocaleError::SharedTarget { .. }));
        assert_eq!(
            fs::read_to_string(paths.output.join("en/common.json")).unwrap(),
            r#"{"a":"yaml"}"#
        );
    }

    #[test]
    fn add_dir_converts_existing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = LocalePaths::new(tmp.path().join("locales"), tmp.path().join("out"));
        fs::create_dir_all(paths.source.join("es")).unwrap();
        fs::write(paths.source.join("es/common.yaml"), "hola: mundo").unwrap();

        let report = apply_event(&paths, &LocaleEvent::AddDir(paths.source.join("es"))).unwrap();
        assert_eq!(report.written, vec![paths.output.join("es/common.json")]);
        assert_eq!(
            fs::read_to_string(paths.output.join("es/common.json")).unwrap(),
            r#"{"hola":"mundo"}"#
        );
    }
}
