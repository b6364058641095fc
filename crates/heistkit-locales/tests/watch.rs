use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use heistkit_locales::{LocalePaths, LocaleWatcher};

const WINDOW: Duration = Duration::from_secs(5);

fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < WINDOW {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(50));
    }
    cond()
}

fn json_at(path: &Path) -> Option<serde_json::Value> {
    let text = fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

#[test]
fn added_file_is_converted_and_removed_file_is_unlinked() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = LocalePaths::new(tmp.path().join("locales"), tmp.path().join("public/locales"));
    fs::create_dir_all(&paths.source).unwrap();
    let output = paths.output.clone();
    let source = paths.source.clone();

    let (watcher, initial) = LocaleWatcher::spawn(paths).unwrap();
    assert!(initial.written.is_empty());

    fs::create_dir_all(source.join("de")).unwrap();
    fs::write(source.join("de/common.yaml"), "hello: \"hi\"\n").unwrap();

    let target = output.join("de/common.json");
    assert!(
        wait_until(|| json_at(&target) == Some(serde_json::json!({ "hello": "hi" }))),
        "de/common.json never appeared"
    );
    assert_eq!(fs::read_to_string(&target).unwrap(), r#"{"hello":"hi"}"#);

    fs::remove_file(source.join("de/common.yaml")).unwrap();
    assert!(
        wait_until(|| !target.exists()),
        "de/common.json was not removed"
    );

    watcher.stop();
}

#[test]
fn initial_build_runs_before_watching() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = LocalePaths::new(tmp.path().join("locales"), tmp.path().join("out"));
    fs::create_dir_all(paths.source.join("en")).unwrap();
    fs::write(paths.source.join("en/common.yaml"), "a: 1").unwrap();
    let output = paths.output.clone();

    let (watcher, initial) = LocaleWatcher::spawn(paths).unwrap();

    assert_eq!(initial.written.len(), 1);
    assert!(output.join("en/common.json").is_file());
    drop(watcher);
}

#[test]
fn edits_are_picked_up() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = LocalePaths::new(tmp.path().join("locales"), tmp.path().join("out"));
    fs::create_dir_all(paths.source.join("en")).unwrap();
    let src = paths.source.join("en/common.yaml");
    fs::write(&src, "v: 1").unwrap();
    let target = paths.output.join("en/common.json");

    let (watcher, _) = LocaleWatcher::spawn(paths).unwrap();
    fs::write(&src, "v: 2").unwrap();

    assert!(wait_until(
        || json_at(&target) == Some(serde_json::json!({ "v": 2 }))
    ));
    watcher.stop();
}

#[test]
fn file_written_right_after_spawn_is_converted() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = LocalePaths::new(tmp.path().join("locales"), tmp.path().join("out"));
    fs::create_dir_all(paths.source.join("en")).unwrap();
    fs::write(paths.source.join("en/a.yaml"), "a: 1").unwrap();
    let source = paths.source.clone();
    let target = paths.output.join("en/late.json");

    let (watcher, initial) = LocaleWatcher::spawn(paths).unwrap();
    fs::write(source.join("en/late.yaml"), "late: true").unwrap();

    assert_eq!(initial.written.len(), 1);
    assert!(
        wait_until(|| json_at(&target) == Some(serde_json::json!({ "late": true }))),
        "en/late.json never appeared"
    );
    watcher.stop();
}

#[test]
fn spawn_fails_without_source() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = LocalePaths::new(tmp.path().join("missing"), tmp.path().join("out"));
    assert!(LocaleWatcher::spawn(paths).is_err());
}
