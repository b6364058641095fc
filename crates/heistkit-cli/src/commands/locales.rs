use heistkit_config::HeistkitConfig;
use heistkit_locales::{run_once, BuildReport, LocalePaths, LocaleWatcher};

pub fn run(cfg: &HeistkitConfig, watch: bool, use_color: bool) -> heistkit_core::Result<()> {
    let paths = LocalePaths::new(cfg.source_dir(), cfg.output_dir()).with_prune(cfg.prune());
    tracing::debug!(
        event = "locales_args",
        source = %paths.source.display(),
        output = %paths.output.display(),
        prune = paths.prune,
        watch = watch
    );

    if !watch {
        let report = run_once(&paths)?;
        summary(&report, use_color);
        return Ok(());
    }

    let (watcher, initial) = LocaleWatcher::spawn(paths.clone())?;
    summary(&initial, use_color);
    crate::ui_info!(
        "Watching {} (Ctrl-C to stop)",
        paths.source.display()
    );
    watcher.wait();
    Ok(())
}

// Failed files were already logged one by one; a run with failures still succeeds.
fn summary(report: &BuildReport, use_color: bool) {
    let written = report.written.len();
    let failed = report.failures.len();
    let pruned = report.pruned.len();

    if failed == 0 {
        if use_color {
            use owo_colors::OwoColorize;
            crate::ui_ok!(
                "{} locale file(s) written, {} pruned",
                written.green(),
                pruned.cyan()
            );
        } else {
            crate::ui_ok!("{written} locale file(s) written, {pruned} pruned");
        }
        return;
    }

    if use_color {
        use owo_colors::OwoColorize;
        crate::ui_warn!(
            "{} locale file(s) written, {} failed, {} pruned",
            written.green(),
            failed.red(),
            pruned.cyan()
        );
    } else {
        crate::ui_warn!("{written} locale file(s) written, {failed} failed, {pruned} pruned");
    }
    for f in &report.failures {
        crate::ui_warn!("  {}: {}", f.path.display(), f.error);
    }
}
