pub fn run_sort(xlf: std::path::PathBuf, dry_run: bool) -> color_eyre::Result<()> {
    tracing::debug!(event = "sort_args", xlf = ?xlf, dry_run = dry_run);
    let changed = xlfsync_services::sort_file(&xlf, dry_run)?;
    match (changed, dry_run) {
        (false, _) => crate::ui_ok!("{} is already sorted", xlf.display()),
        (true, true) => crate::ui_out!("{} would be re-sorted", xlf.display()),
        (true, false) => crate::ui_ok!("{} sorted", xlf.display()),
    }
    Ok(())
}
