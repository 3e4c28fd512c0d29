use color_eyre::eyre::bail;

pub fn run_check(
    root: std::path::PathBuf,
    strict: bool,
    format: String,
    use_color: bool,
) -> color_eyre::Result<()> {
    tracing::debug!(event = "check_args", root = ?root, strict = strict, format = %format);
    let cfg = xlfsync_config::load_config().unwrap_or_default();
    let strict = strict || cfg.strict_check();

    let report = xlfsync_services::check_translated(&root)?;
    let total = report.untranslated_total();

    if format == "json" {
        serde_json::to_writer_pretty(std::io::stdout(), &report)?;
        println!();
    } else if total == 0 {
        crate::ui_ok!("{} document(s) checked, everything is translated", report.checked);
    } else {
        for f in &report.files {
            if use_color {
                use owo_colors::OwoColorize;
                crate::ui_out!("{} [{}] {} untranslated", f.path.blue(), f.lang.yellow(), f.ids.len());
            } else {
                crate::ui_out!("{} [{}] {} untranslated", f.path, f.lang, f.ids.len());
            }
            for id in &f.ids {
                crate::ui_out!("  {id}");
            }
        }
        crate::ui_warn!(
            "{total} untranslated unit(s) in {} of {} document(s)",
            report.files.len(),
            report.checked
        );
    }

    if strict && total > 0 {
        bail!("{total} unit(s) are not translated");
    }
    Ok(())
}
