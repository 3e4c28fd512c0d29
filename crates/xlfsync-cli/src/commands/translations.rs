pub fn run_translations(xlf: std::path::PathBuf) -> color_eyre::Result<()> {
    tracing::debug!(event = "translations_args", xlf = ?xlf);
    let out = xlfsync_services::translations_for(&xlf)?;
    serde_json::to_writer_pretty(std::io::stdout(), &out)?;
    println!();
    Ok(())
}
