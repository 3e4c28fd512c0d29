pub fn run_new(
    xlf: std::path::PathBuf,
    lang: String,
    source_lang: Option<String>,
) -> color_eyre::Result<()> {
    tracing::debug!(event = "new_args", xlf = ?xlf, lang = %lang, source_lang = ?source_lang);
    let source_lang = match source_lang {
        Some(s) => s,
        None => xlfsync_config::load_config()
            .unwrap_or_default()
            .source_lang()
            .to_string(),
    };
    xlfsync_services::create_document(&xlf, &source_lang, &lang)?;
    crate::ui_ok!("created {} ({source_lang} -> {lang})", xlf.display());
    Ok(())
}
