use crate::Result;
use color_eyre::eyre::WrapErr;
use std::path::Path;
use xlfsync_domain::{TranslationsOutput, SCHEMA_VERSION};
use xlfsync_reconcile::translations;
use xlfsync_xliff::XlfDocument;

/// id → target view of one document, for the step that applies translations.
pub fn translations_for(path: &Path) -> Result<TranslationsOutput> {
    let doc = XlfDocument::from_path(path)
        .wrap_err_with(|| format!("failed to load {}", path.display()))?;
    Ok(TranslationsOutput {
        schema_version: SCHEMA_VERSION,
        lang: doc.target_language().to_string(),
        original: doc.original().to_string(),
        translations: translations(&doc),
    })
}
