use crate::util::is_xlf_file;
use crate::Result;
use color_eyre::eyre::WrapErr;
use std::path::Path;
use walkdir::WalkDir;
use xlfsync_domain::{CheckReport, UntranslatedFile, SCHEMA_VERSION};
use xlfsync_reconcile::untranslated_ids;
use xlfsync_xliff::XlfDocument;

/// Walk `root` for `*.xlf` documents and collect the ids still waiting for
/// translation. Files with nothing pending are counted but not listed.
pub fn check_translated(root: &Path) -> Result<CheckReport> {
    let mut report = CheckReport {
        schema_version: SCHEMA_VERSION,
        checked: 0,
        files: Vec::new(),
    };

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.wrap_err_with(|| format!("failed to walk {}", root.display()))?;
        let path = entry.path();
        if !is_xlf_file(path) {
            continue;
        }
        let doc = XlfDocument::from_path(path)
            .wrap_err_with(|| format!("failed to load {}", path.display()))?;
        report.checked += 1;

        let ids = untranslated_ids(&doc);
        if ids.is_empty() {
            continue;
        }
        tracing::debug!(event = "untranslated", path = %path.display(), count = ids.len());
        report.files.push(UntranslatedFile {
            path: path.display().to_string(),
            lang: doc.target_language().to_string(),
            ids: ids.into_iter().collect(),
        });
    }

    Ok(report)
}
