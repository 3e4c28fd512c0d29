use crate::util::{backup_path, xlf_path_for};
use crate::{Result, SourceNode};
use color_eyre::eyre::{bail, WrapErr};
use std::path::{Path, PathBuf};
use xlfsync_domain::{SyncFileStat, SyncSummary, SCHEMA_VERSION};
use xlfsync_reconcile::{sort_units, untranslated_ids, update};
use xlfsync_xliff::{XlfDocument, DEFAULT_SOURCE_LANGUAGE};

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Sort units on every sync.
    pub sort: bool,
    /// Sort a document once, when it is first created.
    pub sort_new_documents: bool,
    pub backup: bool,
    pub dry_run: bool,
    /// `source-language` written into documents created by this sync.
    pub source_language: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            sort: false,
            sort_new_documents: true,
            backup: false,
            dry_run: false,
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub path: PathBuf,
    pub lang: String,
    pub created: bool,
    pub changed: bool,
    pub sorted: bool,
    pub units: usize,
    pub untranslated: usize,
}

impl SyncOutcome {
    pub fn status(&self, dry_run: bool) -> &'static str {
        match (self.changed, dry_run, self.created) {
            (false, _, _) => "unchanged",
            (true, true, _) => "planned",
            (true, false, true) => "created",
            (true, false, false) => "updated",
        }
    }

    pub fn to_stat(&self, dry_run: bool) -> SyncFileStat {
        SyncFileStat {
            path: self.path.display().to_string(),
            lang: self.lang.clone(),
            status: self.status(dry_run).into(),
            units: self.units,
            untranslated: self.untranslated,
            sorted: self.sorted,
        }
    }
}

/// Load (or create) the document at `path`, reconcile it with `nodes` and
/// write it back when anything changed.
pub fn sync_document(
    path: &Path,
    nodes: &[SourceNode],
    document_id: &str,
    lang: &str,
    opts: &SyncOptions,
) -> Result<SyncOutcome> {
    let existed = path.exists();
    let mut doc = if existed {
        XlfDocument::from_path(path)
            .wrap_err_with(|| format!("failed to load {}", path.display()))?
    } else {
        XlfDocument::with_languages(&opts.source_language, lang)
    };

    let mut changed = update(&mut doc, nodes, document_id)?;
    let sorted = (opts.sort || (!existed && opts.sort_new_documents)) && sort_units(&mut doc);
    changed |= sorted || !existed;

    if changed && !opts.dry_run {
        if existed && opts.backup {
            let bak = backup_path(path);
            std::fs::copy(path, &bak)?;
            tracing::warn!(event = "backup", from = %path.display(), to = %bak.display());
        }
        doc.save_to_path(path)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
    }

    let outcome = SyncOutcome {
        path: path.to_path_buf(),
        lang: doc.target_language().to_string(),
        created: !existed,
        changed,
        sorted,
        units: doc.units().len(),
        untranslated: untranslated_ids(&doc).len(),
    };
    tracing::info!(
        event = "xlf_synced",
        path = %path.display(),
        status = outcome.status(opts.dry_run),
        units = outcome.units,
        untranslated = outcome.untranslated
    );
    Ok(outcome)
}

/// Sync `<dir>/<stem>.<lang>.xlf` for each language in `langs`.
pub fn sync_languages(
    dir: &Path,
    stem: &str,
    nodes: &[SourceNode],
    document_id: &str,
    langs: &[String],
    opts: &SyncOptions,
) -> Result<SyncSummary> {
    let mut summary = SyncSummary {
        schema_version: SCHEMA_VERSION,
        document_id: document_id.to_string(),
        created: 0,
        updated: 0,
        unchanged: 0,
        files: Vec::with_capacity(langs.len()),
    };
    for lang in langs {
        let path = xlf_path_for(dir, stem, lang);
        let outcome = sync_document(&path, nodes, document_id, lang, opts)?;
        match (outcome.changed, outcome.created) {
            (false, _) => summary.unchanged += 1,
            (true, true) => summary.created += 1,
            (true, false) => summary.updated += 1,
        }
        summary.files.push(outcome.to_stat(opts.dry_run));
    }
    Ok(summary)
}

/// Sort the units of an existing document. Returns whether the order changed.
pub fn sort_file(path: &Path, dry_run: bool) -> Result<bool> {
    let mut doc = XlfDocument::from_path(path)
        .wrap_err_with(|| format!("failed to load {}", path.display()))?;
    let sorted = sort_units(&mut doc);
    if sorted && !dry_run {
        doc.save_to_path(path)?;
    }
    tracing::info!(event = "xlf_sorted", path = %path.display(), changed = sorted, dry_run);
    Ok(sorted)
}

/// Write an empty `source_lang` → `lang` document. Refuses to overwrite.
pub fn create_document(path: &Path, source_lang: &str, lang: &str) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    XlfDocument::with_languages(source_lang, lang).save_to_path(path)?;
    tracing::info!(event = "xlf_created", path = %path.display(), source_lang, lang);
    Ok(())
}
