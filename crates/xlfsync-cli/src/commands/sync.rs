use color_eyre::eyre::{bail, eyre};
use std::path::{Path, PathBuf};
use xlfsync_services::{read_source_nodes, sync_languages, SyncOptions};

pub struct SyncArgs {
    pub sources: PathBuf,
    pub document_id: String,
    pub dir: Option<PathBuf>,
    pub stem: Option<String>,
    pub langs: Vec<String>,
    pub sort: bool,
    pub backup: bool,
    pub dry_run: bool,
    pub format: String,
}

pub fn run_sync(args: SyncArgs) -> color_eyre::Result<()> {
    tracing::debug!(event = "sync_args", sources = ?args.sources, document_id = %args.document_id, dir = ?args.dir, stem = ?args.stem, langs = ?args.langs, sort = args.sort, backup = args.backup, dry_run = args.dry_run, format = %args.format);
    let cfg = xlfsync_config::load_config().unwrap_or_default();

    let langs = if args.langs.is_empty() {
        cfg.target_langs.clone().unwrap_or_default()
    } else {
        args.langs
    };
    if langs.is_empty() {
        bail!("no target languages: pass --lang or set target_langs in xlfsync.toml");
    }

    let dir = args
        .dir
        .or_else(|| cfg.xlf_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("xlf"));
    let stem = match args.stem {
        Some(s) => s,
        None => Path::new(&args.document_id)
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .ok_or_else(|| eyre!("cannot derive a file stem from '{}'", args.document_id))?,
    };

    let opts = SyncOptions {
        sort: args.sort || cfg.sort_always(),
        sort_new_documents: cfg.sort_new_documents(),
        backup: args.backup || cfg.backup(),
        dry_run: args.dry_run,
        source_language: cfg.source_lang().to_string(),
    };

    let nodes = read_source_nodes(&args.sources)?;
    let summary = sync_languages(&dir, &stem, &nodes, &args.document_id, &langs, &opts)?;

    if args.format == "json" {
        serde_json::to_writer_pretty(std::io::stdout(), &summary)?;
        println!();
        return Ok(());
    }

    if args.dry_run {
        crate::ui_info!("dry run: nothing written");
    }
    for f in &summary.files {
        crate::ui_out!(
            "{:<9} {}  ({} units, {} untranslated)",
            f.status,
            f.path,
            f.units,
            f.untranslated
        );
    }
    crate::ui_ok!(
        "{}: {} created, {} updated, {} unchanged",
        summary.document_id,
        summary.created,
        summary.updated,
        summary.unchanged
    );
    Ok(())
}
