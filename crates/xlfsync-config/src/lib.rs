use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct XlfSyncConfig {
    pub source_lang: Option<String>,
    pub target_langs: Option<Vec<String>>,
    pub xlf_dir: Option<String>,
    pub sync: Option<SyncCfg>,
    pub check: Option<CheckCfg>,
    pub schema: Option<SchemaCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncCfg {
    /// Sort freshly created documents once (default: true).
    pub sort_new_documents: Option<bool>,
    /// Sort on every sync. Produces larger diffs.
    pub sort: Option<bool>,
    pub backup: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckCfg {
    pub strict: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaCfg {
    pub out_dir: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub const CONFIG_FILE: &str = "xlfsync.toml";

/// Search order: CWD/xlfsync.toml, then $CONFIG_DIR/xlfsync/xlfsync.toml.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(p) = std::env::current_dir() {
        paths.push(p.join(CONFIG_FILE));
    }
    if let Some(base) = dirs::config_dir() {
        paths.push(base.join("xlfsync").join(CONFIG_FILE));
    }
    paths
}

pub fn load_config() -> Result<XlfSyncConfig, ConfigError> {
    load_config_from(&config_search_paths())
}

/// Merge every existing file in `paths`; earlier files win per field.
pub fn load_config_from(paths: &[PathBuf]) -> Result<XlfSyncConfig, ConfigError> {
    let mut merged = XlfSyncConfig::default();
    for path in paths {
        if let Some(cfg) = read_config(path)? {
            tracing::debug!(event = "config_loaded", path = %path.display());
            merged = merge(merged, cfg);
        }
    }
    Ok(merged)
}

fn read_config(path: &Path) -> Result<Option<XlfSyncConfig>, ConfigError> {
    let s = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str::<XlfSyncConfig>(&s)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

impl XlfSyncConfig {
    /// `source-language` for newly created documents.
    pub fn source_lang(&self) -> &str {
        self.source_lang.as_deref().unwrap_or("en")
    }

    pub fn sort_new_documents(&self) -> bool {
        self.sync
            .as_ref()
            .and_then(|s| s.sort_new_documents)
            .unwrap_or(true)
    }

    pub fn sort_always(&self) -> bool {
        self.sync.as_ref().and_then(|s| s.sort).unwrap_or(false)
    }

    pub fn backup(&self) -> bool {
        self.sync.as_ref().and_then(|s| s.backup).unwrap_or(false)
    }

    pub fn strict_check(&self) -> bool {
        self.check.as_ref().and_then(|c| c.strict).unwrap_or(false)
    }
}

fn merge(mut a: XlfSyncConfig, b: XlfSyncConfig) -> XlfSyncConfig {
    if a.source_lang.is_none() {
        a.source_lang = b.source_lang;
    }
    if a.target_langs.is_none() {
        a.target_langs = b.target_langs;
    }
    if a.xlf_dir.is_none() {
        a.xlf_dir = b.xlf_dir;
    }
    a.sync = merge_opt(a.sync, b.sync, merge_sync);
    a.check = merge_opt(a.check, b.check, merge_check);
    a.schema = merge_opt(a.schema, b.schema, merge_schema);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_sync(mut a: SyncCfg, b: SyncCfg) -> SyncCfg {
    if a.sort_new_documents.is_none() {
        a.sort_new_documents = b.sort_new_documents;
    }
    if a.sort.is_none() {
        a.sort = b.sort;
    }
    if a.backup.is_none() {
        a.backup = b.backup;
    }
    a
}

fn merge_check(mut a: CheckCfg, b: CheckCfg) -> CheckCfg {
    if a.strict.is_none() {
        a.strict = b.strict;
    }
    a
}

fn merge_schema(mut a: SchemaCfg, b: SchemaCfg) -> SchemaCfg {
    if a.out_dir.is_none() {
        a.out_dir = b.out_dir;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_files_win_per_field() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local.toml");
        let global = dir.path().join("global.toml");
        std::fs::write(
            &local,
            "target_langs = [\"fr\"]\n[sync]\nsort = true\n",
        )
        .unwrap();
        std::fs::write(
            &global,
            "source_lang = \"en-GB\"\ntarget_langs = [\"de\", \"ja\"]\n[sync]\nsort = false\nbackup = true\n",
        )
        .unwrap();

        let cfg = load_config_from(&[local, global]).unwrap();
        assert_eq!(cfg.source_lang(), "en-GB");
        assert_eq!(cfg.target_langs, Some(vec!["fr".to_string()]));
        assert!(cfg.sort_always());
        assert!(cfg.backup());
        assert!(cfg.sort_new_documents());
    }

    #[test]
    fn missing_files_yield_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&[dir.path().join("nope.toml")]).unwrap();
        assert!(cfg.target_langs.is_none());
        assert_eq!(cfg.source_lang(), "en");
        assert!(!cfg.strict_check());
    }

    #[test]
    fn invalid_toml_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "target_langs = fr").unwrap();
        let err = load_config_from(&[bad.clone()]).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if *path == bad));
    }
}
