use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncFileStat {
    pub path: String,
    pub lang: String,
    /// "created" | "updated" | "unchanged" | "planned"
    pub status: String,
    pub units: usize,
    pub untranslated: usize,
    pub sorted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncSummary {
    pub schema_version: u32,
    pub document_id: String,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub files: Vec<SyncFileStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UntranslatedFile {
    pub path: String,
    pub lang: String,
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CheckReport {
    pub schema_version: u32,
    pub checked: usize,
    pub files: Vec<UntranslatedFile>,
}

impl CheckReport {
    pub fn untranslated_total(&self) -> usize {
        self.files.iter().map(|f| f.ids.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TranslationsOutput {
    pub schema_version: u32,
    pub lang: String,
    pub original: String,
    pub translations: BTreeMap<String, String>,
}
