//! High-level orchestration over the document and reconciliation crates.
//! Thin on purpose: file handling and reporting for the CLI and build hosts.

pub use xlfsync_core::{Result, SourceNode, XlfError};

pub mod check;
pub mod export;
pub mod sources;
pub mod sync;
pub mod util;

pub use check::check_translated;
pub use export::translations_for;
pub use sources::read_source_nodes;
pub use sync::{create_document, sort_file, sync_document, sync_languages, SyncOptions, SyncOutcome};
pub use util::xlf_path_for;
