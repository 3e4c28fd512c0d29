use crate::{Result, SourceNode, XlfError};
use std::path::Path;

/// Read the extractor output: a JSON array of `{ "id", "source", "note"? }`.
pub fn read_source_nodes(path: &Path) -> Result<Vec<SourceNode>> {
    let text = std::fs::read_to_string(path)?;
    let nodes: Vec<SourceNode> = serde_json::from_str(&text)
        .map_err(|e| XlfError::Source(format!("{}: {e}", path.display())))?;
    tracing::debug!(event = "sources_loaded", path = %path.display(), count = nodes.len());
    Ok(nodes)
}
