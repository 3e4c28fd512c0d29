use std::fmt;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// One translatable string as produced by an extractor for the current build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceNode {
    pub id: String,
    pub source: String,
    /// `None` when the source format carries no notes at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SourceNode {
    pub fn new(id: impl Into<String>, source: impl Into<String>, note: Option<&str>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            note: note.map(str::to_string),
        }
    }
}

/// Translation state of a unit, stored as `target/@state`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum State {
    New,
    Translated,
    NeedsReviewTranslation,
    /// Any other value found in a persisted document; kept verbatim.
    Other(String),
}

impl State {
    pub fn as_str(&self) -> &str {
        match self {
            State::New => "new",
            State::Translated => "translated",
            State::NeedsReviewTranslation => "needs-review-translation",
            State::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for State {
    fn from(s: &str) -> Self {
        match s {
            "new" => State::New,
            "translated" => State::Translated,
            "needs-review-translation" => State::NeedsReviewTranslation,
            other => State::Other(other.to_string()),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `trans-unit` of a translation document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransUnit {
    pub id: String,
    pub source: String,
    pub target: String,
    pub state: State,
    /// Empty string means "no note".
    pub note: String,
}

impl TransUnit {
    /// Fresh untranslated unit: target mirrors the source.
    pub fn untranslated(node: &SourceNode) -> Self {
        Self {
            id: node.id.clone(),
            source: node.source.clone(),
            target: node.source.clone(),
            state: State::New,
            note: node.note.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum XlfError {
    #[error("duplicate source id '{id}' in '{document_id}'")]
    DuplicateSourceId { id: String, document_id: String },
    #[error("malformed translation document: {0}")]
    Parse(String),
    #[error("unexpected document structure: {0}")]
    Structure(String),
    #[error("invalid source list: {0}")]
    Source(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Documents whose content can be replaced from a stream.
pub trait Loadable {
    fn load<R: Read>(&mut self, reader: R) -> std::result::Result<(), XlfError>;
}

/// Documents that can write themselves to a stream.
pub trait Savable {
    fn save<W: Write>(&self, writer: W) -> std::result::Result<(), XlfError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_round_trips_known_and_unknown_values() {
        for s in ["new", "translated", "needs-review-translation", "signed-off"] {
            assert_eq!(State::from(s).as_str(), s);
        }
        assert_eq!(State::from("final"), State::Other("final".into()));
    }

    #[test]
    fn untranslated_unit_mirrors_source_and_note() {
        let u = TransUnit::untranslated(&SourceNode::new("Greeting", "Hello {0}", Some("shown on start")));
        assert_eq!(u.target, "Hello {0}");
        assert_eq!(u.state, State::New);
        assert_eq!(u.note, "shown on start");

        let bare = TransUnit::untranslated(&SourceNode::new("Bye", "Bye", None));
        assert!(bare.note.is_empty());
    }

    #[test]
    fn source_node_note_is_optional_in_json_form() {
        let n: SourceNode = serde_json::from_str(r#"{"id":"a","source":"A"}"#).unwrap();
        assert_eq!(n.note, None);
    }
}
