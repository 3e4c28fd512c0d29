//! Keeps an XLIFF document in step with the strings extracted from its source.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use xlfsync_core::{SourceNode, State, TransUnit, XlfError};
use xlfsync_xliff::XlfDocument;

mod placeholders;

pub use placeholders::placeholder_count;

/// Reconcile `doc` against the freshly extracted `nodes` of `document_id`.
///
/// Stale units are removed, edited units are refreshed (translated ones are
/// flagged for review), units whose target no longer matches the source's
/// placeholders are reset, and new strings are inserted before the first
/// pre-existing unit with a greater id. Returns whether anything changed.
///
/// A duplicate id in `nodes` fails before the document is touched.
pub fn update(
    doc: &mut XlfDocument,
    nodes: &[SourceNode],
    document_id: &str,
) -> Result<bool, XlfError> {
    let mut remaining: HashMap<&str, &SourceNode> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        if remaining.insert(node.id.as_str(), node).is_some() {
            return Err(XlfError::DuplicateSourceId {
                id: node.id.clone(),
                document_id: document_id.to_string(),
            });
        }
    }

    let mut changed = false;

    if doc.remove_legacy_empty_group() {
        tracing::debug!(event = "legacy_group_removed", document = document_id);
        changed = true;
    }

    if doc.original() != document_id {
        tracing::debug!(event = "original_updated", from = doc.original(), to = document_id);
        doc.set_original(document_id);
        changed = true;
    }

    let units = doc.units_mut();
    units.retain_mut(|unit| match remaining.remove(unit.id.as_str()) {
        None => {
            tracing::debug!(event = "unit_removed", id = %unit.id);
            changed = true;
            false
        }
        Some(node) => {
            if sync_unit(unit, node) {
                changed = true;
            }
            true
        }
    });

    // Anchors are computed against the units that survived the walk, so new
    // strings sharing an anchor keep their source-list order.
    let mut pending: Vec<(usize, TransUnit)> = Vec::new();
    for node in nodes.iter().filter(|n| remaining.contains_key(n.id.as_str())) {
        let anchor = units
            .iter()
            .position(|u| u.id.as_str() > node.id.as_str())
            .unwrap_or(units.len());
        tracing::debug!(event = "unit_added", id = %node.id, at = anchor);
        pending.push((anchor, TransUnit::untranslated(node)));
    }

    if !pending.is_empty() {
        changed = true;
        pending.sort_by_key(|(anchor, _)| *anchor);
        let existing = std::mem::take(units);
        units.reserve(existing.len() + pending.len());
        let mut pending = pending.into_iter().peekable();
        for (idx, unit) in existing.into_iter().enumerate() {
            while let Some((_, new_unit)) = pending.next_if(|(anchor, _)| *anchor == idx) {
                units.push(new_unit);
            }
            units.push(unit);
        }
        units.extend(pending.map(|(_, new_unit)| new_unit));
    }

    Ok(changed)
}

fn sync_unit(unit: &mut TransUnit, node: &SourceNode) -> bool {
    let mut changed = false;

    let note_differs = node.note.as_deref().is_some_and(|note| unit.note != note);
    if unit.source != node.source || note_differs {
        unit.source = node.source.clone();
        // A missing note means the source format has none; keep whatever a
        // translator may have written.
        if let Some(note) = &node.note {
            unit.note = note.clone();
        }
        match unit.state {
            State::New => unit.target = node.source.clone(),
            State::Translated => unit.state = State::NeedsReviewTranslation,
            _ => {}
        }
        tracing::debug!(event = "unit_changed", id = %unit.id, state = %unit.state);
        changed = true;
    }

    if placeholder_count(&unit.source) != placeholder_count(&unit.target) {
        tracing::debug!(event = "placeholder_mismatch", id = %unit.id);
        unit.target = node.source.clone();
        unit.state = State::New;
        changed = true;
    }

    changed
}

/// Order units by ordinal id. Returns false when they already were.
pub fn sort_units(doc: &mut XlfDocument) -> bool {
    let units = doc.units_mut();
    if units.windows(2).all(|w| w[0].id < w[1].id) {
        return false;
    }
    units.sort_by(|a, b| a.id.cmp(&b.id));
    true
}

/// id → target text for every unit.
pub fn translations(doc: &XlfDocument) -> BTreeMap<String, String> {
    doc.units()
        .iter()
        .map(|u| (u.id.clone(), u.target.clone()))
        .collect()
}

/// Ids of every unit whose state is not `translated`.
pub fn untranslated_ids(doc: &XlfDocument) -> BTreeSet<String> {
    doc.units()
        .iter()
        .filter(|u| u.state != State::Translated)
        .map(|u| u.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC_ID: &str = "Resources/Strings.resx";

    fn node(id: &str, source: &str) -> SourceNode {
        SourceNode::new(id, source, None)
    }

    fn unit(id: &str, source: &str, target: &str, state: State) -> TransUnit {
        TransUnit {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            state,
            note: String::new(),
        }
    }

    fn doc_with(units: Vec<TransUnit>) -> XlfDocument {
        let mut doc = XlfDocument::new("fr");
        doc.set_original(DOC_ID);
        *doc.units_mut() = units;
        doc
    }

    fn ids(doc: &XlfDocument) -> Vec<&str> {
        doc.units().iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn second_update_with_same_input_is_a_no_op() {
        let mut doc = XlfDocument::new("fr");
        let nodes = vec![
            node("Title", "Settings"),
            SourceNode::new("Save", "Save {0}", Some("button")),
            node("Cancel", "Cancel"),
        ];
        assert!(update(&mut doc, &nodes, DOC_ID).unwrap());
        let first = doc.to_xml_string().unwrap();

        assert!(!update(&mut doc, &nodes, DOC_ID).unwrap());
        assert_eq!(doc.to_xml_string().unwrap(), first);
    }

    #[test]
    fn unit_ids_match_source_ids_after_update() {
        let mut doc = doc_with(vec![
            unit("a", "A", "A", State::New),
            unit("gone", "G", "G", State::Translated),
            unit("c", "C", "Ce", State::Translated),
        ]);
        let nodes = vec![node("c", "C"), node("a", "A"), node("d", "D")];
        assert!(update(&mut doc, &nodes, DOC_ID).unwrap());

        let got: BTreeSet<_> = ids(&doc).into_iter().collect();
        let want: BTreeSet<_> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(got, want);
    }

    #[test]
    fn duplicate_source_id_is_rejected_without_mutation() {
        let mut doc = doc_with(vec![unit("x", "X", "X", State::New)]);
        doc.set_original("old.resx");
        let before = doc.clone();

        let err = update(&mut doc, &[node("x", "1"), node("y", "2"), node("x", "3")], DOC_ID)
            .unwrap_err();
        match err {
            XlfError::DuplicateSourceId { id, document_id } => {
                assert_eq!(id, "x");
                assert_eq!(document_id, DOC_ID);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(doc, before);
    }

    #[test]
    fn new_strings_keep_source_order_in_empty_document() {
        let mut doc = XlfDocument::new("fr");
        update(&mut doc, &[node("b", "B"), node("a", "A")], DOC_ID).unwrap();
        assert_eq!(ids(&doc), ["b", "a"]);
    }

    #[test]
    fn new_strings_go_before_first_greater_existing_id() {
        let mut doc = doc_with(vec![
            unit("b", "B", "B", State::New),
            unit("d", "D", "D", State::New),
        ]);
        let nodes = vec![
            node("e", "E"),
            node("c", "C"),
            node("b", "B"),
            node("a", "A"),
            node("d", "D"),
        ];
        assert!(update(&mut doc, &nodes, DOC_ID).unwrap());
        assert_eq!(ids(&doc), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn existing_id_between_new_strings_splits_them() {
        let mut doc = doc_with(vec![unit("m", "M", "M", State::New)]);
        update(&mut doc, &[node("z", "Z"), node("m", "M"), node("a", "A")], DOC_ID).unwrap();
        assert_eq!(ids(&doc), ["a", "m", "z"]);
    }

    #[test]
    fn edit_on_translated_unit_needs_review() {
        let mut doc = doc_with(vec![unit("greet", "Hello", "Bonjour", State::Translated)]);
        assert!(update(&mut doc, &[node("greet", "Hello there")], DOC_ID).unwrap());

        let u = doc.unit("greet").unwrap();
        assert_eq!(u.state, State::NeedsReviewTranslation);
        assert_eq!(u.target, "Bonjour");
        assert_eq!(u.source, "Hello there");
    }

    #[test]
    fn edit_on_new_unit_tracks_source() {
        let mut doc = doc_with(vec![unit("greet", "Hello", "Hello", State::New)]);
        update(&mut doc, &[node("greet", "Hi")], DOC_ID).unwrap();
        let u = doc.unit("greet").unwrap();
        assert_eq!(u.target, "Hi");
        assert_eq!(u.state, State::New);
    }

    #[test]
    fn edit_leaves_other_states_alone() {
        let mut doc = doc_with(vec![
            unit("a", "Old", "Vieux", State::NeedsReviewTranslation),
            unit("b", "Old", "Alt", State::Other("signed-off".into())),
        ]);
        update(&mut doc, &[node("a", "New"), node("b", "New")], DOC_ID).unwrap();
        assert_eq!(doc.unit("a").unwrap().state, State::NeedsReviewTranslation);
        assert_eq!(doc.unit("a").unwrap().target, "Vieux");
        assert_eq!(doc.unit("b").unwrap().state, State::Other("signed-off".into()));
        assert_eq!(doc.unit("b").unwrap().source, "New");
    }

    #[test]
    fn placeholder_mismatch_resets_unit_even_without_source_change() {
        let mut doc = doc_with(vec![unit("hi", "Hi {0}", "Salut {0} {1}", State::Translated)]);
        assert!(update(&mut doc, &[node("hi", "Hi {0}")], DOC_ID).unwrap());

        let u = doc.unit("hi").unwrap();
        assert_eq!(u.target, "Hi {0}");
        assert_eq!(u.state, State::New);
    }

    #[test]
    fn source_gaining_a_placeholder_resets_translation() {
        let mut doc = doc_with(vec![unit("n", "Files", "Fichiers", State::Translated)]);
        update(&mut doc, &[node("n", "{0} files")], DOC_ID).unwrap();
        let u = doc.unit("n").unwrap();
        assert_eq!(u.state, State::New);
        assert_eq!(u.target, "{0} files");
    }

    #[test]
    fn absent_note_keeps_translator_note() {
        let mut translated = unit("k", "Key", "Clé", State::Translated);
        translated.note = "translator: keep short".into();
        let mut doc = doc_with(vec![translated]);

        assert!(!update(&mut doc, &[node("k", "Key")], DOC_ID).unwrap());
        assert_eq!(doc.unit("k").unwrap().note, "translator: keep short");
    }

    #[test]
    fn changed_note_alone_marks_translated_unit_for_review() {
        let mut doc = doc_with(vec![unit("k", "Key", "Clé", State::Translated)]);
        let nodes = [SourceNode::new("k", "Key", Some("keyboard key"))];
        assert!(update(&mut doc, &nodes, DOC_ID).unwrap());

        let u = doc.unit("k").unwrap();
        assert_eq!(u.note, "keyboard key");
        assert_eq!(u.state, State::NeedsReviewTranslation);
    }

    #[test]
    fn empty_note_on_new_string_produces_no_note() {
        let mut doc = XlfDocument::new("fr");
        update(&mut doc, &[SourceNode::new("a", "A", Some(""))], DOC_ID).unwrap();
        assert!(doc.unit("a").unwrap().note.is_empty());
    }

    #[test]
    fn renamed_source_updates_original_and_keeps_units() {
        let mut doc = doc_with(vec![unit("a", "A", "Ah", State::Translated)]);
        assert!(update(&mut doc, &[node("a", "A")], "Renamed.resx").unwrap());
        assert_eq!(doc.original(), "Renamed.resx");
        assert_eq!(doc.unit("a").unwrap().state, State::Translated);
    }

    #[test]
    fn legacy_empty_group_is_dropped() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff xmlns="urn:oasis:names:tc:xliff:document:1.2" version="1.2">
  <file datatype="xml" source-language="en" target-language="fr" original="Resources/Strings.resx">
    <body>
      <group id="Strings" />
    </body>
  </file>
</xliff>
"#;
        let mut doc: XlfDocument = xml.parse().unwrap();
        assert!(update(&mut doc, &[], DOC_ID).unwrap());
        assert!(!doc.has_legacy_empty_group());
        assert!(!doc.to_xml_string().unwrap().contains("<group"));
        assert!(!update(&mut doc, &[], DOC_ID).unwrap());
    }

    #[test]
    fn sort_reports_whether_order_changed() {
        let mut sorted = doc_with(vec![
            unit("a", "A", "A", State::New),
            unit("b", "B", "B", State::New),
        ]);
        assert!(!sort_units(&mut sorted));

        let mut doc = doc_with(vec![
            unit("c", "C", "C", State::New),
            unit("a", "A", "A", State::New),
            unit("b", "B", "B", State::New),
        ]);
        assert!(sort_units(&mut doc));
        assert_eq!(ids(&doc), ["a", "b", "c"]);
        assert!(!sort_units(&mut doc));
    }

    #[test]
    fn sort_is_ordinal_not_case_insensitive() {
        let mut doc = doc_with(vec![
            unit("apple", "", "", State::New),
            unit("Banana", "", "", State::New),
        ]);
        assert!(sort_units(&mut doc));
        assert_eq!(ids(&doc), ["Banana", "apple"]);
    }

    #[test]
    fn untranslated_ids_exclude_only_translated_units() {
        let doc = doc_with(vec![
            unit("a", "A", "A", State::New),
            unit("b", "B", "Bé", State::Translated),
            unit("c", "C", "Cé", State::NeedsReviewTranslation),
        ]);
        let want: BTreeSet<String> = ["a", "c"].into_iter().map(String::from).collect();
        assert_eq!(untranslated_ids(&doc), want);
    }

    #[test]
    fn translations_map_every_unit_to_its_target() {
        let doc = doc_with(vec![
            unit("a", "A", "Ah", State::Translated),
            unit("b", "B", "B", State::New),
        ]);
        let map = translations(&doc);
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], "Ah");
        assert_eq!(map["b"], "B");
    }
}
