use crate::types::FieldKind;
use serde_json::{Map, Value};

/// Term names a document contributes, before they are resolved to ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedFields {
    pub facets: Vec<String>,
    pub scalars: Vec<(String, f64)>,
}

/// Separates the field from the value in a facet name.
pub const FACET_SEPARATOR: char = ':';

/// Name of the facet term for `field` holding `value`: `field:value`,
/// trimmed and lower-cased.
pub fn facet_name(field: &str, value: &str) -> String {
    format!("{}{}{}", field.trim(), FACET_SEPARATOR, value.trim()).to_lowercase()
}

/// Name of a scalar or flag term: the trimmed, lower-cased field key.
pub fn field_term_name(field: &str) -> String {
    field.trim().to_lowercase()
}

/// Split a document's fields into facet and scalar terms.
///
/// Numbers become scalars; strings and string arrays become `field:value`
/// facets; `true` becomes a flag facet named after the field. `false`, null,
/// objects and empty strings contribute nothing. Keys containing `:` cannot
/// be split back out of a facet name, so they only yield scalars.
pub fn classify(fields: &Map<String, Value>) -> ClassifiedFields {
    let mut out = ClassifiedFields::default();
    for (key, value) in fields {
        if key.trim().is_empty() {
            continue;
        }
        let facetable = !key.contains(FACET_SEPARATOR);
        match FieldKind::from_json(value) {
            FieldKind::Number(n) => out.scalars.push((field_term_name(key), n)),
            FieldKind::Text(text) if facetable => push_text(&mut out.facets, key, &text),
            FieldKind::TextList(items) if facetable => {
                for text in &items {
                    push_text(&mut out.facets, key, text);
                }
            }
            FieldKind::Flag(true) if facetable => out.facets.push(field_term_name(key)),
            _ => {}
        }
    }
    out
}

fn push_text(facets: &mut Vec<String>, key: &str, text: &str) {
    if !text.trim().is_empty() {
        facets.push(facet_name(key, text));
    }
}
