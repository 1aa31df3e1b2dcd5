//! Normalization of the free-form `changes` column.
//!
//! The bot has written release changes in two shapes over time: an array of
//! `{type, description}` items, and a map from a category label to a list
//! of strings. Either may arrive as a JSON value or as JSON text. Everything
//! is flattened into an ordered `Vec<ChangeItem>`.

use serde_json::Value;
use tracing::warn;

use crate::types::{ChangeItem, ChangeType};

/// Map a category label onto the closed change type set.
///
/// Matching is case-insensitive; unknown labels count as additions.
pub fn category_type(label: &str) -> ChangeType {
    match label.trim().to_lowercase().as_str() {
        "website" | "website updates" | "improved" | "updated" => ChangeType::Updated,
        "bot" | "bot updates" | "added" => ChangeType::Added,
        "fixed" => ChangeType::Fixed,
        "removed" => ChangeType::Removed,
        // Keep-a-Changelog headings used by markdown changelogs.
        "changed" | "deprecated" => ChangeType::Updated,
        "security" => ChangeType::Fixed,
        _ => ChangeType::Added,
    }
}

/// Flatten a raw `changes` value into change items.
///
/// Malformed input never fails: unparseable text and unexpected shapes
/// produce an empty list.
pub fn normalize_changes(raw: Option<&Value>) -> Vec<ChangeItem> {
    match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            // Text that decodes to another string is not a change list.
            Ok(Value::String(_)) => Vec::new(),
            Ok(parsed) => normalize_changes(Some(&parsed)),
            Err(e) => {
                warn!(error = %e, "unparseable changes column, treating as empty");
                Vec::new()
            }
        },
        Some(Value::Array(items)) => items.iter().filter_map(item_from_value).collect(),
        Some(Value::Object(categories)) => categories
            .iter()
            .flat_map(|(label, items)| {
                let kind = category_type(label);
                items
                    .as_array()
                    .into_iter()
                    .flatten()
                    .filter_map(Value::as_str)
                    .map(move |description| ChangeItem::new(kind, description))
            })
            .collect(),
        Some(_) => Vec::new(),
    }
}

/// Read one pre-structured `{type, description}` item.
fn item_from_value(value: &Value) -> Option<ChangeItem> {
    let description = value.get("description")?.as_str()?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .map(category_type)
        .unwrap_or(ChangeType::Added);
    Some(ChangeItem::new(kind, description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kinds(items: &[ChangeItem]) -> Vec<ChangeType> {
        items.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn category_lookup_table() {
        assert_eq!(category_type("website"), ChangeType::Updated);
        assert_eq!(category_type("Website Updates"), ChangeType::Updated);
        assert_eq!(category_type("BOT"), ChangeType::Added);
        assert_eq!(category_type("bot updates"), ChangeType::Added);
        assert_eq!(category_type("improved"), ChangeType::Updated);
        assert_eq!(category_type("Fixed"), ChangeType::Fixed);
        assert_eq!(category_type("removed"), ChangeType::Removed);
        assert_eq!(category_type("something new"), ChangeType::Added);
    }

    #[test]
    fn category_map_flattens_in_order() {
        let raw = json!({"bot": ["Added shuffle"], "fixed": ["Fixed crash"]});
        let items = normalize_changes(Some(&raw));
        assert_eq!(
            items,
            vec![
                ChangeItem::new(ChangeType::Added, "Added shuffle"),
                ChangeItem::new(ChangeType::Fixed, "Fixed crash"),
            ]
        );
    }

    #[test]
    fn category_text_keeps_encounter_order() {
        let raw = Value::String(
            r#"{"removed": ["a", "b"], "website": ["c"], "bot": ["d", "e"]}"#.to_string(),
        );
        let items = normalize_changes(Some(&raw));
        let descriptions: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(descriptions, ["a", "b", "c", "d", "e"]);
        assert_eq!(
            kinds(&items),
            [
                ChangeType::Removed,
                ChangeType::Removed,
                ChangeType::Updated,
                ChangeType::Added,
                ChangeType::Added,
            ]
        );
    }

    #[test]
    fn category_values_that_are_not_lists_are_skipped() {
        let raw = json!({"bot": "just text", "fixed": ["ok", 3, null]});
        let items = normalize_changes(Some(&raw));
        assert_eq!(items, vec![ChangeItem::new(ChangeType::Fixed, "ok")]);
    }

    #[test]
    fn structured_array_passes_through() {
        let raw = json!([
            {"type": "removed", "description": "Dropped /skipto"},
            {"type": "updated", "description": "Faster search"},
        ]);
        let items = normalize_changes(Some(&raw));
        assert_eq!(
            items,
            vec![
                ChangeItem::new(ChangeType::Removed, "Dropped /skipto"),
                ChangeItem::new(ChangeType::Updated, "Faster search"),
            ]
        );
    }

    #[test]
    fn structured_text_array_passes_through() {
        let raw = Value::String(r#"[{"type":"fixed","description":"Fixed crash"}]"#.to_string());
        assert_eq!(
            normalize_changes(Some(&raw)),
            vec![ChangeItem::new(ChangeType::Fixed, "Fixed crash")]
        );
    }

    #[test]
    fn unknown_item_type_stays_inside_enum() {
        let raw = json!([{"type": "perf", "description": "Less CPU"}, {"description": "No type"}]);
        assert_eq!(kinds(&normalize_changes(Some(&raw))), [ChangeType::Added, ChangeType::Added]);
    }

    #[test]
    fn unparseable_text_is_empty() {
        let raw = Value::String("{not json".to_string());
        assert!(normalize_changes(Some(&raw)).is_empty());
    }

    #[test]
    fn null_and_scalars_are_empty() {
        assert!(normalize_changes(None).is_empty());
        assert!(normalize_changes(Some(&Value::Null)).is_empty());
        assert!(normalize_changes(Some(&json!(7))).is_empty());
        assert!(normalize_changes(Some(&Value::String("\"quoted\"".to_string()))).is_empty());
    }
}
