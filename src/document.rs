//! The generation document: global data plus an ordered list of generation
//! items.
//!
//! The document is a JSON object with a required `data` array; every other
//! top-level field becomes global data, accessible in every template. Each
//! element of `data` is one [`GenerationItem`]: its `templates` field maps
//! template names to output names, and everything else is local data for
//! those renders. On a key collision between global and local data, local
//! wins.
//!
//! ```json
//! {
//!     "version": 1,
//!     "data": [
//!         {
//!             "templates": { "fidget_spinner": "spinner.txt" },
//!             "model": "x500"
//!         }
//!     ]
//! }
//! ```

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::record::{to_map, value_kind};

const DATA_KEY: &str = "data";
const ITEM_TEMPLATES_KEY: &str = "templates";

/// A parsed generation document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationSet {
    /// Data accessible in every template of the set.
    pub global: Map<String, Value>,
    /// Generation items, in document order.
    pub items: Vec<GenerationItem>,
}

/// One generation item: which templates to render into which outputs, and
/// the local data for those renders.
///
/// `templates` is ordered by template name so a single item renders its
/// outputs deterministically.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationItem {
    pub templates: BTreeMap<String, String>,
    pub local: Map<String, Value>,
}

impl GenerationSet {
    /// Parse a generation document from JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Build a generation set from an already-parsed JSON value.
    pub fn from_value(document: Value) -> Result<Self> {
        let mut global = match document {
            Value::Object(map) => map,
            other => {
                return Err(Error::document(format!(
                    "expected an object at the top level, got {}",
                    value_kind(&other)
                )));
            }
        };

        let data = global
            .remove(DATA_KEY)
            .ok_or_else(|| Error::document(format!("could not find field '{DATA_KEY}'")))?;
        let elements = match data {
            Value::Array(elements) => elements,
            other => {
                return Err(Error::document(format!(
                    "field '{DATA_KEY}' is not an array, got {}",
                    value_kind(&other)
                )));
            }
        };

        let mut items = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            items.push(GenerationItem::from_value(element, index)?);
        }

        Ok(Self { global, items })
    }
}

impl GenerationItem {
    fn from_value(element: &Value, index: usize) -> Result<Self> {
        let mut local = to_map(element)
            .map_err(|e| Error::item(index, e.to_string()))?
            .clone();

        let templates_raw = local.remove(ITEM_TEMPLATES_KEY).ok_or_else(|| {
            Error::item(index, format!("could not find field '{ITEM_TEMPLATES_KEY}'"))
        })?;
        let templates_map = match templates_raw {
            Value::Object(map) => map,
            other => {
                return Err(Error::item(
                    index,
                    format!(
                        "field '{ITEM_TEMPLATES_KEY}' is not a map, got {}",
                        value_kind(&other)
                    ),
                ));
            }
        };

        let mut templates = BTreeMap::new();
        for (template, output) in templates_map {
            let Value::String(output) = output else {
                return Err(Error::item(
                    index,
                    format!("value of '{template}' in '{ITEM_TEMPLATES_KEY}' is not a string"),
                ));
            };
            templates.insert(template, output);
        }

        Ok(Self { templates, local })
    }
}

/// Merge a global and a local scope into one rendering context.
///
/// Produces a new map with all of `global`'s entries overlaid by all of
/// `local`'s entries; on collision, local wins. One level deep — nested
/// maps are not merged recursively. Neither input is mutated.
pub fn merge_scopes(global: &Map<String, Value>, local: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = global.clone();
    for (key, value) in local {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> Value {
        json!({
            "global_var": 2,
            "overwrite_var": "global",
            "version": 1,
            "data": [
                {
                    "templates": { "t1": "t1.out", "t2": "t2.out" },
                    "overwrite_var": "local",
                    "local_var": 3
                }
            ]
        })
    }

    #[test]
    fn test_parse_splits_global_and_items() {
        let set = GenerationSet::from_value(fixture()).unwrap();

        assert_eq!(set.global["global_var"], 2);
        assert_eq!(set.global["overwrite_var"], "global");
        assert_eq!(set.global["version"], 1);
        assert!(!set.global.contains_key("data"));

        assert_eq!(set.items.len(), 1);
        let item = &set.items[0];
        assert_eq!(item.templates["t1"], "t1.out");
        assert_eq!(item.templates["t2"], "t2.out");
        assert_eq!(item.local["overwrite_var"], "local");
        assert_eq!(item.local["local_var"], 3);
        assert!(!item.local.contains_key("templates"));
    }

    #[test]
    fn test_parse_missing_data_field() {
        let err = GenerationSet::from_value(json!({"global": true})).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
        assert!(err.to_string().contains("could not find field 'data'"));
    }

    #[test]
    fn test_parse_data_not_an_array() {
        let err = GenerationSet::from_value(json!({"data": {}})).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
        assert!(err.to_string().contains("not an array"));
    }

    #[test]
    fn test_parse_top_level_not_an_object() {
        let err = GenerationSet::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn test_parse_item_missing_templates_names_index() {
        let err = GenerationSet::from_value(json!({
            "data": [
                { "templates": { "t": "t.out" } },
                { "local_var": 1 }
            ]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::MalformedItem { index: 1, .. }));
        assert!(err.to_string().contains("could not find field 'templates'"));
    }

    #[test]
    fn test_parse_item_non_string_output_names_key() {
        let err = GenerationSet::from_value(json!({
            "data": [ { "templates": { "t": 42 } } ]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::MalformedItem { index: 0, .. }));
        assert!(err.to_string().contains("value of 't'"));
    }

    #[test]
    fn test_parse_item_not_a_map() {
        let err = GenerationSet::from_value(json!({"data": ["nope"]})).unwrap_err();
        assert!(matches!(err, Error::MalformedItem { index: 0, .. }));
    }

    #[test]
    fn test_merge_scopes_local_wins() {
        let global = to_map_owned(json!({"v": 1, "o": "g"}));
        let local = to_map_owned(json!({"o": "l", "lv": 2}));

        let merged = merge_scopes(&global, &local);

        assert_eq!(merged["v"], 1);
        assert_eq!(merged["o"], "l");
        assert_eq!(merged["lv"], 2);
        assert_eq!(merged.len(), 3);

        // neither input mutated
        assert_eq!(global["o"], "g");
        assert_eq!(local.len(), 2);
    }

    #[test]
    fn test_merge_scopes_is_shallow() {
        let global = to_map_owned(json!({"nested": {"a": 1, "b": 2}}));
        let local = to_map_owned(json!({"nested": {"b": 3}}));

        let merged = merge_scopes(&global, &local);
        assert_eq!(merged["nested"], json!({"b": 3}));
    }

    fn to_map_owned(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }
}
