//! Documentation records for the template functions.
//!
//! The docs are rendered through the engine itself: the two doc templates
//! below are compiled into their own registry and the doc records become a
//! generation set via the record adapter's native-record path. Namespace
//! docs (functions returning a map of fields, like `forge`) carry nested
//! entries and dispatch them through `renderTemplates`.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Map;

use crate::document::{GenerationItem, GenerationSet};
use crate::engine::{TemplateRegistry, TemplateSource};
use crate::error::Result;
use crate::record::record_to_map;

/// Doc template for a plain function.
pub const SIMPLE_DOC_TEMPLATE: &str = "simple_func_doc";
/// Doc template for a namespace with nested entries.
pub const NESTED_DOC_TEMPLATE: &str = "nested_func_doc";

const SIMPLE_DOC_BODY: &str = concat!(
    "----------------------------------\n",
    "\n",
    "Function '{% if exists(data=this, key=\"parent\") %}{{ parent.name }}.{% endif %}{{ name }}'\n",
    "  {{ example }}\n",
    "\n",
    "{{ text }}\n",
    "\n",
);

const NESTED_DOC_BODY: &str = concat!(
    "----------------------------------\n",
    "\n",
    "Function namespace '{{ name }}'\n",
    "  {{ example }}\n",
    "\n",
    "{{ text }}\n",
    "\n",
    "Fields:\n",
    "{{ renderTemplates(entries=nested, field=\"doc_template\", parent=this, indent=4) }}\n",
    "\n",
);

/// Documentation for one template function or namespace field.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDoc {
    pub name: String,
    pub text: String,
    pub example: String,
    /// Which doc template renders this record.
    pub doc_template: String,
    pub nested: Vec<FunctionDoc>,
}

impl FunctionDoc {
    pub fn new(
        name: impl Into<String>,
        text: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            example: example.into(),
            doc_template: SIMPLE_DOC_TEMPLATE.to_string(),
            nested: Vec::new(),
        }
    }

    pub fn with_nested(
        name: impl Into<String>,
        text: impl Into<String>,
        example: impl Into<String>,
        nested: Vec<FunctionDoc>,
    ) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            example: example.into(),
            doc_template: NESTED_DOC_TEMPLATE.to_string(),
            nested,
        }
    }
}

/// Docs for every function registered by the engine.
pub static BUILTIN_DOCS: Lazy<Vec<FunctionDoc>> = Lazy::new(|| {
    vec![
        FunctionDoc::new(
            "indent",
            "Prepends spaces to every line of a multi-line string. Empty input \
             yields exactly `width` spaces; one trailing newline is trimmed.",
            "{{ indent(width=2, text=\"my beautiful\\nmultiline string\") }}",
        ),
        FunctionDoc::new(
            "offset",
            "Returns the blank spaces needed for the rendered value to reach the \
             given length. Values at or beyond the length yield an empty string.",
            "{{ offset(length=25, value=\"need 4 spaces till 25\") }}",
        ),
        FunctionDoc::new(
            "maxLength",
            "Returns the length of the longest string in a list of strings.",
            "{{ maxLength(value=my_string_list) }}",
        ),
        FunctionDoc::new(
            "exists",
            "Returns true if the key exists in the map, else false.",
            "{{ exists(data=this, key=\"my_field\") }}",
        ),
        FunctionDoc::new(
            "renderTemplate",
            "Executes a nested template against the given data and indents its \
             output. The calling context passed as `parent` is available in the \
             nested template under `parent`.",
            "{{ renderTemplate(name=\"case\", data=case, parent=this, indent=2) }}",
        ),
        FunctionDoc::new(
            "renderTemplates",
            "Executes one nested template per entry of a collection. Every entry \
             must name its template under the selector field; outputs are joined \
             with newlines and indented.",
            "{{ renderTemplates(entries=parts, field=\"template\", parent=this, indent=2) }}",
        ),
        FunctionDoc::new(
            "plugins",
            "Renders the entries that declare a template for the given insertion \
             point, in input order. Entries without the selector field, or whose \
             selector map does not mention the point, are skipped.",
            "{{ plugins(entries=bearings, point=\"main\", field=\"template\", parent=this, indent=2) }}",
        ),
        FunctionDoc::with_nested(
            "forge",
            "Returns information about the running tool.",
            "{% set forge = forge() %}",
            vec![
                FunctionDoc::new(
                    "version",
                    "Version of the textforge binary.",
                    "{{ forge.version }}",
                ),
                FunctionDoc::new(
                    "execution_date",
                    "Date of the generation run, formatted DD.MM.YYYY.",
                    "{{ forge.execution_date }}",
                ),
                FunctionDoc::new(
                    "execution_time",
                    "Time of the generation run, formatted HH:MM.",
                    "{{ forge.execution_time }}",
                ),
            ],
        ),
    ]
});

/// Registry holding the embedded doc templates.
pub fn doc_registry() -> Result<Arc<TemplateRegistry>> {
    TemplateRegistry::load(vec![
        TemplateSource::new(SIMPLE_DOC_TEMPLATE, SIMPLE_DOC_BODY),
        TemplateSource::new(NESTED_DOC_TEMPLATE, NESTED_DOC_BODY),
    ])
}

/// Build the generation set that renders the given docs, optionally
/// filtered to a single function name.
pub fn docs_to_set(docs: &[FunctionDoc], filter: Option<&str>) -> Result<GenerationSet> {
    let mut items = Vec::new();
    for doc in docs {
        if filter.is_some_and(|name| name != doc.name) {
            continue;
        }
        let mut templates = BTreeMap::new();
        templates.insert(doc.doc_template.clone(), format!("{}.txt", doc.name));
        items.push(GenerationItem {
            templates,
            local: record_to_map(doc)?,
        });
    }

    Ok(GenerationSet {
        global: Map::new(),
        items,
    })
}
