//! The render engine: recursive template composition over a registry.
//!
//! [`render_template`] is the single point of recursion. Nested templates
//! invoke it again (through the composition functions registered on the
//! registry) with a deeper indent width and a `parent` value pointing at
//! the caller's context. The engine never mutates a caller-supplied data
//! map: injection of the reserved keys happens on a per-call copy.

use serde_json::{Map, Value};

use crate::engine::functions;
use crate::engine::{RenderError, TemplateRegistry};
use crate::error::Result;
use crate::record::{to_map, value_kind};

/// Reserved context key under which a nested template sees its caller's
/// context. Only present when the render has a parent.
pub const PARENT_KEY: &str = "parent";

/// Reserved context key holding a snapshot of the context itself, so
/// template authors have a value to pass as the `parent` argument of the
/// composition functions. Always present.
pub const SELF_KEY: &str = "this";

/// Render one named template against `data`, indenting the result.
///
/// `data` is adapted to a key/value view (fails with
/// `UnsupportedRecordShape` otherwise), `parent` is injected under
/// [`PARENT_KEY`] when supplied, and the result of executing the template
/// is passed through the indent formatter with `indent_width`. Unknown
/// names fail with [`RenderError::TemplateNotFound`]; any failure inside
/// the template aborts the whole generation job.
pub fn render_template(
    registry: &TemplateRegistry,
    name: &str,
    data: &Value,
    parent: Option<&Value>,
    indent_width: i64,
) -> Result<String> {
    if registry.is_cancelled() {
        return Err(RenderError::Cancelled.into());
    }

    // Copy before injecting the reserved keys: the caller still owns `data`
    // and may reuse it across sibling renders.
    let mut scope = to_map(data)?.clone();
    if let Some(parent) = parent {
        scope.insert(PARENT_KEY.to_string(), parent.clone());
    }
    let snapshot = Value::Object(scope.clone());
    scope.insert(SELF_KEY.to_string(), snapshot);

    let rendered = registry.execute(name, scope)?;
    Ok(functions::indent(indent_width, &rendered)?)
}

/// Render a collection of required nested template entries.
///
/// Every entry must declare its template under `selector_field`; a missing
/// field is an error here, unlike in [`resolve_plugins`] with a non-empty
/// insertion point.
pub fn render_templates(
    registry: &TemplateRegistry,
    entries: Option<&Value>,
    selector_field: &str,
    parent: Option<&Value>,
    indent_width: i64,
) -> Result<String> {
    resolve_plugins(registry, entries, "", selector_field, parent, indent_width)
}

/// Shape of an entry's template selector at the inspection point.
enum Selector<'a> {
    /// A plain template name: render unconditionally for this entry.
    Template(&'a str),
    /// A map from insertion-point name to template name.
    ByPoint(&'a Map<String, Value>),
    /// The selector field is absent.
    Missing,
    /// Any other shape.
    Other,
}

impl<'a> Selector<'a> {
    fn of(entry: &'a Map<String, Value>, field: &str) -> Self {
        match entry.get(field) {
            None => Selector::Missing,
            Some(Value::String(name)) => Selector::Template(name),
            Some(Value::Object(points)) => Selector::ByPoint(points),
            Some(_) => Selector::Other,
        }
    }
}

/// Select and render plugin entries for an insertion point.
///
/// Entries are processed strictly in input order. An empty
/// `insertion_point` means "required nested template" mode: every entry
/// must name its template. A non-empty insertion point means optional
/// plugin dispatch: entries that do not declare the selector field, or
/// whose selector map has no entry for this insertion point, are skipped
/// silently — the two intentional non-errors of this engine. A missing
/// (`None`/null) entry collection is not an error and yields `""`.
///
/// Rendered outputs are joined with a single newline and one trailing
/// newline is trimmed from the final result.
pub fn resolve_plugins(
    registry: &TemplateRegistry,
    entries: Option<&Value>,
    insertion_point: &str,
    selector_field: &str,
    parent: Option<&Value>,
    indent_width: i64,
) -> Result<String> {
    let entries = match entries {
        None | Some(Value::Null) => return Ok(String::new()),
        Some(value) => value
            .as_array()
            .ok_or_else(|| RenderError::InvalidPluginList(value_kind(value).to_string()))?,
    };

    let mut pieces = Vec::new();
    for entry in entries {
        let map = to_map(entry)?;

        let template = match Selector::of(map, selector_field) {
            Selector::Template(name) => name,
            Selector::ByPoint(points) => match points.get(insertion_point) {
                Some(Value::String(name)) => name,
                Some(_) => {
                    return Err(RenderError::InvalidTemplateSelector(format!(
                        "{selector_field}.{insertion_point}"
                    ))
                    .into());
                }
                // this insertion point has no contribution from this entry
                None => continue,
            },
            Selector::Missing if insertion_point.is_empty() => {
                return Err(RenderError::MissingTemplateField(selector_field.to_string()).into());
            }
            // optional plugin not participating at this insertion point
            Selector::Missing => continue,
            Selector::Other => {
                return Err(
                    RenderError::InvalidTemplateSelector(selector_field.to_string()).into(),
                );
            }
        };

        pieces.push(render_template(
            registry,
            template,
            entry,
            parent,
            indent_width,
        )?);
    }

    let joined = pieces.join("\n");
    Ok(joined
        .strip_suffix('\n')
        .map(str::to_string)
        .unwrap_or(joined))
}
