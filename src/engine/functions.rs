//! Template functions registered on every registry's Tera instance.
//!
//! Two groups live here: pure text/data utilities (`indent`, `offset`,
//! `maxLength`, `exists`, `forge`) and the composition functions
//! (`renderTemplate`, `renderTemplates`, `plugins`) that re-enter the
//! render engine. The composition functions hold a weak reference to the
//! registry they are registered on; errors they raise are chained through
//! Tera's error type and recovered as typed [`RenderError`]s at the
//! registry boundary.
//!
//! All functions use Tera's named-argument call style, e.g.
//! `{{ renderTemplate(name="case", data=case, parent=this, indent=2) }}`.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use serde_json::{Map, Value};
use tera::Tera;

use crate::engine::registry::TemplateRegistry;
use crate::engine::render;
use crate::engine::RenderError;
use crate::record::value_kind;

/// Prefix every line of `text` with `width` spaces.
///
/// One trailing newline is trimmed from the result, so repeated
/// composition does not accumulate blank lines. An empty `text` yields
/// exactly `width` spaces, distinguishing "empty content" from "no content
/// requested". Negative widths fail with [`RenderError::InvalidIndent`].
pub fn indent(width: i64, text: &str) -> Result<String, RenderError> {
    if width < 0 {
        return Err(RenderError::InvalidIndent(width));
    }
    let pad = " ".repeat(width as usize);
    if text.is_empty() {
        return Ok(pad);
    }

    let body = text.strip_suffix('\n').unwrap_or(text);
    if width == 0 {
        return Ok(body.to_string());
    }

    let mut out = String::with_capacity(body.len() + pad.len() * 8);
    for (i, line) in body.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&pad);
        out.push_str(line);
    }
    Ok(out)
}

/// Blank padding so the rendered `value` reaches `length` bytes.
///
/// Returns `max(0, length - len(str(value)))` spaces; values already at or
/// beyond `length` yield an empty string.
pub fn offset(length: i64, value: &Value) -> String {
    let rendered = display_value(value);
    let missing = length.saturating_sub(rendered.len() as i64).max(0);
    " ".repeat(missing as usize)
}

/// Byte length of the longest string in a list of strings.
///
/// Non-list input, or a list with non-string elements, fails with
/// [`RenderError::InvalidStringList`].
pub fn max_length(value: &Value) -> Result<usize, RenderError> {
    let items = value
        .as_array()
        .ok_or_else(|| RenderError::InvalidStringList(value_kind(value).to_string()))?;

    let mut longest = 0;
    for item in items {
        let text = item
            .as_str()
            .ok_or_else(|| RenderError::InvalidStringList(value_kind(item).to_string()))?;
        longest = longest.max(text.len());
    }
    Ok(longest)
}

/// Whether `key` exists in `map`.
pub fn exists(map: &Map<String, Value>, key: &str) -> bool {
    map.contains_key(key)
}

/// Plain-text rendering of a value: strings unquoted, everything else in
/// its JSON form.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------
// Tera bindings

fn required<'a>(
    args: &'a HashMap<String, Value>,
    function: &str,
    name: &str,
) -> tera::Result<&'a Value> {
    args.get(name).ok_or_else(|| {
        tera::Error::msg(format!(
            "function `{function}` requires an argument `{name}`"
        ))
    })
}

fn required_str<'a>(
    args: &'a HashMap<String, Value>,
    function: &str,
    name: &str,
) -> tera::Result<&'a str> {
    required(args, function, name)?.as_str().ok_or_else(|| {
        tera::Error::msg(format!(
            "argument `{name}` of function `{function}` must be a string"
        ))
    })
}

fn required_int(args: &HashMap<String, Value>, function: &str, name: &str) -> tera::Result<i64> {
    required(args, function, name)?.as_i64().ok_or_else(|| {
        tera::Error::msg(format!(
            "argument `{name}` of function `{function}` must be an integer"
        ))
    })
}

fn indent_arg(args: &HashMap<String, Value>, function: &str) -> tera::Result<i64> {
    match args.get("indent") {
        None => Ok(0),
        Some(_) => required_int(args, function, "indent"),
    }
}

fn chain(err: crate::Error) -> tera::Error {
    tera::Error::chain("nested template render failed", err)
}

fn upgrade(registry: &Weak<TemplateRegistry>) -> tera::Result<Arc<TemplateRegistry>> {
    registry
        .upgrade()
        .ok_or_else(|| tera::Error::msg("template registry has been dropped"))
}

fn indent_fn(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let width = required_int(args, "indent", "width")?;
    let text = required_str(args, "indent", "text")?;
    let indented = indent(width, text).map_err(|e| tera::Error::chain("indent failed", e))?;
    Ok(Value::String(indented))
}

fn offset_fn(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let length = required_int(args, "offset", "length")?;
    let value = required(args, "offset", "value")?;
    Ok(Value::String(offset(length, value)))
}

fn max_length_fn(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let value = required(args, "maxLength", "value")?;
    let longest = max_length(value).map_err(|e| tera::Error::chain("maxLength failed", e))?;
    Ok(Value::from(longest as u64))
}

fn exists_fn(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let data = required(args, "exists", "data")?;
    let map = data.as_object().ok_or_else(|| {
        tera::Error::msg(format!(
            "argument `data` of function `exists` must be a map, got {}",
            value_kind(data)
        ))
    })?;
    let key = required_str(args, "exists", "key")?;
    Ok(Value::Bool(exists(map, key)))
}

fn forge_fn(_args: &HashMap<String, Value>) -> tera::Result<Value> {
    let now = chrono::Local::now();
    Ok(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "execution_date": now.format("%d.%m.%Y").to_string(),
        "execution_time": now.format("%H:%M").to_string(),
    }))
}

/// `renderTemplate(name=, data=, parent=, indent=)`
struct RenderTemplateFn {
    registry: Weak<TemplateRegistry>,
}

impl tera::Function for RenderTemplateFn {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let registry = upgrade(&self.registry)?;
        let name = required_str(args, "renderTemplate", "name")?;
        let data = required(args, "renderTemplate", "data")?;
        let parent = args.get("parent");
        let indent_width = indent_arg(args, "renderTemplate")?;

        let rendered =
            render::render_template(&registry, name, data, parent, indent_width).map_err(chain)?;
        Ok(Value::String(rendered))
    }
}

/// `renderTemplates(entries=, field=, parent=, indent=)`
struct RenderTemplatesFn {
    registry: Weak<TemplateRegistry>,
}

impl tera::Function for RenderTemplatesFn {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let registry = upgrade(&self.registry)?;
        let entries = args.get("entries");
        let field = required_str(args, "renderTemplates", "field")?;
        let parent = args.get("parent");
        let indent_width = indent_arg(args, "renderTemplates")?;

        let rendered = render::render_templates(&registry, entries, field, parent, indent_width)
            .map_err(chain)?;
        Ok(Value::String(rendered))
    }
}

/// `plugins(entries=, point=, field=, parent=, indent=)`
struct PluginsFn {
    registry: Weak<TemplateRegistry>,
}

impl tera::Function for PluginsFn {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let registry = upgrade(&self.registry)?;
        let entries = args.get("entries");
        let point = required_str(args, "plugins", "point")?;
        let field = required_str(args, "plugins", "field")?;
        let parent = args.get("parent");
        let indent_width = indent_arg(args, "plugins")?;

        let rendered =
            render::resolve_plugins(&registry, entries, point, field, parent, indent_width)
                .map_err(chain)?;
        Ok(Value::String(rendered))
    }
}

/// Register every template function on a registry's Tera instance.
///
/// Called once during [`TemplateRegistry::load`]; the weak back-reference
/// keeps the registry -> Tera -> function cycle collectable.
pub(crate) fn register_all(tera: &mut Tera, registry: Weak<TemplateRegistry>) {
    tera.register_function("indent", indent_fn);
    tera.register_function("offset", offset_fn);
    tera.register_function("maxLength", max_length_fn);
    tera.register_function("exists", exists_fn);
    tera.register_function("forge", forge_fn);
    tera.register_function(
        "renderTemplate",
        RenderTemplateFn {
            registry: registry.clone(),
        },
    );
    tera.register_function(
        "renderTemplates",
        RenderTemplatesFn {
            registry: registry.clone(),
        },
    );
    tera.register_function("plugins", PluginsFn { registry });
}
