//! End-to-end composition tests through the public engine API.

use serde_json::json;
use textforge::engine::{
    render_template, RenderError, TemplateRegistry, TemplateSource,
};
use textforge::error::Error;

#[test]
fn test_nested_template_is_indented_and_embedded_verbatim() {
    let registry = TemplateRegistry::load(vec![
        TemplateSource::new(
            "t1",
            "Header\n{{ renderTemplate(name=\"t2\", data=child, parent=this, indent=2) }}\nFooter",
        ),
        TemplateSource::new("t2", "child value {{ x }}\nparent value {{ parent.top }}\n"),
    ])
    .unwrap();

    let data = json!({"top": "T", "child": {"x": 1}});
    let rendered = render_template(&registry, "t1", &data, None, 0).unwrap();

    assert_eq!(
        rendered,
        "Header\n  child value 1\n  parent value T\nFooter"
    );
}

#[test]
fn test_parent_chain_across_two_nesting_levels() {
    let registry = TemplateRegistry::load(vec![
        TemplateSource::new(
            "outer",
            "{{ renderTemplate(name=\"middle\", data=mid, parent=this, indent=0) }}",
        ),
        TemplateSource::new(
            "middle",
            "{{ renderTemplate(name=\"inner\", data=deep, parent=this, indent=0) }}",
        ),
        TemplateSource::new("inner", "{{ parent.parent.root_var }}/{{ parent.mid_var }}"),
    ])
    .unwrap();

    let data = json!({
        "root_var": "top",
        "mid": { "mid_var": "middle", "deep": {} }
    });
    let rendered = render_template(&registry, "outer", &data, None, 0).unwrap();
    assert_eq!(rendered, "top/middle");
}

#[test]
fn test_required_nested_templates_inside_a_template() {
    let registry = TemplateRegistry::load(vec![
        TemplateSource::new(
            "list",
            "{{ renderTemplates(entries=parts, field=\"template\", parent=this, indent=0) }}",
        ),
        TemplateSource::new("item", "part {{ id }}"),
    ])
    .unwrap();

    let rendered = render_template(
        &registry,
        "list",
        &json!({"parts": [
            {"id": 1, "template": "item"},
            {"id": 2, "template": "item"}
        ]}),
        None,
        0,
    )
    .unwrap();
    assert_eq!(rendered, "part 1\npart 2");
}

#[test]
fn test_typed_errors_survive_the_template_function_boundary() {
    let registry = TemplateRegistry::load(vec![
        TemplateSource::new(
            "list",
            "{{ renderTemplates(entries=parts, field=\"template\", parent=this, indent=0) }}",
        ),
        TemplateSource::new("item", "part {{ id }}"),
    ])
    .unwrap();

    // a required nested entry without its template field
    let err = render_template(&registry, "list", &json!({"parts": [{"id": 2}]}), None, 0)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Render(RenderError::MissingTemplateField(ref field)) if field == "template"
    ));

    // a nested entry naming an unknown template
    let err = render_template(
        &registry,
        "list",
        &json!({"parts": [{"id": 1, "template": "ghost"}]}),
        None,
        0,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Render(RenderError::TemplateNotFound(ref name)) if name == "ghost"
    ));
}

#[test]
fn test_null_plugin_collection_renders_nothing() {
    let registry = TemplateRegistry::load(vec![TemplateSource::new(
        "doc",
        "before\n{{ plugins(entries=extras, point=\"p1\", field=\"template\", parent=this, indent=2) }}\nafter",
    )])
    .unwrap();

    let rendered =
        render_template(&registry, "doc", &json!({"extras": null}), None, 0).unwrap();
    assert_eq!(rendered, "before\n\nafter");
}

#[test]
fn test_text_utilities_inside_templates() {
    let registry = TemplateRegistry::load(vec![TemplateSource::new(
        "table",
        "{{ label }}:{{ offset(length=10, value=label) }}{{ value }} (widest {{ maxLength(value=labels) }})",
    )])
    .unwrap();

    let rendered = render_template(
        &registry,
        "table",
        &json!({"label": "size", "value": 8, "labels": ["size", "diameter"]}),
        None,
        0,
    )
    .unwrap();
    assert_eq!(rendered, "size:      8 (widest 8)");
}
