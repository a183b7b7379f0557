//! Drives a generation set against a registry and an output sink.

use serde_json::Value;
use tracing::debug;

use crate::document::{merge_scopes, GenerationSet};
use crate::engine::render::render_template;
use crate::engine::TemplateRegistry;
use crate::error::Result;
use crate::infrastructure::output::OutputSink;

/// Render every generation item of `set` in document order.
///
/// For each item, the global and local scopes are merged (local wins) and
/// each (template, output) pair renders in template-name order: the sink
/// is told the output name, the top-level template executes through the
/// render engine, and the result is written. The first error aborts the
/// run; partial output already handed to the sink is not rolled back.
pub async fn execute_set(
    registry: &TemplateRegistry,
    set: &GenerationSet,
    sink: &mut (dyn OutputSink + Send),
) -> Result<()> {
    for item in &set.items {
        let scope = merge_scopes(&set.global, &item.local);
        let data = Value::Object(scope);

        for (template, output) in &item.templates {
            debug!(template = %template, output = %output, "rendering generation item");
            sink.set_out(output).await?;
            let rendered = render_template(registry, template, &data, None, 0)?;
            sink.write_text(&rendered).await?;
        }
    }
    Ok(())
}
