//! Compiled-template store.
//!
//! The registry wraps a Tera instance holding every named template of a
//! generation run. It is built once with [`TemplateRegistry::load`] and is
//! read-only afterwards; that immutability is what makes it safe to render
//! independent generation items concurrently against the same registry.
//! Template names are suffix-qualified internally (`case` is stored as
//! `case.tmpl`); the public contract operates on logical names.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Map, Value};
use tera::{Context, Tera};

use crate::engine::RenderError;
use crate::engine::functions;
use crate::error::Result;

/// File suffix identifying template sources; also the internal
/// qualification suffix for compiled template names.
pub const TEMPLATE_SUFFIX: &str = ".tmpl";

/// A named template body, ready to be compiled into a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    /// Logical name, unique within a registry.
    pub name: String,
    /// Template body in the expansion language.
    pub body: String,
}

impl TemplateSource {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

/// Shared flag to abort a render between recursive steps.
///
/// Obtained from [`TemplateRegistry::cancel_token`]; cloning is cheap and
/// the clone can be tripped from any thread. A cancelled render fails with
/// [`RenderError::Cancelled`] instead of producing a partial write.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of renders using this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Holds the compiled named templates of a generation run.
pub struct TemplateRegistry {
    tera: Tera,
    cancel: CancelToken,
}

impl TemplateRegistry {
    /// Compile every supplied source and register the composition
    /// functions.
    ///
    /// The registry is returned behind an `Arc` because the composition
    /// functions re-enter it during template evaluation; they hold a
    /// `Weak` back-reference, so the registry -> Tera -> function cycle
    /// cannot leak.
    pub fn load(sources: Vec<TemplateSource>) -> Result<Arc<Self>> {
        let mut load_err: Option<tera::Error> = None;

        let registry = Arc::new_cyclic(|weak| {
            let mut tera = Tera::default();
            for source in &sources {
                if let Err(e) = tera.add_raw_template(&qualify(&source.name), &source.body) {
                    load_err = Some(e);
                    break;
                }
            }
            functions::register_all(&mut tera, weak.clone());
            Self {
                tera,
                cancel: CancelToken::new(),
            }
        });

        match load_err {
            Some(e) => Err(e.into()),
            None => Ok(registry),
        }
    }

    /// Whether a template with the given logical name is compiled in.
    pub fn contains(&self, name: &str) -> bool {
        let qualified = qualify(name);
        self.tera.get_template_names().any(|n| n == qualified)
    }

    /// Logical names of all compiled templates, sorted.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .tera
            .get_template_names()
            .filter_map(|n| n.strip_suffix(TEMPLATE_SUFFIX))
            .collect();
        names.sort_unstable();
        names
    }

    /// Execute the named template against the given context.
    ///
    /// Fails with [`RenderError::TemplateNotFound`] for unknown names; any
    /// expansion failure inside the template aborts the render job. Typed
    /// render errors raised by composition functions during evaluation are
    /// recovered from the engine's error chain.
    pub fn execute(&self, name: &str, context: Map<String, Value>) -> Result<String> {
        if !self.contains(name) {
            return Err(RenderError::TemplateNotFound(name.to_string()).into());
        }

        let context = Context::from_value(Value::Object(context))?;
        self.tera
            .render(&qualify(name), &context)
            .map_err(|e| match RenderError::from_tera(&e) {
                Some(render) => render.into(),
                None => e.into(),
            })
    }

    /// Cancellation handle for renders against this registry.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

fn qualify(name: &str) -> String {
    format!("{name}{TEMPLATE_SUFFIX}")
}
