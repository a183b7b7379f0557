//! Template-composition and rendering engine.
//!
//! The engine resolves named templates against an immutable
//! [`TemplateRegistry`], merges scoped data, manages indentation of nested
//! output, and dispatches optional plugin content into named insertion
//! points of a parent template. [`render::render_template`] is the single
//! point of recursion: the composition functions registered on the
//! registry's Tera instance call back into it.

pub mod errors;
pub mod executor;
pub mod funcdocs;
pub mod functions;
pub mod registry;
pub mod render;

pub use errors::RenderError;
pub use executor::execute_set;
pub use funcdocs::FunctionDoc;
pub use registry::{CancelToken, TemplateRegistry, TemplateSource, TEMPLATE_SUFFIX};
pub use render::{render_template, render_templates, resolve_plugins};
