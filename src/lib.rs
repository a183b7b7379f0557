//! textforge is a data-driven text generator built around the Tera template
//! engine. The input data dictates which templates are rendered and with
//! which data: a JSON generation document names templates and output files,
//! and the template bodies may recursively pull in further templates.
//!
//! Templates live in a folder which is scanned recursively for `.tmpl`
//! files; the logical template name is the file name without the suffix.
//! For example, with the folder `/templates`:
//!
//! ```text
//! ▾ templates
//!   ▾ special
//!       bearing.tmpl
//!     case.tmpl
//!     fidget_spinner.tmpl
//! ```
//!
//! Content of `fidget_spinner.tmpl`:
//!
//! ```text
//! Spinner model: {{ model }}
//! Spinner year of construction: {{ construction.year }}
//!
//! Parts:
//! {{ renderTemplate(name="case", data=case, parent=this, indent=2) }}
//! ```
//!
//! Content of `case.tmpl`:
//!
//! ```text
//! Case type: {{ parent.model }}.{{ type }}
//! Main Bearings:
//! {{ plugins(entries=bearings, point="main", field="template", parent=this, indent=2) }}
//!
//! Outer Bearings:
//! {{ plugins(entries=bearings, point="outer", field="template", parent=this, indent=2) }}
//! ```
//!
//! Every render context carries a reserved `this` key holding the context
//! itself, which is what template authors pass as the `parent` argument of
//! the composition functions. Inside a nested template the caller's context
//! is then available under `parent`.
//!
//! The composition functions are documented in [`engine::functions`]; the
//! generation document format is documented in [`document`].

#![deny(unsafe_code)]

pub mod document;
pub mod engine;
pub mod error;
pub mod infrastructure;
pub mod record;

pub use error::{Error, Result};
