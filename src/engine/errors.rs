//! Error types for the render layer.

use thiserror::Error;

/// Fatal render-time contract violations.
///
/// Any of these aborts the generation run in progress: they indicate an
/// author or template bug rather than bad input data, so there is no
/// partial-success mode and no retry. The type is `Clone` so it survives
/// being threaded through Tera's error source chain when raised inside a
/// template function (see [`RenderError::from_tera`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// No compiled template under the given logical name
    #[error("template '{0}' not found in registry")]
    TemplateNotFound(String),

    /// Negative indent width passed to the indent formatter
    #[error("indent width must not be negative, got {0}")]
    InvalidIndent(i64),

    /// A required nested template entry declares no template field
    #[error("could not find field '{0}' in nested template entry")]
    MissingTemplateField(String),

    /// A selector field is neither a template name nor a map of
    /// insertion-point names to template names
    #[error("field '{0}' is not a template name or a selector map")]
    InvalidTemplateSelector(String),

    /// A plugin entry collection is not an array
    #[error("nested template entries are not an array, got {0}")]
    InvalidPluginList(String),

    /// A value passed where a list of strings was expected
    #[error("expected a list of strings, got {0}")]
    InvalidStringList(String),

    /// The render was cancelled between recursive steps
    #[error("render cancelled")]
    Cancelled,
}

impl RenderError {
    /// Recover a typed render error from a Tera error.
    ///
    /// Errors raised inside template functions travel through Tera wrapped
    /// in its own error type; this walks the source chain and extracts the
    /// original [`RenderError`] if one is buried there.
    pub fn from_tera(err: &tera::Error) -> Option<RenderError> {
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            if let Some(render) = cause.downcast_ref::<RenderError>() {
                return Some(render.clone());
            }
            if let Some(crate::Error::Render(render)) = cause.downcast_ref::<crate::Error>() {
                return Some(render.clone());
            }
            source = cause.source();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            RenderError::TemplateNotFound("case".into()).to_string(),
            "template 'case' not found in registry"
        );
        assert_eq!(
            RenderError::InvalidIndent(-1).to_string(),
            "indent width must not be negative, got -1"
        );
        assert_eq!(
            RenderError::MissingTemplateField("template".into()).to_string(),
            "could not find field 'template' in nested template entry"
        );
        assert_eq!(RenderError::Cancelled.to_string(), "render cancelled");
    }

    #[test]
    fn test_from_tera_recovers_chained_error() {
        let render = RenderError::TemplateNotFound("bearing".into());
        let wrapped = tera::Error::chain("nested render failed", render.clone());
        let outer = tera::Error::chain("function call failed", wrapped);

        assert_eq!(RenderError::from_tera(&outer), Some(render));
    }

    #[test]
    fn test_from_tera_recovers_crate_error() {
        let err = crate::Error::Render(RenderError::Cancelled);
        let wrapped = tera::Error::chain("nested render failed", err);

        assert_eq!(RenderError::from_tera(&wrapped), Some(RenderError::Cancelled));
    }

    #[test]
    fn test_from_tera_none_for_plain_errors() {
        let err = tera::Error::msg("just a message");
        assert_eq!(RenderError::from_tera(&err), None);
    }
}
