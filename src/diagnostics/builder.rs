//! Builder for diagnostics

use super::diagnostic::{Diagnostic, DiagnosticCode, Severity, Span};

/// Builder for [`Diagnostic`]
#[derive(Debug, Clone)]
pub struct DiagnosticBuilder {
    code: DiagnosticCode,
    severity: Severity,
    message: Option<String>,
    span: Span,
    source_text: Option<String>,
    help: Option<String>,
}

impl DiagnosticBuilder {
    /// Start a diagnostic with the given severity
    pub fn new(code: DiagnosticCode, severity: Severity) -> Self {
        Self {
            code,
            severity,
            message: None,
            span: Span::default(),
            source_text: None,
            help: None,
        }
    }

    /// Start an error diagnostic
    pub fn error(code: DiagnosticCode) -> Self {
        Self::new(code, Severity::Error)
    }

    /// Start a warning diagnostic
    pub fn warning(code: DiagnosticCode) -> Self {
        Self::new(code, Severity::Warning)
    }

    /// Set the message; defaults to the code description
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the offending byte range
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Span::new(start, end);
        self
    }

    /// Attach the expression the span refers to
    pub fn with_source_text(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    /// Override the default help
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Build the diagnostic
    pub fn build(self) -> Diagnostic {
        let message = self.message.unwrap_or_else(|| self.code.to_string());
        let mut diagnostic = Diagnostic::new(self.code, self.severity, message, self.span);
        diagnostic.source_text = self.source_text;
        if self.help.is_some() {
            diagnostic.help = self.help;
        }
        diagnostic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let diagnostic = DiagnosticBuilder::error(DiagnosticCode::TrailingToken).build();
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.message, "trailing token");
        assert_eq!(diagnostic.span, Span::new(0, 0));
        assert!(diagnostic.source_text.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let diagnostic = DiagnosticBuilder::warning(DiagnosticCode::PropertyNotFound)
            .with_message("No property 'X'")
            .with_span(4, 5)
            .with_source_text("a eq X")
            .with_help("try 'A'")
            .build();
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.span.len(), 1);
        assert_eq!(diagnostic.source_text.as_deref(), Some("a eq X"));
        assert_eq!(diagnostic.help.as_deref(), Some("try 'A'"));
    }
}
