//! Formatting diagnostics for different output formats

use super::diagnostic::Diagnostic;
#[cfg(feature = "terminal")]
use super::diagnostic::Severity;

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable text with the source line underlined
    #[default]
    Text,
    /// JSON format
    Json,
    /// Compact single-line format
    Compact,
}

/// Formatter for diagnostics
#[derive(Debug, Clone)]
pub struct DiagnosticFormatter {
    format: Format,
    show_code: bool,
    show_help: bool,
    #[cfg(feature = "terminal")]
    use_color: bool,
}

impl DiagnosticFormatter {
    /// Create a new formatter
    pub fn new(format: Format) -> Self {
        Self {
            format,
            show_code: true,
            show_help: true,
            #[cfg(feature = "terminal")]
            use_color: true,
        }
    }

    /// Set whether to show error codes
    pub fn with_code(mut self, show: bool) -> Self {
        self.show_code = show;
        self
    }

    /// Set whether to show help lines
    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    /// Set whether to use color (terminal feature only)
    #[cfg(feature = "terminal")]
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Format a diagnostic
    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        match self.format {
            Format::Text => self.format_text(diagnostic),
            Format::Json => json_or_debug(diagnostic),
            Format::Compact => self.format_compact(diagnostic),
        }
    }

    /// Format multiple diagnostics
    pub fn format_all(&self, diagnostics: &[Diagnostic]) -> String {
        match self.format {
            Format::Text => diagnostics
                .iter()
                .map(|d| self.format_text(d))
                .collect::<Vec<_>>()
                .join("\n"),
            Format::Json => json_or_debug(diagnostics),
            Format::Compact => diagnostics
                .iter()
                .map(|d| self.format_compact(d))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn format_text(&self, diagnostic: &Diagnostic) -> String {
        let mut result = String::new();

        #[cfg(feature = "terminal")]
        if self.use_color {
            use colored::Colorize;
            let severity_str = match diagnostic.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
                Severity::Info => "info".blue().bold(),
            };
            result.push_str(&format!("{}: {}", severity_str, diagnostic.message.bold()));
        } else {
            result.push_str(&format!("{}: {}", diagnostic.severity, diagnostic.message));
        }

        #[cfg(not(feature = "terminal"))]
        result.push_str(&format!("{}: {}", diagnostic.severity, diagnostic.message));

        if self.show_code {
            result.push_str(&format!(" [{}]", diagnostic.code_string()));
        }
        result.push('\n');
        result.push_str(&format!(" --> {}\n", diagnostic.span));

        if let Some(source) = &diagnostic.source_text {
            let start = diagnostic.span.start.min(source.len());
            let width = diagnostic.span.len().max(1);

            result.push_str(&format!("  | {source}\n"));
            result.push_str("  | ");
            let indent = source.get(..start).map_or(start, |prefix| prefix.chars().count());
            result.push_str(&" ".repeat(indent));
            result.push_str(&self.underline(diagnostic, width));
            result.push('\n');
        }

        if self.show_help {
            if let Some(help) = &diagnostic.help {
                result.push_str(&format!("help: {help}\n"));
            }
        }

        result
    }

    #[cfg(feature = "terminal")]
    fn underline(&self, diagnostic: &Diagnostic, width: usize) -> String {
        let underline = "^".repeat(width);
        if !self.use_color {
            return underline;
        }
        use colored::Colorize;
        match diagnostic.severity {
            Severity::Error => underline.red().to_string(),
            Severity::Warning => underline.yellow().to_string(),
            Severity::Info => underline.blue().to_string(),
        }
    }

    #[cfg(not(feature = "terminal"))]
    fn underline(&self, _diagnostic: &Diagnostic, width: usize) -> String {
        "^".repeat(width)
    }

    fn format_compact(&self, diagnostic: &Diagnostic) -> String {
        let code = if self.show_code {
            format!("[{}] ", diagnostic.code_string())
        } else {
            String::new()
        };

        format!(
            "{}: {}: {}{}",
            diagnostic.span, diagnostic.severity, code, diagnostic.message
        )
    }
}

impl Default for DiagnosticFormatter {
    fn default() -> Self {
        Self::new(Format::Text)
    }
}

fn json_or_debug<T: serde::Serialize + std::fmt::Debug + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
}
