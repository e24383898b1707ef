//! Unexpect error handling - single encapsulated error type.
//!
//! Every failure in the engine and its CLI host flows through [`MigrateError`];
//! internal construction details stay private to this module.

use miette::{Diagnostic, SourceSpan};
use miette::{LabeledSpan, NamedSource};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Source text an error can point into, with explicit hierarchy between real
/// sources (preferred) and fallbacks (tolerated when necessary).
///
/// For this engine the "source" is usually the attribute section of a single
/// test method, so contents are small and cheap to clone.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real source text.
    /// This is the preferred method for error reporting.
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Create a fallback when real source is unavailable.
    /// Use only when real source cannot be obtained.
    pub fn fallback(context: &str) -> Self {
        Self {
            name: "fallback".to_string(),
            content: format!("// {}", context),
        }
    }

    /// Convert to NamedSource for use with miette error reporting.
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::fallback("default context")
    }
}

/// The single error type - no wrapper, no variants, just essential data.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct MigrateError {
    /// What went wrong (type-specific data)
    pub kind: ErrorKind,
    /// Where it happened (context-specific source information)
    pub source_info: SourceInfo,
    /// How to help (auto-populated based on context)
    pub diagnostic_info: DiagnosticInfo,
}

/// All error kinds as a clean enum - no duplicate fields.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Parse errors - structural issues in the attribute surface
    #[error("Parse error: malformed {construct}")]
    MalformedAttribute { construct: String },
    #[error("Parse error: invalid {literal_type} '{value}'")]
    InvalidLiteral { literal_type: String, value: String },
    #[error("Parse error: missing {element}")]
    MissingElement { element: String },

    // Argument errors - annotation argument shapes outside the supported set
    #[error("Argument error: unknown argument '{name}'")]
    UnknownArgument { name: String },
    #[error("Argument error: {argument} expects {expected}, got {actual}")]
    ValueKind {
        argument: String,
        expected: String,
        actual: String,
    },
    #[error("Argument error: {count} positional arguments, at most one is supported")]
    SurplusPositional { count: usize },
    #[error("Argument error: unknown match mode '{value}'")]
    UnknownMatchMode { value: String },
    #[error("Argument error: no exception-expectation attribute on this method")]
    AnnotationNotFound,

    // Host errors - failures outside the per-occurrence pipeline
    #[error("Host error: invalid path '{path}'")]
    InvalidPath { path: String },
    #[error("Host error: malformed migration request: {reason}")]
    MalformedRequest { reason: String },
}

/// Context-specific source information.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
    pub phase: String,
}

/// Diagnostic enhancement data.
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

/// Context-aware error creation - each context knows how to create
/// appropriately attributed errors.
pub trait ErrorReporting {
    /// Create an error with context-appropriate enhancements.
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> MigrateError;

    /// Convenience methods for common error kinds.
    fn unknown_argument(&self, name: &str, span: SourceSpan) -> MigrateError {
        let mut error = self.report(ErrorKind::UnknownArgument { name: name.into() }, span);
        error.diagnostic_info.help = Some(
            "supported named arguments: ExpectedException, ExpectedExceptionName, \
             ExpectedMessage, MatchType, UserMessage, Handler"
                .into(),
        );
        error
    }

    fn value_kind(
        &self,
        argument: &str,
        expected: &str,
        actual: &str,
        span: SourceSpan,
    ) -> MigrateError {
        self.report(
            ErrorKind::ValueKind {
                argument: argument.into(),
                expected: expected.into(),
                actual: actual.into(),
            },
            span,
        )
    }

    fn surplus_positional(&self, count: usize, span: SourceSpan) -> MigrateError {
        self.report(ErrorKind::SurplusPositional { count }, span)
    }

    fn unknown_match_mode(&self, value: &str, span: SourceSpan) -> MigrateError {
        let mut error = self.report(ErrorKind::UnknownMatchMode { value: value.into() }, span);
        error.diagnostic_info.help =
            Some("known match modes: Exact, Contains, Regex, StartsWith".into());
        error
    }

    fn annotation_not_found(&self, span: SourceSpan) -> MigrateError {
        self.report(ErrorKind::AnnotationNotFound, span)
    }

    fn invalid_path(&self, path: &str) -> MigrateError {
        self.report(ErrorKind::InvalidPath { path: path.into() }, unspanned())
    }

    fn malformed_request(&self, reason: &str) -> MigrateError {
        self.report(
            ErrorKind::MalformedRequest {
                reason: reason.into(),
            },
            unspanned(),
        )
    }
}

impl ErrorKind {
    /// Get the error category for test assertions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedAttribute { .. }
            | Self::InvalidLiteral { .. }
            | Self::MissingElement { .. } => ErrorCategory::Parse,

            Self::UnknownArgument { .. }
            | Self::ValueKind { .. }
            | Self::SurplusPositional { .. }
            | Self::UnknownMatchMode { .. }
            | Self::AnnotationNotFound => ErrorCategory::Arguments,

            Self::InvalidPath { .. } | Self::MalformedRequest { .. } => ErrorCategory::Host,
        }
    }

    /// Get the error code suffix for diagnostic codes.
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::MalformedAttribute { .. } => "malformed_attribute",
            Self::InvalidLiteral { .. } => "invalid_literal",
            Self::MissingElement { .. } => "missing_element",
            Self::UnknownArgument { .. } => "unknown_argument",
            Self::ValueKind { .. } => "value_kind",
            Self::SurplusPositional { .. } => "surplus_positional",
            Self::UnknownMatchMode { .. } => "unknown_match_mode",
            Self::AnnotationNotFound => "annotation_not_found",
            Self::InvalidPath { .. } => "invalid_path",
            Self::MalformedRequest { .. } => "malformed_request",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Arguments,
    Host,
}

impl Diagnostic for MigrateError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.primary_label()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

impl MigrateError {
    /// Relabel the error's source, keeping content and span intact. Hosts
    /// use this to name diagnostics after the request file they came from.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        let content = self.source_info.source.inner().clone();
        self.source_info.source = Arc::new(NamedSource::new(name.into(), content));
        self
    }

    fn primary_label(&self) -> String {
        match &self.kind {
            ErrorKind::MalformedAttribute { .. } => "malformed syntax".into(),
            ErrorKind::InvalidLiteral { .. } => "invalid literal".into(),
            ErrorKind::MissingElement { .. } => "missing here".into(),
            ErrorKind::UnknownArgument { .. } => "unknown argument".into(),
            ErrorKind::ValueKind { .. } => "wrong value kind".into(),
            ErrorKind::SurplusPositional { .. } => "extra positional argument".into(),
            ErrorKind::UnknownMatchMode { .. } => "unknown match mode".into(),
            ErrorKind::AnnotationNotFound => "no annotation here".into(),
            ErrorKind::InvalidPath { .. } => "invalid path".into(),
            ErrorKind::MalformedRequest { .. } => "malformed request".into(),
        }
    }
}

/// Creates a placeholder span for errors not tied to a specific source code
/// location, such as I/O errors or malformed request files.
/// This makes the intent of using an empty span explicit and searchable.
pub fn unspanned() -> miette::SourceSpan {
    miette::SourceSpan::from(0..0)
}

/// Converts an attribute-surface Span to a miette SourceSpan.
pub fn to_source_span(span: crate::syntax::Span) -> miette::SourceSpan {
    miette::SourceSpan::from(span.start..span.end)
}

/// General-purpose error creation context used throughout the codebase
/// for creating properly contextualized MigrateError instances.
pub struct PhaseContext {
    pub source: SourceContext,
    pub phase: String,
}

impl PhaseContext {
    pub fn new(source: SourceContext, phase: impl Into<String>) -> Self {
        Self {
            source,
            phase: phase.into(),
        }
    }
}

impl ErrorReporting for PhaseContext {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> MigrateError {
        let error_code = format!("unexpect::{}::{}", self.phase, kind.code_suffix());

        MigrateError {
            kind,
            source_info: SourceInfo {
                source: self.source.to_named_source(),
                primary_span: span,
                phase: self.phase.clone(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a MigrateError with full miette diagnostics.
///
/// This provides rich error formatting with source spans, labels, and help
/// text. Use this for user-facing error display in CLI contexts.
pub fn print_error(error: MigrateError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}
