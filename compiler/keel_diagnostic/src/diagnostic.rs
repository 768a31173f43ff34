use std::fmt;

use keel_ir::Span;

use crate::ErrorCode;

/// A labeled span with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    /// The main error location.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Related context.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A compiler error.
///
/// Every diagnostic fails its unit; there are no warnings.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// First primary label's span.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error [{}]: {}", self.code, self.message)?;

        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {} {:?}: {}", marker, label.span, label.message)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        for suggestion in &self.suggestions {
            write!(f, "\n  = help: {suggestion}")?;
        }

        Ok(())
    }
}

/// Create a "wrong number of sub-patterns" diagnostic.
///
/// Reported at the deconstruction pattern; the message names both counts.
pub fn pattern_arity_mismatch(
    span: Span,
    type_name: &str,
    expected: usize,
    found: usize,
) -> Diagnostic {
    let plural = if expected == 1 { "" } else { "s" };
    Diagnostic::error(ErrorCode::E3004)
        .with_message(format!(
            "`{type_name}` has {expected} component{plural}, but the pattern has {found} \
             sub-pattern{}: expected arity {expected}, got {found}",
            if found == 1 { "" } else { "s" }
        ))
        .with_label(span, format!("expected {expected} sub-pattern{plural}"))
}

/// Create an "unknown type in deconstruction pattern" diagnostic.
pub fn unknown_deconstructor(span: Span, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E3001)
        .with_message(format!("cannot find type `{name}` to deconstruct"))
        .with_label(span, "not a known type")
}

/// Create a "too many errors" diagnostic.
pub fn too_many_errors(limit: usize) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("aborting after {limit} errors"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_collects_parts() {
        let diag = Diagnostic::error(ErrorCode::E3003)
            .with_message("mismatch")
            .with_label(Span::new(1, 4), "here")
            .with_secondary_label(Span::new(10, 12), "declared here")
            .with_note("n")
            .with_suggestion("s");
        assert_eq!(diag.primary_span(), Some(Span::new(1, 4)));
        assert_eq!(diag.labels.len(), 2);
        assert_eq!(
            diag.to_string(),
            "error [E3003]: mismatch\n  --> 1..4: here\n      10..12: declared here\n  = note: n\n  = help: s"
        );
    }

    #[test]
    fn arity_message_names_both_counts() {
        let diag = pattern_arity_mismatch(Span::new(0, 14), "Point", 2, 3);
        assert_eq!(diag.code, ErrorCode::E3004);
        assert!(diag.message.contains("expected arity 2, got 3"));
        assert_eq!(diag.labels[0].message, "expected 2 sub-patterns");
    }
}
