//! Diagnostic queue for collecting and ordering diagnostics.
//!
//! - Error limit, after which one "too many errors" diagnostic is recorded
//!   and further errors are dropped
//! - Exact-duplicate suppression (the same nested pattern can be reached
//!   from several arms of an or-pattern)
//! - `ErrorGuaranteed` proof that errors were emitted

use crate::{too_many_errors, Diagnostic, ErrorGuaranteed};

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before stopping (0 = unlimited).
    pub error_limit: usize,
    /// Drop diagnostics identical to one already queued.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// No limit, no deduplication.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queue for collecting diagnostics of one compilation unit.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    limit_reported: bool,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            limit_reported: false,
            config,
        }
    }

    /// Add a diagnostic. Returns `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        if self.limit_reached() {
            if !self.limit_reported {
                self.limit_reported = true;
                self.diagnostics
                    .push(too_many_errors(self.config.error_limit));
            }
            return false;
        }

        if self.config.deduplicate && self.diagnostics.contains(&diag) {
            return false;
        }

        self.error_count += 1;
        self.diagnostics.push(diag);
        true
    }

    /// Emit an error diagnostic and get proof it was emitted.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        self.add(diag);
        ErrorGuaranteed::new()
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Proof of an emitted error, if any.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        (self.error_count > 0).then(ErrorGuaranteed::new)
    }

    /// Take all diagnostics, ordered by primary span start.
    ///
    /// Diagnostics without a span keep their relative order at the end.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut out = std::mem::take(&mut self.diagnostics);
        out.sort_by_key(|d| d.primary_span().map_or(u32::MAX, |s| s.start));
        self.error_count = 0;
        self.limit_reported = false;
        out
    }

    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use keel_ir::Span;

    fn err_at(start: u32) -> Diagnostic {
        Diagnostic::error(ErrorCode::E3004)
            .with_message(format!("at {start}"))
            .with_label(Span::new(start, start + 1), "")
    }

    #[test]
    fn flush_orders_by_span() {
        let mut queue = DiagnosticQueue::new();
        queue.add(err_at(30));
        queue.add(err_at(5));
        let order: Vec<_> = queue.flush().into_iter().map(|d| d.message).collect();
        assert_eq!(order, vec!["at 5", "at 30"]);
        assert_eq!(queue.error_count(), 0);
    }

    #[test]
    fn duplicates_are_dropped() {
        let mut queue = DiagnosticQueue::new();
        assert!(queue.add(err_at(1)));
        assert!(!queue.add(err_at(1)));
        assert_eq!(queue.error_count(), 1);
    }

    #[test]
    fn limit_adds_a_single_marker() {
        let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
            error_limit: 2,
            deduplicate: false,
        });
        for i in 0..5 {
            queue.add(err_at(i));
        }
        let flushed = queue.flush();
        assert_eq!(flushed.len(), 3);
        assert_eq!(flushed[2].code, ErrorCode::E9002);
    }

    #[test]
    fn guarantee_only_with_errors() {
        let mut queue = DiagnosticQueue::new();
        assert!(queue.has_errors().is_none());
        let _proof = queue.emit_error(err_at(0));
        assert!(queue.has_errors().is_some());
    }
}
