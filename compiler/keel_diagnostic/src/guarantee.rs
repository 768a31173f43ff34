//! Proof that an error was emitted.

/// Zero-sized token proving that at least one error diagnostic was
/// recorded.
///
/// Only [`DiagnosticQueue`](crate::queue::DiagnosticQueue) hands these out,
/// so a function returning `Result<T, ErrorGuaranteed>` cannot fail
/// without having reported why.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) fn new() -> Self {
        ErrorGuaranteed(())
    }
}
