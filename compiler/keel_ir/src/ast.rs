//! Pattern AST as produced by the frontend.
//!
//! Only the pattern forms the binder understands live here. Surface syntax
//! is the parser's business; these nodes are what it hands over.

use crate::{Name, Span};

/// Literal in pattern position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Str(Name),
    Char(char),
}

/// A pattern in `let`, `match` arm or parameter position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MatchPattern {
    /// `_`
    Wildcard,
    /// `x`
    Binding(Name),
    /// `42`, `true`, `"s"`, `'c'`
    Literal(Literal),
    /// `(p1, p2, ...)`
    Tuple(Vec<MatchPattern>),
    /// `TypeName(p1, p2, ...)`: positional deconstruction through the
    /// type's destructuring contract.
    Deconstruct {
        /// The name as written; resolved against the session's type paths.
        ty: Name,
        args: Vec<MatchPattern>,
        span: Span,
    },
    /// `p1 | p2`
    Or(Vec<MatchPattern>),
    /// `name @ p`
    At { name: Name, inner: Box<MatchPattern> },
}

impl MatchPattern {
    /// Shorthand for a deconstruction pattern.
    pub fn deconstruct(ty: Name, args: Vec<MatchPattern>, span: Span) -> Self {
        MatchPattern::Deconstruct { ty, args, span }
    }

    /// Span of the outermost deconstruction, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            MatchPattern::Deconstruct { span, .. } => Some(*span),
            MatchPattern::At { inner, .. } => inner.span(),
            _ => None,
        }
    }
}
