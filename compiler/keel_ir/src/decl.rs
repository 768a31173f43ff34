//! Type declarations handed over by the compiler frontend.
//!
//! A `TypeDecl` is the raw metadata for one nominal type: what the frontend
//! parsed, or what a reader of foreign binaries extracted from symbol
//! tables. Whether it is a structural product type is decided later, by
//! `keel_types::ProductShape::recognize`.

use crate::{Name, Span, Ty, TypeIdent};

/// Where a declaration's metadata came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclOrigin {
    /// Compiled by this toolchain; metadata is available at compile time.
    Native,
    /// Loaded from a foreign binary; only reflective metadata is trusted at
    /// run time.
    Foreign,
}

/// One declared component (field) of a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentDecl {
    pub label: Name,
    pub ty: Ty,
    pub mutable: bool,
    pub span: Span,
}

/// One declared constructor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CtorDecl {
    /// Parameter labels in declaration order.
    pub params: Vec<Name>,
    /// Marked canonical by the declaring toolchain.
    pub canonical: bool,
    pub span: Span,
}

/// One declared accessor method.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AccessorDecl {
    pub name: Name,
    /// Number of parameters besides the receiver. Component accessors take none.
    pub param_count: usize,
    pub span: Span,
}

/// A nominal type declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDecl {
    pub ident: TypeIdent,
    pub span: Span,
    pub origin: DeclOrigin,
    pub components: Vec<ComponentDecl>,
    pub constructors: Vec<CtorDecl>,
    pub accessors: Vec<AccessorDecl>,
}

impl TypeDecl {
    /// Declare a native record: immutable components, one canonical
    /// constructor over all of them and one accessor per component.
    pub fn record(ident: TypeIdent, components: impl IntoIterator<Item = (Name, Ty)>) -> Self {
        let components: Vec<ComponentDecl> = components
            .into_iter()
            .map(|(label, ty)| ComponentDecl {
                label,
                ty,
                mutable: false,
                span: Span::DUMMY,
            })
            .collect();
        let params = components.iter().map(|c| c.label).collect();
        let accessors = components
            .iter()
            .map(|c| AccessorDecl {
                name: c.label,
                param_count: 0,
                span: c.span,
            })
            .collect();
        TypeDecl {
            ident,
            span: Span::DUMMY,
            origin: DeclOrigin::Native,
            components,
            constructors: vec![CtorDecl {
                params,
                canonical: true,
                span: Span::DUMMY,
            }],
            accessors,
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: DeclOrigin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn is_native(&self) -> bool {
        self.origin == DeclOrigin::Native
    }

    /// Find a declared component by label.
    pub fn component(&self, label: Name) -> Option<&ComponentDecl> {
        self.components.iter().find(|c| c.label == label)
    }
}
