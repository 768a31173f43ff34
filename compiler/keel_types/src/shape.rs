//! Structural product recognition.
//!
//! A declaration is a structural product type when:
//! - no component is mutable,
//! - exactly one constructor is marked canonical,
//! - the canonical constructor's parameters are the component labels, in
//!   component order,
//! - every component has a zero-argument accessor of the same name,
//! - no label repeats.
//!
//! Recognition reports every violation at once so a single compilation
//! shows the whole picture.

use keel_diagnostic::{Diagnostic, ErrorCode};
use keel_ir::{DeclOrigin, Name, Span, StringInterner, Ty, TypeDecl, TypeIdent};
use rustc_hash::FxHashSet;

/// One component of a recognized product.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShapeComponent {
    pub label: Name,
    pub ty: Ty,
    pub span: Span,
}

/// A declaration proven to be a structural product type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProductShape {
    pub ident: TypeIdent,
    pub span: Span,
    pub origin: DeclOrigin,
    /// Components in canonical order.
    pub components: Vec<ShapeComponent>,
}

/// Why a declaration is not a structural product type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeError {
    MutableComponent { label: Name, span: Span },
    /// Zero or several constructors marked canonical.
    CanonicalConstructor { found: usize },
    ConstructorOrder {
        expected: Vec<Name>,
        found: Vec<Name>,
        span: Span,
    },
    MissingAccessor { label: Name, span: Span },
    /// The only accessor with a component's name takes arguments.
    AccessorTakesArguments { name: Name, count: usize, span: Span },
    DuplicateComponent { label: Name, span: Span },
}

impl ProductShape {
    /// Check `decl` and extract its product shape.
    pub fn recognize(decl: &TypeDecl) -> Result<ProductShape, Vec<ShapeError>> {
        let mut errors = Vec::new();

        let mut seen = FxHashSet::default();
        for component in &decl.components {
            if component.mutable {
                errors.push(ShapeError::MutableComponent {
                    label: component.label,
                    span: component.span,
                });
            }
            if !seen.insert(component.label) {
                errors.push(ShapeError::DuplicateComponent {
                    label: component.label,
                    span: component.span,
                });
            }
        }

        let canonical: Vec<_> = decl.constructors.iter().filter(|c| c.canonical).collect();
        if let [ctor] = canonical.as_slice() {
            let expected: Vec<Name> = decl.components.iter().map(|c| c.label).collect();
            if ctor.params != expected {
                errors.push(ShapeError::ConstructorOrder {
                    expected,
                    found: ctor.params.clone(),
                    span: ctor.span,
                });
            }
        } else {
            errors.push(ShapeError::CanonicalConstructor {
                found: canonical.len(),
            });
        }

        for component in &decl.components {
            let mut candidates = decl
                .accessors
                .iter()
                .filter(|a| a.name == component.label)
                .peekable();
            match candidates.peek() {
                None => errors.push(ShapeError::MissingAccessor {
                    label: component.label,
                    span: component.span,
                }),
                Some(first) => {
                    let first = (*first).clone();
                    if !candidates.any(|a| a.param_count == 0) {
                        errors.push(ShapeError::AccessorTakesArguments {
                            name: first.name,
                            count: first.param_count,
                            span: first.span,
                        });
                    }
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ProductShape {
            ident: decl.ident,
            span: decl.span,
            origin: decl.origin,
            components: decl
                .components
                .iter()
                .map(|c| ShapeComponent {
                    label: c.label,
                    ty: c.ty.clone(),
                    span: c.span,
                })
                .collect(),
        })
    }

    pub fn arity(&self) -> usize {
        self.components.len()
    }

    pub fn labels(&self) -> impl Iterator<Item = Name> + '_ {
        self.components.iter().map(|c| c.label)
    }
}

impl ShapeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ShapeError::MutableComponent { .. } => ErrorCode::E2101,
            ShapeError::CanonicalConstructor { .. } => ErrorCode::E2102,
            ShapeError::ConstructorOrder { .. } => ErrorCode::E2103,
            ShapeError::MissingAccessor { .. } | ShapeError::AccessorTakesArguments { .. } => {
                ErrorCode::E2104
            }
            ShapeError::DuplicateComponent { .. } => ErrorCode::E2105,
        }
    }

    /// Render as a diagnostic against the declaration of `ty`.
    pub fn to_diagnostic(
        &self,
        ty: TypeIdent,
        decl_span: Span,
        interner: &StringInterner,
    ) -> Diagnostic {
        let path = ty.path(interner);
        let names = |names: &[Name]| {
            names
                .iter()
                .map(|n| interner.lookup(*n))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let diag = Diagnostic::error(self.code());
        match self {
            ShapeError::MutableComponent { label, span } => diag
                .with_message(format!(
                    "component `{}` of `{path}` is mutable",
                    interner.lookup(*label)
                ))
                .with_label(*span, "declared mutable here"),
            ShapeError::CanonicalConstructor { found } => diag
                .with_message(format!(
                    "`{path}` has {found} canonical constructors, expected exactly one"
                ))
                .with_label(decl_span, "declared here"),
            ShapeError::ConstructorOrder {
                expected,
                found,
                span,
            } => diag
                .with_message(format!(
                    "canonical constructor of `{path}` does not follow its components"
                ))
                .with_label(*span, format!("parameters are ({})", names(found)))
                .with_note(format!("components are ({})", names(expected))),
            ShapeError::MissingAccessor { label, span } => diag
                .with_message(format!(
                    "component `{}` of `{path}` has no accessor",
                    interner.lookup(*label)
                ))
                .with_label(*span, "component declared here"),
            ShapeError::AccessorTakesArguments { name, count, span } => diag
                .with_message(format!(
                    "accessor `{}` of `{path}` takes {count} arguments",
                    interner.lookup(*name)
                ))
                .with_label(*span, "component accessors take no arguments"),
            ShapeError::DuplicateComponent { label, span } => diag
                .with_message(format!(
                    "component `{}` of `{path}` is declared twice",
                    interner.lookup(*label)
                ))
                .with_label(*span, "duplicate component"),
        }
    }
}

#[cfg(test)]
mod tests;
