//! Destructuring contracts and their synthesis.
//!
//! A contract is what the pattern binder needs to deconstruct a value:
//! its arity and an operation returning the component values in canonical
//! order. For a structural product the contract is synthesized from the
//! type's descriptor; a type may instead carry a user-supplied contract,
//! which always wins.
//!
//! Contracts drive pattern compilation only. They are never exported as
//! symbols of a compiled unit.

use std::fmt;
use std::sync::Arc;

use keel_ir::{StringInterner, Ty, TypeDecl, TypeIdent};

use crate::{native, MirrorError, ProductShape, ShapeError, TypeMetadata, Value};

/// Deconstruction operation: instance to ordered component values.
pub type BindFn = Arc<dyn Fn(&Value) -> Result<Vec<Value>, MirrorError> + Send + Sync>;

/// Who provided a contract.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContractOrigin {
    /// Derived by the compiler from a structural product's shape.
    Synthesized,
    /// Declared by the type's author; bypasses synthesis.
    UserSupplied,
}

/// Arity plus ordered component extraction for one type.
#[derive(Clone)]
pub struct DestructuringContract {
    ident: TypeIdent,
    path: Arc<str>,
    component_types: Vec<Ty>,
    bind: BindFn,
    origin: ContractOrigin,
}

impl DestructuringContract {
    /// Synthesize the contract of a product from its descriptor.
    ///
    /// `bind` reads every component through the descriptor's cached
    /// accessors, in canonical order.
    pub fn from_metadata(metadata: Arc<TypeMetadata>) -> Self {
        let ident = metadata.ident();
        let path: Arc<str> = Arc::from(metadata.path());
        let component_types = metadata.types().to_vec();
        let bind: BindFn = Arc::new(move |value: &Value| metadata.components(value));
        DestructuringContract {
            ident,
            path,
            component_types,
            bind,
            origin: ContractOrigin::Synthesized,
        }
    }

    /// A contract declared by the type's author.
    pub fn user_supplied(
        ident: TypeIdent,
        path: &str,
        component_types: Vec<Ty>,
        bind: BindFn,
    ) -> Self {
        DestructuringContract {
            ident,
            path: Arc::from(path),
            component_types,
            bind,
            origin: ContractOrigin::UserSupplied,
        }
    }

    pub fn ident(&self) -> TypeIdent {
        self.ident
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn arity(&self) -> usize {
        self.component_types.len()
    }

    pub fn component_types(&self) -> &[Ty] {
        &self.component_types
    }

    pub fn origin(&self) -> ContractOrigin {
        self.origin
    }

    /// Deconstruct `value` into exactly `arity()` component values.
    pub fn bind(&self, value: &Value) -> Result<Vec<Value>, MirrorError> {
        let values = (self.bind)(value)?;
        if values.len() != self.arity() {
            return Err(MirrorError::MalformedMetadata {
                ty: self.path.to_string(),
                detail: format!(
                    "destructuring produced {} values for arity {}",
                    values.len(),
                    self.arity()
                ),
            });
        }
        Ok(values)
    }
}

impl fmt::Debug for DestructuringContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestructuringContract")
            .field("path", &self.path)
            .field("arity", &self.arity())
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// A synthesized contract together with the descriptor it was built from.
#[derive(Clone, Debug)]
pub struct SynthesizedContract {
    pub contract: DestructuringContract,
    pub metadata: Arc<TypeMetadata>,
}

/// Why synthesis failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SynthesisError {
    NotAProduct(Vec<ShapeError>),
    Malformed(MirrorError),
}

/// Recognize `decl` as a structural product and synthesize its contract.
pub fn synthesize_contract(
    decl: &TypeDecl,
    interner: &StringInterner,
) -> Result<SynthesizedContract, SynthesisError> {
    let shape = ProductShape::recognize(decl).map_err(SynthesisError::NotAProduct)?;
    let metadata = Arc::new(
        native::synthesize_metadata(&shape, interner).map_err(SynthesisError::Malformed)?,
    );
    tracing::debug!(
        ty = metadata.path(),
        arity = metadata.arity(),
        "synthesized destructuring contract"
    );
    Ok(SynthesizedContract {
        contract: DestructuringContract::from_metadata(Arc::clone(&metadata)),
        metadata,
    })
}

#[cfg(test)]
mod tests;
