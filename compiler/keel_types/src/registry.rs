//! Registry of type declarations and user-supplied contracts visible to a
//! compilation session.
//!
//! Pattern sites name types the way source code does: by full path
//! (`geom.Point`) or by simple name (`Point`). The registry resolves both.

use keel_ir::{Name, SharedInterner, TypeDecl, TypeIdent};
use rustc_hash::FxHashMap;

use crate::DestructuringContract;

/// Outcome of resolving a name written in a pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Unique(TypeIdent),
    /// Several types share the simple name; the candidates are sorted.
    Ambiguous(Vec<TypeIdent>),
    Unknown,
}

/// Declarations and contracts known to a session.
#[derive(Clone, Debug)]
pub struct ProductRegistry {
    interner: SharedInterner,
    decls: FxHashMap<TypeIdent, TypeDecl>,
    user_contracts: FxHashMap<TypeIdent, DestructuringContract>,
    by_simple_name: FxHashMap<Name, Vec<TypeIdent>>,
}

impl ProductRegistry {
    pub fn new(interner: SharedInterner) -> Self {
        ProductRegistry {
            interner,
            decls: FxHashMap::default(),
            user_contracts: FxHashMap::default(),
            by_simple_name: FxHashMap::default(),
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    fn index_simple_name(&mut self, ident: TypeIdent) {
        let simple = self.interner.intern(ident.simple_name(&self.interner));
        let entry = self.by_simple_name.entry(simple).or_default();
        if !entry.contains(&ident) {
            entry.push(ident);
            entry.sort();
        }
    }

    /// Add a declaration, returning the one it replaces.
    pub fn declare(&mut self, decl: TypeDecl) -> Option<TypeDecl> {
        let ident = decl.ident;
        self.index_simple_name(ident);
        self.decls.insert(ident, decl)
    }

    /// Attach a user-supplied contract. It takes precedence over synthesis
    /// for pattern compilation.
    pub fn register_user_contract(&mut self, contract: DestructuringContract) {
        let ident = contract.ident();
        self.index_simple_name(ident);
        self.user_contracts.insert(ident, contract);
    }

    pub fn decl(&self, ident: TypeIdent) -> Option<&TypeDecl> {
        self.decls.get(&ident)
    }

    pub fn user_contract(&self, ident: TypeIdent) -> Option<&DestructuringContract> {
        self.user_contracts.get(&ident)
    }

    /// True when `ident` has a declaration or a user-supplied contract.
    pub fn knows(&self, ident: TypeIdent) -> bool {
        self.decls.contains_key(&ident) || self.user_contracts.contains_key(&ident)
    }

    /// Resolve a name written in a pattern: full path first, then simple name.
    pub fn resolve(&self, name: Name) -> Resolution {
        let as_path = TypeIdent::new(name);
        if self.knows(as_path) {
            return Resolution::Unique(as_path);
        }
        match self.by_simple_name.get(&name).map(Vec::as_slice) {
            None | Some([]) => Resolution::Unknown,
            Some([only]) => Resolution::Unique(*only),
            Some(many) => Resolution::Ambiguous(many.to_vec()),
        }
    }

    pub fn decls(&self) -> impl Iterator<Item = &TypeDecl> {
        self.decls.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_ir::Ty;
    use pretty_assertions::assert_eq;

    fn point(interner: &SharedInterner, path: &str) -> TypeDecl {
        TypeDecl::record(
            TypeIdent::intern(interner, path),
            [(interner.intern("x"), Ty::Int), (interner.intern("y"), Ty::Int)],
        )
    }

    #[test]
    fn resolves_by_path_and_simple_name() {
        let interner = SharedInterner::new();
        let mut registry = ProductRegistry::new(interner.clone());
        registry.declare(point(&interner, "geom.Point"));
        let ident = TypeIdent::intern(&interner, "geom.Point");

        assert_eq!(
            registry.resolve(interner.intern("geom.Point")),
            Resolution::Unique(ident)
        );
        assert_eq!(
            registry.resolve(interner.intern("Point")),
            Resolution::Unique(ident)
        );
        assert_eq!(
            registry.resolve(interner.intern("Nope")),
            Resolution::Unknown
        );
    }

    #[test]
    fn shared_simple_names_are_ambiguous() {
        let interner = SharedInterner::new();
        let mut registry = ProductRegistry::new(interner.clone());
        registry.declare(point(&interner, "geom.Point"));
        registry.declare(point(&interner, "screen.Point"));

        match registry.resolve(interner.intern("Point")) {
            Resolution::Ambiguous(candidates) => assert_eq!(candidates.len(), 2),
            other => panic!("expected ambiguity, got {other:?}"),
        }
        // Full paths stay unique.
        assert!(matches!(
            registry.resolve(interner.intern("screen.Point")),
            Resolution::Unique(_)
        ));
    }

    #[test]
    fn redeclaring_replaces_and_keeps_one_index_entry() {
        let interner = SharedInterner::new();
        let mut registry = ProductRegistry::new(interner.clone());
        assert!(registry.declare(point(&interner, "geom.Point")).is_none());
        assert!(registry.declare(point(&interner, "geom.Point")).is_some());
        assert!(matches!(
            registry.resolve(interner.intern("Point")),
            Resolution::Unique(_)
        ));
        assert_eq!(registry.decls().count(), 1);
    }
}
