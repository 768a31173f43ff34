//! Compiled pattern representation.
//!
//! `FlatPattern` is what the binder produces from a `MatchPattern`: names
//! are resolved, deconstruction sites point at their contract, and literal
//! forms are split by kind. Scrutinee paths describe how to reach a bound
//! sub-value from the scrutinee.

use keel_ir::Name;
use smallvec::SmallVec;

use crate::ContractId;

/// Steps from the scrutinee to a sub-value. Most paths are short.
pub type ScrutineePath = SmallVec<[PathInstruction; 4]>;

/// One step in a scrutinee path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathInstruction {
    /// Element at index of a tuple.
    TupleIndex(u32),
    /// Component at index, as returned by the contract's `bind`.
    Component { contract: ContractId, index: u32 },
}

/// A pattern after binding.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FlatPattern {
    /// Matches anything without binding.
    Wildcard,
    /// Matches anything and binds it.
    Binding(Name),
    LitInt(i64),
    LitBool(bool),
    /// Interned string literal.
    LitStr(Name),
    LitChar(char),
    Tuple(Vec<FlatPattern>),
    /// Deconstruction through a contract; one sub-pattern per component,
    /// in canonical order.
    Deconstruct {
        contract: ContractId,
        fields: Vec<FlatPattern>,
    },
    /// Alternatives tried left to right. All bind the same names.
    Or(Vec<FlatPattern>),
    /// Binds the whole value, then matches `inner`.
    At { name: Name, inner: Box<FlatPattern> },
}

impl FlatPattern {
    /// True if this pattern matches every value of its type.
    pub fn is_irrefutable(&self) -> bool {
        match self {
            FlatPattern::Wildcard | FlatPattern::Binding(_) => true,
            FlatPattern::LitInt(_)
            | FlatPattern::LitBool(_)
            | FlatPattern::LitStr(_)
            | FlatPattern::LitChar(_) => false,
            FlatPattern::Tuple(elems) | FlatPattern::Deconstruct { fields: elems, .. } => {
                elems.iter().all(FlatPattern::is_irrefutable)
            }
            FlatPattern::Or(alts) => alts.iter().any(FlatPattern::is_irrefutable),
            FlatPattern::At { inner, .. } => inner.is_irrefutable(),
        }
    }

    /// Collect every binding with the path that reaches it.
    ///
    /// For or-patterns only the first alternative is walked; the binder
    /// checks that every alternative binds the same names.
    pub fn collect_bindings(&self, path: &ScrutineePath, out: &mut Vec<(Name, ScrutineePath)>) {
        match self {
            FlatPattern::Binding(name) => out.push((*name, path.clone())),
            FlatPattern::Wildcard
            | FlatPattern::LitInt(_)
            | FlatPattern::LitBool(_)
            | FlatPattern::LitStr(_)
            | FlatPattern::LitChar(_) => {}
            FlatPattern::Tuple(elems) => {
                for (i, elem) in (0u32..).zip(elems) {
                    let mut child = path.clone();
                    child.push(PathInstruction::TupleIndex(i));
                    elem.collect_bindings(&child, out);
                }
            }
            FlatPattern::Deconstruct { contract, fields } => {
                for (index, field) in (0u32..).zip(fields) {
                    let mut child = path.clone();
                    child.push(PathInstruction::Component {
                        contract: *contract,
                        index,
                    });
                    field.collect_bindings(&child, out);
                }
            }
            FlatPattern::Or(alts) => {
                if let Some(first) = alts.first() {
                    first.collect_bindings(path, out);
                }
            }
            FlatPattern::At { name, inner } => {
                out.push((*name, path.clone()));
                inner.collect_bindings(path, out);
            }
        }
    }

    /// Every name bound anywhere in the pattern, in binding order.
    pub fn bound_names(&self) -> Vec<Name> {
        let mut out = Vec::new();
        self.collect_bindings(&ScrutineePath::new(), &mut out);
        out.into_iter().map(|(name, _)| name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_ir::StringInterner;
    use pretty_assertions::assert_eq;

    #[test]
    fn bindings_follow_component_paths() {
        let interner = StringInterner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        let point = ContractId::new(0);
        let pattern = FlatPattern::Tuple(vec![
            FlatPattern::Deconstruct {
                contract: point,
                fields: vec![FlatPattern::Binding(a), FlatPattern::Wildcard],
            },
            FlatPattern::At {
                name: b,
                inner: Box::new(FlatPattern::LitInt(1)),
            },
        ]);

        let mut out = Vec::new();
        pattern.collect_bindings(&ScrutineePath::new(), &mut out);
        assert_eq!(
            out,
            vec![
                (
                    a,
                    ScrutineePath::from_slice(&[
                        PathInstruction::TupleIndex(0),
                        PathInstruction::Component {
                            contract: point,
                            index: 0
                        }
                    ])
                ),
                (b, ScrutineePath::from_slice(&[PathInstruction::TupleIndex(1)])),
            ]
        );
        assert!(!pattern.is_irrefutable());
    }

    #[test]
    fn irrefutability() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let total = FlatPattern::Deconstruct {
            contract: ContractId::new(0),
            fields: vec![FlatPattern::Binding(x), FlatPattern::Wildcard],
        };
        assert!(total.is_irrefutable());
        assert!(FlatPattern::Or(vec![FlatPattern::LitBool(true), FlatPattern::Wildcard])
            .is_irrefutable());
        assert!(!FlatPattern::Or(vec![FlatPattern::LitBool(true)]).is_irrefutable());
    }
}
