//! Running compiled patterns against runtime values.

use keel_ir::{Name, StringInterner};
use keel_stack::ensure_sufficient_stack;
use keel_types::{DestructuringContract, MirrorError, Value};

use crate::{CompiledSite, ContractId, ContractTable, FlatPattern, PathInstruction};

/// Names bound by a successful match, in binding order.
pub type Bindings = Vec<(Name, Value)>;

/// Matches values against patterns compiled for one unit.
#[derive(Copy, Clone, Debug)]
pub struct Matcher<'u> {
    contracts: &'u ContractTable,
    /// Resolves string literals.
    interner: &'u StringInterner,
}

impl<'u> Matcher<'u> {
    pub fn new(contracts: &'u ContractTable, interner: &'u StringInterner) -> Self {
        Matcher {
            contracts,
            interner,
        }
    }

    /// Match `value` against `pattern`.
    ///
    /// `Ok(None)` means the value does not match; a record of a different
    /// type never matches a deconstruction. Errors come from a contract's
    /// `bind`, which runs once per deconstruction node reached.
    pub fn match_pattern(
        &self,
        pattern: &FlatPattern,
        value: &Value,
    ) -> Result<Option<Bindings>, MirrorError> {
        let mut bindings = Vec::new();
        if self.walk(pattern, value, &mut bindings)? {
            Ok(Some(bindings))
        } else {
            Ok(None)
        }
    }

    /// Select the first arm of `site` that matches `value`.
    pub fn match_site(
        &self,
        site: &CompiledSite,
        value: &Value,
    ) -> Result<Option<(usize, Bindings)>, MirrorError> {
        for (index, arm) in site.arms.iter().enumerate() {
            if let Some(bindings) = self.match_pattern(&arm.pattern, value)? {
                return Ok(Some((index, bindings)));
            }
        }
        Ok(None)
    }

    /// Follow a scrutinee path from `value`.
    pub fn project(&self, value: &Value, path: &[PathInstruction]) -> Result<Value, MirrorError> {
        let mut current = value.clone();
        for step in path {
            current = match *step {
                PathInstruction::TupleIndex(i) => match &current {
                    Value::Tuple(elems) => elems.get(i as usize).cloned().ok_or_else(|| {
                        MirrorError::ComponentAccess {
                            ty: "tuple".to_owned(),
                            detail: format!("no element {i}"),
                        }
                    })?,
                    other => {
                        return Err(MirrorError::ComponentAccess {
                            ty: "tuple".to_owned(),
                            detail: format!("projected a {}", other.kind_name()),
                        })
                    }
                },
                PathInstruction::Component { contract, index } => {
                    self.component(contract, &current, index as usize)?
                }
            };
        }
        Ok(current)
    }

    fn component(
        &self,
        contract: ContractId,
        value: &Value,
        index: usize,
    ) -> Result<Value, MirrorError> {
        if let Some(metadata) = self.contracts.metadata(contract) {
            return metadata.component(value, index);
        }
        let contract = self.contract(contract)?;
        let mut parts = contract.bind(value)?;
        if index < parts.len() {
            Ok(parts.swap_remove(index))
        } else {
            Err(MirrorError::ComponentAccess {
                ty: contract.path().to_owned(),
                detail: format!("index {index} out of range for arity {}", parts.len()),
            })
        }
    }

    fn contract(&self, id: ContractId) -> Result<&'u DestructuringContract, MirrorError> {
        self.contracts
            .get(id)
            .ok_or_else(|| MirrorError::MalformedMetadata {
                ty: format!("contract #{}", id.raw()),
                detail: "not in this unit's contract table".to_owned(),
            })
    }

    fn walk(
        &self,
        pattern: &FlatPattern,
        value: &Value,
        out: &mut Bindings,
    ) -> Result<bool, MirrorError> {
        ensure_sufficient_stack(|| match (pattern, value) {
            (FlatPattern::Wildcard, _) => Ok(true),
            (FlatPattern::Binding(name), _) => {
                out.push((*name, value.clone()));
                Ok(true)
            }
            (FlatPattern::LitInt(n), Value::Int(v)) => Ok(n == v),
            (FlatPattern::LitBool(b), Value::Bool(v)) => Ok(b == v),
            (FlatPattern::LitStr(s), Value::Str(v)) => Ok(self.interner.lookup(*s) == &**v),
            (FlatPattern::LitChar(c), Value::Char(v)) => Ok(c == v),
            (
                FlatPattern::LitInt(_)
                | FlatPattern::LitBool(_)
                | FlatPattern::LitStr(_)
                | FlatPattern::LitChar(_),
                _,
            ) => Ok(false),
            (FlatPattern::Tuple(pats), Value::Tuple(elems)) => {
                if pats.len() != elems.len() {
                    return Ok(false);
                }
                for (pat, elem) in pats.iter().zip(elems.iter()) {
                    if !self.walk(pat, elem, out)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (FlatPattern::Tuple(_), _) => Ok(false),
            (FlatPattern::Deconstruct { contract, fields }, _) => {
                let contract = self.contract(*contract)?;
                // A record of another type is a different shape, not an error.
                if let Value::Record(record) = value {
                    if record.ty != contract.ident() {
                        return Ok(false);
                    }
                }
                let parts = contract.bind(value)?;
                for (pat, part) in fields.iter().zip(&parts) {
                    if !self.walk(pat, part, out)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (FlatPattern::Or(alts), _) => {
                for alt in alts {
                    let mark = out.len();
                    if self.walk(alt, value, out)? {
                        return Ok(true);
                    }
                    out.truncate(mark);
                }
                Ok(false)
            }
            (FlatPattern::At { name, inner }, _) => {
                out.push((*name, value.clone()));
                self.walk(inner, value, out)
            }
        })
    }
}

#[cfg(test)]
mod tests;
