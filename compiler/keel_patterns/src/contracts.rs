//! Per-unit table of destructuring contracts.
//!
//! Compiled deconstruction sites refer to contracts by [`ContractId`]. The
//! table is internal to the compiled unit: it is never part of the unit's
//! exported symbols.

use std::sync::Arc;

use keel_ir::{Ty, TypeIdent};
use keel_types::{ContractOrigin, DestructuringContract, TypeMetadata};
use rustc_hash::FxHashMap;

/// Index of a contract in its unit's [`ContractTable`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContractId(u32);

impl ContractId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        ContractId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

struct Entry {
    contract: DestructuringContract,
    /// Present for synthesized contracts.
    metadata: Option<Arc<TypeMetadata>>,
}

/// At most one contract per type.
#[derive(Default)]
pub struct ContractTable {
    entries: Vec<Entry>,
    by_type: FxHashMap<TypeIdent, ContractId>,
}

impl ContractTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the contract for its type. A type already present keeps its
    /// existing contract.
    pub fn insert(
        &mut self,
        contract: DestructuringContract,
        metadata: Option<Arc<TypeMetadata>>,
    ) -> ContractId {
        let ident = contract.ident();
        if let Some(&id) = self.by_type.get(&ident) {
            return id;
        }
        let raw = u32::try_from(self.entries.len())
            .unwrap_or_else(|_| panic!("more than {} contracts in one unit", u32::MAX));
        let id = ContractId(raw);
        self.entries.push(Entry { contract, metadata });
        self.by_type.insert(ident, id);
        id
    }

    pub fn lookup(&self, ident: TypeIdent) -> Option<ContractId> {
        self.by_type.get(&ident).copied()
    }

    pub fn get(&self, id: ContractId) -> Option<&DestructuringContract> {
        self.entries.get(id.0 as usize).map(|e| &e.contract)
    }

    /// Descriptor a synthesized contract was built from.
    pub fn metadata(&self, id: ContractId) -> Option<&Arc<TypeMetadata>> {
        self.entries.get(id.0 as usize)?.metadata.as_ref()
    }

    /// Component types, from the descriptor when there is one.
    pub fn component_types(&self, id: ContractId) -> Option<&[Ty]> {
        let entry = self.entries.get(id.0 as usize)?;
        Some(match &entry.metadata {
            Some(metadata) => metadata.types(),
            None => entry.contract.component_types(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of contracts synthesized for this unit.
    pub fn synthesized_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.contract.origin() == ContractOrigin::Synthesized)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContractId, &DestructuringContract)> {
        (0u32..).zip(&self.entries).map(|(i, e)| (ContractId(i), &e.contract))
    }
}

impl std::fmt::Debug for ContractTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| &e.contract))
            .finish()
    }
}
