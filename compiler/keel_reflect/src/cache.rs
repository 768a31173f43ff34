//! Descriptor cache with at most one computation per type identity.
//!
//! Each identity maps to a compute-once cell. The first caller runs the
//! computation inside the cell; concurrent callers for the same identity
//! block on the cell and then read its terminal result. Different
//! identities never wait on each other beyond a map shard lock.
//!
//! Entries are never evicted and never retried: a failed shape discovery
//! stays failed.
//!
//! If a computation panics, the cell stays uninitialized (`Pending`) and
//! the panic propagates to that caller; the next caller computes again.
//!
//! Type identities are interned names and only mean something inside one
//! interner. A cache serves the first session that binds it; requests from
//! any other interner are refused.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use keel_ir::{SharedInterner, TypeIdent};
use keel_types::{MirrorError, TypeMetadata};

type Outcome = Result<Arc<TypeMetadata>, MirrorError>;
type Cell = Arc<OnceLock<Outcome>>;

/// Process-wide cache shared by every mirror synthesizer that asks for it.
static GLOBAL_CACHE: OnceLock<DescriptorCache> = OnceLock::new();

/// Lifecycle of a cache entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntryState {
    /// Created; the computation has not finished.
    Pending,
    Ready,
    Failed,
}

/// Counters for observing cache behavior.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered from an existing terminal entry.
    pub hits: u64,
    /// Computations started.
    pub computations: u64,
}

/// Concurrent map from type identity to descriptor outcome.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: DashMap<TypeIdent, Cell>,
    /// Interner the keys were produced by.
    session: OnceLock<SharedInterner>,
    hits: AtomicU64,
    computations: AtomicU64,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache. Starts empty, lives for the whole process,
    /// and serves the first session that binds it.
    pub fn global() -> &'static DescriptorCache {
        GLOBAL_CACHE.get_or_init(DescriptorCache::new)
    }

    /// Bind the cache to `interner` on first use, then check that `ident`
    /// comes from that same interner.
    pub fn bind_session(
        &self,
        interner: &SharedInterner,
        ident: TypeIdent,
    ) -> Result<(), MirrorError> {
        let bound = self.session.get_or_init(|| interner.clone());
        if bound.same_as(interner) {
            Ok(())
        } else {
            tracing::debug!(ty = ident.path(interner), "descriptor cache bound to another session");
            Err(MirrorError::SessionMismatch {
                ty: ident.path(interner).to_owned(),
            })
        }
    }

    /// Return the descriptor for `ident`, running `compute` only if no
    /// caller has run it before.
    ///
    /// Every caller for the same identity observes the same terminal
    /// outcome: the identical `Arc` on success, an equal error on failure.
    pub fn get_or_compute<F>(&self, ident: TypeIdent, compute: F) -> Outcome
    where
        F: FnOnce() -> Result<TypeMetadata, MirrorError>,
    {
        // Clone the cell out so the shard lock is released before computing.
        let cell: Cell = Arc::clone(self.entries.entry(ident).or_default().value());

        let mut computed = false;
        let outcome = cell.get_or_init(|| {
            computed = true;
            self.computations.fetch_add(1, Ordering::Relaxed);
            let outcome = compute().map(Arc::new);
            match &outcome {
                Ok(metadata) => {
                    tracing::debug!(ty = metadata.path(), "descriptor cached");
                }
                Err(error) => {
                    tracing::debug!(%error, "descriptor discovery failed; recorded");
                }
            }
            outcome
        });

        if !computed {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(?ident, "descriptor cache hit");
        }
        outcome.clone()
    }

    /// State of the entry for `ident`, if one was ever created.
    pub fn state(&self, ident: TypeIdent) -> Option<EntryState> {
        let entry = self.entries.get(&ident)?;
        Some(match entry.value().get() {
            None => EntryState::Pending,
            Some(Ok(_)) => EntryState::Ready,
            Some(Err(_)) => EntryState::Failed,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            computations: self.computations.load(Ordering::Relaxed),
        }
    }
}
