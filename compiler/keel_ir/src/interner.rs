//! Sharded string interner.
//!
//! Component labels, type paths and binding names are interned once per
//! session. The interner is shared between the compile-time passes and the
//! runtime reflection bridge, which may call it from many threads at once,
//! so each shard sits behind its own `RwLock`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

/// One shard of the interner.
struct Shard {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl Shard {
    fn new() -> Self {
        Shard {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        shard.map.insert("", 0);
        shard.strings.push("");
        shard
    }
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// A shard ran out of local indices.
    ShardOverflow { shard: usize, count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::ShardOverflow { shard, count } => write!(
                f,
                "interner shard {shard} is full ({count} strings, max {})",
                Name::MAX_LOCAL
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// Sharded string interner for concurrent access.
pub struct StringInterner {
    shards: [RwLock<Shard>; Name::NUM_SHARDS],
    total: AtomicUsize,
}

impl StringInterner {
    /// Create an interner holding only the empty string.
    pub fn new() -> Self {
        StringInterner {
            shards: std::array::from_fn(|i| {
                if i == 0 {
                    RwLock::new(Shard::with_empty())
                } else {
                    RwLock::new(Shard::new())
                }
            }),
            total: AtomicUsize::new(1),
        }
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        // The empty string lives in shard 0 at local 0 (`Name::EMPTY`).
        if s.is_empty() {
            return 0;
        }
        let mut hash = 0u32;
        for byte in s.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Name::NUM_SHARDS
    }

    /// Intern a string, returning its `Name` or an error if the shard is full.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        let shard_idx = Self::shard_for(s);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard index is bounded by NUM_SHARDS"
        )]
        let shard_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        if let Some(&local) = shard.read().map.get(s) {
            return Ok(Name::new(shard_u32, local));
        }

        let mut guard = shard.write();
        // Another thread may have inserted between the two locks.
        if let Some(&local) = guard.map.get(s) {
            return Ok(Name::new(shard_u32, local));
        }

        let count = guard.strings.len();
        let local = u32::try_from(count)
            .ok()
            .filter(|&l| l <= Name::MAX_LOCAL)
            .ok_or(InternError::ShardOverflow {
                shard: shard_idx,
                count,
            })?;
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);
        self.total.fetch_add(1, Ordering::Relaxed);

        Ok(Name::new(shard_u32, local))
    }

    /// Intern a string.
    ///
    /// # Panics
    /// Panics if a shard overflows (over 268 million strings in one shard).
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up a previously interned string without interning it.
    pub fn get(&self, s: &str) -> Option<Name> {
        let shard_idx = Self::shard_for(s);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard index is bounded by NUM_SHARDS"
        )]
        let shard_u32 = shard_idx as u32;
        let local = *self.shards[shard_idx].read().map.get(s)?;
        Some(Name::new(shard_u32, local))
    }

    /// Resolve a `Name` back to its string.
    ///
    /// Names from a different interner resolve to the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.shards[name.shard()]
            .read()
            .strings
            .get(name.local())
            .copied()
            .unwrap_or("")
    }

    /// Number of distinct interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Always false: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Cheaply clonable handle to a session-wide interner.
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when both handles point at the same interner.
    pub fn same_as(&self, other: &SharedInterner) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &StringInterner {
        &self.0
    }
}

impl std::fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StringInterner({} strings)", self.len())
    }
}

impl std::fmt::Debug for SharedInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedInterner({} strings)", self.len())
    }
}
