use std::hash::BuildHasherDefault;
use wyhash::WyHash;

/// Identifier of a variable, stable for the lifetime of a manager.
///
/// `VarId` never changes once `NodeManager::new_variable` hands it out;
/// only the variable's `Level` moves when levels are swapped.
pub type VarId = usize;

/// Position of a variable in the current order, `0` nearest the root.
pub type Level = usize;

/// Index of a node inside a manager's node arena.
pub type NodeId = usize;

/// Identifier of a per-operation apply/ite cache entry (unused outside
/// the cache key types themselves, kept for parity with the original
/// `OperationId` alias).
pub type OperationId = usize;

pub type DdHashMap<T, U> = std::collections::HashMap<T, U, BuildHasherDefault<WyHash>>;
pub type DdHashSet<T> = std::collections::HashSet<T, BuildHasherDefault<WyHash>>;
