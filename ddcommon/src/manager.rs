use crate::common::{DdHashMap, Level, NodeId, VarId};
use crate::edge::EdgeRef;
use crate::error::{DdError, DdResult};
use crate::level_table::LevelTable;
use crate::node::DdNode;

/// Explicit configuration for a `NodeManager`, replacing the global static
/// debug flags of the original implementation (spec.md §9).
#[derive(Debug, Clone, Copy)]
pub struct ManagerConfig {
    /// Whether `deactivate` is allowed to trigger a sweep at all.
    pub gc_enabled: bool,
    /// Sweep once the garbage-node count reaches this many.
    pub gc_limit: usize,
    /// Enables the extra `debug_assert!` invariant checks sprinkled through
    /// the hot paths; always on in debug builds regardless of this flag,
    /// this only governs the handful of checks expensive enough that they
    /// should be opt-in even in debug builds.
    pub debug: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        ManagerConfig {
            gc_enabled: true,
            gc_limit: 10_000,
            debug: false,
        }
    }
}

/// Owns every `LevelTable`, the shared node arena, and the variable-id ↔
/// level bijection. BDD- and ZDD-specific reduction lives one layer up;
/// `NodeManager` performs only hash-consing, refcount-driven GC, and level
/// bookkeeping (spec.md §4.1).
pub struct NodeManager {
    config: ManagerConfig,
    arena: Vec<DdNode>,
    free_list: Vec<NodeId>,
    tables: Vec<LevelTable>,
    varid_to_level: Vec<Level>,
    level_to_varid: Vec<VarId>,
    garbage_num: usize,
    after_gc: Option<Box<dyn FnMut()>>,
}

impl NodeManager {
    pub fn new() -> Self {
        Self::with_config(ManagerConfig::default())
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        NodeManager {
            config,
            arena: Vec::new(),
            free_list: Vec::new(),
            tables: Vec::new(),
            varid_to_level: Vec::new(),
            level_to_varid: Vec::new(),
            garbage_num: 0,
            after_gc: None,
        }
    }

    pub fn config(&self) -> ManagerConfig {
        self.config
    }

    /// Registers the callback a layered manager (`BddManager`, `ZddManager`)
    /// uses to flush whatever bookkeeping it keeps beyond per-call memos
    /// once a GC sweep or level swap may have invalidated it (spec.md §4.1,
    /// §4.5; Design Notes' "variant callback" note in spec.md §9).
    pub fn set_after_gc_hook(&mut self, hook: Box<dyn FnMut()>) {
        self.after_gc = Some(hook);
    }

    fn run_after_gc(&mut self) {
        if let Some(hook) = self.after_gc.as_mut() {
            hook();
        }
    }

    #[inline]
    pub fn variable_num(&self) -> usize {
        self.tables.len()
    }

    pub fn new_variable(&mut self) -> VarId {
        let varid = self.tables.len();
        let level = varid;
        self.tables.push(LevelTable::new(level));
        self.varid_to_level.push(level);
        self.level_to_varid.push(varid);
        varid
    }

    pub fn varid_to_level(&self, varid: VarId) -> DdResult<Level> {
        self.varid_to_level
            .get(varid)
            .copied()
            .ok_or(DdError::OutOfRange {
                what: "varid",
                value: varid,
                bound: self.varid_to_level.len(),
            })
    }

    pub fn level_to_varid(&self, level: Level) -> DdResult<VarId> {
        self.level_to_varid
            .get(level)
            .copied()
            .ok_or(DdError::OutOfRange {
                what: "level",
                value: level,
                bound: self.level_to_varid.len(),
            })
    }

    /// Level value to use when ordering against a constant/invalid edge:
    /// constants sort after every real variable.
    pub const MAX_LEVEL: Level = usize::MAX;

    #[inline]
    pub fn level_of_edge(&self, edge: EdgeRef) -> Level {
        match edge.node() {
            Some(id) => self.arena[id].level,
            None => Self::MAX_LEVEL,
        }
    }

    #[inline]
    pub fn node(&self, edge: EdgeRef) -> Option<&DdNode> {
        edge.node().map(|id| &self.arena[id])
    }

    #[inline]
    pub fn child_edges(&self, edge: EdgeRef) -> Option<(EdgeRef, EdgeRef)> {
        self.node(edge).map(|n| (n.edge0, n.edge1))
    }

    /// Hash-conses a node at `level` with the given (already
    /// layer-reduced) children, returning a non-complemented `EdgeRef` to
    /// it. Reduction rules live one layer up; this only deduplicates.
    pub fn new_node(&mut self, level: Level, edge0: EdgeRef, edge1: EdgeRef) -> DdResult<EdgeRef> {
        if level >= self.tables.len() {
            return Err(DdError::OutOfRange {
                what: "level",
                value: level,
                bound: self.tables.len(),
            });
        }
        debug_assert!(edge0 != edge1);
        debug_assert!(self.level_of_edge(edge0) > level);
        debug_assert!(self.level_of_edge(edge1) > level);

        let free_list = &mut self.free_list;
        let (id, _created) = self.tables[level].new_node(&mut self.arena, edge0, edge1, |arena, node| {
            if let Some(free) = free_list.pop() {
                arena[free] = node;
                free
            } else {
                arena.push(node);
                arena.len() - 1
            }
        });
        Ok(EdgeRef::from_node(id, false))
    }

    #[inline]
    pub fn activate(&mut self, edge: EdgeRef) {
        self.inc_ref(edge);
    }

    #[inline]
    pub fn deactivate(&mut self, edge: EdgeRef) {
        self.dec_ref(edge);
        self.garbage_collection();
    }

    fn inc_ref(&mut self, edge: EdgeRef) {
        let Some(id) = edge.node() else { return };
        self.arena[id].ref_count += 1;
        if self.arena[id].ref_count == 1 {
            self.garbage_num = self.garbage_num.saturating_sub(1);
            let (e0, e1) = (self.arena[id].edge0, self.arena[id].edge1);
            self.inc_ref(e0);
            self.inc_ref(e1);
        }
    }

    fn dec_ref(&mut self, edge: EdgeRef) {
        let Some(id) = edge.node() else { return };
        debug_assert!(self.arena[id].ref_count > 0);
        self.arena[id].ref_count -= 1;
        if self.arena[id].ref_count == 0 {
            self.garbage_num += 1;
            let (e0, e1) = (self.arena[id].edge0, self.arena[id].edge1);
            self.dec_ref(e0);
            self.dec_ref(e1);
        }
    }

    pub fn garbage_collection(&mut self) {
        self.run_gc(false);
    }

    pub fn force_garbage_collection(&mut self) {
        self.run_gc(true);
    }

    fn run_gc(&mut self, force: bool) {
        if force || (self.config.gc_enabled && self.garbage_num >= self.config.gc_limit) {
            let arena = &mut self.arena;
            let free_list = &mut self.free_list;
            for table in self.tables.iter_mut() {
                table.garbage_collection(arena, |id| free_list.push(id));
            }
            self.garbage_num = 0;
        }
        self.run_after_gc();
    }

    pub fn node_num(&self) -> usize {
        self.tables.iter().map(|t| t.node_num()).sum()
    }

    /// Swaps the `LevelTable`s at adjacent levels `k` and `k+1` and
    /// re-stamps the `level` field of every node that was in either. This
    /// is the relabeling primitive only: it updates which variable sits at
    /// which level, it does not by itself repair nodes whose structural
    /// ordering invariant (`level_of(child) > level`) the swap breaks —
    /// that restructuring is the BDD/ZDD layer's responsibility, built on
    /// top of this call (spec.md §4.1, §9).
    pub fn swap_level(&mut self, k: Level) -> DdResult<()> {
        if k + 1 >= self.tables.len() {
            return Err(DdError::OutOfRange {
                what: "level",
                value: k,
                bound: self.tables.len().saturating_sub(1),
            });
        }
        let varid_k = self.level_to_varid[k];
        let varid_k1 = self.level_to_varid[k + 1];
        self.level_to_varid.swap(k, k + 1);
        self.varid_to_level[varid_k] = k + 1;
        self.varid_to_level[varid_k1] = k;

        let arena = &mut self.arena;
        let mut ids_k = Vec::new();
        self.tables[k].scan(arena, |id| ids_k.push(id));
        let mut ids_k1 = Vec::new();
        self.tables[k + 1].scan(arena, |id| ids_k1.push(id));

        for id in &ids_k {
            arena[*id].level = k + 1;
        }
        for id in &ids_k1 {
            arena[*id].level = k;
        }

        self.tables.swap(k, k + 1);
        self.tables[k].set_level(k);
        self.tables[k + 1].set_level(k + 1);
        self.tables[k].clear_buckets();
        self.tables[k + 1].clear_buckets();
        for id in ids_k1.into_iter().chain(ids_k.into_iter()) {
            let level = arena[id].level;
            self.tables[level].reinsert(arena, id);
        }

        self.run_after_gc();
        Ok(())
    }

    pub fn scan_level(&self, level: Level, f: impl FnMut(NodeId)) {
        self.tables[level].scan(&self.arena, f);
    }
}

impl Default for NodeManager {
    fn default() -> Self {
        Self::new()
    }
}

pub type ApplyCache2<K> = DdHashMap<K, EdgeRef>;
