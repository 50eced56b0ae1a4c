/// Zero-suppressed decision diagram manager.
///
/// Description:
///
/// Shares `ddcommon::manager::NodeManager`'s unique table and refcounted GC
/// with `BddManager`, but layers a different reduction rule: a node whose
/// 1-edge points at `Zero` contributes nothing (no element ever contains
/// that item) and is dropped in favour of its 0-edge. There is no
/// complement bit here — zero-suppression and complemented edges don't mix
/// (spec.md §4.1, §4.4).
use ddcommon::prelude::*;

pub struct ZddManager {
    pub(crate) mgr: NodeManager,
    zero: EdgeRef,
    one: EdgeRef,
}

impl ZddManager {
    pub fn new() -> Self {
        ZddManager {
            mgr: NodeManager::new(),
            zero: EdgeRef::zero(),
            one: EdgeRef::one(),
        }
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        ZddManager {
            mgr: NodeManager::with_config(config),
            zero: EdgeRef::zero(),
            one: EdgeRef::one(),
        }
    }

    #[inline]
    pub fn zero(&self) -> EdgeRef {
        self.zero
    }

    #[inline]
    pub fn one(&self) -> EdgeRef {
        self.one
    }

    #[inline]
    pub fn variable_num(&self) -> usize {
        self.mgr.variable_num()
    }

    #[inline]
    pub fn node_num(&self) -> usize {
        self.mgr.node_num()
    }

    pub fn new_variable(&mut self) -> VarId {
        self.mgr.new_variable()
    }

    pub fn activate(&mut self, edge: EdgeRef) {
        self.mgr.activate(edge);
    }

    pub fn deactivate(&mut self, edge: EdgeRef) {
        self.mgr.deactivate(edge);
    }

    pub fn garbage_collection(&mut self) {
        self.mgr.garbage_collection();
    }

    #[inline]
    pub fn level_of(&self, edge: EdgeRef) -> Level {
        self.mgr.level_of_edge(edge)
    }

    /// The ZDD top level of a pair of operands, treating constants as
    /// `+infinity` (spec.md §4.4's decomposition rule).
    #[inline]
    pub fn top_level(&self, a: EdgeRef, b: EdgeRef) -> Level {
        self.level_of(a).min(self.level_of(b))
    }

    /// The pair of cofactors of `edge` at `level`. When `edge`'s node is
    /// not at `level`, the ZDD convention is `(edge, Zero)`: the item isn't
    /// in any set of the family, so the "edge1" branch drops out (spec.md
    /// §4.4).
    pub fn cofactors_at(&self, edge: EdgeRef, level: Level) -> (EdgeRef, EdgeRef) {
        match self.mgr.node(edge) {
            Some(node) if node.level == level => (node.edge0, node.edge1),
            _ => (edge, self.zero),
        }
    }

    /// Hash-conses a ZDD node, dropping it in favour of `e0` when `e1` is
    /// `Zero` (spec.md §4.4).
    pub fn make_node(&mut self, level: Level, e0: EdgeRef, e1: EdgeRef) -> DdResult<EdgeRef> {
        if e1 == self.zero {
            return Ok(e0);
        }
        self.mgr.new_node(level, e0, e1)
    }

    /// `{{item}}`.
    pub fn singleton(&mut self, item: VarId) -> DdResult<EdgeRef> {
        let level = self.mgr.varid_to_level(item)?;
        self.make_node(level, self.zero, self.one)
    }

    /// `{items}`, a single set containing every listed item.
    pub fn make_set(&mut self, items: &[VarId]) -> DdResult<EdgeRef> {
        let mut levels: Vec<Level> = items
            .iter()
            .map(|&v| self.mgr.varid_to_level(v))
            .collect::<DdResult<_>>()?;
        levels.sort_unstable();
        levels.dedup();
        let mut edge = self.one;
        for &level in levels.iter().rev() {
            edge = self.make_node(level, self.zero, edge)?;
        }
        Ok(edge)
    }

    pub fn cup(&mut self, a: EdgeRef, b: EdgeRef) -> DdResult<EdgeRef> {
        let mut memo = DdHashMap::default();
        self.cup_rec(a, b, &mut memo)
    }

    fn cup_rec(&mut self, a: EdgeRef, b: EdgeRef, memo: &mut ApplyCache2<(EdgeRef, EdgeRef)>) -> DdResult<EdgeRef> {
        if a == self.zero {
            return Ok(b);
        }
        if b == self.zero || a == b {
            return Ok(a);
        }
        let key = if a.body() <= b.body() { (a, b) } else { (b, a) };
        if let Some(&cached) = memo.get(&key) {
            return Ok(cached);
        }
        let level = self.top_level(a, b);
        let (a0, a1) = self.cofactors_at(a, level);
        let (b0, b1) = self.cofactors_at(b, level);
        let low = self.cup_rec(a0, b0, memo)?;
        let high = self.cup_rec(a1, b1, memo)?;
        let result = self.make_node(level, low, high)?;
        memo.insert(key, result);
        Ok(result)
    }

    pub fn cap(&mut self, a: EdgeRef, b: EdgeRef) -> DdResult<EdgeRef> {
        let mut memo = DdHashMap::default();
        self.cap_rec(a, b, &mut memo)
    }

    fn cap_rec(&mut self, a: EdgeRef, b: EdgeRef, memo: &mut ApplyCache2<(EdgeRef, EdgeRef)>) -> DdResult<EdgeRef> {
        if a == self.zero || b == self.zero {
            return Ok(self.zero);
        }
        if a == b {
            return Ok(a);
        }
        let key = if a.body() <= b.body() { (a, b) } else { (b, a) };
        if let Some(&cached) = memo.get(&key) {
            return Ok(cached);
        }
        let level = self.top_level(a, b);
        let (a0, a1) = self.cofactors_at(a, level);
        let (b0, b1) = self.cofactors_at(b, level);
        let low = self.cap_rec(a0, b0, memo)?;
        let high = self.cap_rec(a1, b1, memo)?;
        let result = self.make_node(level, low, high)?;
        memo.insert(key, result);
        Ok(result)
    }

    pub fn diff(&mut self, a: EdgeRef, b: EdgeRef) -> DdResult<EdgeRef> {
        let mut memo = DdHashMap::default();
        self.diff_rec(a, b, &mut memo)
    }

    fn diff_rec(&mut self, a: EdgeRef, b: EdgeRef, memo: &mut ApplyCache2<(EdgeRef, EdgeRef)>) -> DdResult<EdgeRef> {
        if a == self.zero || a == b {
            return Ok(self.zero);
        }
        if b == self.zero {
            return Ok(a);
        }
        let key = (a, b);
        if let Some(&cached) = memo.get(&key) {
            return Ok(cached);
        }
        let level = self.top_level(a, b);
        let (a0, a1) = self.cofactors_at(a, level);
        let (b0, b1) = self.cofactors_at(b, level);
        let low = self.diff_rec(a0, b0, memo)?;
        let high = self.diff_rec(a1, b1, memo)?;
        let result = self.make_node(level, low, high)?;
        memo.insert(key, result);
        Ok(result)
    }

    /// Pairwise-union product `{s ∪ t | s ∈ a, t ∈ b}`.
    pub fn product(&mut self, a: EdgeRef, b: EdgeRef) -> DdResult<EdgeRef> {
        let mut memo = DdHashMap::default();
        let mut cup_memo = DdHashMap::default();
        self.product_rec(a, b, &mut memo, &mut cup_memo)
    }

    fn product_rec(
        &mut self,
        a: EdgeRef,
        b: EdgeRef,
        memo: &mut ApplyCache2<(EdgeRef, EdgeRef)>,
        cup_memo: &mut ApplyCache2<(EdgeRef, EdgeRef)>,
    ) -> DdResult<EdgeRef> {
        if a == self.zero || b == self.zero {
            return Ok(self.zero);
        }
        if a == self.one {
            return Ok(b);
        }
        if b == self.one {
            return Ok(a);
        }
        let key = if a.body() <= b.body() { (a, b) } else { (b, a) };
        if let Some(&cached) = memo.get(&key) {
            return Ok(cached);
        }
        let level = self.top_level(a, b);
        let (a0, a1) = self.cofactors_at(a, level);
        let (b0, b1) = self.cofactors_at(b, level);
        let low = self.product_rec(a0, b0, memo, cup_memo)?;
        let hi_a = self.product_rec(a1, b0, memo, cup_memo)?;
        let hi_b = self.product_rec(a0, b1, memo, cup_memo)?;
        let hi_ab = self.product_rec(a1, b1, memo, cup_memo)?;
        let h1 = self.cup_rec(hi_a, hi_b, cup_memo)?;
        let h2 = self.cup_rec(h1, hi_ab, cup_memo)?;
        let result = self.make_node(level, low, h2)?;
        memo.insert(key, result);
        Ok(result)
    }

    /// The subfamily of `f` containing `item`, with `item` removed from
    /// each set — the cofactor at `item`'s level taken along the 1-edge.
    pub fn onset(&mut self, f: EdgeRef, item: VarId) -> DdResult<EdgeRef> {
        let level = self.mgr.varid_to_level(item)?;
        let (_low, high) = self.cofactors_at(f, level);
        Ok(high)
    }

    /// The subfamily of `f` not containing `item`.
    pub fn offset(&mut self, f: EdgeRef, item: VarId) -> DdResult<EdgeRef> {
        let level = self.mgr.varid_to_level(item)?;
        let (low, _high) = self.cofactors_at(f, level);
        Ok(low)
    }

    /// Complement with respect to the current universe: every terminal `0`
    /// becomes `1` and vice versa, with structure preserved.
    pub fn invert(&mut self, f: EdgeRef) -> DdResult<EdgeRef> {
        let mut memo = DdHashMap::default();
        self.invert_rec(f, &mut memo)
    }

    fn invert_rec(&mut self, f: EdgeRef, memo: &mut DdHashMap<EdgeRef, EdgeRef>) -> DdResult<EdgeRef> {
        if f == self.zero {
            return Ok(self.one);
        }
        if f == self.one {
            return Ok(self.zero);
        }
        if let Some(&cached) = memo.get(&f) {
            return Ok(cached);
        }
        let node = self.mgr.node(f).unwrap();
        let (level, e0, e1) = (node.level, node.edge0, node.edge1);
        let low = self.invert_rec(e0, memo)?;
        let high = self.invert_rec(e1, memo)?;
        // the zero-suppression rule forbids a node whose 1-edge is Zero, so
        // a plain make_node on the inverted high edge is never collapsed
        // away incorrectly: high only equals Zero if invert_rec(e1) did,
        // which only happens when e1 was already One and stays that way.
        let result = self.make_node(level, low, high)?;
        memo.insert(f, result);
        Ok(result)
    }

    /// Number of sets in the family.
    pub fn count(&self, f: EdgeRef) -> u64 {
        let mut memo = DdHashMap::default();
        self.count_rec(f, &mut memo)
    }

    fn count_rec(&self, f: EdgeRef, memo: &mut DdHashMap<NodeId, u64>) -> u64 {
        if f == self.zero {
            return 0;
        }
        if f == self.one {
            return 1;
        }
        let id = f.node().unwrap();
        if let Some(&cached) = memo.get(&id) {
            return cached;
        }
        let node = self.mgr.node(f).unwrap();
        let result = self.count_rec(node.edge0, memo) + self.count_rec(node.edge1, memo);
        memo.insert(id, result);
        result
    }

    /// Every item appearing in some set of the family.
    pub fn support(&self, f: EdgeRef) -> Vec<VarId> {
        let mut levels = DdHashSet::default();
        self.collect_levels(f, &mut DdHashSet::default(), &mut levels);
        let mut vars: Vec<VarId> = levels
            .into_iter()
            .map(|level| self.mgr.level_to_varid(level).unwrap())
            .collect();
        vars.sort_unstable();
        vars
    }

    /// `support(f)` rendered as a sorted `Vec`, kept as a distinct entry
    /// point because the original draws a line between the raw level set
    /// and its user-visible variable-id ordering (spec.md §4.4).
    pub fn support_list(&self, f: EdgeRef) -> Vec<VarId> {
        self.support(f)
    }

    fn collect_levels(&self, f: EdgeRef, visited: &mut DdHashSet<NodeId>, out: &mut DdHashSet<Level>) {
        let Some(id) = f.node() else { return };
        if !visited.insert(id) {
            return;
        }
        let node = self.mgr.node(f).unwrap();
        out.insert(node.level);
        self.collect_levels(node.edge0, visited, out);
        self.collect_levels(node.edge1, visited, out);
    }

    /// True when `f` equals `{{item}}` for some item.
    pub fn is_singleton(&self, f: EdgeRef) -> bool {
        match self.mgr.node(f) {
            Some(node) => node.edge0 == self.zero && node.edge1 == self.one,
            None => false,
        }
    }
}

impl Default for ZddManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_set_is_recoverable_as_onset_offset() {
        let mut dd = ZddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let f = dd.make_set(&[v0, v1]).unwrap();
        assert_eq!(dd.count(f), 1);
        let on = dd.onset(f, v0).unwrap();
        assert_eq!(on, dd.make_set(&[v1]).unwrap());
        let off = dd.offset(f, v0).unwrap();
        assert_eq!(off, dd.zero());
    }

    #[test]
    fn cup_of_two_sets_has_count_two() {
        let mut dd = ZddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let v2 = dd.new_variable();
        let a = dd.make_set(&[v0, v2]).unwrap();
        let b = dd.make_set(&[v0, v1]).unwrap();
        let u = dd.cup(a, b).unwrap();
        assert_eq!(dd.count(u), 2);
        assert_eq!(dd.support(u), vec![v0, v1, v2]);
    }

    #[test]
    fn cap_and_diff_are_set_consistent() {
        let mut dd = ZddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let a = dd.make_set(&[v0]).unwrap();
        let b = dd.make_set(&[v0, v1]).unwrap();
        let both = dd.cup(a, b).unwrap();
        let inter = dd.cap(both, a).unwrap();
        assert_eq!(inter, a);
        let only_b = dd.diff(both, a).unwrap();
        assert_eq!(only_b, b);
    }

    #[test]
    fn product_is_pairwise_union() {
        let mut dd = ZddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let a = dd.make_set(&[v0]).unwrap();
        let b = dd.make_set(&[v1]).unwrap();
        let p = dd.product(a, b).unwrap();
        assert_eq!(p, dd.make_set(&[v0, v1]).unwrap());
    }

    #[test]
    fn is_singleton_detects_one_element_families() {
        let mut dd = ZddManager::new();
        let v0 = dd.new_variable();
        let f = dd.singleton(v0).unwrap();
        assert!(dd.is_singleton(f));
        assert!(!dd.is_singleton(dd.one()));
    }
}
