/// Reduced, ordered BDD manager with complemented edges.
///
/// Description:
///
/// A BDD node is `{level, edge0, edge1}`; unlike the uncomplemented variant,
/// the low edge is never itself complemented — a negated function is
/// represented by flipping the complement bit of the edge that *points to*
/// a node, never by duplicating the node (spec.md §4.3). That convention is
/// what makes `not` an O(1) operation here.
///
/// The unique table and the recursive refcounted GC both live one layer
/// down, in `ddcommon::manager::NodeManager`; `BddManager` only supplies the
/// BDD-specific reduction rule (`make_node`) and the Shannon-expansion
/// operations built on top of it.
use ddcommon::prelude::*;

use crate::ops::{Apply2Key, Apply3Key};

pub struct BddManager {
    pub(crate) mgr: NodeManager,
    zero: EdgeRef,
    one: EdgeRef,
}

impl BddManager {
    pub fn new() -> Self {
        BddManager {
            mgr: NodeManager::new(),
            zero: EdgeRef::zero(),
            one: EdgeRef::one(),
        }
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        BddManager {
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

    /// Builds the BDD for the positive (or, if `inv`, negative) literal of
    /// a variable.
    pub fn ithvar(&mut self, varid: VarId, inv: bool) -> DdResult<EdgeRef> {
        let level = self.mgr.varid_to_level(varid)?;
        let edge = self.make_node(level, self.zero, self.one)?;
        Ok(edge ^ inv)
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

    #[inline]
    pub fn top_level(&self, a: EdgeRef, b: EdgeRef) -> Level {
        self.level_of(a).min(self.level_of(b))
    }

    /// The pair of cofactors of `edge` at `level`: `(edge0, edge1)` if
    /// `edge`'s node sits exactly at `level`, else `(edge, edge)` since the
    /// function doesn't depend on that variable.
    pub fn cofactors_at(&self, edge: EdgeRef, level: Level) -> (EdgeRef, EdgeRef) {
        match self.mgr.node(edge) {
            Some(node) if node.level == level => {
                let inv = edge.is_complemented();
                (node.edge0 ^ inv, node.edge1 ^ inv)
            }
            _ => (edge, edge),
        }
    }

    /// Hash-conses a BDD node, applying both reduction rules: eliminate a
    /// node whose children coincide, and normalize so the low edge is never
    /// complemented (pushing the complement onto the edge pointing here
    /// instead).
    pub fn make_node(&mut self, level: Level, e0: EdgeRef, e1: EdgeRef) -> DdResult<EdgeRef> {
        if e0 == e1 {
            return Ok(e0);
        }
        if e0.is_complemented() {
            let node = self.mgr.new_node(level, !e0, !e1)?;
            Ok(!node)
        } else {
            self.mgr.new_node(level, e0, e1)
        }
    }

    #[inline]
    pub fn not(&self, f: EdgeRef) -> EdgeRef {
        !f
    }

    pub fn and(&mut self, f: EdgeRef, g: EdgeRef) -> DdResult<EdgeRef> {
        let mut memo = DdHashMap::default();
        self.and_rec(f, g, &mut memo)
    }

    fn and_rec(&mut self, f: EdgeRef, g: EdgeRef, memo: &mut ApplyCache2<Apply2Key>) -> DdResult<EdgeRef> {
        if f == self.zero || g == self.zero {
            return Ok(self.zero);
        }
        if f == self.one {
            return Ok(g);
        }
        if g == self.one || f == g {
            return Ok(f);
        }
        if f == !g {
            return Ok(self.zero);
        }
        let key = Apply2Key::canonical(f, g);
        if let Some(&cached) = memo.get(&key) {
            return Ok(cached);
        }
        let level = self.top_level(f, g);
        let (f0, f1) = self.cofactors_at(f, level);
        let (g0, g1) = self.cofactors_at(g, level);
        let low = self.and_rec(f0, g0, memo)?;
        let high = self.and_rec(f1, g1, memo)?;
        let result = self.make_node(level, low, high)?;
        memo.insert(key, result);
        Ok(result)
    }

    pub fn or(&mut self, f: EdgeRef, g: EdgeRef) -> DdResult<EdgeRef> {
        let r = self.and(!f, !g)?;
        Ok(!r)
    }

    pub fn xor(&mut self, f: EdgeRef, g: EdgeRef) -> DdResult<EdgeRef> {
        let mut memo = DdHashMap::default();
        self.xor_rec(f, g, &mut memo)
    }

    fn xor_rec(&mut self, f: EdgeRef, g: EdgeRef, memo: &mut ApplyCache2<Apply2Key>) -> DdResult<EdgeRef> {
        if f == g {
            return Ok(self.zero);
        }
        if f == !g {
            return Ok(self.one);
        }
        if f == self.zero {
            return Ok(g);
        }
        if g == self.zero {
            return Ok(f);
        }
        if f == self.one {
            return Ok(!g);
        }
        if g == self.one {
            return Ok(!f);
        }
        let key = Apply2Key::canonical(f, g);
        if let Some(&cached) = memo.get(&key) {
            return Ok(cached);
        }
        let level = self.top_level(f, g);
        let (f0, f1) = self.cofactors_at(f, level);
        let (g0, g1) = self.cofactors_at(g, level);
        let low = self.xor_rec(f0, g0, memo)?;
        let high = self.xor_rec(f1, g1, memo)?;
        let result = self.make_node(level, low, high)?;
        memo.insert(key, result);
        Ok(result)
    }

    pub fn nand(&mut self, f: EdgeRef, g: EdgeRef) -> DdResult<EdgeRef> {
        let r = self.and(f, g)?;
        Ok(!r)
    }

    pub fn nor(&mut self, f: EdgeRef, g: EdgeRef) -> DdResult<EdgeRef> {
        let r = self.or(f, g)?;
        Ok(!r)
    }

    pub fn xnor(&mut self, f: EdgeRef, g: EdgeRef) -> DdResult<EdgeRef> {
        let r = self.xor(f, g)?;
        Ok(!r)
    }

    pub fn imp(&mut self, f: EdgeRef, g: EdgeRef) -> DdResult<EdgeRef> {
        self.or(!f, g)
    }

    /// `if f then g else h`: a single ternary recursive Apply with its own
    /// memo, canonicalising operands Brace/Madre-style to maximise cache
    /// hits (spec.md §4.3, §4.5), rather than composing from `and`/`or`.
    pub fn ite(&mut self, f: EdgeRef, g: EdgeRef, h: EdgeRef) -> DdResult<EdgeRef> {
        let mut memo = DdHashMap::default();
        self.ite_rec(f, g, h, &mut memo)
    }

    fn ite_rec(
        &mut self,
        f: EdgeRef,
        g: EdgeRef,
        h: EdgeRef,
        memo: &mut ApplyCache2<Apply3Key>,
    ) -> DdResult<EdgeRef> {
        if f == self.one || g == h {
            return Ok(g);
        }
        if f == self.zero {
            return Ok(h);
        }
        if g == self.one && h == self.zero {
            return Ok(f);
        }
        if g == self.zero && h == self.one {
            return Ok(!f);
        }
        let (key, out_inv) = Apply3Key::canonical(f, g, h);
        if let Some(&cached) = memo.get(&key) {
            return Ok(cached ^ out_inv);
        }
        let Apply3Key(cf, cg, ch) = key;
        let level = self.level_of(cf).min(self.level_of(cg)).min(self.level_of(ch));
        let (f0, f1) = self.cofactors_at(cf, level);
        let (g0, g1) = self.cofactors_at(cg, level);
        let (h0, h1) = self.cofactors_at(ch, level);
        let low = self.ite_rec(f0, g0, h0, memo)?;
        let high = self.ite_rec(f1, g1, h1, memo)?;
        let result = self.make_node(level, low, high)?;
        memo.insert(key, result);
        Ok(result ^ out_inv)
    }

    /// Restricts `f` by fixing `varid` to `value` (spec.md §4.3's
    /// `cofactor`), rebuilding every node above that variable's level.
    pub fn cofactor(&mut self, f: EdgeRef, varid: VarId, value: bool) -> DdResult<EdgeRef> {
        let level = self.mgr.varid_to_level(varid)?;
        let mut memo = DdHashMap::default();
        self.cofactor_rec(f, level, value, &mut memo)
    }

    fn cofactor_rec(
        &mut self,
        f: EdgeRef,
        level: Level,
        value: bool,
        memo: &mut DdHashMap<EdgeRef, EdgeRef>,
    ) -> DdResult<EdgeRef> {
        if f.is_const() {
            return Ok(f);
        }
        let node = self.mgr.node(f).unwrap();
        let node_level = node.level;
        let inv = f.is_complemented();
        if node_level > level {
            return Ok(f);
        }
        if node_level == level {
            return Ok(if value { node.edge1 ^ inv } else { node.edge0 ^ inv });
        }
        if let Some(&cached) = memo.get(&f) {
            return Ok(cached);
        }
        let (c0, c1) = (node.edge0 ^ inv, node.edge1 ^ inv);
        let low = self.cofactor_rec(c0, level, value, memo)?;
        let high = self.cofactor_rec(c1, level, value, memo)?;
        let result = self.make_node(node_level, low, high)?;
        memo.insert(f, result);
        Ok(result)
    }
}

impl Default for BddManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_is_involution() {
        let mut dd = BddManager::new();
        let v = dd.new_variable();
        let x = dd.ithvar(v, false).unwrap();
        assert_eq!(dd.not(dd.not(x)), x);
    }

    #[test]
    fn and_or_truth_table() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let x = dd.ithvar(v0, false).unwrap();
        let y = dd.ithvar(v1, false).unwrap();
        let and_xy = dd.and(x, y).unwrap();
        let or_xy = dd.or(x, y).unwrap();
        assert_eq!(dd.and(x, dd.one()).unwrap(), x);
        assert_eq!(dd.or(x, dd.zero()).unwrap(), x);
        assert_eq!(dd.and(and_xy, x).unwrap(), and_xy);
        assert_eq!(dd.or(or_xy, x).unwrap(), or_xy);
    }

    #[test]
    fn xor_self_is_zero() {
        let mut dd = BddManager::new();
        let v = dd.new_variable();
        let x = dd.ithvar(v, false).unwrap();
        assert_eq!(dd.xor(x, x).unwrap(), dd.zero());
    }

    #[test]
    fn ite_matches_and_or_definition() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let v2 = dd.new_variable();
        let f = dd.ithvar(v0, false).unwrap();
        let g = dd.ithvar(v1, false).unwrap();
        let h = dd.ithvar(v2, false).unwrap();
        let ite = dd.ite(f, g, h).unwrap();
        let fg = dd.and(f, g).unwrap();
        let nfh = dd.and(dd.not(f), h).unwrap();
        let expect = dd.or(fg, nfh).unwrap();
        assert_eq!(ite, expect);
    }

    #[test]
    fn ite_agrees_with_its_condition_negated_rewrite() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let v2 = dd.new_variable();
        let f = dd.ithvar(v0, false).unwrap();
        let g = dd.ithvar(v1, false).unwrap();
        let h = dd.ithvar(v2, false).unwrap();
        // ite(f, g, h) == ite(!f, h, g): both sides hit the same canonical
        // Apply3Key, so this also exercises the memo-sharing fold.
        let lhs = dd.ite(f, g, h).unwrap();
        let rhs = dd.ite(dd.not(f), h, g).unwrap();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn ite_handles_a_complemented_then_branch() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let f = dd.ithvar(v0, false).unwrap();
        let g = dd.ithvar(v1, false).unwrap();
        let ite = dd.ite(f, dd.not(g), g).unwrap();
        // if f then !g else g == f xor !g == !(f xor g)
        let expect = dd.xnor(f, g).unwrap();
        assert_eq!(ite, expect);
    }
}
