use ddcommon::prelude::*;

use crate::manager::BddManager;

impl BddManager {
    /// Replaces `varid` in `f` by `g`.
    pub fn compose(&mut self, f: EdgeRef, varid: VarId, g: EdgeRef) -> DdResult<EdgeRef> {
        let varlevel = self.mgr.varid_to_level(varid)?;
        let mut memo = DdHashMap::default();
        self.compose_rec(f, varlevel, g, &mut memo)
    }

    fn compose_rec(
        &mut self,
        f: EdgeRef,
        varlevel: Level,
        g: EdgeRef,
        memo: &mut DdHashMap<EdgeRef, EdgeRef>,
    ) -> DdResult<EdgeRef> {
        if f.is_const() {
            return Ok(f);
        }
        let node = self.mgr.node(f).unwrap();
        let inv = f.is_complemented();
        if node.level > varlevel {
            return Ok(f);
        }
        let level = node.level;
        let (c0, c1) = (node.edge0 ^ inv, node.edge1 ^ inv);
        if level == varlevel {
            return self.ite(g, c1, c0);
        }
        if let Some(&cached) = memo.get(&f) {
            return Ok(cached);
        }
        let low = self.compose_rec(c0, varlevel, g, memo)?;
        let high = self.compose_rec(c1, varlevel, g, memo)?;
        let result = self.make_node(level, low, high)?;
        memo.insert(f, result);
        Ok(result)
    }

    /// Simultaneously replaces every variable in `map` by its paired BDD.
    /// The map is converted to a level-keyed table so the recursion can
    /// test membership by level, exactly as `compose` does for one
    /// variable (spec.md §4.3).
    pub fn multi_compose(&mut self, f: EdgeRef, map: &[(VarId, EdgeRef)]) -> DdResult<EdgeRef> {
        let mut level_map = DdHashMap::default();
        for &(varid, g) in map {
            let level = self.mgr.varid_to_level(varid)?;
            level_map.insert(level, g);
        }
        let mut memo = DdHashMap::default();
        self.multi_compose_rec(f, &level_map, &mut memo)
    }

    fn multi_compose_rec(
        &mut self,
        f: EdgeRef,
        level_map: &DdHashMap<Level, EdgeRef>,
        memo: &mut DdHashMap<EdgeRef, EdgeRef>,
    ) -> DdResult<EdgeRef> {
        if f.is_const() {
            return Ok(f);
        }
        if let Some(&cached) = memo.get(&f) {
            return Ok(cached);
        }
        let node = self.mgr.node(f).unwrap();
        let inv = f.is_complemented();
        let level = node.level;
        let (c0, c1) = (node.edge0 ^ inv, node.edge1 ^ inv);
        let low = self.multi_compose_rec(c0, level_map, memo)?;
        let high = self.multi_compose_rec(c1, level_map, memo)?;
        let result = match level_map.get(&level) {
            Some(&g) => self.ite(g, high, low)?,
            None => self.make_node(level, low, high)?,
        };
        memo.insert(f, result);
        Ok(result)
    }

    /// Renames variables: `map` pairs each old `VarId` with its
    /// replacement. A specialisation of `multi_compose` where every
    /// replacement is a literal (spec.md §4.3).
    pub fn remap_vars(&mut self, f: EdgeRef, map: &[(VarId, VarId)]) -> DdResult<EdgeRef> {
        let mut literal_map = Vec::with_capacity(map.len());
        for &(old_var, new_var) in map {
            literal_map.push((old_var, self.ithvar(new_var, false)?));
        }
        self.multi_compose(f, &literal_map)
    }

    /// Restrict-like simplification: returns a function no larger than
    /// `on` that agrees with it wherever `dc` is `0` (spec.md §4.3).
    pub fn simplify(&mut self, on: EdgeRef, dc: EdgeRef) -> DdResult<EdgeRef> {
        let mut memo = DdHashMap::default();
        self.simplify_rec(on, dc, &mut memo)
    }

    fn simplify_rec(
        &mut self,
        on: EdgeRef,
        dc: EdgeRef,
        memo: &mut DdHashMap<(EdgeRef, EdgeRef), EdgeRef>,
    ) -> DdResult<EdgeRef> {
        if dc == self.zero() || on.is_const() {
            return Ok(on);
        }
        if dc == self.one() {
            return Ok(on);
        }
        let key = (on, dc);
        if let Some(&cached) = memo.get(&key) {
            return Ok(cached);
        }
        let level = self.top_level(on, dc);
        let (on0, on1) = self.cofactors_at(on, level);
        let (dc0, dc1) = self.cofactors_at(dc, level);
        let result = if dc0 == self.one() {
            self.simplify_rec(on1, dc1, memo)?
        } else if dc1 == self.one() {
            self.simplify_rec(on0, dc0, memo)?
        } else {
            let low = self.simplify_rec(on0, dc0, memo)?;
            let high = self.simplify_rec(on1, dc1, memo)?;
            self.make_node(level, low, high)?
        };
        memo.insert(key, result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_replaces_variable() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let v2 = dd.new_variable();
        let x0 = dd.ithvar(v0, false).unwrap();
        let x1 = dd.ithvar(v1, false).unwrap();
        let x2 = dd.ithvar(v2, false).unwrap();
        let f = dd.and(x0, x1).unwrap();
        let composed = dd.compose(f, v0, x2).unwrap();
        let expect = dd.and(x2, x1).unwrap();
        assert_eq!(composed, expect);
    }

    #[test]
    fn remap_vars_swaps_identity() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let x0 = dd.ithvar(v0, false).unwrap();
        let x1 = dd.ithvar(v1, false).unwrap();
        let f = dd.and(x0, x1).unwrap();
        let swapped = dd.remap_vars(f, &[(v0, v1), (v1, v0)]).unwrap();
        assert_eq!(swapped, f);
    }

    #[test]
    fn simplify_with_no_dont_cares_is_identity() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        let x0 = dd.ithvar(v0, false).unwrap();
        let simplified = dd.simplify(x0, dd.zero()).unwrap();
        assert_eq!(simplified, x0);
    }
}
