use ddcommon::prelude::*;

use crate::manager::BddManager;

impl BddManager {
    /// Every variable whose level is reachable from `f`.
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

    pub fn check_support(&self, f: EdgeRef, varid: VarId) -> bool {
        let Ok(level) = self.mgr.varid_to_level(varid) else {
            return false;
        };
        let mut levels = DdHashSet::default();
        self.collect_levels(f, &mut DdHashSet::default(), &mut levels);
        levels.contains(&level)
    }

    /// Evaluates `f` under a full assignment, indexed by `VarId`.
    pub fn eval(&self, f: EdgeRef, assignment: &[bool]) -> DdResult<bool> {
        let mut cur = f;
        loop {
            if cur.is_const() {
                return Ok(cur.is_one());
            }
            let node = self.mgr.node(cur).unwrap();
            let inv = cur.is_complemented();
            let varid = self.mgr.level_to_varid(node.level)?;
            let bit = *assignment.get(varid).ok_or(DdError::OutOfRange {
                what: "varid",
                value: varid,
                bound: assignment.len(),
            })?;
            cur = if bit { node.edge1 ^ inv } else { node.edge0 ^ inv };
        }
    }

    /// True iff `f` represents a cube (a conjunction of literals): every
    /// node on the single surviving path has exactly one child equal to
    /// the zero constant.
    pub fn is_cube(&self, f: EdgeRef) -> bool {
        if f == self.zero() {
            return false;
        }
        let mut cur = f;
        while cur.node().is_some() {
            let node = self.mgr.node(cur).unwrap();
            let inv = cur.is_complemented();
            let c0 = node.edge0 ^ inv;
            let c1 = node.edge1 ^ inv;
            if c0 == self.zero() {
                cur = c1;
            } else if c1 == self.zero() {
                cur = c0;
            } else {
                return false;
            }
        }
        cur == self.one()
    }

    /// True iff `f` is a cube with every literal positive.
    pub fn is_posicube(&self, f: EdgeRef) -> bool {
        if f == self.zero() {
            return false;
        }
        let mut cur = f;
        while cur.node().is_some() {
            let node = self.mgr.node(cur).unwrap();
            let inv = cur.is_complemented();
            let c0 = node.edge0 ^ inv;
            let c1 = node.edge1 ^ inv;
            if c0 != self.zero() {
                return false;
            }
            cur = c1;
        }
        cur == self.one()
    }

    fn find_path(&self, f: EdgeRef, want_one: bool) -> Vec<Option<bool>> {
        let miss = if want_one { self.zero() } else { self.one() };
        let hit = if want_one { self.one() } else { self.zero() };
        let mut result = vec![None; self.variable_num()];
        let mut cur = f;
        while cur != hit {
            let node = self
                .mgr
                .node(cur)
                .expect("f never reaches the requested terminal");
            let inv = cur.is_complemented();
            let c0 = node.edge0 ^ inv;
            let c1 = node.edge1 ^ inv;
            let varid = self.mgr.level_to_varid(node.level).unwrap();
            if c1 != miss {
                result[varid] = Some(true);
                cur = c1;
            } else {
                result[varid] = Some(false);
                cur = c0;
            }
        }
        result
    }

    /// One assignment (as `Some(bit)` per variable, `None` for don't-cares)
    /// under which `f` evaluates to `1`.
    pub fn get_onepath(&self, f: EdgeRef) -> Vec<Option<bool>> {
        self.find_path(f, true)
    }

    /// One assignment under which `f` evaluates to `0`.
    pub fn get_zeropath(&self, f: EdgeRef) -> Vec<Option<bool>> {
        self.find_path(f, false)
    }

    /// True iff swapping `v1` and `v2` (optionally complementing both)
    /// leaves `f` unchanged.
    pub fn check_symmetry(&mut self, f: EdgeRef, v1: VarId, v2: VarId, inv: bool) -> DdResult<bool> {
        let f01 = {
            let t = self.cofactor(f, v1, false)?;
            self.cofactor(t, v2, true)?
        };
        let f10 = {
            let t = self.cofactor(f, v1, true)?;
            self.cofactor(t, v2, false)?
        };
        let f10 = if inv { !f10 } else { f10 };
        Ok(f01 == f10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_matches_variables_used() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let _v2 = dd.new_variable();
        let x = dd.ithvar(v0, false).unwrap();
        let y = dd.ithvar(v1, false).unwrap();
        let f = dd.and(x, y).unwrap();
        assert_eq!(dd.support(f), vec![v0, v1]);
    }

    #[test]
    fn eval_matches_and_definition() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let x = dd.ithvar(v0, false).unwrap();
        let y = dd.ithvar(v1, false).unwrap();
        let f = dd.and(x, y).unwrap();
        assert_eq!(dd.eval(f, &[true, true]).unwrap(), true);
        assert_eq!(dd.eval(f, &[true, false]).unwrap(), false);
    }

    #[test]
    fn posicube_detection() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let x = dd.ithvar(v0, false).unwrap();
        let y = dd.ithvar(v1, false).unwrap();
        let f = dd.and(x, y).unwrap();
        assert!(dd.is_cube(f));
        assert!(dd.is_posicube(f));
        let g = dd.and(x, dd.not(y)).unwrap();
        assert!(dd.is_cube(g));
        assert!(!dd.is_posicube(g));
    }

    #[test]
    fn symmetric_and_detected() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let x = dd.ithvar(v0, false).unwrap();
        let y = dd.ithvar(v1, false).unwrap();
        let f = dd.and(x, y).unwrap();
        assert!(dd.check_symmetry(f, v0, v1, false).unwrap());
    }
}
