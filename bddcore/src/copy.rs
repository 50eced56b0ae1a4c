use ddcommon::prelude::*;

use crate::manager::BddManager;

impl BddManager {
    /// Rebuilds `src` (which belongs to `src_mgr`) as an equivalent BDD
    /// under `self`'s variable ordering. Ensures every support variable of
    /// `src` also exists here, then recurses by cofactoring `src` on each
    /// support variable in this manager's level order, memoising on `src`
    /// handles (spec.md §4.3).
    pub fn copy(&mut self, src_mgr: &mut BddManager, src: EdgeRef) -> DdResult<EdgeRef> {
        if std::ptr::eq(self, src_mgr) {
            return Ok(src);
        }
        let mut order = src_mgr.support(src);
        for &v in &order {
            while self.variable_num() <= v {
                self.new_variable();
            }
        }
        order.sort_by_key(|&v| self.mgr.varid_to_level(v).unwrap());
        let mut memo = DdHashMap::default();
        self.copy_rec(src_mgr, src, &order, 0, &mut memo)
    }

    fn copy_rec(
        &mut self,
        src_mgr: &mut BddManager,
        src: EdgeRef,
        order: &[VarId],
        pos: usize,
        memo: &mut DdHashMap<EdgeRef, EdgeRef>,
    ) -> DdResult<EdgeRef> {
        if src == src_mgr.zero() {
            return Ok(self.zero());
        }
        if src == src_mgr.one() {
            return Ok(self.one());
        }
        if let Some(&cached) = memo.get(&src) {
            return Ok(cached);
        }
        if pos >= order.len() {
            return Err(DdError::ShapePrecondition {
                op: "copy",
                detail: "support exhausted before reaching a constant".into(),
            });
        }
        let varid = order[pos];
        let c0 = src_mgr.cofactor(src, varid, false)?;
        let c1 = src_mgr.cofactor(src, varid, true)?;
        let low = self.copy_rec(src_mgr, c0, order, pos + 1, memo)?;
        let high = self.copy_rec(src_mgr, c1, order, pos + 1, memo)?;
        let level = self.mgr.varid_to_level(varid)?;
        let result = self.make_node(level, low, high)?;
        memo.insert(src, result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_round_trips_truth_table() {
        let mut src = BddManager::new();
        let v0 = src.new_variable();
        let v1 = src.new_variable();
        let x0 = src.ithvar(v0, false).unwrap();
        let x1 = src.ithvar(v1, false).unwrap();
        let f = src.and(x0, x1).unwrap();

        let mut dst = BddManager::new();
        let g = dst.copy(&mut src, f).unwrap();
        for a in [false, true] {
            for b in [false, true] {
                assert_eq!(
                    src.eval(f, &[a, b]).unwrap(),
                    dst.eval(g, &[a, b]).unwrap()
                );
            }
        }
    }
}
