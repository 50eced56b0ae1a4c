use ddcommon::prelude::*;

use crate::manager::BddManager;

impl BddManager {
    /// Builds a BDD from a truth-table string: `bits.len()` must be
    /// `2^varlist.len()`, and `bits[i]` is the function's value at the
    /// minterm whose bit `k` (counting from the high end) is `varlist[k]`
    /// (spec.md §4.6).
    pub fn from_truth(&mut self, varlist: &[VarId], bits: &str) -> DdResult<EdgeRef> {
        let expected_len = 1usize << varlist.len();
        if bits.len() != expected_len || !bits.bytes().all(|b| b == b'0' || b == b'1') {
            return Err(DdError::InvalidTruthString {
                expected_len,
                actual_len: bits.len(),
            });
        }
        let tv = TvFunc::from_bits(bits)?;
        self.from_tvfunc(varlist, &tv)
    }

    /// Builds a BDD equivalent to `tv`, whose `k`-th input is bound to
    /// `varlist[k]`. Recurses by cofactoring `tv` itself and memoising on
    /// `(tv, position)`, mirroring `from_truth`'s string-splitting
    /// recursion one level down (spec.md §4.3, §4.6).
    pub fn from_tvfunc(&mut self, varlist: &[VarId], tv: &TvFunc) -> DdResult<EdgeRef> {
        if tv.input_num() != varlist.len() {
            return Err(DdError::ShapePrecondition {
                op: "from_tvfunc",
                detail: "varlist length does not match the truth table's input count".into(),
            });
        }
        let mut memo = DdHashMap::default();
        self.from_tvfunc_rec(varlist, tv, 0, &mut memo)
    }

    fn from_tvfunc_rec(
        &mut self,
        varlist: &[VarId],
        tv: &TvFunc,
        pos: usize,
        memo: &mut DdHashMap<(TvFunc, usize), EdgeRef>,
    ) -> DdResult<EdgeRef> {
        if pos == varlist.len() {
            return Ok(if tv.value(0)? { self.one() } else { self.zero() });
        }
        let key = (tv.clone(), pos);
        if let Some(&cached) = memo.get(&key) {
            return Ok(cached);
        }
        let c0 = tv.cofactor(pos, false);
        let c1 = tv.cofactor(pos, true);
        let low = self.from_tvfunc_rec(varlist, &c0, pos + 1, memo)?;
        let high = self.from_tvfunc_rec(varlist, &c1, pos + 1, memo)?;
        let level = self.mgr.varid_to_level(varlist[pos])?;
        let result = self.make_node(level, low, high)?;
        memo.insert(key, result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_truth_rejects_bad_length() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        assert!(dd.from_truth(&[v0, v1], "000").is_err());
    }

    #[test]
    fn from_truth_rejects_bad_characters() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        assert!(dd.from_truth(&[v0], "0x").is_err());
    }

    #[test]
    fn from_truth_builds_and_gate() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        // minterms 00,01,10,11 -> and(v0,v1) is 1 only at 11.
        let f = dd.from_truth(&[v0, v1], "0001").unwrap();
        assert_eq!(dd.eval(f, &[false, false]).unwrap(), false);
        assert_eq!(dd.eval(f, &[true, false]).unwrap(), false);
        assert_eq!(dd.eval(f, &[false, true]).unwrap(), false);
        assert_eq!(dd.eval(f, &[true, true]).unwrap(), true);
    }
}
