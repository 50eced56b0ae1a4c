use ddcommon::prelude::*;

use crate::manager::BddManager;

/// A minimal Boolean-expression tree, local to this crate. The general
/// logical-expression type is out of scope (spec.md Non-goals); this just
/// gives `from_expr` something to recurse over.
#[derive(Debug, Clone)]
pub enum BoolExpr {
    Zero,
    One,
    Var(VarId),
    Not(Box<BoolExpr>),
    And(Vec<BoolExpr>),
    Or(Vec<BoolExpr>),
    Xor(Box<BoolExpr>, Box<BoolExpr>),
}

impl BddManager {
    /// Translates a `BoolExpr` into a BDD, applying each connective with the
    /// manager's own `and`/`or`/`xor`/`not` (spec.md §4.3).
    pub fn from_expr(&mut self, expr: &BoolExpr) -> DdResult<EdgeRef> {
        match expr {
            BoolExpr::Zero => Ok(self.zero()),
            BoolExpr::One => Ok(self.one()),
            BoolExpr::Var(varid) => self.ithvar(*varid, false),
            BoolExpr::Not(e) => {
                let f = self.from_expr(e)?;
                Ok(self.not(f))
            }
            BoolExpr::And(es) => {
                let mut acc = self.one();
                for e in es {
                    let f = self.from_expr(e)?;
                    acc = self.and(acc, f)?;
                }
                Ok(acc)
            }
            BoolExpr::Or(es) => {
                let mut acc = self.zero();
                for e in es {
                    let f = self.from_expr(e)?;
                    acc = self.or(acc, f)?;
                }
                Ok(acc)
            }
            BoolExpr::Xor(a, b) => {
                let fa = self.from_expr(a)?;
                let fb = self.from_expr(b)?;
                self.xor(fa, fb)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_expr_builds_and_or_not() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let expr = BoolExpr::Or(vec![
            BoolExpr::And(vec![BoolExpr::Var(v0), BoolExpr::Var(v1)]),
            BoolExpr::Not(Box::new(BoolExpr::Var(v0))),
        ]);
        let f = dd.from_expr(&expr).unwrap();
        for a in [false, true] {
            for b in [false, true] {
                let expect = (a && b) || !a;
                assert_eq!(dd.eval(f, &[a, b]).unwrap(), expect);
            }
        }
    }

    #[test]
    fn from_expr_xor() {
        let mut dd = BddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let expr = BoolExpr::Xor(
            Box::new(BoolExpr::Var(v0)),
            Box::new(BoolExpr::Var(v1)),
        );
        let f = dd.from_expr(&expr).unwrap();
        assert_eq!(dd.eval(f, &[true, false]).unwrap(), true);
        assert_eq!(dd.eval(f, &[true, true]).unwrap(), false);
    }
}
