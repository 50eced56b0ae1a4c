use bddcore::manager::BddManager;

#[test]
fn s1_and_of_two_literals() {
    let mut dd = BddManager::new();
    let a = dd.new_variable();
    let b = dd.new_variable();
    let xa = dd.ithvar(a, false).unwrap();
    let xb = dd.ithvar(b, false).unwrap();
    let f = dd.and(xa, xb).unwrap();

    assert_eq!(dd.eval(f, &[true, true]).unwrap(), true);
    assert_eq!(dd.eval(f, &[false, true]).unwrap(), false);
    assert_eq!(dd.eval(f, &[true, false]).unwrap(), false);
    assert_eq!(dd.eval(f, &[false, false]).unwrap(), false);
}

#[test]
fn involution_holds_for_a_built_function() {
    let mut dd = BddManager::new();
    let a = dd.new_variable();
    let b = dd.new_variable();
    let xa = dd.ithvar(a, false).unwrap();
    let xb = dd.ithvar(b, false).unwrap();
    let f = dd.or(xa, xb).unwrap();
    assert_eq!(dd.not(dd.not(f)), f);
}

#[test]
fn demorgan_holds() {
    let mut dd = BddManager::new();
    let a = dd.new_variable();
    let b = dd.new_variable();
    let xa = dd.ithvar(a, false).unwrap();
    let xb = dd.ithvar(b, false).unwrap();
    let lhs = dd.and(xa, xb).unwrap();
    let rhs_inner = dd.or(dd.not(xa), dd.not(xb)).unwrap();
    let rhs = dd.not(rhs_inner);
    assert_eq!(lhs, rhs);
}

#[test]
fn ite_identities_hold() {
    let mut dd = BddManager::new();
    let a = dd.new_variable();
    let b = dd.new_variable();
    let c = dd.new_variable();
    let f = dd.ithvar(a, false).unwrap();
    let g = dd.ithvar(b, false).unwrap();
    let h = dd.ithvar(c, false).unwrap();

    assert_eq!(dd.ite(f, dd.one(), dd.zero()).unwrap(), f);
    assert_eq!(dd.ite(dd.one(), g, h).unwrap(), g);
    assert_eq!(dd.ite(dd.zero(), g, h).unwrap(), h);
}

#[test]
fn gc_preserves_live_semantics() {
    let mut dd = BddManager::new();
    let a = dd.new_variable();
    let b = dd.new_variable();
    let xa = dd.ithvar(a, false).unwrap();
    let xb = dd.ithvar(b, false).unwrap();
    let f = dd.and(xa, xb).unwrap();
    dd.activate(f);

    // build and discard a bunch of garbage to exercise the unique table.
    for _ in 0..32 {
        let g = dd.or(xa, xb).unwrap();
        dd.activate(g);
        dd.deactivate(g);
    }
    dd.garbage_collection();

    assert_eq!(dd.eval(f, &[true, true]).unwrap(), true);
    assert_eq!(dd.eval(f, &[true, false]).unwrap(), false);
    dd.deactivate(f);
}

#[test]
fn exhaustive_oracle_for_three_variables() {
    let mut dd = BddManager::new();
    let vars: Vec<_> = (0..3).map(|_| dd.new_variable()).collect();
    let lits: Vec<_> = vars.iter().map(|&v| dd.ithvar(v, false).unwrap()).collect();

    // f = (x0 & x1) | x2
    let and01 = dd.and(lits[0], lits[1]).unwrap();
    let f = dd.or(and01, lits[2]).unwrap();

    for a in [false, true] {
        for b in [false, true] {
            for c in [false, true] {
                let expect = (a && b) || c;
                assert_eq!(dd.eval(f, &[a, b, c]).unwrap(), expect);
            }
        }
    }
}
