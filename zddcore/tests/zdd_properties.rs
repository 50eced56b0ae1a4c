use zddcore::manager::ZddManager;

#[test]
fn s6_union_of_two_sets() {
    let mut dd = ZddManager::new();
    let v0 = dd.new_variable();
    let v1 = dd.new_variable();
    let v2 = dd.new_variable();
    let a = dd.make_set(&[v0, v2]).unwrap();
    let b = dd.make_set(&[v0, v1]).unwrap();
    let f = dd.cup(a, b).unwrap();
    assert_eq!(dd.count(f), 2);
    assert_eq!(dd.support(f), vec![v0, v1, v2]);
}

#[test]
fn invert_is_involution() {
    let mut dd = ZddManager::new();
    let v0 = dd.new_variable();
    let v1 = dd.new_variable();
    let a = dd.make_set(&[v0]).unwrap();
    let b = dd.make_set(&[v1]).unwrap();
    let f = dd.cup(a, b).unwrap();
    let g = dd.invert(f).unwrap();
    let back = dd.invert(g).unwrap();
    assert_eq!(back, f);
}

#[test]
fn gc_preserves_live_family() {
    let mut dd = ZddManager::new();
    let v0 = dd.new_variable();
    let v1 = dd.new_variable();
    let a = dd.make_set(&[v0]).unwrap();
    let b = dd.make_set(&[v1]).unwrap();
    let f = dd.cup(a, b).unwrap();
    dd.activate(f);

    for _ in 0..16 {
        let g = dd.cap(f, a).unwrap();
        dd.activate(g);
        dd.deactivate(g);
    }
    dd.garbage_collection();

    assert_eq!(dd.count(f), 2);
    dd.deactivate(f);
}
