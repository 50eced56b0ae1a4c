use ddcommon::prelude::*;
use npncore::engine::NpnEngine;

#[test]
fn npn_equivalent_functions_share_a_canonical_form() {
    // nand(a, b) and nor(a, b) are NPN-equivalent (negate every input and
    // the output of one to get the other).
    let nand = !&TvFunc::from_cover(2, &[vec![(0, false), (1, false)]]);
    let nor = !&TvFunc::from_cover(2, &[vec![(0, false)], vec![(1, false)]]);
    let (c_nand, _) = NpnEngine::canonicalize(&nand);
    let (c_nor, _) = NpnEngine::canonicalize(&nor);
    assert_eq!(c_nand, c_nor);
}

#[test]
fn canonical_form_is_stable_under_every_npn_transform_of_a_function() {
    let f = TvFunc::from_bits("1101000100111010").unwrap();
    let (base_cfunc, _) = NpnEngine::canonicalize(&f);

    let mut perm = NpnMap::identity(4);
    perm.set_input(0, Some(2), true);
    perm.set_input(1, Some(0), false);
    perm.set_input(2, Some(3), true);
    perm.set_input(3, Some(1), false);
    perm.set_output_inv(true);

    let transformed = f.xform(&perm);
    let (cfunc2, _) = NpnEngine::canonicalize(&transformed);
    assert_eq!(base_cfunc, cfunc2);
}

#[test]
fn two_input_functions_collapse_into_four_npn_classes() {
    use std::collections::HashSet;
    let mut classes: HashSet<Vec<u64>> = HashSet::new();
    for bits in 0u32..16 {
        let s: String = (0..4).map(|i| if (bits >> i) & 1 != 0 { '1' } else { '0' }).collect();
        let f = TvFunc::from_bits(&s).unwrap();
        let (cfunc, _) = NpnEngine::canonicalize(&f);
        classes.insert(cfunc.words().to_vec());
    }
    assert_eq!(classes.len(), 4);
}

#[test]
fn every_returned_map_reproduces_the_same_canonical_function() {
    let f = TvFunc::from_bits("0110100110010110").unwrap();
    let (cfunc, maps) = NpnEngine::canonicalize(&f);
    assert!(!maps.is_empty());
    for map in &maps {
        assert_eq!(f.xform(map), cfunc);
    }
}
