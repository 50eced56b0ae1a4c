use ddcommon::prelude::*;

struct InputGroup {
    elems: Vec<usize>,
    w1: i64,
    bisym: bool,
}

/// Equivalence classes of inputs discovered after Walsh-0/1 normalisation:
/// inputs with equal `w1` that also test symmetric under `TvFunc::check_sym`
/// are interchangeable and collapse into a single group. A zero-`w1` group
/// is additionally tagged `bisym` when its members are symmetric only after
/// complementing one of them (grounded on
/// `original_source/gtest/npn/InputInfoTest.cc`, which pins down every
/// accessor below).
pub struct InputInfo {
    groups: Vec<InputGroup>,
}

impl InputInfo {
    pub fn new() -> Self {
        InputInfo { groups: Vec::new() }
    }

    pub fn new_group(&mut self, elem: usize, w1: i64) -> usize {
        self.groups.push(InputGroup { elems: vec![elem], w1, bisym: false });
        self.groups.len() - 1
    }

    pub fn add_elem(&mut self, gid: usize, elem: usize) {
        self.groups[gid].elems.push(elem);
    }

    pub fn set_bisym(&mut self, gid: usize) {
        self.groups[gid].bisym = true;
    }

    pub fn group_num(&self) -> usize {
        self.groups.len()
    }

    pub fn w1(&self, gid: usize) -> i64 {
        self.groups[gid].w1
    }

    pub fn bisym(&self, gid: usize) -> bool {
        self.groups[gid].bisym
    }

    pub fn elem_num(&self, gid: usize) -> usize {
        self.groups[gid].elems.len()
    }

    pub fn elem(&self, gid: usize, pos: usize) -> usize {
        self.groups[gid].elems[pos]
    }

    /// Input bitmask identifying which members of `gid` flip together for
    /// the "all inverted" polarity candidate: every member for a plain
    /// symmetric group, only the head for a bi-symmetric one.
    pub fn inv_bits(&self, gid: usize) -> u64 {
        let g = &self.groups[gid];
        if g.bisym {
            1u64 << g.elems[0]
        } else {
            g.elems.iter().fold(0u64, |acc, &e| acc | (1u64 << e))
        }
    }

    pub fn polundet_num(&self) -> usize {
        self.groups.iter().filter(|g| g.w1 == 0).count()
    }

    pub fn polundet_gid(&self, pos: usize) -> usize {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.w1 == 0)
            .map(|(i, _)| i)
            .nth(pos)
            .expect("pos < polundet_num")
    }

    /// Ordering used to seed the initial `IgPartition`: higher `w1` first,
    /// and among equal `w1` a bi-symmetric group ranks ahead of a plain one.
    pub fn w1gt(&self, gid1: usize, gid2: usize) -> bool {
        let (g1, g2) = (&self.groups[gid1], &self.groups[gid2]);
        if g1.w1 != g2.w1 {
            g1.w1 > g2.w1
        } else {
            g1.bisym && !g2.bisym
        }
    }

    pub fn w1eq(&self, gid1: usize, gid2: usize) -> bool {
        let (g1, g2) = (&self.groups[gid1], &self.groups[gid2]);
        g1.w1 == g2.w1 && g1.bisym == g2.bisym
    }

    /// Builds the group structure for an already Walsh-0/1-normalized
    /// function (every `walsh_1` non-negative).
    pub fn from_func(f: &TvFunc) -> InputInfo {
        let n = f.input_num();
        let w1: Vec<i64> = (0..n).map(|v| f.walsh_1(v)).collect();
        let mut info = InputInfo::new();
        let mut assigned = vec![false; n];
        for v in 0..n {
            if assigned[v] {
                continue;
            }
            let gid = info.new_group(v, w1[v]);
            assigned[v] = true;
            for u in (v + 1)..n {
                if assigned[u] || w1[u] != w1[v] {
                    continue;
                }
                if f.check_sym(v, u, false) {
                    info.add_elem(gid, u);
                    assigned[u] = true;
                }
            }
            if w1[v] == 0 && info.elem_num(gid) > 1 {
                let head = info.elem(gid, 0);
                let all_inv_sym = (1..info.elem_num(gid)).all(|j| f.check_sym(head, info.elem(gid, j), true));
                if all_inv_sym {
                    info.set_bisym(gid);
                }
            }
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base1_matches_reference_accessors() {
        let mut iinfo = InputInfo::new();
        iinfo.new_group(0, 1);
        iinfo.new_group(1, 2);
        iinfo.add_elem(0, 2);

        assert_eq!(iinfo.group_num(), 2);
        assert_eq!(iinfo.polundet_num(), 0);
        assert_eq!(iinfo.w1(0), 1);
        assert_eq!(iinfo.elem_num(0), 2);
        assert_eq!(iinfo.elem(0, 0), 0);
        assert_eq!(iinfo.elem(0, 1), 2);
        assert_eq!(iinfo.w1(1), 2);
        assert_eq!(iinfo.elem_num(1), 1);
    }

    #[test]
    fn base2_matches_reference_accessors() {
        let mut iinfo = InputInfo::new();
        iinfo.new_group(0, 1);
        iinfo.new_group(1, 2);
        iinfo.add_elem(0, 2);
        iinfo.new_group(3, 0);
        iinfo.set_bisym(2);
        iinfo.add_elem(2, 4);
        iinfo.new_group(5, 0);
        iinfo.add_elem(3, 6);

        assert_eq!(iinfo.group_num(), 4);
        assert_eq!(iinfo.polundet_num(), 2);

        assert!(!iinfo.bisym(0));
        assert!(!iinfo.bisym(1));
        assert!(iinfo.bisym(2));
        assert_eq!(iinfo.inv_bits(2), 0x08);
        assert!(!iinfo.bisym(3));
        assert_eq!(iinfo.inv_bits(3), 0x60);

        assert_eq!(iinfo.polundet_gid(0), 2);
        assert_eq!(iinfo.polundet_gid(1), 3);

        assert!(!iinfo.w1gt(0, 0));
        assert!(!iinfo.w1gt(0, 1));
        assert!(iinfo.w1gt(0, 2));
        assert!(iinfo.w1gt(1, 0));
        assert!(iinfo.w1gt(2, 3));
        assert!(!iinfo.w1gt(3, 2));

        assert!(iinfo.w1eq(0, 0));
        assert!(!iinfo.w1eq(2, 3));
        assert!(iinfo.w1eq(3, 3));
    }

    #[test]
    fn from_func_groups_symmetric_inputs_of_and_gate() {
        let f = TvFunc::from_cover(2, &[vec![(0, false), (1, false)]]);
        let info = InputInfo::from_func(&f);
        assert_eq!(info.group_num(), 1);
        assert_eq!(info.elem_num(0), 2);
    }

    #[test]
    fn from_func_detects_bisymmetric_xor() {
        let f = &TvFunc::literal(2, 0, false) ^ &TvFunc::literal(2, 1, false);
        let info = InputInfo::from_func(&f);
        assert_eq!(info.group_num(), 1);
        assert_eq!(info.w1(0), 0);
        assert!(info.bisym(0));
    }
}
