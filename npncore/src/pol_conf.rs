use ddcommon::prelude::*;

/// A candidate polarity assignment: whether the output is complemented, and
/// which inputs (by bit position in the normalized function) are
/// complemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolConf {
    oinv: bool,
    ibits: u64,
}

impl PolConf {
    pub fn new(oinv: bool, ibits: u64) -> Self {
        PolConf { oinv, ibits }
    }

    pub fn identity() -> Self {
        PolConf { oinv: false, ibits: 0 }
    }

    pub fn oinv(&self) -> bool {
        self.oinv
    }

    pub fn ibits(&self) -> u64 {
        self.ibits
    }

    pub fn iinv(&self, var: usize) -> bool {
        (self.ibits >> var) & 1 != 0
    }

    pub fn to_npnmap(&self, n: usize) -> NpnMap {
        let mut map = NpnMap::identity(n);
        map.set_output_inv(self.oinv);
        for v in 0..n {
            map.set_input(v, Some(v), self.iinv(v));
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iinv_reads_back_the_bit_it_was_given() {
        let pc = PolConf::new(true, 0b0101);
        assert!(pc.iinv(0));
        assert!(!pc.iinv(1));
        assert!(pc.iinv(2));
        assert!(!pc.iinv(3));
        assert!(pc.oinv());
    }

    #[test]
    fn to_npnmap_is_pure_polarity_no_permutation() {
        let pc = PolConf::new(false, 0b10);
        let map = pc.to_npnmap(2);
        assert_eq!(map.input_map(0), (Some(0), false));
        assert_eq!(map.input_map(1), (Some(1), true));
        assert!(!map.output_inv());
    }
}
