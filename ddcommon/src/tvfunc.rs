use crate::error::{DdError, DdResult};

/// Bit `b` set wherever input variable `var` (0..=5) equals 1, replicated
/// across the whole 64-bit word. `var >= 6` instead alternates whole blocks
/// and is handled separately (spec.md §4.6).
const LITERAL_MASKS: [u64; 6] = [
    0xAAAA_AAAA_AAAA_AAAA,
    0xCCCC_CCCC_CCCC_CCCC,
    0xF0F0_F0F0_F0F0_F0F0,
    0xFF00_FF00_FF00_FF00,
    0xFFFF_0000_FFFF_0000,
    0xFFFF_FFFF_0000_0000,
];

/// An NPN transform: an input permutation (with an optional per-input
/// complement), plus an output complement. `perm[old_var]` gives the new
/// position assigned to `old_var`, or `None` when `old_var` is projected
/// away (only `shrink_map` produces `None` entries; every map built by the
/// NPN search is a full bijection).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpnMap {
    ni_in: usize,
    ni_out: usize,
    perm: Vec<Option<usize>>,
    inv: Vec<bool>,
    oinv: bool,
}

impl NpnMap {
    pub fn identity(ni: usize) -> Self {
        NpnMap {
            ni_in: ni,
            ni_out: ni,
            perm: (0..ni).map(Some).collect(),
            inv: vec![false; ni],
            oinv: false,
        }
    }

    pub fn input_num(&self) -> usize {
        self.ni_in
    }

    pub fn output_num(&self) -> usize {
        self.ni_out
    }

    pub fn output_inv(&self) -> bool {
        self.oinv
    }

    pub fn set_output_inv(&mut self, inv: bool) {
        self.oinv = inv;
    }

    pub fn set_input(&mut self, old_var: usize, new_pos: Option<usize>, inv: bool) {
        self.perm[old_var] = new_pos;
        self.inv[old_var] = inv;
    }

    pub fn input_map(&self, old_var: usize) -> (Option<usize>, bool) {
        (self.perm[old_var], self.inv[old_var])
    }
}

/// A completely specified Boolean function over `n` inputs, packed into
/// `max(1, 2^(n-6))` 64-bit words (spec.md §4.6).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TvFunc {
    n: usize,
    words: Vec<u64>,
}

/// Result of `analyze()`: which elementary gate, if any, `f` computes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TvFuncKind {
    Zero,
    One,
    Buffer(usize),
    Not(usize),
    And { vars: Vec<usize>, inv: Vec<bool> },
    Nand { vars: Vec<usize>, inv: Vec<bool> },
    Or { vars: Vec<usize>, inv: Vec<bool> },
    Nor { vars: Vec<usize>, inv: Vec<bool> },
    Xor { vars: Vec<usize>, inv: Vec<bool> },
    Xnor { vars: Vec<usize>, inv: Vec<bool> },
    Unknown,
}

/// 0 = binate, 1 = positive unate, 2 = negative unate, 3 = independent of
/// the variable (spec.md §4.6's `check_unate`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unateness {
    Binate,
    Positive,
    Negative,
    Independent,
}

impl TvFunc {
    #[inline]
    pub fn block_count(n: usize) -> usize {
        if n < 6 {
            1
        } else {
            1usize << (n - 6)
        }
    }

    #[inline]
    pub fn input_num(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    #[inline]
    fn valid_bits(&self) -> usize {
        1usize << self.n
    }

    pub fn zero(n: usize) -> Self {
        TvFunc {
            n,
            words: vec![0u64; Self::block_count(n)],
        }
    }

    pub fn one(n: usize) -> Self {
        let mut tv = TvFunc {
            n,
            words: vec![u64::MAX; Self::block_count(n)],
        };
        tv.mask_last_block();
        tv
    }

    pub fn literal(n: usize, var: usize, inv: bool) -> Self {
        debug_assert!(var < n);
        let nblocks = Self::block_count(n);
        let mut words = vec![0u64; nblocks];
        if var < 6 {
            let mask = LITERAL_MASKS[var];
            let val = if inv { !mask } else { mask };
            for w in words.iter_mut() {
                *w = val;
            }
        } else {
            let k = var - 6;
            for (j, w) in words.iter_mut().enumerate() {
                let bit = (j >> k) & 1 == 1;
                *w = if bit ^ inv { u64::MAX } else { 0 };
            }
        }
        let mut tv = TvFunc { n, words };
        tv.mask_last_block();
        tv
    }

    /// Zeroes the unused high bits of `word[0]` when `n < 6` so that every
    /// constructed `TvFunc` satisfies the "higher bits are zero" invariant
    /// and two constructions of the same function compare equal.
    fn mask_last_block(&mut self) {
        if self.n < 6 {
            let mask = (1u64 << self.valid_bits()) - 1;
            self.words[0] &= mask;
        }
    }

    /// Parses a `{0,1}` string whose length is a power of two; position `i`
    /// in the string is the truth-table bit at minterm index `i`.
    pub fn from_bits(s: &str) -> DdResult<Self> {
        let len = s.len();
        if len == 0 || !len.is_power_of_two() {
            return Err(DdError::InvalidTruthString {
                expected_len: len.next_power_of_two(),
                actual_len: len,
            });
        }
        let n = len.trailing_zeros() as usize;
        let mut tv = TvFunc::zero(n);
        for (i, c) in s.chars().enumerate() {
            let bit = match c {
                '0' => false,
                '1' => true,
                _ => {
                    return Err(DdError::InvalidTruthString {
                        expected_len: len,
                        actual_len: len,
                    })
                }
            };
            if bit {
                tv.set_bit(i);
            }
        }
        Ok(tv)
    }

    pub fn from_cube(n: usize, lits: &[(usize, bool)]) -> Self {
        let mut acc = TvFunc::one(n);
        for &(var, inv) in lits {
            acc &= &TvFunc::literal(n, var, inv);
        }
        acc
    }

    pub fn from_cover(n: usize, cubes: &[Vec<(usize, bool)>]) -> Self {
        let mut acc = TvFunc::zero(n);
        for cube in cubes {
            acc |= &TvFunc::from_cube(n, cube);
        }
        acc
    }

    #[inline]
    fn set_bit(&mut self, i: usize) {
        self.words[i >> 6] |= 1u64 << (i & 63);
    }

    pub fn value(&self, i: usize) -> DdResult<bool> {
        if i >= self.valid_bits() {
            return Err(DdError::OutOfRange {
                what: "minterm index",
                value: i,
                bound: self.valid_bits(),
            });
        }
        Ok((self.words[i >> 6] >> (i & 63)) & 1 != 0)
    }

    pub fn eval(&self, assignment: u64) -> DdResult<bool> {
        self.value(assignment as usize)
    }

    pub fn count_one(&self) -> usize {
        if self.n < 6 {
            let mask = (1u64 << self.valid_bits()) - 1;
            (self.words[0] & mask).count_ones() as usize
        } else {
            self.words.iter().map(|w| w.count_ones() as usize).sum()
        }
    }

    pub fn count_zero(&self) -> usize {
        self.valid_bits() - self.count_one()
    }

    pub fn walsh_0(&self) -> i64 {
        (1i64 << self.n) - 2 * self.count_one() as i64
    }

    pub fn walsh_1(&self, var: usize) -> i64 {
        let x = TvFunc::literal(self.n, var, false);
        let diff = self ^ &x;
        (1i64 << self.n) - 2 * diff.count_one() as i64
    }

    pub fn walsh_2(&self, v1: usize, v2: usize) -> i64 {
        let x1 = TvFunc::literal(self.n, v1, false);
        let x2 = TvFunc::literal(self.n, v2, false);
        let diff = &(self ^ &x1) ^ &x2;
        (1i64 << self.n) - 2 * diff.count_one() as i64
    }

    /// `(walsh_0, walsh_1(0..n))`. Computed by direct summation rather than
    /// the bitsliced Hadamard-tree recursion of the original — the word
    /// count here tops out in the low thousands, so the asymptotic win
    /// isn't worth the extra complexity; the output values match exactly.
    pub fn walsh_01(&self) -> (i64, Vec<i64>) {
        (self.walsh_0(), (0..self.n).map(|v| self.walsh_1(v)).collect())
    }

    /// `(walsh_0, walsh_1(0..n), walsh_2(i,j) for i<j, 0 on the diagonal)`.
    pub fn walsh_012(&self) -> (i64, Vec<i64>, Vec<Vec<i64>>) {
        let (w0, w1) = self.walsh_01();
        let mut w2 = vec![vec![0i64; self.n]; self.n];
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                let v = self.walsh_2(i, j);
                w2[i][j] = v;
                w2[j][i] = v;
            }
        }
        (w0, w1, w2)
    }

    /// Sum of `(-1)^(f(x ^ ibits) ^ oinv)` over minterms `x` of Hamming
    /// weight exactly `w`.
    pub fn walsh_w0(&self, w: u32, oinv: bool, ibits: u64) -> i64 {
        let mut acc = 0i64;
        for x in 0..self.valid_bits() as u64 {
            if x.count_ones() != w {
                continue;
            }
            let bit = self.value((x ^ ibits) as usize).unwrap() ^ oinv;
            acc += if bit { -1 } else { 1 };
        }
        acc
    }

    /// As `walsh_w0`, additionally folding in the bit of `var` at `x`.
    pub fn walsh_w1(&self, var: usize, w: u32, oinv: bool, ibits: u64) -> i64 {
        let mut acc = 0i64;
        for x in 0..self.valid_bits() as u64 {
            if x.count_ones() != w {
                continue;
            }
            let var_bit = (x >> var) & 1 != 0;
            let bit = self.value((x ^ ibits) as usize).unwrap() ^ oinv ^ var_bit;
            acc += if bit { -1 } else { 1 };
        }
        acc
    }

    pub fn cofactor(&self, var: usize, value: bool) -> Self {
        debug_assert!(var < self.n);
        let mut out = self.clone();
        if var < 6 {
            let shift = 1usize << var;
            let mask_pos = LITERAL_MASKS[var];
            for w in out.words.iter_mut() {
                *w = if value {
                    let kept = *w & mask_pos;
                    kept | (kept >> shift)
                } else {
                    let kept = *w & !mask_pos;
                    kept | (kept << shift)
                };
            }
        } else {
            let k = var - 6;
            let half = 1usize << k;
            let nblocks = out.words.len();
            let mut g = 0;
            while g < nblocks {
                for off in 0..half {
                    let b0 = g + off;
                    let b1 = g + half + off;
                    if value {
                        out.words[b0] = self.words[b1];
                        out.words[b1] = self.words[b1];
                    } else {
                        out.words[b0] = self.words[b0];
                        out.words[b1] = self.words[b0];
                    }
                }
                g += 2 * half;
            }
        }
        out
    }

    pub fn check_sup(&self, var: usize) -> bool {
        self.cofactor(var, false) != self.cofactor(var, true)
    }

    pub fn check_unate(&self, var: usize) -> Unateness {
        let c0 = self.cofactor(var, false);
        let c1 = self.cofactor(var, true);
        if c0 == c1 {
            return Unateness::Independent;
        }
        let implies = |a: &TvFunc, b: &TvFunc| -> bool { (a & &(!b)).count_one() == 0 };
        if implies(&c0, &c1) {
            Unateness::Positive
        } else if implies(&c1, &c0) {
            Unateness::Negative
        } else {
            Unateness::Binate
        }
    }

    /// True iff swapping `v1` and `v2` (optionally complementing both)
    /// leaves `self` unchanged.
    pub fn check_sym(&self, v1: usize, v2: usize, inv: bool) -> bool {
        for x in 0..self.valid_bits() as u64 {
            let b1 = (x >> v1) & 1;
            let b2 = (x >> v2) & 1;
            let (nb1, nb2) = if inv { (1 - b2, 1 - b1) } else { (b2, b1) };
            let mut y = x & !(1u64 << v1) & !(1u64 << v2);
            y |= nb1 << v1;
            y |= nb2 << v2;
            if self.value(x as usize).unwrap() != self.value(y as usize).unwrap() {
                return false;
            }
        }
        true
    }

    pub fn support(&self) -> Vec<usize> {
        (0..self.n).filter(|&v| self.check_sup(v)).collect()
    }

    /// Projects away every variable not in the support, returning the map
    /// used to do so and the reduced function.
    pub fn shrink_map(&self) -> (NpnMap, TvFunc) {
        let sup = self.support();
        let k = sup.len();
        let mut map = NpnMap {
            ni_in: self.n,
            ni_out: k,
            perm: vec![None; self.n],
            inv: vec![false; self.n],
            oinv: false,
        };
        for (new_pos, &old_var) in sup.iter().enumerate() {
            map.set_input(old_var, Some(new_pos), false);
        }
        let mut out = TvFunc::zero(k);
        for y in 0..(1usize << k) {
            let mut x = 0usize;
            for (new_pos, &old_var) in sup.iter().enumerate() {
                if (y >> new_pos) & 1 != 0 {
                    x |= 1 << old_var;
                }
            }
            if self.value(x).unwrap() {
                out.set_bit(y);
            }
        }
        (map, out)
    }

    /// Applies a full (non-projecting) NPN map: permutation, per-input
    /// complement, output complement. Builds the result by iterating every
    /// minterm of the new function (spec.md §4.6).
    pub fn xform(&self, map: &NpnMap) -> Self {
        debug_assert_eq!(map.ni_in, self.n);
        let mut out = TvFunc::zero(map.ni_out);
        for y in 0..(1usize << map.ni_out) {
            let mut x = 0usize;
            for old_var in 0..self.n {
                let (pos, inv) = map.input_map(old_var);
                let Some(pos) = pos else { continue };
                let mut bit = (y >> pos) & 1 != 0;
                if inv {
                    bit = !bit;
                }
                if bit {
                    x |= 1 << old_var;
                }
            }
            let bit = self.value(x).unwrap() ^ map.oinv;
            if bit {
                out.set_bit(y);
            }
        }
        out
    }

    pub fn hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325 ^ (self.n as u64);
        for &w in &self.words {
            h ^= w;
            h = h.wrapping_mul(0x1000_0000_01b3);
        }
        h
    }

    pub fn dump(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + self.words.len() * 8);
        buf.extend_from_slice(&(self.words.len() as u32).to_be_bytes());
        buf.extend_from_slice(&(self.n as u32).to_be_bytes());
        for &w in &self.words {
            buf.extend_from_slice(&w.to_be_bytes());
        }
        buf
    }

    pub fn restore(buf: &[u8]) -> DdResult<Self> {
        if buf.len() < 8 {
            return Err(DdError::Deserialization {
                detail: "truncated TvFunc header".into(),
            });
        }
        let nblocks = u32::from_be_bytes(buf[0..4].try_into().unwrap()) as usize;
        let n = u32::from_be_bytes(buf[4..8].try_into().unwrap()) as usize;
        if buf.len() != 8 + nblocks * 8 {
            return Err(DdError::Deserialization {
                detail: "word count does not match payload length".into(),
            });
        }
        let mut words = Vec::with_capacity(nblocks);
        for i in 0..nblocks {
            let off = 8 + i * 8;
            words.push(u64::from_be_bytes(buf[off..off + 8].try_into().unwrap()));
        }
        Ok(TvFunc { n, words })
    }

    /// Classifies `self` as an elementary gate, if it is one, after
    /// projecting down to its support (spec.md §4.6's `analyze`).
    pub fn analyze(&self) -> TvFuncKind {
        if self.count_one() == 0 {
            return TvFuncKind::Zero;
        }
        if self.count_one() == self.valid_bits() {
            return TvFuncKind::One;
        }
        let (_, reduced) = self.shrink_map();
        let sup = self.support();
        let k = sup.len();
        if k == 1 {
            return if reduced.value(1).unwrap() {
                TvFuncKind::Buffer(sup[0])
            } else {
                TvFuncKind::Not(sup[0])
            };
        }
        let ones = reduced.count_one();
        // A single true minterm is equally well described as an AND of
        // literals (true only there) or a NOR of the complementary
        // literals (also true only there) - De Morgan makes the two
        // readings the same function. Pick whichever needs fewer inverted
        // inputs, matching the original's preference for the "positive"
        // gate name when the literal polarities are ambiguous.
        if ones == 1 {
            let one_at = (0..(1usize << k)).find(|&y| reduced.value(y).unwrap()).unwrap();
            let inv_and: Vec<bool> = (0..k).map(|i| (one_at >> i) & 1 == 0).collect();
            return if inv_and.iter().filter(|&&b| b).count() * 2 <= k {
                TvFuncKind::And { vars: sup, inv: inv_and }
            } else {
                let inv_nor: Vec<bool> = (0..k).map(|i| (one_at >> i) & 1 != 0).collect();
                TvFuncKind::Nor { vars: sup, inv: inv_nor }
            };
        }
        let zeros = (1usize << k) - ones;
        // Symmetric case: a single false minterm is either an OR of
        // literals or a NAND of the complementary literals.
        if zeros == 1 {
            let zero_at = (0..(1usize << k)).find(|&y| !reduced.value(y).unwrap()).unwrap();
            let inv_or: Vec<bool> = (0..k).map(|i| (zero_at >> i) & 1 != 0).collect();
            return if inv_or.iter().filter(|&&b| b).count() * 2 <= k {
                TvFuncKind::Or { vars: sup, inv: inv_or }
            } else {
                let inv_nand: Vec<bool> = (0..k).map(|i| (zero_at >> i) & 1 == 0).collect();
                TvFuncKind::Nand { vars: sup, inv: inv_nand }
            };
        }
        for oinv in [false, true] {
            for cmask in 0..(1usize << k) {
                let is_xor = (0..(1usize << k)).all(|y| {
                    let parity = (y ^ cmask).count_ones() % 2 == 1;
                    reduced.value(y).unwrap() == (parity ^ oinv)
                });
                if is_xor {
                    let inv: Vec<bool> = (0..k).map(|i| (cmask >> i) & 1 != 0).collect();
                    return if oinv {
                        TvFuncKind::Xnor { vars: sup, inv }
                    } else {
                        TvFuncKind::Xor { vars: sup, inv }
                    };
                }
            }
        }
        TvFuncKind::Unknown
    }

    /// Prime-implicant SOP cover via iterated adjacent-cube merging
    /// (Quine-McCluskey), sorted in descending order of the cube's encoded
    /// value (spec.md §4.6's BCF).
    pub fn bcf(&self) -> Vec<Vec<(usize, bool)>> {
        // Ternary cube: `None` means "don't care" on that variable.
        type Cube = Vec<Option<bool>>;

        let mut cubes: Vec<Cube> = (0..self.valid_bits())
            .filter(|&i| self.value(i).unwrap())
            .map(|i| (0..self.n).map(|v| Some((i >> v) & 1 != 0)).collect())
            .collect();

        let mut primes: Vec<Cube> = Vec::new();
        loop {
            let mut used = vec![false; cubes.len()];
            let mut merged: Vec<Cube> = Vec::new();
            for a in 0..cubes.len() {
                for b in (a + 1)..cubes.len() {
                    if let Some(m) = merge_cubes(&cubes[a], &cubes[b]) {
                        used[a] = true;
                        used[b] = true;
                        if !merged.contains(&m) {
                            merged.push(m);
                        }
                    }
                }
            }
            for (i, cube) in cubes.iter().enumerate() {
                if !used[i] && !primes.contains(cube) {
                    primes.push(cube.clone());
                }
            }
            if merged.is_empty() {
                break;
            }
            cubes = merged;
        }

        let covers_minterm = |cube: &Cube, i: usize| -> bool {
            cube.iter()
                .enumerate()
                .all(|(v, c)| c.map_or(true, |val| val == ((i >> v) & 1 != 0)))
        };
        let minterms: Vec<usize> = (0..self.valid_bits()).filter(|&i| self.value(i).unwrap()).collect();
        let mut chosen: Vec<Cube> = Vec::new();
        let mut covered = vec![false; minterms.len()];
        for (mi, &m) in minterms.iter().enumerate() {
            if covered[mi] {
                continue;
            }
            let candidates: Vec<&Cube> = primes.iter().filter(|c| covers_minterm(c, m)).collect();
            if let Some(&best) = candidates.first() {
                if !chosen.contains(best) {
                    chosen.push(best.clone());
                }
                for (mj, &m2) in minterms.iter().enumerate() {
                    if covers_minterm(best, m2) {
                        covered[mj] = true;
                    }
                }
            }
        }

        let mut result: Vec<Vec<(usize, bool)>> = chosen
            .into_iter()
            .map(|cube| {
                cube.into_iter()
                    .enumerate()
                    .filter_map(|(v, c)| c.map(|val| (v, !val)))
                    .collect()
            })
            .collect();
        result.sort_by(|a, b| b.cmp(a));
        result
    }
}

fn merge_cubes(a: &[Option<bool>], b: &[Option<bool>]) -> Option<Vec<Option<bool>>> {
    let mut diff = None;
    let mut out = Vec::with_capacity(a.len());
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        if x == y {
            out.push(*x);
        } else if x.is_some() && y.is_some() {
            if diff.is_some() {
                return None;
            }
            diff = Some(i);
            out.push(None);
        } else {
            return None;
        }
    }
    diff.map(|_| out)
}

impl std::ops::Not for &TvFunc {
    type Output = TvFunc;
    fn not(self) -> TvFunc {
        TvFunc {
            n: self.n,
            words: self.words.iter().map(|w| !w).collect(),
        }
    }
}

impl std::ops::BitAnd for &TvFunc {
    type Output = TvFunc;
    fn bitand(self, rhs: &TvFunc) -> TvFunc {
        debug_assert_eq!(self.n, rhs.n);
        TvFunc {
            n: self.n,
            words: self.words.iter().zip(&rhs.words).map(|(a, b)| a & b).collect(),
        }
    }
}

impl std::ops::BitOr for &TvFunc {
    type Output = TvFunc;
    fn bitor(self, rhs: &TvFunc) -> TvFunc {
        debug_assert_eq!(self.n, rhs.n);
        TvFunc {
            n: self.n,
            words: self.words.iter().zip(&rhs.words).map(|(a, b)| a | b).collect(),
        }
    }
}

impl std::ops::BitXor for &TvFunc {
    type Output = TvFunc;
    fn bitxor(self, rhs: &TvFunc) -> TvFunc {
        debug_assert_eq!(self.n, rhs.n);
        TvFunc {
            n: self.n,
            words: self.words.iter().zip(&rhs.words).map(|(a, b)| a ^ b).collect(),
        }
    }
}

impl std::ops::BitAndAssign<&TvFunc> for TvFunc {
    fn bitand_assign(&mut self, rhs: &TvFunc) {
        debug_assert_eq!(self.n, rhs.n);
        for (a, b) in self.words.iter_mut().zip(&rhs.words) {
            *a &= b;
        }
    }
}

impl std::ops::BitOrAssign<&TvFunc> for TvFunc {
    fn bitor_assign(&mut self, rhs: &TvFunc) {
        debug_assert_eq!(self.n, rhs.n);
        for (a, b) in self.words.iter_mut().zip(&rhs.words) {
            *a |= b;
        }
    }
}

impl std::ops::BitXorAssign<&TvFunc> for TvFunc {
    fn bitxor_assign(&mut self, rhs: &TvFunc) {
        debug_assert_eq!(self.n, rhs.n);
        for (a, b) in self.words.iter_mut().zip(&rhs.words) {
            *a ^= b;
        }
    }
}
