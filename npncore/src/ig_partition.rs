use ddcommon::prelude::*;

use crate::input_info::InputInfo;
use crate::pol_conf::PolConf;

/// An ordered partition of the input groups discovered by [`InputInfo`].
/// Groups within the same block are not yet known to be the "correct"
/// choice for their slot; groups in different blocks have already been
/// separated by some refinement criterion. The search in
/// [`crate::engine::NpnEngine`] narrows blocks down to singletons one
/// variable at a time (grounded on `original_source/c++-src/npn/IgPartition.h`
/// and `original_source/src/npn/IgPartition.cc`).
#[derive(Debug, Clone)]
pub struct IgPartition {
    groups: Vec<usize>,
    bounds: Vec<usize>,
}

impl IgPartition {
    pub fn new(info: &InputInfo) -> Self {
        let n = info.group_num();
        let mut part = IgPartition { groups: (0..n).collect(), bounds: vec![0, n] };
        if n > 0 {
            part.refine(0, |gid| (info.w1(gid), info.bisym(gid) as u8));
        }
        part
    }

    pub fn partition_num(&self) -> usize {
        self.bounds.len() - 1
    }

    pub fn partition_begin(&self, pid: usize) -> usize {
        self.bounds[pid]
    }

    pub fn partition_end(&self, pid: usize) -> usize {
        self.bounds[pid + 1]
    }

    pub fn partition_size(&self, pid: usize) -> usize {
        self.partition_end(pid) - self.partition_begin(pid)
    }

    pub fn is_resolved_block(&self, pid: usize) -> bool {
        self.partition_size(pid) == 1
    }

    pub fn is_resolved(&self) -> bool {
        (0..self.partition_num()).all(|pid| self.is_resolved_block(pid))
    }

    pub fn group_id(&self, pos: usize) -> usize {
        self.groups[pos]
    }

    pub fn group_num(&self) -> usize {
        self.groups.len()
    }

    /// Stable-sorts block `pid`'s elements descending by `key`, splitting
    /// runs of equal key into their own blocks. Returns the number of new
    /// blocks created, so a caller iterating partitions by index can skip
    /// past them.
    pub fn refine<K, F>(&mut self, pid: usize, key: F) -> usize
    where
        K: Ord,
        F: Fn(usize) -> K,
    {
        let begin = self.bounds[pid];
        let end = self.bounds[pid + 1];
        let mut slice: Vec<usize> = self.groups[begin..end].to_vec();
        slice.sort_by(|&a, &b| key(b).cmp(&key(a)));
        self.groups[begin..end].copy_from_slice(&slice);

        let mut run_ends = Vec::new();
        let mut i = begin;
        while i < end {
            let mut j = i + 1;
            while j < end && key(self.groups[j]) == key(self.groups[i]) {
                j += 1;
            }
            run_ends.push(j);
            i = j;
        }
        let delta = run_ends.len() - 1;
        self.bounds.splice(pid + 1..pid + 1, run_ends[..delta].iter().copied());
        delta
    }

    /// Moves every already-resolved (singleton) block ahead of the
    /// unresolved ones, preserving relative order within each group.
    pub fn reorder(&mut self) {
        let mut order: Vec<usize> = (0..self.partition_num()).collect();
        order.sort_by_key(|&pid| if self.partition_size(pid) == 1 { 0 } else { 1 });

        let mut new_groups = Vec::with_capacity(self.groups.len());
        let mut new_bounds = vec![0];
        for pid in order {
            new_groups.extend_from_slice(&self.groups[self.partition_begin(pid)..self.partition_end(pid)]);
            new_bounds.push(new_groups.len());
        }
        self.groups = new_groups;
        self.bounds = new_bounds;
    }

    /// Pulls the element at `pos` (within block `pid`) out into its own
    /// singleton block immediately preceding the remainder of `pid`.
    pub fn extract(&mut self, pid: usize, pos: usize) {
        let begin = self.bounds[pid];
        let gid = self.groups.remove(pos);
        self.groups.insert(begin, gid);
        self.bounds.insert(pid + 1, begin + 1);
    }

    /// Converts the current group order into a full `NpnMap` over `n`
    /// inputs: groups are expanded in partition order, members of a group
    /// in their original relative order, each complemented per `polconf`.
    pub fn to_npnmap(&self, info: &InputInfo, n: usize, polconf: &PolConf) -> NpnMap {
        let mut map = NpnMap::identity(n);
        map.set_output_inv(polconf.oinv());
        let mut dst = 0usize;
        for pos in 0..self.group_num() {
            let gid = self.group_id(pos);
            for j in 0..info.elem_num(gid) {
                let src = info.elem(gid, j);
                map.set_input(src, Some(dst), polconf.iinv(src));
                dst += 1;
            }
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iinfo_three_equal() -> InputInfo {
        let mut info = InputInfo::new();
        info.new_group(0, 3);
        info.new_group(1, 3);
        info.new_group(2, 1);
        info
    }

    #[test]
    fn initial_partition_orders_by_w1_descending() {
        let info = iinfo_three_equal();
        let part = IgPartition::new(&info);
        assert_eq!(part.partition_num(), 2);
        assert_eq!(part.partition_size(0), 2);
        assert_eq!(part.partition_size(1), 1);
        assert_eq!(part.group_id(part.partition_begin(1)), 2);
    }

    #[test]
    fn extract_then_resolved_narrows_block() {
        let info = iinfo_three_equal();
        let mut part = IgPartition::new(&info);
        assert!(!part.is_resolved());
        part.extract(0, 0);
        assert!(part.is_resolved_block(0));
        assert_eq!(part.partition_num(), 3);
    }

    #[test]
    fn reorder_moves_singletons_first() {
        let info = iinfo_three_equal();
        let mut part = IgPartition::new(&info);
        part.extract(0, 1);
        part.reorder();
        assert!(part.is_resolved_block(0));
        assert!(part.is_resolved_block(1));
        assert!(!part.is_resolved_block(2));
    }

    #[test]
    fn to_npnmap_expands_groups_in_order() {
        let mut info = InputInfo::new();
        info.new_group(0, 1);
        info.add_elem(0, 1);
        let part = IgPartition::new(&info);
        let map = part.to_npnmap(&info, 2, &PolConf::identity());
        assert_eq!(map.input_map(0), (Some(0), false));
        assert_eq!(map.input_map(1), (Some(1), false));
    }
}
