use crate::common::{Level, NodeId};
use crate::edge::EdgeRef;

/// An immutable decision node: `{level, edge0, edge1, ref_count}`, plus the
/// intrusive hash-chain link its owning `LevelTable` uses for bucket
/// chaining (`examples/original_source/.../DdNode.h`'s `mLink`).
///
/// Reduction (dropping a node whose children coincide, or — for BDDs —
/// normalising which child carries the complement) happens in the
/// `BddManager`/`ZddManager` layer *before* a node is constructed; by the
/// time a `DdNode` exists, both `edge0 != edge1` and the layer's own
/// extra rule already hold (spec.md §3).
#[derive(Debug)]
pub struct DdNode {
    pub level: Level,
    pub edge0: EdgeRef,
    pub edge1: EdgeRef,
    pub ref_count: u32,
    pub link: Option<NodeId>,
}

impl DdNode {
    pub fn new(level: Level, edge0: EdgeRef, edge1: EdgeRef) -> Self {
        Self {
            level,
            edge0,
            edge1,
            ref_count: 0,
            link: None,
        }
    }

    /// Combines `level`, `edge0.hash() * 13`, `edge1.hash() * 17` —
    /// matching `DdNode::hash()` in the original C++ source.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.level as u64 + self.edge0.hash() * 13 + self.edge1.hash() * 17
    }

    #[inline]
    pub fn matches(&self, level: Level, edge0: EdgeRef, edge1: EdgeRef) -> bool {
        self.level == level && self.edge0 == edge0 && self.edge1 == edge1
    }
}
