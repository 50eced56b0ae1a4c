use std::io::Write;

use ddcommon::dot::{Dot, GenDotOptions};
use ddcommon::prelude::*;

use crate::manager::BddManager;

const TERMINAL_SENTINEL: NodeId = usize::MAX;

impl Dot for BddManager {
    type Root = EdgeRef;

    fn dot_impl<T: Write>(
        &self,
        io: &mut T,
        root: &EdgeRef,
        visited: &mut DdHashSet<NodeId>,
        options: &GenDotOptions,
    ) {
        let root = *root;
        self.dot_terminal_or_node(io, root, visited, options);
        let (target, style) = self.dot_target(root);
        writeln!(io, "root_{} [shape=plaintext, label=\"\"];", root.body()).unwrap();
        writeln!(io, "root_{} -> {target} [style={style}];", root.body()).unwrap();
    }
}

impl BddManager {
    fn dot_terminal_or_node<T: Write>(
        &self,
        io: &mut T,
        edge: EdgeRef,
        visited: &mut DdHashSet<NodeId>,
        options: &GenDotOptions,
    ) {
        match edge.node() {
            Some(id) => self.dot_node(io, id, visited, options),
            None => {
                if visited.insert(TERMINAL_SENTINEL) {
                    writeln!(io, "one [shape=box, label=\"1\"];").unwrap();
                }
            }
        }
    }

    fn dot_node<T: Write>(&self, io: &mut T, id: NodeId, visited: &mut DdHashSet<NodeId>, options: &GenDotOptions) {
        if !visited.insert(id) {
            return;
        }
        let edge = EdgeRef::from_node(id, false);
        let node = self.mgr.node(edge).unwrap();
        let varid = self.mgr.level_to_varid(node.level).unwrap();
        writeln!(io, "n{id} [shape=circle, label=\"{}\"];", options.var_label(varid)).unwrap();

        let (edge0, edge1) = (node.edge0, node.edge1);
        self.dot_terminal_or_node(io, edge0, visited, options);
        self.dot_terminal_or_node(io, edge1, visited, options);

        let (t0, s0) = self.dot_target(edge0);
        let (t1, s1) = self.dot_target(edge1);
        writeln!(io, "n{id} -> {t0} [style={s0}, label=\"0\"];").unwrap();
        writeln!(io, "n{id} -> {t1} [style={s1}, label=\"1\"];").unwrap();
    }

    /// `(dot node name, edge style)` for `edge` — complemented edges are
    /// drawn dashed, matching the teacher's convention for marking an
    /// inverted pointer.
    fn dot_target(&self, edge: EdgeRef) -> (String, &'static str) {
        let style = if edge.is_complemented() { "dashed" } else { "solid" };
        let target = match edge.node() {
            Some(id) => format!("n{id}"),
            None => "one".to_string(),
        };
        (target, style)
    }
}
