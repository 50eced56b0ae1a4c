use std::io::Write;

use ddcommon::dot::{Dot, GenDotOptions};
use ddcommon::prelude::*;

use crate::manager::ZddManager;

impl Dot for ZddManager {
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
        let target = self.dot_target(root);
        writeln!(io, "root_{} [shape=plaintext, label=\"\"];", root.body()).unwrap();
        writeln!(io, "root_{} -> {target};", root.body()).unwrap();
    }
}

impl ZddManager {
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
                let sentinel = if edge == self.zero() { usize::MAX } else { usize::MAX - 1 };
                if visited.insert(sentinel) {
                    let label = if edge == self.zero() { "0" } else { "1" };
                    writeln!(io, "{} [shape=box, label=\"{label}\"];", self.dot_target(edge)).unwrap();
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
        writeln!(io, "n{id} -> {} [style=dashed, label=\"0\"];", self.dot_target(edge0)).unwrap();
        writeln!(io, "n{id} -> {} [style=solid, label=\"1\"];", self.dot_target(edge1)).unwrap();
    }

    fn dot_target(&self, edge: EdgeRef) -> String {
        match edge.node() {
            Some(id) => format!("n{id}"),
            None if edge == self.zero() => "zero".to_string(),
            None => "one".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_string_mentions_every_variable() {
        let mut dd = ZddManager::new();
        let v0 = dd.new_variable();
        let v1 = dd.new_variable();
        let f = dd.make_set(&[v0, v1]).unwrap();
        let options = GenDotOptions::default();
        let text = dd.dot_string(&[f], &options);
        assert!(text.starts_with("digraph {"));
        assert!(text.contains("x0"));
        assert!(text.contains("x1"));
        assert!(text.contains("label=\"1\""));
    }
}
