use crate::common::{DdHashMap, DdHashSet, NodeId};
use std::io::{BufWriter, Write};

/// Rendering knobs for `gen_dot`: free-form graph/node attributes plus
/// per-variable display labels (spec.md §4.1's `Dot` export surface).
/// Parsing these out of an on-disk JSON/YAML config is explicitly out of
/// scope (spec.md §4.1 Non-goals); callers build this struct themselves.
#[derive(Debug, Clone, Default)]
pub struct GenDotOptions {
    pub attr: DdHashMap<String, String>,
    pub var_label: Vec<String>,
    pub var_texlbl: Vec<String>,
}

impl GenDotOptions {
    pub fn var_label(&self, varid: usize) -> String {
        self.var_label
            .get(varid)
            .cloned()
            .unwrap_or_else(|| format!("x{varid}"))
    }
}

pub trait Dot {
    type Root;

    fn dot<T: Write>(&self, io: &mut T, roots: &[Self::Root], options: &GenDotOptions) {
        io.write_all(b"digraph {\nlayout=dot; overlap=false; splines=true; node [fontsize=10];\n")
            .unwrap();
        for (k, v) in &options.attr {
            writeln!(io, "{k}={v};").unwrap();
        }
        let mut visited: DdHashSet<NodeId> = DdHashSet::default();
        for root in roots {
            self.dot_impl(io, root, &mut visited, options);
        }
        io.write_all(b"}\n").unwrap();
    }

    fn dot_string(&self, roots: &[Self::Root], options: &GenDotOptions) -> String {
        let mut buf = Vec::new();
        {
            let mut io = BufWriter::new(&mut buf);
            self.dot(&mut io, roots, options);
        }
        String::from_utf8(buf).unwrap()
    }

    fn dot_impl<T: Write>(
        &self,
        io: &mut T,
        root: &Self::Root,
        visited: &mut DdHashSet<NodeId>,
        options: &GenDotOptions,
    );
}
