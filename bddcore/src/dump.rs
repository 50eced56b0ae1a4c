use ddcommon::prelude::*;

use crate::manager::BddManager;

const SIGNATURE: &[u8] = b"ym_bdd1.0";

fn write_uvarint(buf: &mut Vec<u8>, mut v: u64) {
    loop {
        let byte = (v & 0x7f) as u8;
        v >>= 7;
        if v != 0 {
            buf.push(byte | 0x80);
        } else {
            buf.push(byte);
            break;
        }
    }
}

fn read_uvarint(bytes: &[u8], pos: &mut usize) -> DdResult<u64> {
    let mut result = 0u64;
    let mut shift = 0;
    loop {
        let byte = *bytes.get(*pos).ok_or_else(|| DdError::Deserialization {
            detail: "truncated varint".into(),
        })?;
        *pos += 1;
        result |= ((byte & 0x7f) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}

fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

fn zigzag_decode(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

fn write_svarint(buf: &mut Vec<u8>, v: i64) {
    write_uvarint(buf, zigzag_encode(v));
}

fn read_svarint(bytes: &[u8], pos: &mut usize) -> DdResult<i64> {
    Ok(zigzag_decode(read_uvarint(bytes, pos)?))
}

impl BddManager {
    /// Dumps `roots` as `ym_bdd1.0`: signature, root count, root edges, then
    /// one `(index, level, edge0, edge1)` record per reachable node in
    /// dependency order (children before parents), terminated by a
    /// `(0, 0, 0)` sentinel. Edges are encoded as a signed delta from the
    /// record that refers to them, with the complement bit in the low bit
    /// (spec.md §6) — node `0` is reserved for the `one` terminal, so a
    /// delta of `0` with the complement bit set denotes `zero`.
    pub fn dump(&self, roots: &[EdgeRef]) -> Vec<u8> {
        let mut index_of: DdHashMap<NodeId, u64> = DdHashMap::default();
        let mut order: Vec<NodeId> = Vec::new();
        for &root in roots {
            self.collect_dump_order(root, &mut index_of, &mut order);
        }

        let mut buf = Vec::new();
        buf.extend_from_slice(SIGNATURE);
        write_uvarint(&mut buf, roots.len() as u64);
        for &root in roots {
            let encoded = self.encode_dump_edge(root, &index_of, 0);
            write_svarint(&mut buf, encoded);
        }
        for (i, &id) in order.iter().enumerate() {
            let my_index = (i + 1) as u64;
            let node = self.mgr.node(EdgeRef::from_node(id, false)).unwrap();
            write_uvarint(&mut buf, my_index);
            write_uvarint(&mut buf, node.level as u64);
            write_svarint(&mut buf, self.encode_dump_edge(node.edge0, &index_of, my_index));
            write_svarint(&mut buf, self.encode_dump_edge(node.edge1, &index_of, my_index));
        }
        write_uvarint(&mut buf, 0);
        write_uvarint(&mut buf, 0);
        write_uvarint(&mut buf, 0);
        buf
    }

    fn collect_dump_order(&self, edge: EdgeRef, index_of: &mut DdHashMap<NodeId, u64>, order: &mut Vec<NodeId>) {
        let Some(id) = edge.node() else { return };
        if index_of.contains_key(&id) {
            return;
        }
        let node = self.mgr.node(EdgeRef::from_node(id, false)).unwrap();
        let (e0, e1) = (node.edge0, node.edge1);
        self.collect_dump_order(e0, index_of, order);
        self.collect_dump_order(e1, index_of, order);
        index_of.insert(id, order.len() as u64 + 1);
        order.push(id);
    }

    fn encode_dump_edge(&self, edge: EdgeRef, index_of: &DdHashMap<NodeId, u64>, current_index: u64) -> i64 {
        let target = match edge.node() {
            Some(id) => index_of[&id],
            None => 0,
        };
        let delta = target as i64 - current_index as i64;
        (delta << 1) | (edge.is_complemented() as i64)
    }

    /// Rebuilds the BDDs dumped by `dump`, returning the roots in the order
    /// they were written.
    pub fn restore(&mut self, bytes: &[u8]) -> DdResult<Vec<EdgeRef>> {
        let mut pos = 0usize;
        if bytes.len() < SIGNATURE.len() || &bytes[..SIGNATURE.len()] != SIGNATURE {
            return Err(DdError::Deserialization {
                detail: "bad BDD dump signature".into(),
            });
        }
        pos += SIGNATURE.len();

        let root_count = read_uvarint(bytes, &mut pos)?;
        let mut raw_roots = Vec::with_capacity(root_count as usize);
        for _ in 0..root_count {
            raw_roots.push(read_svarint(bytes, &mut pos)?);
        }

        let mut index_to_edge: DdHashMap<u64, EdgeRef> = DdHashMap::default();
        index_to_edge.insert(0, self.one());
        loop {
            let index = read_uvarint(bytes, &mut pos)?;
            if index == 0 {
                let _ = read_uvarint(bytes, &mut pos)?;
                let _ = read_uvarint(bytes, &mut pos)?;
                break;
            }
            let level = read_uvarint(bytes, &mut pos)? as usize;
            let raw0 = read_svarint(bytes, &mut pos)?;
            let raw1 = read_svarint(bytes, &mut pos)?;
            let e0 = Self::decode_dump_edge(raw0, index, &index_to_edge)?;
            let e1 = Self::decode_dump_edge(raw1, index, &index_to_edge)?;
            let edge = self.make_node(level, e0, e1)?;
            index_to_edge.insert(index, edge);
        }

        raw_roots
            .into_iter()
            .map(|raw| Self::decode_dump_edge(raw, 0, &index_to_edge))
            .collect()
    }

    fn decode_dump_edge(raw: i64, current_index: u64, index_to_edge: &DdHashMap<u64, EdgeRef>) -> DdResult<EdgeRef> {
        let compl = (raw & 1) != 0;
        let delta = raw >> 1;
        let target = current_index as i64 + delta;
        if target < 0 {
            return Err(DdError::Deserialization {
                detail: "edge reference out of range".into(),
            });
        }
        let base = *index_to_edge.get(&(target as u64)).ok_or(DdError::Deserialization {
            detail: "edge reference to an unseen node".into(),
        })?;
        Ok(base ^ compl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_restore_round_trips() {
        let mut src = BddManager::new();
        let v0 = src.new_variable();
        let v1 = src.new_variable();
        let x0 = src.ithvar(v0, false).unwrap();
        let x1 = src.ithvar(v1, false).unwrap();
        let f = src.and(x0, x1).unwrap();
        let g = src.or(x0, x1).unwrap();

        let bytes = src.dump(&[f, g]);

        let mut dst = BddManager::new();
        dst.new_variable();
        dst.new_variable();
        let roots = dst.restore(&bytes).unwrap();
        assert_eq!(roots.len(), 2);
        for a in [false, true] {
            for b in [false, true] {
                assert_eq!(
                    src.eval(f, &[a, b]).unwrap(),
                    dst.eval(roots[0], &[a, b]).unwrap()
                );
                assert_eq!(
                    src.eval(g, &[a, b]).unwrap(),
                    dst.eval(roots[1], &[a, b]).unwrap()
                );
            }
        }
    }
}
