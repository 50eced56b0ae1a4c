use ddcommon::prelude::EdgeRef;

/// Memo key for a commutative binary Apply (`and`/`xor`): operands are
/// stored in a fixed order so `and(f, g)` and `and(g, f)` hit the same
/// cache slot. One of these maps is created fresh per top-level call and
/// discarded when it returns (spec.md §4.5) — `BddManager` never keeps a
/// persistent cache field the way the teacher's `bdd_ops.rs` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Apply2Key(EdgeRef, EdgeRef);

impl Apply2Key {
    pub fn canonical(a: EdgeRef, b: EdgeRef) -> Self {
        if a.body() <= b.body() {
            Apply2Key(a, b)
        } else {
            Apply2Key(b, a)
        }
    }
}

/// Memo key for the ternary `ite` Apply (spec.md §4.3, §4.5). `ite(f, g, h)`
/// has two equivalent rewrites that should share a cache slot: flipping `f`
/// swaps the two non-condition operands (`ite(f, g, h) == ite(!f, h, g)`),
/// and a complemented `g` can be factored into an output-complement flag
/// (`ite(f, g, h) == !ite(f, !g, !h)`). `canonical` performs both foldings
/// Brace/Madre-style and hands back the flag the caller must XOR onto
/// whatever the recursion produces for this key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Apply3Key(pub(crate) EdgeRef, pub(crate) EdgeRef, pub(crate) EdgeRef);

impl Apply3Key {
    pub fn canonical(mut f: EdgeRef, mut g: EdgeRef, mut h: EdgeRef) -> (Self, bool) {
        let out_inv = g.is_complemented();
        if out_inv {
            g = !g;
            h = !h;
        }
        if g.body() > h.body() {
            std::mem::swap(&mut g, &mut h);
            f = !f;
        }
        (Apply3Key(f, g, h), out_inv)
    }
}
