// invert.rs - Mirrored ASTs for lookbehind.
//
// A lookbehind body is matched by walking the subject backwards from the
// current position. `invert` mirrors a tree so the ordinary forward logic
// does that: sequences run last item first, everything else keeps its
// shape. `resolve_lookbehind` applies it once per lookbehind at compile
// time; the engine never inverts anything while matching.
//
// Orientation rule: a `Look::Behind` body is always stored already mirrored
// relative to the tree that contains it and is evaluated in the direction
// opposite to the current one. Mirroring the containing tree therefore only
// flips Ahead/Behind on lookarounds and leaves their bodies alone.

use crate::ast::{Look, Node};

pub fn invert(node: Node) -> Node {
    match node {
        Node::Sequence { items, .. } => Node::sequence(items.into_iter().rev().map(invert).collect()),
        Node::Lookaround { look, negated, inner, .. } => {
            Node::lookaround(look.flip(), negated, *inner)
        }
        other => other.map_children(&mut invert),
    }
}

/// Replaces every lookbehind body with its mirrored form. Must run after
/// capture indexing so group ids follow the pattern text.
pub fn resolve_lookbehind(node: Node) -> Node {
    match node {
        Node::Lookaround { look: Look::Behind, negated, inner, .. } => {
            Node::lookaround(Look::Behind, negated, invert(resolve_lookbehind(*inner)))
        }
        other => other.map_children(&mut resolve_lookbehind),
    }
}
