// indexer.rs - Capture renumbering and backreference resolution.
//
// The parser numbers groups in the order they close. `reindex` renumbers
// them in the order they open, which is the numbering users see: 1 for the
// leftmost '(' and so on, outer before inner at the same position.

use crate::ast::{Node, Reference};

/// Renumbers captures from 1 in left-to-right order of their opening
/// delimiter.
pub fn reindex(node: Node) -> Node {
    assign(node, 1)
}

/// `base` is the id the first capture in `node` receives. Children of
/// sequences and alternations get consecutive ranges computed from the
/// capture counts of their left siblings.
fn assign(node: Node, base: usize) -> Node {
    match node {
        Node::Capture { name, inner, .. } => Node::capture(base, name, assign(*inner, base + 1)),
        Node::Sequence { items, .. } => Node::sequence(thread(items, base)),
        Node::Alternation { branches, .. } => Node::alternation(thread(branches, base)),
        other => other.map_children(&mut |child| assign(child, base)),
    }
}

fn thread(children: Vec<Node>, base: usize) -> Vec<Node> {
    let mut next = base;
    children
        .into_iter()
        .map(|child| {
            let count = child.capture_count();
            let child = assign(child, next);
            next += count;
            child
        })
        .collect()
}

/// Group names indexed by capture id; slot 0 (the whole match) is unnamed.
pub fn capture_names(node: &Node) -> Vec<Option<String>> {
    let mut names = vec![None; node.capture_count() + 1];
    collect_names(node, &mut names);
    names
}

fn collect_names(node: &Node, names: &mut [Option<String>]) {
    match node {
        Node::Capture { id, name, inner, .. } => {
            if let Some(slot) = names.get_mut(*id) {
                slot.clone_from(name);
            }
            collect_names(inner, names);
        }
        Node::Sequence { items: children, .. } | Node::Alternation { branches: children, .. } => {
            for child in children {
                collect_names(child, names);
            }
        }
        Node::Repeat(rep) => collect_names(&rep.inner, names),
        Node::Lookaround { inner, .. } => collect_names(inner, names),
        _ => {}
    }
}

/// Turns named backreferences into numbered ones (first group with that
/// name) and replaces references to groups that do not exist with `Fail`.
pub fn resolve_references(node: Node) -> Node {
    let names = capture_names(&node);
    resolve(node, &names)
}

fn resolve(node: Node, names: &[Option<String>]) -> Node {
    match node {
        Node::Backref(Reference::Name(name)) => {
            match names.iter().position(|n| n.as_deref() == Some(name.as_str())) {
                Some(id) => Node::Backref(Reference::Index(id)),
                None => Node::Backref(Reference::Name(name)),
            }
        }
        Node::Backref(Reference::Index(id)) if id == 0 || id >= names.len() => Node::Fail,
        other => other.map_children(&mut |child| resolve(child, names)),
    }
}
