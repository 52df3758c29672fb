// compile.rs - Pattern text to executable program.
//
// parse -> reindex -> resolve references -> mirror lookbehinds -> (unroll)
// -> prefilter. The union builder runs the first three steps per
// sub-pattern and joins the trees before finishing them together.

use crate::ast::Node;
use crate::error::RegexError;
use crate::exec::Prefilter;
use crate::indexer::{capture_names, reindex, resolve_references};
use crate::invert::resolve_lookbehind;
use crate::options::Flags;
use crate::parser::parse;

/// A compiled pattern. Immutable; shared by every match call.
#[derive(Clone, Debug)]
pub(crate) struct Program {
    pub(crate) root: Node,
    /// Number of capture groups, excluding the whole match.
    pub(crate) captures: usize,
    /// Group names by id; index 0 is always `None`.
    pub(crate) names: Vec<Option<String>>,
    pub(crate) prefilter: Option<Prefilter>,
    pub(crate) flags: Flags,
}

pub(crate) fn compile(pattern: &str, flags: Flags) -> Result<Program, RegexError> {
    Ok(finish(front(pattern)?, flags))
}

/// Parses and numbers one pattern. References are resolved against this
/// pattern's own groups.
pub(crate) fn front(pattern: &str) -> Result<Node, RegexError> {
    Ok(resolve_references(reindex(parse(pattern)?)))
}

pub(crate) fn finish(root: Node, flags: Flags) -> Program {
    let names = capture_names(&root);
    let mut root = resolve_lookbehind(root);
    if flags.contains(Flags::UNROLL) {
        root = root.unroll();
    }
    let prefilter = root.leading_byte().and_then(|byte| Prefilter::new(byte, flags));
    let captures = root.capture_count();
    log_debug!(
        "compiled pattern: {} capture(s), flags {:?}, prefilter {:?}",
        captures,
        flags,
        prefilter
    );
    Program { root, captures, names, prefilter, flags }
}
