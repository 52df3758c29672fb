// union.rs - Alternation of independently written patterns.
//
// Each sub-pattern is parsed and numbered on its own, so `\1` in the second
// pattern still means that pattern's first group. Its groups and numeric
// backreferences are then shifted past the groups of the patterns before
// it and the trees are joined into one alternation, tried in order.

use crate::api::{Regex, RegexBuilder};
use crate::ast::{Node, Reference};
use crate::compile::{finish, front};
use crate::error::RegexError;
use crate::options::Flags;

const SEPARATOR: &str = "|";

impl Regex {
    /// Compile the alternation of `patterns` with no flags set.
    ///
    /// Group ids run on from one pattern to the next; backreferences and
    /// `\k<name>` only see groups of their own pattern. Syntax error
    /// positions are offsets into [`as_str`](Regex::as_str), the patterns
    /// joined with `|`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cpsre::api::Regex;
    ///
    /// let re = Regex::union(&[r"(\w)\1", r"(\d)-\1"]).unwrap();
    /// assert_eq!(re.captures_len(), 2);
    /// let caps = re.captures("7-7").unwrap();
    /// assert!(caps.get(1).is_none());
    /// assert_eq!(&caps[2], "7");
    /// ```
    pub fn union(patterns: &[&str]) -> Result<Regex, RegexError> {
        union(patterns, Flags::empty())
    }
}

impl RegexBuilder {
    /// Compile the builder's pattern followed by `others` as one union (see
    /// [`Regex::union`]), using the builder's flags.
    pub fn build_union(self, others: &[&str]) -> Result<Regex, RegexError> {
        let mut patterns = Vec::with_capacity(others.len() + 1);
        patterns.push(self.pattern.as_str());
        patterns.extend_from_slice(others);
        union(&patterns, self.flags)
    }
}

fn union(patterns: &[&str], flags: Flags) -> Result<Regex, RegexError> {
    let mut branches = Vec::with_capacity(patterns.len());
    let mut offset = 0;
    let mut position = 0;
    for pattern in patterns {
        let node = front(pattern).map_err(|err| RegexError::Syntax {
            position: position + err.position(),
        })?;
        let count = node.capture_count();
        branches.push(shift(node, offset));
        offset += count;
        position += pattern.len() + SEPARATOR.len();
    }
    let program = finish(Node::alternation(branches), flags);
    Ok(Regex { pattern: patterns.join(SEPARATOR), program })
}

/// Adds `offset` to every capture id and numeric backreference.
fn shift(node: Node, offset: usize) -> Node {
    if offset == 0 {
        return node;
    }
    match node {
        Node::Capture { id, name, inner, .. } => Node::capture(id + offset, name, shift(*inner, offset)),
        Node::Backref(Reference::Index(id)) => Node::Backref(Reference::Index(id + offset)),
        other => other.map_children(&mut |child| shift(child, offset)),
    }
}
