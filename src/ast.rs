// ast.rs - Pattern AST.
//
// Nodes are immutable once the pattern is compiled; all mutable match
// state lives in `exec::MatchContext`. Composite nodes cache the number of
// capture groups in their subtree so the engine never has to walk a subtree
// to size slot storage or decide whether a failed branch needs cleanup.

use crate::chars::{eq_ignore_case, is_digit, is_line_terminator, is_space, is_word,
    range_contains_ignore_case};
use crate::options::Flags;

/// Bounded repetitions of a single-unit atom with at most this many mandatory
/// copies are expanded by [`Node::unroll`].
pub const UNROLL_LIMIT: u32 = 16;

/// Largest accepted `{m,n}` bound.
pub const MAX_REPEAT: u32 = 100_000;

// === Leaf kinds ===

/// Shorthand character classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassKind {
    Digit,
    NotDigit,
    Word,
    NotWord,
    Space,
    NotSpace,
}

impl ClassKind {
    #[inline]
    pub fn matches(self, c: char) -> bool {
        match self {
            ClassKind::Digit => is_digit(c),
            ClassKind::NotDigit => !is_digit(c),
            ClassKind::Word => is_word(c),
            ClassKind::NotWord => !is_word(c),
            ClassKind::Space => is_space(c),
            ClassKind::NotSpace => !is_space(c),
        }
    }
}

/// Zero-width positional assertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorKind {
    /// `^`: start of text, or after a line terminator in multiline mode.
    LineStart,
    /// `$`: end of text, or before a line terminator in multiline mode.
    LineEnd,
    /// `\A`
    TextStart,
    /// `\z`
    TextEnd,
    /// `\b`
    WordBoundary,
    /// `\B`
    NotWordBoundary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Look {
    Ahead,
    Behind,
}

impl Look {
    pub fn flip(self) -> Look {
        match self {
            Look::Ahead => Look::Behind,
            Look::Behind => Look::Ahead,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepeatMode {
    Greedy,
    Lazy,
    Possessive,
}

/// Target of a backreference. Names are resolved to indices after capture
/// indexing; a name that stays unresolved never matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reference {
    Index(usize),
    Name(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repeat {
    pub min: u32,
    /// `None` is unbounded.
    pub max: Option<u32>,
    pub mode: RepeatMode,
    pub inner: Node,
    captures: usize,
}

impl Repeat {
    pub fn allows(&self, count: u32) -> bool {
        self.max.map_or(true, |max| count < max)
    }
}

// === Node ===

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Matches the empty string.
    Empty,
    /// Never matches.
    Fail,
    Literal(char),
    /// `.`
    Any,
    Class(ClassKind),
    Range(char, char),
    /// `[...]`: a disjunction of single-unit nodes.
    Set { negated: bool, items: Vec<Node> },
    Sequence { items: Vec<Node>, captures: usize },
    Alternation { branches: Vec<Node>, captures: usize },
    Repeat(Box<Repeat>),
    Capture { id: usize, name: Option<String>, inner: Box<Node>, captures: usize },
    /// For `Look::Behind` the body is stored mirrored (see `invert`).
    Lookaround { look: Look, negated: bool, inner: Box<Node>, captures: usize },
    Backref(Reference),
    Anchor(AnchorKind),
}

impl Node {
    /// Builds a sequence, collapsing the zero- and one-element cases.
    pub fn sequence(mut items: Vec<Node>) -> Node {
        match items.len() {
            0 => Node::Empty,
            1 => items.pop().unwrap_or(Node::Empty),
            _ => {
                let captures = items.iter().map(Node::capture_count).sum();
                Node::Sequence { items, captures }
            }
        }
    }

    /// Builds an alternation, collapsing the zero- and one-branch cases.
    /// Branches that each match exactly one unit merge into a single set.
    pub fn alternation(mut branches: Vec<Node>) -> Node {
        match branches.len() {
            0 => Node::Fail,
            1 => branches.pop().unwrap_or(Node::Fail),
            _ if branches.iter().all(Node::is_trivial) => {
                let mut items = Vec::with_capacity(branches.len());
                for branch in branches {
                    match branch {
                        Node::Set { negated: false, items: inner } => items.extend(inner),
                        other => items.push(other),
                    }
                }
                Node::Set { negated: false, items }
            }
            _ => {
                let captures = branches.iter().map(Node::capture_count).sum();
                Node::Alternation { branches, captures }
            }
        }
    }

    pub fn repeat(min: u32, max: Option<u32>, mode: RepeatMode, inner: Node) -> Node {
        let captures = inner.capture_count();
        Node::Repeat(Box::new(Repeat { min, max, mode, inner, captures }))
    }

    pub fn capture(id: usize, name: Option<String>, inner: Node) -> Node {
        let captures = inner.capture_count() + 1;
        Node::Capture { id, name, inner: Box::new(inner), captures }
    }

    pub fn lookaround(look: Look, negated: bool, inner: Node) -> Node {
        let captures = inner.capture_count();
        Node::Lookaround { look, negated, inner: Box::new(inner), captures }
    }

    /// Number of capture groups in this subtree, the node itself included.
    pub fn capture_count(&self) -> usize {
        match self {
            Node::Sequence { captures, .. }
            | Node::Alternation { captures, .. }
            | Node::Capture { captures, .. }
            | Node::Lookaround { captures, .. } => *captures,
            Node::Repeat(rep) => rep.captures,
            _ => 0,
        }
    }

    /// True for nodes that consume exactly one unit and have no side effects.
    #[inline]
    pub fn is_trivial(&self) -> bool {
        matches!(
            self,
            Node::Literal(_) | Node::Any | Node::Class(_) | Node::Range(..) | Node::Set { .. }
        )
    }

    /// True when every way of matching this node consumes nothing.
    pub fn is_zero_width(&self) -> bool {
        match self {
            Node::Empty | Node::Fail | Node::Anchor(_) | Node::Lookaround { .. } => true,
            Node::Sequence { items: children, .. } | Node::Alternation { branches: children, .. } => {
                children.iter().all(Node::is_zero_width)
            }
            Node::Capture { inner, .. } => inner.is_zero_width(),
            Node::Repeat(rep) => rep.max == Some(0) || rep.inner.is_zero_width(),
            _ => false,
        }
    }

    /// Tests one unit against a single-unit node. Always false for any
    /// other node kind.
    pub fn matches_char(&self, c: char, flags: Flags) -> bool {
        let icase = flags.contains(Flags::CASE_INSENSITIVE);
        match self {
            Node::Literal(l) => *l == c || (icase && eq_ignore_case(*l, c)),
            Node::Any => flags.contains(Flags::DOT_ALL) || !is_line_terminator(c),
            Node::Class(kind) => kind.matches(c),
            Node::Range(lo, hi) => {
                (*lo <= c && c <= *hi) || (icase && range_contains_ignore_case(*lo, *hi, c))
            }
            Node::Set { negated, items } => {
                items.iter().any(|item| item.matches_char(c, flags)) != *negated
            }
            _ => false,
        }
    }

    /// Rebuilds this node with `f` applied to each direct child. Leaves and
    /// sets are returned unchanged.
    pub fn map_children(self, f: &mut dyn FnMut(Node) -> Node) -> Node {
        match self {
            Node::Sequence { items, .. } => Node::sequence(items.into_iter().map(&mut *f).collect()),
            Node::Alternation { branches, .. } => {
                Node::alternation(branches.into_iter().map(&mut *f).collect())
            }
            Node::Repeat(rep) => {
                let Repeat { min, max, mode, inner, .. } = *rep;
                Node::repeat(min, max, mode, f(inner))
            }
            Node::Capture { id, name, inner, .. } => Node::capture(id, name, f(*inner)),
            Node::Lookaround { look, negated, inner, .. } => {
                Node::lookaround(look, negated, f(*inner))
            }
            leaf => leaf,
        }
    }

    /// Expands small bounded repetitions of single-unit atoms into a plain
    /// sequence followed by the optional remainder.
    pub fn unroll(self) -> Node {
        match self {
            Node::Repeat(rep)
                if rep.inner.is_trivial() && rep.min > 0 && rep.min <= UNROLL_LIMIT =>
            {
                let Repeat { min, max, mode, inner, .. } = *rep;
                let mut items: Vec<Node> = (0..min).map(|_| inner.clone()).collect();
                match max {
                    Some(max) if max == min => {}
                    _ => items.push(Node::repeat(0, max.map(|max| max - min), mode, inner)),
                }
                Node::sequence(items)
            }
            other => other.map_children(&mut Node::unroll),
        }
    }

    /// Single ASCII byte every match must begin with, if there is one.
    pub fn leading_byte(&self) -> Option<u8> {
        match self {
            Node::Literal(c) if c.is_ascii() => Some(*c as u8),
            Node::Sequence { items, .. } => items.first()?.leading_byte(),
            Node::Capture { inner, .. } => inner.leading_byte(),
            Node::Repeat(rep) if rep.min > 0 => rep.inner.leading_byte(),
            _ => None,
        }
    }
}
