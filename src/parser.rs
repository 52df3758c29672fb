// parser.rs - Pushdown automaton that turns a pattern into an AST.
//
// The automaton keeps two stacks: grammar symbols still to be expanded and
// AST fragments built so far. Every step looks up the rule for the top
// symbol and the current token in `grammar::rule`; semantic actions reduce
// the fragment stack. Capture ids are handed out in the order groups are
// reduced (postorder), so the result must go through `indexer::reindex`
// before it is usable.

use crate::ast::Node;
use crate::error::RegexError;
use crate::grammar::{rule, Action, Rule, Symbol, Symbols, Token};

pub struct Parser<'p> {
    pattern: &'p str,
    pos: usize,
    symbols: Vec<Symbol>,
    fragments: Vec<Node>,
    captures: usize,
}

/// Parses `pattern` into a raw AST (captures numbered in postorder).
pub fn parse(pattern: &str) -> Result<Node, RegexError> {
    Parser::new(pattern).run()
}

impl<'p> Parser<'p> {
    pub fn new(pattern: &'p str) -> Self {
        Parser {
            pattern,
            pos: 0,
            symbols: vec![Symbol::Begin],
            fragments: Vec::new(),
            captures: 0,
        }
    }

    fn token(&self) -> (Token, usize) {
        match self.pattern[self.pos..].chars().next() {
            Some(c) => (Token::Char(c), c.len_utf8()),
            None => (Token::End, 0),
        }
    }

    fn error(&self) -> RegexError {
        RegexError::Syntax { position: self.pos }
    }

    fn push(&mut self, items: Symbols) {
        self.symbols.extend(items.into_iter().rev());
    }

    pub fn run(mut self) -> Result<Node, RegexError> {
        loop {
            let Some(top) = self.symbols.pop() else {
                return Err(self.error());
            };
            let (token, width) = self.token();
            match rule(&top, token) {
                Rule::Push(items) => self.push(items),
                Rule::Ignore => {}
                Rule::Advance(items) => {
                    self.pos += width;
                    self.push(items);
                }
                Rule::Apply(action) => self.apply(action)?,
                Rule::Accept => return self.finish(),
                Rule::Reject => {
                    log_debug!("pattern rejected at {} ({:?} on {:?})", self.pos, top, token);
                    return Err(self.error());
                }
            }
        }
    }

    fn finish(mut self) -> Result<Node, RegexError> {
        match (self.fragments.pop(), self.fragments.is_empty()) {
            (Some(root), true) => Ok(root),
            _ => Err(self.error()),
        }
    }

    fn pop(&mut self) -> Result<Node, RegexError> {
        self.fragments.pop().ok_or_else(|| self.error())
    }

    fn apply(&mut self, action: Action) -> Result<(), RegexError> {
        let node = match action {
            Action::PushLiteral(c) => Node::Literal(c),
            Action::PushAny => Node::Any,
            Action::PushClass(kind) => Node::Class(kind),
            Action::PushAnchor(kind) => Node::Anchor(kind),
            Action::PushEmpty => Node::Empty,
            Action::MakeSequence => {
                let last = self.pop()?;
                let first = self.pop()?;
                concat(first, last)
            }
            Action::MakeAlternation => {
                let last = self.pop()?;
                let first = self.pop()?;
                let mut branches = match first {
                    Node::Alternation { branches, .. } => branches,
                    other => vec![other],
                };
                branches.push(last);
                Node::alternation(branches)
            }
            Action::MakeRepeat { min, max, mode } => {
                let inner = self.pop()?;
                Node::repeat(min, max, mode, inner)
            }
            Action::MakeCapture(name) => {
                let inner = self.pop()?;
                self.captures += 1;
                Node::capture(self.captures, name, inner)
            }
            Action::MakeLookaround { look, negated } => {
                let inner = self.pop()?;
                Node::lookaround(look, negated, inner)
            }
            Action::MakeBackref(reference) => Node::Backref(reference),
            Action::OpenSet { negated } => Node::Set { negated, items: Vec::new() },
            Action::SetChar(c) => return self.add_to_set(Node::Literal(c)),
            Action::SetRange(lo, hi) => return self.add_to_set(Node::Range(lo, hi)),
            Action::SetClass(kind) => return self.add_to_set(Node::Class(kind)),
            Action::CloseSet => match self.pop()? {
                Node::Set { negated: false, mut items } if items.len() == 1 => {
                    items.pop().unwrap_or(Node::Fail)
                }
                set => set,
            },
        };
        self.fragments.push(node);
        Ok(())
    }

    fn add_to_set(&mut self, item: Node) -> Result<(), RegexError> {
        match self.fragments.last_mut() {
            Some(Node::Set { items, .. }) => {
                items.push(item);
                Ok(())
            }
            _ => Err(self.error()),
        }
    }
}

/// Concatenates two fragments, extending `first` when it already is a
/// sequence and dropping empty operands.
fn concat(first: Node, last: Node) -> Node {
    match (first, last) {
        (Node::Empty, node) | (node, Node::Empty) => node,
        (Node::Sequence { mut items, .. }, last) => {
            items.push(last);
            Node::sequence(items)
        }
        (first, last) => Node::sequence(vec![first, last]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AnchorKind, ClassKind, Look, Reference, RepeatMode};

    fn p(pattern: &str) -> Node {
        parse(pattern).unwrap_or_else(|e| panic!("{:?} failed: {}", pattern, e))
    }

    fn err(pattern: &str) -> usize {
        parse(pattern).expect_err(pattern).position()
    }

    #[test]
    fn literals_form_a_sequence() {
        assert_eq!(
            p("abc"),
            Node::sequence(vec![Node::Literal('a'), Node::Literal('b'), Node::Literal('c')])
        );
    }

    #[test]
    fn empty_pattern() {
        assert_eq!(p(""), Node::Empty);
        assert_eq!(
            p("a|"),
            Node::alternation(vec![Node::Literal('a'), Node::Empty])
        );
    }

    #[test]
    fn alternation_is_flat_and_ordered() {
        let ab = Node::sequence(vec![Node::Literal('a'), Node::Literal('b')]);
        assert_eq!(
            p("ab|c|d"),
            Node::Alternation {
                branches: vec![ab, Node::Literal('c'), Node::Literal('d')],
                captures: 0,
            }
        );
    }

    #[test]
    fn single_char_alternation_is_a_set() {
        assert_eq!(
            p("a|b|c"),
            Node::Set {
                negated: false,
                items: vec![Node::Literal('a'), Node::Literal('b'), Node::Literal('c')],
            }
        );
        assert_eq!(
            p(r"[ab]|\d|."),
            Node::Set {
                negated: false,
                items: vec![
                    Node::Literal('a'),
                    Node::Literal('b'),
                    Node::Class(ClassKind::Digit),
                    Node::Any,
                ],
            }
        );
    }

    #[test]
    fn quantifiers() {
        assert_eq!(p("a*"), Node::repeat(0, None, RepeatMode::Greedy, Node::Literal('a')));
        assert_eq!(p("a+?"), Node::repeat(1, None, RepeatMode::Lazy, Node::Literal('a')));
        assert_eq!(p("a?+"), Node::repeat(0, Some(1), RepeatMode::Possessive, Node::Literal('a')));
        assert_eq!(p("a{3}"), Node::repeat(3, Some(3), RepeatMode::Greedy, Node::Literal('a')));
        assert_eq!(p("a{2,}"), Node::repeat(2, None, RepeatMode::Greedy, Node::Literal('a')));
        assert_eq!(p("a{2,5}?"), Node::repeat(2, Some(5), RepeatMode::Lazy, Node::Literal('a')));
    }

    #[test]
    fn quantifier_binds_to_last_atom() {
        assert_eq!(
            p("ab*"),
            Node::sequence(vec![
                Node::Literal('a'),
                Node::repeat(0, None, RepeatMode::Greedy, Node::Literal('b')),
            ])
        );
    }

    #[test]
    fn brace_without_digits_is_literal() {
        assert_eq!(
            p("a{x"),
            Node::sequence(vec![Node::Literal('a'), Node::Literal('{'), Node::Literal('x')])
        );
        assert_eq!(
            p("a{*"),
            Node::sequence(vec![
                Node::Literal('a'),
                Node::repeat(0, None, RepeatMode::Greedy, Node::Literal('{')),
            ])
        );
        assert_eq!(p("{"), Node::Literal('{'));
    }

    #[test]
    fn captures_are_postorder_before_indexing() {
        // "((a)(b))": inner groups close first.
        match p("((a)(b))") {
            Node::Capture { id: 3, inner, .. } => match *inner {
                Node::Sequence { items, .. } => {
                    assert!(matches!(items[0], Node::Capture { id: 1, .. }));
                    assert!(matches!(items[1], Node::Capture { id: 2, .. }));
                }
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn groups_and_lookaround() {
        assert_eq!(p("(?:a)"), Node::Literal('a'));
        assert_eq!(
            p("(?<n>a)"),
            Node::capture(1, Some("n".into()), Node::Literal('a'))
        );
        assert_eq!(p("(?=a)"), Node::lookaround(Look::Ahead, false, Node::Literal('a')));
        assert_eq!(p("(?!a)"), Node::lookaround(Look::Ahead, true, Node::Literal('a')));
        assert_eq!(p("(?<=a)"), Node::lookaround(Look::Behind, false, Node::Literal('a')));
        assert_eq!(p("(?<!a)"), Node::lookaround(Look::Behind, true, Node::Literal('a')));
        assert_eq!(
            p("(?>a)"),
            Node::repeat(1, Some(1), RepeatMode::Possessive, Node::Literal('a'))
        );
    }

    #[test]
    fn escapes() {
        assert_eq!(p(r"\d"), Node::Class(ClassKind::Digit));
        assert_eq!(p(r"\W"), Node::Class(ClassKind::NotWord));
        assert_eq!(p(r"\b"), Node::Anchor(AnchorKind::WordBoundary));
        assert_eq!(p(r"\x41"), Node::Literal('A'));
        assert_eq!(p(r"\x{1F600}"), Node::Literal('😀'));
        assert_eq!(p(r"\n"), Node::Literal('\n'));
        assert_eq!(p(r"\*"), Node::Literal('*'));
        assert_eq!(p(r"\12"), Node::Backref(Reference::Index(12)));
        assert_eq!(p(r"\k<word>"), Node::Backref(Reference::Name("word".into())));
    }

    #[test]
    fn classes() {
        assert_eq!(p("[a]"), Node::Literal('a'));
        assert_eq!(
            p("[^a-z\\d]"),
            Node::Set {
                negated: true,
                items: vec![Node::Range('a', 'z'), Node::Class(ClassKind::Digit)],
            }
        );
        assert_eq!(
            p("[]a-]"),
            Node::Set {
                negated: false,
                items: vec![Node::Literal(']'), Node::Literal('a'), Node::Literal('-')],
            }
        );
        assert_eq!(
            p(r"[\x00-\x7F]"),
            Node::Range('\0', '\x7F')
        );
        assert_eq!(p("[.*]"), Node::Set {
            negated: false,
            items: vec![Node::Literal('.'), Node::Literal('*')],
        });
    }

    #[test]
    fn error_positions() {
        assert_eq!(err("("), 1);
        assert_eq!(err(")"), 0);
        assert_eq!(err("a)"), 1);
        assert_eq!(err("a{3x}"), 3);
        assert_eq!(err("a{5,2}"), 5);
        assert_eq!(err("*a"), 0);
        assert_eq!(err("a**"), 2);
        assert_eq!(err("[abc"), 4);
        assert_eq!(err("[z-a]"), 3);
        assert_eq!(err(r"(?<1a>x)"), 3);
        assert_eq!(err(r"(?<ab-c>x)"), 5);
        assert_eq!(err(r"\k<a!>"), 4);
        assert_eq!(err(r"\q"), 1);
        assert_eq!(err("a\\"), 2);
        assert_eq!(err(r"\xZZ"), 2);
        assert_eq!(err("(?x)"), 2);
    }

    #[test]
    fn error_position_is_a_byte_offset() {
        assert_eq!(err("é)"), 2);
    }
}
