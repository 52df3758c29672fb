// grammar.rs - LL(1) grammar table for the pattern parser.
//
// `rule(top, token)` is the whole grammar: given the symbol on top of the
// parser's symbol stack and the current input token, it says what to do
// next. Symbols that need to remember something between tokens (digits of
// a bound, characters of a name, the low end of a class range) carry it as
// a payload. `Symbol::Do` wraps a semantic action that reduces the parser's
// fragment stack when it reaches the top.
//
// Grammar outline (terminals quoted, actions in brackets):
//
//   begin      -> alt finish
//   alt        -> seq alt_rest
//   alt_rest   -> '|' seq [alternation] alt_rest | ε
//   seq        -> quantified seq_rest | [empty]
//   seq_rest   -> quantified [sequence] seq_rest | ε
//   quantified -> atom quant
//   quant      -> '*' mode | '+' mode | '?' mode | '{' brace | ε
//   atom       -> '(' group | '[' class | '\' escape | '.' | '^' | '$' | char

use smallvec::{smallvec, SmallVec};

use crate::ast::{AnchorKind, ClassKind, Look, Reference, RepeatMode, MAX_REPEAT};
use crate::chars::{is_hex_digit, is_name_start, is_word};

/// Current input token. The parser appends a synthetic `End` after the
/// last pattern character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Char(char),
    End,
}

/// Where a completed `\x` escape goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HexTarget {
    /// A literal atom.
    Literal,
    /// A class member, possibly the low end of a range.
    ClassChar,
    /// The high end of a class range starting at the payload.
    RangeHi(char),
}

/// Semantic actions applied to the fragment stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    PushLiteral(char),
    PushAny,
    PushClass(ClassKind),
    PushAnchor(AnchorKind),
    PushEmpty,
    /// Pops two fragments and pushes their concatenation.
    MakeSequence,
    /// Pops two fragments and pushes their alternation.
    MakeAlternation,
    MakeRepeat { min: u32, max: Option<u32>, mode: RepeatMode },
    MakeCapture(Option<String>),
    MakeLookaround { look: Look, negated: bool },
    MakeBackref(Reference),
    /// Pushes an empty set that the following `Set*` actions fill in.
    OpenSet { negated: bool },
    SetChar(char),
    SetRange(char, char),
    SetClass(ClassKind),
    CloseSet,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Symbol {
    Begin,
    Finish,
    Alt,
    AltRest,
    Seq,
    SeqRest,
    Quantified,
    Atom,
    Quant,
    QuantBrace,
    RepMin(u32),
    RepMax { min: u32, max: Option<u32> },
    Mode { min: u32, max: Option<u32> },
    Close,
    GroupOpen,
    GroupExt,
    GroupLt,
    GroupName(String),
    Escape,
    BackrefNum(u32),
    RefOpen,
    RefNameStart,
    RefName(String),
    Hex(HexTarget),
    HexLow { target: HexTarget, high: u32 },
    HexBrace { target: HexTarget, value: u32, digits: u8 },
    ClassOpen,
    ClassFirst,
    ClassBody,
    ClassEscape,
    ClassAfterChar(char),
    ClassRangeHi(char),
    ClassRangeHiEscape(char),
    Do(Action),
}

pub type Symbols = SmallVec<[Symbol; 4]>;

/// What the automaton does for one (symbol, token) pair. The top symbol has
/// already been popped when the rule is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    /// Push the symbols (first one ends up on top) without consuming input.
    Push(Symbols),
    /// Drop the symbol.
    Ignore,
    /// Consume the token, then push the symbols.
    Advance(Symbols),
    /// Run a semantic action.
    Apply(Action),
    Accept,
    Reject,
}

/// Escapes that stand for a single character outside and inside classes.
pub fn simple_escape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'f' => Some('\x0C'),
        'v' => Some('\x0B'),
        'a' => Some('\x07'),
        'e' => Some('\x1B'),
        '0' => Some('\0'),
        c if !c.is_alphanumeric() => Some(c),
        _ => None,
    }
}

fn class_escape(c: char) -> Option<ClassKind> {
    match c {
        'd' => Some(ClassKind::Digit),
        'D' => Some(ClassKind::NotDigit),
        'w' => Some(ClassKind::Word),
        'W' => Some(ClassKind::NotWord),
        's' => Some(ClassKind::Space),
        'S' => Some(ClassKind::NotSpace),
        _ => None,
    }
}

fn anchor_escape(c: char) -> Option<AnchorKind> {
    match c {
        'b' => Some(AnchorKind::WordBoundary),
        'B' => Some(AnchorKind::NotWordBoundary),
        'A' => Some(AnchorKind::TextStart),
        'z' => Some(AnchorKind::TextEnd),
        _ => None,
    }
}

/// Appends a decimal digit to a bound or group number.
fn accumulate(acc: u32, digit: char) -> Option<u32> {
    let value = acc.checked_mul(10)?.checked_add(digit.to_digit(10)?)?;
    (value <= MAX_REPEAT).then_some(value)
}

fn hex_done(target: HexTarget, value: u32) -> Rule {
    let Some(c) = char::from_u32(value) else {
        return Rule::Reject;
    };
    match target {
        HexTarget::Literal => Rule::Advance(smallvec![Symbol::Do(Action::PushLiteral(c))]),
        HexTarget::ClassChar => Rule::Advance(smallvec![Symbol::ClassAfterChar(c)]),
        HexTarget::RangeHi(lo) if c >= lo => {
            Rule::Advance(smallvec![Symbol::Do(Action::SetRange(lo, c))])
        }
        HexTarget::RangeHi(_) => Rule::Reject,
    }
}

fn group_body(action: Action) -> Rule {
    Rule::Advance(smallvec![Symbol::Alt, Symbol::Close, Symbol::Do(action)])
}

fn repeat(min: u32, max: Option<u32>, mode: RepeatMode) -> Symbol {
    Symbol::Do(Action::MakeRepeat { min, max, mode })
}

/// The grammar table.
pub fn rule(top: &Symbol, token: Token) -> Rule {
    use Symbol as S;
    use Token::{Char, End};

    match (top, token) {
        (S::Begin, _) => Rule::Push(smallvec![S::Alt, S::Finish]),

        (S::Finish, End) => Rule::Accept,
        (S::Finish, _) => Rule::Reject,

        // --- alternation and sequence ---
        (S::Alt, _) => Rule::Push(smallvec![S::Seq, S::AltRest]),

        (S::AltRest, Char('|')) => {
            Rule::Advance(smallvec![S::Seq, S::Do(Action::MakeAlternation), S::AltRest])
        }
        (S::AltRest, Char(')') | End) => Rule::Ignore,
        (S::AltRest, _) => Rule::Reject,

        (S::Seq, Char('|' | ')') | End) => Rule::Push(smallvec![S::Do(Action::PushEmpty)]),
        (S::Seq, _) => Rule::Push(smallvec![S::Quantified, S::SeqRest]),

        (S::SeqRest, Char('|' | ')') | End) => Rule::Ignore,
        (S::SeqRest, _) => {
            Rule::Push(smallvec![S::Quantified, S::Do(Action::MakeSequence), S::SeqRest])
        }

        (S::Quantified, _) => Rule::Push(smallvec![S::Atom, S::Quant]),

        // --- atoms ---
        (S::Atom, Char('(')) => Rule::Advance(smallvec![S::GroupOpen]),
        (S::Atom, Char('[')) => Rule::Advance(smallvec![S::ClassOpen]),
        (S::Atom, Char('\\')) => Rule::Advance(smallvec![S::Escape]),
        (S::Atom, Char('.')) => Rule::Advance(smallvec![S::Do(Action::PushAny)]),
        (S::Atom, Char('^')) => {
            Rule::Advance(smallvec![S::Do(Action::PushAnchor(AnchorKind::LineStart))])
        }
        (S::Atom, Char('$')) => {
            Rule::Advance(smallvec![S::Do(Action::PushAnchor(AnchorKind::LineEnd))])
        }
        (S::Atom, Char('*' | '+' | '?' | ')' | '|') | End) => Rule::Reject,
        (S::Atom, Char(c)) => Rule::Advance(smallvec![S::Do(Action::PushLiteral(c))]),

        // --- quantifiers ---
        (S::Quant, Char('*')) => Rule::Advance(smallvec![S::Mode { min: 0, max: None }]),
        (S::Quant, Char('+')) => Rule::Advance(smallvec![S::Mode { min: 1, max: None }]),
        (S::Quant, Char('?')) => Rule::Advance(smallvec![S::Mode { min: 0, max: Some(1) }]),
        (S::Quant, Char('{')) => Rule::Advance(smallvec![S::QuantBrace]),
        (S::Quant, _) => Rule::Ignore,

        (S::QuantBrace, Char(c)) if c.is_ascii_digit() => match accumulate(0, c) {
            Some(n) => Rule::Advance(smallvec![S::RepMin(n)]),
            None => Rule::Reject,
        },
        // Not a bound after all: the '{' is a literal that may itself be
        // quantified, then joins the preceding atom.
        (S::QuantBrace, _) => Rule::Push(smallvec![
            S::Do(Action::PushLiteral('{')),
            S::Quant,
            S::Do(Action::MakeSequence),
        ]),

        (S::RepMin(n), Char(c)) if c.is_ascii_digit() => match accumulate(*n, c) {
            Some(n) => Rule::Advance(smallvec![S::RepMin(n)]),
            None => Rule::Reject,
        },
        (S::RepMin(n), Char(',')) => Rule::Advance(smallvec![S::RepMax { min: *n, max: None }]),
        (S::RepMin(n), Char('}')) => Rule::Advance(smallvec![S::Mode { min: *n, max: Some(*n) }]),
        (S::RepMin(_), _) => Rule::Reject,

        (S::RepMax { min, max }, Char(c)) if c.is_ascii_digit() => {
            match accumulate(max.unwrap_or(0), c) {
                Some(n) => Rule::Advance(smallvec![S::RepMax { min: *min, max: Some(n) }]),
                None => Rule::Reject,
            }
        }
        (S::RepMax { min, max }, Char('}')) => match max {
            Some(max) if max < min => Rule::Reject,
            _ => Rule::Advance(smallvec![S::Mode { min: *min, max: *max }]),
        },
        (S::RepMax { .. }, _) => Rule::Reject,

        (S::Mode { min, max }, Char('?')) => {
            Rule::Advance(smallvec![repeat(*min, *max, RepeatMode::Lazy)])
        }
        (S::Mode { min, max }, Char('+')) => {
            Rule::Advance(smallvec![repeat(*min, *max, RepeatMode::Possessive)])
        }
        (S::Mode { min, max }, _) => Rule::Push(smallvec![repeat(*min, *max, RepeatMode::Greedy)]),

        // --- groups ---
        (S::Close, Char(')')) => Rule::Advance(SmallVec::new()),
        (S::Close, _) => Rule::Reject,

        (S::GroupOpen, Char('?')) => Rule::Advance(smallvec![S::GroupExt]),
        (S::GroupOpen, _) => {
            Rule::Push(smallvec![S::Alt, S::Close, S::Do(Action::MakeCapture(None))])
        }

        (S::GroupExt, Char(':')) => Rule::Advance(smallvec![S::Alt, S::Close]),
        (S::GroupExt, Char('=')) => {
            group_body(Action::MakeLookaround { look: Look::Ahead, negated: false })
        }
        (S::GroupExt, Char('!')) => {
            group_body(Action::MakeLookaround { look: Look::Ahead, negated: true })
        }
        (S::GroupExt, Char('>')) => group_body(Action::MakeRepeat {
            min: 1,
            max: Some(1),
            mode: RepeatMode::Possessive,
        }),
        (S::GroupExt, Char('<')) => Rule::Advance(smallvec![S::GroupLt]),
        (S::GroupExt, _) => Rule::Reject,

        (S::GroupLt, Char('=')) => {
            group_body(Action::MakeLookaround { look: Look::Behind, negated: false })
        }
        (S::GroupLt, Char('!')) => {
            group_body(Action::MakeLookaround { look: Look::Behind, negated: true })
        }
        (S::GroupLt, Char(c)) if is_name_start(c) => {
            Rule::Advance(smallvec![S::GroupName(c.to_string())])
        }
        (S::GroupLt, _) => Rule::Reject,

        (S::GroupName(name), Char(c)) if is_word(c) => {
            let mut name = name.clone();
            name.push(c);
            Rule::Advance(smallvec![S::GroupName(name)])
        }
        (S::GroupName(name), Char('>')) => group_body(Action::MakeCapture(Some(name.clone()))),
        (S::GroupName(_), _) => Rule::Reject,

        // --- escapes ---
        (S::Escape, End) => Rule::Reject,
        (S::Escape, Char('x')) => Rule::Advance(smallvec![S::Hex(HexTarget::Literal)]),
        (S::Escape, Char('k')) => Rule::Advance(smallvec![S::RefOpen]),
        (S::Escape, Char(c @ '1'..='9')) => match accumulate(0, c) {
            Some(n) => Rule::Advance(smallvec![S::BackrefNum(n)]),
            None => Rule::Reject,
        },
        (S::Escape, Char(c)) => {
            if let Some(kind) = class_escape(c) {
                Rule::Advance(smallvec![S::Do(Action::PushClass(kind))])
            } else if let Some(kind) = anchor_escape(c) {
                Rule::Advance(smallvec![S::Do(Action::PushAnchor(kind))])
            } else if let Some(lit) = simple_escape(c) {
                Rule::Advance(smallvec![S::Do(Action::PushLiteral(lit))])
            } else {
                Rule::Reject
            }
        }

        (S::BackrefNum(n), Char(c)) if c.is_ascii_digit() => match accumulate(*n, c) {
            Some(n) => Rule::Advance(smallvec![S::BackrefNum(n)]),
            None => Rule::Reject,
        },
        (S::BackrefNum(n), _) => Rule::Push(smallvec![S::Do(Action::MakeBackref(
            Reference::Index(*n as usize)
        ))]),

        (S::RefOpen, Char('<')) => Rule::Advance(smallvec![S::RefNameStart]),
        (S::RefOpen, _) => Rule::Reject,

        (S::RefNameStart, Char(c)) if is_name_start(c) => {
            Rule::Advance(smallvec![S::RefName(c.to_string())])
        }
        (S::RefNameStart, _) => Rule::Reject,

        (S::RefName(name), Char(c)) if is_word(c) => {
            let mut name = name.clone();
            name.push(c);
            Rule::Advance(smallvec![S::RefName(name)])
        }
        (S::RefName(name), Char('>')) => Rule::Advance(smallvec![S::Do(Action::MakeBackref(
            Reference::Name(name.clone())
        ))]),
        (S::RefName(_), _) => Rule::Reject,

        (S::Hex(target), Char('{')) => {
            Rule::Advance(smallvec![S::HexBrace { target: *target, value: 0, digits: 0 }])
        }
        (S::Hex(target), Char(c)) if is_hex_digit(c) => {
            let high = c.to_digit(16).unwrap_or(0);
            Rule::Advance(smallvec![S::HexLow { target: *target, high }])
        }
        (S::Hex(_), _) => Rule::Reject,

        (S::HexLow { target, high }, Char(c)) if is_hex_digit(c) => {
            hex_done(*target, high * 16 + c.to_digit(16).unwrap_or(0))
        }
        (S::HexLow { .. }, _) => Rule::Reject,

        (S::HexBrace { target, value, digits }, Char(c)) if is_hex_digit(c) && *digits < 6 => {
            Rule::Advance(smallvec![S::HexBrace {
                target: *target,
                value: value * 16 + c.to_digit(16).unwrap_or(0),
                digits: digits + 1,
            }])
        }
        (S::HexBrace { target, value, digits }, Char('}')) if *digits > 0 => {
            hex_done(*target, *value)
        }
        (S::HexBrace { .. }, _) => Rule::Reject,

        // --- character classes ---
        (S::ClassOpen, Char('^')) => Rule::Advance(smallvec![
            S::Do(Action::OpenSet { negated: true }),
            S::ClassFirst,
            S::ClassBody,
        ]),
        (S::ClassOpen, _) => Rule::Push(smallvec![
            S::Do(Action::OpenSet { negated: false }),
            S::ClassFirst,
            S::ClassBody,
        ]),

        // A ']' right after the opening bracket is a member.
        (S::ClassFirst, Char(']')) => Rule::Advance(smallvec![S::ClassAfterChar(']')]),
        (S::ClassFirst, _) => Rule::Ignore,

        (S::ClassBody, Char(']')) => Rule::Advance(smallvec![S::Do(Action::CloseSet)]),
        (S::ClassBody, End) => Rule::Reject,
        (S::ClassBody, Char('\\')) => Rule::Advance(smallvec![S::ClassEscape, S::ClassBody]),
        (S::ClassBody, Char(c)) => Rule::Advance(smallvec![S::ClassAfterChar(c), S::ClassBody]),

        (S::ClassEscape, End) => Rule::Reject,
        (S::ClassEscape, Char('x')) => Rule::Advance(smallvec![S::Hex(HexTarget::ClassChar)]),
        (S::ClassEscape, Char('b')) => Rule::Advance(smallvec![S::ClassAfterChar('\x08')]),
        (S::ClassEscape, Char(c)) => {
            if let Some(kind) = class_escape(c) {
                Rule::Advance(smallvec![S::Do(Action::SetClass(kind))])
            } else if let Some(lit) = simple_escape(c) {
                Rule::Advance(smallvec![S::ClassAfterChar(lit)])
            } else {
                Rule::Reject
            }
        }

        (S::ClassAfterChar(lo), Char('-')) => Rule::Advance(smallvec![S::ClassRangeHi(*lo)]),
        (S::ClassAfterChar(c), _) => Rule::Push(smallvec![S::Do(Action::SetChar(*c))]),

        // "a-]": the dash is a member too.
        (S::ClassRangeHi(lo), Char(']')) => Rule::Push(smallvec![
            S::Do(Action::SetChar(*lo)),
            S::Do(Action::SetChar('-')),
        ]),
        (S::ClassRangeHi(_), End) => Rule::Reject,
        (S::ClassRangeHi(lo), Char('\\')) => {
            Rule::Advance(smallvec![S::ClassRangeHiEscape(*lo)])
        }
        (S::ClassRangeHi(lo), Char(hi)) if hi >= *lo => {
            Rule::Advance(smallvec![S::Do(Action::SetRange(*lo, hi))])
        }
        (S::ClassRangeHi(_), _) => Rule::Reject,

        (S::ClassRangeHiEscape(lo), Char('x')) => {
            Rule::Advance(smallvec![S::Hex(HexTarget::RangeHi(*lo))])
        }
        (S::ClassRangeHiEscape(lo), Char(c)) => {
            let hi = if c == 'b' { Some('\x08') } else { simple_escape(c) };
            match hi {
                Some(hi) if hi >= *lo => Rule::Advance(smallvec![S::Do(Action::SetRange(*lo, hi))]),
                _ => Rule::Reject,
            }
        }
        (S::ClassRangeHiEscape(_), End) => Rule::Reject,

        (S::Do(action), _) => Rule::Apply(action.clone()),
    }
}
