// exec.rs - Continuation-passing backtracking matcher.
//
// Every node is matched by `Node::match_at(cx, pos, k)`, where `k` is "the
// rest of the pattern": it is called with the position after the node and
// returns the final end position on overall success. A node with several
// ways to match tries them in order, each time handing the new position to
// `k`, and only reports failure once every way has been refused. Nothing in
// the AST is mutated; captures and the traversal direction live in the
// per-call `MatchContext`.
//
// Single-unit nodes avoid building continuations: sequences consume runs of
// them in a loop, and their repetitions scan then back off iteratively.

use smallvec::{smallvec, SmallVec};

use crate::ast::{AnchorKind, Look, Node, Reference, Repeat, RepeatMode};
use crate::chars::{eq_ignore_case, is_line_terminator, is_word};
use crate::options::Flags;

/// Capture spans by group id; slot 0 is the whole match.
pub(crate) type Slots = SmallVec<[Option<(usize, usize)>; 8]>;

/// Continuation: the rest of the pattern.
type Cont<'c, 't> = &'c mut dyn FnMut(&mut MatchContext<'t>, usize) -> Option<usize>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn reverse(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Per-call match state. Created fresh for every match or search.
pub(crate) struct MatchContext<'t> {
    text: &'t str,
    flags: Flags,
    dir: Direction,
    pub(crate) slots: Slots,
}

impl<'t> MatchContext<'t> {
    pub(crate) fn new(text: &'t str, flags: Flags, captures: usize) -> Self {
        MatchContext {
            text,
            flags,
            dir: Direction::Forward,
            slots: smallvec![None; captures + 1],
        }
    }

    fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.dir = Direction::Forward;
    }

    #[inline]
    fn char_after(&self, pos: usize) -> Option<char> {
        self.text[pos..].chars().next()
    }

    #[inline]
    fn char_before(&self, pos: usize) -> Option<char> {
        self.text[..pos].chars().next_back()
    }

    /// Next unit in the current direction and the position past it.
    #[inline]
    fn next_char(&self, pos: usize) -> Option<(char, usize)> {
        match self.dir {
            Direction::Forward => self.char_after(pos).map(|c| (c, pos + c.len_utf8())),
            Direction::Backward => self.char_before(pos).map(|c| (c, pos - c.len_utf8())),
        }
    }

    /// Matches a single-unit node at `pos`.
    #[inline]
    fn step(&self, node: &Node, pos: usize) -> Option<usize> {
        let (c, next) = self.next_char(pos)?;
        node.matches_char(c, self.flags).then_some(next)
    }

    /// Undoes one `step` that ended at `pos`.
    #[inline]
    fn retreat(&self, pos: usize) -> usize {
        match self.dir {
            Direction::Forward => self.char_before(pos).map_or(pos, |c| pos - c.len_utf8()),
            Direction::Backward => self.char_after(pos).map_or(pos, |c| pos + c.len_utf8()),
        }
    }

    fn span(&self, from: usize, to: usize) -> (usize, usize) {
        (from.min(to), from.max(to))
    }

    fn is_word_boundary(&self, pos: usize) -> bool {
        let before = self.char_before(pos).map_or(false, is_word);
        let after = self.char_after(pos).map_or(false, is_word);
        before != after
    }

    fn at_anchor(&self, kind: AnchorKind, pos: usize) -> bool {
        let multiline = self.flags.contains(Flags::MULTILINE);
        match kind {
            AnchorKind::LineStart => {
                pos == 0 || (multiline && self.char_before(pos).map_or(false, is_line_terminator))
            }
            AnchorKind::LineEnd => {
                pos == self.text.len()
                    || (multiline && self.char_after(pos).map_or(false, is_line_terminator))
            }
            AnchorKind::TextStart => pos == 0,
            AnchorKind::TextEnd => pos == self.text.len(),
            AnchorKind::WordBoundary => self.is_word_boundary(pos),
            AnchorKind::NotWordBoundary => !self.is_word_boundary(pos),
        }
    }

    /// Matches the literal text `needle` unit by unit in the current
    /// direction.
    fn match_text(&self, needle: &str, pos: usize) -> Option<usize> {
        let icase = self.flags.contains(Flags::CASE_INSENSITIVE);
        let same = |a: char, b: char| a == b || (icase && eq_ignore_case(a, b));
        let mut pos = pos;
        let mut compare = |expected: char| -> Option<()> {
            let (c, next) = self.next_char(pos)?;
            pos = next;
            same(expected, c).then_some(())
        };
        match self.dir {
            Direction::Forward => needle.chars().try_for_each(&mut compare)?,
            Direction::Backward => needle.chars().rev().try_for_each(&mut compare)?,
        }
        Some(pos)
    }

    fn snapshot(&self, node: &Node) -> Option<Slots> {
        (node.capture_count() > 0).then(|| self.slots.clone())
    }

    fn restore(&mut self, snapshot: Option<Slots>) {
        if let Some(slots) = snapshot {
            self.slots = slots;
        }
    }
}

impl Node {
    /// Matches this node at `pos`, then the rest of the pattern via `k`.
    pub(crate) fn match_at<'t>(
        &self,
        cx: &mut MatchContext<'t>,
        pos: usize,
        k: Cont<'_, 't>,
    ) -> Option<usize> {
        match self {
            Node::Empty => k(cx, pos),
            Node::Fail => None,
            Node::Literal(_) | Node::Any | Node::Class(_) | Node::Range(..) | Node::Set { .. } => {
                let next = cx.step(self, pos)?;
                k(cx, next)
            }
            Node::Sequence { items, .. } => match_sequence(items, cx, pos, k),
            Node::Alternation { branches, .. } => {
                for branch in branches {
                    let snapshot = cx.snapshot(branch);
                    if let Some(end) = branch.match_at(cx, pos, &mut *k) {
                        return Some(end);
                    }
                    cx.restore(snapshot);
                }
                None
            }
            Node::Repeat(rep) => match_repeat(rep, cx, pos, k),
            Node::Capture { id, inner, .. } => {
                let id = *id;
                let saved = cx.slots[id];
                let end = inner.match_at(cx, pos, &mut |cx: &mut MatchContext<'t>, p: usize| {
                    let prev = cx.slots[id];
                    cx.slots[id] = Some(cx.span(pos, p));
                    let end = k(cx, p);
                    if end.is_none() {
                        cx.slots[id] = prev;
                    }
                    end
                });
                if end.is_none() {
                    cx.slots[id] = saved;
                }
                end
            }
            Node::Lookaround { look, negated, inner, .. } => {
                let snapshot = cx.snapshot(inner);
                let saved = cx.dir;
                if *look == Look::Behind {
                    cx.dir = saved.reverse();
                }
                let found = if inner.is_trivial() {
                    cx.step(inner, pos).is_some()
                } else {
                    inner
                        .match_at(cx, pos, &mut |_: &mut MatchContext<'t>, p: usize| Some(p))
                        .is_some()
                };
                cx.dir = saved;
                if found == *negated {
                    cx.restore(snapshot);
                    return None;
                }
                let end = k(cx, pos);
                if end.is_none() {
                    cx.restore(snapshot);
                }
                end
            }
            Node::Backref(reference) => {
                let Reference::Index(id) = reference else {
                    return None;
                };
                let (start, end) = cx.slots.get(*id).copied().flatten()?;
                let text = cx.text;
                let next = cx.match_text(&text[start..end], pos)?;
                k(cx, next)
            }
            Node::Anchor(kind) => {
                if cx.at_anchor(*kind, pos) {
                    k(cx, pos)
                } else {
                    None
                }
            }
        }
    }
}

fn match_sequence<'t>(
    items: &[Node],
    cx: &mut MatchContext<'t>,
    pos: usize,
    k: Cont<'_, 't>,
) -> Option<usize> {
    let mut pos = pos;
    let mut items = items;
    while let Some((first, rest)) = items.split_first() {
        if !first.is_trivial() {
            return first.match_at(cx, pos, &mut |cx: &mut MatchContext<'t>, p: usize| {
                match_sequence(rest, cx, p, &mut *k)
            });
        }
        pos = cx.step(first, pos)?;
        items = rest;
    }
    k(cx, pos)
}

fn match_repeat<'t>(
    rep: &Repeat,
    cx: &mut MatchContext<'t>,
    pos: usize,
    k: Cont<'_, 't>,
) -> Option<usize> {
    let mode = match rep.mode {
        RepeatMode::Greedy if cx.flags.contains(Flags::UNGREEDY) => RepeatMode::Lazy,
        mode => mode,
    };
    if rep.inner.is_trivial() {
        return match mode {
            RepeatMode::Greedy => scan_greedy(rep, cx, pos, k),
            RepeatMode::Lazy => scan_lazy(rep, cx, pos, k),
            RepeatMode::Possessive => {
                let (end, count) = scan(rep, cx, pos);
                if count < rep.min {
                    return None;
                }
                k(cx, end)
            }
        };
    }
    if rep.inner.capture_count() == 0 && rep.inner.is_zero_width() {
        // Every iteration ends where it started and leaves no state behind,
        // so one attempt stands for all of them.
        if rep.min > 0
            && rep.inner.match_at(cx, pos, &mut |_: &mut MatchContext<'t>, p: usize| Some(p)).is_none()
        {
            return None;
        }
        return k(cx, pos);
    }
    match mode {
        RepeatMode::Greedy => greedy(rep, 0, cx, pos, k),
        RepeatMode::Lazy => lazy(rep, 0, cx, pos, k),
        RepeatMode::Possessive => {
            let snapshot = cx.snapshot(&rep.inner);
            // The first way the loop can stop is the only one offered to `k`.
            let end = greedy(rep, 0, cx, pos, &mut |_: &mut MatchContext<'t>, p: usize| Some(p))?;
            let result = k(cx, end);
            if result.is_none() {
                cx.restore(snapshot);
            }
            result
        }
    }
}

fn greedy<'t>(
    rep: &Repeat,
    count: u32,
    cx: &mut MatchContext<'t>,
    pos: usize,
    k: Cont<'_, 't>,
) -> Option<usize> {
    if rep.allows(count) {
        let end = rep.inner.match_at(cx, pos, &mut |cx: &mut MatchContext<'t>, p: usize| {
            // An optional iteration that consumed nothing would loop forever.
            if p == pos && count >= rep.min {
                return None;
            }
            greedy(rep, count + 1, cx, p, &mut *k)
        });
        if end.is_some() {
            return end;
        }
    }
    if count >= rep.min {
        k(cx, pos)
    } else {
        None
    }
}

fn lazy<'t>(
    rep: &Repeat,
    count: u32,
    cx: &mut MatchContext<'t>,
    pos: usize,
    k: Cont<'_, 't>,
) -> Option<usize> {
    if count >= rep.min {
        if let Some(end) = k(cx, pos) {
            return Some(end);
        }
    }
    if !rep.allows(count) {
        return None;
    }
    rep.inner.match_at(cx, pos, &mut |cx: &mut MatchContext<'t>, p: usize| {
        if p == pos && count >= rep.min {
            return None;
        }
        lazy(rep, count + 1, cx, p, &mut *k)
    })
}

/// Consumes as many single-unit repetitions as allowed.
fn scan(rep: &Repeat, cx: &MatchContext<'_>, pos: usize) -> (usize, u32) {
    let mut end = pos;
    let mut count = 0;
    while rep.allows(count) {
        match cx.step(&rep.inner, end) {
            Some(next) => {
                end = next;
                count += 1;
            }
            None => break,
        }
    }
    (end, count)
}

fn scan_greedy<'t>(
    rep: &Repeat,
    cx: &mut MatchContext<'t>,
    pos: usize,
    k: Cont<'_, 't>,
) -> Option<usize> {
    let (mut end, mut count) = scan(rep, cx, pos);
    if count < rep.min {
        return None;
    }
    loop {
        if let Some(result) = k(cx, end) {
            return Some(result);
        }
        if count == rep.min {
            return None;
        }
        end = cx.retreat(end);
        count -= 1;
    }
}

fn scan_lazy<'t>(
    rep: &Repeat,
    cx: &mut MatchContext<'t>,
    pos: usize,
    k: Cont<'_, 't>,
) -> Option<usize> {
    let mut end = pos;
    let mut count = 0;
    while count < rep.min {
        end = cx.step(&rep.inner, end)?;
        count += 1;
    }
    loop {
        if let Some(result) = k(cx, end) {
            return Some(result);
        }
        if !rep.allows(count) {
            return None;
        }
        end = cx.step(&rep.inner, end)?;
        count += 1;
    }
}

// === Top-level drivers ===

/// Matches `root` starting exactly at `start`. With `whole`, the match must
/// also end at the end of the text. Records slot 0 on success.
pub(crate) fn match_anchored<'t>(
    root: &Node,
    cx: &mut MatchContext<'t>,
    start: usize,
    whole: bool,
) -> Option<usize> {
    cx.reset();
    let len = cx.text.len();
    let end = if whole {
        root.match_at(cx, start, &mut |_: &mut MatchContext<'t>, p: usize| (p == len).then_some(p))
    } else {
        root.match_at(cx, start, &mut |_: &mut MatchContext<'t>, p: usize| Some(p))
    }?;
    cx.slots[0] = Some((start, end));
    Some(end)
}

/// Byte every match starts with, used to skip hopeless start positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Prefilter {
    byte: u8,
    alt: Option<u8>,
}

impl Prefilter {
    pub(crate) fn new(byte: u8, flags: Flags) -> Option<Prefilter> {
        if !flags.contains(Flags::CASE_INSENSITIVE) || !byte.is_ascii_alphabetic() {
            return Some(Prefilter { byte, alt: None });
        }
        // U+212A KELVIN SIGN folds to 'k', so a byte scan could miss it.
        if byte.eq_ignore_ascii_case(&b'k') {
            return None;
        }
        Some(Prefilter {
            byte: byte.to_ascii_lowercase(),
            alt: Some(byte.to_ascii_uppercase()),
        })
    }

    fn find(&self, haystack: &[u8]) -> Option<usize> {
        match self.alt {
            Some(alt) => memchr::memchr2(self.byte, alt, haystack),
            None => memchr::memchr(self.byte, haystack),
        }
    }
}

/// Leftmost match starting at or after `from`.
pub(crate) fn search_from(
    root: &Node,
    prefilter: Option<Prefilter>,
    cx: &mut MatchContext<'_>,
    from: usize,
) -> Option<(usize, usize)> {
    let text = cx.text;
    let mut start = from;
    loop {
        if let Some(prefilter) = prefilter {
            let skip = prefilter.find(&text.as_bytes()[start..])?;
            if skip > 0 {
                log_trace!("prefilter skipped {} bytes at {}", skip, start);
            }
            start += skip;
        }
        if let Some(end) = match_anchored(root, cx, start, false) {
            return Some((start, end));
        }
        start += text[start..].chars().next()?.len_utf8();
    }
}
