// api.rs - Public matching API.
//
// Wraps compiled programs and the matching drivers in Rust-native types:
// Regex, RegexBuilder, Match, Captures, FindIter, CaptureMatches.
// Positions are byte offsets into the subject and always fall on char
// boundaries.

use std::ops::{Index, Range};

use crate::compile::{compile, Program};
use crate::error::RegexError;
use crate::exec::{match_anchored, search_from, MatchContext, Slots};
use crate::options::Flags;

/// A compiled regular expression.
///
/// # Examples
///
/// ```
/// use cpsre::api::Regex;
///
/// let re = Regex::new(r"\d+").unwrap();
/// assert!(re.is_match("hello 42"));
///
/// let m = re.find("hello 42").unwrap();
/// assert_eq!(m.as_str(), "42");
/// assert_eq!(m.start(), 6);
/// assert_eq!(m.end(), 8);
/// ```
#[derive(Clone)]
pub struct Regex {
    pub(crate) pattern: String,
    pub(crate) program: Program,
}

impl Regex {
    /// Compile a pattern with no flags set.
    pub fn new(pattern: &str) -> Result<Regex, RegexError> {
        RegexBuilder::new(pattern).build()
    }

    /// Create a [`RegexBuilder`] for compiling with flags.
    pub fn builder(pattern: &str) -> RegexBuilder {
        RegexBuilder::new(pattern)
    }

    /// The pattern text this regex was compiled from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn flags(&self) -> Flags {
        self.program.flags
    }

    /// Number of capture groups in the pattern (excluding group 0).
    pub fn captures_len(&self) -> usize {
        self.program.captures
    }

    /// Group names in id order, starting with group 0 (always `None`).
    pub fn capture_names(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.program.names.iter().map(|name| name.as_deref())
    }

    fn context<'t>(&self, text: &'t str) -> MatchContext<'t> {
        MatchContext::new(text, self.program.flags, self.program.captures)
    }

    fn captures_from<'t>(&self, text: &'t str, cx: MatchContext<'t>) -> Captures<'_, 't> {
        Captures {
            text,
            slots: cx.slots,
            names: &self.program.names,
        }
    }

    /// Check whether the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        let mut cx = self.context(text);
        search_from(&self.program.root, self.program.prefilter, &mut cx, 0).is_some()
    }

    /// Return the leftmost match in `text`, or `None`.
    pub fn find<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        let mut cx = self.context(text);
        let (start, end) = search_from(&self.program.root, self.program.prefilter, &mut cx, 0)?;
        Some(Match { text, start, end })
    }

    /// Return the leftmost match with all capture groups, or `None`.
    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'_, 't>> {
        self.search_at(text, 0)
    }

    /// Leftmost match starting at or after byte offset `start`. Returns
    /// `None` when `start` is past the end or not on a char boundary.
    /// Lookbehind and `^` still see the text before `start`.
    pub fn search_at<'t>(&self, text: &'t str, start: usize) -> Option<Captures<'_, 't>> {
        if !text.is_char_boundary(start) {
            return None;
        }
        let mut cx = self.context(text);
        search_from(&self.program.root, self.program.prefilter, &mut cx, start)?;
        Some(self.captures_from(text, cx))
    }

    /// Match against the whole of `text`.
    pub fn match_full<'t>(&self, text: &'t str) -> Option<Captures<'_, 't>> {
        let mut cx = self.context(text);
        match_anchored(&self.program.root, &mut cx, 0, true)?;
        Some(self.captures_from(text, cx))
    }

    /// Match at the start of `text`; the match need not reach the end.
    pub fn match_prefix<'t>(&self, text: &'t str) -> Option<Captures<'_, 't>> {
        let mut cx = self.context(text);
        match_anchored(&self.program.root, &mut cx, 0, false)?;
        Some(self.captures_from(text, cx))
    }

    /// Iterate over successive matches in `text`.
    ///
    /// Each search starts where the previous match ended, or one char
    /// further when that match was empty.
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> FindIter<'r, 't> {
        FindIter { cursor: Cursor::new(self, text) }
    }

    /// Like [`find_iter`](Regex::find_iter), yielding capture groups.
    pub fn captures_iter<'r, 't>(&'r self, text: &'t str) -> CaptureMatches<'r, 't> {
        CaptureMatches { cursor: Cursor::new(self, text) }
    }
}

impl std::fmt::Debug for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Regex")
            .field("pattern", &self.pattern)
            .field("flags", &self.program.flags)
            .finish_non_exhaustive()
    }
}

// === RegexBuilder ===

/// Builder for compiling a [`Regex`] with flags.
///
/// # Examples
///
/// ```
/// use cpsre::api::Regex;
///
/// let re = Regex::builder(r"hello world")
///     .case_insensitive(true)
///     .build()
///     .unwrap();
/// assert!(re.is_match("Hello World"));
/// ```
#[derive(Clone, Debug)]
pub struct RegexBuilder {
    pub(crate) pattern: String,
    pub(crate) flags: Flags,
}

impl RegexBuilder {
    pub fn new(pattern: &str) -> Self {
        RegexBuilder {
            pattern: pattern.to_string(),
            flags: Flags::empty(),
        }
    }

    fn set(mut self, flag: Flags, yes: bool) -> Self {
        self.flags.set(flag, yes);
        self
    }

    /// Compare letters through simple case folding.
    pub fn case_insensitive(self, yes: bool) -> Self {
        self.set(Flags::CASE_INSENSITIVE, yes)
    }

    /// Let `.` match `\n` and `\r`.
    pub fn dot_matches_newline(self, yes: bool) -> Self {
        self.set(Flags::DOT_ALL, yes)
    }

    /// Let `^`/`$` match at every line boundary.
    pub fn multi_line(self, yes: bool) -> Self {
        self.set(Flags::MULTILINE, yes)
    }

    /// Make plain quantifiers lazy. `*?` and `*+` style suffixes still apply.
    pub fn ungreedy(self, yes: bool) -> Self {
        self.set(Flags::UNGREEDY, yes)
    }

    /// Expand small fixed repetitions of single-char atoms at compile time.
    pub fn unroll(self, yes: bool) -> Self {
        self.set(Flags::UNROLL, yes)
    }

    /// Replace all flags at once.
    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Compile the pattern into a [`Regex`].
    pub fn build(self) -> Result<Regex, RegexError> {
        let program = compile(&self.pattern, self.flags)?;
        Ok(Regex { pattern: self.pattern, program })
    }
}

// === Match ===

/// A single match (or capture group) referencing the subject text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'t> {
    text: &'t str,
    start: usize,
    end: usize,
}

impl<'t> Match<'t> {
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset of the end of the match (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn as_str(&self) -> &'t str {
        &self.text[self.start..self.end]
    }

    /// Length of the match in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// === Captures ===

/// All capture groups of one match.
///
/// Group 0 is the entire match. Groups 1..N follow the opening parentheses
/// of the pattern from left to right.
pub struct Captures<'r, 't> {
    text: &'t str,
    slots: Slots,
    names: &'r [Option<String>],
}

impl<'r, 't> Captures<'r, 't> {
    /// Group `i`, or `None` if it did not participate in the match.
    pub fn get(&self, i: usize) -> Option<Match<'t>> {
        let (start, end) = self.slots.get(i).copied().flatten()?;
        Some(Match { text: self.text, start, end })
    }

    /// First participating group called `name`.
    pub fn name(&self, name: &str) -> Option<Match<'t>> {
        self.names
            .iter()
            .enumerate()
            .filter(|(_, n)| n.as_deref() == Some(name))
            .find_map(|(i, _)| self.get(i))
    }

    /// Number of groups, including group 0.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`: a successful match has at least group 0.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> CapturesIter<'_, 'r, 't> {
        CapturesIter { captures: self, index: 0 }
    }

    /// All groups in id order.
    pub fn to_vec(&self) -> Vec<Option<Match<'t>>> {
        self.iter().collect()
    }
}

impl std::fmt::Debug for Captures<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for i in 0..self.len() {
            list.entry(&self.get(i).map(|m| m.as_str()));
        }
        list.finish()
    }
}

/// Text of group `i`.
///
/// # Panics
///
/// Panics if group `i` did not participate in the match.
impl Index<usize> for Captures<'_, '_> {
    type Output = str;

    fn index(&self, i: usize) -> &str {
        match self.get(i) {
            Some(m) => m.as_str(),
            None => panic!("no group at index '{}'", i),
        }
    }
}

/// Text of the first participating group called `name`.
///
/// # Panics
///
/// Panics if no such group participated in the match.
impl<'n> Index<&'n str> for Captures<'_, '_> {
    type Output = str;

    fn index(&self, name: &'n str) -> &str {
        match self.name(name) {
            Some(m) => m.as_str(),
            None => panic!("no group named '{}'", name),
        }
    }
}

// === CapturesIter ===

/// Iterator over the groups of a [`Captures`].
pub struct CapturesIter<'c, 'r, 't> {
    captures: &'c Captures<'r, 't>,
    index: usize,
}

impl<'c, 'r, 't> Iterator for CapturesIter<'c, 'r, 't> {
    type Item = Option<Match<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.captures.len() {
            return None;
        }
        let m = self.captures.get(self.index);
        self.index += 1;
        Some(m)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.captures.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CapturesIter<'_, '_, '_> {}

// === Iteration over matches ===

struct Cursor<'r, 't> {
    regex: &'r Regex,
    text: &'t str,
    /// Where the next search starts; `None` once exhausted.
    next: Option<usize>,
}

impl<'r, 't> Cursor<'r, 't> {
    fn new(regex: &'r Regex, text: &'t str) -> Self {
        Cursor { regex, text, next: Some(0) }
    }

    fn advance(&mut self) -> Option<Captures<'r, 't>> {
        let start = self.next.take()?;
        let caps = self.regex.search_at(self.text, start)?;
        let (start, end) = caps.slots[0]?;
        self.next = if start == end {
            self.text[end..].chars().next().map(|c| end + c.len_utf8())
        } else {
            Some(end)
        };
        Some(caps)
    }
}

/// Iterator over successive matches in a text.
pub struct FindIter<'r, 't> {
    cursor: Cursor<'r, 't>,
}

impl<'r, 't> Iterator for FindIter<'r, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Match<'t>> {
        self.cursor.advance()?.get(0)
    }
}

/// Iterator over the capture groups of successive matches in a text.
pub struct CaptureMatches<'r, 't> {
    cursor: Cursor<'r, 't>,
}

impl<'r, 't> Iterator for CaptureMatches<'r, 't> {
    type Item = Captures<'r, 't>;

    fn next(&mut self) -> Option<Captures<'r, 't>> {
        self.cursor.advance()
    }
}
