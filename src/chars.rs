// chars.rs - Character classifiers and simple case folding.
//
// Classes are ASCII-scoped (`\d`, `\w`, `\s` never match non-ASCII).
// Case folding is one-to-one: a char folds to a single char, multi-char
// expansions (e.g. 'ß' -> "ss") are left untouched.

#[inline]
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Space, tab, line feed, carriage return, vertical tab and form feed.
#[inline]
pub fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

#[inline]
pub fn is_line_terminator(c: char) -> bool {
    c == '\n' || c == '\r'
}

#[inline]
pub fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// A char that may start a group or backreference name.
#[inline]
pub fn is_name_start(c: char) -> bool {
    is_word(c) && !is_digit(c)
}

/// Lowercase fold of `c` when it maps to exactly one char.
pub fn fold_case(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_lowercase();
    }
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Uppercase counterpart of `c` when it maps to exactly one char.
fn upper_case(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_uppercase();
    }
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

#[inline]
pub fn eq_ignore_case(a: char, b: char) -> bool {
    a == b || fold_case(a) == fold_case(b)
}

/// Whether `lo..=hi` contains `c` or one of its case variants.
pub fn range_contains_ignore_case(lo: char, hi: char, c: char) -> bool {
    let hit = |x: char| lo <= x && x <= hi;
    hit(c) || hit(fold_case(c)) || hit(upper_case(c))
}
