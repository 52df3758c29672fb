// options.rs - Compile options.

use bitflags::bitflags;

bitflags! {
    /// Options fixed when a pattern is compiled.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        /// Literals, ranges, sets and backreferences compare case-insensitively.
        const CASE_INSENSITIVE = 1 << 0;
        /// `.` also matches `\n` and `\r`.
        const DOT_ALL = 1 << 1;
        /// `^` and `$` also match at line boundaries.
        const MULTILINE = 1 << 2;
        /// Plain quantifiers are lazy. Explicit `?`/`+` suffixes are unaffected.
        const UNGREEDY = 1 << 3;
        /// Expand small bounded repetitions of single-unit atoms at compile time.
        const UNROLL = 1 << 4;
    }
}
