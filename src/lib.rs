//! # cpsre
//!
//! Backtracking regex engine built from two pieces: a table-driven
//! pushdown automaton that parses patterns into an AST, and a
//! continuation-passing matcher that walks that AST directly. Lookbehind
//! is handled by mirroring the lookbehind body once at compile time and
//! walking it right to left; no separate reverse program is built.
//!
//! ## Quick Start
//!
//! ```rust
//! use cpsre::prelude::*;
//!
//! let re = Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap();
//! let m = re.find("Date: 2026-02-12").unwrap();
//! assert_eq!(m.as_str(), "2026-02-12");
//! assert_eq!(m.start(), 6);
//! ```
//!
//! Flags are set through [`RegexBuilder`](api::RegexBuilder):
//!
//! ```rust
//! use cpsre::prelude::*;
//!
//! let re = Regex::builder(r"(?<=\$)\d+")
//!     .ungreedy(true)
//!     .build()
//!     .unwrap();
//! assert_eq!(re.find("cost: $42").unwrap().as_str(), "4");
//! ```
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`chars`] | Character classes and case folding |
//! | [`grammar`] | Parser rule table: (symbol, token) to rule |
//! | [`parser`] | Pushdown automaton driving the rule table |
//! | [`indexer`] | Capture numbering and backreference resolution |
//! | [`ast`] | Pattern tree |
//! | [`invert`] | Tree mirroring for lookbehind |
//! | [`api`] | `Regex`, `Captures`, match iterators |
//! | [`union`] | Alternation of separately numbered patterns |
//! | [`options`] | Compile flags |
//! | [`error`] | Compile errors |

/// Logging macros - no-op when the logging feature is disabled.
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

pub mod api;
pub mod ast;
pub mod chars;
pub mod error;
pub mod grammar;
pub mod indexer;
pub mod invert;
pub mod options;
pub mod parser;
pub mod prelude;
pub mod union;

mod compile;
mod exec;
