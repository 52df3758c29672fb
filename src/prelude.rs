// prelude.rs - Convenient re-exports for the public API.
//
//! # Prelude
//!
//! ```
//! use cpsre::prelude::*;
//!
//! let re = Regex::new(r"(?<n>\d+)").unwrap();
//! let caps = re.captures("answer: 42").unwrap();
//! assert_eq!(&caps["n"], "42");
//! ```

pub use crate::api::{
    CaptureMatches, Captures, CapturesIter, FindIter, Match, Regex, RegexBuilder,
};
pub use crate::error::RegexError;
pub use crate::options::Flags;
