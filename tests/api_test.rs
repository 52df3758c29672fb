// api_test.rs - Integration tests for the public API.

use cpsre::api::{Regex, RegexBuilder};
use cpsre::error::RegexError;
use cpsre::prelude::*;

// === Regex::new ===

#[test]
fn simple_pattern() {
    let re = Regex::new(r"\d+").unwrap();
    let m = re.find("abc 123 def").unwrap();
    assert_eq!(m.as_str(), "123");
}

#[test]
fn unicode_subject() {
    let re = Regex::new(r"せ.い").unwrap();
    let m = re.find("hello せかい world").unwrap();
    assert_eq!(m.as_str(), "せかい");
    assert_eq!(m.range(), 6..15);
}

#[test]
fn no_match_returns_none() {
    let re = Regex::new(r"xyz").unwrap();
    assert!(re.find("abc").is_none());
}

#[test]
fn empty_pattern() {
    let re = Regex::new(r"").unwrap();
    let m = re.find("hello").unwrap();
    assert_eq!(m.start(), 0);
    assert_eq!(m.end(), 0);
    assert!(m.is_empty());
}

#[test]
fn invalid_pattern_syntax_error() {
    let err = Regex::new(r"(unclosed").unwrap_err();
    match err {
        RegexError::Syntax { position } => assert_eq!(position, 9),
    }
}

#[test]
fn invalid_pattern_empty_char_class() {
    let err = Regex::new(r"[]").unwrap_err();
    assert!(matches!(err, RegexError::Syntax { .. }));
}

// === Regex::is_match ===

#[test]
fn is_match_true() {
    let re = Regex::new(r"world").unwrap();
    assert!(re.is_match("hello world"));
}

#[test]
fn is_match_false() {
    let re = Regex::new(r"world").unwrap();
    assert!(!re.is_match("hello"));
}

// === Regex::find ===

#[test]
fn find_start_end_range() {
    let re = Regex::new(r"b+").unwrap();
    let m = re.find("aabbbcc").unwrap();
    assert_eq!(m.start(), 2);
    assert_eq!(m.end(), 5);
    assert_eq!(m.range(), 2..5);
    assert_eq!(m.len(), 3);
    assert!(!m.is_empty());
}

#[test]
fn search_is_leftmost() {
    let re = Regex::new(r"a").unwrap();
    assert_eq!(re.find("xaxa").unwrap().start(), 1);
}

// === match_full / match_prefix ===

#[test]
fn match_full_requires_whole_text() {
    let re = Regex::new(r"(\d+)-(\d+)").unwrap();
    let caps = re.match_full("10-20").unwrap();
    assert_eq!(&caps[1], "10");
    assert_eq!(&caps[2], "20");
    assert!(re.match_full("10-20x").is_none());
    assert!(re.match_full("x10-20").is_none());
}

#[test]
fn match_full_backtracks_to_reach_end() {
    let re = Regex::new(r"a|ab").unwrap();
    assert_eq!(re.match_full("ab").unwrap().get(0).unwrap().range(), 0..2);
    assert_eq!(re.match_prefix("ab").unwrap().get(0).unwrap().range(), 0..1);
}

#[test]
fn match_prefix_anchors_at_start() {
    let re = Regex::new(r"\w+").unwrap();
    assert_eq!(&re.match_prefix("foo bar").unwrap()[0], "foo");
    assert!(re.match_prefix(" foo").is_none());
}

// === Regex::captures ===

#[test]
fn captures_groups() {
    let re = Regex::new(r"(\w+)@(\w+)").unwrap();
    let caps = re.captures("user@host").unwrap();
    assert_eq!(caps.get(0).unwrap().as_str(), "user@host");
    assert_eq!(caps.get(1).unwrap().as_str(), "user");
    assert_eq!(caps.get(2).unwrap().as_str(), "host");
    assert_eq!(caps.len(), 3); // group 0 + 2 captures
}

#[test]
fn captures_optional_group() {
    let re = Regex::new(r"(a)(b)?").unwrap();
    let caps = re.captures("a").unwrap();
    assert!(caps.get(1).is_some());
    assert!(caps.get(2).is_none()); // group 2 didn't participate
}

#[test]
fn captures_named() {
    let re = Regex::new(r"(?<user>\w+)@(?<host>\w+)").unwrap();
    let caps = re.captures("alice@example").unwrap();
    assert_eq!(caps.name("user").unwrap().as_str(), "alice");
    assert_eq!(&caps["host"], "example");
    assert!(caps.name("port").is_none());
}

#[test]
fn captures_no_match() {
    let re = Regex::new(r"(\d+)").unwrap();
    assert!(re.captures("no digits").is_none());
}

#[test]
fn captures_len() {
    let re = Regex::new(r"(a)(b)(?:c)(?<d>d)").unwrap();
    assert_eq!(re.captures_len(), 3);
    let names: Vec<_> = re.capture_names().collect();
    assert_eq!(names, vec![None, None, None, Some("d")]);
}

#[test]
fn captures_iter_and_decomposition() {
    let re = Regex::new(r"(\d+)-(\d+)?").unwrap();
    let caps = re.captures("12-").unwrap();
    let groups: Vec<Option<&str>> = caps.iter().map(|m| m.map(|m| m.as_str())).collect();
    assert_eq!(groups, vec![Some("12-"), Some("12"), None]);
    let spans: Vec<_> = caps.to_vec().into_iter().map(|m| m.map(|m| m.range())).collect();
    assert_eq!(spans, vec![Some(0..3), Some(0..2), None]);
}

#[test]
fn search_at_offset() {
    let re = Regex::new(r"\d").unwrap();
    let caps = re.search_at("1a2b3", 1).unwrap();
    assert_eq!(caps.get(0).unwrap().start(), 2);
    assert!(re.search_at("1a2b3", 6).is_none());
}

// === Regex::find_iter ===

#[test]
fn find_iter_multiple() {
    let re = Regex::new(r"\d+").unwrap();
    let nums: Vec<&str> = re.find_iter("a1b22c333").map(|m| m.as_str()).collect();
    assert_eq!(nums, vec!["1", "22", "333"]);
}

#[test]
fn find_iter_no_matches() {
    let re = Regex::new(r"\d+").unwrap();
    let matches: Vec<_> = re.find_iter("no digits").collect();
    assert!(matches.is_empty());
}

#[test]
fn find_iter_empty_pattern() {
    let re = Regex::new(r"").unwrap();
    let matches: Vec<_> = re.find_iter("ab").collect();
    // Should find empty match at positions 0, 1, 2
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0].start(), 0);
    assert_eq!(matches[1].start(), 1);
    assert_eq!(matches[2].start(), 2);
}

#[test]
fn find_iter_zero_width_lookahead() {
    let re = Regex::new(r"(?=x)").unwrap();
    let starts: Vec<_> = re.find_iter("xxx").map(|m| m.start()).collect();
    assert_eq!(starts, vec![0, 1, 2]);
}

#[test]
fn find_iter_mixed_empty_and_nonempty() {
    let re = Regex::new(r"a*").unwrap();
    let spans: Vec<_> = re.find_iter("baa").map(|m| m.range()).collect();
    assert_eq!(spans, vec![0..0, 1..3, 3..3]);
}

#[test]
fn greedy_versus_lazy_iteration() {
    let greedy = Regex::new(r"a+").unwrap();
    let lazy = Regex::new(r"a+?").unwrap();
    assert_eq!(greedy.find_iter("aaa").count(), 1);
    assert_eq!(lazy.find_iter("aaa").count(), 3);
}

#[test]
fn captures_iter_pairs() {
    let re = Regex::new(r"(?<k>\w+)=(?<v>\w+)").unwrap();
    let pairs: Vec<(&str, &str)> = re
        .captures_iter("a=1 b=2 c=3")
        .map(|c| (c.name("k").unwrap().as_str(), c.name("v").unwrap().as_str()))
        .collect();
    assert_eq!(pairs, vec![("a", "1"), ("b", "2"), ("c", "3")]);
}

// === RegexBuilder ===

#[test]
fn builder_case_insensitive() {
    let re = RegexBuilder::new(r"hello")
        .case_insensitive(true)
        .build()
        .unwrap();
    assert!(re.is_match("HELLO"));
    assert!(re.is_match("Hello"));
    assert!(re.is_match("hello"));
}

#[test]
fn builder_dot_matches_newline() {
    let re_no = Regex::new(r"a.b").unwrap();
    assert!(!re_no.is_match("a\nb"));

    let re_yes = RegexBuilder::new(r"a.b")
        .dot_matches_newline(true)
        .build()
        .unwrap();
    assert!(re_yes.is_match("a\nb"));
}

#[test]
fn builder_multi_line() {
    let re = RegexBuilder::new(r"^b").multi_line(true).build().unwrap();
    assert_eq!(re.find("a\nb").unwrap().start(), 2);
}

#[test]
fn builder_ungreedy() {
    let re = RegexBuilder::new(r"<.+>").ungreedy(true).build().unwrap();
    assert_eq!(re.find("<a><b>").unwrap().as_str(), "<a>");
}

#[test]
fn builder_chaining() {
    let re = Regex::builder(r"a.b")
        .case_insensitive(true)
        .dot_matches_newline(true)
        .unroll(true)
        .build()
        .unwrap();
    assert!(re.is_match("A\nB"));
    assert_eq!(re.flags(), Flags::CASE_INSENSITIVE | Flags::DOT_ALL | Flags::UNROLL);
}

#[test]
fn builder_toggle_off() {
    let re = Regex::builder("A")
        .case_insensitive(true)
        .case_insensitive(false)
        .build()
        .unwrap();
    assert!(!re.is_match("a"));
    assert_eq!(re.flags(), Flags::empty());
}

// === Union ===

#[test]
fn union_numbers_groups_per_pattern() {
    let re = Regex::union(&[r"(\d+)", r"(?<word>[a-z]+)", r"(.)\1"]).unwrap();
    assert_eq!(re.captures_len(), 3);
    let caps = re.captures("--").unwrap();
    assert!(caps.get(1).is_none());
    assert!(caps.get(2).is_none());
    assert_eq!(&caps[3], "-");
    assert_eq!(&re.captures("abc").unwrap()["word"], "abc");
}

// === RegexError ===

#[test]
fn error_display() {
    let err = Regex::new(r"a{2,1}").unwrap_err();
    assert_eq!(err.to_string(), "syntax error at position 5");
}

#[test]
fn error_is_std_error() {
    let err = Regex::new(r"(").unwrap_err();
    let _: &dyn std::error::Error = &err;
}

#[test]
fn error_position() {
    assert_eq!(Regex::new(r"ab)").unwrap_err().position(), 2);
}

// === Prelude ===

#[test]
fn prelude_imports_work() {
    // This test verifies that the prelude re-exports are accessible.
    let re: Regex = Regex::new(r"test").unwrap();
    let m: Option<Match<'_>> = re.find("a test");
    assert!(m.is_some());
    let caps: Option<Captures<'_, '_>> = re.captures("test");
    assert!(caps.is_some());
    let _: FindIter<'_, '_> = re.find_iter("");
    let _: CaptureMatches<'_, '_> = re.captures_iter("");
}

// === Complex patterns ===

#[test]
fn alternation() {
    let re = Regex::new(r"cat|dog").unwrap();
    assert_eq!(re.find("I have a dog").unwrap().as_str(), "dog");
}

#[test]
fn backreference() {
    let re = Regex::new(r"(\w)\1").unwrap();
    let m = re.find("abccd").unwrap();
    assert_eq!(m.as_str(), "cc");
}

#[test]
fn lookahead() {
    let re = Regex::new(r"foo(?=bar)").unwrap();
    assert!(re.is_match("foobar"));
    assert!(!re.is_match("foobaz"));
}

#[test]
fn lookbehind() {
    let re = Regex::new(r"(?<=@)\w+").unwrap();
    let m = re.find("user@host").unwrap();
    assert_eq!(m.as_str(), "host");
}

#[test]
fn possessive_quantifier() {
    let re = Regex::new(r"a++b").unwrap();
    // "aab" should match since possessive consumes all 'a's, then finds 'b'
    assert!(re.is_match("aab"));
    // "aa" should not match since possessive consumes 'a's but no 'b'
    assert!(!re.is_match("aa"));
}

#[test]
fn date_extraction() {
    let re = Regex::new(r"(?<y>\d{4})-(?<m>\d{2})-(?<d>\d{2})").unwrap();
    let caps = re.captures("Date: 2026-10-19").unwrap();
    assert_eq!(&caps["y"], "2026");
    assert_eq!(&caps["m"], "10");
    assert_eq!(&caps["d"], "19");
}

#[test]
fn debug_impl() {
    let re = Regex::new(r"test").unwrap();
    let debug = format!("{:?}", re);
    assert!(debug.contains("Regex"));
    assert!(debug.contains("test"));
}

#[test]
fn captures_debug_impl() {
    let re = Regex::new(r"(a)(b)?").unwrap();
    let caps = re.captures("a").unwrap();
    assert_eq!(format!("{:?}", caps), r#"[Some("a"), Some("a"), None]"#);
}

#[test]
fn regex_is_shareable_across_threads() {
    let re = std::sync::Arc::new(Regex::new(r"(\d+)").unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let re = re.clone();
            std::thread::spawn(move || {
                let text = format!("n{}", i * 10);
                re.captures(&text).map(|c| c[1].to_string())
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        results,
        vec![Some("0".into()), Some("10".into()), Some("20".into()), Some("30".into())]
    );
}
