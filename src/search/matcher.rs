// src/search/matcher.rs
// =============================================================================
// Compiles the caller's regular expression and tests file contents with it.
//
// Matching is anchored at the START of the text only:
//   "^foo" and "foo" both match "foobar"
//   "bar" does NOT match "foobar" (no substring search)
//   "foo" matches "foo and more" (no full-string requirement either)
//
// The pattern is compiled exactly as written. Anchoring happens at search
// time: the leftmost match is looked up and only counts if it begins at
// offset 0.
// =============================================================================

use regex::Regex;

#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Validate and compile a pattern
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// The pattern as the caller wrote it
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Does the pattern match at the beginning of `text`?
    pub fn matches(&self, text: &str) -> bool {
        // Leftmost-first search: if any match starts at 0, find() returns it
        self.regex.find(text).map_or(false, |m| m.start() == 0)
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why not rewrite the pattern as \A(?:pattern)?
//    - Text glued around the caller's pattern can change what it means.
//      With (?x) a trailing "# comment" would swallow the closing ")"
//    - Inputs like "a)(b" would also become valid once wrapped
//
// 2. Why not just check for ^ at the front?
//    - With (?m), ^ matches after every newline, so a match on line 2
//      would count. find() reports the real offset, which stays non-zero
//
// 3. Case sensitivity
//    - Matching is case-sensitive by default; callers can still write (?i)
// -----------------------------------------------------------------------------
