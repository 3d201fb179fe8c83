//! Denylist word masking.
//!
//! A [`ContentFilter`] holds an ordered list of [`MaskRule`]s. Each rule's
//! pattern is matched literally and case-insensitively, and every match is
//! replaced by the rule's mask.
//!
//! Rules are checked when the filter is built:
//! - pattern and mask must contain a non-whitespace character, so filtering
//!   never turns visible text blank,
//! - a mask may not be longer than its pattern, so filtering never grows a
//!   validated string,
//! - no mask character may case-fold onto a character of any pattern, so a
//!   second pass can never find a new match (filtering is idempotent).
//!
//! Overlap is decided with the same case folding the matchers use, which is
//! wider than [`char::to_lowercase`] (`ſ` matches `s`, `K` matches `k`).

use std::borrow::Cow;
use std::str::FromStr;

use regex::{NoExpand, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Character used for masks that are not given explicitly.
pub const DEFAULT_MASK_CHAR: char = '*';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("denylist pattern must not be empty")]
    EmptyPattern,

    #[error("mask for '{0}' must not be empty")]
    EmptyMask(String),

    #[error("mask for '{0}' must contain a non-whitespace character")]
    BlankMask(String),

    #[error("mask '{mask}' is longer than pattern '{pattern}'")]
    MaskTooLong { pattern: String, mask: String },

    #[error("mask '{mask}' shares character '{ch}' with pattern '{pattern}'")]
    MaskOverlapsPattern {
        mask: String,
        pattern: String,
        ch: char,
    },

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// One denylist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskRule {
    pub pattern: String,
    pub mask: String,
}

impl MaskRule {
    pub fn new(pattern: impl Into<String>, mask: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            mask: mask.into(),
        }
    }

    /// A rule masking `pattern` with one [`DEFAULT_MASK_CHAR`] per character.
    pub fn starred(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let mask = DEFAULT_MASK_CHAR
            .to_string()
            .repeat(pattern.chars().count());
        Self { pattern, mask }
    }
}

impl FromStr for MaskRule {
    type Err = FilterError;

    /// Parse `word` or `word:mask`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(':') {
            Some((pattern, mask)) => Ok(Self::new(pattern.trim(), mask.trim())),
            None if s.is_empty() => Err(FilterError::EmptyPattern),
            None => Ok(Self::starred(s)),
        }
    }
}

/// Parse a comma-separated denylist, e.g. `"tonto,feo:***"`.
///
/// Blank entries (from trailing commas) are skipped.
pub fn parse_denylist(spec: &str) -> Result<Vec<MaskRule>, FilterError> {
    spec.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(str::parse::<MaskRule>)
        .collect()
}

#[derive(Debug, Clone)]
struct CompiledRule {
    matcher: Regex,
    mask: String,
}

/// Case-insensitive denylist filter.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    rules: Vec<CompiledRule>,
}

impl ContentFilter {
    /// Filter that leaves every string untouched.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(rules: Vec<MaskRule>) -> Result<Self, FilterError> {
        for rule in &rules {
            check_rule(rule)?;
        }
        let folds = rules
            .iter()
            .map(|rule| pattern_chars(&rule.pattern).map(|class| (rule, class)))
            .collect::<Result<Vec<_>, FilterError>>()?;
        for rule in &rules {
            for (other, class) in &folds {
                if let Some(ch) = shared_char(&rule.mask, class) {
                    return Err(FilterError::MaskOverlapsPattern {
                        mask: rule.mask.clone(),
                        pattern: other.pattern.clone(),
                        ch,
                    });
                }
            }
        }

        let rules = rules
            .into_iter()
            .map(|rule| {
                let matcher = case_insensitive(&regex::escape(&rule.pattern), &rule.pattern)?;
                Ok(CompiledRule {
                    matcher,
                    mask: rule.mask,
                })
            })
            .collect::<Result<Vec<_>, FilterError>>()?;

        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Mask every denylisted substring of `text`.
    ///
    /// Borrows when nothing matched.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut out = Cow::Borrowed(text);
        for rule in &self.rules {
            let replaced = match rule.matcher.replace_all(&out, NoExpand(&rule.mask)) {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            };
            if let Some(s) = replaced {
                out = Cow::Owned(s);
            }
        }
        out
    }
}

fn check_rule(rule: &MaskRule) -> Result<(), FilterError> {
    if rule.pattern.trim().is_empty() {
        return Err(FilterError::EmptyPattern);
    }
    if rule.mask.is_empty() {
        return Err(FilterError::EmptyMask(rule.pattern.clone()));
    }
    if rule.mask.trim().is_empty() {
        return Err(FilterError::BlankMask(rule.pattern.clone()));
    }
    if rule.mask.chars().count() > rule.pattern.chars().count() {
        return Err(FilterError::MaskTooLong {
            pattern: rule.pattern.clone(),
            mask: rule.mask.clone(),
        });
    }
    Ok(())
}

fn case_insensitive(expr: &str, pattern: &str) -> Result<Regex, FilterError> {
    RegexBuilder::new(expr)
        .case_insensitive(true)
        .build()
        .map_err(|e| FilterError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: e.to_string(),
        })
}

/// A class matching any single character the matcher for `pattern` would
/// treat as one of its characters.
fn pattern_chars(pattern: &str) -> Result<Regex, FilterError> {
    let mut class = String::from("[");
    for ch in pattern.chars() {
        class.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4])));
    }
    class.push(']');
    case_insensitive(&class, pattern)
}

fn shared_char(mask: &str, pattern_chars: &Regex) -> Option<char> {
    mask.chars()
        .find(|ch| pattern_chars.is_match(ch.encode_utf8(&mut [0; 4])))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn filter(words: &[&str]) -> ContentFilter {
        ContentFilter::new(words.iter().map(|w| MaskRule::starred(*w)).collect()).unwrap()
    }

    #[test]
    fn empty_filter_is_identity() {
        let f = ContentFilter::empty();
        assert!(matches!(f.apply("anything"), Cow::Borrowed("anything")));
    }

    #[test]
    fn masks_case_insensitively() {
        let f = filter(&["tonto"]);
        assert_eq!(f.apply("eres TONTO y tonto"), "eres ***** y *****");
    }

    #[test]
    fn uses_explicit_mask() {
        let f = ContentFilter::new(vec![MaskRule::new("feo", "#")]).unwrap();
        assert_eq!(f.apply("muy Feo"), "muy #");
    }

    #[test]
    fn patterns_are_literal_not_regex() {
        let f = filter(&["a.b"]);
        assert_eq!(f.apply("axb a.b"), "axb ***");
    }

    #[test]
    fn rules_apply_in_order() {
        let f = ContentFilter::new(vec![MaskRule::new("malo", "##"), MaskRule::starred("mal")])
            .unwrap();
        assert_eq!(f.apply("malo mal"), "## ***");
    }

    #[test]
    fn rejects_mask_longer_than_pattern() {
        let err = ContentFilter::new(vec![MaskRule::new("ab", "***")]).unwrap_err();
        assert!(matches!(err, FilterError::MaskTooLong { .. }));
    }

    #[test]
    fn rejects_mask_sharing_pattern_chars() {
        let err = ContentFilter::new(vec![MaskRule::new("abc", "A")]).unwrap_err();
        assert!(matches!(err, FilterError::MaskOverlapsPattern { ch: 'A', .. }));
    }

    #[test]
    fn rejects_mask_that_would_form_another_rule() {
        let err = ContentFilter::new(vec![MaskRule::new("xy", "z"), MaskRule::new("zz", "x")])
            .unwrap_err();
        assert!(matches!(err, FilterError::MaskOverlapsPattern { .. }));
    }

    #[test]
    fn rejects_empty_entries() {
        assert_eq!(
            ContentFilter::new(vec![MaskRule::new(" ", "*")]).unwrap_err(),
            FilterError::EmptyPattern
        );
        assert!(matches!(
            ContentFilter::new(vec![MaskRule::new("x", "")]).unwrap_err(),
            FilterError::EmptyMask(_)
        ));
    }

    #[test]
    fn rejects_whitespace_only_mask() {
        assert_eq!(
            ContentFilter::new(vec![MaskRule::new("bad", " ")]).unwrap_err(),
            FilterError::BlankMask("bad".to_owned())
        );
        assert!("bad: ".parse::<MaskRule>().is_ok_and(|r| ContentFilter::new(vec![r]).is_err()));
    }

    #[test]
    fn rejects_mask_that_folds_onto_a_pattern_char() {
        // Long s and the Kelvin sign fold onto ASCII letters.
        let err = ContentFilter::new(vec![MaskRule::new("s", "#"), MaskRule::new("a", "ſ")])
            .unwrap_err();
        assert!(matches!(err, FilterError::MaskOverlapsPattern { ch: 'ſ', .. }));

        let err = ContentFilter::new(vec![MaskRule::new("ok", "\u{212A}")]).unwrap_err();
        assert!(matches!(err, FilterError::MaskOverlapsPattern { ch: '\u{212A}', .. }));
    }

    #[test]
    fn class_metacharacters_in_patterns_are_literal() {
        let f = ContentFilter::new(vec![MaskRule::new("a-z", "#"), MaskRule::new("^]", "b")])
            .unwrap();
        assert_eq!(f.apply("a-z m ^]"), "# m b");
    }

    #[test]
    fn parses_denylist_spec() {
        let rules = parse_denylist("tonto, feo:#, ,").unwrap();
        assert_eq!(
            rules,
            vec![MaskRule::new("tonto", "*****"), MaskRule::new("feo", "#")]
        );
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(s in "[a-zA-ZñÑſ\u{212A}ßéÉ ]{0,100}") {
            let f = filter(&["ab", "Bad", "zz", "ñu", "sé"]);
            let once = f.apply(&s).into_owned();
            let twice = f.apply(&once).into_owned();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn every_accepted_filter_is_idempotent(
            rules in proptest::collection::vec(("[sSſkK\u{212A}aé]{1,3}", "[sSſkK\u{212A}é*#]{1,3}"), 1..4),
            s in "[sSſkK\u{212A}aé* ]{0,40}",
        ) {
            let rules = rules.into_iter().map(|(p, m)| MaskRule::new(p, m)).collect();
            if let Ok(f) = ContentFilter::new(rules) {
                let once = f.apply(&s).into_owned();
                let twice = f.apply(&once).into_owned();
                prop_assert_eq!(once, twice);
            }
        }

        #[test]
        fn filtering_never_grows_content(s in "[a-zA-ZñÑ ]{0,100}") {
            let f = ContentFilter::new(vec![
                MaskRule::new("ñandu", "#"),
                MaskRule::starred("bad"),
            ]).unwrap();
            prop_assert!(f.apply(&s).chars().count() <= s.chars().count());
        }
    }
}
