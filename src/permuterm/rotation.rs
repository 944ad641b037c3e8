//! Permuterm rotations and the wildcard-to-prefix reduction.
//!
//! A term `t` is indexed under every cyclic rotation of `t$`. A pattern
//! `pre*suf` matches `t` exactly when some rotation of `t$` starts with
//! `suf$pre`, which turns a wildcard anywhere in the word into a prefix scan.

use crate::config::PermutermConfig;
use crate::error::{PermdexError, Result};

/// All `|term| + 1` rotations of `term` followed by `sentinel`.
///
/// Position 0 is `term$` itself and the last one is `$term`. Rotation happens
/// on character boundaries, so multi-byte terms rotate whole characters.
///
/// ```
/// use permdex::permuterm::rotation::rotations;
///
/// assert_eq!(rotations("dog", '$'), vec!["dog$", "og$d", "g$do", "$dog"]);
/// ```
pub fn rotations(term: &str, sentinel: char) -> Vec<String> {
    let mut word = String::with_capacity(term.len() + sentinel.len_utf8());
    word.push_str(term);
    word.push(sentinel);

    word.char_indices()
        .map(|(start, _)| {
            let mut rotation = String::with_capacity(word.len());
            rotation.push_str(&word[start..]);
            rotation.push_str(&word[..start]);
            rotation
        })
        .collect()
}

/// Recover the term a rotation was generated from.
///
/// Returns `None` if `rotation` does not contain the sentinel.
pub fn unrotate(rotation: &str, sentinel: char) -> Option<String> {
    let (tail, head) = rotation.split_once(sentinel)?;
    Some(format!("{head}{tail}"))
}

/// A parsed query pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WildcardPattern {
    /// No wildcard: the whole term.
    Exact(String),
    /// One wildcard between `prefix` and `suffix`, either possibly empty.
    Single { prefix: String, suffix: String },
}

impl WildcardPattern {
    /// Parse `pattern`, accepting at most one wildcard marker.
    ///
    /// A sentinel inside the pattern is not an error: no term contains it,
    /// so such a pattern simply matches nothing.
    pub fn parse(pattern: &str, config: &PermutermConfig) -> Result<Self> {
        match pattern.matches(config.wildcard).count() {
            0 => Ok(WildcardPattern::Exact(pattern.to_string())),
            1 => {
                let (prefix, suffix) = pattern
                    .split_once(config.wildcard)
                    .unwrap_or((pattern, ""));
                Ok(WildcardPattern::Single {
                    prefix: prefix.to_string(),
                    suffix: suffix.to_string(),
                })
            }
            n => Err(PermdexError::invalid_query(
                pattern,
                format!(
                    "found {n} '{}' wildcards, only one is supported",
                    config.wildcard
                ),
            )),
        }
    }

    /// The rotation prefix answering this pattern: `term$` for an exact
    /// term, `suf$pre` for `pre*suf`.
    pub fn rotation_prefix(&self, sentinel: char) -> String {
        match self {
            WildcardPattern::Exact(term) => format!("{term}{sentinel}"),
            WildcardPattern::Single { prefix, suffix } => format!("{suffix}{sentinel}{prefix}"),
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, WildcardPattern::Exact(_))
    }

    /// Direct check of a term against the pattern, without any index.
    pub fn matches(&self, term: &str) -> bool {
        match self {
            WildcardPattern::Exact(exact) => term == exact,
            WildcardPattern::Single { prefix, suffix } => {
                term.len() >= prefix.len() + suffix.len()
                    && term.starts_with(prefix.as_str())
                    && term.ends_with(suffix.as_str())
            }
        }
    }
}

/// Reduce `pattern` to the rotation prefix that answers it.
///
/// ```
/// use permdex::config::PermutermConfig;
/// use permdex::permuterm::rotation::wildcard_to_prefix;
///
/// let config = PermutermConfig::default();
/// assert_eq!(wildcard_to_prefix("d*g", &config).unwrap(), "g$d");
/// assert_eq!(wildcard_to_prefix("dog", &config).unwrap(), "dog$");
/// assert!(wildcard_to_prefix("a*b*c", &config).is_err());
/// ```
pub fn wildcard_to_prefix(pattern: &str, config: &PermutermConfig) -> Result<String> {
    Ok(WildcardPattern::parse(pattern, config)?.rotation_prefix(config.sentinel))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PermutermConfig {
        PermutermConfig::default()
    }

    #[test]
    fn test_rotation_order() {
        assert_eq!(rotations("cat", '$'), vec!["cat$", "at$c", "t$ca", "$cat"]);
        assert_eq!(rotations("", '$'), vec!["$"]);
    }

    #[test]
    fn test_rotations_of_multibyte_term() {
        let rots = rotations("né", '$');
        assert_eq!(rots, vec!["né$", "é$n", "$né"]);
        for rot in &rots {
            assert_eq!(unrotate(rot, '$').as_deref(), Some("né"));
        }
    }

    #[test]
    fn test_unrotate() {
        for rot in rotations("bird", '$') {
            assert_eq!(unrotate(&rot, '$').as_deref(), Some("bird"));
        }
        assert_eq!(unrotate("bird", '$'), None);
    }

    #[test]
    fn test_wildcard_to_prefix() {
        let config = config();
        assert_eq!(wildcard_to_prefix("dog", &config).unwrap(), "dog$");
        assert_eq!(wildcard_to_prefix("d*g", &config).unwrap(), "g$d");
        assert_eq!(wildcard_to_prefix("do*", &config).unwrap(), "$do");
        assert_eq!(wildcard_to_prefix("*og", &config).unwrap(), "og$");
        assert_eq!(wildcard_to_prefix("*", &config).unwrap(), "$");
    }

    #[test]
    fn test_multiple_wildcards_rejected() {
        let err = wildcard_to_prefix("a*b*c", &config()).unwrap_err();
        match err {
            PermdexError::InvalidQuery { pattern, .. } => assert_eq!(pattern, "a*b*c"),
            other => panic!("Expected InvalidQuery, got {other:?}"),
        }
        assert!(wildcard_to_prefix("**", &config()).is_err());
    }

    #[test]
    fn test_sentinel_in_pattern_is_a_plain_character() {
        let config = config();
        assert_eq!(
            WildcardPattern::parse("do$g", &config).unwrap(),
            WildcardPattern::Exact("do$g".to_string())
        );
        assert_eq!(wildcard_to_prefix("us$", &config).unwrap(), "us$$");
        assert_eq!(wildcard_to_prefix("u$*", &config).unwrap(), "$u$");
    }

    #[test]
    fn test_custom_markers() {
        let config = PermutermConfig {
            sentinel: '#',
            wildcard: '%',
        };
        assert_eq!(wildcard_to_prefix("ca%s", &config).unwrap(), "s#ca");
        assert_eq!(rotations("ab", config.sentinel), vec!["ab#", "b#a", "#ab"]);
    }

    #[test]
    fn test_pattern_matches() {
        let pattern = WildcardPattern::parse("ab*ba", &config()).unwrap();
        assert!(pattern.matches("abba"));
        assert!(pattern.matches("abcba"));
        assert!(!pattern.matches("aba"));
        assert!(!pattern.is_exact());

        let pattern = WildcardPattern::parse("dog", &config()).unwrap();
        assert!(pattern.is_exact());
        assert!(pattern.matches("dog"));
        assert!(!pattern.matches("hotdog"));
    }
}
