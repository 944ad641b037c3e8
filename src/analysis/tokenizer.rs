//! Tokenizers split normalized text into raw tokens.

use regex::Regex;

use crate::error::{PermdexError, Result};

/// Trait for tokenizers that turn text into tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;

    fn name(&self) -> &'static str;
}

/// Characters treated as token separators in addition to whitespace.
///
/// Covers `$` and `*`, so the default sentinel and wildcard can never end up
/// inside a term.
pub const DEFAULT_PUNCTUATION: &str = r#"[\t\n\r.,;:!?(){}\[\]"`~@#$%^&*+\-/=|<>_]"#;

/// Lowercases text, turns punctuation into whitespace and splits on
/// whitespace. Apostrophes are left in place for [`ApostropheRule`].
#[derive(Debug, Clone)]
pub struct PunctuationTokenizer {
    punctuation: Regex,
}

impl PunctuationTokenizer {
    pub fn new() -> Self {
        Self::with_pattern(DEFAULT_PUNCTUATION).expect("default punctuation pattern is valid")
    }

    /// Use a custom character class of separators.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let punctuation = Regex::new(pattern)
            .map_err(|e| PermdexError::analysis(format!("Invalid punctuation pattern: {e}")))?;
        Ok(PunctuationTokenizer { punctuation })
    }
}

impl Default for PunctuationTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for PunctuationTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.punctuation
            .replace_all(&lowered, " ")
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    fn name(&self) -> &'static str {
        "punctuation"
    }
}

/// Apostrophe handling applied to each token.
///
/// When `collapse_suffix` is set, `<alnum>+'<letter>` becomes its stem
/// (`john's` -> `john`). Any other apostrophe, straight or curly, is
/// deleted.
#[derive(Debug, Clone)]
pub struct ApostropheRule {
    collapse_suffix: bool,
    suffix: Regex,
    apostrophes: Regex,
}

impl ApostropheRule {
    pub fn new(collapse_suffix: bool) -> Self {
        ApostropheRule {
            collapse_suffix,
            suffix: Regex::new(r"^(?P<stem>[A-Za-z0-9]+)'[A-Za-z]$")
                .expect("suffix pattern is valid"),
            apostrophes: Regex::new(r"['\u{2019}]").expect("apostrophe pattern is valid"),
        }
    }

    pub fn apply(&self, token: &str) -> String {
        if self.collapse_suffix {
            if let Some(caps) = self.suffix.captures(token) {
                return caps["stem"].to_string();
            }
        }
        self.apostrophes.replace_all(token, "").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_tokenizer() {
        let tokenizer = PunctuationTokenizer::new();
        let tokens = tokenizer.tokenize("Hello, World! (A-b) x_y $5 a*b");
        assert_eq!(tokens, vec!["hello", "world", "a", "b", "x", "y", "5", "a", "b"]);
        assert_eq!(tokenizer.name(), "punctuation");
    }

    #[test]
    fn test_tokenizer_keeps_apostrophes() {
        let tokenizer = PunctuationTokenizer::new();
        assert_eq!(tokenizer.tokenize("John's dog"), vec!["john's", "dog"]);
    }

    #[test]
    fn test_empty_text() {
        let tokenizer = PunctuationTokenizer::new();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize(" .,; ").is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            PunctuationTokenizer::with_pattern("[unclosed"),
            Err(PermdexError::Analysis(_))
        ));
    }

    #[test]
    fn test_apostrophe_rule() {
        let rule = ApostropheRule::new(true);
        assert_eq!(rule.apply("john's"), "john");
        assert_eq!(rule.apply("o'neill"), "oneill");
        assert_eq!(rule.apply("rock\u{2019}n"), "rockn");
        assert_eq!(rule.apply("plain"), "plain");

        let rule = ApostropheRule::new(false);
        assert_eq!(rule.apply("john's"), "johns");
    }
}
