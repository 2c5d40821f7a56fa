//! Question tokenization and LIKE-style keyword matching.
//!
//! A question becomes a list of lowercase tokens, each turned into a
//! `%token%` pattern. The same matching rules are evaluated in SQL by the
//! PostgreSQL backend and in Rust by the in-memory backend and the ranker,
//! so this module is the reference for both.

use regex::Regex;
use tracing::warn;

/// Punctuation stripped from the ends of a token. Underscores and LIKE
/// wildcards are kept.
const TRIM_CHARS: &[char] = &['?', '!', '.', ',', ';', ':', '"', '\'', '(', ')'];

/// A SQL `LIKE` pattern compiled to an anchored regex.
///
/// `%` matches any run, `_` matches one character, backslash escapes the
/// next character. Case-sensitive. Matching is linear in the text length
/// however many wildcards the pattern holds.
#[derive(Debug, Clone)]
pub struct LikePattern {
    regex: Regex,
}

impl LikePattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(&like_to_regex(pattern)).map(|regex| Self { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

fn like_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str("(?s)^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => {
                if !out.ends_with(".*") {
                    out.push_str(".*");
                }
            }
            '_' => out.push('.'),
            // a trailing backslash matches itself
            '\\' => {
                let escaped = chars.next().unwrap_or('\\');
                out.push_str(&regex::escape(escaped.encode_utf8(&mut [0; 4])));
            }
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    out.push('$');
    out
}

/// One question token and its `%token%` matcher.
#[derive(Debug, Clone)]
struct Token {
    text: String,
    /// `None` only if the regex engine refused the pattern
    pattern: Option<LikePattern>,
}

/// Lowercased keyword tokens extracted from a question.
#[derive(Debug, Clone, Default)]
pub struct Keywords {
    tokens: Vec<Token>,
}

impl Keywords {
    /// Split on whitespace, lowercase, trim sentence punctuation, drop
    /// empties and repeats. No stemming, stop words, or length floor.
    pub fn from_question(question: &str) -> Self {
        let mut tokens: Vec<Token> = Vec::new();
        for raw in question.split_whitespace() {
            let text = raw.to_lowercase().trim_matches(TRIM_CHARS).to_string();
            if text.is_empty() || tokens.iter().any(|t| t.text == text) {
                continue;
            }
            let pattern = match LikePattern::new(&format!("%{}%", text)) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!(token = %text, error = %e, "keyword pattern rejected, matching by containment only");
                    None
                }
            };
            tokens.push(Token { text, pattern });
        }
        Self { tokens }
    }

    pub fn tokens(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// One `%token%` LIKE pattern per token.
    pub fn patterns(&self) -> Vec<String> {
        self.tokens.iter().map(|t| format!("%{}%", t.text)).collect()
    }

    /// Indices of the tokens that hit an identifier or its comment.
    ///
    /// A token hits when its pattern matches the lowercased comment or
    /// identifier, or when the lowercased identifier occurs inside the token
    /// (so `catchments` hits `catchment`).
    pub fn hits(&self, identifier: &str, comment: Option<&str>) -> Vec<usize> {
        let identifier = identifier.to_lowercase();
        let comment = comment.map(str::to_lowercase);

        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| {
                let like = |text: &str| token.pattern.as_ref().is_some_and(|p| p.is_match(text));
                like(identifier.as_str())
                    || comment.as_deref().is_some_and(like)
                    || (!identifier.is_empty() && token.text.contains(identifier.as_str()))
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether any token hits the identifier or its comment.
    pub fn matches(&self, identifier: &str, comment: Option<&str>) -> bool {
        !self.hits(identifier, comment).is_empty()
    }
}

/// One-off `LIKE` evaluation. Prefer [`LikePattern`] when matching many
/// texts against the same pattern.
pub fn like_matches(pattern: &str, text: &str) -> bool {
    LikePattern::new(pattern).is_ok_and(|p| p.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_tokens_lowercased_and_trimmed() {
        let kw = Keywords::from_question("How many catchments are in Uganda?");
        assert_eq!(
            kw.tokens(),
            &["how", "many", "catchments", "are", "in", "uganda"]
        );
    }

    #[rstest]
    fn test_repeated_tokens_collapse() {
        let kw = Keywords::from_question("Water water WATER");
        assert_eq!(kw.tokens(), &["water"]);
    }

    #[rstest]
    fn test_single_character_tokens_are_kept() {
        let kw = Keywords::from_question("a b");
        assert_eq!(kw.patterns(), vec!["%a%", "%b%"]);
    }

    #[rstest]
    fn test_underscores_survive_trimming() {
        let kw = Keywords::from_question("(fiscal_year_id)");
        assert_eq!(kw.tokens(), &["fiscal_year_id"]);
    }

    #[rstest]
    fn test_blank_question_has_no_tokens() {
        assert!(Keywords::from_question("   ?  ").is_empty());
    }

    #[rstest]
    #[case("%catch%", "catchment", true)]
    #[case("%catch%", "watershed", false)]
    #[case("%", "", true)]
    #[case("c_t", "cat", true)]
    #[case("c_t", "cart", false)]
    #[case("%id", "country_id", true)]
    #[case("100\\%", "100%", true)]
    #[case("100\\%", "1000", false)]
    #[case("%%x%%", "box", true)]
    fn test_like_matches(#[case] pattern: &str, #[case] text: &str, #[case] expected: bool) {
        assert_eq!(like_matches(pattern, text), expected);
    }

    #[rstest]
    #[case("a.c", "abc", false)]
    #[case("(x)", "(x)", true)]
    #[case("x\\", "x\\", true)]
    #[case("%line%", "first\nline two", true)]
    fn test_like_treats_regex_syntax_literally(
        #[case] pattern: &str,
        #[case] text: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(like_matches(pattern, text), expected);
    }

    #[rstest]
    fn test_many_wildcards_match_in_linear_time() {
        let kw = Keywords::from_question("country e%e%e%e%e%e%e%e%e%e%e%e%e%e%z");
        let comment = "eeeeeeeeee eeeeeeeeee eeeeeeeeee eeeeeeeeee";
        // only the plain `country` token hits; the wildcard token never finds a `z`
        assert_eq!(kw.hits("country", Some(comment)), vec![0]);
    }

    #[rstest]
    fn test_like_pattern_reuse() {
        let pattern = LikePattern::new("%_id").unwrap();
        assert!(pattern.is_match("country_id"));
        assert!(pattern.is_match("xid"));
        assert!(!pattern.is_match("id"));
    }

    #[rstest]
    fn test_hits_match_comment_text() {
        let kw = Keywords::from_question("boundaries");
        assert_eq!(kw.hits("catchment", Some("Catchment BOUNDARIES by country")), vec![0]);
    }

    #[rstest]
    fn test_hits_identifier_inside_plural_token() {
        let kw = Keywords::from_question("catchments");
        assert!(kw.matches("catchment", None));
    }

    #[rstest]
    fn test_hits_counts_each_token_once() {
        let kw = Keywords::from_question("country catchment uganda");
        let hits = kw.hits("catchment", Some("catchment boundaries by country"));
        assert_eq!(hits, vec![0, 1]);
    }

    #[rstest]
    fn test_empty_identifier_never_matches_by_containment() {
        let kw = Keywords::from_question("anything");
        assert!(!kw.matches("", None));
    }
}
