//! Combined tokenizer pattern
//!
//! A grammar's rules are compiled into one alternation: the catchable rules
//! share capture group 1, the skip rules follow as plain alternatives. A match
//! that populated group 1 becomes a token; any other match is consumed and
//! dropped. Alternatives are tried left to right, so earlier rules win when two
//! rules match at the same offset.

use crate::config::compile_time::lexical::MAX_FRAGMENT_PREVIEW;
use crate::logging::codes;
use crate::{log_error, log_success};
use regex::{Regex, RegexBuilder};

/// Pattern compilation and scanning errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum PatternError {
    #[error("Grammar supplied no catchable patterns")]
    EmptyRuleSet,

    #[error("Invalid pattern '{pattern}': {source}")]
    Compile {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unmatched input at byte {offset}: '{fragment}'")]
    UnmatchedInput { offset: usize, fragment: String },
}

impl PatternError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PatternError::EmptyRuleSet => codes::pattern::EMPTY_RULE_SET,
            PatternError::Compile { .. } => codes::pattern::INVALID_PATTERN,
            PatternError::UnmatchedInput { .. } => codes::lexical::UNMATCHED_INPUT,
        }
    }
}

/// Regex flags applied uniformly to every rule of a grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternOptions {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    /// Upper bound on the compiled program size in bytes
    pub size_limit: usize,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            multi_line: false,
            dot_matches_new_line: false,
            size_limit: 10 * (1 << 20),
        }
    }
}

impl PatternOptions {
    pub fn case_sensitive(mut self) -> Self {
        self.case_insensitive = false;
        self
    }

    pub fn multi_line(mut self, enabled: bool) -> Self {
        self.multi_line = enabled;
        self
    }

    pub fn dot_matches_new_line(mut self, enabled: bool) -> Self {
        self.dot_matches_new_line = enabled;
        self
    }

    pub fn size_limit(mut self, bytes: usize) -> Self {
        self.size_limit = bytes;
        self
    }

    fn builder(&self, pattern: &str) -> RegexBuilder {
        let mut builder = RegexBuilder::new(pattern);
        builder
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .size_limit(self.size_limit);
        builder
    }
}

/// One non-empty match produced by [`CompiledPattern::scan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMatch<'a> {
    pub text: &'a str,
    pub offset: usize,
    /// True when a catchable rule matched, false for skip rules
    pub catchable: bool,
}

impl RawMatch<'_> {
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Immutable compiled form of a grammar's rules.
///
/// Built once per grammar and shareable across lexers and threads behind an
/// `Arc`.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    catchable_count: usize,
    skip_count: usize,
    options: PatternOptions,
}

impl CompiledPattern {
    /// Combine and compile catchable and skip rules
    pub fn compile<C, S>(
        catchable: &[C],
        skip: &[S],
        options: PatternOptions,
    ) -> Result<Self, PatternError>
    where
        C: AsRef<str>,
        S: AsRef<str>,
    {
        if catchable.is_empty() {
            let error = PatternError::EmptyRuleSet;
            log_error!(error.error_code(), "Pattern compilation failed",
                "skip_rules" => skip.len()
            );
            return Err(error);
        }

        let source = combine(catchable, skip);

        let regex = options.builder(&source).build().map_err(|source_error| {
            let error = locate_compile_error(catchable, skip, &options)
                .unwrap_or(PatternError::Compile {
                    pattern: source.clone(),
                    source: source_error,
                });
            log_error!(error.error_code(), "Pattern compilation failed",
                "reason" => &error
            );
            error
        })?;

        log_success!(codes::success::PATTERN_COMPILED, "Grammar pattern compiled",
            "catchable_rules" => catchable.len(),
            "skip_rules" => skip.len(),
            "case_insensitive" => options.case_insensitive
        );

        Ok(Self {
            regex,
            catchable_count: catchable.len(),
            skip_count: skip.len(),
            options,
        })
    }

    /// Combined pattern source
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn options(&self) -> PatternOptions {
        self.options
    }

    pub fn catchable_count(&self) -> usize {
        self.catchable_count
    }

    pub fn skip_count(&self) -> usize {
        self.skip_count
    }

    /// Split `input` into catchable and skipped matches in source order.
    ///
    /// Zero-length matches are dropped. Any byte range that no rule covers is
    /// reported as [`PatternError::UnmatchedInput`].
    pub fn scan<'a>(&self, input: &'a str) -> Result<Vec<RawMatch<'a>>, PatternError> {
        let mut matches = Vec::new();
        let mut covered = 0;

        for captures in self.regex.captures_iter(input) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            if whole.is_empty() {
                continue;
            }
            if whole.start() > covered {
                return Err(unmatched(input, covered, whole.start()));
            }

            matches.push(RawMatch {
                text: whole.as_str(),
                offset: whole.start(),
                catchable: captures.get(1).is_some(),
            });
            covered = whole.end();
        }

        if covered < input.len() {
            return Err(unmatched(input, covered, input.len()));
        }

        Ok(matches)
    }
}

fn combine<C: AsRef<str>, S: AsRef<str>>(catchable: &[C], skip: &[S]) -> String {
    let catchable = catchable
        .iter()
        .map(|rule| format!("(?:{})", rule.as_ref()))
        .collect::<Vec<_>>()
        .join("|");

    let mut source = format!("({})", catchable);
    for rule in skip {
        source.push_str("|(?:");
        source.push_str(rule.as_ref());
        source.push(')');
    }
    source
}

/// Find the first individual rule that fails to compile on its own
fn locate_compile_error<C: AsRef<str>, S: AsRef<str>>(
    catchable: &[C],
    skip: &[S],
    options: &PatternOptions,
) -> Option<PatternError> {
    catchable
        .iter()
        .map(AsRef::as_ref)
        .chain(skip.iter().map(AsRef::as_ref))
        .find_map(|rule| {
            options
                .builder(rule)
                .build()
                .err()
                .map(|source| PatternError::Compile {
                    pattern: rule.to_string(),
                    source,
                })
        })
}

fn unmatched(input: &str, start: usize, end: usize) -> PatternError {
    PatternError::UnmatchedInput {
        offset: start,
        fragment: input[start..end].chars().take(MAX_FRAGMENT_PREVIEW).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn words_and_numbers() -> CompiledPattern {
        CompiledPattern::compile(&["[a-z]+", "[0-9]+"], &[r"\s+"], PatternOptions::default())
            .unwrap()
    }

    #[test]
    fn test_combined_source_layout() {
        let pattern = words_and_numbers();
        assert_eq!(pattern.as_str(), r"((?:[a-z]+)|(?:[0-9]+))|(?:\s+)");
        assert_eq!(pattern.catchable_count(), 2);
        assert_eq!(pattern.skip_count(), 1);
    }

    #[test]
    fn test_scan_marks_catchable_matches() {
        let pattern = words_and_numbers();
        let matches = pattern.scan("ab 12").unwrap();

        assert_eq!(matches.len(), 3);
        assert_eq!(
            matches[0],
            RawMatch {
                text: "ab",
                offset: 0,
                catchable: true
            }
        );
        assert!(!matches[1].catchable);
        assert_eq!(matches[2].offset, 3);
        assert_eq!(matches[2].end(), 5);
    }

    #[test]
    fn test_case_insensitive_by_default() {
        let pattern = words_and_numbers();
        assert_eq!(pattern.scan("AbC").unwrap().len(), 1);

        let strict = CompiledPattern::compile(
            &["[a-z]+"],
            &[] as &[&str],
            PatternOptions::default().case_sensitive(),
        )
        .unwrap();
        assert_matches!(
            strict.scan("abC"),
            Err(PatternError::UnmatchedInput { offset: 2, .. })
        );
    }

    #[test]
    fn test_earlier_rule_wins() {
        let pattern = CompiledPattern::compile(
            &["if", "[a-z]+"],
            &[] as &[&str],
            PatternOptions::default(),
        )
        .unwrap();
        let matches = pattern.scan("iffy").unwrap();

        assert_eq!(matches[0].text, "if");
        assert_eq!(matches[1].text, "fy");
    }

    #[test]
    fn test_gap_is_reported() {
        let pattern = words_and_numbers();
        assert_matches!(
            pattern.scan("ab @@ 12"),
            Err(PatternError::UnmatchedInput { offset: 3, ref fragment }) if fragment == "@@"
        );
    }

    #[test]
    fn test_trailing_gap_is_reported() {
        let pattern = words_and_numbers();
        assert_matches!(
            pattern.scan("ab!"),
            Err(PatternError::UnmatchedInput { offset: 2, .. })
        );
    }

    #[test]
    fn test_fragment_is_truncated() {
        let pattern = words_and_numbers();
        let junk = "!".repeat(MAX_FRAGMENT_PREVIEW + 10);
        let Err(PatternError::UnmatchedInput { fragment, .. }) = pattern.scan(&junk) else {
            panic!("expected unmatched input");
        };
        assert_eq!(fragment.chars().count(), MAX_FRAGMENT_PREVIEW);
    }

    #[test]
    fn test_zero_length_matches_are_dropped() {
        let pattern = CompiledPattern::compile(
            &["[a-z]+"],
            &[r"\s*"],
            PatternOptions::default(),
        )
        .unwrap();
        let matches = pattern.scan("ab  cd").unwrap();

        assert_eq!(matches.len(), 3);
        assert!(matches.iter().all(|m| !m.text.is_empty()));
    }

    #[test]
    fn test_empty_input() {
        assert!(words_and_numbers().scan("").unwrap().is_empty());
    }

    #[test]
    fn test_empty_rule_set() {
        let result = CompiledPattern::compile(
            &[] as &[&str],
            &[r"\s+"],
            PatternOptions::default(),
        );
        assert_matches!(result, Err(PatternError::EmptyRuleSet));
    }

    #[test]
    fn test_compile_error_names_rule() {
        let result = CompiledPattern::compile(
            &["[a-z]+", "(unclosed"],
            &[r"\s+"],
            PatternOptions::default(),
        );
        assert_matches!(
            result,
            Err(PatternError::Compile { ref pattern, .. }) if pattern == "(unclosed"
        );
    }
}
