//! Diagnostic codes and their classification metadata
//!
//! Single source of truth for every code the tokenizer can emit, together with
//! the behavioral metadata used when formatting and filtering events.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Pattern compilation error codes
pub mod pattern {
    use super::Code;

    pub const EMPTY_RULE_SET: Code = Code::new("E010");
    pub const INVALID_PATTERN: Code = Code::new("E011");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const UNMATCHED_INPUT: Code = Code::new("E020");
    pub const UNCLASSIFIED_TOKEN: Code = Code::new("E021");
    pub const INPUT_TOO_LARGE: Code = Code::new("E022");
    pub const TOO_MANY_TOKENS: Code = Code::new("E023");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const PATTERN_COMPILED: Code = Code::new("I010");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                "Critical internal error",
                "File a bug report with the failing input",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                "Logging or configuration initialization failure",
                "Check build profile and runtime environment variables",
            ),
            ErrorMetadata::new(
                "E010",
                "Pattern",
                Severity::High,
                false,
                "Grammar supplied no catchable patterns",
                "Provide at least one catchable pattern in the grammar",
            ),
            ErrorMetadata::new(
                "E011",
                "Pattern",
                Severity::High,
                false,
                "Grammar pattern failed to compile",
                "Fix the regular expression reported in the error",
            ),
            ErrorMetadata::new(
                "E020",
                "Lexical",
                Severity::High,
                false,
                "Input contains text matched by no catchable or skip pattern",
                "Extend the grammar so its rules cover the whole input alphabet",
            ),
            ErrorMetadata::new(
                "E021",
                "Lexical",
                Severity::Critical,
                false,
                "Grammar kept a token without assigning it a type",
                "Assign a type in classify() or reject the token in is_applicable()",
            ),
            ErrorMetadata::new(
                "E022",
                "Lexical",
                Severity::Medium,
                true,
                "Input exceeds the configured size limit",
                "Split the input or raise lexical.max_input_size in the build profile",
            ),
            ErrorMetadata::new(
                "E023",
                "Lexical",
                Severity::Medium,
                true,
                "Input produced more tokens than the configured limit",
                "Split the input or raise lexical.max_token_count in the build profile",
            ),
            ErrorMetadata::new(
                "I004",
                "System",
                Severity::Low,
                true,
                "Logging system initialized",
                "None",
            ),
            ErrorMetadata::new(
                "I010",
                "Pattern",
                Severity::Low,
                true,
                "Grammar pattern compiled",
                "None",
            ),
            ErrorMetadata::new(
                "I020",
                "Lexical",
                Severity::Low,
                true,
                "Tokenization completed",
                "None",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_has_metadata() {
        let codes = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            pattern::EMPTY_RULE_SET,
            pattern::INVALID_PATTERN,
            lexical::UNMATCHED_INPUT,
            lexical::UNCLASSIFIED_TOKEN,
            lexical::INPUT_TOO_LARGE,
            lexical::TOO_MANY_TOKENS,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::PATTERN_COMPILED,
            success::TOKENIZATION_COMPLETE,
        ];

        for code in codes {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_unknown_code_falls_back() {
        assert_eq!(get_description("X999"), "Unknown error");
        assert_eq!(get_category("X999"), "Unknown");
        assert_eq!(get_severity("X999"), Severity::Medium);
        assert!(is_recoverable("X999"));
    }

    #[test]
    fn test_lexical_classification() {
        assert_eq!(get_category(lexical::UNMATCHED_INPUT.as_str()), "Lexical");
        assert_eq!(
            get_severity(lexical::UNCLASSIFIED_TOKEN.as_str()),
            Severity::Critical
        );
        assert!(is_recoverable(lexical::TOO_MANY_TOKENS.as_str()));
        assert!(!is_recoverable(pattern::INVALID_PATTERN.as_str()));
    }
}
