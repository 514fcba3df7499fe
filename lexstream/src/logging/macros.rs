//! Logging macros taking `"key" => value` context pairs with Display values

/// Log error with Code type
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_error_with_context($code, $message, None, vec![])
    };

    ($code:expr, $message:expr, offset = $offset:expr) => {
        $crate::logging::log_error_with_context($code, $message, Some($offset), vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_error_with_context($code, $message, None, context_refs)
        }
    };

    ($code:expr, $message:expr, offset = $offset:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_error_with_context($code, $message, Some($offset), context_refs)
        }
    };
}

/// Log success with Code type
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_success_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_success_with_context($code, $message, context_refs)
        }
    };
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_at_level($crate::logging::LogLevel::Info, $message, vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_at_level($crate::logging::LogLevel::Info, $message, context_refs)
        }
    };
}

/// Log warning message
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        $crate::logging::log_at_level($crate::logging::LogLevel::Warning, $message, vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_at_level($crate::logging::LogLevel::Warning, $message, context_refs)
        }
    };
}

/// Log debug message; context values are only formatted when debug output is enabled
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        {
            if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
                $crate::logging::log_at_level($crate::logging::LogLevel::Debug, $message, vec![])
            }
        }
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        {
            if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
                let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
                let context_refs: Vec<(&str, &str)> = context_strings.iter()
                    .map(|(k, v)| (*k, v.as_str()))
                    .collect();
                $crate::logging::log_at_level($crate::logging::LogLevel::Debug, $message, context_refs)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::{self, codes, MemoryLogger};
    use std::sync::Arc;

    #[test]
    fn test_macros_reach_scoped_logger() {
        let memory = Arc::new(MemoryLogger::new());

        logging::with_scoped_logger(memory.clone(), || {
            log_error!(codes::lexical::UNMATCHED_INPUT, "Unmatched input",
                offset = 4,
                "fragment" => "@",
                "grammar" => "test"
            );
            log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
                "tokens" => 3
            );
            log_warning!("Grammar produced no tokens", "input_len" => 0);
        });

        let events = memory.get_events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].offset, Some(4));
        assert_eq!(events[0].context.get("fragment").map(String::as_str), Some("@"));
        assert_eq!(events[1].context.get("tokens").map(String::as_str), Some("3"));
        assert!(events[2].is_warning());
    }
}
