//! Logging module for lexstream
//!
//! Provides a process-wide logging service, a per-thread scoped override for
//! embedding and tests, and a small macro interface. Nothing is emitted until
//! either [`init_global_logging`] is called or a scoped logger is installed.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static SCOPED_LOGGER: RefCell<Option<Arc<dyn Logger>>> = RefCell::new(None);
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system from runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with custom service
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// SCOPED LOGGER
// ============================================================================

/// Route every event logged on this thread during `f` to `logger`
pub fn with_scoped_logger<F, R>(logger: Arc<dyn Logger>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = SCOPED_LOGGER.with(|slot| slot.borrow_mut().replace(logger));
    let _restore = ScopeRestore { previous };
    f()
}

/// Reinstalls the enclosing scoped logger on drop, including during unwinding
struct ScopeRestore {
    previous: Option<Arc<dyn Logger>>,
}

impl Drop for ScopeRestore {
    fn drop(&mut self) {
        let previous = self.previous.take();
        SCOPED_LOGGER.with(|slot| {
            *slot.borrow_mut() = previous;
        });
    }
}

/// Deliver an event to the scoped logger if one is installed, otherwise to the global one
pub fn dispatch(event: LogEvent) {
    let scoped = SCOPED_LOGGER.with(|slot| slot.borrow().clone());

    if let Some(logger) = scoped {
        logger.log(&event);
    } else if let Some(service) = try_get_global_logger() {
        service.log_event(event);
    }
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(
    code: Code,
    message: &str,
    offset: Option<usize>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);

    if let Some(offset) = offset {
        event = event.with_offset(offset);
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(event);
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::success(code, message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(event);
}

/// Log an uncoded event (used by log_info!, log_warning! and log_debug!)
pub fn log_at_level(level: LogLevel, message: &str, context: Vec<(&str, &str)>) {
    let mut event = match level {
        LogLevel::Error => LogEvent::error(codes::system::INTERNAL_ERROR, message),
        LogLevel::Warning => LogEvent::warning(message),
        LogLevel::Info => LogEvent::info(message),
        LogLevel::Debug => LogEvent::debug(message),
    };

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(event);
}

/// Error logging that falls back to stderr when nothing is listening
pub fn safe_log_error(code: Code, message: &str) {
    let event = LogEvent::error(code, message);
    let has_scoped = SCOPED_LOGGER.with(|slot| slot.borrow().is_some());

    if has_scoped || is_initialized() {
        dispatch(event);
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

/// Get system diagnostics
pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::new();

    diagnostics.push_str("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));
    diagnostics.push_str(&format!(
        "Build profile: {}\n",
        crate::config::build_info::profile()
    ));
    diagnostics.push('\n');
    diagnostics.push_str(&config::get_config_summary());

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_logger_is_restored() {
        let outer = Arc::new(MemoryLogger::new());
        let inner = Arc::new(MemoryLogger::new());

        with_scoped_logger(outer.clone(), || {
            dispatch(LogEvent::info("outer before"));
            with_scoped_logger(inner.clone(), || {
                dispatch(LogEvent::info("inner"));
            });
            dispatch(LogEvent::info("outer after"));
        });

        assert_eq!(outer.event_count(), 2);
        assert_eq!(inner.event_count(), 1);
    }

    #[test]
    fn test_scoped_logger_is_restored_after_panic() {
        let outer = Arc::new(MemoryLogger::new());
        let inner = Arc::new(MemoryLogger::new());

        with_scoped_logger(outer.clone(), || {
            let inner = inner.clone();
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                with_scoped_logger(inner, || {
                    dispatch(LogEvent::info("inner"));
                    panic!("scoped closure failed");
                })
            }));
            assert!(result.is_err());
            dispatch(LogEvent::info("outer after panic"));
        });

        assert_eq!(inner.event_count(), 1);
        assert_eq!(outer.event_count(), 1);
    }

    #[test]
    fn test_safe_logging_does_not_panic() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
    }

    #[test]
    fn test_diagnostics() {
        let diagnostics = get_system_diagnostics();
        assert!(diagnostics.contains("Logging System Diagnostics"));
        assert!(diagnostics.contains("Build profile:"));
    }
}
