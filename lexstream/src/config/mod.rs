//! Configuration module for lexstream
//! Compile-time limits are generated from the TOML profile by build.rs

// Include generated constants from build.rs
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{LexicalPreferences, LoggingPreferences, RuntimeConfig};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("LEXSTREAM_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("LEXSTREAM_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time::{lexical, logging};

    #[test]
    fn test_generated_limits_are_sane() {
        assert!(lexical::MAX_INPUT_SIZE > 0);
        assert!(lexical::MAX_TOKEN_COUNT > 0);
        assert!(lexical::DEFAULT_MAX_PEEK_STEPS > 0);
        assert!(logging::LOG_BUFFER_SIZE >= 100);
    }

    #[test]
    fn test_source_info_mentions_profile() {
        let info = super::build_info::source_info();
        assert!(info.contains(super::build_info::profile()));
        assert!(info.ends_with(".toml"));
    }
}
