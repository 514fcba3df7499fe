// build.rs - TOML-driven constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    lexical: LexicalLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_input_size: usize,
    max_token_count: usize,
    default_max_peek_steps: usize,
    max_fragment_preview: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=LEXSTREAM_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=LEXSTREAM_CONFIG_DIR");

    let profile =
        env::var("LEXSTREAM_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("LEXSTREAM_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of the lexstream directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_INPUT_SIZE: usize = 1_073_741_824;

    if config.lexical.max_input_size == 0 || config.lexical.max_token_count == 0 {
        panic!("LIMITS: max_input_size and max_token_count must be non-zero");
    }

    if config.lexical.max_input_size > ABSOLUTE_MAX_INPUT_SIZE {
        panic!("LIMITS: max_input_size exceeds absolute maximum");
    }

    if config.lexical.default_max_peek_steps == 0 {
        panic!("LIMITS: default_max_peek_steps must allow at least one lookahead step");
    }

    if config.logging.log_buffer_size < 100 || config.logging.log_buffer_size > 100_000 {
        panic!("LIMITS: log_buffer_size must be between 100 and 100000");
    }

    if profile == "production" && config.lexical.max_input_size > 50_000_000 {
        panic!("PRODUCTION: max_input_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod lexical {{
        pub const MAX_INPUT_SIZE: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
        pub const DEFAULT_MAX_PEEK_STEPS: usize = {};
        pub const MAX_FRAGMENT_PREVIEW: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        config.lexical.max_input_size,
        config.lexical.max_token_count,
        config.lexical.default_max_peek_steps,
        config.lexical.max_fragment_preview,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
