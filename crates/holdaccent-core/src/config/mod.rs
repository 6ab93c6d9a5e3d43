// Holdaccent Config API
// Persisted key/value configuration and timeout sanitisation

pub mod parser;
pub mod timeouts;

pub use parser::{default_config_content, Config, ConfigError};
pub use timeouts::{
    is_uppercase_key, sanitize_delay_ms, TimeoutConfig, DEFAULT_LOWERCASE_DELAY_MS,
    DEFAULT_UPPERCASE_DELAY_MS, DELAY_STEP_MS, MAX_DELAY_MS, MIN_DELAY_MS,
};
