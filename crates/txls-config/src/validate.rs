use crate::config::Config;
use crate::error::ConfigError;

/// Validate a [`Config`], returning all detected violations.
pub fn validate(config: &Config) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.toolchain.command.trim().is_empty() {
        errors.push(ConfigError::Validation {
            field: "toolchain.command".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    if config.toolchain.python.as_os_str().is_empty() {
        errors.push(ConfigError::Validation {
            field: "toolchain.python".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    // request_timeout_secs: 1–300
    let timeout = config.toolchain.request_timeout_secs;
    if timeout == 0 || timeout > 300 {
        errors.push(ConfigError::Validation {
            field: "toolchain.request_timeout_secs".to_string(),
            message: format!("must be 1\u{2013}300, got {}", timeout),
        });
    }

    if config.editor.command.trim().is_empty() {
        errors.push(ConfigError::Validation {
            field: "editor.command".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
