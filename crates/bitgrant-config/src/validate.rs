//! Configuration validation.
//!
//! Validates that deserialized [`Config`](crate::Config) values are within
//! acceptable ranges and that family declarations are consistent.

use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::types::{Config, FamilySection};

/// Width of a capability mask.
const MAX_CAPABILITIES_PER_FAMILY: usize = 64;

/// Characters reserved by the textual rights spec format.
const RESERVED_CHARS: [char; 2] = [':', ','];

/// Validate a deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_logging(config)?;
    validate_gate(config)?;
    validate_families(config)?;
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        });
    }

    let valid_formats = ["pretty", "compact", "json", "full"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                valid_formats.join(", ")
            ),
        });
    }

    Ok(())
}

fn validate_gate(config: &Config) -> ConfigResult<()> {
    if config.gate.deny_message.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "gate.deny_message".to_owned(),
            message: "must not be empty".to_owned(),
        });
    }
    Ok(())
}

fn validate_families(config: &Config) -> ConfigResult<()> {
    let mut resources = HashSet::new();

    for (index, family) in config.families.iter().enumerate() {
        let field = |key: &str| format!("families[{index}].{key}");

        // Literal, case-insensitive; inflected duplicates are caught when the
        // families are declared.
        if !resources.insert(family.resource().to_ascii_lowercase()) {
            return Err(ConfigError::ValidationError {
                field: field("on"),
                message: format!("family '{}' is declared more than once", family.resource()),
            });
        }

        validate_capabilities(family, &field("capabilities"))?;

        if let Some(unknown) = family
            .default
            .iter()
            .find(|name| !family.capabilities.contains(name))
        {
            return Err(ConfigError::ValidationError {
                field: field("default"),
                message: format!("'{unknown}' is not one of the family's capabilities"),
            });
        }
    }

    Ok(())
}

fn validate_capabilities(family: &FamilySection, field: &str) -> ConfigResult<()> {
    let invalid = |message: String| ConfigError::ValidationError {
        field: field.to_owned(),
        message,
    };

    if family.capabilities.is_empty() {
        return Err(invalid("at least one capability is required".to_owned()));
    }
    if family.capabilities.len() > MAX_CAPABILITIES_PER_FAMILY {
        return Err(invalid(format!(
            "{} capabilities exceed the limit of {MAX_CAPABILITIES_PER_FAMILY}",
            family.capabilities.len()
        )));
    }

    let mut seen = HashSet::new();
    for name in &family.capabilities {
        if name.trim().is_empty() {
            return Err(invalid("capability names must not be empty".to_owned()));
        }
        if name.contains(RESERVED_CHARS) {
            return Err(invalid(format!(
                "capability '{name}' contains a reserved character (':' or ',')"
            )));
        }
        if !seen.insert(name.as_str()) {
            return Err(invalid(format!("capability '{name}' is listed more than once")));
        }
    }

    Ok(())
}
