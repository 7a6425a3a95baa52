//! Bridge from `bitgrant_config::Config` to domain types.
//!
//! The config crate stays free of internal dependencies; this module turns
//! its plain sections into telemetry and capability types.

use bitgrant_capabilities::{CapabilityResult, FamilyDecl, OwnerSchema};
use bitgrant_config::{Config, FamilySection, LoggingSection};
use bitgrant_telemetry::{LogConfig, LogFormat};

/// Convert the logging section to a [`LogConfig`]. `verbose` forces the
/// `debug` level.
pub fn to_log_config(logging: &LoggingSection, verbose: bool) -> LogConfig {
    let format: LogFormat = logging.format.parse().unwrap_or_default();
    let level = if verbose { "debug" } else { logging.level.as_str() };

    let mut log_config = LogConfig::new(level).with_format(format);
    for directive in &logging.directives {
        log_config = log_config.with_directive(directive);
    }
    log_config
}

/// Logging used when the configuration could not be loaded.
pub fn fallback_log_config(verbose: bool) -> LogConfig {
    let level = if verbose { "debug" } else { "info" };
    LogConfig::new(level).with_format(LogFormat::Compact)
}

/// Convert one `[[families]]` table to a declaration.
pub fn to_family_decl(section: &FamilySection) -> FamilyDecl {
    let decl = FamilyDecl::new(&section.capabilities).with_default(&section.default);
    match section.on.as_deref() {
        Some(resource) => decl.on(resource),
        None => decl,
    }
}

/// Declare every configured family, in file order.
///
/// # Errors
///
/// Returns the first declaration the capability model rejects.
pub fn to_schema<O: ?Sized>(cfg: &Config) -> CapabilityResult<OwnerSchema<O>> {
    let mut schema = OwnerSchema::new();
    for section in &cfg.families {
        schema.declare(to_family_decl(section))?;
    }
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitgrant_capabilities::CapabilityError;
    use std::collections::HashMap;

    const CONFIG: &str = r#"
        [logging]
        level = "warn"
        format = "json"
        directives = ["bitgrant_gate=trace"]

        [[families]]
        capabilities = ["read", "write"]

        [[families]]
        on = "posts"
        capabilities = ["create", "review", "update", "delete"]
        default = ["create", "update"]
    "#;

    #[test]
    fn test_log_config_from_section() {
        let cfg = Config::from_toml_str(CONFIG).unwrap();
        let log = to_log_config(&cfg.logging, false);
        assert_eq!(log.level, "warn");
        assert_eq!(log.format, LogFormat::Json);
        assert_eq!(log.directives, vec!["bitgrant_gate=trace"]);
    }

    #[test]
    fn test_verbose_forces_debug() {
        let log = to_log_config(&LoggingSection::default(), true);
        assert_eq!(log.level, "debug");
        assert_eq!(fallback_log_config(true).level, "debug");
        assert_eq!(fallback_log_config(false).level, "info");
    }

    #[test]
    fn test_schema_from_config() {
        let cfg = Config::from_toml_str(CONFIG).unwrap();
        let schema = to_schema::<HashMap<String, u64>>(&cfg).unwrap();
        assert_eq!(schema.len(), 2);

        let rights = schema.family("").unwrap();
        assert_eq!(rights.type_name(), "Permission");
        assert_eq!(rights.field(), "rights");

        let post = schema.family("post").unwrap();
        assert_eq!(post.field(), "post_rights");
        assert_eq!(post.default_capabilities(), vec!["create", "update"]);
    }

    #[test]
    fn test_inflected_duplicate_is_rejected_at_declaration() {
        let cfg = Config::from_toml_str(
            r#"
            [[families]]
            on = "post"
            capabilities = ["create"]

            [[families]]
            on = "posts"
            capabilities = ["delete"]
            "#,
        )
        .unwrap();
        assert!(cfg.family("posts").is_some());
        assert!(cfg.family("post").is_some());

        let err = to_schema::<HashMap<String, u64>>(&cfg).unwrap_err();
        assert_eq!(
            err,
            CapabilityError::DuplicateFamily {
                family: "PostPermission".to_owned(),
                field: "post_rights".to_owned(),
            }
        );
    }

    #[test]
    fn test_empty_config_has_no_families() {
        let schema = to_schema::<HashMap<String, u64>>(&Config::default()).unwrap();
        assert!(schema.is_empty());
    }
}
