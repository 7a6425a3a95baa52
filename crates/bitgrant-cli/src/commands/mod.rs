//! Subcommand implementations.

pub(crate) mod check;
pub(crate) mod decode;
pub(crate) mod encode;
pub(crate) mod families;

use anyhow::{Result, bail};
use bitgrant_capabilities::{Family, OwnerSchema, RightsOwner};

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// Colored, human-readable text.
    Pretty,
    /// One JSON document on stdout.
    Json,
}

impl OutputFormat {
    pub(crate) fn parse(format: &str) -> Self {
        match format {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// A stand-alone record holding one mask, used to read it through a family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct MaskRecord {
    mask: u64,
    sticky: bool,
}

impl MaskRecord {
    pub(crate) fn new(mask: u64, sticky: bool) -> Self {
        Self { mask, sticky }
    }
}

impl RightsOwner for MaskRecord {
    fn read_rights(&self, _field: &str) -> Option<u64> {
        Some(self.mask)
    }

    fn write_rights(&mut self, _field: &str, mask: u64) {
        self.mask = mask;
    }

    fn sticky(&self) -> bool {
        self.sticky
    }
}

/// The families declared in the loaded configuration.
pub(crate) type Schema = OwnerSchema<MaskRecord>;

/// Find the family for `resource`, listing the declared ones on a miss.
pub(crate) fn lookup<'s>(schema: &'s Schema, resource: &str) -> Result<&'s Family> {
    if let Some(family) = schema.family(resource) {
        return Ok(family);
    }

    if schema.is_empty() {
        bail!("no families are declared; add [[families]] tables to bitgrant.toml");
    }
    let declared = schema
        .families()
        .iter()
        .map(|f| display_resource(f).to_owned())
        .collect::<Vec<_>>()
        .join(", ");
    bail!("no family declared for '{resource}' (declared: {declared})")
}

/// The resource a family is scoped to, or `(owner)` for the owner-wide one.
pub(crate) fn display_resource(family: &Family) -> &str {
    if family.resource().is_empty() {
        "(owner)"
    } else {
        family.resource()
    }
}

/// Parse a mask given in decimal, `0x` hex or `0b` binary.
pub(crate) fn parse_mask(input: &str) -> Result<u64, String> {
    let input = input.trim().replace('_', "");
    let parsed = if let Some(hex) = input.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else if let Some(bin) = input.strip_prefix("0b") {
        u64::from_str_radix(bin, 2)
    } else {
        input.parse()
    };
    parsed.map_err(|e| format!("invalid mask '{input}': {e}"))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Schema;
    use crate::config_bridge;
    use bitgrant_config::Config;

    pub(crate) fn schema() -> Schema {
        let cfg = Config::from_toml_str(
            r#"
            [[families]]
            capabilities = ["read", "write"]

            [[families]]
            on = "post"
            capabilities = ["create", "review", "update", "delete"]
            default = ["create", "update"]
            "#,
        )
        .unwrap();
        config_bridge::to_schema(&cfg).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mask_radixes() {
        assert_eq!(parse_mask("12"), Ok(12));
        assert_eq!(parse_mask("0x0c"), Ok(12));
        assert_eq!(parse_mask("0b1100"), Ok(12));
        assert_eq!(parse_mask("1_000"), Ok(1000));
        assert!(parse_mask("-1").is_err());
        assert!(parse_mask("twelve").is_err());
    }

    #[test]
    fn test_lookup_normalizes_and_reports() {
        let schema = test_support::schema();
        assert_eq!(lookup(&schema, "posts").unwrap().type_name(), "PostPermission");
        assert_eq!(lookup(&schema, "").unwrap().type_name(), "Permission");

        let err = lookup(&schema, "comment").unwrap_err().to_string();
        assert!(err.contains("(owner), post"), "{err}");
    }

    #[test]
    fn test_lookup_on_empty_schema() {
        let err = lookup(&Schema::new(), "post").unwrap_err().to_string();
        assert!(err.contains("no families are declared"));
    }

    #[test]
    fn test_mask_record_reads_through_family() {
        let schema = test_support::schema();
        let post = schema.family("post").unwrap();
        let set = post.get(&MaskRecord::new(0b1001, false));
        assert_eq!(set.capabilities(), vec!["create", "delete"]);

        let set = post.get(&MaskRecord::new(0, true));
        assert!(set.can("review"));
    }
}
