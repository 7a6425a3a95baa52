//! Configuration struct definitions.

use serde::{Deserialize, Serialize};

/// Root of `bitgrant.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging and tracing.
    pub logging: LoggingSection,
    /// Authorization gate behavior.
    pub gate: GateSection,
    /// Declared capability families, in declaration order.
    pub families: Vec<FamilySection>,
}

impl Config {
    /// The family declared for `resource`, matched on the `on` key
    /// (case-insensitive).
    ///
    /// Matching is literal: `"posts"` does not find `on = "post"`. The
    /// capability schema singularizes resource names when families are
    /// declared, so two tables that differ only by inflection pass here and
    /// are rejected as duplicates at declaration time.
    #[must_use]
    pub fn family(&self, resource: &str) -> Option<&FamilySection> {
        let wanted = resource.trim();
        self.families
            .iter()
            .find(|f| f.resource().eq_ignore_ascii_case(wanted))
    }
}

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"` or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["bitgrant_gate=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}

/// Authorization gate configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateSection {
    /// Message used by guards that do not configure their own.
    pub deny_message: String,
}

impl Default for GateSection {
    fn default() -> Self {
        Self {
            deny_message: "Access Denied".to_owned(),
        }
    }
}

/// One `[[families]]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FamilySection {
    /// Sub-resource the family is scoped to. Omit for the owner-wide family.
    pub on: Option<String>,
    /// Capability names in bit order. Append-only once masks are stored.
    pub capabilities: Vec<String>,
    /// Capabilities granted by default.
    pub default: Vec<String>,
}

impl FamilySection {
    /// The `on` key, or `""` for the owner-wide family.
    #[must_use]
    pub fn resource(&self) -> &str {
        self.on.as_deref().map_or("", str::trim)
    }
}
