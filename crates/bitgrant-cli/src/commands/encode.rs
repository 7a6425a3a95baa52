//! Encode command: capability names to a mask.

use anyhow::Result;
use bitgrant_capabilities::Family;
use serde_json::json;

use super::{OutputFormat, Schema, lookup};
use crate::theme::Theme;

/// A mask built from a list of names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Encoded {
    pub(crate) mask: u64,
    pub(crate) unknown: Vec<String>,
}

/// OR together the bits of `names`. Names outside the vocabulary add no bits
/// and are reported back.
pub(crate) fn encode(family: &Family, names: &[String]) -> Encoded {
    let unknown = names
        .iter()
        .filter(|name| !family.vocabulary().contains(name))
        .cloned()
        .collect();
    Encoded {
        mask: family.mask_for(names),
        unknown,
    }
}

/// Print the mask for `names`.
pub(crate) fn run_encode(
    schema: &Schema,
    resource: &str,
    names: &[String],
    format: OutputFormat,
) -> Result<()> {
    let family = lookup(schema, resource)?;
    let encoded = encode(family, names);

    for name in &encoded.unknown {
        tracing::warn!(
            family = %family.type_name(),
            capability = %name,
            "unknown capability ignored"
        );
    }

    match format {
        OutputFormat::Json => {
            let doc = json!({
                "family": family.type_name(),
                "mask": encoded.mask,
                "unknown": encoded.unknown,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        },
        OutputFormat::Pretty => {
            let width = family.vocabulary().len();
            println!(
                "{}",
                Theme::kv(family.type_name(), &Theme::mask(encoded.mask, width))
            );
            for name in &encoded.unknown {
                let message = format!("'{name}' is not a capability of {family}");
                println!("{}", Theme::warning(&message));
            }
        },
    }
    Ok(())
}
