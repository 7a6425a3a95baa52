//! Decode command: a mask to the capabilities it grants.

use anyhow::Result;
use bitgrant_capabilities::{CapabilitySet, Family};

use super::{MaskRecord, OutputFormat, Schema, lookup};
use crate::theme::Theme;

/// Read `mask` through `family`, as held by a sticky owner if `sticky`.
pub(crate) fn decode(family: &Family, mask: u64, sticky: bool) -> CapabilitySet {
    family.get(&MaskRecord::new(mask, sticky))
}

/// Bits of `mask` that name no capability of `family`.
pub(crate) fn stray_bits(family: &Family, mask: u64) -> u64 {
    mask & !family.vocabulary().full_mask()
}

/// Print the capabilities `mask` grants.
pub(crate) fn run_decode(
    schema: &Schema,
    resource: &str,
    mask: u64,
    sticky: bool,
    format: OutputFormat,
) -> Result<()> {
    let family = lookup(schema, resource)?;
    let set = decode(family, mask, sticky);

    let stray = stray_bits(family, mask);
    if stray != 0 {
        tracing::warn!(family = %family.type_name(), stray, "mask has bits outside the vocabulary");
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&set)?),
        OutputFormat::Pretty => {
            println!("{}", Theme::header(&set.to_string()));
            for name in family.vocabulary().iter() {
                let marker = if set.can(name) { "+" } else { "-" };
                println!("  {marker} {}", Theme::capability(name, set.can(name)));
            }
            if set.is_sticky() {
                println!("{}", Theme::info("sticky: every capability is granted"));
            }
            if stray != 0 {
                println!(
                    "{}",
                    Theme::warning(&format!("bits {stray:#b} are not capabilities of {family}"))
                );
            }
        },
    }
    Ok(())
}
