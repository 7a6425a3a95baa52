//! Check command: evaluate a rights spec against a mask.

use anyhow::{Context, Result};
use bitgrant_capabilities::Family;
use bitgrant_gate::{
    AuthorizationGate, DEFAULT_DENY_MESSAGE, DEFAULT_RIGHTS, Decision, Guard, RightsSpec,
};
use serde_json::json;

use super::{MaskRecord, OutputFormat, Schema, lookup};
use crate::theme::Theme;

/// A gate granting `family`'s set for `mask` under the family's resource
/// name and as the default rights.
pub(crate) fn gate_for(family: &Family, mask: u64) -> AuthorizationGate {
    let set = family.get(&MaskRecord::new(mask, false));
    let name = if family.resource().is_empty() {
        DEFAULT_RIGHTS
    } else {
        family.resource()
    };

    let mut gate = AuthorizationGate::new();
    gate.grant([(name, set.clone())]);
    gate.set_rights(set);
    gate
}

/// Evaluate `spec` the way a guard configured with `deny_message` would.
pub(crate) fn evaluate(
    family: &Family,
    mask: u64,
    spec: &RightsSpec,
    deny_message: &str,
) -> Decision {
    let gate = gate_for(family, mask);
    Guard::new(spec.clone())
        .with_message(deny_message)
        .decide(&gate)
}

/// Print the decision for `spec`. Returns whether access was allowed.
pub(crate) fn run_check(
    schema: &Schema,
    resource: &str,
    mask: u64,
    spec: &str,
    deny_message: &str,
    format: OutputFormat,
) -> Result<bool> {
    let family = lookup(schema, resource)?;
    let spec: RightsSpec = spec
        .parse()
        .with_context(|| format!("invalid rights spec '{spec}'"))?;

    let decision = evaluate(family, mask, &spec, deny_message);
    let allowed = decision.is_allowed();

    match format {
        OutputFormat::Json => {
            let message = match &decision {
                Decision::Allowed => None,
                Decision::Denied { message } => {
                    Some(message.as_deref().unwrap_or(DEFAULT_DENY_MESSAGE))
                },
            };
            let doc = json!({
                "family": family.type_name(),
                "mask": mask,
                "spec": spec.to_string(),
                "allowed": allowed,
                "message": message,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        },
        OutputFormat::Pretty => match decision.into_result() {
            Ok(()) => println!("{}", Theme::success(&format!("allowed: {spec}"))),
            Err(err) => {
                println!("{}", Theme::error(&err.to_string()));
                println!("{}", Theme::dimmed(&format!("status {}", err.status_code())));
            },
        },
    }
    Ok(allowed)
}
