//! Families command: list the declared capability families.

use anyhow::Result;
use bitgrant_capabilities::Family;
use serde_json::{Value, json};

use super::{OutputFormat, Schema, display_resource};
use crate::theme::Theme;

/// JSON description of one family.
pub(crate) fn describe(family: &Family) -> Value {
    let capabilities: Vec<Value> = family
        .vocabulary()
        .iter()
        .map(|name| json!({ "name": name, "bit": family.bit_for(name) }))
        .collect();

    json!({
        "type_name": family.type_name(),
        "resource": family.resource(),
        "accessor": family.accessor(),
        "field": family.field(),
        "capabilities": capabilities,
        "default_mask": family.default_mask(),
        "default": family.default_capabilities(),
    })
}

/// Print every declared family.
pub(crate) fn run_families(schema: &Schema, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        let doc: Vec<Value> = schema.families().iter().map(describe).collect();
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    if schema.is_empty() {
        println!("{}", Theme::info("No families declared."));
        return Ok(());
    }

    for family in schema.families() {
        println!("\n{}", Theme::header(family.type_name()));
        println!("  {}", Theme::kv("resource", display_resource(family)));
        println!("  {}", Theme::kv("field", family.field()));
        for name in family.vocabulary().iter() {
            println!("    {:>20}  {}", family.bit_for(name), name);
        }
        println!(
            "  {}",
            Theme::kv(
                "default",
                &format!(
                    "{} {}",
                    Theme::mask(family.default_mask(), family.vocabulary().len()),
                    Theme::dimmed(&family.default_capabilities().join(", "))
                )
            )
        );
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;

    #[test]
    fn test_describe_scoped_family() {
        let schema = test_support::schema();
        let value = describe(schema.family("post").unwrap());
        assert_eq!(value["type_name"], "PostPermission");
        assert_eq!(value["field"], "post_rights");
        assert_eq!(value["accessor"], "post_permission");
        assert_eq!(value["default_mask"], 5);
        assert_eq!(value["default"], json!(["create", "update"]));
        assert_eq!(value["capabilities"][3], json!({"name": "delete", "bit": 8}));
    }

    #[test]
    fn test_describe_owner_family() {
        let schema = test_support::schema();
        let value = describe(schema.family("").unwrap());
        assert_eq!(value["resource"], "");
        assert_eq!(value["field"], "rights");
        assert_eq!(value["default_mask"], 0);
    }

    #[test]
    fn test_run_families_on_empty_schema() {
        assert!(run_families(&Schema::new(), OutputFormat::Pretty).is_ok());
        assert!(run_families(&Schema::new(), OutputFormat::Json).is_ok());
    }
}
