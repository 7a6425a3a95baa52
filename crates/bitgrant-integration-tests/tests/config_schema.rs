//! Integration tests for declaring families from a configuration file.

use bitgrant_capabilities::{FamilyDecl, OwnerSchema};
use bitgrant_config::{Config, ConfigError};
use bitgrant_gate::{AuthorizationGate, Guard};
use bitgrant_test::{MockRecord, MockRequest, test_config_file};

const CONFIG: &str = r#"
[gate]
deny_message = "Not on this post"

[[families]]
on = "posts"
capabilities = ["create", "review", "update", "delete"]
default = ["create", "update"]

[[families]]
on = "copy_edits"
capabilities = ["adjust", "approve", "reject"]
default = ["adjust"]
"#;

fn schema_from(config: &Config) -> OwnerSchema<MockRecord> {
    let mut schema = OwnerSchema::new();
    for section in &config.families {
        let mut decl = FamilyDecl::new(&section.capabilities).with_default(&section.default);
        if let Some(resource) = &section.on {
            decl = decl.on(resource);
        }
        schema.declare(decl).unwrap();
    }
    schema
}

#[test]
fn test_config_file_declares_families() {
    let file = test_config_file(CONFIG);
    let config = Config::load_file(file.path()).unwrap();
    let schema = schema_from(&config);

    let post = schema.family("post").unwrap();
    assert_eq!(post.type_name(), "PostPermission");
    assert_eq!(post.field(), "post_rights");
    assert_eq!(post.default_mask(), 5);

    let copy_edit = schema.family("copy_edit").unwrap();
    assert_eq!(copy_edit.field(), "copy_edit_rights");
    assert_eq!(copy_edit.default_capabilities(), vec!["adjust"]);
}

#[test]
fn test_configured_defaults_drive_the_gate() {
    let config = Config::from_toml_str(CONFIG).unwrap();
    let schema = schema_from(&config);
    let post = schema.family("post").unwrap();

    let mut record = MockRecord::new();
    schema.reset_defaults_for(&mut record, ["posts"]).unwrap();

    let mut gate = AuthorizationGate::new();
    gate.grant([("post", post.get(&record))]);
    let request = MockRequest::new("destroy").with_gate(gate);

    let guard = Guard::new(("post", "delete")).with_message(config.gate.deny_message.clone());
    let err = guard.check(&request).unwrap_err();
    assert_eq!(err.to_string(), "Not on this post");
    assert!(Guard::new(("post", "update")).check(&request).is_ok());
}

#[test]
fn test_config_rejects_default_outside_vocabulary() {
    let err = Config::from_toml_str(
        r#"
        [[families]]
        on = "post"
        capabilities = ["create"]
        default = ["publish"]
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }), "{err}");
}

#[test]
fn test_config_rejects_two_families_on_one_resource() {
    let err = Config::from_toml_str(
        r#"
        [[families]]
        on = "post"
        capabilities = ["create"]

        [[families]]
        on = "Post"
        capabilities = ["delete"]
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }), "{err}");
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(Config::load(Some(missing.as_path()), None).is_err());
}

#[test]
fn test_workspace_config_is_discovered() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bitgrant.toml"), CONFIG).unwrap();

    let loaded = Config::load(None, Some(dir.path())).unwrap();
    assert_eq!(loaded.config.families.len(), 2);
    assert_eq!(loaded.config.gate.deny_message, "Not on this post");
}
