//! Test fixtures for common families and gates.

use bitgrant_capabilities::{CapabilitySet, Family, FamilyDecl, OwnerSchema};
use bitgrant_gate::AuthorizationGate;

use crate::mocks::MockRecord;

/// Capabilities of the post family, in bit order.
pub const POST_CAPABILITIES: [&str; 4] = ["create", "review", "update", "delete"];

/// Capabilities of the copy-edit family, in bit order.
pub const COPY_EDIT_CAPABILITIES: [&str; 3] = ["adjust", "approve", "reject"];

/// The post family declaration: CRUD with `create` and `update` by default.
#[must_use]
pub fn post_decl() -> FamilyDecl {
    FamilyDecl::new(POST_CAPABILITIES)
        .on("post")
        .with_default(["create", "update"])
}

/// The copy-edit family declaration, scoped to `copy_edits`.
#[must_use]
pub fn copy_edit_decl() -> FamilyDecl {
    FamilyDecl::new(COPY_EDIT_CAPABILITIES)
        .on("copy_edits")
        .with_default(["adjust"])
}

/// A schema for [`MockRecord`] with the post and copy-edit families.
#[derive(Debug, Clone)]
pub struct TestFamilies {
    /// The schema both families are declared on.
    pub schema: OwnerSchema<MockRecord>,
    /// `PostPermission`, stored in `post_rights`.
    pub post: Family,
    /// `CopyEditPermission`, stored in `copy_edit_rights`.
    pub copy_edit: Family,
}

/// Declare the standard test families.
///
/// # Panics
///
/// Panics if the fixture declarations are rejected.
#[must_use]
pub fn test_families() -> TestFamilies {
    let mut schema = OwnerSchema::new();
    let post = schema
        .declare(post_decl())
        .expect("post fixture declaration is valid");
    let copy_edit = schema
        .declare(copy_edit_decl())
        .expect("copy edit fixture declaration is valid");
    TestFamilies {
        schema,
        post,
        copy_edit,
    }
}

/// A gate granting `set` under `name`.
#[must_use]
pub fn test_gate_with(name: &str, set: CapabilitySet) -> AuthorizationGate {
    let mut gate = AuthorizationGate::new();
    gate.grant([(name, set)]);
    gate
}
