//! The per-context authorization gate.

use std::collections::HashMap;
use std::sync::OnceLock;

use bitgrant_capabilities::CapabilitySet;
use uuid::Uuid;

use crate::rights::{DEFAULT_RIGHTS, RightsSpec};

fn empty_set() -> &'static CapabilitySet {
    static EMPTY: OnceLock<CapabilitySet> = OnceLock::new();
    EMPTY.get_or_init(CapabilitySet::empty)
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Named capability sets granted to one authorization context.
///
/// Build one per request (or other unit of work) and drop it afterwards.
/// Permission names are matched case-insensitively; a name that was never
/// granted reads as an empty set.
///
/// ```
/// use bitgrant_capabilities::FamilyDecl;
/// use bitgrant_gate::{AuthorizationGate, RightsSpec};
///
/// let files = FamilyDecl::new(["read", "write"]).build().unwrap();
///
/// let mut gate = AuthorizationGate::new();
/// gate.grant([("files", files.for_capabilities(["read"]))]);
///
/// assert!(gate.authorized_by(&RightsSpec::from(("files", "read"))));
/// assert!(!gate.authorized_by(&RightsSpec::from(("files", "write"))));
/// ```
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    context_id: Uuid,
    rights: HashMap<String, CapabilitySet>,
}

impl AuthorizationGate {
    /// A gate with nothing granted.
    #[must_use]
    pub fn new() -> Self {
        Self {
            context_id: Uuid::new_v4(),
            rights: HashMap::new(),
        }
    }

    /// Identifier of this authorization context, carried in log events.
    #[must_use]
    pub fn context_id(&self) -> Uuid {
        self.context_id
    }

    /// Grant named capability sets. A later grant for the same name replaces
    /// the earlier one.
    pub fn grant<I, K>(&mut self, grants: I)
    where
        I: IntoIterator<Item = (K, CapabilitySet)>,
        K: AsRef<str>,
    {
        for (name, set) in grants {
            let name = normalize(name.as_ref());
            tracing::debug!(
                context_id = %self.context_id,
                permission = %name,
                rights = %set,
                "granted rights"
            );
            self.rights.insert(name, set);
        }
    }

    /// The set granted under `name`, or an empty set.
    #[must_use]
    pub fn rights_for(&self, name: &str) -> &CapabilitySet {
        self.rights.get(&normalize(name)).unwrap_or_else(|| empty_set())
    }

    /// The set granted under the default name.
    #[must_use]
    pub fn rights(&self) -> &CapabilitySet {
        self.rights_for(DEFAULT_RIGHTS)
    }

    /// Grant `set` under the default name.
    pub fn set_rights(&mut self, set: CapabilitySet) {
        self.grant([(DEFAULT_RIGHTS, set)]);
    }

    /// Names that have been granted.
    pub fn granted(&self) -> impl Iterator<Item = &str> {
        self.rights.keys().map(String::as_str)
    }

    /// Whether the set granted under `permission` allows `capability`.
    #[must_use]
    pub fn allows(&self, permission: &str, capability: &str) -> bool {
        self.rights_for(permission).can(capability)
    }

    /// Whether any entry of `spec` is granted. No spec authorizes nothing.
    pub fn authorized_by<'a>(&self, spec: impl Into<Option<&'a RightsSpec>>) -> bool {
        let Some(spec) = spec.into() else {
            tracing::debug!(context_id = %self.context_id, "no rights spec given; denying");
            return false;
        };

        let allowed = spec
            .entries()
            .any(|(permission, capability)| self.allows(permission, capability));

        if !allowed {
            tracing::debug!(context_id = %self.context_id, %spec, "rights spec not satisfied");
        }
        allowed
    }
}

impl Default for AuthorizationGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitgrant_capabilities::{Family, FamilyDecl};
    use std::borrow::Cow;

    fn files() -> Family {
        FamilyDecl::new(["read", "write", "delete"])
            .on("file")
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_gate_denies() {
        let gate = AuthorizationGate::new();
        assert!(!gate.authorized_by(&RightsSpec::from("read")));
        assert!(!gate.authorized_by(&RightsSpec::from(("x", "read"))));
        assert!(gate.rights_for("x").is_empty());
        assert!(gate.rights().is_empty());
    }

    #[test]
    fn test_grant_then_authorize() {
        let mut gate = AuthorizationGate::new();
        gate.grant([("x", files().for_capabilities(["read"]))]);
        assert!(gate.authorized_by(&RightsSpec::from(("x", "read"))));
        assert!(!gate.authorized_by(&RightsSpec::from(("x", "write"))));
    }

    #[test]
    fn test_absent_spec_denies() {
        let mut gate = AuthorizationGate::new();
        gate.set_rights(files().for_capabilities(["read"]));
        assert!(!gate.authorized_by(None));
    }

    #[test]
    fn test_bare_spec_uses_default_rights() {
        let mut gate = AuthorizationGate::new();
        gate.set_rights(files().for_capabilities(["delete"]));
        assert!(gate.authorized_by(&RightsSpec::from("delete")));
        assert!(!gate.authorized_by(&RightsSpec::from("read")));
        assert!(gate.rights().can("delete"));
    }

    #[test]
    fn test_any_entry_authorizes() {
        let mut gate = AuthorizationGate::new();
        gate.grant([("post", files().for_capabilities(["write"]))]);
        let spec = RightsSpec::any([("post", "read"), ("post", "write")]);
        assert!(gate.authorized_by(&spec));
        let spec = RightsSpec::any([("post", "read"), ("comment", "write")]);
        assert!(!gate.authorized_by(&spec));
    }

    #[test]
    fn test_names_are_case_and_representation_insensitive() {
        let mut gate = AuthorizationGate::new();
        gate.grant([(Cow::Borrowed("Post"), files().for_capabilities(["read"]))]);
        assert!(gate.rights_for("post").can("read"));
        assert!(gate.rights_for(" POST ").can("read"));
        assert!(gate.rights_for(&String::from("post")).can("read"));
        assert_eq!(gate.granted().collect::<Vec<_>>(), vec!["post"]);
    }

    #[test]
    fn test_later_grant_overwrites() {
        let family = files();
        let mut gate = AuthorizationGate::new();
        gate.grant([("post", family.for_capabilities(["read"]))]);
        gate.grant([("post", family.for_capabilities(["write"]))]);
        assert!(!gate.allows("post", "read"));
        assert!(gate.allows("post", "write"));
    }

    #[test]
    fn test_sticky_set_allows_anything() {
        let family = files();
        let admin = HashMap::from([("file_rights".to_string(), 0u64)]);
        struct Admin(HashMap<String, u64>);
        impl bitgrant_capabilities::RightsOwner for Admin {
            fn read_rights(&self, field: &str) -> Option<u64> {
                self.0.get(field).copied()
            }
            fn write_rights(&mut self, field: &str, mask: u64) {
                self.0.insert(field.to_string(), mask);
            }
            fn sticky(&self) -> bool {
                true
            }
        }

        let mut gate = AuthorizationGate::new();
        gate.grant([("file", family.get(&Admin(admin)))]);
        assert!(gate.allows("file", "delete"));
        assert!(gate.allows("file", "anything"));
    }

    #[test]
    fn test_contexts_have_distinct_ids() {
        assert_ne!(
            AuthorizationGate::new().context_id(),
            AuthorizationGate::new().context_id()
        );
    }

    mod proptest_gate {
        use super::*;
        use proptest::prelude::*;

        const NAMES: [&str; 3] = ["read", "write", "delete"];

        proptest! {
            /// A single-pair spec agrees with the granted set's `can`.
            #[test]
            fn pair_spec_matches_can(
                mask in 0u64..8,
                capability in prop::sample::select(NAMES.to_vec()),
            ) {
                let family = files();
                let set = family.for_capabilities(
                    NAMES.iter().copied().filter(|n| mask & family.bit_for(n) != 0),
                );
                let expected = set.can(capability);

                let mut gate = AuthorizationGate::new();
                gate.grant([("file", set)]);
                prop_assert_eq!(
                    gate.authorized_by(&RightsSpec::from(("file", capability))),
                    expected
                );
            }
        }
    }
}
