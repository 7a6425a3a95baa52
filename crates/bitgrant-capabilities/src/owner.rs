//! Owner storage and the family accessor surface.
//!
//! An owner stores one integer per family under the family's storage field
//! and may report itself as sticky (a superuser). The accessors on
//! [`Family`] read that integer into a [`CapabilitySet`] and write sets back.

use std::collections::HashMap;
use std::ops::Deref;

use crate::error::{CapabilityError, CapabilityResult};
use crate::family::Family;
use crate::flag::IntoFlag;
use crate::set::CapabilitySet;

/// A record that persists capability masks.
pub trait RightsOwner {
    /// Stored mask for `field`, or `None` if nothing was stored yet.
    fn read_rights(&self, field: &str) -> Option<u64>;

    /// Store `mask` under `field`.
    fn write_rights(&mut self, field: &str, mask: u64);

    /// Whether every capability of this owner reads as granted.
    fn sticky(&self) -> bool {
        false
    }
}

impl RightsOwner for HashMap<String, u64> {
    fn read_rights(&self, field: &str) -> Option<u64> {
        self.get(field).copied()
    }

    fn write_rights(&mut self, field: &str, mask: u64) {
        self.insert(field.to_owned(), mask);
    }
}

/// A capability set that writes every change straight back to its owner.
///
/// Reads go through [`Deref`] to the underlying [`CapabilitySet`].
pub struct BoundCapabilitySet<'o, O: RightsOwner + ?Sized> {
    owner: &'o mut O,
    set: CapabilitySet,
}

impl<O: RightsOwner + ?Sized> BoundCapabilitySet<'_, O> {
    /// Grant or revoke `name`, storing the new mask on the owner when the
    /// bit flips. Returns whether the mask changed.
    pub fn set(&mut self, name: &str, value: impl IntoFlag) -> bool {
        let changed = self.set.set(name, value);
        if changed {
            store(&mut *self.owner, self.set.family(), self.set.bits());
        }
        changed
    }

    /// A detached copy of the current set.
    #[must_use]
    pub fn snapshot(&self) -> CapabilitySet {
        self.set.clone()
    }

    /// Release the owner and keep the set.
    #[must_use]
    pub fn into_inner(self) -> CapabilitySet {
        self.set
    }
}

impl<O: RightsOwner + ?Sized> Deref for BoundCapabilitySet<'_, O> {
    type Target = CapabilitySet;

    fn deref(&self) -> &Self::Target {
        &self.set
    }
}

impl<O: RightsOwner + ?Sized> std::fmt::Debug for BoundCapabilitySet<'_, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BoundCapabilitySet").field(&self.set).finish()
    }
}

fn store<O: RightsOwner + ?Sized>(owner: &mut O, family: &Family, mask: u64) {
    tracing::trace!(
        family = %family.type_name(),
        field = %family.field(),
        mask,
        "storing capability mask"
    );
    owner.write_rights(family.field(), mask);
}

impl Family {
    /// Read the owner's set for this family. A missing field reads as `0`.
    pub fn get<O: RightsOwner + ?Sized>(&self, owner: &O) -> CapabilitySet {
        let mask = owner.read_rights(self.field()).unwrap_or(0);
        self.wrap(mask, owner.sticky())
    }

    /// Read the owner's set with write-through on every change.
    pub fn bind<'o, O: RightsOwner + ?Sized>(
        &self,
        owner: &'o mut O,
    ) -> BoundCapabilitySet<'o, O> {
        let set = self.get(owner);
        BoundCapabilitySet { owner, set }
    }

    /// Store `set` on the owner.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::TypeMismatch`] if `set` belongs to another
    /// family, even one with the same name and vocabulary.
    pub fn assign<O: RightsOwner + ?Sized>(
        &self,
        owner: &mut O,
        set: &CapabilitySet,
    ) -> CapabilityResult<()> {
        if !set.is_a(self) {
            let actual = set.family().type_name();
            let actual = if actual == self.type_name() {
                format!("{actual} from another declaration")
            } else {
                actual.to_owned()
            };
            return Err(CapabilityError::TypeMismatch {
                expected: self.type_name().to_owned(),
                actual,
            });
        }
        store(owner, self, set.bits());
        Ok(())
    }

    /// Store exactly the known `names` on the owner.
    pub fn set_capabilities<O, I, S>(&self, owner: &mut O, names: I)
    where
        O: RightsOwner + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        store(owner, self, self.mask_for(names));
    }

    /// Apply `(name, value)` pairs one by one through a bound set.
    ///
    /// Every flip is stored immediately; unknown names and unrecognized
    /// values are skipped.
    pub fn apply_attributes<O, I, K, V>(&self, owner: &mut O, attributes: I)
    where
        O: RightsOwner + ?Sized,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoFlag,
    {
        for (name, value) in attributes {
            self.bind(&mut *owner).set(name.as_ref(), value);
        }
    }

    /// Store the default mask on the owner.
    pub fn reset_to_default<O: RightsOwner + ?Sized>(&self, owner: &mut O) {
        store(owner, self, self.default_mask());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::FamilyDecl;

    fn post() -> Family {
        FamilyDecl::new(["create", "review", "update", "delete"])
            .on("post")
            .with_default(["create", "update"])
            .build()
            .unwrap()
    }

    struct Admin {
        rights: HashMap<String, u64>,
    }

    impl RightsOwner for Admin {
        fn read_rights(&self, field: &str) -> Option<u64> {
            self.rights.read_rights(field)
        }

        fn write_rights(&mut self, field: &str, mask: u64) {
            self.rights.write_rights(field, mask);
        }

        fn sticky(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_missing_field_reads_as_zero() {
        let owner: HashMap<String, u64> = HashMap::new();
        let set = post().get(&owner);
        assert_eq!(set.bits(), 0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_assign_stores_mask() {
        let family = post();
        let mut owner: HashMap<String, u64> = HashMap::new();
        family
            .assign(&mut owner, &family.for_capabilities(["create", "delete"]))
            .unwrap();
        assert_eq!(owner.get("post_rights"), Some(&9));
        assert_eq!(family.get(&owner).capabilities(), vec!["create", "delete"]);
    }

    #[test]
    fn test_assign_rejects_other_family() {
        let post = post();
        let file = FamilyDecl::new(["read"]).on("file").build().unwrap();
        let mut owner: HashMap<String, u64> = HashMap::new();

        let err = post.assign(&mut owner, &file.create()).unwrap_err();
        assert_eq!(
            err,
            CapabilityError::TypeMismatch {
                expected: "PostPermission".to_string(),
                actual: "FilePermission".to_string(),
            }
        );
        assert_eq!(err.to_string(), "PostPermission expected, got FilePermission");
        assert!(owner.is_empty());
    }

    #[test]
    fn test_assign_rejects_twin_declaration() {
        let family = post();
        let twin = post();
        let mut owner: HashMap<String, u64> = HashMap::new();
        let err = family.assign(&mut owner, &twin.create()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("PostPermission from another declaration"));
    }

    #[test]
    fn test_bound_set_writes_through() {
        let family = post();
        let mut owner: HashMap<String, u64> = HashMap::new();
        family.reset_to_default(&mut owner);

        {
            let mut bound = family.bind(&mut owner);
            assert!(bound.set("delete", "1"));
            assert!(bound.can("delete"));
        }
        assert_eq!(owner.get("post_rights"), Some(&13));
    }

    #[test]
    fn test_bound_set_skips_write_without_flip() {
        let family = post();
        let mut owner: HashMap<String, u64> = HashMap::new();
        let mut bound = family.bind(&mut owner);
        assert!(!bound.set("delete", false));
        assert!(!bound.set("publish", true));
        drop(bound);
        assert!(owner.is_empty());
    }

    #[test]
    fn test_snapshot_and_into_inner() {
        let family = post();
        let mut owner: HashMap<String, u64> = HashMap::new();
        let mut bound = family.bind(&mut owner);
        bound.set("review", true);
        let snapshot = bound.snapshot();
        let inner = bound.into_inner();
        assert_eq!(snapshot, inner);
        assert_eq!(inner.bits(), 2);
    }

    #[test]
    fn test_set_capabilities() {
        let family = post();
        let mut owner: HashMap<String, u64> = HashMap::new();
        family.set_capabilities(&mut owner, ["update", "publish"]);
        assert_eq!(owner.get("post_rights"), Some(&4));
    }

    #[test]
    fn test_apply_attributes() {
        let family = post();
        let mut owner: HashMap<String, u64> = HashMap::new();
        family.reset_to_default(&mut owner);
        family.apply_attributes(
            &mut owner,
            [
                ("create", "0"),
                ("delete", "1"),
                ("publish", "1"),
                ("review", "maybe"),
            ],
        );
        assert_eq!(family.get(&owner).capabilities(), vec!["update", "delete"]);
    }

    #[test]
    fn test_apply_attributes_from_json() {
        let family = post();
        let mut owner: HashMap<String, u64> = HashMap::new();
        let attributes: serde_json::Map<String, serde_json::Value> = serde_json::from_str(
            r#"{"create": true, "review": 1, "delete": "false"}"#,
        )
        .unwrap();
        family.apply_attributes(&mut owner, &attributes);
        assert_eq!(owner.get("post_rights"), Some(&3));
    }

    #[test]
    fn test_sticky_owner() {
        let family = post();
        let mut admin = Admin {
            rights: HashMap::new(),
        };
        let set = family.get(&admin);
        assert!(set.is_sticky());
        assert!(set.can("delete"));

        assert!(!family.bind(&mut admin).set("delete", true));
        assert_eq!(admin.rights.get("post_rights"), None);

        assert!(family.bind(&mut admin).set("delete", false));
        assert_eq!(admin.rights.get("post_rights"), Some(&8));
    }

    #[test]
    fn test_families_use_separate_fields() {
        let post = post();
        let copy_edit = FamilyDecl::new(["adjust", "approve"])
            .on("copy_edits")
            .build()
            .unwrap();
        let mut owner: HashMap<String, u64> = HashMap::new();
        post.set_capabilities(&mut owner, ["delete"]);
        copy_edit.set_capabilities(&mut owner, ["approve"]);
        assert_eq!(owner.get("post_rights"), Some(&8));
        assert_eq!(owner.get("copy_edit_rights"), Some(&2));
    }
}
