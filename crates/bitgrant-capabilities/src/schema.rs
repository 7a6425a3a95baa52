//! Per-owner-type registry of capability families.

use std::fmt;
use std::marker::PhantomData;

use crate::error::{CapabilityError, CapabilityResult};
use crate::family::{Family, FamilyDecl};
use crate::inflect::resource_name;
use crate::owner::RightsOwner;

/// The capability families declared for one owner type.
///
/// Declaring a family reserves its storage field; a second declaration for
/// the same field is refused so stored bits are never reinterpreted by a
/// different vocabulary.
///
/// ```
/// use std::collections::HashMap;
/// use bitgrant_capabilities::{FamilyDecl, OwnerSchema};
///
/// let mut schema = OwnerSchema::<HashMap<String, u64>>::new();
/// let posts = schema
///     .declare(FamilyDecl::new(["create", "delete"]).on("posts").with_default(["create"]))
///     .unwrap();
///
/// let mut owner = HashMap::new();
/// schema.reset_defaults_for(&mut owner, ["posts"]).unwrap();
/// assert!(posts.get(&owner).can("create"));
/// ```
pub struct OwnerSchema<O: ?Sized> {
    families: Vec<Family>,
    _owner: PhantomData<fn(&O)>,
}

impl<O: ?Sized> OwnerSchema<O> {
    /// An empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self {
            families: Vec::new(),
            _owner: PhantomData,
        }
    }

    /// Declare a family and return its descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::DuplicateFamily`] if a family already
    /// stores its mask under the same field, or the declaration error from
    /// [`FamilyDecl::build`].
    pub fn declare(&mut self, decl: FamilyDecl) -> CapabilityResult<Family> {
        let family = decl.build()?;

        if let Some(existing) = self.families.iter().find(|f| f.field() == family.field()) {
            tracing::warn!(
                family = %family.type_name(),
                field = %existing.field(),
                "refusing to redeclare capability family"
            );
            return Err(CapabilityError::DuplicateFamily {
                family: family.type_name().to_owned(),
                field: existing.field().to_owned(),
            });
        }

        tracing::debug!(
            family = %family.type_name(),
            field = %family.field(),
            capabilities = %family.vocabulary(),
            default_mask = family.default_mask(),
            "declared capability family"
        );
        self.families.push(family.clone());
        Ok(family)
    }

    /// The family declared for `resource`. The name is normalized the same
    /// way declarations are, so `"posts"` finds the `post` family.
    #[must_use]
    pub fn family(&self, resource: &str) -> Option<&Family> {
        let resource = resource_name(resource);
        self.families.iter().find(|f| f.resource() == resource)
    }

    /// Every declared family in declaration order.
    #[must_use]
    pub fn families(&self) -> &[Family] {
        &self.families
    }

    /// Number of declared families.
    #[must_use]
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// Whether nothing has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

impl<O: RightsOwner + ?Sized> OwnerSchema<O> {
    /// Reset the named families to their defaults.
    ///
    /// All names are resolved before anything is written, so an unknown
    /// name leaves the owner untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::ResetNotFound`] naming the missing
    /// `default_<resource>_permissions` operation.
    pub fn reset_defaults_for<I, S>(&self, owner: &mut O, resources: I) -> CapabilityResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let targets = resources
            .into_iter()
            .map(|resource| {
                let resource = resource.as_ref();
                self.family(resource)
                    .ok_or_else(|| CapabilityError::ResetNotFound {
                        operation: format!("default_{}_permissions", resource_name(resource)),
                    })
            })
            .collect::<CapabilityResult<Vec<_>>>()?;

        for family in targets {
            family.reset_to_default(owner);
        }
        Ok(())
    }

    /// Reset every declared family to its default.
    pub fn reset_all_defaults(&self, owner: &mut O) {
        for family in &self.families {
            family.reset_to_default(owner);
        }
    }
}

impl<O: ?Sized> Default for OwnerSchema<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: ?Sized> Clone for OwnerSchema<O> {
    fn clone(&self) -> Self {
        Self {
            families: self.families.clone(),
            _owner: PhantomData,
        }
    }
}

impl<O: ?Sized> fmt::Debug for OwnerSchema<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerSchema")
            .field("families", &self.families)
            .finish()
    }
}
