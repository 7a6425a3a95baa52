//! Capability families.
//!
//! A [`Family`] is one independently-masked group of capabilities, usually
//! scoped to a sub-resource of its owner (`post`, `copy_edit`, ...). Every
//! declaration produces a family with its own identity: two families are
//! never interchangeable, even when their vocabularies are identical.
//!
//! Names are derived from the resource the same way for every family:
//!
//! | `on`          | type name            | accessor               | storage field        |
//! |---------------|----------------------|------------------------|----------------------|
//! | *(none)*      | `Permission`         | `permission`           | `rights`             |
//! | `post`        | `PostPermission`     | `post_permission`      | `post_rights`        |
//! | `copy_edits`  | `CopyEditPermission` | `copy_edit_permission` | `copy_edit_rights`   |

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::{CapabilityError, CapabilityResult};
use crate::inflect::{camelize, resource_name};
use crate::set::CapabilitySet;
use crate::vocabulary::Vocabulary;

/// Declaration of a capability family, built with chained options.
///
/// The order of `capabilities` fixes their bits and must only ever be
/// appended to once masks are persisted (see [`Vocabulary`]).
///
/// # Example
///
/// ```
/// use bitgrant_capabilities::FamilyDecl;
///
/// let family = FamilyDecl::new(["create", "review", "update", "delete"])
///     .on("post")
///     .with_default(["create", "update"])
///     .build()
///     .unwrap();
///
/// assert_eq!(family.type_name(), "PostPermission");
/// assert_eq!(family.field(), "post_rights");
/// assert_eq!(family.default_mask(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyDecl {
    capabilities: Vec<String>,
    on: Option<String>,
    default: Vec<String>,
}

impl FamilyDecl {
    /// Declare a family with the given capabilities in bit order.
    #[must_use]
    pub fn new<I, S>(capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            capabilities: capabilities.into_iter().map(Into::into).collect(),
            on: None,
            default: Vec::new(),
        }
    }

    /// Scope the family to a named sub-resource of the owner.
    #[must_use]
    pub fn on(mut self, resource: impl Into<String>) -> Self {
        self.on = Some(resource.into());
        self
    }

    /// Capabilities granted by the family's default set.
    #[must_use]
    pub fn with_default<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default = names.into_iter().map(Into::into).collect();
        self
    }

    /// Normalized resource name (singular, underscored; empty when unscoped).
    #[must_use]
    pub fn resource(&self) -> String {
        self.on.as_deref().map(resource_name).unwrap_or_default()
    }

    /// Build the family.
    ///
    /// Default names outside the vocabulary contribute no bits.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::InvalidDeclaration`] if the vocabulary is
    /// invalid.
    pub fn build(self) -> CapabilityResult<Family> {
        let resource = self.resource();
        let type_name = format!("{}Permission", camelize(&resource));

        let vocabulary = Vocabulary::new(self.capabilities).map_err(|e| {
            CapabilityError::InvalidDeclaration {
                family: type_name.clone(),
                reason: e.to_string(),
            }
        })?;

        for name in &self.default {
            if !vocabulary.contains(name) {
                tracing::warn!(
                    family = %type_name,
                    capability = %name,
                    "default capability is not in the vocabulary; ignoring"
                );
            }
        }
        let default_mask = vocabulary.mask_for(&self.default);

        Ok(Family::from_parts(resource, type_name, vocabulary, default_mask))
    }
}

struct FamilyInner {
    resource: String,
    type_name: String,
    accessor: String,
    field: String,
    vocabulary: Vocabulary,
    default_mask: u64,
}

/// A declared capability family: vocabulary, default mask and storage field.
///
/// Cloning is cheap and preserves identity.
#[derive(Clone)]
pub struct Family {
    inner: Arc<FamilyInner>,
}

impl Family {
    fn from_parts(
        resource: String,
        type_name: String,
        vocabulary: Vocabulary,
        default_mask: u64,
    ) -> Self {
        let (accessor, field) = if resource.is_empty() {
            ("permission".to_owned(), "rights".to_owned())
        } else {
            (format!("{resource}_permission"), format!("{resource}_rights"))
        };

        Self {
            inner: Arc::new(FamilyInner {
                resource,
                type_name,
                accessor,
                field,
                vocabulary,
                default_mask,
            }),
        }
    }

    /// The base family: no capabilities and a zero default.
    ///
    /// Sets of this family grant nothing unless sticky.
    #[must_use]
    pub fn empty() -> Self {
        static EMPTY: OnceLock<Family> = OnceLock::new();
        EMPTY
            .get_or_init(|| {
                Self::from_parts(
                    String::new(),
                    "Permission".to_owned(),
                    Vocabulary::empty(),
                    0,
                )
            })
            .clone()
    }

    /// Normalized resource name, empty for the unscoped family.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.inner.resource
    }

    /// Type name, e.g. `PostPermission`.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.inner.type_name
    }

    /// Accessor name, e.g. `post_permission`.
    #[must_use]
    pub fn accessor(&self) -> &str {
        &self.inner.accessor
    }

    /// Owner storage field holding the mask, e.g. `post_rights`.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.inner.field
    }

    /// The family's vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.inner.vocabulary
    }

    /// Mask of the default set.
    #[must_use]
    pub fn default_mask(&self) -> u64 {
        self.inner.default_mask
    }

    /// Bit representing `name`, or `0` if the name is unknown.
    #[must_use]
    pub fn bit_for(&self, name: &str) -> u64 {
        self.inner.vocabulary.bit_for(name)
    }

    /// Mask granting exactly the known `names`.
    pub fn mask_for<I, S>(&self, names: I) -> u64
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inner.vocabulary.mask_for(names)
    }

    /// A set granting exactly the known `names`; unknown names are ignored.
    pub fn for_capabilities<I, S>(&self, names: I) -> CapabilitySet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        CapabilitySet::new(self.clone(), self.mask_for(names), false)
    }

    /// A set with the family's default grants.
    #[must_use]
    pub fn create(&self) -> CapabilitySet {
        CapabilitySet::new(self.clone(), self.inner.default_mask, false)
    }

    /// Capabilities of the default set, in vocabulary order.
    #[must_use]
    pub fn default_capabilities(&self) -> Vec<&str> {
        self.inner
            .vocabulary
            .names_in(self.inner.default_mask)
            .collect()
    }

    /// Whether `other` is this very family (same declaration).
    #[must_use]
    pub fn is_same(&self, other: &Family) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Wrap a stored mask with the sticky flag of its owner.
    pub(crate) fn wrap(&self, mask: u64, sticky: bool) -> CapabilitySet {
        CapabilitySet::new(self.clone(), mask, sticky)
    }
}

impl PartialEq for Family {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl Eq for Family {}

impl fmt::Debug for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Family")
            .field("type_name", &self.inner.type_name)
            .field("field", &self.inner.field)
            .field("vocabulary", &self.inner.vocabulary)
            .field("default_mask", &self.inner.default_mask)
            .finish()
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.type_name)
    }
}
