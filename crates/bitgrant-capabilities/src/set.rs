//! Capability sets: a family's vocabulary paired with a packed mask.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{CapabilityError, CapabilityResult};
use crate::family::Family;
use crate::flag::IntoFlag;

/// A value of one capability family.
///
/// Sets are constructed through their family ([`Family::create`],
/// [`Family::for_capabilities`], [`Family::get`]) and never act as the
/// system of record; use [`Family::assign`] or a
/// [`BoundCapabilitySet`](crate::BoundCapabilitySet) to persist changes.
///
/// A sticky set reflects a superuser owner: every capability reads as
/// granted, whatever the mask says.
#[derive(Clone)]
pub struct CapabilitySet {
    family: Family,
    mask: u64,
    sticky: bool,
}

impl CapabilitySet {
    pub(crate) fn new(family: Family, mask: u64, sticky: bool) -> Self {
        Self {
            family,
            mask,
            sticky,
        }
    }

    /// A set of the base family. Grants nothing.
    #[must_use]
    pub fn empty() -> Self {
        Family::empty().create()
    }

    /// The family this set belongs to.
    #[must_use]
    pub fn family(&self) -> &Family {
        &self.family
    }

    /// The raw mask, including any bits beyond the vocabulary.
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.mask
    }

    /// Whether the set was read from a sticky owner.
    #[must_use]
    pub fn is_sticky(&self) -> bool {
        self.sticky
    }

    /// Whether `name` is part of the family's vocabulary.
    #[must_use]
    pub fn has_capability(&self, name: &str) -> bool {
        self.family.vocabulary().contains(name)
    }

    /// Whether `name` is granted.
    ///
    /// Always `true` for a sticky set; otherwise `false` for names outside
    /// the vocabulary.
    #[must_use]
    pub fn can(&self, name: &str) -> bool {
        self.sticky || self.mask & self.family.bit_for(name) != 0
    }

    /// Granted capabilities in vocabulary order.
    #[must_use]
    pub fn capabilities(&self) -> Vec<&str> {
        let vocabulary = self.family.vocabulary();
        if self.sticky {
            vocabulary.iter().collect()
        } else {
            vocabulary.names_in(self.mask).collect()
        }
    }

    /// Whether no capability is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capabilities().is_empty()
    }

    /// Named access to a capability.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::UnknownMember`] when `name` is not part of
    /// the vocabulary.
    pub fn member(&self, name: &str) -> CapabilityResult<bool> {
        if self.has_capability(name) {
            Ok(self.can(name))
        } else {
            Err(CapabilityError::UnknownMember {
                family: self.family.type_name().to_owned(),
                name: name.to_owned(),
            })
        }
    }

    /// Grant or revoke `name`.
    ///
    /// `value` goes through [`IntoFlag`]; unrecognized values and unknown
    /// names leave the set untouched. The bit is flipped only when the flag
    /// differs from [`can`](Self::can); on a sticky set that means `true` is
    /// always a no-op and `false` toggles the stored bit. Returns whether the
    /// mask changed.
    pub fn set(&mut self, name: &str, value: impl IntoFlag) -> bool {
        let bit = self.family.bit_for(name);
        if bit == 0 {
            return false;
        }
        let Some(flag) = value.into_flag() else {
            return false;
        };

        if self.can(name) == flag {
            return false;
        }
        self.mask ^= bit;
        true
    }

    /// Whether this set belongs to `family`.
    #[must_use]
    pub fn is_a(&self, family: &Family) -> bool {
        self.family.is_same(family)
    }
}

impl PartialEq for CapabilitySet {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family && self.mask == other.mask && self.sticky == other.sticky
    }
}

impl Eq for CapabilitySet {}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilitySet")
            .field("family", &self.family.type_name())
            .field("mask", &self.mask)
            .field("sticky", &self.sticky)
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]",
            self.family.type_name(),
            self.capabilities().join(", ")
        )
    }
}

impl Serialize for CapabilitySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CapabilitySet", 4)?;
        state.serialize_field("family", self.family.type_name())?;
        state.serialize_field("mask", &self.mask)?;
        state.serialize_field("sticky", &self.sticky)?;
        state.serialize_field("capabilities", &self.capabilities())?;
        state.end()
    }
}

#[cfg(test)]
#[path = "set_tests.rs"]
mod tests;
