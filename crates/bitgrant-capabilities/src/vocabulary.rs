//! Ordered capability vocabularies.
//!
//! A [`Vocabulary`] fixes the bit position of every capability name: the
//! name at index `i` owns bit `2^i` of a mask.
//!
//! # Compatibility
//!
//! A vocabulary is **append-only** for as long as any mask built from it is
//! persisted. Reordering or removing a name silently changes the meaning of
//! every stored mask; only appending new names at the end is safe. Masks
//! written by a longer vocabulary stay readable by a shorter one because
//! unknown high bits are ignored.

use std::fmt;
use std::sync::Arc;

use crate::error::{CapabilityError, CapabilityResult};

/// Maximum number of capabilities in one vocabulary (the width of a mask).
pub const MAX_CAPABILITIES: usize = 64;

/// Bit owned by the capability at `index`, or `0` past the mask width.
pub(crate) fn bit_at(index: usize) -> u64 {
    u32::try_from(index)
        .ok()
        .and_then(|shift| 1u64.checked_shl(shift))
        .unwrap_or(0)
}

/// An immutable, ordered list of distinct capability names.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Vocabulary {
    names: Arc<[String]>,
}

impl Vocabulary {
    /// Build a vocabulary from names in bit order.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::InvalidVocabulary`] if a name is empty,
    /// appears twice, or there are more than [`MAX_CAPABILITIES`] names.
    pub fn new<I, S>(names: I) -> CapabilityResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        if names.len() > MAX_CAPABILITIES {
            return Err(CapabilityError::InvalidVocabulary {
                reason: format!(
                    "{} capabilities exceed the limit of {MAX_CAPABILITIES}",
                    names.len()
                ),
            });
        }

        for (index, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(CapabilityError::InvalidVocabulary {
                    reason: format!("capability at position {index} has an empty name"),
                });
            }
            if names[..index].contains(name) {
                return Err(CapabilityError::InvalidVocabulary {
                    reason: format!("capability `{name}` is listed more than once"),
                });
            }
        }

        Ok(Self {
            names: names.into(),
        })
    }

    /// A vocabulary with no capabilities.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            names: Arc::from(Vec::new()),
        }
    }

    /// Number of capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the vocabulary has no capabilities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Capability names in bit order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Position of `name`, which is also its bit index.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Whether `name` belongs to the vocabulary.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Bit representing `name`, or `0` if the name is unknown.
    #[must_use]
    pub fn bit_for(&self, name: &str) -> u64 {
        self.index_of(name).map_or(0, bit_at)
    }

    /// Union of the bits of every known name. Unknown names and repeats add
    /// nothing.
    pub fn mask_for<I, S>(&self, names: I) -> u64
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .fold(0, |mask, name| mask | self.bit_for(name.as_ref()))
    }

    /// Mask with every capability of this vocabulary set.
    #[must_use]
    pub fn full_mask(&self) -> u64 {
        u32::try_from(self.len())
            .ok()
            .and_then(|width| 1u64.checked_shl(width))
            .map_or(u64::MAX, |bound| bound.wrapping_sub(1))
    }

    /// Names whose bit is set in `mask`, in vocabulary order.
    pub fn names_in(&self, mask: u64) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .enumerate()
            .filter(move |(index, _)| mask & bit_at(*index) != 0)
            .map(|(_, name)| name.as_str())
    }
}

impl fmt::Debug for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names.join(", "))
    }
}
