//! Prelude module - commonly used types for convenient import.
//!
//! Use `use bitgrant_capabilities::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use bitgrant_capabilities::prelude::*;
//! use std::collections::HashMap;
//!
//! let family = FamilyDecl::new(["read", "write"]).on("files").build().unwrap();
//!
//! let mut owner: HashMap<String, u64> = HashMap::new();
//! family.set_capabilities(&mut owner, ["read"]);
//! assert!(family.get(&owner).can("read"));
//! ```

// Errors
pub use crate::{CapabilityError, CapabilityResult};

// Families and sets
pub use crate::{CapabilitySet, Family, FamilyDecl, Vocabulary};

// Owners
pub use crate::{BoundCapabilitySet, OwnerSchema, RightsOwner};

// Flag coercion
pub use crate::IntoFlag;
