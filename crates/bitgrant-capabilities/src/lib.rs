//! Bitgrant Capabilities - bitmask-backed capability families.
//!
//! This crate provides:
//! - Ordered capability vocabularies packed into a `u64` mask
//! - Capability families scoped to sub-resources of an owner record
//! - The sticky (superuser) override
//! - Owner-bound sets that write every change back to their owner
//!
//! # Storage Model
//!
//! An owner stores one integer per family, under the family's storage
//! field. Capability sets are views built on demand from that integer and
//! are never the system of record.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use bitgrant_capabilities::{FamilyDecl, OwnerSchema};
//!
//! let mut schema = OwnerSchema::<HashMap<String, u64>>::new();
//! let posts = schema
//!     .declare(
//!         FamilyDecl::new(["create", "review", "update", "delete"])
//!             .on("post")
//!             .with_default(["create", "update"]),
//!     )
//!     .unwrap();
//!
//! let mut owner = HashMap::new();
//! posts.reset_to_default(&mut owner);
//!
//! // Changes through a bound set are stored immediately
//! posts.bind(&mut owner).set("delete", "1");
//!
//! let rights = posts.get(&owner);
//! assert_eq!(rights.bits(), 13);
//! assert_eq!(rights.capabilities(), vec!["create", "update", "delete"]);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod family;
mod flag;
mod inflect;
mod owner;
mod schema;
mod set;
mod vocabulary;

pub use error::{CapabilityError, CapabilityResult};
pub use family::{Family, FamilyDecl};
pub use flag::{IntoFlag, parse_flag};
pub use owner::{BoundCapabilitySet, RightsOwner};
pub use schema::OwnerSchema;
pub use set::CapabilitySet;
pub use vocabulary::{MAX_CAPABILITIES, Vocabulary};
