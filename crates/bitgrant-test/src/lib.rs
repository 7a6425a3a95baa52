//! Bitgrant Test - shared test utilities.
//!
//! This crate provides an in-memory owner record, a request context carrying
//! a gate, ready-made capability families and logging helpers, for use as a
//! dev-dependency across bitgrant crates.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! bitgrant-test.workspace = true
//! ```
//!
//! ```rust
//! use bitgrant_test::{MockRecord, test_families};
//!
//! let families = test_families();
//! let mut record = MockRecord::new();
//! families.post.bind(&mut record).set("delete", true);
//!
//! assert_eq!(record.rights_of("post_rights"), Some(8));
//! assert_eq!(record.write_count(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
