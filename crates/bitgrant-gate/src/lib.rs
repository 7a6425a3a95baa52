//! Bitgrant Gate - request-scoped authorization over capability sets.
//!
//! This crate provides:
//! - [`AuthorizationGate`]: named capability sets granted to one context
//! - [`RightsSpec`]: what a guarded action requires
//! - [`Guard`] and [`VerifyAccess`]: before-action checks that stop a
//!   denied action before it runs
//! - [`FilterChain`]: a reference host for before-action filters
//!
//! A denial surfaces as [`GateError::Forbidden`], which hosting code maps to
//! an HTTP 403 via [`GateError::status_code`].
//!
//! # Example
//!
//! ```
//! use bitgrant_capabilities::FamilyDecl;
//! use bitgrant_gate::{AuthorizationGate, Guard};
//!
//! let posts = FamilyDecl::new(["create", "review", "update", "delete"])
//!     .on("post")
//!     .build()
//!     .unwrap();
//!
//! let mut gate = AuthorizationGate::new();
//! gate.grant([("post", posts.for_capabilities(["update"]))]);
//!
//! let guard = Guard::new(("post", "delete")).with_message("Read only");
//! let err = guard.run(&gate, || "deleted").unwrap_err();
//! assert_eq!(err.status_code(), 403);
//! assert_eq!(err.to_string(), "Read only");
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod gate;
mod guard;
mod host;
mod rights;

pub use error::{DEFAULT_DENY_MESSAGE, GateError, GateResult};
pub use gate::AuthorizationGate;
pub use guard::{Decision, Filter, GateContext, Guard, GuardHost, VerifyAccess, verify_access};
pub use host::FilterChain;
pub use rights::{DEFAULT_RIGHTS, RightsSpec};
