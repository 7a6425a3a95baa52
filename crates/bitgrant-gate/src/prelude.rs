//! Prelude module - commonly used types for convenient import.
//!
//! Use `use bitgrant_gate::prelude::*;` to import all essential types.

// Errors
pub use crate::{GateError, GateResult};

// Gate and specs
pub use crate::{AuthorizationGate, RightsSpec};

// Guards
pub use crate::{Decision, FilterChain, GateContext, Guard, GuardHost, VerifyAccess, verify_access};
