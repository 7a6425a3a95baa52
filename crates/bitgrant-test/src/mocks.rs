//! Mock implementations for testing.

use std::collections::HashMap;

use bitgrant_capabilities::RightsOwner;
use bitgrant_gate::{AuthorizationGate, GateContext};
use uuid::Uuid;

/// In-memory owner record that logs every mask write.
#[derive(Debug, Clone, Default)]
pub struct MockRecord {
    /// Identifier, handy when a test juggles several records.
    pub id: Uuid,
    fields: HashMap<String, u64>,
    sticky: bool,
    writes: Vec<(String, u64)>,
}

impl MockRecord {
    /// A record with no stored masks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            ..Self::default()
        }
    }

    /// Mark the record as a superuser, so every capability reads as granted.
    #[must_use]
    pub fn superuser(mut self) -> Self {
        self.sticky = true;
        self
    }

    /// Pre-store `mask` under `field` without logging a write.
    #[must_use]
    pub fn with_rights(mut self, field: impl Into<String>, mask: u64) -> Self {
        self.fields.insert(field.into(), mask);
        self
    }

    /// The mask stored under `field`.
    #[must_use]
    pub fn rights_of(&self, field: &str) -> Option<u64> {
        self.fields.get(field).copied()
    }

    /// Every `(field, mask)` write, in order.
    #[must_use]
    pub fn writes(&self) -> &[(String, u64)] {
        &self.writes
    }

    /// Number of writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Forget logged writes, keeping stored masks.
    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

impl RightsOwner for MockRecord {
    fn read_rights(&self, field: &str) -> Option<u64> {
        self.rights_of(field)
    }

    fn write_rights(&mut self, field: &str, mask: u64) {
        self.fields.insert(field.to_owned(), mask);
        self.writes.push((field.to_owned(), mask));
    }

    fn sticky(&self) -> bool {
        self.sticky
    }
}

/// A request carrying an authorization gate and the action being served.
#[derive(Debug, Clone, Default)]
pub struct MockRequest {
    /// The request's gate.
    pub gate: AuthorizationGate,
    /// Action name, as a filter host would see it.
    pub action: String,
}

impl MockRequest {
    /// A request for `action` with nothing granted.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            gate: AuthorizationGate::new(),
            action: action.into(),
        }
    }

    /// Replace the request's gate.
    #[must_use]
    pub fn with_gate(mut self, gate: AuthorizationGate) -> Self {
        self.gate = gate;
        self
    }
}

impl GateContext for MockRequest {
    fn gate(&self) -> &AuthorizationGate {
        &self.gate
    }
}
