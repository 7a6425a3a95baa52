//! Prelude module - commonly used test utilities.
//!
//! Use `use bitgrant_test::prelude::*;` in test modules.

// Mocks
pub use crate::{MockRecord, MockRequest};

// Fixtures
pub use crate::{
    COPY_EDIT_CAPABILITIES, POST_CAPABILITIES, TestFamilies, copy_edit_decl, post_decl,
    test_families, test_gate_with,
};

// Harness
pub use crate::{setup_test_logging, setup_test_logging_default, test_config_file};
