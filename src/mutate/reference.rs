//! Berglas reference detection
//!
//! A container opts into injection implicitly, by carrying at least one
//! environment variable whose value is a berglas reference. The reference
//! grammar belongs to berglas itself; the webhook only needs the prefix
//! check. A malformed or unrelated string is simply not a reference.

use k8s_openapi::api::core::v1::EnvVar;

use crate::BERGLAS_REFERENCE_PREFIX;

/// Check whether a single value looks like a berglas reference
pub fn is_reference(value: &str) -> bool {
    value.starts_with(BERGLAS_REFERENCE_PREFIX)
}

/// Check whether any environment variable carries a berglas reference
///
/// Only literal values are inspected. Variables sourced from `valueFrom`
/// have no value at admission time and cannot be references.
pub fn has_berglas_references(env: &[EnvVar]) -> bool {
    env.iter()
        .any(|e| e.value.as_deref().is_some_and(is_reference))
}
