//! Proptest generators for property-based testing.

use std::collections::BTreeMap;

use proptest::prelude::*;

use ace_core::Identity;

/// Generate a random identity.
pub fn identity() -> impl Strategy<Value = Identity> {
    any::<[u8; 32]>().prop_map(Identity::from_bytes)
}

/// Generate a shell-style variable name.
pub fn env_name() -> impl Strategy<Value = String> {
    "[A-Z_][A-Z0-9_]{0,15}".prop_map(String::from)
}

/// Generate any value, including whitespace, quotes and control characters.
pub fn secret_value() -> impl Strategy<Value = String> {
    any::<String>()
}

/// Generate a value that stores unchanged as a bare token.
pub fn bare_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._/:@+-]{0,32}".prop_map(String::from)
}

/// Generate a set of distinct names with values.
pub fn secrets(max: usize) -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(env_name(), secret_value(), 0..=max)
}
