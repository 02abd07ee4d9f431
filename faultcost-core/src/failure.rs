// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Simulated business failure values.
//!
//! A failure either gets built fresh on every failing trial (one heap
//! allocation for its message) or comes from the process-wide singleton,
//! which is built once and only ever handed out by shared reference.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Message carried by every simulated failure.
pub const FAILURE_MESSAGE: &str = "Business logic failed";

static SINGLETON: LazyLock<BusinessFailure> = LazyLock::new(BusinessFailure::new);

/// A simulated business failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessFailure {
    message: String,
}

impl BusinessFailure {
    /// Build a fresh failure. Allocates its message.
    pub fn new() -> Self {
        Self {
            message: FAILURE_MESSAGE.to_owned(),
        }
    }

    /// The process-wide shared failure.
    pub fn singleton() -> &'static BusinessFailure {
        &SINGLETON
    }

    /// Whether this is the shared instance (identity, not equality).
    pub fn is_singleton(&self) -> bool {
        std::ptr::eq(self, Self::singleton())
    }

    /// Failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for BusinessFailure {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BusinessFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BusinessFailure {}

/// Failure payload of the tagged result: owned when fresh, borrowed when
/// it is the singleton.
pub type Failure = Cow<'static, BusinessFailure>;

/// Serializable handle to the singleton failure.
///
/// Deserializing yields the same `&'static` instance rather than a copy, and
/// rejects payloads that do not describe the singleton.
#[derive(Debug, Clone, Copy)]
pub struct SharedFailure(&'static BusinessFailure);

impl SharedFailure {
    /// Handle to the singleton.
    pub fn get() -> Self {
        Self(BusinessFailure::singleton())
    }

    /// The shared instance behind the handle.
    pub fn failure(self) -> &'static BusinessFailure {
        self.0
    }
}

impl PartialEq for SharedFailure {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for SharedFailure {}

impl std::ops::Deref for SharedFailure {
    type Target = BusinessFailure;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl From<SharedFailure> for Failure {
    fn from(shared: SharedFailure) -> Self {
        Cow::Borrowed(shared.0)
    }
}

impl Serialize for SharedFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SharedFailure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BusinessFailure::deserialize(deserializer)?;
        let shared = BusinessFailure::singleton();
        if raw != *shared {
            return Err(D::Error::custom(format!(
                "not the shared failure: message {:?}",
                raw.message
            )));
        }
        Ok(Self(shared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_identity() {
        let a = BusinessFailure::singleton();
        let b = BusinessFailure::singleton();
        assert!(std::ptr::eq(a, b));
        assert!(a.is_singleton());
    }

    #[test]
    fn test_fresh_is_equal_but_not_identical() {
        let fresh = BusinessFailure::new();
        assert_eq!(&fresh, BusinessFailure::singleton());
        assert!(!fresh.is_singleton());
        assert_eq!(fresh.message(), FAILURE_MESSAGE);
    }

    #[test]
    fn test_shared_failure_deserializes_to_same_instance() {
        let json = serde_json::to_string(&SharedFailure::get()).unwrap();
        let restored: SharedFailure = serde_json::from_str(&json).unwrap();

        assert!(std::ptr::eq(restored.failure(), BusinessFailure::singleton()));
        assert_eq!(restored, SharedFailure::get());
    }

    #[test]
    fn test_shared_failure_rejects_foreign_message() {
        let result: Result<SharedFailure, _> =
            serde_json::from_str(r#"{"message":"something else"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_fresh_failure_roundtrip_is_owned() {
        let json = serde_json::to_string(&BusinessFailure::new()).unwrap();
        let restored: BusinessFailure = serde_json::from_str(&json).unwrap();
        assert!(!restored.is_singleton());
        assert_eq!(restored.message(), FAILURE_MESSAGE);
    }

    #[test]
    fn test_failure_cow_variants() {
        let owned: Failure = Cow::Owned(BusinessFailure::new());
        let shared: Failure = SharedFailure::get().into();
        assert!(matches!(owned, Cow::Owned(_)));
        assert!(matches!(shared, Cow::Borrowed(_)));
        assert!(shared.is_singleton());
    }
}
