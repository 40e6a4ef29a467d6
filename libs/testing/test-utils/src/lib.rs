//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: PostgreSQL container with migrations applied (feature: "postgres")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let app = builder.app("main");
//!     let uri = builder.uri("/events", 1);
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// Tests sharing one database stay isolated by deriving app names and URIs
/// from the test name.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_record_hit");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Application name unique to this builder
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.app("main"), "test-app-7-main");
    /// ```
    pub fn app(&self, suffix: &str) -> String {
        format!("test-app-{}-{}", self.seed, suffix)
    }

    /// Entity URI unique to this builder, e.g. `/t12345/events/1`
    pub fn uri(&self, prefix: &str, id: i64) -> String {
        format!("{}/{}", self.uri_prefix(prefix), id)
    }

    /// The prefix [`Self::uri`] appends entity ids to
    pub fn uri_prefix(&self, prefix: &str) -> String {
        format!("/t{}{}", self.seed, prefix)
    }

    /// Deterministic IPv4 address; distinct `n` give distinct addresses
    pub fn ip(&self, n: u8) -> String {
        let bytes = self.seed.to_le_bytes();
        format!("10.{}.{}.{}", bytes[0], bytes[1], n)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that a sequence is sorted descending by `key`
    pub fn assert_sorted_desc<T, K: PartialOrd + std::fmt::Debug>(
        items: &[T],
        key: impl Fn(&T) -> K,
        context: &str,
    ) {
        for pair in items.windows(2) {
            let (a, b) = (key(&pair[0]), key(&pair[1]));
            assert!(a >= b, "{}: {:?} ordered before {:?}", context, a, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.app("main"), builder2.app("main"));
        assert_eq!(builder1.uri("/events", 1), builder2.uri("/events", 1));
        assert_eq!(builder1.ip(1), builder2.ip(1));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.app("main"), builder2.app("main"));
    }

    #[test]
    fn test_uri_extends_prefix() {
        let builder = TestDataBuilder::new(9);
        assert_eq!(builder.uri("/events", 3), "/t9/events/3");
        assert!(builder.uri("/events", 3).starts_with(&builder.uri_prefix("/events")));
    }

    #[test]
    fn test_ips_distinct_per_index() {
        let builder = TestDataBuilder::new(1);
        assert_ne!(builder.ip(1), builder.ip(2));
    }

    #[test]
    #[should_panic(expected = "ordered before")]
    fn test_assert_sorted_desc_detects_ascending() {
        assertions::assert_sorted_desc(&[1, 2], |v| *v, "numbers");
    }
}
