//! Unique test data built on ULIDs so parallel tests never share a user.

use ulid::Ulid;

/// Generate a unique string with the given prefix.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("user");
/// let id2 = unique_str("user");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("user-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a stable-looking user identifier for a named test player.
///
/// ```
/// use backend_test_support::unique_helpers::unique_user_id;
///
/// let alice = unique_user_id("alice");
/// assert!(alice.starts_with("alice-"));
/// assert_ne!(alice, unique_user_id("alice"));
/// ```
pub fn unique_user_id(name: &str) -> String {
    unique_str(&name.to_lowercase())
}
