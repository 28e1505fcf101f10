use serde::{Deserialize, Serialize};

/// A user row
///
/// Created on manual add (local variant) or first Google login (auto-provisioned).
/// Never updated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    /// External identity-provider id (google variant only)
    pub google_id: Option<String>,
}

impl User {
    /// Validate a new user name before insertion
    pub fn validate_name(name: &str) -> bool {
        let trimmed = name.trim();
        !trimmed.is_empty() && trimmed.len() <= 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(User::validate_name("Alice"));
        assert!(User::validate_name("  Bob  "));

        // Empty or whitespace-only
        assert!(!User::validate_name(""));
        assert!(!User::validate_name("   "));

        // Too long
        assert!(!User::validate_name(&"a".repeat(101)));
    }
}
