//! User Record - account, credentials and roles

use serde::{Deserialize, Serialize};

use super::hashing::{generate_salt, hash_password};
use super::rbac::{Role, Scope, ADMIN_ROLE_NAME};
use crate::config::TrianglerConfig;

/// Account of a person operating experiments.
///
/// Stores the salted PBKDF2 hash and the round count it was made with, so
/// changing `hash_iterations` later does not lock existing users out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    username: String,
    email: String,
    hashed_password: String,
    salt: String,
    hash_iterations: u32,
    disabled: bool,
    roles: Vec<Role>,
}

impl UserRecord {
    /// Get the unique username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Get the unique email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Is the account disabled?
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Get the assigned roles.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Every scope granted by any role, sorted and deduplicated.
    #[must_use]
    pub fn scopes(&self) -> Vec<Scope> {
        let mut scopes: Vec<Scope> = self
            .roles
            .iter()
            .flat_map(|role| role.scopes().iter().copied())
            .collect();
        scopes.sort_unstable();
        scopes.dedup();
        scopes
    }

    /// Does any role grant `scope`?
    #[must_use]
    pub fn has_scope(&self, scope: Scope) -> bool {
        self.roles.iter().any(|role| role.has_scope(scope))
    }

    /// Is the user an administrator?
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|role| role.name() == ADMIN_ROLE_NAME)
    }

    /// Check `password` against the stored hash.
    #[must_use]
    pub fn validate_password(&self, password: &str) -> bool {
        !self.hashed_password.is_empty()
            && self.hashed_password == hash_password(password, &self.salt, self.hash_iterations)
    }

    /// Has a password been set?
    #[must_use]
    pub fn password_is_set(&self) -> bool {
        !self.hashed_password.is_empty()
    }

    /// Replace the password, keeping the salt.
    pub fn set_password(&mut self, password: &str) {
        self.hashed_password = hash_password(password, &self.salt, self.hash_iterations);
    }

    /// Mark the account disabled.
    pub fn disable(&mut self) {
        self.disabled = true;
    }

    /// Add a role unless one with the same name is already assigned.
    ///
    /// Returns whether the role was added.
    pub fn grant(&mut self, role: Role) -> bool {
        if self.roles.iter().any(|r| r.name() == role.name()) {
            return false;
        }
        self.roles.push(role);
        true
    }
}

/// Payload for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    /// Unique username
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Plain-text password; hashed before storage
    pub password: String,
    /// Initial roles
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl NewUser {
    /// Payload without roles.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            roles: Vec::new(),
        }
    }

    /// Add an initial role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    /// Hash the password with a fresh salt.
    #[must_use]
    pub fn into_record(self, config: &TrianglerConfig) -> UserRecord {
        let salt = generate_salt(config.salt_bytes);
        let hashed_password = hash_password(&self.password, &salt, config.hash_iterations);
        UserRecord {
            username: self.username,
            email: self.email,
            hashed_password,
            salt,
            hash_iterations: config.hash_iterations,
            disabled: false,
            roles: self.roles,
        }
    }
}

/// Credentials presented at login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginPayload {
    /// Username
    pub username: String,
    /// Plain-text password
    pub password: String,
}

impl LoginPayload {
    /// Create a login payload.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
