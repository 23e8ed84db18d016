//! User Directory - account lifecycle, login and scope checks

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::rbac::{Role, Scope};
use super::user::{LoginPayload, NewUser, UserRecord};
use super::User;
use crate::config::TrianglerConfig;
use crate::table::{MemoryTable, Table};
use crate::{Error, Result};

/// Detail for an unknown username at login.
pub const USER_NOT_FOUND_DETAIL: &str = "User not found";
/// Detail for a disabled account at login.
pub const USER_DISABLED_DETAIL: &str = "User is disabled";
/// Detail for a wrong password at login.
pub const USER_VALIDATION_FAILED_DETAIL: &str = "Invalid username or password";

/// All user accounts.
///
/// Usernames and email addresses are unique; both are reserved atomically
/// before the row is written.
#[derive(Debug)]
pub struct UserDirectory {
    config: TrianglerConfig,
    users: MemoryTable<UserRecord>,
    usernames: DashMap<String, u64>,
    emails: DashMap<String, u64>,
}

impl UserDirectory {
    /// Create an empty directory hashing with `config`'s parameters.
    #[must_use]
    pub fn new(config: TrianglerConfig) -> Self {
        Self {
            config,
            users: MemoryTable::new(),
            usernames: DashMap::new(),
            emails: DashMap::new(),
        }
    }

    /// Number of accounts.
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn len(&self) -> Result<usize> {
        self.users.len()
    }

    /// Check if there are no accounts.
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn is_empty(&self) -> Result<bool> {
        self.users.is_empty()
    }

    /// Create an account. The email address is stored lowercased.
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyExists` if the username or email is taken.
    pub fn create_user(&self, mut new_user: NewUser) -> Result<User> {
        new_user.email = new_user.email.to_lowercase();
        let username = new_user.username.clone();
        let email = new_user.email.clone();

        // Reserve both keys, then fill in the real id.
        if !reserve(&self.usernames, &username) {
            tracing::error!(username = %username, "user already exists");
            return Err(Error::already_exists("User", username));
        }
        if !reserve(&self.emails, &email) {
            release(&self.usernames, &username);
            tracing::error!(email = %email, "email already registered");
            return Err(Error::already_exists("Email", email));
        }

        let user = match self.users.insert(new_user.into_record(&self.config)) {
            Ok(user) => user,
            Err(err) => {
                release(&self.usernames, &username);
                release(&self.emails, &email);
                tracing::error!(username = %username, error = %err, "storing user failed");
                return Err(err);
            }
        };
        self.usernames.insert(username, user.id());
        self.emails.insert(email, user.id());

        tracing::info!(id = user.id(), username = user.username(), "created user");
        Ok(user)
    }

    /// Get an account by username.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no account has that username.
    pub fn user(&self, username: &str) -> Result<User> {
        let id = self
            .usernames
            .get(username)
            .map(|id| *id)
            .ok_or_else(|| Error::not_found("User", username))?;
        self.users
            .get(id)?
            .ok_or_else(|| Error::not_found("User", username))
    }

    /// Disable an account.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no account has that username.
    pub fn disable_user(&self, username: &str) -> Result<User> {
        self.modify(username, |record| {
            record.disable();
            Ok(())
        })
    }

    /// Add the admin role to an account.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown username and
    /// `Error::Validation` if the user already is an admin.
    pub fn upgrade_to_admin(&self, username: &str) -> Result<User> {
        self.modify(username, |record| {
            if record.grant(Role::admin()) {
                Ok(())
            } else {
                Err(Error::Validation("User is already an admin".to_string()))
            }
        })
    }

    /// Verify credentials.
    ///
    /// # Errors
    ///
    /// Returns `Error::AuthenticationFailed` if the user is unknown, disabled,
    /// or the password does not match.
    pub fn authenticate(&self, login: &LoginPayload) -> Result<User> {
        let user = self.user(&login.username).map_err(|_| {
            tracing::info!(username = %login.username, "login for unknown user");
            Error::AuthenticationFailed(USER_NOT_FOUND_DETAIL.to_string())
        })?;

        if user.is_disabled() {
            return Err(Error::AuthenticationFailed(
                USER_DISABLED_DETAIL.to_string(),
            ));
        }
        if !user.validate_password(&login.password) {
            return Err(Error::AuthenticationFailed(
                USER_VALIDATION_FAILED_DETAIL.to_string(),
            ));
        }

        tracing::debug!(username = user.username(), "authenticated");
        Ok(user)
    }

    fn modify<F>(&self, username: &str, change: F) -> Result<User>
    where
        F: FnOnce(&mut UserRecord) -> Result<()>,
    {
        let id = self.user(username)?.id();
        let updated = self
            .users
            .modify(id, change)?
            .ok_or_else(|| Error::not_found("User", username))?;
        tracing::info!(id, username, "updated user");
        Ok(updated)
    }
}

/// Check that an active user holds every required scope.
///
/// # Errors
///
/// Returns `Error::AuthenticationFailed` for a disabled user and
/// `Error::AuthorizationFailed` naming the first missing scope.
pub fn authorize(user: &UserRecord, required: &[Scope]) -> Result<()> {
    if user.is_disabled() {
        return Err(Error::AuthenticationFailed("Inactive user".to_string()));
    }
    if let Some(missing) = required.iter().find(|scope| !user.has_scope(**scope)) {
        tracing::info!(username = user.username(), scope = %missing, "scope missing");
        return Err(Error::AuthorizationFailed(format!(
            "Not enough permissions (missing scope '{missing}')"
        )));
    }
    Ok(())
}

/// Id held by a unique key while its row is being written.
const UNASSIGNED: u64 = 0;

/// Reserve `key` in a unique index; returns `false` if it was already taken.
fn reserve(index: &DashMap<String, u64>, key: &str) -> bool {
    match index.entry(key.to_string()) {
        Entry::Occupied(_) => false,
        Entry::Vacant(slot) => {
            slot.insert(UNASSIGNED);
            true
        }
    }
}

/// Drop a reservation that never received a row id.
fn release(index: &DashMap<String, u64>, key: &str) {
    index.remove_if(key, |_, id| *id == UNASSIGNED);
}
