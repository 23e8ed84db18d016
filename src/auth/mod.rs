//! Accounts, roles and scopes
//!
//! Login checks credentials against salted PBKDF2-HMAC-SHA256 hashes; access
//! checks compare a user's scopes (the union of their roles) with what an
//! operation requires. Session tokens are left to the embedding web layer.
//!
//! ```rust
//! use triangler::auth::{authorize, LoginPayload, NewUser, Role, Scope, UserDirectory};
//! use triangler::config::TrianglerConfig;
//!
//! # fn example() -> triangler::Result<()> {
//! let users = UserDirectory::new(TrianglerConfig::for_tests());
//! users.create_user(NewUser::new("ada", "ada@example.com", "s3cret").with_role(Role::staff()))?;
//!
//! let ada = users.authenticate(&LoginPayload::new("ada", "s3cret"))?;
//! authorize(&ada, &[Scope::WriteExperiments])?;
//! assert!(authorize(&ada, &[Scope::AdminExperiments]).is_err());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod directory;
pub mod hashing;
mod rbac;
mod user;

pub use directory::{
    authorize, UserDirectory, USER_DISABLED_DETAIL, USER_NOT_FOUND_DETAIL,
    USER_VALIDATION_FAILED_DETAIL,
};
pub use rbac::{Role, Scope, ADMIN_ROLE_NAME};
pub use user::{LoginPayload, NewUser, UserRecord};

use crate::table::Entity;

/// A stored user account.
pub type User = Entity<UserRecord>;
