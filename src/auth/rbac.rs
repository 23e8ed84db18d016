//! Scopes and built-in roles

use std::fmt;

use serde::{Deserialize, Serialize};

/// Permission a role can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Read information about the current user.
    Me,
    /// Read experiments.
    ReadExperiments,
    /// Add/update experiments.
    WriteExperiments,
    /// Perform all actions on experiments.
    AdminExperiments,
    /// Read observations.
    ReadObservations,
    /// Add/update observations.
    WriteObservations,
    /// Perform all actions on observations.
    AdminObservations,
    /// Perform actions as an anonymous user.
    Anonymous,
}

impl Scope {
    /// Every scope.
    pub const ALL: [Self; 8] = [
        Self::Me,
        Self::ReadExperiments,
        Self::WriteExperiments,
        Self::AdminExperiments,
        Self::ReadObservations,
        Self::WriteObservations,
        Self::AdminObservations,
        Self::Anonymous,
    ];

    /// Wire name, e.g. `read_experiments`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Me => "me",
            Self::ReadExperiments => "read_experiments",
            Self::WriteExperiments => "write_experiments",
            Self::AdminExperiments => "admin_experiments",
            Self::ReadObservations => "read_observations",
            Self::WriteObservations => "write_observations",
            Self::AdminObservations => "admin_observations",
            Self::Anonymous => "anonymous",
        }
    }

    /// Human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Me => "Read information about the current user.",
            Self::ReadExperiments => "Read experiments.",
            Self::WriteExperiments => "Add/update experiments.",
            Self::AdminExperiments => "Perform all actions on experiments.",
            Self::ReadObservations => "Read observations.",
            Self::WriteObservations => "Add/update observations.",
            Self::AdminObservations => "Perform all actions on observations.",
            Self::Anonymous => "Perform actions as an anonymous user",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the built-in administrator role.
pub const ADMIN_ROLE_NAME: &str = "admin";

/// Named bundle of scopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    name: String,
    scopes: Vec<Scope>,
}

impl Role {
    /// Create a role.
    #[must_use]
    pub fn new(name: impl Into<String>, scopes: impl IntoIterator<Item = Scope>) -> Self {
        let mut scopes: Vec<Scope> = scopes.into_iter().collect();
        scopes.sort_unstable();
        scopes.dedup();
        Self {
            name: name.into(),
            scopes,
        }
    }

    /// Every scope.
    #[must_use]
    pub fn admin() -> Self {
        Self::new(ADMIN_ROLE_NAME, Scope::ALL)
    }

    /// Day-to-day experiment staff: read and write, no admin.
    #[must_use]
    pub fn staff() -> Self {
        Self::new(
            "staff",
            [
                Scope::Me,
                Scope::ReadExperiments,
                Scope::ReadObservations,
                Scope::WriteExperiments,
                Scope::WriteObservations,
            ],
        )
    }

    /// Tasters submitting responses without an account.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new("anonymous", [Scope::Anonymous])
    }

    /// Get the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the granted scopes (sorted).
    #[must_use]
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Does the role grant `scope`?
    #[must_use]
    pub fn has_scope(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_everything() {
        let admin = Role::admin();
        assert!(Scope::ALL.iter().all(|s| admin.has_scope(*s)));
    }

    #[test]
    fn test_staff_cannot_administer() {
        let staff = Role::staff();
        assert!(staff.has_scope(Scope::WriteExperiments));
        assert!(!staff.has_scope(Scope::AdminExperiments));
        assert!(!staff.has_scope(Scope::Anonymous));
    }

    #[test]
    fn test_scope_wire_names() {
        for scope in Scope::ALL {
            let json = serde_json::to_string(&scope).unwrap();
            assert_eq!(json, format!("\"{scope}\""));
        }
    }

    #[test]
    fn test_role_scopes_are_deduplicated() {
        let role = Role::new("x", [Scope::Me, Scope::Me, Scope::Anonymous]);
        assert_eq!(role.scopes(), &[Scope::Me, Scope::Anonymous]);
    }
}
