//! The closed user-role enumeration and its authorization predicates.
//!
//! Roles are stored as uppercase strings in the `users.role` column and
//! parsed into [`Role`] at the authorization gate. All permission checks go
//! through the predicates here rather than comparing strings at call sites.

use std::fmt;
use std::str::FromStr;

/// User role. `Pending` is an account quarantine state, not a request status:
/// a PENDING user holds a valid token but is blocked from every protected
/// operation until an administrator promotes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Faculty,
    Ta,
    Admin,
    Pending,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 5] = [
        Role::Student,
        Role::Faculty,
        Role::Ta,
        Role::Admin,
        Role::Pending,
    ];

    /// The uppercase wire/storage form of this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Faculty => "FACULTY",
            Role::Ta => "TA",
            Role::Admin => "ADMIN",
            Role::Pending => "PENDING",
        }
    }

    /// ADMIN and TA act as inventory staff: they manage the component
    /// catalog and may drive any request through its lifecycle.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Ta)
    }

    /// Staff create, update, and delete catalog components.
    pub fn can_manage_components(self) -> bool {
        self.is_staff()
    }

    /// Quarantined accounts may not touch any protected operation.
    pub fn is_pending(self) -> bool {
        matches!(self, Role::Pending)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STUDENT" => Ok(Role::Student),
            "FACULTY" => Ok(Role::Faculty),
            "TA" => Ok(Role::Ta),
            "ADMIN" => Ok(Role::Admin),
            "PENDING" => Ok(Role::Pending),
            other => Err(format!("Unknown role '{other}'")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
