//! User roles.
//!
//! Roles are stored as small integers (`users.role_id`) and travel as JSON
//! numbers in the `user_role` token claim.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_REGULAR: &str = "regular";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Regular,
}

/// A role id outside the known range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown role id {0}")]
pub struct UnknownRole(pub i64);

impl Role {
    pub fn id(self) -> i16 {
        match self {
            Role::Admin => 1,
            Role::Regular => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Regular => ROLE_REGULAR,
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    /// Widen a JSON number into a role.
    ///
    /// Integral floats (`1.0`) are accepted because JSON does not distinguish
    /// them from integers; anything else is rejected.
    pub fn from_json(value: &serde_json::Value) -> Option<Role> {
        let raw = match value.as_i64() {
            Some(n) => n,
            None => {
                let f = value.as_f64()?;
                if f.fract() != 0.0 || f < i64::MIN as f64 || f > i64::MAX as f64 {
                    return None;
                }
                f as i64
            }
        };
        Role::try_from(raw).ok()
    }
}

impl TryFrom<i64> for Role {
    type Error = UnknownRole;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Role::Admin),
            2 => Ok(Role::Regular),
            other => Err(UnknownRole(other)),
        }
    }
}

impl TryFrom<i16> for Role {
    type Error = UnknownRole;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Role::try_from(i64::from(value))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
