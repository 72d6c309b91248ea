//! User roles.

use serde::{Deserialize, Serialize};

/// The single authorization axis of the platform.
///
/// There is no hierarchy between roles: `admin` does not imply `volunteer`.
/// Every authorization check names the exact set of roles it accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The least-privileged role; also the fail-safe default when a stored
    /// role value is missing or unrecognized.
    #[default]
    Citizen,
    Volunteer,
    Admin,
}

impl Role {
    /// All defined roles, in ascending privilege order.
    pub const ALL: [Role; 3] = [Role::Citizen, Role::Volunteer, Role::Admin];

    pub fn parse(role: &str) -> Option<Role> {
        match role {
            "citizen" => Some(Role::Citizen),
            "volunteer" => Some(Role::Volunteer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Parses a stored role value, falling back to the least-privileged role.
    ///
    /// An absent or garbage role must never read as anything more privileged
    /// than `citizen`.
    pub fn parse_or_default(role: &str) -> Role {
        Role::parse(role).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Volunteer => "volunteer",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_all_roles() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn unknown_role_defaults_to_citizen() {
        assert_eq!(Role::parse_or_default(""), Role::Citizen);
        assert_eq!(Role::parse_or_default("superuser"), Role::Citizen);
        assert_eq!(Role::parse_or_default("ADMIN"), Role::Citizen);
    }

    #[test]
    fn serde_uses_snake_case_strings() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let parsed: Role = serde_json::from_str("\"volunteer\"").unwrap();
        assert_eq!(parsed, Role::Volunteer);
    }
}
