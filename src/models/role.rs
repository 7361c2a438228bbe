use serde::{Deserialize, Serialize};
use std::fmt;

/// Role stored on a profile document; decides which screen tree is mounted
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Trainer,
    Student,
    Unknown(String),
}

impl Role {
    /// Parse the stored value. Accepts the schema's values and their English names.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "adminmaster" | "admin" => Role::Admin,
            "entrenador" | "trainer" => Role::Trainer,
            "alumno" | "student" => Role::Student,
            _ => Role::Unknown(value.to_string()),
        }
    }

    /// Every stored spelling `from_wire` maps to this role
    pub fn wire_spellings(&self) -> Vec<&str> {
        match self {
            Role::Admin => vec!["adminmaster", "admin"],
            Role::Trainer => vec!["entrenador", "trainer"],
            Role::Student => vec!["alumno", "student"],
            Role::Unknown(raw) => vec![raw.as_str()],
        }
    }

    /// Value written to profile documents
    pub fn as_wire(&self) -> &str {
        match self {
            Role::Admin => "adminmaster",
            Role::Trainer => "entrenador",
            Role::Student => "alumno",
            Role::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::from_wire(&value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_wire().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Trainer => write!(f, "trainer"),
            Role::Student => write!(f, "student"),
            Role::Unknown(raw) if raw.is_empty() => write!(f, "unknown (missing)"),
            Role::Unknown(raw) => write!(f, "unknown ({})", raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_values() {
        assert_eq!(Role::from_wire("adminmaster"), Role::Admin);
        assert_eq!(Role::from_wire("entrenador"), Role::Trainer);
        assert_eq!(Role::from_wire(" Alumno "), Role::Student);
        assert_eq!(Role::from_wire("student"), Role::Student);
    }

    #[test]
    fn test_unknown_keeps_raw_value() {
        let role = Role::from_wire("superuser");
        assert_eq!(role, Role::Unknown("superuser".to_string()));
        assert_eq!(role.as_wire(), "superuser");
        assert_eq!(role.to_string(), "unknown (superuser)");
    }

    #[test]
    fn test_every_spelling_maps_back() {
        for role in [Role::Admin, Role::Trainer, Role::Student] {
            for spelling in role.wire_spellings() {
                assert_eq!(Role::from_wire(spelling), role);
            }
        }
    }

    #[test]
    fn test_wire_round_trip_of_known_roles() {
        for role in [Role::Admin, Role::Trainer, Role::Student] {
            assert_eq!(Role::from_wire(role.as_wire()), role);
        }
    }
}
