use serde::{Deserialize, Serialize};

/// Staff authorization category. Spellings match what the frontend sends
/// and what is stored in users.role ("instructor" really is lowercase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "COUNSELLOR")]
    Counsellor,
    #[serde(rename = "ACCOUNTS")]
    Accounts,
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "instructor")]
    Instructor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Counsellor => "COUNSELLOR",
            Role::Accounts => "ACCOUNTS",
            Role::Hr => "HR",
            Role::Instructor => "instructor",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "COUNSELLOR" => Ok(Role::Counsellor),
            "ACCOUNTS" => Ok(Role::Accounts),
            "HR" => Ok(Role::Hr),
            "instructor" => Ok(Role::Instructor),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl std::fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}
