/*!
System principals: roles, the `User` record, and the demo roster.
*/
use serde::{Deserialize, Serialize};

/// The closed set of principal categories. Every authorization decision
/// in the system keys off one of these four values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
}

pub const ALL_ROLES: [Role; 4] = [Role::Admin, Role::Teacher, Role::Student, Role::Parent];

impl Role {
    /// The lowercase wire token, as stored in session records and used
    /// in form submissions.
    pub fn token(&self) -> &'static str {
        match self {
            Role::Admin   => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent  => "parent",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin"   => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            "parent"  => Ok(Role::Parent),
            _ => Err(format!("{:?} is not a valid role.", s)),
        }
    }
}

/// Optional structured bag riding along with a `User`. No invariants
/// beyond optionality.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMeta {
    /// Department (teachers) or grade (students).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Class section for students.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Employee or student ID.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "employeeId")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// An authenticated principal. Constructed by the login flow or recovered
/// from the session store; replaced wholesale on login, never mutated
/// field-by-field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Login identifier, also used for display.
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<UserMeta>,
}

impl User {
    /// The field a login submission is missing, if any. Login requires a
    /// non-empty id and email (the role is guaranteed by the type); the
    /// stricter name check belongs to stored-session validation only.
    pub fn missing_login_field(&self) -> Option<&'static str> {
        if self.id.is_empty() {
            Some("id")
        } else if self.email.is_empty() {
            Some("email")
        } else {
            None
        }
    }

    /// Initials for the avatar fallback shown in the sidebar.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect()
    }
}

/// The canned account behind each role's demo-login shortcut. There is no
/// password check; the login surface is a role-selection demo.
pub fn demo_user(role: Role) -> User {
    let (id, name, email) = match role {
        Role::Admin   => ("admin1",   "Dr. Sarah Johnson",  "admin@university.edu"),
        Role::Teacher => ("teacher1", "Prof. Michael Chen", "mchen@university.edu"),
        Role::Student => ("student1", "Alex Rodriguez",     "alex.rodriguez@student.edu"),
        Role::Parent  => ("parent1",  "Maria Rodriguez",    "maria.rodriguez@gmail.com"),
    };

    User {
        id: id.to_owned(),
        name: name.to_owned(),
        email: email.to_owned(),
        role,
        avatar: None,
        metadata: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ensure_logging;

    #[test]
    fn role_tokens_round_trip() {
        ensure_logging();
        for role in ALL_ROLES.iter() {
            let parsed: Role = role.token().parse().unwrap();
            assert_eq!(parsed, *role);
        }
        assert!("superadmin".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn demo_roster_is_well_formed() {
        ensure_logging();
        for role in ALL_ROLES.iter() {
            let u = demo_user(*role);
            assert_eq!(u.role, *role);
            assert!(u.missing_login_field().is_none());
            assert!(!u.name.is_empty());
        }
    }

    #[test]
    fn missing_fields_are_named() {
        ensure_logging();
        let mut u = demo_user(Role::Student);
        u.email = String::new();
        assert_eq!(u.missing_login_field(), Some("email"));
        u.id = String::new();
        assert_eq!(u.missing_login_field(), Some("id"));
    }

    #[test]
    fn initials_come_from_each_word() {
        ensure_logging();
        assert_eq!(demo_user(Role::Admin).initials(), "DSJ");
        assert_eq!(demo_user(Role::Student).initials(), "AR");
    }
}
