/*!
Role-based access resolution.

The tables here are the single source of truth for which modules a role
can see and which views show mutating controls. Views consult this module
instead of re-checking roles ad hoc, so a permission change happens in
exactly one place.

Navigation visibility and content rendering are deliberately two separate
rules: an Admin has navigation entries for some modules (in one menu
variant) whose content is still guarded off. Do not merge
[`visible_modules`] and [`content_module`] into one check.
*/
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::user::Role;

/// The named functional areas of the dashboard, in canonical
/// declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleId {
    Dashboard,
    Students,
    Attendance,
    Academics,
    Exams,
    Fees,
    Transport,
    Hostel,
    Notices,
    Reports,
}

pub const ALL_MODULES: [ModuleId; 10] = [
    ModuleId::Dashboard,
    ModuleId::Students,
    ModuleId::Attendance,
    ModuleId::Academics,
    ModuleId::Exams,
    ModuleId::Fees,
    ModuleId::Transport,
    ModuleId::Hostel,
    ModuleId::Notices,
    ModuleId::Reports,
];

impl ModuleId {
    /// The lowercase token used in URLs and navigation ids.
    pub fn token(&self) -> &'static str {
        match self {
            ModuleId::Dashboard  => "dashboard",
            ModuleId::Students   => "students",
            ModuleId::Attendance => "attendance",
            ModuleId::Academics  => "academics",
            ModuleId::Exams      => "exams",
            ModuleId::Fees       => "fees",
            ModuleId::Transport  => "transport",
            ModuleId::Hostel     => "hostel",
            ModuleId::Notices    => "notices",
            ModuleId::Reports    => "reports",
        }
    }

    /// The human-facing menu label.
    pub fn label(&self) -> &'static str {
        match self {
            ModuleId::Dashboard  => "Dashboard",
            ModuleId::Students   => "Students",
            ModuleId::Attendance => "Attendance",
            ModuleId::Academics  => "Academics",
            ModuleId::Exams      => "Examinations",
            ModuleId::Fees       => "Fee Management",
            ModuleId::Transport  => "Transport",
            ModuleId::Hostel     => "Hostel",
            ModuleId::Notices    => "Notice Board",
            ModuleId::Reports    => "Reports",
        }
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl std::str::FromStr for ModuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for module in ALL_MODULES.iter() {
            if module.token() == s {
                return Ok(*module);
            }
        }
        Err(format!("{:?} is not a valid module.", s))
    }
}

const ALL: &[Role] = &[Role::Admin, Role::Teacher, Role::Student, Role::Parent];

/// Which roles see each module in navigation. Declaration order here is
/// the canonical menu order.
static NAV_TABLE: &[(ModuleId, &[Role])] = &[
    (ModuleId::Dashboard,  ALL),
    (ModuleId::Students,   &[Role::Admin, Role::Teacher]),
    (ModuleId::Attendance, &[Role::Teacher, Role::Student, Role::Parent]),
    (ModuleId::Academics,  &[Role::Teacher, Role::Student, Role::Parent]),
    (ModuleId::Exams,      &[Role::Teacher, Role::Student, Role::Parent]),
    (ModuleId::Fees,       &[Role::Admin, Role::Student, Role::Parent]),
    (ModuleId::Transport,  &[Role::Admin, Role::Student, Role::Parent]),
    (ModuleId::Hostel,     &[Role::Admin, Role::Student, Role::Parent]),
    (ModuleId::Notices,    ALL),
    (ModuleId::Reports,    &[Role::Admin, Role::Teacher]),
];

/// Which roles get mutating controls (add/edit buttons, restricted tabs)
/// within each module's view. Reports is view-only; the Dashboard has no
/// affordances at all.
static MUTATE_TABLE: &[(ModuleId, &[Role])] = &[
    (ModuleId::Dashboard,  &[]),
    (ModuleId::Students,   &[Role::Admin]),
    (ModuleId::Attendance, &[Role::Admin, Role::Teacher]),
    (ModuleId::Academics,  &[Role::Admin, Role::Teacher]),
    (ModuleId::Exams,      &[Role::Admin, Role::Teacher]),
    (ModuleId::Fees,       &[Role::Admin]),
    (ModuleId::Transport,  &[Role::Admin]),
    (ModuleId::Hostel,     &[Role::Admin]),
    (ModuleId::Notices,    &[Role::Admin, Role::Teacher]),
    (ModuleId::Reports,    &[]),
];

/// Modules whose content an Admin may not open even where navigation
/// would offer them; requests land on the Dashboard instead.
static ADMIN_CONTENT_BLOCKED: &[ModuleId] =
    &[ModuleId::Attendance, ModuleId::Academics, ModuleId::Exams];

/// The modules `role` sees in navigation, in canonical order. Total for
/// all four roles; every role at least gets the Dashboard.
pub fn visible_modules(role: Role) -> SmallVec<[ModuleId; 10]> {
    NAV_TABLE.iter()
        .filter(|(_, roles)| roles.contains(&role))
        .map(|(module, _)| *module)
        .collect()
}

/// Whether `role` gets mutating controls inside `module`'s view.
pub fn can_mutate(role: Role, module: ModuleId) -> bool {
    MUTATE_TABLE.iter()
        .find(|(m, _)| *m == module)
        .map(|(_, roles)| roles.contains(&role))
        .unwrap_or(false)
}

/// The landing module. Every role starts on the Dashboard, which renders
/// role-specific content of its own.
pub fn default_module(_role: Role) -> ModuleId {
    ModuleId::Dashboard
}

/// Which module's content actually renders when `role` requests
/// `requested`. This is the content-side guard, independent of the
/// navigation table above.
pub fn content_module(role: Role, requested: ModuleId) -> ModuleId {
    if role == Role::Admin && ADMIN_CONTENT_BLOCKED.contains(&requested) {
        log::trace!(
            "Admin request for {} guarded off; rendering dashboard.",
            &requested
        );
        return ModuleId::Dashboard;
    }
    requested
}

/*
Fail-safe-closed boundary helpers over raw role tokens, for callers that
have not yet parsed a `Role`. An unrecognized token yields an empty
navigation but still a Dashboard default.
*/

pub fn navigation_for(role_token: &str) -> SmallVec<[ModuleId; 10]> {
    match role_token.parse::<Role>() {
        Ok(role) => visible_modules(role),
        Err(e) => {
            log::warn!("navigation_for: {}; returning empty navigation.", &e);
            SmallVec::new()
        },
    }
}

pub fn default_module_for(role_token: &str) -> ModuleId {
    match role_token.parse::<Role>() {
        Ok(role) => default_module(role),
        Err(_) => ModuleId::Dashboard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ensure_logging;
    use crate::user::ALL_ROLES;

    #[test]
    fn tables_cover_every_module() {
        ensure_logging();
        for module in ALL_MODULES.iter() {
            assert!(NAV_TABLE.iter().any(|(m, _)| m == module));
            assert!(MUTATE_TABLE.iter().any(|(m, _)| m == module));
        }
        assert_eq!(NAV_TABLE.len(), ALL_MODULES.len());
        assert_eq!(MUTATE_TABLE.len(), ALL_MODULES.len());
    }

    #[test]
    fn every_role_sees_the_dashboard() {
        ensure_logging();
        for role in ALL_ROLES.iter() {
            let visible = visible_modules(*role);
            assert!(!visible.is_empty());
            assert_eq!(visible[0], ModuleId::Dashboard);
            assert_eq!(default_module(*role), ModuleId::Dashboard);
        }
    }

    #[test]
    fn visible_modules_preserve_canonical_order() {
        ensure_logging();
        for role in ALL_ROLES.iter() {
            let visible = visible_modules(*role);
            let mut positions = visible.iter().map(|m| {
                ALL_MODULES.iter().position(|x| x == m).unwrap()
            });
            let mut prev = positions.next().unwrap();
            for pos in positions {
                assert!(pos > prev);
                prev = pos;
            }
        }
    }

    #[test]
    fn teacher_navigation_matches_the_table() {
        ensure_logging();
        let visible = visible_modules(Role::Teacher);
        for m in [
            ModuleId::Students, ModuleId::Attendance, ModuleId::Academics,
            ModuleId::Exams, ModuleId::Reports,
        ] {
            assert!(visible.contains(&m));
        }
        for m in [ModuleId::Fees, ModuleId::Transport, ModuleId::Hostel] {
            assert!(!visible.contains(&m));
        }
    }

    #[test]
    fn unrecognized_role_fails_closed() {
        ensure_logging();
        assert!(navigation_for("superadmin").is_empty());
        assert_eq!(default_module_for("superadmin"), ModuleId::Dashboard);
    }

    #[test]
    fn admin_content_guard_redirects_to_dashboard() {
        ensure_logging();
        for m in [ModuleId::Attendance, ModuleId::Academics, ModuleId::Exams] {
            assert_eq!(content_module(Role::Admin, m), ModuleId::Dashboard);
        }
        // The guard only binds Admin, and only those three modules.
        assert_eq!(content_module(Role::Admin, ModuleId::Fees), ModuleId::Fees);
        assert_eq!(
            content_module(Role::Teacher, ModuleId::Attendance),
            ModuleId::Attendance
        );
    }

    #[test]
    fn mutation_affordances_per_module() {
        ensure_logging();
        assert!(can_mutate(Role::Admin, ModuleId::Students));
        assert!(!can_mutate(Role::Teacher, ModuleId::Students));
        assert!(can_mutate(Role::Teacher, ModuleId::Academics));
        assert!(can_mutate(Role::Teacher, ModuleId::Notices));
        assert!(can_mutate(Role::Admin, ModuleId::Hostel));
        assert!(!can_mutate(Role::Teacher, ModuleId::Fees));
        for role in ALL_ROLES.iter() {
            assert!(!can_mutate(*role, ModuleId::Dashboard));
            assert!(!can_mutate(*role, ModuleId::Reports));
        }
        // Students and parents never see mutating controls anywhere.
        for role in [Role::Student, Role::Parent] {
            for module in ALL_MODULES.iter() {
                assert!(!can_mutate(role, *module));
            }
        }
    }

    #[test]
    fn module_tokens_round_trip() {
        ensure_logging();
        for module in ALL_MODULES.iter() {
            let parsed: ModuleId = module.token().parse().unwrap();
            assert_eq!(parsed, *module);
        }
        assert!("gradebook".parse::<ModuleId>().is_err());
    }
}
