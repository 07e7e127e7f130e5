/*!
Structs to hold configuration data and global application state.
*/
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    session::SessionStore,
    user::User,
};

#[derive(Deserialize)]
struct ConfigFile {
    session_file: Option<String>,
    template_dir: Option<String>,
    static_dir: Option<String>,
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug)]
pub struct Cfg {
    pub session_file: PathBuf,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
    pub addr: SocketAddr,
}

impl std::default::Default for Cfg {
    fn default() -> Self {
        Self {
            session_file: PathBuf::from("data/erp_user_session.json"),
            template_dir: PathBuf::from("templates"),
            static_dir: PathBuf::from("static"),
            addr: SocketAddr::new(
                "0.0.0.0".parse().unwrap(),
                8001
            ),
        }
    }
}

impl Cfg {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let file_contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Unable to read config file: {}", &e))?;
        let cf: ConfigFile = toml::from_str(&file_contents)
            .map_err(|e| format!("Unable to deserialize config file: {}", &e))?;

        let mut c = Self::default();

        if let Some(s) = cf.session_file {
            c.session_file = PathBuf::from(s);
        }
        if let Some(s) = cf.template_dir {
            c.template_dir = PathBuf::from(s);
        }
        if let Some(s) = cf.static_dir {
            c.static_dir = PathBuf::from(s);
        }
        if let Some(s) = cf.host {
            c.addr.set_ip(
                s.parse().map_err(|e| format!(
                    "Error parsing {:?} as IP address: {}",
                    &s, &e
                ))?
            );
        }
        if let Some(n) = cf.port {
            c.addr.set_port(n);
        }

        Ok(c)
    }
}

/**
This guy will haul around the global state and be passed in an
`axum::Extension` to the handlers who need him.

He is the single exclusive writer of the current-user value; login and
logout swap it wholesale, so readers never see a half-updated principal.
*/
#[derive(Debug)]
pub struct Glob {
    pub user: Option<User>,
    pub sessions: SessionStore,
    pub addr: SocketAddr,
    pub static_dir: PathBuf,
}

impl Glob {
    /**
    Accept a login with a fully-formed `User`.

    A user missing a required field is rejected before anything is
    persisted; the error string is the user-visible warning and no state
    changes. A session-store write failure is logged as a warning but
    does not fail the login: the in-memory user stays authoritative for
    the current run, the session just will not survive a restart.
    */
    pub fn log_in(&mut self, user: User) -> Result<(), String> {
        log::trace!("Glob::log_in( {:?} ) called.", &user.id);

        if let Some(field) = user.missing_login_field() {
            return Err(format!(
                "Login rejected: user record has an empty {:?} field.",
                field
            ));
        }

        if let Err(e) = self.sessions.save(&user) {
            log::warn!(
                "Session for {:?} not persisted (login will not survive a restart): {}",
                &user.id, e.display()
            );
        }

        log::info!("{} logged in as {}.", &user.name, &user.role);
        self.user = Some(user);
        Ok(())
    }

    /// Log out. Always succeeds; the stored record is cleared best-effort
    /// and the in-memory user is dropped regardless.
    pub fn log_out(&mut self) {
        log::trace!("Glob::log_out() called.");

        self.sessions.clear();
        if let Some(u) = self.user.take() {
            log::info!("{} logged out.", &u.name);
        }
    }
}

/// Builds the global state from `cfg`, recovering any prior session from
/// the session store. Recovery cannot fail; a bad or stale record just
/// means starting logged out.
pub fn load_configuration(cfg: Cfg) -> Glob {
    log::info!("Configuration:\n{:#?}", &cfg);

    let sessions = SessionStore::new(&cfg.session_file);
    let user = sessions.load();
    match &user {
        Some(u) => log::info!("Welcome back, {} ({}).", &u.name, &u.role),
        None => log::info!("No prior session; starting logged out."),
    }

    Glob {
        user,
        sessions,
        addr: cfg.addr,
        static_dir: cfg.static_dir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ensure_logging;
    use crate::user::{demo_user, Role};

    use serial_test::serial;

    fn scratch_glob() -> Glob {
        let path = std::env::temp_dir().join("edumanage_config_test.json");
        let sessions = SessionStore::new(path);
        sessions.clear();
        Glob {
            user: None,
            sessions,
            addr: Cfg::default().addr,
            static_dir: Cfg::default().static_dir,
        }
    }

    #[test]
    #[serial]
    fn login_persists_and_recovers() {
        ensure_logging();
        let mut glob = scratch_glob();

        let u = demo_user(Role::Teacher);
        glob.log_in(u.clone()).unwrap();
        assert_eq!(glob.user, Some(u.clone()));

        // A fresh load from the same store sees the session.
        assert_eq!(glob.sessions.load(), Some(u));
    }

    #[test]
    #[serial]
    fn login_missing_email_changes_nothing() {
        ensure_logging();
        let mut glob = scratch_glob();

        let mut u = demo_user(Role::Student);
        u.email = String::new();
        assert!(glob.log_in(u).is_err());
        assert_eq!(glob.user, None);
        assert_eq!(glob.sessions.load(), None);
    }

    #[test]
    #[serial]
    fn logout_clears_both_states() {
        ensure_logging();
        let mut glob = scratch_glob();

        glob.log_in(demo_user(Role::Admin)).unwrap();
        glob.log_out();
        assert_eq!(glob.user, None);
        assert_eq!(glob.sessions.load(), None);

        // Logging out again is harmless.
        glob.log_out();
    }

    #[test]
    fn default_config_is_sane() {
        ensure_logging();
        let cfg = Cfg::default();
        assert_eq!(cfg.addr.port(), 8001);
        assert!(cfg.session_file.to_str().unwrap().contains("erp_user_session"));
    }
}
