/*!
Persistent session storage.

The session lives in a single JSON file whose shape is

```json
{
    "user": {
        "id": "teacher1",
        "name": "Prof. Michael Chen",
        "email": "mchen@university.edu",
        "role": "teacher"
    },
    "timestamp": 1700000000000
}
```

where `timestamp` is the creation time in epoch milliseconds. A record is
only honored while it is younger than [`SESSION_TIMEOUT_MS`] and its
embedded user passes shape validation; anything else is treated as "no
session" and the file is deleted so the same garbage is never re-validated.

[`SessionStore::load`] never fails across its public boundary: every
read, parse, or validation problem collapses to `None`.
*/
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::user::{Role, User, UserMeta};

/// Sessions older than this many milliseconds are dead. The comparison is
/// strict, so a record aged exactly this much is still accepted.
pub const SESSION_TIMEOUT_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, PartialEq)]
pub struct SessionError(String);

impl SessionError {
    /// Prepend some contextual `annotation` for the error.
    fn annotate(self, annotation: &str) -> Self {
        let s = format!("{}: {}", annotation, &self.0);
        Self(s)
    }

    pub fn display(&self) -> &str { &self.0 }
}

impl From<std::io::Error> for SessionError {
    fn from(e: std::io::Error) -> SessionError {
        SessionError(format!("{}", &e))
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(e: serde_json::Error) -> SessionError {
        SessionError(format!("{}", &e))
    }
}

/// Why a stored record was refused. The caller of [`SessionStore::load`]
/// never sees this; it exists so the log says which step rejected the
/// record before it gets purged.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Rejection {
    Unparseable,
    NoTimestamp,
    Expired,
    NoUser,
    EmptyField(&'static str),
    BadRole,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Rejection::Unparseable => write!(f, "record not parseable"),
            Rejection::NoTimestamp => write!(f, "record has no timestamp"),
            Rejection::Expired => write!(f, "session expired"),
            Rejection::NoUser => write!(f, "record has no user"),
            Rejection::EmptyField(field) => write!(f, "user has empty {:?} field", field),
            Rejection::BadRole => write!(f, "user role not in the closed role set"),
        }
    }
}

/*
The stored record is read into these loose shapes first so that each step
of the validation algorithm gets its own rejection, rather than letting
a strict deserialization lump everything into one parse error.
*/

#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    user: Option<RawUser>,
    #[serde(default)]
    timestamp: Option<i64>,
}

#[derive(Deserialize)]
struct RawUser {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    metadata: Option<UserMeta>,
}

#[derive(Serialize)]
struct RecordOut<'a> {
    user: &'a User,
    timestamp: i64,
}

fn nonempty(value: Option<String>, field: &'static str) -> Result<String, Rejection> {
    match value {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(Rejection::EmptyField(field)),
    }
}

/**
The validation algorithm over a raw stored record, in order:

1. reject if the text is not parseable as a structured record;
2. reject if `timestamp` is absent or `now - timestamp` exceeds the
   timeout (strictly; the 24-hour boundary itself is accepted);
3. reject if `user` is absent or any of id, name, email, role is
   missing or empty;
4. reject if the role token is outside the closed role set;
5. otherwise accept and hand back the `User`.
*/
fn validate(raw: &str, now_ms: i64) -> Result<User, Rejection> {
    let record: RawRecord = serde_json::from_str(raw)
        .map_err(|_| Rejection::Unparseable)?;

    let timestamp = record.timestamp.ok_or(Rejection::NoTimestamp)?;
    if now_ms - timestamp > SESSION_TIMEOUT_MS {
        return Err(Rejection::Expired);
    }

    let raw_user = record.user.ok_or(Rejection::NoUser)?;
    let id = nonempty(raw_user.id, "id")?;
    let name = nonempty(raw_user.name, "name")?;
    let email = nonempty(raw_user.email, "email")?;
    let role_token = nonempty(raw_user.role, "role")?;
    let role: Role = role_token.parse().map_err(|_| Rejection::BadRole)?;

    Ok(User {
        id,
        name,
        email,
        role,
        avatar: raw_user.avatar,
        metadata: raw_user.metadata,
    })
}

/// Owns the on-disk session file. One store, one file, one logical
/// session at a time.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        log::trace!("SessionStore::new( {:?} ) called.", path.as_ref());

        Self { path: path.as_ref().to_owned() }
    }

    pub fn path(&self) -> &Path { &self.path }

    fn now_ms() -> i64 {
        (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
    }

    /**
    Read and validate the stored session, returning the embedded `User`
    if there is one worth honoring.

    All failure modes (no file, unreadable file, unparseable or stale or
    malformed record) come back as `None`; an invalid record is deleted
    on detection so it is never re-validated on the next start.
    */
    pub fn load(&self) -> Option<User> {
        log::trace!("SessionStore::load() called on {}.", self.path.display());

        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::trace!("    ...no stored session.");
                return None;
            },
            Err(e) => {
                log::error!(
                    "Error reading session file {}: {}",
                    self.path.display(), &e
                );
                self.clear();
                return None;
            },
        };

        match validate(&raw, Self::now_ms()) {
            Ok(user) => {
                log::trace!(
                    "    ...recovered session for {:?} ({}).",
                    &user.name, &user.role
                );
                Some(user)
            },
            Err(why) => {
                log::info!("Rejecting stored session ({}); purging.", &why);
                self.clear();
                None
            },
        }
    }

    /**
    Wrap `user` in a freshly-timestamped record and write it out,
    overwriting any prior record.

    A write failure is the caller's to report as a non-fatal warning; the
    in-memory user stays authoritative for the current run either way.
    */
    pub fn save(&self, user: &User) -> Result<(), SessionError> {
        log::trace!("SessionStore::save( {:?} ) called.", &user.id);

        let record = RecordOut { user, timestamp: Self::now_ms() };
        let text = serde_json::to_string(&record)
            .map_err(|e| SessionError::from(e)
                .annotate("Error serializing session record"))?;

        std::fs::write(&self.path, text)
            .map_err(|e| SessionError::from(e)
                .annotate("Error writing session file"))
    }

    /// Delete the stored record unconditionally. Idempotent; a missing
    /// file is the desired end state, and any other failure is logged
    /// but never surfaced, because logout must always succeed.
    pub fn clear(&self) {
        log::trace!("SessionStore::clear() called on {}.", self.path.display());

        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                log::error!(
                    "Error clearing session file {}: {}",
                    self.path.display(), &e
                );
            }
        }
    }
}
