use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumString;

/// Initial version assumed when the source does not configure one.
pub const DEFAULT_INITIAL_VERSION: &str = "0";

/// Backing store kinds understood by the driver factory.
///
/// Only git is supported; the kind is still spelled out in every source so
/// that a misconfigured pipeline fails loudly instead of silently picking a
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DriverKind {
    Git,
}

/// Source configuration shared by the `check`, `in` and `out` requests.
///
/// Optional strings that arrive empty are treated exactly like absent ones;
/// use the accessor methods rather than the raw fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Backing kind, `"git"` being the only accepted value.
    #[serde(default)]
    pub driver: Option<String>,

    /// Version reported while the version file does not exist yet.
    #[serde(default)]
    pub initial_version: Option<String>,

    /// Repository the counter lives in.
    #[serde(default)]
    pub uri: String,

    /// Branch holding the version file.
    #[serde(default)]
    pub branch: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Path of the version file, relative to the repository root.
    #[serde(default)]
    pub file: String,

    /// Committer identity as an RFC 5322 mailbox (`Name <addr>` or `addr`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_user: Option<String>,

    /// Commit message template; `%version%` and `%file%` are substituted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,

    /// Shallow clone depth for the first clone of the working copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

impl SourceConfig {
    pub fn driver(&self) -> Option<&str> {
        non_empty(&self.driver)
    }

    /// The configured initial version, or [`DEFAULT_INITIAL_VERSION`].
    pub fn initial_version(&self) -> &str {
        non_empty(&self.initial_version).unwrap_or(DEFAULT_INITIAL_VERSION)
    }

    pub fn private_key(&self) -> Option<&str> {
        non_empty(&self.private_key)
    }

    /// Username and password, only when both are configured.
    pub fn login(&self) -> Option<(&str, &str)> {
        match (non_empty(&self.username), non_empty(&self.password)) {
            (Some(user), Some(pass)) => Some((user, pass)),
            _ => None,
        }
    }

    pub fn git_user(&self) -> Option<&str> {
        non_empty(&self.git_user)
    }

    pub fn commit_message(&self) -> Option<&str> {
        non_empty(&self.commit_message)
    }

    /// Shallow clone depth; zero means "not configured".
    pub fn depth(&self) -> Option<u32> {
        self.depth.filter(|d| *d > 0)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
