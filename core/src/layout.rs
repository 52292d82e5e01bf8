//! Well-known filesystem locations touched by the store.
//!
//! Production wiring uses [`StoreLayout::from_env`]; tests build a layout
//! rooted in a temporary directory with [`StoreLayout::under`].

use std::path::Path;
use std::path::PathBuf;

/// Overrides the working copy location.
pub const WORKING_COPY_ENV_VAR: &str = "VERCOUNT_WORKING_COPY";
/// Overrides where the private key is written.
pub const PRIVATE_KEY_ENV_VAR: &str = "VERCOUNT_PRIVATE_KEY_PATH";
/// Overrides where login credentials are written.
pub const NETRC_ENV_VAR: &str = "VERCOUNT_NETRC_PATH";
/// Points git at a dedicated global config file.
pub const GIT_CONFIG_ENV_VAR: &str = "VERCOUNT_GIT_CONFIG";

const WORKING_COPY_DIR: &str = "vercount-git-repo";
const PRIVATE_KEY_FILE: &str = "vercount-private-key";
const NETRC_FILE: &str = ".netrc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    /// Local clone of the tracked branch; a disposable cache.
    pub working_copy: PathBuf,
    /// Where a configured private key is materialized.
    pub private_key: PathBuf,
    /// Login credentials file read by git's HTTP transport.
    pub netrc: PathBuf,
    /// Exported as `GIT_CONFIG_GLOBAL` to every git invocation when set.
    pub git_config: Option<PathBuf>,
}

impl StoreLayout {
    /// Default locations: the working copy and key under the system temp
    /// directory, credentials in the user's home.
    pub fn default_paths() -> Self {
        let tmp = std::env::temp_dir();
        let home = dirs::home_dir().unwrap_or_else(|| tmp.clone());
        Self {
            working_copy: tmp.join(WORKING_COPY_DIR),
            private_key: tmp.join(PRIVATE_KEY_FILE),
            netrc: home.join(NETRC_FILE),
            git_config: None,
        }
    }

    /// Default locations with any `VERCOUNT_*` overrides applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key).filter(|v| !v.is_empty()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<std::ffi::OsString>) -> Self {
        let defaults = Self::default_paths();
        Self {
            working_copy: lookup(WORKING_COPY_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.working_copy),
            private_key: lookup(PRIVATE_KEY_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.private_key),
            netrc: lookup(NETRC_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.netrc),
            git_config: lookup(GIT_CONFIG_ENV_VAR).map(PathBuf::from),
        }
    }

    /// Every location under `root`, including a private git config.
    pub fn under(root: &Path) -> Self {
        Self {
            working_copy: root.join(WORKING_COPY_DIR),
            private_key: root.join(PRIVATE_KEY_FILE),
            netrc: root.join(NETRC_FILE),
            git_config: Some(root.join("gitconfig")),
        }
    }
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self::default_paths()
    }
}
