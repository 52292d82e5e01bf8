//! Transport credentials and committer identity.
//!
//! Setup is a sequence of filesystem side effects (key file, login
//! credentials file) plus environment for later git invocations. Files are
//! written once and never overwritten, so repeated setup on the same host is
//! cheap; the login credentials file is always removed first so a previous
//! run with different credentials cannot leak into this one.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::sync::LazyLock;

use regex_lite::Regex;
use vercount_protocol::SourceConfig;

use crate::error::Result;
use crate::error::StoreError;
use crate::exec::Invocation;
use crate::exec::ProcessRunner;
use crate::exec::run_checked;
use crate::layout::StoreLayout;

pub const ENCRYPTED_KEY_MESSAGE: &str = "private keys with passphrases are not supported";

/// Environment applied to every git invocation after setup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportEnv {
    vars: Vec<(String, String)>,
}

impl TransportEnv {
    fn set(&mut self, key: &str, value: impl Into<String>) {
        self.vars.retain(|(k, _)| k != key);
        self.vars.push((key.to_string(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// A git invocation carrying this environment.
    pub fn git<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::git(args).envs(self.pairs())
    }
}

/// Prepares transport credentials for `source`.
pub fn prepare_transport(
    source: &SourceConfig,
    layout: &StoreLayout,
    runner: &dyn ProcessRunner,
) -> Result<TransportEnv> {
    remove_stale_netrc(&layout.netrc)?;

    let mut env = TransportEnv::default();
    // Nothing here can answer an interactive prompt.
    env.set("GIT_TERMINAL_PROMPT", "0");
    if let Some(git_config) = &layout.git_config {
        env.set("GIT_CONFIG_GLOBAL", git_config.to_string_lossy());
    }

    if let Some(key) = source.private_key() {
        write_once(&layout.private_key, &format!("{key}\n"))
            .map_err(|e| StoreError::credential_with_source("writing private key", e))?;
        if is_private_key_encrypted(&layout.private_key, runner) {
            return Err(StoreError::credential(ENCRYPTED_KEY_MESSAGE));
        }
        env.set(
            "GIT_SSH_COMMAND",
            format!(
                "ssh -o StrictHostKeyChecking=no -i {}",
                layout.private_key.display()
            ),
        );
    }

    if let Some((user, password)) = source.login() {
        write_once(
            &layout.netrc,
            &format!("default login {user} password {password}"),
        )
        .map_err(|e| StoreError::credential_with_source("writing login credentials", e))?;
    }

    Ok(env)
}

fn remove_stale_netrc(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed stale login credentials");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::credential_with_source(
            format!("removing stale login credentials {}", path.display()),
            e,
        )),
    }
}

/// Creates `path` with owner-only permissions unless it already exists.
fn write_once(path: &Path, content: &str) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = match options.open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(()),
        Err(e) => return Err(e),
    };
    file.write_all(content.as_bytes())
}

/// A key that ssh-keygen cannot read with an empty passphrase is encrypted.
fn is_private_key_encrypted(path: &Path, runner: &dyn ProcessRunner) -> bool {
    let path = path.to_string_lossy();
    let probe = Invocation::new("ssh-keygen", ["-y", "-f", &*path, "-P", ""]);
    match run_checked(runner, &probe) {
        Ok(_) => false,
        Err(e) => {
            tracing::debug!(error = %e, "private key probe failed");
            true
        }
    }
}

/// A parsed RFC 5322 mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub name: Option<String>,
    pub address: String,
}

#[allow(clippy::expect_used)]
static ANGLE_ADDR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*(?:"((?:[^"\\]|\\.)*)"|([^<>"]*?))\s*<\s*([^<>\s@]+@[^<>\s@]+)\s*>\s*$"#,
    )
    .expect("valid mailbox regex")
});

#[allow(clippy::expect_used)]
static BARE_ADDR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*([^<>\s@",]+@[^<>\s@",]+)\s*$"#).expect("valid address regex")
});

/// Parses `Name <addr>`, `"Quoted Name" <addr>`, `<addr>` or a bare `addr`.
pub fn parse_mailbox(input: &str) -> Result<Mailbox> {
    if let Some(caps) = ANGLE_ADDR.captures(input) {
        let name = caps
            .get(1)
            .map(|m| unescape_quoted(m.as_str()))
            .or_else(|| caps.get(2).map(|m| m.as_str().trim().to_string()))
            .filter(|n| !n.is_empty());
        let address = caps
            .get(3)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        return Ok(Mailbox { name, address });
    }
    if let Some(addr) = BARE_ADDR.captures(input).and_then(|caps| caps.get(1)) {
        return Ok(Mailbox {
            name: None,
            address: addr.as_str().to_string(),
        });
    }
    Err(StoreError::config(format!(
        "git_user {input:?} is not a valid mailbox"
    )))
}

fn unescape_quoted(quoted: &str) -> String {
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Sets the commit author for subsequent commits from `git_user`.
///
/// The name is only set when the mailbox carries one; the email always is.
pub fn configure_identity(
    git_user: &str,
    env: &TransportEnv,
    runner: &dyn ProcessRunner,
) -> Result<Mailbox> {
    let mailbox = parse_mailbox(git_user)?;

    if let Some(name) = &mailbox.name {
        let set_name = env.git(["config", "--global", "user.name", name.as_str()]);
        run_checked(runner, &set_name)
            .map_err(|e| StoreError::config_with_source("setting git user.name", e))?;
    }
    let set_email = env.git(["config", "--global", "user.email", mailbox.address.as_str()]);
    run_checked(runner, &set_email)
        .map_err(|e| StoreError::config_with_source("setting git user.email", e))?;

    tracing::debug!(email = %mailbox.address, "configured committer identity");
    Ok(mailbox)
}
