//! Working copy synchronization.
//!
//! The working copy is a cache: cloned the first time, then fetched and hard
//! reset to the remote tip before every read or write. Local commits left
//! behind by a losing publish attempt are discarded here.

use std::path::Path;

use crate::auth::TransportEnv;
use crate::error::Result;
use crate::error::StoreError;
use crate::exec::ProcessRunner;
use crate::exec::run_checked;

/// Where and what to synchronize.
#[derive(Debug, Clone, Copy)]
pub struct SyncTarget<'a> {
    pub working_copy: &'a Path,
    pub uri: &'a str,
    pub branch: &'a str,
    pub depth: Option<u32>,
}

/// Brings `target.working_copy` to the tip of `origin/<branch>`.
pub fn sync_working_copy(
    target: SyncTarget<'_>,
    env: &TransportEnv,
    runner: &dyn ProcessRunner,
) -> Result<()> {
    let SyncTarget {
        working_copy,
        uri,
        branch,
        depth,
    } = target;

    if working_copy.exists() {
        let fetch = env
            .git(["fetch", "origin", branch])
            .current_dir(working_copy);
        run_checked(runner, &fetch).map_err(|e| {
            StoreError::sync_with_source(format!("fetching {branch} from origin"), e)
        })?;
    } else {
        let mut clone = env.git(["clone", uri, "--branch", branch]);
        if let Some(depth) = depth {
            clone = clone.arg("--depth").arg(depth.to_string());
        }
        let clone = clone
            .arg("--single-branch")
            .arg(working_copy.to_string_lossy());
        run_checked(runner, &clone)
            .map_err(|e| StoreError::sync_with_source(format!("cloning {uri}"), e))?;
        tracing::info!(uri, branch, path = %working_copy.display(), "cloned working copy");
    }

    let remote_ref = format!("origin/{branch}");
    let reset = env
        .git(["reset", "--hard", remote_ref.as_str()])
        .current_dir(working_copy);
    run_checked(runner, &reset)
        .map_err(|e| StoreError::sync_with_source(format!("resetting to {remote_ref}"), e))?;

    Ok(())
}
