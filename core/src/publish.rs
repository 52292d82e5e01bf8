//! Write, commit and push one candidate version.
//!
//! git's push is the only mutual exclusion between concurrent writers: a
//! push that is not a fast-forward of the remote tip is rejected, and the
//! loser learns about it from the push output. Those outcomes are
//! recognized by fixed marker strings in git's output.

use std::path::Path;

use crate::auth::TransportEnv;
use crate::error::Result;
use crate::error::StoreError;
use crate::exec::Invocation;
use crate::exec::ProcessOutput;
use crate::exec::ProcessRunner;
use crate::exec::run_checked;
use crate::version::VersionNumber;
use crate::version::write_version;

const NOTHING_TO_COMMIT: &str = "nothing to commit";
const EVERYTHING_UP_TO_DATE: &str = "Everything up-to-date";
const PUSH_REJECTED: &str = "[rejected]";
const PUSH_REMOTE_REJECTED: &str = "[remote rejected]";

pub const DEFAULT_COMMIT_MESSAGE: &str = "bump to %version%";

/// Result of a single publish attempt that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The remote branch now holds the value, or already did.
    Published,
    /// Another writer moved the remote tip first; resynchronize and retry.
    SoftConflict { reason: String },
}

/// Everything needed to publish into one working copy.
#[derive(Debug, Clone, Copy)]
pub struct PublishTarget<'a> {
    pub working_copy: &'a Path,
    pub branch: &'a str,
    pub file: &'a str,
    pub commit_message: Option<&'a str>,
}

/// Expands `%version%` and `%file%` in `template` (or the default message).
pub fn commit_message(template: Option<&str>, version: VersionNumber, file: &str) -> String {
    template
        .unwrap_or(DEFAULT_COMMIT_MESSAGE)
        .replace("%version%", &version.to_string())
        .replace("%file%", file)
}

/// Attempts to make `version` the durable remote value.
pub fn commit_and_publish(
    target: PublishTarget<'_>,
    version: VersionNumber,
    env: &TransportEnv,
    runner: &dyn ProcessRunner,
) -> Result<PublishOutcome> {
    let PublishTarget {
        working_copy,
        branch,
        file,
        commit_message: template,
    } = target;

    write_version(working_copy, file, version)?;

    let add = env.git(["add", file]).current_dir(working_copy);
    run_checked(runner, &add)
        .map_err(|e| StoreError::publish_with_source(format!("staging {file}"), e))?;

    let message = commit_message(template, version, file);
    let commit = env
        .git(["commit", "-m", message.as_str()])
        .current_dir(working_copy);
    let output = run_inspected(runner, &commit, "committing")?;
    if output.combined().contains(NOTHING_TO_COMMIT) {
        tracing::info!(%version, "version already committed upstream");
        return Ok(PublishOutcome::Published);
    }
    if !output.success() {
        return Err(StoreError::publish_with_source(
            "committing",
            output.failure(&commit),
        ));
    }

    let refspec = format!("HEAD:{branch}");
    let push = env
        .git(["push", "origin", refspec.as_str()])
        .current_dir(working_copy);
    let output = run_inspected(runner, &push, "pushing")?;
    classify_push(&output, &push)
}

fn run_inspected(
    runner: &dyn ProcessRunner,
    invocation: &Invocation,
    activity: &str,
) -> Result<ProcessOutput> {
    runner.run(invocation).map_err(|e| {
        StoreError::publish_with_source(format!("{activity}: failed to spawn `{invocation}`"), e)
    })
}

fn classify_push(output: &ProcessOutput, push: &Invocation) -> Result<PublishOutcome> {
    let combined = output.combined();
    if combined.contains(EVERYTHING_UP_TO_DATE) {
        return Ok(PublishOutcome::Published);
    }
    // "[remote rejected]" first: it is a server-side refusal (e.g. a hook),
    // "[rejected]" is a non-fast-forward.
    for marker in [PUSH_REMOTE_REJECTED, PUSH_REJECTED] {
        if combined.contains(marker) {
            return Ok(PublishOutcome::SoftConflict {
                reason: marker.trim_matches(['[', ']']).to_string(),
            });
        }
    }
    if !output.success() {
        return Err(StoreError::publish_with_source(
            "pushing",
            output.failure(push),
        ));
    }
    Ok(PublishOutcome::Published)
}
