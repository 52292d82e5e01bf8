//! Counter stored as a file on a branch of a git repository.

use std::path::Path;
use std::sync::Arc;

use vercount_protocol::SourceConfig;

use crate::auth::TransportEnv;
use crate::auth::configure_identity;
use crate::auth::prepare_transport;
use crate::driver::VersionDriver;
use crate::error::Result;
use crate::exec::ProcessRunner;
use crate::layout::StoreLayout;
use crate::publish::PublishOutcome;
use crate::publish::PublishTarget;
use crate::publish::commit_and_publish;
use crate::sync::SyncTarget;
use crate::sync::sync_working_copy;
use crate::version::VersionNumber;
use crate::version::is_at_or_after;
use crate::version::read_version;

pub struct GitDriver {
    source: SourceConfig,
    initial_version: VersionNumber,
    layout: StoreLayout,
    runner: Arc<dyn ProcessRunner>,
}

impl GitDriver {
    pub fn new(
        source: SourceConfig,
        initial_version: VersionNumber,
        layout: StoreLayout,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            source,
            initial_version,
            layout,
            runner,
        }
    }

    fn sync_target(&self) -> SyncTarget<'_> {
        SyncTarget {
            working_copy: &self.layout.working_copy,
            uri: &self.source.uri,
            branch: &self.source.branch,
            depth: self.source.depth(),
        }
    }

    fn publish_target(&self) -> PublishTarget<'_> {
        PublishTarget {
            working_copy: &self.layout.working_copy,
            branch: &self.source.branch,
            file: &self.source.file,
            commit_message: self.source.commit_message(),
        }
    }

    fn current_or_initial(&self, working_copy: &Path) -> Result<VersionNumber> {
        Ok(read_version(working_copy, &self.source.file)?.unwrap_or(self.initial_version))
    }

    /// Transport plus committer identity, for the mutating operations.
    fn prepare_writer(&self) -> Result<TransportEnv> {
        let env = prepare_transport(&self.source, &self.layout, self.runner.as_ref())?;
        if let Some(git_user) = self.source.git_user() {
            configure_identity(git_user, &env, self.runner.as_ref())?;
        }
        Ok(env)
    }

    /// Sync, compute, publish; repeated from a fresh tip after every lost
    /// race. There is no attempt limit.
    fn publish_until_accepted<F>(&self, env: &TransportEnv, mut next: F) -> Result<VersionNumber>
    where
        F: FnMut(&Path) -> Result<VersionNumber>,
    {
        let runner = self.runner.as_ref();
        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            sync_working_copy(self.sync_target(), env, runner)?;
            let target = next(&self.layout.working_copy)?;
            match commit_and_publish(self.publish_target(), target, env, runner)? {
                PublishOutcome::Published => return Ok(target),
                PublishOutcome::SoftConflict { reason } => {
                    tracing::info!(
                        attempt,
                        %target,
                        %reason,
                        "publish lost a race, retrying from the new tip"
                    );
                }
            }
        }
    }
}

impl VersionDriver for GitDriver {
    fn bump(&self) -> Result<VersionNumber> {
        let env = self.prepare_writer()?;
        let version = self.publish_until_accepted(&env, |working_copy| {
            self.current_or_initial(working_copy)?.bumped()
        })?;
        tracing::info!(%version, file = %self.source.file, "bumped version");
        Ok(version)
    }

    fn set(&self, version: &str) -> Result<VersionNumber> {
        let version: VersionNumber = version.parse()?;
        let env = self.prepare_writer()?;
        let version = self.publish_until_accepted(&env, |_| Ok(version))?;
        tracing::info!(%version, file = %self.source.file, "set version");
        Ok(version)
    }

    fn check(&self, cursor: Option<&str>) -> Result<Vec<VersionNumber>> {
        let env = prepare_transport(&self.source, &self.layout, self.runner.as_ref())?;
        sync_working_copy(self.sync_target(), &env, self.runner.as_ref())?;

        let Some(current) = read_version(&self.layout.working_copy, &self.source.file)? else {
            tracing::info!(file = %self.source.file, "version file absent, reporting initial version");
            return Ok(vec![self.initial_version]);
        };

        let cursor = match cursor.filter(|c| !c.is_empty()) {
            Some(cursor) => cursor.parse()?,
            None => self.initial_version,
        };
        if is_at_or_after(current, cursor) {
            Ok(vec![current])
        } else {
            Ok(Vec::new())
        }
    }
}
