//! The version store contract and the factory that picks a backend for a
//! source configuration.

use std::str::FromStr;
use std::sync::Arc;

use vercount_protocol::DriverKind;
use vercount_protocol::SourceConfig;

use crate::error::Result;
use crate::error::StoreError;
use crate::exec::ProcessRunner;
use crate::git_driver::GitDriver;
use crate::layout::StoreLayout;
use crate::version::VersionNumber;

/// A monotonically increasing counter kept in a shared remote store.
pub trait VersionDriver: Send + Sync {
    /// Increments the stored value and returns the value this caller
    /// published. Retries until it wins a publish race.
    fn bump(&self) -> Result<VersionNumber>;

    /// Publishes `version` verbatim (after validation) and returns its
    /// canonical form.
    fn set(&self, version: &str) -> Result<VersionNumber>;

    /// Versions at or after `cursor` that currently exist; at most one.
    ///
    /// An absent or empty cursor means the initial version.
    fn check(&self, cursor: Option<&str>) -> Result<Vec<VersionNumber>>;
}

/// Builds the driver `source` asks for.
pub fn driver_from_source(
    source: &SourceConfig,
    layout: StoreLayout,
    runner: Arc<dyn ProcessRunner>,
) -> Result<Box<dyn VersionDriver>> {
    let kind = source
        .driver()
        .ok_or_else(|| StoreError::config("driver is empty"))?;
    let kind = DriverKind::from_str(kind)
        .map_err(|_| StoreError::config(format!("unknown driver: {kind}")))?;

    let initial_version: VersionNumber =
        source.initial_version().parse().map_err(|e| match e {
            StoreError::Format { message, source } => StoreError::Config {
                message: format!("initial_version: {message}"),
                source,
            },
            other => other,
        })?;

    match kind {
        DriverKind::Git => Ok(Box::new(GitDriver::new(
            source.clone(),
            initial_version,
            layout,
            runner,
        ))),
    }
}
