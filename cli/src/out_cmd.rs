use std::io::Read;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use thiserror::Error;
use vercount_protocol::OutRequest;
use vercount_protocol::OutResponse;

use crate::DriverFactory;
use crate::read_request;
use crate::write_response;

#[derive(Debug, Args)]
pub struct OutArgs {
    /// Directory the `file` parameter is resolved against.
    pub source: PathBuf,
}

/// Neither `file` nor `bump` was requested.
#[derive(Debug, Error)]
#[error("no version bump specified")]
pub struct NoVersionBump;

pub fn run(
    args: OutArgs,
    stdin: impl Read,
    stdout: impl Write,
    drivers: &dyn DriverFactory,
) -> anyhow::Result<()> {
    let request: OutRequest = read_request(stdin)?;
    let driver = drivers
        .build(&request.source)
        .context("constructing driver")?;

    let version = if let Some(file) = request.params.file() {
        let content =
            std::fs::read_to_string(args.source.join(file)).context("reading version file")?;
        // Only the first whitespace-delimited token counts.
        let requested = content.split_whitespace().next().unwrap_or_default();
        driver.set(requested).context("setting version")?
    } else if request.params.bump {
        driver.bump().context("bumping version")?
    } else {
        return Err(NoVersionBump.into());
    };

    write_response(stdout, &OutResponse::for_number(&version.to_string()))
}
