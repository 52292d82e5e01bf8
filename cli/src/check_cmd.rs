use std::io::Read;
use std::io::Write;

use anyhow::Context;
use clap::Args;
use vercount_protocol::CheckRequest;
use vercount_protocol::CheckResponse;
use vercount_protocol::Version;

use crate::DriverFactory;
use crate::read_request;
use crate::write_response;

#[derive(Debug, Args)]
pub struct CheckArgs {}

pub fn run(
    _args: CheckArgs,
    stdin: impl Read,
    stdout: impl Write,
    drivers: &dyn DriverFactory,
) -> anyhow::Result<()> {
    let request: CheckRequest = read_request(stdin)?;
    let driver = drivers
        .build(&request.source)
        .context("constructing driver")?;
    let versions = driver
        .check(request.cursor())
        .context("checking for new versions")?;

    let response: CheckResponse = versions
        .iter()
        .map(|v| Version::new(v.to_string()))
        .collect();
    write_response(stdout, &response)
}
