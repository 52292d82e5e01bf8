//! The `vercount` resource commands.
//!
//! Each command reads one JSON request from stdin and writes one JSON
//! response to stdout. Failures are reported as `error <activity>: <cause>`
//! on stderr; nothing is written to stdout in that case.

pub mod check_cmd;
pub mod in_cmd;
pub mod out_cmd;

use std::ffi::OsStr;
use std::ffi::OsString;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use serde::de::DeserializeOwned;
use vercount_core::StoreError;
use vercount_core::StoreLayout;
use vercount_core::SystemRunner;
use vercount_core::VersionDriver;
use vercount_core::driver_from_source;
use vercount_protocol::SourceConfig;

/// Version counter kept in a file on a git branch.
#[derive(Debug, Parser)]
#[command(name = "vercount", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report the current version if it is at or after the request's cursor
    Check(check_cmd::CheckArgs),

    /// Write the requested (optionally bumped) version into a directory
    In(in_cmd::InArgs),

    /// Publish a version read from a file, or bump the stored one
    Out(out_cmd::OutArgs),
}

const SUBCOMMAND_NAMES: [&str; 3] = ["check", "in", "out"];

/// Parses `args`, treating an executable named `check`, `in` or `out` as
/// that subcommand so one binary can be installed under all three names.
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let invoked_as = args
        .first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .and_then(OsStr::to_str)
        .filter(|name| SUBCOMMAND_NAMES.contains(name))
        .map(OsString::from);
    if let Some(subcommand) = invoked_as {
        args[0] = OsString::from("vercount");
        args.insert(1, subcommand);
    }
    Cli::try_parse_from(args)
}

/// Builds the version driver for a request's source.
pub trait DriverFactory {
    fn build(&self, source: &SourceConfig) -> vercount_core::Result<Box<dyn VersionDriver>>;
}

/// Git drivers over real processes, with paths taken from the environment.
#[derive(Debug, Default)]
pub struct EnvDriverFactory;

impl DriverFactory for EnvDriverFactory {
    fn build(&self, source: &SourceConfig) -> vercount_core::Result<Box<dyn VersionDriver>> {
        driver_from_source(source, StoreLayout::from_env(), Arc::new(SystemRunner))
    }
}

pub fn run(
    cli: Cli,
    stdin: impl Read,
    stdout: impl Write,
    drivers: &dyn DriverFactory,
) -> anyhow::Result<()> {
    match cli.command {
        Command::Check(args) => check_cmd::run(args, stdin, stdout, drivers),
        Command::In(args) => in_cmd::run(args, stdin, stdout),
        Command::Out(args) => out_cmd::run(args, stdin, stdout, drivers),
    }
}

/// Writes the diagnostic line for a failed command.
pub fn report(err: &anyhow::Error, mut stderr: impl Write) {
    if let Some(store_err) = err.chain().find_map(|e| e.downcast_ref::<StoreError>()) {
        tracing::debug!(category = store_err.category().as_str(), "command failed");
    }
    let line = if err.is::<out_cmd::NoVersionBump>() {
        err.to_string()
    } else {
        format!("error {err:#}")
    };
    let _ = writeln!(stderr, "{line}");
}

pub(crate) fn read_request<T: DeserializeOwned>(stdin: impl Read) -> anyhow::Result<T> {
    serde_json::from_reader(stdin).context("decoding request")
}

pub(crate) fn write_response<T: Serialize>(
    mut stdout: impl Write,
    response: &T,
) -> anyhow::Result<()> {
    serde_json::to_writer(&mut stdout, response).context("encoding response")?;
    writeln!(stdout).context("encoding response")?;
    Ok(())
}
