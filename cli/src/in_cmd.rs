use std::io::Read;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use vercount_core::VersionNumber;
use vercount_protocol::InRequest;
use vercount_protocol::InResponse;
use vercount_protocol::number_metadata;

use crate::read_request;
use crate::write_response;

/// Files written into the destination, both holding the same number.
const NUMBER_FILES: [&str; 2] = ["number", "version"];

#[derive(Debug, Args)]
pub struct InArgs {
    /// Directory to write the version files into; created if missing.
    pub destination: PathBuf,
}

/// Materializes the requested version. Never touches the store: a bump here
/// is arithmetic on the requested number only.
pub fn run(args: InArgs, stdin: impl Read, stdout: impl Write) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.destination).context("creating destination")?;

    let request: InRequest = read_request(stdin)?;
    let mut number = request.version.number.clone();
    if request.params.bump {
        let requested: VersionNumber = number.parse().context("converting version to int")?;
        number = requested
            .bumped()
            .context("converting version to int")?
            .to_string();
    }

    for name in NUMBER_FILES {
        std::fs::write(args.destination.join(name), &number).context("writing number file")?;
    }

    let metadata = number_metadata(&request.version.number);
    write_response(
        stdout,
        &InResponse {
            version: request.version,
            metadata,
        },
    )
}
