//! Root of the `vercount-core` library.

// Library code never writes to stdout/stderr directly: stdout carries the
// response document and diagnostics go through tracing.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod auth;
pub mod driver;
pub mod error;
pub mod exec;
pub mod git_driver;
pub mod layout;
pub mod publish;
pub mod sync;
pub mod version;

pub use driver::VersionDriver;
pub use driver::driver_from_source;
pub use error::ErrorCategory;
pub use error::Result;
pub use error::StoreError;
pub use exec::ProcessRunner;
pub use exec::SystemRunner;
pub use git_driver::GitDriver;
pub use layout::StoreLayout;
pub use publish::PublishOutcome;
pub use version::VersionNumber;
