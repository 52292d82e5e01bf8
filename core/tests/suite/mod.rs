// Integration tests against real git repositories.
mod bump;
mod check;
mod failures;
