//! Decimal version codec and the version file reader/writer.

use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use crate::error::Result;
use crate::error::StoreError;

/// A counter value: a non-negative integer, decimal on the wire and on disk.
///
/// Ordering is numeric, so `"10" > "9"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionNumber(u64);

impl VersionNumber {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The next counter value.
    pub fn bumped(self) -> Result<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or_else(|| StoreError::format(format!("version {self} cannot be incremented")))
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VersionNumber {
    type Err = StoreError;

    /// Parses surrounding-whitespace-tolerant decimal digits. Signs,
    /// separators and embedded whitespace are rejected.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StoreError::format(format!(
                "{trimmed:?} is not a decimal version number"
            )));
        }
        trimmed.parse::<u64>().map(Self).map_err(|e| {
            StoreError::format_with_source(format!("{trimmed:?} is out of range"), e)
        })
    }
}

/// Reads the version file inside `working_copy`.
///
/// Returns `Ok(None)` when the file does not exist: the counter has not been
/// initialized yet, which is not an error.
pub fn read_version(working_copy: &Path, file: &str) -> Result<Option<VersionNumber>> {
    let path = working_copy.join(file);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StoreError::io(
                format!("reading version file {}", path.display()),
                e,
            ));
        }
    };

    content.parse().map(Some).map_err(|e| match e {
        StoreError::Format { message, source } => StoreError::Format {
            message: format!("version file {file}: {message}"),
            source,
        },
        other => other,
    })
}

/// Replaces the version file content with `version`, creating parent
/// directories when the file lives in a subdirectory that does not exist yet.
pub fn write_version(working_copy: &Path, file: &str, version: VersionNumber) -> Result<()> {
    let path = working_copy.join(file);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| StoreError::io(format!("creating {}", parent.display()), e))?;
    }
    std::fs::write(&path, version.to_string())
        .map_err(|e| StoreError::io(format!("writing version file {}", path.display()), e))
}

/// Whether `current` should be reported to a caller positioned at `cursor`.
///
/// The boundary is inclusive: a caller that has already seen `current` still
/// gets it back, which is how an unchanged counter reports "no newer version".
pub fn is_at_or_after(current: VersionNumber, cursor: VersionNumber) -> bool {
    current >= cursor
}
