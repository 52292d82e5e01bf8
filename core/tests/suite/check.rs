#![cfg(not(target_os = "windows"))]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use vercount_core::ErrorCategory;
use vercount_core::SystemRunner;
use vercount_core::VersionDriver;
use vercount_core::VersionNumber;
use vercount_core::driver_from_source;
use vercount_protocol::SourceConfig;
use vercount_test_support::GitFixture;

fn reader(fixture: &GitFixture, source: SourceConfig) -> anyhow::Result<Box<dyn VersionDriver>> {
    Ok(driver_from_source(
        &source,
        fixture.layout("reader")?,
        Arc::new(SystemRunner),
    )?)
}

fn v(n: u64) -> Vec<VersionNumber> {
    vec![VersionNumber::new(n)]
}

#[test]
fn cursor_boundaries_against_published_value() -> anyhow::Result<()> {
    let fixture = GitFixture::with_version("5")?;
    let driver = reader(&fixture, fixture.source())?;

    assert_eq!(driver.check(Some("4"))?, v(5));
    assert_eq!(driver.check(Some("5"))?, v(5));
    assert_eq!(driver.check(Some("6"))?, Vec::new());
    assert_eq!(driver.check(Some(""))?, v(5));
    assert_eq!(driver.check(None)?, v(5));
    Ok(())
}

#[test]
fn missing_file_reports_initial_version() -> anyhow::Result<()> {
    let fixture = GitFixture::new()?;
    let source = SourceConfig {
        initial_version: Some("3".to_string()),
        ..fixture.source()
    };
    let driver = reader(&fixture, source)?;

    assert_eq!(driver.check(None)?, v(3));
    assert_eq!(driver.check(Some("99"))?, v(3));
    Ok(())
}

#[test]
fn check_sees_external_writes() -> anyhow::Result<()> {
    let fixture = GitFixture::with_version("1")?;
    let driver = reader(&fixture, fixture.source())?;

    assert_eq!(driver.check(Some("2"))?, Vec::new());
    fixture.push_external(vercount_test_support::FILE, "2")?;
    assert_eq!(driver.check(Some("2"))?, v(2));
    Ok(())
}

#[test]
fn check_never_commits() -> anyhow::Result<()> {
    let fixture = GitFixture::with_version("5")?;
    let before = fixture.commit_count()?;
    let driver = reader(&fixture, fixture.source())?;

    driver.check(Some("1"))?;
    assert_eq!(fixture.commit_count()?, before);
    Ok(())
}

#[test]
fn malformed_content_is_a_format_error() -> anyhow::Result<()> {
    let fixture = GitFixture::with_version("abc")?;
    let driver = reader(&fixture, fixture.source())?;

    let err = driver.check(Some("1")).err();
    assert_eq!(err.map(|e| e.category()), Some(ErrorCategory::FormatError));

    let err = driver.bump().err();
    assert_eq!(err.map(|e| e.category()), Some(ErrorCategory::FormatError));
    assert_eq!(
        fixture.remote_file(vercount_test_support::FILE).as_deref(),
        Some("abc")
    );
    Ok(())
}
