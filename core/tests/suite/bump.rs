#![cfg(not(target_os = "windows"))]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use vercount_core::SystemRunner;
use vercount_core::VersionDriver;
use vercount_core::VersionNumber;
use vercount_core::driver_from_source;
use vercount_protocol::SourceConfig;
use vercount_test_support::FILE;
use vercount_test_support::GitFixture;

fn driver(fixture: &GitFixture, source: SourceConfig) -> anyhow::Result<Box<dyn VersionDriver>> {
    Ok(driver_from_source(
        &source,
        fixture.layout("writer")?,
        Arc::new(SystemRunner),
    )?)
}

#[test]
fn bump_from_missing_file_publishes_one() -> anyhow::Result<()> {
    let fixture = GitFixture::new()?;
    let driver = driver(&fixture, fixture.source())?;

    assert_eq!(driver.bump()?, VersionNumber::new(1));
    assert_eq!(fixture.remote_file(FILE).as_deref(), Some("1"));
    Ok(())
}

#[test]
fn bump_increments_published_value() -> anyhow::Result<()> {
    let fixture = GitFixture::with_version("4")?;
    let driver = driver(&fixture, fixture.source())?;

    assert_eq!(driver.bump()?, VersionNumber::new(5));
    assert_eq!(fixture.remote_file(FILE).as_deref(), Some("5"));
    Ok(())
}

#[test]
fn repeated_bumps_reuse_the_working_copy() -> anyhow::Result<()> {
    let fixture = GitFixture::with_version("9")?;
    let driver = driver(&fixture, fixture.source())?;

    assert_eq!(driver.bump()?, VersionNumber::new(10));
    fixture.push_external(FILE, "20")?;
    assert_eq!(driver.bump()?, VersionNumber::new(21));
    assert_eq!(fixture.remote_file(FILE).as_deref(), Some("21"));
    Ok(())
}

#[test]
fn check_after_bump_reports_new_value() -> anyhow::Result<()> {
    let fixture = GitFixture::with_version("4")?;
    let driver = driver(&fixture, fixture.source())?;

    let bumped = driver.bump()?;
    assert_eq!(driver.check(Some("4"))?, vec![bumped]);
    Ok(())
}

#[test]
fn commit_message_template_is_expanded() -> anyhow::Result<()> {
    let fixture = GitFixture::with_version("1")?;
    let source = SourceConfig {
        commit_message: Some("release %version% (%file%)".to_string()),
        ..fixture.source()
    };
    let driver = driver(&fixture, source)?;

    driver.bump()?;
    assert_eq!(fixture.last_commit_subject()?, "release 2 (number)");
    Ok(())
}

#[test]
fn version_file_in_subdirectory_is_created() -> anyhow::Result<()> {
    let fixture = GitFixture::new()?;
    let source = SourceConfig {
        file: "ci/versions/app".to_string(),
        ..fixture.source()
    };
    let driver = driver(&fixture, source)?;

    assert_eq!(driver.bump()?, VersionNumber::new(1));
    assert_eq!(fixture.remote_file("ci/versions/app").as_deref(), Some("1"));
    Ok(())
}

#[test]
fn shallow_clone_still_publishes() -> anyhow::Result<()> {
    let fixture = GitFixture::with_version("1")?;
    fixture.push_external(FILE, "2")?;
    let source = SourceConfig {
        // Local-path clones ignore --depth unless the file:// transport is used.
        uri: format!("file://{}", fixture.remote_uri()),
        depth: Some(1),
        ..fixture.source()
    };
    let driver = driver(&fixture, source)?;

    assert_eq!(driver.bump()?, VersionNumber::new(3));
    assert_eq!(fixture.remote_file(FILE).as_deref(), Some("3"));
    Ok(())
}
