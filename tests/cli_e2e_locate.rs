//! End-to-end tests for the `resource-locator locate` command.

#[allow(dead_code)]
mod common;
#[allow(unused_imports)]
use common::prelude::*;

fn dumped_fixture() -> ProjectFixture {
    let fixture = ProjectFixture::new()
        .with_root(
            r#"{
    "name": "acme/app",
    "extra": {"resources": {
        "export": {"/app": "res"},
        "tag": {"/app/css/*": "acme/css"}
    }}
}"#,
        )
        .with_package("acme/blog", r#"{"export": {"/acme/blog": "res"}}"#)
        .with_file("res/css/app.css", "body {}")
        .with_file("vendor/acme/blog/res/post.html", "<p></p>");
    fixture.command().arg("dump").assert().success();
    fixture
}

#[test]
fn test_locate_mapped_path() {
    let fixture = dumped_fixture();

    fixture
        .command()
        .args(["locate", "/acme/blog"])
        .assert()
        .success()
        .stdout(predicate::str::contains(fixture.canonical("vendor/acme/blog/res")));
}

#[test]
fn test_locate_nested_file() {
    let fixture = dumped_fixture();

    fixture
        .command()
        .args(["locate", "/app/css/app.css"])
        .assert()
        .success()
        .stdout(predicate::str::contains(fixture.canonical("res/css/app.css")));
}

#[test]
fn test_locate_missing_resource() {
    let fixture = dumped_fixture();

    fixture
        .command()
        .args(["locate", "/app/css/missing.css"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Resource not found: /app/css/missing.css"));
}

#[test]
fn test_locate_by_tag() {
    let fixture = dumped_fixture();

    fixture
        .command()
        .args(["locate", "--tag", "acme/css"])
        .assert()
        .success()
        .stdout(predicate::eq("/app/css/app.css\n"));
}

#[test]
fn test_locate_unknown_tag_prints_nothing() {
    let fixture = dumped_fixture();

    fixture
        .command()
        .args(["locate", "--tag", "acme/none"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_locate_list() {
    let fixture = dumped_fixture();

    fixture
        .command()
        .args(["locate", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("/acme/blog "))
        .stdout(predicate::str::contains("/app "));
}

#[test]
fn test_locate_before_dump() {
    let fixture = ProjectFixture::new().with_root(manifests::EMPTY_ROOT);

    fixture
        .command()
        .args(["locate", "/app"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("run `resource-locator dump` first"));
}

#[test]
fn test_locate_requires_path_or_tag() {
    let fixture = dumped_fixture();

    fixture.command().arg("locate").assert().failure().code(2);
}
