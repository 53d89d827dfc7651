//! End-to-end tests for the commands that edit `workspaces.yaml`: `add`,
//! `enable` and `disable`. They never touch git.

mod common;
use common::prelude::*;

#[test]
fn test_add_yes_creates_config() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["add", "--yes", "org/api"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Added https://github.com/org/api.git -> api (main)"))
        .stdout(predicate::str::contains("workspace-sync sync"));

    let config = fixture.config();
    assert!(config.contains("workspaces:"));
    assert!(config.contains("url: https://github.com/org/api.git"));
    assert!(config.contains("path: api"));
    assert!(config.contains("branch: main"));
    assert!(!fixture.path().join("api").exists(), "add never clones");
}

#[test]
fn test_add_with_flags_appends_entry() {
    let fixture = TestFixture::new().with_config(configs::TWO_MISSING);

    fixture
        .command()
        .args([
            "add",
            "https://gitlab.com/team/worker.git",
            "services/worker",
            "--branch",
            "develop",
            "--go-workspace",
            "--inactive",
            "--yes",
        ])
        .assert()
        .success();

    let config: serde_yaml::Value = serde_yaml::from_str(&fixture.config()).unwrap();
    let workspaces = config["workspaces"].as_sequence().unwrap();
    assert_eq!(workspaces.len(), 4);
    let added = &workspaces[3];
    assert_eq!(added["path"], "services/worker");
    assert_eq!(added["branch"], "develop");
    assert_eq!(added["goWorkspace"], true);
    assert_eq!(added["active"], false);
}

#[test]
fn test_add_duplicate_path_fails() {
    let fixture = TestFixture::new().with_config(configs::TWO_MISSING);
    let before = fixture.config();

    fixture
        .command()
        .args(["add", "--yes", "org/docs"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already configured"));

    assert_eq!(fixture.config(), before);
}

#[test]
fn test_disable_then_enable() {
    let fixture = TestFixture::new().with_config(configs::TWO_MISSING);

    fixture
        .command()
        .args(["disable", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("disabled docs"));

    let config: serde_yaml::Value = serde_yaml::from_str(&fixture.config()).unwrap();
    assert_eq!(config["workspaces"][1]["active"], false);

    fixture
        .command()
        .args(["enable", "docs", "legacy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled legacy"));

    let config: serde_yaml::Value = serde_yaml::from_str(&fixture.config()).unwrap();
    assert_eq!(config["workspaces"][1]["active"], true);
    assert_eq!(config["workspaces"][2]["active"], true);
}

#[test]
fn test_disable_all() {
    let fixture = TestFixture::new().with_config(configs::TWO_MISSING);

    fixture.command().args(["disable", "--all"]).assert().success();

    let config: serde_yaml::Value = serde_yaml::from_str(&fixture.config()).unwrap();
    for entry in config["workspaces"].as_sequence().unwrap() {
        assert_eq!(entry["active"], false);
    }
}

#[test]
fn test_enable_unknown_path_suggests_similar() {
    let fixture = TestFixture::new().with_config(configs::TWO_MISSING);

    fixture
        .command()
        .args(["enable", "legacyy"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown workspace path(s): legacyy"))
        .stderr(predicate::str::contains("Did you mean 'legacy'?"));
}

#[test]
fn test_enable_paths_conflict_with_all() {
    TestFixture::new()
        .with_config(configs::TWO_MISSING)
        .command()
        .args(["enable", "docs", "--all"])
        .assert()
        .code(2);
}
