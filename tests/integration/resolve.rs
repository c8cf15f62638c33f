use predicates::prelude::*;
use serde_json::{Value, json};

use pagelet_kit::test_utils::{CatalogFixture, ConfigFixture};

use crate::common::TestProject;

/// Test text output lists locations per kind in load order
#[test]
fn test_resolve_text_output() {
    let project = TestProject::with_catalog(&CatalogFixture::sample()).unwrap();

    project
        .pagelet()
        .args(["resolve", "--catalog", "map.json", "views/home"])
        .assert()
        .success()
        .stdout(concat!(
            "js\n",
            "  /public/c/base/base.js\n",
            "  /public/c/dialog/dialog.js\n",
            "  /public/v/home/home.js\n",
            "css\n",
            "  /public/c/dialog/dialog.css\n",
        ));
}

/// Test JSON output without combo mode
#[test]
fn test_resolve_json_output() {
    let project = TestProject::with_catalog(&CatalogFixture::sample()).unwrap();

    let output = project
        .pagelet()
        .args(["resolve", "--catalog", "map.json", "--json", "components/card/card.tpl", "theme"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["resources"]["js"], json!(["/public/c/card/card.js"]));
    assert_eq!(
        result["resources"]["css"],
        json!(["/public/c/card/card.css", "/public/c/theme/theme.css"])
    );
    assert_eq!(result["resources"]["other"], json!(["/public/c/card/card.tpl"]));
    assert_eq!(result["combo"], json!({}));
    assert_eq!(result["unresolved"], json!([]));
}

/// Test combo URLs are printed when the catalog enables combo mode
#[test]
fn test_resolve_combo_urls() {
    let project = TestProject::with_catalog(&CatalogFixture::combo()).unwrap();

    let output = project
        .pagelet()
        .args(["resolve", "--catalog", "map.json", "--json", "dialog"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["combo"]["js"], json!(["/co??c/base/base.js,c/dialog/dialog.js"]));
    assert_eq!(result["combo"]["css"], json!(["/co??c/dialog/dialog.css"]));
}

/// Test pagelet.toml in the working directory is picked up
#[test]
fn test_resolve_uses_local_config() {
    let project = TestProject::with_catalog(&CatalogFixture::sample()).unwrap();
    ConfigFixture::short_urls().write_to(project.path()).unwrap();

    project
        .pagelet()
        .args(["resolve", "--catalog", "map.json", "views/home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("combo\n  /co??c/base/base.js,c/dialog/dialog.js\n"))
        .stdout(predicate::str::contains("  /co??v/home/home.js\n"));
}

/// Test missing ids are reported without failing
#[test]
fn test_resolve_reports_unresolved() {
    let project = TestProject::with_catalog(&CatalogFixture::sample()).unwrap();

    project
        .pagelet()
        .args(["resolve", "--catalog", "map.json", "ghost", "broken"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/public/c/broken/broken.js"))
        .stderr(predicate::str::contains("unresolved: ghost"))
        .stderr(predicate::str::contains("unresolved: components/ghost/ghost.js"));
}

/// Test a missing catalog fails with a suggestion
#[test]
fn test_resolve_missing_catalog() {
    let project = TestProject::new().unwrap();

    project
        .pagelet()
        .args(["resolve", "--catalog", "map.json", "dialog"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Resource catalog not found"))
        .stderr(predicate::str::contains("--catalog"));
}

/// Test a malformed catalog fails
#[test]
fn test_resolve_invalid_catalog() {
    let project = TestProject::with_catalog(&CatalogFixture::invalid_json()).unwrap();

    project
        .pagelet()
        .args(["resolve", "--catalog", "map.json", "dialog"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid resource catalog"));
}

/// Test an invalid configuration file fails before resolving
#[test]
fn test_resolve_invalid_config() {
    let project = TestProject::with_catalog(&CatalogFixture::sample()).unwrap();
    ConfigFixture::unknown_key().write_to(project.path()).unwrap();

    project
        .pagelet()
        .args(["resolve", "--catalog", "map.json", "dialog"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

/// Test ids are required
#[test]
fn test_resolve_requires_ids() {
    let project = TestProject::with_catalog(&CatalogFixture::sample()).unwrap();

    project.pagelet().args(["resolve", "--catalog", "map.json"]).assert().failure();
}
