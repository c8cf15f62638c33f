use predicates::prelude::*;
use serde_json::{Value, json};

use pagelet_kit::test_utils::{CatalogFixture, PAGE_SHELL};

use crate::common::TestProject;

fn project() -> TestProject {
    let project = TestProject::with_catalog(&CatalogFixture::sample()).unwrap();
    project.write_file("index.html", PAGE_SHELL).unwrap();
    project
}

/// Test both hooks are filled on a whole page
#[test]
fn test_assemble_page() {
    let project = project();

    project
        .pagelet()
        .args(["assemble", "--catalog", "map.json", "--page", "index.html"])
        .args(["--require", "views/home,theme"])
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!(
            "<head><link rel=\"stylesheet\" href=\"/public/c/dialog/dialog.css\">\n",
            "<link rel=\"stylesheet\" href=\"/public/c/theme/theme.css\">\n</head>",
        )))
        .stdout(predicate::str::contains("<script src=\"/public/v/home/home.js\"></script>\n"))
        .stdout(predicate::str::contains("pagelet.init(0,\"/co??%s\","))
        .stdout(predicate::str::contains("PAGELET_JS_HOOK").not());
}

/// Test the result is written to --output
#[test]
fn test_assemble_output_file() {
    let project = project();

    project
        .pagelet()
        .args(["assemble", "--catalog", "map.json", "--page", "index.html"])
        .args(["--require", "dialog", "-o", "out.html"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let page = project.read_file("out.html").unwrap();
    assert!(page.contains("<script src=\"/public/c/dialog/dialog.js\"></script>"));
}

/// Test the page is rendered as a template with --data
#[test]
fn test_assemble_page_template_data() {
    let project = project();
    project.write_file("hello.html", "<h1>{{ name }}</h1><!--PAGELET_JS_HOOK-->").unwrap();
    project.write_file("data.json", r#"{"name": "Ada"}"#).unwrap();

    project
        .pagelet()
        .args(["assemble", "--catalog", "map.json", "--page", "hello.html", "--data", "data.json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<h1>Ada</h1><script>pagelet.init("));
}

/// Test --pagelet produces the JSON envelope
#[test]
fn test_assemble_pagelet_envelope() {
    let project = project();
    project.write_file("feed.html", "<ul>{{ n }}</ul>").unwrap();
    project.write_file("data.json", r#"{"n": 3}"#).unwrap();

    let output = project
        .pagelet()
        .args(["assemble", "--catalog", "map.json", "--page", "feed.html", "--data", "data.json"])
        .args(["--pagelet", "layout.feed", "--require", "dialog"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let envelope: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        envelope,
        json!({
            "html": {"layout.feed": "<ul>3</ul>"},
            "data": {},
            "js": ["/public/c/base/base.js", "/public/c/dialog/dialog.js"],
            "css": ["/public/c/dialog/dialog.css"],
            "title": "",
            "script": [],
        })
    );
}

/// Test template errors are reported with the page name
#[test]
fn test_assemble_template_error() {
    let project = project();
    project.write_file("broken.html", "{% if %}").unwrap();

    project
        .pagelet()
        .args(["assemble", "--catalog", "map.json", "--page", "broken.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to render template 'broken.html'"));
}

/// Test a missing page fails
#[test]
fn test_assemble_missing_page() {
    let project = project();

    project
        .pagelet()
        .args(["assemble", "--catalog", "map.json", "--page", "nope.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read page"));
}
