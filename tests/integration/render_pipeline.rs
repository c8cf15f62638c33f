use serde_json::{Value, json};
use std::sync::Arc;

use pagelet_kit::catalog::ResourceCatalog;
use pagelet_kit::config::RenderConfig;
use pagelet_kit::render::RenderContext;
use pagelet_kit::templating::TeraEngine;
use pagelet_kit::test_utils::{CatalogFixture, ConfigFixture, PAGE_SHELL, init_test_logging};

use crate::common::TestProject;

const CARD_TEMPLATE: &str = "<div class=\"card\">{{ title }}</div>";

fn project_with_card() -> TestProject {
    init_test_logging(None);
    let project = TestProject::with_catalog(&CatalogFixture::sample()).unwrap();
    project.write_file("public/c/card/card.tpl", CARD_TEMPLATE).unwrap();
    project
}

fn load_catalog(project: &TestProject) -> Arc<ResourceCatalog> {
    Arc::new(ResourceCatalog::load(&project.path().join("map.json")).unwrap())
}

fn position(page: &str, needle: &str) -> usize {
    page.find(needle).unwrap_or_else(|| panic!("'{needle}' missing from:\n{page}"))
}

/// Test a whole page: template include, page script, and both hooks
#[test]
fn test_full_page_render() {
    let project = project_with_card();
    let views = project.path().join("views");
    let config = RenderConfig::default().with_template_root(&views.to_string_lossy());
    let engine = TeraEngine::new(config.template_root.clone());

    let mut ctx = RenderContext::new(load_catalog(&project), config);
    let card = ctx.include("card", None, &json!({"title": "Hi"}), &engine).unwrap();
    ctx.require("views/home", None);
    ctx.add_script("app.start()");

    let page = ctx.render(&PAGE_SHELL.replace("<main></main>", &format!("<main>{card}</main>"))).unwrap();

    assert!(page.contains("<main><div class=\"card\">Hi</div></main>"));
    assert!(!page.contains("PAGELET_CSS_HOOK"));
    assert!(!page.contains("PAGELET_JS_HOOK"));

    // styles in the head, in discovery order
    let head_end = position(&page, "</head>");
    assert!(position(&page, "card/card.css") < position(&page, "dialog/dialog.css"));
    assert!(position(&page, "dialog/dialog.css") < head_end);

    // scripts at the end of the body, dependencies first
    let card_js = position(&page, "<script src=\"/public/c/card/card.js\">");
    let base_js = position(&page, "<script src=\"/public/c/base/base.js\">");
    let dialog_js = position(&page, "<script src=\"/public/c/dialog/dialog.js\">");
    let home_js = position(&page, "<script src=\"/public/v/home/home.js\">");
    assert!(head_end < card_js && card_js < base_js && base_js < dialog_js && dialog_js < home_js);
    assert!(home_js < position(&page, "pagelet.init(0,"));
    assert!(position(&page, "pagelet.init(0,") < position(&page, "!function(){app.start()}();"));
}

/// Test combo packing driven by a configuration file
#[test]
fn test_config_file_drives_combo_packing() {
    let project = project_with_card();
    let config_path = ConfigFixture::short_urls().write_to(project.path()).unwrap();
    let config = RenderConfig::load_from(&config_path).unwrap();

    let mut ctx = RenderContext::new(load_catalog(&project), config);
    assert!(ctx.combo_enabled());
    ctx.require("views/home", None);

    let page = ctx.render("<!--PAGELET_JS_HOOK-->").unwrap();
    assert!(page.starts_with(concat!(
        "<script src=\"/co??c/base/base.js,c/dialog/dialog.js\"></script>\n",
        "<script src=\"/co??v/home/home.js\"></script>\n",
    )));
}

/// Test template root given in pagelet.toml, with the trailing views directory
#[test]
fn test_config_file_template_root() {
    let project = project_with_card();
    let views = project.path().join("views");
    let config_path = project
        .write_file("pagelet.toml", &format!("template_root = {:?}\n", views.to_string_lossy()))
        .unwrap();
    let config = RenderConfig::load_from(&config_path).unwrap();
    assert_eq!(config.template_root.as_deref(), Some(project.path()));

    let engine = TeraEngine::new(config.template_root.clone());
    let mut ctx = RenderContext::new(load_catalog(&project), config);
    let html = ctx.include("card", None, &json!({"title": "Root"}), &engine).unwrap();
    assert_eq!(html, "<div class=\"card\">Root</div>");
}

/// Test a pagelet request rendering only the requested fragment
#[test]
fn test_pagelet_request() {
    let project = project_with_card();
    let engine = TeraEngine::new(Some(project.path().to_path_buf()));

    let mut ctx = RenderContext::new(load_catalog(&project), RenderConfig::default());
    ctx.use_pagelets("layout.feed");
    ctx.require("views/home", None);

    ctx.pagelet("layout", |ctx| {
        let header = ctx.pagelet("header", |ctx| {
            ctx.require("theme", None);
            Ok("<header/>".to_string())
        })?;
        assert!(header.is_none());

        ctx.pagelet("feed", |ctx| {
            ctx.title("Feed");
            ctx.add_script("feed.init()");
            ctx.include("card", Some(1), &json!({"title": "Post"}), &engine)
        })?;
        Ok(String::new())
    })
    .unwrap();

    let envelope: Value = serde_json::from_str(&ctx.render("unused").unwrap()).unwrap();
    assert_eq!(
        envelope,
        json!({
            "html": {"layout.feed": "<div class=\"card\">Post</div>"},
            "data": {},
            "js": ["/public/c/card/card.js"],
            "css": ["/public/c/card/card.css"],
            "title": "Feed",
            "script": ["feed.init()"],
        })
    );
}

/// Test that renders sharing a catalog do not see each other's state
#[test]
fn test_renders_are_independent() {
    init_test_logging(None);
    let catalog = Arc::new(CatalogFixture::sample().catalog().unwrap());

    let mut first = RenderContext::new(Arc::clone(&catalog), RenderConfig::default());
    let mut second = RenderContext::new(Arc::clone(&catalog), RenderConfig::default());
    first.require("dialog", None);
    second.require("theme", None);

    let first_page = first.render("<!--PAGELET_CSS_HOOK-->").unwrap();
    let second_page = second.render("<!--PAGELET_CSS_HOOK-->").unwrap();

    assert!(first_page.contains("dialog.css"));
    assert!(!first_page.contains("theme.css"));
    assert!(second_page.contains("theme.css"));
    assert!(!second_page.contains("dialog.css"));
}
