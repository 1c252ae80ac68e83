use kairo_template::{ERROR_TEMPLATE, MAINTENANCE_TEMPLATE, Renderer, TeraRenderer};
use rstest::rstest;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[rstest]
fn test_application_templates_override_builtins() {
	let dir = TempDir::new().unwrap();
	let internal = dir.path().join("_internal");
	fs::create_dir_all(&internal).unwrap();
	fs::write(internal.join("error.html"), "custom {{ code }}").unwrap();
	fs::write(dir.path().join("hello.html"), "Hello {{ name }}").unwrap();

	let glob = format!("{}/**/*.html", dir.path().display());
	let renderer = TeraRenderer::from_glob(&glob).unwrap();

	assert_eq!(
		renderer.render(ERROR_TEMPLATE, &json!({ "code": 500 })).unwrap(),
		"custom 500"
	);
	assert_eq!(
		renderer.render("hello.html", &json!({ "name": "Kairo" })).unwrap(),
		"Hello Kairo"
	);
	assert!(renderer.has_template(MAINTENANCE_TEMPLATE));
}

#[rstest]
fn test_with_template_adds_inline_source() {
	let renderer = TeraRenderer::new()
		.unwrap()
		.with_template("inline.html", "{{ 1 + 1 }}")
		.unwrap();
	assert_eq!(renderer.render("inline.html", &json!({})).unwrap(), "2");
}
