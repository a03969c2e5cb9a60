use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn store_with(id: &str, contents: &str) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join(format!("{id}.md")), contents).expect("write doc");
    dir
}

fn mdexport() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mdexport"));
    cmd.env_remove("MDEXPORT_CONFIG_FILE")
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn render_prints_raw_text_through_a_worker_process() {
    let store = store_with("notes", "---\ntitle: Notes\n---\n# Hello\n\nWorld.\n");

    mdexport()
        .arg("render")
        .arg("notes")
        .arg("--store-root")
        .arg(store.path())
        .assert()
        .success()
        .stdout("# Hello\n\nWorld.\n");
}

#[test]
fn export_saves_styled_html_into_the_output_dir() {
    let store = store_with("guide", "# Install\n\n## Linux\n\n# Use\n");
    let out = TempDir::new().expect("out dir");

    mdexport()
        .arg("export")
        .arg("guide")
        .arg("--template")
        .arg("styled-html")
        .arg("--store-root")
        .arg(store.path())
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .success();

    let html = fs::read_to_string(out.path().join("guide.html")).expect("read export");
    assert!(html.contains("<title>guide</title>"));
    assert!(html.contains("<a href=\"#linux\">Linux</a>"));
    assert!(html.contains("<h1 id=\"install\">Install</h1>"));
}

#[test]
fn custom_template_and_helpers_are_read_from_files() {
    let store = store_with("notes", "# One\n\n# Two\n");
    let assets = TempDir::new().expect("assets dir");
    let template = assets.path().join("page.hbs");
    let helpers = assets.path().join("helpers.rhai");
    fs::write(&template, "{{shout files.0.name}} has {{count files.0.content.toc}} sections").expect("template");
    fs::write(
        &helpers,
        "// @helper shout\nparams[0].to_upper()\n// @helper count\nparams[0].len()\n",
    )
    .expect("helpers");

    mdexport()
        .arg("render")
        .arg("notes")
        .arg("--store-root")
        .arg(store.path())
        .arg("--template-file")
        .arg(&template)
        .arg("--helpers-file")
        .arg(&helpers)
        .assert()
        .success()
        .stdout("NOTES has 2 sections");
}

#[test]
fn template_errors_fail_without_writing() {
    let store = store_with("notes", "# One\n");
    let out = TempDir::new().expect("out dir");
    let assets = TempDir::new().expect("assets dir");
    let template = assets.path().join("broken.hbs");
    fs::write(&template, "{{#each}}").expect("template");

    mdexport()
        .arg("export")
        .arg("notes")
        .arg("--type")
        .arg("txt")
        .arg("--template-file")
        .arg(&template)
        .arg("--store-root")
        .arg(store.path())
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .failure()
        .code(4)
        .stderr(contains("application error"));

    assert!(!out.path().join("notes.txt").exists());
}

#[test]
fn missing_documents_exit_with_load_failure() {
    let store = TempDir::new().expect("store dir");

    mdexport()
        .arg("render")
        .arg("absent")
        .arg("--store-root")
        .arg(store.path())
        .assert()
        .failure()
        .code(3)
        .stderr(contains("not found"));
}

#[test]
fn worker_answers_one_request_on_stdio() {
    mdexport()
        .arg("render-worker")
        .write_stdin("[\"Hi {{files.0.name}}\",{\"files\":[{\"name\":\"x\"}]},\"\"]\n")
        .assert()
        .success()
        .stdout("[null,\"Hi x\"]\n");
}

#[test]
fn thread_isolation_is_selectable() {
    let store = store_with("notes", "plain\n");

    mdexport()
        .arg("render")
        .arg("notes")
        .arg("--store-root")
        .arg(store.path())
        .arg("--render-isolation")
        .arg("thread")
        .assert()
        .success()
        .stdout("plain\n");
}

#[test]
fn invalid_settings_exit_with_validation_code() {
    let store = store_with("notes", "plain\n");

    mdexport()
        .arg("render")
        .arg("notes")
        .arg("--store-root")
        .arg(store.path())
        .arg("--render-timeout-seconds")
        .arg("0")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("render.timeout_seconds"));
}
