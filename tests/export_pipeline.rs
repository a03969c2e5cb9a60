use std::{fs, sync::Arc, time::Duration};

use mdexport::{
    application::{
        export::{ExportError, ExportService},
        template::{RenderFailureKind, RenderSession, TemplateSpec, ThreadLauncher},
    },
    domain::headings::OrphanPolicy,
    infra::{saver::FsFileSaver, store::FsContentStore},
};
use tempfile::TempDir;

const DOCUMENT: &str = "---
title: Field notes
extensions:
  preset: gfm
---
### Preface

# Setup

Install the tools.

## Linux

## macOS

# Usage

| flag | meaning |
|------|---------|
| -v   | verbose |
";

struct Fixture {
    _dir: TempDir,
    out: std::path::PathBuf,
    service: ExportService,
}

fn fixture(orphans: OrphanPolicy) -> Fixture {
    let dir = TempDir::new().expect("temp dir");
    let store_root = dir.path().join("docs");
    let out = dir.path().join("out");
    fs::create_dir_all(&store_root).expect("mkdir");
    fs::write(store_root.join("field-notes.md"), DOCUMENT).expect("write doc");

    let session = RenderSession::new(Arc::new(ThreadLauncher)).with_timeout(Duration::from_secs(5));
    let service = ExportService::new(
        Arc::new(FsContentStore::new(&store_root)),
        Arc::new(FsFileSaver::new(&out)),
        session,
    )
    .with_orphan_policy(orphans);

    Fixture {
        _dir: dir,
        out,
        service,
    }
}

#[tokio::test]
async fn export_writes_rendered_html_with_outline() {
    let fixture = fixture(OrphanPolicy::Drop);
    let template = TemplateSpec::new(
        "<title>{{files.0.content.properties.title}}</title>{{tocToHtml files.0.content.toc}}",
        "",
    );

    fixture
        .service
        .export_to_disk("field-notes", "html", Some(&template))
        .await
        .expect("export");

    let written = fs::read_to_string(fixture.out.join("field-notes.html")).expect("read export");
    assert_eq!(
        written,
        "<title>Field notes</title><ul><li><a href=\"#setup\">Setup</a><ul><li><a href=\"#linux\">Linux</a></li><li><a href=\"#macos\">macOS</a></li></ul></li><li><a href=\"#usage\">Usage</a></li></ul>"
    );
}

#[tokio::test]
async fn group_policy_keeps_leading_orphans() {
    let fixture = fixture(OrphanPolicy::Group);
    let template = TemplateSpec::new(
        "{{#each files.0.content.toc}}[{{title}}]{{/each}}",
        "",
    );

    let rendered = fixture
        .service
        .apply_template("field-notes", Some(&template))
        .await
        .expect("render");

    assert_eq!(rendered, "[][Setup][Usage]");
}

#[tokio::test]
async fn yaml_properties_and_text_reach_the_template() {
    let fixture = fixture(OrphanPolicy::Drop);
    let template = TemplateSpec::new(
        "{{{files.0.content.yamlProperties}}}--{{{files.0.content.text}}}",
        "",
    );

    let rendered = fixture
        .service
        .apply_template("field-notes", Some(&template))
        .await
        .expect("render");

    assert!(rendered.starts_with("title: Field notes\n"));
    assert!(rendered.contains("--### Preface\n"));
}

#[tokio::test]
async fn script_helpers_run_inside_the_unit() {
    let fixture = fixture(OrphanPolicy::Drop);
    let template = TemplateSpec::new(
        "{{count files.0.content.toc}}",
        "// @helper count\nparams[0].len()\n",
    );

    let rendered = fixture
        .service
        .apply_template("field-notes", Some(&template))
        .await
        .expect("render");

    assert_eq!(rendered, "2");
}

#[tokio::test]
async fn failed_render_leaves_no_file_behind() {
    let fixture = fixture(OrphanPolicy::Drop);
    let template = TemplateSpec::new("{{#each}}", "");

    let err = fixture
        .service
        .export_to_disk("field-notes", "html", Some(&template))
        .await
        .expect_err("template error");

    match err {
        ExportError::Render(failure) => assert_eq!(failure.kind, RenderFailureKind::TemplateError),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!fixture.out.exists());
}
