use super::*;
use crate::application::template::BuiltinTemplate;
use clap::{Parser, ValueEnum};

#[test]
fn defaults_match_documented_values() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert_eq!(settings.store.root, PathBuf::from("."));
    assert_eq!(settings.export.output_dir, PathBuf::from("."));
    assert_eq!(settings.render.timeout, Duration::from_secs(10));
    assert_eq!(settings.render.isolation, Isolation::Process);
    assert_eq!(settings.render.orphan_headings, OrphanPolicy::Drop);
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.render.timeout_seconds = Some(30);
    raw.logging.level = Some("info".to_string());

    let overrides = RenderOverrides {
        render_timeout_seconds: Some(2),
        render_isolation: Some("thread".to_string()),
        orphan_headings: Some("group".to_string()),
        log_level: Some("debug".to_string()),
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_render_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.render.timeout, Duration::from_secs(2));
    assert_eq!(settings.render.isolation, Isolation::Thread);
    assert_eq!(settings.render.orphan_headings, OrphanPolicy::Group);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_timeout_is_rejected() {
    let mut raw = RawSettings::default();
    raw.render.timeout_seconds = Some(0);

    let err = Settings::from_raw(raw).expect_err("invalid timeout");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "render.timeout_seconds",
            ..
        }
    ));
}

#[test]
fn unknown_isolation_and_orphan_policy_are_rejected() {
    let mut raw = RawSettings::default();
    raw.render.isolation = Some("vm".to_string());
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "render.isolation",
            ..
        })
    ));

    let mut raw = RawSettings::default();
    raw.render.orphan_headings = Some("keep".to_string());
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "render.orphan_headings",
            ..
        })
    ));
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn parse_render_arguments() {
    let args = CliArgs::parse_from([
        "mdexport",
        "render",
        "notes",
        "--template",
        "styled-html",
        "--store-root",
        "/srv/docs",
    ]);

    match args.command {
        Command::Render(render) => {
            assert_eq!(render.file_id, "notes");
            assert_eq!(render.template.template, Some(TemplatePreset::StyledHtml));
            assert_eq!(
                render.overrides.store_root.as_deref(),
                Some(std::path::Path::new("/srv/docs"))
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_export_arguments() {
    let args = CliArgs::parse_from([
        "mdexport",
        "export",
        "notes",
        "--type",
        "html",
        "--template-file",
        "/tmp/page.hbs",
        "--helpers-file",
        "/tmp/helpers.rhai",
        "--output-dir",
        "/tmp/out",
    ]);

    match args.command {
        Command::Export(export) => {
            assert_eq!(export.file_id, "notes");
            assert_eq!(export.extension.as_deref(), Some("html"));
            assert_eq!(
                export.template.template_file.as_deref(),
                Some(std::path::Path::new("/tmp/page.hbs"))
            );
            assert!(export.template.helpers_file.is_some());
            assert_eq!(
                export.output_dir.as_deref(),
                Some(std::path::Path::new("/tmp/out"))
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn template_preset_conflicts_with_template_file() {
    let result = CliArgs::try_parse_from([
        "mdexport",
        "render",
        "notes",
        "--template",
        "plain-html",
        "--template-file",
        "/tmp/page.hbs",
    ]);
    assert!(result.is_err());
}

#[test]
fn template_presets_map_onto_builtin_templates() {
    let mapped: Vec<BuiltinTemplate> = TemplatePreset::value_variants()
        .iter()
        .map(|preset| {
            let builtin = BuiltinTemplate::from(*preset);
            let value = preset.to_possible_value().expect("visible value");
            assert_eq!(value.get_name(), builtin.name());
            builtin
        })
        .collect();
    assert_eq!(mapped, BuiltinTemplate::ALL.to_vec());
}

#[test]
fn parse_hidden_worker_command() {
    let args = CliArgs::parse_from(["mdexport", "render-worker"]);
    assert!(matches!(args.command, Command::RenderWorker));
}

#[test]
#[serial_test::serial]
fn environment_layer_sits_between_files_and_cli() {
    // SAFETY: serialised with every other test that touches the environment.
    unsafe {
        std::env::set_var("MDEXPORT__RENDER__TIMEOUT_SECONDS", "3");
        std::env::set_var("MDEXPORT__RENDER__ISOLATION", "thread");
    }

    let from_env = load(&CliArgs::parse_from(["mdexport", "render", "notes"]));
    let from_cli = load(&CliArgs::parse_from([
        "mdexport",
        "render",
        "notes",
        "--render-timeout-seconds",
        "7",
    ]));

    unsafe {
        std::env::remove_var("MDEXPORT__RENDER__TIMEOUT_SECONDS");
        std::env::remove_var("MDEXPORT__RENDER__ISOLATION");
    }

    let from_env = from_env.expect("env settings");
    assert_eq!(from_env.render.timeout, Duration::from_secs(3));
    assert_eq!(from_env.render.isolation, Isolation::Thread);
    assert_eq!(
        from_cli.expect("cli settings").render.timeout,
        Duration::from_secs(7)
    );
}
