use std::{
    fs,
    io::{self, Write},
    path::Path,
    process,
    sync::Arc,
};

use clap::Parser;
use mdexport::{
    application::{
        error::{AppError, ErrorReport},
        export::ExportService,
        template::{
            BuiltinTemplate, ProcessLauncher, RenderSession, TemplateSpec, ThreadLauncher,
            UnitLauncher, serve_stdio,
        },
    },
    config::{self, Isolation},
    infra::{error::InfraError, saver::FsFileSaver, store::FsContentStore, telemetry},
};
use tokio_util::sync::CancellationToken;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

const DEFAULT_EXPORT_EXTENSION: &str = "md";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(error.exit_code());
    }
}

fn report_application_error(error: &AppError) {
    let report = ErrorReport::from_error("mdexport::run", error);
    if dispatcher::has_been_set() {
        error!(error = %error, chain = ?report.messages, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, chain = ?report.messages, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let cli_args = config::CliArgs::parse();

    if matches!(cli_args.command, config::Command::RenderWorker) {
        return run_worker().await;
    }

    let settings = config::load(&cli_args).map_err(configuration_error)?;
    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let service = build_export_service(&settings)?;
    let cancel = cancel_on_ctrl_c();

    match cli_args.command {
        config::Command::Render(args) => run_render(&service, args, &cancel).await,
        config::Command::Export(args) => run_export(&service, args, &cancel).await,
        config::Command::RenderWorker => Ok(()),
    }
}

async fn run_worker() -> Result<(), AppError> {
    telemetry::init_worker().map_err(AppError::from)?;
    tokio::task::spawn_blocking(serve_stdio)
        .await
        .map_err(|err| AppError::unexpected(format!("render worker panicked: {err}")))?
        .map_err(|err| AppError::from(InfraError::from(err)))
}

async fn run_render(
    service: &ExportService,
    args: config::RenderArgs,
    cancel: &CancellationToken,
) -> Result<(), AppError> {
    let template = resolve_template(&args.template)?;
    let rendered = service
        .apply_template_with_cancel(&args.file_id, template.as_ref(), cancel)
        .await?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|err| AppError::from(InfraError::from(err)))
}

async fn run_export(
    service: &ExportService,
    args: config::ExportArgs,
    cancel: &CancellationToken,
) -> Result<(), AppError> {
    let template = resolve_template(&args.template)?;
    let extension = export_extension(&args)?;

    info!(
        target = "mdexport::export",
        file_id = args.file_id.as_str(),
        extension = extension.as_str(),
        "Starting export"
    );
    service
        .export_to_disk_with_cancel(&args.file_id, &extension, template.as_ref(), cancel)
        .await?;
    info!(target = "mdexport::export", "Export completed");
    Ok(())
}

fn configuration_error(err: config::LoadError) -> AppError {
    match err {
        config::LoadError::Invalid { .. } => AppError::validation(err.to_string()),
        config::LoadError::Build(_) => {
            AppError::unexpected(format!("failed to load configuration: {err}"))
        }
    }
}

fn build_export_service(settings: &config::Settings) -> Result<ExportService, AppError> {
    let launcher: Arc<dyn UnitLauncher> = match settings.render.isolation {
        Isolation::Process => Arc::new(ProcessLauncher::current_exe().map_err(InfraError::from)?),
        Isolation::Thread => Arc::new(ThreadLauncher),
    };
    let session = RenderSession::new(launcher).with_timeout(settings.render.timeout);

    Ok(ExportService::new(
        Arc::new(FsContentStore::new(&settings.store.root)),
        Arc::new(FsFileSaver::new(&settings.export.output_dir)),
        session,
    )
    .with_orphan_policy(settings.render.orphan_headings))
}

/// Template chosen on the command line, or `None` for the raw-text default.
fn resolve_template(args: &config::TemplateArgs) -> Result<Option<TemplateSpec>, AppError> {
    let mut spec = match (args.template, args.template_file.as_deref()) {
        (Some(preset), _) => Some(BuiltinTemplate::from(preset).spec()),
        (None, Some(path)) => Some(TemplateSpec::new(read_source(path)?, "")),
        (None, None) => None,
    };

    if let Some(path) = args.helpers_file.as_deref() {
        let helpers = read_source(path)?;
        spec.get_or_insert_with(TemplateSpec::default).helpers = helpers;
    }
    Ok(spec)
}

fn read_source(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|err| {
        AppError::validation(format!("failed to read `{}`: {err}", path.display()))
    })
}

fn export_extension(args: &config::ExportArgs) -> Result<String, AppError> {
    let extension = match (args.extension.as_deref(), args.template.template) {
        (Some(extension), _) => extension.trim_start_matches('.').to_string(),
        (None, Some(preset)) => BuiltinTemplate::from(preset).extension().to_string(),
        (None, None) if args.template.template_file.is_some() => {
            return Err(AppError::validation(
                "--type is required when using --template-file",
            ));
        }
        (None, None) => DEFAULT_EXPORT_EXTENSION.to_string(),
    };

    if extension.is_empty() || extension.contains(['/', '\\']) {
        return Err(AppError::validation(format!(
            "`{extension}` is not a usable file extension"
        )));
    }
    Ok(extension)
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!(target = "mdexport::signal", "Interrupted; cancelling render");
                trigger.cancel();
            }
            Err(err) => warn!(
                target = "mdexport::signal",
                error = %err,
                "Failed to listen for Ctrl-C"
            ),
        }
    });
    cancel
}
