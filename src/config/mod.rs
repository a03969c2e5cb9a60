//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;
#[cfg(test)]
mod tests;

use std::{path::PathBuf, str::FromStr, time::Duration};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::application::template::DEFAULT_RENDER_TIMEOUT;
use crate::domain::headings::OrphanPolicy;

pub use cli::{
    CliArgs, Command, ExportArgs, RenderArgs, RenderOverrides, TemplateArgs, TemplatePreset,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "mdexport";
const ENV_PREFIX: &str = "MDEXPORT";
const DEFAULT_STORE_ROOT: &str = ".";
const DEFAULT_OUTPUT_DIR: &str = ".";

#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub store: StoreSettings,
    pub export: ExportSettings,
    pub render: RenderSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub timeout: Duration,
    pub isolation: Isolation,
    pub orphan_headings: OrphanPolicy,
}

/// Where template renders execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Isolation {
    /// A child process per render, killed on teardown.
    Process,
    /// A dedicated thread per render inside this process.
    Thread,
}

impl FromStr for Isolation {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "process" => Ok(Self::Process),
            "thread" => Ok(Self::Thread),
            other => Err(format!("expected `process` or `thread`, got `{other}`")),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match &cli.command {
        Command::Render(args) => raw.apply_render_overrides(&args.overrides),
        Command::Export(args) => {
            raw.apply_render_overrides(&args.overrides);
            if let Some(dir) = args.output_dir.as_ref() {
                raw.export.output_dir = Some(dir.clone());
            }
        }
        Command::RenderWorker => {}
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    store: RawStoreSettings,
    export: RawExportSettings,
    render: RawRenderSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStoreSettings {
    root: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawExportSettings {
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRenderSettings {
    timeout_seconds: Option<u64>,
    isolation: Option<String>,
    orphan_headings: Option<String>,
}

impl RawSettings {
    fn apply_render_overrides(&mut self, overrides: &RenderOverrides) {
        if let Some(root) = overrides.store_root.as_ref() {
            self.store.root = Some(root.clone());
        }
        if let Some(seconds) = overrides.render_timeout_seconds {
            self.render.timeout_seconds = Some(seconds);
        }
        if let Some(isolation) = overrides.render_isolation.as_ref() {
            self.render.isolation = Some(isolation.clone());
        }
        if let Some(policy) = overrides.orphan_headings.as_ref() {
            self.render.orphan_headings = Some(policy.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            store,
            export,
            render,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            store: build_store_settings(store)?,
            export: build_export_settings(export)?,
            render: build_render_settings(render)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_store_settings(store: RawStoreSettings) -> Result<StoreSettings, LoadError> {
    let root = store
        .root
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_ROOT));
    if root.as_os_str().is_empty() {
        return Err(LoadError::invalid("store.root", "path must not be empty"));
    }
    Ok(StoreSettings { root })
}

fn build_export_settings(export: RawExportSettings) -> Result<ExportSettings, LoadError> {
    let output_dir = export
        .output_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    if output_dir.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "export.output_dir",
            "path must not be empty",
        ));
    }
    Ok(ExportSettings { output_dir })
}

fn build_render_settings(render: RawRenderSettings) -> Result<RenderSettings, LoadError> {
    let timeout = match render.timeout_seconds {
        Some(0) => {
            return Err(LoadError::invalid(
                "render.timeout_seconds",
                "must be greater than zero",
            ));
        }
        Some(seconds) => Duration::from_secs(seconds),
        None => DEFAULT_RENDER_TIMEOUT,
    };

    let isolation = match render.isolation {
        Some(value) => Isolation::from_str(&value)
            .map_err(|reason| LoadError::invalid("render.isolation", reason))?,
        None => Isolation::Process,
    };

    let orphan_headings = match render.orphan_headings.as_deref().map(str::trim) {
        None => OrphanPolicy::default(),
        Some(value) if value.eq_ignore_ascii_case("drop") => OrphanPolicy::Drop,
        Some(value) if value.eq_ignore_ascii_case("group") => OrphanPolicy::Group,
        Some(other) => {
            return Err(LoadError::invalid(
                "render.orphan_headings",
                format!("expected `drop` or `group`, got `{other}`"),
            ));
        }
    };

    Ok(RenderSettings {
        timeout,
        isolation,
        orphan_headings,
    })
}
