use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint, builder::BoolishValueParser};

use crate::application::template::BuiltinTemplate;

/// Command-line arguments for the mdexport binary.
#[derive(Debug, Parser)]
#[command(
    name = "mdexport",
    version,
    about = "Render stored markdown documents through sandboxed templates"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "MDEXPORT_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Render a document and print the result to stdout.
    Render(RenderArgs),
    /// Render a document and save it as `<name>.<type>`.
    Export(ExportArgs),
    /// Serve one render request over stdin/stdout.
    #[command(name = "render-worker", hide = true)]
    RenderWorker,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Identifier of the stored document.
    #[arg(value_name = "FILE_ID")]
    pub file_id: String,

    #[command(flatten)]
    pub template: TemplateArgs,

    #[command(flatten)]
    pub overrides: RenderOverrides,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Identifier of the stored document.
    #[arg(value_name = "FILE_ID")]
    pub file_id: String,

    /// Extension of the saved file; defaults to the template's usual type.
    #[arg(long = "type", value_name = "EXT")]
    pub extension: Option<String>,

    /// Override the directory exports are written to.
    #[arg(long = "output-dir", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub template: TemplateArgs,

    #[command(flatten)]
    pub overrides: RenderOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct TemplateArgs {
    /// Use a built-in template.
    #[arg(long = "template", value_enum, conflicts_with = "template_file")]
    pub template: Option<TemplatePreset>,

    /// Read the Handlebars template from a file.
    #[arg(long = "template-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub template_file: Option<PathBuf>,

    /// Read script helpers (`// @helper <name>` sections) from a file.
    #[arg(long = "helpers-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub helpers_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TemplatePreset {
    PlainText,
    PlainHtml,
    StyledHtml,
}

impl From<TemplatePreset> for BuiltinTemplate {
    fn from(preset: TemplatePreset) -> Self {
        match preset {
            TemplatePreset::PlainText => BuiltinTemplate::PlainText,
            TemplatePreset::PlainHtml => BuiltinTemplate::PlainHtml,
            TemplatePreset::StyledHtml => BuiltinTemplate::StyledHtml,
        }
    }
}

#[derive(Debug, Args, Default, Clone)]
pub struct RenderOverrides {
    /// Override the directory documents are loaded from.
    #[arg(long = "store-root", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub store_root: Option<PathBuf>,

    /// Override the template render timeout.
    #[arg(long = "render-timeout-seconds", value_name = "SECONDS")]
    pub render_timeout_seconds: Option<u64>,

    /// Override where templates run (process|thread).
    #[arg(long = "render-isolation", value_name = "MODE")]
    pub render_isolation: Option<String>,

    /// Override how headings without a parent are treated (drop|group).
    #[arg(long = "orphan-headings", value_name = "POLICY")]
    pub orphan_headings: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}
