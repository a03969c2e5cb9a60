//! Export orchestration: load, convert, outline, render, save.

use std::sync::Arc;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::application::properties::compute_properties;
use crate::application::render::{
    ConverterOptions, RenderError, convert, create_converter, extract_headings, parse_sections,
    sanitize_html, unwrap_table_wrappers,
};
use crate::application::repos::{ContentStore, FileSaver, RepoError};
use crate::application::template::{RenderFailure, RenderSession, TemplateSpec};
use crate::application::view::{RenderView, assemble};
use crate::domain::document::{FileItem, content_key};
use crate::domain::headings::{OrphanPolicy, build_forest_with};

pub const EXPORT_MIME: &str = "text/plain;charset=utf-8";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Load(#[from] RepoError),
    #[error(transparent)]
    Conversion(#[from] RenderError),
    #[error(transparent)]
    Render(#[from] RenderFailure),
}

#[derive(Clone)]
pub struct ExportService {
    store: Arc<dyn ContentStore>,
    saver: Arc<dyn FileSaver>,
    session: RenderSession,
    orphans: OrphanPolicy,
}

impl ExportService {
    pub fn new(
        store: Arc<dyn ContentStore>,
        saver: Arc<dyn FileSaver>,
        session: RenderSession,
    ) -> Self {
        Self {
            store,
            saver,
            session,
            orphans: OrphanPolicy::default(),
        }
    }

    pub fn with_orphan_policy(mut self, orphans: OrphanPolicy) -> Self {
        self.orphans = orphans;
        self
    }

    /// Render a stored file through `template`, or the raw-text default.
    pub async fn apply_template(
        &self,
        file_id: &str,
        template: Option<&TemplateSpec>,
    ) -> Result<String, ExportError> {
        self.apply_template_with_cancel(file_id, template, &CancellationToken::new())
            .await
    }

    pub async fn apply_template_with_cancel(
        &self,
        file_id: &str,
        template: Option<&TemplateSpec>,
        cancel: &CancellationToken,
    ) -> Result<String, ExportError> {
        let (_, rendered) = self.render_file(file_id, template, cancel).await?;
        Ok(rendered)
    }

    /// Render a file and hand the result to the saver as `<name>.<extension>`.
    /// Nothing is saved when any step fails.
    pub async fn export_to_disk(
        &self,
        file_id: &str,
        extension: &str,
        template: Option<&TemplateSpec>,
    ) -> Result<(), ExportError> {
        self.export_to_disk_with_cancel(file_id, extension, template, &CancellationToken::new())
            .await
    }

    pub async fn export_to_disk_with_cancel(
        &self,
        file_id: &str,
        extension: &str,
        template: Option<&TemplateSpec>,
        cancel: &CancellationToken,
    ) -> Result<(), ExportError> {
        let (file, rendered) = self.render_file(file_id, template, cancel).await?;
        let name = format!("{}.{extension}", file.name);

        info!(
            target = "application::export",
            op = "export_to_disk",
            file_id,
            name = name.as_str(),
            bytes = rendered.len(),
            "Saving export"
        );
        self.saver.save(rendered.into_bytes(), EXPORT_MIME, &name);
        Ok(())
    }

    async fn render_file(
        &self,
        file_id: &str,
        template: Option<&TemplateSpec>,
        cancel: &CancellationToken,
    ) -> Result<(FileItem, String), ExportError> {
        let started_at = Instant::now();
        let (file, view) = self.build_view(file_id).await?;
        let spec = template.cloned().unwrap_or_default();

        let rendered = self
            .session
            .render_with_cancel(spec, view, cancel)
            .await
            .into_result()
            .inspect_err(|failure| {
                warn!(
                    target = "application::export",
                    op = "apply_template",
                    result = "error",
                    file_id,
                    kind = failure.kind.as_str(),
                    error = %failure,
                    "Template render failed"
                );
            })?;

        info!(
            target = "application::export",
            op = "apply_template",
            result = "success",
            file_id,
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            output_bytes = rendered.len(),
            "Template applied"
        );
        Ok((file, rendered))
    }

    async fn build_view(&self, file_id: &str) -> Result<(FileItem, RenderView), ExportError> {
        let file = self.store.file(file_id).await?;
        let content = self.store.load_item(&content_key(file_id)).await?;
        let properties = compute_properties(&content.properties);

        let converter = create_converter(ConverterOptions::from_properties(&properties));
        let parsed = parse_sections(&converter, &content.text);
        let converted = convert(&parsed)?;
        let html: String = converted
            .html_section_list
            .iter()
            .map(|section| sanitize_html(section))
            .collect();

        let html = unwrap_table_wrappers(&html)?;
        let headings = extract_headings(&html)?;
        let toc = build_forest_with(&headings, self.orphans);

        let view = assemble(
            &file.name,
            content.text,
            properties,
            content.properties,
            html,
            toc,
        );
        Ok((file, view))
    }
}
