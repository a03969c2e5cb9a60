//! Single-use template render sessions.
//!
//! Every render starts a fresh [`RenderUnit`], posts one request, and waits
//! for one reply while racing a deadline and the caller's cancellation
//! token. Whichever finishes first decides the outcome; the unit is torn
//! down afterwards in every case, so a late reply is never observed.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::application::view::RenderView;

use super::protocol;
use super::types::{DEFAULT_RENDER_TIMEOUT, RenderFailure, RenderOutcome, TemplateSpec};

/// An isolated execution unit that serves exactly one render request.
#[async_trait]
pub trait RenderUnit: Send {
    /// Deliver the serialized request.
    async fn post(&mut self, request: String) -> Result<(), RenderFailure>;

    /// Wait for the serialized reply.
    async fn recv(&mut self) -> Result<String, RenderFailure>;

    /// Stop the unit and release its resources. Must be safe to call after
    /// the unit already exited.
    async fn terminate(&mut self);
}

/// Starts fresh render units. Units are never pooled or reused.
#[async_trait]
pub trait UnitLauncher: Send + Sync {
    fn name(&self) -> &'static str;

    async fn launch(&self) -> Result<Box<dyn RenderUnit>, RenderFailure>;
}

#[derive(Clone)]
pub struct RenderSession {
    launcher: Arc<dyn UnitLauncher>,
    timeout: Duration,
}

impl RenderSession {
    pub fn new(launcher: Arc<dyn UnitLauncher>) -> Self {
        Self {
            launcher,
            timeout: DEFAULT_RENDER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn render(&self, spec: TemplateSpec, view: RenderView) -> RenderOutcome {
        self.render_with_cancel(spec, view, &CancellationToken::new())
            .await
    }

    /// Render `view` through `spec`, giving up when `cancel` fires.
    pub async fn render_with_cancel(
        &self,
        spec: TemplateSpec,
        view: RenderView,
        cancel: &CancellationToken,
    ) -> RenderOutcome {
        let started_at = Instant::now();

        if cancel.is_cancelled() {
            return self.finish(RenderOutcome::Failure(RenderFailure::cancelled()), started_at);
        }

        let request = match protocol::encode_request(&spec, &view) {
            Ok(request) => request,
            Err(err) => {
                return self.finish(
                    RenderOutcome::Failure(RenderFailure::worker(format!(
                        "failed to encode render request: {err}"
                    ))),
                    started_at,
                );
            }
        };
        drop((spec, view));

        let mut unit = match self.launcher.launch().await {
            Ok(unit) => unit,
            Err(failure) => return self.finish(RenderOutcome::Failure(failure), started_at),
        };

        let outcome = tokio::select! {
            biased;
            reply = exchange(unit.as_mut(), request) => match reply {
                Ok(raw) => protocol::interpret_reply(&raw),
                Err(failure) => RenderOutcome::Failure(failure),
            },
            failure = interrupted(self.timeout, cancel) => RenderOutcome::Failure(failure),
        };

        unit.terminate().await;
        self.finish(outcome, started_at)
    }

    fn finish(&self, outcome: RenderOutcome, started_at: Instant) -> RenderOutcome {
        let elapsed_ms = started_at.elapsed().as_millis() as u64;
        match &outcome {
            RenderOutcome::Success(text) => info!(
                target = "application::template::session",
                op = "render",
                result = "success",
                launcher = self.launcher.name(),
                elapsed_ms,
                output_bytes = text.len(),
                "Template rendered"
            ),
            RenderOutcome::Failure(failure) => warn!(
                target = "application::template::session",
                op = "render",
                result = failure.kind.as_str(),
                launcher = self.launcher.name(),
                elapsed_ms,
                error = %failure,
                "Template render failed"
            ),
        }
        outcome
    }
}

async fn exchange(unit: &mut dyn RenderUnit, request: String) -> Result<String, RenderFailure> {
    unit.post(request).await?;
    unit.recv().await
}

/// Resolves when either the deadline passes or the caller cancels.
async fn interrupted(timeout: Duration, cancel: &CancellationToken) -> RenderFailure {
    tokio::select! {
        _ = tokio::time::sleep(timeout) => RenderFailure::timeout(),
        _ = cancel.cancelled() => RenderFailure::cancelled(),
    }
}
