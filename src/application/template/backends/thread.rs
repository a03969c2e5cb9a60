use std::{sync::mpsc, thread};

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::debug;

use crate::application::template::session::{RenderUnit, UnitLauncher};
use crate::application::template::types::RenderFailure;
use crate::application::template::worker;

/// Runs each render on a dedicated OS thread. Messages still cross the
/// boundary as serialized JSON.
///
/// A thread cannot be killed: teardown detaches it and drops both channel
/// ends, so a runaway render keeps its thread until it finishes but its reply
/// is discarded. Prefer [`super::ProcessLauncher`] for untrusted templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadLauncher;

struct ThreadUnit {
    request_tx: Option<mpsc::Sender<String>>,
    reply_rx: Option<oneshot::Receiver<String>>,
}

#[async_trait]
impl UnitLauncher for ThreadLauncher {
    fn name(&self) -> &'static str {
        "thread"
    }

    async fn launch(&self) -> Result<Box<dyn RenderUnit>, RenderFailure> {
        let (request_tx, request_rx) = mpsc::channel::<String>();
        let (reply_tx, reply_rx) = oneshot::channel::<String>();

        thread::Builder::new()
            .name("mdexport-render".to_string())
            .spawn(move || {
                let Ok(request) = request_rx.recv() else {
                    return;
                };
                let reply = worker::handle_request(&request);
                if reply_tx.send(reply).is_err() {
                    debug!(
                        target = "application::template::thread",
                        "Render thread finished after teardown; reply discarded"
                    );
                }
            })
            .map_err(|err| RenderFailure::worker(format!("failed to start render thread: {err}")))?;

        Ok(Box::new(ThreadUnit {
            request_tx: Some(request_tx),
            reply_rx: Some(reply_rx),
        }))
    }
}

#[async_trait]
impl RenderUnit for ThreadUnit {
    async fn post(&mut self, request: String) -> Result<(), RenderFailure> {
        let sender = self
            .request_tx
            .take()
            .ok_or_else(|| RenderFailure::worker("render thread already received a request"))?;
        sender
            .send(request)
            .map_err(|_| RenderFailure::worker("render thread exited before the request"))
    }

    async fn recv(&mut self) -> Result<String, RenderFailure> {
        let receiver = self
            .reply_rx
            .as_mut()
            .ok_or_else(|| RenderFailure::worker("render thread already torn down"))?;
        receiver
            .await
            .map_err(|_| RenderFailure::worker("render thread exited without replying"))
    }

    async fn terminate(&mut self) {
        self.request_tx.take();
        self.reply_rx.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::application::template::session::RenderSession;
    use crate::application::template::types::{RenderOutcome, TemplateSpec};
    use crate::application::view::{RenderView, assemble};
    use crate::application::properties::Properties;

    fn view() -> RenderView {
        assemble(
            "notes",
            "hello".to_string(),
            Properties::new(),
            String::new(),
            "<p>hello</p>".to_string(),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn renders_through_a_dedicated_thread() {
        let session = RenderSession::new(Arc::new(ThreadLauncher));
        let outcome = session.render(TemplateSpec::default(), view()).await;
        assert_eq!(outcome, RenderOutcome::Success("hello".to_string()));
    }

    #[tokio::test]
    async fn template_errors_cross_the_thread_boundary() {
        let session = RenderSession::new(Arc::new(ThreadLauncher));
        let outcome = session
            .render(TemplateSpec::new("{{#each}}", ""), view())
            .await;
        assert!(matches!(outcome, RenderOutcome::Failure(_)));
    }

    #[tokio::test]
    async fn terminated_unit_rejects_requests() {
        let mut unit = ThreadLauncher.launch().await.expect("launch");
        unit.terminate().await;
        assert!(unit.post("[]".to_string()).await.is_err());
    }
}
