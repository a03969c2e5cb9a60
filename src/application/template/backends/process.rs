use std::{ffi::OsString, io, path::PathBuf, process::Stdio};

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    process::{Child, ChildStdin, ChildStdout, Command},
};
use tracing::{debug, warn};

use crate::application::template::session::{RenderUnit, UnitLauncher};
use crate::application::template::types::RenderFailure;

/// Subcommand that turns the binary into a single-use render worker.
pub const WORKER_SUBCOMMAND: &str = "render-worker";

/// Runs each render in a child process speaking line-delimited JSON over
/// stdio. Teardown kills the child.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ProcessLauncher {
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Re-execute the running binary as `render-worker`.
    pub fn current_exe() -> io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?, [WORKER_SUBCOMMAND]))
    }
}

struct ProcessUnit {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

#[async_trait]
impl UnitLauncher for ProcessLauncher {
    fn name(&self) -> &'static str {
        "process"
    }

    async fn launch(&self) -> Result<Box<dyn RenderUnit>, RenderFailure> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                warn!(
                    target = "application::template::process",
                    op = "launch",
                    result = "error",
                    program = %self.program.display(),
                    error = %err,
                    "Failed to spawn render worker"
                );
                RenderFailure::worker(format!("failed to start render worker: {err}"))
            })?;

        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RenderFailure::worker("render worker has no stdout"))?;

        debug!(
            target = "application::template::process",
            op = "launch",
            pid = child.id(),
            "Render worker started"
        );

        Ok(Box::new(ProcessUnit {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        }))
    }
}

#[async_trait]
impl RenderUnit for ProcessUnit {
    async fn post(&mut self, request: String) -> Result<(), RenderFailure> {
        // Closing stdin after the request tells the worker no more will follow.
        let mut stdin = self
            .stdin
            .take()
            .ok_or_else(|| RenderFailure::worker("render worker already received a request"))?;
        let write = async {
            stdin.write_all(request.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
            stdin.flush().await
        };
        write
            .await
            .map_err(|err| RenderFailure::worker(format!("failed to send render request: {err}")))
    }

    async fn recv(&mut self) -> Result<String, RenderFailure> {
        let mut line = String::new();
        let read = self
            .stdout
            .read_line(&mut line)
            .await
            .map_err(|err| RenderFailure::worker(format!("failed to read render reply: {err}")))?;
        if read == 0 {
            return Err(RenderFailure::worker("render worker exited without replying"));
        }
        Ok(line)
    }

    async fn terminate(&mut self) {
        self.stdin.take();
        if let Err(err) = self.child.start_kill() {
            debug!(
                target = "application::template::process",
                op = "terminate",
                error = %err,
                "Render worker already exited"
            );
        }
        match self.child.wait().await {
            Ok(status) => debug!(
                target = "application::template::process",
                op = "terminate",
                status = %status,
                "Render worker reaped"
            ),
            Err(err) => warn!(
                target = "application::template::process",
                op = "terminate",
                error = %err,
                "Failed to reap render worker"
            ),
        }
    }
}
