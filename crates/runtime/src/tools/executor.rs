//! Tool call execution.

use std::time::Duration;

use futures::future::join_all;
use tracing::{info, warn};

use crate::model::{ToolCall, ToolResult};
use crate::tools::{ToolError, ToolHost};
use crate::{Error, Result};

/// Runs model-issued tool calls against a [`ToolHost`].
///
/// Unknown tool names are fatal and surface as [`Error::UnknownTool`].
/// Every other failure is captured into a [`ToolResult`] carrying the error
/// message, so the model can correct itself on the next round.
#[derive(Debug, Clone)]
pub struct Executor {
    timeout: Option<Duration>,
    parallel: bool,
}

impl Default for Executor {
    fn default() -> Self {
        Self {
            timeout: None,
            parallel: true,
        }
    }
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how long a single call may run.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run the calls of one batch concurrently (default) or one at a time.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Execute a single call.
    pub async fn execute<H: ToolHost>(&self, host: &H, call: &ToolCall) -> Result<ToolResult> {
        if !host.contains(&call.name) {
            return Err(Error::UnknownTool(call.name.clone()));
        }
        Ok(self.run(host, call).await)
    }

    /// Execute every call of one model response.
    ///
    /// All names are resolved before any handler runs, so an unknown tool
    /// aborts the batch without side effects. Results come back in call order.
    pub async fn execute_batch<H: ToolHost>(
        &self,
        host: &H,
        calls: &[ToolCall],
    ) -> Result<Vec<ToolResult>> {
        if let Some(call) = calls.iter().find(|call| !host.contains(&call.name)) {
            return Err(Error::UnknownTool(call.name.clone()));
        }

        if self.parallel {
            return Ok(join_all(calls.iter().map(|call| self.run(host, call))).await);
        }

        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.run(host, call).await);
        }
        Ok(results)
    }

    async fn run<H: ToolHost>(&self, host: &H, call: &ToolCall) -> ToolResult {
        info!(tool = %call.name, args = %call.args, "tool call");

        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, host.execute(call))
                .await
                .unwrap_or_else(|_| Err(ToolError::Timeout(limit.as_millis() as u64))),
            None => host.execute(call).await,
        };

        match outcome {
            Ok(output) => ToolResult::success(&call.name, output),
            Err(err) => {
                warn!(tool = %call.name, error = %err, "tool call failed");
                ToolResult::error(&call.name, err.to_string())
            }
        }
    }
}
