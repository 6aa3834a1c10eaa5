//! Tool host and handler traits.

use crate::model::{ToolCall, ToolDeclaration};
use crate::tools::ToolError;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;

/// Trait for tool execution hosts.
///
/// Implementations provide tool declarations and execute tool calls.
/// This is the boundary between the turn loop and side effects.
pub trait ToolHost: Send + Sync {
    /// Declarations submitted to the model, in a stable order.
    fn specs(&self) -> &[ToolDeclaration];

    /// Whether a tool with this name can be executed.
    fn contains(&self, name: &str) -> bool {
        self.specs().iter().any(|spec| spec.name == name)
    }

    /// Execute a tool call.
    fn execute(&self, call: &ToolCall) -> impl Future<Output = Result<Value, ToolError>> + Send;
}

/// An untyped, object-safe tool handler stored in the registry.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn invoke(&self, args: Value) -> Result<Value, ToolError>;
}

/// A strongly typed tool.
///
/// The registry wraps implementors into a [`ToolHandler`] that decodes the
/// model's arguments into `Args` and encodes `Output` back to JSON, so each
/// tool is checked against its own Rust types instead of raw JSON.
pub trait Tool: Send + Sync + 'static {
    type Args: DeserializeOwned + Send;
    type Output: Serialize;

    /// Declaration sent to the model.
    fn declaration(&self) -> ToolDeclaration;

    /// Run the tool.
    fn call(&self, args: Self::Args)
    -> impl Future<Output = Result<Self::Output, ToolError>> + Send;
}

/// Arguments for tools that take none.
#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
pub struct NoArgs {}

/// Adapter from [`Tool`] to [`ToolHandler`].
pub(crate) struct TypedHandler<T>(pub(crate) T);

#[async_trait]
impl<T: Tool> ToolHandler for TypedHandler<T> {
    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let args = decode_args::<T::Args>(args)?;
        let output = self.0.call(args).await?;
        serde_json::to_value(output)
            .map_err(|e| ToolError::Execution(format!("serialize result: {e}")))
    }
}

/// Handler built from an async closure over raw JSON arguments.
pub struct FnHandler<F>(F);

/// Wrap an async closure as a [`ToolHandler`].
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ToolError>> + Send,
{
    FnHandler(f)
}

#[async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ToolError>> + Send,
{
    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        (self.0)(args).await
    }
}

/// Decode model arguments into a typed value.
///
/// Models omit `args` for zero-argument calls, so `null` decodes as `{}`.
fn decode_args<A: DeserializeOwned>(args: Value) -> Result<A, ToolError> {
    let args = match args {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(args).map_err(|e| ToolError::InvalidInput(e.to_string()))
}
