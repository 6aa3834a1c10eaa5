//! Empty tool host implementation.

use crate::model::{ToolCall, ToolDeclaration};
use crate::tools::{ToolError, ToolHost};
use serde_json::Value;

/// A no-op tool host with no tools.
///
/// Sessions using it behave like a plain chat: every model reply is terminal
/// unless the model hallucinates a call, which fails as an unknown tool.
#[derive(Debug, Default)]
pub struct EmptyToolHost;

impl ToolHost for EmptyToolHost {
    fn specs(&self) -> &[ToolDeclaration] {
        &[]
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        Err(ToolError::NotFound(call.name.clone()))
    }
}
