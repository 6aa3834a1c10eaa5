//! Name-keyed tool registry.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::model::{ToolCall, ToolDeclaration};
use crate::tools::host::TypedHandler;
use crate::tools::{Tool, ToolError, ToolHandler, ToolHost};

/// Binds tool names to declarations and handlers.
///
/// Declarations are exported in registration order so requests to the model
/// are reproducible.
#[derive(Default)]
pub struct Registry {
    specs: Vec<ToolDeclaration>,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an untyped handler under the declaration's name.
    pub fn register(
        &mut self,
        declaration: ToolDeclaration,
        handler: impl ToolHandler + 'static,
    ) -> Result<(), ToolError> {
        self.insert(declaration, Arc::new(handler))
    }

    /// Register a typed tool.
    pub fn register_tool<T: Tool>(&mut self, tool: T) -> Result<(), ToolError> {
        let declaration = tool.declaration();
        self.insert(declaration, Arc::new(TypedHandler(tool)))
    }

    /// Builder-style [`register_tool`](Self::register_tool).
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Result<Self, ToolError> {
        self.register_tool(tool)?;
        Ok(self)
    }

    fn insert(
        &mut self,
        declaration: ToolDeclaration,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), ToolError> {
        if self.handlers.contains_key(&declaration.name) {
            return Err(ToolError::Duplicate(declaration.name));
        }
        debug!(tool = %declaration.name, "registered tool");
        self.handlers.insert(declaration.name.clone(), handler);
        self.specs.push(declaration);
        Ok(())
    }

    /// Look up a handler by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field(
                "tools",
                &self.specs.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ToolHost for Registry {
    fn specs(&self) -> &[ToolDeclaration] {
        &self.specs
    }

    fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let handler = self
            .lookup(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;
        handler.invoke(call.args.clone()).await
    }
}
