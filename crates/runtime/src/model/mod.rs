//! Conversation types, tool schemas and the model gateway trait.

pub mod errors;
pub mod schema;
pub mod types;

pub use errors::ModelError;
pub use schema::{Schema, SchemaType};
pub use types::{
    Backend, Message, ModelRequest, ModelResponse, Part, Role, ToolCall, ToolDeclaration,
    ToolOutcome, ToolResult, Usage,
};
