//! Deckhand runtime: the function-calling turn loop.
//!
//! This crate wires a language model to local tools. The model proposes
//! tool calls, the runtime executes them and feeds the results back until
//! the model answers in plain text.
//!
//! # Overview
//!
//! - **Registry**: binds tool names to declarations and handlers.
//! - **Executor**: runs the calls of one model response, concurrently and in
//!   call order.
//! - **Session**: owns the history and drives the round loop.
//! - **Backend**: the model gateway, implemented for Gemini in [`providers`].
//!
//! # Example
//!
//! ```ignore
//! use runtime::{GeminiAuth, GeminiBackend, Registry, Session};
//!
//! # async fn example() -> runtime::Result<()> {
//! let backend = GeminiBackend::builder(GeminiAuth::ApiKey("...".into()), "gemini-1.5-flash-latest")
//!     .temperature(0.0)
//!     .build();
//! let tools = Registry::new();
//!
//! let mut session = Session::new(backend, tools);
//! let reply = session.chat("What is the time in Cali, Colombia?").await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

mod error;
pub mod history;
pub mod model;
pub mod providers;
mod session;
pub mod tools;

pub use error::{Error, Result};
pub use history::ConversationHistory;
pub use model::{
    Backend, Message, ModelError, ModelRequest, ModelResponse, Part, Role, Schema, SchemaType,
    ToolCall, ToolDeclaration, ToolOutcome, ToolResult, Usage,
};
pub use providers::{GeminiAuth, GeminiBackend, GeminiBackendBuilder};
pub use session::{Reply, Session, SessionConfig, SessionId, State};
pub use tools::{
    EmptyToolHost, Executor, NoArgs, Registry, Tool, ToolError, ToolHandler, ToolHost, handler_fn,
};
