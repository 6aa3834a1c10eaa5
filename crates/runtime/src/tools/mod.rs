//! Tool registry, execution and the host seam.

mod empty;
pub mod errors;
mod executor;
mod host;
mod registry;

pub use empty::EmptyToolHost;
pub use errors::ToolError;
pub use executor::Executor;
pub use host::{FnHandler, NoArgs, Tool, ToolHandler, ToolHost, handler_fn};
pub use registry::Registry;
