//! Model gateway adapters.
//!
//! Each provider implements [`Backend`](crate::model::Backend) for its API.

mod gemini;

pub use gemini::{
    DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiAuth, GeminiBackend,
    GeminiBackendBuilder,
};
