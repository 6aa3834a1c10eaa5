//! Session management and the turn loop.

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::history::ConversationHistory;
use crate::model::{Backend, Message, ModelError, ModelRequest, Usage};
use crate::tools::{Executor, Registry, ToolHost};
use crate::{Error, Result};

/// A unique identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the turn loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Idle, waiting for the next prompt.
    AwaitingUserInput,
    /// One gateway call is in flight.
    ModelRequested,
    /// The model asked for tools that have not started yet.
    ToolsPending,
    /// The executor is running the current batch.
    ToolsExecuting,
    /// The model produced a tool-call-free answer. Held until the next prompt.
    Terminal,
}

/// Per-session behaviour of the turn loop.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Static instruction prepended to every prompt as `"{instruction}. {prompt}"`.
    pub instruction: Option<String>,
    /// Cap on gateway calls per prompt. `None` loops until the model stops
    /// asking for tools.
    pub max_rounds: Option<usize>,
    /// Keep turns from earlier prompts in the context. Off by default, so
    /// every prompt starts from an empty history.
    pub retain_history: bool,
}

/// Final answer to one prompt.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    /// Gateway calls made for this prompt.
    pub rounds: usize,
    /// Tool calls executed for this prompt.
    pub tool_calls: usize,
    pub usage: Usage,
}

/// A conversation session.
///
/// Owns the model gateway, the tool host, the executor and the history for
/// one conversation. Prompts are processed one at a time: `chat` borrows the
/// session mutably until the answer (or a fatal error) is ready.
pub struct Session<B, H = Registry> {
    pub id: SessionId,
    backend: B,
    tools: H,
    executor: Executor,
    history: ConversationHistory,
    config: SessionConfig,
    state: State,
}

impl<B: Backend, H: ToolHost> Session<B, H> {
    /// Create a new session with the given gateway and tools.
    pub fn new(backend: B, tools: H) -> Self {
        let id = SessionId::new();
        info!(session = %id, tools = tools.specs().len(), "session started");

        Self {
            id,
            backend,
            tools,
            executor: Executor::default(),
            history: ConversationHistory::new(),
            config: SessionConfig::default(),
            state: State::AwaitingUserInput,
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the static instruction prefix.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.config.instruction = Some(instruction.into());
        self
    }

    /// Cap the number of gateway calls per prompt.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.config.max_rounds = Some(max_rounds);
        self
    }

    /// Keep context across prompts.
    pub fn retain_history(mut self, retain: bool) -> Self {
        self.config.retain_history = retain;
        self
    }

    /// Use a custom executor (timeouts, sequential batches).
    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Drop all turns.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Answer one user prompt, running as many tool rounds as the model asks for.
    ///
    /// On error the round is abandoned and the history is rolled back to where
    /// it was before the prompt.
    #[instrument(skip_all, fields(session = %self.id))]
    pub async fn chat(&mut self, prompt: &str) -> Result<Reply> {
        if prompt.trim().is_empty() {
            return Err(Error::InvalidState("empty prompt".into()));
        }
        if self.state == State::Terminal {
            self.transition(State::AwaitingUserInput);
        }

        if !self.config.retain_history {
            self.history.clear();
        }
        let checkpoint = self.history.len();

        let result = self.run(prompt).await;
        if let Err(err) = &result {
            tracing::error!(error = %err, "round aborted");
            self.history.truncate(checkpoint);
            self.transition(State::AwaitingUserInput);
        }
        result
    }

    async fn run(&mut self, prompt: &str) -> Result<Reply> {
        let text = match &self.config.instruction {
            Some(instruction) => format!("{instruction}. {prompt}"),
            None => prompt.to_string(),
        };
        info!(prompt, "user prompt");
        self.history.push(Message::user(text));

        let mut rounds = 0;
        let mut tool_calls = 0;
        let mut usage = Usage::default();

        loop {
            if let Some(limit) = self.config.max_rounds {
                if rounds >= limit {
                    return Err(Error::RoundLimit { limit });
                }
            }

            self.transition(State::ModelRequested);
            rounds += 1;
            let response = self
                .backend
                .call(ModelRequest {
                    messages: self.history.turns(),
                    tools: self.tools.specs(),
                })
                .await?;
            usage += response.usage;

            let message = response.message;
            if message.parts.is_empty() {
                return Err(ModelError::MalformedResponse("response has no parts".into()).into());
            }

            let calls = message.tool_calls();
            if calls.is_empty() {
                let text = message.text();
                self.history.push(message);
                self.transition(State::Terminal);
                info!(rounds, tool_calls, "final answer");
                return Ok(Reply {
                    text,
                    rounds,
                    tool_calls,
                    usage,
                });
            }

            self.history.push(message);
            self.transition(State::ToolsPending);
            debug!(round = rounds, count = calls.len(), "model requested tools");

            self.transition(State::ToolsExecuting);
            let results = self.executor.execute_batch(&self.tools, &calls).await?;
            tool_calls += results.len();
            self.history.push(Message::tool_results(results));
        }
    }

    fn transition(&mut self, next: State) {
        debug!(from = ?self.state, to = ?next, "state");
        self.state = next;
    }

    /// End the session, discarding its history.
    pub fn end(self) {
        info!(session = %self.id, turns = self.history.len(), "session ended");
    }
}
