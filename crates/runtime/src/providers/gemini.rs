//! Gemini `generateContent` backend.

use crate::model::{
    Backend, Message, ModelError, ModelRequest, ModelResponse, Part, Role, ToolCall,
    ToolDeclaration, ToolOutcome, Usage,
};
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Authentication mode for the Gemini API.
#[derive(Debug, Clone)]
pub enum GeminiAuth {
    /// API key from Google AI Studio.
    ApiKey(String),
    /// OAuth access token.
    Bearer(String),
}

impl std::fmt::Display for GeminiAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => write!(f, "api_key"),
            Self::Bearer(_) => write!(f, "bearer"),
        }
    }
}

impl GeminiAuth {
    fn apply_headers(&self, req: RequestBuilder) -> RequestBuilder {
        match self {
            Self::ApiKey(key) => req.header("x-goog-api-key", key),
            Self::Bearer(token) => req.header("Authorization", format!("Bearer {token}")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// API Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: Vec<ApiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ApiTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<ApiGenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiTool<'a> {
    function_declarations: &'a [ToolDeclaration],
}

#[derive(Debug, Serialize)]
struct ApiGenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ApiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<ApiPart>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<ApiFunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<ApiFunctionResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<ApiPromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCandidate {
    #[serde(default)]
    content: Option<ApiCandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidateContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend Implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for creating a Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiBackendBuilder {
    auth: GeminiAuth,
    model: String,
    base_url: String,
    api_version: String,
    temperature: Option<f32>,
    system: Option<String>,
}

impl GeminiBackendBuilder {
    pub fn new(auth: GeminiAuth, model: impl Into<String>) -> Self {
        Self {
            auth,
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            temperature: None,
            system: None,
        }
    }

    /// Point the client at another host (proxies, tests).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Static system instruction sent with every request.
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn build(self) -> GeminiBackend {
        GeminiBackend {
            client: reqwest::Client::new(),
            auth: self.auth,
            model: self.model,
            base_url: self.base_url,
            api_version: self.api_version,
            temperature: self.temperature,
            system: self.system,
        }
    }
}

/// Gemini API backend.
pub struct GeminiBackend {
    client: reqwest::Client,
    auth: GeminiAuth,
    model: String,
    base_url: String,
    api_version: String,
    temperature: Option<f32>,
    system: Option<String>,
}

impl GeminiBackend {
    pub fn builder(auth: GeminiAuth, model: impl Into<String>) -> GeminiBackendBuilder {
        GeminiBackendBuilder::new(auth, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url, self.api_version, self.model
        )
    }

    fn role_to_api(role: Role) -> &'static str {
        match role {
            Role::User => "user",
            Role::Model => "model",
            Role::Tool => "function",
        }
    }

    fn message_to_api(msg: &Message) -> ApiContent {
        let parts = msg
            .parts
            .iter()
            .map(|part| match part {
                Part::Text { text } => ApiPart {
                    text: Some(text.clone()),
                    ..Default::default()
                },
                Part::ToolCall(call) => ApiPart {
                    function_call: Some(ApiFunctionCall {
                        name: call.name.clone(),
                        args: call.args.clone(),
                    }),
                    ..Default::default()
                },
                Part::ToolResult(result) => {
                    let response = match &result.outcome {
                        ToolOutcome::Success { output } => json!({ "content": output }),
                        ToolOutcome::Error { message } => json!({ "error": message }),
                    };
                    ApiPart {
                        function_response: Some(ApiFunctionResponse {
                            name: result.name.clone(),
                            response,
                        }),
                        ..Default::default()
                    }
                }
            })
            .collect();

        ApiContent {
            role: Some(Self::role_to_api(msg.role)),
            parts,
        }
    }

    fn build_request<'a>(&self, request: &ModelRequest<'a>) -> ApiRequest<'a> {
        let tools = if request.tools.is_empty() {
            Vec::new()
        } else {
            vec![ApiTool {
                function_declarations: request.tools,
            }]
        };

        ApiRequest {
            contents: request.messages.iter().map(Self::message_to_api).collect(),
            system_instruction: self.system.as_ref().map(|s| ApiContent {
                role: None,
                parts: vec![ApiPart {
                    text: Some(s.clone()),
                    ..Default::default()
                }],
            }),
            tools,
            generation_config: self
                .temperature
                .map(|temperature| ApiGenerationConfig { temperature }),
        }
    }

    /// Validate the response shape and convert the first candidate.
    fn response_to_message(response: ApiResponse) -> Result<Message, ModelError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!(" (blocked: {r})"))
                .unwrap_or_default();
            return Err(ModelError::MalformedResponse(format!("no candidates{reason}")));
        };

        let api_parts = candidate.content.map(|c| c.parts).unwrap_or_default();
        if api_parts.is_empty() {
            let reason = candidate
                .finish_reason
                .map(|r| format!(" (finish reason: {r})"))
                .unwrap_or_default();
            return Err(ModelError::MalformedResponse(format!("no parts{reason}")));
        }

        let parts: Vec<Part> = api_parts
            .into_iter()
            .filter_map(|part| {
                if let Some(call) = part.function_call {
                    Some(Part::ToolCall(ToolCall::new(call.name, call.args)))
                } else {
                    part.text.map(Part::text)
                }
            })
            .collect();

        if parts.is_empty() {
            return Err(ModelError::MalformedResponse(
                "no text or function call parts".into(),
            ));
        }

        Ok(Message::model(parts))
    }
}

impl std::fmt::Display for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gemini({}, auth={})", self.model, self.auth)
    }
}

impl Backend for GeminiBackend {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        let api_request = self.build_request(&request);
        debug!(
            model = %self.model,
            turns = request.messages.len(),
            tools = request.tools.len(),
            "generateContent"
        );

        let req = self
            .client
            .post(self.endpoint())
            .header("content-type", "application/json")
            .header("accept", "application/json");

        let req = self.auth.apply_headers(req);

        let response = req
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api(format!("{status}: {body}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        let usage = api_response
            .usage_metadata
            .as_ref()
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();
        let message = Self::response_to_message(api_response)?;

        Ok(ModelResponse { message, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Schema, ToolResult};

    fn backend() -> GeminiBackend {
        GeminiBackend::builder(GeminiAuth::ApiKey("test".into()), "gemini-test")
            .temperature(0.0)
            .system("Be brief")
            .build()
    }

    fn parse(body: Value) -> Result<Message, ModelError> {
        GeminiBackend::response_to_message(serde_json::from_value(body).unwrap())
    }

    #[test]
    fn auth_display() {
        assert_eq!(GeminiAuth::ApiKey("k".into()).to_string(), "api_key");
        assert_eq!(GeminiAuth::Bearer("t".into()).to_string(), "bearer");
    }

    #[test]
    fn endpoint_includes_version_and_model() {
        let backend = GeminiBackend::builder(GeminiAuth::ApiKey("k".into()), "gemini-pro")
            .base_url("http://localhost:9999/")
            .build();
        assert_eq!(
            backend.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn request_carries_history_tools_and_config() {
        let messages = vec![
            Message::user("What is the time in Cali, Colombia?"),
            Message::model(vec![Part::ToolCall(ToolCall::new(
                "getCurrentTime",
                json!({"timeZone": "America/Bogota"}),
            ))]),
            Message::tool_results(vec![
                ToolResult::success("getCurrentTime", json!("5/1/2024 9:00:00 AM")),
                ToolResult::error("getCurrentTime", "bad zone"),
            ]),
        ];
        let tools = vec![
            ToolDeclaration::new("getCurrentTime", "Get the current time").with_parameters(
                Schema::object()
                    .property("timeZone", Schema::string())
                    .require(["timeZone"]),
            ),
        ];
        let request = ModelRequest {
            messages: &messages,
            tools: &tools,
        };

        let body = serde_json::to_value(backend().build_request(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "What is the time in Cali, Colombia?"}]},
                    {"role": "model", "parts": [{"functionCall": {
                        "name": "getCurrentTime",
                        "args": {"timeZone": "America/Bogota"}
                    }}]},
                    {"role": "function", "parts": [
                        {"functionResponse": {
                            "name": "getCurrentTime",
                            "response": {"content": "5/1/2024 9:00:00 AM"}
                        }},
                        {"functionResponse": {
                            "name": "getCurrentTime",
                            "response": {"error": "bad zone"}
                        }}
                    ]}
                ],
                "systemInstruction": {"parts": [{"text": "Be brief"}]},
                "tools": [{"functionDeclarations": [{
                    "name": "getCurrentTime",
                    "description": "Get the current time",
                    "parameters": {
                        "type": "OBJECT",
                        "properties": {"timeZone": {"type": "STRING"}},
                        "required": ["timeZone"]
                    }
                }]}],
                "generationConfig": {"temperature": 0.0}
            })
        );
    }

    #[test]
    fn request_omits_empty_tools() {
        let messages = vec![Message::user("hi")];
        let request = ModelRequest {
            messages: &messages,
            tools: &[],
        };
        let plain = GeminiBackend::builder(GeminiAuth::ApiKey("k".into()), "m").build();
        let body = serde_json::to_value(plain.build_request(&request)).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("generationConfig").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn parses_parallel_function_calls_in_order() {
        let message = parse(json!({
            "candidates": [{"content": {"role": "model", "parts": [
                {"functionCall": {"name": "createFile", "args": {"filePath": "a.js"}}},
                {"functionCall": {"name": "createFile", "args": {"filePath": "b.js"}}}
            ]}}]
        }))
        .unwrap();

        let paths: Vec<_> = message
            .tool_calls()
            .into_iter()
            .map(|c| c.args["filePath"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(paths, ["a.js", "b.js"]);
    }

    #[test]
    fn missing_args_default_to_null() {
        let message = parse(json!({
            "candidates": [{"content": {"parts": [{"functionCall": {"name": "getTables"}}]}}]
        }))
        .unwrap();
        assert_eq!(message.tool_calls()[0].args, Value::Null);
    }

    #[test]
    fn empty_candidates_are_malformed() {
        let err = parse(json!({
            "candidates": [],
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap_err();
        assert!(
            matches!(err, ModelError::MalformedResponse(ref m) if m == "no candidates (blocked: SAFETY)")
        );
    }

    #[test]
    fn empty_parts_are_malformed() {
        let err = parse(json!({
            "candidates": [{"content": {"parts": []}, "finishReason": "MAX_TOKENS"}]
        }))
        .unwrap_err();
        assert!(matches!(err, ModelError::MalformedResponse(ref m) if m.starts_with("no parts")));

        let err = parse(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap_err();
        assert!(matches!(err, ModelError::MalformedResponse(_)));
    }
}
