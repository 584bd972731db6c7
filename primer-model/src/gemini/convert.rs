//! Conversion between primer messages and the Gemini REST wire format.

use primer_core::{
    FinishReason, GenerateContentConfig, LlmRequest, LlmResponse, Message, PrimerError, Result,
    ToolCall, UsageMetadata,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Schema keywords Gemini's OpenAPI subset rejects.
const UNSUPPORTED_SCHEMA_KEYS: &[&str] =
    &["$schema", "title", "definitions", "additionalProperties"];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<GeminiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiTool {
    pub function_declarations: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    pub prompt_feedback: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsage {
    #[serde(default)]
    pub prompt_token_count: Option<i32>,
    #[serde(default)]
    pub candidates_token_count: Option<i32>,
    #[serde(default)]
    pub total_token_count: Option<i32>,
}

impl From<&GenerateContentConfig> for GenerationConfig {
    fn from(config: &GenerateContentConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

fn text_part(text: &str) -> GeminiPart {
    GeminiPart { text: Some(text.to_string()), ..Default::default() }
}

/// Builds the `generateContent` body for a request.
///
/// `default_temperature` applies only when the request has no config.
pub fn build_request(req: &LlmRequest, default_temperature: Option<f32>) -> GenerateContentRequest {
    let mut system_texts = Vec::new();
    let mut contents: Vec<GeminiContent> = Vec::new();

    for message in &req.messages {
        match message {
            Message::System { content } => system_texts.push(content.clone()),
            Message::Human { content } => contents.push(GeminiContent {
                role: Some("user".to_string()),
                parts: vec![text_part(content)],
            }),
            Message::Ai { content, tool_calls } => {
                let mut parts = Vec::new();
                if !content.is_empty() {
                    parts.push(text_part(content));
                }
                for call in tool_calls {
                    parts.push(GeminiPart {
                        function_call: Some(FunctionCall {
                            name: call.name.clone(),
                            args: call.args.clone(),
                            id: None,
                        }),
                        ..Default::default()
                    });
                }
                if !parts.is_empty() {
                    contents.push(GeminiContent { role: Some("model".to_string()), parts });
                }
            }
            Message::Tool { name, content, .. } => {
                let part = GeminiPart {
                    function_response: Some(FunctionResponse {
                        name: name.clone(),
                        response: json!({ "result": content }),
                        id: None,
                    }),
                    ..Default::default()
                };
                // Responses to one model turn must travel together in a single user turn.
                match contents.last_mut() {
                    Some(last)
                        if last.role.as_deref() == Some("user")
                            && last.parts.iter().all(|p| p.function_response.is_some()) =>
                    {
                        last.parts.push(part)
                    }
                    _ => contents
                        .push(GeminiContent { role: Some("user".to_string()), parts: vec![part] }),
                }
            }
        }
    }

    let system_instruction = if system_texts.is_empty() {
        None
    } else {
        Some(GeminiContent { role: None, parts: vec![text_part(&system_texts.join("\n\n"))] })
    };

    let tools = if req.tools.is_empty() {
        Vec::new()
    } else {
        vec![GeminiTool {
            function_declarations: req.tools.iter().map(sanitize_declaration).collect(),
        }]
    };

    let generation_config = match &req.config {
        Some(config) => Some(GenerationConfig::from(config)),
        None => default_temperature
            .map(|t| GenerationConfig { temperature: Some(t), ..Default::default() }),
    };

    GenerateContentRequest { contents, system_instruction, tools, generation_config }
}

fn sanitize_declaration(decl: &Value) -> Value {
    let mut decl = decl.clone();
    if let Some(params) = decl.get_mut("parameters") {
        sanitize_schema(params);
    }
    decl
}

/// Recursively strips schema keywords Gemini does not accept.
pub fn sanitize_schema(schema: &mut Value) {
    match schema {
        Value::Object(map) => {
            for key in UNSUPPORTED_SCHEMA_KEYS {
                map.remove(*key);
            }
            for value in map.values_mut() {
                sanitize_schema(value);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(sanitize_schema),
        _ => {}
    }
}

fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::MaxTokens,
        "SAFETY" => FinishReason::Safety,
        "RECITATION" => FinishReason::Recitation,
        _ => FinishReason::Other,
    }
}

/// Converts a Gemini response into an AI message.
///
/// Text parts are concatenated; thought parts are dropped.
pub fn convert_response(resp: GenerateContentResponse) -> Result<LlmResponse> {
    let candidate = resp.candidates.into_iter().next().ok_or_else(|| {
        let feedback = resp.prompt_feedback.map(|f| f.to_string()).unwrap_or_default();
        let message = format!("Gemini returned no candidates {feedback}");
        PrimerError::Model(message.trim_end().to_string())
    })?;

    let mut text = String::new();
    let mut tool_calls = Vec::new();
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Some(call) = part.function_call {
            let id = call.id.unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4().simple()));
            tool_calls.push(ToolCall::new(id, call.name, call.args));
        } else if let Some(t) = part.text {
            if !part.thought.unwrap_or(false) {
                text.push_str(&t);
            }
        }
    }

    let usage_metadata = resp.usage_metadata.map(|u| UsageMetadata {
        prompt_token_count: u.prompt_token_count.unwrap_or(0),
        candidates_token_count: u.candidates_token_count.unwrap_or(0),
        total_token_count: u.total_token_count.unwrap_or(0),
    });

    let mut response = LlmResponse::new(Message::ai_with_tool_calls(text, tool_calls));
    response.usage_metadata = usage_metadata;
    response.finish_reason = candidate.finish_reason.as_deref().map(map_finish_reason);
    Ok(response)
}
