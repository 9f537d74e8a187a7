use anyhow::{Context, Result};
use reqwest::Response;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::Category;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const TEMPERATURE: f32 = 0.3;
pub const MAX_TOKENS: i32 = 500;

const DEFAULT_REASON: &str = "Automatic classification by the remote model.";
const DEFAULT_REPLY: &str = "Obrigado pelo contato.";

const SYSTEM_PROMPT: &str = r#"You are an assistant specialised in analysing and answering professional emails.

TASK: read the email and provide
1) a classification: "Actionable" or "NonActionable";
2) a detailed reason for the classification;
3) a suggested reply that answers EXACTLY what the email says.

CLASSIFICATION CRITERIA:
- Actionable: work, projects, meetings, proposals, collaborations, feedback, professional requests.
- NonActionable: spam, generic offers, very vague emails, irrelevant content.

REPLY INSTRUCTIONS:
- Read the email carefully and reply specifically to what it mentions.
- If it mentions a deadline, acknowledge the deadline.
- If it asks for a meeting, answer about the meeting.
- If it changes a requirement, answer about the change.
- If it is a proposal, answer about the proposal.
- Be professional, polite and direct; match the formal or informal register of the email.
- Write the reply in the same language as the email.

Respond ONLY with a valid JSON object with exactly these fields:
{"category": "Actionable" or "NonActionable", "reason": "...", "suggested_reply": "..."}"#;

pub fn build_user_prompt(email: &str) -> String {
    format!(
        "Analyse this email and provide the classification and a contextual reply.\n\n\
         EMAIL RECEIVED:\n{}\n\n\
         Consider the specific context of the email, any deadline or urgency, the kind of \
         request, and the appropriate tone. Respond ONLY with the JSON object.",
        email.trim()
    )
}

pub fn build_request(model: String, email: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system".into(),
                content: SYSTEM_PROMPT.into(),
            },
            ChatMessage {
                role: "user".into(),
                content: build_user_prompt(email),
            },
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
        response_format: ResponseFormat {
            r#type: "json_object".into(),
        },
    }
}

pub async fn parse_response(response: Response) -> Result<String> {
    let completion: ChatCompletionResponse = response.json().await?;
    let choice = completion
        .choices
        .into_iter()
        .next()
        .context("completion response did not contain any choices")?;

    choice
        .message
        .and_then(|msg| msg.content)
        .context("completion response missing message content")
}

/// Removes a surrounding ```json / ``` fence, if any.
pub fn strip_code_fence(content: &str) -> &str {
    let content = content.trim();
    let fenced = content
        .split_once("```json")
        .or_else(|| content.split_once("```"))
        .map(|(_, rest)| rest);
    match fenced {
        Some(rest) => rest.split("```").next().unwrap_or(rest).trim(),
        None => content,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteVerdict {
    pub category: Category,
    pub reason: String,
    pub suggested_reply: String,
}

/// Parses the model output. Only non-object output is an error; an unknown
/// category becomes `NonActionable`.
pub fn parse_verdict(content: &str) -> Result<RemoteVerdict> {
    let object: Map<String, Value> = serde_json::from_str(strip_code_fence(content))
        .context("remote model output is not a JSON object")?;

    let category = object
        .get("category")
        .and_then(Value::as_str)
        .map(str::trim)
        .and_then(Category::from_canonical)
        .unwrap_or(Category::NonActionable);

    Ok(RemoteVerdict {
        category,
        reason: text_field(&object, "reason", DEFAULT_REASON),
        suggested_reply: text_field(&object, "suggested_reply", DEFAULT_REPLY),
    })
}

fn text_field(object: &Map<String, Value>, key: &str, default: &str) -> String {
    let value = match object.get(key) {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: i32,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub r#type: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatCompletionMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}
