//! Chat-completion request and response types
//!
//! These follow the OpenAI chat completions wire format, which most hosted and
//! local servers accept. Backends that speak something else convert at their edge.

use serde::{Deserialize, Serialize};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A role-tagged chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Function the model may call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments object
    pub parameters: serde_json::Value,
}

/// One chat-completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDefinition>,
}

/// Provider reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One alternative in a reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl Choice {
    /// Choice that only carries text
    pub fn text(content: impl Into<String>, finish_reason: &str) -> Self {
        Self {
            index: 0,
            message: ResponseMessage {
                role: Some(ChatRole::Assistant),
                content: Some(content.into()),
                tool_calls: vec![],
            },
            finish_reason: Some(finish_reason.to_string()),
        }
    }

    /// Choice that invokes a single tool
    pub fn tool_call(name: &str, arguments: impl Into<String>) -> Self {
        Self {
            index: 0,
            message: ResponseMessage {
                role: Some(ChatRole::Assistant),
                content: None,
                tool_calls: vec![ToolCall::function("call_0", name, arguments)],
            },
            finish_reason: Some("tool_calls".to_string()),
        }
    }

    /// Text content, empty when the model sent none
    pub fn content(&self) -> &str {
        self.message.content.as_deref().unwrap_or("")
    }

    pub fn tool_calls(&self) -> &[ToolCall] {
        &self.message.tool_calls
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.finish_reason.as_deref()
    }
}

/// Assistant message inside a choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<ChatRole>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tool_calls: Vec<ToolCall>,
}

/// Tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    pub function: FunctionCall,
}

impl ToolCall {
    pub fn function(id: &str, name: &str, arguments: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            call_type: function_type(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.into(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    pub fn arguments(&self) -> &str {
        &self.function.arguments
    }
}

/// Function name and raw JSON arguments text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

/// Some servers send `"tool_calls": null` instead of omitting the field
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<ToolCall>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<ToolCall>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Backend configuration information for display
#[derive(Debug, Clone)]
pub struct BackendInfo {
    pub kind: &'static str,
    pub host: String,
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_with_tool_call_deserialization() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "categorize_expenses",
                            "arguments": "{\"transactions\": []}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }"#;

        let response: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices.len(), 1);
        let choice = &response.choices[0];
        assert_eq!(choice.content(), "");
        assert_eq!(choice.tool_calls()[0].name(), "categorize_expenses");
        assert_eq!(choice.tool_calls()[0].arguments(), r#"{"transactions": []}"#);
        assert_eq!(choice.finish_reason(), Some("tool_calls"));
    }

    #[test]
    fn test_response_null_tool_calls() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "hi", "tool_calls": null}, "finish_reason": "stop"}]}"#;
        let response: CompletionResponse = serde_json::from_str(json).unwrap();
        assert!(response.choices[0].tool_calls().is_empty());
        assert_eq!(response.choices[0].content(), "hi");
    }

    #[test]
    fn test_chat_message_serialization() {
        let json = serde_json::to_value(ChatMessage::system("Be precise")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "Be precise");
    }

    #[test]
    fn test_choice_helpers() {
        let choice = Choice::text("nothing here", "stop");
        assert_eq!(choice.content(), "nothing here");
        assert!(choice.tool_calls().is_empty());

        let choice = Choice::tool_call("categorize_expenses", "{}");
        assert_eq!(choice.tool_calls().len(), 1);
        assert_eq!(choice.tool_calls()[0].call_type, "function");
    }
}
