//! OpenAI API related types.
//!
//! This module contains types that match the implemented `chat/completions`
//! wire format, as spoken by the OpenAI API and compatible servers.

use std::{fmt, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Default endpoint URL to send requests to.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model to use for requests.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default sampling temperature to use for requests.
pub const DEFAULT_TEMPERATURE: f64 = 0.01;

/// The body of a request to the chat completions endpoint.
///
/// This type can be used to construct a [`crate::http_request::HttpRequest`]
/// manually. Usually it is better to use [`crate::ChatRequestBuilder`]
/// instead.
#[derive(Debug, Serialize)]
pub struct ChatBody<'a> {
    /// The model to use for the request.
    pub model: &'a str,
    /// The messages to include in the request.
    pub messages: &'a im::Vector<Message>,
    /// The sampling temperature for the request.
    pub temperature: f64,
}

/// A role in a conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Message from the user.
    User,
    /// Message from the model.
    Assistant,
    /// Instruction message steering the model.
    System,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        };
        f.write_str(name)
    }
}

/// A message in a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message.
    pub role: Role,
    /// The text content of the message.
    pub content: String,
}

impl Message {
    /// Convenience function to construct a message from a role and text.
    pub fn from_text<S: Into<String>>(role: Role, text: S) -> Self {
        Self {
            role,
            content: text.into(),
        }
    }
}

/// A response from the chat completions endpoint.
///
/// Fields not consumed anywhere (`object`, `created`, ...) are ignored
/// during deserialization.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

/// One completion choice of a response.
///
/// Responses carry at least one choice under normal operation; consumers
/// typically only look at the first.
#[derive(Debug, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: Message,
    pub finish_reason: Option<String>,
}

/// Token accounting for a completion exchange.
#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Deserializes a chat completions response from JSON.
pub fn deserialize_response(json: &str) -> Result<ChatResponse, Error> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::{Role, deserialize_response};

    #[test]
    fn test_chat_response_deserialization() {
        let json = r#"{
  "id": "chatcmpl-8Zl9qP5jD2c3F7xW",
  "object": "chat.completion",
  "created": 1700000000,
  "model": "gpt-3.5-turbo-0125",
  "choices": [
    {
      "index": 0,
      "message": {
        "role": "assistant",
        "content": "Hi! How can I help?"
      },
      "finish_reason": "stop"
    }
  ],
  "usage": {
    "prompt_tokens": 12,
    "completion_tokens": 7,
    "total_tokens": 19
  }
}"#;

        let response = deserialize_response(json).expect("should deserialize chat response");

        assert_eq!(response.id, "chatcmpl-8Zl9qP5jD2c3F7xW");
        assert_eq!(response.model, "gpt-3.5-turbo-0125");
        assert_eq!(response.usage.prompt_tokens, 12);
        assert_eq!(response.usage.completion_tokens, 7);
        assert_eq!(response.usage.total_tokens, 19);

        assert_eq!(response.choices.len(), 1);
        let choice = &response.choices[0];
        assert_eq!(choice.index, 0);
        assert_eq!(choice.finish_reason.as_deref(), Some("stop"));
        assert_eq!(choice.message.role, Role::Assistant);
        assert_eq!(choice.message.content, "Hi! How can I help?");
    }

    #[test]
    fn test_chat_response_with_empty_choices() {
        let json = r#"{
  "id": "chatcmpl-empty",
  "object": "chat.completion",
  "created": 1700000000,
  "model": "gpt-3.5-turbo",
  "choices": [],
  "usage": {
    "prompt_tokens": 5,
    "completion_tokens": 0,
    "total_tokens": 5
  }
}"#;

        // An empty choices array is well-formed; rejecting it is the
        // session's job, not the deserializer's.
        let response = deserialize_response(json).expect("should deserialize chat response");
        assert!(response.choices.is_empty());
    }

    #[test]
    fn test_malformed_response_is_an_error() {
        let result = deserialize_response("not json at all");
        assert!(matches!(result, Err(crate::Error::Serde(_))));
    }

    #[test]
    fn test_role_serialization_names() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");

        // Display mirrors the wire names, used when printing the history.
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
