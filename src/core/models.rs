//! Chat completion wire types and chunk models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// Single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Chat completion request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub top_p: f32,
}

/// Chat completion response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One completion choice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

/// Message inside a completion choice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Build a response with a single choice, mainly for test doubles
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            id: None,
            choices: vec![ChatChoice {
                message: Some(ResponseMessage {
                    content: Some(content.into()),
                }),
            }],
        }
    }
}

/// How a chunk was closed by the chunker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChunkBoundary {
    /// The next paragraph would have pushed it over the token ceiling
    Ceiling,
    /// End of the document
    EndOfDocument,
}

impl fmt::Display for ChunkBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkBoundary::Ceiling => write!(f, "ceiling"),
            ChunkBoundary::EndOfDocument => write!(f, "end"),
        }
    }
}

/// Paragraph-aligned slice of a document sent as one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
    pub tokens: usize,
    pub paragraphs: usize,
    pub boundary: ChunkBoundary,
}

impl Chunk {
    /// Whether a pacing delay follows this chunk's dispatch
    pub fn needs_pacing(&self) -> bool {
        self.boundary == ChunkBoundary::Ceiling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let msg = ChatMessage::system("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let resp: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"index":0,"message":{"role":"assistant"}}]}"#)
                .unwrap();
        assert_eq!(resp.choices.len(), 1);
        assert!(resp.choices[0].message.as_ref().unwrap().content.is_none());

        let resp: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.choices.is_empty());
    }
}
