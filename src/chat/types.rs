use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
    Error,
}

impl Role {
    /// Label shown in front of a turn.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Ai => "AI",
            Role::Error => "Error",
        }
    }
}

/// One entry in the chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(Role::Ai, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(Role::Error, content)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptRequest<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptResponse {
    #[serde(default)]
    pub response: Option<serde_json::Value>,
}

impl PromptResponse {
    /// Reply text as shown in the log. A missing or null field is empty,
    /// strings are taken verbatim and anything else keeps its JSON text.
    pub fn into_text(self) -> String {
        match self.response {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s,
            Some(other) => other.to_string(),
        }
    }
}

/// A submit that passed the emptiness check and now waits for its reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: u64,
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let turn = Turn::ai("hi");
        let v = serde_json::to_value(&turn).unwrap();
        assert_eq!(v, serde_json::json!({"role": "ai", "content": "hi"}));
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_string(&PromptRequest { prompt: " Hello " }).unwrap();
        assert_eq!(body, r#"{"prompt":" Hello "}"#);
    }

    #[test]
    fn response_text_variants() {
        let parse = |s: &str| serde_json::from_str::<PromptResponse>(s).unwrap().into_text();
        assert_eq!(parse(r#"{"response":"Hi there"}"#), "Hi there");
        assert_eq!(parse(r#"{"other":1}"#), "");
        assert_eq!(parse(r#"{"response":null}"#), "");
        assert_eq!(parse(r#"{"response":42}"#), "42");
    }
}
