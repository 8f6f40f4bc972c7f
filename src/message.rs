// src/message.rs
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /api/chat`.
///
/// `message` is optional at the wire level so that an absent field reaches
/// the handler and is rejected with the documented 400 instead of a
/// deserialisation failure. Non-zero numbers and `true` are taken as text;
/// objects, arrays and falsy scalars count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "message_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub conversation_history: Vec<ChatTurn>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    #[default]
    User,
    Assistant,
}

// Anything that is not the string "assistant" is a user turn, including
// null, numbers and a missing field.
impl<'de> Deserialize<'de> for TurnRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = Option::<Value>::deserialize(deserializer)?;
        Ok(match tag {
            Some(Value::String(s)) if s == "assistant" => TurnRole::Assistant,
            _ => TurnRole::User,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(default)]
    pub role: TurnRole,
    #[serde(default, deserialize_with = "content_text")]
    pub content: String,
}

fn message_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Some(Value::Bool(true)) => Some("true".to_string()),
        _ => None,
    })
}

fn content_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: TurnRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: TurnRole::Assistant, content: content.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

/// ISO-8601 UTC timestamp with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_roles_become_user_turns() {
        let turns: Vec<ChatTurn> = serde_json::from_str(
            r#"[{"role":"assistant","content":"a"},{"role":"system","content":"b"},{"role":"user","content":"c"}]"#,
        )
        .unwrap();
        assert_eq!(turns[0].role, TurnRole::Assistant);
        assert_eq!(turns[1].role, TurnRole::User);
        assert_eq!(turns[2].role, TurnRole::User);
    }

    #[test]
    fn missing_or_null_fields_are_tolerated() {
        let turns: Vec<ChatTurn> = serde_json::from_str(
            r#"[{"content":"a"},{"role":null,"content":"b"},{"role":"assistant","content":null},{"role":"assistant"}]"#,
        )
        .unwrap();
        assert_eq!(turns[0], ChatTurn::user("a"));
        assert_eq!(turns[1], ChatTurn::user("b"));
        assert_eq!(turns[2], ChatTurn::assistant(""));
        assert_eq!(turns[3], ChatTurn::assistant(""));
    }

    #[test]
    fn scalar_messages_become_text() {
        let parse = |body: &str| serde_json::from_str::<ChatRequest>(body).unwrap().message;
        assert_eq!(parse(r#"{"message":42}"#).as_deref(), Some("42"));
        assert_eq!(parse(r#"{"message":true}"#).as_deref(), Some("true"));
        assert_eq!(parse(r#"{"message":0}"#), None);
        assert_eq!(parse(r#"{"message":false}"#), None);
        assert_eq!(parse(r#"{"message":{"text":"hi"}}"#), None);
        assert_eq!(parse(r#"{"message":null,"conversationHistory":null}"#), None);
    }

    #[test]
    fn history_defaults_to_empty() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(req.message.as_deref(), Some("hi"));
        assert!(req.conversation_history.is_empty());
    }

    #[test]
    fn timestamp_parses_back() {
        let ts = now_timestamp();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
