// src/services/relay.rs
use tracing::{debug, info};

use super::provider::{ChatProvider, ProviderRole, ProviderTurn};
use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, ChatTurn, TurnRole, now_timestamp},
};

pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Persona prepended to every forwarded message.
pub const SYSTEM_INSTRUCTIONS: &str = "You are an AI Assistant for the System Monitor AI application. Your role is to help users understand and navigate the system monitoring features.

SYSTEM CAPABILITIES:
- Dashboard: Real-time system monitoring with device detection, performance metrics, and status overview
- Activity: System activity logs, user interactions, and historical data tracking  
- Device Management: Connected device monitoring, device metrics, and device status tracking
- Account: User profile management, account settings, and authentication

RESPONSE GUIDELINES:
1. Be helpful and professional in all interactions
2. Focus on system monitoring, device management, and user assistance
3. Provide clear, concise explanations about system features
4. If asked about non-system topics, politely redirect to system-related questions
5. Use technical but accessible language
6. Always maintain a supportive and informative tone

SYSTEM DATA CONTEXT:
- Users can monitor multiple connected devices (mobile, laptop, desktop, tablet)
- Real-time metrics include CPU usage, memory, storage, network speed, and security status
- Device detection shows OS, browser, screen size, and online status
- Activity tracking monitors system performance and user interactions
- Account management allows profile updates and settings configuration

Remember: You are specifically designed to assist with System Monitor AI functionality. Keep responses relevant to system monitoring, device management, and user support.";

pub fn map_role(role: &TurnRole) -> ProviderRole {
    match role {
        TurnRole::Assistant => ProviderRole::Model,
        TurnRole::User => ProviderRole::User,
    }
}

/// Translate the caller's history into provider turns, keeping order.
pub fn map_history(history: &[ChatTurn]) -> Vec<ProviderTurn> {
    history
        .iter()
        .map(|turn| ProviderTurn { role: map_role(&turn.role), text: turn.content.clone() })
        .collect()
}

// The instructions ride along in the user turn rather than a system-role
// message. Switching to the provider's system channel changes model behaviour.
pub fn build_prompt(message: &str) -> String {
    format!("{SYSTEM_INSTRUCTIONS}\n\nUser message: {message}")
}

/// Forward one chat turn to `provider` and wrap its reply.
///
/// A missing or blank message fails before the provider is touched.
pub async fn relay(
    provider: &dyn ChatProvider,
    request: ChatRequest,
) -> Result<ChatResponse, AppError> {
    let message = match request.message.as_deref() {
        Some(m) if !m.trim().is_empty() => m,
        _ => return Err(AppError::BadRequest(MESSAGE_REQUIRED.to_string())),
    };

    let history = map_history(&request.conversation_history);
    debug!(history_len = history.len(), "relaying chat message");

    let reply = provider.generate(history, build_prompt(message)).await?;
    info!(reply_len = reply.len(), "provider replied");

    Ok(ChatResponse { success: true, response: reply, timestamp: now_timestamp() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_maps_to_model() {
        assert_eq!(map_role(&TurnRole::Assistant), ProviderRole::Model);
        assert_eq!(map_role(&TurnRole::User), ProviderRole::User);
    }

    #[test]
    fn history_order_is_kept() {
        let history = vec![
            ChatTurn::user("one"),
            ChatTurn::assistant("two"),
            ChatTurn::user("one"),
            ChatTurn::assistant("three"),
        ];
        let mapped = map_history(&history);
        let texts: Vec<&str> = mapped.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["one", "two", "one", "three"]);
        assert_eq!(
            mapped.iter().map(|t| t.role).collect::<Vec<_>>(),
            [ProviderRole::User, ProviderRole::Model, ProviderRole::User, ProviderRole::Model]
        );
    }

    #[test]
    fn prompt_inlines_instructions() {
        let prompt = build_prompt("Why is my CPU usage high?");
        assert!(prompt.starts_with(SYSTEM_INSTRUCTIONS));
        assert!(prompt.ends_with("\n\nUser message: Why is my CPU usage high?"));
    }

    #[test]
    fn instructions_keep_trailing_spaces() {
        assert!(SYSTEM_INSTRUCTIONS.contains("historical data tracking  \n- Device Management"));
    }
}
