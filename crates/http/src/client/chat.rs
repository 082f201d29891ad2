//! Chat and conversation client methods

use super::{ApiResponse, ClientError, SaytrixClient};
use crate::types::{ChatRequest, QuickAction, QuickActionRequest, paths};
use reqwest::Method;

impl SaytrixClient {
    /// Send a chat message, optionally continuing an existing conversation
    pub async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let request = self.request(Method::POST, paths::CHAT).json(&ChatRequest {
            message: message.to_string(),
            conversation_id: conversation_id.map(str::to_string),
        });
        self.dispatch(request).await
    }

    /// Switch the chat into one of the backend's quick-action modes
    pub async fn quick_action(
        &self,
        action: impl Into<QuickAction>,
    ) -> Result<ApiResponse, ClientError> {
        let request = self
            .request(Method::POST, paths::QUICK_ACTION)
            .json(&QuickActionRequest {
                action: action.into(),
            });
        self.dispatch(request).await
    }

    /// Leave the current quick-action mode
    pub async fn clear_mode(&self) -> Result<ApiResponse, ClientError> {
        let request = self.request(Method::POST, paths::CLEAR_MODE);
        self.dispatch(request).await
    }

    /// List the user's conversations
    pub async fn get_conversations(&self) -> Result<ApiResponse, ClientError> {
        let request = self.request(Method::GET, paths::CONVERSATIONS);
        self.dispatch(request).await
    }

    /// Fetch the message history of one conversation
    pub async fn get_conversation_history(
        &self,
        conversation_id: &str,
    ) -> Result<ApiResponse, ClientError> {
        let request = self.request(
            Method::GET,
            &paths::conversation_history(conversation_id),
        );
        self.dispatch(request).await
    }
}
