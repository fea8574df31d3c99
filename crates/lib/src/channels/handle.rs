//! Outbound side of a channel: what the dispatcher needs to answer a message.

use async_trait::async_trait;

/// Handle to a connected channel (typing indicator, replies).
#[async_trait]
pub trait ChannelHandle: Send + Sync {
    /// Channel id (e.g. "discord").
    fn id(&self) -> &str;

    /// Show a typing indicator in the conversation.
    async fn send_typing(&self, conversation_id: &str) -> Result<(), String>;

    /// Send `text` to the conversation as a reply to message `reply_to`.
    async fn send_reply(
        &self,
        conversation_id: &str,
        reply_to: &str,
        text: &str,
    ) -> Result<(), String>;
}
