//! Inbound message from a channel: delivered to the gateway for command dispatch.

/// A message from a channel, held only for the duration of one dispatch.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub channel_id: String,
    /// Where replies go (e.g. Discord channel id).
    pub conversation_id: String,
    /// Id of the triggering message, so replies can reference it.
    pub message_id: String,
    /// True when the author is a bot account (including this bot).
    pub author_is_bot: bool,
    pub text: String,
}
