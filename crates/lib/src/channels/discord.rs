//! Discord channel: serenity gateway session for inbound events, REST for typing and replies.

use crate::channels::handle::ChannelHandle;
use crate::channels::inbound::InboundMessage;
use async_trait::async_trait;
use serenity::all::{
    ChannelId, Client, Context, CreateMessage, EventHandler, GatewayIntents, Http, Message,
    MessageId, MessageReference, Ready,
};
use std::sync::Arc;
use tokio::sync::mpsc;

pub const DISCORD_CHANNEL_ID: &str = "discord";

/// Parse a Discord snowflake. Zero is rejected since serenity ids are non-zero.
fn parse_snowflake(kind: &str, s: &str) -> Result<u64, String> {
    match s.trim().parse::<u64>() {
        Ok(id) if id != 0 => Ok(id),
        _ => Err(format!("invalid discord {} id: {:?}", kind, s)),
    }
}

/// Discord connector: answers conversations through the REST client of a connected session.
pub struct DiscordChannel {
    id: String,
    http: Arc<Http>,
}

impl DiscordChannel {
    pub fn new(http: Arc<Http>) -> Self {
        Self {
            id: DISCORD_CHANNEL_ID.to_string(),
            http,
        }
    }
}

#[async_trait]
impl ChannelHandle for DiscordChannel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn send_typing(&self, conversation_id: &str) -> Result<(), String> {
        let channel = ChannelId::new(parse_snowflake("channel", conversation_id)?);
        channel
            .broadcast_typing(&self.http)
            .await
            .map_err(|e| e.to_string())
    }

    async fn send_reply(
        &self,
        conversation_id: &str,
        reply_to: &str,
        text: &str,
    ) -> Result<(), String> {
        let channel = ChannelId::new(parse_snowflake("channel", conversation_id)?);
        let message = MessageId::new(parse_snowflake("message", reply_to)?);
        let builder = CreateMessage::new()
            .content(text)
            .reference_message(MessageReference::from((channel, message)));
        channel
            .send_message(&self.http, builder)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// Serenity event handler: forwards every created message to the gateway as an [`InboundMessage`].
pub struct DiscordHandler {
    inbound_tx: mpsc::Sender<InboundMessage>,
}

impl DiscordHandler {
    pub fn new(inbound_tx: mpsc::Sender<InboundMessage>) -> Self {
        Self { inbound_tx }
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        log::info!("discord: logged in as {}", ready.user.tag());
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        let inbound = InboundMessage {
            channel_id: DISCORD_CHANNEL_ID.to_string(),
            conversation_id: msg.channel_id.to_string(),
            message_id: msg.id.to_string(),
            author_is_bot: msg.author.bot,
            text: msg.content,
        };
        if self.inbound_tx.send(inbound).await.is_err() {
            log::debug!("discord: inbound channel closed, dropping message");
        }
    }
}

/// Build a serenity client for `token` whose events are forwarded to `inbound_tx`.
/// The session is not opened until the caller starts the client.
pub async fn connect(
    token: &str,
    inbound_tx: mpsc::Sender<InboundMessage>,
) -> Result<Client, serenity::Error> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    Client::builder(token, intents)
        .event_handler(DiscordHandler::new(inbound_tx))
        .await
}
