//! Chat command dispatch: `!ai`, `!news`, and `!help`.
//!
//! Each inbound message is handled independently. Handling suspends on outbound HTTP,
//! so when the gateway spawns one task per message, replies may go out in a different
//! order than the messages arrived. Nothing here serializes per channel or per user.

use crate::channels::{ChannelHandle, InboundMessage};
use crate::config::Config;
use crate::llm::InferenceClient;
use crate::news::NewsClient;

/// Discord rejects messages longer than this many characters.
pub const MAX_REPLY_CHARS: usize = 2000;
/// Characters kept from an over-long reply before the ellipsis.
const TRUNCATED_KEEP_CHARS: usize = 1990;
const ELLIPSIS: &str = "…";

pub const AI_USAGE_REPLY: &str = "Usage: `!ai your question here`";
pub const HELP_REPLY: &str =
    "Commands:\n• `!ai <text>` — AI reply (Hugging Face)\n• `!news <topic>` — Latest news";

const AI_PREFIX: &str = "!ai";
const NEWS_PREFIX: &str = "!news";
const HELP_COMMAND: &str = "!help";

/// A recognized command with its (trimmed) argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Prompt for the inference client; may be empty.
    Ai(String),
    /// News topic; may be empty.
    News(String),
    Help,
}

/// Remainder of `text` after a case-insensitive ASCII `prefix`, trimmed; None when it does not match.
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(text[prefix.len()..].trim())
    } else {
        None
    }
}

impl Command {
    /// Match trimmed message text against the command prefixes, in priority order.
    /// Prefixes match without a word boundary (`!airplane` is `!ai` with "rplane"); near misses are not commands.
    pub fn parse(text: &str) -> Option<Command> {
        let text = text.trim();
        if let Some(rest) = strip_prefix_ignore_case(text, AI_PREFIX) {
            return Some(Command::Ai(rest.to_string()));
        }
        if let Some(rest) = strip_prefix_ignore_case(text, NEWS_PREFIX) {
            return Some(Command::News(rest.to_string()));
        }
        if text == HELP_COMMAND {
            return Some(Command::Help);
        }
        None
    }
}

/// Cap a reply at [`MAX_REPLY_CHARS`]: longer text keeps its first 1990 characters plus "…".
pub fn truncate_reply(text: String) -> String {
    if text.chars().count() <= MAX_REPLY_CHARS {
        return text;
    }
    let mut out: String = text.chars().take(TRUNCATED_KEEP_CHARS).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Routes commands to the inference and news clients and replies on the originating channel.
#[derive(Clone)]
pub struct Dispatcher {
    inference: InferenceClient,
    news: NewsClient,
}

impl Dispatcher {
    pub fn new(inference: InferenceClient, news: NewsClient) -> Self {
        Self { inference, news }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            InferenceClient::new(&config.inference),
            NewsClient::new(&config.news),
        )
    }

    /// Handle one inbound message. Bot-authored and unrecognized messages get no reply.
    /// Client failures arrive here already turned into reply text; send failures are logged.
    pub async fn handle(&self, channel: &dyn ChannelHandle, msg: &InboundMessage) {
        if msg.author_is_bot {
            return;
        }
        let Some(command) = Command::parse(&msg.text) else {
            return;
        };
        log::debug!(
            "dispatch: {:?} from {}:{}",
            command,
            channel.id(),
            msg.conversation_id
        );
        let reply = match command {
            Command::Ai(prompt) if prompt.is_empty() => AI_USAGE_REPLY.to_string(),
            Command::Ai(prompt) => {
                self.typing(channel, msg).await;
                truncate_reply(self.inference.generate(&prompt).await)
            }
            // Not capped; Discord rejects an over-long reply and the send error is logged.
            Command::News(topic) => {
                self.typing(channel, msg).await;
                self.news.headlines(&topic).await
            }
            Command::Help => HELP_REPLY.to_string(),
        };
        if let Err(e) = channel
            .send_reply(&msg.conversation_id, &msg.message_id, &reply)
            .await
        {
            log::warn!("dispatch: send_reply failed: {}", e);
        }
    }

    async fn typing(&self, channel: &dyn ChannelHandle, msg: &InboundMessage) {
        if let Err(e) = channel.send_typing(&msg.conversation_id).await {
            log::debug!("dispatch: send_typing failed: {}", e);
        }
    }
}
