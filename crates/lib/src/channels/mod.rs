//! Communication channels (Discord).
//!
//! A channel connector turns gateway events into [`InboundMessage`]s sent over an mpsc
//! channel, and exposes a [`ChannelHandle`] the dispatcher uses to answer them.

mod discord;
mod handle;
mod inbound;

pub use discord::{connect, DiscordChannel, DiscordHandler, DISCORD_CHANNEL_ID};
pub use handle::ChannelHandle;
pub use inbound::InboundMessage;
