//! Pigeon core library: configuration, Discord channel, inference and news clients,
//! command dispatch, and the gateway that wires them together.

pub mod channels;
pub mod commands;
pub mod config;
pub mod gateway;
pub mod init;
pub mod llm;
pub mod news;
