//! Discord bot integration.
//!
//! Connects to Discord, forwards gateway events to the responder and
//! sends its replies.

pub mod client;
pub mod handler;
pub mod sender;

pub use client::DiscordBot;
pub use sender::DiscordSender;
