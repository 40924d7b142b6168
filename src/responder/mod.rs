//! The autoresponder: filters, matches and replies to one user's messages.

pub mod client;
pub mod dispatch;

pub use client::{ChatClient, IncomingMessage};
pub use dispatch::{Dispatch, Responder};
