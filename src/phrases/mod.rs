//! Phrase rules and their handlers.

pub mod loader;
pub mod reply;
pub mod rule;

pub use loader::load_phrases;
pub use rule::{MatchGroups, PhraseMatch, PhraseRule};
