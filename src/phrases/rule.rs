//! Phrase rules: ordered regex patterns paired with one response handler.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use fancy_regex::{Captures, Regex};

use crate::responder::{IncomingMessage, Responder};

/// Reacts to a message whose content matched one of a rule's patterns.
pub trait PhraseHandler: Send + Sync {
    fn handle(&self, message: &IncomingMessage, groups: &MatchGroups, responder: &Responder);
}

impl<F> PhraseHandler for F
where
    F: Fn(&IncomingMessage, &MatchGroups, &Responder) + Send + Sync,
{
    fn handle(&self, message: &IncomingMessage, groups: &MatchGroups, responder: &Responder) {
        self(message, groups, responder)
    }
}

/// A named list of patterns sharing one handler.
#[derive(Clone)]
pub struct PhraseRule {
    pub name: String,
    pub patterns: Vec<Regex>,
    pub handler: Arc<dyn PhraseHandler>,
}

impl PhraseRule {
    pub fn new(name: impl Into<String>, patterns: Vec<Regex>, handler: Arc<dyn PhraseHandler>) -> Self {
        Self {
            name: name.into(),
            patterns,
            handler,
        }
    }
}

impl fmt::Debug for PhraseRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhraseRule")
            .field("name", &self.name)
            .field(
                "patterns",
                &self.patterns.iter().map(Regex::as_str).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Owned capture groups of a successful match.
///
/// Group 0 is always the whole match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchGroups {
    groups: Vec<Option<String>>,
    named: HashMap<String, String>,
}

impl MatchGroups {
    /// Copy the groups out of a set of captures.
    pub fn from_captures(regex: &Regex, captures: &Captures<'_>) -> Self {
        let groups = (0..captures.len())
            .map(|i| captures.get(i).map(|m| m.as_str().to_string()))
            .collect();

        let named = regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                captures
                    .name(name)
                    .map(|m| (name.to_string(), m.as_str().to_string()))
            })
            .collect();

        Self { groups, named }
    }

    /// Text of the whole match.
    pub fn full(&self) -> &str {
        self.get(0).unwrap_or("")
    }

    /// Text of a numbered group, if it participated in the match.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|g| g.as_deref())
    }

    /// Text of a named group, if it participated in the match.
    pub fn name(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }
}

/// The winning pattern of a scan, with its groups and handler.
#[derive(Clone)]
pub struct PhraseMatch {
    pub rule: String,
    pub pattern: Regex,
    pub groups: MatchGroups,
    pub handler: Arc<dyn PhraseHandler>,
}

impl fmt::Debug for PhraseMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhraseMatch")
            .field("rule", &self.rule)
            .field("pattern", &self.pattern.as_str())
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_copied_from_captures() {
        let regex = Regex::new(r"roll (\d+)d(?P<sides>\d+)").unwrap();
        let captures = regex.captures("please roll 2d20 now").unwrap().unwrap();

        let groups = MatchGroups::from_captures(&regex, &captures);
        assert_eq!(groups.full(), "roll 2d20");
        assert_eq!(groups.get(1), Some("2"));
        assert_eq!(groups.get(2), Some("20"));
        assert_eq!(groups.name("sides"), Some("20"));
        assert_eq!(groups.get(3), None);
    }

    #[test]
    fn test_unmatched_optional_group_is_none() {
        let regex = Regex::new(r"hello( world)?").unwrap();
        let captures = regex.captures("hello there").unwrap().unwrap();

        let groups = MatchGroups::from_captures(&regex, &captures);
        assert_eq!(groups.full(), "hello");
        assert_eq!(groups.get(1), None);
    }
}
