//! Scripted reply handler with capture-group templates.
//!
//! Templates may reference groups of the winning match:
//! - `$0`..`$N` - numbered groups (`$0` is the whole match)
//! - `${name}` - named groups, `${1}` also works
//! - `$$` - a literal dollar sign
//!
//! Groups that did not participate expand to an empty string.

use tracing::debug;

use crate::phrases::rule::{MatchGroups, PhraseHandler};
use crate::responder::{IncomingMessage, Responder};

/// Sends a fixed, templated reply when its rule matches.
#[derive(Debug, Clone)]
pub struct ReplyHandler {
    template: String,
    /// Channel to reply in; defaults to the channel the message came from.
    channel: Option<u64>,
}

impl ReplyHandler {
    pub fn new(template: impl Into<String>, channel: Option<u64>) -> Self {
        Self {
            template: template.into(),
            channel,
        }
    }
}

impl PhraseHandler for ReplyHandler {
    fn handle(&self, message: &IncomingMessage, groups: &MatchGroups, responder: &Responder) {
        let target = self.channel.unwrap_or(message.channel_id);
        let reply = expand_template(&self.template, groups);
        debug!("Replying to {} in {}: {}", message.author_name, target, reply);
        responder.send_message(target, reply);
    }
}

/// Expand `$` references in a template against match groups.
pub fn expand_template(template: &str, groups: &MatchGroups) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        match chars.peek().copied() {
            Some((_, '$')) => {
                chars.next();
                out.push('$');
            }
            Some((start, '{')) => {
                let rest = &template[start + 1..];
                match rest.find('}') {
                    Some(end) => {
                        let key = &rest[..end];
                        out.push_str(lookup(groups, key));
                        // Skip past the closing brace.
                        for _ in 0..key.chars().count() + 2 {
                            chars.next();
                        }
                    }
                    None => out.push('$'),
                }
            }
            Some((_, d)) if d.is_ascii_digit() => {
                let mut index = 0usize;
                while let Some((_, d)) = chars.peek().copied() {
                    match d.to_digit(10) {
                        Some(digit) => {
                            index = index.saturating_mul(10).saturating_add(digit as usize);
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push_str(groups.get(index).unwrap_or(""));
            }
            _ => out.push('$'),
        }
    }

    out
}

fn lookup<'a>(groups: &'a MatchGroups, key: &str) -> &'a str {
    match key.parse::<usize>() {
        Ok(index) => groups.get(index),
        Err(_) => groups.name(key),
    }
    .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fancy_regex::Regex;

    fn groups_for(pattern: &str, text: &str) -> MatchGroups {
        let regex = Regex::new(pattern).unwrap();
        let captures = regex.captures(text).unwrap().unwrap();
        MatchGroups::from_captures(&regex, &captures)
    }

    #[test]
    fn test_plain_template_unchanged() {
        let groups = groups_for("hi", "hi");
        assert_eq!(expand_template("Hello there!", &groups), "Hello there!");
    }

    #[test]
    fn test_numbered_groups() {
        let groups = groups_for(r"(\w+) says (\w+)", "Bob says hello");
        assert_eq!(expand_template("$2 to you, $1", &groups), "hello to you, Bob");
        assert_eq!(expand_template("[$0]", &groups), "[Bob says hello]");
    }

    #[test]
    fn test_named_and_braced_groups() {
        let groups = groups_for(r"buy (?P<item>\w+)", "buy potions");
        assert_eq!(expand_template("No ${item} here", &groups), "No potions here");
        assert_eq!(expand_template("${1}!", &groups), "potions!");
    }

    #[test]
    fn test_literal_and_dangling_dollars() {
        let groups = groups_for(r"price", "price");
        assert_eq!(expand_template("$$5", &groups), "$5");
        assert_eq!(expand_template("costs $ 5", &groups), "costs $ 5");
        assert_eq!(expand_template("open ${", &groups), "open ${");
    }

    #[test]
    fn test_missing_groups_expand_empty() {
        let groups = groups_for(r"a(b)?", "a");
        assert_eq!(expand_template("<$1|$7|${nope}>", &groups), "<||>");
    }
}
