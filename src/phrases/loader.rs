//! Loading phrase rules from a directory of JSON files.
//!
//! Each `*.json` file holds one rule:
//!
//! ```json
//! { "patterns": ["^hello", "good (morning|evening)"], "reply": "Hi $1!", "channel": 1234 }
//! ```
//!
//! Files are read in file-name order, which is also the order rules are
//! scanned when matching.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fancy_regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

use crate::common::error::PhraseError;
use crate::phrases::reply::ReplyHandler;
use crate::phrases::rule::PhraseRule;

/// On-disk representation of a phrase rule.
#[derive(Debug, Clone, Deserialize)]
pub struct PhraseFile {
    pub patterns: Vec<String>,
    pub reply: String,
    #[serde(default)]
    pub channel: Option<u64>,
}

/// Load every phrase file in `dir`, sorted by file name.
pub fn load_phrases(dir: impl AsRef<Path>) -> Result<Vec<PhraseRule>, PhraseError> {
    let dir = dir.as_ref();
    let io_error = |source| PhraseError::IoError {
        path: dir.display().to_string(),
        source,
    };

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_error)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let rules = paths
        .iter()
        .map(|path| load_phrase_file(path))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Loaded {} phrase rules from {}", rules.len(), dir.display());
    Ok(rules)
}

/// Load a single phrase file; the file stem becomes the rule name.
pub fn load_phrase_file(path: &Path) -> Result<PhraseRule, PhraseError> {
    let content = fs::read_to_string(path).map_err(|e| PhraseError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: PhraseFile = serde_json::from_str(&content).map_err(|e| PhraseError::ParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    build_rule(name, file)
}

/// Compile a phrase file into a rule with a scripted reply handler.
pub fn build_rule(name: String, file: PhraseFile) -> Result<PhraseRule, PhraseError> {
    if file.patterns.is_empty() {
        return Err(PhraseError::NoPatterns { rule: name });
    }

    let patterns = compile_patterns(&name, &file.patterns)?;
    debug!("Phrase '{}' with {} patterns", name, patterns.len());

    let handler = ReplyHandler::new(file.reply, file.channel);
    Ok(PhraseRule::new(name, patterns, Arc::new(handler)))
}

fn compile_patterns(rule: &str, patterns: &[String]) -> Result<Vec<Regex>, PhraseError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| PhraseError::InvalidPattern {
                rule: rule.to_string(),
                pattern: pattern.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}
