//! Skill extraction: pluggable, trait-based extractor mapping free text to
//! canonical skill labels.
//!
//! Default: `KeywordMatcher` (alias table, deterministic, fully testable).
//! Alternative: `ModelBasedExtractor` (asks the LLM for a JSON skill list).
//!
//! `AppState` holds an `Arc<dyn SkillExtractor>`, chosen at startup via config.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::llm_client::{sanitize_json, LlmClient, ParseError};
use crate::skills::catalog::{SkillCatalog, DEFAULT_SKILL_CATALOG};
use crate::skills::prompts::{SKILL_EXTRACTION_PROMPT_TEMPLATE, SKILL_EXTRACTION_SYSTEM};

/// Set of canonical skill identifiers found in one document.
pub type SkillSet = BTreeSet<String>;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The extraction seam. Implementations never fail: a missing skill is a
/// quality degradation, not an error.
#[async_trait]
pub trait SkillExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> SkillSet;

    /// Backend name ("keyword" or "llm"), surfaced in responses.
    fn backend(&self) -> &'static str;
}

/// Which extractor backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorKind {
    Keyword,
    Llm,
}

impl FromStr for ExtractorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" => Ok(ExtractorKind::Keyword),
            "llm" => Ok(ExtractorKind::Llm),
            other => Err(format!("unknown skill extractor '{other}' (expected keyword|llm)")),
        }
    }
}

/// Builds the configured extractor.
pub fn build_extractor(
    kind: ExtractorKind,
    llm: &LlmClient,
) -> Result<Arc<dyn SkillExtractor>, regex::Error> {
    Ok(match kind {
        ExtractorKind::Keyword => {
            let matcher = KeywordMatcher::new(DEFAULT_SKILL_CATALOG)?;
            debug!("Keyword matcher compiled {} skill patterns", matcher.skill_count());
            Arc::new(matcher)
        }
        ExtractorKind::Llm => Arc::new(ModelBasedExtractor::new(llm.clone())),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordMatcher
// ────────────────────────────────────────────────────────────────────────────

/// Whole-word, case-insensitive alias matching against a fixed catalog.
///
/// A word boundary is the start/end of the text or any character that is not
/// alphanumeric or `_`, so aliases like `c++`, `node.js` and `ci/cd` match.
pub struct KeywordMatcher {
    patterns: Vec<(String, Regex)>,
}

impl KeywordMatcher {
    pub fn new(catalog: SkillCatalog) -> Result<Self, regex::Error> {
        let patterns = catalog
            .iter()
            .map(|(skill, aliases)| {
                let alternation = aliases
                    .iter()
                    .map(|a| regex::escape(a))
                    .collect::<Vec<_>>()
                    .join("|");
                let pattern = format!(r"(?i)(?:^|[^\w])(?:{alternation})(?:$|[^\w])");
                Regex::new(&pattern).map(|re| (skill.to_string(), re))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Synchronous matching used by the trait impl.
    pub fn match_skills(&self, text: &str) -> SkillSet {
        self.patterns
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(skill, _)| skill.clone())
            .collect()
    }

    pub fn skill_count(&self) -> usize {
        self.patterns.len()
    }
}

#[async_trait]
impl SkillExtractor for KeywordMatcher {
    async fn extract(&self, text: &str) -> SkillSet {
        self.match_skills(text)
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ModelBasedExtractor
// ────────────────────────────────────────────────────────────────────────────

/// Asks the LLM for a JSON array of skills. Any call or parse failure
/// degrades to an empty set.
pub struct ModelBasedExtractor {
    llm: LlmClient,
}

impl ModelBasedExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SkillExtractor for ModelBasedExtractor {
    async fn extract(&self, text: &str) -> SkillSet {
        if text.trim().is_empty() {
            return SkillSet::new();
        }

        let prompt = SKILL_EXTRACTION_PROMPT_TEMPLATE.replace("{text}", text);
        let reply = match self.llm.call_text(&prompt, SKILL_EXTRACTION_SYSTEM).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Skill extraction call failed, using empty skill set: {e}");
                return SkillSet::new();
            }
        };

        match parse_skill_reply(&reply) {
            Ok(skills) => {
                debug!("LLM extracted {} skills", skills.len());
                skills
            }
            Err(e) => {
                warn!("Skill extraction reply unparseable, using empty skill set: {e}");
                SkillSet::new()
            }
        }
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

/// Accepts `["a", "b"]` or `{"skills": ["a", "b"]}`; non-string items are skipped.
pub fn parse_skill_reply(raw: &str) -> Result<SkillSet, ParseError> {
    let value = sanitize_json(raw)?;
    let items: &[Value] = match &value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => map
            .get("skills")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    };

    Ok(items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect())
}
