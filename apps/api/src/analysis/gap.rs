//! Gap Analysis: asks the LLM to compare course modules against retrieved
//! job market evidence and returns structured curriculum edits.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::analysis::prompts::{GAP_ANALYSIS_PROMPT_TEMPLATE, GAP_ANALYSIS_SYSTEM};
use crate::errors::AppError;
use crate::ingest::jobs::JobChunkMetadata;
use crate::llm_client::prompts::EVIDENCE_ONLY_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::retrieval::vector_index::ScoredChunk;
use crate::retrieval::Chunk;
use crate::skills::trends::SkillFrequencyTable;

/// How many characters of each evidence chunk go into the prompt.
const EVIDENCE_EXCERPT_CHARS: usize = 600;
/// Frequency entries listed in the prompt.
const MAX_FREQUENCY_ENTRIES: usize = 40;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleProposal {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRemoval {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub reason: String,
}

/// Recommended curriculum edits for one course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapAnalysis {
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub modules_to_add: Vec<ModuleProposal>,
    #[serde(default)]
    pub modules_to_remove: Vec<ModuleRemoval>,
    #[serde(default)]
    pub project_suggestions: Vec<String>,
}

/// Everything the gap analysis prompt is built from.
pub struct GapAnalysisInput<'a> {
    pub course_name: &'a str,
    pub evidence: &'a [ScoredChunk],
    pub modules: &'a [&'a Chunk],
    pub trending: &'a [String],
    pub frequency: &'a SkillFrequencyTable,
    pub total_jobs: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Analysis
// ────────────────────────────────────────────────────────────────────────────

/// Runs the LLM gap analysis and drops removals that name unknown modules.
pub async fn analyze_gap(
    llm: &LlmClient,
    input: &GapAnalysisInput<'_>,
) -> Result<GapAnalysis, AppError> {
    let prompt = build_gap_prompt(input);

    let mut analysis: GapAnalysis = llm
        .call_json(&prompt, GAP_ANALYSIS_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Gap analysis failed: {e}")))?;

    analysis.course_name = input.course_name.to_string();
    retain_known_removals(&mut analysis, input.modules);

    info!(
        "Gap analysis for '{}': {} missing skills, +{} / -{} modules",
        analysis.course_name,
        analysis.missing_skills.len(),
        analysis.modules_to_add.len(),
        analysis.modules_to_remove.len()
    );
    Ok(analysis)
}

/// Fills the gap analysis template from retrieved evidence and trend data.
pub fn build_gap_prompt(input: &GapAnalysisInput<'_>) -> String {
    let modules: Vec<Value> = input
        .modules
        .iter()
        .map(|m| {
            json!({
                "id": m.metadata.get("moduleId").cloned().unwrap_or(Value::Null),
                "title": m.metadata.get("moduleTitle").cloned().unwrap_or(Value::Null),
                "skills": m.metadata.get("moduleSkills").cloned().unwrap_or_else(|| json!([])),
                "shortDescription": m.metadata.get("shortDescription").cloned().unwrap_or(Value::Null),
            })
        })
        .collect();

    GAP_ANALYSIS_PROMPT_TEMPLATE
        .replace("{evidence_instruction}", EVIDENCE_ONLY_INSTRUCTION)
        .replace("{course_name}", input.course_name)
        .replace("{modules_json}", &pretty(&Value::Array(modules)))
        .replace("{evidence}", &format_evidence(input.evidence))
        .replace("{trending_json}", &pretty(&json!(input.trending)))
        .replace("{frequency_lines}", &format_frequency(input.frequency))
        .replace("{total_jobs}", &input.total_jobs.to_string())
}

/// "- skill: count" lines, most frequent first, then alphabetical.
fn format_frequency(frequency: &SkillFrequencyTable) -> String {
    let mut entries: Vec<(&String, &usize)> = frequency.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(MAX_FREQUENCY_ENTRIES)
        .map(|(skill, count)| format!("- {skill}: {count}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Numbered evidence list: "{title} @ {company}", skills, then an excerpt.
fn format_evidence(evidence: &[ScoredChunk]) -> String {
    if evidence.is_empty() {
        return "(no job postings retrieved)".to_string();
    }

    evidence
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            let (title, company, skills) = match JobChunkMetadata::from_metadata(&hit.metadata) {
                Some(meta) => (meta.job_title, meta.company, meta.extracted_skills),
                None => ("Unknown role".to_string(), String::new(), Vec::new()),
            };
            let excerpt: String = hit.text.chars().take(EVIDENCE_EXCERPT_CHARS).collect();
            format!(
                "{}. {} @ {}\n   Skills: {}\n   Excerpt: {}",
                i + 1,
                title,
                company,
                skills.join(", "),
                excerpt
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Removals must reference a module of the course, by id or exact title.
fn retain_known_removals(analysis: &mut GapAnalysis, modules: &[&Chunk]) {
    let before = analysis.modules_to_remove.len();
    analysis.modules_to_remove.retain(|removal| {
        modules.iter().any(|m| {
            let id_hit = !removal.id.is_null() && m.metadata.get("moduleId") == Some(&removal.id);
            let title_hit = !removal.title.is_empty()
                && m.metadata.get("moduleTitle").and_then(Value::as_str)
                    == Some(removal.title.as_str());
            id_hit || title_hit
        })
    });
    let dropped = before - analysis.modules_to_remove.len();
    if dropped > 0 {
        warn!("Dropped {dropped} module removals referencing unknown modules");
    }
}
