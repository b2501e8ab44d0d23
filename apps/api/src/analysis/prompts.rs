// Prompt constants for curriculum gap analysis.

/// System prompt for gap analysis. Enforces JSON-only output.
pub const GAP_ANALYSIS_SYSTEM: &str = "You are a Dynamic Curriculum Intelligence engine. \
    You compare a course curriculum against job market evidence and recommend edits. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Gap analysis prompt.
/// Replace: {evidence_instruction}, {course_name}, {modules_json},
///          {evidence}, {trending_json}, {frequency_lines}, {total_jobs}
pub const GAP_ANALYSIS_PROMPT_TEMPLATE: &str = r#"{evidence_instruction}

COURSE: {course_name}

CURRENT CURRICULUM MODULES:
{modules_json}

RETRIEVED JOB MARKET EVIDENCE (most relevant postings for this course):
{evidence}

TRENDING SKILLS (appear in at least the trending share of {total_jobs} jobs):
{trending_json}

SKILL FREQUENCY (number of jobs mentioning each skill, most frequent first):
{frequency_lines}

Tasks:
1. Identify skills demanded by the evidence that no module covers
2. Identify modules that are outdated or irrelevant to the evidence
3. Suggest new modules covering the missing skills
4. Suggest updated hands-on projects

Return a JSON object with this EXACT schema:
{
  "missingSkills": ["RAG"],
  "modulesToAdd": [
    {"title": "Vector Databases & RAG", "description": "One or two sentences.", "skills": ["RAG", "Vector Databases"]}
  ],
  "modulesToRemove": [
    {"id": 4, "title": "Clustering", "reason": "Not requested by any retrieved posting"}
  ],
  "projectSuggestions": ["Build a retrieval-augmented Q&A service over company docs"]
}

HARD RULES:
1. `modulesToRemove` entries MUST use an `id` and `title` from the CURRENT CURRICULUM MODULES above
2. Every missing skill must be supported by the retrieved evidence or the trending skills
3. Return empty arrays rather than guessing"#;
