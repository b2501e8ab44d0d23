// Prompt constants for LLM-based skill extraction.

/// System prompt for skill extraction. Enforces a bare JSON array.
pub const SKILL_EXTRACTION_SYSTEM: &str = "You are a skill extraction engine for job market analysis. \
    You MUST respond with a JSON array of strings only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Skill extraction prompt. Replace `{text}` before sending.
pub const SKILL_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract ONLY the following from the text below:
- Technical skills
- Tools
- Frameworks
- Libraries
- Concepts

Use the common canonical name for each skill (e.g. "PyTorch", not "pytorch library").
List each skill once.

Return a JSON array, for example:
["Python", "PyTorch", "Docker"]

TEXT:
{text}"#;
