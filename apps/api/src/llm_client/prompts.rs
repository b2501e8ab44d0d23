// Shared prompt fragments. Each module that calls the LLM keeps its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// Restricts the model to the evidence supplied in the prompt.
pub const EVIDENCE_ONLY_INSTRUCTION: &str = "\
    CRITICAL: Base every conclusion ONLY on the job market evidence supplied below. \
    Do NOT rely on prior knowledge of the job market. \
    If the evidence does not support a recommendation, leave it out.";
