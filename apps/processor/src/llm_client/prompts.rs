// Shared prompt fragments.
// Extraction-specific templates live in extraction/prompts.rs.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured data extraction assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every extraction prompt to keep the model from guessing.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    CRITICAL: Only use facts present in the input. \
    If a field cannot be determined, use null. Never invent companies, dates or degrees.";
