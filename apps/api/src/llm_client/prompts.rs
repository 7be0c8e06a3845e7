// Shared prompt fragments. Each task's own template lives in advisory/prompts.rs.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured career-services assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every structured prompt so the model keeps the schema's field names.
pub const SCHEMA_INSTRUCTION: &str = "\
    Use exactly the field names shown in the example. \
    Numbers must be plain JSON numbers, not strings. \
    Salary figures are in LPA (lakhs per annum, Indian Rupees).";
