// Shared prompt constants.
// Section instructions live in derivation::prompts; this file holds the
// cross-cutting system prompt sent with every completion.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise résumé data extractor. \
    You MUST respond with valid JSON only, matching the schema in the request exactly. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Use null for fields the résumé does not mention. \
    Never invent details that are not present in the text.";
