// Prompts for AI-assisted candidate search.

pub const AI_SEARCH_ROLE: &str = "You are a recruiting assistant that screens \
    evaluated candidates for a hiring manager.";

/// Response schema the adapter accepts; anything else is a protocol error.
pub const AI_SEARCH_SCHEMA: &str = "Your JSON object MUST match exactly this schema: \
    {\"matchIds\": [string]}.";

/// Placeholders: `{query}` and `{candidates}` (a JSON array).
pub const AI_SEARCH_PROMPT_TEMPLATE: &str = r#"A recruiter is searching the candidate pool with this request:

"{query}"

Each candidate below has an id, a name, an overall score (0-100), a verdict and a short summary:

{candidates}

Return the ids of every candidate that satisfies the request.
Only use ids that appear in the list. Return an empty array if nobody matches.

Respond with: {"matchIds": ["<id>", ...]}"#;
