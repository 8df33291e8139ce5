// Prompt constants for report generation. The grounding rules are strict on
// purpose: the model may only use the fetched context, must say when data is
// insufficient, and must not speculate.

/// System prompt for report generation.
pub const REPORT_SYSTEM: &str = "You are a professional market analyst. \
    You write factual, concise trade opportunity reports in valid Markdown. \
    You MUST use ONLY the context provided in the prompt. \
    Do NOT add facts outside the given context. \
    Do NOT guess or assume missing information. \
    If data is insufficient, clearly state \"Data not available\". \
    No marketing language, no exaggeration, no speculative predictions.";

/// Report prompt template. Replace `{sector}` and `{context}` before sending.
pub const REPORT_PROMPT_TEMPLATE: &str = r#"TASK:
Analyze the **{sector} sector in India** using ONLY the information
provided in the context below.

CONTEXT (REAL-TIME DATA):
{context}

OUTPUT FORMAT (VALID MARKDOWN ONLY):
## Market Overview
## Key Trends
## Trade Opportunities
## Risks & Challenges

STYLE:
- Bullet points where possible
- Return ONLY raw markdown text"#;

/// Fills the report template with the sector name and fetched context.
pub fn build_report_prompt(sector: &str, context: &str) -> String {
    REPORT_PROMPT_TEMPLATE
        .replace("{sector}", sector)
        .replace("{context}", context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_sector_and_context() {
        let prompt = build_report_prompt("pharma", "- A: first");
        assert!(prompt.contains("**pharma sector in India**"));
        assert!(prompt.contains("- A: first"));
        assert!(!prompt.contains("{sector}"));
        assert!(!prompt.contains("{context}"));
    }
}
