//! Prompt constants sent to the AI backend.
//!
//! The analysis prompt pins the reply to a fixed report format so the
//! normalizer's section extraction has stable headings to key off.

/// Chat-side prompt for scoring pasted resume text. Replace `{resume_text}`
/// before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are a professional ATS and resume analysis assistant.
Always respond in this exact format:

Resume Analysis Report

Summary:
<Write a 2-3 line summary about the resume>

ATS Score: <Give a score between 0-100>

Strengths:
- <List 3-4 strengths>

Areas to Improve:
- <List 3-4 weaknesses or suggestions>

Suggestions:
<Give specific improvements or formatting tips>

Now analyze this resume text below:
"{resume_text}"
"#;

/// Default prompt for the generate command.
pub const DEFAULT_GENERATION_PROMPT: &str =
    "Generate a professional software developer resume template.";
