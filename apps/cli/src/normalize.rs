//! Response normalizer.
//!
//! Turns a free-text AI reply into a structured analysis result. The
//! upstream model is non-deterministic, so everything here must be pure:
//! the same reply always normalizes to the same result, with no I/O and
//! nothing read from the environment.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::api_client::UploadResponse;

/// Score used when the reply contains no numeric token at all.
pub const FALLBACK_SCORE: u8 = 70;

/// First run of one to three ASCII digits, optionally followed by a percent
/// sign. Matches the first number anywhere in the reply, not just a labeled
/// score line. The class is `[0-9]`, not `\d`: Rust's `\d` also matches
/// Unicode digits, which never parse as a score.
static SCORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]{1,3})%?").expect("score regex"));

/// Section headings recognized in the pinned report format, keyed to the
/// detail name they populate.
const SECTION_KEYS: [(&str, &str); 4] = [
    ("Summary:", "summary"),
    ("Strengths:", "strengths"),
    ("Areas to Improve:", "improvements"),
    ("Suggestions:", "suggestions"),
];

/// Headings that close the current section without opening one. Keeps the
/// score line out of the summary body.
const BOUNDARY_HEADINGS: [&str; 2] = ["Resume Analysis Report", "ATS Score:"];

/// Structured result of one normalization pass over one AI reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// The unmodified reply text.
    pub reply: String,
    /// ATS score in `[0, 100]`.
    pub score: u8,
    /// Labeled snippets pulled out of the reply. `raw` is always present
    /// and holds the full reply; the section keys are best-effort and may
    /// be absent.
    pub details: BTreeMap<String, String>,
    /// Rewritten resume text, when the upload endpoint supplied one. Never
    /// set by `normalize` itself.
    pub improved_resume: Option<String>,
}

impl AnalysisResult {
    /// Builds a result from the upload endpoint's body. A score reported in
    /// the body wins over anything extracted from the summary text; detail
    /// entries from the body override extracted sections of the same name.
    pub fn from_upload(response: UploadResponse) -> Self {
        let summary = response.summary.unwrap_or_default();
        let mut result = normalize(&summary);
        if let Some(score) = response.score {
            result.score = clamp_score(score);
        }
        if let Some(extra) = response.details {
            for (key, value) in extra {
                result.details.insert(key, value);
            }
        }
        result.improved_resume = response.improved_resume;
        result
    }
}

/// One normalization pass over one AI reply. Pure and deterministic.
pub fn normalize(reply: &str) -> AnalysisResult {
    let mut details = BTreeMap::new();
    details.insert("raw".to_string(), reply.to_string());
    for (key, body) in extract_sections(reply) {
        details.insert(key.to_string(), body);
    }
    AnalysisResult {
        reply: reply.to_string(),
        score: extract_score(reply),
        details,
        improved_resume: None,
    }
}

/// Extracts the first run of one to three ASCII digits in `reply` as the
/// score. No token at all yields [`FALLBACK_SCORE`]. Out-of-range tokens (`999`)
/// clamp to 100 so the score range invariant holds without tightening the
/// loose pattern itself.
pub fn extract_score(reply: &str) -> u8 {
    SCORE_RE
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u16>().ok())
        .map(|n| n.min(100) as u8)
        .unwrap_or(FALLBACK_SCORE)
}

/// Rounds a backend-reported score into `[0, 100]`. Out-of-range and
/// non-finite values saturate rather than error.
pub(crate) fn clamp_score(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}

/// Splits a structured report into labeled sections. Headings may carry
/// leading decoration (emoji, bullets, numbering); anything between one
/// heading and the next becomes the section body. Lines before the first
/// heading are ignored, and empty sections are dropped.
fn extract_sections(reply: &str) -> Vec<(&'static str, String)> {
    let mut sections = Vec::new();
    let mut current: Option<(&'static str, Vec<&str>)> = None;

    for line in reply.lines() {
        match classify(line) {
            Some((key, first)) => {
                if let Some((name, body)) = current.take() {
                    finish_section(&mut sections, name, &body);
                }
                if let Some(name) = key {
                    let mut body = Vec::new();
                    if !first.is_empty() {
                        body.push(first);
                    }
                    current = Some((name, body));
                }
            }
            None => {
                if let Some((_, body)) = current.as_mut() {
                    body.push(line);
                }
            }
        }
    }
    if let Some((name, body)) = current.take() {
        finish_section(&mut sections, name, &body);
    }
    sections
}

/// Identifies a heading line. Returns the section key (or `None` for a
/// boundary heading) plus any body text sharing the heading's line.
fn classify(line: &str) -> Option<(Option<&'static str>, &str)> {
    let stripped = line.trim_start_matches(|c: char| !c.is_ascii_alphanumeric());
    for (needle, key) in SECTION_KEYS {
        if let Some(rest) = stripped.strip_prefix(needle) {
            return Some((Some(key), rest.trim()));
        }
    }
    for needle in BOUNDARY_HEADINGS {
        if stripped.starts_with(needle) {
            return Some((None, ""));
        }
    }
    None
}

fn finish_section(sections: &mut Vec<(&'static str, String)>, key: &'static str, body: &[&str]) {
    let text = body.join("\n").trim().to_string();
    if !text.is_empty() {
        sections.push((key, text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "Resume Analysis Report\n\n\
        Summary:\nA well-rounded backend resume with clear impact statements.\n\n\
        ATS Score: 88\n\n\
        Strengths:\n- Strong Rust experience\n- Quantified achievements\n\n\
        Areas to Improve:\n- Add a skills section\n\n\
        Suggestions:\nUse more action verbs.";

    #[test]
    fn test_score_extracted_from_report() {
        assert_eq!(extract_score(REPORT), 88);
    }

    #[test]
    fn test_score_with_percent_sign() {
        assert_eq!(extract_score("Your resume scored 85% overall."), 85);
    }

    #[test]
    fn test_single_digit_score() {
        assert_eq!(extract_score("Score: 7"), 7);
    }

    #[test]
    fn test_missing_score_falls_back_to_70() {
        let result = normalize("Great resume, no numbers here.");
        assert_eq!(result.score, FALLBACK_SCORE);
    }

    #[test]
    fn test_out_of_range_token_clamps_to_100() {
        assert_eq!(extract_score("ATS Score: 999"), 100);
    }

    #[test]
    fn test_first_digit_run_wins_even_when_irrelevant() {
        // The loose pattern grabs whatever number comes first. Kept as is.
        assert_eq!(extract_score("In 2 pages you scored 90."), 2);
    }

    #[test]
    fn test_leading_zeros_parse() {
        assert_eq!(extract_score("Score: 07"), 7);
    }

    #[test]
    fn test_non_ascii_digits_are_not_scores() {
        // U+0663 is the Arabic-Indic digit three; only ASCII runs count.
        assert_eq!(extract_score("Page \u{0663} of resume. ATS Score: 85"), 85);
    }

    #[test]
    fn test_raw_detail_always_present() {
        let result = normalize("free-form reply");
        assert_eq!(result.details.get("raw").map(String::as_str), Some("free-form reply"));
        assert_eq!(result.reply, "free-form reply");
    }

    #[test]
    fn test_empty_reply_normalizes() {
        let result = normalize("");
        assert_eq!(result.score, FALLBACK_SCORE);
        assert_eq!(result.details.get("raw").map(String::as_str), Some(""));
        assert!(result.improved_resume.is_none());
    }

    #[test]
    fn test_normalize_is_deterministic() {
        assert_eq!(normalize(REPORT), normalize(REPORT));
    }

    #[test]
    fn test_sections_extracted_from_report() {
        let result = normalize(REPORT);
        assert_eq!(
            result.details.get("summary").map(String::as_str),
            Some("A well-rounded backend resume with clear impact statements.")
        );
        assert_eq!(
            result.details.get("strengths").map(String::as_str),
            Some("- Strong Rust experience\n- Quantified achievements")
        );
        assert_eq!(
            result.details.get("improvements").map(String::as_str),
            Some("- Add a skills section")
        );
        assert_eq!(
            result.details.get("suggestions").map(String::as_str),
            Some("Use more action verbs.")
        );
    }

    #[test]
    fn test_score_line_stays_out_of_summary() {
        let result = normalize(REPORT);
        let summary = result.details.get("summary").unwrap();
        assert!(!summary.contains("ATS Score"));
    }

    #[test]
    fn test_decorated_headings_recognized() {
        let reply = "\u{1F9E0} Summary: concise and focused\n\u{2705} Strengths:\n- Clear layout";
        let result = normalize(reply);
        assert_eq!(
            result.details.get("summary").map(String::as_str),
            Some("concise and focused")
        );
        assert_eq!(
            result.details.get("strengths").map(String::as_str),
            Some("- Clear layout")
        );
    }

    #[test]
    fn test_free_text_has_only_raw_detail() {
        let result = normalize("Just a paragraph with no headings at all.");
        assert_eq!(result.details.len(), 1);
        assert!(result.details.contains_key("raw"));
    }

    #[test]
    fn test_clamp_score_rounds_and_saturates() {
        assert_eq!(clamp_score(85.4), 85);
        assert_eq!(clamp_score(85.6), 86);
        assert_eq!(clamp_score(-3.0), 0);
        assert_eq!(clamp_score(250.0), 100);
        assert_eq!(clamp_score(f64::NAN), 0);
    }

    #[test]
    fn test_from_upload_prefers_body_score() {
        let response = UploadResponse {
            success: true,
            score: Some(42.0),
            summary: Some("ATS Score: 99".to_string()),
            details: None,
            improved_resume: None,
        };
        assert_eq!(AnalysisResult::from_upload(response).score, 42);
    }

    #[test]
    fn test_from_upload_without_score_normalizes_summary() {
        let response = UploadResponse {
            success: true,
            score: None,
            summary: Some("Scored 64 against the target role.".to_string()),
            details: None,
            improved_resume: None,
        };
        assert_eq!(AnalysisResult::from_upload(response).score, 64);
    }

    #[test]
    fn test_from_upload_merges_details_and_improved_resume() {
        let mut extra = BTreeMap::new();
        extra.insert("keywords".to_string(), "rust, tokio".to_string());
        let response = UploadResponse {
            success: true,
            score: Some(55.0),
            summary: Some("Needs work.".to_string()),
            details: Some(extra),
            improved_resume: Some("JANE DOE".to_string()),
        };
        let result = AnalysisResult::from_upload(response);
        assert_eq!(result.details.get("keywords").map(String::as_str), Some("rust, tokio"));
        assert_eq!(result.details.get("raw").map(String::as_str), Some("Needs work."));
        assert_eq!(result.improved_resume.as_deref(), Some("JANE DOE"));
    }
}
