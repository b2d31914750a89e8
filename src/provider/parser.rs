// src/provider/parser.rs — Model response parsing
//
// Models are asked for bare JSON but routinely wrap it in markdown code
// fences; both layouts are accepted. Anything else is a malformed response,
// surfaced as a GenerationError by the caller — never a fabricated score.

use crate::infra::errors::RalphError;
use crate::provider::{Critique, GeneratedPost};

/// Strip optional ```/```json fences and surrounding whitespace.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the fence line (which may carry a language tag)
    let rest = match rest.split_once('\n') {
        Some((_lang, body)) => body,
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse the generator's JSON payload into a post. Requires non-empty title,
/// excerpt, and body.
pub fn parse_post_response(text: &str) -> Result<GeneratedPost, RalphError> {
    let cleaned = strip_code_fences(text);
    let post: GeneratedPost = serde_json::from_str(cleaned).map_err(|e| {
        RalphError::generation("generate", format!("failed to parse post JSON: {e}"))
    })?;

    for (field, value) in [
        ("title", &post.title),
        ("excerpt", &post.excerpt),
        ("content", &post.body_markdown),
    ] {
        if value.trim().is_empty() {
            return Err(RalphError::generation(
                "generate",
                format!("response field '{field}' is empty"),
            ));
        }
    }
    Ok(post)
}

/// Parse the evaluator's JSON payload into a critique. The score must be a
/// number in [0.0, 1.0].
pub fn parse_critique_response(text: &str) -> Result<Critique, RalphError> {
    let cleaned = strip_code_fences(text);
    let critique: Critique = serde_json::from_str(cleaned).map_err(|e| {
        RalphError::generation("evaluate", format!("failed to parse critique JSON: {e}"))
    })?;

    if !(0.0..=1.0).contains(&critique.score) || critique.score.is_nan() {
        return Err(RalphError::generation(
            "evaluate",
            format!("score must be within [0.0, 1.0], got {}", critique.score),
        ));
    }
    Ok(critique)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST_JSON: &str = r###"{
        "title": "Why Your Probe Cycle Lies",
        "excerpt": "Probing errors compound quietly.",
        "body_markdown": "## The stylus is not the problem\nbody text",
        "tags": ["metrology"]
    }"###;

    #[test]
    fn test_parse_bare_post() {
        let post = parse_post_response(POST_JSON).unwrap();
        assert_eq!(post.title, "Why Your Probe Cycle Lies");
        assert_eq!(post.tags, vec!["metrology"]);
    }

    #[test]
    fn test_parse_fenced_post() {
        let fenced = format!("```json\n{POST_JSON}\n```");
        let post = parse_post_response(&fenced).unwrap();
        assert_eq!(post.title, "Why Your Probe Cycle Lies");
    }

    #[test]
    fn test_parse_fence_without_language_tag() {
        let fenced = format!("```\n{POST_JSON}\n```");
        assert!(parse_post_response(&fenced).is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        let json = r#"{"title": " ", "excerpt": "e", "body_markdown": "b"}"#;
        let err = parse_post_response(json).unwrap_err();
        assert!(err.to_string().contains("'title' is empty"));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = parse_post_response("this is not json").unwrap_err();
        assert!(err.is_generation());
    }

    #[test]
    fn test_parse_critique() {
        let json = r#"{
            "score": 0.78,
            "ai_slop_detected": false,
            "main_issues": ["slow intro"],
            "improvements": ["lead with the example"],
            "strengths": ["concrete numbers"]
        }"#;
        let critique = parse_critique_response(json).unwrap();
        assert!((critique.score - 0.78).abs() < f32::EPSILON);
        assert_eq!(critique.main_issues, vec!["slow intro"]);
    }

    #[test]
    fn test_critique_score_out_of_range() {
        let err = parse_critique_response(r#"{"score": 1.4}"#).unwrap_err();
        assert!(err.to_string().contains("within [0.0, 1.0]"));
    }

    #[test]
    fn test_critique_missing_score_rejected() {
        assert!(parse_critique_response(r#"{"main_issues": []}"#).is_err());
    }

    #[test]
    fn test_strip_fences_plain_text_untouched() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }
}
