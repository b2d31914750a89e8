// src/quality.rs — AI-slop detection
//
// Local scan for language patterns that make generated content sound robotic
// or generic. The evaluator runs this alongside the model critique and
// surfaces hits in the structured feedback; the scoring itself stays with the
// external evaluator.

/// Forbidden keywords and phrases. Single words match on word boundaries;
/// phrases match with flexible whitespace.
pub const SLOP_KEYWORDS: &[&str] = &[
    // Single words
    "delve",
    "unveil",
    "landscape",
    "realm",
    "unlock",
    "leverage",
    "utilize",
    "robust",
    "streamline",
    "cutting-edge",
    "revolutionary",
    "harness",
    "paradigm",
    "synergy",
    "game-changer",
    // Phrases
    "in today's fast-paced world",
    "it's important to note",
    "let's explore",
    "dive deep",
    "best practices",
];

/// Scan content for forbidden patterns. Returns the specific keywords found,
/// empty when the content is clean.
pub fn detect_slop(content: &str) -> Vec<&'static str> {
    if content.is_empty() {
        return Vec::new();
    }

    let lowered = content.to_lowercase();
    // Collapse whitespace once so phrases match across line breaks.
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    let words: Vec<&str> = collapsed
        .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '\''))
        .filter(|w| !w.is_empty())
        .collect();

    SLOP_KEYWORDS
        .iter()
        .filter(|keyword| {
            if keyword.contains(' ') {
                collapsed.contains(*keyword)
            } else {
                // Word-boundary match so "landscape" doesn't flag "landscapes".
                words.iter().any(|w| w == *keyword)
            }
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_single_word() {
        assert_eq!(detect_slop("Let us delve into the topic"), vec!["delve"]);
    }

    #[test]
    fn test_detects_hyphenated_word() {
        assert_eq!(
            detect_slop("This cutting-edge spindle design"),
            vec!["cutting-edge"]
        );
    }

    #[test]
    fn test_word_boundary_no_false_positive() {
        // "landscapes" and "unlocked" are different words
        assert!(detect_slop("rolling landscapes and unlocked doors").is_empty());
    }

    #[test]
    fn test_detects_phrase_across_whitespace() {
        let content = "As we know, in today's\nfast-paced   world, machining moves fast.";
        assert_eq!(detect_slop(content), vec!["in today's fast-paced world"]);
    }

    #[test]
    fn test_clean_content() {
        let content = "Chatter at 12,000 RPM usually means the toolholder, not the tool.";
        assert!(detect_slop(content).is_empty());
    }

    #[test]
    fn test_empty_content() {
        assert!(detect_slop("").is_empty());
    }

    #[test]
    fn test_multiple_hits_in_keyword_order() {
        let found = detect_slop("We leverage synergy to delve deeper.");
        assert_eq!(found, vec!["delve", "leverage", "synergy"]);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(detect_slop("A REVOLUTIONARY approach"), vec!["revolutionary"]);
    }
}
