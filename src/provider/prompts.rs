// src/provider/prompts.rs — Prompt assembly for generation and evaluation

use crate::provider::{Critique, GeneratedPost};
use crate::quality::SLOP_KEYWORDS;
use crate::sources::SeedMaterial;

const POST_FORMAT: &str = r#"Respond with a single JSON object and nothing else:
{
  "title": "post title",
  "excerpt": "one or two sentence summary",
  "body_markdown": "full post body in markdown",
  "tags": ["tag", "tag"]
}"#;

/// First attempt of a run: draft a post from source material.
pub fn seed_prompt(seed: &SeedMaterial) -> String {
    let mut items = String::new();
    for item in &seed.items {
        items.push_str(&format!(
            "- {} ({})\n  {}\n",
            item.title, item.url, item.summary
        ));
    }

    format!(
        "You are a technical writer for an engineering blog. Below are recent \
         items from the field. Pick the angle with the most substance and write \
         one original post about it.\n\n\
         ## Source items\n{items}\n\
         Requirements:\n\
         - 800-1500 words, markdown body\n\
         - Lead with something concrete, not a generic framing\n\
         - Cite specifics from the source items where relevant\n\
         - Plain, direct prose; no filler phrases\n\n\
         {POST_FORMAT}"
    )
}

/// Later attempts: revise the prior draft using its critique.
pub fn revision_prompt(post: &GeneratedPost, critique: &Critique) -> String {
    format!(
        "You are revising a blog post that scored {:.2} out of 1.00 in review. \
         Rewrite it to address every issue below while keeping what works.\n\n\
         ## Issues\n{}\n\
         ## Suggested improvements\n{}\n\
         ## Strengths to keep\n{}\n\
         ## Current draft\n# {}\n\n{}\n\n\
         Return the complete revised post, not a diff.\n\n\
         {POST_FORMAT}",
        critique.score,
        bullet_list(&critique.main_issues),
        bullet_list(&critique.improvements),
        bullet_list(&critique.strengths),
        post.title,
        post.body_markdown,
    )
}

/// Evaluator rubric. The slop keyword list is included verbatim so the model
/// and the local scan flag the same phrases.
pub fn critique_prompt(post: &GeneratedPost) -> String {
    format!(
        "You are a blunt editor reviewing a blog post before publication. \
         Score it and give structured feedback.\n\n\
         ## Rubric\n\
         - Substance: does it say something specific, or restate the obvious?\n\
         - Accuracy: are technical claims plausible and internally consistent?\n\
         - Structure: does it open strong and hold a thread?\n\
         - Voice: does it read like a person wrote it?\n\n\
         Treat these phrases as AI slop and penalize them:\n{}\n\n\
         ## Post\n# {}\n\n{}\n\n\
         Respond with a single JSON object and nothing else:\n\
         {{\n\
           \"score\": 0.0,\n\
           \"ai_slop_detected\": false,\n\
           \"main_issues\": [\"...\"],\n\
           \"improvements\": [\"...\"],\n\
           \"strengths\": [\"...\"]\n\
         }}\n\
         The score is a number in [0.0, 1.0].",
        SLOP_KEYWORDS.join(", "),
        post.title,
        post.body_markdown,
    )
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "- (none)\n".to_string();
    }
    let mut out = String::new();
    for item in items {
        out.push_str(&format!("- {item}\n"));
    }
    out
}
