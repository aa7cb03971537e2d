//! Default policy prompts sent to the VLM backend

/// Placeholder replaced by the transcript in the text prompt
pub const TRANSCRIPT_PLACEHOLDER: &str = "{transcript}";

/// Prompt sent alongside every frame or image
pub const DEFAULT_IMAGE_PROMPT: &str = r#"
Act as a strict Meta (Facebook/Instagram) Advertising Policy compliance expert.

Analyze the attached image. It is intended to be used as an ad creative.
Identify potential policy violations based on Meta's Advertising Standards.

Focus specifically on the following policies:
1. Adult Content & Sexual Suggestiveness:
   - Nudity, implied nudity, or excessive visible skin.
   - Sexually suggestive poses.
   - Framing that focuses unnecessarily on specific body parts.
2. Sensational Content: shocking, scary, or gruesome imagery.
3. Low Quality or Disruptive Content.

Assess a risk level (No, Low, Medium, High) for the image.

If the risk level is High or Medium, return Yes; otherwise, return No. Do not provide any explanation.
"#;

/// Prompt sent for the audio transcript; `{transcript}` is substituted
pub const DEFAULT_TEXT_PROMPT: &str = r#"
Act as a strict Meta (Facebook/Instagram) Advertising Policy compliance expert.

Analyze the following transcript of a video's audio track. It is intended to be used as ad creative content.
Identify potential policy violations based on Meta's Advertising Standards.

Focus specifically on the following policies:
1. Adult Content & Sexual Suggestiveness: sexual references, explicit language, innuendo.
2. Sensational Content: shocking, scary, or inappropriate wording.
3. Prohibited Content: hate speech, violence, illegal activities.

Assess a risk level (No, Low, Medium, High) for the text.

If the risk level is High, Medium or Low, return Yes; otherwise, return No. Do not provide any explanation.

Text to analyze:
{transcript}
"#;

/// Fill the transcript into a text prompt template
pub fn render_text_prompt(template: &str, transcript: &str) -> String {
    if template.contains(TRANSCRIPT_PLACEHOLDER) {
        template.replace(TRANSCRIPT_PLACEHOLDER, transcript)
    } else {
        format!("{}\n\n{}", template.trim_end(), transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_prompt_substitutes_placeholder() {
        let rendered = render_text_prompt("Check this:\n{transcript}\nEnd", "buy now");
        assert_eq!(rendered, "Check this:\nbuy now\nEnd");
    }

    #[test]
    fn test_render_text_prompt_appends_without_placeholder() {
        let rendered = render_text_prompt("Check this:", "buy now");
        assert_eq!(rendered, "Check this:\n\nbuy now");
    }

    #[test]
    fn test_default_text_prompt_has_placeholder() {
        assert!(DEFAULT_TEXT_PROMPT.contains(TRANSCRIPT_PLACEHOLDER));
    }
}
