/// System and user messages for one completion request
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const SYSTEM_PROMPT: &str = include_str!("./prompts/system.txt");
const TRANSCRIPT_TEMPLATE: &str = include_str!("./prompts/transcript.txt");
const UPDATES_TEMPLATE: &str = include_str!("./prompts/updates.txt");
const GENERIC_TEMPLATE: &str = include_str!("./prompts/generic.txt");

pub const TRANSCRIPT: &str = "transcript";
pub const UPDATES: &str = "updates";

/// Fills the template for `content_type` with `text`.
///
/// Labels without a dedicated template get the generic one.
pub fn build(text: &str, content_type: &str) -> Prompt {
    let content_type = content_type.trim();
    let template = match content_type.to_ascii_lowercase().as_str() {
        TRANSCRIPT => TRANSCRIPT_TEMPLATE,
        UPDATES => UPDATES_TEMPLATE,
        _ => GENERIC_TEMPLATE,
    };

    // `{text}` last so placeholders inside the text are left alone
    let user = template
        .replace("{content_type}", content_type)
        .replace("{text}", text.trim());

    Prompt {
        system: SYSTEM_PROMPT.trim().to_string(),
        user: user.trim_end().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_template() {
        let prompt = build("  hello world  ", "transcript");
        assert!(prompt.user.starts_with("Please provide a comprehensive summary"));
        assert!(prompt.user.ends_with("Transcript:\nhello world"));
        assert!(!prompt.system.is_empty());
    }

    #[test]
    fn test_updates_template() {
        let prompt = build("- Channel: A, Title: B (Type: upload)", "Updates");
        assert!(prompt.user.contains("subscribed to"));
        assert!(prompt.user.ends_with("- Channel: A, Title: B (Type: upload)"));
    }

    #[test]
    fn test_unknown_label_uses_generic_template() {
        let prompt = build("some notes", "meeting notes");
        assert!(prompt.user.starts_with("Please summarize the following meeting notes."));
        assert!(prompt.user.ends_with("meeting notes:\nsome notes"));
    }

    #[test]
    fn test_placeholders_inside_text_are_not_expanded() {
        let prompt = build("literal {content_type} here", "article");
        assert!(prompt.user.ends_with("literal {content_type} here"));
    }
}
