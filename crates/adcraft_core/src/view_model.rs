use crate::{JobId, JobStatus, Outcome, ProgressState, SessionPhase};

/// Characters shown in a collapsed script card.
pub const PREVIEW_CHARS: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionViewModel {
    pub phase: SessionPhase,
    pub job_id: Option<JobId>,
    pub job_status: Option<JobStatus>,
    pub progress: ProgressState,
    pub narration_index: Option<usize>,
    pub outcome: Option<Outcome>,
}

/// Collapsed preview of generated content: the first [`PREVIEW_CHARS`]
/// characters, followed by `...` when anything was cut.
pub fn script_preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

/// Card title such as `Openai / gpt-4`.
pub fn provider_label(provider: &str, model: &str) -> String {
    let mut chars = provider.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{capitalized} / {model}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_kept_as_is() {
        assert_eq!(script_preview("Sleep better tonight."), "Sleep better tonight.");
        let exact = "a".repeat(PREVIEW_CHARS);
        assert_eq!(script_preview(&exact), exact);
    }

    #[test]
    fn long_content_is_cut_on_char_boundary() {
        let content = "é".repeat(PREVIEW_CHARS + 10);
        let preview = script_preview(&content);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn provider_label_capitalizes_provider() {
        assert_eq!(provider_label("openai", "gpt-4"), "Openai / gpt-4");
        assert_eq!(provider_label("", "x"), " / x");
    }
}
