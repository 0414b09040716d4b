use crate::domain::ComposedPrompt;

pub const DEFAULT_MAX_DOCUMENT_CHARS: usize = 15_000;

const TRUNCATION_MARKER: &str = "--- (Content truncated if very long)";

/// Builds the two-segment prompt sent to the language model.
///
/// Document text is cut to `max_document_chars` characters (not bytes, not
/// tokens) before it is embedded. The cut is silent; the model is told through
/// a fixed marker that the excerpt may be incomplete.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    persona: String,
    max_document_chars: usize,
}

impl PromptComposer {
    pub fn new(persona: impl Into<String>, max_document_chars: usize) -> Self {
        Self {
            persona: persona.into(),
            max_document_chars,
        }
    }

    pub fn max_document_chars(&self) -> usize {
        self.max_document_chars
    }

    pub fn compose(&self, extracted_text: &str, user_query: &str) -> ComposedPrompt {
        let (excerpt, truncated) = truncate_chars(extracted_text, self.max_document_chars);

        let task = format!(
            "Based on the following study material:\n\n---\n{excerpt}\n{TRUNCATION_MARKER}\n\nNow, {user_query}"
        );

        ComposedPrompt::new(self.persona.clone(), excerpt.to_string(), task, truncated)
    }
}

/// Returns the first `max_chars` characters of `text` and whether anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}
