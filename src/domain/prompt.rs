use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptRole {
    System,
    User,
}

impl PromptRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptRole::System => "system",
            PromptRole::User => "user",
        }
    }
}

impl fmt::Display for PromptRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptSegment<'a> {
    pub role: PromptRole,
    pub content: &'a str,
}

/// The outbound prompt for one request: the persona segment followed by the
/// task segment (document excerpt, delimiter and user query).
///
/// Built once by the prompt composer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    persona: String,
    excerpt: String,
    task: String,
    truncated: bool,
}

impl ComposedPrompt {
    pub(crate) fn new(persona: String, excerpt: String, task: String, truncated: bool) -> Self {
        Self {
            persona,
            excerpt,
            task,
            truncated,
        }
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// The document text that made it into the prompt.
    pub fn excerpt(&self) -> &str {
        &self.excerpt
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn was_truncated(&self) -> bool {
        self.truncated
    }

    /// Segments in the order the AI client must send them.
    pub fn segments(&self) -> [PromptSegment<'_>; 2] {
        [
            PromptSegment {
                role: PromptRole::System,
                content: &self.persona,
            },
            PromptSegment {
                role: PromptRole::User,
                content: &self.task,
            },
        ]
    }
}
