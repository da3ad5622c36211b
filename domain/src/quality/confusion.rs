//! Confusion detection.
//!
//! A polishing step sometimes answers with a question or a refusal instead of
//! an answer. The engine treats the detector as a pluggable predicate and
//! keeps the previous output whenever it fires.

/// Predicate flagging output that is not an answer
pub trait ConfusionDetector: Send + Sync {
    fn is_confused(&self, output: &str) -> bool;
}

/// Phrases that open a clarification request or a refusal, lowercase
const DEFAULT_PHRASES: [&str; 14] = [
    "i don't understand",
    "i do not understand",
    "i'm not sure what you",
    "i am not sure what you",
    "could you clarify",
    "could you please clarify",
    "please provide more",
    "please clarify",
    "it is unclear what",
    "it's unclear what",
    "i cannot help with",
    "i can't help with",
    "what do you mean",
    "there is no candidate answer",
];

/// Phrase-matching detector over the opening of the output
#[derive(Debug, Clone)]
pub struct KeywordConfusionDetector {
    phrases: Vec<String>,
    /// Only the first this-many characters are inspected
    window: usize,
}

impl Default for KeywordConfusionDetector {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_PHRASES.iter().map(|p| p.to_string()).collect(),
            window: 400,
        }
    }
}

impl ConfusionDetector for KeywordConfusionDetector {
    fn is_confused(&self, output: &str) -> bool {
        let trimmed = output.trim();
        if trimmed.is_empty() {
            return true;
        }
        let head: String = trimmed.chars().take(self.window).collect::<String>().to_lowercase();
        self.phrases.iter().any(|p| head.contains(p.as_str()))
    }
}
