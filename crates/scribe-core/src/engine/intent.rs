/// Question intent, picked by a first-match keyword cascade over the
/// lower-cased question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Extractive summary of the final transcript text.
    Summarize,

    /// Most frequent long words in the final transcript text.
    KeyTopics,

    /// Distinct speaker labels across all supplied messages.
    Speakers,

    /// Span between the first and last supplied messages.
    Timing,

    /// Free-text sentence search, with an off-topic redirect.
    Search,
}

impl Intent {
    /// Classify a question. `lower` must already be lower-cased.
    ///
    /// The cascade is ordered and the first match wins: a question
    /// mentioning both "summary" and "speaker" summarises.
    pub fn classify(lower: &str) -> Intent {
        if lower.contains("summary") || lower.contains("summarize") {
            Intent::Summarize
        } else if lower.contains("key") && (lower.contains("point") || lower.contains("topic")) {
            Intent::KeyTopics
        } else if lower.contains("who") || lower.contains("speaker") {
            Intent::Speakers
        } else if lower.contains("when")
            || lower.contains("time")
            || lower.contains("long")
            || lower.contains("duration")
        {
            Intent::Timing
        } else {
            Intent::Search
        }
    }
}
