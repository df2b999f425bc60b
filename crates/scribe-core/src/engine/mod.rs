//! Context-scoped question answering over transcript messages.
//!
//! A single call classifies the question with a keyword cascade and applies
//! one of five extraction strategies to the supplied context. Pure,
//! synchronous, stateless: no storage or network access happens here, and
//! identical inputs always produce identical output.

mod intent;
mod strategies;

#[cfg(test)]
mod tests;

pub use intent::Intent;

use crate::error::{Result, ScribeError};
use crate::types::{MessageId, TranscriptMessage};
use std::panic::{self, AssertUnwindSafe};

/// Fixed reply used when a strategy fails unexpectedly. The assistant
/// never leaves the user without an answer.
const APOLOGY: &str =
    "I'm sorry, I encountered an error while processing your question. Please try again.";

/// An engine reply: the answer text plus the ids of every transcript
/// message supplied as context, in input order — whether or not the
/// text actually drew on them.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub content: String,
    pub context_ids: Vec<MessageId>,
}

/// Answer `question` against the supplied context messages.
///
/// The context list is used exactly as given: no re-sorting, no
/// deduplication. An empty context is valid input. Returns `InvalidInput`
/// only for an empty or whitespace-only question; any failure inside a
/// strategy is contained and converted to a fixed apology reply, returned
/// as a successful call.
pub fn answer(question: &str, context: &[TranscriptMessage]) -> Result<Answer> {
    if question.trim().is_empty() {
        return Err(ScribeError::InvalidInput(
            "question cannot be empty".to_string(),
        ));
    }

    let context_ids: Vec<MessageId> = context.iter().map(|m| m.id).collect();

    let content =
        panic::catch_unwind(AssertUnwindSafe(|| respond(question, context))).unwrap_or_else(|_| {
            log::error!("answer strategy panicked; returning apology reply");
            APOLOGY.to_string()
        });

    Ok(Answer {
        content,
        context_ids,
    })
}

fn respond(question: &str, context: &[TranscriptMessage]) -> String {
    let lower = question.to_lowercase();
    match Intent::classify(&lower) {
        Intent::Summarize => strategies::summarize(context),
        Intent::KeyTopics => strategies::key_topics(context),
        Intent::Speakers => strategies::speakers(context),
        Intent::Timing => strategies::timing(context),
        Intent::Search => strategies::search(&lower, context),
    }
}
