//! The five answering strategies. Each is a pure function of the question
//! and context; every user-visible reply string lives in this module.

use crate::types::TranscriptMessage;
use std::collections::HashMap;

/// Terms that flag a question as off-topic for transcript search.
const OFF_TOPIC: [&str; 5] = ["weather", "temperature", "news", "sports", "politics"];

const REDIRECT: &str = "I can see transcription content is available. Could you be more specific about what you'd like to know? I can help with summaries, key points, speaker analysis, or search for specific topics.";

/// Space-joined content of the final messages only, trimmed. Interim text
/// is still subject to revision and never feeds text-derived answers.
fn final_text(context: &[TranscriptMessage]) -> String {
    context
        .iter()
        .filter(|m| m.is_final)
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Word split: runs of non-word characters are separators.
fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| !w.is_empty())
}

/// Extractive summary: the first three sentences of substance.
pub fn summarize(context: &[TranscriptMessage]) -> String {
    let text = final_text(context);
    if text.is_empty() {
        return "No transcription content available to summarize yet.".to_string();
    }

    // Fragments keep their leading whitespace so the joined output matches
    // the source text byte-for-byte between terminators.
    let picked: Vec<&str> = text
        .split(['.', '!', '?'])
        .filter(|s| s.trim().chars().count() > 10)
        .take(3)
        .collect();

    format!(
        "Here's a summary of the transcription so far: {}.",
        picked.join(". ").trim()
    )
}

/// Key topics: the five most frequent words longer than four characters.
/// Ties keep first-encounter order (stable sort on descending count).
pub fn key_topics(context: &[TranscriptMessage]) -> String {
    let text = final_text(context);
    if text.is_empty() {
        return "No transcription content available to extract key points from yet.".to_string();
    }

    let lower = text.to_lowercase();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for word in words(&lower) {
        if word.chars().count() > 4 {
            if !counts.contains_key(word) {
                order.push(word);
            }
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    let top: Vec<&str> = order.into_iter().take(5).collect();

    format!("Key topics mentioned include: {}.", top.join(", "))
}

/// Speaker analysis considers every supplied message, interim included.
/// Empty labels count as "no speaker identified".
pub fn speakers(context: &[TranscriptMessage]) -> String {
    let distinct: std::collections::HashSet<&str> = context
        .iter()
        .filter_map(|m| m.speaker_id.as_deref())
        .filter(|s| !s.is_empty())
        .collect();

    if distinct.is_empty() {
        "No speaker identification available in the transcription.".to_string()
    } else {
        format!(
            "I can identify {} different speaker(s) in the transcription.",
            distinct.len()
        )
    }
}

/// Span between the first and last context messages *by input position*,
/// not by timestamp. Callers that supply messages out of chronological
/// order (the recent-context query returns newest first) get a wrong or
/// negative span. Long-standing behaviour, kept until a product decision
/// says otherwise.
pub fn timing(context: &[TranscriptMessage]) -> String {
    let (Some(first), Some(last)) = (context.first(), context.last()) else {
        return "No transcription messages available to analyze timing.".to_string();
    };

    // Floor division, so negative spans floor toward minus infinity.
    let millis = (last.timestamp - first.timestamp).num_milliseconds();
    let minutes = millis.div_euclid(60_000);

    format!("The transcription spans approximately {} minutes.", minutes)
}

/// Free-text fallback: find the first sentence mentioning any question
/// word longer than three characters, or redirect.
pub fn search(lower_question: &str, context: &[TranscriptMessage]) -> String {
    let text = final_text(context);
    if text.is_empty() {
        return "I don't have any transcription content to work with yet. Please start a transcription session first.".to_string();
    }

    if OFF_TOPIC.iter().any(|term| lower_question.contains(term)) {
        return REDIRECT.to_string();
    }

    let tokens: Vec<&str> = words(lower_question)
        .filter(|w| w.chars().count() > 3)
        .collect();

    let hit = text.split(['.', '!', '?']).find(|sentence| {
        let sentence_lower = sentence.to_lowercase();
        tokens.iter().any(|w| sentence_lower.contains(w))
    });

    match hit {
        Some(sentence) => format!(
            "Based on the transcription, here's what I found: {}.",
            sentence.trim()
        ),
        None => REDIRECT.to_string(),
    }
}
