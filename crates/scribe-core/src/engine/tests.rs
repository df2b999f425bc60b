use super::*;
use crate::types::TranscriptMessage;
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use uuid::Uuid;

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
}

fn excerpt(content: &str, is_final: bool) -> TranscriptMessage {
    excerpt_full(content, is_final, None, Utc::now())
}

fn excerpt_full(
    content: &str,
    is_final: bool,
    speaker_id: Option<&str>,
    timestamp: DateTime<Utc>,
) -> TranscriptMessage {
    TranscriptMessage {
        id: Uuid::now_v7(),
        session_id: Uuid::now_v7(),
        content: content.to_string(),
        confidence: 0.9,
        timestamp,
        is_final,
        speaker_id: speaker_id.map(str::to_string),
        created_at: timestamp,
    }
}

// ── Preconditions ────────────────────────────────────────────────────────────

#[test]
fn rejects_empty_question() {
    let err = answer("", &[]).unwrap_err();
    assert!(matches!(err, crate::ScribeError::InvalidInput(_)));
}

#[test]
fn rejects_whitespace_question() {
    let err = answer("   ", &[excerpt("content here", true)]).unwrap_err();
    assert!(matches!(err, crate::ScribeError::InvalidInput(_)));
}

#[test]
fn empty_context_is_valid_input() {
    let reply = answer("Tell me everything", &[]).unwrap();
    assert!(reply.content.contains("don't have any transcription content"));
    assert!(reply.context_ids.is_empty());
}

#[test]
fn summarize_request_with_empty_context_uses_summary_message() {
    let reply = answer("Summarize please", &[]).unwrap();
    assert_eq!(
        reply.content,
        "No transcription content available to summarize yet."
    );
}

// ── Output guarantees ────────────────────────────────────────────────────────

#[test]
fn context_ids_record_every_supplied_message_in_order() {
    let context = vec![
        excerpt("First chunk of the meeting notes.", true),
        excerpt("An interim fragment", false),
        excerpt("Second chunk of the meeting notes.", true),
    ];
    let expected: Vec<Uuid> = context.iter().map(|m| m.id).collect();

    let reply = answer("Please summarize", &context).unwrap();
    assert_eq!(reply.context_ids, expected);
}

#[test]
fn identical_inputs_yield_identical_output() {
    let context = vec![
        excerpt("The budget review went well and everyone agreed.", true),
        excerpt_full("Alice spoke first", false, Some("s1"), Utc::now()),
    ];
    let first = answer("What are the key topics?", &context).unwrap();
    let second = answer("What are the key topics?", &context).unwrap();
    assert_eq!(first, second);
}

// ── Intent classification ────────────────────────────────────────────────────

#[test]
fn classification_cascade_first_match_wins() {
    assert_eq!(Intent::classify("please summarize this"), Intent::Summarize);
    assert_eq!(Intent::classify("give me a summary"), Intent::Summarize);
    // "summary" beats "speaker" because the cascade checks it first
    assert_eq!(Intent::classify("who gave the summary"), Intent::Summarize);
    assert_eq!(Intent::classify("what are the key topics"), Intent::KeyTopics);
    assert_eq!(Intent::classify("key points please"), Intent::KeyTopics);
    // "key" alone is not enough
    assert_eq!(Intent::classify("where is the key"), Intent::Search);
    assert_eq!(Intent::classify("who is speaking"), Intent::Speakers);
    assert_eq!(Intent::classify("speaker count"), Intent::Speakers);
    assert_eq!(Intent::classify("when did this start"), Intent::Timing);
    assert_eq!(Intent::classify("how long was this"), Intent::Timing);
    assert_eq!(Intent::classify("what's the duration"), Intent::Timing);
    assert_eq!(Intent::classify("tell me about the budget"), Intent::Search);
}

// ── Summarization ────────────────────────────────────────────────────────────

#[test]
fn summarizes_final_content() {
    let context = vec![excerpt(
        "Hello world. This is a test sentence for summarization purposes.",
        true,
    )];
    let reply = answer("Please summarize", &context).unwrap();
    assert!(reply
        .content
        .contains("Here's a summary of the transcription so far:"));
    assert!(reply
        .content
        .contains("test sentence for summarization purposes"));
    // "Hello world" is eleven characters and survives the length filter
    assert!(reply.content.contains("Hello world"));
}

#[test]
fn summary_takes_at_most_three_sentences() {
    let context = vec![excerpt(
        "The first sentence is long enough. The second sentence is long enough. \
         The third sentence is long enough. The fourth sentence must not appear.",
        true,
    )];
    let reply = answer("summary", &context).unwrap();
    assert!(reply.content.contains("The third sentence is long enough"));
    assert!(!reply.content.contains("fourth"));
}

#[test]
fn summary_ignores_interim_messages() {
    let context = vec![excerpt(
        "This interim text would otherwise dominate the summary entirely.",
        false,
    )];
    let reply = answer("Please summarize", &context).unwrap();
    assert_eq!(
        reply.content,
        "No transcription content available to summarize yet."
    );
}

#[test]
fn summary_drops_short_fragments() {
    let context = vec![excerpt("Yes. Ok! A genuinely substantial sentence here.", true)];
    let reply = answer("summarize", &context).unwrap();
    assert!(!reply.content.contains("Yes"));
    assert!(reply.content.contains("A genuinely substantial sentence here"));
}

// ── Key topics ───────────────────────────────────────────────────────────────

#[test]
fn key_topics_rank_by_frequency() {
    let context = vec![excerpt(
        "budget marketing budget planning",
        true,
    )];
    let reply = answer("What are the key topics?", &context).unwrap();
    assert!(reply.content.contains("Key topics mentioned include:"));
    let budget = reply.content.find("budget").unwrap();
    let marketing = reply.content.find("marketing").unwrap();
    let planning = reply.content.find("planning").unwrap();
    assert!(budget < marketing);
    assert!(budget < planning);
}

#[test]
fn key_topics_ties_keep_first_encounter_order() {
    let context = vec![excerpt("zebra apple zebra apple mango", true)];
    let reply = answer("key points?", &context).unwrap();
    // zebra and apple both appear twice; zebra was seen first
    let zebra = reply.content.find("zebra").unwrap();
    let apple = reply.content.find("apple").unwrap();
    let mango = reply.content.find("mango").unwrap();
    assert!(zebra < apple);
    assert!(apple < mango);
}

#[test]
fn key_topics_ignore_short_words() {
    let context = vec![excerpt("the and for with cat dog strategy strategy", true)];
    let reply = answer("key topics", &context).unwrap();
    assert!(reply.content.contains("strategy"));
    assert!(!reply.content.contains("cat"));
}

#[test]
fn key_topics_without_final_content() {
    let reply = answer("key points?", &[excerpt("interim only", false)]).unwrap();
    assert_eq!(
        reply.content,
        "No transcription content available to extract key points from yet."
    );
}

// ── Speaker analysis ─────────────────────────────────────────────────────────

#[test]
fn counts_distinct_speakers_across_final_and_interim() {
    let now = Utc::now();
    let context = vec![
        excerpt_full("first", true, Some("s1"), now),
        excerpt_full("second", false, Some("s2"), now),
        excerpt_full("third", true, Some("s1"), now),
        excerpt_full("fourth", true, None, now),
    ];
    let reply = answer("Who is speaking?", &context).unwrap();
    assert_eq!(
        reply.content,
        "I can identify 2 different speaker(s) in the transcription."
    );
}

#[test]
fn no_speakers_identified() {
    let context = vec![excerpt("nobody labelled this", true)];
    let reply = answer("who said that", &context).unwrap();
    assert_eq!(
        reply.content,
        "No speaker identification available in the transcription."
    );
}

#[test]
fn empty_speaker_labels_count_as_absent() {
    let now = Utc::now();
    let context = vec![excerpt_full("first", true, Some(""), now)];
    let reply = answer("who is speaking", &context).unwrap();
    assert_eq!(
        reply.content,
        "No speaker identification available in the transcription."
    );
}

// ── Timing analysis ──────────────────────────────────────────────────────────

#[test]
fn timing_floors_whole_minutes() {
    let context = vec![
        excerpt_full("start", true, None, at("2024-01-01T10:00:00Z")),
        excerpt_full("end", true, None, at("2024-01-01T10:05:30Z")),
    ];
    let reply = answer("How long was this?", &context).unwrap();
    assert!(reply.content.contains("5 minutes"));
}

#[test]
fn timing_uses_input_position_not_timestamp_order() {
    // Reversed input: the "first" element is chronologically later, so the
    // span goes negative and floors toward minus infinity.
    let context = vec![
        excerpt_full("end", true, None, at("2024-01-01T10:05:30Z")),
        excerpt_full("start", true, None, at("2024-01-01T10:00:00Z")),
    ];
    let reply = answer("How long was this?", &context).unwrap();
    assert!(reply.content.contains("-6 minutes"));
}

#[test]
fn timing_with_empty_context() {
    let reply = answer("how long", &[]).unwrap();
    assert_eq!(
        reply.content,
        "No transcription messages available to analyze timing."
    );
}

#[test]
fn timing_considers_interim_messages() {
    let context = vec![
        excerpt_full("start", false, None, at("2024-01-01T10:00:00Z")),
        excerpt_full("end", false, None, at("2024-01-01T10:03:00Z")),
    ];
    let reply = answer("when", &context).unwrap();
    assert!(reply.content.contains("3 minutes"));
}

// ── Generic / search ─────────────────────────────────────────────────────────

#[test]
fn search_returns_first_matching_sentence() {
    let context = vec![excerpt(
        "The weather talk was cut short. The marketing budget was approved. \
         Planning resumes next week.",
        true,
    )];
    let reply = answer("What about the budget?", &context).unwrap();
    assert_eq!(
        reply.content,
        "Based on the transcription, here's what I found: The marketing budget was approved."
    );
}

#[test]
fn off_topic_probe_redirects() {
    let context = vec![excerpt("project discussion", true)];
    let reply = answer("What's the weather today?", &context).unwrap();
    assert!(reply.content.contains("Could you be more specific"));
}

#[test]
fn unmatched_search_redirects() {
    let context = vec![excerpt("We only talked about deadlines here.", true)];
    let reply = answer("any elephants juggling?", &context).unwrap();
    assert!(reply.content.contains("Could you be more specific"));
}

#[test]
fn search_with_only_short_question_words_redirects() {
    let context = vec![excerpt("We only talked about deadlines here.", true)];
    let reply = answer("so is it ok", &context).unwrap();
    assert!(reply.content.contains("Could you be more specific"));
}

#[test]
fn search_without_final_content() {
    let context = vec![excerpt("interim text about budget", false)];
    let reply = answer("anything about the budget?", &context).unwrap();
    assert!(reply.content.contains("don't have any transcription content"));
    assert!(reply.content.contains("start a transcription session"));
}

// ── Properties ───────────────────────────────────────────────────────────────

prop_compose! {
    fn arb_excerpt()(
        content in "[a-zA-Z ]{1,60}",
        is_final in any::<bool>(),
        speaker in proptest::option::of("[a-z]{1,8}"),
        offset_secs in 0i64..86_400,
    ) -> TranscriptMessage {
        excerpt_full(
            &content,
            is_final,
            speaker.as_deref(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(offset_secs),
        )
    }
}

proptest! {
    #[test]
    fn any_question_gets_a_reply_and_full_id_passthrough(
        question in "[a-z]{1,12}( [a-z]{1,12}){0,6}",
        context in proptest::collection::vec(arb_excerpt(), 0..8),
    ) {
        let reply = answer(&question, &context).unwrap();
        prop_assert!(!reply.content.is_empty());
        let expected: Vec<Uuid> = context.iter().map(|m| m.id).collect();
        prop_assert_eq!(reply.context_ids, expected);
    }
}
