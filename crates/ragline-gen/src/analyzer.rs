//! Conversation context analysis.
//!
//! Classifies the current question against recent history with a fixed
//! rule table: follow-up phrasing, summary requests, and domain topic
//! extraction. Everything here is a pure function of its inputs so the
//! behavior stays deterministic and easy to test.

use std::collections::BTreeSet;

use ragline_core::types::{ContextAnalysis, ConversationMessage};

/// Phrases whose presence marks a question as a follow-up.
const FOLLOW_UP_PHRASES: &[&str] = &[
    "and in total",
    "in total",
    "total?",
    "overall?",
    "combined?",
    "and what about",
    "what about",
    "also",
    "additionally",
    "tell me more",
    "more details",
    "elaborate",
];

/// Leading fragments that mark a question as a follow-up.
const FOLLOW_UP_PREFIXES: &[&str] = &["and ", "also ", "what about ", "how about "];

/// Words that mark a summary/total request.
const SUMMARY_WORDS: &[&str] = &["total", "overall", "combined", "sum", "altogether"];

/// Questions at or below this many whitespace tokens read as follow-ups.
const SHORT_QUESTION_TOKENS: usize = 5;

/// How many trailing messages to scan for topics (three exchanges).
const RECENT_MESSAGE_WINDOW: usize = 6;

/// Domain topic tags and the keywords that trigger them.
const TOPIC_GROUPS: &[(&str, &[&str])] = &[
    ("charitable_giving", &["charity", "charitable", "donation", "donated"]),
    ("insurance", &["insurance", "policy", "coverage", "claim"]),
    ("company_info", &["travelers", "company", "corporation"]),
    ("golf_sponsorship", &["golf", "tournament", "championship"]),
    ("corporate_actions", &["repurchase", "acquisition", "merger"]),
    ("financial_data", &["money", "amount", "cost", "expense"]),
];

/// Stateless analyzer over the current question and recent history.
pub struct ConversationAnalyzer;

impl ConversationAnalyzer {
    /// Classify `question` in the context of `history`.
    ///
    /// An empty history always yields the default analysis: a question with
    /// nothing before it cannot be a follow-up.
    pub fn analyze(question: &str, history: &[ConversationMessage]) -> ContextAnalysis {
        let mut analysis = ContextAnalysis::default();

        if history.is_empty() {
            return analysis;
        }

        let question_lower = question.to_lowercase().trim().to_string();

        analysis.is_follow_up = FOLLOW_UP_PHRASES
            .iter()
            .any(|phrase| question_lower.contains(phrase))
            || question.split_whitespace().count() <= SHORT_QUESTION_TOKENS
            || FOLLOW_UP_PREFIXES
                .iter()
                .any(|prefix| question_lower.starts_with(prefix));

        analysis.summary_request = SUMMARY_WORDS
            .iter()
            .any(|word| question_lower.contains(word));

        analysis.previous_topics = extract_topics(history);
        analysis.context_needed = analysis.is_follow_up && !analysis.previous_topics.is_empty();

        analysis
    }
}

/// Scan the most recent messages for domain topic keywords.
fn extract_topics(history: &[ConversationMessage]) -> BTreeSet<String> {
    let start = history.len().saturating_sub(RECENT_MESSAGE_WINDOW);
    let mut topics = BTreeSet::new();

    for msg in &history[start..] {
        let content_lower = msg.content.to_lowercase();
        for (tag, keywords) in TOPIC_GROUPS {
            if keywords.iter().any(|kw| content_lower.contains(kw)) {
                topics.insert((*tag).to_string());
            }
        }
    }

    topics
}
