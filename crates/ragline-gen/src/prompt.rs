//! Prompt assembly.
//!
//! Builds the two-message prompt (system framing + user question) from the
//! retrieved snippets, the recent conversation, and the context analysis.

use ragline_core::types::{ContextAnalysis, ConversationMessage, RetrievedChunk, Role};
use ragline_llm::ChatMessage;

/// At most this many chunks are rendered into the prompt.
const MAX_PROMPT_CHUNKS: usize = 5;

/// Per-chunk preview length in characters.
const CHUNK_PREVIEW_CHARS: usize = 300;

/// How many trailing messages the conversation block includes.
const CONVERSATION_WINDOW: usize = 6;

const SUMMARY_FOLLOW_UP_TEMPLATE: &str = "\
You are an AI assistant with access to conversation history and retrieved documents.

The user is asking for summary/total information as a follow-up to the previous conversation. Your task is to:

1. Review the previous conversation to understand what topic they're asking about
2. Look through ALL retrieved information for comprehensive data related to that topic
3. Provide a complete answer that synthesizes information across multiple sources
4. If asking for totals/sums, look for numerical data and add them up if appropriate
5. Be thorough but concise

IMPORTANT: Use both the conversation history AND retrieved information to provide a complete answer.";

const FOLLOW_UP_TEMPLATE: &str = "\
You are an AI assistant with access to conversation history and retrieved documents.

This is a follow-up question building on the previous conversation. Your task is to:

1. Consider the context from the previous conversation
2. Use the retrieved information to extend or clarify the previous discussion
3. Provide additional relevant details that build on what was already discussed
4. Maintain continuity with the previous conversation

Be direct and informative while building on the established context.";

const STANDALONE_TEMPLATE: &str = "\
You are an AI assistant answering questions based on retrieved documents.

Provide a direct, comprehensive answer to the user's question using the retrieved information.

Guidelines:
- Answer the question completely and accurately
- Use specific details from the retrieved sources
- Be concise but thorough
- If multiple sources contain relevant information, synthesize them appropriately";

/// Assembles the system and user messages sent to the chat model.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the two-message prompt.
    ///
    /// Chunk order is preserved; only truncation to the first
    /// [`MAX_PROMPT_CHUNKS`] is applied. The conversation block is included
    /// only for follow-up questions with a non-empty history.
    pub fn build(
        question: &str,
        chunks: &[RetrievedChunk],
        history: &[ConversationMessage],
        analysis: &ContextAnalysis,
    ) -> Vec<ChatMessage> {
        let mut conversation_block = String::new();
        if analysis.is_follow_up && !history.is_empty() {
            conversation_block.push_str("PREVIOUS CONVERSATION:\n");
            let start = history.len().saturating_sub(CONVERSATION_WINDOW);
            for msg in &history[start..] {
                let label = match msg.role {
                    Role::User => "USER",
                    Role::Assistant => "ASSISTANT",
                };
                conversation_block.push_str(&format!("{}: {}\n", label, msg.content));
            }
            conversation_block.push('\n');
        }

        let mut info_block = String::from("RETRIEVED INFORMATION:\n");
        for (i, chunk) in chunks.iter().take(MAX_PROMPT_CHUNKS).enumerate() {
            info_block.push_str(&format!(
                "[Source {} - ID: {}]\n{}\n\n",
                i + 1,
                chunk.id,
                preview(&chunk.text)
            ));
        }

        let template = if analysis.is_follow_up {
            if analysis.summary_request {
                SUMMARY_FOLLOW_UP_TEMPLATE
            } else {
                FOLLOW_UP_TEMPLATE
            }
        } else {
            STANDALONE_TEMPLATE
        };

        vec![
            ChatMessage::system(format!(
                "{}\n\nCONTEXT:\n{}{}",
                template, conversation_block, info_block
            )),
            ChatMessage::user(format!("Current question: {}", question)),
        ]
    }
}

/// First [`CHUNK_PREVIEW_CHARS`] characters of `text`, with an ellipsis
/// marker when the source was longer. Counts characters, not bytes, so
/// multibyte text never splits mid-character.
fn preview(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(CHUNK_PREVIEW_CHARS) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragline_core::types::ContextAnalysis;
    use ragline_llm::ChatRole;

    fn chunk(id: &str, text: &str) -> RetrievedChunk {
        RetrievedChunk {
            id: id.to_string(),
            text: text.to_string(),
            score: 0.9,
            search_type: None,
        }
    }

    fn user_msg(content: &str) -> ConversationMessage {
        ConversationMessage {
            role: Role::User,
            content: content.to_string(),
            timestamp: None,
        }
    }

    fn follow_up_analysis(summary: bool) -> ContextAnalysis {
        ContextAnalysis {
            is_follow_up: true,
            summary_request: summary,
            ..ContextAnalysis::default()
        }
    }

    // ---- Message structure ----

    #[test]
    fn test_two_messages_system_then_user() {
        let messages = PromptBuilder::build(
            "What is covered?",
            &[chunk("c1", "text")],
            &[],
            &ContextAnalysis::default(),
        );
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].content, "Current question: What is covered?");
    }

    // ---- Chunk rendering ----

    #[test]
    fn test_at_most_five_chunks_in_order() {
        let chunks: Vec<RetrievedChunk> = (0..8)
            .map(|i| chunk(&format!("c{}", i), &format!("text {}", i)))
            .collect();
        let messages =
            PromptBuilder::build("q", &chunks, &[], &ContextAnalysis::default());
        let system = &messages[0].content;

        for i in 0..5 {
            assert!(system.contains(&format!("[Source {} - ID: c{}]", i + 1, i)));
        }
        assert!(!system.contains("ID: c5"));
        assert!(!system.contains("[Source 6"));
        // Order preserved: c0 rendered before c4.
        assert!(system.find("ID: c0").unwrap() < system.find("ID: c4").unwrap());
    }

    #[test]
    fn test_long_chunk_truncated_with_ellipsis() {
        let long_text = "x".repeat(450);
        let messages = PromptBuilder::build(
            "q",
            &[chunk("c1", &long_text)],
            &[],
            &ContextAnalysis::default(),
        );
        let system = &messages[0].content;
        let expected = format!("{}...", "x".repeat(300));
        assert!(system.contains(&expected));
        assert!(!system.contains(&"x".repeat(301)));
    }

    #[test]
    fn test_short_chunk_not_truncated() {
        let messages = PromptBuilder::build(
            "q",
            &[chunk("c1", "short text")],
            &[],
            &ContextAnalysis::default(),
        );
        assert!(messages[0].content.contains("short text\n"));
        assert!(!messages[0].content.contains("short text..."));
    }

    #[test]
    fn test_truncation_is_char_boundary_safe() {
        // 400 multibyte characters; byte index 300 is mid-character.
        let text = "\u{00e9}".repeat(400);
        let messages = PromptBuilder::build(
            "q",
            &[chunk("c1", &text)],
            &[],
            &ContextAnalysis::default(),
        );
        let expected = format!("{}...", "\u{00e9}".repeat(300));
        assert!(messages[0].content.contains(&expected));
    }

    #[test]
    fn test_exactly_300_chars_no_ellipsis() {
        let text = "y".repeat(300);
        let messages = PromptBuilder::build(
            "q",
            &[chunk("c1", &text)],
            &[],
            &ContextAnalysis::default(),
        );
        assert!(messages[0].content.contains(&text));
        assert!(!messages[0].content.contains(&format!("{}...", text)));
    }

    // ---- Conversation block ----

    #[test]
    fn test_conversation_block_for_follow_up() {
        let history = vec![user_msg("We donated $10,000 to charity")];
        let messages = PromptBuilder::build(
            "And what about insurance?",
            &[chunk("c1", "Travelers donated...")],
            &history,
            &follow_up_analysis(false),
        );
        let system = &messages[0].content;
        assert!(system.contains("PREVIOUS CONVERSATION:"));
        assert!(system.contains("USER: We donated $10,000 to charity"));
        // Conversation block comes before the retrieved block.
        assert!(
            system.find("PREVIOUS CONVERSATION:").unwrap()
                < system.find("RETRIEVED INFORMATION:").unwrap()
        );
    }

    #[test]
    fn test_no_conversation_block_for_standalone() {
        let history = vec![user_msg("earlier turn")];
        let messages = PromptBuilder::build(
            "What is the capital of France?",
            &[chunk("c1", "Paris is the capital")],
            &history,
            &ContextAnalysis::default(),
        );
        assert!(!messages[0].content.contains("PREVIOUS CONVERSATION:"));
    }

    #[test]
    fn test_conversation_block_last_six_messages_only() {
        let history: Vec<ConversationMessage> =
            (0..9).map(|i| user_msg(&format!("turn {}", i))).collect();
        let messages = PromptBuilder::build(
            "and?",
            &[chunk("c1", "t")],
            &history,
            &follow_up_analysis(false),
        );
        let system = &messages[0].content;
        assert!(!system.contains("turn 2"));
        assert!(system.contains("turn 3"));
        assert!(system.contains("turn 8"));
    }

    #[test]
    fn test_assistant_label() {
        let history = vec![ConversationMessage {
            role: Role::Assistant,
            content: "Here is what I found".to_string(),
            timestamp: None,
        }];
        let messages = PromptBuilder::build(
            "and?",
            &[chunk("c1", "t")],
            &history,
            &follow_up_analysis(false),
        );
        assert!(messages[0].content.contains("ASSISTANT: Here is what I found"));
    }

    // ---- Template selection ----

    #[test]
    fn test_summary_follow_up_template() {
        let messages = PromptBuilder::build(
            "and in total?",
            &[chunk("c1", "t")],
            &[user_msg("context")],
            &follow_up_analysis(true),
        );
        assert!(messages[0]
            .content
            .contains("asking for summary/total information"));
    }

    #[test]
    fn test_plain_follow_up_template() {
        let messages = PromptBuilder::build(
            "And what about insurance?",
            &[chunk("c1", "t")],
            &[user_msg("context")],
            &follow_up_analysis(false),
        );
        assert!(messages[0]
            .content
            .contains("follow-up question building on the previous conversation"));
    }

    #[test]
    fn test_standalone_template() {
        let messages = PromptBuilder::build(
            "What is the capital of France?",
            &[chunk("c1", "t")],
            &[],
            &ContextAnalysis::default(),
        );
        assert!(messages[0]
            .content
            .contains("answering questions based on retrieved documents"));
    }

    #[test]
    fn test_context_section_present() {
        let messages = PromptBuilder::build(
            "q",
            &[chunk("c1", "t")],
            &[],
            &ContextAnalysis::default(),
        );
        assert!(messages[0].content.contains("\n\nCONTEXT:\n"));
        assert!(messages[0].content.contains("RETRIEVED INFORMATION:"));
    }
}
