//! Prompt construction for the three language-model call sites.
//!
//! Grammar correction and topic suggestion use **flat** prompts — a fixed
//! instruction followed by a hand-built `Human:`/`Assistant:` envelope sent
//! to `/v1/completions`.  The conversational reply uses **chat** messages,
//! so this module only contributes its system instruction and the
//! summarizer template.

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

/// Grammar correction — constrains the model to the corrected sentence only.
const GRAMMAR_INSTRUCTION: &str = "\
You are an expert English grammar assistant. \
You will receive a grammatically incorrect sentence, \
and you must return ONLY the corrected version. \
Do not include any explanations or additional text.";

/// Topic suggestion — one simple speaking prompt per call.
const TOPIC_INSTRUCTION: &str = "\
You are a conversation coach. Suggest one engaging and simple topic \
for someone to practice speaking English. Just return the topic as a sentence or question.";

/// Conversational reply — friendly free-form chat.
const CONVERSATION_INSTRUCTION: &str = "\
The following is a friendly conversation between a human and an AI. \
The AI is talkative and provides lots of specific details from its context. \
If the AI does not know the answer to a question, it truthfully says it does not know.";

/// Memory summarization — folds drained exchanges into the running summary.
///
/// `{summary}` and `{new_lines}` are replaced by [`summarizer_prompt`].
const SUMMARIZER_TEMPLATE: &str = "\
Progressively summarize the lines of conversation provided, adding onto the \
previous summary returning a new summary.

EXAMPLE
Current summary:
The human asks what the AI thinks of artificial intelligence. The AI thinks \
artificial intelligence is a force for good.

New lines of conversation:
Human: Why do you think artificial intelligence is a force for good?
AI: Because artificial intelligence will help humans reach their full potential.

New summary:
The human asks what the AI thinks of artificial intelligence. The AI thinks \
artificial intelligence is a force for good because it will help humans reach \
their full potential.
END OF EXAMPLE

Current summary:
{summary}

New lines:
{new_lines}

New summary:";

// ---------------------------------------------------------------------------
// Flat prompts (grammar, topics)
// ---------------------------------------------------------------------------

/// Build the flat grammar-correction prompt for `text`.
///
/// Structure: instruction, then a single `Human:` turn carrying the sentence,
/// then the `Assistant:` cue the completion continues from.
pub fn grammar_prompt(text: &str) -> String {
    format!(
        "{GRAMMAR_INSTRUCTION}\n\nHuman: Correct this sentence and return only the corrected version:\n{text}\n\nAssistant:"
    )
}

/// Build the flat topic-suggestion prompt.  Takes no input; every call asks
/// the same question and variation comes from sampling temperature.
pub fn topic_prompt() -> String {
    format!("{TOPIC_INSTRUCTION}\n\nHuman: Suggest one topic for English speaking practice.\nAssistant:")
}

// ---------------------------------------------------------------------------
// Chat prompts (conversation, summarizer)
// ---------------------------------------------------------------------------

/// Build the system message for the conversational reply.
///
/// When `summary` is non-empty, the running conversation summary is appended
/// so the model keeps long-range context that has been pruned from the
/// recent-exchange buffer.
pub fn conversation_system(summary: &str) -> String {
    if summary.is_empty() {
        CONVERSATION_INSTRUCTION.to_string()
    } else {
        format!("{CONVERSATION_INSTRUCTION}\n\nCurrent conversation summary:\n{summary}")
    }
}

/// Build the summarizer prompt from the current summary and the drained
/// conversation lines.
pub fn summarizer_prompt(summary: &str, new_lines: &str) -> String {
    SUMMARIZER_TEMPLATE
        .replace("{summary}", summary)
        .replace("{new_lines}", new_lines)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
