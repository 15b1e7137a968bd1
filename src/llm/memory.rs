//! Summarizing conversation memory.
//!
//! [`ConversationMemory`] keeps a running summary plus a buffer of recent
//! exchanges bounded by an estimated-token budget.  After each reply the
//! newest exchange is recorded; when the buffer grows past the budget the
//! oldest exchanges are drained and handed to a summarizer call, whose
//! output replaces the summary.
//!
//! Token counting uses the chars/4 heuristic — close enough for a budget
//! check, and it avoids a tokenizer dependency.
//!
//! The value is plain data: the caller (the conversation client) owns the
//! summarizer call, so memory never touches the network and is cheap to
//! clone.  A turn works on a copy and the session adopts it only when the
//! reply succeeds, so a failed turn cannot corrupt the stored memory.

use std::collections::VecDeque;

// ---------------------------------------------------------------------------
// Token estimation
// ---------------------------------------------------------------------------

/// Estimate the token count of `text` (chars/4 heuristic, floor).
pub fn estimate_tokens(text: &str) -> u32 {
    (text.len() / 4) as u32
}

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

/// One user utterance and the assistant reply it received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

impl Exchange {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }

    /// Estimated token cost of this exchange.
    pub fn estimated_tokens(&self) -> u32 {
        estimate_tokens(&self.user) + estimate_tokens(&self.assistant)
    }
}

/// Render exchanges as plain `Human:`/`AI:` lines for the summarizer prompt.
///
/// The labelled format keeps the summarizer from trying to continue the
/// conversation instead of summarizing it.
pub fn render_exchanges(exchanges: &[Exchange]) -> String {
    let mut out = String::new();
    for exchange in exchanges {
        out.push_str("Human: ");
        out.push_str(&exchange.user);
        out.push('\n');
        out.push_str("AI: ");
        out.push_str(&exchange.assistant);
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// ConversationMemory
// ---------------------------------------------------------------------------

/// Bounded summary-plus-buffer record of the dialogue so far.
///
/// # Budget semantics
///
/// [`is_over_budget`](Self::is_over_budget) is strict: a buffer sitting
/// exactly at the budget is kept as-is, and draining stops as soon as the
/// estimate is back at or under the budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationMemory {
    summary: String,
    exchanges: VecDeque<Exchange>,
    token_budget: u32,
}

impl ConversationMemory {
    /// Create an empty memory with the given estimated-token budget.
    pub fn new(token_budget: u32) -> Self {
        Self {
            summary: String::new(),
            exchanges: VecDeque::new(),
            token_budget,
        }
    }

    /// The running summary of exchanges drained from the buffer.  Empty
    /// until the buffer first overflows.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Replace the running summary (with the summarizer's output).
    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = summary.into();
    }

    /// Recent exchanges, oldest first.
    pub fn exchanges(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter()
    }

    /// Number of exchanges currently buffered.
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn token_budget(&self) -> u32 {
        self.token_budget
    }

    /// Append the newest exchange to the buffer.
    pub fn record(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.exchanges.push_back(Exchange::new(user, assistant));
    }

    /// Estimated token usage of the buffered exchanges.  The summary is not
    /// counted against the budget.
    pub fn estimated_tokens(&self) -> u32 {
        self.exchanges.iter().map(Exchange::estimated_tokens).sum()
    }

    /// Returns `true` when the buffer estimate exceeds the budget.  Exactly
    /// at the budget is not over.
    pub fn is_over_budget(&self) -> bool {
        self.estimated_tokens() > self.token_budget
    }

    /// Pop exchanges oldest-first until the buffer is back within budget.
    ///
    /// Returns the drained exchanges in chronological order so the caller
    /// can fold them into the summary.  Returns an empty vec when the buffer
    /// is already within budget.
    pub fn drain_over_budget(&mut self) -> Vec<Exchange> {
        let mut drained = Vec::new();
        while self.is_over_budget() {
            match self.exchanges.pop_front() {
                Some(exchange) => drained.push(exchange),
                None => break,
            }
        }
        drained
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// An exchange costing exactly `tokens` estimated tokens (ASCII only,
    /// split evenly across both sides).
    fn exchange_of(tokens: u32) -> Exchange {
        let half = (tokens * 4 / 2) as usize;
        Exchange::new("u".repeat(half), "a".repeat(half))
    }

    // ---- estimate_tokens ---------------------------------------------------

    #[test]
    fn estimate_tokens_floors() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcdefg"), 1);
        assert_eq!(estimate_tokens("abcdefgh"), 2);
    }

    // ---- record / accessors ------------------------------------------------

    #[test]
    fn record_appends_in_order() {
        let mut memory = ConversationMemory::new(300);
        memory.record("first question", "first answer");
        memory.record("second question", "second answer");

        let users: Vec<&str> = memory.exchanges().map(|e| e.user.as_str()).collect();
        assert_eq!(users, vec!["first question", "second question"]);
        assert_eq!(memory.len(), 2);
    }

    #[test]
    fn new_memory_is_empty_with_no_summary() {
        let memory = ConversationMemory::new(300);
        assert!(memory.is_empty());
        assert_eq!(memory.summary(), "");
        assert_eq!(memory.estimated_tokens(), 0);
        assert!(!memory.is_over_budget());
    }

    // ---- Budget boundary ---------------------------------------------------

    #[test]
    fn exactly_at_budget_is_not_over() {
        let mut memory = ConversationMemory::new(4);
        let exchange = exchange_of(4);
        memory.record(exchange.user.clone(), exchange.assistant.clone());

        assert_eq!(memory.estimated_tokens(), 4);
        assert!(!memory.is_over_budget());
        assert!(memory.drain_over_budget().is_empty());
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn one_token_over_budget_drains_oldest() {
        let mut memory = ConversationMemory::new(4);
        memory.record("u".repeat(8), "a".repeat(8)); // 4 tokens
        memory.record("x".repeat(4), "y".repeat(0)); // 1 token → 5 > 4

        let drained = memory.drain_over_budget();
        assert_eq!(drained.len(), 1);
        assert!(drained[0].user.starts_with('u'), "oldest exchange drained first");
        assert_eq!(memory.len(), 1);
        assert!(memory.estimated_tokens() <= memory.token_budget());
    }

    #[test]
    fn drain_pops_until_within_budget() {
        let mut memory = ConversationMemory::new(4);
        for _ in 0..3 {
            let e = exchange_of(4);
            memory.record(e.user, e.assistant);
        }
        // 12 tokens against a budget of 4: two exchanges must go.

        let drained = memory.drain_over_budget();
        assert_eq!(drained.len(), 2);
        assert_eq!(memory.len(), 1);
        assert!(!memory.is_over_budget());
    }

    #[test]
    fn budget_holds_after_any_number_of_drained_turns() {
        let mut memory = ConversationMemory::new(20);
        for i in 0..50 {
            memory.record(format!("question number {i}"), format!("answer number {i}"));
            let _ = memory.drain_over_budget();
            assert!(
                memory.estimated_tokens() <= memory.token_budget(),
                "budget exceeded after turn {i}"
            );
        }
        assert!(!memory.is_empty(), "newest exchange always survives");
    }

    // ---- Summary -----------------------------------------------------------

    #[test]
    fn set_summary_replaces_previous() {
        let mut memory = ConversationMemory::new(300);
        memory.set_summary("The human likes football.");
        memory.set_summary("The human likes football and cooking.");
        assert_eq!(memory.summary(), "The human likes football and cooking.");
    }

    // ---- render_exchanges --------------------------------------------------

    #[test]
    fn render_uses_human_ai_labels() {
        let lines = render_exchanges(&[
            Exchange::new("I watched a match.", "Which teams played?"),
            Exchange::new("Real Madrid.", "Did they win?"),
        ]);

        assert_eq!(
            lines,
            "Human: I watched a match.\nAI: Which teams played?\nHuman: Real Madrid.\nAI: Did they win?\n"
        );
    }

    #[test]
    fn render_empty_is_empty() {
        assert_eq!(render_exchanges(&[]), "");
    }

    // ---- Clone independence ------------------------------------------------

    #[test]
    fn clone_does_not_share_state() {
        let original = ConversationMemory::new(300);
        let mut copy = original.clone();
        copy.record("hello", "hi there");
        copy.set_summary("greeted each other");

        assert!(original.is_empty());
        assert_eq!(original.summary(), "");
        assert_eq!(copy.len(), 1);
    }
}
