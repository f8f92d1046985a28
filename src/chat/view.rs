use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::chat::ChatError;
use crate::chat::history::History;
use crate::chat::types::{Submission, Turn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStatus {
    Idle,
    AwaitingResponse { pending: usize },
}

/// View model behind the chat screen: the draft being composed, the
/// history shown above it and the submissions still waiting for a reply.
#[derive(Debug, Default)]
pub struct ChatView {
    draft: String,
    history: History,
    in_flight: BTreeSet<u64>,
    next_id: u64,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    pub fn append_turn(&mut self, turn: Turn) -> &Turn {
        self.history.push(turn)
    }

    pub fn status(&self) -> ChatStatus {
        match self.in_flight.len() {
            0 => ChatStatus::Idle,
            pending => ChatStatus::AwaitingResponse { pending },
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self, id: u64) -> bool {
        self.in_flight.contains(&id)
    }

    /// Move the draft into the history as a user turn. A blank draft is left
    /// untouched and nothing is submitted.
    pub fn submit(&mut self) -> Option<Submission> {
        if self.draft.trim().is_empty() {
            return None;
        }
        let prompt = self.draft.clone();
        self.append_turn(Turn::user(prompt.clone()));
        self.clear_draft();

        let id = self.next_id;
        self.next_id += 1;
        self.in_flight.insert(id);
        debug!(id, prompt_len = prompt.len(), "submitted draft");
        Some(Submission { id, prompt })
    }

    /// Record the outcome of submission `id`. Returns the appended turn, or
    /// None if `id` was never submitted or has already settled.
    pub fn settle(&mut self, id: u64, outcome: Result<String, ChatError>) -> Option<&Turn> {
        if !self.in_flight.remove(&id) {
            warn!(id, "ignoring settlement for unknown submission");
            return None;
        }
        let turn = match outcome {
            Ok(reply) => Turn::ai(reply),
            Err(e) => {
                warn!(id, kind=?e.kind(), error=%e, "chat exchange failed");
                Turn::error(e.user_message())
            }
        };
        Some(self.append_turn(turn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::CONNECT_ERROR_MESSAGE;
    use crate::chat::types::Role;

    fn decode_error() -> ChatError {
        serde_json::from_str::<serde_json::Value>("not json")
            .unwrap_err()
            .into()
    }

    #[test]
    fn blank_drafts_are_ignored() {
        for d in ["", " ", "  ", "\n", "\t \n "] {
            let mut view = ChatView::new();
            view.set_draft(d);
            assert!(view.submit().is_none());
            assert!(view.history().is_empty());
            assert_eq!(view.draft(), d);
            assert_eq!(view.status(), ChatStatus::Idle);
        }
    }

    #[test]
    fn submit_appends_untrimmed_user_turn_and_clears_draft() {
        let mut view = ChatView::new();
        view.set_draft("  Hello\n");
        let sub = view.submit().unwrap();
        assert!(view.is_pending(sub.id));
        assert_eq!(sub.prompt, "  Hello\n");
        assert_eq!(view.history().turns(), &[Turn::user("  Hello\n")]);
        assert_eq!(view.draft(), "");
        assert_eq!(view.status(), ChatStatus::AwaitingResponse { pending: 1 });
    }

    #[test]
    fn success_appends_one_ai_turn() {
        let mut view = ChatView::new();
        view.set_draft("Hello");
        let sub = view.submit().unwrap();
        let turn = view.settle(sub.id, Ok("Hi there".into())).cloned();
        assert_eq!(turn, Some(Turn::ai("Hi there")));
        assert_eq!(
            view.history().turns(),
            &[Turn::user("Hello"), Turn::ai("Hi there")]
        );
        assert_eq!(view.status(), ChatStatus::Idle);
    }

    #[test]
    fn failure_appends_fixed_error_turn() {
        let mut view = ChatView::new();
        view.set_draft("Test");
        let sub = view.submit().unwrap();
        view.settle(sub.id, Err(decode_error()));
        assert_eq!(
            view.history().turns(),
            &[Turn::user("Test"), Turn::error(CONNECT_ERROR_MESSAGE)]
        );

        // still usable afterwards
        view.set_draft("again");
        assert!(view.submit().is_some());
        assert_eq!(view.history().len(), 3);
    }

    #[test]
    fn settlement_is_applied_once() {
        let mut view = ChatView::new();
        view.set_draft("x");
        let sub = view.submit().unwrap();
        assert!(view.settle(sub.id, Ok("a".into())).is_some());
        assert!(view.settle(sub.id, Ok("b".into())).is_none());
        assert!(view.settle(99, Ok("c".into())).is_none());
        assert_eq!(view.history().count_role(Role::Ai), 1);
    }

    #[test]
    fn overlapping_submits_settle_in_completion_order() {
        let mut view = ChatView::new();
        view.set_draft("first");
        let a = view.submit().unwrap();
        view.set_draft("second");
        let b = view.submit().unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(view.status(), ChatStatus::AwaitingResponse { pending: 2 });

        view.settle(b.id, Ok("reply to second".into()));
        view.settle(a.id, Ok("reply to first".into()));
        let contents: Vec<&str> = view
            .history()
            .iter()
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(
            contents,
            vec!["first", "second", "reply to second", "reply to first"]
        );
        assert_eq!(view.status(), ChatStatus::Idle);
    }
}
