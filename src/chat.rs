//! Chat exchange with the recipe agent, and picking an agent reply to keep.
//!
//! Replies are appended in the order they arrive. When several sends are in
//! flight a reply is not correlated with the turn that produced it.

use tracing::{info, warn};

use crate::api::RecipeBackend;
use crate::error::ClientError;
use crate::models::ChatTurn;
use crate::transcript::Transcript;

/// Counts outstanding chat requests; the typing indicator shows while any remain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingReplies(usize);

impl PendingReplies {
    pub fn begin(&mut self) {
        self.0 += 1;
    }

    pub fn finish(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    pub fn is_waiting(&self) -> bool {
        self.0 > 0
    }
}

/// Posts a human turn and turns the reply into exactly one agent turn.
pub async fn request_agent_turn(
    backend: &dyn RecipeBackend,
    turn: &ChatTurn,
) -> Result<ChatTurn, ClientError> {
    let reply = backend.dinner_chat(turn).await?;
    Ok(ChatTurn::agent(reply.agent))
}

/// Which agent turn, if any, is marked for saving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnSelection {
    active: bool,
    selected: Option<usize>,
}

impl TurnSelection {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn enter(&mut self) {
        self.active = true;
    }

    pub fn exit(&mut self) {
        self.active = false;
        self.selected = None;
    }

    /// Replaces any previous selection. Human turns and clicks outside
    /// selection mode are ignored.
    pub fn select(&mut self, index: usize, transcript: &Transcript) -> bool {
        if !self.active {
            return false;
        }
        match transcript.get(index) {
            Some(turn) if turn.is_agent() => {
                self.selected = Some(index);
                true
            }
            _ => false,
        }
    }

    pub fn selected_turns(&self, transcript: &Transcript) -> Vec<ChatTurn> {
        self.selected
            .and_then(|index| transcript.get(index))
            .cloned()
            .into_iter()
            .collect()
    }

    pub fn apply(&mut self, outcome: &SaveOutcome) {
        if outcome.success {
            self.exit();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub success: bool,
    pub message: String,
    pub recipe_name: Option<String>,
}

pub async fn save_selection(backend: &dyn RecipeBackend, turns: &[ChatTurn]) -> SaveOutcome {
    match backend.save_dinner(turns).await {
        Ok(response) => {
            // A declined save has nothing to link to, whatever name came back.
            let recipe_name = response
                .name
                .map(|name| name.trim().to_string())
                .filter(|name| response.success && !name.is_empty());
            if response.success {
                info!("saved recipe {}", recipe_name.as_deref().unwrap_or("(unnamed)"));
            } else {
                warn!("backend declined to save recipe: {}", response.response);
            }
            SaveOutcome {
                success: response.success,
                message: response.response,
                recipe_name,
            }
        }
        Err(err) => {
            warn!("saving recipe failed: {err}");
            SaveOutcome {
                success: false,
                message: format!("Could not save the recipe: {err}"),
                recipe_name: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::fake::{FakeBackend, transport};
    use crate::models::SaveDinnerResponse;

    fn conversation() -> Transcript {
        let mut transcript = Transcript::new(100);
        transcript.append(ChatTurn::human("something with beans", "Ada"));
        transcript.append(ChatTurn::agent("Black bean tacos"));
        transcript.append(ChatTurn::human("more", "Ada"));
        transcript.append(ChatTurn::agent("Chili"));
        transcript
    }

    #[test]
    fn reply_becomes_single_agent_turn() {
        let backend = FakeBackend::default();
        backend
            .chat_replies
            .borrow_mut()
            .push_back(Ok("Try a frittata".to_string()));

        let human = ChatTurn::human("eggs?", "Ada");
        let reply = block_on(request_agent_turn(&backend, &human)).unwrap();

        assert_eq!(reply, ChatTurn::agent("Try a frittata"));
        assert_eq!(backend.chat_sent.borrow().as_slice(), &[human]);
    }

    #[test]
    fn transport_failure_is_returned_not_retried() {
        let backend = FakeBackend::default();
        backend
            .chat_replies
            .borrow_mut()
            .push_back(Err(transport("/dinnerchat")));

        let human = ChatTurn::human("eggs?", "Ada");
        assert!(block_on(request_agent_turn(&backend, &human)).is_err());
        assert_eq!(backend.chat_sent.borrow().len(), 1);
    }

    #[test]
    fn waiting_stays_on_until_last_reply() {
        let mut pending = PendingReplies::default();
        pending.begin();
        pending.begin();
        pending.finish();
        assert!(pending.is_waiting());
        pending.finish();
        assert!(!pending.is_waiting());
        pending.finish();
        assert!(!pending.is_waiting());
    }

    #[test]
    fn selection_holds_at_most_one_agent_turn() {
        let transcript = conversation();
        let mut selection = TurnSelection::default();

        assert!(!selection.select(1, &transcript));
        selection.enter();
        assert!(!selection.select(0, &transcript));
        assert!(selection.select(1, &transcript));
        assert!(selection.select(3, &transcript));
        assert_eq!(selection.selected(), Some(3));
        assert_eq!(
            selection.selected_turns(&transcript),
            vec![ChatTurn::agent("Chili")]
        );

        selection.exit();
        assert!(!selection.is_active());
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn successful_save_exits_selection_mode() {
        let transcript = conversation();
        let backend = FakeBackend::default();
        *backend.save_response.borrow_mut() = Some(Ok(SaveDinnerResponse {
            name: Some("Chili.md".to_string()),
            success: true,
            response: "Saved Chili".to_string(),
        }));

        let mut selection = TurnSelection::default();
        selection.enter();
        selection.select(3, &transcript);

        let outcome = block_on(save_selection(&backend, &selection.selected_turns(&transcript)));
        assert!(outcome.success);
        assert_eq!(outcome.recipe_name.as_deref(), Some("Chili.md"));
        assert_eq!(backend.saved.borrow()[0], vec![ChatTurn::agent("Chili")]);

        selection.apply(&outcome);
        assert!(!selection.is_active());
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn failed_save_leaves_selection_alone() {
        let transcript = conversation();
        let backend = FakeBackend::default();

        let mut selection = TurnSelection::default();
        selection.enter();
        selection.select(1, &transcript);

        let outcome = block_on(save_selection(&backend, &selection.selected_turns(&transcript)));
        assert!(!outcome.success);
        assert!(outcome.message.contains("connection refused"));

        selection.apply(&outcome);
        assert!(selection.is_active());
        assert_eq!(selection.selected(), Some(1));
    }

    #[test]
    fn declined_save_keeps_backend_message() {
        let backend = FakeBackend::default();
        *backend.save_response.borrow_mut() = Some(Ok(SaveDinnerResponse {
            name: Some("   ".to_string()),
            success: false,
            response: "Nothing recipe-like in that message".to_string(),
        }));

        let outcome = block_on(save_selection(&backend, &[ChatTurn::agent("hello")]));
        assert_eq!(
            outcome,
            SaveOutcome {
                success: false,
                message: "Nothing recipe-like in that message".to_string(),
                recipe_name: None,
            }
        );
    }

    #[test]
    fn declined_save_offers_no_recipe_link() {
        let backend = FakeBackend::default();
        *backend.save_response.borrow_mut() = Some(Ok(SaveDinnerResponse {
            name: Some("Chili.md".to_string()),
            success: false,
            response: "Recipe folder is read-only".to_string(),
        }));

        let outcome = block_on(save_selection(&backend, &[ChatTurn::agent("Chili")]));
        assert!(!outcome.success);
        assert_eq!(outcome.recipe_name, None);
    }
}
