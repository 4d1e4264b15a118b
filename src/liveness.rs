use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use tracing::debug;

/// Cleared when the owning view unmounts. Async tasks check it before touching
/// view state so a response that lands after navigation is dropped.
#[derive(Debug, Clone)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    /// Tied to the current reactive owner; flips on its cleanup.
    pub fn for_view() -> Self {
        let liveness = Self::new();
        let handle = liveness.clone();
        leptos::on_cleanup(move || handle.end());
        liveness
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    pub fn end(&self) {
        self.0.set(false);
    }

    /// Awaits `work`, then hands its output back only if the view is still mounted.
    pub async fn settle<F: Future>(&self, work: F) -> Option<F::Output> {
        let output = work.await;
        if self.is_alive() {
            Some(output)
        } else {
            debug!("view unmounted, dropping late result");
            None
        }
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Hands out increasing tickets for repeated loads; only the newest ticket is
/// current, so an older response landing late can be told apart.
#[derive(Debug, Clone, Default)]
pub struct Generation(Rc<Cell<u64>>);

impl Generation {
    pub fn next(&self) -> u64 {
        let ticket = self.0.get().wrapping_add(1);
        self.0.set(ticket);
        ticket
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.0.get() == ticket
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::api::fake::FakeBackend;
    use crate::chat::request_agent_turn;
    use crate::models::ChatTurn;

    fn backend_with_reply(text: &str) -> FakeBackend {
        let backend = FakeBackend::default();
        backend.chat_replies.borrow_mut().push_back(Ok(text.to_string()));
        backend
    }

    #[test]
    fn clones_share_state() {
        let liveness = Liveness::new();
        let task_copy = liveness.clone();
        assert!(task_copy.is_alive());
        liveness.end();
        assert!(!task_copy.is_alive());
    }

    #[test]
    fn reply_for_mounted_view_is_delivered() {
        let backend = backend_with_reply("Try a lentil soup");
        let liveness = Liveness::new();
        let turn = ChatTurn::human("dinner?", "Ada");

        let reply = block_on(liveness.settle(request_agent_turn(&backend, &turn)));
        assert_eq!(reply, Some(Ok(ChatTurn::agent("Try a lentil soup"))));
    }

    #[test]
    fn reply_landing_after_unmount_is_dropped() {
        let backend = backend_with_reply("Try a lentil soup");
        let liveness = Liveness::new();
        let view = liveness.clone();
        let turn = ChatTurn::human("dinner?", "Ada");

        let reply = block_on(liveness.settle(async {
            let reply = request_agent_turn(&backend, &turn).await;
            // Navigated away while the request was in flight.
            view.end();
            reply
        }));
        assert_eq!(reply, None);
        assert_eq!(backend.chat_sent.borrow().len(), 1);
    }

    #[test]
    fn older_load_is_stale_once_a_newer_one_starts() {
        let loads = Generation::default();
        let first = loads.next();
        assert!(loads.is_current(first));

        let second = loads.clone().next();
        assert!(!loads.is_current(first));
        assert!(loads.is_current(second));
    }
}
