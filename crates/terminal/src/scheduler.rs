//! Reply timers on the tokio runtime

use chess_session::{ReplyScheduler, ReplyTicket};
use tokio::sync::mpsc::UnboundedSender;

/// Everything the event loop reacts to, handled one at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(String),
    InputClosed,
    Reply(ReplyTicket),
}

/// Sleeps for the ticket's delay, then posts it back to the event loop.
///
/// There is no cancellation; the session ignores tickets that went stale
/// while they were sleeping.
pub struct TokioScheduler {
    tx: UnboundedSender<Event>,
}

impl TokioScheduler {
    pub fn new(tx: UnboundedSender<Event>) -> Self {
        Self { tx }
    }
}

impl ReplyScheduler for TokioScheduler {
    fn schedule(&mut self, ticket: ReplyTicket) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ticket.delay).await;
            // The loop may already have shut down
            tx.send(Event::Reply(ticket)).ok();
        });
    }
}
