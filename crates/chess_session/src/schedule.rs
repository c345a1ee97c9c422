//! Deferred automated replies
//!
//! The session never sleeps. It hands a [`ReplyTicket`] to a
//! [`ReplyScheduler`] and the host calls `Session::fire_reply` with the same
//! ticket once the delay has passed. A ticket carries the session generation
//! it was issued in, so a reply scheduled before a reset or undo is dropped
//! instead of being played against the new position.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

/// Handle for one scheduled automated reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTicket {
    /// Session generation at scheduling time
    pub generation: u64,
    /// Unique per session, distinguishes replies within one generation
    pub serial: u64,
    pub delay: Duration,
}

/// Fire-and-forget timer supplied by the host.
pub trait ReplyScheduler {
    fn schedule(&mut self, ticket: ReplyTicket);
}

/// Scheduler that only queues tickets; the owner decides when they fire.
///
/// Clones share one queue.
#[derive(Debug, Clone, Default)]
pub struct QueuedReplies {
    queue: Rc<RefCell<VecDeque<ReplyTicket>>>,
}

impl QueuedReplies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest ticket not yet taken
    pub fn pop(&self) -> Option<ReplyTicket> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl ReplyScheduler for QueuedReplies {
    fn schedule(&mut self, ticket: ReplyTicket) {
        self.queue.borrow_mut().push_back(ticket);
    }
}
