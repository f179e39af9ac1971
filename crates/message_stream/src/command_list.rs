//! The command list: messages that survived a full propagation pass, waiting
//! for the simulation/network layer to drain them.

use crate::list::MessageList;
use crate::message::Message;
use std::ops::{Deref, DerefMut};
use tracing::trace;

/// Downstream sink of the message stream.
///
/// A plain [`MessageList`] (all list operations are available through
/// `Deref`) with an order-preserving bulk append. The consumer drains it once
/// per tick.
#[derive(Debug, Default)]
pub struct CommandList {
    messages: MessageList,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every message of `messages` individually, keeping their order.
    /// Returns how many were appended.
    pub fn append_message_list<I>(&mut self, messages: I) -> usize
    where
        I: IntoIterator<Item = Message>,
    {
        let mut appended = 0;
        for message in messages {
            self.messages.append(message);
            appended += 1;
        }
        if appended > 0 {
            trace!("📥 Command list received {} messages ({} pending)", appended, self.messages.len());
        }
        appended
    }
}

impl Deref for CommandList {
    type Target = MessageList;

    fn deref(&self) -> &MessageList {
        &self.messages
    }
}

impl DerefMut for CommandList {
    fn deref_mut(&mut self) -> &mut MessageList {
        &mut self.messages
    }
}
