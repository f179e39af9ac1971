//! # Translator Contract
//!
//! A [`Translator`] is a stateful handler in the stream's dispatch chain. It
//! is called once per resident message per propagation pass and answers
//! [`Disposition::Keep`] or [`Disposition::Destroy`].
//!
//! The message is lent read-only for the duration of the call. Anything a
//! translator wants to derive from it (a refined click, a meta command) is
//! built through the [`TranslateContext`], which copies nothing back into the
//! original. Because the borrow ends when `translate` returns, a translator
//! cannot hold on to a message it is about to destroy.
//!
//! ```rust
//! use message_stream::{Disposition, Message, MessageType, TranslateContext, Translator};
//! use std::any::Any;
//!
//! /// Drops every raw mouse-move event.
//! struct SwallowMouseMoves;
//!
//! impl Translator for SwallowMouseMoves {
//!     fn name(&self) -> &str {
//!         "swallow_mouse_moves"
//!     }
//!
//!     fn translate(&mut self, msg: &Message, _ctx: &mut TranslateContext<'_>) -> Disposition {
//!         if msg.kind() == MessageType::RawMousePosition {
//!             Disposition::Destroy
//!         } else {
//!             Disposition::Keep
//!         }
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//! ```

use crate::context::ClientContext;
use crate::message::Message;
use crate::message_type::MessageType;
use crate::types::PlayerIndex;
use crate::view::View;
use std::any::Any;
use std::fmt;

/// A translator's verdict on one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Leave the message in the stream for the next translator.
    Keep,
    /// Remove and free the message now; no later translator sees it.
    Destroy,
}

/// Unique id handed out by [`MessageStream::attach_translator`](crate::MessageStream::attach_translator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TranslatorId(pub(crate) u32);

impl fmt::Display for TranslatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translator#{}", self.0)
    }
}

/// A handler in the stream's dispatch chain.
pub trait Translator: Any {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Classifies one message. May schedule new messages through `ctx`.
    fn translate(&mut self, message: &Message, ctx: &mut TranslateContext<'_>) -> Disposition;

    /// Concrete translator, for callers that need to inspect its state.
    fn as_any(&self) -> &dyn Any;
}

/// Messages and requests a translator produced during one `translate` call.
#[derive(Debug, Default)]
pub(crate) struct Scheduled {
    pub(crate) inserted: Vec<Message>,
    pub(crate) appended: Vec<Message>,
    pub(crate) detached: Vec<TranslatorId>,
}

/// What a translator can reach while classifying a message.
pub struct TranslateContext<'a> {
    client: &'a mut ClientContext,
    scheduled: &'a mut Scheduled,
    local_player: PlayerIndex,
    translator: TranslatorId,
}

impl<'a> TranslateContext<'a> {
    pub(crate) fn new(
        client: &'a mut ClientContext,
        scheduled: &'a mut Scheduled,
        local_player: PlayerIndex,
        translator: TranslatorId,
    ) -> Self {
        Self {
            client,
            scheduled,
            local_player,
            translator,
        }
    }

    /// Id of the translator being called.
    pub fn translator_id(&self) -> TranslatorId {
        self.translator
    }

    pub fn client(&self) -> &ClientContext {
        &*self.client
    }

    pub fn client_mut(&mut self) -> &mut ClientContext {
        &mut *self.client
    }

    pub fn frame(&self) -> u32 {
        self.client.frame()
    }

    pub fn is_shell_active(&self) -> bool {
        self.client.is_shell_active()
    }

    pub fn view_mut(&mut self) -> &mut dyn View {
        self.client.view_mut()
    }

    /// Builds a message that will sit immediately after the one being
    /// classified. Several inserts keep their creation order.
    pub fn insert_message(&mut self, kind: MessageType) -> &mut Message {
        let inserted = &mut self.scheduled.inserted;
        inserted.push(Message::new(kind, self.local_player));
        let last = inserted.len() - 1;
        &mut inserted[last]
    }

    /// Builds a message that will be appended at the stream tail.
    pub fn append_message(&mut self, kind: MessageType) -> &mut Message {
        let appended = &mut self.scheduled.appended;
        appended.push(Message::new(kind, self.local_player));
        let last = appended.len() - 1;
        &mut appended[last]
    }

    /// Detaches a translator once the current one has finished this pass.
    pub fn detach_translator(&mut self, id: TranslatorId) {
        self.scheduled.detached.push(id);
    }
}
