//! Last translator in the chain: decides what reaches the command list.

use crate::message::Message;
use crate::message_type::MessageType;
use crate::translator::{Disposition, TranslateContext, Translator};
use std::any::Any;
use tracing::trace;

/// Forwards frame ticks, session lifecycle messages and network-range
/// commands; everything else dies here.
#[derive(Debug, Default)]
pub struct ClientMessageDispatcher;

impl ClientMessageDispatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn forwards(kind: MessageType) -> bool {
        matches!(
            kind,
            MessageType::FrameTick | MessageType::NewGame | MessageType::ClearGameData
        ) || kind.is_network_message()
    }
}

impl Translator for ClientMessageDispatcher {
    fn name(&self) -> &str {
        "client_dispatch"
    }

    fn translate(&mut self, message: &Message, _ctx: &mut TranslateContext<'_>) -> Disposition {
        if Self::forwards(message.kind()) {
            Disposition::Keep
        } else {
            trace!("🚫 Dropping local-only {}", message.kind());
            Disposition::Destroy
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
