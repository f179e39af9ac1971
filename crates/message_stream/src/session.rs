//! # Client Session
//!
//! Owns everything one client needs to run the input pipeline: the
//! [`ClientContext`] (frame counter, shell flag, local player, view), the
//! [`MessageStream`] with its translators, and the [`CommandList`] the
//! simulation drains.
//!
//! ```rust
//! use message_stream::{
//!     ClientSession, MappableKey, MessageType, ModifierMask, PlayerIndex, RawInput,
//!     TranslatorConfig, ViewState,
//! };
//!
//! let mut session = ClientSession::with_default_translators(
//!     PlayerIndex(0),
//!     Box::new(ViewState::new(1024, 768)),
//!     TranslatorConfig::default(),
//! );
//! session.update(); // frame 0: map load, game bindings dormant
//! session.drain_commands();
//!
//! session.push_input(&RawInput::KeyDown {
//!     key: MappableKey::Up,
//!     modifiers: ModifierMask::NONE,
//!     autorepeat: false,
//! });
//! session.update();
//!
//! let kinds: Vec<_> = session.drain_commands().iter().map(|m| m.kind()).collect();
//! assert_eq!(kinds, vec![MessageType::FrameTick]);
//! ```

use crate::command_list::CommandList;
use crate::context::ClientContext;
use crate::input::RawInput;
use crate::message::Message;
use crate::message_type::MessageType;
use crate::meta_map::MetaMap;
use crate::stats::PropagationReport;
use crate::stream::MessageStream;
use crate::translator::TranslatorId;
use crate::translators::{
    ClientMessageDispatcher, LookAtSettings, LookAtTranslator, MetaEventTranslator, MouseSettings,
    CLIENT_DISPATCH_PRIORITY, LOOK_AT_PRIORITY, META_EVENT_PRIORITY,
};
use crate::types::PlayerIndex;
use crate::view::View;
use tracing::{info, trace};

/// Settings for the stock translator chain.
#[derive(Debug, Clone, Default)]
pub struct TranslatorConfig {
    /// Key bindings. Empty means raw keys pass through untranslated.
    pub bindings: MetaMap,
    pub mouse: MouseSettings,
    pub look_at: LookAtSettings,
}

/// One client's input pipeline.
#[derive(Debug)]
pub struct ClientSession {
    client: ClientContext,
    stream: MessageStream,
    commands: CommandList,
    meta_event: Option<TranslatorId>,
    look_at: Option<TranslatorId>,
}

impl ClientSession {
    /// A session with an empty translator chain.
    pub fn new(local_player: PlayerIndex, view: Box<dyn View>) -> Self {
        Self {
            client: ClientContext::new(local_player, view),
            stream: MessageStream::new(local_player),
            commands: CommandList::new(),
            meta_event: None,
            look_at: None,
        }
    }

    /// A session running the meta, look-at and dispatch translators.
    pub fn with_default_translators(local_player: PlayerIndex, view: Box<dyn View>, config: TranslatorConfig) -> Self {
        let mut session = Self::new(local_player, view);
        let bindings = config.bindings.len();
        session.meta_event = Some(
            session
                .stream
                .attach_translator(MetaEventTranslator::new(config.bindings, config.mouse), META_EVENT_PRIORITY),
        );
        session.look_at = Some(
            session
                .stream
                .attach_translator(LookAtTranslator::new(config.look_at), LOOK_AT_PRIORITY),
        );
        session
            .stream
            .attach_translator(ClientMessageDispatcher::new(), CLIENT_DISPATCH_PRIORITY);
        info!(
            "🎮 Session for {} ready: {} translators, {} bindings",
            local_player,
            session.stream.translator_count(),
            bindings
        );
        session
    }

    pub fn client(&self) -> &ClientContext {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut ClientContext {
        &mut self.client
    }

    pub fn stream(&self) -> &MessageStream {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut MessageStream {
        &mut self.stream
    }

    pub fn commands(&self) -> &CommandList {
        &self.commands
    }

    pub fn frame(&self) -> u32 {
        self.client.frame()
    }

    pub fn set_shell_active(&mut self, active: bool) {
        self.client.set_shell_active(active);
    }

    /// Switches the player this client acts for. New messages from the
    /// stream factories and `client().local_player()` both follow.
    pub fn set_local_player(&mut self, player: PlayerIndex) {
        self.client.set_local_player(player);
        self.stream.set_local_player(player);
    }

    /// The stock meta translator, while it is still attached.
    pub fn meta_event(&self) -> Option<&MetaEventTranslator> {
        self.attached(self.meta_event)
            .and_then(|id| self.stream.find_translator_as::<MetaEventTranslator>(id))
    }

    /// The stock look-at translator, while it is still attached.
    pub fn look_at(&self) -> Option<&LookAtTranslator> {
        self.attached(self.look_at)
            .and_then(|id| self.stream.find_translator_as::<LookAtTranslator>(id))
    }

    fn attached(&self, id: Option<TranslatorId>) -> Option<TranslatorId> {
        id.filter(|id| self.stream.has_translator(*id))
    }

    /// Queues a device event for the next update.
    pub fn push_input(&mut self, input: &RawInput) {
        trace!("🕹️ Frame {}: {:?}", self.client.frame(), input);
        input.append_to(&mut self.stream);
    }

    /// Runs one client tick: appends the frame tick, propagates and advances
    /// the frame counter.
    pub fn update(&mut self) -> PropagationReport {
        let frame = self.client.frame();
        self.stream.append_message(MessageType::FrameTick).append_timestamp(frame);
        let report = self.stream.propagate(&mut self.client, &mut self.commands);
        self.client.advance_frame();
        report
    }

    /// Hands every queued command to the caller, in order.
    pub fn drain_commands(&mut self) -> Vec<Message> {
        self.commands.drain().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewState;

    fn session() -> ClientSession {
        ClientSession::with_default_translators(
            PlayerIndex(1),
            Box::new(ViewState::new(800, 600)),
            TranslatorConfig {
                bindings: MetaMap::default_bindings(),
                ..TranslatorConfig::default()
            },
        )
    }

    #[test]
    fn test_default_chain_order() {
        let session = session();
        assert_eq!(session.stream().translator_count(), 3);
        assert!(session.meta_event().is_some());
        assert!(session.look_at().is_some());
        let names: Vec<_> = session
            .stream()
            .translator_ids()
            .into_iter()
            .filter_map(|id| session.stream().find_translator(id).map(|t| t.name().to_string()))
            .collect();
        assert_eq!(names, vec!["meta_event", "look_at", "client_dispatch"]);
    }

    #[test]
    fn test_accessors_after_removal() {
        let mut session = session();
        let ids = session.stream().translator_ids();
        assert!(session.stream_mut().remove_translator(ids[0]));

        assert!(session.meta_event().is_none());
        assert!(session.look_at().is_some());

        assert!(session.stream_mut().remove_translator(ids[1]));
        assert!(session.look_at().is_none());
    }

    #[test]
    fn test_local_player_stays_in_sync() {
        let mut session = session();
        session.set_local_player(PlayerIndex(3));
        assert_eq!(session.client().local_player(), PlayerIndex(3));
        assert_eq!(session.stream().local_player(), PlayerIndex(3));

        session.stream_mut().append_message(MessageType::DoStop);
        session.update();
        let commands = session.drain_commands();
        assert_eq!(commands[0].kind(), MessageType::DoStop);
        assert!(commands.iter().all(|m| m.player_index() == PlayerIndex(3)));
    }

    #[test]
    fn test_update_stamps_frame_and_advances() {
        let mut session = session();
        session.update();
        session.update();
        assert_eq!(session.frame(), 2);

        let ticks = session.drain_commands();
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].timestamp(0), 0);
        assert_eq!(ticks[1].timestamp(0), 1);
        assert!(ticks.iter().all(|m| m.player_index() == PlayerIndex(1)));
        assert!(session.commands().is_empty());
    }

    #[test]
    fn test_bare_session_forwards_everything() {
        let mut session = ClientSession::new(PlayerIndex(0), Box::new(ViewState::new(800, 600)));
        session.stream_mut().append_message(MessageType::MetaStop);
        session.update();
        let kinds: Vec<_> = session.drain_commands().iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, vec![MessageType::MetaStop, MessageType::FrameTick]);
        assert!(session.look_at().is_none());
    }
}
