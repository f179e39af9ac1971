//! # Message Stream
//!
//! The [`MessageStream`] collects raw input for the current tick and runs it
//! through a priority-ordered chain of [`Translator`]s.
//!
//! ## Propagation
//!
//! [`MessageStream::propagate`] runs once per tick:
//!
//! 1. Translators are visited in ascending priority; equal priorities keep
//!    attachment order.
//! 2. Each translator walks the live list head to tail. Messages it inserts
//!    land right after the current message, messages it appends land at the
//!    tail, and both are reached by the same walk and by every later
//!    translator.
//! 3. A `Destroy` verdict frees the message at once; later translators never
//!    see it.
//! 4. Whatever is left moves, in order, to the [`CommandList`]. The stream is
//!    empty afterwards.
//!
//! ## Example
//!
//! ```rust
//! use message_stream::{ClientContext, CommandList, MessageStream, MessageType, PlayerIndex, ViewState};
//!
//! let mut client = ClientContext::new(PlayerIndex(0), Box::new(ViewState::new(800, 600)));
//! let mut stream = MessageStream::new(PlayerIndex(0));
//! let mut commands = CommandList::new();
//!
//! stream.append_message(MessageType::DoStop);
//! let report = stream.propagate(&mut client, &mut commands);
//!
//! assert_eq!(report.forwarded, 1);
//! assert!(stream.is_empty());
//! assert!(commands.contains_type(MessageType::DoStop));
//! ```

use crate::command_list::CommandList;
use crate::context::ClientContext;
use crate::contract::contract_violation;
use crate::list::{MessageHandle, MessageList};
use crate::message::Message;
use crate::message_type::MessageType;
use crate::stats::{PropagationReport, StreamStats};
use crate::translator::{Disposition, Scheduled, TranslateContext, Translator, TranslatorId};
use crate::types::PlayerIndex;
use std::ops::{Deref, DerefMut};
use tracing::{debug, trace};

struct TranslatorEntry {
    id: TranslatorId,
    priority: u32,
    translator: Box<dyn Translator>,
}

/// The per-tick input stream and its translator chain.
pub struct MessageStream {
    messages: MessageList,
    translators: Vec<TranslatorEntry>,
    next_translator_id: u32,
    local_player: PlayerIndex,
    scheduled: Scheduled,
    stats: StreamStats,
}

impl std::fmt::Debug for MessageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let chain: Vec<_> = self
            .translators
            .iter()
            .map(|e| format!("{}@{}:{}", e.translator.name(), e.priority, e.id))
            .collect();
        f.debug_struct("MessageStream")
            .field("messages", &self.messages)
            .field("translators", &chain)
            .field("local_player", &self.local_player)
            .finish()
    }
}

impl MessageStream {
    /// Creates an empty stream whose factory methods stamp messages with
    /// `local_player`.
    pub fn new(local_player: PlayerIndex) -> Self {
        Self {
            messages: MessageList::new(),
            translators: Vec::new(),
            next_translator_id: 1,
            local_player,
            scheduled: Scheduled::default(),
            stats: StreamStats::default(),
        }
    }

    pub fn local_player(&self) -> PlayerIndex {
        self.local_player
    }

    pub fn set_local_player(&mut self, player: PlayerIndex) {
        self.local_player = player;
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    // ========================================================================
    // Translator chain
    // ========================================================================

    /// Attaches `translator` at `priority` (lower runs earlier) and returns its
    /// id. A translator attached at an already-used priority runs after the
    /// ones already there. The stream owns the translator from here on.
    pub fn attach_translator<T: Translator>(&mut self, translator: T, priority: u32) -> TranslatorId {
        self.attach_boxed_translator(Box::new(translator), priority)
    }

    pub fn attach_boxed_translator(&mut self, translator: Box<dyn Translator>, priority: u32) -> TranslatorId {
        let id = TranslatorId(self.next_translator_id);
        self.next_translator_id += 1;

        let position = self
            .translators
            .iter()
            .position(|e| e.priority > priority)
            .unwrap_or(self.translators.len());

        debug!(
            "🔌 Attached translator '{}' as {} at priority {} (slot {} of {})",
            translator.name(),
            id,
            priority,
            position,
            self.translators.len() + 1
        );
        self.translators.insert(
            position,
            TranslatorEntry {
                id,
                priority,
                translator,
            },
        );
        self.stats.translators = self.translators.len();
        id
    }

    /// Whether `id` is attached.
    pub fn has_translator(&self, id: TranslatorId) -> bool {
        self.translators.iter().any(|e| e.id == id)
    }

    /// Looks a translator up by id. Asking for an id that is not attached is a
    /// contract violation; release builds get `None`.
    pub fn find_translator(&self, id: TranslatorId) -> Option<&dyn Translator> {
        match self.translators.iter().find(|e| e.id == id) {
            Some(entry) => Some(entry.translator.as_ref()),
            None => {
                contract_violation!("🔴 find_translator: {} is not attached", id);
                None
            }
        }
    }

    pub fn find_translator_mut(&mut self, id: TranslatorId) -> Option<&mut dyn Translator> {
        match self.translators.iter_mut().find(|e| e.id == id) {
            Some(entry) => Some(entry.translator.as_mut()),
            None => {
                contract_violation!("🔴 find_translator_mut: {} is not attached", id);
                None
            }
        }
    }

    /// Looks a translator up by id and downcasts it to its concrete type.
    pub fn find_translator_as<T: Translator>(&self, id: TranslatorId) -> Option<&T> {
        self.find_translator(id)?.as_any().downcast_ref::<T>()
    }

    /// Detaches and drops the translator registered as `id`. Returns `false`
    /// (and does nothing) if no such translator is attached.
    pub fn remove_translator(&mut self, id: TranslatorId) -> bool {
        let Some(position) = self.translators.iter().position(|e| e.id == id) else {
            debug!("Translator {} not attached; nothing to remove", id);
            return false;
        };
        let entry = self.translators.remove(position);
        self.stats.translators = self.translators.len();
        debug!("🔌 Removed translator '{}' ({})", entry.translator.name(), id);
        true
    }

    /// Attached translator ids in dispatch order.
    pub fn translator_ids(&self) -> Vec<TranslatorId> {
        self.translators.iter().map(|e| e.id).collect()
    }

    pub fn translator_count(&self) -> usize {
        self.translators.len()
    }

    // ========================================================================
    // Message factories
    // ========================================================================

    /// Appends a new message of `kind` at the tail and lends it back so the
    /// caller can attach arguments.
    pub fn append_message(&mut self, kind: MessageType) -> &mut Message {
        self.messages
            .append_entry(Message::new(kind, self.local_player))
            .1
    }

    /// Inserts a new message of `kind` right after `after`, which must be
    /// resident in this stream.
    pub fn insert_message(&mut self, kind: MessageType, after: MessageHandle) -> &mut Message {
        self.messages
            .insert_after_entry(Message::new(kind, self.local_player), after)
            .1
    }

    // ========================================================================
    // Propagation
    // ========================================================================

    /// Runs every resident message through every translator, then moves the
    /// survivors to `commands`.
    pub fn propagate(&mut self, client: &mut ClientContext, commands: &mut CommandList) -> PropagationReport {
        let mut report = PropagationReport::default();
        let order = self.translator_ids();

        for id in order {
            let Some(position) = self.translators.iter().position(|e| e.id == id) else {
                trace!("⏭️ {} was detached during this pass; skipping", id);
                continue;
            };
            report.translators_run += 1;
            let entry = &mut self.translators[position];

            let mut cursor = self.messages.first();
            while let Some(handle) = cursor {
                let Some(message) = self.messages.get(handle) else {
                    break;
                };
                let kind = message.kind();
                let disposition = {
                    let mut ctx = TranslateContext::new(client, &mut self.scheduled, self.local_player, id);
                    entry.translator.translate(message, &mut ctx)
                };
                report.translate_calls += 1;

                let mut anchor = handle;
                for derived in self.scheduled.inserted.drain(..) {
                    trace!("➕ '{}' inserted {} after {}", entry.translator.name(), derived.kind(), kind);
                    anchor = self.messages.insert_after(derived, anchor);
                    report.synthesized += 1;
                }
                for derived in self.scheduled.appended.drain(..) {
                    trace!("➕ '{}' appended {}", entry.translator.name(), derived.kind());
                    self.messages.append(derived);
                    report.synthesized += 1;
                }

                cursor = self.messages.next(handle);

                if disposition == Disposition::Destroy {
                    trace!("🗑️ '{}' destroyed {}", entry.translator.name(), kind);
                    self.messages.destroy(handle);
                    report.destroyed += 1;
                }
            }

            for detached in std::mem::take(&mut self.scheduled.detached) {
                self.remove_translator(detached);
            }
        }

        report.forwarded = commands.append_message_list(self.messages.drain()) as u64;
        self.stats.record(&report);

        if report.translate_calls > 0 {
            debug!(
                "📨 Propagated {} calls across {} translators: {} destroyed, {} synthesized, {} forwarded",
                report.translate_calls, report.translators_run, report.destroyed, report.synthesized, report.forwarded
            );
        }
        report
    }
}

impl Deref for MessageStream {
    type Target = MessageList;

    fn deref(&self) -> &MessageList {
        &self.messages
    }
}

impl DerefMut for MessageStream {
    fn deref_mut(&mut self) -> &mut MessageList {
        &mut self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewState;
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    type CallLog = Rc<RefCell<Vec<(&'static str, MessageType)>>>;

    /// Records every call and destroys the configured types.
    struct Recorder {
        label: &'static str,
        log: CallLog,
        destroy: Vec<MessageType>,
    }

    impl Recorder {
        fn new(label: &'static str, log: &CallLog) -> Self {
            Self {
                label,
                log: log.clone(),
                destroy: Vec::new(),
            }
        }

        fn destroying(mut self, kind: MessageType) -> Self {
            self.destroy.push(kind);
            self
        }
    }

    impl Translator for Recorder {
        fn name(&self) -> &str {
            self.label
        }

        fn translate(&mut self, message: &Message, _ctx: &mut TranslateContext<'_>) -> Disposition {
            self.log.borrow_mut().push((self.label, message.kind()));
            if self.destroy.contains(&message.kind()) {
                Disposition::Destroy
            } else {
                Disposition::Keep
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn client() -> ClientContext {
        ClientContext::new(PlayerIndex(1), Box::new(ViewState::new(800, 600)))
    }

    fn labels(log: &CallLog) -> Vec<&'static str> {
        log.borrow().iter().map(|(label, _)| *label).collect()
    }

    #[test]
    fn test_keep_all_preserves_append_order() {
        let log = CallLog::default();
        let mut stream = MessageStream::new(PlayerIndex(1));
        let mut commands = CommandList::new();
        stream.attach_translator(Recorder::new("keep", &log), 10);

        let kinds = [
            MessageType::DoMoveTo,
            MessageType::FrameTick,
            MessageType::DoStop,
            MessageType::LogicCrc,
            MessageType::DoScatter,
        ];
        for (i, kind) in kinds.iter().enumerate() {
            stream.append_message(*kind).append_integer(i as i32);
        }

        let report = stream.propagate(&mut client(), &mut commands);
        assert_eq!(report.forwarded, 5);
        assert!(stream.is_empty());

        let drained: Vec<(MessageType, i32)> = commands.drain().map(|m| (m.kind(), m.integer(0))).collect();
        let expected: Vec<(MessageType, i32)> = kinds.iter().enumerate().map(|(i, k)| (*k, i as i32)).collect();
        assert_eq!(drained, expected);
    }

    #[test]
    fn test_translators_run_in_priority_order() {
        let log = CallLog::default();
        let mut stream = MessageStream::new(PlayerIndex(0));
        stream.attach_translator(Recorder::new("p5", &log), 5);
        stream.attach_translator(Recorder::new("p1", &log), 1);
        stream.attach_translator(Recorder::new("p3", &log), 3);

        stream.append_message(MessageType::DoStop);
        stream.propagate(&mut client(), &mut CommandList::new());

        assert_eq!(labels(&log), vec!["p1", "p3", "p5"]);
    }

    #[test]
    fn test_equal_priority_keeps_attachment_order() {
        let log = CallLog::default();
        let mut stream = MessageStream::new(PlayerIndex(0));
        stream.attach_translator(Recorder::new("first", &log), 7);
        stream.attach_translator(Recorder::new("second", &log), 7);

        stream.append_message(MessageType::DoStop);
        stream.append_message(MessageType::DoScatter);
        stream.propagate(&mut client(), &mut CommandList::new());

        assert_eq!(labels(&log), vec!["first", "first", "second", "second"]);
    }

    #[test]
    fn test_destroyed_message_skips_later_translators() {
        let log = CallLog::default();
        let mut stream = MessageStream::new(PlayerIndex(0));
        let mut commands = CommandList::new();
        stream.attach_translator(Recorder::new("early", &log).destroying(MessageType::DoStop), 1);
        stream.attach_translator(Recorder::new("late", &log), 2);

        stream.append_message(MessageType::DoStop);
        stream.append_message(MessageType::DoScatter);
        let report = stream.propagate(&mut client(), &mut commands);

        assert_eq!(report.destroyed, 1);
        assert!(!log
            .borrow()
            .iter()
            .any(|(label, kind)| *label == "late" && *kind == MessageType::DoStop));
        assert!(!commands.contains_type(MessageType::DoStop));
        assert!(commands.contains_type(MessageType::DoScatter));
    }

    #[test]
    fn test_attach_returns_unique_ids_and_remove_is_by_id() {
        let log = CallLog::default();
        let mut stream = MessageStream::new(PlayerIndex(0));
        let a = stream.attach_translator(Recorder::new("a", &log), 1);
        let b = stream.attach_translator(Recorder::new("b", &log), 1);
        assert_ne!(a, b);
        assert_eq!(stream.translator_count(), 2);

        assert!(stream.remove_translator(a));
        assert!(!stream.remove_translator(a));
        assert!(!stream.has_translator(a));
        assert_eq!(stream.translator_ids(), vec![b]);
        assert_eq!(stream.find_translator(b).map(|t| t.name().to_string()), Some("b".to_string()));
        assert!(stream.find_translator_as::<Recorder>(b).is_some());
        assert_eq!(stream.stats().translators, 1);
    }

    #[test]
    fn test_factories_stamp_local_player() {
        let mut stream = MessageStream::new(PlayerIndex(3));
        let first = {
            stream.append_message(MessageType::DoStop).append_integer(1);
            stream.first().unwrap()
        };
        stream.append_message(MessageType::DoStop).append_integer(3);
        stream.insert_message(MessageType::DoScatter, first).append_integer(2);

        let seen: Vec<(MessageType, i32, PlayerIndex)> = stream
            .iter()
            .map(|(_, m)| (m.kind(), m.integer(0), m.player_index()))
            .collect();
        assert_eq!(
            seen,
            vec![
                (MessageType::DoStop, 1, PlayerIndex(3)),
                (MessageType::DoScatter, 2, PlayerIndex(3)),
                (MessageType::DoStop, 3, PlayerIndex(3)),
            ]
        );
    }

    /// Replaces every `DoStop` with a `DoScatter` inserted in its place and
    /// appends one `LogicCrc` at the tail.
    struct Rewriter;

    impl Translator for Rewriter {
        fn name(&self) -> &str {
            "rewriter"
        }

        fn translate(&mut self, message: &Message, ctx: &mut TranslateContext<'_>) -> Disposition {
            if message.kind() != MessageType::DoStop {
                return Disposition::Keep;
            }
            let tag = message.integer(0);
            ctx.insert_message(MessageType::DoScatter).append_integer(tag);
            ctx.append_message(MessageType::LogicCrc).append_integer(tag * 10);
            Disposition::Destroy
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_synthesized_messages_are_visited_in_same_pass() {
        let log = CallLog::default();
        let mut stream = MessageStream::new(PlayerIndex(0));
        let mut commands = CommandList::new();
        stream.attach_translator(Rewriter, 1);
        stream.attach_translator(Recorder::new("after", &log), 2);

        stream.append_message(MessageType::DoMoveTo).append_integer(0);
        stream.append_message(MessageType::DoStop).append_integer(1);
        stream.append_message(MessageType::DoMoveTo).append_integer(2);

        let report = stream.propagate(&mut client(), &mut commands);
        assert_eq!(report.synthesized, 2);
        assert_eq!(report.destroyed, 1);

        let seen_later: Vec<MessageType> = log.borrow().iter().map(|(_, k)| *k).collect();
        assert_eq!(
            seen_later,
            vec![
                MessageType::DoMoveTo,
                MessageType::DoScatter,
                MessageType::DoMoveTo,
                MessageType::LogicCrc
            ]
        );

        let drained: Vec<(MessageType, i32)> = commands.drain().map(|m| (m.kind(), m.integer(0))).collect();
        assert_eq!(
            drained,
            vec![
                (MessageType::DoMoveTo, 0),
                (MessageType::DoScatter, 1),
                (MessageType::DoMoveTo, 2),
                (MessageType::LogicCrc, 10),
            ]
        );
    }

    /// Detaches a target translator the first time it is called.
    struct Detacher {
        target: Option<TranslatorId>,
    }

    impl Translator for Detacher {
        fn name(&self) -> &str {
            "detacher"
        }

        fn translate(&mut self, _message: &Message, ctx: &mut TranslateContext<'_>) -> Disposition {
            if let Some(target) = self.target.take() {
                ctx.detach_translator(target);
            }
            Disposition::Keep
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_translator_detached_mid_pass_is_skipped() {
        let log = CallLog::default();
        let mut stream = MessageStream::new(PlayerIndex(0));
        let mut commands = CommandList::new();
        let victim = stream.attach_translator(Recorder::new("victim", &log), 2);
        stream.attach_translator(Detacher { target: Some(victim) }, 1);

        stream.append_message(MessageType::DoStop);
        let report = stream.propagate(&mut client(), &mut commands);

        assert!(log.borrow().is_empty());
        assert!(!stream.has_translator(victim));
        assert_eq!(report.translators_run, 1);
        assert_eq!(report.forwarded, 1);
    }

    #[test]
    fn test_stats_accumulate_across_passes() {
        let log = CallLog::default();
        let mut stream = MessageStream::new(PlayerIndex(0));
        let mut commands = CommandList::new();
        stream.attach_translator(Recorder::new("r", &log).destroying(MessageType::DoStop), 1);
        let mut client = client();

        for _ in 0..3 {
            stream.append_message(MessageType::DoStop);
            stream.append_message(MessageType::DoScatter);
            stream.propagate(&mut client, &mut commands);
        }

        let stats = stream.stats();
        assert_eq!(stats.passes, 3);
        assert_eq!(stats.translate_calls, 6);
        assert_eq!(stats.messages_destroyed, 3);
        assert_eq!(stats.messages_forwarded, 3);
        assert_eq!(commands.len(), 3);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "is not attached")]
    fn test_finding_unknown_translator_fails_loudly() {
        let stream = MessageStream::new(PlayerIndex(0));
        let _ = stream.find_translator(TranslatorId(42));
    }
}
