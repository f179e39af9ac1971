//! # Message Stream
//!
//! The client input pipeline of an RTS: raw device events become typed
//! [`Message`]s, run once per tick through a priority-ordered chain of
//! [`Translator`]s, and whatever survives lands on the [`CommandList`] for
//! the simulation and network layers to drain.
//!
//! ## Core Features
//!
//! - **Typed messages**: a tag from a range-partitioned [`MessageType`] space
//!   (raw input, meta commands, network commands, server messages) plus up to
//!   [`MAX_ARGUMENTS`] tagged [`Argument`]s
//! - **Stable handles**: [`MessageList`] is an arena with generational
//!   [`MessageHandle`]s, O(1) append, insert-after and removal
//! - **Translator chain**: keep/destroy dispatch in ascending priority with a
//!   stable tie-break; translators may synthesize messages mid-pass
//! - **Stock translators**: key/mouse to meta command mapping, camera
//!   scrolling and a final client dispatcher
//!
//! ## Architecture Overview
//!
//! ```text
//! RawInput ──append──▶ MessageStream ──propagate──▶ CommandList ──drain──▶ simulation
//!                        │
//!                        ├─ MetaEventTranslator      (20)
//!                        ├─ LookAtTranslator         (60)
//!                        └─ ClientMessageDispatcher  (999 999 999)
//! ```
//!
//! A [`ClientSession`] owns the stream, the command list and the
//! [`ClientContext`] translators read from.
//!
//! ## Quick Start Example
//!
//! ```rust
//! use message_stream::*;
//!
//! let config = TranslatorConfig {
//!     bindings: MetaMap::default_bindings(),
//!     ..TranslatorConfig::default()
//! };
//! let mut session = ClientSession::with_default_translators(
//!     PlayerIndex(0),
//!     Box::new(ViewState::new(800, 600)),
//!     config,
//! );
//! session.client_mut().set_frame(1);
//!
//! session.push_input(&RawInput::KeyDown {
//!     key: MappableKey::Right,
//!     modifiers: ModifierMask::NONE,
//!     autorepeat: false,
//! });
//! session.stream_mut().append_message(MessageType::DoStop);
//! session.update();
//!
//! let kinds: Vec<_> = session.drain_commands().iter().map(|m| m.kind()).collect();
//! assert_eq!(kinds, vec![MessageType::DoStop, MessageType::FrameTick]);
//!
//! // The scroll command landed behind this tick's frame tick; the camera
//! // moves on the next one.
//! session.update();
//! let view = session.client().view_as::<ViewState>().unwrap();
//! assert!(view.position().x > 0.0);
//! ```

// Contract enforcement
mod contract;

// Core modules
pub mod argument;
pub mod command_list;
pub mod context;
pub mod error;
pub mod input;
pub mod list;
pub mod message;
pub mod message_type;
pub mod meta_map;
pub mod session;
pub mod stats;
pub mod stream;
pub mod translator;
pub mod translators;
pub mod types;
pub mod view;

// Scenario tests
#[cfg(test)]
mod tests;

// Re-export commonly used items for convenience
pub use argument::{Argument, ArgumentDataType};
pub use command_list::CommandList;
pub use context::ClientContext;
pub use error::{MessageError, MetaMapError};
pub use input::{ButtonTransition, KeyState, MappableKey, ModifierMask, MouseButton, RawInput};
pub use list::{ListId, MessageHandle, MessageList};
pub use message::{Message, MAX_ARGUMENTS};
pub use message_type::{
    MessageType, BEGIN_META_MESSAGES, BEGIN_NETWORK_MESSAGES, END_META_MESSAGES, END_NETWORK_MESSAGES,
    SERVER_MESSAGES_BASE,
};
pub use meta_map::{CommandUsableIn, KeyTransition, MetaMap, MetaMapRecord};
pub use session::{ClientSession, TranslatorConfig};
pub use stats::{PropagationReport, StreamStats};
pub use stream::MessageStream;
pub use translator::{Disposition, TranslateContext, Translator, TranslatorId};
pub use translators::{
    ClientMessageDispatcher, LookAtSettings, LookAtTranslator, MetaEventTranslator, MouseSettings, ScrollType,
};
pub use types::{Coord2D, Coord3D, DrawableId, ICoord2D, IRegion2D, ObjectId, PlayerIndex, TeamId};
pub use view::{View, ViewState};
