//! Stock translators and the priorities a client session attaches them at.
//!
//! Lower priorities run first: the meta translator refines raw input, the
//! look-at translator consumes camera commands, and the dispatcher filters
//! what is left down to commands the simulation understands.

pub mod dispatcher;
pub mod look_at;
pub mod meta_event;

pub use dispatcher::ClientMessageDispatcher;
pub use look_at::{LookAtSettings, LookAtTranslator, ScrollType};
pub use meta_event::{MetaEventTranslator, MouseSettings};

pub const META_EVENT_PRIORITY: u32 = 20;
pub const LOOK_AT_PRIORITY: u32 = 60;
pub const CLIENT_DISPATCH_PRIORITY: u32 = 999_999_999;
