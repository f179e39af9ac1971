//! # Meta Binding Table
//!
//! Maps key transitions (with a modifier mask and a usability context) to
//! meta message types. Records keep table order; the meta translator takes
//! the first usable match.
//!
//! Records deserialize from the binding-table names used in configuration:
//!
//! ```rust
//! use message_stream::{MappableKey, MessageType, MetaMapRecord};
//!
//! let record: MetaMapRecord = toml::from_str(r#"
//!     meta = "SCROLL_UP"
//!     key = "KEY_UP"
//!     transition = "DOWN"
//!     modifiers = "NONE"
//!     usable_in = ["GAME"]
//! "#).unwrap();
//!
//! assert_eq!(record.meta, MessageType::MetaScrollUp);
//! assert_eq!(record.key, MappableKey::Up);
//! ```

use crate::contract::contract_violation;
use crate::error::MetaMapError;
use crate::input::{MappableKey, ModifierMask};
use crate::message_type::MessageType;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which key transition triggers a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyTransition {
    Up,
    Down,
    /// A down of the same key as the previous key down.
    DoubleDown,
}

/// Context a binding is live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandUsableIn {
    /// In a running game with no shell screen up.
    Game,
    /// While a shell screen is up.
    Shell,
}

fn default_usable_in() -> Vec<CommandUsableIn> {
    vec![CommandUsableIn::Game]
}

/// One binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaMapRecord {
    #[serde(with = "meta_name")]
    pub meta: MessageType,
    /// `KEY_NONE` makes this a modifier-only binding that fires when the
    /// modifier mask itself changes.
    #[serde(default)]
    pub key: MappableKey,
    pub transition: KeyTransition,
    #[serde(default)]
    pub modifiers: ModifierMask,
    #[serde(default = "default_usable_in")]
    pub usable_in: Vec<CommandUsableIn>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display_name: String,
}

impl MetaMapRecord {
    pub fn new(meta: MessageType, key: MappableKey, transition: KeyTransition, modifiers: ModifierMask) -> Self {
        Self {
            meta,
            key,
            transition,
            modifiers,
            usable_in: default_usable_in(),
            category: String::new(),
            description: String::new(),
            display_name: String::new(),
        }
    }

    pub fn usable_in(mut self, contexts: &[CommandUsableIn]) -> Self {
        self.usable_in = contexts.to_vec();
        self
    }

    pub fn is_modifier_only(&self) -> bool {
        self.key == MappableKey::None
    }

    pub fn is_usable_in(&self, context: CommandUsableIn) -> bool {
        self.usable_in.contains(&context)
    }
}

/// Serde adapter: meta types by their binding-table name (`SCROLL_UP`).
mod meta_name {
    use crate::message_type::MessageType;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(kind: &MessageType, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(kind.meta_name().unwrap_or(kind.name()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MessageType, D::Error> {
        let name = String::deserialize(deserializer)?;
        MessageType::from_meta_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown meta command '{}'", name)))
    }
}

/// Ordered binding table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaMap {
    records: Vec<MetaMapRecord>,
}

impl MetaMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from records, rejecting the first non-meta target.
    pub fn from_records<I>(records: I) -> Result<Self, MetaMapError>
    where
        I: IntoIterator<Item = MetaMapRecord>,
    {
        let mut map = Self::new();
        for record in records {
            map.add_record(record)?;
        }
        Ok(map)
    }

    /// Appends a binding after every existing one.
    pub fn add_record(&mut self, record: MetaMapRecord) -> Result<(), MetaMapError> {
        if !record.meta.is_meta_message() {
            return Err(MetaMapError::NotAMetaMessage(record.meta));
        }
        debug!(
            "⌨️ Bound {} {:?} [{}] -> {}",
            record.key, record.transition, record.modifiers, record.meta
        );
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[MetaMapRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Meta type for a binding-table name. Asking for a name that does not
    /// exist is a caller bug; release builds get `MSG_INVALID`.
    pub fn find_meta_message(name: &str) -> MessageType {
        match MessageType::from_meta_name(name) {
            Some(kind) => kind,
            None => {
                contract_violation!("🔴 Unknown meta command '{}'", name);
                MessageType::Invalid
            }
        }
    }

    /// The bindings the replay driver ships with when no table is configured:
    /// arrow-key scrolling, camera reset, and a modifier-only force-attack.
    pub fn default_bindings() -> Self {
        use KeyTransition::{Down, Up};
        use MessageType as T;
        let none = ModifierMask::NONE;
        let records = [
            MetaMapRecord::new(T::MetaScrollUp, MappableKey::Up, Down, none),
            MetaMapRecord::new(T::MetaEndScrollUp, MappableKey::Up, Up, none),
            MetaMapRecord::new(T::MetaScrollDown, MappableKey::Down, Down, none),
            MetaMapRecord::new(T::MetaEndScrollDown, MappableKey::Down, Up, none),
            MetaMapRecord::new(T::MetaScrollLeft, MappableKey::Left, Down, none),
            MetaMapRecord::new(T::MetaEndScrollLeft, MappableKey::Left, Up, none),
            MetaMapRecord::new(T::MetaScrollRight, MappableKey::Right, Down, none),
            MetaMapRecord::new(T::MetaEndScrollRight, MappableKey::Right, Up, none),
            MetaMapRecord::new(T::MetaCameraReset, MappableKey::Home, Down, none),
            MetaMapRecord::new(T::MetaStop, MappableKey::S, Down, none),
            MetaMapRecord::new(T::MetaScatter, MappableKey::X, Down, ModifierMask::CTRL),
            MetaMapRecord::new(T::MetaBeginForceAttack, MappableKey::None, Down, ModifierMask::CTRL),
            MetaMapRecord::new(T::MetaEndForceAttack, MappableKey::None, Up, ModifierMask::CTRL),
            MetaMapRecord::new(T::MetaOptions, MappableKey::Esc, Down, none)
                .usable_in(&[CommandUsableIn::Game, CommandUsableIn::Shell]),
        ];
        Self { records: records.to_vec() }
    }
}
