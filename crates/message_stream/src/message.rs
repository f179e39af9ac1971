//! # Messages
//!
//! A [`Message`] is a type tag plus an ordered, append-only list of typed
//! [`Argument`]s and the index of the player it originated from.
//!
//! ## Argument access
//!
//! Arguments are read back either raw ([`Message::argument`], which returns
//! `Option`) or through the typed accessors ([`Message::integer`],
//! [`Message::pixel`], ...). The typed accessors treat an out-of-range index or
//! a tag mismatch as a caller bug: debug builds panic, release builds log the
//! violation and hand back a zeroed value.
//!
//! ```rust
//! use message_stream::{Message, MessageType, PlayerIndex, ICoord2D};
//!
//! let mut msg = Message::new(MessageType::RawMousePosition, PlayerIndex(0));
//! msg.append_pixel(ICoord2D::new(320, 240)).append_integer(0);
//!
//! assert_eq!(msg.argument_count(), 2);
//! assert_eq!(msg.pixel(0), ICoord2D::new(320, 240));
//! ```

use crate::argument::{Argument, ArgumentDataType};
use crate::contract::contract_violation;
use crate::error::MessageError;
use crate::message_type::MessageType;
use crate::types::{Coord3D, DrawableId, ICoord2D, IRegion2D, ObjectId, PlayerIndex, TeamId};
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

/// Hard ceiling on arguments per message; the count travels as a byte.
pub const MAX_ARGUMENTS: usize = u8::MAX as usize;

/// A typed event travelling through the stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    kind: MessageType,
    player: PlayerIndex,
    arguments: SmallVec<[Argument; 4]>,
}

macro_rules! typed_argument {
    ($(#[$doc:meta])* $append:ident, $read:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $append(&mut self, value: $ty) -> &mut Self {
            self.append_argument(Argument::$variant(value))
        }

        #[doc = concat!("Reads argument `index` as `", stringify!($variant), "`.")]
        pub fn $read(&self, index: usize) -> $ty {
            match self.arguments.get(index) {
                Some(Argument::$variant(value)) => *value,
                Some(other) => {
                    contract_violation!(
                        "🔴 {} argument {} holds {:?}, read as {}",
                        self.kind,
                        index,
                        other.data_type(),
                        stringify!($variant)
                    );
                    <$ty>::default()
                }
                None => {
                    contract_violation!(
                        "🔴 {} argument {} out of range (count {})",
                        self.kind,
                        index,
                        self.arguments.len()
                    );
                    <$ty>::default()
                }
            }
        }
    };
}

impl Message {
    /// Creates a message with no arguments.
    pub fn new(kind: MessageType, player: PlayerIndex) -> Self {
        Self {
            kind,
            player,
            arguments: SmallVec::new(),
        }
    }

    pub fn kind(&self) -> MessageType {
        self.kind
    }

    /// Diagnostic name of the message type.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn player_index(&self) -> PlayerIndex {
        self.player
    }

    pub fn set_player_index(&mut self, player: PlayerIndex) {
        self.player = player;
    }

    /// Number of arguments; always equal to `arguments().len()`.
    pub fn argument_count(&self) -> u8 {
        // Bounded by MAX_ARGUMENTS on every append path.
        self.arguments.len() as u8
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn argument(&self, index: usize) -> Option<&Argument> {
        self.arguments.get(index)
    }

    /// Tag of argument `index`, or [`ArgumentDataType::Unknown`] past the end.
    pub fn argument_data_type(&self, index: usize) -> ArgumentDataType {
        self.arguments
            .get(index)
            .map(Argument::data_type)
            .unwrap_or(ArgumentDataType::Unknown)
    }

    /// Appends an argument, refusing once the message is full.
    pub fn try_append_argument(&mut self, argument: Argument) -> Result<(), MessageError> {
        if self.arguments.len() >= MAX_ARGUMENTS {
            return Err(MessageError::ArgumentLimit {
                kind: self.kind,
                limit: MAX_ARGUMENTS,
            });
        }
        self.arguments.push(argument);
        Ok(())
    }

    /// Appends an argument. Overflowing the ceiling is a contract violation;
    /// in release builds the argument is dropped.
    pub fn append_argument(&mut self, argument: Argument) -> &mut Self {
        if let Err(err) = self.try_append_argument(argument) {
            contract_violation!("🔴 {}", err);
        }
        self
    }

    typed_argument!(append_integer, integer, Integer, i32);
    typed_argument!(append_real, real, Real, f32);
    typed_argument!(append_boolean, boolean, Boolean, bool);
    typed_argument!(append_object_id, object_id, ObjectId, ObjectId);
    typed_argument!(append_drawable_id, drawable_id, DrawableId, DrawableId);
    typed_argument!(append_team_id, team_id, TeamId, TeamId);
    typed_argument!(append_location, location, Location, Coord3D);
    typed_argument!(append_pixel, pixel, Pixel, ICoord2D);
    typed_argument!(append_pixel_region, pixel_region, PixelRegion, IRegion2D);
    typed_argument!(
        /// Appends a timestamp (milliseconds for device input, frames for ticks).
        append_timestamp, timestamp, Timestamp, u32
    );
    typed_argument!(append_wide_char, wide_char, WideChar, char);
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {}", self.kind, self.player)?;
        if !self.arguments.is_empty() {
            f.write_str(" (")?;
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}
