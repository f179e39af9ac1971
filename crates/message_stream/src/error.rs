//! Error types for the message stream.

use crate::message_type::MessageType;

/// Recoverable failures while building or naming messages.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MessageError {
    #[error("Message {kind} already carries the maximum of {limit} arguments")]
    ArgumentLimit { kind: MessageType, limit: usize },
    #[error("Unknown message type: {0}")]
    UnknownType(String),
}

/// Failures while assembling a meta binding table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetaMapError {
    #[error("Binding target {0} is not a meta message")]
    NotAMetaMessage(MessageType),
    #[error("Unknown meta command: {0}")]
    UnknownCommand(String),
    #[error("Unknown key: {0}")]
    UnknownKey(String),
    #[error("Unknown modifier state: {0}")]
    UnknownModifiers(String),
}
