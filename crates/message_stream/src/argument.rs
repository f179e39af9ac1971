//! Typed message arguments.

use crate::types::{Coord3D, DrawableId, ICoord2D, IRegion2D, ObjectId, TeamId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One argument of a message. The variant is the tag; a payload can only be
/// read under the tag it was written with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Argument {
    Integer(i32),
    Real(f32),
    Boolean(bool),
    ObjectId(ObjectId),
    DrawableId(DrawableId),
    TeamId(TeamId),
    Location(Coord3D),
    Pixel(ICoord2D),
    PixelRegion(IRegion2D),
    /// Milliseconds or frames, depending on the message type.
    Timestamp(u32),
    WideChar(char),
}

/// Tag of an [`Argument`], plus `Unknown` for positions past the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArgumentDataType {
    Integer,
    Real,
    Boolean,
    ObjectId,
    DrawableId,
    TeamId,
    Location,
    Pixel,
    PixelRegion,
    Timestamp,
    WideChar,
    Unknown,
}

impl Argument {
    pub fn data_type(&self) -> ArgumentDataType {
        match self {
            Argument::Integer(_) => ArgumentDataType::Integer,
            Argument::Real(_) => ArgumentDataType::Real,
            Argument::Boolean(_) => ArgumentDataType::Boolean,
            Argument::ObjectId(_) => ArgumentDataType::ObjectId,
            Argument::DrawableId(_) => ArgumentDataType::DrawableId,
            Argument::TeamId(_) => ArgumentDataType::TeamId,
            Argument::Location(_) => ArgumentDataType::Location,
            Argument::Pixel(_) => ArgumentDataType::Pixel,
            Argument::PixelRegion(_) => ArgumentDataType::PixelRegion,
            Argument::Timestamp(_) => ArgumentDataType::Timestamp,
            Argument::WideChar(_) => ArgumentDataType::WideChar,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Integer(v) => write!(f, "{v}"),
            Argument::Real(v) => write!(f, "{v:.3}"),
            Argument::Boolean(v) => write!(f, "{v}"),
            Argument::ObjectId(id) => write!(f, "object#{}", id.0),
            Argument::DrawableId(id) => write!(f, "drawable#{}", id.0),
            Argument::TeamId(id) => write!(f, "team#{}", id.0),
            Argument::Location(c) => write!(f, "({:.1}, {:.1}, {:.1})", c.x, c.y, c.z),
            Argument::Pixel(p) => write!(f, "[{}, {}]", p.x, p.y),
            Argument::PixelRegion(r) => {
                write!(f, "[{}, {}]-[{}, {}]", r.lo.x, r.lo.y, r.hi.x, r.hi.y)
            }
            Argument::Timestamp(t) => write!(f, "@{t}"),
            Argument::WideChar(c) => write!(f, "{c:?}"),
        }
    }
}
