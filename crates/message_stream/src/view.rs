//! Camera view collaborator driven by the look-at translator.

use crate::types::{Coord2D, ICoord2D};
use serde::Serialize;
use std::any::Any;
use std::f32::consts::{PI, TAU};

/// The tactical camera as seen from the input pipeline.
///
/// Implemented by the renderer in a full client; [`ViewState`] is the plain
/// bookkeeping implementation used by the replay driver and tests.
pub trait View {
    /// Viewport size in pixels.
    fn size(&self) -> ICoord2D;
    /// Moves the look-at point by a screen-space offset.
    fn scroll_by(&mut self, delta: Coord2D);
    fn rotate_by(&mut self, radians: f32);
    fn pitch_by(&mut self, radians: f32);
    fn adjust_fov_by(&mut self, radians: f32);
    /// Restores angle, pitch and field of view to their defaults.
    fn reset(&mut self);
    /// Concrete view, for callers that need to inspect it.
    fn as_any(&self) -> &dyn Any;
}

pub const DEFAULT_PITCH: f32 = 0.65;
pub const MIN_PITCH: f32 = 0.1;
pub const MAX_PITCH: f32 = PI / 2.0;
pub const DEFAULT_FOV: f32 = 50.0 * PI / 180.0;
pub const MIN_FOV: f32 = 20.0 * PI / 180.0;
pub const MAX_FOV: f32 = 90.0 * PI / 180.0;

/// Accumulating camera state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    size: ICoord2D,
    position: Coord2D,
    angle: f32,
    pitch: f32,
    fov: f32,
    scrolls: u32,
}

impl ViewState {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            size: ICoord2D::new(width, height),
            position: Coord2D::default(),
            angle: 0.0,
            pitch: DEFAULT_PITCH,
            fov: DEFAULT_FOV,
            scrolls: 0,
        }
    }

    pub fn position(&self) -> Coord2D {
        self.position
    }

    /// Yaw in `[0, 2π)`.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Number of non-zero scrolls applied so far.
    pub fn scroll_count(&self) -> u32 {
        self.scrolls
    }
}

impl View for ViewState {
    fn size(&self) -> ICoord2D {
        self.size
    }

    fn scroll_by(&mut self, delta: Coord2D) {
        if delta.is_zero() {
            return;
        }
        self.position.x += delta.x;
        self.position.y += delta.y;
        self.scrolls += 1;
    }

    fn rotate_by(&mut self, radians: f32) {
        self.angle = (self.angle + radians).rem_euclid(TAU);
    }

    fn pitch_by(&mut self, radians: f32) {
        self.pitch = (self.pitch + radians).clamp(MIN_PITCH, MAX_PITCH);
    }

    fn adjust_fov_by(&mut self, radians: f32) {
        self.fov = (self.fov + radians).clamp(MIN_FOV, MAX_FOV);
    }

    fn reset(&mut self) {
        self.angle = 0.0;
        self.pitch = DEFAULT_PITCH;
        self.fov = DEFAULT_FOV;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
