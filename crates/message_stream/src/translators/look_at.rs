//! # Look-At Translator
//!
//! Drives the tactical camera from input. Three scroll sources compete for
//! one scroll slot:
//!
//! - **RMB**: dragging with the right button held past a small threshold.
//! - **Key**: the `META_SCROLL_*` / `META_END_SCROLL_*` pairs.
//! - **Screen edge**: the cursor resting on the viewport border.
//!
//! A source can only take the slot while it is free and only gives it back
//! to [`ScrollType::None`]. The offset for the active source is applied to
//! the [`View`](crate::View) on every frame tick.
//!
//! Rotate, pitch and field-of-view modes are toggled by their begin/end meta
//! messages; while one is on, mouse motion accumulates and is applied on the
//! next frame tick.

use crate::input::{ButtonTransition, MouseButton};
use crate::message::Message;
use crate::message_type::MessageType;
use crate::translator::{Disposition, TranslateContext, Translator};
use crate::types::{Coord2D, ICoord2D};
use serde::{Deserialize, Serialize};
use std::any::Any;
use tracing::{debug, trace};

/// Camera response tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookAtSettings {
    pub horizontal_scroll_factor: f32,
    pub vertical_scroll_factor: f32,
    pub keyboard_scroll_factor: f32,
    /// Base per-tick scroll distance. Also the floor added along the drag
    /// direction while RMB scrolling.
    pub scroll_amount: f32,
    /// Border width in pixels that triggers edge scrolling.
    pub screen_edge_size: i32,
    /// Pixels the cursor must travel with the right button held before a
    /// drag turns into a scroll.
    pub rmb_scroll_threshold: i32,
    /// Radians per pixel of horizontal motion in rotate mode.
    pub rotate_factor: f32,
    /// Radians per pixel of vertical motion in pitch mode.
    pub pitch_factor: f32,
    /// Radians per pixel of vertical motion in field-of-view mode.
    pub fov_factor: f32,
    pub edge_scroll_enabled: bool,
}

impl Default for LookAtSettings {
    fn default() -> Self {
        Self {
            horizontal_scroll_factor: 1.0,
            vertical_scroll_factor: 1.0,
            keyboard_scroll_factor: 1.0,
            scroll_amount: 10.0,
            screen_edge_size: 3,
            rmb_scroll_threshold: 4,
            rotate_factor: 0.01,
            pitch_factor: 0.005,
            fov_factor: 0.005,
            edge_scroll_enabled: true,
        }
    }
}

/// Which source currently owns scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ScrollType {
    #[default]
    None,
    Rmb,
    Key,
    ScreenEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn index(self) -> usize {
        self as usize
    }

    fn from_meta(kind: MessageType) -> Option<(Direction, bool)> {
        use MessageType as T;
        let decoded = match kind {
            T::MetaScrollUp => (Direction::Up, true),
            T::MetaScrollDown => (Direction::Down, true),
            T::MetaScrollLeft => (Direction::Left, true),
            T::MetaScrollRight => (Direction::Right, true),
            T::MetaEndScrollUp => (Direction::Up, false),
            T::MetaEndScrollDown => (Direction::Down, false),
            T::MetaEndScrollLeft => (Direction::Left, false),
            T::MetaEndScrollRight => (Direction::Right, false),
            _ => return None,
        };
        Some(decoded)
    }
}

/// Camera look-at translator.
#[derive(Debug)]
pub struct LookAtTranslator {
    settings: LookAtSettings,
    scroll: ScrollType,
    anchor: ICoord2D,
    cursor: ICoord2D,
    right_button_down: bool,
    /// The current right press turned into an RMB scroll.
    drag_scrolled: bool,
    held: [bool; 4],
    rotating: bool,
    pitching: bool,
    adjusting_fov: bool,
    last_motion: Option<ICoord2D>,
    pending_rotate: f32,
    pending_pitch: f32,
    pending_fov: f32,
    last_offset: Coord2D,
}

impl LookAtTranslator {
    pub fn new(settings: LookAtSettings) -> Self {
        Self {
            settings,
            scroll: ScrollType::None,
            anchor: ICoord2D::default(),
            cursor: ICoord2D::default(),
            right_button_down: false,
            drag_scrolled: false,
            held: [false; 4],
            rotating: false,
            pitching: false,
            adjusting_fov: false,
            last_motion: None,
            pending_rotate: 0.0,
            pending_pitch: 0.0,
            pending_fov: 0.0,
            last_offset: Coord2D::default(),
        }
    }

    pub fn settings(&self) -> &LookAtSettings {
        &self.settings
    }

    pub fn scroll_type(&self) -> ScrollType {
        self.scroll
    }

    /// Current RMB anchor in screen pixels.
    pub fn anchor(&self) -> ICoord2D {
        self.anchor
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn is_pitching(&self) -> bool {
        self.pitching
    }

    pub fn is_adjusting_fov(&self) -> bool {
        self.adjusting_fov
    }

    /// Offset applied on the most recent frame tick.
    pub fn last_scroll_offset(&self) -> Coord2D {
        self.last_offset
    }

    /// Claims the scroll slot for `kind`. Fails while another source holds it.
    pub fn try_begin_scroll(&mut self, kind: ScrollType) -> bool {
        if self.scroll != ScrollType::None || kind == ScrollType::None {
            return false;
        }
        debug!("🎥 Scroll started: {:?}", kind);
        self.scroll = kind;
        true
    }

    pub fn stop_scroll(&mut self) {
        if self.scroll != ScrollType::None {
            debug!("🎥 Scroll stopped: {:?}", self.scroll);
        }
        self.scroll = ScrollType::None;
    }

    fn any_held(&self) -> bool {
        self.held.iter().any(|h| *h)
    }

    fn at_screen_edge(&self, size: ICoord2D) -> bool {
        let edge = self.settings.screen_edge_size;
        let c = self.cursor;
        c.x < edge || c.y < edge || c.x >= size.x - edge || c.y >= size.y - edge
    }

    /// Keeps the anchor within half a viewport of the cursor on each axis.
    fn rehome_anchor(&mut self, size: ICoord2D) {
        let half = ICoord2D::new(size.x / 2, size.y / 2);
        let drag = self.cursor - self.anchor;
        if drag.x > half.x {
            self.anchor.x = self.cursor.x - half.x;
        } else if drag.x < -half.x {
            self.anchor.x = self.cursor.x + half.x;
        }
        if drag.y > half.y {
            self.anchor.y = self.cursor.y - half.y;
        } else if drag.y < -half.y {
            self.anchor.y = self.cursor.y + half.y;
        }
    }

    fn on_mouse_motion(&mut self, position: ICoord2D, ctx: &mut TranslateContext<'_>) {
        if let Some(previous) = self.last_motion {
            let motion = position - previous;
            if self.rotating {
                self.pending_rotate += motion.x as f32 * self.settings.rotate_factor;
            }
            if self.pitching {
                self.pending_pitch += motion.y as f32 * self.settings.pitch_factor;
            }
            if self.adjusting_fov {
                self.pending_fov += motion.y as f32 * self.settings.fov_factor;
            }
        }
        self.last_motion = Some(position);
        self.cursor = position;

        let size = ctx.client().view().size();
        if self.right_button_down {
            let drag = self.cursor - self.anchor;
            let threshold = self.settings.rmb_scroll_threshold;
            if self.scroll == ScrollType::None
                && (drag.x.abs() > threshold || drag.y.abs() > threshold)
                && self.try_begin_scroll(ScrollType::Rmb)
            {
                self.drag_scrolled = true;
            }
            if self.scroll == ScrollType::Rmb {
                self.rehome_anchor(size);
            }
        }

        if self.settings.edge_scroll_enabled {
            let at_edge = self.at_screen_edge(size);
            if at_edge && self.scroll == ScrollType::None {
                self.try_begin_scroll(ScrollType::ScreenEdge);
            } else if !at_edge && self.scroll == ScrollType::ScreenEdge {
                self.stop_scroll();
            }
        }
    }

    fn on_right_release(&mut self) {
        self.right_button_down = false;
        if self.scroll == ScrollType::Rmb {
            self.stop_scroll();
        }
    }

    fn scroll_offset(&self, size: ICoord2D) -> Coord2D {
        let s = &self.settings;
        match self.scroll {
            ScrollType::None => Coord2D::default(),
            ScrollType::Rmb => {
                let drag = self.cursor - self.anchor;
                let drag = Coord2D::new(drag.x as f32, drag.y as f32);
                let direction = drag.normalized();
                Coord2D::new(
                    s.horizontal_scroll_factor * (drag.x + direction.x * s.scroll_amount),
                    s.vertical_scroll_factor * (drag.y + direction.y * s.scroll_amount),
                )
            }
            ScrollType::Key => {
                let axis = |negative: Direction, positive: Direction| {
                    (self.held[positive.index()] as i32 - self.held[negative.index()] as i32) as f32
                };
                let amount = s.scroll_amount * s.keyboard_scroll_factor;
                Coord2D::new(
                    s.horizontal_scroll_factor * amount * axis(Direction::Left, Direction::Right),
                    s.vertical_scroll_factor * amount * axis(Direction::Up, Direction::Down),
                )
            }
            ScrollType::ScreenEdge => {
                let edge = s.screen_edge_size;
                let c = self.cursor;
                let x = if c.x < edge {
                    -1.0
                } else if c.x >= size.x - edge {
                    1.0
                } else {
                    0.0
                };
                let y = if c.y < edge {
                    -1.0
                } else if c.y >= size.y - edge {
                    1.0
                } else {
                    0.0
                };
                Coord2D::new(
                    s.horizontal_scroll_factor * s.scroll_amount * x,
                    s.vertical_scroll_factor * s.scroll_amount * y,
                )
            }
        }
    }

    fn on_frame_tick(&mut self, ctx: &mut TranslateContext<'_>) {
        let size = ctx.client().view().size();

        // A source that was blocked while another one scrolled takes over
        // once the slot frees up.
        if self.scroll == ScrollType::None {
            if self.any_held() {
                self.try_begin_scroll(ScrollType::Key);
            } else if self.settings.edge_scroll_enabled && self.last_motion.is_some() && self.at_screen_edge(size) {
                self.try_begin_scroll(ScrollType::ScreenEdge);
            }
        }

        let offset = self.scroll_offset(size);
        self.last_offset = offset;
        let view = ctx.view_mut();
        view.scroll_by(offset);

        if self.pending_rotate != 0.0 {
            view.rotate_by(self.pending_rotate);
        }
        if self.pending_pitch != 0.0 {
            view.pitch_by(self.pending_pitch);
        }
        if self.pending_fov != 0.0 {
            view.adjust_fov_by(self.pending_fov);
        }
        self.pending_rotate = 0.0;
        self.pending_pitch = 0.0;
        self.pending_fov = 0.0;

        if !offset.is_zero() {
            trace!("🎥 Scrolled by ({:.1}, {:.1}) via {:?}", offset.x, offset.y, self.scroll);
        }
    }

    fn on_scroll_key(&mut self, direction: Direction, pressed: bool) {
        self.held[direction.index()] = pressed;
        if pressed {
            if self.scroll == ScrollType::None {
                self.try_begin_scroll(ScrollType::Key);
            }
        } else if !self.any_held() && self.scroll == ScrollType::Key {
            self.stop_scroll();
        }
    }
}

impl Translator for LookAtTranslator {
    fn name(&self) -> &str {
        "look_at"
    }

    fn translate(&mut self, message: &Message, ctx: &mut TranslateContext<'_>) -> Disposition {
        use MessageType as T;
        let kind = message.kind();

        if let Some((direction, pressed)) = Direction::from_meta(kind) {
            self.on_scroll_key(direction, pressed);
            return Disposition::Destroy;
        }

        match kind {
            T::FrameTick => {
                self.on_frame_tick(ctx);
                Disposition::Keep
            }
            T::RawMousePosition => {
                self.on_mouse_motion(message.pixel(0), ctx);
                Disposition::Keep
            }
            T::MouseRightClick | T::MouseRightDoubleClick => {
                self.on_right_release();
                if std::mem::take(&mut self.drag_scrolled) {
                    trace!("🎥 Swallowed {} ending a drag scroll", kind);
                    Disposition::Destroy
                } else {
                    Disposition::Keep
                }
            }
            T::MetaBeginCameraRotate | T::MetaEndCameraRotate => {
                self.rotating = kind == T::MetaBeginCameraRotate;
                Disposition::Destroy
            }
            T::MetaBeginCameraPitch | T::MetaEndCameraPitch => {
                self.pitching = kind == T::MetaBeginCameraPitch;
                Disposition::Destroy
            }
            T::MetaBeginCameraFov | T::MetaEndCameraFov => {
                self.adjusting_fov = kind == T::MetaBeginCameraFov;
                Disposition::Destroy
            }
            T::MetaCameraReset => {
                ctx.view_mut().reset();
                Disposition::Destroy
            }
            _ => {
                match MouseButton::from_raw(kind) {
                    Some((MouseButton::Right, ButtonTransition::Down | ButtonTransition::DoubleClick)) => {
                        self.right_button_down = true;
                        self.drag_scrolled = false;
                        self.anchor = message.pixel(0);
                        self.cursor = self.anchor;
                    }
                    Some((MouseButton::Right, ButtonTransition::Up)) => {
                        self.on_right_release();
                        self.drag_scrolled = false;
                    }
                    _ => {}
                }
                Disposition::Keep
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
