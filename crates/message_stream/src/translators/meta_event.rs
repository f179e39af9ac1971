//! # Meta Event Translator
//!
//! Turns raw keyboard transitions into meta messages through a [`MetaMap`],
//! and raw mouse button transitions into refined click or double-click
//! messages.
//!
//! Key handling:
//!
//! - The modifier mask is normalized (left and right collapsed, caps lock
//!   ignored) and remembered across events.
//! - Bindings are scanned in table order. Game bindings are live from frame 1
//!   while no shell is up; shell bindings only while a shell is up.
//! - A binding with no key fires when the mask itself changes: an `UP`
//!   binding on the mask being left, a `DOWN` binding on the mask being
//!   entered.
//! - An autorepeat down of a bound key is eaten without emitting anything.
//! - The first match wins. The meta message is appended to the stream and
//!   the raw event destroyed.
//!
//! Mouse handling records the down position per button and refines the
//! matching up into a click that carries the dragged pixel region. Only the
//! raw up is destroyed; raw downs and double-clicks stay in the stream
//! because the look-at translator drives RMB scrolling from them.

use crate::input::{ButtonTransition, KeyState, MappableKey, ModifierMask, MouseButton};
use crate::message::Message;
use crate::message_type::MessageType;
use crate::meta_map::{CommandUsableIn, KeyTransition, MetaMap, MetaMapRecord};
use crate::translator::{Disposition, TranslateContext, Translator};
use crate::types::{ICoord2D, IRegion2D};
use serde::{Deserialize, Serialize};
use std::any::Any;
use tracing::{debug, trace};

/// Click refinement settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseSettings {
    /// Pixels a button may travel between down and up and still count as a
    /// point click.
    pub drag_tolerance: i32,
    /// Longest gap between a click and the next down on the same button for
    /// the pair to count as a double click.
    pub double_click_time_ms: u32,
}

impl Default for MouseSettings {
    fn default() -> Self {
        Self {
            drag_tolerance: 4,
            double_click_time_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ButtonState {
    anchor: ICoord2D,
    next_up_is_double: bool,
    /// Time and position of the last completed single click.
    last_click: Option<(u32, ICoord2D)>,
}

/// Keyboard/mouse to meta command multiplexer.
#[derive(Debug)]
pub struct MetaEventTranslator {
    map: MetaMap,
    settings: MouseSettings,
    last_key_down: MappableKey,
    last_mask: ModifierMask,
    buttons: [ButtonState; 3],
}

impl MetaEventTranslator {
    pub fn new(map: MetaMap, settings: MouseSettings) -> Self {
        Self {
            map,
            settings,
            last_key_down: MappableKey::None,
            last_mask: ModifierMask::NONE,
            buttons: [ButtonState::default(); 3],
        }
    }

    pub fn map(&self) -> &MetaMap {
        &self.map
    }

    pub fn settings(&self) -> &MouseSettings {
        &self.settings
    }

    pub fn last_key_down(&self) -> MappableKey {
        self.last_key_down
    }

    pub fn last_modifiers(&self) -> ModifierMask {
        self.last_mask
    }

    fn is_live(record: &MetaMapRecord, frame: u32, shell_active: bool) -> bool {
        let in_game = frame >= 1 && !shell_active;
        (in_game && record.is_usable_in(CommandUsableIn::Game))
            || (shell_active && record.is_usable_in(CommandUsableIn::Shell))
    }

    fn translate_key(&mut self, message: &Message, ctx: &mut TranslateContext<'_>) -> Disposition {
        let code = message.integer(0);
        let state = KeyState::from_bits_truncate(message.integer(1) as u32);
        let is_down = message.kind() == MessageType::RawKeyDown;
        let key = MappableKey::from_code(code).unwrap_or(MappableKey::None);

        let previous_mask = self.last_mask;
        let previous_key = self.last_key_down;
        let mask = state.modifiers();
        self.last_mask = mask;
        if is_down {
            self.last_key_down = key;
        }

        let frame = ctx.frame();
        let shell_active = ctx.is_shell_active();

        for record in self.map.records() {
            if !Self::is_live(record, frame, shell_active) {
                continue;
            }

            if record.is_modifier_only() {
                if mask == previous_mask {
                    continue;
                }
                let fires = match record.transition {
                    KeyTransition::Up => record.modifiers == previous_mask,
                    KeyTransition::Down => record.modifiers == mask,
                    KeyTransition::DoubleDown => false,
                };
                if fires {
                    debug!("⌨️ Modifiers {} -> {}: {}", previous_mask, mask, record.meta);
                    ctx.append_message(record.meta);
                    return Disposition::Destroy;
                }
                continue;
            }

            if record.key != key || record.modifiers != mask {
                continue;
            }
            let transition_matches = match record.transition {
                KeyTransition::Down => is_down,
                KeyTransition::Up => !is_down,
                KeyTransition::DoubleDown => is_down && previous_key == key,
            };
            if !transition_matches {
                continue;
            }

            if is_down && state.is_autorepeat() {
                trace!("🔁 Swallowed autorepeat of {}", key);
                return Disposition::Destroy;
            }

            debug!("⌨️ {} {:?} [{}] -> {}", key, record.transition, mask, record.meta);
            ctx.append_message(record.meta);
            return Disposition::Destroy;
        }

        Disposition::Keep
    }

    fn translate_button(
        &mut self,
        message: &Message,
        button: MouseButton,
        transition: ButtonTransition,
        ctx: &mut TranslateContext<'_>,
    ) -> Disposition {
        let position = message.pixel(0);
        let modifiers = message.integer(1);
        let time = message.timestamp(2);
        let tolerance = self.settings.drag_tolerance;
        let window = self.settings.double_click_time_ms;
        let state = &mut self.buttons[button.index()];

        match transition {
            ButtonTransition::Down => {
                state.anchor = position;
                state.next_up_is_double = state.last_click.is_some_and(|(at, spot)| {
                    let delta = position - spot;
                    time.wrapping_sub(at) <= window && within_tolerance(delta, tolerance)
                });
                Disposition::Keep
            }
            ButtonTransition::DoubleClick => {
                state.anchor = position;
                state.next_up_is_double = true;
                Disposition::Keep
            }
            ButtonTransition::Up => {
                let delta = position - state.anchor;
                let region = if within_tolerance(delta, tolerance) {
                    IRegion2D::spanning(state.anchor, state.anchor)
                } else {
                    IRegion2D::spanning(state.anchor, position)
                };
                let double = state.next_up_is_double;
                state.next_up_is_double = false;
                // A drag or a completed double click never starts a new pair.
                state.last_click = if double || !region.is_point() {
                    None
                } else {
                    Some((time, state.anchor))
                };

                let kind = button.click_type(double);
                trace!("🖱️ {:?} button up -> {}", button, kind);
                ctx.insert_message(kind)
                    .append_pixel_region(region)
                    .append_integer(modifiers);
                Disposition::Destroy
            }
        }
    }
}

impl Translator for MetaEventTranslator {
    fn name(&self) -> &str {
        "meta_event"
    }

    fn translate(&mut self, message: &Message, ctx: &mut TranslateContext<'_>) -> Disposition {
        let kind = message.kind();
        if kind.is_raw_key() {
            return self.translate_key(message, ctx);
        }
        match MouseButton::from_raw(kind) {
            Some((button, transition)) => self.translate_button(message, button, transition, ctx),
            None => Disposition::Keep,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Both axes moved no further than `tolerance` pixels.
fn within_tolerance(delta: ICoord2D, tolerance: i32) -> bool {
    delta.x.abs() <= tolerance && delta.y.abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawInput;
    use crate::tests::harness::Harness;

    fn scroll_map() -> MetaMap {
        MetaMap::from_records([
            MetaMapRecord::new(MessageType::MetaScrollUp, MappableKey::Up, KeyTransition::Down, ModifierMask::NONE),
            MetaMapRecord::new(MessageType::MetaEndScrollUp, MappableKey::Up, KeyTransition::Up, ModifierMask::NONE),
        ])
        .unwrap()
    }

    fn key_down(key: MappableKey) -> RawInput {
        RawInput::KeyDown {
            key,
            modifiers: ModifierMask::NONE,
            autorepeat: false,
        }
    }

    fn click(button: MouseButton, x: i32, y: i32, time: u32) -> [RawInput; 2] {
        let modifiers = ModifierMask::NONE;
        [
            RawInput::MouseDown { button, x, y, modifiers, time },
            RawInput::MouseUp { button, x, y, modifiers, time: time + 50 },
        ]
    }

    fn harness(map: MetaMap) -> Harness {
        Harness::new().with(MetaEventTranslator::new(map, MouseSettings::default()), 20)
    }

    #[test]
    fn test_bound_key_down_becomes_meta() {
        let mut h = harness(scroll_map());
        h.input(key_down(MappableKey::Up));
        h.propagate();
        assert_eq!(h.drain_kinds(), vec![MessageType::MetaScrollUp]);
    }

    #[test]
    fn test_unbound_key_is_kept() {
        let mut h = harness(scroll_map());
        h.input(key_down(MappableKey::Q));
        h.propagate();
        assert_eq!(h.drain_kinds(), vec![MessageType::RawKeyDown]);
    }

    #[test]
    fn test_autorepeat_is_swallowed() {
        let mut h = harness(scroll_map());
        h.input(RawInput::KeyDown {
            key: MappableKey::Up,
            modifiers: ModifierMask::NONE,
            autorepeat: true,
        });
        let report = h.propagate();
        assert_eq!(report.destroyed, 1);
        assert_eq!(report.synthesized, 0);
        assert!(h.drain_kinds().is_empty());
    }

    #[test]
    fn test_modifier_mismatch_does_not_match() {
        let mut h = harness(scroll_map());
        h.input(RawInput::KeyDown {
            key: MappableKey::Up,
            modifiers: ModifierMask::CTRL,
            autorepeat: false,
        });
        h.propagate();
        assert_eq!(h.drain_kinds(), vec![MessageType::RawKeyDown]);
    }

    #[test]
    fn test_first_match_wins() {
        let map = MetaMap::from_records([
            MetaMapRecord::new(MessageType::MetaStop, MappableKey::S, KeyTransition::Down, ModifierMask::NONE),
            MetaMapRecord::new(MessageType::MetaScatter, MappableKey::S, KeyTransition::Down, ModifierMask::NONE),
        ])
        .unwrap();
        let mut h = harness(map);
        h.input(key_down(MappableKey::S));
        h.propagate();
        assert_eq!(h.drain_kinds(), vec![MessageType::MetaStop]);
    }

    #[test]
    fn test_double_down_needs_repeated_key() {
        let map = MetaMap::from_records([
            MetaMapRecord::new(MessageType::MetaViewCommandCenter, MappableKey::H, KeyTransition::DoubleDown, ModifierMask::NONE),
            MetaMapRecord::new(MessageType::MetaSelectHero, MappableKey::H, KeyTransition::Down, ModifierMask::NONE),
        ])
        .unwrap();
        let mut h = harness(map);
        h.input(key_down(MappableKey::H));
        h.input(RawInput::KeyUp { key: MappableKey::H, modifiers: ModifierMask::NONE });
        h.input(key_down(MappableKey::H));
        h.propagate();
        assert_eq!(
            h.drain_kinds(),
            vec![MessageType::RawKeyUp, MessageType::MetaSelectHero, MessageType::MetaViewCommandCenter]
        );
    }

    #[test]
    fn test_game_bindings_wait_for_first_frame() {
        let mut h = harness(scroll_map());
        h.client.set_frame(0);
        h.input(key_down(MappableKey::Up));
        h.propagate();
        assert_eq!(h.drain_kinds(), vec![MessageType::RawKeyDown]);
    }

    #[test]
    fn test_shell_gates_bindings() {
        let map = MetaMap::from_records([
            MetaMapRecord::new(MessageType::MetaOptions, MappableKey::Esc, KeyTransition::Down, ModifierMask::NONE)
                .usable_in(&[CommandUsableIn::Shell]),
            MetaMapRecord::new(MessageType::MetaStop, MappableKey::S, KeyTransition::Down, ModifierMask::NONE),
        ])
        .unwrap();
        let mut h = harness(map);
        h.client.set_shell_active(true);
        h.input(key_down(MappableKey::Esc));
        h.input(key_down(MappableKey::S));
        h.propagate();
        assert_eq!(h.drain_kinds(), vec![MessageType::RawKeyDown, MessageType::MetaOptions]);

        h.client.set_shell_active(false);
        h.input(key_down(MappableKey::Esc));
        h.input(key_down(MappableKey::S));
        h.propagate();
        assert_eq!(h.drain_kinds(), vec![MessageType::RawKeyDown, MessageType::MetaStop]);
    }

    #[test]
    fn test_modifier_only_transitions() {
        let map = MetaMap::from_records([
            MetaMapRecord::new(MessageType::MetaBeginPreferSelection, MappableKey::None, KeyTransition::Down, ModifierMask::SHIFT),
            MetaMapRecord::new(MessageType::MetaEndPreferSelection, MappableKey::None, KeyTransition::Up, ModifierMask::SHIFT),
        ])
        .unwrap();
        let mut h = harness(map);
        h.input(RawInput::KeyDown {
            key: MappableKey::LeftShift,
            modifiers: ModifierMask::SHIFT,
            autorepeat: false,
        });
        h.input(RawInput::KeyUp {
            key: MappableKey::LeftShift,
            modifiers: ModifierMask::NONE,
        });
        h.propagate();
        assert_eq!(
            h.drain_kinds(),
            vec![MessageType::MetaBeginPreferSelection, MessageType::MetaEndPreferSelection]
        );
    }

    #[test]
    fn test_modifier_only_without_binding_emits_nothing() {
        let mut h = harness(scroll_map());
        h.input(RawInput::KeyDown {
            key: MappableKey::LeftShift,
            modifiers: ModifierMask::SHIFT,
            autorepeat: false,
        });
        h.input(RawInput::KeyUp {
            key: MappableKey::LeftShift,
            modifiers: ModifierMask::NONE,
        });
        let report = h.propagate();
        assert_eq!(report.synthesized, 0);
        assert_eq!(h.drain_kinds(), vec![MessageType::RawKeyDown, MessageType::RawKeyUp]);
    }

    #[test]
    fn test_click_carries_point_region() {
        let mut h = harness(MetaMap::new());
        for event in click(MouseButton::Left, 100, 200, 0) {
            h.input(event);
        }
        h.propagate();
        let messages = h.drain();
        let kinds: Vec<_> = messages.iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, vec![MessageType::RawMouseLeftButtonDown, MessageType::MouseLeftClick]);
        let region = messages[1].pixel_region(0);
        assert!(region.is_point());
        assert_eq!(region.lo, ICoord2D::new(100, 200));
        assert_eq!(messages[1].integer(1), 0);
    }

    #[test]
    fn test_drag_within_tolerance_collapses() {
        let mut h = harness(MetaMap::new());
        let modifiers = ModifierMask::SHIFT;
        h.input(RawInput::MouseDown { button: MouseButton::Left, x: 10, y: 10, modifiers, time: 0 });
        h.input(RawInput::MouseUp { button: MouseButton::Left, x: 13, y: 7, modifiers, time: 10 });
        h.input(RawInput::MouseDown { button: MouseButton::Left, x: 10, y: 10, modifiers, time: 5000 });
        h.input(RawInput::MouseUp { button: MouseButton::Left, x: 60, y: 40, modifiers, time: 5010 });
        h.propagate();
        let clicks: Vec<_> = h.drain().into_iter().filter(|m| m.kind() == MessageType::MouseLeftClick).collect();
        assert_eq!(clicks.len(), 2);
        assert_eq!(clicks[0].pixel_region(0), IRegion2D::spanning(ICoord2D::new(10, 10), ICoord2D::new(10, 10)));
        assert_eq!(clicks[1].pixel_region(0), IRegion2D::spanning(ICoord2D::new(10, 10), ICoord2D::new(60, 40)));
        assert_eq!(clicks[1].integer(1), ModifierMask::SHIFT.bits() as i32);
    }

    #[test]
    fn test_drag_exactly_at_tolerance_is_a_click() {
        let mut h = harness(MetaMap::new());
        let modifiers = ModifierMask::NONE;
        h.input(RawInput::MouseDown { button: MouseButton::Left, x: 10, y: 10, modifiers, time: 0 });
        h.input(RawInput::MouseUp { button: MouseButton::Left, x: 14, y: 6, modifiers, time: 10 });
        h.input(RawInput::MouseDown { button: MouseButton::Left, x: 10, y: 10, modifiers, time: 5000 });
        h.input(RawInput::MouseUp { button: MouseButton::Left, x: 15, y: 10, modifiers, time: 5010 });
        h.propagate();
        let clicks: Vec<_> = h.drain().into_iter().filter(|m| m.kind() == MessageType::MouseLeftClick).collect();
        assert_eq!(clicks.len(), 2);
        assert!(clicks[0].pixel_region(0).is_point());
        assert_eq!(clicks[0].pixel_region(0).lo, ICoord2D::new(10, 10));
        assert!(!clicks[1].pixel_region(0).is_point());
    }

    #[test]
    fn test_quick_second_click_is_double_click() {
        let mut h = harness(MetaMap::new());
        for event in click(MouseButton::Right, 5, 5, 1000).into_iter().chain(click(MouseButton::Right, 6, 5, 1200)) {
            h.input(event);
        }
        h.propagate();
        let refined: Vec<_> = h.drain_kinds().into_iter().filter(|k| !k.is_raw_input()).collect();
        assert_eq!(refined, vec![MessageType::MouseRightClick, MessageType::MouseRightDoubleClick]);
    }

    #[test]
    fn test_slow_second_click_is_single_click() {
        let mut h = harness(MetaMap::new());
        for event in click(MouseButton::Middle, 5, 5, 1000).into_iter().chain(click(MouseButton::Middle, 5, 5, 3000)) {
            h.input(event);
        }
        h.propagate();
        let refined: Vec<_> = h.drain_kinds().into_iter().filter(|k| !k.is_raw_input()).collect();
        assert_eq!(refined, vec![MessageType::MouseMiddleClick, MessageType::MouseMiddleClick]);
    }

    #[test]
    fn test_device_double_click_sets_flag() {
        let mut h = harness(MetaMap::new());
        let modifiers = ModifierMask::NONE;
        h.input(RawInput::MouseDoubleClick { button: MouseButton::Left, x: 1, y: 1, modifiers, time: 0 });
        h.input(RawInput::MouseUp { button: MouseButton::Left, x: 1, y: 1, modifiers, time: 0 });
        h.propagate();
        assert_eq!(
            h.drain_kinds(),
            vec![MessageType::RawMouseLeftDoubleClick, MessageType::MouseLeftDoubleClick]
        );
    }

    #[test]
    fn test_position_and_wheel_are_kept() {
        let mut h = harness(MetaMap::new());
        h.input(RawInput::MouseMove { x: 1, y: 2, modifiers: ModifierMask::NONE });
        h.input(RawInput::Wheel { x: 1, y: 2, delta: -120, modifiers: ModifierMask::NONE });
        h.propagate();
        assert_eq!(h.drain_kinds(), vec![MessageType::RawMousePosition, MessageType::RawMouseWheel]);
    }
}
