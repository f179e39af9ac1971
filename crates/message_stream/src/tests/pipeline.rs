use super::harness::Harness;
use crate::input::{MappableKey, ModifierMask, MouseButton, RawInput};
use crate::message_type::MessageType;
use crate::meta_map::{KeyTransition, MetaMap, MetaMapRecord};
use crate::session::{ClientSession, TranslatorConfig};
use crate::translators::{LookAtTranslator, MetaEventTranslator, MouseSettings, ScrollType};
use crate::types::{Coord2D, PlayerIndex};
use crate::view::ViewState;

fn up_arrow(modifiers: ModifierMask, autorepeat: bool) -> RawInput {
    RawInput::KeyDown {
        key: MappableKey::Up,
        modifiers,
        autorepeat,
    }
}

fn session() -> ClientSession {
    let mut session = ClientSession::with_default_translators(
        PlayerIndex(2),
        Box::new(ViewState::new(800, 600)),
        TranslatorConfig {
            bindings: MetaMap::default_bindings(),
            ..TranslatorConfig::default()
        },
    );
    session.client_mut().set_frame(1);
    session
}

fn view(session: &ClientSession) -> &ViewState {
    match session.client().view_as::<ViewState>() {
        Some(view) => view,
        None => panic!("session view is a ViewState"),
    }
}

#[test]
fn test_up_arrow_becomes_scroll_up_command() {
    let map = MetaMap::from_records([MetaMapRecord::new(
        MessageType::MetaScrollUp,
        MappableKey::Up,
        KeyTransition::Down,
        ModifierMask::NONE,
    )])
    .unwrap();
    let mut h = Harness::new().with(MetaEventTranslator::new(map, MouseSettings::default()), 20);

    h.input(up_arrow(ModifierMask::NONE, false));
    h.propagate();

    let commands = h.drain();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].kind(), MessageType::MetaScrollUp);
    assert_eq!(commands[0].player_index(), PlayerIndex(0));
    assert!(commands.iter().all(|m| !m.kind().is_raw_key()));
    assert!(h.stream.is_empty());
}

#[test]
fn test_default_chain_scrolls_camera_without_leaking_meta() {
    let mut session = session();
    session.push_input(&up_arrow(ModifierMask::NONE, false));
    session.update();
    session.update();
    session.push_input(&RawInput::KeyUp {
        key: MappableKey::Up,
        modifiers: ModifierMask::NONE,
    });
    session.update();
    session.update();

    let kinds: Vec<_> = session.drain_commands().iter().map(|m| m.kind()).collect();
    assert_eq!(kinds, vec![MessageType::FrameTick; 4]);
    // Scroll starts behind tick 1's frame tick and ends behind tick 3's.
    assert_eq!(view(&session).scroll_count(), 2);
    assert_eq!(view(&session).position(), Coord2D::new(0.0, -20.0));
    assert_eq!(session.look_at().map(|l| l.scroll_type()), Some(ScrollType::None));
}

#[test]
fn test_holding_a_key_emits_one_command() {
    let map = MetaMap::default_bindings();
    let mut h = Harness::new().with(MetaEventTranslator::new(map, MouseSettings::default()), 20);
    h.input(up_arrow(ModifierMask::NONE, false));
    for _ in 0..5 {
        h.input(up_arrow(ModifierMask::NONE, true));
    }
    let report = h.propagate();
    assert_eq!(report.destroyed, 6);
    assert_eq!(h.drain_kinds(), vec![MessageType::MetaScrollUp]);
}

#[test]
fn test_ctrl_alone_toggles_force_attack() {
    let map = MetaMap::default_bindings();
    let mut h = Harness::new().with(MetaEventTranslator::new(map, MouseSettings::default()), 20);
    h.input(RawInput::KeyDown {
        key: MappableKey::LeftControl,
        modifiers: ModifierMask::CTRL,
        autorepeat: false,
    });
    h.input(RawInput::KeyDown {
        key: MappableKey::X,
        modifiers: ModifierMask::CTRL,
        autorepeat: false,
    });
    h.input(RawInput::KeyUp {
        key: MappableKey::LeftControl,
        modifiers: ModifierMask::NONE,
    });
    h.propagate();
    assert_eq!(
        h.drain_kinds(),
        vec![
            MessageType::MetaBeginForceAttack,
            MessageType::MetaScatter,
            MessageType::MetaEndForceAttack,
        ]
    );
}

#[test]
fn test_clicks_refined_then_filtered_by_dispatcher() {
    let mut h = Harness::new()
        .with(MetaEventTranslator::new(MetaMap::new(), MouseSettings::default()), 20)
        .with(LookAtTranslator::new(Default::default()), 60);
    h.input(RawInput::MouseDown {
        button: MouseButton::Left,
        x: 300,
        y: 200,
        modifiers: ModifierMask::NONE,
        time: 10,
    });
    h.input(RawInput::MouseUp {
        button: MouseButton::Left,
        x: 301,
        y: 200,
        modifiers: ModifierMask::NONE,
        time: 30,
    });
    h.propagate();
    assert_eq!(
        h.drain_kinds(),
        vec![MessageType::RawMouseLeftButtonDown, MessageType::MouseLeftClick]
    );

    let mut session = session();
    session.push_input(&RawInput::MouseDown {
        button: MouseButton::Left,
        x: 300,
        y: 200,
        modifiers: ModifierMask::NONE,
        time: 10,
    });
    session.stream_mut().append_message(MessageType::DoMoveTo);
    session.update();
    let kinds: Vec<_> = session.drain_commands().iter().map(|m| m.kind()).collect();
    assert_eq!(kinds, vec![MessageType::DoMoveTo, MessageType::FrameTick]);
}

#[test]
fn test_shell_screen_suspends_game_bindings() {
    let mut session = session();
    session.set_shell_active(true);
    session.push_input(&up_arrow(ModifierMask::NONE, false));
    session.update();
    session.update();
    assert_eq!(view(&session).scroll_count(), 0);

    session.set_shell_active(false);
    session.push_input(&up_arrow(ModifierMask::NONE, false));
    session.update();
    session.update();
    assert_eq!(view(&session).scroll_count(), 1);
}

#[test]
fn test_stats_accumulate_over_session() {
    let mut session = session();
    for _ in 0..3 {
        session.push_input(&RawInput::MouseMove {
            x: 400,
            y: 300,
            modifiers: ModifierMask::NONE,
        });
        session.update();
    }
    let stats = session.stream().stats();
    assert_eq!(stats.passes, 3);
    assert_eq!(stats.translators, 3);
    assert_eq!(stats.messages_forwarded, 3);
    assert_eq!(stats.messages_destroyed, 3);
}
