//! # Message Type Space
//!
//! Every message carries a [`MessageType`]. The numeric space is partitioned
//! into sub-ranges so that higher layers can filter by range alone:
//!
//! | range | contents |
//! |---|---|
//! | `1 ..= 22` | frame tick, raw mouse and keyboard input, refined clicks, local lifecycle |
//! | `BEGIN_META_MESSAGES < t < END_META_MESSAGES` | locally synthesized "virtual keystrokes"; never replicated |
//! | `BEGIN_NETWORK_MESSAGES < t < END_NETWORK_MESSAGES` | commands replicated to every simulation peer |
//! | `t > SERVER_MESSAGES_BASE` | server to client notifications |
//!
//! Each type has a stable diagnostic name (`MSG_META_SCROLL_UP`). Meta types
//! additionally have a binding-table name, the diagnostic name without its
//! `MSG_META_` prefix (`SCROLL_UP`).

use crate::error::MessageError;
use std::fmt;

/// Exclusive lower sentinel of the meta range.
pub const BEGIN_META_MESSAGES: u16 = 100;
/// Exclusive upper sentinel of the meta range.
pub const END_META_MESSAGES: u16 = 999;
/// Exclusive lower sentinel of the network range.
pub const BEGIN_NETWORK_MESSAGES: u16 = 1000;
/// Exclusive upper sentinel of the network range.
pub const END_NETWORK_MESSAGES: u16 = 1999;
/// Server to client messages sit strictly above this value.
pub const SERVER_MESSAGES_BASE: u16 = 2000;

const META_PREFIX: &str = "MSG_META_";

macro_rules! message_types {
    ( $( $variant:ident = $value:literal => $name:literal ),* $(,)? ) => {
        /// Type tag of a [`Message`](crate::Message).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        #[repr(u16)]
        pub enum MessageType {
            $( $variant = $value ),*
        }

        impl MessageType {
            /// Every known type, in ascending numeric order.
            pub const ALL: &'static [MessageType] = &[ $( MessageType::$variant ),* ];

            /// Stable diagnostic name, e.g. `MSG_RAW_KEY_DOWN`.
            pub fn name(self) -> &'static str {
                match self {
                    $( MessageType::$variant => $name ),*
                }
            }

            /// Looks a type up by its numeric value.
            pub fn from_value(value: u16) -> Option<Self> {
                match value {
                    $( $value => Some(MessageType::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

message_types! {
    Invalid = 0 => "MSG_INVALID",
    FrameTick = 1 => "MSG_FRAME_TICK",

    // Raw mouse input
    RawMousePosition = 2 => "MSG_RAW_MOUSE_POSITION",
    RawMouseLeftButtonDown = 3 => "MSG_RAW_MOUSE_LEFT_BUTTON_DOWN",
    RawMouseLeftDoubleClick = 4 => "MSG_RAW_MOUSE_LEFT_DOUBLE_CLICK",
    RawMouseLeftButtonUp = 5 => "MSG_RAW_MOUSE_LEFT_BUTTON_UP",
    RawMouseMiddleButtonDown = 6 => "MSG_RAW_MOUSE_MIDDLE_BUTTON_DOWN",
    RawMouseMiddleDoubleClick = 7 => "MSG_RAW_MOUSE_MIDDLE_DOUBLE_CLICK",
    RawMouseMiddleButtonUp = 8 => "MSG_RAW_MOUSE_MIDDLE_BUTTON_UP",
    RawMouseRightButtonDown = 9 => "MSG_RAW_MOUSE_RIGHT_BUTTON_DOWN",
    RawMouseRightDoubleClick = 10 => "MSG_RAW_MOUSE_RIGHT_DOUBLE_CLICK",
    RawMouseRightButtonUp = 11 => "MSG_RAW_MOUSE_RIGHT_BUTTON_UP",
    RawMouseWheel = 12 => "MSG_RAW_MOUSE_WHEEL",

    // Raw keyboard input
    RawKeyDown = 13 => "MSG_RAW_KEY_DOWN",
    RawKeyUp = 14 => "MSG_RAW_KEY_UP",

    // Refined mouse clicks
    MouseLeftClick = 15 => "MSG_MOUSE_LEFT_CLICK",
    MouseLeftDoubleClick = 16 => "MSG_MOUSE_LEFT_DOUBLE_CLICK",
    MouseMiddleClick = 17 => "MSG_MOUSE_MIDDLE_CLICK",
    MouseMiddleDoubleClick = 18 => "MSG_MOUSE_MIDDLE_DOUBLE_CLICK",
    MouseRightClick = 19 => "MSG_MOUSE_RIGHT_CLICK",
    MouseRightDoubleClick = 20 => "MSG_MOUSE_RIGHT_DOUBLE_CLICK",

    // Local session lifecycle
    ClearGameData = 21 => "MSG_CLEAR_GAME_DATA",
    NewGame = 22 => "MSG_NEW_GAME",

    // Meta messages
    MetaSaveView1 = 101 => "MSG_META_SAVE_VIEW1",
    MetaSaveView2 = 102 => "MSG_META_SAVE_VIEW2",
    MetaSaveView3 = 103 => "MSG_META_SAVE_VIEW3",
    MetaSaveView4 = 104 => "MSG_META_SAVE_VIEW4",
    MetaViewView1 = 105 => "MSG_META_VIEW_VIEW1",
    MetaViewView2 = 106 => "MSG_META_VIEW_VIEW2",
    MetaViewView3 = 107 => "MSG_META_VIEW_VIEW3",
    MetaViewView4 = 108 => "MSG_META_VIEW_VIEW4",
    MetaCreateTeam0 = 109 => "MSG_META_CREATE_TEAM0",
    MetaCreateTeam1 = 110 => "MSG_META_CREATE_TEAM1",
    MetaCreateTeam2 = 111 => "MSG_META_CREATE_TEAM2",
    MetaCreateTeam3 = 112 => "MSG_META_CREATE_TEAM3",
    MetaCreateTeam4 = 113 => "MSG_META_CREATE_TEAM4",
    MetaCreateTeam5 = 114 => "MSG_META_CREATE_TEAM5",
    MetaCreateTeam6 = 115 => "MSG_META_CREATE_TEAM6",
    MetaCreateTeam7 = 116 => "MSG_META_CREATE_TEAM7",
    MetaCreateTeam8 = 117 => "MSG_META_CREATE_TEAM8",
    MetaCreateTeam9 = 118 => "MSG_META_CREATE_TEAM9",
    MetaSelectTeam0 = 119 => "MSG_META_SELECT_TEAM0",
    MetaSelectTeam1 = 120 => "MSG_META_SELECT_TEAM1",
    MetaSelectTeam2 = 121 => "MSG_META_SELECT_TEAM2",
    MetaSelectTeam3 = 122 => "MSG_META_SELECT_TEAM3",
    MetaSelectTeam4 = 123 => "MSG_META_SELECT_TEAM4",
    MetaSelectTeam5 = 124 => "MSG_META_SELECT_TEAM5",
    MetaSelectTeam6 = 125 => "MSG_META_SELECT_TEAM6",
    MetaSelectTeam7 = 126 => "MSG_META_SELECT_TEAM7",
    MetaSelectTeam8 = 127 => "MSG_META_SELECT_TEAM8",
    MetaSelectTeam9 = 128 => "MSG_META_SELECT_TEAM9",
    MetaAddTeam0 = 129 => "MSG_META_ADD_TEAM0",
    MetaAddTeam1 = 130 => "MSG_META_ADD_TEAM1",
    MetaAddTeam2 = 131 => "MSG_META_ADD_TEAM2",
    MetaAddTeam3 = 132 => "MSG_META_ADD_TEAM3",
    MetaAddTeam4 = 133 => "MSG_META_ADD_TEAM4",
    MetaAddTeam5 = 134 => "MSG_META_ADD_TEAM5",
    MetaAddTeam6 = 135 => "MSG_META_ADD_TEAM6",
    MetaAddTeam7 = 136 => "MSG_META_ADD_TEAM7",
    MetaAddTeam8 = 137 => "MSG_META_ADD_TEAM8",
    MetaAddTeam9 = 138 => "MSG_META_ADD_TEAM9",
    MetaViewCommandCenter = 139 => "MSG_META_VIEW_COMMAND_CENTER",
    MetaViewLastRadarEvent = 140 => "MSG_META_VIEW_LAST_RADAR_EVENT",
    MetaSelectHero = 141 => "MSG_META_SELECT_HERO",
    MetaSelectAll = 142 => "MSG_META_SELECT_ALL",
    MetaSelectAllAircraft = 143 => "MSG_META_SELECT_ALL_AIRCRAFT",
    MetaScatter = 144 => "MSG_META_SCATTER",
    MetaStop = 145 => "MSG_META_STOP",
    MetaDeploy = 146 => "MSG_META_DEPLOY",
    MetaCreateFormation = 147 => "MSG_META_CREATE_FORMATION",
    MetaFollow = 148 => "MSG_META_FOLLOW",
    MetaChatPlayers = 149 => "MSG_META_CHAT_PLAYERS",
    MetaChatAllies = 150 => "MSG_META_CHAT_ALLIES",
    MetaChatEveryone = 151 => "MSG_META_CHAT_EVERYONE",
    MetaDiplomacy = 152 => "MSG_META_DIPLOMACY",
    MetaOptions = 153 => "MSG_META_OPTIONS",
    MetaToggleLowerDetails = 154 => "MSG_META_TOGGLE_LOWER_DETAILS",
    MetaToggleControlBar = 155 => "MSG_META_TOGGLE_CONTROL_BAR",
    MetaBeginPathBuild = 156 => "MSG_META_BEGIN_PATH_BUILD",
    MetaEndPathBuild = 157 => "MSG_META_END_PATH_BUILD",
    MetaBeginForceAttack = 158 => "MSG_META_BEGIN_FORCEATTACK",
    MetaEndForceAttack = 159 => "MSG_META_END_FORCEATTACK",
    MetaBeginForceMove = 160 => "MSG_META_BEGIN_FORCEMOVE",
    MetaEndForceMove = 161 => "MSG_META_END_FORCEMOVE",
    MetaBeginWaypoints = 162 => "MSG_META_BEGIN_WAYPOINTS",
    MetaEndWaypoints = 163 => "MSG_META_END_WAYPOINTS",
    MetaBeginPreferSelection = 164 => "MSG_META_BEGIN_PREFER_SELECTION",
    MetaEndPreferSelection = 165 => "MSG_META_END_PREFER_SELECTION",
    MetaTakeScreenshot = 166 => "MSG_META_TAKE_SCREENSHOT",
    MetaAllCheer = 167 => "MSG_META_ALL_CHEER",
    MetaToggleAttackMove = 168 => "MSG_META_TOGGLE_ATTACKMOVE",
    MetaBeginCameraRotate = 169 => "MSG_META_BEGIN_CAMERA_ROTATE",
    MetaEndCameraRotate = 170 => "MSG_META_END_CAMERA_ROTATE",
    MetaBeginCameraPitch = 171 => "MSG_META_BEGIN_CAMERA_PITCH",
    MetaEndCameraPitch = 172 => "MSG_META_END_CAMERA_PITCH",
    MetaBeginCameraFov = 173 => "MSG_META_BEGIN_CAMERA_FOV",
    MetaEndCameraFov = 174 => "MSG_META_END_CAMERA_FOV",
    MetaCameraReset = 175 => "MSG_META_CAMERA_RESET",
    MetaScrollUp = 176 => "MSG_META_SCROLL_UP",
    MetaScrollDown = 177 => "MSG_META_SCROLL_DOWN",
    MetaScrollLeft = 178 => "MSG_META_SCROLL_LEFT",
    MetaScrollRight = 179 => "MSG_META_SCROLL_RIGHT",
    MetaEndScrollUp = 180 => "MSG_META_END_SCROLL_UP",
    MetaEndScrollDown = 181 => "MSG_META_END_SCROLL_DOWN",
    MetaEndScrollLeft = 182 => "MSG_META_END_SCROLL_LEFT",
    MetaEndScrollRight = 183 => "MSG_META_END_SCROLL_RIGHT",
    MetaPlaceBeacon = 184 => "MSG_META_PLACE_BEACON",
    MetaRemoveBeacon = 185 => "MSG_META_REMOVE_BEACON",

    // Network-replicated commands
    CreateSelectedGroup = 1001 => "MSG_CREATE_SELECTED_GROUP",
    CreateSelectedGroupNoSound = 1002 => "MSG_CREATE_SELECTED_GROUP_NO_SOUND",
    DestroySelectedGroup = 1003 => "MSG_DESTROY_SELECTED_GROUP",
    RemoveFromSelectedGroup = 1004 => "MSG_REMOVE_FROM_SELECTED_GROUP",
    SelectedGroupCommand = 1005 => "MSG_SELECTED_GROUP_COMMAND",
    DoAttackObject = 1006 => "MSG_DO_ATTACK_OBJECT",
    DoForceAttackObject = 1007 => "MSG_DO_FORCE_ATTACK_OBJECT",
    DoForceAttackGround = 1008 => "MSG_DO_FORCE_ATTACK_GROUND",
    DoMoveTo = 1009 => "MSG_DO_MOVETO",
    DoAttackMoveTo = 1010 => "MSG_DO_ATTACKMOVETO",
    DoForceMoveTo = 1011 => "MSG_DO_FORCEMOVETO",
    DoStop = 1012 => "MSG_DO_STOP",
    DoScatter = 1013 => "MSG_DO_SCATTER",
    DoGuardPosition = 1014 => "MSG_DO_GUARD_POSITION",
    DoGuardObject = 1015 => "MSG_DO_GUARD_OBJECT",
    DoSpecialPower = 1016 => "MSG_DO_SPECIAL_POWER",
    DoSpecialPowerAtLocation = 1017 => "MSG_DO_SPECIAL_POWER_AT_LOCATION",
    DoSpecialPowerAtObject = 1018 => "MSG_DO_SPECIAL_POWER_AT_OBJECT",
    SetRallyPoint = 1019 => "MSG_SET_RALLY_POINT",
    PurchaseScience = 1020 => "MSG_PURCHASE_SCIENCE",
    QueueUnitCreate = 1021 => "MSG_QUEUE_UNIT_CREATE",
    CancelUnitCreate = 1022 => "MSG_CANCEL_UNIT_CREATE",
    DozerConstruct = 1023 => "MSG_DOZER_CONSTRUCT",
    CancelDozerConstruct = 1024 => "MSG_DOZER_CANCEL_CONSTRUCT",
    Sell = 1025 => "MSG_SELL",
    Evacuate = 1026 => "MSG_EVACUATE",
    EnterContainer = 1027 => "MSG_ENTER",
    ExitContainer = 1028 => "MSG_EXIT",
    PlaceBeacon = 1029 => "MSG_PLACE_BEACON",
    LogicCrc = 1030 => "MSG_LOGIC_CRC",
    SetReplayCamera = 1031 => "MSG_SET_REPLAY_CAMERA",
    SelfDestruct = 1032 => "MSG_SELF_DESTRUCT",
    SetMineClearingDetail = 1033 => "MSG_SET_MINE_CLEARING_DETAIL",

    // Server to client
    Timestamp = 2001 => "MSG_TIMESTAMP",
    ObjectCreated = 2002 => "MSG_OBJECT_CREATED",
    ObjectDestroyed = 2003 => "MSG_OBJECT_DESTROYED",
    ObjectPosition = 2004 => "MSG_OBJECT_POSITION",
    ObjectOrientation = 2005 => "MSG_OBJECT_ORIENTATION",
    ObjectJustBuilt = 2006 => "MSG_OBJECT_JUST_BUILT",
}

impl MessageType {
    /// Numeric value of the tag.
    pub fn value(self) -> u16 {
        self as u16
    }

    /// Locally synthesized virtual keystroke; must never cross the network.
    pub fn is_meta_message(self) -> bool {
        let v = self.value();
        v > BEGIN_META_MESSAGES && v < END_META_MESSAGES
    }

    /// Command replicated to every simulation peer.
    pub fn is_network_message(self) -> bool {
        let v = self.value();
        v > BEGIN_NETWORK_MESSAGES && v < END_NETWORK_MESSAGES
    }

    pub fn is_server_message(self) -> bool {
        self.value() > SERVER_MESSAGES_BASE
    }

    pub fn is_raw_mouse(self) -> bool {
        let v = self.value();
        v >= MessageType::RawMousePosition.value() && v <= MessageType::RawMouseWheel.value()
    }

    pub fn is_raw_key(self) -> bool {
        matches!(self, MessageType::RawKeyDown | MessageType::RawKeyUp)
    }

    pub fn is_raw_input(self) -> bool {
        self.is_raw_mouse() || self.is_raw_key()
    }

    /// Looks a type up by its diagnostic name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Binding-table name of a meta type (`SCROLL_UP`), `None` for every
    /// other range.
    pub fn meta_name(self) -> Option<&'static str> {
        if self.is_meta_message() {
            self.name().strip_prefix(META_PREFIX)
        } else {
            None
        }
    }

    /// Looks a meta type up by its binding-table name.
    pub fn from_meta_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.meta_name() == Some(name))
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for MessageType {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| MessageError::UnknownType(s.to_string()))
    }
}

impl TryFrom<String> for MessageType {
    type Error = MessageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MessageType> for String {
    fn from(value: MessageType) -> Self {
        value.name().to_string()
    }
}
